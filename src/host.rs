// WHY: the editor object model the plugin runs against, expressed as traits
// Lets the detection/rewrite core run without a real editor present

use std::fmt;
use std::path::Path;

use crate::detector::Span;
use crate::eligibility::DocumentFacts;
use crate::rewriter::TextBuffer;

/// Identifier of an open view, unique within a process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// An open buffer as seen by the plugin
pub trait View: TextBuffer {
    fn id(&self) -> ViewId;

    /// Declared syntax label, e.g. "HTML" or a syntax definition path
    fn syntax(&self) -> Option<&str>;

    fn file_name(&self) -> Option<&Path>;

    /// Full buffer content at call time
    fn text(&self) -> String;

    /// Size in characters
    fn size(&self) -> usize {
        self.len_chars()
    }

    fn facts(&self) -> DocumentFacts<'_> {
        DocumentFacts {
            syntax: self.syntax(),
            file_name: self.file_name(),
            size: self.size(),
        }
    }
}

/// A window holding views, one of which may be active
pub trait Window {
    fn views(&self) -> Vec<&dyn View>;

    fn active_view(&self) -> Option<&dyn View>;

    fn active_view_mut(&mut self) -> Option<&mut dyn View>;
}

/// How a group of regions is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawFlags(u32);

impl DrawFlags {
    pub const NONE: DrawFlags = DrawFlags(0);
    /// Draw zero-width regions as a caret-sized mark
    pub const EMPTY: DrawFlags = DrawFlags(1);

    pub fn contains(self, other: DrawFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Host display layer that draws named groups of marked regions
pub trait DisplayLayer {
    /// Replace the group `key` on `view` with `spans`
    fn add_regions(&mut self, view: ViewId, key: &str, spans: &[Span], style: &str, flags: DrawFlags);

    /// Remove the group `key` on `view`, if present
    fn erase_regions(&mut self, view: ViewId, key: &str);
}
