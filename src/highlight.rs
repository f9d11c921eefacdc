// WHY: maintains one reserved highlight group per view on the host display layer
// No eligibility logic here - callers gate before highlighting

use std::collections::HashMap;
use tracing::debug;

use crate::detector::Span;
use crate::host::{DisplayLayer, DrawFlags, ViewId};

/// Reserved identifier of the problem character highlight group
pub const HIGHLIGHT_KEY: &str = "typographer.problem_characters";

/// Problem characters stay visible even where a region collapses to zero width
pub const HIGHLIGHT_FLAGS: DrawFlags = DrawFlags::EMPTY;

/// Mark exactly `spans` on `view`, replacing previous marks; empty spans clear the group
pub fn highlight<D: DisplayLayer + ?Sized>(display: &mut D, view: ViewId, spans: &[Span], style: &str) {
    if spans.is_empty() {
        clear(display, view);
        return;
    }
    debug!("Highlighting {} spans on {} with style {}", spans.len(), view, style);
    display.add_regions(view, HIGHLIGHT_KEY, spans, style, HIGHLIGHT_FLAGS);
}

/// Remove the highlight group from `view` unconditionally
pub fn clear<D: DisplayLayer + ?Sized>(display: &mut D, view: ViewId) {
    debug!("Clearing highlights on {}", view);
    display.erase_regions(view, HIGHLIGHT_KEY);
}

/// Regions currently drawn for one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marks {
    pub spans: Vec<Span>,
    pub style: String,
    pub flags: DrawFlags,
}

/// Display call as received, for inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Add { view: ViewId, key: String, spans: Vec<Span> },
    Erase { view: ViewId, key: String },
}

/// In-memory display layer used by the command-line host and tests
#[derive(Debug, Default)]
pub struct MemoryDisplay {
    groups: HashMap<(ViewId, String), Marks>,
    calls: Vec<DisplayCall>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks drawn for the problem character group of `view`
    pub fn marks(&self, view: ViewId) -> Option<&Marks> {
        self.groups.get(&(view, HIGHLIGHT_KEY.to_string()))
    }

    pub fn calls(&self) -> &[DisplayCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<DisplayCall> {
        std::mem::take(&mut self.calls)
    }
}

impl DisplayLayer for MemoryDisplay {
    fn add_regions(&mut self, view: ViewId, key: &str, spans: &[Span], style: &str, flags: DrawFlags) {
        self.calls.push(DisplayCall::Add {
            view,
            key: key.to_string(),
            spans: spans.to_vec(),
        });
        self.groups.insert(
            (view, key.to_string()),
            Marks {
                spans: spans.to_vec(),
                style: style.to_string(),
                flags,
            },
        );
    }

    fn erase_regions(&mut self, view: ViewId, key: &str) {
        self.calls.push(DisplayCall::Erase {
            view,
            key: key.to_string(),
        });
        self.groups.remove(&(view, key.to_string()));
    }
}
