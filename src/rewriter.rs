// WHY: one left-to-right splice pass over detected spans with a running length delta
// Every splice shifts later offsets, so spans are re-based against the mutated text as we go

use ropey::Rope;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::detector::Span;
use crate::table::ReplacementTable;

/// Correction applied to each problem character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Substitute the configured plain-text equivalent
    #[default]
    Replace,
    /// Substitute a decimal numeric character reference
    Escape,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Replace => "replace",
            Mode::Escape => "escape",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Mode::Replace),
            "escape" => Ok(Mode::Escape),
            other => Err(format!("unknown rewrite mode {other:?}, expected replace or escape")),
        }
    }
}

/// Character-indexed text that can be spliced in place
/// WHY: lets the same pass mutate an in-memory rope or a host editor view
pub trait TextBuffer {
    fn len_chars(&self) -> usize;

    /// Text of the half-open character range
    fn slice_chars(&self, start: usize, end: usize) -> String;

    /// Replace the half-open character range with `text`
    fn replace_chars(&mut self, start: usize, end: usize, text: &str);
}

impl TextBuffer for Rope {
    fn len_chars(&self) -> usize {
        Rope::len_chars(self)
    }

    fn slice_chars(&self, start: usize, end: usize) -> String {
        self.slice(start..end).to_string()
    }

    fn replace_chars(&mut self, start: usize, end: usize, text: &str) {
        self.remove(start..end);
        self.insert(start, text);
    }
}

/// Result of a rewrite pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub count: usize,
}

/// Outcome of rewriting one view in place
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteSummary {
    pub mode: Mode,
    pub count: usize,
}

impl RewriteSummary {
    pub fn message(&self) -> String {
        status_message(self.mode, self.count)
    }
}

/// Substitute for one matched character
/// WHY: a key missing from the table (e.g. after a reload) is kept, never dropped
pub fn substitute(c: char, mode: Mode, table: &ReplacementTable) -> Cow<'_, str> {
    match mode {
        Mode::Replace => match table.get(c) {
            Some(sub) => Cow::Borrowed(sub),
            None => Cow::Owned(c.to_string()),
        },
        Mode::Escape => Cow::Owned(format!("&#{};", u32::from(c))),
    }
}

/// Splice every span of `buffer` in one pass, returns the number of spans rewritten
/// Spans must be ascending and non-overlapping, computed against the buffer's current content
pub fn rewrite_buffer<B: TextBuffer + ?Sized>(
    buffer: &mut B,
    spans: &[Span],
    mode: Mode,
    table: &ReplacementTable,
) -> usize {
    let mut offset: isize = 0;
    let mut count = 0;

    for span in spans {
        let start = (span.start as isize + offset) as usize;
        let end = (span.end as isize + offset) as usize;
        if end > buffer.len_chars() || start > end {
            debug!("Span {:?} out of bounds after offset {}, skipping", span, offset);
            continue;
        }

        let matched = buffer.slice_chars(start, end);
        let replacement: String = matched
            .chars()
            .map(|c| substitute(c, mode, table))
            .collect();

        buffer.replace_chars(start, end, &replacement);
        offset += replacement.chars().count() as isize - (end - start) as isize;
        count += 1;
    }

    debug!("Rewrote {} spans in {} mode, net length delta {}", count, mode, offset);
    count
}

/// Rewrite `text` and return the new text with the count of characters replaced
pub fn rewrite(text: &str, spans: &[Span], mode: Mode, table: &ReplacementTable) -> Rewrite {
    let mut rope = Rope::from_str(text);
    let count = rewrite_buffer(&mut rope, spans, mode, table);
    Rewrite {
        text: rope.to_string(),
        count,
    }
}

/// User-facing status line for a rewrite pass
pub fn status_message(mode: Mode, count: usize) -> String {
    let verb = match mode {
        Mode::Replace => "Replaced",
        Mode::Escape => "Escaped",
    };
    match count {
        0 => format!("No special characters to {mode}!"),
        1 => format!("{verb} 1 special character"),
        n => format!("{verb} {n} special characters"),
    }
}
