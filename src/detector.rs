// WHY: single-pass detection of problem characters using a compiled character class
// Uses regex-automata meta regex for O(n) scanning, offsets reported in characters

use regex_automata::meta::{FindMatches, Regex};
use std::fmt::Write as _;
use thiserror::Error;
use tracing::debug;

use crate::table::ReplacementTable;

/// Half-open interval of character offsets identifying one problem character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Error)]
pub enum DetectorError {
    #[error("failed to compile problem character matcher: {0}")]
    Build(#[from] regex_automata::meta::BuildError),
}

/// Position counter for single-pass O(n) byte to character tracking
#[derive(Debug, Clone)]
struct PositionCounter {
    /// Current byte position in text
    byte_pos: usize,
    /// Current character position in text
    char_pos: usize,
    /// Current line number (1-based)
    line: usize,
    /// Current column number (1-based, in characters)
    col: usize,
}

impl PositionCounter {
    fn new() -> Self {
        Self {
            byte_pos: 0,
            char_pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Advance counter to target byte position, updating char/line/col
    /// WHY: O(1) amortized - only processes bytes between current and target position
    fn advance_to_byte(&mut self, text_bytes: &[u8], target_byte_pos: usize) {
        while self.byte_pos < target_byte_pos && self.byte_pos < text_bytes.len() {
            let byte = text_bytes[self.byte_pos];
            let starts_char = (byte & 0xC0) != 0x80;

            if starts_char {
                self.char_pos += 1;
            }

            if byte == b'\n' {
                self.line += 1;
                self.col = 1;
            } else if starts_char {
                self.col += 1;
            }

            self.byte_pos += 1;
        }
    }

    /// Advance by whole characters, used when only character offsets are known
    fn advance_to_char(&mut self, text: &str, target_char_pos: usize) {
        let bytes = text.as_bytes();
        while self.char_pos < target_char_pos && self.byte_pos < bytes.len() {
            let width = text[self.byte_pos..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.advance_to_byte(bytes, self.byte_pos + width);
        }
    }
}

/// Compiled matcher for the keys of one replacement table
#[derive(Debug, Clone)]
pub struct Detector {
    /// None when the table is empty - nothing can match
    matcher: Option<Regex>,
}

impl Detector {
    /// Compile the table keys into a character class
    /// WHY: keys are written as \x{HEX} escapes so no configured character is read as pattern syntax
    pub fn new(table: &ReplacementTable) -> Result<Self, DetectorError> {
        if table.is_empty() {
            debug!("Empty replacement table, detector will never match");
            return Ok(Self { matcher: None });
        }

        let mut pattern = String::from("[");
        for key in table.keys() {
            // Writing to a String cannot fail
            let _ = write!(pattern, "\\x{{{:X}}}", u32::from(key));
        }
        pattern.push(']');

        let matcher = Regex::new(&pattern)?;
        debug!("Compiled problem character class for {} keys", table.len());

        Ok(Self {
            matcher: Some(matcher),
        })
    }

    /// Lazily iterate spans in ascending order
    pub fn spans<'r, 'h>(&'r self, text: &'h str) -> SpanIter<'r, 'h> {
        SpanIter {
            matches: self.matcher.as_ref().map(|m| m.find_iter(text)),
            bytes: text.as_bytes(),
            counter: PositionCounter::new(),
        }
    }

    /// Eagerly collect all spans
    pub fn find_all(&self, text: &str) -> Vec<Span> {
        self.spans(text).collect()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(text))
    }
}

/// Iterator over detected spans; byte matches are converted to character offsets on the fly
pub struct SpanIter<'r, 'h> {
    matches: Option<FindMatches<'r, 'h>>,
    bytes: &'h [u8],
    counter: PositionCounter,
}

impl Iterator for SpanIter<'_, '_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let found = self.matches.as_mut()?.next()?;
        self.counter.advance_to_byte(self.bytes, found.start());
        let start = self.counter.char_pos;
        self.counter.advance_to_byte(self.bytes, found.end());
        Some(Span::new(start, self.counter.char_pos))
    }
}

/// Detect all problem characters of `table` in `text`
pub fn detect(text: &str, table: &ReplacementTable) -> Result<Vec<Span>, DetectorError> {
    let detector = Detector::new(table)?;
    let spans = detector.find_all(text);
    debug!("Detected {} problem characters in {} bytes", spans.len(), text.len());
    Ok(spans)
}

/// Cheap presence check without materializing spans
pub fn contains_problem_characters(
    text: &str,
    table: &ReplacementTable,
) -> Result<bool, DetectorError> {
    Ok(Detector::new(table)?.is_match(text))
}

/// 1-based line/column of a span start, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

/// Resolves ascending spans to line/column positions in one forward pass
pub struct SpanLocator<'a> {
    text: &'a str,
    counter: PositionCounter,
}

impl<'a> SpanLocator<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            counter: PositionCounter::new(),
        }
    }

    /// Locate a span; spans must be passed in ascending order
    pub fn locate(&mut self, span: Span) -> Location {
        if span.start < self.counter.char_pos {
            self.counter = PositionCounter::new();
        }
        self.counter.advance_to_char(self.text, span.start);
        Location {
            line: self.counter.line,
            col: self.counter.col,
        }
    }
}
