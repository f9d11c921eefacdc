// WHY: decides whether a document is scanned automatically
// Markup syntax or extension, not a search-results view, size within the ceiling

use std::path::Path;

/// Extensions treated as markup when the syntax label says nothing
const MARKUP_EXTENSIONS: &[&str] = &["aspx", "ascx", "html", "htm", "xhtml", "xml"];

/// Syntax label fragments that mark a document as markup
const MARKUP_SYNTAX_MARKERS: &[&str] = &["HTML", "XML"];

/// Syntax label fragment of search result pseudo-documents
const FIND_RESULTS_MARKER: &str = "Find Results";

/// Facts about a document needed to decide eligibility
#[derive(Debug, Clone, Copy)]
pub struct DocumentFacts<'a> {
    pub syntax: Option<&'a str>,
    pub file_name: Option<&'a Path>,
    /// Buffer size in characters
    pub size: usize,
}

/// Eligibility gate, parameterized by the configured size ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityPolicy {
    pub max_file_size: usize,
}

impl EligibilityPolicy {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn is_eligible(&self, facts: &DocumentFacts<'_>) -> bool {
        facts.size <= self.max_file_size
            && is_hypertext(facts.syntax, facts.file_name)
            && !is_find_results(facts.syntax)
    }
}

/// Search result views carry a "Find Results" syntax
pub fn is_find_results(syntax: Option<&str>) -> bool {
    syntax.is_some_and(|s| s.contains(FIND_RESULTS_MARKER))
}

/// Markup by declared syntax, or by file name when the syntax is not markup
pub fn is_hypertext(syntax: Option<&str>, file_name: Option<&Path>) -> bool {
    let by_syntax = syntax.is_some_and(|s| MARKUP_SYNTAX_MARKERS.iter().any(|m| s.contains(m)));
    by_syntax || file_name.is_some_and(is_markup_file_name)
}

/// Markup extension, or "aspx" anywhere in the name as editors hosting ASP.NET pages report it
pub fn is_markup_file_name(path: &Path) -> bool {
    let by_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            MARKUP_EXTENSIONS
                .iter()
                .any(|m| ext.eq_ignore_ascii_case(m))
        });
    by_extension
        || path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().contains("aspx"))
}

/// Syntax label a host would assign to a file, inferred from its extension
pub fn syntax_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "html" | "htm" | "xhtml" => Some("HTML"),
        "xml" => Some("XML"),
        "aspx" | "ascx" => Some("HTML (ASP)"),
        "txt" => Some("Plain Text"),
        _ => None,
    }
}
