// WHY: in-memory views and windows backed by ropes, used by the command-line host
// Character-indexed splicing on a rope keeps each rewrite step O(log n)

use ropey::Rope;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::eligibility::syntax_for_path;
use crate::host::{View, ViewId, Window};
use crate::rewriter::TextBuffer;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// An open document
#[derive(Debug, Clone)]
pub struct Document {
    id: ViewId,
    syntax: Option<String>,
    path: Option<PathBuf>,
    rope: Rope,
    modified: bool,
}

impl Document {
    /// Scratch document with an explicit syntax label
    pub fn new(text: &str, syntax: Option<&str>) -> Self {
        Self {
            id: ViewId(NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed)),
            syntax: syntax.map(str::to_string),
            path: None,
            rope: Rope::from_str(text),
            modified: false,
        }
    }

    /// Document loaded from `path`, syntax inferred from the extension
    pub fn from_file(path: impl Into<PathBuf>, text: &str) -> Self {
        let path = path.into();
        let mut doc = Self::new(text, syntax_for_path(&path));
        doc.path = Some(path);
        doc
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether the buffer changed since it was opened
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Insert `text` at character offset `at`
    pub fn insert(&mut self, at: usize, text: &str) {
        self.rope.insert(at, text);
        self.modified = true;
    }
}

impl TextBuffer for Document {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn slice_chars(&self, start: usize, end: usize) -> String {
        self.rope.slice(start..end).to_string()
    }

    fn replace_chars(&mut self, start: usize, end: usize, text: &str) {
        self.rope.replace_chars(start, end, text);
        self.modified = true;
    }
}

impl View for Document {
    fn id(&self) -> ViewId {
        self.id
    }

    fn syntax(&self) -> Option<&str> {
        self.syntax.as_deref()
    }

    fn file_name(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn text(&self) -> String {
        self.rope.to_string()
    }
}

/// A set of open documents with one active
#[derive(Debug, Default)]
pub struct Workspace {
    documents: Vec<Document>,
    active: Option<usize>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a document and make it active
    pub fn open(&mut self, document: Document) -> ViewId {
        let id = document.id;
        self.documents.push(document);
        self.active = Some(self.documents.len() - 1);
        id
    }

    /// Make `id` the active view; returns false if it is not open
    pub fn activate(&mut self, id: ViewId) -> bool {
        match self.documents.iter().position(|d| d.id == id) {
            Some(index) => {
                self.active = Some(index);
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self, id: ViewId) -> Option<Document> {
        let index = self.documents.iter().position(|d| d.id == id)?;
        let doc = self.documents.remove(index);
        self.active = match self.active {
            _ if self.documents.is_empty() => None,
            Some(a) if a >= index => Some(a.saturating_sub(1)),
            other => other,
        };
        Some(doc)
    }

    pub fn get(&self, id: ViewId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }
}

impl Window for Workspace {
    fn views(&self) -> Vec<&dyn View> {
        self.documents.iter().map(|d| d as &dyn View).collect()
    }

    fn active_view(&self) -> Option<&dyn View> {
        self.active
            .and_then(|i| self.documents.get(i))
            .map(|d| d as &dyn View)
    }

    fn active_view_mut(&mut self) -> Option<&mut dyn View> {
        self.active
            .and_then(|i| self.documents.get_mut(i))
            .map(|d| d as &mut dyn View)
    }
}
