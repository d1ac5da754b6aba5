//! Seam to an external document editor.
//!
//! Models never change. An edit names a model by document and lookup path, hands the intent
//! to a [`DocumentEditor`], and gets back a freshly built [`SourceGraph`]. The graph the edit
//! started from stays valid.

mod editable;

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{LookupPath, ModelKind, SourceGraph};

pub use editable::Editable;

/// Errors raised by document edits.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("{path} was not loaded from a source document")]
    NoDocument { path: LookupPath },

    #[error("{action} is not supported on {kind} models")]
    Unsupported { kind: ModelKind, action: &'static str },

    #[error("{path} not found in {}", .document.display())]
    NotFound { document: PathBuf, path: LookupPath },

    #[error("document editor failed: {0}")]
    Editor(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Byte range in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Part of a declaration to locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanRegion {
    /// The full definition, attributes and documentation included.
    Definition,
    /// The body between braces.
    Body,
}

/// The model an edit applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub document: PathBuf,
    pub path: LookupPath,
    pub kind: ModelKind,
}

/// Mutation intent passed to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditAction {
    InsertBefore(String),
    InsertAfter(String),
    InsertAtBodyStart(String),
    InsertAtBodyEnd(String),
    ReplaceBody(String),
    DeleteBody,
    Replace(String),
    Delete,
}

impl EditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditAction::InsertBefore(_) => "insert_before",
            EditAction::InsertAfter(_) => "insert_after",
            EditAction::InsertAtBodyStart(_) => "insert_at_body_start",
            EditAction::InsertAtBodyEnd(_) => "insert_at_body_end",
            EditAction::ReplaceBody(_) => "replace_body",
            EditAction::DeleteBody => "delete_body",
            EditAction::Replace(_) => "replace",
            EditAction::Delete => "delete",
        }
    }

    /// Whether the action works inside the declaration body.
    pub fn touches_body(&self) -> bool {
        matches!(
            self,
            EditAction::InsertAtBodyStart(_)
                | EditAction::InsertAtBodyEnd(_)
                | EditAction::ReplaceBody(_)
                | EditAction::DeleteBody
        )
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External collaborator that owns document text.
pub trait DocumentEditor {
    /// Text span of a model's definition or body.
    fn locate(&self, target: &EditTarget, region: SpanRegion) -> Result<TextSpan, DocumentError>;

    /// Apply an edit and rebuild the graph of the changed document.
    fn apply(&self, target: &EditTarget, action: EditAction) -> Result<SourceGraph, DocumentError>;
}
