//! State shared by every model: identity, load status and load errors.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kinds::ModelKind;
use super::store::{ModelRef, ModelStore};

/// A string key uniquely identifying a model within one source graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupPath(String);

impl LookupPath {
    /// The empty path, used by unloaded models.
    pub const EMPTY: LookupPath = LookupPath(String::new());

    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of a child model named `segment` under this path.
    pub fn child(&self, segment: &str) -> Self {
        if self.0.is_empty() {
            Self(segment.to_string())
        } else {
            Self(format!("{}.{}", self.0, segment))
        }
    }
}

impl fmt::Display for LookupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for LookupPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for LookupPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LookupPath {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for LookupPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Why a model failed to build correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadErrorKind {
    /// A referenced type or model could not be found.
    UnresolvedReference,
    /// Two models were assigned the same lookup path.
    DuplicatePath,
    /// A type usage could not be understood.
    MalformedType,
    /// A reference resolved to a model of the wrong kind.
    KindMismatch,
    /// A required value was missing.
    MissingValue,
    /// A declared value such as an accessibility or modifier was not recognized.
    InvalidValue,
}

impl LoadErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadErrorKind::UnresolvedReference => "unresolved_reference",
            LoadErrorKind::DuplicatePath => "duplicate_path",
            LoadErrorKind::MalformedType => "malformed_type",
            LoadErrorKind::KindMismatch => "kind_mismatch",
            LoadErrorKind::MissingValue => "missing_value",
            LoadErrorKind::InvalidValue => "invalid_value",
        }
    }
}

impl fmt::Display for LoadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured record of a model build failure.
///
/// Load errors are flagged on the model, never raised, so partially broken
/// graphs stay inspectable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind} at {path}: {message}")]
pub struct LoadError {
    pub kind: LoadErrorKind,
    /// Lookup path of the model that failed.
    pub path: LookupPath,
    pub message: String,
}

impl LoadError {
    pub fn new(kind: LoadErrorKind, path: &LookupPath, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.clone(),
            message: message.into(),
        }
    }
}

/// Identity and load status carried by every model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    kind: ModelKind,
    lookup_path: LookupPath,
    parent_path: Option<LookupPath>,
    is_loaded: bool,
    loaded_from_source: bool,
    source_document: Option<PathBuf>,
    load_errors: Vec<LoadError>,
    has_errors: bool,
}

impl ModelInfo {
    /// Info for a successfully loaded model.
    pub fn new(kind: ModelKind, lookup_path: impl Into<LookupPath>) -> Self {
        Self {
            kind,
            lookup_path: lookup_path.into(),
            parent_path: None,
            is_loaded: true,
            loaded_from_source: false,
            source_document: None,
            load_errors: Vec::new(),
            has_errors: false,
        }
    }

    /// Info for a model that could not be loaded.
    pub const fn unloaded(kind: ModelKind) -> Self {
        Self {
            kind,
            lookup_path: LookupPath::EMPTY,
            parent_path: None,
            is_loaded: false,
            loaded_from_source: false,
            source_document: None,
            load_errors: Vec::new(),
            has_errors: false,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<LookupPath>) -> Self {
        self.parent_path = Some(parent.into());
        self
    }

    /// Mark the model as built from a source document.
    pub fn from_document(mut self, document: Option<PathBuf>) -> Self {
        self.loaded_from_source = document.is_some();
        self.source_document = document;
        self
    }

    /// Attach load errors recorded for this model itself.
    pub fn with_errors(mut self, errors: Vec<LoadError>) -> Self {
        self.has_errors |= !errors.is_empty();
        self.load_errors = errors;
        self
    }

    /// Fold in the error state of descendants.
    pub fn with_descendant_errors(mut self, descendant_errors: bool) -> Self {
        self.has_errors |= descendant_errors;
        self
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn lookup_path(&self) -> &LookupPath {
        &self.lookup_path
    }

    pub fn parent_path(&self) -> Option<&LookupPath> {
        self.parent_path.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn loaded_from_source(&self) -> bool {
        self.loaded_from_source
    }

    pub fn source_document(&self) -> Option<&Path> {
        self.source_document.as_deref()
    }

    pub fn load_errors(&self) -> &[LoadError] {
        &self.load_errors
    }

    pub fn has_errors(&self) -> bool {
        self.has_errors
    }
}

/// Common read-only surface of every model.
pub trait Model {
    fn info(&self) -> &ModelInfo;

    fn model_kind(&self) -> ModelKind {
        self.info().kind()
    }

    fn lookup_path(&self) -> &LookupPath {
        self.info().lookup_path()
    }

    fn parent_path(&self) -> Option<&LookupPath> {
        self.info().parent_path()
    }

    fn is_loaded(&self) -> bool {
        self.info().is_loaded()
    }

    /// True if this model or any descendant failed to build.
    fn has_errors(&self) -> bool {
        self.info().has_errors()
    }

    fn loaded_from_source(&self) -> bool {
        self.info().loaded_from_source()
    }

    fn source_document(&self) -> Option<&Path> {
        self.info().source_document()
    }

    /// Load errors recorded on this model itself (not its descendants).
    fn load_errors(&self) -> &[LoadError] {
        self.info().load_errors()
    }

    /// Resolve the parent model through the store.
    ///
    /// Returns `None` when the model has no parent or the parent path is not registered.
    fn parent<'s>(&self, store: &'s ModelStore) -> Option<ModelRef<'s>> {
        self.parent_path().and_then(|path| store.get(path.as_str()))
    }
}
