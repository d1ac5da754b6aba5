//! Crate-level error type.

use thiserror::Error;

use crate::compare::CompareError;
use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::manifest::ManifestError;

/// Any error raised by the library.
///
/// Load problems are not errors; they are recorded on the models that failed to build.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Compare(#[from] CompareError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = ModelError> = std::result::Result<T, E>;
