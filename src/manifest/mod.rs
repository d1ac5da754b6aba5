//! Declaration manifests.
//!
//! A manifest lists the declarations of one compiled unit in YAML or JSON. The builder turns it
//! into a [`SourceGraph`], classifying every type usage and flagging problems as load errors
//! rather than failing.

mod builder;
mod schema;
mod type_name;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::SourceGraph;

pub use builder::{build_source, SourceBuilder};
pub use schema::{
    ArgumentSpec, ArgumentValueSpec, AttributeSpec, ContainerSpec, DelegateSpec, EnumSpec,
    EnumValueSpec, GenericParameterSpec, MemberSpec, MemberSpecKind, NestedSpec, ParameterSpec,
    SourceManifest, SpecialValueSpec, UsingSpec,
};
pub use type_name::{TypeName, TypeNameError, TypeNameKind};

/// Errors raised while reading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read a manifest file and build its graph.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<SourceGraph, ManifestError> {
    let path = path.as_ref();
    let manifest = SourceManifest::parse_file(path)?;
    tracing::debug!(path = %path.display(), source = %manifest.name, "loaded manifest");
    Ok(build_source(&manifest))
}
