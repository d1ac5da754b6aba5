//! codemodel - an immutable code model graph with interface-gap detection.
//!
//! The crate models the declarations of one compiled unit of a statically typed,
//! object-oriented language: namespaces, classes, interfaces, structures, records, enums,
//! delegates, their members, attributes and generic parameters.
//!
//! # Architecture
//!
//! - `model`: immutable value models, the lookup-path keyed `ModelStore` and `SourceGraph`
//! - `compare`: signature hashes and unimplemented interface member detection
//! - `manifest`: YAML/JSON declaration manifests and the graph builder
//! - `syntax`: declaration rendering
//! - `document`: the seam to an external document editor
//! - `config`: `codemodel.yaml` schema
//! - `report`: output formatting (text, JSON)
//!
//! Models never hold direct references to each other. Parents, base types, accessors and
//! nested models are lookup paths resolved through the store on each access.

pub mod cli;
pub mod compare;
pub mod config;
pub mod document;
pub mod error;
pub mod manifest;
pub mod model;
pub mod report;
pub mod syntax;

pub use compare::{
    comparison_members, missing_interface_members, signature_hash,
    source_missing_interface_members, CompareError, ComparisonMode,
};
pub use config::Config;
pub use document::{DocumentEditor, DocumentError, Editable};
pub use error::ModelError;
pub use manifest::{build_source, load_graph, ManifestError, SourceBuilder, SourceManifest};
pub use model::{LookupPath, Model, ModelStore, SourceGraph};
pub use syntax::{format_declaration, FormatOptions};
