//! Serde schema of a source manifest.
//!
//! A manifest describes one compiled unit declaratively:
//!
//! ```yaml
//! name: shapes
//! namespace: Geometry
//! usings:
//!   - namespace: System
//! interfaces:
//!   - name: IShape
//!     members:
//!       - kind: method
//!         name: Area
//!         returns: double
//! classes:
//!   - name: Circle
//!     security: public
//!     interfaces: [IShape]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::ManifestError;
use crate::model::ContainerKind;

/// Top-level manifest for one compiled unit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceManifest {
    pub name: String,
    /// Source document the unit was read from, if any.
    pub document: Option<PathBuf>,
    /// Namespace applied to declarations that do not name one.
    pub namespace: Option<String>,
    /// Type names known to exist outside this unit, e.g. `System.Exception`.
    pub externals: Vec<String>,
    pub usings: Vec<UsingSpec>,
    pub interfaces: Vec<ContainerSpec>,
    pub classes: Vec<ContainerSpec>,
    pub structures: Vec<ContainerSpec>,
    pub records: Vec<ContainerSpec>,
    pub record_structures: Vec<ContainerSpec>,
    pub enums: Vec<EnumSpec>,
    pub delegates: Vec<DelegateSpec>,
}

impl SourceManifest {
    /// Parse a manifest from YAML text.
    pub fn from_yaml_str(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a manifest from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Read a manifest file; `.json` files are parsed as JSON, everything else as YAML.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_yaml_str(&content)?,
        };
        if manifest.name.is_empty() {
            manifest.name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
        }
        Ok(manifest)
    }

    /// Top-level container declarations grouped by kind.
    pub fn container_groups(&self) -> [(ContainerKind, &[ContainerSpec]); 5] {
        [
            (ContainerKind::Interface, self.interfaces.as_slice()),
            (ContainerKind::Class, self.classes.as_slice()),
            (ContainerKind::Structure, self.structures.as_slice()),
            (ContainerKind::Record, self.records.as_slice()),
            (ContainerKind::RecordStructure, self.record_structures.as_slice()),
        ]
    }

    /// Whether a file looks like a manifest by extension.
    pub fn is_manifest_path(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml") | Some("json")
        )
    }
}

/// A namespace import.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct UsingSpec {
    pub namespace: String,
    pub alias: Option<String>,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(rename = "global")]
    pub is_global: bool,
}

/// A class, interface, structure, record or record structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContainerSpec {
    pub name: String,
    pub namespace: Option<String>,
    pub security: Option<String>,
    pub keywords: Vec<String>,
    pub documentation: Option<String>,
    pub attributes: Vec<AttributeSpec>,
    pub generic_parameters: Vec<GenericParameterSpec>,
    /// Base class (classes) or base record (records).
    pub base: Option<String>,
    pub interfaces: Vec<String>,
    pub members: Vec<MemberSpec>,
    pub nested: NestedSpec,
}

/// Declarations nested in a class or structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NestedSpec {
    pub interfaces: Vec<ContainerSpec>,
    pub classes: Vec<ContainerSpec>,
    pub structures: Vec<ContainerSpec>,
    pub records: Vec<ContainerSpec>,
    pub record_structures: Vec<ContainerSpec>,
    pub enums: Vec<EnumSpec>,
    pub delegates: Vec<DelegateSpec>,
}

impl NestedSpec {
    pub fn container_groups(&self) -> [(ContainerKind, &[ContainerSpec]); 5] {
        [
            (ContainerKind::Interface, self.interfaces.as_slice()),
            (ContainerKind::Class, self.classes.as_slice()),
            (ContainerKind::Structure, self.structures.as_slice()),
            (ContainerKind::Record, self.records.as_slice()),
            (ContainerKind::RecordStructure, self.record_structures.as_slice()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
            && self.classes.is_empty()
            && self.structures.is_empty()
            && self.records.is_empty()
            && self.record_structures.is_empty()
            && self.enums.is_empty()
            && self.delegates.is_empty()
    }
}

/// Kind of a member entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberSpecKind {
    Field,
    Property,
    Indexer,
    #[default]
    Method,
    Constructor,
    Destructor,
    Event,
}

/// One member of a container.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MemberSpec {
    pub kind: MemberSpecKind,
    pub name: String,
    /// Field, property, indexer or event type.
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// Method return type; `void` when omitted.
    pub returns: Option<String>,
    pub security: Option<String>,
    pub keywords: Vec<String>,
    pub documentation: Option<String>,
    pub attributes: Vec<AttributeSpec>,
    pub parameters: Vec<ParameterSpec>,
    pub generic_parameters: Vec<GenericParameterSpec>,
    /// Field initializer or constant value.
    pub value: Option<String>,
    /// Property accessors: any of `get`, `set`, `init`. Defaults to `get` and `set`.
    pub accessors: Option<Vec<String>>,
    /// Whether a method has a body. Defaults to false for interface and abstract members.
    pub body: Option<bool>,
}

/// A method, delegate or indexer parameter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ParameterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// `ref`, `out`, `in`, `params` or `this`.
    pub modifier: Option<String>,
    pub default: Option<String>,
    pub attributes: Vec<AttributeSpec>,
}

/// A generic parameter with optional variance and constraints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenericParameterSpec {
    pub name: String,
    /// `in` or `out`.
    pub variance: Option<String>,
    /// `class`, `struct`, `unmanaged`, `notnull`, `new()` or a type name.
    pub constraints: Vec<String>,
}

/// An attribute application.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AttributeSpec {
    pub name: String,
    pub namespace: Option<String>,
    pub arguments: Vec<ArgumentSpec>,
}

/// A positional (no name) or named attribute argument.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArgumentSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub value: ArgumentValueSpec,
}

/// Attribute argument value as written in the manifest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArgumentValueSpec {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<ArgumentValueSpec>),
    Special(SpecialValueSpec),
}

/// Argument values that are not plain literals.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialValueSpec {
    /// `typeof(T)`
    Typeof(String),
    /// `EnumType.Member`
    Enum(String),
    /// Any other constant expression.
    Expression(String),
}

/// An enum declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnumSpec {
    pub name: String,
    pub namespace: Option<String>,
    pub security: Option<String>,
    pub documentation: Option<String>,
    pub attributes: Vec<AttributeSpec>,
    pub underlying: Option<String>,
    pub values: Vec<EnumValueSpec>,
}

/// One enum value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnumValueSpec {
    pub name: String,
    pub value: Option<String>,
    pub documentation: Option<String>,
    pub attributes: Vec<AttributeSpec>,
}

/// A delegate declaration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DelegateSpec {
    pub name: String,
    pub namespace: Option<String>,
    pub security: Option<String>,
    pub documentation: Option<String>,
    pub attributes: Vec<AttributeSpec>,
    pub returns: Option<String>,
    pub parameters: Vec<ParameterSpec>,
    pub generic_parameters: Vec<GenericParameterSpec>,
}
