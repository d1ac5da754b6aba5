//! Namespaces and namespace imports.

use super::info::{LookupPath, Model, ModelInfo};
use super::store::{ModelRef, ModelStore};

/// A namespace and the top-level models declared in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Namespace {
    info: ModelInfo,
    name: String,
    models: Vec<LookupPath>,
}

impl Namespace {
    pub fn new(info: ModelInfo, name: impl Into<String>, models: Vec<LookupPath>) -> Self {
        Self {
            info,
            name: name.into(),
            models,
        }
    }

    /// Fully qualified namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model_paths(&self) -> &[LookupPath] {
        &self.models
    }

    /// Resolve declared models through the store, skipping unregistered paths.
    pub fn models<'s>(&'s self, store: &'s ModelStore) -> impl Iterator<Item = ModelRef<'s>> + 's {
        self.models.iter().filter_map(move |p| store.get(p.as_str()))
    }

    /// The enclosing namespace name, if this namespace is nested.
    pub fn parent_name(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(parent, _)| parent)
    }
}

impl Model for Namespace {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}

/// A namespace import (`using System.Linq;`).
#[derive(Debug, Clone, PartialEq)]
pub struct UsingStatement {
    info: ModelInfo,
    namespace: String,
    alias: Option<String>,
    is_static: bool,
    is_global: bool,
}

impl UsingStatement {
    pub fn new(info: ModelInfo, namespace: impl Into<String>) -> Self {
        Self {
            info,
            namespace: namespace.into(),
            alias: None,
            is_static: false,
            is_global: false,
        }
    }

    pub fn with_alias(mut self, alias: Option<String>) -> Self {
        self.alias = alias;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_global(mut self, is_global: bool) -> Self {
        self.is_global = is_global;
        self
    }

    /// The imported namespace (or type, for `using static`).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn has_alias(&self) -> bool {
        self.alias.is_some()
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_global(&self) -> bool {
        self.is_global
    }
}

impl Model for UsingStatement {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelKind;

    #[test]
    fn test_parent_name() {
        let ns = Namespace::new(
            ModelInfo::new(ModelKind::Namespace, "ns:Company.Geometry"),
            "Company.Geometry",
            Vec::new(),
        );
        assert_eq!(ns.parent_name(), Some("Company"));
        assert!(ns.model_paths().is_empty());
    }

    #[test]
    fn test_using_alias() {
        let info = ModelInfo::new(ModelKind::UsingStatement, "using:IO");
        let u = UsingStatement::new(info, "System.IO").with_alias(Some("IO".into()));
        assert!(u.has_alias());
        assert!(!u.is_static());
        assert_eq!(u.namespace(), "System.IO");
    }
}
