//! Enum declarations.

use super::attribute::{Attribute, HasAttributes};
use super::info::{LookupPath, Model, ModelInfo};
use super::kinds::{ModelKind, Security};
use super::types::TypeRef;

/// One named value of an enum.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    info: ModelInfo,
    name: String,
    value: Option<String>,
    documentation: Option<String>,
    attributes: Vec<Attribute>,
}

impl EnumValue {
    pub fn new(parent: &LookupPath, name: impl Into<String>, value: Option<String>) -> Self {
        let name = name.into();
        Self {
            info: ModelInfo::new(ModelKind::EnumValue, parent.child(&name))
                .with_parent(parent.clone()),
            name,
            value,
            documentation: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_documentation(mut self, documentation: Option<String>) -> Self {
        self.documentation = documentation;
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        let errors = attributes.iter().any(|a| a.has_errors());
        self.info = self.info.with_descendant_errors(errors);
        self.attributes = attributes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Explicit initializer as written, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }
}

impl HasAttributes for EnumValue {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

impl Model for EnumValue {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumModel {
    info: ModelInfo,
    name: String,
    namespace: String,
    security: Security,
    documentation: Option<String>,
    attributes: Vec<Attribute>,
    underlying_type: Option<TypeRef>,
    values: Vec<EnumValue>,
}

impl EnumModel {
    pub fn new(info: ModelInfo, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            info,
            name: name.into(),
            namespace: namespace.into(),
            security: Security::Unknown,
            documentation: None,
            attributes: Vec::new(),
            underlying_type: None,
            values: Vec::new(),
        }
    }

    pub fn with_security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    pub fn with_documentation(mut self, documentation: Option<String>) -> Self {
        self.documentation = documentation;
        self
    }

    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        let errors = attributes.iter().any(|a| a.has_errors());
        self.info = self.info.with_descendant_errors(errors);
        self.attributes = attributes;
        self
    }

    pub fn with_underlying_type(mut self, ty: Option<TypeRef>) -> Self {
        let errors = ty.as_ref().is_some_and(|t| !t.is_loaded());
        self.info = self.info.with_descendant_errors(errors);
        self.underlying_type = ty;
        self
    }

    pub fn with_values(mut self, values: Vec<EnumValue>) -> Self {
        let errors = values.iter().any(|v| v.has_errors());
        self.info = self.info.with_descendant_errors(errors);
        self.values = values;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn security(&self) -> Security {
        self.security
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Declared underlying integral type, `None` when it defaults to `int`.
    pub fn underlying_type(&self) -> Option<&TypeRef> {
        self.underlying_type.as_ref()
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name() == name)
    }

    /// Whether the enum carries the `[Flags]` attribute.
    pub fn is_flags(&self) -> bool {
        self.attribute("Flags").is_some()
    }
}

impl HasAttributes for EnumModel {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

impl Model for EnumModel {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_values() {
        let path = LookupPath::new("Geometry.Color");
        let e = EnumModel::new(ModelInfo::new(ModelKind::Enum, path.clone()), "Color", "Geometry")
            .with_values(vec![
                EnumValue::new(&path, "Red", Some("1".into())),
                EnumValue::new(&path, "Green", None),
            ]);
        assert!(e.has_values());
        assert_eq!(e.value("Red").and_then(|v| v.value()), Some("1"));
        assert_eq!(e.values()[1].lookup_path().as_str(), "Geometry.Color.Green");
        assert!(e.underlying_type().is_none());
        assert!(!e.is_flags());
        assert!(!e.has_attributes());
    }

    #[test]
    fn test_flags_attribute() {
        let path = LookupPath::new("Io.Access");
        let flags = Attribute::new(
            ModelInfo::new(ModelKind::Attribute, path.child("[Flags]")),
            "FlagsAttribute",
            "System",
        );
        let e = EnumModel::new(ModelInfo::new(ModelKind::Enum, path), "Access", "Io")
            .with_attributes(vec![flags]);
        assert!(e.is_flags());
    }
}
