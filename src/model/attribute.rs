//! Attributes attached to containers, members, parameters and enums.

use std::fmt;

use super::info::{LookupPath, Model, ModelInfo};
use super::kinds::ModelKind;
use super::types::TypeRef;

/// Value passed to an attribute parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    /// Numeric literal, kept as written.
    Number(String),
    Boolean(bool),
    Null,
    /// `typeof(T)`
    TypeOf(TypeRef),
    /// `EnumType.Member`
    EnumMember { enum_type: String, member: String },
    Array(Vec<AttributeValue>),
    /// Any other constant expression, kept as written.
    Expression(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::String(s) => write!(f, "{:?}", s),
            AttributeValue::Number(n) => f.write_str(n),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::Null => f.write_str("null"),
            AttributeValue::TypeOf(ty) => write!(f, "typeof({})", ty),
            AttributeValue::EnumMember { enum_type, member } => {
                write!(f, "{}.{}", enum_type, member)
            }
            AttributeValue::Array(values) => {
                f.write_str("new[] { ")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str(" }")
            }
            AttributeValue::Expression(e) => f.write_str(e),
        }
    }
}

/// A positional or named argument of an attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeParameter {
    info: ModelInfo,
    name: Option<String>,
    value: AttributeValue,
}

impl AttributeParameter {
    /// Create a parameter at `index` within the attribute at `parent`.
    pub fn new(
        parent: &LookupPath,
        index: usize,
        name: Option<String>,
        value: AttributeValue,
    ) -> Self {
        let segment = match &name {
            Some(n) => n.clone(),
            None => format!("#{}", index),
        };
        Self {
            info: ModelInfo::new(ModelKind::AttributeParameter, parent.child(&segment))
                .with_parent(parent.clone()),
            name,
            value,
        }
    }

    /// Name for named arguments, `None` for positional ones.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    pub fn value(&self) -> &AttributeValue {
        &self.value
    }
}

impl Model for AttributeParameter {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}

/// An attribute application such as `[Obsolete("use Area")]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    info: ModelInfo,
    name: String,
    namespace: String,
    parameters: Vec<AttributeParameter>,
}

impl Attribute {
    pub fn new(info: ModelInfo, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            info,
            name: name.into(),
            namespace: namespace.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<AttributeParameter>) -> Self {
        let errors = parameters.iter().any(|p| p.has_errors());
        self.info = self.info.with_descendant_errors(errors);
        self.parameters = parameters;
        self
    }

    /// Name as written (without the `Attribute` suffix if it was omitted).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn parameters(&self) -> &[AttributeParameter] {
        &self.parameters
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Whether this attribute has the given name, with or without the `Attribute` suffix.
    pub fn is_named(&self, name: &str) -> bool {
        let strip = |n: &str| n.strip_suffix("Attribute").unwrap_or(n).to_string();
        strip(&self.name) == strip(name)
    }

    /// Find a named argument.
    pub fn parameter(&self, name: &str) -> Option<&AttributeParameter> {
        self.parameters.iter().find(|p| p.name() == Some(name))
    }
}

impl Model for Attribute {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}

/// Shared has/collection accessors for models carrying attributes.
pub trait HasAttributes {
    fn attributes(&self) -> &[Attribute];

    fn has_attributes(&self) -> bool {
        !self.attributes().is_empty()
    }

    /// Find an attribute by name, with or without the `Attribute` suffix.
    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().iter().find(|a| a.is_named(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obsolete() -> Attribute {
        let path = LookupPath::new("Geometry.Circle.[Obsolete]");
        let params = vec![
            AttributeParameter::new(&path, 0, None, AttributeValue::String("use Area".into())),
            AttributeParameter::new(
                &path,
                1,
                Some("IsError".into()),
                AttributeValue::Boolean(true),
            ),
        ];
        Attribute::new(ModelInfo::new(ModelKind::Attribute, path), "Obsolete", "System")
            .with_parameters(params)
    }

    #[test]
    fn test_named_lookup() {
        let attr = obsolete();
        assert!(attr.is_named("ObsoleteAttribute"));
        assert!(attr.is_named("Obsolete"));
        assert!(!attr.is_named("Serializable"));
        assert!(attr.parameter("IsError").is_some());
        assert!(attr.parameter("Message").is_none());
    }

    #[test]
    fn test_parameter_paths() {
        let attr = obsolete();
        assert_eq!(
            attr.parameters()[0].lookup_path().as_str(),
            "Geometry.Circle.[Obsolete].#0"
        );
        assert_eq!(
            attr.parameters()[1].lookup_path().as_str(),
            "Geometry.Circle.[Obsolete].IsError"
        );
        assert!(!attr.parameters()[0].is_named());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(AttributeValue::String("a\"b".into()).to_string(), "\"a\\\"b\"");
        assert_eq!(
            AttributeValue::Array(vec![
                AttributeValue::Number("1".into()),
                AttributeValue::Null
            ])
            .to_string(),
            "new[] { 1, null }"
        );
        assert_eq!(
            AttributeValue::EnumMember {
                enum_type: "AttributeTargets".into(),
                member: "Class".into()
            }
            .to_string(),
            "AttributeTargets.Class"
        );
    }
}
