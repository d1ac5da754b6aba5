//! Method, delegate and indexer parameters.

use super::attribute::{Attribute, HasAttributes};
use super::info::{LookupPath, Model, ModelInfo};
use super::kinds::ModelKind;
use super::types::TypeRef;

/// How an argument is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterModifier {
    #[default]
    None,
    Ref,
    Out,
    In,
    Params,
    /// First parameter of an extension method.
    This,
}

impl ParameterModifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            ParameterModifier::None => "",
            ParameterModifier::Ref => "ref",
            ParameterModifier::Out => "out",
            ParameterModifier::In => "in",
            ParameterModifier::Params => "params",
            ParameterModifier::This => "this",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "" | "none" => Some(ParameterModifier::None),
            "ref" => Some(ParameterModifier::Ref),
            "out" => Some(ParameterModifier::Out),
            "in" => Some(ParameterModifier::In),
            "params" => Some(ParameterModifier::Params),
            "this" => Some(ParameterModifier::This),
            _ => None,
        }
    }

    /// Whether the modifier changes the signature for overload purposes.
    ///
    /// `params` and `this` do not; `ref`, `out` and `in` do.
    pub(crate) fn affects_signature(&self) -> bool {
        matches!(
            self,
            ParameterModifier::Ref | ParameterModifier::Out | ParameterModifier::In
        )
    }
}

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    info: ModelInfo,
    name: String,
    ty: TypeRef,
    modifier: ParameterModifier,
    default_value: Option<String>,
    attributes: Vec<Attribute>,
}

impl Parameter {
    pub fn new(parent: &LookupPath, name: impl Into<String>, ty: TypeRef) -> Self {
        let name = name.into();
        let has_errors = !ty.is_loaded();
        Self {
            info: ModelInfo::new(ModelKind::Parameter, parent.child(&name))
                .with_parent(parent.clone())
                .with_descendant_errors(has_errors),
            name,
            ty,
            modifier: ParameterModifier::None,
            default_value: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: ParameterModifier) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_default(mut self, value: Option<String>) -> Self {
        self.default_value = value;
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

    pub fn parameter_type(&self) -> &TypeRef {
        &self.ty
    }

    pub fn modifier(&self) -> ParameterModifier {
        self.modifier
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.default_value.is_some()
    }
}

impl HasAttributes for Parameter {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

impl Model for Parameter {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}
