//! Delegate declarations.

use super::attribute::{Attribute, HasAttributes};
use super::info::{Model, ModelInfo};
use super::kinds::Security;
use super::parameter::Parameter;
use super::types::{GenericParameter, TypeRef};

/// A delegate type declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Delegate {
    info: ModelInfo,
    name: String,
    namespace: String,
    security: Security,
    documentation: Option<String>,
    attributes: Vec<Attribute>,
    return_type: TypeRef,
    parameters: Vec<Parameter>,
    generic_parameters: Vec<GenericParameter>,
}

impl Delegate {
    pub fn new(
        info: ModelInfo,
        name: impl Into<String>,
        namespace: impl Into<String>,
        return_type: TypeRef,
    ) -> Self {
        let errors = !return_type.is_loaded();
        Self {
            info: info.with_descendant_errors(errors),
            name: name.into(),
            namespace: namespace.into(),
            security: Security::Unknown,
            documentation: None,
            attributes: Vec::new(),
            return_type,
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
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

    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        let errors = parameters.iter().any(|p| p.has_errors());
        self.info = self.info.with_descendant_errors(errors);
        self.parameters = parameters;
        self
    }

    pub fn with_generic_parameters(mut self, generic_parameters: Vec<GenericParameter>) -> Self {
        self.generic_parameters = generic_parameters;
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

    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    pub fn generic_parameters(&self) -> &[GenericParameter] {
        &self.generic_parameters
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }
}

impl HasAttributes for Delegate {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

impl Model for Delegate {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}
