//! Declaration syntax rendering for code generation and display.

mod declaration;
mod outline;

use serde::{Deserialize, Serialize};

use crate::model::{HasAttributes, ModelRef};

pub use declaration::{
    format_attribute, format_container, format_delegate, format_enum, format_enum_value,
    format_member, format_namespace, format_parameter, format_type, format_using,
};
pub use outline::format_source;

/// Which optional parts of a declaration to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub include_security: bool,
    pub include_attributes: bool,
    pub include_keywords: bool,
    pub include_documentation: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            include_security: true,
            include_attributes: true,
            include_keywords: true,
            include_documentation: false,
        }
    }
}

impl FormatOptions {
    /// Bare signatures: no accessibility, attributes, keywords or documentation.
    pub fn signature_only() -> Self {
        Self {
            include_security: false,
            include_attributes: false,
            include_keywords: false,
            include_documentation: false,
        }
    }
}

/// Render the declaration of any model reachable through the store.
pub fn format_declaration(model: ModelRef<'_>, options: &FormatOptions) -> String {
    match model {
        ModelRef::Source(source) => format!("// {}", source.name()),
        ModelRef::Container(container) => format_container(container, options),
        ModelRef::Member(member) => format_member(member, options),
        ModelRef::Enum(model) => format_enum(model, options),
        ModelRef::EnumValue(value) => format_enum_value(value, options),
        ModelRef::Delegate(delegate) => format_delegate(delegate, options),
        ModelRef::Namespace(namespace) => format_namespace(namespace),
        ModelRef::Using(using) => format_using(using),
    }
}

/// Render only the attribute lines of a model.
pub fn format_attributes<M: HasAttributes + ?Sized>(model: &M) -> Vec<String> {
    model.attributes().iter().map(format_attribute).collect()
}
