//! Single-declaration rendering.
//!
//! Each function renders one model as its declaration: documentation and attribute lines
//! (when enabled) followed by the declaration header. Bodies are left to the caller.

use std::fmt::Write;

use super::FormatOptions;
use crate::model::{
    Attribute, Container, Delegate, EnumModel, EnumValue, GenericParameter,
    HasAttributes, Keywords, Member, MemberData, MethodKind, Namespace, Parameter,
    ParameterModifier, Security, SpecialConstraint, TypeRef, UsingStatement, Variance,
};

/// Render an attribute as `[Name(args)]`, dropping the `Attribute` suffix.
pub fn format_attribute(attribute: &Attribute) -> String {
    let name = attribute
        .name()
        .strip_suffix("Attribute")
        .filter(|n| !n.is_empty())
        .unwrap_or(attribute.name());
    let mut out = format!("[{}", name);
    if attribute.has_parameters() {
        out.push('(');
        for (i, parameter) in attribute.parameters().iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if let Some(n) = parameter.name() {
                let _ = write!(out, "{} = ", n);
            }
            let _ = write!(out, "{}", parameter.value());
        }
        out.push(')');
    }
    out.push(']');
    out
}

pub fn format_type(ty: &TypeRef) -> String {
    ty.to_string()
}

/// Render a parameter as it appears in a parameter list.
pub fn format_parameter(parameter: &Parameter, options: &FormatOptions) -> String {
    let mut out = String::new();
    if options.include_attributes {
        for attribute in parameter.attributes() {
            out.push_str(&format_attribute(attribute));
            out.push(' ');
        }
    }
    if parameter.modifier() != ParameterModifier::None {
        out.push_str(parameter.modifier().keyword());
        out.push(' ');
    }
    let _ = write!(out, "{} {}", parameter.parameter_type(), parameter.name());
    if let Some(default) = parameter.default_value() {
        let _ = write!(out, " = {}", default);
    }
    out
}

pub fn format_container(container: &Container, options: &FormatOptions) -> String {
    let mut out = leading_lines(container.documentation(), container.attributes(), options);
    push_modifiers(&mut out, container.security(), container.keywords(), options);
    let _ = write!(out, "{} {}", container.kind().keyword(), container.name());
    out.push_str(&generic_list(container.generic_parameters()));

    let mut supertypes: Vec<String> = Vec::new();
    if let Some(base) = container.base_type() {
        supertypes.push(base.to_string());
    }
    supertypes.extend(container.inherited_interfaces().iter().map(|t| t.to_string()));
    if !supertypes.is_empty() {
        let _ = write!(out, " : {}", supertypes.join(", "));
    }

    out.push_str(&constraint_clauses(container.generic_parameters()));
    out
}

/// Render a member declaration. Properties include their accessor list.
pub fn format_member(member: &Member, options: &FormatOptions) -> String {
    let mut out = leading_lines(member.documentation(), member.attributes(), options);
    push_modifiers(&mut out, member.security(), member.keywords(), options);

    match member.data() {
        MemberData::Field(field) => {
            let _ = write!(out, "{} {}", field.field_type, member.name());
            if let Some(value) = &field.default_value {
                let _ = write!(out, " = {}", value);
            }
        }
        MemberData::Property(property) => {
            if property.is_indexer() {
                let _ = write!(
                    out,
                    "{} this[{}]",
                    property.property_type,
                    parameter_list(&property.parameters, options)
                );
            } else {
                let _ = write!(out, "{} {}", property.property_type, member.name());
            }
            out.push_str(" {");
            if property.has_get() {
                out.push_str(" get;");
            }
            if property.has_set() {
                out.push_str(if property.is_init_only { " init;" } else { " set;" });
            }
            out.push_str(" }");
        }
        MemberData::Method(method) => match method.method_kind {
            MethodKind::Constructor => {
                let _ = write!(
                    out,
                    "{}({})",
                    member.name(),
                    parameter_list(&method.parameters, options)
                );
            }
            MethodKind::Destructor => {
                let name = member.name().trim_start_matches('~');
                let _ = write!(out, "~{}()", name);
            }
            _ => {
                let _ = write!(
                    out,
                    "{} {}{}({}){}",
                    method.return_type,
                    member.name(),
                    generic_list(&method.generic_parameters),
                    parameter_list(&method.parameters, options),
                    constraint_clauses(&method.generic_parameters)
                );
            }
        },
        MemberData::Event(event) => {
            let _ = write!(out, "event {} {}", event.event_type, member.name());
        }
    }
    out
}

pub fn format_enum(model: &EnumModel, options: &FormatOptions) -> String {
    let mut out = leading_lines(model.documentation(), model.attributes(), options);
    push_modifiers(&mut out, model.security(), Keywords::empty(), options);
    let _ = write!(out, "enum {}", model.name());
    if let Some(underlying) = model.underlying_type() {
        let _ = write!(out, " : {}", underlying);
    }
    out
}

pub fn format_enum_value(value: &EnumValue, options: &FormatOptions) -> String {
    let mut out = leading_lines(value.documentation(), value.attributes(), options);
    out.push_str(value.name());
    if let Some(v) = value.value() {
        let _ = write!(out, " = {}", v);
    }
    out
}

pub fn format_delegate(delegate: &Delegate, options: &FormatOptions) -> String {
    let mut out = leading_lines(delegate.documentation(), delegate.attributes(), options);
    push_modifiers(&mut out, delegate.security(), Keywords::empty(), options);
    let _ = write!(
        out,
        "delegate {} {}{}({}){}",
        delegate.return_type(),
        delegate.name(),
        generic_list(delegate.generic_parameters()),
        parameter_list(delegate.parameters(), options),
        constraint_clauses(delegate.generic_parameters())
    );
    out
}

pub fn format_using(using: &UsingStatement) -> String {
    let mut out = String::new();
    if using.is_global() {
        out.push_str("global ");
    }
    out.push_str("using ");
    if using.is_static() {
        out.push_str("static ");
    }
    if let Some(alias) = using.alias() {
        let _ = write!(out, "{} = ", alias);
    }
    out.push_str(using.namespace());
    out.push(';');
    out
}

pub fn format_namespace(namespace: &Namespace) -> String {
    format!("namespace {}", namespace.name())
}

fn leading_lines(
    documentation: Option<&str>,
    attributes: &[Attribute],
    options: &FormatOptions,
) -> String {
    let mut out = String::new();
    if options.include_documentation {
        if let Some(doc) = documentation {
            for line in doc.lines() {
                let _ = writeln!(out, "/// {}", line.trim());
            }
        }
    }
    if options.include_attributes {
        for attribute in attributes {
            out.push_str(&format_attribute(attribute));
            out.push('\n');
        }
    }
    out
}

fn push_modifiers(
    out: &mut String,
    security: Security,
    keywords: Keywords,
    options: &FormatOptions,
) {
    if options.include_security && security != Security::Unknown {
        out.push_str(security.keyword());
        out.push(' ');
    }
    if options.include_keywords {
        for keyword in keywords.keyword_names() {
            out.push_str(keyword);
            out.push(' ');
        }
    }
}

fn parameter_list(parameters: &[Parameter], options: &FormatOptions) -> String {
    parameters
        .iter()
        .map(|p| format_parameter(p, options))
        .collect::<Vec<_>>()
        .join(", ")
}

fn generic_list(parameters: &[GenericParameter]) -> String {
    if parameters.is_empty() {
        return String::new();
    }
    let names: Vec<String> = parameters
        .iter()
        .map(|g| match g.variance() {
            Variance::Invariant => g.name().to_string(),
            Variance::Contravariant => format!("in {}", g.name()),
            Variance::Covariant => format!("out {}", g.name()),
        })
        .collect();
    format!("<{}>", names.join(", "))
}

fn constraint_clauses(parameters: &[GenericParameter]) -> String {
    let mut out = String::new();
    for g in parameters.iter().filter(|g| g.has_constraints()) {
        let mut constraints: Vec<String> = g
            .special_constraints()
            .iter()
            .filter(|c| **c != SpecialConstraint::Constructor)
            .map(|c| c.keyword().to_string())
            .collect();
        constraints.extend(g.type_constraints().iter().map(|t| t.to_string()));
        // `new()` must come last
        constraints.extend(
            g.special_constraints()
                .iter()
                .filter(|c| **c == SpecialConstraint::Constructor)
                .map(|c| c.keyword().to_string()),
        );
        let _ = write!(out, " where {} : {}", g.name(), constraints.join(", "));
    }
    out
}
