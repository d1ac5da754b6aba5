//! Whole-unit outline: every declaration of a graph, nested and indented.

use std::fmt::Write;

use super::declaration::{
    format_container, format_delegate, format_enum, format_enum_value, format_member,
    format_namespace, format_using,
};
use super::FormatOptions;
use crate::model::{Container, LookupPath, Member, MemberData, ModelRef, ModelStore, SourceGraph};

const INDENT: &str = "    ";

/// Render every declaration in a graph, grouped by namespace.
///
/// Members are listed without bodies. Accessor methods appear only through their property.
pub fn format_source(graph: &SourceGraph, options: &FormatOptions) -> String {
    let store = graph.store();
    let source = graph.source();
    let mut out = String::new();

    for using in source.usings(store) {
        out.push_str(&format_using(using));
        out.push('\n');
    }

    let mut listed: Vec<&LookupPath> = Vec::new();
    for namespace in source.namespaces(store) {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format_namespace(namespace));
        out.push_str("\n{\n");
        let mut first = true;
        for model in namespace.models(store) {
            if !first {
                out.push('\n');
            }
            first = false;
            write_model(&mut out, store, model, 1, options);
            listed.push(model.lookup_path());
        }
        out.push_str("}\n");
    }

    // Declarations outside any namespace.
    let contents = source.contents();
    let top_level = contents
        .interfaces
        .iter()
        .chain(&contents.classes)
        .chain(&contents.structures)
        .chain(&contents.records)
        .chain(&contents.record_structures)
        .chain(&contents.enums)
        .chain(&contents.delegates);
    for path in top_level.filter(|p| !listed.contains(p)) {
        if let Some(model) = store.get(path.as_str()) {
            if !out.is_empty() {
                out.push('\n');
            }
            write_model(&mut out, store, model, 0, options);
        }
    }

    out
}

fn write_model(
    out: &mut String,
    store: &ModelStore,
    model: ModelRef<'_>,
    depth: usize,
    options: &FormatOptions,
) {
    match model {
        ModelRef::Container(container) => write_container(out, store, container, depth, options),
        ModelRef::Enum(model) => {
            write_lines(out, &format_enum(model, options), depth);
            write_lines(out, "{", depth);
            for value in model.values() {
                let line = format!("{},", format_enum_value(value, options));
                write_lines(out, &line, depth + 1);
            }
            write_lines(out, "}", depth);
        }
        ModelRef::Delegate(delegate) => {
            let line = format!("{};", format_delegate(delegate, options));
            write_lines(out, &line, depth);
        }
        ModelRef::Member(member) => {
            let line = member_line(member, options);
            write_lines(out, &line, depth);
        }
        other => {
            tracing::trace!(kind = %other.kind(), "no outline rendering for model kind");
        }
    }
}

fn write_container(
    out: &mut String,
    store: &ModelStore,
    container: &Container,
    depth: usize,
    options: &FormatOptions,
) {
    write_lines(out, &format_container(container, options), depth);
    write_lines(out, "{", depth);

    let members = container
        .members()
        .iter()
        .filter(|m| !m.method_kind().is_some_and(|k| k.is_accessor()));
    for member in members {
        write_lines(out, &member_line(member, options), depth + 1);
    }
    for nested in container.nested(store) {
        write_model(out, store, nested, depth + 1, options);
    }

    write_lines(out, "}", depth);
}

fn member_line(member: &Member, options: &FormatOptions) -> String {
    let declaration = format_member(member, options);
    match member.data() {
        // Property declarations already close with their accessor block.
        MemberData::Property(_) => declaration,
        _ => format!("{};", declaration),
    }
}

fn write_lines(out: &mut String, text: &str, depth: usize) {
    for line in text.lines() {
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        let _ = writeln!(out, "{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ContainerData, ContainerKind, Method, MethodKind, ModelInfo, ModelKind, Namespace,
        Security, Source, SourceContents, TypeRef, WellKnownType,
    };
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outline_groups_by_namespace() {
        let path = LookupPath::new("Geometry.IShape");
        let area = Member::new(
            ModelInfo::new(ModelKind::Member, path.child("Area()")).with_parent(path.clone()),
            "Area",
            MemberData::Method(Method::new(
                MethodKind::Member,
                TypeRef::well_known(WellKnownType::Double),
            )),
        );
        let shape = Container::new(
            ModelInfo::new(ModelKind::Container, path.clone()),
            "IShape",
            "Geometry",
            ContainerData::empty(ContainerKind::Interface),
        )
        .with_security(Security::Public)
        .with_members(vec![area]);

        let mut store = ModelStore::new();
        store.set(shape);
        store.set(Namespace::new(
            ModelInfo::new(ModelKind::Namespace, "namespace:Geometry"),
            "Geometry",
            vec![path.clone()],
        ));
        let contents = SourceContents {
            namespaces: vec![LookupPath::new("namespace:Geometry")],
            interfaces: vec![path],
            ..SourceContents::default()
        };
        let graph = SourceGraph::new(
            store,
            Source::new(ModelInfo::new(ModelKind::Source, "source:shapes"), "shapes", contents),
        );

        let expected = "\
namespace Geometry
{
    public interface IShape
    {
        double Area();
    }
}
";
        assert_eq!(format_source(&graph, &FormatOptions::default()), expected);
    }
}
