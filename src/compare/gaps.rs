//! Interface-gap detection across inheritance chains.

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use super::signature::{signature_hash_bound, ComparisonMode};
use super::CompareError;
use crate::model::{
    Container, ContainerKind, GenericBindings, Member, Model, ModelStore, Source, TypeResolver,
};

/// A member paired with its signature hash under one comparison mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HashedMember<'a> {
    pub hash: u64,
    pub member: &'a Member,
}

/// Members a class or structure fails to implement.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerGaps<'a> {
    pub container: &'a Container,
    pub missing: Vec<&'a Member>,
}

/// Gap scan result for a whole source, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceGaps<'a> {
    entries: Vec<ContainerGaps<'a>>,
}

impl<'a> SourceGaps<'a> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of containers with at least one gap.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total missing members across all containers.
    pub fn missing_count(&self) -> usize {
        self.entries.iter().map(|e| e.missing.len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContainerGaps<'a>> {
        self.entries.iter()
    }

    /// Gaps for the container at `path`.
    pub fn get(&self, path: &str) -> Option<&ContainerGaps<'a>> {
        self.entries
            .iter()
            .find(|e| e.container.lookup_path().as_str() == path)
    }

    pub fn into_entries(self) -> Vec<ContainerGaps<'a>> {
        self.entries
    }
}

/// Hashed members of a container together with everything it inherits.
///
/// Interfaces contribute their own members and, recursively, those of the interfaces they
/// extend. Classes, structures and records contribute their own members and those of their
/// base chain. Inherited generic containers are hashed with their placeholders bound to the
/// arguments of the inheriting reference. Accessor methods are represented by their property
/// or event and are not listed separately. Duplicates are kept; a container reached twice is
/// visited once.
pub fn comparison_members<'r, R>(
    resolver: &'r R,
    container: &'r Container,
    mode: ComparisonMode,
) -> Vec<HashedMember<'r>>
where
    R: TypeResolver + ?Sized,
{
    bound_members(resolver, container, mode, &GenericBindings::new())
}

fn bound_members<'r, R>(
    resolver: &'r R,
    container: &'r Container,
    mode: ComparisonMode,
    bindings: &GenericBindings,
) -> Vec<HashedMember<'r>>
where
    R: TypeResolver + ?Sized,
{
    let mut out = Vec::new();
    let mut visited = FxHashSet::default();
    collect_members(resolver, container, mode, bindings, &mut visited, &mut out);
    out
}

fn collect_members<'r, R>(
    resolver: &'r R,
    container: &'r Container,
    mode: ComparisonMode,
    bindings: &GenericBindings,
    visited: &mut FxHashSet<&'r str>,
    out: &mut Vec<HashedMember<'r>>,
) where
    R: TypeResolver + ?Sized,
{
    if !visited.insert(container.lookup_path().as_str()) {
        tracing::trace!(path = %container.lookup_path(), "container already visited");
        return;
    }

    out.extend(
        container
            .members()
            .iter()
            .filter(|m| !m.method_kind().is_some_and(|k| k.is_accessor()))
            .map(|member| HashedMember {
                hash: signature_hash_bound(member, mode, bindings),
                member,
            }),
    );

    match container.kind() {
        ContainerKind::Interface => {
            for usage in container.inherited_interfaces() {
                if let Some(parent) = usage.interface_model(resolver) {
                    let inner = bindings.construct(parent.generic_parameters(), usage);
                    collect_members(resolver, parent, mode, &inner, visited, out);
                }
            }
        }
        ContainerKind::Class | ContainerKind::Structure | ContainerKind::Record => {
            let base = container.base_type().zip(container.base_model(resolver));
            if let Some((usage, base)) = base {
                let inner = bindings.construct(base.generic_parameters(), usage);
                collect_members(resolver, base, mode, &inner, visited, out);
            }
        }
        ContainerKind::RecordStructure => {}
    }
}

/// Interface members a class or structure does not implement.
///
/// Both sides are hashed in [`ComparisonMode::Security`]. The container side is the container
/// and its base chain; the interface side is the union over each directly inherited interface
/// (and what those extend), deduplicated by hash with the first occurrence kept. A constructed
/// interface such as `IRepository<Book>` is compared with `T` bound to `Book`. Other container
/// kinds yield an empty result.
pub fn missing_interface_members<'r, R>(
    resolver: &'r R,
    container: &'r Container,
) -> Vec<&'r Member>
where
    R: TypeResolver + ?Sized,
{
    if !container.kind().implements_interfaces() {
        return Vec::new();
    }

    let implemented: FxHashSet<u64> =
        comparison_members(resolver, container, ComparisonMode::Security)
            .into_iter()
            .map(|m| m.hash)
            .collect();

    let mut seen = FxHashSet::default();
    let mut missing = Vec::new();
    for usage in container.inherited_interfaces() {
        let Some(interface) = usage.interface_model(resolver) else {
            continue;
        };
        let bindings = GenericBindings::new().construct(interface.generic_parameters(), usage);
        for required in bound_members(resolver, interface, ComparisonMode::Security, &bindings) {
            if !seen.insert(required.hash) {
                continue;
            }
            if !implemented.contains(&required.hash) {
                missing.push(required.member);
            }
        }
    }
    missing
}

/// [`comparison_members`] for the container at `path`.
pub fn comparison_members_at<'s>(
    store: &'s ModelStore,
    path: &str,
    mode: ComparisonMode,
) -> Result<Vec<HashedMember<'s>>, CompareError> {
    let container = lookup_container(store, path)?;
    Ok(comparison_members(store, container, mode))
}

/// [`missing_interface_members`] for the container at `path`.
pub fn missing_interface_members_at<'s>(
    store: &'s ModelStore,
    path: &str,
) -> Result<Vec<&'s Member>, CompareError> {
    let container = lookup_container(store, path)?;
    Ok(missing_interface_members(store, container))
}

fn lookup_container<'s>(store: &'s ModelStore, path: &str) -> Result<&'s Container, CompareError> {
    store
        .container(path)
        .ok_or_else(|| CompareError::ContainerNotFound(path.to_string()))
}

/// Run the gap check over every top-level class and structure of a source.
///
/// Containers are checked in parallel; the result keeps declaration order and omits
/// containers without gaps.
#[tracing::instrument(level = "debug", skip_all, fields(source = %source.name()))]
pub fn source_missing_interface_members<'s>(
    store: &'s ModelStore,
    source: &'s Source,
) -> SourceGaps<'s> {
    let candidates: Vec<&Container> = source
        .classes(store)
        .chain(source.structures(store))
        .collect();

    let entries: Vec<ContainerGaps<'s>> = candidates
        .par_iter()
        .map(|&container| ContainerGaps {
            container,
            missing: missing_interface_members(store, container),
        })
        .filter(|gaps| !gaps.missing.is_empty())
        .collect();

    tracing::debug!(
        checked = candidates.len(),
        with_gaps = entries.len(),
        "interface gap scan finished"
    );
    SourceGaps { entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ContainerData, GenericParameter, LookupPath, MemberData, Method, MethodKind, ModelInfo,
        ModelKind, Parameter, Property, Security, SourceContents, TypeRef, WellKnownType,
    };

    fn method(owner: &str, name: &str) -> Member {
        let parent = LookupPath::new(format!("App.{}", owner));
        Member::new(
            ModelInfo::new(ModelKind::Member, parent.child(&format!("{}()", name)))
                .with_parent(parent),
            name,
            MemberData::Method(Method::new(
                MethodKind::Member,
                TypeRef::well_known(WellKnownType::Double),
            )),
        )
        .with_security(Security::Public)
    }

    fn container(
        name: &str,
        data: ContainerData,
        interfaces: &[&str],
        members: Vec<Member>,
    ) -> Container {
        Container::new(
            ModelInfo::new(ModelKind::Container, format!("App.{}", name)),
            name,
            "App",
            data,
        )
        .with_interfaces(interfaces.iter().map(|i| TypeRef::named("App", *i)).collect())
        .with_members(members)
    }

    fn interface(name: &str, extends: &[&str], members: &[&str]) -> Container {
        let members = members.iter().map(|m| method(name, m)).collect();
        container(name, ContainerData::Interface, extends, members)
    }

    fn class(name: &str, base: Option<&str>, interfaces: &[&str], members: &[&str]) -> Container {
        let members = members.iter().map(|m| method(name, m)).collect();
        let data = ContainerData::Class {
            base_class: base.map(|b| TypeRef::named("App", b)),
            nested_models: Vec::new(),
        };
        container(name, data, interfaces, members)
    }

    fn layered_store(implement_area: bool) -> ModelStore {
        let mut store = ModelStore::new();
        store.set(interface("IBase", &[], &["Area"]));
        store.set(interface("IDerived", &["IBase"], &["Perimeter"]));
        let members: &[&str] = if implement_area {
            &["Area", "Perimeter"]
        } else {
            &["Perimeter"]
        };
        store.set(class("C", None, &["IDerived"], members));
        store
    }

    fn book() -> TypeRef {
        TypeRef::named("App", "Book")
    }

    fn find(owner: &str, returns: TypeRef) -> Member {
        let parent = LookupPath::new(owner);
        let mut payload = Method::new(MethodKind::Member, returns);
        payload.parameters = vec![Parameter::new(
            &parent.child("Find(int)"),
            "id",
            TypeRef::well_known(WellKnownType::Int32),
        )];
        Member::new(
            ModelInfo::new(ModelKind::Member, parent.child("Find(int)")).with_parent(parent),
            "Find",
            MemberData::Method(payload),
        )
        .with_security(Security::Public)
    }

    /// `IRepository<T> { T Find(int) }` plus `ICatalog<T> : IRepository<T> { double Count() }`.
    fn generic_store() -> ModelStore {
        let mut store = ModelStore::new();
        let repository = LookupPath::new("App.IRepository`1");
        store.set(
            Container::new(
                ModelInfo::new(ModelKind::Container, repository.clone()),
                "IRepository",
                "App",
                ContainerData::Interface,
            )
            .with_generic_parameters(vec![GenericParameter::new(&repository, "T")])
            .with_members(vec![find(repository.as_str(), TypeRef::placeholder("T"))]),
        );
        let catalog = LookupPath::new("App.ICatalog`1");
        store.set(
            Container::new(
                ModelInfo::new(ModelKind::Container, catalog.clone()),
                "ICatalog",
                "App",
                ContainerData::Interface,
            )
            .with_generic_parameters(vec![GenericParameter::new(&catalog, "T")])
            .with_interfaces(vec![TypeRef::named("App", "IRepository")
                .with_arguments(vec![TypeRef::placeholder("T")])])
            .with_members(vec![method("ICatalog`1", "Count")]),
        );
        store
    }

    fn implementor(name: &str, interface: &str, members: Vec<Member>) -> Container {
        let data = ContainerData::Class {
            base_class: None,
            nested_models: Vec::new(),
        };
        container(name, data, &[], members)
            .with_interfaces(vec![TypeRef::named("App", interface).with_arguments(vec![book()])])
    }

    #[test]
    fn test_constructed_generic_interface_satisfied() {
        let mut store = generic_store();
        store.set(implementor(
            "BookRepository",
            "IRepository",
            vec![find("App.BookRepository", book())],
        ));

        let repo = store.container("App.BookRepository").unwrap();
        assert!(missing_interface_members(&store, repo).is_empty());
    }

    #[test]
    fn test_constructed_generic_interface_wrong_argument() {
        let mut store = generic_store();
        store.set(implementor(
            "AuthorRepository",
            "IRepository",
            vec![find("App.AuthorRepository", TypeRef::named("App", "Author"))],
        ));

        let missing = missing_interface_members_at(&store, "App.AuthorRepository").unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].lookup_path().as_str(), "App.IRepository`1.Find(int)");
    }

    #[test]
    fn test_bindings_follow_interface_chain() {
        let mut store = generic_store();
        store.set(implementor(
            "Shelf",
            "ICatalog",
            vec![find("App.Shelf", book()), method("Shelf", "Count")],
        ));
        store.set(implementor("EmptyShelf", "ICatalog", vec![method("EmptyShelf", "Count")]));

        assert!(missing_interface_members_at(&store, "App.Shelf").unwrap().is_empty());
        let missing = missing_interface_members_at(&store, "App.EmptyShelf").unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name(), "Find");
    }

    #[test]
    fn test_generic_base_class_is_bound() {
        let mut store = generic_store();
        let base = LookupPath::new("App.RepositoryBase`1");
        store.set(
            Container::new(
                ModelInfo::new(ModelKind::Container, base.clone()),
                "RepositoryBase",
                "App",
                ContainerData::Class {
                    base_class: None,
                    nested_models: Vec::new(),
                },
            )
            .with_generic_parameters(vec![GenericParameter::new(&base, "T")])
            .with_members(vec![find(base.as_str(), TypeRef::placeholder("T"))]),
        );
        let data = ContainerData::Class {
            base_class: Some(TypeRef::named("App", "RepositoryBase").with_arguments(vec![book()])),
            nested_models: Vec::new(),
        };
        store.set(
            container("BookStore", data, &[], Vec::new()).with_interfaces(vec![
                TypeRef::named("App", "IRepository").with_arguments(vec![book()]),
            ]),
        );

        assert!(missing_interface_members_at(&store, "App.BookStore").unwrap().is_empty());
    }

    #[test]
    fn test_multi_level_interface_satisfied() {
        let store = layered_store(true);
        let missing = missing_interface_members_at(&store, "App.C").unwrap();
        assert!(missing.is_empty());
    }

    #[test]
    fn test_multi_level_interface_gap() {
        let store = layered_store(false);
        let missing = missing_interface_members_at(&store, "App.C").unwrap();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name(), "Area");
        assert_eq!(missing[0].parent_path().map(|p| p.as_str()), Some("App.IBase"));
    }

    #[test]
    fn test_base_class_members_count_as_implemented() {
        let mut store = ModelStore::new();
        store.set(interface("IShape", &[], &["Area"]));
        store.set(class("ShapeBase", None, &[], &["Area"]));
        store.set(class("Square", Some("ShapeBase"), &["IShape"], &[]));

        assert!(missing_interface_members_at(&store, "App.Square").unwrap().is_empty());
    }

    #[test]
    fn test_member_count_is_mode_invariant() {
        let store = layered_store(true);
        let iface = store.container("App.IDerived").unwrap();
        let counts: Vec<usize> = [
            ComparisonMode::Base,
            ComparisonMode::Security,
            ComparisonMode::Keywords,
            ComparisonMode::Full,
        ]
        .into_iter()
        .map(|mode| comparison_members(&store, iface, mode).len())
        .collect();
        assert_eq!(counts, vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_interface_cycle_terminates() {
        let mut store = ModelStore::new();
        store.set(interface("IA", &["IB"], &["A"]));
        store.set(interface("IB", &["IA"], &["B"]));
        let ia = store.container("App.IA").unwrap();
        assert_eq!(comparison_members(&store, ia, ComparisonMode::Base).len(), 2);
    }

    #[test]
    fn test_non_implementing_kinds_have_no_gaps() {
        let mut store = ModelStore::new();
        store.set(interface("IShape", &[], &["Area"]));
        store.set(interface("IMore", &["IShape"], &[]));
        store.set(container(
            "Point",
            ContainerData::Record { base_record: None },
            &["IShape"],
            Vec::new(),
        ));

        assert!(missing_interface_members_at(&store, "App.IMore").unwrap().is_empty());
        assert!(missing_interface_members_at(&store, "App.Point").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_path_is_an_error() {
        let store = ModelStore::new();
        let err = missing_interface_members_at(&store, "App.Nope").unwrap_err();
        assert!(matches!(err, CompareError::ContainerNotFound(ref p) if p == "App.Nope"));
        assert!(comparison_members_at(&store, "App.Nope", ComparisonMode::Base).is_err());
    }

    #[test]
    fn test_security_mismatch_is_a_gap() {
        let mut store = ModelStore::new();
        store.set(interface("IShape", &[], &["Area"]));
        let hidden = method("Circle", "Area").with_security(Security::Private);
        let data = ContainerData::Class {
            base_class: None,
            nested_models: Vec::new(),
        };
        store.set(container("Circle", data, &["IShape"], vec![hidden]));

        assert_eq!(missing_interface_members_at(&store, "App.Circle").unwrap().len(), 1);
    }

    #[test]
    fn test_property_accessors_not_listed_twice() {
        let parent = LookupPath::new("App.IShape");
        let mut property = Property::new(TypeRef::well_known(WellKnownType::Int32));
        property.get_method = Some(parent.child("Size.get"));
        let members = vec![
            Member::new(
                ModelInfo::new(ModelKind::Member, parent.child("Size")).with_parent(parent.clone()),
                "Size",
                MemberData::Property(property),
            )
            .with_security(Security::Public),
            Member::new(
                ModelInfo::new(ModelKind::Member, parent.child("Size.get"))
                    .with_parent(parent.clone()),
                "get_Size",
                MemberData::Method(Method::new(
                    MethodKind::Get,
                    TypeRef::well_known(WellKnownType::Int32),
                )),
            )
            .with_security(Security::Public),
        ];
        let iface = container("IShape", ContainerData::Interface, &[], members);
        let store = ModelStore::new();
        assert_eq!(comparison_members(&store, &iface, ComparisonMode::Base).len(), 1);
    }

    #[test]
    fn test_source_scan_keeps_declaration_order() {
        let mut store = ModelStore::new();
        store.set(interface("IShape", &[], &["Area"]));
        store.set(class("Circle", None, &["IShape"], &[]));
        store.set(class("Square", None, &["IShape"], &["Area"]));
        store.set(class("Hexagon", None, &["IShape"], &[]));
        let contents = SourceContents {
            interfaces: vec![LookupPath::new("App.IShape")],
            classes: vec![
                LookupPath::new("App.Circle"),
                LookupPath::new("App.Square"),
                LookupPath::new("App.Hexagon"),
            ],
            ..SourceContents::default()
        };
        let source = Source::new(ModelInfo::new(ModelKind::Source, "src:App"), "App", contents);

        let gaps = source_missing_interface_members(&store, &source);
        let names: Vec<&str> = gaps.iter().map(|g| g.container.name()).collect();
        assert_eq!(names, vec!["Circle", "Hexagon"]);
        assert_eq!(gaps.missing_count(), 2);
        assert!(gaps.get("App.Square").is_none());
        assert_eq!(gaps.get("App.Circle").map(|g| g.missing[0].name()), Some("Area"));
    }
}
