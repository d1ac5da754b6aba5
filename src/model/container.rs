//! Classes, interfaces, structures, records and record structures.

use rustc_hash::FxHashSet;

use super::attribute::{Attribute, HasAttributes};
use super::info::{LookupPath, Model, ModelInfo};
use super::kinds::{ContainerKind, Keywords, MemberKind, MethodKind, ModelKind, Security};
use super::member::{Event, Field, Member, MemberVariant, Method, Property};
use super::store::{ModelRef, ModelStore};
use super::types::{GenericParameter, TypeRef, TypeResolver};

/// Kind-specific container payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerData {
    Class {
        base_class: Option<TypeRef>,
        nested_models: Vec<LookupPath>,
    },
    Interface,
    Structure {
        nested_models: Vec<LookupPath>,
    },
    Record {
        base_record: Option<TypeRef>,
    },
    RecordStructure,
}

impl ContainerData {
    /// Empty payload for a kind.
    pub fn empty(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Class => ContainerData::Class {
                base_class: None,
                nested_models: Vec::new(),
            },
            ContainerKind::Interface => ContainerData::Interface,
            ContainerKind::Structure => ContainerData::Structure {
                nested_models: Vec::new(),
            },
            ContainerKind::Record => ContainerData::Record { base_record: None },
            ContainerKind::RecordStructure => ContainerData::RecordStructure,
        }
    }
}

/// A model that owns members.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    info: ModelInfo,
    name: String,
    namespace: String,
    security: Security,
    keywords: Keywords,
    documentation: Option<String>,
    attributes: Vec<Attribute>,
    generic_parameters: Vec<GenericParameter>,
    inherited_interfaces: Vec<TypeRef>,
    members: Vec<Member>,
    data: ContainerData,
}

impl Container {
    pub fn new(
        info: ModelInfo,
        name: impl Into<String>,
        namespace: impl Into<String>,
        data: ContainerData,
    ) -> Self {
        Self {
            info,
            name: name.into(),
            namespace: namespace.into(),
            security: Security::Unknown,
            keywords: Keywords::empty(),
            documentation: None,
            attributes: Vec::new(),
            generic_parameters: Vec::new(),
            inherited_interfaces: Vec::new(),
            members: Vec::new(),
            data,
        }
    }

    /// A container that could not be loaded.
    pub fn unloaded(kind: ContainerKind) -> Self {
        Self::new(
            ModelInfo::unloaded(ModelKind::Container),
            "",
            "",
            ContainerData::empty(kind),
        )
    }

    pub fn with_security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    pub fn with_keywords(mut self, keywords: Keywords) -> Self {
        self.keywords = keywords;
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

    pub fn with_generic_parameters(mut self, generic_parameters: Vec<GenericParameter>) -> Self {
        let errors = generic_parameters.iter().any(|g| g.has_errors());
        self.info = self.info.with_descendant_errors(errors);
        self.generic_parameters = generic_parameters;
        self
    }

    pub fn with_interfaces(mut self, interfaces: Vec<TypeRef>) -> Self {
        let errors = interfaces.iter().any(|t| !t.is_loaded());
        self.info = self.info.with_descendant_errors(errors);
        self.inherited_interfaces = interfaces;
        self
    }

    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        let errors = members.iter().any(|m| m.has_errors());
        self.info = self.info.with_descendant_errors(errors);
        self.members = members;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Namespace-qualified name.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match &self.data {
            ContainerData::Class { .. } => ContainerKind::Class,
            ContainerData::Interface => ContainerKind::Interface,
            ContainerData::Structure { .. } => ContainerKind::Structure,
            ContainerData::Record { .. } => ContainerKind::Record,
            ContainerData::RecordStructure => ContainerKind::RecordStructure,
        }
    }

    pub fn data(&self) -> &ContainerData {
        &self.data
    }

    pub fn security(&self) -> Security {
        self.security
    }

    pub fn keywords(&self) -> Keywords {
        self.keywords
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    pub fn generic_parameters(&self) -> &[GenericParameter] {
        &self.generic_parameters
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    pub fn inherited_interfaces(&self) -> &[TypeRef] {
        &self.inherited_interfaces
    }

    pub fn has_inherited_interfaces(&self) -> bool {
        !self.inherited_interfaces.is_empty()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn has_members(&self) -> bool {
        !self.members.is_empty()
    }

    /// Base class of a class or base record of a record.
    pub fn base_type(&self) -> Option<&TypeRef> {
        match &self.data {
            ContainerData::Class { base_class, .. } => base_class.as_ref(),
            ContainerData::Record { base_record } => base_record.as_ref(),
            _ => None,
        }
    }

    /// Lookup paths of containers, enums and delegates nested in a class or structure.
    pub fn nested_models(&self) -> &[LookupPath] {
        match &self.data {
            ContainerData::Class { nested_models, .. }
            | ContainerData::Structure { nested_models } => nested_models,
            _ => &[],
        }
    }

    pub fn has_nested_models(&self) -> bool {
        !self.nested_models().is_empty()
    }

    /// Resolve nested models through the store, skipping unregistered paths.
    pub fn nested<'s>(&'s self, store: &'s ModelStore) -> impl Iterator<Item = ModelRef<'s>> + 's {
        self.nested_models()
            .iter()
            .filter_map(move |path| store.get(path.as_str()))
    }

    /// Resolve the base class (or base record) through a resolver.
    pub fn base_model<'r, R: TypeResolver + ?Sized>(
        &self,
        resolver: &'r R,
    ) -> Option<&'r Container> {
        let base = self.base_type()?;
        match self.kind() {
            ContainerKind::Record => base.record_model(resolver),
            _ => base.class_model(resolver),
        }
    }

    /// Resolve directly inherited interfaces, skipping those that do not resolve.
    pub fn interface_models<'r, R: TypeResolver + ?Sized>(
        &'r self,
        resolver: &'r R,
    ) -> impl Iterator<Item = &'r Container> + 'r {
        self.inherited_interfaces
            .iter()
            .filter_map(move |t| t.interface_model(resolver))
    }

    /// Members whose payload is variant `K`, paired with that payload.
    pub fn select<K: MemberVariant>(&self) -> impl Iterator<Item = (&Member, &K)> {
        self.members
            .iter()
            .filter_map(|m| m.variant::<K>().map(|payload| (m, payload)))
    }

    /// Members of one kind.
    pub fn members_of_kind(&self, kind: MemberKind) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(move |m| m.kind() == kind)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Member> {
        self.select::<Field>().map(|(m, _)| m)
    }

    pub fn properties(&self) -> impl Iterator<Item = &Member> {
        self.select::<Property>().map(|(m, _)| m)
    }

    pub fn events(&self) -> impl Iterator<Item = &Member> {
        self.select::<Event>().map(|(m, _)| m)
    }

    /// Ordinary methods: everything except constructors, destructors and accessors.
    pub fn methods(&self) -> impl Iterator<Item = &Member> {
        self.select::<Method>()
            .filter(|(_, m)| {
                !m.method_kind.is_accessor()
                    && !matches!(
                        m.method_kind,
                        MethodKind::Constructor | MethodKind::Destructor
                    )
            })
            .map(|(member, _)| member)
    }

    pub fn constructors(&self) -> impl Iterator<Item = &Member> {
        self.select::<Method>()
            .filter(|(_, m)| m.is_constructor())
            .map(|(member, _)| member)
    }

    pub fn destructor(&self) -> Option<&Member> {
        self.select::<Method>()
            .find(|(_, m)| m.is_destructor())
            .map(|(member, _)| member)
    }

    /// Find members by name.
    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Member> + 'a {
        self.members.iter().filter(move |m| m.name() == name)
    }

    /// Whether the base chain contains a class (or record) with this name.
    ///
    /// Walks base references through the resolver, comparing the name (and
    /// namespace, when given) of each link. Stops with `false` at the first
    /// link that does not resolve, on a revisited container, or immediately
    /// when this container is not loaded.
    pub fn inherits_base_class<'a, R: TypeResolver + ?Sized>(
        &'a self,
        resolver: &'a R,
        name: &str,
        namespace: Option<&str>,
    ) -> bool {
        if !self.is_loaded() {
            return false;
        }
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        visited.insert(self.lookup_path().as_str());
        let mut current: &'a Container = self;
        loop {
            let Some(base) = current.base_type() else {
                return false;
            };
            if base.name() == name && namespace.map_or(true, |ns| base.namespace() == ns) {
                return true;
            }
            let Some(next) = base.container_model(resolver) else {
                return false;
            };
            if !visited.insert(next.lookup_path().as_str()) {
                tracing::warn!(path = %next.lookup_path(), "cycle in base class chain");
                return false;
            }
            current = next;
        }
    }
}

impl HasAttributes for Container {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

impl Model for Container {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MemberData, WellKnownType};

    fn class(name: &str, base: Option<&str>) -> Container {
        Container::new(
            ModelInfo::new(ModelKind::Container, format!("App.{}", name)),
            name,
            "App",
            ContainerData::Class {
                base_class: base.map(|b| TypeRef::named("App", b)),
                nested_models: Vec::new(),
            },
        )
    }

    fn method(owner: &str, name: &str, kind: MethodKind) -> Member {
        Member::new(
            ModelInfo::new(ModelKind::Member, format!("App.{}.{}()", owner, name))
                .with_parent(format!("App.{}", owner)),
            name,
            MemberData::Method(Method::new(kind, TypeRef::well_known(WellKnownType::Void))),
        )
    }

    #[test]
    fn test_derived_views() {
        let c = class("Widget", None).with_members(vec![
            method("Widget", "Widget", MethodKind::Constructor),
            method("Widget", "~Widget", MethodKind::Destructor),
            method("Widget", "Draw", MethodKind::Member),
            method("Widget", "get_Size", MethodKind::Get),
            Member::new(
                ModelInfo::new(ModelKind::Member, "App.Widget.Size"),
                "Size",
                MemberData::Property(Property::new(TypeRef::well_known(WellKnownType::Int32))),
            ),
        ]);

        assert_eq!(c.methods().count(), 1);
        assert_eq!(c.constructors().count(), 1);
        assert!(c.destructor().is_some());
        assert_eq!(c.properties().count(), 1);
        assert_eq!(c.fields().count(), 0);
        assert_eq!(c.events().count(), 0);
        assert_eq!(c.select::<Method>().count(), 4);
        assert_eq!(c.members_of_kind(MemberKind::Method).count(), 4);
    }

    #[test]
    fn test_empty_container_collections() {
        let c = class("Empty", None);
        assert!(c.members().is_empty());
        assert!(!c.has_members());
        assert!(c.attributes().is_empty());
        assert!(!c.has_attributes());
        assert!(c.inherited_interfaces().is_empty());
        assert!(!c.has_inherited_interfaces());
        assert!(c.nested_models().is_empty());
        assert!(!c.has_nested_models());
        assert!(c.generic_parameters().is_empty());
    }

    #[test]
    fn test_inherits_base_class_chain() {
        let mut store = ModelStore::new();
        store.set(class("Root", None));
        store.set(class("B", Some("Root")));
        let c = class("C", Some("B"));

        assert!(c.inherits_base_class(&store, "B", None));
        assert!(c.inherits_base_class(&store, "Root", None));
        assert!(c.inherits_base_class(&store, "Root", Some("App")));
        assert!(!c.inherits_base_class(&store, "Root", Some("Other")));
        assert!(!c.inherits_base_class(&store, "Missing", None));
    }

    #[test]
    fn test_unloaded_never_inherits() {
        let mut store = ModelStore::new();
        store.set(class("Root", None));
        let c = Container::new(
            ModelInfo::unloaded(ModelKind::Container),
            "C",
            "App",
            ContainerData::Class {
                base_class: Some(TypeRef::named("App", "Root")),
                nested_models: Vec::new(),
            },
        );

        assert!(!c.is_loaded());
        assert!(c.base_model(&store).is_some());
        assert!(!c.inherits_base_class(&store, "Root", None));
        assert!(class("C", Some("Root")).inherits_base_class(&store, "Root", None));
    }

    #[test]
    fn test_base_cycle_terminates() {
        let mut store = ModelStore::new();
        store.set(class("A", Some("B")));
        store.set(class("B", Some("A")));
        let a = class("A", Some("B"));
        assert!(!a.inherits_base_class(&store, "Missing", None));
    }
}
