//! Fields, properties, methods and events.
//!
//! All four share one [`Member`] record; the kind-specific payload is the
//! [`MemberData`] variant. Code that only cares about one kind asks for it with
//! [`Member::variant`] (or the `as_*` shorthands) instead of matching by hand.

use super::attribute::{Attribute, HasAttributes};
use super::container::Container;
use super::delegate::Delegate;
use super::info::{LookupPath, Model, ModelInfo};
use super::kinds::{Keywords, MemberKind, MethodKind, Security};
use super::parameter::Parameter;
use super::store::ModelStore;
use super::types::{GenericParameter, TypeRef};

/// Field payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub field_type: TypeRef,
    pub is_constant: bool,
    pub default_value: Option<String>,
}

impl Field {
    pub fn new(field_type: TypeRef) -> Self {
        Self {
            field_type,
            is_constant: false,
            default_value: None,
        }
    }
}

/// Property payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub property_type: TypeRef,
    /// Indexer parameters; empty for ordinary properties.
    pub parameters: Vec<Parameter>,
    pub get_method: Option<LookupPath>,
    pub set_method: Option<LookupPath>,
    /// Setter declared with `init`.
    pub is_init_only: bool,
}

impl Property {
    pub fn new(property_type: TypeRef) -> Self {
        Self {
            property_type,
            parameters: Vec::new(),
            get_method: None,
            set_method: None,
            is_init_only: false,
        }
    }

    pub fn has_get(&self) -> bool {
        self.get_method.is_some()
    }

    pub fn has_set(&self) -> bool {
        self.set_method.is_some()
    }

    pub fn is_indexer(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Resolve the getter method through the store.
    pub fn get_model<'s>(&self, store: &'s ModelStore) -> Option<&'s Member> {
        resolve_member(store, self.get_method.as_ref())
    }

    /// Resolve the setter method through the store.
    pub fn set_model<'s>(&self, store: &'s ModelStore) -> Option<&'s Member> {
        resolve_member(store, self.set_method.as_ref())
    }
}

/// Method payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub method_kind: MethodKind,
    /// `void` for methods without a result and for constructors.
    pub return_type: TypeRef,
    pub parameters: Vec<Parameter>,
    pub generic_parameters: Vec<GenericParameter>,
    pub has_body: bool,
}

impl Method {
    pub fn new(method_kind: MethodKind, return_type: TypeRef) -> Self {
        Self {
            method_kind,
            return_type,
            parameters: Vec::new(),
            generic_parameters: Vec::new(),
            has_body: true,
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.method_kind == MethodKind::Constructor
    }

    pub fn is_destructor(&self) -> bool {
        self.method_kind == MethodKind::Destructor
    }

    pub fn is_generic(&self) -> bool {
        !self.generic_parameters.is_empty()
    }

    pub fn is_extension(&self) -> bool {
        self.parameters
            .first()
            .is_some_and(|p| p.modifier() == super::parameter::ParameterModifier::This)
    }
}

/// Event payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: TypeRef,
    pub handler_delegate: Option<LookupPath>,
    pub add_method: Option<LookupPath>,
    pub remove_method: Option<LookupPath>,
    pub raise_method: Option<LookupPath>,
}

impl Event {
    pub fn new(event_type: TypeRef) -> Self {
        Self {
            event_type,
            handler_delegate: None,
            add_method: None,
            remove_method: None,
            raise_method: None,
        }
    }

    /// Resolve the delegate that handlers must match.
    pub fn handler_model<'s>(&self, store: &'s ModelStore) -> Option<&'s Delegate> {
        self.handler_delegate
            .as_ref()
            .and_then(|p| store.get(p.as_str()))
            .and_then(|m| m.as_delegate())
    }

    pub fn add_model<'s>(&self, store: &'s ModelStore) -> Option<&'s Member> {
        resolve_member(store, self.add_method.as_ref())
    }

    pub fn remove_model<'s>(&self, store: &'s ModelStore) -> Option<&'s Member> {
        resolve_member(store, self.remove_method.as_ref())
    }

    pub fn raise_model<'s>(&self, store: &'s ModelStore) -> Option<&'s Member> {
        resolve_member(store, self.raise_method.as_ref())
    }
}

fn resolve_member<'s>(store: &'s ModelStore, path: Option<&LookupPath>) -> Option<&'s Member> {
    path.and_then(|p| store.get(p.as_str()))
        .and_then(|m| m.as_member())
}

/// Kind-specific member payload.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberData {
    Field(Field),
    Property(Property),
    Method(Method),
    Event(Event),
}

/// A payload type that can be selected out of a [`Member`].
pub trait MemberVariant: 'static {
    const KIND: MemberKind;

    fn from_data(data: &MemberData) -> Option<&Self>;
}

impl MemberVariant for Field {
    const KIND: MemberKind = MemberKind::Field;

    fn from_data(data: &MemberData) -> Option<&Self> {
        match data {
            MemberData::Field(f) => Some(f),
            _ => None,
        }
    }
}

impl MemberVariant for Property {
    const KIND: MemberKind = MemberKind::Property;

    fn from_data(data: &MemberData) -> Option<&Self> {
        match data {
            MemberData::Property(p) => Some(p),
            _ => None,
        }
    }
}

impl MemberVariant for Method {
    const KIND: MemberKind = MemberKind::Method;

    fn from_data(data: &MemberData) -> Option<&Self> {
        match data {
            MemberData::Method(m) => Some(m),
            _ => None,
        }
    }
}

impl MemberVariant for Event {
    const KIND: MemberKind = MemberKind::Event;

    fn from_data(data: &MemberData) -> Option<&Self> {
        match data {
            MemberData::Event(e) => Some(e),
            _ => None,
        }
    }
}

/// A member of a container.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    info: ModelInfo,
    name: String,
    security: Security,
    keywords: Keywords,
    documentation: Option<String>,
    attributes: Vec<Attribute>,
    data: MemberData,
}

impl Member {
    pub fn new(info: ModelInfo, name: impl Into<String>, data: MemberData) -> Self {
        let payload_errors = data_has_errors(&data);
        Self {
            info: info.with_descendant_errors(payload_errors),
            name: name.into(),
            security: Security::Unknown,
            keywords: Keywords::empty(),
            documentation: None,
            attributes: Vec::new(),
            data,
        }
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

    pub fn name(&self) -> &str {
        &self.name
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

    pub fn has_documentation(&self) -> bool {
        self.documentation.is_some()
    }

    pub fn data(&self) -> &MemberData {
        &self.data
    }

    pub fn kind(&self) -> MemberKind {
        match &self.data {
            MemberData::Field(_) => MemberKind::Field,
            MemberData::Property(_) => MemberKind::Property,
            MemberData::Method(_) => MemberKind::Method,
            MemberData::Event(_) => MemberKind::Event,
        }
    }

    /// Method kind, for methods only.
    pub fn method_kind(&self) -> Option<MethodKind> {
        self.as_method().map(|m| m.method_kind)
    }

    /// Select the payload of variant `K`.
    pub fn variant<K: MemberVariant>(&self) -> Option<&K> {
        K::from_data(&self.data)
    }

    pub fn as_field(&self) -> Option<&Field> {
        self.variant()
    }

    pub fn as_property(&self) -> Option<&Property> {
        self.variant()
    }

    pub fn as_method(&self) -> Option<&Method> {
        self.variant()
    }

    pub fn as_event(&self) -> Option<&Event> {
        self.variant()
    }

    pub fn is_static(&self) -> bool {
        self.keywords.contains(Keywords::STATIC)
    }

    /// The type of value this member produces: field, property and event
    /// types, or a method's return type.
    pub fn value_type(&self) -> &TypeRef {
        match &self.data {
            MemberData::Field(f) => &f.field_type,
            MemberData::Property(p) => &p.property_type,
            MemberData::Method(m) => &m.return_type,
            MemberData::Event(e) => &e.event_type,
        }
    }

    /// Declared parameters: method parameters or indexer parameters.
    pub fn parameters(&self) -> &[Parameter] {
        match &self.data {
            MemberData::Method(m) => &m.parameters,
            MemberData::Property(p) => &p.parameters,
            MemberData::Field(_) | MemberData::Event(_) => &[],
        }
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters().is_empty()
    }

    /// Generic parameters, for generic methods only.
    pub fn generic_parameters(&self) -> &[GenericParameter] {
        match &self.data {
            MemberData::Method(m) => &m.generic_parameters,
            _ => &[],
        }
    }

    /// Resolve the owning container through the store.
    pub fn parent_container<'s>(&self, store: &'s ModelStore) -> Option<&'s Container> {
        self.parent(store).and_then(|m| m.as_container())
    }
}

fn data_has_errors(data: &MemberData) -> bool {
    let params_bad = |params: &[Parameter]| params.iter().any(|p| p.has_errors());
    match data {
        MemberData::Field(f) => !f.field_type.is_loaded(),
        MemberData::Property(p) => !p.property_type.is_loaded() || params_bad(&p.parameters),
        MemberData::Method(m) => {
            !m.return_type.is_loaded()
                || params_bad(&m.parameters)
                || m.generic_parameters.iter().any(|g| g.has_errors())
        }
        MemberData::Event(e) => !e.event_type.is_loaded(),
    }
}

impl HasAttributes for Member {
    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

impl Model for Member {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelKind, WellKnownType};

    fn method(name: &str) -> Member {
        let path = LookupPath::new(format!("Geometry.Circle.{}()", name));
        Member::new(
            ModelInfo::new(ModelKind::Member, path).with_parent("Geometry.Circle"),
            name,
            MemberData::Method(Method::new(
                MethodKind::Member,
                TypeRef::well_known(WellKnownType::Double),
            )),
        )
        .with_security(Security::Public)
    }

    #[test]
    fn test_variant_selection() {
        let m = method("Area");
        assert_eq!(m.kind(), MemberKind::Method);
        assert_eq!(m.method_kind(), Some(MethodKind::Member));
        assert!(m.as_method().is_some());
        assert!(m.as_field().is_none());
        assert!(m.variant::<Property>().is_none());
        assert_eq!(<Method as MemberVariant>::KIND, MemberKind::Method);
    }

    #[test]
    fn test_empty_collections() {
        let m = method("Area");
        assert!(m.attributes().is_empty());
        assert!(!m.has_attributes());
        assert!(m.parameters().is_empty());
        assert!(!m.has_parameters());
        assert!(m.generic_parameters().is_empty());
        assert!(!m.has_documentation());
        assert!(m.load_errors().is_empty());
    }

    #[test]
    fn test_parent_absent_from_store_is_none() {
        let store = ModelStore::new();
        let m = method("Area");
        assert!(m.parent(&store).is_none());
        assert!(m.parent_container(&store).is_none());
    }

    #[test]
    fn test_property_accessor_flags() {
        let mut prop = Property::new(TypeRef::well_known(WellKnownType::String));
        assert!(!prop.has_get());
        prop.get_method = Some(LookupPath::new("Person.Name.get"));
        assert!(prop.has_get());
        assert!(!prop.has_set());
        assert!(!prop.is_indexer());
    }

    #[test]
    fn test_unloaded_type_marks_member() {
        let m = Member::new(
            ModelInfo::new(ModelKind::Member, "A.f"),
            "f",
            MemberData::Field(Field::new(TypeRef::unresolved("List<"))),
        );
        assert!(m.has_errors());
        assert!(m.load_errors().is_empty());
    }
}
