//! The code model: immutable value objects for the constructs of one compiled unit.
//!
//! Models are built bottom-up, registered in a [`ModelStore`] and never mutated afterwards.
//! References between models (parents, base types, accessors, handler delegates, nested
//! models) are [`LookupPath`]s resolved through the store on each access.

mod attribute;
mod container;
mod delegate;
mod enums;
mod graph;
mod info;
mod kinds;
mod member;
mod namespace;
mod parameter;
mod source;
mod store;
mod types;

pub use attribute::{Attribute, AttributeParameter, AttributeValue, HasAttributes};
pub use container::{Container, ContainerData};
pub use delegate::Delegate;
pub use enums::{EnumModel, EnumValue};
pub use graph::SourceGraph;
pub use info::{LoadError, LoadErrorKind, LookupPath, Model, ModelInfo};
pub use kinds::{
    ContainerKind, Keywords, MemberKind, MethodKind, ModelKind, NestedKind, Security,
    WellKnownType,
};
pub use member::{Event, Field, Member, MemberData, MemberVariant, Method, Property};
pub use namespace::{Namespace, UsingStatement};
pub use parameter::{Parameter, ParameterModifier};
pub use source::{Source, SourceContents};
pub use store::{ModelId, ModelNode, ModelRef, ModelStore};
pub use types::{
    GenericBindings, GenericParameter, SpecialConstraint, TupleTypeParameter, TypeFlags, TypeRef,
    TypeResolver, Variance,
};
