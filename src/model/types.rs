//! Type usages and their on-demand resolution.
//!
//! A [`TypeRef`] is a lightweight summary of a type as it is used in a
//! declaration (a parameter type, a base class, a field type). It never owns
//! the definition it names. Resolution to the full container, enum or delegate
//! goes through a [`TypeResolver`], which is normally the [`ModelStore`] of the
//! graph but can be any lookup (tests substitute fakes).

use std::fmt::{self, Write as _};

use bitflags::bitflags;

use super::container::Container;
use super::delegate::Delegate;
use super::enums::EnumModel;
use super::info::{LookupPath, Model, ModelInfo};
use super::kinds::{ContainerKind, ModelKind, WellKnownType};
use super::store::{ModelRef, ModelStore};

bitflags! {
    /// Classification of a type usage.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct TypeFlags: u16 {
        const VALUE_TYPE = 1 << 0;
        const ARRAY = 1 << 1;
        /// A generic parameter such as `T`, not a concrete type.
        const GENERIC_PLACEHOLDER = 1 << 2;
        const WELL_KNOWN = 1 << 3;
        const ENUM = 1 << 4;
        const DELEGATE = 1 << 5;
        const TUPLE = 1 << 6;
        const NULLABLE = 1 << 7;
    }
}

/// Resolves type usages and lookup paths to full models.
pub trait TypeResolver {
    /// Resolve the definition a type usage names.
    fn resolve_type(&self, ty: &TypeRef) -> Option<ModelRef<'_>>;
}

impl TypeResolver for ModelStore {
    fn resolve_type(&self, ty: &TypeRef) -> Option<ModelRef<'_>> {
        let path = ty.definition_path()?;
        self.get(path.as_str())
    }
}

/// A named element of a tuple type, e.g. `x` in `(int x, int y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TupleTypeParameter {
    pub name: Option<String>,
    pub ty: TypeRef,
}

impl TupleTypeParameter {
    pub fn new(name: Option<String>, ty: TypeRef) -> Self {
        Self { name, ty }
    }
}

/// A type usage.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    name: String,
    namespace: String,
    generic_arguments: Vec<TypeRef>,
    tuple_elements: Vec<TupleTypeParameter>,
    array_rank: u8,
    flags: TypeFlags,
    well_known: Option<WellKnownType>,
    definition: Option<LookupPath>,
    is_loaded: bool,
}

impl TypeRef {
    /// A reference to a named, user-defined or framework type.
    pub fn named(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            generic_arguments: Vec::new(),
            tuple_elements: Vec::new(),
            array_rank: 0,
            flags: TypeFlags::empty(),
            well_known: None,
            definition: None,
            is_loaded: true,
        }
    }

    /// A built-in type such as `int` or `string`.
    pub fn well_known(kind: WellKnownType) -> Self {
        let mut flags = TypeFlags::WELL_KNOWN;
        if kind.is_value_type() {
            flags |= TypeFlags::VALUE_TYPE;
        }
        Self {
            well_known: Some(kind),
            flags,
            ..Self::named("System", kind.framework_name())
        }
    }

    /// A generic parameter placeholder such as `T`.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            flags: TypeFlags::GENERIC_PLACEHOLDER,
            ..Self::named("", name)
        }
    }

    /// A tuple type.
    pub fn tuple(elements: Vec<TupleTypeParameter>) -> Self {
        Self {
            tuple_elements: elements,
            flags: TypeFlags::TUPLE | TypeFlags::VALUE_TYPE,
            ..Self::named("System", "ValueTuple")
        }
    }

    /// A type usage that could not be understood.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            is_loaded: false,
            ..Self::named("", name)
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<TypeRef>) -> Self {
        self.generic_arguments = arguments;
        self
    }

    /// Make this an array type of the given rank (1 for `T[]`, 2 for `T[,]`).
    pub fn into_array(mut self, rank: u8) -> Self {
        self.array_rank = rank.max(1);
        self.flags |= TypeFlags::ARRAY;
        self.flags.remove(TypeFlags::VALUE_TYPE);
        self
    }

    pub fn into_nullable(mut self) -> Self {
        self.flags |= TypeFlags::NULLABLE;
        self
    }

    /// Add classification flags known to the builder (enum, delegate, value type).
    pub fn with_flags(mut self, flags: TypeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Point this usage at an explicit definition path.
    pub fn with_definition(mut self, path: impl Into<LookupPath>) -> Self {
        self.definition = Some(path.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn generic_arguments(&self) -> &[TypeRef] {
        &self.generic_arguments
    }

    pub fn has_generic_arguments(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    pub fn tuple_elements(&self) -> &[TupleTypeParameter] {
        &self.tuple_elements
    }

    pub fn array_rank(&self) -> u8 {
        self.array_rank
    }

    pub fn flags(&self) -> TypeFlags {
        self.flags
    }

    pub fn well_known_type(&self) -> Option<WellKnownType> {
        self.well_known
    }

    pub fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    pub fn is_value_type(&self) -> bool {
        self.flags.contains(TypeFlags::VALUE_TYPE)
    }

    pub fn is_array(&self) -> bool {
        self.flags.contains(TypeFlags::ARRAY)
    }

    pub fn is_generic_placeholder(&self) -> bool {
        self.flags.contains(TypeFlags::GENERIC_PLACEHOLDER)
    }

    pub fn is_well_known(&self) -> bool {
        self.flags.contains(TypeFlags::WELL_KNOWN)
    }

    pub fn is_enum(&self) -> bool {
        self.flags.contains(TypeFlags::ENUM)
    }

    pub fn is_delegate(&self) -> bool {
        self.flags.contains(TypeFlags::DELEGATE)
    }

    pub fn is_tuple(&self) -> bool {
        self.flags.contains(TypeFlags::TUPLE)
    }

    pub fn is_nullable(&self) -> bool {
        self.flags.contains(TypeFlags::NULLABLE)
    }

    pub fn is_void(&self) -> bool {
        self.well_known == Some(WellKnownType::Void)
    }

    /// Namespace-qualified name without generic arguments.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Lookup path of the definition this usage names, if it names one.
    ///
    /// Placeholders, arrays, tuples and built-in types never name a
    /// definition in the graph.
    pub fn definition_path(&self) -> Option<LookupPath> {
        if let Some(path) = &self.definition {
            return Some(path.clone());
        }
        if !self.is_loaded
            || self.array_rank > 0
            || self.flags.intersects(
                TypeFlags::GENERIC_PLACEHOLDER | TypeFlags::WELL_KNOWN | TypeFlags::TUPLE,
            )
        {
            return None;
        }
        let mut path = self.full_name();
        if !self.generic_arguments.is_empty() {
            let _ = write!(path, "`{}", self.generic_arguments.len());
        }
        Some(LookupPath::new(path))
    }

    /// Canonical spelling used for structural comparison.
    ///
    /// Keyword aliases and framework names of built-in types canonicalize
    /// identically, so `int` and `System.Int32` compare equal.
    pub fn canonical_name(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        if self.is_tuple() {
            out.push('(');
            for (i, element) in self.tuple_elements.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                element.ty.write_canonical(out);
            }
            out.push(')');
        } else if self.is_generic_placeholder() {
            out.push('!');
            out.push_str(&self.name);
        } else {
            out.push_str(&self.full_name());
            if !self.generic_arguments.is_empty() {
                out.push('<');
                for (i, arg) in self.generic_arguments.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    arg.write_canonical(out);
                }
                out.push('>');
            }
        }
        if self.is_nullable() {
            out.push('?');
        }
        if self.array_rank > 0 {
            out.push('[');
            for _ in 1..self.array_rank {
                out.push(',');
            }
            out.push(']');
        }
    }

    fn resolve_container<'r, R>(
        &self,
        resolver: &'r R,
        kind: ContainerKind,
    ) -> Option<&'r Container>
    where
        R: TypeResolver + ?Sized,
    {
        if self.flags.intersects(TypeFlags::ENUM | TypeFlags::DELEGATE) {
            return None;
        }
        resolver
            .resolve_type(self)?
            .as_container()
            .filter(|c| c.kind() == kind)
    }

    /// Resolve to the class this type names.
    pub fn class_model<'r, R: TypeResolver + ?Sized>(
        &self,
        resolver: &'r R,
    ) -> Option<&'r Container> {
        self.resolve_container(resolver, ContainerKind::Class)
    }

    /// Resolve to the interface this type names.
    pub fn interface_model<'r, R: TypeResolver + ?Sized>(
        &self,
        resolver: &'r R,
    ) -> Option<&'r Container> {
        self.resolve_container(resolver, ContainerKind::Interface)
    }

    /// Resolve to the structure this type names.
    pub fn structure_model<'r, R: TypeResolver + ?Sized>(
        &self,
        resolver: &'r R,
    ) -> Option<&'r Container> {
        self.resolve_container(resolver, ContainerKind::Structure)
    }

    /// Resolve to the record this type names.
    pub fn record_model<'r, R: TypeResolver + ?Sized>(
        &self,
        resolver: &'r R,
    ) -> Option<&'r Container> {
        self.resolve_container(resolver, ContainerKind::Record)
    }

    /// Resolve to any container kind this type names.
    pub fn container_model<'r, R: TypeResolver + ?Sized>(
        &self,
        resolver: &'r R,
    ) -> Option<&'r Container> {
        if self.flags.intersects(TypeFlags::ENUM | TypeFlags::DELEGATE) {
            return None;
        }
        resolver.resolve_type(self)?.as_container()
    }

    /// Resolve to the enum this type names.
    pub fn enum_model<'r, R: TypeResolver + ?Sized>(
        &self,
        resolver: &'r R,
    ) -> Option<&'r EnumModel> {
        if !self.is_enum() {
            return None;
        }
        resolver.resolve_type(self)?.as_enum()
    }

    /// Resolve to the delegate this type names.
    pub fn delegate_model<'r, R: TypeResolver + ?Sized>(
        &self,
        resolver: &'r R,
    ) -> Option<&'r Delegate> {
        if !self.is_delegate() {
            return None;
        }
        resolver.resolve_type(self)?.as_delegate()
    }

    /// This usage with bound placeholders replaced by their arguments.
    ///
    /// `T[]` under `T -> Book` becomes `Book[]`; unbound placeholders stay as they are.
    pub fn substitute(&self, bindings: &GenericBindings) -> TypeRef {
        if bindings.is_empty() {
            return self.clone();
        }
        if self.is_generic_placeholder() {
            let Some(bound) = bindings.get(&self.name) else {
                return self.clone();
            };
            let mut ty = bound.clone();
            if self.is_nullable() {
                ty = ty.into_nullable();
            }
            if self.array_rank > 0 {
                ty = ty.into_array(self.array_rank);
            }
            return ty;
        }
        let mut ty = self.clone();
        for argument in &mut ty.generic_arguments {
            *argument = argument.substitute(bindings);
        }
        for element in &mut ty.tuple_elements {
            element.ty = element.ty.substitute(bindings);
        }
        ty
    }

    /// Whether the container this type names directly lists an interface.
    ///
    /// One level only: interfaces inherited by those interfaces are not searched.
    pub fn inherits_interface<R: TypeResolver + ?Sized>(
        &self,
        resolver: &R,
        name: &str,
        namespace: Option<&str>,
    ) -> bool {
        let Some(container) = self.container_model(resolver) else {
            return false;
        };
        container.inherited_interfaces().iter().any(|iface| {
            iface.name() == name && namespace.map_or(true, |ns| iface.namespace() == ns)
        })
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_tuple() {
            f.write_str("(")?;
            for (i, element) in self.tuple_elements.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", element.ty)?;
                if let Some(name) = &element.name {
                    write!(f, " {}", name)?;
                }
            }
            f.write_str(")")?;
        } else if let Some(kind) = self.well_known {
            f.write_str(kind.keyword())?;
        } else {
            f.write_str(&self.name)?;
            if !self.generic_arguments.is_empty() {
                f.write_str("<")?;
                for (i, arg) in self.generic_arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")?;
            }
        }
        if self.is_nullable() {
            f.write_str("?")?;
        }
        if self.array_rank > 0 {
            f.write_str("[")?;
            for _ in 1..self.array_rank {
                f.write_str(",")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// Placeholder bindings of a constructed generic type.
///
/// `IRepository<Book>` binds the `T` of `IRepository<T>` to `Book`. Bindings are built
/// outermost first, so arguments that mention an enclosing placeholder arrive already
/// substituted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericBindings {
    bound: Vec<(String, TypeRef)>,
}

impl GenericBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }

    pub fn get(&self, placeholder: &str) -> Option<&TypeRef> {
        self.bound
            .iter()
            .find(|(name, _)| name == placeholder)
            .map(|(_, ty)| ty)
    }

    /// Bindings for a generic definition declaring `parameters`, as constructed by `usage`.
    ///
    /// The usage's arguments are substituted with `self` first. Extra or missing arguments
    /// leave the surplus parameters unbound.
    pub fn construct(&self, parameters: &[GenericParameter], usage: &TypeRef) -> GenericBindings {
        let bound = parameters
            .iter()
            .zip(usage.generic_arguments())
            .map(|(parameter, argument)| (parameter.name().to_string(), argument.substitute(self)))
            .collect();
        GenericBindings { bound }
    }

    /// These bindings minus placeholders redeclared by an inner generic scope.
    pub fn shadowed_by(&self, parameters: &[GenericParameter]) -> GenericBindings {
        GenericBindings {
            bound: self
                .bound
                .iter()
                .filter(|(name, _)| parameters.iter().all(|p| p.name() != name))
                .cloned()
                .collect(),
        }
    }
}

/// Variance annotation on a generic parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variance {
    #[default]
    Invariant,
    /// `in T`
    Contravariant,
    /// `out T`
    Covariant,
}

/// Constraint that is not a type, e.g. `where T : struct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialConstraint {
    Class,
    Struct,
    Unmanaged,
    NotNull,
    /// `new()`
    Constructor,
}

impl SpecialConstraint {
    pub fn keyword(&self) -> &'static str {
        match self {
            SpecialConstraint::Class => "class",
            SpecialConstraint::Struct => "struct",
            SpecialConstraint::Unmanaged => "unmanaged",
            SpecialConstraint::NotNull => "notnull",
            SpecialConstraint::Constructor => "new()",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "class" => Some(SpecialConstraint::Class),
            "struct" => Some(SpecialConstraint::Struct),
            "unmanaged" => Some(SpecialConstraint::Unmanaged),
            "notnull" => Some(SpecialConstraint::NotNull),
            "new()" | "new" => Some(SpecialConstraint::Constructor),
            _ => None,
        }
    }
}

/// A generic parameter declared by a container, method or delegate.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericParameter {
    info: ModelInfo,
    name: String,
    variance: Variance,
    special_constraints: Vec<SpecialConstraint>,
    type_constraints: Vec<TypeRef>,
}

impl GenericParameter {
    pub fn new(parent: &LookupPath, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            info: ModelInfo::new(ModelKind::GenericParameter, parent.child(&format!("<{}>", name)))
                .with_parent(parent.clone()),
            name,
            variance: Variance::Invariant,
            special_constraints: Vec::new(),
            type_constraints: Vec::new(),
        }
    }

    pub fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }

    pub fn with_constraints(
        mut self,
        special: Vec<SpecialConstraint>,
        types: Vec<TypeRef>,
    ) -> Self {
        self.special_constraints = special;
        self.type_constraints = types;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variance(&self) -> Variance {
        self.variance
    }

    pub fn special_constraints(&self) -> &[SpecialConstraint] {
        &self.special_constraints
    }

    pub fn type_constraints(&self) -> &[TypeRef] {
        &self.type_constraints
    }

    pub fn has_constraints(&self) -> bool {
        !self.special_constraints.is_empty() || !self.type_constraints.is_empty()
    }
}

impl Model for GenericParameter {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}
