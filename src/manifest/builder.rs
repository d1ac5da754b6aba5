//! Graph assembly from a [`SourceManifest`].
//!
//! Building runs in two passes. The first records every declared container, enum and delegate
//! under its lookup path, so type names classify the same way regardless of declaration order.
//! The second builds models bottom-up, flags load errors on the models they concern and
//! registers everything in a [`ModelStore`] by category.

use std::path::PathBuf;

use rustc_hash::{FxHashMap, FxHashSet};

use super::schema::{
    ArgumentValueSpec, AttributeSpec, ContainerSpec, DelegateSpec, EnumSpec, GenericParameterSpec,
    MemberSpec, MemberSpecKind, ParameterSpec, SourceManifest, SpecialValueSpec, UsingSpec,
};
use super::type_name::{TypeName, TypeNameKind};
use crate::model::{
    Attribute, AttributeParameter, AttributeValue, Container, ContainerData, ContainerKind,
    Delegate, EnumModel, EnumValue, Event, Field, GenericParameter, Keywords, LoadError,
    LoadErrorKind, LookupPath, Member, MemberData, Method, MethodKind, Model, ModelInfo, ModelKind,
    ModelNode, ModelStore, Namespace, Parameter, ParameterModifier, Property, Security, Source,
    SourceContents, SourceGraph, SpecialConstraint, TupleTypeParameter, TypeFlags, TypeRef,
    UsingStatement, Variance, WellKnownType,
};

/// Store categories, in registration order.
const CATEGORIES: &[&str] = &[
    "usings",
    "namespaces",
    "interfaces",
    "classes",
    "structures",
    "records",
    "record_structures",
    "enums",
    "delegates",
    "nested",
];

fn category(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::Interface => "interfaces",
        ContainerKind::Class => "classes",
        ContainerKind::Structure => "structures",
        ContainerKind::Record => "records",
        ContainerKind::RecordStructure => "record_structures",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Container(ContainerKind),
    Enum,
    Delegate,
}

impl DeclKind {
    fn describe(self) -> &'static str {
        match self {
            DeclKind::Container(kind) => kind.keyword(),
            DeclKind::Enum => "enum",
            DeclKind::Delegate => "delegate",
        }
    }

    fn type_flags(self) -> TypeFlags {
        match self {
            DeclKind::Container(kind) if kind.is_value_type() => TypeFlags::VALUE_TYPE,
            DeclKind::Container(_) => TypeFlags::empty(),
            DeclKind::Enum => TypeFlags::ENUM | TypeFlags::VALUE_TYPE,
            DeclKind::Delegate => TypeFlags::DELEGATE,
        }
    }
}

/// A type declared somewhere in the unit.
#[derive(Debug, Clone)]
struct Declaration {
    path: LookupPath,
    namespace: String,
    name: String,
    kind: DeclKind,
}

/// Names visible while classifying a type usage.
#[derive(Debug, Clone, Default)]
struct Scope {
    namespace: String,
    generics: Vec<String>,
}

impl Scope {
    fn enter(&self, namespace: &str, generics: &[GenericParameterSpec]) -> Scope {
        let mut inner = Scope {
            namespace: namespace.to_string(),
            generics: self.generics.clone(),
        };
        inner.generics.extend(generics.iter().map(|g| g.name.clone()));
        inner
    }

    fn is_generic(&self, name: &str) -> bool {
        self.generics.iter().any(|g| g == name)
    }
}

/// Models built so far, in declaration order.
#[derive(Default)]
struct Registry {
    claimed: FxHashSet<LookupPath>,
    models: Vec<(&'static str, ModelNode)>,
}

impl Registry {
    /// Reserve a lookup path; false when it is already taken.
    fn claim(&mut self, path: &LookupPath) -> bool {
        self.claimed.insert(path.clone())
    }

    fn push(&mut self, category: &'static str, model: impl Into<ModelNode>) {
        self.models.push((category, model.into()));
    }

    fn into_store(self) -> ModelStore {
        let mut store = ModelStore::new();
        let mut models = self.models;
        for &name in CATEGORIES {
            let (matching, rest): (Vec<_>, Vec<_>) =
                models.into_iter().partition(|(c, _)| *c == name);
            models = rest;
            if !matching.is_empty() {
                store.add_models(name, matching.into_iter().map(|(_, m)| m).collect());
            }
        }
        store
    }
}

/// Result of building one declaration.
struct Built {
    path: LookupPath,
    has_errors: bool,
}

/// Builds an immutable [`SourceGraph`] from a manifest.
pub struct SourceBuilder<'m> {
    manifest: &'m SourceManifest,
    declarations: FxHashMap<String, Declaration>,
    externals: FxHashSet<&'m str>,
    source_path: LookupPath,
}

impl<'m> SourceBuilder<'m> {
    pub fn new(manifest: &'m SourceManifest) -> Self {
        let externals = manifest
            .externals
            .iter()
            .map(|e| e.split('<').next().unwrap_or_default().trim())
            .collect();
        let mut builder = Self {
            manifest,
            declarations: FxHashMap::default(),
            externals,
            source_path: LookupPath::new(format!("source:{}", manifest.name)),
        };
        builder.declare_all();
        builder
    }

    /// Build the graph. Problems are recorded as load errors on the affected models.
    #[tracing::instrument(level = "debug", skip_all, fields(source = %self.manifest.name))]
    pub fn build(&self) -> SourceGraph {
        let manifest = self.manifest;
        let mut registry = Registry::default();
        let mut errors = Vec::new();
        let mut contents = SourceContents::new();
        let mut namespaces: Vec<(String, Vec<LookupPath>)> = Vec::new();
        let mut descendant_errors = false;

        if manifest.name.trim().is_empty() {
            errors.push(LoadError::new(
                LoadErrorKind::MissingValue,
                &self.source_path,
                "source has no name",
            ));
        }

        for using in &manifest.usings {
            if let Some(path) = self.build_using(using, &mut registry, &mut errors) {
                contents.usings.push(path);
            }
        }

        let root = Scope::default();
        for (kind, specs) in manifest.container_groups() {
            for spec in specs {
                let namespace = spec.namespace.as_deref().unwrap_or(self.default_namespace());
                let built = self.build_container(
                    kind,
                    spec,
                    None,
                    namespace,
                    &root,
                    &mut registry,
                    &mut errors,
                );
                if let Some(built) = built {
                    descendant_errors |= built.has_errors;
                    record_namespace(&mut namespaces, namespace, &built.path);
                    let paths = match kind {
                        ContainerKind::Interface => &mut contents.interfaces,
                        ContainerKind::Class => &mut contents.classes,
                        ContainerKind::Structure => &mut contents.structures,
                        ContainerKind::Record => &mut contents.records,
                        ContainerKind::RecordStructure => &mut contents.record_structures,
                    };
                    paths.push(built.path);
                }
            }
        }
        for spec in &manifest.enums {
            let namespace = spec.namespace.as_deref().unwrap_or(self.default_namespace());
            let built = self.build_enum(spec, None, namespace, &mut registry, &mut errors);
            if let Some(built) = built {
                descendant_errors |= built.has_errors;
                record_namespace(&mut namespaces, namespace, &built.path);
                contents.enums.push(built.path);
            }
        }
        for spec in &manifest.delegates {
            let namespace = spec.namespace.as_deref().unwrap_or(self.default_namespace());
            let built =
                self.build_delegate(spec, None, namespace, &root, &mut registry, &mut errors);
            if let Some(built) = built {
                descendant_errors |= built.has_errors;
                record_namespace(&mut namespaces, namespace, &built.path);
                contents.delegates.push(built.path);
            }
        }

        for (name, models) in namespaces {
            let path = LookupPath::new(format!("namespace:{}", name));
            let info = ModelInfo::new(ModelKind::Namespace, path.clone())
                .with_parent(self.source_path.clone())
                .from_document(self.document());
            registry.push("namespaces", Namespace::new(info, name, models));
            contents.namespaces.push(path);
        }

        let info = ModelInfo::new(ModelKind::Source, self.source_path.clone())
            .from_document(self.document())
            .with_errors(errors)
            .with_descendant_errors(descendant_errors);
        let source = Source::new(info, manifest.name.as_str(), contents);
        let graph = SourceGraph::new(registry.into_store(), source);
        tracing::debug!(
            models = graph.store().len(),
            errors = graph.load_errors().len(),
            "built source graph"
        );
        graph
    }

    fn default_namespace(&self) -> &'m str {
        self.manifest.namespace.as_deref().unwrap_or("")
    }

    fn document(&self) -> Option<PathBuf> {
        self.manifest.document.clone()
    }

    /// Parent of a top-level declaration: its namespace, or the source when it has none.
    fn top_level_parent(&self, namespace: &str) -> LookupPath {
        if namespace.is_empty() {
            self.source_path.clone()
        } else {
            LookupPath::new(format!("namespace:{}", namespace))
        }
    }

    // Declaration pass.

    fn declare_all(&mut self) {
        let manifest = self.manifest;
        let default_namespace = self.default_namespace();
        for (kind, specs) in manifest.container_groups() {
            for spec in specs {
                let namespace = spec.namespace.as_deref().unwrap_or(default_namespace);
                self.declare_container(None, namespace, kind, spec);
            }
        }
        for spec in &manifest.enums {
            let namespace = spec.namespace.as_deref().unwrap_or(default_namespace);
            let path = declaration_path(None, namespace, &spec.name, 0);
            self.declare(&path, namespace, &spec.name, 0, DeclKind::Enum);
        }
        for spec in &manifest.delegates {
            let namespace = spec.namespace.as_deref().unwrap_or(default_namespace);
            let arity = spec.generic_parameters.len();
            let path = declaration_path(None, namespace, &spec.name, arity);
            self.declare(&path, namespace, &spec.name, arity, DeclKind::Delegate);
        }
    }

    fn declare_container(
        &mut self,
        parent: Option<&LookupPath>,
        namespace: &str,
        kind: ContainerKind,
        spec: &ContainerSpec,
    ) {
        let arity = spec.generic_parameters.len();
        let path = declaration_path(parent, namespace, &spec.name, arity);
        self.declare(&path, namespace, &spec.name, arity, DeclKind::Container(kind));

        let nested = &spec.nested;
        for (nested_kind, specs) in nested.container_groups() {
            for nested_spec in specs {
                self.declare_container(Some(&path), namespace, nested_kind, nested_spec);
            }
        }
        for spec in &nested.enums {
            let nested_path = declaration_path(Some(&path), namespace, &spec.name, 0);
            self.declare(&nested_path, namespace, &spec.name, 0, DeclKind::Enum);
        }
        for spec in &nested.delegates {
            let arity = spec.generic_parameters.len();
            let nested_path = declaration_path(Some(&path), namespace, &spec.name, arity);
            self.declare(&nested_path, namespace, &spec.name, arity, DeclKind::Delegate);
        }
    }

    /// Index a declaration by full path, by simple name and by namespace-relative path.
    /// The first declaration wins each key.
    fn declare(
        &mut self,
        path: &LookupPath,
        namespace: &str,
        name: &str,
        arity: usize,
        kind: DeclKind,
    ) {
        if name.trim().is_empty() {
            return;
        }
        let declaration = Declaration {
            path: path.clone(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind,
        };
        let relative = path
            .as_str()
            .strip_prefix(namespace)
            .and_then(|rest| rest.strip_prefix('.'))
            .filter(|_| !namespace.is_empty())
            .map(str::to_string);
        let keys = [Some(path.as_str().to_string()), Some(arity_name(name, arity)), relative];
        for key in keys.into_iter().flatten() {
            self.declarations
                .entry(key)
                .or_insert_with(|| declaration.clone());
        }
    }

    /// Find a declaration by the name a usage wrote: as written, then qualified by the
    /// enclosing namespaces (innermost first), then by each imported namespace.
    fn lookup(&self, name: &str, arity: usize, scope: &Scope) -> Option<&Declaration> {
        let key = arity_name(name, arity);
        if let Some(found) = self.declarations.get(&key) {
            return Some(found);
        }
        let mut namespace = scope.namespace.as_str();
        while !namespace.is_empty() {
            if let Some(found) = self.declarations.get(&format!("{}.{}", namespace, key)) {
                return Some(found);
            }
            namespace = namespace.rsplit_once('.').map_or("", |(head, _)| head);
        }
        self.manifest
            .usings
            .iter()
            .filter(|u| u.alias.is_none() && !u.is_static)
            .find_map(|u| self.declarations.get(&format!("{}.{}", u.namespace, key)))
    }

    fn is_external(&self, name: &str, scope: &Scope) -> bool {
        if self.externals.contains(name) {
            return true;
        }
        let qualified = |namespace: &str| {
            self.externals
                .contains(format!("{}.{}", namespace, name).as_str())
        };
        (!scope.namespace.is_empty() && qualified(&scope.namespace))
            || self.manifest.usings.iter().any(|u| qualified(&u.namespace))
    }

    // Type usages.

    /// Parse and classify a type usage, recording malformed names against `owner`.
    fn type_ref(
        &self,
        text: &str,
        scope: &Scope,
        owner: &LookupPath,
        errors: &mut Vec<LoadError>,
    ) -> TypeRef {
        match TypeName::parse(text) {
            Ok(name) => self.classify(&name, scope),
            Err(err) => {
                errors.push(LoadError::new(LoadErrorKind::MalformedType, owner, err.to_string()));
                TypeRef::unresolved(text.trim())
            }
        }
    }

    /// A type usage that must be present, recording a missing value otherwise.
    fn required_type(
        &self,
        text: Option<&str>,
        what: &str,
        scope: &Scope,
        owner: &LookupPath,
        errors: &mut Vec<LoadError>,
    ) -> TypeRef {
        match text {
            Some(text) => self.type_ref(text, scope, owner, errors),
            None => {
                errors.push(LoadError::new(
                    LoadErrorKind::MissingValue,
                    owner,
                    format!("{} has no type", what),
                ));
                TypeRef::unresolved("")
            }
        }
    }

    fn classify(&self, name: &TypeName, scope: &Scope) -> TypeRef {
        let ty = match &name.kind {
            TypeNameKind::Tuple(elements) => TypeRef::tuple(
                elements
                    .iter()
                    .map(|(ty, element)| {
                        TupleTypeParameter::new(element.clone(), self.classify(ty, scope))
                    })
                    .collect(),
            ),
            TypeNameKind::Named { name: dotted, arguments } => {
                let arguments: Vec<TypeRef> =
                    arguments.iter().map(|a| self.classify(a, scope)).collect();
                let well_known = if arguments.is_empty() {
                    WellKnownType::lookup(dotted)
                } else {
                    None
                };
                if arguments.is_empty() && scope.is_generic(dotted) {
                    TypeRef::placeholder(dotted.as_str())
                } else if let Some(kind) = well_known {
                    TypeRef::well_known(kind)
                } else if let Some(declaration) = self.lookup(dotted, arguments.len(), scope) {
                    let ty = TypeRef::named(
                        declaration.namespace.as_str(),
                        declaration.name.as_str(),
                    )
                    .with_arguments(arguments)
                    .with_flags(declaration.kind.type_flags());
                    // Arrays never name a definition.
                    if name.array_rank == 0 {
                        ty.with_definition(declaration.path.clone())
                    } else {
                        ty
                    }
                } else {
                    let (namespace, simple) =
                        dotted.rsplit_once('.').unwrap_or(("", dotted.as_str()));
                    TypeRef::named(namespace, simple).with_arguments(arguments)
                }
            }
        };
        let ty = if name.nullable { ty.into_nullable() } else { ty };
        if name.array_rank > 0 {
            ty.into_array(name.array_rank)
        } else {
            ty
        }
    }

    /// A base class, base record or inherited interface reference.
    ///
    /// References into the unit must name the expected kind. References outside it must be
    /// well-known or listed as externals; anything else is unresolved.
    fn reference(
        &self,
        text: &str,
        expected: DeclKind,
        role: &str,
        scope: &Scope,
        owner: &LookupPath,
        errors: &mut Vec<LoadError>,
    ) -> TypeRef {
        let parsed = match TypeName::parse(text) {
            Ok(parsed) => parsed,
            Err(err) => {
                errors.push(LoadError::new(LoadErrorKind::MalformedType, owner, err.to_string()));
                return TypeRef::unresolved(text.trim());
            }
        };
        let ty = self.classify(&parsed, scope);
        if let Some(name) = parsed.name() {
            if let Some(declaration) = self.lookup(name, parsed.arguments().len(), scope) {
                if declaration.kind != expected {
                    errors.push(LoadError::new(
                        LoadErrorKind::KindMismatch,
                        owner,
                        format!(
                            "{} '{}' is a {}, expected {}",
                            role,
                            text.trim(),
                            declaration.kind.describe(),
                            expected.describe()
                        ),
                    ));
                }
                return ty;
            }
            if ty.is_well_known() || self.is_external(name, scope) {
                return ty;
            }
        }
        errors.push(LoadError::new(
            LoadErrorKind::UnresolvedReference,
            owner,
            format!("{} '{}' not found", role, text.trim()),
        ));
        TypeRef::unresolved(text.trim())
    }

    // Shared pieces.

    fn generic_parameters(
        &self,
        owner: &LookupPath,
        specs: &[GenericParameterSpec],
        scope: &Scope,
        errors: &mut Vec<LoadError>,
    ) -> Vec<GenericParameter> {
        specs
            .iter()
            .map(|spec| {
                let variance = match spec.variance.as_deref().map(str::trim) {
                    None | Some("") => Variance::Invariant,
                    Some("in") => Variance::Contravariant,
                    Some("out") => Variance::Covariant,
                    Some(other) => {
                        errors.push(LoadError::new(
                            LoadErrorKind::InvalidValue,
                            owner,
                            format!("unknown variance '{}' on '{}'", other, spec.name),
                        ));
                        Variance::Invariant
                    }
                };
                let mut special = Vec::new();
                let mut types = Vec::new();
                for constraint in &spec.constraints {
                    match SpecialConstraint::parse(constraint) {
                        Some(c) => special.push(c),
                        None => types.push(self.type_ref(constraint, scope, owner, errors)),
                    }
                }
                GenericParameter::new(owner, spec.name.as_str())
                    .with_variance(variance)
                    .with_constraints(special, types)
            })
            .collect()
    }

    fn attributes(
        &self,
        owner: &LookupPath,
        specs: &[AttributeSpec],
        scope: &Scope,
    ) -> Vec<Attribute> {
        specs
            .iter()
            .map(|spec| {
                let short = spec
                    .name
                    .strip_suffix("Attribute")
                    .filter(|n| !n.is_empty())
                    .unwrap_or(&spec.name);
                let path = owner.child(&format!("[{}]", short));
                let mut errors = Vec::new();
                if spec.name.trim().is_empty() {
                    errors.push(LoadError::new(
                        LoadErrorKind::MissingValue,
                        &path,
                        "attribute has no name",
                    ));
                }
                let parameters: Vec<AttributeParameter> = spec
                    .arguments
                    .iter()
                    .enumerate()
                    .map(|(index, argument)| {
                        let value =
                            self.attribute_value(&argument.value, scope, &path, &mut errors);
                        AttributeParameter::new(&path, index, argument.name.clone(), value)
                    })
                    .collect();
                let info = ModelInfo::new(ModelKind::Attribute, path.clone())
                    .with_parent(owner.clone())
                    .from_document(self.document())
                    .with_errors(errors);
                Attribute::new(info, spec.name.as_str(), spec.namespace.clone().unwrap_or_default())
                    .with_parameters(parameters)
            })
            .collect()
    }

    fn attribute_value(
        &self,
        spec: &ArgumentValueSpec,
        scope: &Scope,
        owner: &LookupPath,
        errors: &mut Vec<LoadError>,
    ) -> AttributeValue {
        match spec {
            ArgumentValueSpec::Null => AttributeValue::Null,
            ArgumentValueSpec::Bool(b) => AttributeValue::Boolean(*b),
            ArgumentValueSpec::Integer(n) => AttributeValue::Number(n.to_string()),
            ArgumentValueSpec::Float(n) => AttributeValue::Number(n.to_string()),
            ArgumentValueSpec::Text(s) => AttributeValue::String(s.clone()),
            ArgumentValueSpec::List(items) => AttributeValue::Array(
                items
                    .iter()
                    .map(|item| self.attribute_value(item, scope, owner, errors))
                    .collect(),
            ),
            ArgumentValueSpec::Special(SpecialValueSpec::Typeof(text)) => {
                AttributeValue::TypeOf(self.type_ref(text, scope, owner, errors))
            }
            ArgumentValueSpec::Special(SpecialValueSpec::Enum(text)) => match text
                .rsplit_once('.')
            {
                Some((enum_type, member)) => AttributeValue::EnumMember {
                    enum_type: enum_type.to_string(),
                    member: member.to_string(),
                },
                None => {
                    errors.push(LoadError::new(
                        LoadErrorKind::InvalidValue,
                        owner,
                        format!("enum argument '{}' is not of the form Type.Member", text),
                    ));
                    AttributeValue::Expression(text.clone())
                }
            },
            ArgumentValueSpec::Special(SpecialValueSpec::Expression(text)) => {
                AttributeValue::Expression(text.clone())
            }
        }
    }

    /// Classified parameter types and passing modifiers, needed before the owner's path is known.
    fn signature(
        &self,
        specs: &[ParameterSpec],
        scope: &Scope,
        owner: &LookupPath,
        errors: &mut Vec<LoadError>,
    ) -> Vec<(TypeRef, ParameterModifier)> {
        specs
            .iter()
            .map(|spec| {
                let ty = self.type_ref(&spec.type_name, scope, owner, errors);
                let modifier = match spec.modifier.as_deref() {
                    None => ParameterModifier::None,
                    Some(text) => ParameterModifier::parse(text).unwrap_or_else(|| {
                        errors.push(LoadError::new(
                            LoadErrorKind::InvalidValue,
                            owner,
                            format!("unknown parameter modifier '{}' on '{}'", text, spec.name),
                        ));
                        ParameterModifier::None
                    }),
                };
                (ty, modifier)
            })
            .collect()
    }

    fn parameters(
        &self,
        owner: &LookupPath,
        specs: &[ParameterSpec],
        signature: &[(TypeRef, ParameterModifier)],
        scope: &Scope,
    ) -> Vec<Parameter> {
        specs
            .iter()
            .zip(signature)
            .map(|(spec, (ty, modifier))| {
                Parameter::new(owner, spec.name.as_str(), ty.clone())
                    .with_modifier(*modifier)
                    .with_default(spec.default.clone())
                    .with_attributes(self.attributes(
                        &owner.child(&spec.name),
                        &spec.attributes,
                        scope,
                    ))
            })
            .collect()
    }

    // Declarations.

    fn build_using(
        &self,
        spec: &UsingSpec,
        registry: &mut Registry,
        errors: &mut Vec<LoadError>,
    ) -> Option<LookupPath> {
        if spec.namespace.trim().is_empty() {
            errors.push(LoadError::new(
                LoadErrorKind::MissingValue,
                &self.source_path,
                "using statement has no namespace",
            ));
            return None;
        }
        let key = match (&spec.alias, spec.is_static) {
            (Some(alias), _) => format!("{}={}", alias, spec.namespace),
            (None, true) => format!("static {}", spec.namespace),
            (None, false) => spec.namespace.clone(),
        };
        let path = LookupPath::new(format!("using:{}", key));
        if !registry.claim(&path) {
            errors.push(LoadError::new(
                LoadErrorKind::DuplicatePath,
                &self.source_path,
                format!("duplicate using '{}'", key),
            ));
            return None;
        }
        let info = ModelInfo::new(ModelKind::UsingStatement, path.clone())
            .with_parent(self.source_path.clone())
            .from_document(self.document());
        let using = UsingStatement::new(info, spec.namespace.as_str())
            .with_alias(spec.alias.clone())
            .with_static(spec.is_static)
            .with_global(spec.is_global);
        registry.push("usings", using);
        Some(path)
    }

    /// Reserve the path of a named declaration, recording problems against its owner.
    fn claim_declaration(
        &self,
        what: &str,
        name: &str,
        path: &LookupPath,
        parent: Option<&LookupPath>,
        registry: &mut Registry,
        owner_errors: &mut Vec<LoadError>,
    ) -> bool {
        let owner = parent.unwrap_or(&self.source_path);
        if name.trim().is_empty() {
            owner_errors.push(LoadError::new(
                LoadErrorKind::MissingValue,
                owner,
                format!("{} declaration has no name", what),
            ));
            return false;
        }
        if !registry.claim(path) {
            owner_errors.push(LoadError::new(
                LoadErrorKind::DuplicatePath,
                owner,
                format!("duplicate declaration of '{}'", path),
            ));
            return false;
        }
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn build_container(
        &self,
        kind: ContainerKind,
        spec: &ContainerSpec,
        parent: Option<&LookupPath>,
        namespace: &str,
        scope: &Scope,
        registry: &mut Registry,
        owner_errors: &mut Vec<LoadError>,
    ) -> Option<Built> {
        let path = declaration_path(parent, namespace, &spec.name, spec.generic_parameters.len());
        let keyword = kind.keyword();
        if !self.claim_declaration(keyword, &spec.name, &path, parent, registry, owner_errors) {
            return None;
        }

        let scope = scope.enter(namespace, &spec.generic_parameters);
        let mut errors = Vec::new();
        let generic_parameters =
            self.generic_parameters(&path, &spec.generic_parameters, &scope, &mut errors);
        let default_security = if parent.is_some() {
            Security::Private
        } else {
            Security::Internal
        };
        let security =
            parse_security(spec.security.as_deref(), default_security, &path, &mut errors);
        let keywords = parse_keywords(&spec.keywords, &path, &mut errors);

        let base = match (spec.base.as_deref(), kind) {
            (None, _) => None,
            (Some(text), ContainerKind::Class) => Some(self.reference(
                text,
                DeclKind::Container(ContainerKind::Class),
                "base class",
                &scope,
                &path,
                &mut errors,
            )),
            (Some(text), ContainerKind::Record) => Some(self.reference(
                text,
                DeclKind::Container(ContainerKind::Record),
                "base record",
                &scope,
                &path,
                &mut errors,
            )),
            (Some(_), _) => {
                errors.push(LoadError::new(
                    LoadErrorKind::KindMismatch,
                    &path,
                    format!("{} '{}' cannot declare a base type", kind.keyword(), spec.name),
                ));
                None
            }
        };
        let interfaces: Vec<TypeRef> = spec
            .interfaces
            .iter()
            .map(|text| {
                self.reference(
                    text,
                    DeclKind::Container(ContainerKind::Interface),
                    "interface",
                    &scope,
                    &path,
                    &mut errors,
                )
            })
            .collect();
        let interfaces: Vec<TypeRef> = interfaces
            .into_iter()
            .filter(|ty| !names_itself(ty, &path, "interface", &mut errors))
            .collect();
        let base = base.filter(|ty| !names_itself(ty, &path, "base type", &mut errors));
        let members = self.members(&path, &spec.name, kind, &spec.members, &scope, &mut errors);

        let mut nested_models = Vec::new();
        let mut nested_errors = false;
        if !spec.nested.is_empty() {
            if matches!(kind, ContainerKind::Class | ContainerKind::Structure) {
                let mut add = |built: Option<Built>| {
                    if let Some(built) = built {
                        nested_errors |= built.has_errors;
                        nested_models.push(built.path);
                    }
                };
                for (nested_kind, specs) in spec.nested.container_groups() {
                    for nested in specs {
                        add(self.build_container(
                            nested_kind,
                            nested,
                            Some(&path),
                            namespace,
                            &scope,
                            registry,
                            &mut errors,
                        ));
                    }
                }
                for nested in &spec.nested.enums {
                    add(self.build_enum(nested, Some(&path), namespace, registry, &mut errors));
                }
                for nested in &spec.nested.delegates {
                    add(self.build_delegate(
                        nested,
                        Some(&path),
                        namespace,
                        &scope,
                        registry,
                        &mut errors,
                    ));
                }
            } else {
                errors.push(LoadError::new(
                    LoadErrorKind::KindMismatch,
                    &path,
                    format!(
                        "{} '{}' cannot contain nested declarations",
                        kind.keyword(),
                        spec.name
                    ),
                ));
            }
        }

        let data = match kind {
            ContainerKind::Class => ContainerData::Class {
                base_class: base,
                nested_models,
            },
            ContainerKind::Structure => ContainerData::Structure { nested_models },
            ContainerKind::Record => ContainerData::Record { base_record: base },
            ContainerKind::Interface => ContainerData::Interface,
            ContainerKind::RecordStructure => ContainerData::RecordStructure,
        };
        let attributes = self.attributes(&path, &spec.attributes, &scope);
        let info = ModelInfo::new(ModelKind::Container, path.clone())
            .with_parent(parent.cloned().unwrap_or_else(|| self.top_level_parent(namespace)))
            .from_document(self.document())
            .with_errors(errors)
            .with_descendant_errors(nested_errors);
        let container = Container::new(info, spec.name.as_str(), namespace, data)
            .with_security(security)
            .with_keywords(keywords)
            .with_documentation(spec.documentation.clone())
            .with_attributes(attributes)
            .with_generic_parameters(generic_parameters)
            .with_interfaces(interfaces)
            .with_members(members);

        let has_errors = container.has_errors();
        let category = if parent.is_some() { "nested" } else { category(kind) };
        tracing::trace!(path = %path, members = container.members().len(), "built container");
        registry.push(category, container);
        Some(Built { path, has_errors })
    }

    fn build_enum(
        &self,
        spec: &EnumSpec,
        parent: Option<&LookupPath>,
        namespace: &str,
        registry: &mut Registry,
        owner_errors: &mut Vec<LoadError>,
    ) -> Option<Built> {
        let path = declaration_path(parent, namespace, &spec.name, 0);
        if !self.claim_declaration("enum", &spec.name, &path, parent, registry, owner_errors) {
            return None;
        }

        let scope = Scope {
            namespace: namespace.to_string(),
            generics: Vec::new(),
        };
        let mut errors = Vec::new();
        let default_security = if parent.is_some() {
            Security::Private
        } else {
            Security::Internal
        };
        let security =
            parse_security(spec.security.as_deref(), default_security, &path, &mut errors);
        let underlying = spec.underlying.as_deref().map(|text| {
            let ty = self.type_ref(text, &scope, &path, &mut errors);
            if ty.is_loaded() && !ty.well_known_type().is_some_and(is_integral) {
                errors.push(LoadError::new(
                    LoadErrorKind::KindMismatch,
                    &path,
                    format!("underlying type '{}' is not an integral type", text.trim()),
                ));
            }
            ty
        });

        let mut names = FxHashSet::default();
        let mut values = Vec::new();
        for value in &spec.values {
            if value.name.trim().is_empty() {
                errors.push(LoadError::new(
                    LoadErrorKind::MissingValue,
                    &path,
                    "enum value has no name",
                ));
                continue;
            }
            if !names.insert(value.name.as_str()) {
                errors.push(LoadError::new(
                    LoadErrorKind::DuplicatePath,
                    &path,
                    format!("duplicate enum value '{}'", value.name),
                ));
                continue;
            }
            let value_path = path.child(&value.name);
            values.push(
                EnumValue::new(&path, value.name.as_str(), value.value.clone())
                    .with_documentation(value.documentation.clone())
                    .with_attributes(self.attributes(&value_path, &value.attributes, &scope)),
            );
        }

        let attributes = self.attributes(&path, &spec.attributes, &scope);
        let info = ModelInfo::new(ModelKind::Enum, path.clone())
            .with_parent(parent.cloned().unwrap_or_else(|| self.top_level_parent(namespace)))
            .from_document(self.document())
            .with_errors(errors);
        let model = EnumModel::new(info, spec.name.as_str(), namespace)
            .with_security(security)
            .with_documentation(spec.documentation.clone())
            .with_attributes(attributes)
            .with_underlying_type(underlying)
            .with_values(values);

        let has_errors = model.has_errors();
        registry.push(if parent.is_some() { "nested" } else { "enums" }, model);
        Some(Built { path, has_errors })
    }

    fn build_delegate(
        &self,
        spec: &DelegateSpec,
        parent: Option<&LookupPath>,
        namespace: &str,
        scope: &Scope,
        registry: &mut Registry,
        owner_errors: &mut Vec<LoadError>,
    ) -> Option<Built> {
        let path = declaration_path(parent, namespace, &spec.name, spec.generic_parameters.len());
        if !self.claim_declaration("delegate", &spec.name, &path, parent, registry, owner_errors) {
            return None;
        }

        let scope = scope.enter(namespace, &spec.generic_parameters);
        let mut errors = Vec::new();
        let default_security = if parent.is_some() {
            Security::Private
        } else {
            Security::Internal
        };
        let security =
            parse_security(spec.security.as_deref(), default_security, &path, &mut errors);
        let generic_parameters =
            self.generic_parameters(&path, &spec.generic_parameters, &scope, &mut errors);
        let returns = spec.returns.as_deref().unwrap_or("void");
        let return_type = self.type_ref(returns, &scope, &path, &mut errors);
        let signature = self.signature(&spec.parameters, &scope, &path, &mut errors);
        let parameters = self.parameters(&path, &spec.parameters, &signature, &scope);
        let attributes = self.attributes(&path, &spec.attributes, &scope);

        let info = ModelInfo::new(ModelKind::Delegate, path.clone())
            .with_parent(parent.cloned().unwrap_or_else(|| self.top_level_parent(namespace)))
            .from_document(self.document())
            .with_errors(errors);
        let delegate = Delegate::new(info, spec.name.as_str(), namespace, return_type)
            .with_security(security)
            .with_documentation(spec.documentation.clone())
            .with_attributes(attributes)
            .with_generic_parameters(generic_parameters)
            .with_parameters(parameters);

        let has_errors = delegate.has_errors();
        registry.push(if parent.is_some() { "nested" } else { "delegates" }, delegate);
        Some(Built { path, has_errors })
    }

    // Members.

    fn members(
        &self,
        owner: &LookupPath,
        owner_name: &str,
        owner_kind: ContainerKind,
        specs: &[MemberSpec],
        scope: &Scope,
        errors: &mut Vec<LoadError>,
    ) -> Vec<Member> {
        let mut claimed: FxHashSet<LookupPath> = FxHashSet::default();
        let mut members = Vec::new();
        for spec in specs {
            let group = self.member(owner, owner_name, owner_kind, spec, scope);
            let Some(primary) = group.first() else {
                errors.push(LoadError::new(
                    LoadErrorKind::MissingValue,
                    owner,
                    format!("{:?} member has no name", spec.kind).to_lowercase(),
                ));
                continue;
            };
            if !claimed.insert(primary.lookup_path().clone()) {
                errors.push(LoadError::new(
                    LoadErrorKind::DuplicatePath,
                    owner,
                    format!("duplicate member '{}'", primary.lookup_path()),
                ));
                continue;
            }
            claimed.extend(group.iter().skip(1).map(|m| m.lookup_path().clone()));
            members.extend(group);
        }
        members
    }

    /// Build one member entry: the member itself followed by any accessor methods.
    /// Empty when the entry has no usable name.
    fn member(
        &self,
        owner: &LookupPath,
        owner_name: &str,
        owner_kind: ContainerKind,
        spec: &MemberSpec,
        scope: &Scope,
    ) -> Vec<Member> {
        let name = match spec.kind {
            MemberSpecKind::Constructor => owner_name.to_string(),
            MemberSpecKind::Destructor => format!("~{}", owner_name),
            MemberSpecKind::Indexer => "this[]".to_string(),
            _ => spec.name.trim().to_string(),
        };
        if name.is_empty() {
            return Vec::new();
        }

        let in_interface = owner_kind == ContainerKind::Interface;
        // Errors are recorded against this path and re-pointed once the final path is known.
        let provisional = owner.child(&name);
        let mut errors = Vec::new();
        let default_security = if in_interface {
            Security::Public
        } else {
            Security::Private
        };
        let security =
            parse_security(spec.security.as_deref(), default_security, &provisional, &mut errors);
        let keywords = parse_keywords(&spec.keywords, &provisional, &mut errors);
        let bodiless = keywords.intersects(Keywords::ABSTRACT | Keywords::EXTERN);
        let has_body = spec.body.unwrap_or(!in_interface && !bodiless);
        let accessor = Accessor {
            owner,
            document: self.document(),
            security,
            keywords,
            has_body,
        };

        let (path, data, accessors) = match spec.kind {
            MemberSpecKind::Field => {
                let ty = self.required_type(
                    spec.type_name.as_deref(),
                    "field",
                    scope,
                    &provisional,
                    &mut errors,
                );
                let mut field = Field::new(ty);
                field.is_constant = keywords.contains(Keywords::CONST);
                field.default_value = spec.value.clone();
                (provisional.clone(), MemberData::Field(field), Vec::new())
            }
            MemberSpecKind::Property | MemberSpecKind::Indexer => {
                let ty = self.required_type(
                    spec.type_name.as_deref(),
                    "property",
                    scope,
                    &provisional,
                    &mut errors,
                );
                let is_indexer = spec.kind == MemberSpecKind::Indexer;
                let signature = if is_indexer {
                    self.signature(&spec.parameters, scope, &provisional, &mut errors)
                } else {
                    Vec::new()
                };
                let path = if is_indexer {
                    owner.child(&format!("this[{}]", signature_types(&signature)))
                } else {
                    provisional.clone()
                };
                let accessor_name = if is_indexer { "Item" } else { name.as_str() };

                let mut property = Property::new(ty.clone());
                property.parameters = self.parameters(&path, &spec.parameters, &signature, scope);
                let mut accessors = Vec::new();
                let requested = spec
                    .accessors
                    .clone()
                    .unwrap_or_else(|| vec!["get".to_string(), "set".to_string()]);
                for requested in requested {
                    match requested.trim() {
                        "get" if property.get_method.is_none() => {
                            let get_path = path.child("get");
                            let mut method = Method::new(MethodKind::Get, ty.clone());
                            method.parameters =
                                self.parameters(&get_path, &spec.parameters, &signature, scope);
                            let name = format!("get_{}", accessor_name);
                            accessors.push(accessor.method(&get_path, name, method));
                            property.get_method = Some(get_path);
                        }
                        word @ ("set" | "init") if property.set_method.is_none() => {
                            let set_path = path.child("set");
                            let void = TypeRef::well_known(WellKnownType::Void);
                            let mut method = Method::new(MethodKind::Set, void);
                            method.parameters =
                                self.parameters(&set_path, &spec.parameters, &signature, scope);
                            method.parameters.push(Parameter::new(&set_path, "value", ty.clone()));
                            let name = format!("set_{}", accessor_name);
                            accessors.push(accessor.method(&set_path, name, method));
                            property.set_method = Some(set_path);
                            property.is_init_only = word == "init";
                        }
                        "get" | "set" | "init" => {}
                        other => errors.push(LoadError::new(
                            LoadErrorKind::InvalidValue,
                            &provisional,
                            format!("unknown property accessor '{}'", other),
                        )),
                    }
                }
                (path, MemberData::Property(property), accessors)
            }
            MemberSpecKind::Method | MemberSpecKind::Constructor | MemberSpecKind::Destructor => {
                let (method_kind, generics) = match spec.kind {
                    MemberSpecKind::Constructor => (MethodKind::Constructor, &[][..]),
                    MemberSpecKind::Destructor => (MethodKind::Destructor, &[][..]),
                    _ => (MethodKind::Member, spec.generic_parameters.as_slice()),
                };
                let scope = scope.enter(&scope.namespace, generics);
                let return_type = match method_kind {
                    MethodKind::Member => {
                        let returns = spec.returns.as_deref().unwrap_or("void");
                        self.type_ref(returns, &scope, &provisional, &mut errors)
                    }
                    _ => TypeRef::well_known(WellKnownType::Void),
                };
                let signature = self.signature(&spec.parameters, &scope, &provisional, &mut errors);
                let segment = if generics.is_empty() {
                    format!("{}({})", name, signature_types(&signature))
                } else {
                    format!("{}`{}({})", name, generics.len(), signature_types(&signature))
                };
                let path = owner.child(&segment);

                let mut method = Method::new(method_kind, return_type);
                method.generic_parameters =
                    self.generic_parameters(&path, generics, &scope, &mut errors);
                method.parameters = self.parameters(&path, &spec.parameters, &signature, &scope);
                method.has_body = has_body;
                (path, MemberData::Method(method), Vec::new())
            }
            MemberSpecKind::Event => {
                let ty = self.required_type(
                    spec.type_name.as_deref(),
                    "event",
                    scope,
                    &provisional,
                    &mut errors,
                );
                let path = provisional.clone();
                let mut event = Event::new(ty.clone());
                if ty.is_delegate() {
                    event.handler_delegate = ty.definition_path();
                }

                let mut accessors = Vec::new();
                let mut add_accessor = |kind: MethodKind, prefix: &str| {
                    let accessor_path = path.child(prefix);
                    let mut method = Method::new(kind, TypeRef::well_known(WellKnownType::Void));
                    if kind != MethodKind::Raise {
                        method.parameters =
                            vec![Parameter::new(&accessor_path, "value", ty.clone())];
                    }
                    let accessor_name = format!("{}_{}", prefix, name);
                    accessors.push(accessor.method(&accessor_path, accessor_name, method));
                    accessor_path
                };
                event.add_method = Some(add_accessor(MethodKind::Add, "add"));
                event.remove_method = Some(add_accessor(MethodKind::Remove, "remove"));
                let requested = spec.accessors.as_deref().unwrap_or_default();
                for word in requested {
                    match word.trim() {
                        "raise" => {
                            event.raise_method = Some(add_accessor(MethodKind::Raise, "raise"))
                        }
                        "add" | "remove" => {}
                        other => errors.push(LoadError::new(
                            LoadErrorKind::InvalidValue,
                            &provisional,
                            format!("unknown event accessor '{}'", other),
                        )),
                    }
                }
                (path, MemberData::Event(event), accessors)
            }
        };

        for error in &mut errors {
            error.path = path.clone();
        }
        let info = ModelInfo::new(ModelKind::Member, path.clone())
            .with_parent(owner.clone())
            .from_document(self.document())
            .with_errors(errors);
        let member = Member::new(info, name, data)
            .with_security(security)
            .with_keywords(keywords)
            .with_documentation(spec.documentation.clone())
            .with_attributes(self.attributes(&path, &spec.attributes, scope));

        let mut group = Vec::with_capacity(accessors.len() + 1);
        group.push(member);
        group.extend(accessors);
        group
    }
}

/// Shared state of synthesized accessor methods.
struct Accessor<'a> {
    owner: &'a LookupPath,
    document: Option<PathBuf>,
    security: Security,
    keywords: Keywords,
    has_body: bool,
}

impl Accessor<'_> {
    fn method(&self, path: &LookupPath, name: String, mut method: Method) -> Member {
        method.has_body = self.has_body;
        let info = ModelInfo::new(ModelKind::Member, path.clone())
            .with_parent(self.owner.clone())
            .from_document(self.document.clone());
        Member::new(info, name, MemberData::Method(method))
            .with_security(self.security)
            .with_keywords(self.keywords)
    }
}

/// Build a graph from a manifest.
pub fn build_source(manifest: &SourceManifest) -> SourceGraph {
    SourceBuilder::new(manifest).build()
}

/// Lookup path of a named declaration: `Namespace.Name`, or `Parent.Name` when nested,
/// with `` `N `` appended for generic arity.
fn declaration_path(
    parent: Option<&LookupPath>,
    namespace: &str,
    name: &str,
    arity: usize,
) -> LookupPath {
    let segment = arity_name(name.trim(), arity);
    match parent {
        Some(parent) => parent.child(&segment),
        None if namespace.is_empty() => LookupPath::new(segment),
        None => LookupPath::new(format!("{}.{}", namespace, segment)),
    }
}

fn arity_name(name: &str, arity: usize) -> String {
    if arity == 0 {
        name.to_string()
    } else {
        format!("{}`{}", name, arity)
    }
}

/// Parameter types as they appear in a member path: `double,ref int`.
fn signature_types(signature: &[(TypeRef, ParameterModifier)]) -> String {
    signature
        .iter()
        .map(|(ty, modifier)| {
            if modifier.affects_signature() {
                format!("{} {}", modifier.keyword(), ty)
            } else {
                ty.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn record_namespace(
    namespaces: &mut Vec<(String, Vec<LookupPath>)>,
    namespace: &str,
    path: &LookupPath,
) {
    if namespace.is_empty() {
        return;
    }
    match namespaces.iter_mut().find(|(name, _)| name == namespace) {
        Some((_, models)) => models.push(path.clone()),
        None => namespaces.push((namespace.to_string(), vec![path.clone()])),
    }
}

fn parse_security(
    text: Option<&str>,
    default: Security,
    path: &LookupPath,
    errors: &mut Vec<LoadError>,
) -> Security {
    match text {
        None => default,
        Some(text) => text.parse().unwrap_or_else(|message: String| {
            errors.push(LoadError::new(LoadErrorKind::InvalidValue, path, message));
            default
        }),
    }
}

fn parse_keywords(words: &[String], path: &LookupPath, errors: &mut Vec<LoadError>) -> Keywords {
    let mut keywords = Keywords::empty();
    for word in words {
        match Keywords::from_keyword(word) {
            Some(keyword) => keywords |= keyword,
            None => errors.push(LoadError::new(
                LoadErrorKind::InvalidValue,
                path,
                format!("unknown modifier '{}'", word),
            )),
        }
    }
    keywords
}

/// Record a container listing itself as its own base or interface.
fn names_itself(ty: &TypeRef, path: &LookupPath, role: &str, errors: &mut Vec<LoadError>) -> bool {
    if ty.definition_path().as_ref() != Some(path) {
        return false;
    }
    errors.push(LoadError::new(
        LoadErrorKind::InvalidValue,
        path,
        format!("{} '{}' is the declaring type itself", role, ty),
    ));
    true
}

fn is_integral(kind: WellKnownType) -> bool {
    matches!(
        kind,
        WellKnownType::SByte
            | WellKnownType::Byte
            | WellKnownType::Int16
            | WellKnownType::UInt16
            | WellKnownType::Int32
            | WellKnownType::UInt32
            | WellKnownType::Int64
            | WellKnownType::UInt64
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::source_missing_interface_members;
    use crate::model::{HasAttributes, ModelRef};

    fn build(yaml: &str) -> SourceGraph {
        let manifest = SourceManifest::from_yaml_str(yaml).unwrap();
        build_source(&manifest)
    }

    const SHAPES: &str = r#"
name: shapes
namespace: Geometry
usings:
  - namespace: System
interfaces:
  - name: IShape
    security: public
    members:
      - kind: method
        name: Area
        returns: double
      - kind: property
        name: Name
        type: string
        accessors: [get]
classes:
  - name: Circle
    security: public
    interfaces: [IShape]
    members:
      - kind: field
        name: _radius
        type: double
      - kind: property
        name: Name
        type: string
        security: public
        accessors: [get]
      - kind: constructor
        security: public
        parameters:
          - name: radius
            type: double
"#;

    #[test]
    fn test_paths_and_categories() {
        let graph = build(SHAPES);
        let store = graph.store();

        for path in [
            "source:shapes",
            "using:System",
            "namespace:Geometry",
            "Geometry.IShape",
            "Geometry.IShape.Area()",
            "Geometry.IShape.Name",
            "Geometry.IShape.Name.get",
            "Geometry.Circle",
            "Geometry.Circle._radius",
            "Geometry.Circle.Circle(double)",
        ] {
            assert!(store.contains(path), "missing {path}");
        }
        assert!(!store.contains("Geometry.IShape.Name.set"));

        let categories: Vec<&str> = store.category_names().collect();
        for expected in ["usings", "namespaces", "interfaces", "classes"] {
            assert!(categories.contains(&expected), "missing category {expected}");
        }
        assert_eq!(graph.source().classes(store).count(), 1);
        assert_eq!(graph.source().interfaces(store).count(), 1);
        assert!(!graph.has_errors());
        assert!(graph.load_errors().is_empty());
    }

    #[test]
    fn test_missing_interface_member_end_to_end() {
        let graph = build(SHAPES);
        let gaps = source_missing_interface_members(graph.store(), graph.source());

        assert_eq!(gaps.len(), 1);
        let circle = gaps.get("Geometry.Circle").unwrap();
        assert_eq!(circle.missing.len(), 1);
        assert_eq!(circle.missing[0].lookup_path().as_str(), "Geometry.IShape.Area()");
    }

    #[test]
    fn test_defaults() {
        let graph = build(SHAPES);
        let store = graph.store();

        let area = store.member("Geometry.IShape.Area()").unwrap();
        assert_eq!(area.security(), Security::Public);
        assert!(!area.as_method().unwrap().has_body);

        let radius = store.member("Geometry.Circle._radius").unwrap();
        assert_eq!(radius.security(), Security::Private);

        let ctor = store.member("Geometry.Circle.Circle(double)").unwrap();
        assert!(ctor.as_method().unwrap().is_constructor());
        assert!(ctor.as_method().unwrap().has_body);
        assert_eq!(ctor.parent_container(store).unwrap().name(), "Circle");

        let shape = store.container("Geometry.IShape").unwrap();
        assert_eq!(shape.parent_path().unwrap().as_str(), "namespace:Geometry");
        assert!(shape.parent(store).unwrap().as_namespace().is_some());
    }

    #[test]
    fn test_accessor_synthesis() {
        let graph = build(
            r#"
name: events
namespace: App
delegates:
  - name: ChangedHandler
    security: public
    parameters:
      - { name: sender, type: object }
classes:
  - name: Widget
    members:
      - kind: property
        name: Size
        type: int
        security: public
        accessors: [get, init]
      - kind: indexer
        type: string
        parameters:
          - { name: index, type: int }
      - kind: event
        name: Changed
        type: ChangedHandler
        accessors: [raise]
"#,
        );
        let store = graph.store();
        assert!(!graph.has_errors(), "{:?}", graph.load_errors());

        let size = store.member("App.Widget.Size").unwrap();
        let property = size.as_property().unwrap();
        assert!(property.is_init_only);
        let get = property.get_model(store).unwrap();
        assert_eq!(get.name(), "get_Size");
        assert_eq!(get.method_kind(), Some(MethodKind::Get));
        assert_eq!(get.security(), Security::Public);
        let set = property.set_model(store).unwrap();
        assert_eq!(set.lookup_path().as_str(), "App.Widget.Size.set");
        assert_eq!(set.parameters()[0].name(), "value");
        assert!(set.value_type().is_void());

        let indexer = store.member("App.Widget.this[int]").unwrap();
        let payload = indexer.as_property().unwrap();
        assert!(payload.is_indexer());
        let item_get = payload.get_model(store).unwrap();
        assert_eq!(item_get.name(), "get_Item");
        assert_eq!(item_get.parameters().len(), 1);
        assert_eq!(payload.set_model(store).unwrap().parameters().len(), 2);

        let changed = store.member("App.Widget.Changed").unwrap();
        let event = changed.as_event().unwrap();
        assert_eq!(event.handler_model(store).unwrap().name(), "ChangedHandler");
        assert_eq!(event.add_model(store).unwrap().name(), "add_Changed");
        assert_eq!(event.remove_model(store).unwrap().name(), "remove_Changed");
        assert!(event.raise_model(store).unwrap().parameters().is_empty());

        let widget = store.container("App.Widget").unwrap();
        assert_eq!(widget.properties().count(), 2);
        assert_eq!(widget.events().count(), 1);
        assert_eq!(widget.methods().count(), 0);
    }

    #[test]
    fn test_type_classification() {
        let graph = build(
            r#"
name: data
namespace: Data
usings:
  - namespace: System.Collections.Generic
structures:
  - name: Point
enums:
  - name: Color
    underlying: byte
    values:
      - { name: Red, value: "1" }
      - { name: Green }
interfaces:
  - name: IRepository
    generic_parameters: [{ name: T, variance: out }]
classes:
  - name: Repository
    generic_parameters:
      - name: T
        constraints: [class, "new()"]
    interfaces: ["IRepository<T>"]
    members:
      - { kind: field, name: items, type: "List<T>" }
      - { kind: field, name: color, type: Color }
      - { kind: field, name: origin, type: "Point?" }
      - { kind: field, name: grid, type: "Point[,]" }
      - { kind: field, name: pair, type: "(int x, string y)" }
      - { kind: field, name: count, type: System.Int32 }
"#,
        );
        let store = graph.store();
        assert!(!graph.has_errors(), "{:?}", graph.load_errors());

        let repository = store.container("Data.Repository`1").unwrap();
        assert!(repository.is_generic());
        let iface = &repository.inherited_interfaces()[0];
        assert_eq!(iface.definition_path().unwrap().as_str(), "Data.IRepository`1");
        assert!(iface.generic_arguments()[0].is_generic_placeholder());
        assert_eq!(repository.interface_models(store).count(), 1);

        let field_type = |name: &str| {
            repository
                .members_named(name)
                .next()
                .unwrap()
                .value_type()
                .clone()
        };

        let items = field_type("items");
        assert_eq!(items.namespace(), "");
        assert_eq!(items.name(), "List");
        assert!(items.generic_arguments()[0].is_generic_placeholder());

        let color = field_type("color");
        assert!(color.is_enum());
        assert!(color.is_value_type());
        assert_eq!(color.enum_model(store).unwrap().values().len(), 2);

        let origin = field_type("origin");
        assert!(origin.is_nullable());
        assert!(origin.structure_model(store).is_some());

        let grid = field_type("grid");
        assert_eq!(grid.array_rank(), 2);
        assert!(grid.definition_path().is_none());

        assert!(field_type("pair").is_tuple());
        assert!(field_type("count").is_well_known());
        assert_eq!(field_type("count").to_string(), "int");
    }

    #[test]
    fn test_load_errors_flag_models() {
        let graph = build(
            r#"
name: broken
namespace: App
classes:
  - name: Orphan
    base: MissingBase
  - name: Confused
    interfaces: [Orphan]
  - name: Odd
    security: sometimes
    members:
      - { kind: field, name: bad, type: "List<" }
      - { kind: method, name: Run }
      - { kind: method, name: Run }
  - name: Orphan
"#,
        );
        assert!(graph.has_errors());

        let kinds: Vec<LoadErrorKind> = graph.load_errors().iter().map(|e| e.kind).collect();
        for expected in [
            LoadErrorKind::UnresolvedReference,
            LoadErrorKind::KindMismatch,
            LoadErrorKind::InvalidValue,
            LoadErrorKind::MalformedType,
            LoadErrorKind::DuplicatePath,
        ] {
            assert!(kinds.contains(&expected), "missing {expected}: {kinds:?}");
        }

        let store = graph.store();
        let orphan = store.container("App.Orphan").unwrap();
        assert!(orphan.has_errors());
        assert!(!orphan.base_type().unwrap().is_loaded());
        assert_eq!(orphan.load_errors()[0].kind, LoadErrorKind::UnresolvedReference);

        let bad = store.member("App.Odd.bad").unwrap();
        assert_eq!(bad.load_errors()[0].kind, LoadErrorKind::MalformedType);
        assert_eq!(bad.load_errors()[0].path.as_str(), "App.Odd.bad");
        assert!(store.container("App.Odd").unwrap().has_errors());

        // The duplicate top-level declaration is reported on the source.
        assert!(graph
            .source()
            .load_errors()
            .iter()
            .any(|e| e.kind == LoadErrorKind::DuplicatePath));
        assert_eq!(graph.source().classes(store).count(), 3);
    }

    #[test]
    fn test_externals_satisfy_references() {
        let graph = build(
            r#"
name: errors
namespace: App
usings:
  - namespace: System
externals: [System.Exception, "System.IEquatable<T>"]
classes:
  - name: AppException
    base: Exception
    interfaces: ["IEquatable<AppException>"]
  - name: Plain
    base: object
"#,
        );
        assert!(!graph.has_errors(), "{:?}", graph.load_errors());
        let store = graph.store();
        let app = store.container("App.AppException").unwrap();
        assert!(app.inherits_base_class(store, "Exception", None));
        assert!(app.base_model(store).is_none());
    }

    #[test]
    fn test_overloads_use_parameter_types() {
        let graph = build(
            r#"
name: overloads
classes:
  - name: Scaler
    members:
      - kind: method
        name: Scale
        parameters: [{ name: factor, type: double }]
      - kind: method
        name: Scale
        parameters: [{ name: factor, type: int, modifier: ref }]
      - kind: method
        name: Scale
        parameters: [{ name: amount, type: double }]
"#,
        );
        let store = graph.store();
        assert!(store.contains("Scaler.Scale(double)"));
        assert!(store.contains("Scaler.Scale(ref int)"));

        // Parameter names do not distinguish overloads.
        let errors = store.container("Scaler").unwrap().load_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LoadErrorKind::DuplicatePath);
        assert_eq!(store.container("Scaler").unwrap().methods().count(), 2);
    }

    #[test]
    fn test_generic_method_path() {
        let graph = build(
            r#"
name: generic
classes:
  - name: Mapper
    members:
      - kind: method
        name: Convert
        generic_parameters: [{ name: T }]
        returns: T
        parameters:
          - { name: input, type: "T[]" }
          - { name: rest, type: "object[]", modifier: params }
"#,
        );
        let store = graph.store();
        assert!(!graph.has_errors(), "{:?}", graph.load_errors());
        let convert = store.member("Mapper.Convert`1(T[],object[])").unwrap();
        assert!(convert.value_type().is_generic_placeholder());
        assert_eq!(convert.generic_parameters().len(), 1);
        assert_eq!(convert.parameters()[1].modifier(), ParameterModifier::Params);
    }

    #[test]
    fn test_nested_declarations() {
        let graph = build(
            r#"
name: nested
namespace: App
classes:
  - name: Outer
    members:
      - { kind: field, name: kind, type: Kind }
    nested:
      enums:
        - name: Kind
          values: [{ name: A }, { name: B }]
      classes:
        - name: Inner
interfaces:
  - name: IFace
    nested:
      classes:
        - name: NotAllowed
"#,
        );
        let store = graph.store();
        let outer = store.container("App.Outer").unwrap();
        let nested: Vec<&str> = outer.nested(store).map(|m| m.lookup_path().as_str()).collect();
        assert_eq!(nested, vec!["App.Outer.Inner", "App.Outer.Kind"]);

        let kind = store.get("App.Outer.Kind").unwrap();
        assert!(matches!(kind, ModelRef::Enum(_)));
        assert_eq!(kind.as_enum().unwrap().security(), Security::Private);
        let field = store.member("App.Outer.kind").unwrap();
        assert!(field.value_type().enum_model(store).is_some());

        assert_eq!(store.category("nested").count(), 2);
        assert!(!outer.has_errors());
        assert!(store.container("App.IFace").unwrap().has_errors());
    }

    #[test]
    fn test_namespaces_and_attributes() {
        let graph = build(
            r#"
name: multi
document: src/Multi.cs
classes:
  - name: A
    namespace: First
    attributes:
      - name: SerializableAttribute
      - name: Route
        arguments:
          - value: { typeof: "First.A" }
          - name: Order
            value: 2
  - name: B
    namespace: Second
  - name: Loose
enums:
  - name: Flags
    namespace: First
    attributes: [{ name: Flags }]
"#,
        );
        let store = graph.store();
        let namespaces: Vec<&str> = graph.source().namespaces(store).map(|n| n.name()).collect();
        assert_eq!(namespaces, vec!["First", "Second"]);

        let first = store.get("namespace:First").unwrap().as_namespace().unwrap();
        let members: Vec<&str> = first.models(store).map(|m| m.lookup_path().as_str()).collect();
        assert_eq!(members, vec!["First.A", "First.Flags"]);

        let loose = store.container("Loose").unwrap();
        assert_eq!(loose.parent_path().unwrap().as_str(), "source:multi");
        assert_eq!(loose.security(), Security::Internal);

        let a = store.container("First.A").unwrap();
        assert_eq!(a.source_document().unwrap().to_str(), Some("src/Multi.cs"));
        assert!(a.attribute("Serializable").is_some());
        let route = a.attribute("Route").unwrap();
        assert_eq!(route.lookup_path().as_str(), "First.A.[Route]");
        assert_eq!(route.parameters().len(), 2);
        assert_eq!(route.parameter("Order").unwrap().value(), &AttributeValue::Number("2".into()));
        match route.parameters()[0].value() {
            AttributeValue::TypeOf(ty) => {
                assert_eq!(ty.definition_path().unwrap().as_str(), "First.A")
            }
            other => panic!("expected typeof, got {:?}", other),
        }
        assert!(store.get("First.Flags").unwrap().as_enum().unwrap().is_flags());
    }

    #[test]
    fn test_enum_underlying_must_be_integral() {
        let graph = build(
            r#"
name: enums
enums:
  - name: Bad
    underlying: string
    values: [{ name: A }, { name: A }]
"#,
        );
        let errors = graph.store().get("Bad").unwrap().info().load_errors().to_vec();
        let kinds: Vec<LoadErrorKind> = errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![LoadErrorKind::KindMismatch, LoadErrorKind::DuplicatePath]);
    }

    #[test]
    fn test_attribute_errors_reach_the_graph() {
        let graph = build(
            r#"
name: marked
namespace: App
classes:
  - name: Widget
    attributes:
      - name: Marker
        arguments:
          - value: { enum: "NoDot" }
    members:
      - kind: method
        name: Run
        parameters:
          - name: mode
            type: int
            attributes: [{ name: "" }]
enums:
  - name: Mode
    values:
      - name: Fast
        attributes:
          - name: Marker
            arguments: [{ value: { enum: "AlsoNoDot" } }]
"#,
        );
        assert!(graph.has_errors());
        assert_eq!(graph.has_errors(), !graph.load_errors().is_empty());

        let mut paths: Vec<&str> = graph.load_errors().iter().map(|e| e.path.as_str()).collect();
        paths.sort_unstable();
        assert_eq!(
            paths,
            vec![
                "App.Mode.Fast.[Marker]",
                "App.Widget.Run(int).mode.[]",
                "App.Widget.[Marker]",
            ]
        );
        let store = graph.store();
        assert!(store.container("App.Widget").unwrap().load_errors().is_empty());
    }

    #[test]
    fn test_self_inheritance_is_flagged() {
        let graph = build(
            r#"
name: loops
namespace: App
interfaces:
  - name: ILoop
    interfaces: [ILoop]
classes:
  - name: Ouroboros
    base: Ouroboros
"#,
        );
        let store = graph.store();

        let looped = store.container("App.ILoop").unwrap();
        assert_eq!(looped.load_errors()[0].kind, LoadErrorKind::InvalidValue);
        assert!(looped.inherited_interfaces().is_empty());

        let ouroboros = store.container("App.Ouroboros").unwrap();
        assert_eq!(ouroboros.load_errors().len(), 1);
        assert_eq!(ouroboros.load_errors()[0].kind, LoadErrorKind::InvalidValue);
        assert!(ouroboros.base_type().is_none());
        assert!(graph.has_errors());
    }
}
