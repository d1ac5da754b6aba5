//! Lookup path registry.
//!
//! Every top-level model lives in one arena owned by [`ModelStore`]. Members and enum values
//! stay inline in their container but get their own index entries, so any model can be reached
//! from its lookup path. Cross references between models are paths resolved here on each
//! access, never direct pointers.

use rustc_hash::FxHashMap;

use super::container::Container;
use super::delegate::Delegate;
use super::enums::{EnumModel, EnumValue};
use super::info::{LookupPath, Model, ModelInfo};
use super::kinds::ModelKind;
use super::member::Member;
use super::namespace::{Namespace, UsingStatement};
use super::source::Source;

/// Position of a top-level model in the store arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(u32);

impl ModelId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A top-level model owned by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelNode {
    Source(Source),
    Container(Container),
    Enum(EnumModel),
    Delegate(Delegate),
    Namespace(Namespace),
    Using(UsingStatement),
}

impl ModelNode {
    pub fn info(&self) -> &ModelInfo {
        match self {
            ModelNode::Source(m) => m.info(),
            ModelNode::Container(m) => m.info(),
            ModelNode::Enum(m) => m.info(),
            ModelNode::Delegate(m) => m.info(),
            ModelNode::Namespace(m) => m.info(),
            ModelNode::Using(m) => m.info(),
        }
    }

    pub fn as_model_ref(&self) -> ModelRef<'_> {
        match self {
            ModelNode::Source(m) => ModelRef::Source(m),
            ModelNode::Container(m) => ModelRef::Container(m),
            ModelNode::Enum(m) => ModelRef::Enum(m),
            ModelNode::Delegate(m) => ModelRef::Delegate(m),
            ModelNode::Namespace(m) => ModelRef::Namespace(m),
            ModelNode::Using(m) => ModelRef::Using(m),
        }
    }

    /// Paths of the inline children that are addressable on their own.
    fn child_slots(&self, id: ModelId) -> Vec<(LookupPath, Slot)> {
        match self {
            ModelNode::Container(c) => c
                .members()
                .iter()
                .enumerate()
                .map(|(i, m)| (m.lookup_path().clone(), Slot::Member(id, i)))
                .collect(),
            ModelNode::Enum(e) => e
                .values()
                .iter()
                .enumerate()
                .map(|(i, v)| (v.lookup_path().clone(), Slot::EnumValue(id, i)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

macro_rules! impl_from_model {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ModelNode {
                fn from(model: $ty) -> Self {
                    ModelNode::$variant(model)
                }
            }
        )*
    };
}

impl_from_model! {
    Source => Source,
    Container => Container,
    EnumModel => Enum,
    Delegate => Delegate,
    Namespace => Namespace,
    UsingStatement => Using,
}

/// Borrowed view of any model reachable by lookup path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelRef<'a> {
    Source(&'a Source),
    Container(&'a Container),
    Member(&'a Member),
    Enum(&'a EnumModel),
    EnumValue(&'a EnumValue),
    Delegate(&'a Delegate),
    Namespace(&'a Namespace),
    Using(&'a UsingStatement),
}

impl<'a> ModelRef<'a> {
    pub fn info(self) -> &'a ModelInfo {
        match self {
            ModelRef::Source(m) => m.info(),
            ModelRef::Container(m) => m.info(),
            ModelRef::Member(m) => m.info(),
            ModelRef::Enum(m) => m.info(),
            ModelRef::EnumValue(m) => m.info(),
            ModelRef::Delegate(m) => m.info(),
            ModelRef::Namespace(m) => m.info(),
            ModelRef::Using(m) => m.info(),
        }
    }

    pub fn kind(self) -> ModelKind {
        self.info().kind()
    }

    pub fn lookup_path(self) -> &'a LookupPath {
        self.info().lookup_path()
    }

    pub fn as_source(self) -> Option<&'a Source> {
        match self {
            ModelRef::Source(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_container(self) -> Option<&'a Container> {
        match self {
            ModelRef::Container(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_member(self) -> Option<&'a Member> {
        match self {
            ModelRef::Member(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_enum(self) -> Option<&'a EnumModel> {
        match self {
            ModelRef::Enum(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_enum_value(self) -> Option<&'a EnumValue> {
        match self {
            ModelRef::EnumValue(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_delegate(self) -> Option<&'a Delegate> {
        match self {
            ModelRef::Delegate(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_namespace(self) -> Option<&'a Namespace> {
        match self {
            ModelRef::Namespace(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_using(self) -> Option<&'a UsingStatement> {
        match self {
            ModelRef::Using(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Node(ModelId),
    Member(ModelId, usize),
    EnumValue(ModelId, usize),
}

impl Slot {
    fn owner(self) -> ModelId {
        match self {
            Slot::Node(id) | Slot::Member(id, _) | Slot::EnumValue(id, _) => id,
        }
    }
}

/// Registry mapping lookup paths to models.
///
/// Written once through `&mut self` by a builder, then shared read-only.
#[derive(Debug, Default, Clone)]
pub struct ModelStore {
    nodes: Vec<Option<ModelNode>>,
    index: FxHashMap<LookupPath, Slot>,
    categories: FxHashMap<String, Vec<ModelId>>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single model, replacing any model already stored at the same path.
    pub fn set(&mut self, model: impl Into<ModelNode>) -> ModelId {
        let node = model.into();
        let path = node.info().lookup_path().clone();

        let id = match self.index.get(path.as_str()).copied() {
            Some(Slot::Node(existing)) => {
                tracing::trace!(path = %path, "replacing stored model");
                self.unindex(existing);
                self.nodes[existing.index()] = Some(node);
                existing
            }
            _ => {
                let id = ModelId(self.nodes.len() as u32);
                self.nodes.push(Some(node));
                id
            }
        };

        self.reindex(id);
        id
    }

    /// Register a group of models under a category, dropping whatever the category held before.
    pub fn add_models<M: Into<ModelNode>>(
        &mut self,
        category: &str,
        models: Vec<M>,
    ) -> Vec<ModelId> {
        if let Some(previous) = self.categories.remove(category) {
            tracing::debug!(category, count = previous.len(), "replacing model category");
            for id in previous {
                self.unindex(id);
                self.nodes[id.index()] = None;
            }
        }

        let ids: Vec<ModelId> = models.into_iter().map(|m| self.set(m)).collect();
        self.categories.insert(category.to_string(), ids.clone());
        ids
    }

    /// Look up any model by path.
    pub fn get(&self, path: &str) -> Option<ModelRef<'_>> {
        match *self.index.get(path)? {
            Slot::Node(id) => self.node(id).map(ModelNode::as_model_ref),
            Slot::Member(id, i) => match self.node(id)? {
                ModelNode::Container(c) => c.members().get(i).map(ModelRef::Member),
                _ => None,
            },
            Slot::EnumValue(id, i) => match self.node(id)? {
                ModelNode::Enum(e) => e.values().get(i).map(ModelRef::EnumValue),
                _ => None,
            },
        }
    }

    pub fn container(&self, path: &str) -> Option<&Container> {
        self.get(path).and_then(ModelRef::as_container)
    }

    pub fn member(&self, path: &str) -> Option<&Member> {
        self.get(path).and_then(ModelRef::as_member)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn node(&self, id: ModelId) -> Option<&ModelNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn id_of(&self, path: &str) -> Option<ModelId> {
        match self.index.get(path)? {
            Slot::Node(id) => Some(*id),
            _ => None,
        }
    }

    /// Live top-level models in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &ModelNode> {
        self.nodes.iter().flatten()
    }

    /// Models registered under a category, in registration order.
    pub fn category(&self, name: &str) -> impl Iterator<Item = ModelRef<'_>> {
        self.categories
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|id| self.node(*id))
            .map(ModelNode::as_model_ref)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Number of addressable lookup paths, members and enum values included.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn unindex(&mut self, id: ModelId) {
        self.index.retain(|_, slot| slot.owner() != id);
    }

    fn reindex(&mut self, id: ModelId) {
        let Some(node) = self.node(id) else {
            return;
        };
        let own = node.info().lookup_path().clone();
        let children = node.child_slots(id);

        if !own.is_empty() {
            self.index.insert(own, Slot::Node(id));
        }
        for (path, slot) in children {
            if path.is_empty() {
                continue;
            }
            if let Some(previous) = self.index.insert(path.clone(), slot) {
                if previous.owner() != id {
                    tracing::warn!(path = %path, "member path shadows an existing model");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContainerData, MemberData, Method, MethodKind, TypeRef, WellKnownType};

    fn interface(name: &str, members: &[&str]) -> Container {
        let path = LookupPath::new(format!("App.{}", name));
        let members = members
            .iter()
            .map(|m| {
                Member::new(
                    ModelInfo::new(ModelKind::Member, path.child(&format!("{}()", m)))
                        .with_parent(path.clone()),
                    *m,
                    MemberData::Method(Method::new(
                        MethodKind::Member,
                        TypeRef::well_known(WellKnownType::Void),
                    )),
                )
            })
            .collect();
        Container::new(
            ModelInfo::new(ModelKind::Container, path),
            name,
            "App",
            ContainerData::Interface,
        )
        .with_members(members)
    }

    #[test]
    fn test_get_container_and_member() {
        let mut store = ModelStore::new();
        store.set(interface("IShape", &["Area", "Draw"]));

        assert!(store.container("App.IShape").is_some());
        let area = store.member("App.IShape.Area()");
        assert_eq!(area.map(|m| m.name()), Some("Area"));
        assert_eq!(store.len(), 3);
        assert!(store.get("App.Missing").is_none());
    }

    #[test]
    fn test_set_replaces_same_path() {
        let mut store = ModelStore::new();
        let first = store.set(interface("IShape", &["Area", "Draw"]));
        let second = store.set(interface("IShape", &["Area"]));

        assert_eq!(first, second);
        assert!(store.member("App.IShape.Draw()").is_none());
        assert!(store.member("App.IShape.Area()").is_some());
        assert_eq!(store.nodes().count(), 1);
    }

    #[test]
    fn test_add_models_replaces_category() {
        let mut store = ModelStore::new();
        store.add_models("interfaces", vec![interface("IA", &[]), interface("IB", &[])]);
        assert_eq!(store.category("interfaces").count(), 2);

        store.add_models("interfaces", vec![interface("IC", &[])]);
        assert_eq!(store.category("interfaces").count(), 1);
        assert!(store.get("App.IA").is_none());
        assert!(store.get("App.IC").is_some());
        assert_eq!(store.nodes().count(), 1);
    }

    #[test]
    fn test_member_parent_resolves_through_store() {
        let mut store = ModelStore::new();
        store.set(interface("IShape", &["Area"]));

        let area = store.member("App.IShape.Area()").map(|m| m.parent_container(&store));
        assert_eq!(area.flatten().map(|c| c.name()), Some("IShape"));
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let store = ModelStore::new();
        assert_eq!(store.category("classes").count(), 0);
        assert!(store.is_empty());
    }
}
