//! A built unit: the store plus the id of its root [`Source`].

use super::attribute::HasAttributes;
use super::info::{LoadError, Model};
use super::parameter::Parameter;
use super::source::Source;
use super::store::{ModelId, ModelNode, ModelRef, ModelStore};
use super::types::TypeResolver;
use super::TypeRef;

static UNLOADED_SOURCE: Source = Source::unloaded();

/// An immutable model graph for one compiled unit.
///
/// Editing never changes a graph in place; a document edit yields a new one and this one stays
/// valid.
#[derive(Debug, Clone)]
pub struct SourceGraph {
    store: ModelStore,
    root: ModelId,
}

impl SourceGraph {
    /// Register the root source in `store` and wrap both.
    pub fn new(mut store: ModelStore, source: Source) -> Self {
        let root = store.set(source);
        Self { store, root }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn into_store(self) -> ModelStore {
        self.store
    }

    pub fn source(&self) -> &Source {
        match self.store.node(self.root) {
            Some(ModelNode::Source(source)) => source,
            _ => &UNLOADED_SOURCE,
        }
    }

    pub fn get(&self, path: &str) -> Option<ModelRef<'_>> {
        self.store.get(path)
    }

    pub fn has_errors(&self) -> bool {
        self.source().has_errors()
    }

    /// All load errors recorded anywhere in the graph, in registration order.
    ///
    /// Covers registered models and everything they own inline: members, parameters, enum
    /// values and the attributes on any of them.
    pub fn load_errors(&self) -> Vec<&LoadError> {
        let mut errors = Vec::new();
        for node in self.store.nodes() {
            errors.extend(node.info().load_errors());
            match node {
                ModelNode::Container(c) => {
                    errors.extend(attribute_errors(c));
                    for member in c.members() {
                        errors.extend(member.load_errors());
                        errors.extend(attribute_errors(member));
                        errors.extend(parameter_errors(member.parameters()));
                    }
                }
                ModelNode::Enum(e) => {
                    errors.extend(attribute_errors(e));
                    for value in e.values() {
                        errors.extend(value.load_errors());
                        errors.extend(attribute_errors(value));
                    }
                }
                ModelNode::Delegate(d) => {
                    errors.extend(attribute_errors(d));
                    errors.extend(parameter_errors(d.parameters()));
                }
                ModelNode::Source(_) | ModelNode::Namespace(_) | ModelNode::Using(_) => {}
            }
        }
        errors
    }
}

fn attribute_errors<M: HasAttributes>(model: &M) -> impl Iterator<Item = &LoadError> {
    model.attributes().iter().flat_map(|a| a.load_errors())
}

fn parameter_errors(parameters: &[Parameter]) -> impl Iterator<Item = &LoadError> {
    parameters
        .iter()
        .flat_map(|p| p.load_errors().iter().chain(attribute_errors(p)))
}

impl TypeResolver for SourceGraph {
    fn resolve_type(&self, ty: &TypeRef) -> Option<ModelRef<'_>> {
        self.store.resolve_type(ty)
    }
}
