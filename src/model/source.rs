//! Root aggregate for one compiled unit.

use super::container::Container;
use super::delegate::Delegate;
use super::enums::EnumModel;
use super::info::{LookupPath, Model, ModelInfo};
use super::kinds::ModelKind;
use super::namespace::{Namespace, UsingStatement};
use super::store::{ModelRef, ModelStore};

/// Lookup paths of everything declared at the top level of a unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceContents {
    pub usings: Vec<LookupPath>,
    pub namespaces: Vec<LookupPath>,
    pub interfaces: Vec<LookupPath>,
    pub classes: Vec<LookupPath>,
    pub structures: Vec<LookupPath>,
    pub records: Vec<LookupPath>,
    pub record_structures: Vec<LookupPath>,
    pub enums: Vec<LookupPath>,
    pub delegates: Vec<LookupPath>,
}

impl SourceContents {
    pub const fn new() -> Self {
        Self {
            usings: Vec::new(),
            namespaces: Vec::new(),
            interfaces: Vec::new(),
            classes: Vec::new(),
            structures: Vec::new(),
            records: Vec::new(),
            record_structures: Vec::new(),
            enums: Vec::new(),
            delegates: Vec::new(),
        }
    }
}

/// A compiled unit. Holds paths only; the models themselves live in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    info: ModelInfo,
    name: String,
    contents: SourceContents,
}

impl Source {
    pub fn new(info: ModelInfo, name: impl Into<String>, contents: SourceContents) -> Self {
        Self {
            info,
            name: name.into(),
            contents,
        }
    }

    /// An empty, not-loaded source.
    pub const fn unloaded() -> Self {
        Self {
            info: ModelInfo::unloaded(ModelKind::Source),
            name: String::new(),
            contents: SourceContents::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contents(&self) -> &SourceContents {
        &self.contents
    }

    pub fn usings<'s>(
        &'s self,
        store: &'s ModelStore,
    ) -> impl Iterator<Item = &'s UsingStatement> + 's {
        resolve(store, &self.contents.usings, ModelRef::as_using)
    }

    pub fn namespaces<'s>(
        &'s self,
        store: &'s ModelStore,
    ) -> impl Iterator<Item = &'s Namespace> + 's {
        resolve(store, &self.contents.namespaces, ModelRef::as_namespace)
    }

    pub fn interfaces<'s>(
        &'s self,
        store: &'s ModelStore,
    ) -> impl Iterator<Item = &'s Container> + 's {
        resolve(store, &self.contents.interfaces, ModelRef::as_container)
    }

    pub fn classes<'s>(
        &'s self,
        store: &'s ModelStore,
    ) -> impl Iterator<Item = &'s Container> + 's {
        resolve(store, &self.contents.classes, ModelRef::as_container)
    }

    pub fn structures<'s>(
        &'s self,
        store: &'s ModelStore,
    ) -> impl Iterator<Item = &'s Container> + 's {
        resolve(store, &self.contents.structures, ModelRef::as_container)
    }

    pub fn records<'s>(
        &'s self,
        store: &'s ModelStore,
    ) -> impl Iterator<Item = &'s Container> + 's {
        resolve(store, &self.contents.records, ModelRef::as_container)
    }

    pub fn record_structures<'s>(
        &'s self,
        store: &'s ModelStore,
    ) -> impl Iterator<Item = &'s Container> + 's {
        resolve(store, &self.contents.record_structures, ModelRef::as_container)
    }

    pub fn enums<'s>(&'s self, store: &'s ModelStore) -> impl Iterator<Item = &'s EnumModel> + 's {
        resolve(store, &self.contents.enums, ModelRef::as_enum)
    }

    pub fn delegates<'s>(
        &'s self,
        store: &'s ModelStore,
    ) -> impl Iterator<Item = &'s Delegate> + 's {
        resolve(store, &self.contents.delegates, ModelRef::as_delegate)
    }

    /// Every top-level container: interfaces, classes, structures, records, record structures.
    pub fn containers<'s>(
        &'s self,
        store: &'s ModelStore,
    ) -> impl Iterator<Item = &'s Container> + 's {
        self.interfaces(store)
            .chain(self.classes(store))
            .chain(self.structures(store))
            .chain(self.records(store))
            .chain(self.record_structures(store))
    }
}

fn resolve<'s, T: 's>(
    store: &'s ModelStore,
    paths: &'s [LookupPath],
    pick: fn(ModelRef<'s>) -> Option<&'s T>,
) -> impl Iterator<Item = &'s T> + 's {
    paths
        .iter()
        .filter_map(move |p| store.get(p.as_str()))
        .filter_map(pick)
}

impl Model for Source {
    fn info(&self) -> &ModelInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContainerData;

    #[test]
    fn test_unloaded_source_is_empty() {
        let store = ModelStore::new();
        let source = Source::unloaded();
        assert!(!source.is_loaded());
        assert_eq!(source.containers(&store).count(), 0);
        assert_eq!(source.usings(&store).count(), 0);
    }

    #[test]
    fn test_category_accessors_filter_by_kind() {
        let mut store = ModelStore::new();
        store.set(Container::new(
            ModelInfo::new(ModelKind::Container, "App.Circle"),
            "Circle",
            "App",
            ContainerData::empty(crate::model::ContainerKind::Class),
        ));

        let contents = SourceContents {
            classes: vec![LookupPath::new("App.Circle"), LookupPath::new("App.Gone")],
            enums: vec![LookupPath::new("App.Circle")],
            ..SourceContents::default()
        };
        let source = Source::new(ModelInfo::new(ModelKind::Source, "src:App"), "App", contents);

        assert_eq!(source.classes(&store).count(), 1);
        assert_eq!(source.enums(&store).count(), 0);
        assert_eq!(source.containers(&store).count(), 1);
    }
}
