//! Type-indexed component storage.
//!
//! A [`ComponentStore`] maps a component's [`TypeId`] to exactly one owned,
//! type-erased instance. Typed accessors perform a checked downcast. All
//! operations are O(1) expected. Iteration order is implementation-defined
//! and not part of the public contract — system execution order comes from
//! the pipeline, never from the store.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;

use crate::component::Component;

/// Per-model heterogeneous component container.
///
/// At most one instance of a given type exists at a time. `add` replaces an
/// existing instance (last-writer-wins); `get_or_add` reuses an existing one
/// (first-writer-wins). Call `remove` first if a fresh default is required.
#[derive(Default)]
pub struct ComponentStore {
    components: HashMap<TypeId, Box<dyn Component>>,
}

impl ComponentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, replacing any existing instance of `T`.
    pub fn add<T: Component>(&mut self, value: T) -> &mut T {
        self.components.insert(TypeId::of::<T>(), Box::new(value));
        self.get_mut::<T>()
    }

    /// Shared reference to the stored `T`.
    ///
    /// # Panics
    ///
    /// Panics if no `T` is stored. A missing required component is a
    /// programmer error, not a recoverable condition — use [`Self::find`]
    /// when absence is expected.
    #[must_use]
    pub fn get<T: Component>(&self) -> &T {
        self.find::<T>()
            .unwrap_or_else(|| panic!("missing required component: {}", type_name::<T>()))
    }

    /// Mutable reference to the stored `T`.
    ///
    /// # Panics
    ///
    /// Panics if no `T` is stored.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self) -> &mut T {
        self.find_mut::<T>()
            .unwrap_or_else(|| panic!("missing required component: {}", type_name::<T>()))
    }

    /// Shared reference to the stored `T`, or `None`.
    #[must_use]
    pub fn find<T: Component>(&self) -> Option<&T> {
        self.components
            .get(&TypeId::of::<T>())
            .map(|boxed| (boxed.as_ref() as &dyn Any).downcast_ref::<T>())
            .map(|downcast| downcast.expect("component stored under wrong TypeId"))
    }

    /// Mutable reference to the stored `T`, or `None`.
    #[must_use]
    pub fn find_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .get_mut(&TypeId::of::<T>())
            .map(|boxed| (boxed.as_mut() as &mut dyn Any).downcast_mut::<T>())
            .map(|downcast| downcast.expect("component stored under wrong TypeId"))
    }

    /// Existing `T`, or a default-constructed one stored on first access.
    pub fn get_or_add<T: Component + Default>(&mut self) -> &mut T {
        self.components
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(T::default()));
        self.get_mut::<T>()
    }

    /// Is a `T` currently stored?
    #[must_use]
    pub fn has<T: Component>(&self) -> bool {
        self.components.contains_key(&TypeId::of::<T>())
    }

    /// Drop the stored `T`. No-op when absent.
    pub fn remove<T: Component>(&mut self) {
        self.components.remove(&TypeId::of::<T>());
    }

    /// Number of stored components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Is the store empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Iterate over all components, type-erased. Order is
    /// implementation-defined.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.values().map(Box::as_ref)
    }

    /// Iterate mutably over all components, type-erased.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Component>> {
        self.components.values_mut()
    }
}

impl std::fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.iter().map(Component::type_name).collect();
        names.sort_unstable();
        f.debug_struct("ComponentStore").field("components", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, PartialEq, Debug)]
    struct Counter {
        value: u32,
    }

    impl Component for Counter {
        fn type_name(&self) -> &'static str {
            "Counter"
        }
    }

    struct Label {
        text: String,
    }

    impl Component for Label {
        fn type_name(&self) -> &'static str {
            "Label"
        }
    }

    #[test]
    fn test_add_and_get() {
        let mut store = ComponentStore::new();
        store.add(Counter { value: 7 });
        assert_eq!(store.get::<Counter>().value, 7);
    }

    #[test]
    fn test_add_replaces_existing() {
        let mut store = ComponentStore::new();
        store.add(Counter { value: 1 });
        store.add(Counter { value: 2 });
        assert_eq!(store.len(), 1);
        assert_eq!(store.get::<Counter>().value, 2);
    }

    #[test]
    #[should_panic(expected = "missing required component")]
    fn test_get_missing_panics() {
        let store = ComponentStore::new();
        let _ = store.get::<Counter>();
    }

    #[test]
    fn test_find_missing_is_none() {
        let store = ComponentStore::new();
        assert!(store.find::<Counter>().is_none());
    }

    #[test]
    fn test_get_or_add_default_constructs_once() {
        let mut store = ComponentStore::new();
        store.get_or_add::<Counter>().value = 42;
        // Second call must return the same underlying instance.
        assert_eq!(store.get_or_add::<Counter>().value, 42);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_or_add_reuses_added_instance() {
        let mut store = ComponentStore::new();
        store.add(Counter { value: 9 });
        assert_eq!(store.get_or_add::<Counter>().value, 9);
    }

    #[test]
    fn test_remove_is_noop_when_absent() {
        let mut store = ComponentStore::new();
        store.remove::<Counter>();
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_then_get_or_add_is_fresh() {
        let mut store = ComponentStore::new();
        store.add(Counter { value: 5 });
        store.remove::<Counter>();
        assert_eq!(store.get_or_add::<Counter>().value, 0);
    }

    #[test]
    fn test_heterogeneous_types_coexist() {
        let mut store = ComponentStore::new();
        store.add(Counter { value: 1 });
        store.add(Label {
            text: "axon".to_string(),
        });
        assert!(store.has::<Counter>());
        assert!(store.has::<Label>());
        assert_eq!(store.get::<Label>().text, "axon");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_mutation_through_get_mut() {
        let mut store = ComponentStore::new();
        store.add(Counter { value: 0 });
        store.get_mut::<Counter>().value += 1;
        assert_eq!(store.get::<Counter>().value, 1);
    }
}
