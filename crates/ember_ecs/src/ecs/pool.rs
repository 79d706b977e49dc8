//! # Component Pool
//!
//! A [`SparseSet`] paired 1:1 with a type-erased [`ComponentStorage`].
//!
//! Every structural change goes through this type so that the set's dense
//! array and the storage stay aligned element-for-element: an insert pushes
//! to both, a removal swap-removes the same position in both.

use super::component::Component;
use super::sparse_set::SparseSet;
use super::storage::{ComponentStorage, ErasedStorage};

/// Entity set plus component values for one component type.
pub struct ComponentPool {
    entities: SparseSet,
    storage: Box<dyn ErasedStorage>,
}

impl ComponentPool {
    /// Creates an empty pool for components of type `C`.
    #[must_use]
    pub fn new<C: Component>(capacity: usize) -> Self {
        Self {
            entities: SparseSet::with_capacity(capacity),
            storage: Box::new(ComponentStorage::<C>::with_capacity(capacity)),
        }
    }

    /// Returns the set of entity indices holding this component.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &SparseSet {
        &self.entities
    }

    /// Returns the number of components in the pool.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the pool holds no components.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Checks whether the entity at `index` has a component in this pool.
    #[inline]
    #[must_use]
    pub fn contains(&self, index: u32) -> bool {
        self.entities.contains(index)
    }

    /// Returns the Rust type name of the pooled component.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.storage.type_name()
    }

    /// Recovers the concrete storage.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not the type this pool was created for.
    #[inline]
    #[must_use]
    pub fn storage<C: Component>(&self) -> &ComponentStorage<C> {
        let name = self.storage.type_name();
        match self.storage.as_any().downcast_ref::<ComponentStorage<C>>() {
            Some(storage) => storage,
            None => mismatch::<C>(name),
        }
    }

    /// Recovers the concrete storage mutably.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not the type this pool was created for.
    #[inline]
    pub fn storage_mut<C: Component>(&mut self) -> &mut ComponentStorage<C> {
        let name = self.storage.type_name();
        match self.storage.as_any_mut().downcast_mut::<ComponentStorage<C>>() {
            Some(storage) => storage,
            None => mismatch::<C>(name),
        }
    }

    /// Borrows the entity set and the mutable concrete storage together.
    ///
    /// # Panics
    ///
    /// Panics if `C` is not the type this pool was created for.
    pub fn split_mut<C: Component>(&mut self) -> (&SparseSet, &mut ComponentStorage<C>) {
        let name = self.storage.type_name();
        match self.storage.as_any_mut().downcast_mut::<ComponentStorage<C>>() {
            Some(storage) => (&self.entities, storage),
            None => mismatch::<C>(name),
        }
    }

    /// Gets the component of the entity at `index`.
    #[inline]
    #[must_use]
    pub fn get<C: Component>(&self, index: u32) -> Option<&C> {
        let position = self.entities.find(index)?;
        self.storage::<C>().get(position)
    }

    /// Gets the component of the entity at `index` mutably.
    #[inline]
    pub fn get_mut<C: Component>(&mut self, index: u32) -> Option<&mut C> {
        let position = self.entities.find(index)?;
        self.storage_mut::<C>().get_mut(position)
    }

    /// Attaches `component` to the entity at `index`.
    ///
    /// The caller guarantees the entity is not already in the pool.
    pub fn insert<C: Component>(&mut self, index: u32, component: C) -> &mut C {
        debug_assert!(!self.entities.contains(index));
        self.entities.insert(index);
        self.storage_mut::<C>().emplace(component)
    }

    /// Removes the component of the entity at `index`, if present.
    ///
    /// # Returns
    ///
    /// `true` if a component was removed.
    pub fn remove_entity(&mut self, index: u32) -> bool {
        if !self.entities.contains(index) {
            return false;
        }
        let Some(position) = self.entities.remove(index) else {
            return false;
        };
        self.storage.remove_at(position);
        debug_assert_eq!(self.entities.len(), self.storage.len());
        true
    }

    /// Clones the component of `src` onto `dest`.
    ///
    /// Does nothing if `src` has no component here. The caller guarantees
    /// `dest` is not already in the pool.
    pub fn copy_entity(&mut self, src: u32, dest: u32) -> bool {
        let Some(position) = self.entities.find(src) else {
            return false;
        };
        debug_assert!(!self.entities.contains(dest));
        self.storage.duplicate_at(position);
        self.entities.insert(dest);
        true
    }
}

impl Clone for ComponentPool {
    fn clone(&self) -> Self {
        Self {
            entities: self.entities.clone(),
            storage: self.storage.clone_boxed(),
        }
    }
}

impl std::fmt::Debug for ComponentPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentPool")
            .field("type", &self.storage.type_name())
            .field("entities", &self.entities.as_slice())
            .finish()
    }
}

#[cold]
#[inline(never)]
fn mismatch<C: Component>(stored: &str) -> ! {
    panic!(
        "component pool holds {stored}, not {}",
        std::any::type_name::<C>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::tests::{Health, Name};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn assert_aligned(pool: &ComponentPool, expected: &HashMap<u32, u32>) {
        assert_eq!(pool.len(), pool.storage::<Health>().len());
        assert_eq!(pool.len(), expected.len());
        for (&index, &value) in expected {
            assert_eq!(pool.get::<Health>(index), Some(&Health(value)));
        }
    }

    #[test]
    fn test_insert_remove_stays_aligned() {
        let mut pool = ComponentPool::new::<Health>(4);
        pool.insert(0, Health(100));
        pool.insert(5, Health(105));
        pool.insert(9, Health(109));

        assert!(pool.remove_entity(0));
        assert!(!pool.remove_entity(0));
        assert_eq!(pool.entities().as_slice(), &[9, 5]);
        assert_eq!(pool.storage::<Health>().as_slice(), &[Health(109), Health(105)]);
    }

    #[test]
    fn test_random_sequences_stay_aligned() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut pool = ComponentPool::new::<Health>(0);
        let mut expected = HashMap::new();

        for step in 0..1_000u32 {
            let index = rng.gen_range(0..32u32);
            if expected.contains_key(&index) {
                if rng.gen_bool(0.5) {
                    assert!(pool.remove_entity(index));
                    expected.remove(&index);
                } else {
                    pool.get_mut::<Health>(index).unwrap().0 = step;
                    expected.insert(index, step);
                }
            } else {
                pool.insert(index, Health(step));
                expected.insert(index, step);
            }
            assert_aligned(&pool, &expected);
        }
    }

    #[test]
    fn test_copy_entity() {
        let mut pool = ComponentPool::new::<Name>(0);
        pool.insert(1, Name("src".into()));

        assert!(pool.copy_entity(1, 4));
        assert!(!pool.copy_entity(2, 5));
        assert_eq!(pool.get::<Name>(4), Some(&Name("src".into())));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_clone_is_deep() {
        let mut pool = ComponentPool::new::<Name>(0);
        pool.insert(1, Name("before".into()));

        let copy = pool.clone();
        pool.get_mut::<Name>(1).unwrap().0 = "after".into();

        assert_eq!(copy.get::<Name>(1), Some(&Name("before".into())));
        assert_eq!(pool.get::<Name>(1), Some(&Name("after".into())));
    }

    #[test]
    #[should_panic(expected = "component pool holds")]
    fn test_wrong_type_panics() {
        let pool = ComponentPool::new::<Health>(0);
        let _ = pool.storage::<Name>();
    }
}
