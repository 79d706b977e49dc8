//! # Registry
//!
//! The central container for all entities and components.
//!
//! The registry owns:
//! - The entity table, indexed by [`Entity::index`]
//! - A LIFO free list of destroyed indices awaiting reuse
//! - One [`ComponentPool`] per component type, indexed by [`ComponentTypeId`]
//!
//! A handle is live iff it equals the table entry at its index bit-for-bit.
//! That rejects destroyed slots (validity bit cleared) and recycled slots
//! (generation bumped) with a single comparison.
//!
//! ## Error model
//!
//! Passing a null or stale handle, emplacing a duplicate component, or
//! getting a missing one are programmer errors: they are logged and the call
//! panics. Absence of a component is not an error for [`Registry::has`],
//! [`Registry::try_get`] or [`Registry::erase`]. `try_` variants of the
//! mutating calls return [`EcsError`] instead of panicking.

use std::fmt;

use super::component::{Component, ComponentTypeId, ComponentTypes};
use super::entity::Entity;
use super::pool::ComponentPool;
use super::query::{ComponentSet, Group, View, ViewMut};
use crate::config::RegistryConfig;
use crate::error::{EcsError, EcsResult};

/// Entity/component store backed by sparse sets.
///
/// # Example
///
/// ```rust,ignore
/// let mut registry = Registry::new();
///
/// let entity = registry.create();
/// registry.emplace(entity, Position::new(1.0, 2.0, 3.0));
///
/// for (entity, position) in registry.view::<Position>() {
///     println!("{entity}: {position:?}");
/// }
/// ```
pub struct Registry {
    /// Component type ID table, possibly shared with other registries.
    types: ComponentTypes,
    /// Capacity hints.
    config: RegistryConfig,
    /// Entity slots; dead slots keep their last generation.
    entities: Vec<Entity>,
    /// Destroyed indices, reused last-in first-out.
    free_indices: Vec<u32>,
    /// Pools indexed by component type ID. `None` until first emplace.
    pools: Vec<Option<ComponentPool>>,
    /// Number of currently alive entities.
    alive_count: usize,
}

impl Registry {
    /// Creates an empty registry with default capacities and its own type
    /// table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry with the given capacity hints.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self::with_types_and_config(ComponentTypes::new(), config)
    }

    /// Creates an empty registry that takes component IDs from `types`.
    #[must_use]
    pub fn with_types(types: ComponentTypes) -> Self {
        Self::with_types_and_config(types, RegistryConfig::default())
    }

    /// Creates an empty registry from a type table and capacity hints.
    #[must_use]
    pub fn with_types_and_config(types: ComponentTypes, config: RegistryConfig) -> Self {
        Self {
            types,
            config,
            entities: Vec::with_capacity(config.entity_capacity),
            free_indices: Vec::new(),
            pools: Vec::new(),
            alive_count: 0,
        }
    }

    /// Returns the component type table.
    #[inline]
    #[must_use]
    pub fn types(&self) -> &ComponentTypes {
        &self.types
    }

    /// Returns the capacity hints this registry was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Returns the number of currently alive entities.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.alive_count
    }

    /// Returns `true` if no entity is alive.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.alive_count == 0
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Creates a new entity.
    ///
    /// Reuses the most recently freed index with its generation bumped, or
    /// appends a new index with generation 0.
    ///
    /// # Panics
    ///
    /// Panics if all `u32::MAX` indices are in use.
    pub fn create(&mut self) -> Entity {
        if let Some(index) = self.free_indices.pop() {
            let slot = &mut self.entities[index as usize];
            *slot = slot.next_generation();
            self.alive_count += 1;
            return *slot;
        }

        assert!(
            self.entities.len() < u32::MAX as usize,
            "entity table exhausted"
        );
        let entity = Entity::new(self.entities.len() as u32, 0, true);
        self.entities.push(entity);
        self.alive_count += 1;
        entity
    }

    /// Destroys an entity, removing every component it holds.
    ///
    /// The index goes back to the free list and the stored handle loses its
    /// validity bit, so `entity` is stale from here on.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null or stale.
    pub fn destroy(&mut self, entity: Entity) {
        if let Err(err) = self.try_destroy(entity) {
            fatal(&err);
        }
    }

    /// Destroys an entity, returning an error instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NullEntity`] or [`EcsError::StaleEntity`] if the
    /// handle is not live.
    pub fn try_destroy(&mut self, entity: Entity) -> EcsResult<()> {
        let index = self.check(entity, "destroy entity")?;

        for pool in self.pools.iter_mut().flatten() {
            pool.remove_entity(index);
        }

        self.entities[index as usize] = entity.with_validity(false);
        self.free_indices.push(index);
        self.alive_count -= 1;
        Ok(())
    }

    /// Checks if `entity` is a live handle.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.check(entity, "check entity").is_ok()
    }

    /// Returns the live handle stored at `index`, if that slot is alive.
    #[must_use]
    pub fn entity_at_index(&self, index: u32) -> Option<Entity> {
        self.entities
            .get(index as usize)
            .copied()
            .filter(|entity| entity.is_valid())
    }

    /// Iterates over all alive entities in index order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied().filter(|entity| entity.is_valid())
    }

    /// Calls `f` for every alive entity in index order.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(Entity),
    {
        for entity in self.iter() {
            f(entity);
        }
    }

    /// Creates a new entity holding a clone of every component of `src`.
    ///
    /// # Panics
    ///
    /// Panics if `src` is null or stale.
    pub fn duplicate(&mut self, src: Entity) -> Entity {
        let src_index = self.live(src, "duplicate entity");
        let dest = self.create();

        for pool in self.pools.iter_mut().flatten() {
            pool.copy_entity(src_index, dest.index());
        }
        dest
    }

    /// Returns the number of components attached to `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null or stale.
    #[must_use]
    pub fn component_count(&self, entity: Entity) -> usize {
        let index = self.live(entity, "count components");
        self.pools
            .iter()
            .flatten()
            .filter(|pool| pool.contains(index))
            .count()
    }

    /// Drops every pool, entity and free-list entry.
    ///
    /// The type table is kept, so component IDs remain stable.
    pub fn clear(&mut self) {
        tracing::debug!(
            "clearing registry: {} entities, {} pools",
            self.alive_count,
            self.pools.iter().flatten().count()
        );
        self.pools.clear();
        self.entities.clear();
        self.free_indices.clear();
        self.alive_count = 0;
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attaches a component to `entity` and returns a reference to it.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null or stale, or already has a `C`.
    pub fn emplace<C: Component>(&mut self, entity: Entity, component: C) -> &mut C {
        match self.try_emplace(entity, component) {
            Ok(component) => component,
            Err(err) => fatal(&err),
        }
    }

    /// Attaches a component, returning an error instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::NullEntity`] or [`EcsError::StaleEntity`] if the
    /// handle is not live, and [`EcsError::DuplicateComponent`] if the entity
    /// already has a `C`.
    pub fn try_emplace<C: Component>(&mut self, entity: Entity, component: C) -> EcsResult<&mut C> {
        let index = self.check(entity, "emplace component")?;
        if self.contains_index::<C>(index) {
            return Err(EcsError::DuplicateComponent {
                entity,
                component: std::any::type_name::<C>(),
            });
        }
        Ok(self.pool_or_insert::<C>().insert(index, component))
    }

    /// Gets a component of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null or stale, or has no `C`.
    #[must_use]
    pub fn get<C: Component>(&self, entity: Entity) -> &C {
        let index = self.live(entity, "get component");
        match self.component_at::<C>(entity, index) {
            Ok(component) => component,
            Err(err) => fatal(&err),
        }
    }

    /// Gets a component of `entity` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null or stale, or has no `C`.
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> &mut C {
        let index = self.live(entity, "get component");
        match self.pool_mut::<C>().and_then(|pool| pool.get_mut::<C>(index)) {
            Some(component) => component,
            None => fatal(&missing::<C>(entity)),
        }
    }

    /// Gets several components of `entity` at once.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null or stale, or lacks any requested type.
    #[must_use]
    pub fn get_all<Q: ComponentSet>(&self, entity: Entity) -> Q::Refs<'_> {
        let index = self.live(entity, "get component");
        match Q::fetch(self, entity, index) {
            Ok(components) => components,
            Err(err) => fatal(&err),
        }
    }

    /// Gets a component of `entity`, or `None` if it has none or the handle
    /// is not live.
    #[must_use]
    pub fn try_get<C: Component>(&self, entity: Entity) -> Option<&C> {
        let index = self.check(entity, "get component").ok()?;
        self.component_index::<C>(index)
    }

    /// Gets a component of `entity` mutably, or `None` if it has none or the
    /// handle is not live.
    pub fn try_get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        let index = self.check(entity, "get component").ok()?;
        self.pool_mut::<C>()?.get_mut::<C>(index)
    }

    /// Gets several components of `entity`, each `None` when absent.
    #[must_use]
    pub fn try_get_all<Q: ComponentSet>(&self, entity: Entity) -> Q::Options<'_> {
        Q::try_fetch(self, self.check(entity, "get component").ok())
    }

    /// Checks whether `entity` has a `C`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null or stale.
    #[must_use]
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        let index = self.live(entity, "check component");
        self.contains_index::<C>(index)
    }

    /// Checks whether `entity` has every requested component.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null or stale.
    #[must_use]
    pub fn has_all<Q: ComponentSet>(&self, entity: Entity) -> bool {
        let index = self.live(entity, "check component");
        Q::type_ids(&self.types)
            .into_iter()
            .all(|id| self.contains_id(id, index))
    }

    /// Removes the `C` of `entity` if it has one.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null or stale.
    pub fn erase<C: Component>(&mut self, entity: Entity) {
        let index = self.live(entity, "erase component");
        self.remove_index::<C>(index);
    }

    /// Removes every requested component `entity` has.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null or stale.
    pub fn erase_all<Q: ComponentSet>(&mut self, entity: Entity) {
        let index = self.live(entity, "erase component");
        Q::remove(self, index);
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Iterates over every entity holding a `C`, in the pool's dense order.
    #[must_use]
    pub fn view<C: Component>(&self) -> View<'_, C> {
        match self.pool::<C>() {
            Some(pool) => View::new(
                &self.entities,
                pool.entities().as_slice(),
                pool.storage::<C>().as_slice(),
            ),
            None => View::new(&self.entities, &[], &[]),
        }
    }

    /// Iterates mutably over every entity holding a `C`, in dense order.
    pub fn view_mut<C: Component>(&mut self) -> ViewMut<'_, C> {
        let id = self.types.id_of::<C>();
        let entities = &self.entities;
        match self.pools.get_mut(id.index()).and_then(Option::as_mut) {
            Some(pool) => {
                let (set, storage) = pool.split_mut::<C>();
                ViewMut::new(entities, set.as_slice(), storage.as_mut_slice())
            }
            None => ViewMut::new(entities, &[], &mut []),
        }
    }

    /// Iterates over every entity holding all of `Q`'s component types.
    ///
    /// Candidates come from the smallest of the requested pools; the end
    /// bound is that pool's size when the group is built.
    #[must_use]
    pub fn group<Q: ComponentSet>(&self) -> Group<'_, Q> {
        let ids = Q::type_ids(&self.types);
        let mut pools = Vec::with_capacity(ids.len());
        for id in ids {
            match self.pool_by_id(id) {
                Some(pool) => pools.push(pool),
                None => return Group::empty(self),
            }
        }

        let Some(driver) = pools
            .iter()
            .enumerate()
            .min_by_key(|(_, pool)| pool.len())
            .map(|(position, _)| position)
        else {
            return Group::empty(self);
        };
        let driver = pools.swap_remove(driver);
        Group::new(self, driver.entities().as_slice(), pools)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Validates `entity`, returning its index.
    fn check(&self, entity: Entity, operation: &'static str) -> EcsResult<u32> {
        if entity.is_null() {
            return Err(EcsError::NullEntity { operation });
        }
        let index = entity.index();
        match self.entities.get(index as usize) {
            Some(&stored) if stored == entity && stored.is_valid() => Ok(index),
            _ => Err(EcsError::StaleEntity { entity, operation }),
        }
    }

    /// Validates `entity`, panicking if it is not live.
    fn live(&self, entity: Entity, operation: &'static str) -> u32 {
        match self.check(entity, operation) {
            Ok(index) => index,
            Err(err) => fatal(&err),
        }
    }

    fn pool<C: Component>(&self) -> Option<&ComponentPool> {
        self.pool_by_id(self.types.id_of::<C>())
    }

    fn pool_mut<C: Component>(&mut self) -> Option<&mut ComponentPool> {
        let id = self.types.id_of::<C>();
        self.pools.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn pool_or_insert<C: Component>(&mut self) -> &mut ComponentPool {
        let id = self.types.id_of::<C>();
        if self.pools.len() <= id.index() {
            self.pools.resize_with(id.index() + 1, || None);
        }
        let capacity = self.config.pool_capacity;
        self.pools[id.index()].get_or_insert_with(|| {
            tracing::trace!("creating pool {} for {}", id, std::any::type_name::<C>());
            ComponentPool::new::<C>(capacity)
        })
    }

    pub(crate) fn pool_by_id(&self, id: ComponentTypeId) -> Option<&ComponentPool> {
        self.pools.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn entity_slots(&self) -> &[Entity] {
        &self.entities
    }

    pub(crate) fn contains_id(&self, id: ComponentTypeId, index: u32) -> bool {
        self.pool_by_id(id).is_some_and(|pool| pool.contains(index))
    }

    pub(crate) fn contains_index<C: Component>(&self, index: u32) -> bool {
        self.pool::<C>().is_some_and(|pool| pool.contains(index))
    }

    pub(crate) fn component_index<C: Component>(&self, index: u32) -> Option<&C> {
        self.pool::<C>()?.get::<C>(index)
    }

    pub(crate) fn component_at<C: Component>(&self, entity: Entity, index: u32) -> EcsResult<&C> {
        self.component_index::<C>(index)
            .ok_or_else(|| missing::<C>(entity))
    }

    pub(crate) fn remove_index<C: Component>(&mut self, index: u32) {
        if let Some(pool) = self.pool_mut::<C>() {
            pool.remove_entity(index);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Registry {
    /// Deep-copies every pool. The copy shares this registry's type table.
    fn clone(&self) -> Self {
        tracing::debug!(
            "copying registry: {} entities, {} pools",
            self.alive_count,
            self.pools.iter().flatten().count()
        );
        Self {
            types: self.types.clone(),
            config: self.config,
            entities: self.entities.clone(),
            free_indices: self.free_indices.clone(),
            pools: self.pools.clone(),
            alive_count: self.alive_count,
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("alive", &self.alive_count)
            .field("slots", &self.entities.len())
            .field("free", &self.free_indices)
            .field("pools", &self.pools.iter().flatten().collect::<Vec<_>>())
            .finish()
    }
}

fn missing<C: Component>(entity: Entity) -> EcsError {
    EcsError::MissingComponent {
        entity,
        component: std::any::type_name::<C>(),
    }
}

/// Logs an invariant violation and panics with its message.
#[cold]
#[inline(never)]
fn fatal(err: &EcsError) -> ! {
    tracing::error!("{}", err);
    panic!("{err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::tests::{Health, Name};

    #[test]
    fn test_create_appends_then_recycles_lifo() {
        let mut registry = Registry::new();
        let a = registry.create();
        let b = registry.create();
        let c = registry.create();
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));
        assert!([a, b, c].iter().all(|e| e.generation() == 0 && e.is_valid()));

        registry.destroy(a);
        registry.destroy(c);
        assert_eq!(registry.free_indices, vec![0, 2]);

        let c2 = registry.create();
        let a2 = registry.create();
        assert_eq!((c2.index(), c2.generation()), (2, 1));
        assert_eq!((a2.index(), a2.generation()), (0, 1));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_destroyed_slot_keeps_generation_and_clears_validity() {
        let mut registry = Registry::new();
        let entity = registry.create();
        registry.destroy(entity);

        let slot = registry.entities[0];
        assert_eq!(slot.generation(), 0);
        assert!(!slot.is_valid());
        assert!(!registry.is_alive(entity));
        assert_eq!(registry.entity_at_index(0), None);
    }

    #[test]
    fn test_check_errors() {
        let mut registry = Registry::new();
        let entity = registry.create();

        assert_eq!(
            registry.check(Entity::NULL, "op"),
            Err(EcsError::NullEntity { operation: "op" })
        );
        let foreign = Entity::new(40, 0, true);
        assert_eq!(
            registry.check(foreign, "op"),
            Err(EcsError::StaleEntity { entity: foreign, operation: "op" })
        );
        assert_eq!(registry.check(entity, "op"), Ok(0));
        // A dead-marked copy of a live handle is rejected too.
        assert!(registry.check(entity.with_validity(false), "op").is_err());
    }

    #[test]
    fn test_pools_grow_to_highest_type_id() {
        let types = ComponentTypes::new();
        types.id_of::<Health>();
        let mut registry = Registry::with_types(types);

        let entity = registry.create();
        registry.emplace(entity, Name("late".into()));
        assert_eq!(registry.pools.len(), 2);
        assert!(registry.pools[0].is_none());
        assert!(registry.pools[1].is_some());
        assert!(!registry.has::<Health>(entity));
    }

    #[test]
    fn test_destroy_removes_from_every_pool() {
        let mut registry = Registry::new();
        let a = registry.create();
        let b = registry.create();
        registry.emplace(a, Health(1));
        registry.emplace(a, Name("a".into()));
        registry.emplace(b, Health(2));

        registry.destroy(a);

        for pool in registry.pools.iter().flatten() {
            assert!(!pool.contains(a.index()));
        }
        assert_eq!(registry.get::<Health>(b), &Health(2));
    }

    #[test]
    fn test_clone_shares_types_not_pools() {
        let mut registry = Registry::new();
        let entity = registry.create();
        registry.emplace(entity, Health(5));

        let mut copy = registry.clone();
        copy.get_mut::<Health>(entity).0 = 50;

        assert!(copy.types().same_table(registry.types()));
        assert_eq!(registry.get::<Health>(entity), &Health(5));
        assert_eq!(copy.get::<Health>(entity), &Health(50));
    }
}
