//! # Views and Groups
//!
//! - [`View`] / [`ViewMut`]: walk one pool's dense arrays, yielding each
//!   entity with its component.
//! - [`Group`]: walk the smallest of several pools, yielding only entities
//!   present in all of them.
//!
//! Multi-type requests are expressed as tuples through [`ComponentSet`],
//! e.g. `registry.group::<(Position, Velocity)>()`.

use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::slice;

use super::component::{Component, ComponentTypeId, ComponentTypes};
use super::entity::Entity;
use super::pool::ComponentPool;
use super::registry::Registry;
use crate::error::EcsResult;

/// A tuple of component types requested together.
///
/// Implemented for tuples of one to eight [`Component`] types.
pub trait ComponentSet: 'static {
    /// Tuple of shared references, one per requested type.
    type Refs<'a>;
    /// Tuple of optional shared references, one per requested type.
    type Options<'a>;

    /// Resolves the type ID of every requested type, in tuple order.
    fn type_ids(types: &ComponentTypes) -> Vec<ComponentTypeId>;

    /// Fetches every requested component of the entity at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::MissingComponent`](crate::EcsError::MissingComponent)
    /// for the first type the entity lacks.
    fn fetch<'a>(registry: &'a Registry, entity: Entity, index: u32) -> EcsResult<Self::Refs<'a>>;

    /// Fetches each requested component, `None` where absent. A `None` index
    /// yields all `None`.
    fn try_fetch<'a>(registry: &'a Registry, index: Option<u32>) -> Self::Options<'a>;

    /// Removes every requested component the entity at `index` has.
    fn remove(registry: &mut Registry, index: u32);
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: Component),+> ComponentSet for ($($name,)+) {
            type Refs<'a> = ($(&'a $name,)+);
            type Options<'a> = ($(Option<&'a $name>,)+);

            fn type_ids(types: &ComponentTypes) -> Vec<ComponentTypeId> {
                vec![$(types.id_of::<$name>()),+]
            }

            fn fetch<'a>(
                registry: &'a Registry,
                entity: Entity,
                index: u32,
            ) -> EcsResult<Self::Refs<'a>> {
                Ok(($(registry.component_at::<$name>(entity, index)?,)+))
            }

            fn try_fetch<'a>(registry: &'a Registry, index: Option<u32>) -> Self::Options<'a> {
                ($(index.and_then(|index| registry.component_index::<$name>(index)),)+)
            }

            fn remove(registry: &mut Registry, index: u32) {
                $(registry.remove_index::<$name>(index);)+
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

/// Iterator over `(Entity, &C)` for every entity holding a `C`.
///
/// Created by [`Registry::view`].
pub struct View<'a, C: Component> {
    entities: &'a [Entity],
    indices: slice::Iter<'a, u32>,
    components: slice::Iter<'a, C>,
}

impl<'a, C: Component> View<'a, C> {
    pub(crate) fn new(entities: &'a [Entity], indices: &'a [u32], components: &'a [C]) -> Self {
        debug_assert_eq!(indices.len(), components.len());
        Self {
            entities,
            indices: indices.iter(),
            components: components.iter(),
        }
    }

    /// Iterates over the entities only.
    pub fn entities(self) -> impl Iterator<Item = Entity> + 'a {
        self.map(|(entity, _)| entity)
    }
}

impl<'a, C: Component> Iterator for View<'a, C> {
    type Item = (Entity, &'a C);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = *self.indices.next()?;
        let component = self.components.next()?;
        Some((self.entities[index as usize], component))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<C: Component> ExactSizeIterator for View<'_, C> {}

impl<C: Component> FusedIterator for View<'_, C> {}

/// Iterator over `(Entity, &mut C)` for every entity holding a `C`.
///
/// Created by [`Registry::view_mut`].
pub struct ViewMut<'a, C: Component> {
    entities: &'a [Entity],
    indices: slice::Iter<'a, u32>,
    components: slice::IterMut<'a, C>,
}

impl<'a, C: Component> ViewMut<'a, C> {
    pub(crate) fn new(
        entities: &'a [Entity],
        indices: &'a [u32],
        components: &'a mut [C],
    ) -> Self {
        debug_assert_eq!(indices.len(), components.len());
        Self {
            entities,
            indices: indices.iter(),
            components: components.iter_mut(),
        }
    }
}

impl<'a, C: Component> Iterator for ViewMut<'a, C> {
    type Item = (Entity, &'a mut C);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = *self.indices.next()?;
        let component = self.components.next()?;
        Some((self.entities[index as usize], component))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl<C: Component> ExactSizeIterator for ViewMut<'_, C> {}

impl<C: Component> FusedIterator for ViewMut<'_, C> {}

/// Iterator over every entity holding all of `Q`'s component types.
///
/// Created by [`Registry::group`]. The candidate range is the driving
/// pool's dense array as it was when the group was built.
pub struct Group<'a, Q: ComponentSet> {
    registry: &'a Registry,
    /// Dense array of the smallest requested pool.
    driver: &'a [u32],
    /// The remaining requested pools each candidate is checked against.
    others: Vec<&'a ComponentPool>,
    position: usize,
    end: usize,
    _marker: PhantomData<fn() -> Q>,
}

impl<'a, Q: ComponentSet> Group<'a, Q> {
    pub(crate) fn new(
        registry: &'a Registry,
        driver: &'a [u32],
        others: Vec<&'a ComponentPool>,
    ) -> Self {
        Self {
            registry,
            driver,
            others,
            position: 0,
            end: driver.len(),
            _marker: PhantomData,
        }
    }

    pub(crate) fn empty(registry: &'a Registry) -> Self {
        Self::new(registry, &[], Vec::new())
    }

    /// Returns the size of the driving pool, an upper bound on the number of
    /// entities yielded.
    #[must_use]
    pub fn candidates(&self) -> usize {
        self.end
    }

    /// Yields each entity together with its requested components.
    pub fn with_components(self) -> impl Iterator<Item = (Entity, Q::Refs<'a>)> + 'a {
        let registry = self.registry;
        self.filter_map(move |entity| {
            Q::fetch(registry, entity, entity.index())
                .ok()
                .map(|components| (entity, components))
        })
    }
}

impl<Q: ComponentSet> Iterator for Group<'_, Q> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        while self.position < self.end {
            let index = self.driver[self.position];
            self.position += 1;
            if self.others.iter().all(|pool| pool.contains(index)) {
                return Some(self.registry.entity_slots()[index as usize]);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.end - self.position))
    }
}

impl<Q: ComponentSet> FusedIterator for Group<'_, Q> {}
