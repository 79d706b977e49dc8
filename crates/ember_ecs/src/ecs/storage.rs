//! # Component Storage
//!
//! Dense, growable storage for a single component type.
//!
//! The storage is index-aligned with a [`SparseSet`](super::SparseSet):
//! position `i` holds the component of the entity at dense position `i`.
//! It performs no bookkeeping of its own; the owning pool validates every
//! position before calling in.

use std::any::Any;

use super::component::Component;

/// Dense array of components of type `C`.
///
/// # Example
///
/// ```rust,ignore
/// let mut storage: ComponentStorage<Position> = ComponentStorage::new();
/// storage.emplace(Position::new(1.0, 2.0, 3.0));
/// storage.remove(0);
/// ```
#[derive(Clone, Debug)]
pub struct ComponentStorage<C: Component> {
    /// The dense array of components.
    data: Vec<C>,
}

impl<C: Component> Default for ComponentStorage<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Component> ComponentStorage<C> {
    /// Creates empty storage.
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates empty storage with room for `capacity` components.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    /// Appends a component and returns a reference to it.
    ///
    /// The reference is valid until the next structural mutation of this
    /// storage.
    #[inline]
    pub fn emplace(&mut self, component: C) -> &mut C {
        let position = self.data.len();
        self.data.push(component);
        &mut self.data[position]
    }

    /// Gets the component at a dense position.
    #[inline]
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&C> {
        self.data.get(position)
    }

    /// Gets the component at a dense position mutably.
    #[inline]
    pub fn get_mut(&mut self, position: usize) -> Option<&mut C> {
        self.data.get_mut(position)
    }

    /// Removes the component at `position`, moving the last component into
    /// its slot.
    ///
    /// # Returns
    ///
    /// The removed component, or `None` if `position` was out of bounds.
    #[inline]
    pub fn remove(&mut self, position: usize) -> Option<C> {
        (position < self.data.len()).then(|| self.data.swap_remove(position))
    }

    /// Returns the number of stored components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no components are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a slice of all components in dense order.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.data
    }

    /// Returns a mutable slice of all components in dense order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.data
    }
}

/// Object-safe view of a [`ComponentStorage`] with its type erased.
///
/// The registry keeps one of these per component type and recovers the
/// concrete storage through [`ErasedStorage::as_any`].
pub trait ErasedStorage: Send {
    /// Swap-removes the component at `position`.
    fn remove_at(&mut self, position: usize);

    /// Pushes a clone of the component at `position` onto the end.
    fn duplicate_at(&mut self, position: usize);

    /// Deep-copies the storage.
    fn clone_boxed(&self) -> Box<dyn ErasedStorage>;

    /// Returns the number of stored components.
    fn len(&self) -> usize;

    /// Returns `true` if no components are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the Rust type name of the stored component.
    fn type_name(&self) -> &'static str;

    /// Upcasts for downcasting to the concrete storage.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts for downcasting to the concrete storage.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedStorage for ComponentStorage<C> {
    fn remove_at(&mut self, position: usize) {
        self.remove(position);
    }

    fn duplicate_at(&mut self, position: usize) {
        let copy = self.data[position].clone();
        self.data.push(copy);
    }

    fn clone_boxed(&self) -> Box<dyn ErasedStorage> {
        Box::new(self.clone())
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<C>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
