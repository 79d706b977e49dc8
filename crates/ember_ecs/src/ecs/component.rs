//! # Component Types
//!
//! Components are plain data values attached to at most one entity per type.
//! Every component type is assigned a small integer ID the first time a
//! registry sees it; the ID is the index of the type's pool.
//!
//! IDs are handed out by an explicit [`ComponentTypes`] table instead of a
//! process-wide counter. Registries that share a table agree on IDs, which is
//! what lets a registry be deep-copied pool-for-pool.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Clone`: registries and entities can be deep-copied
/// - `Send`: a registry can be handed to a simulation thread
/// - `'static`: storages are recovered through `Any`
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Debug)]
/// struct Tag(String);
///
/// impl Component for Tag {}
/// ```
pub trait Component: Clone + Send + 'static {}

/// Per-type integer ID, used as an index into the registry's pools.
///
/// Only meaningful within the [`ComponentTypes`] table that issued it; never
/// persist it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ComponentTypeId(u32);

impl ComponentTypeId {
    /// Returns the ID as a pool index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Default)]
struct TypeTable {
    ids: HashMap<TypeId, ComponentTypeId>,
    names: Vec<&'static str>,
}

/// Table assigning [`ComponentTypeId`]s to Rust types.
///
/// Cloning is cheap and yields a handle to the same table.
#[derive(Clone, Default)]
pub struct ComponentTypes {
    table: Arc<RwLock<TypeTable>>,
}

impl ComponentTypes {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ID of `C`, assigning the next unused one on first use.
    pub fn id_of<C: Component>(&self) -> ComponentTypeId {
        let type_id = TypeId::of::<C>();
        if let Some(&id) = self.table.read().ids.get(&type_id) {
            return id;
        }

        let mut table = self.table.write();
        if let Some(&id) = table.ids.get(&type_id) {
            return id;
        }
        let id = ComponentTypeId(table.names.len() as u32);
        table.ids.insert(type_id, id);
        table.names.push(std::any::type_name::<C>());
        tracing::trace!("assigned component id {} to {}", id, std::any::type_name::<C>());
        id
    }

    /// Returns the ID of `C` if it has been assigned.
    #[must_use]
    pub fn lookup<C: Component>(&self) -> Option<ComponentTypeId> {
        self.table.read().ids.get(&TypeId::of::<C>()).copied()
    }

    /// Returns the Rust type name registered under `id`, for diagnostics.
    #[must_use]
    pub fn name_of(&self, id: ComponentTypeId) -> Option<&'static str> {
        self.table.read().names.get(id.index()).copied()
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().names.len()
    }

    /// Returns `true` if no type has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks whether two handles point at the same table.
    #[must_use]
    pub fn same_table(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }
}

impl fmt::Debug for ComponentTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.table.read().names.iter()).finish()
    }
}
