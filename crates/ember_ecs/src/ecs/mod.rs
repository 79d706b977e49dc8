//! # Entity Component System
//!
//! A sparse-set ECS: one dense, swap-remove maintained pool per component
//! type, addressed through a sparse array keyed by entity index.
//!
//! ## Layering
//!
//! - [`Entity`]: packed `{index, generation, validity}` handle
//! - [`SparseSet`]: entity index <-> dense position map
//! - [`ComponentStorage`] / [`ComponentPool`]: dense values kept aligned with
//!   the sparse set, type-erased behind [`ErasedStorage`]
//! - [`Registry`]: entity lifecycle and per-type pools
//! - [`View`], [`ViewMut`], [`Group`]: iteration on top of the registry

mod component;
mod entity;
mod pool;
mod query;
mod registry;
mod sparse_set;
mod storage;

pub use component::{Component, ComponentTypeId, ComponentTypes};
pub use entity::Entity;
pub use pool::ComponentPool;
pub use query::{ComponentSet, Group, View, ViewMut};
pub use registry::Registry;
pub use sparse_set::SparseSet;
pub use storage::{ComponentStorage, ErasedStorage};
