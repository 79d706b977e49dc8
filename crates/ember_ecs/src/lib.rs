//! # Ember ECS
//!
//! Sparse-set entity/component registry designed for:
//! - O(1) create, destroy and component membership tests
//! - Generation-tagged handles that detect stale references
//! - Dense, cache-friendly iteration of one or several component types
//!
//! ## Architecture Rules
//!
//! 1. **Paired removals** - a sparse set and its component storage are always
//!    swap-removed at the same position
//! 2. **No hidden globals** - component type IDs come from an explicit
//!    [`ComponentTypes`] table
//! 3. **Borrows, not pointers** - component references cannot outlive a
//!    structural mutation of the registry
//!
//! ## Example
//!
//! ```rust
//! use ember_ecs::{Component, Registry};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Position(f32, f32);
//! impl Component for Position {}
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Velocity(f32, f32);
//! impl Component for Velocity {}
//!
//! let mut registry = Registry::new();
//! let a = registry.create();
//! let b = registry.create();
//! registry.emplace(a, Position(0.0, 0.0));
//! registry.emplace(a, Velocity(1.0, 0.0));
//! registry.emplace(b, Position(5.0, 5.0));
//!
//! let moving: Vec<_> = registry.group::<(Position, Velocity)>().collect();
//! assert_eq!(moving, vec![a]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
// Entity indices are u32 by layout; table size is asserted at creation.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;

pub use config::RegistryConfig;
pub use ecs::{
    Component, ComponentPool, ComponentSet, ComponentStorage, ComponentTypeId, ComponentTypes,
    Entity, ErasedStorage, Group, Registry, SparseSet, View, ViewMut,
};
pub use error::{EcsError, EcsResult};
