//! # Registry Error Types
//!
//! Invariant violations the registry can detect. The panicking API logs
//! these and aborts the call; the `try_` variants hand them back.

use thiserror::Error;

use crate::ecs::Entity;

/// Errors that can occur in registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The null handle was passed to an operation that needs a live entity.
    #[error("failed to {operation}: entity is null")]
    NullEntity {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// The handle refers to a destroyed or recycled slot.
    #[error("failed to {operation}: invalid or outdated handle {entity:?}")]
    StaleEntity {
        /// The rejected handle.
        entity: Entity,
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// The entity already has a component of this type.
    #[error("failed to emplace component: {entity:?} already has {component}")]
    DuplicateComponent {
        /// The entity.
        entity: Entity,
        /// Rust type name of the component.
        component: &'static str,
    },

    /// The entity has no component of this type.
    #[error("failed to get component: {entity:?} has no {component}")]
    MissingComponent {
        /// The entity.
        entity: Entity,
        /// Rust type name of the component.
        component: &'static str,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for registry operations.
pub type EcsResult<T> = Result<T, EcsError>;
