//! # Ember Scene
//!
//! Entity hierarchy built on [`ember_ecs`]:
//! - Scene components: [`IdComponent`], [`TagComponent`],
//!   [`TransformComponent`], [`RelationshipComponent`]
//! - [`Scene`]: a registry plus a tree rooted at the world entity
//!
//! ## Example
//!
//! ```rust
//! use ember_ecs::Entity;
//! use ember_scene::{Scene, SceneConfig};
//!
//! let mut scene = Scene::new(SceneConfig::default().with_name("Sandbox"));
//! let player = scene.create_entity_with_tag_transform_and_parent("Player", Entity::NULL);
//! let camera = scene.create_entity_with_tag_and_parent("Camera", player);
//!
//! assert!(scene.is_entity_root(player));
//! assert!(scene.is_entity_in_hierarchy(camera, player));
//!
//! scene.destroy_entity_tree(player);
//! assert!(!scene.registry().is_alive(camera));
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::perf)]

pub mod components;
pub mod config;
pub mod error;
pub mod scene;

pub use components::{IdComponent, RelationshipComponent, TagComponent, TransformComponent};
pub use config::SceneConfig;
pub use error::{SceneError, SceneResult};
pub use scene::{Scene, WORLD_TAG};
