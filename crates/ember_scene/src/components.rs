//! # Scene Components
//!
//! The components every scene entity may carry. The relationship component
//! threads entities into a tree through intrusive sibling links.

use bytemuck::{Pod, Zeroable};
use ember_ecs::{Component, Entity};

/// Persistent entity identifier, stable across copies of a scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IdComponent(pub u64);
impl Component for IdComponent {}

/// Human-readable entity name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagComponent(pub String);
impl Component for TagComponent {}

impl Default for TagComponent {
    fn default() -> Self {
        Self("Default_Entity".to_owned())
    }
}

impl From<&str> for TagComponent {
    fn from(tag: &str) -> Self {
        Self(tag.to_owned())
    }
}

/// Local translation, Euler rotation (radians) and scale.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct TransformComponent {
    /// Translation.
    pub translation: [f32; 3],
    /// Rotation as Euler angles in radians.
    pub rotation: [f32; 3],
    /// Per-axis scale.
    pub scale: [f32; 3],
}
impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl TransformComponent {
    /// Identity transform moved to `translation`.
    #[must_use]
    pub fn from_translation(translation: [f32; 3]) -> Self {
        Self {
            translation,
            ..Self::default()
        }
    }
}

/// Links of an entity into the scene tree.
///
/// Children form a doubly linked list starting at the parent's
/// `first_child`. Every link is [`Entity::NULL`] when absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelationshipComponent {
    /// Parent entity.
    pub parent: Entity,
    /// First entity of the child list.
    pub first_child: Entity,
    /// Previous entity in the parent's child list.
    pub prev_sibling: Entity,
    /// Next entity in the parent's child list.
    pub next_sibling: Entity,
}
impl Component for RelationshipComponent {}

impl Default for RelationshipComponent {
    fn default() -> Self {
        Self {
            parent: Entity::NULL,
            first_child: Entity::NULL,
            prev_sibling: Entity::NULL,
            next_sibling: Entity::NULL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let relation = RelationshipComponent::default();
        assert!(relation.parent.is_null() && relation.first_child.is_null());
        assert!(relation.prev_sibling.is_null() && relation.next_sibling.is_null());
        assert_eq!(TransformComponent::default().scale, [1.0; 3]);
        assert_eq!(TagComponent::default().0, "Default_Entity");
    }

    #[test]
    fn test_transform_is_plain_data() {
        let transform = TransformComponent::from_translation([1.0, 2.0, 3.0]);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&transform));
        assert_eq!(floats.len(), 9);
        assert_eq!(&floats[..3], &[1.0, 2.0, 3.0]);
        assert_eq!(&floats[6..], &[1.0; 3]);
    }
}
