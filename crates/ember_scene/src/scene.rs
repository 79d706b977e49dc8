//! # Scene
//!
//! A registry plus an entity tree. Every scene owns a *world entity*, the
//! implicit root that parentless entities hang under. Passing
//! [`Entity::NULL`] as a parent always means the world entity.
//!
//! Tree links live in [`RelationshipComponent`]s. An entity without one is
//! outside the tree; it gains one as soon as it is reparented or gets a
//! child.
//!
//! ## IDs
//!
//! [`IdComponent`] values come from a shared generator. Scenes without an
//! explicit seed all draw from one process-wide generator seeded from OS
//! entropy, and a cloned scene keeps drawing from its original's generator,
//! so IDs never repeat across scenes or play-mode copies.

use std::fmt;
use std::sync::{Arc, OnceLock};

use ember_ecs::{Entity, Registry};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::components::{IdComponent, RelationshipComponent, TagComponent, TransformComponent};
use crate::config::SceneConfig;
use crate::error::SceneResult;

/// Tag given to the world entity.
pub const WORLD_TAG: &str = "World";

type IdGenerator = Arc<Mutex<ChaCha8Rng>>;

/// The generator shared by every unseeded scene.
fn process_ids() -> IdGenerator {
    static IDS: OnceLock<IdGenerator> = OnceLock::new();
    IDS.get_or_init(|| {
        let seed = match getrandom::u64() {
            Ok(seed) => seed,
            Err(err) => {
                tracing::error!("cannot seed entity IDs: {}", err);
                panic!("cannot seed entity IDs: {err}");
            }
        };
        Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed)))
    })
    .clone()
}

/// Entity hierarchy backed by a [`Registry`].
pub struct Scene {
    name: String,
    registry: Registry,
    /// Root of the tree, always at index 0.
    world: Entity,
    /// Source of [`IdComponent`] values, shared with clones.
    ids: IdGenerator,
}

impl Scene {
    /// Creates a scene holding only the world entity.
    ///
    /// # Panics
    ///
    /// Panics if no seed is configured and the OS entropy source fails.
    #[must_use]
    pub fn new(config: SceneConfig) -> Self {
        let mut registry = Registry::with_config(config.registry);
        let ids = match config.id_seed {
            Some(seed) => Arc::new(Mutex::new(ChaCha8Rng::seed_from_u64(seed))),
            None => process_ids(),
        };

        let world = registry.create();
        debug_assert_eq!(world.index(), 0);
        let id = IdComponent(ids.lock().gen());
        registry.emplace(world, id);
        registry.emplace(world, TagComponent::from(WORLD_TAG));

        tracing::debug!("created scene '{}'", config.name);
        Self {
            name: config.name,
            registry,
            world,
            ids,
        }
    }

    /// Creates a scene from TOML configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidConfig`](crate::SceneError::InvalidConfig)
    /// if the text does not parse.
    pub fn from_toml_str(text: &str) -> SceneResult<Self> {
        SceneConfig::from_toml_str(text).map(Self::new)
    }

    /// Returns the scene name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the underlying registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the underlying registry mutably.
    ///
    /// Editing [`RelationshipComponent`]s directly can break the tree.
    #[inline]
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Returns the world entity.
    #[inline]
    #[must_use]
    pub const fn world_entity(&self) -> Entity {
        self.world
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Creates an entity as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not null and not alive.
    pub fn create_entity_with_parent(&mut self, parent: Entity) -> Entity {
        let parent = self.or_world(parent);
        let entity = self.registry.create();
        self.registry.emplace(
            entity,
            RelationshipComponent {
                parent,
                ..RelationshipComponent::default()
            },
        );

        let first = self.relation_mut(parent).first_child;
        if first.is_null() {
            self.relation_mut(parent).first_child = entity;
            return entity;
        }

        let mut last = first;
        loop {
            let next = self.relation(last).next_sibling;
            if next.is_null() {
                break;
            }
            last = next;
        }
        self.relation_mut(last).next_sibling = entity;
        self.relation_mut(entity).prev_sibling = last;
        entity
    }

    /// Creates a child of `parent` with a fresh ID and the given tag.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not null and not alive.
    pub fn create_entity_with_tag_and_parent(&mut self, tag: &str, parent: Entity) -> Entity {
        let entity = self.create_entity_with_parent(parent);
        let id = self.next_id();
        self.registry.emplace(entity, id);
        self.registry.emplace(entity, TagComponent::from(tag));
        entity
    }

    /// Creates a child of `parent` with a fresh ID, the given tag and an
    /// identity transform.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not null and not alive.
    pub fn create_entity_with_tag_transform_and_parent(
        &mut self,
        tag: &str,
        parent: Entity,
    ) -> Entity {
        let entity = self.create_entity_with_tag_and_parent(tag, parent);
        self.registry.emplace(entity, TransformComponent::default());
        entity
    }

    // =========================================================================
    // Tree edits
    // =========================================================================

    /// Destroys `entity` and all of its descendants, unlinking it from its
    /// parent and siblings. Null is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is stale.
    pub fn destroy_entity_tree(&mut self, entity: Entity) {
        if entity.is_null() {
            return;
        }

        if let Some(relation) = self.registry.try_get::<RelationshipComponent>(entity).copied() {
            let mut child = relation.first_child;
            while !child.is_null() {
                let next = self.relation(child).next_sibling;
                self.destroy_entity_tree(child);
                child = next;
            }
            self.unlink(entity, relation);
        }
        self.registry.destroy(entity);
    }

    /// Moves `entity` to the front of `dest`'s children. A null `dest` means
    /// the world entity.
    ///
    /// Does nothing if `entity` is `dest` or the world entity, if `dest` lies
    /// inside `entity`'s subtree, or if `dest` already is the parent.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is null, or either entity is stale. Nothing is
    /// modified in that case.
    pub fn reparent_entity(&mut self, entity: Entity, dest: Entity) {
        if entity.is_null() {
            tracing::error!("cannot reparent the null entity");
            panic!("cannot reparent the null entity");
        }

        let dest = self.or_world(dest);
        self.require_alive(entity, "reparent");
        self.require_alive(dest, "reparent");
        if entity == dest || entity == self.world {
            return;
        }
        if self.is_entity_in_hierarchy(dest, entity) {
            return;
        }

        let relation = self.relation(entity);
        if relation.parent == dest {
            return;
        }
        let first = self.relation(dest).first_child;

        self.unlink(entity, relation);
        *self.relation_mut(entity) = RelationshipComponent {
            parent: dest,
            first_child: relation.first_child,
            prev_sibling: Entity::NULL,
            next_sibling: first,
        };
        if !first.is_null() {
            self.relation_mut(first).prev_sibling = entity;
        }
        self.relation_mut(dest).first_child = entity;
        tracing::trace!("reparented {} under {}", entity, dest);
    }

    /// Copies `src` together with its subtree.
    ///
    /// Every copy gets a fresh [`IdComponent`]. If `src` has a parent, the
    /// copy is linked in right after `src`; an entity outside the tree is
    /// copied flat.
    ///
    /// # Panics
    ///
    /// Panics if `src` is null or stale.
    pub fn duplicate_entity(&mut self, src: Entity) -> Entity {
        if !self.registry.has::<RelationshipComponent>(src) {
            return self.duplicate_flat(src);
        }

        let copy = self.duplicate_tree(src);
        let relation = self.relation(src);
        if relation.parent.is_null() {
            return copy;
        }

        let next = relation.next_sibling;
        {
            let copied = self.relation_mut(copy);
            copied.parent = relation.parent;
            copied.prev_sibling = src;
            copied.next_sibling = next;
        }
        self.relation_mut(src).next_sibling = copy;
        if !next.is_null() {
            self.relation_mut(next).prev_sibling = copy;
        }
        copy
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Checks whether `key` is a strict descendant of `parent`.
    #[must_use]
    pub fn is_entity_in_hierarchy(&self, key: Entity, parent: Entity) -> bool {
        let mut current = key;
        while let Some(relation) = self.registry.try_get::<RelationshipComponent>(current) {
            if relation.parent.is_null() {
                return false;
            }
            if relation.parent == parent {
                return true;
            }
            current = relation.parent;
        }
        false
    }

    /// Checks whether `entity` hangs directly under the world entity.
    #[must_use]
    pub fn is_entity_root(&self, entity: Entity) -> bool {
        self.parent(entity) == self.world
    }

    /// Returns the parent of `entity`, or [`Entity::NULL`] if it has none.
    #[must_use]
    pub fn parent(&self, entity: Entity) -> Entity {
        self.relation(entity).parent
    }

    /// Returns the children of `entity` in sibling order.
    #[must_use]
    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        let mut children = Vec::new();
        let mut child = self.relation(entity).first_child;
        while !child.is_null() {
            children.push(child);
            child = self.relation(child).next_sibling;
        }
        children
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn or_world(&self, entity: Entity) -> Entity {
        if entity.is_null() {
            self.world
        } else {
            entity
        }
    }

    /// Panics unless `entity` is live.
    fn require_alive(&self, entity: Entity, operation: &str) {
        if !self.registry.is_alive(entity) {
            tracing::error!("cannot {}: {:?} is not alive", operation, entity);
            panic!("cannot {operation}: {entity:?} is not alive");
        }
    }

    fn next_id(&self) -> IdComponent {
        IdComponent(self.ids.lock().gen())
    }

    /// Copy of the links of `entity`; all null if it has none.
    fn relation(&self, entity: Entity) -> RelationshipComponent {
        self.registry
            .try_get::<RelationshipComponent>(entity)
            .copied()
            .unwrap_or_default()
    }

    /// Links of `entity`, attaching empty ones first if it has none.
    fn relation_mut(&mut self, entity: Entity) -> &mut RelationshipComponent {
        if !self.registry.has::<RelationshipComponent>(entity) {
            return self.registry.emplace(entity, RelationshipComponent::default());
        }
        self.registry.get_mut::<RelationshipComponent>(entity)
    }

    /// Removes `entity` from its parent's child list.
    fn unlink(&mut self, entity: Entity, relation: RelationshipComponent) {
        if !relation.parent.is_null() {
            let parent = self.relation_mut(relation.parent);
            if parent.first_child == entity {
                parent.first_child = relation.next_sibling;
            }
        }
        if !relation.prev_sibling.is_null() {
            self.relation_mut(relation.prev_sibling).next_sibling = relation.next_sibling;
        }
        if !relation.next_sibling.is_null() {
            self.relation_mut(relation.next_sibling).prev_sibling = relation.prev_sibling;
        }
    }

    /// Copies every component of `src` onto a new entity with a fresh ID.
    fn duplicate_flat(&mut self, src: Entity) -> Entity {
        let dest = self.registry.duplicate(src);
        let id = self.next_id();
        if let Some(existing) = self.registry.try_get_mut::<IdComponent>(dest) {
            *existing = id;
        } else {
            self.registry.emplace(dest, id);
        }
        dest
    }

    /// Copies `src` and its subtree. The copy of `src` itself is unlinked.
    fn duplicate_tree(&mut self, src: Entity) -> Entity {
        let dest = self.duplicate_flat(src);
        *self.relation_mut(dest) = RelationshipComponent::default();

        let mut previous = Entity::NULL;
        for child in self.children(src) {
            let copy = self.duplicate_tree(child);
            {
                let copied = self.relation_mut(copy);
                copied.parent = dest;
                copied.prev_sibling = previous;
            }
            if previous.is_null() {
                self.relation_mut(dest).first_child = copy;
            } else {
                self.relation_mut(previous).next_sibling = copy;
            }
            previous = copy;
        }
        dest
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Clone for Scene {
    /// Deep-copies the registry, e.g. to enter play mode without touching
    /// the edited scene.
    fn clone(&self) -> Self {
        tracing::debug!("copying scene '{}'", self.name);
        Self {
            name: self.name.clone(),
            registry: self.registry.clone(),
            world: self.world,
            ids: Arc::clone(&self.ids),
        }
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("world", &self.world)
            .field("entities", &self.registry.len())
            .finish()
    }
}
