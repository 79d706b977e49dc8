//! # Entity Handles
//!
//! Entities are lightweight 64-bit identifiers consisting of:
//! - An index into the entity table (and the key into every sparse set)
//! - A generation counter for safe reuse
//! - A validity bit that is cleared when the slot is destroyed
//!
//! ```text
//! | 32-bit index | 31-bit generation | 1-bit validity |
//! ```

use std::fmt;

use bytemuck::{Pod, Zeroable};

/// Mask of the 31 bits available to the generation counter.
const GENERATION_MASK: u32 = 0x7FFF_FFFF;

/// Raw bit pattern of the null handle: all-ones index, generation 0, invalid.
const NULL_BITS: u64 = 0xFFFF_FFFF_0000_0000;

/// Unique identifier for an entity.
///
/// Two handles are equal iff their full 64-bit representations match, so a
/// stale handle to a recycled index (old generation) never equals the live
/// handle stored at that index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Pod, Zeroable)]
#[repr(transparent)]
pub struct Entity(u64);

impl Entity {
    /// The null handle. Compares equal only to itself.
    pub const NULL: Self = Self(NULL_BITS);

    /// Packs an index, generation and validity bit into a handle.
    ///
    /// # Arguments
    ///
    /// * `index` - The index into the entity table
    /// * `generation` - The generation counter (only the low 31 bits are kept)
    /// * `valid` - Whether the handle refers to a live slot
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32, valid: bool) -> Self {
        Self(((index as u64) << 32) | (((generation & GENERATION_MASK) as u64) << 1) | valid as u64)
    }

    /// Rebuilds a handle from its raw 64-bit representation.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw 64-bit representation.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Returns the index portion of the handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 as u32) >> 1
    }

    /// Returns the validity bit.
    #[inline]
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 & 1 == 1
    }

    /// Checks if this is the null handle.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == NULL_BITS
    }

    /// Returns a copy of this handle with the validity bit replaced.
    #[inline]
    #[must_use]
    pub const fn with_validity(self, valid: bool) -> Self {
        Self((self.0 & !1) | valid as u64)
    }

    /// Returns the handle that reuses this index with the next generation.
    #[inline]
    #[must_use]
    pub(crate) const fn next_generation(self) -> Self {
        Self::new(self.index(), self.generation().wrapping_add(1), true)
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("Entity(null)");
        }
        write!(f, "Entity({}v{}", self.index(), self.generation())?;
        if !self.is_valid() {
            f.write_str(" dead")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("null")
        } else {
            write!(f, "{}:{}", self.index(), self.generation())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_roundtrip() {
        for &(index, generation, valid) in &[
            (0, 0, true),
            (12345, 67890, false),
            (u32::MAX - 1, GENERATION_MASK, true),
            (7, 1, false),
        ] {
            let entity = Entity::new(index, generation, valid);
            assert_eq!(entity.index(), index);
            assert_eq!(entity.generation(), generation);
            assert_eq!(entity.is_valid(), valid);
        }
    }

    #[test]
    fn test_bit_layout() {
        let entity = Entity::new(3, 5, true);
        assert_eq!(entity.to_bits(), (3u64 << 32) | (5 << 1) | 1);
        assert_eq!(Entity::from_bits(entity.to_bits()), entity);
    }

    #[test]
    fn test_generation_truncated_to_31_bits() {
        let entity = Entity::new(1, u32::MAX, true);
        assert_eq!(entity.generation(), GENERATION_MASK);
        assert_eq!(entity.index(), 1);
        assert!(entity.is_valid());
    }

    #[test]
    fn test_null() {
        assert!(Entity::NULL.is_null());
        assert!(!Entity::NULL.is_valid());
        assert_eq!(Entity::NULL.index(), u32::MAX);
        assert_eq!(Entity::default(), Entity::NULL);
        assert_ne!(Entity::new(0, 0, false), Entity::NULL);
        assert_eq!(Entity::from_bits(NULL_BITS), Entity::NULL);
    }

    #[test]
    fn test_equality_is_bitwise() {
        let old = Entity::new(4, 0, true);
        let recycled = old.next_generation();
        assert_eq!(recycled.index(), old.index());
        assert_eq!(recycled.generation(), 1);
        assert_ne!(old, recycled);
        assert_ne!(old, old.with_validity(false));
        assert_eq!(old.with_validity(false).with_validity(true), old);
    }

    #[test]
    fn test_formatting() {
        let entity = Entity::new(2, 3, true);
        assert_eq!(format!("{entity}"), "2:3");
        assert_eq!(format!("{entity:?}"), "Entity(2v3)");
        assert_eq!(format!("{:?}", entity.with_validity(false)), "Entity(2v3 dead)");
        assert_eq!(format!("{}", Entity::NULL), "null");
    }

    #[test]
    fn test_entity_size() {
        assert_eq!(std::mem::size_of::<Entity>(), 8);
        let entity = Entity::new(1, 0, true);
        let bytes = bytemuck::bytes_of(&entity);
        assert_eq!(bytes.len(), 8);
    }
}
