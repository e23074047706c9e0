//! Per-position block state.

use basalt_registry::{BlockDefinition, PropertyKey};
use basalt_utils::{BlockId, BlockPos};
use smallvec::SmallVec;

use crate::error::WorldError;

/// Maximum light level for both channels.
pub const MAX_LIGHT: u8 = 15;

/// A small open map of state properties.
///
/// Entries are kept sorted by key so that equal maps compare equal
/// regardless of insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyMap(SmallVec<[(PropertyKey, u8); 2]>);

impl PropertyMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: PropertyKey) -> Option<u8> {
        self.0
            .binary_search_by_key(&key, |(k, _)| *k)
            .ok()
            .map(|i| self.0[i].1)
    }

    /// Inserts or replaces the value for `key`.
    pub fn set(&mut self, key: PropertyKey, value: u8) {
        match self.0.binary_search_by_key(&key, |(k, _)| *k) {
            Ok(i) => self.0[i].1 = value,
            Err(i) => self.0.insert(i, (key, value)),
        }
    }

    /// Removes `key`, returning its previous value.
    pub fn remove(&mut self, key: PropertyKey) -> Option<u8> {
        self.0
            .binary_search_by_key(&key, |(k, _)| *k)
            .ok()
            .map(|i| self.0.remove(i).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (PropertyKey, u8)> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The mutable per-position record: block id, properties, light levels,
/// and the waterlogged flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockState {
    pub id: BlockId,
    pub properties: PropertyMap,
    pub sky_light: u8,
    pub block_light: u8,
    pub waterlogged: bool,
}

impl BlockState {
    /// A state of the given block with empty properties and no light.
    #[must_use]
    pub fn of(id: BlockId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Builder-style property setter.
    #[must_use]
    pub fn with_property(mut self, key: PropertyKey, value: u8) -> Self {
        self.properties.set(key, value);
        self
    }

    /// Returns the value of `key`, if set.
    #[must_use]
    pub fn property(&self, key: PropertyKey) -> Option<u8> {
        self.properties.get(key)
    }

    /// Checks this state against its definition's invariants.
    ///
    /// # Errors
    /// [`WorldError::CorruptBlockState`] when a light level exceeds 15 or
    /// a property key falls outside the definition's schema.
    pub fn validate(&self, definition: &BlockDefinition, pos: BlockPos) -> Result<(), WorldError> {
        if self.sky_light > MAX_LIGHT || self.block_light > MAX_LIGHT {
            return Err(WorldError::CorruptBlockState {
                pos,
                reason: "light level above 15",
            });
        }
        for (key, _) in self.properties.iter() {
            if !definition.allows_property(key) {
                return Err(WorldError::CorruptBlockState {
                    pos,
                    reason: "property outside the block's schema",
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use basalt_registry::builtin;

    use super::*;

    #[test]
    fn property_map_is_order_insensitive() {
        let mut a = PropertyMap::new();
        a.set(PropertyKey::Level, 3);
        a.set(PropertyKey::Age, 1);

        let mut b = PropertyMap::new();
        b.set(PropertyKey::Age, 1);
        b.set(PropertyKey::Level, 3);

        assert_eq!(a, b);
        assert_eq!(a.get(PropertyKey::Level), Some(3));
        assert_eq!(a.remove(PropertyKey::Level), Some(3));
        assert_eq!(a.get(PropertyKey::Level), None);
    }

    #[test]
    fn schema_violations_are_corrupt() {
        let registry = builtin::registry();
        let stone = registry.lookup(builtin::STONE).expect("builtin");
        let pos = BlockPos::new(0, 64, 0);

        let ok = BlockState::of(builtin::STONE);
        assert!(ok.validate(stone, pos).is_ok());

        let bad_prop = BlockState::of(builtin::STONE).with_property(PropertyKey::Level, 1);
        assert!(matches!(
            bad_prop.validate(stone, pos),
            Err(WorldError::CorruptBlockState { .. })
        ));

        let mut bad_light = BlockState::of(builtin::STONE);
        bad_light.block_light = 16;
        assert!(matches!(
            bad_light.validate(stone, pos),
            Err(WorldError::CorruptBlockState { .. })
        ));
    }
}
