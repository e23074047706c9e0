//! Block definitions.

use basalt_utils::BlockId;

use crate::category::BlockCategory;
use crate::drops::DropTable;
use crate::material::BlockMaterial;
use crate::property::PropertyKey;

/// The immutable catalog entry for one block kind.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDefinition {
    pub id: BlockId,
    pub name: &'static str,
    pub material: BlockMaterial,
    /// Rule tag dispatched by the propagation engine.
    pub category: BlockCategory,
    /// The property keys states of this block may carry.
    pub property_schema: &'static [PropertyKey],
    /// Light emitted by this block, 0..=15.
    pub light_emission: u8,
    /// Whether the random tick sampler forwards this block.
    pub random_ticks: bool,
    pub drops: DropTable,
}

impl BlockDefinition {
    /// Returns whether states of this block may carry the given key.
    #[inline]
    #[must_use]
    pub fn allows_property(&self, key: PropertyKey) -> bool {
        self.property_schema.contains(&key)
    }

    /// Returns whether the block is air-like (no material presence).
    #[inline]
    #[must_use]
    pub fn is_air(&self) -> bool {
        !self.material.solid && !self.material.liquid && self.material.hardness == 0.0
    }
}
