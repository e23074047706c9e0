//! The built-in block set.
//!
//! Deliberately small: one representative block per rule category plus
//! the inert terrain blocks the rules interact with.

use basalt_utils::BlockId;

use crate::category::BlockCategory;
use crate::definition::BlockDefinition;
use crate::drops::{DropEntry, DropTable};
use crate::material::BlockMaterial;
use crate::property::PropertyKey;
use crate::registry::BlockRegistry;
use crate::tool::ToolClass;

pub const AIR: BlockId = BlockId(0);
pub const STONE: BlockId = BlockId(1);
pub const DIRT: BlockId = BlockId(2);
pub const GRASS_BLOCK: BlockId = BlockId(3);
pub const SAND: BlockId = BlockId(4);
pub const GRAVEL: BlockId = BlockId(5);
pub const WATER: BlockId = BlockId(6);
pub const OAK_SAPLING: BlockId = BlockId(7);
pub const OAK_LOG: BlockId = BlockId(8);
pub const OAK_LEAVES: BlockId = BlockId(9);
pub const GLOWSTONE: BlockId = BlockId(10);
pub const BEDROCK: BlockId = BlockId(11);

const fn opaque(hardness: f32, tool: ToolClass, harvest_level: u8) -> BlockMaterial {
    BlockMaterial {
        hardness,
        blast_resistance: hardness,
        transparent: false,
        solid: true,
        flammable: false,
        liquid: false,
        required_tool: tool,
        harvest_level,
    }
}

/// Builds a registry holding the built-in set.
///
/// The registry is returned unfrozen so embedders can append their own
/// definitions before freezing.
///
/// # Panics
/// Panics if the built-in set itself contains a duplicate id, which
/// would be a bug in this module.
#[must_use]
pub fn registry() -> BlockRegistry {
    let mut registry = BlockRegistry::new(AIR);

    let entries = [
        BlockDefinition {
            id: AIR,
            name: "air",
            material: BlockMaterial::EMPTY,
            category: BlockCategory::Inert,
            property_schema: &[],
            light_emission: 0,
            random_ticks: false,
            drops: DropTable::none(),
        },
        BlockDefinition {
            id: STONE,
            name: "stone",
            material: opaque(1.5, ToolClass::Pickaxe, 0),
            category: BlockCategory::Inert,
            property_schema: &[],
            light_emission: 0,
            random_ticks: false,
            drops: DropTable::tool_gated(vec![DropEntry::always(STONE)]),
        },
        BlockDefinition {
            id: DIRT,
            name: "dirt",
            material: opaque(0.5, ToolClass::Shovel, 0),
            category: BlockCategory::Inert,
            property_schema: &[],
            light_emission: 0,
            random_ticks: false,
            drops: DropTable::of(vec![DropEntry::always(DIRT)]),
        },
        BlockDefinition {
            id: GRASS_BLOCK,
            name: "grass_block",
            material: opaque(0.6, ToolClass::Shovel, 0),
            category: BlockCategory::Grass,
            property_schema: &[],
            light_emission: 0,
            random_ticks: true,
            drops: DropTable::of(vec![DropEntry::always(DIRT)]),
        },
        BlockDefinition {
            id: SAND,
            name: "sand",
            material: opaque(0.5, ToolClass::Shovel, 0),
            category: BlockCategory::Falling,
            property_schema: &[],
            light_emission: 0,
            random_ticks: false,
            drops: DropTable::of(vec![DropEntry::always(SAND)]),
        },
        BlockDefinition {
            id: GRAVEL,
            name: "gravel",
            material: opaque(0.6, ToolClass::Shovel, 0),
            category: BlockCategory::Falling,
            property_schema: &[],
            light_emission: 0,
            random_ticks: false,
            drops: DropTable::of(vec![DropEntry::always(GRAVEL)]),
        },
        BlockDefinition {
            id: WATER,
            name: "water",
            material: BlockMaterial {
                hardness: 100.0,
                blast_resistance: 100.0,
                transparent: true,
                solid: false,
                flammable: false,
                liquid: true,
                required_tool: ToolClass::None,
                harvest_level: 0,
            },
            category: BlockCategory::Water,
            property_schema: &[PropertyKey::Level],
            light_emission: 0,
            random_ticks: false,
            drops: DropTable::none(),
        },
        BlockDefinition {
            id: OAK_SAPLING,
            name: "oak_sapling",
            material: BlockMaterial {
                hardness: 0.0,
                blast_resistance: 0.0,
                transparent: true,
                solid: false,
                flammable: true,
                liquid: false,
                required_tool: ToolClass::None,
                harvest_level: 0,
            },
            category: BlockCategory::Sapling,
            property_schema: &[PropertyKey::Age],
            light_emission: 0,
            random_ticks: true,
            drops: DropTable::of(vec![DropEntry::always(OAK_SAPLING)]),
        },
        BlockDefinition {
            id: OAK_LOG,
            name: "oak_log",
            material: BlockMaterial {
                hardness: 2.0,
                blast_resistance: 2.0,
                transparent: false,
                solid: true,
                flammable: true,
                liquid: false,
                required_tool: ToolClass::Axe,
                harvest_level: 0,
            },
            category: BlockCategory::Inert,
            property_schema: &[PropertyKey::Axis],
            light_emission: 0,
            random_ticks: false,
            drops: DropTable::of(vec![DropEntry::always(OAK_LOG)]),
        },
        BlockDefinition {
            id: OAK_LEAVES,
            name: "oak_leaves",
            material: BlockMaterial {
                hardness: 0.2,
                blast_resistance: 0.2,
                transparent: true,
                solid: true,
                flammable: true,
                liquid: false,
                required_tool: ToolClass::Hoe,
                harvest_level: 0,
            },
            category: BlockCategory::Leaves,
            property_schema: &[PropertyKey::Distance],
            light_emission: 0,
            random_ticks: true,
            drops: DropTable::of(vec![DropEntry::chance(OAK_SAPLING, 0.05)]),
        },
        BlockDefinition {
            id: GLOWSTONE,
            name: "glowstone",
            material: BlockMaterial {
                hardness: 0.3,
                blast_resistance: 0.3,
                transparent: true,
                solid: true,
                flammable: false,
                liquid: false,
                required_tool: ToolClass::None,
                harvest_level: 0,
            },
            category: BlockCategory::Inert,
            property_schema: &[],
            light_emission: 15,
            random_ticks: false,
            drops: DropTable::of(vec![DropEntry::always(GLOWSTONE)]),
        },
        BlockDefinition {
            id: BEDROCK,
            name: "bedrock",
            material: opaque(-1.0, ToolClass::Pickaxe, 0),
            category: BlockCategory::Inert,
            property_schema: &[],
            light_emission: 0,
            random_ticks: false,
            drops: DropTable::none(),
        },
    ];

    for entry in entries {
        registry
            .register(entry)
            .expect("built-in block set has unique ids");
    }

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_set_registers_cleanly() {
        let registry = registry();
        assert_eq!(registry.len(), 12);
        assert_eq!(registry.default_id(), AIR);
    }

    #[test]
    fn category_coverage() {
        let registry = registry();
        let category = |id| registry.lookup(id).expect("builtin").category;
        assert_eq!(category(WATER), BlockCategory::Water);
        assert_eq!(category(SAND), BlockCategory::Falling);
        assert_eq!(category(OAK_SAPLING), BlockCategory::Sapling);
        assert_eq!(category(GRASS_BLOCK), BlockCategory::Grass);
        assert_eq!(category(OAK_LEAVES), BlockCategory::Leaves);
        assert_eq!(category(STONE), BlockCategory::Inert);
    }

    #[test]
    fn random_tick_flags_match_categories() {
        let registry = registry();
        let ticks = |id| registry.lookup(id).expect("builtin").random_ticks;
        assert!(ticks(OAK_SAPLING));
        assert!(ticks(GRASS_BLOCK));
        assert!(ticks(OAK_LEAVES));
        assert!(!ticks(STONE));
        assert!(!ticks(WATER));
    }
}
