//! Per-definition drop tables.

use basalt_utils::BlockId;
use basalt_utils::random::Random;

/// One possible drop from a broken block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropEntry {
    /// The dropped item, named by the block id that represents it.
    pub item: BlockId,
    /// Inclusive count range.
    pub min_count: u8,
    pub max_count: u8,
    /// Chance for this entry to drop at all.
    pub chance: f32,
}

impl DropEntry {
    /// An entry that always drops exactly one item.
    pub const fn always(item: BlockId) -> Self {
        Self {
            item,
            min_count: 1,
            max_count: 1,
            chance: 1.0,
        }
    }

    /// An entry that drops one item with the given chance.
    pub const fn chance(item: BlockId, chance: f32) -> Self {
        Self {
            item,
            min_count: 1,
            max_count: 1,
            chance,
        }
    }
}

/// The drops of a block definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DropTable {
    entries: Vec<DropEntry>,
    /// Whether drops require the correct tool class and harvest level.
    requires_correct_tool: bool,
}

impl DropTable {
    /// A table that never drops anything.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds a table from entries, dropping regardless of tool.
    #[must_use]
    pub fn of(entries: Vec<DropEntry>) -> Self {
        Self {
            entries,
            requires_correct_tool: false,
        }
    }

    /// Builds a table whose entries only drop with the correct tool.
    #[must_use]
    pub fn tool_gated(entries: Vec<DropEntry>) -> Self {
        Self {
            entries,
            requires_correct_tool: true,
        }
    }

    /// Rolls the table with the given random source.
    ///
    /// `correct_tool` reflects whether the breaking tool matched the
    /// material's class and harvest level; with a gated table and the
    /// wrong tool, nothing drops.
    pub fn roll<R: Random>(&self, rng: &mut R, correct_tool: bool) -> Vec<(BlockId, u8)> {
        if self.requires_correct_tool && !correct_tool {
            return Vec::new();
        }

        let mut dropped = Vec::new();
        for entry in &self.entries {
            if entry.chance < 1.0 && rng.next_f32() >= entry.chance {
                continue;
            }
            let count = if entry.min_count == entry.max_count {
                entry.min_count
            } else {
                entry.min_count
                    + rng.next_i32_bounded(i32::from(entry.max_count - entry.min_count) + 1) as u8
            };
            if count > 0 {
                dropped.push((entry.item, count));
            }
        }
        dropped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use basalt_utils::random::Xoroshiro;

    use super::*;

    #[test]
    fn gated_table_needs_correct_tool() {
        let table = DropTable::tool_gated(vec![DropEntry::always(BlockId(1))]);
        let mut rng = Xoroshiro::from_seed(1);

        assert!(table.roll(&mut rng, false).is_empty());
        assert_eq!(table.roll(&mut rng, true), vec![(BlockId(1), 1)]);
    }

    #[test]
    fn rolls_are_deterministic_for_a_seed() {
        let table = DropTable::of(vec![
            DropEntry::chance(BlockId(2), 0.5),
            DropEntry {
                item: BlockId(3),
                min_count: 1,
                max_count: 4,
                chance: 1.0,
            },
        ]);

        let mut a = Xoroshiro::from_seed(77);
        let mut b = Xoroshiro::from_seed(77);
        for _ in 0..32 {
            assert_eq!(table.roll(&mut a, true), table.roll(&mut b, true));
        }
    }
}
