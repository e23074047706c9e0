//! Grass spread and decay.

use basalt_registry::builtin;
use basalt_utils::random::Random;
use basalt_utils::{BlockPos, Direction, UpdateFlags};
use basalt_world::{BlockState, WorldError};

use crate::ticks::TicketKind;
use crate::world::World;

use super::with_light_of;

/// Below this light level grass dies back to dirt.
const MIN_SURVIVAL_LIGHT: u8 = 4;

/// Chance per eligible dirt neighbor per random tick.
const SPREAD_CHANCE: f32 = 0.25;

pub(super) fn tick<R: Random>(
    world: &mut World,
    pos: BlockPos,
    kind: TicketKind,
    rng: &mut R,
) -> Result<(), WorldError> {
    if kind != TicketKind::Random {
        return Ok(());
    }

    let light = world.light_level(pos)?;
    if light < MIN_SURVIVAL_LIGHT {
        let current = world.get_block(pos)?;
        let dirt = with_light_of(&current, BlockState::of(builtin::DIRT));
        // Dirt and grass share opacity; no light work needed.
        world.set_block(pos, dirt, UpdateFlags::MARK_DIRTY)?;
        return Ok(());
    }

    for direction in Direction::VALUES {
        let neighbor_pos = direction.relative(&pos);
        let id = match world.id_at(neighbor_pos) {
            Ok(id) => id,
            Err(WorldError::OutOfVerticalBounds { .. }) => continue,
            Err(error) => return Err(error),
        };
        if id != builtin::DIRT {
            continue;
        }
        if rng.next_f32() >= SPREAD_CHANCE {
            continue;
        }
        let current = world.get_block(neighbor_pos)?;
        let grass = with_light_of(&current, BlockState::of(builtin::GRASS_BLOCK));
        world.set_block(neighbor_pos, grass, UpdateFlags::MARK_DIRTY)?;
    }
    Ok(())
}
