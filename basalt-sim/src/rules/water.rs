//! Water leveling.
//!
//! Level 0 is a source, levels 1..=7 are flow. Each tick a water cell
//! pushes flow at `level + 1` into adjacent air, and flowing water that
//! lost its feed drains back to air. Sources never decay.

use basalt_registry::{BlockRegistry, PropertyKey};
use basalt_utils::{BlockId, BlockPos, Direction, UpdateFlags};
use basalt_world::{BlockState, WorldError};

use crate::ticks::{TickPriority, TicketKind};
use crate::world::World;

use super::{is_air, with_light_of};

/// Weakest flow level; spreading stops here.
pub const MAX_FLOW_LEVEL: u8 = 7;

/// Ticks between spread steps.
const FLOW_DELAY: u32 = 1;

pub(super) fn tick(
    world: &mut World,
    registry: &BlockRegistry,
    pos: BlockPos,
    state: &BlockState,
) -> Result<(), WorldError> {
    let level = state.property(PropertyKey::Level).unwrap_or(0);

    if level > 0 && !is_supported(world, pos, state.id, level)? {
        // The feed dried up: drain and let downstream cells re-check.
        let air = with_light_of(state, BlockState::of(registry.default_id()));
        world.set_block(pos, air, UpdateFlags::LIGHT | UpdateFlags::MARK_DIRTY)?;
        for direction in Direction::HORIZONTAL {
            world.schedule(
                direction.relative(&pos),
                TicketKind::Scheduled,
                FLOW_DELAY,
                TickPriority::Normal,
            );
        }
        return Ok(());
    }

    if level >= MAX_FLOW_LEVEL {
        return Ok(());
    }

    for direction in Direction::HORIZONTAL {
        let neighbor_pos = direction.relative(&pos);
        let neighbor = world.get_block(neighbor_pos)?;
        if !is_air(registry, neighbor.id) {
            continue;
        }
        let flow = with_light_of(
            &neighbor,
            BlockState::of(state.id).with_property(PropertyKey::Level, level + 1),
        );
        world.set_block(neighbor_pos, flow, UpdateFlags::LIGHT | UpdateFlags::MARK_DIRTY)?;
        world.schedule(
            neighbor_pos,
            TicketKind::Scheduled,
            FLOW_DELAY,
            TickPriority::Normal,
        );
    }
    Ok(())
}

/// A flow cell keeps existing while the same fluid sits directly above
/// it or a strictly stronger (lower-level) neighbor feeds it.
fn is_supported(
    world: &World,
    pos: BlockPos,
    fluid_id: BlockId,
    level: u8,
) -> Result<bool, WorldError> {
    let above = pos.offset(0, 1, 0);
    match world.get_block(above) {
        Ok(above_state) if above_state.id == fluid_id => return Ok(true),
        Ok(_) | Err(WorldError::OutOfVerticalBounds { .. }) => {}
        Err(error) => return Err(error),
    }

    for direction in Direction::HORIZONTAL {
        let neighbor = world.get_block(direction.relative(&pos))?;
        if neighbor.id != fluid_id {
            continue;
        }
        let neighbor_level = neighbor.property(PropertyKey::Level).unwrap_or(0);
        if neighbor_level < level {
            return Ok(true);
        }
    }
    Ok(false)
}
