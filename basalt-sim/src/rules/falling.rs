//! Gravity for sand-class blocks.

use basalt_registry::BlockRegistry;
use basalt_utils::{BlockPos, UpdateFlags};
use basalt_world::{BlockState, WorldError};

use crate::ticks::{TickPriority, TicketKind};
use crate::world::World;

use super::{is_air, with_light_of};

/// Moves the block one cell down when unsupported, leaving air behind.
///
/// Follow-up tickets land at the new position (to keep falling), the
/// vacated position, and the cell above it (so a pillar cascades down
/// one cell per tick).
pub(super) fn tick(
    world: &mut World,
    registry: &BlockRegistry,
    pos: BlockPos,
    state: &BlockState,
) -> Result<(), WorldError> {
    let below_pos = pos.offset(0, -1, 0);
    let below = match world.get_block(below_pos) {
        Ok(below) => below,
        // Resting on the world floor.
        Err(WorldError::OutOfVerticalBounds { .. }) => return Ok(()),
        Err(error) => return Err(error),
    };
    if !is_air(registry, below.id) {
        return Ok(());
    }

    let falling = with_light_of(&below, state.clone());
    let vacated = with_light_of(state, BlockState::of(registry.default_id()));

    world.set_block(below_pos, falling, UpdateFlags::LIGHT | UpdateFlags::MARK_DIRTY)?;
    world.set_block(pos, vacated, UpdateFlags::LIGHT | UpdateFlags::MARK_DIRTY)?;

    world.schedule(below_pos, TicketKind::Scheduled, 1, TickPriority::Normal);
    world.schedule(pos, TicketKind::Scheduled, 1, TickPriority::Normal);
    let above = pos.offset(0, 1, 0);
    if world.get_block(above).is_ok() {
        world.schedule(above, TicketKind::Scheduled, 1, TickPriority::Normal);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use basalt_registry::builtin;
    use basalt_utils::ChunkPos;
    use basalt_utils::random::Xoroshiro;

    use crate::config::SimConfig;
    use crate::rules;
    use crate::ticks::UpdateTicket;

    use super::*;

    fn world() -> World {
        let mut world = World::new(Arc::new(builtin::registry()), &SimConfig::default());
        world.ensure_chunk(ChunkPos::new(0, 0));
        world
    }

    fn run(world: &mut World, pos: BlockPos) {
        let ticket = UpdateTicket {
            pos,
            kind: TicketKind::Scheduled,
            due: 0,
            priority: TickPriority::Normal,
            seq: 0,
        };
        let mut rng = Xoroshiro::from_seed(0);
        rules::apply(world, &ticket, &mut rng).expect("rule application");
    }

    #[test]
    fn swaps_down_into_air() {
        let mut world = world();
        let pos = BlockPos::new(8, 80, 8);
        world
            .set_block(pos, BlockState::of(builtin::GRAVEL), UpdateFlags::MARK_DIRTY)
            .expect("placement");

        run(&mut world, pos);
        assert_eq!(
            world.id_at(BlockPos::new(8, 79, 8)).expect("loaded"),
            builtin::GRAVEL
        );
        assert_eq!(world.id_at(pos).expect("loaded"), builtin::AIR);
    }

    #[test]
    fn supported_blocks_stay_put() {
        let mut world = world();
        let pos = BlockPos::new(8, 80, 8);
        world
            .set_block(
                BlockPos::new(8, 79, 8),
                BlockState::of(builtin::STONE),
                UpdateFlags::MARK_DIRTY,
            )
            .expect("placement");
        world
            .set_block(pos, BlockState::of(builtin::SAND), UpdateFlags::MARK_DIRTY)
            .expect("placement");

        run(&mut world, pos);
        assert_eq!(world.id_at(pos).expect("loaded"), builtin::SAND);
    }

    #[test]
    fn the_world_floor_is_solid_enough() {
        let mut world = world();
        let floor = BlockPos::new(8, -64, 8);
        world
            .set_block(floor, BlockState::of(builtin::SAND), UpdateFlags::MARK_DIRTY)
            .expect("placement");

        run(&mut world, floor);
        assert_eq!(world.id_at(floor).expect("loaded"), builtin::SAND);
    }
}
