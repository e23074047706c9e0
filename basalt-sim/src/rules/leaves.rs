//! Leaf decay.

use basalt_registry::{BlockRegistry, PropertyKey};
use basalt_utils::random::Random;
use basalt_utils::{BlockPos, UpdateFlags};
use basalt_world::{BlockState, WorldError};

use crate::ticks::TicketKind;
use crate::world::World;

use super::with_light_of;

/// Leaves survive up to this distance from a supporting log.
const MAX_SUPPORT_DISTANCE: u8 = 6;

/// Random tick handler: leaves beyond support range decay to air,
/// rolling their drop table on the way out.
pub(super) fn tick<R: Random>(
    world: &mut World,
    registry: &BlockRegistry,
    pos: BlockPos,
    state: &BlockState,
    kind: TicketKind,
    rng: &mut R,
) -> Result<(), WorldError> {
    if kind != TicketKind::Random {
        return Ok(());
    }

    let distance = state
        .property(PropertyKey::Distance)
        .unwrap_or(MAX_SUPPORT_DISTANCE + 1);
    if distance <= MAX_SUPPORT_DISTANCE {
        return Ok(());
    }

    if let Some(definition) = registry.get(state.id) {
        let drops = definition.drops.roll(rng, true);
        if !drops.is_empty() {
            log::trace!(
                "decaying leaves at ({}, {}, {}) dropped {drops:?}",
                pos.x(),
                pos.y(),
                pos.z()
            );
        }
    }

    let air = with_light_of(state, BlockState::of(registry.default_id()));
    world.set_block(pos, air, UpdateFlags::LIGHT | UpdateFlags::MARK_DIRTY)?;
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
    use crate::ticks::{TickPriority, UpdateTicket};
    use crate::world::World;

    use super::*;

    fn world_with_leaves(distance: u8) -> (World, BlockPos) {
        let mut world = World::new(Arc::new(builtin::registry()), &SimConfig::default());
        world.ensure_chunk(ChunkPos::new(0, 0));
        let pos = BlockPos::new(8, 64, 8);
        world
            .set_block(
                pos,
                BlockState::of(builtin::OAK_LEAVES)
                    .with_property(PropertyKey::Distance, distance),
                UpdateFlags::MARK_DIRTY,
            )
            .expect("placement");
        (world, pos)
    }

    fn random_tick(world: &mut World, pos: BlockPos) {
        let ticket = UpdateTicket {
            pos,
            kind: TicketKind::Random,
            due: 0,
            priority: TickPriority::Normal,
            seq: 0,
        };
        let mut rng = Xoroshiro::from_seed(5);
        rules::apply(world, &ticket, &mut rng).expect("rule application");
    }

    #[test]
    fn distant_leaves_decay() {
        let (mut world, pos) = world_with_leaves(7);
        random_tick(&mut world, pos);
        assert_eq!(world.id_at(pos).expect("loaded"), builtin::AIR);
    }

    #[test]
    fn supported_leaves_persist() {
        let (mut world, pos) = world_with_leaves(2);
        random_tick(&mut world, pos);
        assert_eq!(world.id_at(pos).expect("loaded"), builtin::OAK_LEAVES);
    }
}
