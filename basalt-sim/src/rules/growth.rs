//! Sapling growth.

use basalt_registry::{BlockRegistry, PropertyKey, builtin};
use basalt_utils::random::Random;
use basalt_utils::{BlockPos, UpdateFlags};
use basalt_world::{BlockState, WorldError};

use crate::ticks::TicketKind;
use crate::world::World;

use super::{is_air, with_light_of};

/// Light required at the sapling for growth to be possible.
const MIN_GROWTH_LIGHT: u8 = 9;

/// Stochastic gate per random tick.
const GROWTH_CHANCE: f32 = 0.05;

/// Horizontal half-extent of the growth volume and canopy.
const CANOPY_RADIUS: i32 = 2;

const MIN_TRUNK_HEIGHT: i32 = 4;
const MAX_TRUNK_HEIGHT: i32 = 6;

/// Chance for a canopy corner cell to be included.
const CORNER_CHANCE: f32 = 0.5;

/// Random tick handler: grows the sapling into a tree when the light,
/// chance, and clearance conditions all hold.
///
/// The trunk height is drawn first so the clearance check and the
/// generated tree always agree on the volume in question.
pub(super) fn tick<R: Random>(
    world: &mut World,
    registry: &BlockRegistry,
    pos: BlockPos,
    kind: TicketKind,
    rng: &mut R,
) -> Result<(), WorldError> {
    if kind != TicketKind::Random {
        return Ok(());
    }
    if world.light_level(pos)? < MIN_GROWTH_LIGHT {
        return Ok(());
    }
    if rng.next_f32() >= GROWTH_CHANCE {
        return Ok(());
    }

    let height = rng.next_i32_between(MIN_TRUNK_HEIGHT, MAX_TRUNK_HEIGHT);

    // The growth volume must contain no solid opaque block.
    for dy in 1..=height + 1 {
        for dz in -CANOPY_RADIUS..=CANOPY_RADIUS {
            for dx in -CANOPY_RADIUS..=CANOPY_RADIUS {
                let probe = pos.offset(dx, dy, dz);
                let id = match world.id_at(probe) {
                    Ok(id) => id,
                    // No headroom below the world ceiling.
                    Err(WorldError::OutOfVerticalBounds { .. }) => return Ok(()),
                    Err(error) => return Err(error),
                };
                if let Some(def) = registry.get(id)
                    && def.material.solid
                    && def.material.opaque()
                {
                    return Ok(());
                }
            }
        }
    }

    grow_tree(world, registry, pos, height, rng)
}

fn grow_tree<R: Random>(
    world: &mut World,
    registry: &BlockRegistry,
    pos: BlockPos,
    height: i32,
    rng: &mut R,
) -> Result<(), WorldError> {
    // Trunk column, replacing the sapling at its base.
    for dy in 0..height {
        let cell = pos.offset(0, dy, 0);
        let current = world.get_block(cell)?;
        let log = with_light_of(
            &current,
            BlockState::of(builtin::OAK_LOG).with_property(PropertyKey::Axis, 1),
        );
        world.set_block(cell, log, UpdateFlags::LIGHT | UpdateFlags::MARK_DIRTY)?;
    }

    // Canopy: two wide layers wrapping the trunk top, two narrow above.
    let layers = [
        (height - 2, CANOPY_RADIUS),
        (height - 1, CANOPY_RADIUS),
        (height, 1),
        (height + 1, 1),
    ];
    for (dy, radius) in layers {
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dz == 0 && dy < height {
                    continue; // trunk cell
                }
                let corner = dx.abs() == radius && dz.abs() == radius;
                if corner && rng.next_f32() >= CORNER_CHANCE {
                    continue;
                }
                let cell = pos.offset(dx, dy, dz);
                let current = match world.get_block(cell) {
                    Ok(current) => current,
                    Err(WorldError::OutOfVerticalBounds { .. }) => continue,
                    Err(error) => return Err(error),
                };
                if !is_air(registry, current.id) {
                    continue;
                }
                let distance = (dx.abs().max(dz.abs()) + (dy - height + 1).max(0)).max(1) as u8;
                let leaves = with_light_of(
                    &current,
                    BlockState::of(builtin::OAK_LEAVES)
                        .with_property(PropertyKey::Distance, distance),
                );
                world.set_block(cell, leaves, UpdateFlags::LIGHT | UpdateFlags::MARK_DIRTY)?;
            }
        }
    }

    log::debug!(
        "sapling at ({}, {}, {}) grew a tree of height {height}",
        pos.x(),
        pos.y(),
        pos.z()
    );
    Ok(())
}
