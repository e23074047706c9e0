//! The propagation rule set.
//!
//! Rules are dispatched by the block's [`BlockCategory`] through one
//! exhaustive match; each definition carries exactly one category, so at
//! most one rule runs per ticket. A rule that cannot read a neighbor
//! (`ChunkNotLoaded`) returns the error to the driver, which logs it and
//! reschedules the ticket one tick later; rule failures never abort the
//! enclosing tick.

mod falling;
mod grass;
mod growth;
mod leaves;
mod water;

use basalt_registry::{BlockCategory, BlockRegistry};
use basalt_utils::BlockId;
use basalt_utils::random::Random;
use basalt_world::{BlockState, WorldError};

use crate::ticks::UpdateTicket;
use crate::world::World;

/// Applies the rule for the block currently at the ticket's position.
pub fn apply<R: Random>(
    world: &mut World,
    ticket: &UpdateTicket,
    rng: &mut R,
) -> Result<(), WorldError> {
    let state = world.get_block(ticket.pos)?;
    let registry = world.registry().clone();
    let Some(definition) = registry.get(state.id) else {
        return Err(WorldError::CorruptBlockState {
            pos: ticket.pos,
            reason: "unknown block id",
        });
    };

    match definition.category {
        BlockCategory::Inert => Ok(()),
        BlockCategory::Water => water::tick(world, &registry, ticket.pos, &state),
        BlockCategory::Falling => falling::tick(world, &registry, ticket.pos, &state),
        BlockCategory::Sapling => growth::tick(world, &registry, ticket.pos, ticket.kind, rng),
        BlockCategory::Grass => grass::tick(world, ticket.pos, ticket.kind, rng),
        BlockCategory::Leaves => {
            leaves::tick(world, &registry, ticket.pos, &state, ticket.kind, rng)
        }
    }
}

/// Whether the id resolves to an air-like block.
fn is_air(registry: &BlockRegistry, id: BlockId) -> bool {
    registry.get(id).is_some_and(|def| def.is_air())
}

/// Rebuilds `state` carrying the light levels currently stored at the
/// target cell, so a rule write does not clobber derived light data.
fn with_light_of(target: &BlockState, mut state: BlockState) -> BlockState {
    state.sky_light = target.sky_light;
    state.block_light = target.block_light;
    state
}
