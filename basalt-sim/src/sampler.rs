//! Random tick sampling.

use basalt_utils::random::Random;
use basalt_utils::{BlockPos, ChunkPos};
use smallvec::SmallVec;

use crate::world::World;

/// Draws `count` uniform positions inside the chunk's volume and keeps
/// the ones whose block is flagged random-tick-eligible.
///
/// The random source is explicit caller state; given the same source
/// state and world, the same candidates come back.
#[must_use]
pub fn sample<R: Random>(
    world: &World,
    chunk_pos: ChunkPos,
    count: u32,
    rng: &mut R,
) -> SmallVec<[BlockPos; 8]> {
    let mut eligible = SmallVec::new();
    let Some(chunk) = world.chunk_ref(chunk_pos) else {
        return eligible;
    };
    let registry = world.registry();
    let range = chunk.range();

    for _ in 0..count {
        let x = rng.next_i32_bounded(16);
        let z = rng.next_i32_bounded(16);
        let y = range.min_y + rng.next_i32_bounded(range.height as i32);

        let id = chunk.id_at(x as usize, y, z as usize);
        if registry.get(id).is_some_and(|def| def.random_ticks) {
            eligible.push(BlockPos::new(
                chunk_pos.x() * 16 + x,
                y,
                chunk_pos.z() * 16 + z,
            ));
        }
    }
    eligible
}
