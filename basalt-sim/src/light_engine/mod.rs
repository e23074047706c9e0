//! Flood-fill light propagation.
//!
//! Two channels (sky and block light) share one algorithm and differ
//! only in their seeds: block light enters at emitting blocks, sky
//! light at the topmost cell of each column. A transparent cell's level
//! is `max(neighbor levels) - 1`, an opaque cell is always 0, and every
//! change runs to fixed point, at most 15 steps from any seed.
//!
//! Updates are queued while blocks change and drained once per tick:
//! decreases run first (retracting light the removed sources fed),
//! increases second, so boundary cells settle at their final values in
//! one pass.

mod queue;

use basalt_registry::BlockRegistry;
use basalt_utils::{BlockId, BlockPos, ChunkPos, Direction};
use basalt_world::{ChunkStore, WorldError};

use queue::LightQueue;

/// The two light channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
    Sky,
    Block,
}

impl Channel {
    fn read(self, store: &ChunkStore, pos: BlockPos) -> Result<u8, WorldError> {
        let (sky, block) = store.light_at(pos)?;
        Ok(match self {
            Self::Sky => sky,
            Self::Block => block,
        })
    }

    fn write(self, store: &mut ChunkStore, pos: BlockPos, level: u8) -> Result<(), WorldError> {
        match self {
            Self::Sky => store.set_light(pos, Some(level), None),
            Self::Block => store.set_light(pos, None, Some(level)),
        }
    }
}

/// Queued light work for both channels.
pub struct LightEngine {
    sky_increase: LightQueue,
    sky_decrease: LightQueue,
    block_increase: LightQueue,
    block_decrease: LightQueue,
}

impl LightEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sky_increase: LightQueue::new(),
            sky_decrease: LightQueue::new(),
            block_increase: LightQueue::new(),
            block_decrease: LightQueue::new(),
        }
    }

    /// Whether any queued work remains.
    #[must_use]
    pub fn has_work(&self) -> bool {
        !self.sky_increase.is_empty()
            || !self.sky_decrease.is_empty()
            || !self.block_increase.is_empty()
            || !self.block_decrease.is_empty()
    }

    /// Records the light consequences of a block write.
    ///
    /// Call after the store holds the new state; `old_sky`/`old_block`
    /// are the light levels the cell had before the write.
    pub fn block_changed(
        &mut self,
        store: &mut ChunkStore,
        pos: BlockPos,
        old_id: BlockId,
        old_sky: u8,
        old_block: u8,
    ) -> Result<(), WorldError> {
        let registry = store.registry().clone();
        let new_id = store.id_at(pos)?;
        let new_opaque = is_opaque(&registry, new_id);
        let old_opaque = is_opaque(&registry, old_id);
        let new_emission = emission(&registry, new_id);
        let old_emission = emission(&registry, old_id);

        if new_opaque {
            // Opaque cells hold no light; retract what the cell carried.
            store.set_light(pos, Some(0), Some(0))?;
            if old_sky > 0 {
                self.sky_decrease.push((pos, old_sky));
            }
            if old_block > 0 {
                self.block_decrease.push((pos, old_block));
            }
            return Ok(());
        }

        if old_emission > new_emission {
            // Dimmed or removed source: retract, then re-seed what's left.
            Channel::Block.write(store, pos, new_emission)?;
            if old_block > 0 {
                self.block_decrease.push((pos, old_block));
            }
            if new_emission > 0 {
                self.block_increase.push((pos, new_emission));
            }
        } else if new_emission > old_block {
            Channel::Block.write(store, pos, new_emission)?;
            self.block_increase.push((pos, new_emission));
        }

        if old_opaque {
            // The cell opened up; pull light back in from around it.
            for direction in Direction::VALUES {
                let neighbor = direction.relative(&pos);
                if let Ok((sky, block)) = store.light_at(neighbor) {
                    if sky > 1 {
                        self.sky_increase.push((neighbor, sky));
                    }
                    if block > 1 {
                        self.block_increase.push((neighbor, block));
                    }
                }
            }
            if pos.y() == store.range().max_y() - 1 {
                // Top-of-column cell: open to the sky again.
                Channel::Sky.write(store, pos, 15)?;
                self.sky_increase.push((pos, 15));
            }
        }

        Ok(())
    }

    /// Seeds sky light for a freshly allocated chunk: the topmost cell
    /// of every transparent column starts at 15.
    pub fn seed_chunk_sky(
        &mut self,
        store: &mut ChunkStore,
        chunk: ChunkPos,
    ) -> Result<(), WorldError> {
        let registry = store.registry().clone();
        let top = store.range().max_y() - 1;
        for z in 0..16 {
            for x in 0..16 {
                let pos = BlockPos::new(chunk.x() * 16 + x, top, chunk.z() * 16 + z);
                if !is_opaque(&registry, store.id_at(pos)?) {
                    Channel::Sky.write(store, pos, 15)?;
                    self.sky_increase.push((pos, 15));
                }
            }
        }
        Ok(())
    }

    /// Drains every queue to fixed point.
    pub fn flush(&mut self, store: &mut ChunkStore) {
        let registry = store.registry().clone();

        Self::propagate_decreases(
            &mut self.sky_decrease,
            &mut self.sky_increase,
            store,
            &registry,
            Channel::Sky,
        );
        Self::propagate_decreases(
            &mut self.block_decrease,
            &mut self.block_increase,
            store,
            &registry,
            Channel::Block,
        );
        Self::propagate_increases(&mut self.sky_increase, store, &registry, Channel::Sky);
        Self::propagate_increases(&mut self.block_increase, store, &registry, Channel::Block);
    }

    fn propagate_increases(
        queue: &mut LightQueue,
        store: &mut ChunkStore,
        registry: &BlockRegistry,
        channel: Channel,
    ) {
        while let Some((pos, _)) = queue.pop() {
            // Read the live value; a stronger wave may have passed since
            // this entry was queued.
            let Ok(level) = channel.read(store, pos) else {
                continue;
            };
            if level <= 1 {
                continue;
            }
            let target = level - 1;
            for direction in Direction::VALUES {
                let neighbor = direction.relative(&pos);
                let Ok(current) = channel.read(store, neighbor) else {
                    // Unloaded or out of range; light stops here.
                    continue;
                };
                if current >= target {
                    continue;
                }
                let Ok(id) = store.id_at(neighbor) else {
                    continue;
                };
                if is_opaque(registry, id) {
                    continue;
                }
                if channel.write(store, neighbor, target).is_ok() {
                    queue.push((neighbor, target));
                }
            }
        }
    }

    fn propagate_decreases(
        queue: &mut LightQueue,
        increase: &mut LightQueue,
        store: &mut ChunkStore,
        registry: &BlockRegistry,
        channel: Channel,
    ) {
        while let Some((pos, level)) = queue.pop() {
            for direction in Direction::VALUES {
                let neighbor = direction.relative(&pos);
                let Ok(current) = channel.read(store, neighbor) else {
                    continue;
                };
                if current == 0 {
                    continue;
                }
                if current < level {
                    // This neighbor was (possibly) fed by the removed
                    // light; clear it and keep retracting.
                    if channel.write(store, neighbor, 0).is_err() {
                        continue;
                    }
                    if channel == Channel::Block
                        && let Ok(id) = store.id_at(neighbor)
                    {
                        let seed = emission(registry, id);
                        if seed > 0 {
                            let _ = channel.write(store, neighbor, seed);
                            increase.push((neighbor, seed));
                            continue;
                        }
                    }
                    queue.push((neighbor, current));
                } else {
                    // Bright enough to have another source; it becomes
                    // part of the re-add frontier.
                    increase.push((neighbor, current));
                }
            }
        }
    }
}

impl Default for LightEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn is_opaque(registry: &BlockRegistry, id: BlockId) -> bool {
    registry.get(id).is_some_and(|def| def.material.opaque())
}

fn emission(registry: &BlockRegistry, id: BlockId) -> u8 {
    registry.get(id).map_or(0, |def| def.light_emission)
}
