//! The chunk store: an arena of chunks keyed by chunk coordinate.

use std::sync::Arc;

use basalt_registry::BlockRegistry;
use basalt_utils::{BlockId, BlockPos, ChunkPos};
use rustc_hash::FxHashMap;

use crate::chunk::{Chunk, ChunkStatus, VerticalRange};
use crate::error::WorldError;
use crate::snapshot::WorldSnapshot;
use crate::state::{BlockState, MAX_LIGHT};

/// Chunk-local coordinate of a world coordinate.
///
/// Positive modulo, so negative world coordinates map into 0..16
/// (x = -1 lands at local 15) instead of a negative index.
#[inline]
#[must_use]
pub fn local_coord(v: i32) -> usize {
    (((v % 16) + 16) % 16) as usize
}

/// Owns every loaded chunk and translates world coordinates.
///
/// Chunks are held behind `Arc` with copy-on-write mutation, which makes
/// tick-boundary snapshots a cheap map clone: a snapshot taken before a
/// write keeps the pre-write chunk alive unchanged.
pub struct ChunkStore {
    chunks: FxHashMap<ChunkPos, Arc<Chunk>>,
    registry: Arc<BlockRegistry>,
    range: VerticalRange,
}

impl ChunkStore {
    #[must_use]
    pub fn new(registry: Arc<BlockRegistry>, range: VerticalRange) -> Self {
        Self {
            chunks: FxHashMap::default(),
            registry,
            range,
        }
    }

    #[inline]
    #[must_use]
    pub fn range(&self) -> VerticalRange {
        self.range
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    fn check_bounds(&self, y: i32) -> Result<(), WorldError> {
        if self.range.contains(y) {
            Ok(())
        } else {
            Err(WorldError::OutOfVerticalBounds {
                y,
                min_y: self.range.min_y,
                max_y: self.range.max_y(),
            })
        }
    }

    fn chunk(&self, pos: ChunkPos) -> Result<&Arc<Chunk>, WorldError> {
        let chunk = self
            .chunks
            .get(&pos)
            .ok_or(WorldError::ChunkNotLoaded(pos))?;
        match chunk.status() {
            ChunkStatus::Ok => Ok(chunk),
            ChunkStatus::Corrupt => Err(WorldError::ChunkCorrupt(pos)),
        }
    }

    fn chunk_mut(&mut self, pos: ChunkPos) -> Result<&mut Chunk, WorldError> {
        let chunk = self
            .chunks
            .get_mut(&pos)
            .ok_or(WorldError::ChunkNotLoaded(pos))?;
        match chunk.status() {
            ChunkStatus::Ok => Ok(Arc::make_mut(chunk)),
            ChunkStatus::Corrupt => Err(WorldError::ChunkCorrupt(pos)),
        }
    }

    /// Lazily allocates the chunk at `pos`, filled with the registry's
    /// default block, and returns it.
    pub fn ensure_chunk(&mut self, pos: ChunkPos) -> &mut Chunk {
        let range = self.range;
        let default_id = self.registry.default_id();
        let chunk = self.chunks.entry(pos).or_insert_with(|| {
            log::debug!("loading chunk ({}, {})", pos.x(), pos.z());
            Arc::new(Chunk::filled(range, default_id))
        });
        Arc::make_mut(chunk)
    }

    /// Inserts an externally loaded chunk (persistence boundary).
    pub fn insert_chunk(&mut self, pos: ChunkPos, chunk: Chunk) {
        self.chunks.insert(pos, Arc::new(chunk));
    }

    /// Evicts a chunk, returning it for saving. Corrupt chunks must go
    /// through here before the coordinate becomes usable again.
    pub fn remove_chunk(&mut self, pos: ChunkPos) -> Option<Arc<Chunk>> {
        self.chunks.remove(&pos)
    }

    #[must_use]
    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    /// Coordinates of every loaded chunk, in unspecified order.
    pub fn loaded_chunks(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    /// Read access to a loaded chunk (random tick sampling).
    #[must_use]
    pub fn chunk_ref(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos).map(Arc::as_ref)
    }

    /// Reads the block state at a position.
    ///
    /// # Errors
    /// `OutOfVerticalBounds`, `ChunkNotLoaded`, or `ChunkCorrupt`.
    pub fn get_block(&self, pos: BlockPos) -> Result<BlockState, WorldError> {
        self.check_bounds(pos.y())?;
        let chunk = self.chunk(pos.chunk())?;
        Ok(chunk.get_state(local_coord(pos.x()), pos.y(), local_coord(pos.z())))
    }

    /// Block id only, skipping state composition.
    pub fn id_at(&self, pos: BlockPos) -> Result<BlockId, WorldError> {
        self.check_bounds(pos.y())?;
        let chunk = self.chunk(pos.chunk())?;
        Ok(chunk.id_at(local_coord(pos.x()), pos.y(), local_coord(pos.z())))
    }

    /// Replaces the block state at a position.
    ///
    /// The write is validated against the registry; nothing is clamped
    /// on the caller's behalf.
    ///
    /// # Errors
    /// `OutOfVerticalBounds`, `ChunkNotLoaded`, `ChunkCorrupt`, or
    /// `InvalidPlacement` when the state does not fit its block's schema.
    pub fn set_block(&mut self, pos: BlockPos, state: BlockState) -> Result<(), WorldError> {
        self.check_bounds(pos.y())?;

        let definition =
            self.registry
                .get(state.id)
                .ok_or(WorldError::InvalidPlacement {
                    pos,
                    reason: "unknown block id",
                })?;
        if state.sky_light > MAX_LIGHT || state.block_light > MAX_LIGHT {
            return Err(WorldError::InvalidPlacement {
                pos,
                reason: "light level above 15",
            });
        }
        for (key, _) in state.properties.iter() {
            if !definition.allows_property(key) {
                return Err(WorldError::InvalidPlacement {
                    pos,
                    reason: "property outside the block's schema",
                });
            }
        }

        let chunk = self.chunk_mut(pos.chunk())?;
        chunk.set_state(local_coord(pos.x()), pos.y(), local_coord(pos.z()), state);
        Ok(())
    }

    /// Sky and block light at a position.
    pub fn light_at(&self, pos: BlockPos) -> Result<(u8, u8), WorldError> {
        self.check_bounds(pos.y())?;
        let chunk = self.chunk(pos.chunk())?;
        Ok(chunk.light_at(local_coord(pos.x()), pos.y(), local_coord(pos.z())))
    }

    /// Overwrites light channels at a position. Light is derived data;
    /// only the world's light engine should call this.
    pub fn set_light(
        &mut self,
        pos: BlockPos,
        sky: Option<u8>,
        block: Option<u8>,
    ) -> Result<(), WorldError> {
        self.check_bounds(pos.y())?;
        let chunk = self.chunk_mut(pos.chunk())?;
        chunk.set_light(local_coord(pos.x()), pos.y(), local_coord(pos.z()), sky, block);
        Ok(())
    }

    /// Scans a chunk's states against their definitions, poisoning the
    /// chunk on the first violation.
    ///
    /// # Errors
    /// `CorruptBlockState` describing the first failing position; the
    /// chunk is marked unavailable and must be evicted and regenerated.
    pub fn verify_chunk(&mut self, pos: ChunkPos) -> Result<(), WorldError> {
        let chunk = self
            .chunks
            .get(&pos)
            .ok_or(WorldError::ChunkNotLoaded(pos))?;
        let range = chunk.range();

        let mut failure = None;
        'scan: for y in range.min_y..range.max_y() {
            for z in 0..16usize {
                for x in 0..16usize {
                    let state = chunk.get_state(x, y, z);
                    let world_pos = BlockPos::new(
                        pos.x() * 16 + x as i32,
                        y,
                        pos.z() * 16 + z as i32,
                    );
                    let result = match self.registry.get(state.id) {
                        Some(definition) => state.validate(definition, world_pos),
                        None => Err(WorldError::CorruptBlockState {
                            pos: world_pos,
                            reason: "unknown block id",
                        }),
                    };
                    if let Err(error) = result {
                        failure = Some(error);
                        break 'scan;
                    }
                }
            }
        }

        if let Some(error) = failure {
            log::error!("chunk ({}, {}) failed verification: {error}", pos.x(), pos.z());
            if let Some(chunk) = self.chunks.get_mut(&pos) {
                Arc::make_mut(chunk).mark_corrupt();
            }
            return Err(error);
        }
        Ok(())
    }

    /// Takes a tick-boundary snapshot for external readers.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::new(self.chunks.clone(), self.range)
    }
}

#[cfg(test)]
mod tests {
    use basalt_registry::{PropertyKey, builtin};

    use super::*;

    fn store() -> ChunkStore {
        ChunkStore::new(Arc::new(builtin::registry()), VerticalRange::default())
    }

    #[test]
    fn local_coord_handles_negatives() {
        assert_eq!(local_coord(0), 0);
        assert_eq!(local_coord(15), 15);
        assert_eq!(local_coord(16), 0);
        assert_eq!(local_coord(-1), 15);
        assert_eq!(local_coord(-16), 0);
        assert_eq!(local_coord(-17), 15);
    }

    #[test]
    fn get_set_round_trip() {
        let mut store = store();
        store.ensure_chunk(ChunkPos::new(0, 0));

        let pos = BlockPos::new(3, 64, 12);
        let mut state = BlockState::of(builtin::WATER).with_property(PropertyKey::Level, 4);
        state.sky_light = 11;
        state.block_light = 2;

        store.set_block(pos, state.clone()).expect("write");
        assert_eq!(store.get_block(pos).expect("read"), state);
    }

    #[test]
    fn unloaded_chunk_is_an_error_not_a_default() {
        let store = store();
        let pos = BlockPos::new(100, 64, 100);
        assert_eq!(
            store.get_block(pos),
            Err(WorldError::ChunkNotLoaded(ChunkPos::new(6, 6)))
        );
    }

    #[test]
    fn negative_world_coordinates_map_to_local_fifteen() {
        let mut store = store();
        store.ensure_chunk(ChunkPos::new(-1, -1));

        let pos = BlockPos::new(-1, 64, -1);
        store
            .set_block(pos, BlockState::of(builtin::STONE))
            .expect("write");

        let chunk = store.chunk_ref(ChunkPos::new(-1, -1)).expect("loaded");
        assert_eq!(chunk.id_at(15, 64, 15), builtin::STONE);
        assert_eq!(store.get_block(pos).expect("read").id, builtin::STONE);
    }

    #[test]
    fn vertical_bounds_are_never_clamped() {
        let mut store = store();
        store.ensure_chunk(ChunkPos::new(0, 0));

        let too_high = BlockPos::new(0, 320, 0);
        let too_low = BlockPos::new(0, -65, 0);
        for pos in [too_high, too_low] {
            assert!(matches!(
                store.set_block(pos, BlockState::of(builtin::STONE)),
                Err(WorldError::OutOfVerticalBounds { .. })
            ));
            assert!(matches!(
                store.get_block(pos),
                Err(WorldError::OutOfVerticalBounds { .. })
            ));
        }
    }

    #[test]
    fn schema_mismatch_is_invalid_placement() {
        let mut store = store();
        store.ensure_chunk(ChunkPos::new(0, 0));

        let pos = BlockPos::new(0, 64, 0);
        let bad = BlockState::of(builtin::STONE).with_property(PropertyKey::Level, 3);
        assert!(matches!(
            store.set_block(pos, bad),
            Err(WorldError::InvalidPlacement { .. })
        ));
    }

    #[test]
    fn corrupt_chunks_are_poisoned_until_evicted() {
        let mut store = store();
        let chunk_pos = ChunkPos::new(0, 0);
        let pos = BlockPos::new(0, 64, 0);
        {
            let chunk = store.ensure_chunk(chunk_pos);
            // Write a state that bypasses set_block validation.
            let mut state = BlockState::of(builtin::STONE);
            state.properties.set(PropertyKey::Level, 9);
            chunk.set_state(0, 64, 0, state);
        }

        assert!(matches!(
            store.verify_chunk(chunk_pos),
            Err(WorldError::CorruptBlockState { .. })
        ));
        assert_eq!(store.get_block(pos), Err(WorldError::ChunkCorrupt(chunk_pos)));

        store.remove_chunk(chunk_pos);
        store.ensure_chunk(chunk_pos);
        assert!(store.get_block(pos).is_ok());
    }

    #[test]
    fn snapshots_are_isolated_from_later_writes() {
        let mut store = store();
        store.ensure_chunk(ChunkPos::new(0, 0));
        let pos = BlockPos::new(1, 64, 1);
        store
            .set_block(pos, BlockState::of(builtin::DIRT))
            .expect("write");

        let snapshot = store.snapshot();
        store
            .set_block(pos, BlockState::of(builtin::STONE))
            .expect("overwrite");

        assert_eq!(snapshot.get_block(pos).expect("snapshot read").id, builtin::DIRT);
        assert_eq!(store.get_block(pos).expect("live read").id, builtin::STONE);
    }
}
