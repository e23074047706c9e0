//! Immutable tick-boundary view for external readers.

use std::sync::Arc;

use basalt_utils::{BlockId, BlockPos, ChunkPos};
use rustc_hash::FxHashMap;

use crate::chunk::{Chunk, VerticalRange};
use crate::error::WorldError;
use crate::state::BlockState;
use crate::store::local_coord;

/// A consistent view of the world as of one tick boundary.
///
/// Holds `Arc`s to the chunks that existed when it was taken; writes
/// after that point go to fresh copies and are never observed here, so
/// renderers and other consumers read without synchronizing against the
/// tick loop.
#[derive(Clone, Default)]
pub struct WorldSnapshot {
    chunks: FxHashMap<ChunkPos, Arc<Chunk>>,
    range: VerticalRange,
}

impl WorldSnapshot {
    pub(crate) fn new(chunks: FxHashMap<ChunkPos, Arc<Chunk>>, range: VerticalRange) -> Self {
        Self { chunks, range }
    }

    fn chunk(&self, pos: ChunkPos) -> Result<&Arc<Chunk>, WorldError> {
        self.chunks.get(&pos).ok_or(WorldError::ChunkNotLoaded(pos))
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

    /// Reads the block state at a position.
    pub fn get_block(&self, pos: BlockPos) -> Result<BlockState, WorldError> {
        self.check_bounds(pos.y())?;
        let chunk = self.chunk(pos.chunk())?;
        Ok(chunk.get_state(local_coord(pos.x()), pos.y(), local_coord(pos.z())))
    }

    /// Block id at a position.
    pub fn id_at(&self, pos: BlockPos) -> Result<BlockId, WorldError> {
        self.check_bounds(pos.y())?;
        let chunk = self.chunk(pos.chunk())?;
        Ok(chunk.id_at(local_coord(pos.x()), pos.y(), local_coord(pos.z())))
    }

    /// Sky and block light at a position.
    pub fn light_at(&self, pos: BlockPos) -> Result<(u8, u8), WorldError> {
        self.check_bounds(pos.y())?;
        let chunk = self.chunk(pos.chunk())?;
        Ok(chunk.light_at(local_coord(pos.x()), pos.y(), local_coord(pos.z())))
    }

    /// The effective light level: the brighter of the two channels.
    pub fn light_level(&self, pos: BlockPos) -> Result<u8, WorldError> {
        let (sky, block) = self.light_at(pos)?;
        Ok(sky.max(block))
    }

    #[must_use]
    pub fn is_loaded(&self, pos: ChunkPos) -> bool {
        self.chunks.contains_key(&pos)
    }

    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}
