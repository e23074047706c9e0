use basalt_utils::{BlockPos, ChunkPos};
use thiserror::Error;

/// Errors raised by chunk storage and the simulation acting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    /// The owning chunk is not loaded. Retryable: the scheduler
    /// re-enqueues the affected ticket one tick later.
    #[error("chunk {0:?} is not loaded")]
    ChunkNotLoaded(ChunkPos),

    /// The y coordinate lies outside the world's vertical range.
    /// Reported synchronously, never clamped.
    #[error("y={y} outside vertical range [{min_y}, {max_y})")]
    OutOfVerticalBounds { y: i32, min_y: i32, max_y: i32 },

    /// The written state is invalid for its block id.
    #[error("invalid placement at {pos:?}: {reason}")]
    InvalidPlacement {
        pos: BlockPos,
        reason: &'static str,
    },

    /// A stored state violated its own invariants. Fatal for the chunk,
    /// which is poisoned until evicted and regenerated.
    #[error("corrupt block state at {pos:?}: {reason}")]
    CorruptBlockState {
        pos: BlockPos,
        reason: &'static str,
    },

    /// The chunk was poisoned by an earlier corruption and must be
    /// reloaded or regenerated before use.
    #[error("chunk {0:?} is corrupt and unavailable")]
    ChunkCorrupt(ChunkPos),
}

impl WorldError {
    /// Whether retrying the failed operation later can succeed without
    /// caller-side changes.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ChunkNotLoaded(_))
    }
}
