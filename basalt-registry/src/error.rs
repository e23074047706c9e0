use basalt_utils::BlockId;
use thiserror::Error;

/// Errors raised by registry operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A definition with this id was already registered.
    #[error("block id {0:?} is already registered")]
    DuplicateBlockId(BlockId),

    /// No definition exists for this id.
    #[error("unknown block id {0:?}")]
    UnknownBlockId(BlockId),
}
