//! The block registry.

use basalt_utils::BlockId;
use rustc_hash::FxHashMap;

use crate::definition::BlockDefinition;
use crate::error::RegistryError;

/// Immutable (after freeze) catalog of block definitions.
pub struct BlockRegistry {
    by_id: FxHashMap<BlockId, BlockDefinition>,
    by_name: FxHashMap<&'static str, BlockId>,
    default_id: BlockId,
    allows_registering: bool,
}

impl BlockRegistry {
    /// Creates an empty registry whose default (fill) block is `default_id`.
    ///
    /// The default id does not need to be registered yet, but must be by
    /// the time chunks are allocated.
    #[must_use]
    pub fn new(default_id: BlockId) -> Self {
        Self {
            by_id: FxHashMap::default(),
            by_name: FxHashMap::default(),
            default_id,
            allows_registering: true,
        }
    }

    /// Registers a definition.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateBlockId`] if the id is taken.
    ///
    /// # Panics
    /// Panics if the registry has been frozen; registering after startup
    /// is a programmer error.
    pub fn register(&mut self, definition: BlockDefinition) -> Result<(), RegistryError> {
        assert!(
            self.allows_registering,
            "cannot register block after registry is frozen"
        );
        if self.by_id.contains_key(&definition.id) {
            return Err(RegistryError::DuplicateBlockId(definition.id));
        }
        self.by_name.insert(definition.name, definition.id);
        self.by_id.insert(definition.id, definition);
        Ok(())
    }

    /// Looks a definition up by id.
    ///
    /// # Errors
    /// [`RegistryError::UnknownBlockId`] if nothing is registered there.
    pub fn lookup(&self, id: BlockId) -> Result<&BlockDefinition, RegistryError> {
        self.by_id.get(&id).ok_or(RegistryError::UnknownBlockId(id))
    }

    /// Looks a definition up by id, `None` if absent.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&BlockDefinition> {
        self.by_id.get(&id)
    }

    /// Resolves a block name to its id.
    #[must_use]
    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// The id chunks are filled with on allocation.
    #[inline]
    #[must_use]
    pub fn default_id(&self) -> BlockId {
        self.default_id
    }

    /// Ends the registration phase.
    pub fn freeze(&mut self) {
        self.allows_registering = false;
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
