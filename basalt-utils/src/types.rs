// Wrapper types making it harder to accidentally use the wrong underlying type.

use bitflags::bitflags;

use crate::math::{Vector2, Vector3};

/// A block definition identifier. Using the registry this id can be resolved
/// into a definition with its material and rule category.
///
/// The default id (0) is air by convention in the built-in set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockId(pub u16);

/// A chunk position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos(pub Vector2<i32>);

/// A block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos(pub Vector3<i32>);

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self(Vector2::new(x, z))
    }

    #[inline]
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.0.x
    }

    #[inline]
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.0.y
    }
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self(Vector3::new(x, y, z))
    }

    #[inline]
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.0.x
    }

    #[inline]
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.0.y
    }

    #[inline]
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.0.z
    }

    /// Returns the position offset by the given deltas.
    #[inline]
    #[must_use]
    pub const fn offset(&self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.0.x + dx, self.0.y + dy, self.0.z + dz)
    }

    /// Returns the position of the chunk containing this block.
    ///
    /// Arithmetic shift equals floor division by 16 for negative
    /// coordinates as well, so `(-1, _, -1)` lands in chunk `(-1, -1)`.
    #[inline]
    #[must_use]
    pub const fn chunk(&self) -> ChunkPos {
        ChunkPos::new(self.0.x >> 4, self.0.z >> 4)
    }
}

bitflags! {
    /// Flags controlling the side effects of a block write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UpdateFlags: u8 {
        /// Enqueue immediate update tickets for the six neighbors.
        const NEIGHBOR_TICKETS = 1;
        /// Feed the change into the light engine.
        const LIGHT = 2;
        /// Mark the owning chunk dirty for persistence.
        const MARK_DIRTY = 4;
    }
}

impl UpdateFlags {
    /// The default flag set for gameplay mutations.
    pub const UPDATE_ALL: Self = Self::all();
}
