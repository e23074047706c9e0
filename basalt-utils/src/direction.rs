//! The six axis-aligned block face directions.

use crate::types::BlockPos;

/// An axis-aligned direction between neighboring blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// All six directions, vertical first.
    pub const VALUES: [Self; 6] = [
        Self::Down,
        Self::Up,
        Self::North,
        Self::South,
        Self::West,
        Self::East,
    ];

    /// The four horizontal directions.
    pub const HORIZONTAL: [Self; 4] = [Self::North, Self::South, Self::West, Self::East];

    /// Returns the unit offset of this direction.
    #[inline]
    #[must_use]
    pub const fn offset(self) -> (i32, i32, i32) {
        match self {
            Self::Down => (0, -1, 0),
            Self::Up => (0, 1, 0),
            Self::North => (0, 0, -1),
            Self::South => (0, 0, 1),
            Self::West => (-1, 0, 0),
            Self::East => (1, 0, 0),
        }
    }

    /// Returns the neighboring position one step in this direction.
    #[inline]
    #[must_use]
    pub const fn relative(self, pos: &BlockPos) -> BlockPos {
        let (dx, dy, dz) = self.offset();
        pos.offset(dx, dy, dz)
    }

    /// Returns the opposite direction.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Down => Self::Up,
            Self::Up => Self::Down,
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_are_involutions() {
        for direction in Direction::VALUES {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn relative_steps_once() {
        let pos = BlockPos::new(0, 64, 0);
        assert_eq!(Direction::Up.relative(&pos), BlockPos::new(0, 65, 0));
        assert_eq!(Direction::North.relative(&pos), BlockPos::new(0, 64, -1));
        assert_eq!(Direction::East.relative(&pos), BlockPos::new(1, 64, 0));
    }
}
