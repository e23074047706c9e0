//! A 16x16x16 section of block cells plus its two light channels.

use basalt_utils::BlockId;

use crate::light::LightChannel;
use crate::state::PropertyMap;

/// Edge length of a section (and of a chunk in x/z).
pub const SECTION_SIZE: usize = 16;

/// Cells per section.
pub const SECTION_VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_SIZE;

/// The stored part of a block state. Light lives in the section's
/// channels; composing the two back into a full state happens at the
/// chunk boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Cell {
    pub id: BlockId,
    pub properties: PropertyMap,
    pub waterlogged: bool,
}

impl Cell {
    pub(crate) fn of(id: BlockId) -> Self {
        Self {
            id,
            properties: PropertyMap::new(),
            waterlogged: false,
        }
    }
}

/// Cell storage with a uniform fast path, so freshly allocated all-air
/// sections cost one cell instead of 4096.
#[derive(Debug, Clone)]
enum CellArray {
    Uniform(Cell),
    Dense(Box<[Cell]>),
}

/// One vertical slice of a chunk.
#[derive(Debug, Clone)]
pub(crate) struct ChunkSection {
    cells: CellArray,
    pub(crate) sky_light: LightChannel,
    pub(crate) block_light: LightChannel,
}

/// Index of a cell within its section.
#[inline]
pub(crate) fn cell_index(x: usize, y: usize, z: usize) -> usize {
    debug_assert!(x < SECTION_SIZE && y < SECTION_SIZE && z < SECTION_SIZE);
    (y << 8) | (z << 4) | x
}

impl ChunkSection {
    /// A section with every cell equal to `fill`.
    pub(crate) fn filled(fill: Cell) -> Self {
        Self {
            cells: CellArray::Uniform(fill),
            sky_light: LightChannel::default(),
            block_light: LightChannel::default(),
        }
    }

    pub(crate) fn get(&self, x: usize, y: usize, z: usize) -> &Cell {
        match &self.cells {
            CellArray::Uniform(cell) => cell,
            CellArray::Dense(cells) => &cells[cell_index(x, y, z)],
        }
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, z: usize, cell: Cell) {
        match &mut self.cells {
            CellArray::Uniform(current) => {
                if *current == cell {
                    return;
                }
                let mut cells = vec![current.clone(); SECTION_VOLUME].into_boxed_slice();
                cells[cell_index(x, y, z)] = cell;
                self.cells = CellArray::Dense(cells);
            }
            CellArray::Dense(cells) => cells[cell_index(x, y, z)] = cell,
        }
    }

    /// Block id shortcut for hot read paths (random tick sampling).
    #[inline]
    pub(crate) fn id_at(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.get(x, y, z).id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_upgrade_on_divergent_write() {
        let mut section = ChunkSection::filled(Cell::of(BlockId(0)));
        assert!(matches!(section.cells, CellArray::Uniform(_)));

        section.set(3, 4, 5, Cell::of(BlockId(1)));
        assert!(matches!(section.cells, CellArray::Dense(_)));
        assert_eq!(section.id_at(3, 4, 5), BlockId(1));
        assert_eq!(section.id_at(0, 0, 0), BlockId(0));
    }

    #[test]
    fn matching_write_keeps_uniform_storage() {
        let mut section = ChunkSection::filled(Cell::of(BlockId(0)));
        section.set(1, 1, 1, Cell::of(BlockId(0)));
        assert!(matches!(section.cells, CellArray::Uniform(_)));
    }

    #[test]
    fn cell_index_covers_the_volume() {
        assert_eq!(cell_index(0, 0, 0), 0);
        assert_eq!(cell_index(15, 15, 15), SECTION_VOLUME - 1);
        assert_eq!(cell_index(1, 0, 0), 1);
        assert_eq!(cell_index(0, 0, 1), 16);
        assert_eq!(cell_index(0, 1, 0), 256);
    }
}
