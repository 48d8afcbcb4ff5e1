//! Board cells and coordinates.

// Indices are bounded by width * height, which fits in u32 per axis.
#![allow(clippy::cast_possible_truncation)]

use crate::error::{GameError, GameResult};
use crate::game::PlayerId;

/// A position on the board.
///
/// `x` is the column, `y` the row; row 0 is the bottom of the printed board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    /// X coordinate (column).
    pub x: u32,
    /// Y coordinate (row).
    pub y: u32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// A single field of the board together with its union-find node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Player holding this field (None = free).
    pub owner: Option<PlayerId>,
    /// Flat index of the union-find parent; the cell's own index at a root.
    pub(crate) parent: usize,
    /// Tree weight, meaningful only at roots.
    pub(crate) tree_size: u64,
    /// Scratch mark for flood fills. False between public calls.
    pub(crate) visited: bool,
}

impl Cell {
    /// A free field that is the root of its own singleton tree.
    const fn singleton(index: usize) -> Self {
        Self {
            owner: None,
            parent: index,
            tree_size: 1,
            visited: false,
        }
    }
}

/// Up to four in-bounds neighbour indices; valid entries are 0..count.
pub(crate) type Neighbours = ([usize; 4], u8);

/// The board: cells stored in row-major order (`y * width + x`).
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidParameters`] if a dimension is zero,
    /// [`GameError::BoardTooLarge`] if the cell count overflows `usize`, and
    /// [`GameError::Allocation`] if the cells cannot be allocated.
    pub fn new(width: u32, height: u32) -> GameResult<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::InvalidParameters);
        }

        let size = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(w, h)| w.checked_mul(h))
            .ok_or(GameError::BoardTooLarge)?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|_| GameError::Allocation)?;
        cells.extend((0..size).map(Cell::singleton));

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Get the width of the board.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height of the board.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of fields.
    #[must_use]
    pub fn area(&self) -> u64 {
        self.cells.len() as u64
    }

    /// Raw cells in row-major order.
    #[must_use]
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check if a coordinate is on the board.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Flat index of a coordinate, or None when out of bounds.
    #[must_use]
    pub fn index_of(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(coord.y as usize * self.width as usize + coord.x as usize)
        } else {
            None
        }
    }

    /// Coordinate of a flat index.
    #[must_use]
    pub fn coord_of(&self, index: usize) -> Coord {
        let width = self.width as usize;
        Coord::new((index % width) as u32, (index / width) as u32)
    }

    /// Get the cell at a coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index_of(coord).map(|idx| &self.cells[idx])
    }

    /// Owner of the field at a coordinate (None for free or out of bounds).
    #[must_use]
    pub fn owner(&self, coord: Coord) -> Option<PlayerId> {
        self.get(coord).and_then(|cell| cell.owner)
    }

    /// Iterate over all coordinates and cells.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(idx, cell)| (self.coord_of(idx), cell))
    }

    #[inline]
    pub(crate) fn cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    #[inline]
    pub(crate) fn cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    #[inline]
    pub(crate) fn owner_at(&self, index: usize) -> Option<PlayerId> {
        self.cells[index].owner
    }

    /// In-bounds neighbours of a flat index: left, right, down, up.
    #[inline]
    pub(crate) fn neighbours(&self, index: usize) -> Neighbours {
        let width = self.width as usize;
        let height = self.height as usize;
        let (x, y) = (index % width, index / width);
        let mut result = [0usize; 4];
        let mut count = 0u8;

        if x > 0 {
            result[count as usize] = index - 1;
            count += 1;
        }
        if x + 1 < width {
            result[count as usize] = index + 1;
            count += 1;
        }
        if y > 0 {
            result[count as usize] = index - width;
            count += 1;
        }
        if y + 1 < height {
            result[count as usize] = index + width;
            count += 1;
        }

        (result, count)
    }

    /// Neighbours of `index` owned by `player`.
    pub(crate) fn owned_neighbours(
        &self,
        index: usize,
        player: PlayerId,
    ) -> impl Iterator<Item = usize> + '_ {
        let (adj, count) = self.neighbours(index);
        adj.into_iter()
            .take(count as usize)
            .filter(move |&n| self.cells[n].owner == Some(player))
    }

    /// Turn the field back into a free singleton tree.
    pub(crate) fn reset(&mut self, index: usize) {
        let visited = self.cells[index].visited;
        self.cells[index] = Cell::singleton(index);
        self.cells[index].visited = visited;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbours_on_edges() {
        let grid = Grid::new(4, 3).unwrap();

        let (adj, count) = grid.neighbours(5);
        assert_eq!(&adj[..count as usize], &[4, 6, 1, 9]);

        let (adj, count) = grid.neighbours(0);
        assert_eq!(&adj[..count as usize], &[1, 4]);

        let (adj, count) = grid.neighbours(11);
        assert_eq!(&adj[..count as usize], &[10, 7]);
    }

    #[test]
    fn test_neighbours_single_column() {
        let grid = Grid::new(1, 3).unwrap();

        let (adj, count) = grid.neighbours(0);
        assert_eq!(&adj[..count as usize], &[1]);

        let (adj, count) = grid.neighbours(1);
        assert_eq!(&adj[..count as usize], &[0, 2]);

        let single = Grid::new(1, 1).unwrap();
        assert_eq!(single.neighbours(0).1, 0);
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 7).unwrap();
        assert_eq!(grid.width(), 10);
        assert_eq!(grid.height(), 7);
        assert_eq!(grid.area(), 70);
        assert!(grid.iter().all(|(_, cell)| cell.owner.is_none()));
    }

    #[test]
    fn test_grid_zero_size() {
        assert_eq!(Grid::new(0, 10).unwrap_err(), GameError::InvalidParameters);
        assert_eq!(Grid::new(10, 0).unwrap_err(), GameError::InvalidParameters);
    }

    #[test]
    fn test_cells_start_as_singletons() {
        let grid = Grid::new(3, 3).unwrap();
        for (idx, cell) in grid.cells().iter().enumerate() {
            assert_eq!(cell.parent, idx);
            assert_eq!(cell.tree_size, 1);
            assert!(!cell.visited);
        }
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(5, 4).unwrap();
        let coord = Coord::new(3, 2);
        let idx = grid.index_of(coord).unwrap();
        assert_eq!(idx, 13);
        assert_eq!(grid.coord_of(idx), coord);
    }

    #[test]
    fn test_grid_bounds() {
        let grid = Grid::new(10, 10).unwrap();
        assert!(grid.in_bounds(Coord::new(0, 0)));
        assert!(grid.in_bounds(Coord::new(9, 9)));
        assert!(!grid.in_bounds(Coord::new(10, 0)));
        assert!(!grid.in_bounds(Coord::new(0, 10)));
        assert!(grid.get(Coord::new(0, 10)).is_none());
        assert_eq!(grid.owner(Coord::new(42, 0)), None);
    }
}
