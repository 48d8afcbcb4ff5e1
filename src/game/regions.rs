//! Region algebra on top of the union-find: neighbour counting, merging
//! and the rebuild that lets a region split.
//!
//! Flood fills use an explicit worklist and the per-cell `visited` flag.
//! Every flood is followed by a second walk over the same component that
//! clears the flag again.

use crate::game::{Grid, PlayerId};

impl Grid {
    /// Number of neighbours of `index` owned by `player` (not deduplicated).
    pub(crate) fn count_adjacent(&self, player: PlayerId, index: usize) -> u32 {
        self.owned_neighbours(index, player).fold(0, |count, _| count + 1)
    }

    /// Number of distinct regions of `player` touching `index`.
    pub(crate) fn distinct_neighbour_regions(&mut self, player: PlayerId, index: usize) -> u32 {
        let (adj, count) = self.neighbours(index);
        let mut roots = [usize::MAX; 4];
        let mut distinct = 0u32;

        for &n in &adj[..count as usize] {
            if self.owner_at(n) != Some(player) {
                continue;
            }
            let root = self.find(n);
            if !roots[..distinct as usize].contains(&root) {
                roots[distinct as usize] = root;
                distinct += 1;
            }
        }

        distinct
    }

    /// Union `index` with every neighbour owned by `player`.
    pub(crate) fn merge_into_neighbours(&mut self, player: PlayerId, index: usize) {
        let (adj, count) = self.neighbours(index);
        for &n in &adj[..count as usize] {
            if self.owner_at(n) == Some(player) {
                self.union(index, n);
            }
        }
    }

    /// Reset every cell of the `player` component containing `index` to a
    /// singleton tree. O(component size).
    pub(crate) fn rebuild_region(&mut self, player: PlayerId, index: usize) {
        self.flood(player, index, |grid, cell| grid.make_singleton(cell));
        self.clear_visited(player, index);
    }

    /// Union the whole `player` component reachable from `index` into the
    /// tree of `index`.
    pub(crate) fn union_component(&mut self, player: PlayerId, index: usize) {
        self.flood(player, index, |grid, cell| grid.union(cell, index));
        self.clear_visited(player, index);
    }

    /// Visit each unvisited cell of the `player` component reachable from
    /// `start`, marking it visited. Does nothing if `start` is not owned by
    /// `player`.
    fn flood(&mut self, player: PlayerId, start: usize, mut visit: impl FnMut(&mut Grid, usize)) {
        if self.owner_at(start) != Some(player) || self.cell(start).visited {
            return;
        }

        let mut stack = vec![start];
        self.cell_mut(start).visited = true;

        while let Some(current) = stack.pop() {
            visit(self, current);

            let (adj, count) = self.neighbours(current);
            for &n in &adj[..count as usize] {
                let cell = self.cell(n);
                if cell.owner == Some(player) && !cell.visited {
                    self.cell_mut(n).visited = true;
                    stack.push(n);
                }
            }
        }
    }

    /// Clear `visited` on the `player` component reachable from `start`.
    pub(crate) fn clear_visited(&mut self, player: PlayerId, start: usize) {
        if self.owner_at(start) != Some(player) || !self.cell(start).visited {
            return;
        }

        let mut stack = vec![start];
        self.cell_mut(start).visited = false;

        while let Some(current) = stack.pop() {
            let (adj, count) = self.neighbours(current);
            for &n in &adj[..count as usize] {
                let cell = self.cell(n);
                if cell.owner == Some(player) && cell.visited {
                    self.cell_mut(n).visited = false;
                    stack.push(n);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::game::{Coord, Grid, PlayerId};

    /// Build a grid from rows listed top to bottom; digits are owners.
    fn grid_from(rows: &[&str]) -> Grid {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut grid = Grid::new(width, height).unwrap();
        for (row, line) in rows.iter().enumerate() {
            let y = height - 1 - row as u32;
            for (x, ch) in line.chars().enumerate() {
                if let Some(owner) = ch.to_digit(10) {
                    let idx = grid.index_of(Coord::new(x as u32, y)).unwrap();
                    grid.cell_mut(idx).owner = Some(owner);
                }
            }
        }
        for idx in 0..grid.cells().len() {
            if let Some(owner) = grid.owner_at(idx) {
                grid.merge_into_neighbours(owner, idx);
            }
        }
        grid
    }

    fn idx(grid: &Grid, x: u32, y: u32) -> usize {
        grid.index_of(Coord::new(x, y)).unwrap()
    }

    fn no_visited(grid: &Grid) -> bool {
        grid.cells().iter().all(|cell| !cell.visited)
    }

    fn distinct_roots(grid: &mut Grid, player: PlayerId) -> usize {
        let owned: Vec<usize> = (0..grid.cells().len())
            .filter(|&i| grid.owner_at(i) == Some(player))
            .collect();
        let mut roots: Vec<usize> = owned.into_iter().map(|i| grid.find(i)).collect();
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }

    #[test]
    fn test_count_adjacent_counts_every_neighbour() {
        let grid = grid_from(&["1.1", "...", ".1."]);
        let centre = idx(&grid, 1, 1);
        assert_eq!(grid.count_adjacent(1, centre), 1);
        assert_eq!(grid.count_adjacent(2, centre), 0);

        let grid = grid_from(&[".1.", "1.1", ".1."]);
        assert_eq!(grid.count_adjacent(1, idx(&grid, 1, 1)), 4);
    }

    #[test]
    fn test_distinct_regions_deduplicates() {
        // Left and top neighbours of the centre belong to the same region.
        let mut grid = grid_from(&["11.", "1..", "..."]);
        let target = idx(&grid, 1, 1);
        assert_eq!(grid.count_adjacent(1, target), 2);
        assert_eq!(grid.distinct_neighbour_regions(1, target), 1);
    }

    #[test]
    fn test_distinct_regions_separate_areas() {
        let mut grid = grid_from(&[".1.", "1.1", ".1."]);
        let target = idx(&grid, 1, 1);
        assert_eq!(grid.distinct_neighbour_regions(1, target), 4);
        assert_eq!(grid.distinct_neighbour_regions(2, target), 0);
    }

    #[test]
    fn test_merge_into_neighbours_joins_everything() {
        let mut grid = grid_from(&[".1.", "1.1", ".1."]);
        let centre = idx(&grid, 1, 1);
        grid.cell_mut(centre).owner = Some(1);
        grid.merge_into_neighbours(1, centre);
        assert_eq!(distinct_roots(&mut grid, 1), 1);
    }

    #[test]
    fn test_rebuild_region_makes_singletons_and_clears_marks() {
        let mut grid = grid_from(&["111", "..1", "2.1"]);
        let start = idx(&grid, 0, 2);
        grid.rebuild_region(1, start);

        assert_eq!(distinct_roots(&mut grid, 1), 5);
        assert_eq!(distinct_roots(&mut grid, 2), 1);
        assert!(no_visited(&grid));
    }

    #[test]
    fn test_rebuild_region_ignores_foreign_start() {
        let mut grid = grid_from(&["11", "2."]);
        grid.rebuild_region(1, idx(&grid, 0, 0));
        assert_eq!(distinct_roots(&mut grid, 1), 1);
        assert!(no_visited(&grid));
    }

    #[test]
    fn test_union_component_reconnects_after_rebuild() {
        let mut grid = grid_from(&["111", "..1", "..1"]);
        let start = idx(&grid, 0, 2);
        grid.rebuild_region(1, start);
        grid.union_component(1, start);

        assert_eq!(distinct_roots(&mut grid, 1), 1);
        assert!(no_visited(&grid));
    }

    #[test]
    fn test_union_component_stops_at_gaps() {
        let mut grid = grid_from(&["1.1", "1.1"]);
        let left = idx(&grid, 0, 0);
        let right = idx(&grid, 2, 0);
        grid.rebuild_region(1, left);
        grid.rebuild_region(1, right);
        grid.union_component(1, left);

        // Right column is still two singletons.
        assert_eq!(distinct_roots(&mut grid, 1), 3);
        assert!(no_visited(&grid));
    }

    #[test]
    fn test_large_region_flood_does_not_recurse() {
        let mut grid = Grid::new(400, 400).unwrap();
        for i in 0..grid.cells().len() {
            grid.cell_mut(i).owner = Some(1);
        }
        grid.rebuild_region(1, 0);
        grid.union_component(1, 0);
        let root = grid.find(0);
        assert_eq!(grid.find(grid.cells().len() - 1), root);
        assert!(no_visited(&grid));
    }
}
