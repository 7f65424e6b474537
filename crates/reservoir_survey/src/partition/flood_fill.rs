//! Iterative stack flood fill, the reference partitioning strategy.
use crate::grid::{neighbors, Grid};
use crate::partition::{Reservoir, ReservoirStrategy, TraversalStats};

/// Discovers reservoirs with an explicit stack instead of call-stack recursion.
///
/// Visited flags are indexed by position in the sorted active cell list, so auxiliary
/// storage grows with the number of active cells, not with the grid area. Start cells
/// are taken from the back of that list; the borrowed [`Grid`] is never modified.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloodFill;

impl FloodFill {
    pub fn new() -> Self {
        Self
    }
}

impl ReservoirStrategy for FloodFill {
    fn name(&self) -> &'static str {
        "flood_fill"
    }

    fn find_reservoirs(&self, grid: &Grid, stats: &mut TraversalStats) -> Vec<Reservoir> {
        let cells = grid.to_cells();
        let mut visited = vec![false; cells.len()];
        let mut stack: Vec<usize> = Vec::new();
        let mut reservoirs = Vec::new();

        for start in (0..cells.len()).rev() {
            if visited[start] {
                continue;
            }

            let mut members = Vec::new();
            stack.push(start);
            stats.stack_pushes += 1;
            stats.observe_stack(stack.len());

            while let Some(pos) = stack.pop() {
                if visited[pos] {
                    continue;
                }
                visited[pos] = true;
                stats.cells_visited += 1;
                let cell = cells[pos];
                members.push(cell);

                for n in neighbors(cell, grid) {
                    // Every active neighbor is in `cells`.
                    if let Ok(j) = cells.binary_search(&n) {
                        if !visited[j] {
                            stack.push(j);
                            stats.stack_pushes += 1;
                        }
                    }
                }
                stats.observe_stack(stack.len());
            }

            reservoirs.push(Reservoir::from_cells(members));
        }

        reservoirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    #[test]
    fn two_isolated_cells_are_two_reservoirs() {
        let grid = Grid::from_cells(6, [(0, 0), (5, 5)]).unwrap();
        let mut stats = TraversalStats::new();
        let found = FloodFill.find_reservoirs(&grid, &mut stats);
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|r| r.len() == 1));
        assert_eq!(stats.cells_visited, 2);
        assert_eq!(stats.stack_pushes, 2);
    }

    #[test]
    fn diagonal_chain_is_one_reservoir() {
        let grid = Grid::from_cells(5, [(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]).unwrap();
        let mut stats = TraversalStats::new();
        let found = FloodFill.find_reservoirs(&grid, &mut stats);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].len(), 5);
        assert_eq!(found[0].first(), Some(Cell::new(0, 0)));
    }

    #[test]
    fn grid_is_left_intact() {
        let grid = Grid::generate(30, 0.6, Some(11)).unwrap();
        let before = grid.clone();
        let mut stats = TraversalStats::new();
        let _ = FloodFill.find_reservoirs(&grid, &mut stats);
        assert_eq!(grid, before);
        assert_eq!(stats.cells_visited, grid.len());
    }

    #[test]
    fn long_snake_does_not_recurse() {
        // A serpentine path covering most of a 300x300 grid is one deep component.
        let size = 300i32;
        let mut cells = Vec::new();
        for x in (0..size).step_by(2) {
            for y in 0..size {
                cells.push((x, y));
            }
            let link_y = if (x / 2) % 2 == 0 { size - 1 } else { 0 };
            if x + 1 < size {
                cells.push((x + 1, link_y));
            }
        }
        let grid = Grid::from_cells(size as usize, cells).unwrap();
        let mut stats = TraversalStats::new();
        let found = FloodFill.find_reservoirs(&grid, &mut stats);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].len(), grid.len());
    }
}
