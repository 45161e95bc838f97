use crate::model::cell::{Cell, Colour};
use crate::model::grid::{CELL_COUNT, Grid, HEIGHT, WIDTH};

/// Minimum group size that clears.
pub const CLEAR_THRESHOLD: usize = 4;

/// Cells already claimed by a component during one whole-grid scan.
#[derive(Debug, Clone)]
pub struct Visited {
    seen: [bool; CELL_COUNT],
}

impl Visited {
    pub const fn new() -> Self {
        Self {
            seen: [false; CELL_COUNT],
        }
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.seen[Grid::index(x, y)]
    }

    #[inline]
    fn mark(&mut self, index: usize) {
        self.seen[index] = true;
    }
}

impl Default for Visited {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    pub colour: Colour,
    pub size: usize,
    pub skulls_cleared: usize,
}

impl Component {
    pub const fn cleared(&self) -> bool {
        self.size >= CLEAR_THRESHOLD
    }
}

fn neighbours(index: usize) -> impl Iterator<Item = usize> {
    let x = index % WIDTH;
    let y = index / WIDTH;
    let up = (y > 0).then(|| index - WIDTH);
    let down = (y + 1 < HEIGHT).then(|| index + WIDTH);
    let left = (x > 0).then(|| index - 1);
    let right = (x + 1 < WIDTH).then(|| index + 1);
    [up, down, left, right].into_iter().flatten()
}

/// 4-connected flood fill from `(x, y)` over cells of the same colour.
///
/// Returns `None` when the start cell is empty or a skull. Every member is
/// marked in `visited`. When the component reaches [`CLEAR_THRESHOLD`] its
/// cells are emptied together with any skull touching one of them; removed
/// skulls are marked visited as well.
pub fn flood_fill(grid: &mut Grid, x: usize, y: usize, visited: &mut Visited) -> Option<Component> {
    let colour = grid.get(x, y).colour()?;
    let start = Grid::index(x, y);

    let mut in_run = [false; CELL_COUNT];
    let mut members = Vec::with_capacity(CELL_COUNT);
    in_run[start] = true;
    members.push(start);

    let mut cursor = 0;
    while cursor < members.len() {
        let index = members[cursor];
        visited.mark(index);
        for next in neighbours(index) {
            if !in_run[next] && grid.cells()[next] == Cell::Block(colour) {
                in_run[next] = true;
                members.push(next);
            }
        }
        cursor += 1;
    }

    let size = members.len();
    let mut skulls_cleared = 0;
    if size >= CLEAR_THRESHOLD {
        let cells = grid.cells_mut();
        for &index in &members {
            cells[index] = Cell::Empty;
        }
        for &index in &members {
            for next in neighbours(index) {
                if cells[next].is_skull() {
                    cells[next] = Cell::Empty;
                    visited.mark(next);
                    skulls_cleared += 1;
                }
            }
        }
    }

    Some(Component {
        colour,
        size,
        skulls_cleared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: [&str; HEIGHT]) -> Grid {
        Grid::from_rows(&rows).expect("valid rows")
    }

    #[test]
    fn empty_and_skull_cells_do_not_seed() {
        let mut grid = grid_from([
            "......", "......", "......", "......", "......", "......", "......", "......",
            "......", "......", "......", "0.....",
        ]);
        let mut visited = Visited::new();
        assert_eq!(flood_fill(&mut grid, 0, 11, &mut visited), None);
        assert_eq!(flood_fill(&mut grid, 1, 11, &mut visited), None);
    }

    #[test]
    fn small_group_is_counted_but_kept() {
        let mut grid = grid_from([
            "......", "......", "......", "......", "......", "......", "......", "......",
            "......", "......", ".2....", "22....",
        ]);
        let before = grid;
        let mut visited = Visited::new();
        let component = flood_fill(&mut grid, 0, 11, &mut visited).expect("coloured");
        assert_eq!(component.size, 3);
        assert!(!component.cleared());
        assert_eq!(grid, before);
        assert!(visited.contains(1, 10));
        assert!(!visited.contains(2, 11));
    }

    #[test]
    fn diagonal_cells_are_not_connected() {
        let mut grid = grid_from([
            "......", "......", "......", "......", "......", "......", "......", "......",
            "......", "...1..", "..1...", ".1....",
        ]);
        let mut visited = Visited::new();
        let component = flood_fill(&mut grid, 1, 11, &mut visited).expect("coloured");
        assert_eq!(component.size, 1);
    }

    #[test]
    fn clearing_group_takes_adjacent_skulls_once() {
        let mut grid = grid_from([
            "......", "......", "......", "......", "......", "......", "......", "......",
            "......", "0000..", "4444..", "0.....",
        ]);
        let mut visited = Visited::new();
        let component = flood_fill(&mut grid, 0, 10, &mut visited).expect("coloured");
        assert_eq!(component.colour, Colour::Red);
        assert_eq!(component.size, 4);
        assert_eq!(component.skulls_cleared, 5);
        assert_eq!(grid.filled_count(), 0);
        assert!(visited.contains(0, 11));
    }
}
