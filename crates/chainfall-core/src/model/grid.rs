use crate::model::cell::{Cell, Colour};
use std::fmt;

pub const WIDTH: usize = 6;
pub const HEIGHT: usize = 12;
pub const CELL_COUNT: usize = WIDTH * HEIGHT;

/// Row-major board, `index = x + y * WIDTH`, with `y = 0` at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Cell; CELL_COUNT],
}

/// Lowest empty row per column, `None` once the column is full.
pub type LandingRows = [Option<usize>; WIDTH];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    RowCount { expected: usize, found: usize },
    RowWidth { row: usize, len: usize },
    BadCell { row: usize, ch: char },
    BadPair { line: String },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::RowCount { expected, found } => {
                write!(f, "expected {expected} board rows but found {found}")
            }
            ParseError::RowWidth { row, len } => {
                write!(f, "board row {row} has {len} cells, expected {WIDTH}")
            }
            ParseError::BadCell { row, ch } => {
                write!(f, "board row {row} contains unknown cell '{ch}'")
            }
            ParseError::BadPair { line } => write!(f, "malformed block pair '{line}'"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Grid {
    pub const fn empty() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    #[inline]
    pub const fn index(x: usize, y: usize) -> usize {
        x + y * WIDTH
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.cells[Self::index(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        self.cells[Self::index(x, y)] = cell;
    }

    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell; CELL_COUNT] {
        &mut self.cells
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, ParseError> {
        if rows.len() != HEIGHT {
            return Err(ParseError::RowCount {
                expected: HEIGHT,
                found: rows.len(),
            });
        }

        let mut grid = Self::empty();
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref().trim();
            let len = row.chars().count();
            if len != WIDTH {
                return Err(ParseError::RowWidth { row: y, len });
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = Cell::from_char(ch).ok_or(ParseError::BadCell { row: y, ch })?;
                grid.set(x, y, cell);
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> Vec<String> {
        (0..HEIGHT)
            .map(|y| (0..WIDTH).map(|x| self.get(x, y).to_char()).collect())
            .collect()
    }

    /// Compacts every column toward the bottom, keeping the vertical order of
    /// filled cells. Running it twice is a no-op.
    pub fn apply_gravity(&mut self) {
        for x in 0..WIDTH {
            let mut write_y = HEIGHT;
            for y in (0..HEIGHT).rev() {
                let cell = self.get(x, y);
                if cell.is_empty() {
                    continue;
                }
                write_y -= 1;
                if write_y != y {
                    self.set(x, write_y, cell);
                    self.set(x, y, Cell::Empty);
                }
            }
        }
    }

    /// Scans each column upward and reports the first empty row found.
    pub fn landing_rows(&self) -> LandingRows {
        let mut rows = [None; WIDTH];
        for (x, slot) in rows.iter_mut().enumerate() {
            *slot = (0..HEIGHT).rev().find(|&y| self.get(x, y).is_empty());
        }
        rows
    }

    pub fn diff_count(&self, other: &Grid) -> usize {
        self.cells
            .iter()
            .zip(other.cells.iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_filled()).count()
    }

    pub fn colour_histogram(&self) -> [usize; 5] {
        let mut histogram = [0usize; 5];
        for colour in self.cells.iter().filter_map(|cell| cell.colour()) {
            histogram[colour.index()] += 1;
        }
        histogram
    }

    pub fn count_colour(&self, colour: Colour) -> usize {
        self.colour_histogram()[colour.index()]
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (y, row) in self.rows().iter().enumerate() {
            if y > 0 {
                f.write_str("\n")?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(rows: [&str; HEIGHT]) -> Grid {
        Grid::from_rows(&rows).expect("valid rows")
    }

    #[test]
    fn gravity_drops_floating_cells_in_order() {
        let mut grid = Grid::empty();
        grid.set(1, 2, Cell::Block(Colour::Red));
        grid.set(1, 5, Cell::Skull);
        grid.set(1, 9, Cell::Block(Colour::Blue));

        grid.apply_gravity();

        assert_eq!(grid.get(1, 9), Cell::Block(Colour::Red));
        assert_eq!(grid.get(1, 10), Cell::Skull);
        assert_eq!(grid.get(1, 11), Cell::Block(Colour::Blue));
        assert_eq!(grid.filled_count(), 3);
    }

    #[test]
    fn landing_rows_track_stack_tops() {
        let grid = parse([
            "1.....", "1.....", "1.....", "1.....", "1.....", "1.....", "1.....", "1.....",
            "1.....", "1.....", "1....2", "1..0.2",
        ]);
        let rows = grid.landing_rows();
        assert_eq!(rows[0], None);
        assert_eq!(rows[1], Some(11));
        assert_eq!(rows[3], Some(10));
        assert_eq!(rows[5], Some(9));
    }

    #[test]
    fn rows_round_trip_through_text() {
        let text = [
            "......", "......", "......", "......", "......", "......", "......", "......",
            "......", "..3...", "0.3..1", "002451",
        ];
        let grid = parse(text);
        assert_eq!(grid.rows(), text.map(str::to_string).to_vec());
        assert_eq!(grid.to_string().lines().count(), HEIGHT);
    }

    #[test]
    fn parse_rejects_bad_input() {
        let short = ["......"; 11];
        assert_eq!(
            Grid::from_rows(&short),
            Err(ParseError::RowCount {
                expected: HEIGHT,
                found: 11
            })
        );

        let mut rows = ["......"; HEIGHT];
        rows[4] = "..x...";
        assert_eq!(
            Grid::from_rows(&rows),
            Err(ParseError::BadCell { row: 4, ch: 'x' })
        );

        rows[4] = ".....";
        assert_eq!(
            Grid::from_rows(&rows),
            Err(ParseError::RowWidth { row: 4, len: 5 })
        );
    }

    #[test]
    fn diff_count_counts_changed_cells() {
        let base = Grid::empty();
        let mut other = base;
        other.set(0, 11, Cell::Skull);
        other.set(5, 11, Cell::Skull);
        assert_eq!(base.diff_count(&other), 2);
        assert_eq!(other.diff_count(&other), 0);
    }

    #[test]
    fn histogram_ignores_skulls() {
        let mut grid = Grid::empty();
        grid.set(0, 11, Cell::Skull);
        grid.set(1, 11, Cell::Block(Colour::Green));
        grid.set(2, 11, Cell::Block(Colour::Green));
        assert_eq!(grid.colour_histogram(), [0, 2, 0, 0, 0]);
        assert_eq!(grid.count_colour(Colour::Green), 2);
    }
}
