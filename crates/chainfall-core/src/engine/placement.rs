use crate::model::action::{Placement, Rotation};
use crate::model::cell::Cell;
use crate::model::grid::{Grid, LandingRows};
use crate::model::queue::BlockPair;
use std::fmt;

/// Placement failures. Choices from the action table are always on the
/// board, so the search only ever sees `ColumnFull`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    ColumnFull { column: usize },
    OffBoard { column: usize, rotation: Rotation },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::ColumnFull { column } => {
                write!(f, "no room left in column {column}")
            }
            PlacementError::OffBoard { column, rotation } => {
                write!(f, "rotation {rotation} at column {column} leaves the board")
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// Final `(x, y)` of each half after the drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Landing {
    pub anchor: (usize, usize),
    pub attached: (usize, usize),
}

/// Drops `pair` into `grid` using precomputed landing rows. The grid is left
/// untouched when the capacity check fails.
pub fn place_pair(
    grid: &mut Grid,
    placement: Placement,
    pair: BlockPair,
    landing: &LandingRows,
) -> Result<Landing, PlacementError> {
    placement.check_capacity(landing)?;

    let (left, right) = placement.columns().ok_or(PlacementError::OffBoard {
        column: placement.column,
        rotation: placement.rotation,
    })?;
    let row_of = |column: usize| landing[column].ok_or(PlacementError::ColumnFull { column });

    let result = match placement.rotation {
        Rotation::Right => Landing {
            anchor: (left, row_of(left)?),
            attached: (right, row_of(right)?),
        },
        Rotation::Left => Landing {
            anchor: (right, row_of(right)?),
            attached: (left, row_of(left)?),
        },
        Rotation::Up => {
            let row = row_of(left)?;
            Landing {
                anchor: (left, row),
                attached: (left, row - 1),
            }
        }
        Rotation::Down => {
            let row = row_of(left)?;
            Landing {
                anchor: (left, row - 1),
                attached: (left, row),
            }
        }
    };

    grid.set(result.anchor.0, result.anchor.1, Cell::Block(pair.anchor));
    grid.set(result.attached.0, result.attached.1, Cell::Block(pair.attached));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::cell::Colour;
    use crate::model::grid::HEIGHT;

    const PAIR: BlockPair = BlockPair::new(Colour::Blue, Colour::Red);

    fn drop_pair(
        grid: &mut Grid,
        column: usize,
        rotation: Rotation,
    ) -> Result<Landing, PlacementError> {
        let landing = grid.landing_rows();
        place_pair(grid, Placement::new(column, rotation), PAIR, &landing)
    }

    #[test]
    fn vertical_up_stacks_attached_above_anchor() {
        let mut grid = Grid::empty();
        let landing = drop_pair(&mut grid, 0, Rotation::Up).expect("room");
        assert_eq!(landing.anchor, (0, 11));
        assert_eq!(landing.attached, (0, 10));
        assert_eq!(grid.get(0, 11), Cell::Block(Colour::Blue));
        assert_eq!(grid.get(0, 10), Cell::Block(Colour::Red));
    }

    #[test]
    fn vertical_down_puts_anchor_on_top() {
        let mut grid = Grid::empty();
        drop_pair(&mut grid, 4, Rotation::Down).expect("room");
        assert_eq!(grid.get(4, 10), Cell::Block(Colour::Blue));
        assert_eq!(grid.get(4, 11), Cell::Block(Colour::Red));
    }

    #[test]
    fn horizontal_halves_land_independently() {
        let mut grid = Grid::empty();
        grid.set(3, 11, Cell::Skull);
        let landing = drop_pair(&mut grid, 3, Rotation::Left).expect("room");
        assert_eq!(landing.anchor, (3, 10));
        assert_eq!(landing.attached, (2, 11));
    }

    #[test]
    fn full_column_is_a_capacity_error() {
        let mut grid = Grid::empty();
        for y in 0..HEIGHT {
            grid.set(5, y, Cell::Skull);
        }
        let before = grid;
        assert_eq!(
            drop_pair(&mut grid, 4, Rotation::Right),
            Err(PlacementError::ColumnFull { column: 5 })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn vertical_needs_two_rows() {
        let mut grid = Grid::empty();
        for y in 1..HEIGHT {
            grid.set(2, y, Cell::Skull);
        }
        assert_eq!(
            drop_pair(&mut grid, 2, Rotation::Up),
            Err(PlacementError::ColumnFull { column: 2 })
        );
        assert!(drop_pair(&mut grid, 2, Rotation::Right).is_ok());
    }

    #[test]
    fn off_board_placement_leaves_grid_alone() {
        let mut grid = Grid::empty();
        assert_eq!(
            drop_pair(&mut grid, 0, Rotation::Left),
            Err(PlacementError::OffBoard {
                column: 0,
                rotation: Rotation::Left
            })
        );
        assert_eq!(grid, Grid::empty());
    }
}
