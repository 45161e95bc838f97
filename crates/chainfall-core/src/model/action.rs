//! Discrete placement choices for a falling pair.
//!
//! Interior columns accept all four rotations; the two edge columns only
//! accept the three that keep the attached half on the board, for 22
//! choices in total.

use crate::engine::placement::PlacementError;
use crate::model::grid::{LandingRows, WIDTH};
use std::fmt;

pub const CHOICE_COUNT: usize = 22;

/// Where the attached half sits relative to the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Rotation {
    Right = 0,
    Up = 1,
    Left = 2,
    Down = 3,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::Right, Rotation::Up, Rotation::Left, Rotation::Down];

    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Rotation::Right),
            1 => Some(Rotation::Up),
            2 => Some(Rotation::Left),
            3 => Some(Rotation::Down),
            _ => None,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Rotation::Up | Rotation::Down)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub column: usize,
    pub rotation: Rotation,
}

impl Placement {
    pub const fn new(column: usize, rotation: Rotation) -> Self {
        Self { column, rotation }
    }

    /// Columns touched by the pair as `(left, right)`; equal when vertical.
    /// `None` when either half would hang off the board.
    pub const fn columns(self) -> Option<(usize, usize)> {
        if !self.is_on_board() {
            return None;
        }
        Some(match self.rotation {
            Rotation::Up | Rotation::Down => (self.column, self.column),
            Rotation::Right => (self.column, self.column + 1),
            Rotation::Left => (self.column - 1, self.column),
        })
    }

    pub const fn is_on_board(self) -> bool {
        if self.column >= WIDTH {
            return false;
        }
        match self.rotation {
            Rotation::Right => self.column + 1 < WIDTH,
            Rotation::Left => self.column > 0,
            Rotation::Up | Rotation::Down => true,
        }
    }

    /// Rejects the placement when a target column cannot hold its half.
    /// Vertical placements need two free rows in the same column.
    pub fn check_capacity(self, landing: &LandingRows) -> Result<(), PlacementError> {
        let (left, right) = self.columns().ok_or(PlacementError::OffBoard {
            column: self.column,
            rotation: self.rotation,
        })?;
        if self.rotation.is_vertical() {
            return match landing[left] {
                Some(row) if row >= 1 => Ok(()),
                _ => Err(PlacementError::ColumnFull { column: left }),
            };
        }
        for column in [left, right] {
            if landing[column].is_none() {
                return Err(PlacementError::ColumnFull { column });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.rotation)
    }
}

const CHOICE_TABLE: [(usize, Rotation); CHOICE_COUNT] = [
    (2, Rotation::Right),
    (2, Rotation::Up),
    (2, Rotation::Left),
    (2, Rotation::Down),
    (4, Rotation::Right),
    (4, Rotation::Up),
    (4, Rotation::Left),
    (4, Rotation::Down),
    (3, Rotation::Right),
    (3, Rotation::Up),
    (3, Rotation::Left),
    (3, Rotation::Down),
    (1, Rotation::Right),
    (1, Rotation::Up),
    (1, Rotation::Left),
    (1, Rotation::Down),
    (0, Rotation::Right),
    (0, Rotation::Up),
    (0, Rotation::Down),
    (5, Rotation::Up),
    (5, Rotation::Left),
    (5, Rotation::Down),
];

/// Identifier in `0..22` naming one legal placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionChoice(u8);

impl ActionChoice {
    pub const fn new(id: u8) -> Option<Self> {
        if (id as usize) < CHOICE_COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    pub const fn id(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn placement(self) -> Placement {
        let (column, rotation) = CHOICE_TABLE[self.0 as usize];
        Placement::new(column, rotation)
    }

    pub fn from_placement(placement: Placement) -> Option<Self> {
        Self::all().find(|choice| choice.placement() == placement)
    }

    pub fn all() -> impl Iterator<Item = ActionChoice> {
        (0..CHOICE_COUNT as u8).map(ActionChoice)
    }
}

impl fmt::Display for ActionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
