use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Colour {
    Blue = 1,
    Green = 2,
    Pink = 3,
    Red = 4,
    Yellow = 5,
}

impl Colour {
    pub const ALL: [Colour; 5] = [
        Colour::Blue,
        Colour::Green,
        Colour::Pink,
        Colour::Red,
        Colour::Yellow,
    ];

    pub const fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Colour::Blue),
            2 => Some(Colour::Green),
            3 => Some(Colour::Pink),
            4 => Some(Colour::Red),
            5 => Some(Colour::Yellow),
            _ => None,
        }
    }

    pub const fn digit(self) -> u8 {
        self as u8
    }

    /// Zero-based position in [`Colour::ALL`], handy for histograms.
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    pub const fn name(self) -> &'static str {
        match self {
            Colour::Blue => "Blue",
            Colour::Green => "Green",
            Colour::Pink => "Pink",
            Colour::Red => "Red",
            Colour::Yellow => "Yellow",
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One square of the board. Only [`Cell::Block`] cells take part in colour runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Skull,
    Block(Colour),
}

impl Cell {
    pub const fn from_char(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Cell::Empty),
            '0' => Some(Cell::Skull),
            '1' => Some(Cell::Block(Colour::Blue)),
            '2' => Some(Cell::Block(Colour::Green)),
            '3' => Some(Cell::Block(Colour::Pink)),
            '4' => Some(Cell::Block(Colour::Red)),
            '5' => Some(Cell::Block(Colour::Yellow)),
            _ => None,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Skull => '0',
            Cell::Block(Colour::Blue) => '1',
            Cell::Block(Colour::Green) => '2',
            Cell::Block(Colour::Pink) => '3',
            Cell::Block(Colour::Red) => '4',
            Cell::Block(Colour::Yellow) => '5',
        }
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub const fn is_filled(self) -> bool {
        !self.is_empty()
    }

    pub const fn is_skull(self) -> bool {
        matches!(self, Cell::Skull)
    }

    pub const fn colour(self) -> Option<Colour> {
        match self {
            Cell::Block(colour) => Some(colour),
            _ => None,
        }
    }
}

impl From<Colour> for Cell {
    fn from(colour: Colour) -> Self {
        Cell::Block(colour)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
