use crate::model::cell::Colour;
use crate::model::grid::{Grid, ParseError};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const QUEUE_LEN: usize = 8;

/// A falling pair: the anchor half and the half attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPair {
    pub anchor: Colour,
    pub attached: Colour,
}

impl BlockPair {
    pub const fn new(anchor: Colour, attached: Colour) -> Self {
        Self { anchor, attached }
    }
}

impl FromStr for BlockPair {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let bad = || ParseError::BadPair {
            line: line.to_string(),
        };
        let mut parts = line.split_whitespace();
        let mut next_colour = || {
            parts
                .next()
                .and_then(|raw| raw.parse::<u8>().ok())
                .and_then(Colour::from_digit)
        };
        let anchor = next_colour().ok_or_else(bad)?;
        let attached = next_colour().ok_or_else(bad)?;
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(Self { anchor, attached })
    }
}

impl fmt::Display for BlockPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.anchor.digit(), self.attached.digit())
    }
}

/// The eight pairs announced ahead of time. Lookups past the end wrap around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NextQueue {
    pairs: [BlockPair; QUEUE_LEN],
}

impl NextQueue {
    pub const fn new(pairs: [BlockPair; QUEUE_LEN]) -> Self {
        Self { pairs }
    }

    pub const fn uniform(pair: BlockPair) -> Self {
        Self {
            pairs: [pair; QUEUE_LEN],
        }
    }

    /// Uniformly random colours for both halves of every pair.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut pick = || Colour::ALL[rng.gen_range(0..Colour::ALL.len())];
        let mut pairs = [BlockPair::new(Colour::Blue, Colour::Blue); QUEUE_LEN];
        for pair in pairs.iter_mut() {
            *pair = BlockPair::new(pick(), pick());
        }
        Self { pairs }
    }

    pub fn pairs(&self) -> &[BlockPair; QUEUE_LEN] {
        &self.pairs
    }

    pub fn pair_at(&self, offset: usize) -> BlockPair {
        self.pairs[offset % QUEUE_LEN]
    }

    pub fn colour_histogram(&self) -> [usize; 5] {
        let mut histogram = [0usize; 5];
        for pair in &self.pairs {
            histogram[pair.anchor.index()] += 1;
            histogram[pair.attached.index()] += 1;
        }
        histogram
    }
}

/// Colour availability across the queue and the board, used for telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColourStats {
    pub queue: [usize; 5],
    pub board: [usize; 5],
    pub possible_clears: [usize; 5],
}

impl ColourStats {
    pub fn gather(queue: &NextQueue, board: &Grid) -> Self {
        let queue_hist = queue.colour_histogram();
        let board_hist = board.colour_histogram();
        let mut possible_clears = [0usize; 5];
        for (index, slot) in possible_clears.iter_mut().enumerate() {
            // rough: every four blocks of a colour could make one group
            *slot = (queue_hist[index] + board_hist[index]) / 4;
        }
        Self {
            queue: queue_hist,
            board: board_hist,
            possible_clears,
        }
    }

    pub fn most_promising(&self) -> Option<Colour> {
        Colour::ALL
            .iter()
            .copied()
            .filter(|colour| self.possible_clears[colour.index()] > 0)
            .max_by_key(|colour| {
                (
                    self.possible_clears[colour.index()],
                    std::cmp::Reverse(colour.digit()),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::cell::Cell;

    #[test]
    fn pair_parses_two_digits() {
        let pair: BlockPair = "3 5".parse().expect("valid pair");
        assert_eq!(pair, BlockPair::new(Colour::Pink, Colour::Yellow));
        assert_eq!(pair.to_string(), "3 5");
    }

    #[test]
    fn pair_rejects_bad_lines() {
        for line in ["", "1", "0 2", "1 2 3", "a b", "6 1"] {
            assert!(line.parse::<BlockPair>().is_err(), "line {line:?}");
        }
    }

    #[test]
    fn seeded_random_queue_is_reproducible() {
        use rand::SeedableRng;
        use rand::rngs::SmallRng;
        let a = NextQueue::random(&mut SmallRng::seed_from_u64(5));
        let b = NextQueue::random(&mut SmallRng::seed_from_u64(5));
        assert_eq!(a, b);
        assert_eq!(a.colour_histogram().iter().sum::<usize>(), 2 * QUEUE_LEN);
    }

    #[test]
    fn pair_lookup_wraps_past_the_horizon() {
        let mut pairs = [BlockPair::new(Colour::Blue, Colour::Blue); QUEUE_LEN];
        pairs[1] = BlockPair::new(Colour::Red, Colour::Green);
        let queue = NextQueue::new(pairs);
        assert_eq!(queue.pair_at(1), pairs[1]);
        assert_eq!(queue.pair_at(9), pairs[1]);
        assert_eq!(queue.pair_at(8), pairs[0]);
    }

    #[test]
    fn stats_combine_queue_and_board() {
        let queue = NextQueue::uniform(BlockPair::new(Colour::Green, Colour::Red));
        let mut board = Grid::empty();
        board.set(0, 11, Cell::Block(Colour::Red));
        board.set(1, 11, Cell::Block(Colour::Red));
        let stats = ColourStats::gather(&queue, &board);
        assert_eq!(stats.queue, [0, 8, 0, 8, 0]);
        assert_eq!(stats.board, [0, 0, 0, 2, 0]);
        assert_eq!(stats.possible_clears, [0, 2, 0, 2, 0]);
        assert_eq!(stats.most_promising(), Some(Colour::Green));
    }
}
