use std::str::FromStr;

pub const DEFAULT_SAMPLES: usize = 2000;
pub const DEFAULT_MAX_DEPTH: u32 = 8;
pub const DEFAULT_DISTURBANCE_THRESHOLD: usize = 5;
pub const DEFAULT_SEED: u64 = 643;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExploreMode {
    /// Random rollouts from the root, `samples` of them per turn.
    #[default]
    Random,
    /// Every choice at every level down to `max_depth`.
    Exhaustive,
}

impl ExploreMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ExploreMode::Random => "random",
            ExploreMode::Exhaustive => "exhaustive",
        }
    }
}

impl FromStr for ExploreMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "random" | "rollout" => Ok(ExploreMode::Random),
            "exhaustive" | "sweep" => Ok(ExploreMode::Exhaustive),
            other => Err(format!("unknown explore mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub samples: usize,
    pub max_depth: u32,
    /// Differing cells tolerated between predicted and observed boards.
    pub disturbance_threshold: usize,
    pub explore: ExploreMode,
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            max_depth: DEFAULT_MAX_DEPTH,
            disturbance_threshold: DEFAULT_DISTURBANCE_THRESHOLD,
            explore: ExploreMode::Random,
            seed: DEFAULT_SEED,
        }
    }
}

impl SearchConfig {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let samples = read("CHAINFALL_SAMPLES")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.samples);

        let max_depth = read("CHAINFALL_DEPTH")
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.max_depth);

        let disturbance_threshold = read("CHAINFALL_DISTURBANCE")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(defaults.disturbance_threshold);

        let explore = read("CHAINFALL_EXPLORE")
            .and_then(|raw| raw.parse::<ExploreMode>().ok())
            .unwrap_or(defaults.explore);

        let seed = read("CHAINFALL_SEED")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(defaults.seed);

        Self {
            samples,
            max_depth,
            disturbance_threshold,
            explore,
            seed,
        }
    }
}
