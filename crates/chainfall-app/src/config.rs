use chainfall_bot::{ExploreMode, SearchConfig};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const MAX_SEARCH_DEPTH: u32 = 16;

/// Root application configuration loaded from YAML. Every block is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub search: SearchSection,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub outputs: OutputsConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: AppConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        self.search.validate()?;
        self.logging.normalize();
        self.logging.validate()?;
        self.outputs.validate()?;
        Ok(())
    }

    /// Search settings layered over `base` (usually the environment).
    pub fn search_config(&self, base: SearchConfig) -> SearchConfig {
        self.search.apply(base)
    }
}

/// Search overrides. Unset fields keep the value from the environment or the
/// built-in default.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SearchSection {
    pub samples: Option<usize>,
    pub max_depth: Option<u32>,
    pub disturbance_threshold: Option<usize>,
    pub explore: Option<String>,
    pub seed: Option<u64>,
}

impl SearchSection {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.samples == Some(0) {
            return Err(ValidationError::InvalidField {
                field: "search.samples".to_string(),
                message: "samples per turn must be greater than zero".to_string(),
            });
        }

        if let Some(depth) = self.max_depth {
            if !(1..=MAX_SEARCH_DEPTH).contains(&depth) {
                return Err(ValidationError::InvalidField {
                    field: "search.max_depth".to_string(),
                    message: format!("depth must be between 1 and {MAX_SEARCH_DEPTH}"),
                });
            }
        }

        if let Some(explore) = self.explore.as_deref() {
            explore
                .parse::<ExploreMode>()
                .map_err(|message| ValidationError::InvalidField {
                    field: "search.explore".to_string(),
                    message,
                })?;
        }

        Ok(())
    }

    fn apply(&self, base: SearchConfig) -> SearchConfig {
        SearchConfig {
            samples: self.samples.unwrap_or(base.samples),
            max_depth: self.max_depth.unwrap_or(base.max_depth),
            disturbance_threshold: self
                .disturbance_threshold
                .unwrap_or(base.disturbance_threshold),
            explore: self
                .explore
                .as_deref()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(base.explore),
            seed: self.seed.unwrap_or(base.seed),
        }
    }
}

/// Logs go to stderr unless `file` is set, in which case they are written
/// there as JSON lines.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            tracing_level: default_tracing_level(),
            file: None,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.tracing_level),
            });
        }
        if self
            .file
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(ValidationError::InvalidField {
                field: "logging.file".to_string(),
                message: "path must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

/// Output artifact configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OutputsConfig {
    /// JSONL file receiving one row per turn.
    #[serde(default)]
    pub decisions: Option<PathBuf>,
    /// Attach the full turn input to every decision row.
    #[serde(default)]
    pub include_boards: bool,
}

impl OutputsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if let Some(path) = self.decisions.as_ref() {
            if path.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: "outputs.decisions".to_string(),
                    message: "path must not be empty".to_string(),
                });
            }
        }
        if self.include_boards && self.decisions.is_none() {
            return Err(ValidationError::InvalidField {
                field: "outputs.include_boards".to_string(),
                message: "requires outputs.decisions to be set".to_string(),
            });
        }
        Ok(())
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
