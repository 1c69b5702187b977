//! Journey configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{JourneyError, Result};
use crate::progress::DEFAULT_PROGRESS_KEY;
use crate::rank::DEFAULT_RANKS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub assessment: AssessmentConfig,
    #[serde(default)]
    pub rank: RankConfig,
}

/// Where the module catalog comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the content API; `GET {url}/modules` is requested.
    /// Without one the built-in catalog is used.
    #[serde(default)]
    pub url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout(),
        }
    }
}

/// Which key-value backend holds the completion set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Nothing survives the process
    Memory,
    /// A single JSON file in the data directory
    #[default]
    Json,
    /// SQLite database in the data directory
    Sqlite,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Json => write!(f, "json"),
            BackendKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = JourneyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "json" => Ok(BackendKind::Json),
            "sqlite" => Ok(BackendKind::Sqlite),
            other => Err(JourneyError::Config(format!("unknown backend '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// Directory for progress files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Storage key holding the completion set. Global to the data
    /// directory, not scoped per user.
    #[serde(default = "default_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            data_dir: default_data_dir(),
            key: default_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentConfig {
    /// Minimum share of correct quiz answers, in percent
    #[serde(default = "default_threshold")]
    pub pass_threshold_percent: u8,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            pass_threshold_percent: default_threshold(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankConfig {
    /// Rank names indexed by number of completed modules
    #[serde(default = "default_rank_names")]
    pub names: Vec<String>,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            names: default_rank_names(),
        }
    }
}

// Defaults
fn default_timeout() -> u64 { 30 }
fn default_data_dir() -> PathBuf { PathBuf::from(".study-journey") }
fn default_key() -> String { DEFAULT_PROGRESS_KEY.to_string() }
fn default_threshold() -> u8 { 70 }
fn default_rank_names() -> Vec<String> {
    DEFAULT_RANKS.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Load from a TOML file, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| JourneyError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.assessment.pass_threshold_percent > 100 {
            return Err(JourneyError::Config(format!(
                "pass_threshold_percent must be at most 100, got {}",
                self.assessment.pass_threshold_percent
            )));
        }
        if self.rank.names.is_empty() {
            return Err(JourneyError::Config("rank.names must not be empty".into()));
        }
        if self.storage.key.is_empty() {
            return Err(JourneyError::Config("storage.key must not be empty".into()));
        }
        Ok(())
    }
}
