//! Configuration
//!
//! Tuning parameters for the simulation, loadable from a TOML file so
//! runs can be adjusted without recompiling. The strategy registry is
//! part of the configuration and is passed into the simulation at
//! construction, never looked up from process-wide state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::strategy::StrategyKind;

/// Default tuning file path
pub const DEFAULT_CONFIG_PATH: &str = "evo.toml";

/// Simulation tuning parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Balance granted to freshly spawned agents
    pub initial_balance: i64,
    /// Amount both participants risk per commitment
    pub stake: i64,
    /// Fraction of the living population culled per selection cycle
    pub kill_fraction: f64,
    /// Fraction of the living population cloned per selection cycle
    pub reproduce_fraction: f64,
    /// Learning rate for adaptive agents
    pub learning_rate: f64,
    /// Named strategies available at agent-creation time
    pub strategies: StrategySet,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1000,
            stake: 100,
            kill_fraction: 0.10,
            reproduce_fraction: 0.20,
            learning_rate: 0.05,
            strategies: StrategySet::standard(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from the default path, falling back to
    /// defaults if the file is missing or malformed.
    pub fn load_or_default() -> Self {
        Self::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
            tracing::warn!("could not load {}: {}; using defaults", DEFAULT_CONFIG_PATH, e);
            Self::default()
        })
    }
}

/// Explicit mapping of strategy names to policies.
///
/// Owned by the simulation's configuration so that strategy sets are
/// test-injectable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrategySet {
    entries: BTreeMap<String, StrategyKind>,
}

impl Default for StrategySet {
    fn default() -> Self {
        Self::standard()
    }
}

impl StrategySet {
    /// The full built-in policy set under its canonical names.
    pub fn standard() -> Self {
        let entries = StrategyKind::all()
            .iter()
            .map(|kind| (kind.name().to_string(), *kind))
            .collect();
        Self { entries }
    }

    /// An empty set; useful for tests that inject their own names.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, kind: StrategyKind) {
        self.entries.insert(name.into(), kind);
    }

    pub fn get(&self, name: &str) -> Option<StrategyKind> {
        self.entries.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
