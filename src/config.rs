//! Configuration for filter graphs.
//!
//! A configuration names the engine's running sample rate and block size,
//! the coefficient tables the host owns, and the filters to instantiate.
//! Every field has a default, so an empty file is valid.
//!
//! ```toml
//! [engine]
//! sample_rate = 48000.0
//! block_size = 64
//!
//! [[tables]]
//! name = "smooth"
//! values = [0.25, 0.5, 0.25]
//!
//! [[filters]]
//! kind = "peak"
//! q = 2.0
//! db = 6.0
//! freq = 2500.0
//!
//! [[filters]]
//! kind = "fir"
//! table = "smooth"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::constants::{DEFAULT_BLOCK_SIZE, DEFAULT_SAMPLE_RATE};
use crate::error::{FilterError, Result};
use crate::table::TableRegistry;

/// Filter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Second-order allpass (args: Q, freq)
    Allpass,
    /// Second-order lowpass (args: Q, freq)
    Lowpass,
    /// Second-order high shelf (args: dB, freq)
    Highshelf,
    /// Second-order peaking filter (args: Q, dB, freq)
    Peak,
    /// nth-order FIR over a named table (arg: table name)
    Fir,
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Allpass => "allpass",
            FilterKind::Lowpass => "lowpass",
            FilterKind::Highshelf => "highshelf",
            FilterKind::Peak => "peak",
            FilterKind::Fir => "fir",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HofConfig {
    /// Audio engine settings
    pub engine: EngineConfig,
    /// Host-owned coefficient tables
    pub tables: Vec<TableConfig>,
    /// Filters to instantiate, in order
    pub filters: Vec<FilterSpec>,
}

/// Audio engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Running sample rate in Hz, announced to filters before processing
    pub sample_rate: f32,
    /// Samples per processing block
    pub block_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

/// A named float table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub values: Vec<f32>,
}

/// One filter instance
///
/// Parameters a kind does not use are ignored; missing ones take their
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    pub kind: FilterKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freq: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
}

impl FilterSpec {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            q: None,
            db: None,
            freq: None,
            table: None,
        }
    }
}

impl HofConfig {
    /// Parse a TOML configuration
    ///
    /// # Errors
    /// Returns `FilterError::Config` on malformed TOML, unknown filter kinds
    /// or a zero block size.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| FilterError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| FilterError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        if self.engine.block_size == 0 {
            return Err(FilterError::Config("block_size must be positive".to_string()));
        }
        Ok(())
    }

    /// Build a registry owning every configured table.
    pub fn table_registry(&self) -> TableRegistry {
        let mut registry = TableRegistry::new();
        for table in &self.tables {
            registry.insert_floats(table.name.clone(), table.values.clone());
        }
        registry
    }
}
