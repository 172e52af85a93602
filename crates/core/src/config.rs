//! Configuration structures for the tickbar workspace.

use crate::error::{Error, Result};
use crate::timeframe::Timeframe;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bar aggregation configuration.
    pub aggregator: AggregatorConfig,
    /// Synthetic feed configuration.
    pub synthetic: SyntheticConfig,
    /// Reference engine configuration.
    pub engine: EngineConfig,
}

impl Config {
    /// Parse a (possibly partial) JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a (possibly partial) JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject values the synthetic feed or engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.synthetic.bars == 0 {
            return Err(Error::config("synthetic.bars must be > 0"));
        }
        if self.synthetic.wave_period == 0 {
            return Err(Error::config("synthetic.wave_period must be > 0"));
        }
        if self.synthetic.jump_every == 0 {
            return Err(Error::config("synthetic.jump_every must be > 0"));
        }
        if self.engine.swing_lookback == 0 {
            return Err(Error::config("engine.swing_lookback must be > 0"));
        }
        Ok(())
    }

    /// Resolved timeframe of the aggregator section.
    pub fn timeframe(&self) -> Timeframe {
        Timeframe::normalize(self.aggregator.timeframe.as_deref())
    }
}

/// Bar aggregation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Timeframe alias (e.g., "1min"). Unknown or missing means 30s.
    pub timeframe: Option<String>,
    /// Display name for log lines.
    pub name: Option<String>,
}

/// Deterministic synthetic price series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Number of bars to generate.
    pub bars: usize,
    /// First bar time (aligned down to the bucket grid).
    pub start: NaiveDateTime,
    /// Price the series oscillates around.
    pub base_price: f64,
    /// Amplitude of the cyclic wave.
    pub wave_amplitude: f64,
    /// Wave period in bars.
    pub wave_period: usize,
    /// A jump bar occurs every `jump_every` bars.
    pub jump_every: usize,
    /// Size of the jump.
    pub jump_size: f64,
    /// Padding added above/below the open-close body.
    pub half_range: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            bars: 60,
            start: NaiveDate::from_ymd_opt(2024, 1, 2)
                .and_then(|d| d.and_hms_opt(10, 0, 0))
                .unwrap_or_default(),
            base_price: 1.1000,
            wave_amplitude: 0.0005,
            wave_period: 12,
            jump_every: 10,
            jump_size: 0.0020,
            half_range: 0.0001,
        }
    }
}

/// Reference engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bars on each side of a pivot.
    pub swing_lookback: usize,
    /// Position size per entry.
    pub position_size: f64,
    /// Distance beyond the pivot extreme for the protective stop.
    pub stop_buffer: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            swing_lookback: 2,
            position_size: 1.0,
            stop_buffer: 0.0002,
        }
    }
}
