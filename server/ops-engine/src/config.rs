//! Engine configuration with sane defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OpsError;
use crate::stats::{DEFAULT_ALPHA, DEFAULT_K};

/// Env var naming an optional JSON file with overrides.
pub const CONFIG_ENV: &str = "OPS_ENGINE_CONFIG";

/// Tunable thresholds for spike detection and threshold suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Telemetry kind whose series is checked for spikes.
  pub watched_kind: String,
  /// Residual standard deviations above the mean residual that count as a spike.
  pub spike_k: f64,
  /// EWMA smoothing factor (0..1). Higher = more reactive.
  pub ewma_alpha: f64,
  /// Minimum series length before a verdict is attempted.
  pub min_samples: usize,
  /// Minimum residuals in the baseline window.
  pub min_residuals: usize,
  /// Stand-in for a zero residual standard deviation.
  pub sigma_floor: f64,
  /// Suggested threshold = last sample * ratio.
  pub threshold_ratio: f64,
  /// Lowest threshold ever suggested.
  pub threshold_floor: f64,
  /// Decimal places kept in suggested thresholds.
  pub threshold_decimals: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      watched_kind: "error_rate".into(),
      spike_k: DEFAULT_K,
      ewma_alpha: DEFAULT_ALPHA,
      min_samples: 5,
      min_residuals: 3,
      sigma_floor: 1e-6,
      threshold_ratio: 0.8,
      threshold_floor: 0.01,
      threshold_decimals: 3,
    }
  }
}

impl Config {
  pub fn from_json(raw: &str) -> Result<Self, OpsError> {
    let config: Self = serde_json::from_str(raw)?;
    config.validate()?;
    Ok(config)
  }

  /// Load from the file named by `OPS_ENGINE_CONFIG`, or defaults when unset.
  pub fn from_env() -> Result<Self, OpsError> {
    match std::env::var_os(CONFIG_ENV) {
      Some(path) => {
        let path = Path::new(&path);
        tracing::debug!(path = %path.display(), "loading ops config");
        Self::from_json(&std::fs::read_to_string(path)?)
      }
      None => Ok(Self::default()),
    }
  }

  pub fn validate(&self) -> Result<(), OpsError> {
    if self.watched_kind.trim().is_empty() {
      return Err(OpsError::config("watched_kind must not be empty"));
    }
    if !(self.ewma_alpha > 0.0 && self.ewma_alpha <= 1.0) {
      return Err(OpsError::config("ewma_alpha must be in (0, 1]"));
    }
    if !self.spike_k.is_finite() || self.spike_k < 0.0 {
      return Err(OpsError::config("spike_k must be a non-negative finite number"));
    }
    if !(self.sigma_floor > 0.0) {
      return Err(OpsError::config("sigma_floor must be positive"));
    }
    if !self.threshold_ratio.is_finite() || !self.threshold_floor.is_finite() {
      return Err(OpsError::config("threshold_ratio and threshold_floor must be finite"));
    }
    Ok(())
  }
}
