//! Scoring tables (weights, normalization caps, bands) with sane defaults.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Env var naming an optional JSON file with scoring overrides.
pub const CONFIG_ENV: &str = "RISK_ENGINE_CONFIG";

/// Known factor names.
pub mod factor {
  pub const ERROR_RATE: &str = "error_rate";
  pub const CHANGE_FREQUENCY: &str = "change_frequency";
  pub const CODE_CHURN: &str = "code_churn";
  pub const COMPLEXITY: &str = "complexity";
  pub const CUSTOMER_IMPACT: &str = "customer_impact";
  pub const SLA_BREACHES: &str = "sla_breaches";
  pub const TEST_FLAKINESS: &str = "test_flakiness";
  pub const INCIDENT_COUNT: &str = "incident_count";
  pub const INCIDENT_MAX_SEVERITY: &str = "incident_max_severity";
  pub const INCIDENT_RECENCY: &str = "incident_recency";

  /// Factors measured by telemetry (as opposed to derived from incidents).
  pub const TELEMETRY: [&str; 7] = [
    ERROR_RATE,
    CHANGE_FREQUENCY,
    CODE_CHURN,
    COMPLEXITY,
    CUSTOMER_IMPACT,
    SLA_BREACHES,
    TEST_FLAKINESS,
  ];
}

/// A categorical risk tier and its inclusive lower bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Band {
  pub name: String,
  pub min_score: f64,
}

impl Band {
  pub fn new(name: &str, min_score: f64) -> Self {
    Self {
      name: name.to_string(),
      min_score,
    }
  }
}

/// Immutable scoring tables. Build once, pass by reference into every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
  /// Factor weights in declaration order; contributions follow this order.
  pub weights: IndexMap<String, f64>,
  /// Value at which a factor saturates to 1.0. Unmapped factors use 1.0.
  pub caps: HashMap<String, f64>,
  /// Bands, highest bound first. The last band is the fallback.
  pub bands: Vec<Band>,
}

impl Default for ScoringConfig {
  fn default() -> Self {
    let weights = [
      (factor::ERROR_RATE, 5.0),
      (factor::CHANGE_FREQUENCY, 4.0),
      (factor::CODE_CHURN, 3.0),
      (factor::COMPLEXITY, 2.0),
      (factor::CUSTOMER_IMPACT, 4.0),
      (factor::SLA_BREACHES, 3.0),
      (factor::TEST_FLAKINESS, 2.0),
      (factor::INCIDENT_COUNT, 3.5),
      (factor::INCIDENT_MAX_SEVERITY, 2.5),
      (factor::INCIDENT_RECENCY, 3.0),
    ];
    let caps = [
      (factor::ERROR_RATE, 0.2),
      (factor::CHANGE_FREQUENCY, 14.0),
      (factor::CODE_CHURN, 2000.0),
      (factor::COMPLEXITY, 1.0),
      (factor::CUSTOMER_IMPACT, 1.0),
      (factor::SLA_BREACHES, 10.0),
      (factor::TEST_FLAKINESS, 0.5),
      (factor::INCIDENT_COUNT, 10.0),
      (factor::INCIDENT_MAX_SEVERITY, 5.0),
      (factor::INCIDENT_RECENCY, 1.0),
    ];

    Self {
      weights: weights
        .iter()
        .map(|(k, w)| (k.to_string(), *w))
        .collect(),
      caps: caps.iter().map(|(k, c)| (k.to_string(), *c)).collect(),
      bands: vec![
        Band::new("High", 70.0),
        Band::new("Medium", 40.0),
        Band::new("Low", 0.0),
      ],
    }
  }
}

impl ScoringConfig {
  /// Parse overrides from JSON. Omitted tables keep their defaults.
  pub fn from_json(raw: &str) -> Result<Self, EngineError> {
    let config: Self = serde_json::from_str(raw)?;
    config.validate()?;
    Ok(config)
  }

  /// Load from the file named by `RISK_ENGINE_CONFIG`, or defaults when unset.
  pub fn from_env() -> Result<Self, EngineError> {
    match std::env::var_os(CONFIG_ENV) {
      Some(path) => Self::from_file(Path::new(&path)),
      None => Ok(Self::default()),
    }
  }

  pub fn from_file(path: &Path) -> Result<Self, EngineError> {
    let raw = std::fs::read_to_string(path)?;
    tracing::debug!(path = %path.display(), "loading scoring config");
    Self::from_json(&raw)
  }

  /// Reject tables that would make scores meaningless (NaN, negative, unbounded).
  pub fn validate(&self) -> Result<(), EngineError> {
    if self.weights.is_empty() {
      return Err(EngineError::config("weights must not be empty"));
    }
    for (name, w) in &self.weights {
      if !w.is_finite() || *w <= 0.0 {
        return Err(EngineError::config(format!(
          "weight for {} must be a positive finite number, got {}",
          name, w
        )));
      }
    }
    for (name, c) in &self.caps {
      if !c.is_finite() || *c < 0.0 {
        return Err(EngineError::config(format!(
          "cap for {} must be a non-negative finite number, got {}",
          name, c
        )));
      }
    }
    if self.bands.is_empty() {
      return Err(EngineError::config("bands must not be empty"));
    }
    if self
      .bands
      .windows(2)
      .any(|pair| pair[0].min_score < pair[1].min_score)
    {
      return Err(EngineError::config(
        "bands must be ordered from highest to lowest bound",
      ));
    }
    Ok(())
  }

  /// Normalization denominator.
  pub fn total_weight(&self) -> f64 {
    self.weights.values().sum()
  }

  pub fn cap_for(&self, factor: &str) -> f64 {
    self.caps.get(factor).copied().unwrap_or(1.0)
  }
}
