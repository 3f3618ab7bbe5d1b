//! Output types for the ops engine (JSON contract).
//!
//! Inbound modules reuse `risk_engine::types::ModuleInput`.

use std::collections::BTreeMap;

use serde::Serialize;

/// Spike verdict for one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpikeVerdict {
  pub spike: bool,
  /// Present only when `spike` is true and the series is non-empty.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub suggested_threshold: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpsRecommendation {
  pub module_name: String,
  pub spike_detected: bool,
  /// Telemetry kind -> suggested alert threshold.
  pub suggested_thresholds: BTreeMap<String, f64>,
  pub runbook_steps: Vec<String>,
}

pub use risk_engine::types::ErrorOutput;
