//! Core types for the risk engine (JSON contracts + internal models).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Factor name -> raw measurement. Missing keys read as 0.0.
pub type FeatureMap = BTreeMap<String, f64>;

/// Factor name -> percentage points of the total score, in weight-table order.
pub type Contributions = IndexMap<String, f64>;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// One telemetry sample as sent by the caller. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundTelemetry {
  pub kind: String,
  pub value: f64,
  /// RFC3339; defaults to "now" when absent.
  #[serde(default)]
  pub at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InboundIncident {
  pub title: String,
  #[serde(default)]
  pub severity: Option<i64>,
  #[serde(default)]
  pub started_at: Option<String>,
  #[serde(default)]
  pub resolved_at: Option<String>,
  #[serde(default)]
  pub root_cause: Option<String>,
}

/// Everything known about one module.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleInput {
  pub module_name: String,
  #[serde(default)]
  pub owner: Option<String>,
  #[serde(default)]
  pub domain: Option<String>,
  #[serde(default)]
  pub events: Vec<InboundTelemetry>,
  #[serde(default)]
  pub incidents: Vec<InboundIncident>,
}

/// Batch request: score many modules and rank them.
#[derive(Debug, Clone, Deserialize)]
pub struct PriorityRequest {
  pub modules: Vec<ModuleInput>,
  #[serde(default)]
  pub limit: Option<usize>,
  /// Reference time for incident recency; defaults to the current time.
  #[serde(default)]
  pub now: Option<String>,
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryPoint {
  pub kind: String,
  pub value: f64,
  pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRecord {
  pub title: String,
  pub severity: i64,
  pub started_at: DateTime<Utc>,
  pub resolved_at: Option<DateTime<Utc>>,
  pub root_cause: Option<String>,
}

/// Validated module snapshot.
#[derive(Debug, Clone)]
pub struct Module {
  pub name: String,
  pub owner: Option<String>,
  pub domain: Option<String>,
  pub telemetry: Vec<TelemetryPoint>,
  pub incidents: Vec<IncidentRecord>,
}

/// Result of [`crate::score::compute_score`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
  pub score: f64,
  pub contributions: Contributions,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
  pub module_name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub owner: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub domain: Option<String>,
  pub snapshot_id: String,
  pub features: FeatureMap,
  pub score: f64,
  pub band: String,
  pub contributions: Contributions,
  pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PriorityOutput {
  pub items: Vec<RiskReport>,
}

/// Structured error output for invalid input.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}

impl From<&crate::error::EngineError> for ErrorOutput {
  fn from(e: &crate::error::EngineError) -> Self {
    match e {
      crate::error::EngineError::Validation { field, reason } => {
        ErrorOutput::new(reason.clone()).with_field(field.clone())
      }
      _ => ErrorOutput::new(e.to_string()),
    }
  }
}
