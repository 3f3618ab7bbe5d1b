//! Per-module ops recommendations: series assembly, spike verdict, thresholds, runbook.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use risk_engine::normalize;
use risk_engine::types::{ModuleInput, TelemetryPoint};

use crate::config::Config;
use crate::error::OpsError;
use crate::runbook;
use crate::stats;
use crate::threshold;
use crate::types::{OpsRecommendation, SpikeVerdict};

/// Values of one telemetry kind in chronological order.
///
/// The sort is stable, so samples sharing a timestamp keep arrival order.
pub fn series_for(points: &[TelemetryPoint], kind: &str) -> Vec<f64> {
  let mut matching: Vec<&TelemetryPoint> = points.iter().filter(|p| p.kind == kind).collect();
  matching.sort_by_key(|p| p.at);
  matching.into_iter().map(|p| p.value).collect()
}

/// Spike check plus the threshold to suggest if it fired.
pub fn verdict(series: &[f64], config: &Config) -> SpikeVerdict {
  let spike = stats::detect_spike(series, config);
  let suggested_threshold = if spike {
    threshold::threshold_for(series, config)
  } else {
    None
  };
  SpikeVerdict {
    spike,
    suggested_threshold,
  }
}

/// Build the recommendation for a series that has already been assembled.
pub fn recommend_series(module_name: &str, series: &[f64], config: &Config) -> OpsRecommendation {
  let v = verdict(series, config);

  let mut suggested_thresholds = BTreeMap::new();
  if let Some(t) = v.suggested_threshold {
    suggested_thresholds.insert(config.watched_kind.clone(), t);
  }

  if v.spike {
    tracing::info!(
      module = %module_name,
      kind = %config.watched_kind,
      samples = series.len(),
      "spike detected"
    );
  }

  OpsRecommendation {
    module_name: module_name.to_string(),
    spike_detected: v.spike,
    suggested_thresholds,
    runbook_steps: runbook::steps_for(module_name, v.spike),
  }
}

/// Validate one module's telemetry and recommend.
pub fn recommend(
  input: &ModuleInput,
  config: &Config,
  now: DateTime<Utc>,
) -> Result<OpsRecommendation, OpsError> {
  let module = normalize::normalize_module(input, now)?;
  let series = series_for(&module.telemetry, &config.watched_kind);
  Ok(recommend_series(&module.name, &series, config))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};
  use risk_engine::types::InboundTelemetry;

  fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()
  }

  fn point(kind: &str, value: f64, minute: i64) -> TelemetryPoint {
    TelemetryPoint {
      kind: kind.into(),
      value,
      at: t0() + Duration::minutes(minute),
    }
  }

  fn module(name: &str, values: &[f64]) -> ModuleInput {
    ModuleInput {
      module_name: name.into(),
      owner: None,
      domain: None,
      events: values
        .iter()
        .map(|&v| InboundTelemetry {
          kind: "error_rate".into(),
          value: v,
          at: None,
        })
        .collect(),
      incidents: vec![],
    }
  }

  #[test]
  fn series_sorted_by_time_and_filtered_by_kind() {
    let points = vec![
      point("error_rate", 0.3, 3),
      point("code_churn", 900.0, 0),
      point("error_rate", 0.1, 1),
      point("error_rate", 0.2, 2),
    ];
    assert_eq!(series_for(&points, "error_rate"), vec![0.1, 0.2, 0.3]);
    assert!(series_for(&points, "latency").is_empty());
  }

  #[test]
  fn equal_timestamps_keep_arrival_order() {
    let points = vec![
      point("error_rate", 0.5, 0),
      point("error_rate", 0.4, 0),
      point("error_rate", 0.3, 0),
    ];
    assert_eq!(series_for(&points, "error_rate"), vec![0.5, 0.4, 0.3]);
  }

  #[test]
  fn spike_recommendation_has_threshold_and_runbook() {
    let now = t0();
    let rec = recommend(&module("auth", &[0.01, 0.01, 0.012, 0.013, 0.014, 0.03]), &Config::default(), now)
      .unwrap();
    assert!(rec.spike_detected);
    assert_eq!(rec.suggested_thresholds.get("error_rate"), Some(&0.024));
    assert_eq!(rec.runbook_steps[0], "Lower login rate limits temporarily");
  }

  #[test]
  fn quiet_module_gets_no_spike_note() {
    let rec = recommend(&module("search", &[0.01; 10]), &Config::default(), t0()).unwrap();
    assert!(!rec.spike_detected);
    assert!(rec.suggested_thresholds.is_empty());
    assert_eq!(rec.runbook_steps, vec!["No spike detected.".to_string()]);
  }

  #[test]
  fn module_without_watched_kind_is_quiet() {
    let mut input = module("search", &[]);
    input.events.push(InboundTelemetry {
      kind: "code_churn".into(),
      value: 5000.0,
      at: None,
    });
    let rec = recommend(&input, &Config::default(), t0()).unwrap();
    assert!(!rec.spike_detected);
  }

  #[test]
  fn watched_kind_is_configurable() {
    let config = Config {
      watched_kind: "latency_p99".into(),
      ..Config::default()
    };
    let series = [120.0, 120.0, 120.0, 120.0, 120.0, 900.0];
    let rec = recommend_series("gateway", &series, &config);
    assert!(rec.spike_detected);
    assert_eq!(rec.suggested_thresholds.get("latency_p99"), Some(&720.0));
  }

  #[test]
  fn invalid_telemetry_is_rejected() {
    let mut input = module("auth", &[0.1]);
    input.events[0].at = Some("garbage".into());
    let err = recommend(&input, &Config::default(), t0()).unwrap_err();
    assert!(err.to_string().contains("events[].at"));
  }
}
