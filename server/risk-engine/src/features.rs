//! Aggregate raw telemetry and incident records into a feature map.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::config::factor;
use crate::types::{FeatureMap, IncidentRecord, TelemetryPoint};

/// Days over which incident recency decays to one half.
pub const RECENCY_HALF_SCALE_DAYS: f64 = 7.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Per-kind means of telemetry values.
pub fn telemetry_means(telemetry: &[TelemetryPoint]) -> FeatureMap {
  let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
  for point in telemetry {
    let entry = sums.entry(point.kind.as_str()).or_insert((0.0, 0));
    entry.0 += point.value;
    entry.1 += 1;
  }
  sums
    .into_iter()
    .map(|(kind, (sum, n))| (kind.to_string(), sum / n as f64))
    .collect()
}

/// `1 / (1 + days/7)` clamped to [0, 1]; 0 when there is no incident.
///
/// A start time after `now` always reads as 1.0, however far ahead it is.
/// The raw formula would instead drop to 0 once the start is more than 7 days
/// ahead and divide by zero at exactly 7, so `days` is floored at 0 first.
pub fn incident_recency(last_started: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
  match last_started {
    Some(last) => {
      let days = ((now - last).num_seconds() as f64 / SECONDS_PER_DAY).max(0.0);
      (1.0 / (1.0 + days / RECENCY_HALF_SCALE_DAYS)).clamp(0.0, 1.0)
    }
    None => 0.0,
  }
}

/// Build the scorer's feature map for one module.
///
/// Telemetry kinds are averaged (unknown kinds pass through), incident
/// features are injected, and every known telemetry factor is present.
pub fn aggregate_features(
  telemetry: &[TelemetryPoint],
  incidents: &[IncidentRecord],
  now: DateTime<Utc>,
) -> FeatureMap {
  let mut features = telemetry_means(telemetry);

  let max_severity = incidents.iter().map(|i| i.severity).max().unwrap_or(0);
  let last_started = incidents.iter().map(|i| i.started_at).max();

  features.insert(factor::INCIDENT_COUNT.to_string(), incidents.len() as f64);
  features.insert(factor::INCIDENT_MAX_SEVERITY.to_string(), max_severity as f64);
  features.insert(
    factor::INCIDENT_RECENCY.to_string(),
    incident_recency(last_started, now),
  );

  for name in factor::TELEMETRY {
    features.entry(name.to_string()).or_insert(0.0);
  }

  features
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
  }

  fn point(kind: &str, value: f64) -> TelemetryPoint {
    TelemetryPoint {
      kind: kind.into(),
      value,
      at: now(),
    }
  }

  fn incident(severity: i64, days_ago: i64) -> IncidentRecord {
    IncidentRecord {
      title: "outage".into(),
      severity,
      started_at: now() - Duration::days(days_ago),
      resolved_at: None,
      root_cause: None,
    }
  }

  #[test]
  fn averages_per_kind() {
    let telemetry = vec![
      point("error_rate", 0.1),
      point("error_rate", 0.3),
      point("code_churn", 400.0),
    ];
    let f = aggregate_features(&telemetry, &[], now());
    assert!((f["error_rate"] - 0.2).abs() < 1e-12);
    assert_eq!(f["code_churn"], 400.0);
  }

  #[test]
  fn known_keys_always_present() {
    let f = aggregate_features(&[], &[], now());
    for name in factor::TELEMETRY {
      assert_eq!(f[name], 0.0, "{} should default to 0", name);
    }
    assert_eq!(f["incident_count"], 0.0);
    assert_eq!(f["incident_max_severity"], 0.0);
    assert_eq!(f["incident_recency"], 0.0);
  }

  #[test]
  fn unknown_kinds_pass_through() {
    let f = aggregate_features(&[point("latency_p99", 250.0)], &[], now());
    assert_eq!(f["latency_p99"], 250.0);
  }

  #[test]
  fn incident_features() {
    let incidents = vec![incident(4, 3), incident(3, 9), incident(2, 12)];
    let f = aggregate_features(&[], &incidents, now());
    assert_eq!(f["incident_count"], 3.0);
    assert_eq!(f["incident_max_severity"], 4.0);
    // Latest incident 3 days ago: 1 / (1 + 3/7) = 0.7
    assert!((f["incident_recency"] - 0.7).abs() < 1e-12);
  }

  #[test]
  fn recency_decays_with_seven_day_half_scale() {
    assert_eq!(incident_recency(Some(now()), now()), 1.0);
    let week_ago = now() - Duration::days(7);
    assert!((incident_recency(Some(week_ago), now()) - 0.5).abs() < 1e-12);
    assert_eq!(incident_recency(None, now()), 0.0);
  }

  #[test]
  fn future_incident_clamps_to_one() {
    let tomorrow = now() + Duration::days(1);
    assert_eq!(incident_recency(Some(tomorrow), now()), 1.0);
    let next_week = now() + Duration::days(7);
    assert_eq!(incident_recency(Some(next_week), now()), 1.0);
    let next_month = now() + Duration::days(30);
    assert_eq!(incident_recency(Some(next_month), now()), 1.0);
  }
}
