//! Validate inbound records into canonical telemetry/incident models.
//!
//! Bad input is rejected here so the scorer only ever sees clean numbers.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::EngineError;
use crate::types::*;

/// Incident severity when the caller omits one.
pub const DEFAULT_SEVERITY: i64 = 3;
pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 500;

/// Parse an RFC3339 timestamp. Naive timestamps (no offset) are read as UTC.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, EngineError> {
  let raw = raw.trim();
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
    .map(|naive| naive.and_utc())
    .map_err(|e| EngineError::validation(field, &format!("invalid RFC3339: {}", e)))
}

fn timestamp_or(
  field: &str,
  raw: Option<&str>,
  now: DateTime<Utc>,
) -> Result<DateTime<Utc>, EngineError> {
  match raw {
    Some(s) => parse_timestamp(field, s),
    None => Ok(now),
  }
}

pub fn normalize_telemetry(
  raw: &InboundTelemetry,
  now: DateTime<Utc>,
) -> Result<TelemetryPoint, EngineError> {
  let kind = raw.kind.trim();
  if kind.is_empty() {
    return Err(EngineError::validation("events[].kind", "must not be empty"));
  }
  if !raw.value.is_finite() {
    return Err(EngineError::validation("events[].value", "must be a finite number"));
  }
  Ok(TelemetryPoint {
    kind: kind.to_string(),
    value: raw.value,
    at: timestamp_or("events[].at", raw.at.as_deref(), now)?,
  })
}

pub fn normalize_incident(
  raw: &InboundIncident,
  now: DateTime<Utc>,
) -> Result<IncidentRecord, EngineError> {
  if raw.title.trim().is_empty() {
    return Err(EngineError::validation("incidents[].title", "must not be empty"));
  }
  let resolved_at = match &raw.resolved_at {
    Some(s) => Some(parse_timestamp("incidents[].resolved_at", s)?),
    None => None,
  };
  Ok(IncidentRecord {
    title: raw.title.clone(),
    severity: raw.severity.unwrap_or(DEFAULT_SEVERITY),
    started_at: timestamp_or("incidents[].started_at", raw.started_at.as_deref(), now)?,
    resolved_at,
    root_cause: raw.root_cause.clone(),
  })
}

/// Parse and validate a module snapshot.
pub fn normalize_module(raw: &ModuleInput, now: DateTime<Utc>) -> Result<Module, EngineError> {
  if raw.module_name.trim().is_empty() {
    return Err(EngineError::validation("module_name", "must not be empty"));
  }

  let telemetry = raw
    .events
    .iter()
    .map(|e| normalize_telemetry(e, now))
    .collect::<Result<Vec<_>, EngineError>>()?;

  let incidents = raw
    .incidents
    .iter()
    .map(|i| normalize_incident(i, now))
    .collect::<Result<Vec<_>, EngineError>>()?;

  Ok(Module {
    name: raw.module_name.clone(),
    owner: raw.owner.clone().filter(|s| !s.is_empty()),
    domain: raw.domain.clone().filter(|s| !s.is_empty()),
    telemetry,
    incidents,
  })
}

/// Resolve the request limit: default 50, allowed range 1..=500.
pub fn resolve_limit(limit: Option<usize>) -> Result<usize, EngineError> {
  match limit {
    None => Ok(DEFAULT_LIMIT),
    Some(n) if (1..=MAX_LIMIT).contains(&n) => Ok(n),
    Some(_) => Err(EngineError::validation("limit", "must be between 1 and 500")),
  }
}

/// Resolve the request reference time, falling back to the current time.
pub fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>, EngineError> {
  timestamp_or("now", raw, Utc::now())
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
  }

  fn module(name: &str) -> ModuleInput {
    ModuleInput {
      module_name: name.into(),
      owner: None,
      domain: None,
      events: vec![InboundTelemetry {
        kind: " error_rate ".into(),
        value: 0.02,
        at: Some("2025-02-28T10:00:00Z".into()),
      }],
      incidents: vec![InboundIncident {
        title: "DB saturation".into(),
        severity: None,
        started_at: None,
        resolved_at: None,
        root_cause: None,
      }],
    }
  }

  #[test]
  fn parses_rfc3339_and_naive() {
    let z = parse_timestamp("at", "2025-01-15T10:30:00Z").unwrap();
    let offset = parse_timestamp("at", "2025-01-15T12:30:00+02:00").unwrap();
    let naive = parse_timestamp("at", "2025-01-15T10:30:00").unwrap();
    assert_eq!(z, offset);
    assert_eq!(z, naive);
  }

  #[test]
  fn invalid_timestamp_names_field() {
    let err = parse_timestamp("events[].at", "yesterday").unwrap_err();
    assert!(err.to_string().contains("events[].at"));
  }

  #[test]
  fn normalize_valid_module() {
    let m = normalize_module(&module("checkout"), now()).unwrap();
    assert_eq!(m.name, "checkout");
    assert_eq!(m.telemetry[0].kind, "error_rate");
    assert_eq!(
      m.telemetry[0].at,
      Utc.with_ymd_and_hms(2025, 2, 28, 10, 0, 0).unwrap()
    );
    assert_eq!(m.incidents[0].severity, DEFAULT_SEVERITY);
    assert_eq!(m.incidents[0].started_at, now());
  }

  #[test]
  fn rejects_empty_module_name() {
    let err = normalize_module(&module("  "), now()).unwrap_err();
    assert!(err.to_string().contains("module_name"));
  }

  #[test]
  fn rejects_non_finite_value() {
    let mut raw = module("auth");
    raw.events[0].value = f64::NAN;
    let err = normalize_module(&raw, now()).unwrap_err();
    assert!(err.to_string().contains("events[].value"));
  }

  #[test]
  fn rejects_empty_kind() {
    let mut raw = module("auth");
    raw.events[0].kind = "".into();
    let err = normalize_module(&raw, now()).unwrap_err();
    assert!(err.to_string().contains("kind"));
  }

  #[test]
  fn rejects_blank_incident_title() {
    let mut raw = module("auth");
    raw.incidents[0].title = "  ".into();
    let err = normalize_module(&raw, now()).unwrap_err();
    assert!(err.to_string().contains("incidents[].title"), "{}", err);
  }

  #[test]
  fn rejects_unparsable_incident_times() {
    let mut raw = module("auth");
    raw.incidents[0].started_at = Some("last tuesday".into());
    let err = normalize_incident(&raw.incidents[0], now()).unwrap_err();
    assert!(err.to_string().contains("incidents[].started_at"), "{}", err);

    let mut raw = module("auth");
    raw.incidents[0].resolved_at = Some("nope".into());
    let err = normalize_incident(&raw.incidents[0], now()).unwrap_err();
    assert!(err.to_string().contains("incidents[].resolved_at"), "{}", err);
  }

  #[test]
  fn limit_bounds() {
    assert_eq!(resolve_limit(None).unwrap(), 50);
    assert_eq!(resolve_limit(Some(1)).unwrap(), 1);
    assert_eq!(resolve_limit(Some(500)).unwrap(), 500);
    assert!(resolve_limit(Some(0)).is_err());
    assert!(resolve_limit(Some(501)).is_err());
  }
}
