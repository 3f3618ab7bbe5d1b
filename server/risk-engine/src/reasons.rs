//! Human-readable reasons from fixed threshold rules on raw feature values.

use crate::config::factor;
use crate::types::FeatureMap;

pub const NO_DRIVERS: &str = "No standout risk drivers; routine monitoring.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
  Above,
  AtLeast,
}

/// One independent rule: `features[feature] <cmp> threshold` yields `message`.
#[derive(Debug, Clone, Copy)]
pub struct ReasonRule {
  pub feature: &'static str,
  pub comparison: Comparison,
  pub threshold: f64,
  pub message: &'static str,
}

impl ReasonRule {
  const fn above(feature: &'static str, threshold: f64, message: &'static str) -> Self {
    Self {
      feature,
      comparison: Comparison::Above,
      threshold,
      message,
    }
  }

  const fn at_least(feature: &'static str, threshold: f64, message: &'static str) -> Self {
    Self {
      feature,
      comparison: Comparison::AtLeast,
      threshold,
      message,
    }
  }

  /// Missing features read as 0.0 and NaN never matches.
  pub fn holds(&self, features: &FeatureMap) -> bool {
    let v = features.get(self.feature).copied().unwrap_or(0.0);
    match self.comparison {
      Comparison::Above => v > self.threshold,
      Comparison::AtLeast => v >= self.threshold,
    }
  }
}

/// Evaluated in this order; output preserves it.
pub const RULES: [ReasonRule; 10] = [
  ReasonRule::above(factor::ERROR_RATE, 0.05, "Error rate above 5%."),
  ReasonRule::above(factor::CHANGE_FREQUENCY, 7.0, "High change frequency (>7)."),
  ReasonRule::above(factor::CODE_CHURN, 800.0, "Heavy code churn (>800 LOC)."),
  ReasonRule::above(factor::COMPLEXITY, 0.6, "High complexity (>0.6)."),
  ReasonRule::above(factor::CUSTOMER_IMPACT, 0.7, "High customer impact."),
  ReasonRule::at_least(factor::SLA_BREACHES, 1.0, "Recent SLA breach(es)."),
  ReasonRule::above(factor::TEST_FLAKINESS, 0.15, "Elevated test flakiness (>15%)."),
  ReasonRule::at_least(factor::INCIDENT_COUNT, 3.0, "Multiple incidents recently (>=3)."),
  ReasonRule::at_least(
    factor::INCIDENT_MAX_SEVERITY,
    4.0,
    "Recent high-severity incident (sev4+).",
  ),
  ReasonRule::above(
    factor::INCIDENT_RECENCY,
    0.6,
    "Recent incident cluster (recency-weighted).",
  ),
];

/// Messages for every rule that holds, in rule order; never empty.
pub fn make_reasons(features: &FeatureMap) -> Vec<String> {
  let mut out: Vec<String> = RULES
    .iter()
    .filter(|rule| rule.holds(features))
    .map(|rule| rule.message.to_string())
    .collect();
  if out.is_empty() {
    out.push(NO_DRIVERS.to_string());
  }
  out
}
