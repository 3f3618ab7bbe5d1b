//! Weighted multi-factor risk score, per-factor contributions, and banding.

use crate::config::{Band, ScoringConfig};
use crate::types::{Contributions, FeatureMap, ScoreResult};

/// Round to 2 decimal places.
pub fn round2(v: f64) -> f64 {
  (v * 100.0).round() / 100.0
}

/// Map a raw value onto [0, 1]: clamp to [0, cap] then divide by cap.
///
/// A non-positive cap disables the factor. NaN reads as 0.0 and +inf saturates.
pub fn normalize(v: f64, cap: f64) -> f64 {
  if cap <= 0.0 || v.is_nan() {
    return 0.0;
  }
  v.max(0.0).min(cap) / cap
}

/// Score a feature map against the weight table.
///
/// Only factors in the weight table count; unknown feature keys are ignored and
/// missing ones read as 0.0. Each contribution is rounded on its own, so the
/// contributions need not sum exactly to the rounded score.
pub fn compute_score(features: &FeatureMap, config: &ScoringConfig) -> ScoreResult {
  let total = config.total_weight();
  let mut contributions = Contributions::with_capacity(config.weights.len());

  if total <= 0.0 {
    for name in config.weights.keys() {
      contributions.insert(name.clone(), 0.0);
    }
    return ScoreResult {
      score: 0.0,
      contributions,
    };
  }

  let mut acc = 0.0;
  for (name, weight) in &config.weights {
    let v = features.get(name).copied().unwrap_or(0.0);
    let weighted = weight * normalize(v, config.cap_for(name));
    contributions.insert(name.clone(), round2(100.0 * weighted / total));
    acc += weighted;
  }

  ScoreResult {
    score: round2(100.0 * acc / total),
    contributions,
  }
}

/// First band (in declared order) whose lower bound the score meets.
pub fn band_for<'a>(score: f64, bands: &'a [Band]) -> &'a str {
  bands
    .iter()
    .find(|b| score >= b.min_score)
    .or_else(|| bands.last())
    .map(|b| b.name.as_str())
    .unwrap_or("Low")
}
