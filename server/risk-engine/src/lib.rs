//! Module Risk Engine — deterministic, rule-based prioritization.
//!
//! Aggregates per-module telemetry and incidents into a feature map, maps it to
//! a 0-100 score with per-factor contributions, a band, and threshold reasons,
//! and ranks modules by score.
//!
//! No DB, no network; pure computation. Used by the binary for stdin/stdout and
//! by `ops-engine` for its inbound telemetry types.

pub mod config;
pub mod error;
pub mod features;
pub mod normalize;
pub mod reasons;
pub mod score;
pub mod types;

use chrono::{DateTime, Utc};

pub use config::ScoringConfig;
pub use error::EngineError;
pub use features::aggregate_features;
pub use reasons::make_reasons;
pub use score::{band_for, compute_score};
pub use types::{FeatureMap, ModuleInput, PriorityOutput, PriorityRequest, RiskReport, ScoreResult};

/// Stable id for one assessment: hash of module name + sorted features.
pub fn snapshot_id(module_name: &str, features: &FeatureMap) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(module_name.as_bytes());
  for (name, value) in features {
    hasher.update(b"|");
    hasher.update(name.as_bytes());
    hasher.update(b"=");
    hasher.update(&value.to_bits().to_le_bytes());
  }
  let hex = hasher.finalize().to_hex();
  format!("rsk-{}", &hex[..16])
}

/// Score an already-aggregated feature map.
pub fn report(
  module: &types::Module,
  features: FeatureMap,
  config: &ScoringConfig,
) -> RiskReport {
  let ScoreResult {
    score,
    contributions,
  } = compute_score(&features, config);
  let band = band_for(score, &config.bands).to_string();
  let reasons = make_reasons(&features);

  tracing::debug!(module = %module.name, score, band = %band, "scored module");

  RiskReport {
    module_name: module.name.clone(),
    owner: module.owner.clone(),
    domain: module.domain.clone(),
    snapshot_id: snapshot_id(&module.name, &features),
    features,
    score,
    band,
    contributions,
    reasons,
  }
}

/// Validate, aggregate, and score one module.
pub fn assess(
  input: &ModuleInput,
  config: &ScoringConfig,
  now: DateTime<Utc>,
) -> Result<RiskReport, EngineError> {
  let module = normalize::normalize_module(input, now)?;
  let features = aggregate_features(&module.telemetry, &module.incidents, now);
  Ok(report(&module, features, config))
}

/// Score up to `limit` modules (taken in name order) and rank by score descending.
pub fn prioritize(
  request: &PriorityRequest,
  config: &ScoringConfig,
  now: DateTime<Utc>,
) -> Result<PriorityOutput, EngineError> {
  let limit = normalize::resolve_limit(request.limit)?;

  let mut modules: Vec<&ModuleInput> = request.modules.iter().collect();
  modules.sort_by(|a, b| a.module_name.cmp(&b.module_name));
  modules.truncate(limit);

  let mut items = modules
    .into_iter()
    .map(|m| assess(m, config, now))
    .collect::<Result<Vec<_>, EngineError>>()?;

  // Deterministic sort: score desc, then module name asc.
  items.sort_by(|a, b| {
    b.score
      .partial_cmp(&a.score)
      .unwrap_or(std::cmp::Ordering::Equal)
      .then_with(|| a.module_name.cmp(&b.module_name))
  });

  tracing::info!(modules = items.len(), "prioritized modules");
  Ok(PriorityOutput { items })
}
