//! Spike detection over an ordered series: EWMA baseline + residual z-test.

use crate::config::Config;

pub const DEFAULT_ALPHA: f64 = 0.3;
pub const DEFAULT_K: f64 = 3.0;

/// Exponentially weighted moving average, seeded with the first sample.
///
/// Returns 0.0 for an empty series. The update is written as
/// `avg + alpha * (v - avg)`, so a constant series stays exactly constant.
pub fn ewma(series: &[f64], alpha: f64) -> f64 {
  let Some((&first, rest)) = series.split_first() else {
    return 0.0;
  };
  rest
    .iter()
    .fold(first, |avg, &v| avg + alpha * (v - avg))
}

pub fn mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    return 0.0;
  }
  xs.iter().sum::<f64>() / xs.len() as f64
}

/// Population (divide-by-n) standard deviation.
pub fn population_stddev(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    return 0.0;
  }
  let mu = mean(xs);
  let var = xs.iter().map(|x| (x - mu).powi(2)).sum::<f64>() / xs.len() as f64;
  var.sqrt()
}

/// Intermediate values of one spike check, kept for logging and explanations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualStats {
  /// EWMA of every sample except the last.
  pub baseline: f64,
  pub mean_residual: f64,
  /// Residual standard deviation after the zero floor.
  pub sigma: f64,
  pub last_residual: f64,
  /// `mean_residual + k * sigma`.
  pub limit: f64,
}

impl ResidualStats {
  pub fn is_spike(&self) -> bool {
    self.last_residual > self.limit
  }
}

/// Compare the newest sample against the history before it.
///
/// The candidate point is excluded from its own baseline and variance. Returns
/// `None` when there is not enough history to judge.
pub fn residual_stats(series: &[f64], config: &Config) -> Option<ResidualStats> {
  if series.len() < config.min_samples {
    return None;
  }
  let (&last, history) = series.split_last()?;

  let baseline = ewma(history, config.ewma_alpha);
  let resid: Vec<f64> = history.iter().map(|v| (v - baseline).abs()).collect();
  if resid.len() < config.min_residuals {
    return None;
  }

  let mean_residual = mean(&resid);
  let mut sigma = population_stddev(&resid);
  if sigma == 0.0 {
    sigma = config.sigma_floor;
  }
  let last_residual = (last - baseline).abs();

  Some(ResidualStats {
    baseline,
    mean_residual,
    sigma,
    last_residual,
    limit: mean_residual + config.spike_k * sigma,
  })
}

/// Spike verdict with configured history gates and sensitivity.
pub fn detect_spike(series: &[f64], config: &Config) -> bool {
  match residual_stats(series, config) {
    Some(stats) => {
      let spike = stats.is_spike();
      tracing::trace!(?stats, spike, "spike check");
      spike
    }
    None => false,
  }
}

/// `true` when the last sample sits more than `k` residual standard deviations
/// above the mean residual. Fewer than 5 samples is never a spike.
pub fn is_spike(series: &[f64], k: f64) -> bool {
  detect_spike(
    series,
    &Config {
      spike_k: k,
      ..Config::default()
    },
  )
}
