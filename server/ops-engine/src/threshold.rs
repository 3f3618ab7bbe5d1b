//! Alert threshold suggestions for a spiking series.

use crate::config::Config;

/// Round to `decimals` places, half away from zero.
pub fn round_to(v: f64, decimals: u32) -> f64 {
  let scale = 10f64.powi(decimals as i32);
  (v * scale).round() / scale
}

/// `max(floor, round(last * ratio, decimals))`: 20% under the offending sample
/// by default, never below 0.01.
pub fn suggest_threshold(last_sample: f64, config: &Config) -> f64 {
  round_to(last_sample * config.threshold_ratio, config.threshold_decimals).max(config.threshold_floor)
}

/// Threshold for a series that has already been judged a spike; `None` when empty.
pub fn threshold_for(series: &[f64], config: &Config) -> Option<f64> {
  series.last().map(|&last| suggest_threshold(last, config))
}
