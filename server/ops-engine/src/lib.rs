//! Ops Recommendation Engine — deterministic spike detection (no AI).
//!
//! Builds a chronological series per module for the watched telemetry kind,
//! flags a spike when the newest sample leaves the EWMA baseline by more than
//! `k` residual standard deviations, and emits suggested alert thresholds plus
//! runbook steps.
//!
//! No DB, no network; pure computation.

pub mod config;
pub mod engine;
pub mod error;
pub mod runbook;
pub mod stats;
pub mod threshold;
pub mod types;

pub use config::Config;
pub use engine::{recommend, recommend_series, series_for, verdict};
pub use error::OpsError;
pub use stats::{ewma, is_spike};
pub use types::{OpsRecommendation, SpikeVerdict};
