//! Structured error types for the ops engine.

use std::io::Write;

use risk_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OpsError {
  /// Inbound telemetry failed validation.
  #[error(transparent)]
  Input(#[from] EngineError),

  #[error("config: {0}")]
  Config(String),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}

impl OpsError {
  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }

  /// Structured error line for the JSON-lines output stream.
  pub fn to_output(&self) -> risk_engine::types::ErrorOutput {
    match self {
      Self::Input(e) => e.into(),
      _ => risk_engine::types::ErrorOutput::new(self.to_string()),
    }
  }

  /// Write `to_output` as one JSON line.
  pub fn write_line<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
    serde_json::to_writer(&mut *out, &self.to_output())?;
    writeln!(out)
  }
}
