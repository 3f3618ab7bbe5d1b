//! Binary entrypoint: read one PriorityRequest JSON from stdin, write one PriorityOutput to stdout.
//!
//! Invalid input produces an ErrorOutput JSON object on stdout and exit code 1.
//! Logs go to stderr (`RUST_LOG` controls the level).

use risk_engine::types::ErrorOutput;
use risk_engine::{normalize, prioritize, EngineError, PriorityRequest, ScoringConfig};
use std::io::{self, Read, Write};

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "risk_engine=warn".into()),
    )
    .with_writer(io::stderr)
    .init();

  if let Err(e) = run_binary() {
    tracing::error!(error = %e, "risk-engine failed");
    let err = ErrorOutput::from(&e);
    let mut out = io::stdout().lock();
    let _ = serde_json::to_writer(&mut out, &err);
    let _ = writeln!(out);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), EngineError> {
  let config = ScoringConfig::from_env()?;

  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let request: PriorityRequest = serde_json::from_str(&raw)?;
  let now = normalize::resolve_now(request.now.as_deref())?;

  let out = prioritize(&request, &config, now)?;
  let json = serde_json::to_vec(&out)?;
  io::stdout().write_all(&json)?;
  Ok(())
}
