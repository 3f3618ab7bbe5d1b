//! Binary entrypoint: read JSON lines from stdin, write JSON lines to stdout.
//!
//! Each input line is a ModuleInput (module name + telemetry events). Each
//! output line is either:
//! - An OpsRecommendation (for every valid module)
//! - An ErrorOutput (when input validation fails)
//!
//! A bad config is reported as a single ErrorOutput line, then exit code 1.
//!
//! Logs go to stderr (`RUST_LOG` controls the level).

use chrono::Utc;
use ops_engine::types::ErrorOutput;
use ops_engine::{recommend, Config};
use risk_engine::ModuleInput;
use std::io::{self, BufRead, Write};

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ops_engine=info".into()),
    )
    .with_writer(io::stderr)
    .init();

  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());

  let config = match Config::from_env() {
    Ok(c) => c,
    Err(e) => {
      tracing::error!(error = %e, "invalid ops-engine config");
      let _ = e.write_line(&mut out);
      let _ = out.flush();
      std::process::exit(1);
    }
  };

  for line in stdin.lock().lines() {
    let line = match line {
      Ok(l) => l,
      Err(e) => {
        tracing::error!(error = %e, "read error");
        std::process::exit(1);
      }
    };

    // Skip blank lines.
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    let raw: ModuleInput = match serde_json::from_str(trimmed) {
      Ok(v) => v,
      Err(e) => {
        let err = ErrorOutput::new(format!("json parse: {}", e));
        let _ = serde_json::to_writer(&mut out, &err);
        let _ = writeln!(out);
        continue;
      }
    };

    match recommend(&raw, &config, Utc::now()) {
      Ok(rec) => {
        let _ = serde_json::to_writer(&mut out, &rec);
        let _ = writeln!(out);
      }
      Err(e) => {
        tracing::warn!(module = %raw.module_name, error = %e, "rejected module");
        let _ = e.write_line(&mut out);
      }
    }
  }

  let _ = out.flush();
}
