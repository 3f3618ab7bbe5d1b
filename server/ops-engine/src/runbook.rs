//! Rule-based runbook steps for a spiking module.

pub const NO_SPIKE: &str = "No spike detected.";

const BASE_STEPS: [&str; 4] = [
  "Check latest deploys/flags",
  "Inspect error logs and traces",
  "Check dependencies",
  "Adjust canary %, scale up",
];

/// Module-name keyword -> step put at the front. Later entries end up first.
const MODULE_STEPS: [(&str, &str); 2] = [
  ("auth", "Lower login rate limits temporarily"),
  ("checkout", "Failover payment provider if persists"),
];

/// First-response steps for a module whose watched series spiked.
pub fn runbook_steps(module_name: &str) -> Vec<String> {
  let mut steps: Vec<String> = BASE_STEPS.iter().map(|s| s.to_string()).collect();
  for (keyword, step) in MODULE_STEPS {
    if module_name.contains(keyword) {
      steps.insert(0, step.to_string());
    }
  }
  steps
}

/// Steps for a recommendation: the runbook on a spike, a single note otherwise.
pub fn steps_for(module_name: &str, spike: bool) -> Vec<String> {
  if spike {
    runbook_steps(module_name)
  } else {
    vec![NO_SPIKE.to_string()]
  }
}
