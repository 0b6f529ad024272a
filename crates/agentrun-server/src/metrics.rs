//! Prometheus metrics collection and formatting.
//!
//! This module provides metrics in Prometheus text exposition format.

use std::fmt::Write;
use std::sync::Arc;

use crate::state::AppState;

/// Collect all metrics from AppState and format as Prometheus text.
pub async fn collect_metrics(state: &Arc<AppState>) -> String {
    let mut output = String::new();

    collect_gate_metrics(state, &mut output);
    collect_run_metrics(state, &mut output).await;

    output
}

/// Whether the admission gate is currently held.
fn collect_gate_metrics(state: &Arc<AppState>, output: &mut String) {
    let busy = u8::from(state.gate.try_is_busy());

    writeln!(
        output,
        "# HELP agentrun_gate_busy Whether an agent currently holds the admission gate"
    )
    .ok();
    writeln!(output, "# TYPE agentrun_gate_busy gauge").ok();
    writeln!(output, "agentrun_gate_busy {busy}").ok();
}

/// Collect run metrics by state.
async fn collect_run_metrics(state: &Arc<AppState>, output: &mut String) {
    let counts = state.registry.state_counts().await;

    writeln!(output).ok();
    writeln!(
        output,
        "# HELP agentrun_runs_total Total number of runs by state"
    )
    .ok();
    writeln!(output, "# TYPE agentrun_runs_total gauge").ok();
    for (run_state, count) in counts {
        let label = run_state.as_str().to_ascii_lowercase();
        writeln!(output, "agentrun_runs_total{{state=\"{label}\"}} {count}").ok();
    }
}
