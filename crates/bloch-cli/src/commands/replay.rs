//! Replay command implementation.
//!
//! Steps through a circuit one operation at a time and prints the state
//! after each step.

use anyhow::{Context, Result};
use console::style;

use bloch_sim::{SimulationRequest, Simulator};

use super::common::{load_circuit, load_config, print_result, to_json};

/// Execute the replay command.
pub fn execute(input: &str, config: Option<&str>, format: &str) -> Result<()> {
    let circuit = load_circuit(input)?;
    let simulator = Simulator::new(load_config(config)?);

    let snapshots = simulator
        .replay(&SimulationRequest::from(circuit))
        .context("Replay failed")?;

    if format == "json" {
        println!("{}", to_json(&snapshots)?);
        return Ok(());
    }

    println!(
        "{} Replaying {} ({} steps)",
        style("→").cyan().bold(),
        style(input).green(),
        snapshots.len().saturating_sub(1)
    );
    for snapshot in &snapshots {
        println!(
            "\n{}",
            style(format!("── step {} ──", snapshot.steps_applied)).dim()
        );
        print_result(snapshot);
    }

    Ok(())
}
