//! Simulate command implementation.

use std::fs;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use bloch_sim::{SimulationRequest, SimulationWorker, Simulator};

use super::common::{load_circuit, load_config, override_noise, print_result, to_json};

/// Execute the simulate command.
pub async fn execute(
    input: &str,
    steps: Option<usize>,
    depolarizing: Option<f64>,
    phase_damping: Option<f64>,
    config: Option<&str>,
    format: &str,
    output: Option<&str>,
) -> Result<()> {
    let circuit = load_circuit(input)?;
    let config = load_config(config)?;
    let noise = override_noise(circuit.noise, depolarizing, phase_damping);
    let quiet = format == "json";

    if !quiet {
        println!(
            "{} Simulating {} ({} qubits, {} items, {})",
            style("→").cyan().bold(),
            style(input).green(),
            circuit.num_qubits,
            circuit.num_items(),
            style(noise).yellow()
        );
    }

    let mut request = SimulationRequest::from(circuit).with_noise(noise);
    request.step_limit = steps;

    let worker = SimulationWorker::spawn(Simulator::new(config));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Simulating...");
    if !quiet {
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    }

    let outcome = worker.simulate(request).await;
    spinner.finish_and_clear();
    worker.shutdown().await;
    let result = outcome.context("Simulation failed")?;

    if let Some(path) = output {
        fs::write(path, to_json(&result)?)
            .with_context(|| format!("Failed to write output file: {path}"))?;
        if !quiet {
            println!("  Wrote result to {}", style(path).green());
        }
    }

    match format {
        "json" => println!("{}", to_json(&result)?),
        _ => print_result(&result),
    }

    Ok(())
}
