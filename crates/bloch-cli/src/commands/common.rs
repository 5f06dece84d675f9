//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::de::DeserializeOwned;

use bloch_ir::{Circuit, NoiseModel};
use bloch_sim::{SimConfig, SimulationResult};

/// Most outcomes printed in table mode.
const MAX_ROWS: usize = 16;

/// Parse a JSON or YAML file into `T`, choosing by extension.
fn load_document<T: DeserializeOwned>(path: &str) -> Result<T> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source).with_context(|| format!("Invalid JSON in {path}")),
        "yaml" | "yml" => {
            serde_yaml_ng::from_str(&source).with_context(|| format!("Invalid YAML in {path}"))
        }
        // YAML is a superset of JSON
        _ => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Could not parse {path} as JSON or YAML")),
    }
}

/// Load a circuit document.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    load_document(path)
}

/// Load simulator limits, or the defaults when no file is given.
pub fn load_config(path: Option<&str>) -> Result<SimConfig> {
    match path {
        Some(path) => load_document(path),
        None => Ok(SimConfig::default()),
    }
}

/// Replace the file's noise parameters with those given on the command line.
pub fn override_noise(
    noise: NoiseModel,
    depolarizing: Option<f64>,
    phase_damping: Option<f64>,
) -> NoiseModel {
    NoiseModel {
        depolarizing: depolarizing.unwrap_or(noise.depolarizing),
        phase_damping: phase_damping.unwrap_or(noise.phase_damping),
    }
}

/// Render a result as pretty JSON.
pub fn to_json(result: &impl serde::Serialize) -> Result<String> {
    serde_json::to_string_pretty(result).context("JSON serialization failed")
}

/// Print a simulation result in table format (shared by simulate and replay).
pub fn print_result(result: &SimulationResult) {
    println!(
        "\n{} Probabilities ({} of {} steps):",
        style("✓").green().bold(),
        result.steps_applied,
        result.total_steps
    );

    for entry in result.probabilities.iter().take(MAX_ROWS) {
        let pct = entry.value * 100.0;
        let bar: String = "█".repeat((pct / 2.0).round() as usize);
        println!(
            "  {}: {:>7.3}% {}",
            style(&entry.state).cyan(),
            pct,
            style(bar).green()
        );
    }

    if result.probabilities.len() > MAX_ROWS {
        println!(
            "  ... and {} more outcomes",
            result.probabilities.len() - MAX_ROWS
        );
    }

    if !result.qubit_states.is_empty() {
        println!("\n  {:<6} {:>8} {:>8} {:>8} {:>8}", "qubit", "x", "y", "z", "purity");
        for (q, qs) in result.qubit_states.iter().enumerate() {
            let c = qs.bloch_sphere_coords;
            println!(
                "  {:<6} {:>8.4} {:>8.4} {:>8.4} {:>8.4}",
                style(format!("q{q}")).cyan(),
                c.x,
                c.y,
                c.z,
                qs.purity
            );
        }
    }

    for diag in &result.diagnostics {
        println!("  {} {}", style("⚠").yellow().bold(), style(diag).yellow());
    }

    println!("\n  Trace: {}", style(format!("{:.9}", result.trace)).yellow());
}
