//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde::de::DeserializeOwned;

use qsim_core::{Circuit, Counts, SimConfig};

/// Read a JSON or YAML document, choosing the format by file extension.
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
        other => anyhow::bail!("Unsupported file extension '{other}' (expected json, yaml or yml)"),
    }
}

/// Load and validate a circuit file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let circuit: Circuit = load_document(path)?;
    circuit
        .validate()
        .with_context(|| format!("Circuit '{}' in {path} is invalid", circuit.name()))?;
    Ok(circuit)
}

/// Load a simulator configuration file.
pub fn load_config(path: &str) -> Result<SimConfig> {
    let config: SimConfig = load_document(path)?;
    config
        .validate()
        .with_context(|| format!("Configuration in {path} is invalid"))?;
    Ok(config)
}

/// Print a shot histogram as a table.
pub fn print_counts(counts: &Counts) {
    println!(
        "\n{} Samples ({} shots):",
        style("✓").green().bold(),
        counts.total_shots()
    );

    let sorted = counts.sorted();
    let total = counts.total_shots() as f64;

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = **count as f64 / total * 100.0;
        let bar_len = (prob / 2.0).round() as usize;
        let bar: String = "█".repeat(bar_len);

        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}
