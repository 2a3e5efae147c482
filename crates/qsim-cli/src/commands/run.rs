//! Run command implementation.

use std::time::Instant;

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qsim_core::{QuantumRegister, SimConfig};

use super::common::{load_circuit, load_config, print_counts};

/// Configuration sources given on the command line.
#[derive(Debug, Default)]
pub struct Overrides<'a> {
    /// Configuration file path.
    pub config: Option<&'a str>,
    /// Seed overriding the file value.
    pub seed: Option<u64>,
    /// Register limit overriding the file value.
    pub max_qubits: Option<usize>,
}

/// Merge the configuration file with command-line overrides.
pub fn resolve_config(overrides: &Overrides<'_>) -> Result<SimConfig> {
    let mut config = match overrides.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };
    if let Some(seed) = overrides.seed {
        config.seed = Some(seed);
    }
    if let Some(max_qubits) = overrides.max_qubits {
        config.max_qubits = max_qubits;
    }
    config.validate().context("Invalid simulator settings")?;
    Ok(config)
}

/// Execute the run command.
pub fn execute(input: &str, shots: u32, measure: &[usize], overrides: &Overrides<'_>) -> Result<()> {
    let config = resolve_config(overrides)?;

    println!(
        "{} Running {}",
        style("→").cyan().bold(),
        style(input).green()
    );

    let circuit = load_circuit(input)?;
    println!(
        "  Loaded: '{}', {} qubits, {} gates",
        circuit.name(),
        circuit.num_qubits(),
        circuit.len()
    );

    let mut register = QuantumRegister::with_config(circuit.num_qubits(), &config)?;

    let start = Instant::now();
    circuit.run(&mut register)?;
    let elapsed = start.elapsed();
    info!(?elapsed, "circuit applied");

    println!("\n{register}");

    if shots > 0 {
        let counts = register.sample_counts(shots);
        print_counts(&counts);
    }

    if !measure.is_empty() {
        println!("\n{} Measurements:", style("✓").green().bold());
        for &qubit in measure {
            let outcome = register.measure(qubit)?;
            println!(
                "  q{}: {} (p = {:.4})",
                outcome.qubit,
                style(outcome.bit).cyan(),
                outcome.probability
            );
        }
        println!("\n{register}");
    }

    println!(
        "  Simulation time: {}",
        style(format!("{:.3} ms", elapsed.as_secs_f64() * 1e3)).yellow()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_overrides_win_over_defaults() {
        let config = resolve_config(&Overrides {
            config: None,
            seed: Some(3),
            max_qubits: Some(10),
        })
        .unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.max_qubits, 10);
    }

    #[test]
    fn test_overrides_are_validated() {
        let result = resolve_config(&Overrides {
            max_qubits: Some(0),
            ..Overrides::default()
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_execute_bell_circuit() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"name": "bell", "num_qubits": 2, "gates": [{{"gate": "h", "target": 0}}, {{"gate": "cx", "control": 0, "target": 1}}]}}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();
        let overrides = Overrides {
            seed: Some(1),
            ..Overrides::default()
        };
        execute(path, 64, &[0, 1], &overrides).unwrap();
    }

    #[test]
    fn test_execute_rejects_oversized_circuit() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"name": "wide", "num_qubits": 6, "gates": []}}"#).unwrap();
        let path = file.path().to_str().unwrap();
        let overrides = Overrides {
            max_qubits: Some(4),
            ..Overrides::default()
        };
        let err = execute(path, 0, &[], &overrides).unwrap_err();
        assert!(err.to_string().contains("6-qubit"));
    }
}
