//! qsim command-line interface
//!
//! Runs a circuit file on a fresh statevector register and reports the
//! resulting state, optional collapsing measurements and shot counts.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{run, version};

/// qsim - statevector quantum circuit simulation
#[derive(Parser)]
#[command(name = "qsim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a circuit on a fresh register
    Run {
        /// Circuit file (JSON or YAML)
        #[arg(short, long)]
        input: String,

        /// Number of non-collapsing samples to draw after the circuit
        #[arg(short, long, default_value = "0")]
        shots: u32,

        /// Qubits to measure, in order, after sampling
        #[arg(short, long, num_args = 1.., value_delimiter = ',')]
        measure: Vec<usize>,

        /// RNG seed for reproducible measurements
        #[arg(long, env = "QSIM_SEED")]
        seed: Option<u64>,

        /// Largest register to allocate
        #[arg(long, env = "QSIM_MAX_QUBITS")]
        max_qubits: Option<usize>,

        /// Simulator configuration file (JSON or YAML)
        #[arg(short, long, env = "QSIM_CONFIG")]
        config: Option<String>,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run {
            input,
            shots,
            measure,
            seed,
            max_qubits,
            config,
        } => run::execute(
            &input,
            shots,
            &measure,
            &run::Overrides {
                config: config.as_deref(),
                seed,
                max_qubits,
            },
        ),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_defaults() {
        let cli = Cli::try_parse_from(["qsim", "run", "-i", "bell.json"]).unwrap();
        match cli.command {
            Commands::Run {
                input,
                shots,
                measure,
                ..
            } => {
                assert_eq!(input, "bell.json");
                assert_eq!(shots, 0);
                assert!(measure.is_empty());
            }
            Commands::Version => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_measure_list() {
        let cli = Cli::try_parse_from([
            "qsim", "run", "-i", "c.yaml", "--measure", "0,2", "--seed", "7", "-s", "100",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                measure,
                seed,
                shots,
                ..
            } => {
                assert_eq!(measure, vec![0, 2]);
                assert_eq!(seed, Some(7));
                assert_eq!(shots, 100);
            }
            Commands::Version => panic!("expected run"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["qsim", "version", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_run_requires_input() {
        assert!(Cli::try_parse_from(["qsim", "run"]).is_err());
    }
}
