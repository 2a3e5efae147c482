//! Version command implementation.

use console::style;
use qsim_core::{GateKind, MAX_QUBITS};

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - statevector quantum circuit simulation",
        style("qsim").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    let gates: Vec<_> = GateKind::ALL.iter().map(|k| k.name()).collect();
    println!("  Gates:      {}", gates.join(", "));
    println!("  Max qubits: {MAX_QUBITS}");
    println!(
        "  Parallel:   {}",
        if cfg!(feature = "parallel") {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("  License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
