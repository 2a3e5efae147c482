//! Error types for the simulator core.

use thiserror::Error;

/// Errors produced by register construction, gate application and measurement.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Requested register width is zero or beyond the supported maximum.
    #[error("Cannot allocate a {requested}-qubit register (supported: 1..={max})")]
    Capacity {
        /// Number of qubits requested.
        requested: usize,
        /// Largest register the simulator accepts.
        max: usize,
    },

    /// A qubit index is out of range, or a two-qubit gate names the same qubit twice.
    #[error(
        "Invalid qubit index {qubit} for a {num_qubits}-qubit register{}",
        format_context(.context)
    )]
    InvalidQubitIndex {
        /// The offending qubit index.
        qubit: usize,
        /// Width of the register the gate was validated against.
        num_qubits: usize,
        /// Optional gate name or reason.
        context: Option<String>,
    },

    /// Gate name outside the supported set.
    #[error("Unsupported gate '{0}' (supported: h, x, y, z, cx, ry, swap)")]
    UnsupportedGate(String),

    /// A gate record is missing a parameter its kind requires.
    #[error("Gate '{gate}' requires a {parameter}")]
    MissingParameter {
        /// Gate name.
        gate: &'static str,
        /// Name of the missing parameter.
        parameter: &'static str,
    },

    /// A gate parameter is outside its domain (e.g. a NaN rotation angle).
    #[error("Gate '{gate}' has an invalid {parameter}: {value}")]
    InvalidParameter {
        /// Gate name.
        gate: &'static str,
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The amplitude vector stopped summing to one after a unitary operation.
    ///
    /// This is an internal post-condition failure and should be treated as fatal.
    #[error("Normalization violated after {operation}: total probability {total}")]
    NormalizationViolation {
        /// Operation that produced the state.
        operation: String,
        /// Observed total probability.
        total: f64,
    },

    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SimError {
    /// Build an out-of-range index error for the named gate.
    pub(crate) fn out_of_range(qubit: usize, num_qubits: usize, gate: &str) -> Self {
        SimError::InvalidQubitIndex {
            qubit,
            num_qubits,
            context: Some(format!("gate: {gate}")),
        }
    }

    /// Build an index error for a two-qubit gate whose operands coincide.
    pub(crate) fn coincident(qubit: usize, num_qubits: usize, gate: &str) -> Self {
        SimError::InvalidQubitIndex {
            qubit,
            num_qubits,
            context: Some(format!("gate: {gate}, both operands are the same qubit")),
        }
    }
}

#[allow(clippy::ref_option)]
fn format_context(context: &Option<String>) -> String {
    match context {
        Some(ctx) => format!(" ({ctx})"),
        None => String::new(),
    }
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_error_message_includes_gate() {
        let err = SimError::out_of_range(3, 2, "h");
        assert_eq!(
            err.to_string(),
            "Invalid qubit index 3 for a 2-qubit register (gate: h)"
        );
    }

    #[test]
    fn test_index_error_without_context() {
        let err = SimError::InvalidQubitIndex {
            qubit: 5,
            num_qubits: 4,
            context: None,
        };
        assert_eq!(err.to_string(), "Invalid qubit index 5 for a 4-qubit register");
    }
}
