//! Simulator configuration.

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Hard upper bound on register width: 2^30 amplitudes are 16 GiB.
pub const MAX_QUBITS: usize = 30;

/// Default tolerance for the normalization invariant.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Registers at or above this many amplitudes use the parallel kernels
/// when the `parallel` feature is enabled.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 14;

/// Settings applied to every register built from this configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Largest register accepted, capped at [`MAX_QUBITS`].
    pub max_qubits: usize,
    /// Allowed deviation of the total probability from one.
    pub tolerance: f64,
    /// Seed for the register's RNG stream; `None` seeds from entropy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Verify the normalization post-condition after every operation.
    pub check_normalization: bool,
    /// Minimum amplitude count before kernels split work across threads.
    pub parallel_threshold: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_qubits: MAX_QUBITS,
            tolerance: DEFAULT_TOLERANCE,
            seed: None,
            check_normalization: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SimConfig {
    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the maximum register width.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Set the normalization tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Enable or disable the post-operation normalization check.
    #[must_use]
    pub fn with_normalization_check(mut self, enabled: bool) -> Self {
        self.check_normalization = enabled;
        self
    }

    /// Effective register limit.
    pub fn qubit_limit(&self) -> usize {
        self.max_qubits.min(MAX_QUBITS)
    }

    /// Reject values that would make the simulator misbehave.
    pub fn validate(&self) -> SimResult<()> {
        if self.max_qubits == 0 {
            return Err(SimError::InvalidConfig(
                "max_qubits must be at least 1".into(),
            ));
        }
        if self.max_qubits > MAX_QUBITS {
            return Err(SimError::InvalidConfig(format!(
                "max_qubits {} exceeds the hard limit of {MAX_QUBITS}",
                self.max_qubits
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0 && self.tolerance < 0.5) {
            return Err(SimError::InvalidConfig(format!(
                "tolerance must lie in (0, 0.5), got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
