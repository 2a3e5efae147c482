//! The quantum register: a contiguous statevector of 2^n amplitudes.

use num_complex::Complex64;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use tracing::debug;

use crate::config::SimConfig;
use crate::error::{SimError, SimResult};
use crate::gate::GateSpec;
use crate::measure::{self, Counts, MeasurementOutcome};

/// Amplitudes below this probability are omitted from the textual dump.
const DISPLAY_CUTOFF: f64 = 1e-10;

/// An n-qubit register in a pure state.
///
/// Basis index bit `i` holds the value of qubit `i`, so qubit 0 is the least
/// significant bit. The register also owns the RNG stream used by
/// [`QuantumRegister::measure`], which makes seeded runs reproducible.
#[derive(Debug, Clone)]
pub struct QuantumRegister {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
    rng: StdRng,
    tolerance: f64,
    check_normalization: bool,
    parallel_threshold: usize,
}

impl QuantumRegister {
    /// Create a register in |0…0⟩ with default settings.
    ///
    /// Passing `Some(seed)` makes every measurement on this register
    /// reproducible; `None` seeds from system entropy.
    pub fn new(num_qubits: usize, seed: Option<u64>) -> SimResult<Self> {
        let config = SimConfig {
            seed,
            ..SimConfig::default()
        };
        Self::with_config(num_qubits, &config)
    }

    /// Create a register in |0…0⟩ using the given configuration.
    pub fn with_config(num_qubits: usize, config: &SimConfig) -> SimResult<Self> {
        config.validate()?;
        let max = config.qubit_limit();
        if num_qubits == 0 || num_qubits > max {
            return Err(SimError::Capacity {
                requested: num_qubits,
                max,
            });
        }

        let size = 1_usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        debug!(num_qubits, seed = ?config.seed, "allocated register");

        Ok(Self {
            num_qubits,
            amplitudes,
            rng,
            tolerance: config.tolerance,
            check_normalization: config.check_normalization,
            parallel_threshold: config.parallel_threshold,
        })
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of amplitudes (2^n).
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Tolerance used for the normalization invariant and measurement guards.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Read-only view of the statevector.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// `|a_i|²` for every basis index.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Probability of a single basis state. Out-of-range indices have probability zero.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, Complex64::norm_sqr)
    }

    /// Sum of all probabilities; one for a valid state.
    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Whether the total probability is within tolerance of one.
    pub fn is_normalized(&self) -> bool {
        (self.total_probability() - 1.0).abs() <= self.tolerance
    }

    /// Return to |0…0⟩. The RNG stream continues where it left off.
    pub fn reset(&mut self) {
        self.amplitudes.fill(Complex64::new(0.0, 0.0));
        self.amplitudes[0] = Complex64::new(1.0, 0.0);
    }

    /// Ket label for a basis index, qubit n−1 leftmost.
    pub fn basis_label(&self, index: usize) -> String {
        format!("|{index:0width$b}⟩", width = self.num_qubits)
    }

    /// Apply a gate in place.
    pub fn apply(&mut self, gate: &GateSpec) -> SimResult<()> {
        crate::apply::apply_gate(self, gate)
    }

    /// Measure one qubit using the register's own RNG, collapsing the state.
    pub fn measure(&mut self, qubit: usize) -> SimResult<MeasurementOutcome> {
        measure::measure(self, qubit)
    }

    /// Measure every qubit in ascending order. Returns the collapsed basis index.
    pub fn measure_all(&mut self) -> SimResult<usize> {
        measure::measure_all(self)
    }

    /// Draw `shots` full-register samples without collapsing the state.
    pub fn sample_counts(&mut self, shots: u32) -> Counts {
        measure::sample_counts(self, shots)
    }

    pub(crate) fn validate_qubit(&self, qubit: usize, operation: &str) -> SimResult<()> {
        if qubit >= self.num_qubits {
            return Err(SimError::out_of_range(qubit, self.num_qubits, operation));
        }
        Ok(())
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    pub(crate) fn state_and_rng(&mut self) -> (&mut [Complex64], &mut StdRng) {
        (self.amplitudes.as_mut_slice(), &mut self.rng)
    }

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub(crate) fn parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    /// Post-condition check run after every gate and collapse.
    pub(crate) fn verify_normalized(&self, operation: impl FnOnce() -> String) -> SimResult<()> {
        if !self.check_normalization {
            return Ok(());
        }
        let total = self.total_probability();
        // A NaN total compares false and must fail too.
        let within = (total - 1.0).abs() <= self.tolerance;
        if !within {
            return Err(SimError::NormalizationViolation {
                operation: operation(),
                total,
            });
        }
        Ok(())
    }
}

impl fmt::Display for QuantumRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quantum state ({} qubits):", self.num_qubits)?;
        for (index, amp) in self.amplitudes.iter().enumerate() {
            let prob = amp.norm_sqr();
            if prob > DISPLAY_CUTOFF {
                writeln!(
                    f,
                    "  {}: {:.4}{:+.4}i (p = {:.4})",
                    self.basis_label(index),
                    amp.re,
                    amp.im,
                    prob
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_QUBITS;

    #[test]
    fn test_initial_state() {
        let reg = QuantumRegister::new(3, Some(1)).unwrap();
        assert_eq!(reg.dimension(), 8);
        let probs = reg.probabilities();
        assert_eq!(probs[0], 1.0);
        assert!(probs[1..].iter().all(|&p| p == 0.0));
        assert!(reg.is_normalized());
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert!(matches!(
            QuantumRegister::new(0, None),
            Err(SimError::Capacity { requested: 0, .. })
        ));
    }

    #[test]
    fn test_oversized_register_rejected() {
        assert!(matches!(
            QuantumRegister::new(MAX_QUBITS + 1, None),
            Err(SimError::Capacity { max: MAX_QUBITS, .. })
        ));
    }

    #[test]
    fn test_config_limit_applies() {
        let config = SimConfig::default().with_max_qubits(4);
        assert!(QuantumRegister::with_config(4, &config).is_ok());
        assert!(matches!(
            QuantumRegister::with_config(5, &config),
            Err(SimError::Capacity {
                requested: 5,
                max: 4
            })
        ));
    }

    #[test]
    fn test_basis_label_puts_highest_qubit_first() {
        let reg = QuantumRegister::new(3, None).unwrap();
        assert_eq!(reg.basis_label(1), "|001⟩");
        assert_eq!(reg.basis_label(6), "|110⟩");
    }

    #[test]
    fn test_reset_restores_ground_state() {
        let mut reg = QuantumRegister::new(2, Some(3)).unwrap();
        reg.apply(&GateSpec::Hadamard { target: 1 }).unwrap();
        reg.reset();
        assert_eq!(reg.probability(0), 1.0);
        assert_eq!(reg.probability(2), 0.0);
    }

    #[test]
    fn test_non_finite_state_fails_normalization_check() {
        let mut reg = QuantumRegister::new(1, None).unwrap();
        reg.amplitudes_mut()[0] = Complex64::new(f64::NAN, 0.0);
        assert!(matches!(
            reg.verify_normalized(|| "corrupt".into()),
            Err(SimError::NormalizationViolation { total, .. }) if total.is_nan()
        ));
    }

    #[test]
    fn test_display_skips_zero_amplitudes() {
        let mut reg = QuantumRegister::new(2, None).unwrap();
        reg.apply(&GateSpec::PauliX { target: 1 }).unwrap();
        let dump = reg.to_string();
        assert!(dump.contains("|10⟩: 1.0000+0.0000i (p = 1.0000)"));
        assert!(!dump.contains("|00⟩"));
    }
}
