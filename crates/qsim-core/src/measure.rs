//! Projective measurement in the computational basis.
//!
//! A single-qubit measurement first sums the probability mass of the
//! `bit = 0` branch over the whole vector, then draws one uniform sample,
//! zeroes the branch that was not observed and rescales the survivors.
//! Branch masses within the register tolerance of 0 or 1 are resolved
//! without drawing, so a collapsed qubit always re-measures to the same bit.

use num_complex::Complex64;
use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimResult;
use crate::register::QuantumRegister;

/// Result of measuring one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    /// The measured qubit.
    pub qubit: usize,
    /// Observed bit, 0 or 1.
    pub bit: u8,
    /// Probability the observed branch had before collapse.
    pub probability: f64,
}

impl MeasurementOutcome {
    /// Whether the qubit was found in |1⟩.
    pub fn is_one(&self) -> bool {
        self.bit == 1
    }
}

/// Measure `qubit` using the register's own RNG stream.
pub fn measure(register: &mut QuantumRegister, qubit: usize) -> SimResult<MeasurementOutcome> {
    register.validate_qubit(qubit, "measure")?;
    let tolerance = register.tolerance();
    let (amps, rng) = register.state_and_rng();
    let outcome = collapse(amps, qubit, tolerance, || rng.r#gen::<f64>());
    finish(register, outcome)
}

/// Measure `qubit` drawing from a caller-supplied RNG.
pub fn measure_with_rng<R: Rng + ?Sized>(
    register: &mut QuantumRegister,
    qubit: usize,
    rng: &mut R,
) -> SimResult<MeasurementOutcome> {
    register.validate_qubit(qubit, "measure")?;
    let tolerance = register.tolerance();
    let outcome = collapse(register.amplitudes_mut(), qubit, tolerance, || {
        rng.r#gen::<f64>()
    });
    finish(register, outcome)
}

/// Measure qubits `0..n` in order and return the resulting basis index.
pub fn measure_all(register: &mut QuantumRegister) -> SimResult<usize> {
    let mut index = 0_usize;
    for qubit in 0..register.num_qubits() {
        if measure(register, qubit)?.is_one() {
            index |= 1 << qubit;
        }
    }
    Ok(index)
}

/// Marginal probability of reading `0` on `qubit`.
pub fn probability_of_zero(register: &QuantumRegister, qubit: usize) -> SimResult<f64> {
    register.validate_qubit(qubit, "probability")?;
    Ok(branch_zero_mass(register.amplitudes(), 1 << qubit))
}

/// Histogram of measured basis states, keyed by ket bitstring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    counts: FxHashMap<String, u64>,
}

impl Counts {
    /// Create an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` observations of `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, n: u64) {
        *self.counts.entry(bitstring.into()).or_insert(0) += n;
    }

    /// Observations of `bitstring`, zero if never seen.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Total number of observations.
    pub fn total_shots(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Outcomes sorted by descending count, ties by bitstring.
    pub fn sorted(&self) -> Vec<(&String, &u64)> {
        let mut v: Vec<_> = self.counts.iter().collect();
        v.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        v
    }
}

/// Sample `shots` full basis states from the current distribution.
///
/// The register is not collapsed; only its RNG stream advances.
pub fn sample_counts(register: &mut QuantumRegister, shots: u32) -> Counts {
    let width = register.num_qubits();
    let (amps, rng) = register.state_and_rng();
    let mut counts = Counts::new();
    for _ in 0..shots {
        let index = sample_index(amps, rng.r#gen::<f64>());
        counts.insert(format!("{index:0width$b}"), 1);
    }
    debug!(shots, outcomes = counts.len(), "sampled register");
    counts
}

fn sample_index(amps: &[Complex64], r: f64) -> usize {
    let mut cumulative = 0.0;
    let mut last_nonzero = 0;
    for (i, amp) in amps.iter().enumerate() {
        let p = amp.norm_sqr();
        if p > 0.0 {
            last_nonzero = i;
        }
        cumulative += p;
        if r < cumulative {
            return i;
        }
    }
    // Rounding left `cumulative` just under one.
    last_nonzero
}

fn branch_zero_mass(amps: &[Complex64], mask: usize) -> f64 {
    amps.iter()
        .enumerate()
        .filter(|(i, _)| i & mask == 0)
        .map(|(_, a)| a.norm_sqr())
        .sum()
}

/// Decide the outcome and project the statevector onto it.
fn collapse(
    amps: &mut [Complex64],
    qubit: usize,
    tolerance: f64,
    draw: impl FnOnce() -> f64,
) -> MeasurementOutcome {
    let mask = 1_usize << qubit;
    let prob0 = branch_zero_mass(amps, mask);

    let bit = if prob0 <= tolerance {
        1
    } else if prob0 >= 1.0 - tolerance {
        0
    } else if draw() < prob0 {
        0
    } else {
        1
    };

    let (keep_set, probability) = if bit == 0 {
        (false, prob0)
    } else {
        (true, 1.0 - prob0)
    };
    let scale = 1.0 / probability.sqrt();
    let zero = Complex64::new(0.0, 0.0);
    for (i, amp) in amps.iter_mut().enumerate() {
        if (i & mask != 0) == keep_set {
            *amp *= scale;
        } else {
            *amp = zero;
        }
    }

    MeasurementOutcome {
        qubit,
        bit,
        probability,
    }
}

fn finish(
    register: &QuantumRegister,
    outcome: MeasurementOutcome,
) -> SimResult<MeasurementOutcome> {
    debug!(
        qubit = outcome.qubit,
        bit = outcome.bit,
        probability = outcome.probability,
        "measured"
    );
    register.verify_normalized(|| format!("measure q{}", outcome.qubit))?;
    Ok(outcome)
}
