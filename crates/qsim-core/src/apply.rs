//! Gate kernels.
//!
//! Single-qubit gates walk the statevector in blocks of `2 * stride`, with
//! `stride = 1 << target`, and combine the amplitude pairs `(i, i + stride)`
//! inside each block. Two-qubit gates enumerate the 2^(n-2) base indices with
//! both operand bits clear and touch each affected pair exactly once.
//!
//! Every public function validates its qubit operands before writing, so an
//! `InvalidQubitIndex` error leaves the register untouched.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;
use tracing::trace;

use crate::error::{SimError, SimResult};
use crate::gate::{GateSpec, check_angle};
use crate::register::QuantumRegister;

/// Apply `gate` to `register` in place.
pub fn apply_gate(register: &mut QuantumRegister, gate: &GateSpec) -> SimResult<()> {
    match *gate {
        GateSpec::Hadamard { target } => apply_hadamard(register, target),
        GateSpec::PauliX { target } => apply_pauli_x(register, target),
        GateSpec::PauliY { target } => apply_pauli_y(register, target),
        GateSpec::PauliZ { target } => apply_pauli_z(register, target),
        GateSpec::Cnot { control, target } => apply_cnot(register, control, target),
        GateSpec::RotationY { target, angle } => apply_rotation_y(register, target, angle),
        GateSpec::Swap { a, b } => apply_swap(register, a, b),
    }
}

// =========================================================================
// Single-qubit gates
// =========================================================================

/// H: `(a, b) -> ((a + b)/√2, (a − b)/√2)`.
pub fn apply_hadamard(register: &mut QuantumRegister, target: usize) -> SimResult<()> {
    register.validate_qubit(target, "h")?;
    trace!(target, "h");
    for_each_pair(register, target, |a, b| {
        let (x, y) = (*a, *b);
        *a = (x + y) * FRAC_1_SQRT_2;
        *b = (x - y) * FRAC_1_SQRT_2;
    });
    register.verify_normalized(|| format!("h q{target}"))
}

/// X: swap each pair.
pub fn apply_pauli_x(register: &mut QuantumRegister, target: usize) -> SimResult<()> {
    register.validate_qubit(target, "x")?;
    trace!(target, "x");
    for_each_pair(register, target, std::mem::swap::<Complex64>);
    register.verify_normalized(|| format!("x q{target}"))
}

/// Y: `(a, b) -> (−i·b, i·a)`.
pub fn apply_pauli_y(register: &mut QuantumRegister, target: usize) -> SimResult<()> {
    register.validate_qubit(target, "y")?;
    trace!(target, "y");
    let i = Complex64::i();
    for_each_pair(register, target, |a, b| {
        let x = *a;
        *a = -i * *b;
        *b = i * x;
    });
    register.verify_normalized(|| format!("y q{target}"))
}

/// Z: negate the bit-1 branch.
pub fn apply_pauli_z(register: &mut QuantumRegister, target: usize) -> SimResult<()> {
    register.validate_qubit(target, "z")?;
    trace!(target, "z");
    for_each_pair(register, target, |_, b| *b = -*b);
    register.verify_normalized(|| format!("z q{target}"))
}

/// RY(angle): `(a, b) -> (cos θ·a − sin θ·b, sin θ·a + cos θ·b)` with `θ = angle/2`.
pub fn apply_rotation_y(register: &mut QuantumRegister, target: usize, angle: f64) -> SimResult<()> {
    register.validate_qubit(target, "ry")?;
    check_angle(angle)?;
    trace!(target, angle, "ry");
    let (s, c) = (angle / 2.0).sin_cos();
    for_each_pair(register, target, |a, b| {
        let (x, y) = (*a, *b);
        *a = c * x - s * y;
        *b = s * x + c * y;
    });
    register.verify_normalized(|| format!("ry({angle}) q{target}"))
}

// =========================================================================
// Two-qubit gates
// =========================================================================

/// CNOT: swap `|c=1, t=0⟩` with `|c=1, t=1⟩`, once per pair.
pub fn apply_cnot(register: &mut QuantumRegister, control: usize, target: usize) -> SimResult<()> {
    validate_pair(register, control, target, "cx")?;
    trace!(control, target, "cx");
    let ctrl_mask = 1_usize << control;
    let tgt_mask = 1_usize << target;
    let num_qubits = register.num_qubits();
    let amps = register.amplitudes_mut();
    for base in pair_bases(num_qubits, control, target) {
        let i = base | ctrl_mask;
        amps.swap(i, i | tgt_mask);
    }
    register.verify_normalized(|| format!("cx q{control}, q{target}"))
}

/// SWAP: exchange the `01` and `10` sub-blocks of qubits `a` and `b`.
pub fn apply_swap(register: &mut QuantumRegister, a: usize, b: usize) -> SimResult<()> {
    validate_pair(register, a, b, "swap")?;
    trace!(a, b, "swap");
    let mask_a = 1_usize << a;
    let mask_b = 1_usize << b;
    let num_qubits = register.num_qubits();
    let amps = register.amplitudes_mut();
    for base in pair_bases(num_qubits, a, b) {
        amps.swap(base | mask_a, base | mask_b);
    }
    register.verify_normalized(|| format!("swap q{a}, q{b}"))
}

fn validate_pair(register: &QuantumRegister, q0: usize, q1: usize, name: &str) -> SimResult<()> {
    register.validate_qubit(q0, name)?;
    register.validate_qubit(q1, name)?;
    if q0 == q1 {
        return Err(SimError::coincident(q1, register.num_qubits(), name));
    }
    Ok(())
}

// =========================================================================
// Index iteration
// =========================================================================

/// Run `f` on every `(bit=0, bit=1)` amplitude pair of `target`.
fn for_each_pair<F>(register: &mut QuantumRegister, target: usize, f: F)
where
    F: Fn(&mut Complex64, &mut Complex64) + Send + Sync,
{
    let stride = 1_usize << target;

    #[cfg(feature = "parallel")]
    if register.dimension() >= register.parallel_threshold() {
        use rayon::prelude::*;
        register
            .amplitudes_mut()
            .par_chunks_mut(2 * stride)
            .for_each(|block| {
                let (lo, hi) = block.split_at_mut(stride);
                lo.par_iter_mut()
                    .zip(hi.par_iter_mut())
                    .for_each(|(a, b)| f(a, b));
            });
        return;
    }
    for block in register.amplitudes_mut().chunks_exact_mut(2 * stride) {
        let (lo, hi) = block.split_at_mut(stride);
        for (a, b) in lo.iter_mut().zip(hi.iter_mut()) {
            f(a, b);
        }
    }
}

/// Insert a zero at bit position `bit`, shifting higher bits up by one.
#[inline]
fn insert_zero_bit(value: usize, bit: usize) -> usize {
    let low = value & ((1_usize << bit) - 1);
    ((value >> bit) << (bit + 1)) | low
}

/// All basis indices with bits `q0` and `q1` clear, in ascending order.
fn pair_bases(num_qubits: usize, q0: usize, q1: usize) -> impl Iterator<Item = usize> {
    let (lo, hi) = if q0 < q1 { (q0, q1) } else { (q1, q0) };
    (0..1_usize << (num_qubits - 2)).map(move |k| insert_zero_bit(insert_zero_bit(k, lo), hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    fn register(n: usize) -> QuantumRegister {
        QuantumRegister::new(n, Some(0)).unwrap()
    }

    #[test]
    fn test_insert_zero_bit() {
        assert_eq!(insert_zero_bit(0b11, 0), 0b110);
        assert_eq!(insert_zero_bit(0b11, 1), 0b101);
        assert_eq!(insert_zero_bit(0b11, 2), 0b011);
    }

    #[test]
    fn test_pair_bases_clear_both_bits() {
        let bases: Vec<_> = pair_bases(3, 2, 0).collect();
        assert_eq!(bases, vec![0b000, 0b010]);
        let bases: Vec<_> = pair_bases(4, 1, 3).collect();
        assert_eq!(bases, vec![0b0000, 0b0001, 0b0100, 0b0101]);
    }

    #[test]
    fn test_hadamard() {
        let mut reg = register(1);
        apply_hadamard(&mut reg, 0).unwrap();
        let amps = reg.amplitudes();
        assert!(approx_eq(amps[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(amps[1], Complex64::new(FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_x_gate_on_high_qubit() {
        let mut reg = register(3);
        apply_pauli_x(&mut reg, 2).unwrap();
        assert!(approx_eq(reg.amplitudes()[0b100], Complex64::new(1.0, 0.0)));
        assert_eq!(reg.probability(0), 0.0);
    }

    #[test]
    fn test_y_gate_phases() {
        let mut reg = register(1);
        apply_pauli_y(&mut reg, 0).unwrap();
        // Y|0⟩ = i|1⟩
        assert!(approx_eq(reg.amplitudes()[1], Complex64::new(0.0, 1.0)));
        apply_pauli_y(&mut reg, 0).unwrap();
        // Y² = I
        assert!(approx_eq(reg.amplitudes()[0], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_z_gate_leaves_zero_branch() {
        let mut reg = register(1);
        apply_hadamard(&mut reg, 0).unwrap();
        apply_pauli_z(&mut reg, 0).unwrap();
        assert!(approx_eq(reg.amplitudes()[0], Complex64::new(FRAC_1_SQRT_2, 0.0)));
        assert!(approx_eq(reg.amplitudes()[1], Complex64::new(-FRAC_1_SQRT_2, 0.0)));
    }

    #[test]
    fn test_rotation_y_pi_flips() {
        let mut reg = register(1);
        apply_rotation_y(&mut reg, 0, std::f64::consts::PI).unwrap();
        assert!(approx_eq(reg.amplitudes()[1], Complex64::new(1.0, 0.0)));
        assert!(reg.amplitudes()[0].norm() < 1e-10);
    }

    #[test]
    fn test_cnot_flips_target_exactly_once() {
        // |01⟩ (q0 = 1) -> |11⟩; a double swap would leave it unchanged.
        let mut reg = register(2);
        apply_pauli_x(&mut reg, 0).unwrap();
        apply_cnot(&mut reg, 0, 1).unwrap();
        assert!(approx_eq(reg.amplitudes()[0b11], Complex64::new(1.0, 0.0)));
        assert_eq!(reg.probability(0b01), 0.0);
    }

    #[test]
    fn test_cnot_control_clear_is_noop() {
        let mut reg = register(2);
        apply_pauli_x(&mut reg, 1).unwrap();
        apply_cnot(&mut reg, 0, 1).unwrap();
        assert!(approx_eq(reg.amplitudes()[0b10], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_cnot_reversed_operands() {
        // control above target
        let mut reg = register(3);
        apply_pauli_x(&mut reg, 2).unwrap();
        apply_cnot(&mut reg, 2, 0).unwrap();
        assert!(approx_eq(reg.amplitudes()[0b101], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_cnot_same_qubit_leaves_state() {
        let mut reg = register(2);
        apply_hadamard(&mut reg, 0).unwrap();
        let before = reg.amplitudes().to_vec();
        let err = apply_cnot(&mut reg, 1, 1).unwrap_err();
        assert!(matches!(err, SimError::InvalidQubitIndex { qubit: 1, .. }));
        assert_eq!(reg.amplitudes(), before.as_slice());
    }

    #[test]
    fn test_swap_moves_excitation() {
        let mut reg = register(3);
        apply_pauli_x(&mut reg, 0).unwrap();
        apply_swap(&mut reg, 0, 2).unwrap();
        assert!(approx_eq(reg.amplitudes()[0b100], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_swap_keeps_aligned_blocks() {
        let mut reg = register(2);
        apply_pauli_x(&mut reg, 0).unwrap();
        apply_pauli_x(&mut reg, 1).unwrap();
        apply_swap(&mut reg, 1, 0).unwrap();
        assert!(approx_eq(reg.amplitudes()[0b11], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_non_finite_angle_rejected_without_mutation() {
        let mut reg = register(2);
        apply_hadamard(&mut reg, 1).unwrap();
        let before = reg.amplitudes().to_vec();
        for angle in [f64::NAN, f64::INFINITY] {
            assert!(matches!(
                apply_rotation_y(&mut reg, 0, angle),
                Err(SimError::InvalidParameter { .. })
            ));
            assert_eq!(reg.amplitudes(), before.as_slice());
        }
        assert!(reg.measure(0).unwrap().probability.is_finite());
    }

    #[test]
    fn test_out_of_range_target_rejected() {
        let mut reg = register(2);
        let err = apply_gate(&mut reg, &GateSpec::PauliX { target: 2 }).unwrap_err();
        assert!(matches!(
            err,
            SimError::InvalidQubitIndex {
                qubit: 2,
                num_qubits: 2,
                ..
            }
        ));
        assert_eq!(reg.probability(0), 1.0);
    }
}
