//! Gate descriptors.
//!
//! The gate set is closed: [`GateSpec`] is a tagged enum and every consumer
//! dispatches on it with a single exhaustive `match`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SimError, SimResult};

/// Fieldless discriminant of [`GateSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKind {
    /// Hadamard.
    Hadamard,
    /// Pauli-X (NOT).
    PauliX,
    /// Pauli-Y.
    PauliY,
    /// Pauli-Z.
    PauliZ,
    /// Controlled-X.
    Cnot,
    /// Rotation around the Y axis.
    RotationY,
    /// SWAP.
    Swap,
}

impl GateKind {
    /// Every supported kind, in declaration order.
    pub const ALL: [GateKind; 7] = [
        GateKind::Hadamard,
        GateKind::PauliX,
        GateKind::PauliY,
        GateKind::PauliZ,
        GateKind::Cnot,
        GateKind::RotationY,
        GateKind::Swap,
    ];

    /// Canonical short name.
    pub fn name(self) -> &'static str {
        match self {
            GateKind::Hadamard => "h",
            GateKind::PauliX => "x",
            GateKind::PauliY => "y",
            GateKind::PauliZ => "z",
            GateKind::Cnot => "cx",
            GateKind::RotationY => "ry",
            GateKind::Swap => "swap",
        }
    }

    /// Number of qubits the gate acts on.
    pub fn num_qubits(self) -> usize {
        match self {
            GateKind::Cnot | GateKind::Swap => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "hadamard" => Ok(GateKind::Hadamard),
            "x" | "not" | "pauli_x" | "paulix" => Ok(GateKind::PauliX),
            "y" | "pauli_y" | "pauliy" => Ok(GateKind::PauliY),
            "z" | "pauli_z" | "pauliz" => Ok(GateKind::PauliZ),
            "cx" | "cnot" => Ok(GateKind::Cnot),
            "ry" | "rotation_y" | "rotationy" => Ok(GateKind::RotationY),
            "swap" => Ok(GateKind::Swap),
            _ => Err(SimError::UnsupportedGate(s.to_string())),
        }
    }
}

/// A gate bound to concrete qubits and parameters.
///
/// On disk a gate is a flat [`GateRecord`]; unknown names and missing
/// parameters surface as [`SimError::UnsupportedGate`] and
/// [`SimError::MissingParameter`] while deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GateRecord", into = "GateRecord")]
pub enum GateSpec {
    /// Hadamard on `target`.
    Hadamard {
        /// Target qubit.
        target: usize,
    },
    /// Pauli-X on `target`.
    PauliX {
        /// Target qubit.
        target: usize,
    },
    /// Pauli-Y on `target`.
    PauliY {
        /// Target qubit.
        target: usize,
    },
    /// Pauli-Z on `target`.
    PauliZ {
        /// Target qubit.
        target: usize,
    },
    /// Flip `target` where `control` is set.
    Cnot {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// RY(`angle`) on `target`.
    RotationY {
        /// Target qubit.
        target: usize,
        /// Rotation angle in radians.
        angle: f64,
    },
    /// Exchange the states of `a` and `b`.
    Swap {
        /// First qubit.
        a: usize,
        /// Second qubit.
        b: usize,
    },
}

/// Serialized form of a gate: a name plus the operands its kind may need.
///
/// For SWAP, `target` and `control` hold the two qubits and may also be
/// spelled `a` and `b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateRecord {
    /// Gate name or alias, e.g. `"cx"` or `"cnot"`.
    pub gate: String,
    /// Target qubit (first qubit of a SWAP).
    #[serde(alias = "a")]
    pub target: usize,
    /// Control qubit of a CNOT, second qubit of a SWAP.
    #[serde(default, alias = "b", skip_serializing_if = "Option::is_none")]
    pub control: Option<usize>,
    /// RY angle in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

impl TryFrom<GateRecord> for GateSpec {
    type Error = SimError;

    fn try_from(record: GateRecord) -> SimResult<Self> {
        let kind: GateKind = record.gate.parse()?;
        GateSpec::from_parts(kind, record.target, record.control, record.angle)
    }
}

impl From<GateSpec> for GateRecord {
    fn from(spec: GateSpec) -> Self {
        let (target, control, angle) = match spec {
            GateSpec::Hadamard { target }
            | GateSpec::PauliX { target }
            | GateSpec::PauliY { target }
            | GateSpec::PauliZ { target } => (target, None, None),
            GateSpec::Cnot { control, target } => (target, Some(control), None),
            GateSpec::RotationY { target, angle } => (target, None, Some(angle)),
            GateSpec::Swap { a, b } => (a, Some(b), None),
        };
        GateRecord {
            gate: spec.kind().name().to_string(),
            target,
            control,
            angle,
        }
    }
}

impl GateSpec {
    /// Build a spec from its record form.
    ///
    /// `control` carries the second operand for two-qubit gates (the control
    /// of a CNOT, the partner of a SWAP); `angle` is only read for RY.
    pub fn from_parts(
        kind: GateKind,
        target: usize,
        control: Option<usize>,
        angle: Option<f64>,
    ) -> SimResult<Self> {
        let spec = match kind {
            GateKind::Hadamard => GateSpec::Hadamard { target },
            GateKind::PauliX => GateSpec::PauliX { target },
            GateKind::PauliY => GateSpec::PauliY { target },
            GateKind::PauliZ => GateSpec::PauliZ { target },
            GateKind::Cnot => GateSpec::Cnot {
                control: control.ok_or(SimError::MissingParameter {
                    gate: "cx",
                    parameter: "control qubit",
                })?,
                target,
            },
            GateKind::RotationY => GateSpec::RotationY {
                target,
                angle: angle.ok_or(SimError::MissingParameter {
                    gate: "ry",
                    parameter: "rotation angle",
                })?,
            },
            GateKind::Swap => GateSpec::Swap {
                a: target,
                b: control.ok_or(SimError::MissingParameter {
                    gate: "swap",
                    parameter: "second qubit",
                })?,
            },
        };
        Ok(spec)
    }

    /// The gate's kind.
    pub fn kind(&self) -> GateKind {
        match self {
            GateSpec::Hadamard { .. } => GateKind::Hadamard,
            GateSpec::PauliX { .. } => GateKind::PauliX,
            GateSpec::PauliY { .. } => GateKind::PauliY,
            GateSpec::PauliZ { .. } => GateKind::PauliZ,
            GateSpec::Cnot { .. } => GateKind::Cnot,
            GateSpec::RotationY { .. } => GateKind::RotationY,
            GateSpec::Swap { .. } => GateKind::Swap,
        }
    }

    /// Qubits touched by the gate, first operand first.
    pub fn qubits(&self) -> (usize, Option<usize>) {
        match *self {
            GateSpec::Hadamard { target }
            | GateSpec::PauliX { target }
            | GateSpec::PauliY { target }
            | GateSpec::PauliZ { target }
            | GateSpec::RotationY { target, .. } => (target, None),
            GateSpec::Cnot { control, target } => (control, Some(target)),
            GateSpec::Swap { a, b } => (a, Some(b)),
        }
    }

    /// Largest qubit index referenced.
    pub fn max_qubit(&self) -> usize {
        let (first, second) = self.qubits();
        second.map_or(first, |s| s.max(first))
    }

    /// Check the gate against a register of `num_qubits` qubits.
    pub fn validate(&self, num_qubits: usize) -> SimResult<()> {
        let name = self.kind().name();
        let (first, second) = self.qubits();
        if first >= num_qubits {
            return Err(SimError::out_of_range(first, num_qubits, name));
        }
        if let Some(second) = second {
            if second >= num_qubits {
                return Err(SimError::out_of_range(second, num_qubits, name));
            }
            if second == first {
                return Err(SimError::coincident(second, num_qubits, name));
            }
        }
        if let GateSpec::RotationY { angle, .. } = *self {
            check_angle(angle)?;
        }
        Ok(())
    }
}

/// Reject NaN and infinite rotation angles.
pub(crate) fn check_angle(angle: f64) -> SimResult<()> {
    if angle.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidParameter {
            gate: "ry",
            parameter: "rotation angle",
            value: angle,
        })
    }
}

impl fmt::Display for GateSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            GateSpec::RotationY { target, angle } => write!(f, "ry({angle}) q{target}"),
            _ => match self.qubits() {
                (q, None) => write!(f, "{} q{q}", self.kind()),
                (q0, Some(q1)) => write!(f, "{} q{q0}, q{q1}", self.kind()),
            },
        }
    }
}
