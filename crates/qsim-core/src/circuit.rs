//! Ordered gate sequences.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{SimError, SimResult};
use crate::gate::GateSpec;
use crate::register::QuantumRegister;

/// A named, fixed-width list of gates applied front to back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    num_qubits: usize,
    #[serde(default)]
    gates: Vec<GateSpec>,
}

impl Circuit {
    /// Create an empty circuit over `num_qubits` qubits.
    pub fn new(name: impl Into<String>, num_qubits: usize) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gates: Vec::new(),
        }
    }

    /// Circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Width of the circuit.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The gate sequence.
    pub fn gates(&self) -> &[GateSpec] {
        &self.gates
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Append a gate after checking it against the circuit width.
    pub fn push(&mut self, gate: GateSpec) -> SimResult<&mut Self> {
        gate.validate(self.num_qubits)?;
        self.gates.push(gate);
        Ok(self)
    }

    /// Hadamard.
    pub fn h(&mut self, target: usize) -> SimResult<&mut Self> {
        self.push(GateSpec::Hadamard { target })
    }

    /// Pauli-X.
    pub fn x(&mut self, target: usize) -> SimResult<&mut Self> {
        self.push(GateSpec::PauliX { target })
    }

    /// Pauli-Y.
    pub fn y(&mut self, target: usize) -> SimResult<&mut Self> {
        self.push(GateSpec::PauliY { target })
    }

    /// Pauli-Z.
    pub fn z(&mut self, target: usize) -> SimResult<&mut Self> {
        self.push(GateSpec::PauliZ { target })
    }

    /// CNOT.
    pub fn cx(&mut self, control: usize, target: usize) -> SimResult<&mut Self> {
        self.push(GateSpec::Cnot { control, target })
    }

    /// RY rotation.
    pub fn ry(&mut self, angle: f64, target: usize) -> SimResult<&mut Self> {
        self.push(GateSpec::RotationY { target, angle })
    }

    /// SWAP.
    pub fn swap(&mut self, a: usize, b: usize) -> SimResult<&mut Self> {
        self.push(GateSpec::Swap { a, b })
    }

    /// Check every gate against the declared width.
    ///
    /// Circuits built through the builder methods are always valid; this is
    /// for circuits that arrive deserialized.
    pub fn validate(&self) -> SimResult<()> {
        if self.num_qubits == 0 {
            return Err(SimError::Capacity {
                requested: 0,
                max: crate::config::MAX_QUBITS,
            });
        }
        self.gates
            .iter()
            .try_for_each(|gate| gate.validate(self.num_qubits))
    }

    /// Apply every gate to `register` in order.
    ///
    /// Stops at the first failing gate; gates before it stay applied.
    #[instrument(skip(self, register), fields(circuit = %self.name, gates = self.gates.len()))]
    pub fn run(&self, register: &mut QuantumRegister) -> SimResult<()> {
        for (step, gate) in self.gates.iter().enumerate() {
            if let Err(e) = register.apply(gate) {
                debug!(step, %gate, "circuit aborted");
                return Err(e);
            }
        }
        debug!("circuit completed");
        Ok(())
    }

    /// Run on a fresh register sized to the circuit and return it.
    pub fn simulate(&self, seed: Option<u64>) -> SimResult<QuantumRegister> {
        let mut register = QuantumRegister::new(self.num_qubits, seed)?;
        self.run(&mut register)?;
        Ok(register)
    }

    /// Bell pair: H on qubit 0, then CNOT(0 → 1).
    pub fn bell() -> SimResult<Self> {
        let mut circuit = Self::new("bell", 2);
        circuit.h(0)?.cx(0, 1)?;
        Ok(circuit)
    }

    /// n-qubit GHZ state: H on qubit 0 followed by a CNOT chain.
    pub fn ghz(n: usize) -> SimResult<Self> {
        let mut circuit = Self::new("ghz", n);
        circuit.h(0)?;
        for i in 0..n.saturating_sub(1) {
            circuit.cx(i, i + 1)?;
        }
        Ok(circuit)
    }
}
