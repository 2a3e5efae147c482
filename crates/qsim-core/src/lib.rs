//! `qsim-core` — statevector quantum register simulation.
//!
//! An n-qubit register is a single contiguous buffer of 2^n complex
//! amplitudes. Gates rewrite it in place by stride iteration over amplitude
//! pairs; measurement samples one qubit, collapses the vector and
//! renormalizes it.
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 20 | ~16 MB |
//! | 25 | ~512 MB |
//! | 30 | ~16 GB |
//!
//! # Quick start
//!
//! ```rust
//! use qsim_core::{Circuit, QuantumRegister};
//!
//! let mut register = QuantumRegister::new(2, Some(42)).unwrap();
//! Circuit::bell().unwrap().run(&mut register).unwrap();
//!
//! let probs = register.probabilities();
//! assert!((probs[0b00] - 0.5).abs() < 1e-9);
//! assert!((probs[0b11] - 0.5).abs() < 1e-9);
//!
//! // Bell pairs are perfectly correlated.
//! let a = register.measure(0).unwrap();
//! let b = register.measure(1).unwrap();
//! assert_eq!(a.bit, b.bit);
//! ```
//!
//! # Features
//!
//! - `parallel`: split single-qubit kernels across a rayon thread pool for
//!   registers above [`SimConfig::parallel_threshold`] amplitudes.

pub mod apply;
pub mod circuit;
pub mod config;
pub mod error;
pub mod gate;
pub mod measure;
pub mod register;

pub use circuit::Circuit;
pub use config::{MAX_QUBITS, SimConfig};
pub use error::{SimError, SimResult};
pub use gate::{GateKind, GateRecord, GateSpec};
pub use measure::{Counts, MeasurementOutcome, measure_with_rng};
pub use register::QuantumRegister;
