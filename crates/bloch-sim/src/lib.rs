//! `bloch-sim`: exact simulation of small circuits, with optional noise.
//!
//! A circuit from [`bloch_ir`] is linearized and folded through the state
//! engine one primitive operation at a time. The state starts as an
//! amplitude vector and becomes a density matrix the first time a noise
//! channel is applied. The result reports outcome probabilities and, for
//! every qubit, the Bloch vector and purity of its reduced state.
//!
//! # Quick start
//!
//! ```rust
//! use bloch_ir::{Circuit, NoiseModel};
//! use bloch_sim::{SimulationRequest, Simulator};
//!
//! let request = SimulationRequest::from_circuit(&Circuit::bell());
//! let result = Simulator::default().simulate(&request).unwrap();
//!
//! assert!((result.probability("|00⟩") - 0.5).abs() < 1e-9);
//! assert!((result.probability("|11⟩") - 0.5).abs() < 1e-9);
//! // Each half of a Bell pair is maximally mixed.
//! assert!((result.qubit_states[0].purity - 0.5).abs() < 1e-9);
//!
//! // With noise the engine switches to a density matrix.
//! let noisy = request.with_noise(NoiseModel::new(0.1, 0.05));
//! let result = Simulator::default().simulate(&noisy).unwrap();
//! assert!((result.trace - 1.0).abs() < 1e-9);
//! ```
//!
//! # Memory
//!
//! | Qubits | Statevector | Density matrix |
//! |--------|-------------|----------------|
//! | 8 | 4 KB | 1 MB |
//! | 12 | 64 KB | 256 MB |
//! | 16 | 1 MB | 64 GB |
//!
//! The defaults in [`SimConfig`] cap noisy runs at 12 qubits.

pub mod density;
pub mod error;
pub mod gates;
pub mod reduced;
pub mod simulator;
pub mod state;
pub mod statevector;
pub mod worker;

pub use density::DensityMatrix;
pub use error::{SimError, SimResult};
pub use reduced::{BlochCoords, QubitState, reduce, reduced_density};
pub use simulator::{
    ProbabilityEntry, SimConfig, SimulationRequest, SimulationResult, Simulator, basis_label,
    simulate,
};
pub use state::QuantumState;
pub use statevector::Statevector;
pub use worker::{PendingSimulation, RequestId, SimulationWorker};
