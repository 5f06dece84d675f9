//! The evolving quantum state and the operations that advance it.

use tracing::trace;

use bloch_ir::{GateId, IrError, NoiseModel, PrimitiveOp};

use crate::density::DensityMatrix;
use crate::error::{SimError, SimResult};
use crate::gates;
use crate::statevector::Statevector;

/// Pure or mixed representation of an `n`-qubit state.
///
/// A run starts in [`QuantumState::Pure`] and moves to
/// [`QuantumState::Mixed`] the first time a noise channel is applied. It
/// never moves back.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantumState {
    /// Amplitude vector.
    Pure(Statevector),
    /// Density matrix.
    Mixed(DensityMatrix),
}

impl QuantumState {
    /// The pure state `|0…0⟩`.
    pub fn zero(num_qubits: usize) -> Self {
        QuantumState::Pure(Statevector::new(num_qubits))
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        match self {
            QuantumState::Pure(sv) => sv.num_qubits(),
            QuantumState::Mixed(dm) => dm.num_qubits(),
        }
    }

    /// Check if the state is still held as an amplitude vector.
    pub fn is_pure(&self) -> bool {
        matches!(self, QuantumState::Pure(_))
    }

    /// Return the state after applying `op`. `self` is left untouched.
    ///
    /// `measure` is inert. Errors in the operation itself (bad angle, qubit
    /// out of range) are recoverable: the caller may skip the op and keep
    /// going with the unchanged state.
    pub fn apply(&self, op: &PrimitiveOp) -> SimResult<QuantumState> {
        let mut next = self.clone();
        next.apply_in_place(op)?;
        Ok(next)
    }

    fn apply_in_place(&mut self, op: &PrimitiveOp) -> SimResult<()> {
        let num_qubits = self.num_qubits();
        for qubit in op.qubits() {
            if qubit >= num_qubits {
                return Err(IrError::InvalidQubitIndex {
                    qubit: i64::try_from(qubit).unwrap_or(i64::MAX),
                    num_qubits,
                    gate_name: Some(op.gate.name().to_string()),
                }
                .into());
            }
        }

        trace!(gate = %op.gate, target = op.target, control = ?op.control, "apply");

        match (op.gate, op.control) {
            (GateId::Measure, _) => {}
            (GateId::Cnot, Some(control)) => match self {
                QuantumState::Pure(sv) => sv.apply_cnot(control, op.target),
                QuantumState::Mixed(dm) => dm.apply_cnot(control, op.target),
            },
            (GateId::Cz, Some(control)) => match self {
                QuantumState::Pure(sv) => sv.apply_cz(control, op.target),
                QuantumState::Mixed(dm) => dm.apply_cz(control, op.target),
            },
            (GateId::Swap, Some(other)) => match self {
                QuantumState::Pure(sv) => sv.apply_swap(op.target, other),
                QuantumState::Mixed(dm) => dm.apply_swap(op.target, other),
            },
            (GateId::Cnot | GateId::Cz | GateId::Swap, None) => {
                return Err(IrError::InvalidQubitIndex {
                    qubit: -1,
                    num_qubits,
                    gate_name: Some(op.gate.name().to_string()),
                }
                .into());
            }
            _ => {
                let matrix = gates::matrix_for(op)?;
                match self {
                    QuantumState::Pure(sv) => sv.apply_single(&matrix, op.target),
                    QuantumState::Mixed(dm) => dm.apply_kraus(&[matrix], op.target),
                }
            }
        }
        Ok(())
    }

    /// Return the state after applying both noise channels to each of
    /// `qubits`: depolarizing first, then phase damping.
    ///
    /// A noiseless model returns an unchanged copy, so a pure state stays
    /// pure.
    pub fn apply_noise(&self, qubits: &[usize], noise: &NoiseModel) -> QuantumState {
        if noise.is_noiseless() {
            return self.clone();
        }
        let mut dm = self.density_matrix();
        for &qubit in qubits {
            dm.depolarize(qubit, noise.depolarizing);
            dm.phase_damp(qubit, noise.phase_damping);
        }
        QuantumState::Mixed(dm)
    }

    /// The same state as a density matrix.
    pub fn to_mixed(&self) -> QuantumState {
        QuantumState::Mixed(self.density_matrix())
    }

    fn density_matrix(&self) -> DensityMatrix {
        match self {
            QuantumState::Pure(sv) => DensityMatrix::from_statevector(sv),
            QuantumState::Mixed(dm) => dm.clone(),
        }
    }

    /// Outcome probabilities in basis-index order.
    pub fn probabilities(&self) -> Vec<f64> {
        match self {
            QuantumState::Pure(sv) => sv.probabilities(),
            QuantumState::Mixed(dm) => dm.probabilities(),
        }
    }

    /// `Σ|amp|²` or `Tr(ρ)`.
    pub fn trace(&self) -> f64 {
        match self {
            QuantumState::Pure(sv) => sv.norm_sqr(),
            QuantumState::Mixed(dm) => dm.trace(),
        }
    }

    /// Global purity `Tr(ρ²)`.
    pub fn purity(&self) -> f64 {
        match self {
            QuantumState::Pure(sv) => sv.norm_sqr().powi(2),
            QuantumState::Mixed(dm) => dm.purity(),
        }
    }

    /// Fail with [`SimError::NumericDriftExceeded`] if the norm or trace has
    /// drifted from 1, or a density matrix is no longer Hermitian.
    pub fn check_invariants(&self, tolerance: f64) -> SimResult<()> {
        let quantity = if self.is_pure() { "norm" } else { "trace" };
        let deviation = (self.trace() - 1.0).abs();
        if deviation.is_nan() || deviation > tolerance {
            return Err(SimError::NumericDriftExceeded {
                quantity,
                deviation,
                tolerance,
            });
        }

        if let QuantumState::Mixed(dm) = self {
            let deviation = dm.hermiticity_error();
            if deviation.is_nan() || deviation > tolerance {
                return Err(SimError::NumericDriftExceeded {
                    quantity: "hermiticity",
                    deviation,
                    tolerance,
                });
            }
        }
        Ok(())
    }
}
