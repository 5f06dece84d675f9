//! Single-qubit marginals: partial trace, Bloch vector and purity.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::gates::Matrix2;
use crate::state::QuantumState;
use crate::statevector::qubit_mask;

/// Pauli expectation values `(⟨X⟩, ⟨Y⟩, ⟨Z⟩)` of one qubit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlochCoords {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl BlochCoords {
    /// The `|0⟩` pole.
    pub const NORTH: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    /// `x² + y² + z²`.
    pub fn length_sqr(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
}

/// Reduced state of a single qubit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QubitState {
    /// Bloch vector.
    pub bloch_sphere_coords: BlochCoords,
    /// `Tr(ρ_q²)`, between 0.5 and 1.
    pub purity: f64,
}

impl QubitState {
    /// Derive coordinates and purity from a 2×2 reduced density matrix.
    pub fn from_reduced(rho: &Matrix2) -> Self {
        let p0 = rho[0][0].re;
        let p1 = rho[1][1].re;
        let coherence = rho[0][1];
        Self {
            bloch_sphere_coords: BlochCoords {
                x: 2.0 * coherence.re,
                y: -2.0 * coherence.im,
                z: p0 - p1,
            },
            purity: p0 * p0 + p1 * p1 + 2.0 * coherence.norm_sqr(),
        }
    }
}

/// Partial trace of `state` over every qubit except `qubit`.
///
/// Sums the 2×2 diagonal blocks indexed by the traced-out bits, reading the
/// amplitudes directly when the state is pure.
pub fn reduced_density(state: &QuantumState, qubit: usize) -> Matrix2 {
    let mask = qubit_mask(state.num_qubits(), qubit);
    let mut rho = [[Complex64::new(0.0, 0.0); 2]; 2];

    match state {
        QuantumState::Pure(sv) => {
            let amps = sv.amplitudes();
            for i in (0..amps.len()).filter(|i| i & mask == 0) {
                let a0 = amps[i];
                let a1 = amps[i | mask];
                rho[0][0] += a0 * a0.conj();
                rho[0][1] += a0 * a1.conj();
                rho[1][1] += a1 * a1.conj();
            }
            rho[1][0] = rho[0][1].conj();
        }
        QuantumState::Mixed(dm) => {
            let m = dm.matrix();
            for i in (0..m.nrows()).filter(|i| i & mask == 0) {
                let idx = [i, i | mask];
                for a in 0..2 {
                    for b in 0..2 {
                        rho[a][b] += m[[idx[a], idx[b]]];
                    }
                }
            }
        }
    }
    rho
}

/// Bloch coordinates and purity of `qubit`.
pub fn reduce(state: &QuantumState, qubit: usize) -> QubitState {
    QubitState::from_reduced(&reduced_density(state, qubit))
}
