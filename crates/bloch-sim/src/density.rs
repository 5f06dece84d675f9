//! Density-matrix kernels and single-qubit noise channels.
//!
//! Every operation acts on one or two qubits, so instead of building
//! `2^n × 2^n` operators the kernels walk the matrix in 2×2 blocks that
//! differ only in the affected bit of the row and column index.

use ndarray::Array2;
use num_complex::Complex64;

use crate::gates::{self, Matrix2};
use crate::statevector::{Statevector, qubit_mask};

/// A mixed state: Hermitian, unit-trace `2^n × 2^n` matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityMatrix {
    rho: Array2<Complex64>,
    num_qubits: usize,
}

impl DensityMatrix {
    /// Create `|0…0⟩⟨0…0|`.
    pub fn new(num_qubits: usize) -> Self {
        let dim = 1 << num_qubits;
        let mut rho = Array2::<Complex64>::zeros((dim, dim));
        rho[[0, 0]] = Complex64::new(1.0, 0.0);
        Self { rho, num_qubits }
    }

    /// Create `|ψ⟩⟨ψ|` from a pure state.
    pub fn from_statevector(sv: &Statevector) -> Self {
        let amps = sv.amplitudes();
        let dim = amps.len();
        let rho = Array2::from_shape_fn((dim, dim), |(i, j)| amps[i] * amps[j].conj());
        Self {
            rho,
            num_qubits: sv.num_qubits(),
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The underlying matrix.
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.rho
    }

    /// `Tr(ρ)`, real part.
    pub fn trace(&self) -> f64 {
        self.rho.diag().iter().map(|c| c.re).sum()
    }

    /// `Tr(ρ²)`.
    pub fn purity(&self) -> f64 {
        // ρ is Hermitian, so Tr(ρ²) = Σ |ρ_ij|²
        self.rho.iter().map(Complex64::norm_sqr).sum()
    }

    /// Outcome probabilities `Re(ρ_ii)` in basis-index order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.rho.diag().iter().map(|c| c.re).collect()
    }

    /// Largest `|ρ_ij − conj(ρ_ji)|`.
    pub fn hermiticity_error(&self) -> f64 {
        let dim = self.rho.nrows();
        let mut worst = 0.0_f64;
        for i in 0..dim {
            for j in i..dim {
                worst = worst.max((self.rho[[i, j]] - self.rho[[j, i]].conj()).norm());
            }
        }
        worst
    }

    // =========================================================================
    // Block kernels
    // =========================================================================

    /// Replace `ρ` with `Σ_k K_k ρ K_k†` for operators acting on `qubit`.
    ///
    /// A single operator that is unitary gives `U ρ U†`.
    pub(crate) fn apply_kraus(&mut self, ops: &[Matrix2], qubit: usize) {
        let mask = qubit_mask(self.num_qubits, qubit);
        let dim = self.rho.nrows();
        let daggers: Vec<Matrix2> = ops.iter().map(gates::dagger).collect();

        for r0 in (0..dim).filter(|r| r & mask == 0) {
            let rows = [r0, r0 | mask];
            for c0 in (0..dim).filter(|c| c & mask == 0) {
                let cols = [c0, c0 | mask];
                let block: Matrix2 = [
                    [self.rho[[rows[0], cols[0]]], self.rho[[rows[0], cols[1]]]],
                    [self.rho[[rows[1], cols[0]]], self.rho[[rows[1], cols[1]]]],
                ];

                let mut out = [[Complex64::new(0.0, 0.0); 2]; 2];
                for (k, k_dag) in ops.iter().zip(&daggers) {
                    let term = gates::mul(&gates::mul(k, &block), k_dag);
                    for a in 0..2 {
                        for b in 0..2 {
                            out[a][b] += term[a][b];
                        }
                    }
                }

                for a in 0..2 {
                    for b in 0..2 {
                        self.rho[[rows[a], cols[b]]] = out[a][b];
                    }
                }
            }
        }
    }

    /// Apply an involutive basis permutation `P` as `P ρ P`.
    fn permute(&mut self, perm: impl Fn(usize) -> usize) {
        let dim = self.rho.nrows();
        for i in 0..dim {
            let p = perm(i);
            if i < p {
                for k in 0..dim {
                    self.rho.swap([i, k], [p, k]);
                }
            }
        }
        for j in 0..dim {
            let p = perm(j);
            if j < p {
                for k in 0..dim {
                    self.rho.swap([k, j], [k, p]);
                }
            }
        }
    }

    pub(crate) fn apply_cnot(&mut self, control: usize, target: usize) {
        let ctrl_mask = qubit_mask(self.num_qubits, control);
        let tgt_mask = qubit_mask(self.num_qubits, target);
        self.permute(|i| if i & ctrl_mask != 0 { i ^ tgt_mask } else { i });
    }

    pub(crate) fn apply_cz(&mut self, control: usize, target: usize) {
        let both = qubit_mask(self.num_qubits, control) | qubit_mask(self.num_qubits, target);
        let sign = |i: usize| i & both == both;
        for ((i, j), value) in self.rho.indexed_iter_mut() {
            if sign(i) != sign(j) {
                *value = -*value;
            }
        }
    }

    pub(crate) fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = qubit_mask(self.num_qubits, q1);
        let mask2 = qubit_mask(self.num_qubits, q2);
        self.permute(|i| {
            let b1 = i & mask1 != 0;
            let b2 = i & mask2 != 0;
            if b1 == b2 { i } else { i ^ mask1 ^ mask2 }
        });
    }

    // =========================================================================
    // Noise channels
    // =========================================================================

    /// Depolarize `qubit` with probability `p`: `ρ_q → (1−p)·ρ_q + p·I/2`.
    ///
    /// Kraus form: `√(1−3p/4)·I`, `√(p/4)·X`, `√(p/4)·Y`, `√(p/4)·Z`.
    ///
    /// This is the Pauli form `(1−q)·ρ + (q/3)·(XρX + YρY + ZρZ)` with
    /// `q = 3p/4`, parameterized so that `p = 1` leaves the qubit maximally
    /// mixed. Taking `q = p` directly would overshoot at `p = 1` and leave a
    /// Bloch vector of length 1/3 pointing the other way.
    pub(crate) fn depolarize(&mut self, qubit: usize, p: f64) {
        if p <= 0.0 {
            return;
        }
        let keep = (1.0 - 0.75 * p).max(0.0).sqrt();
        let flip = (p / 4.0).sqrt();
        let ops = [
            gates::scale(&gates::IDENTITY, keep),
            gates::scale(&gates::PAULI_X, flip),
            gates::scale(&gates::PAULI_Y, flip),
            gates::scale(&gates::PAULI_Z, flip),
        ];
        self.apply_kraus(&ops, qubit);
    }

    /// Dephase `qubit` with `K0 = diag(1, √(1−γ))`, `K1 = diag(0, √γ)`.
    pub(crate) fn phase_damp(&mut self, qubit: usize, gamma: f64) {
        if gamma <= 0.0 {
            return;
        }
        let zero = Complex64::new(0.0, 0.0);
        let one = Complex64::new(1.0, 0.0);
        let k0 = [[one, zero], [zero, Complex64::new((1.0 - gamma).sqrt(), 0.0)]];
        let k1 = [[zero, zero], [zero, Complex64::new(gamma.sqrt(), 0.0)]];
        self.apply_kraus(&[k0, k1], qubit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::{HADAMARD, PAULI_X};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    fn bell_pure() -> Statevector {
        let mut sv = Statevector::new(2);
        sv.apply_single(&HADAMARD, 0);
        sv.apply_cnot(0, 1);
        sv
    }

    #[test]
    fn test_from_statevector() {
        let dm = DensityMatrix::from_statevector(&bell_pure());
        assert!(approx(dm.trace(), 1.0));
        assert!(approx(dm.purity(), 1.0));
        assert!(approx(dm.matrix()[[0, 3]].re, 0.5));
        assert!(dm.hermiticity_error() < 1e-12);
    }

    #[test]
    fn test_kernels_match_statevector() {
        let mut sv = Statevector::new(3);
        let mut dm = DensityMatrix::new(3);

        sv.apply_single(&HADAMARD, 0);
        dm.apply_kraus(&[HADAMARD], 0);
        sv.apply_cnot(0, 2);
        dm.apply_cnot(0, 2);
        sv.apply_single(&gates::T, 2);
        dm.apply_kraus(&[gates::T], 2);
        sv.apply_swap(1, 2);
        dm.apply_swap(1, 2);
        sv.apply_single(&HADAMARD, 1);
        dm.apply_kraus(&[HADAMARD], 1);
        sv.apply_cz(0, 1);
        dm.apply_cz(0, 1);

        let expected = DensityMatrix::from_statevector(&sv);
        for (a, b) in dm.matrix().iter().zip(expected.matrix().iter()) {
            assert!((a - b).norm() < 1e-10);
        }
    }

    #[test]
    fn test_full_depolarization_is_maximally_mixed() {
        let mut dm = DensityMatrix::new(1);
        dm.apply_kraus(&[PAULI_X], 0);
        dm.depolarize(0, 1.0);
        assert!(approx(dm.trace(), 1.0));
        assert!(approx(dm.purity(), 0.5));
        assert!(approx(dm.matrix()[[0, 0]].re, 0.5));
        assert!(approx(dm.matrix()[[1, 1]].re, 0.5));
    }

    #[test]
    fn test_depolarization_matches_pauli_form() {
        let p: f64 = 0.4;
        let q = 0.75 * p;
        let mut prepared = DensityMatrix::new(1);
        prepared.apply_kraus(&[HADAMARD], 0);
        prepared.apply_kraus(&[gates::T], 0);

        let mut channel = prepared.clone();
        channel.depolarize(0, p);

        let mut pauli = prepared;
        pauli.apply_kraus(
            &[
                gates::scale(&gates::IDENTITY, (1.0 - q).sqrt()),
                gates::scale(&PAULI_X, (q / 3.0).sqrt()),
                gates::scale(&gates::PAULI_Y, (q / 3.0).sqrt()),
                gates::scale(&gates::PAULI_Z, (q / 3.0).sqrt()),
            ],
            0,
        );

        for (a, b) in channel.matrix().iter().zip(pauli.matrix().iter()) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_partial_depolarization() {
        let mut dm = DensityMatrix::new(1);
        dm.depolarize(0, 0.2);
        // (1-p)|0⟩⟨0| + p·I/2
        assert!(approx(dm.matrix()[[0, 0]].re, 0.9));
        assert!(approx(dm.matrix()[[1, 1]].re, 0.1));
    }

    #[test]
    fn test_phase_damping_kills_coherence_only() {
        let mut sv = Statevector::new(1);
        sv.apply_single(&HADAMARD, 0);
        let mut dm = DensityMatrix::from_statevector(&sv);
        dm.phase_damp(0, 0.36);
        assert!(approx(dm.matrix()[[0, 0]].re, 0.5));
        assert!(approx(dm.matrix()[[1, 1]].re, 0.5));
        // off-diagonal scaled by √(1−γ) = 0.8
        assert!(approx(dm.matrix()[[0, 1]].re, 0.4));

        dm.phase_damp(0, 1.0);
        assert!(dm.matrix()[[0, 1]].norm() < 1e-12);
        assert!(approx(dm.trace(), 1.0));
    }

    #[test]
    fn test_channels_preserve_trace_on_entangled_state() {
        let mut dm = DensityMatrix::from_statevector(&bell_pure());
        for q in 0..2 {
            dm.depolarize(q, 0.3);
            dm.phase_damp(q, 0.4);
        }
        assert!(approx(dm.trace(), 1.0));
        assert!(dm.hermiticity_error() < 1e-12);
        assert!(dm.purity() < 1.0);
    }
}
