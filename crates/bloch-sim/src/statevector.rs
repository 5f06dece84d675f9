//! Statevector simulation kernels.
//!
//! Qubit 0 is the most significant bit of a basis index, so the binary
//! rendering of an index reads qubits left to right.

use num_complex::Complex64;

use crate::gates::Matrix2;

/// Bit mask of `qubit` in an `n`-qubit basis index.
#[inline]
pub(crate) fn qubit_mask(num_qubits: usize, qubit: usize) -> usize {
    1 << (num_qubits - 1 - qubit)
}

/// A pure state: `2^n` complex amplitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let amplitudes = (0..size)
            .map(|i| {
                if i == 0 {
                    Complex64::new(1.0, 0.0)
                } else {
                    Complex64::new(0.0, 0.0)
                }
            })
            .collect();
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Build from raw amplitudes. Length must be a power of two.
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Option<Self> {
        if !amplitudes.len().is_power_of_two() {
            return None;
        }
        let num_qubits = amplitudes.len().trailing_zeros() as usize;
        Some(Self {
            amplitudes,
            num_qubits,
        })
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes in basis-index order.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// `Σ |amp|²`.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    /// Outcome probabilities in basis-index order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    // =========================================================================
    // Gate kernels
    // =========================================================================

    /// Apply a 2×2 unitary to `qubit`.
    pub(crate) fn apply_single(&mut self, m: &Matrix2, qubit: usize) {
        let mask = qubit_mask(self.num_qubits, qubit);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    pub(crate) fn apply_cnot(&mut self, control: usize, target: usize) {
        let ctrl_mask = qubit_mask(self.num_qubits, control);
        let tgt_mask = qubit_mask(self.num_qubits, target);
        for i in 0..self.amplitudes.len() {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    pub(crate) fn apply_cz(&mut self, control: usize, target: usize) {
        let ctrl_mask = qubit_mask(self.num_qubits, control);
        let tgt_mask = qubit_mask(self.num_qubits, target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & ctrl_mask != 0) && (i & tgt_mask != 0) {
                *amp = -*amp;
            }
        }
    }

    pub(crate) fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = qubit_mask(self.num_qubits, q1);
        let mask2 = qubit_mask(self.num_qubits, q2);
        for i in 0..self.amplitudes.len() {
            if (i & mask1 != 0) && (i & mask2 == 0) {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }
}
