//! Single-qubit gate matrices.
//!
//! Two-qubit gates never become matrices: CNOT, CZ and SWAP are applied by
//! the state engine as basis-index permutations and phase flips.

use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;
use tracing::debug;

use bloch_ir::{GateId, IrError, PrimitiveOp};

use crate::error::SimResult;

/// A row-major 2×2 complex matrix.
pub type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Identity.
pub const IDENTITY: Matrix2 = [[ONE, ZERO], [ZERO, ONE]];
/// Pauli-X.
pub const PAULI_X: Matrix2 = [[ZERO, ONE], [ONE, ZERO]];
/// Pauli-Y.
pub const PAULI_Y: Matrix2 = [[ZERO, Complex64::new(0.0, -1.0)], [I, ZERO]];
/// Pauli-Z.
pub const PAULI_Z: Matrix2 = [[ONE, ZERO], [ZERO, Complex64::new(-1.0, 0.0)]];
/// Hadamard.
pub const HADAMARD: Matrix2 = [
    [
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(FRAC_1_SQRT_2, 0.0),
    ],
    [
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(-FRAC_1_SQRT_2, 0.0),
    ],
];
/// S = diag(1, i).
pub const S: Matrix2 = [[ONE, ZERO], [ZERO, I]];
/// S† = diag(1, −i).
pub const SDG: Matrix2 = [[ONE, ZERO], [ZERO, Complex64::new(0.0, -1.0)]];
/// T = diag(1, e^{iπ/4}).
pub const T: Matrix2 = [
    [ONE, ZERO],
    [ZERO, Complex64::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2)],
];
/// T† = diag(1, e^{−iπ/4}).
pub const TDG: Matrix2 = [
    [ONE, ZERO],
    [ZERO, Complex64::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2)],
];

/// `RX(θ) = cos(θ/2)·I − i·sin(θ/2)·X`.
pub fn rx(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    let neg_i_s = Complex64::new(0.0, -s);
    [[Complex64::new(c, 0.0), neg_i_s], [neg_i_s, Complex64::new(c, 0.0)]]
}

/// `RY(θ) = cos(θ/2)·I − i·sin(θ/2)·Y`.
pub fn ry(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
        [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
    ]
}

/// `RZ(θ) = cos(θ/2)·I − i·sin(θ/2)·Z`.
pub fn rz(theta: f64) -> Matrix2 {
    [
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

/// Look up the 2×2 unitary of a single-qubit operation.
///
/// Rotation gates take their angle from [`PrimitiveOp::angle`]; a missing
/// angle means a zero rotation. Two-qubit gates and `measure` have no 2×2
/// matrix and yield [`IrError::UnknownGateKind`].
pub fn matrix_for(op: &PrimitiveOp) -> SimResult<Matrix2> {
    let gate = op.gate;
    let theta = || -> SimResult<f64> {
        match op.angle()? {
            Some(angle) => Ok(angle.radians()),
            None => {
                debug!(gate = %gate, "no angle given, using 0");
                Ok(0.0)
            }
        }
    };

    let matrix = match gate {
        GateId::H => HADAMARD,
        GateId::X => PAULI_X,
        GateId::Y => PAULI_Y,
        GateId::Z => PAULI_Z,
        GateId::S => S,
        GateId::Sdg => SDG,
        GateId::T => T,
        GateId::Tdg => TDG,
        GateId::Rx => rx(theta()?),
        GateId::Ry => ry(theta()?),
        GateId::Rz => rz(theta()?),
        GateId::Cnot | GateId::Cz | GateId::Swap | GateId::Measure => {
            return Err(IrError::UnknownGateKind(format!(
                "{gate} is not a single-qubit unitary"
            ))
            .into());
        }
    };
    Ok(matrix)
}

/// Conjugate transpose.
pub fn dagger(m: &Matrix2) -> Matrix2 {
    [
        [m[0][0].conj(), m[1][0].conj()],
        [m[0][1].conj(), m[1][1].conj()],
    ]
}

/// Matrix product `a · b`.
pub fn mul(a: &Matrix2, b: &Matrix2) -> Matrix2 {
    let mut out = [[ZERO; 2]; 2];
    for (r, row) in out.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            *cell = a[r][0] * b[0][c] + a[r][1] * b[1][c];
        }
    }
    out
}

/// Scale every entry by a real factor.
pub fn scale(m: &Matrix2, factor: f64) -> Matrix2 {
    [
        [m[0][0] * factor, m[0][1] * factor],
        [m[1][0] * factor, m[1][1] * factor],
    ]
}

/// Check `U·U† ≈ I` entrywise within `tolerance`.
pub fn is_unitary(m: &Matrix2, tolerance: f64) -> bool {
    let product = mul(m, &dagger(m));
    product
        .iter()
        .flatten()
        .zip(IDENTITY.iter().flatten())
        .all(|(a, b)| (a - b).norm() <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: &Matrix2, b: &Matrix2) -> bool {
        a.iter()
            .flatten()
            .zip(b.iter().flatten())
            .all(|(x, y)| (x - y).norm() < 1e-10)
    }

    fn rotation(gate: GateId, theta: &str) -> PrimitiveOp {
        PrimitiveOp::single(gate, 0, 0.0).with_param("theta", theta)
    }

    #[test]
    fn test_fixed_gates_are_unitary() {
        for m in [IDENTITY, PAULI_X, PAULI_Y, PAULI_Z, HADAMARD, S, SDG, T, TDG] {
            assert!(is_unitary(&m, 1e-12));
        }
    }

    #[test]
    fn test_dagger_pairs() {
        assert!(approx_eq(&dagger(&S), &SDG));
        assert!(approx_eq(&dagger(&T), &TDG));
        assert!(approx_eq(&mul(&T, &T), &S));
        assert!(approx_eq(&mul(&S, &S), &PAULI_Z));
    }

    #[test]
    fn test_rotations_at_pi() {
        // RX(π) = -iX, RY(π) = -iY, RZ(π) = -iZ
        let neg_i = Complex64::new(0.0, -1.0);
        let scaled = |p: &Matrix2| {
            [
                [p[0][0] * neg_i, p[0][1] * neg_i],
                [p[1][0] * neg_i, p[1][1] * neg_i],
            ]
        };
        assert!(approx_eq(&rx(PI), &scaled(&PAULI_X)));
        assert!(approx_eq(&ry(PI), &scaled(&PAULI_Y)));
        assert!(approx_eq(&rz(PI), &scaled(&PAULI_Z)));
    }

    #[test]
    fn test_matrix_for_resolves_angles() {
        let m = matrix_for(&rotation(GateId::Ry, "pi/2")).unwrap();
        assert!(approx_eq(&m, &ry(PI / 2.0)));

        let identity = matrix_for(&PrimitiveOp::single(GateId::Rx, 0, 0.0)).unwrap();
        assert!(approx_eq(&identity, &IDENTITY));

        let h = matrix_for(&PrimitiveOp::single(GateId::H, 0, 0.0)).unwrap();
        assert!(approx_eq(&h, &HADAMARD));
    }

    #[test]
    fn test_matrix_for_rejects_bad_input() {
        match matrix_for(&rotation(GateId::Rz, "pi**2")) {
            Err(crate::SimError::Ir(IrError::InvalidAngleExpression { gate_name, .. })) => {
                assert_eq!(gate_name.as_deref(), Some("rz"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            matrix_for(&PrimitiveOp::controlled(GateId::Cnot, 1, 0, 0.0)),
            Err(crate::SimError::Ir(IrError::UnknownGateKind(_)))
        ));
    }
}
