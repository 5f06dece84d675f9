//! Property-based tests for the numerical invariants of the engine.

use bloch_ir::{GatePlacement, NoiseModel, PlacedItem, linearize};
use bloch_sim::{QuantumState, reduce, simulate};
use proptest::prelude::*;

const SINGLE: [&str; 11] = ["h", "x", "y", "z", "s", "sdg", "t", "tdg", "rx", "ry", "rz"];
const DOUBLE: [&str; 3] = ["cnot", "cz", "swap"];
const ANGLES: [&str; 6] = ["pi", "pi/2", "-pi/4", "3pi/4", "0.3", "-1.7"];

/// Generate a valid gate placement on `num_qubits` qubits.
fn arb_gate(num_qubits: i64) -> impl Strategy<Value = PlacedItem> {
    let single = (
        prop::sample::select(SINGLE.to_vec()),
        0..num_qubits,
        prop::sample::select(ANGLES.to_vec()),
        0_u32..30,
    )
        .prop_map(|(id, qubit, angle, left)| -> PlacedItem {
            GatePlacement::new(id, qubit, f64::from(left))
                .with_param("theta", angle)
                .into()
        });

    let double = (
        prop::sample::select(DOUBLE.to_vec()),
        0..num_qubits,
        1..num_qubits.max(2),
        0_u32..30,
    )
        .prop_map(move |(id, control, shift, left)| -> PlacedItem {
            let target = (control + shift) % num_qubits.max(2);
            GatePlacement::new(id, target, f64::from(left))
                .with_control(control)
                .into()
        });

    if num_qubits >= 2 {
        prop_oneof![3 => single, 1 => double].boxed()
    } else {
        single.boxed()
    }
}

fn arb_circuit() -> impl Strategy<Value = (usize, Vec<PlacedItem>)> {
    (1_usize..=3).prop_flat_map(|n| {
        (Just(n), prop::collection::vec(arb_gate(n as i64), 0..=12))
    })
}

fn arb_noise() -> impl Strategy<Value = NoiseModel> {
    (0.0_f64..=1.0, 0.0_f64..=1.0).prop_map(|(p, g)| NoiseModel::new(p, g))
}

proptest! {
    /// Probabilities sum to one and every marginal satisfies |r|² = 2P − 1.
    #[test]
    fn test_result_invariants((num_qubits, items) in arb_circuit(), noise in arb_noise()) {
        let result = simulate(&items, num_qubits, &[], noise, None).unwrap();

        prop_assert!((result.total_probability() - 1.0).abs() < 1e-6);
        prop_assert!((result.trace - 1.0).abs() < 1e-6);
        prop_assert_eq!(result.qubit_states.len(), num_qubits);
        for qs in &result.qubit_states {
            prop_assert!(qs.purity >= 0.5 - 1e-9 && qs.purity <= 1.0 + 1e-9);
            let len = qs.bloch_sphere_coords.length_sqr();
            prop_assert!((len - (2.0 * qs.purity - 1.0)).abs() < 1e-9);
        }
    }

    /// Without noise, the amplitude and density-matrix paths agree.
    #[test]
    fn test_pure_and_mixed_paths_agree((num_qubits, items) in arb_circuit()) {
        let lin = linearize(&items, &[], num_qubits).unwrap();
        let mut pure = QuantumState::zero(num_qubits);
        let mut mixed = QuantumState::zero(num_qubits).to_mixed();
        for op in &lin.ops {
            pure = pure.apply(op).unwrap();
            mixed = mixed.apply(op).unwrap();
        }

        for (p, m) in pure.probabilities().iter().zip(mixed.probabilities()) {
            prop_assert!((p - m).abs() < 1e-9);
        }
        for q in 0..num_qubits {
            let a = reduce(&pure, q);
            let b = reduce(&mixed, q);
            prop_assert!((a.purity - b.purity).abs() < 1e-9);
            prop_assert!((a.bloch_sphere_coords.x - b.bloch_sphere_coords.x).abs() < 1e-9);
            prop_assert!((a.bloch_sphere_coords.y - b.bloch_sphere_coords.y).abs() < 1e-9);
            prop_assert!((a.bloch_sphere_coords.z - b.bloch_sphere_coords.z).abs() < 1e-9);
        }
        prop_assert!((mixed.purity() - 1.0).abs() < 1e-9);
    }

    /// Both channels are unital, so global purity never increases.
    #[test]
    fn test_noise_does_not_purify((num_qubits, items) in arb_circuit(), noise in arb_noise()) {
        let lin = linearize(&items, &[], num_qubits).unwrap();
        let mut state = QuantumState::zero(num_qubits);
        let mut purity = state.purity();
        for op in &lin.ops {
            state = state.apply(op).unwrap().apply_noise(&op.qubits(), &noise);
            let next = state.purity();
            prop_assert!(next <= purity + 1e-9);
            purity = next;
        }
    }
}
