//! End-to-end tests for `simulate`.

use bloch_ir::{
    Circuit, CustomGateDefinition, CustomGatePlacement, DiagnosticCode, GatePlacement, IrError,
    NoiseModel, PlacedItem,
};
use bloch_sim::{SimError, SimulationRequest, SimulationResult, Simulator, simulate};

const EPS: f64 = 1e-9;

fn run(circuit: &Circuit) -> SimulationResult {
    Simulator::default()
        .simulate(&SimulationRequest::from_circuit(circuit))
        .unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

fn assert_bloch_identity(result: &SimulationResult) {
    for qs in &result.qubit_states {
        let len = qs.bloch_sphere_coords.length_sqr();
        assert!((len - (2.0 * qs.purity - 1.0)).abs() < 1e-9);
    }
}

// ---------------------------------------------------------------------------
// Basic circuits
// ---------------------------------------------------------------------------

#[test]
fn empty_circuit_is_ground_state() {
    let result = simulate(&[], 2, &[], NoiseModel::noiseless(), None).unwrap();
    assert_eq!(result.probabilities.len(), 1);
    assert_eq!(result.probabilities[0].state, "|00⟩");
    assert_close(result.probabilities[0].value, 1.0);
    assert_eq!(result.qubit_states.len(), 2);
    for qs in &result.qubit_states {
        assert_close(qs.purity, 1.0);
        assert_close(qs.bloch_sphere_coords.x, 0.0);
        assert_close(qs.bloch_sphere_coords.y, 0.0);
        assert_close(qs.bloch_sphere_coords.z, 1.0);
    }
    assert_close(result.trace, 1.0);
}

#[test]
fn hadamard_gives_equal_superposition() {
    let mut circuit = Circuit::new(1);
    circuit.h(0);
    let result = run(&circuit);

    assert_eq!(result.probabilities.len(), 2);
    assert_eq!(result.probabilities[0].state, "|0⟩");
    assert_eq!(result.probabilities[1].state, "|1⟩");
    assert_close(result.probabilities[0].value, 0.5);
    assert_close(result.probabilities[1].value, 0.5);

    let qs = result.qubit_states[0];
    assert_close(qs.purity, 1.0);
    assert_close(qs.bloch_sphere_coords.x, 1.0);
    assert_close(qs.bloch_sphere_coords.y, 0.0);
    assert_close(qs.bloch_sphere_coords.z, 0.0);
}

#[test]
fn bell_state_is_entangled() {
    let result = run(&Circuit::bell());

    let states: Vec<&str> = result.probabilities.iter().map(|p| p.state.as_str()).collect();
    assert_eq!(states, vec!["|00⟩", "|11⟩"]);
    assert_close(result.probability("|00⟩"), 0.5);
    assert_close(result.probability("|11⟩"), 0.5);
    assert_close(result.trace, 1.0);

    for qs in &result.qubit_states {
        assert_close(qs.purity, 0.5);
        assert!(qs.bloch_sphere_coords.length_sqr() < EPS);
    }
}

#[test]
fn qubit_zero_is_leftmost() {
    let mut circuit = Circuit::new(3);
    circuit.x(0);
    let result = run(&circuit);
    assert_close(result.probability("|100⟩"), 1.0);
}

#[test]
fn double_x_is_identity() {
    let mut base = Circuit::new(2);
    base.h(0).ry("pi/3", 1).cnot(0, 1);
    let mut doubled = base.clone();
    doubled.x(1).x(1);

    let a = run(&base);
    let b = run(&doubled);
    assert_eq!(a.probabilities.len(), b.probabilities.len());
    for (pa, pb) in a.probabilities.iter().zip(&b.probabilities) {
        assert_eq!(pa.state, pb.state);
        assert_close(pa.value, pb.value);
    }
}

#[test]
fn measure_does_not_change_state() {
    let mut circuit = Circuit::new(1);
    circuit.h(0).measure(0);
    let result = run(&circuit);
    assert_close(result.probability("|0⟩"), 0.5);
    assert_close(result.qubit_states[0].purity, 1.0);
    assert_eq!(result.steps_applied, 2);
}

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

#[test]
fn position_not_insertion_order_decides_sequence() {
    // Placed in reverse: the H at left=0 must run before the CNOT at left=1.
    let items: Vec<PlacedItem> = vec![
        GatePlacement::new("cnot", 1, 1.0).with_control(0).into(),
        GatePlacement::new("h", 0, 0.0).into(),
    ];
    let result = simulate(&items, 2, &[], NoiseModel::noiseless(), None).unwrap();
    assert_close(result.probability("|11⟩"), 0.5);
}

#[test]
fn custom_gate_expands_at_anchor() {
    let bell = CustomGateDefinition::new("bell")
        .with_item(GatePlacement::new("h", 0, 0.0))
        .with_item(GatePlacement::new("cnot", 1, 1.0).with_control(0));
    let mut circuit = Circuit::new(3);
    circuit.define(bell).custom("bell", 1);

    let result = run(&circuit);
    assert_close(result.probability("|000⟩"), 0.5);
    assert_close(result.probability("|011⟩"), 0.5);
    assert_close(result.qubit_states[0].purity, 1.0);
    assert_eq!(result.total_steps, 2);
}

// ---------------------------------------------------------------------------
// Noise
// ---------------------------------------------------------------------------

#[test]
fn full_depolarization_saturates() {
    for angle in ["0", "pi/3", "pi/2", "-3pi/4", "1.234"] {
        let mut circuit = Circuit::new(1).with_noise(NoiseModel::new(1.0, 0.0));
        circuit.ry(angle, 0);
        let result = run(&circuit);
        assert_close(result.qubit_states[0].purity, 0.5);
        assert_close(result.probability("|0⟩"), 0.5);
        assert_close(result.probability("|1⟩"), 0.5);
    }
}

#[test]
fn full_phase_damping_removes_coherence() {
    let mut circuit = Circuit::new(1).with_noise(NoiseModel::new(0.0, 1.0));
    circuit.h(0);
    let result = run(&circuit);
    let qs = result.qubit_states[0];
    assert_close(qs.bloch_sphere_coords.x, 0.0);
    assert_close(qs.bloch_sphere_coords.y, 0.0);
    assert_close(qs.purity, 0.5);
    assert_close(result.probability("|0⟩"), 0.5);
}

#[test]
fn noise_only_touches_operated_qubits() {
    let mut circuit = Circuit::new(2).with_noise(NoiseModel::new(0.3, 0.2));
    circuit.h(0).h(1).z(0);
    let result = run(&circuit);

    assert!(result.qubit_states[0].purity < result.qubit_states[1].purity);
    assert_close(result.trace, 1.0);
    assert_bloch_identity(&result);
}

#[test]
fn noisy_bell_stays_normalized() {
    let circuit = Circuit::bell().with_noise(NoiseModel::new(0.05, 0.1));
    let result = run(&circuit);
    assert_close(result.trace, 1.0);
    assert_close(result.total_probability(), 1.0);
    for qs in &result.qubit_states {
        assert!(qs.purity >= 0.5 - EPS && qs.purity <= 1.0 + EPS);
    }
    assert_bloch_identity(&result);
}

// ---------------------------------------------------------------------------
// Recoverable and fatal errors
// ---------------------------------------------------------------------------

#[test]
fn invalid_qubit_is_dropped() {
    let mut circuit = Circuit::new(2);
    circuit.h(0).x(7).cnot(0, 1);
    let result = run(&circuit);
    assert_close(result.probability("|00⟩"), 0.5);
    assert_close(result.probability("|11⟩"), 0.5);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].code,
        DiagnosticCode::DiscardedInvalidGate
    );
}

#[test]
fn only_invalid_gate_equals_empty_circuit() {
    let items: Vec<PlacedItem> = vec![GatePlacement::new("h", 2, 0.0).into()];
    let invalid = simulate(&items, 2, &[], NoiseModel::noiseless(), None).unwrap();
    let empty = simulate(&[], 2, &[], NoiseModel::noiseless(), None).unwrap();
    assert_eq!(invalid.probabilities, empty.probabilities);
    assert_eq!(invalid.qubit_states, empty.qubit_states);
    assert_eq!(invalid.diagnostics.len(), 1);
}

#[test]
fn unknown_gate_is_skipped() {
    let items: Vec<PlacedItem> = vec![
        GatePlacement::new("toffoli", 0, 0.0).into(),
        GatePlacement::new("x", 0, 1.0).into(),
    ];
    let result = simulate(&items, 1, &[], NoiseModel::noiseless(), None).unwrap();
    assert_close(result.probability("|1⟩"), 1.0);
    assert_eq!(result.diagnostics[0].code, DiagnosticCode::UnknownGateKind);
}

#[test]
fn cyclic_custom_gate_is_fatal() {
    let a = CustomGateDefinition::new("a").with_item(CustomGatePlacement::new("b", 0, 0.0));
    let b = CustomGateDefinition::new("b").with_item(CustomGatePlacement::new("a", 0, 0.0));
    let items: Vec<PlacedItem> = vec![CustomGatePlacement::new("a", 0, 0.0).into()];

    let err = simulate(&items, 1, &[a, b], NoiseModel::noiseless(), None).unwrap_err();
    match err {
        SimError::Ir(IrError::CyclicGateDefinition { chain }) => {
            assert_eq!(chain, vec!["a", "b", "a"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Step truncation
// ---------------------------------------------------------------------------

#[test]
fn step_limit_converges_to_full_run() {
    let mut circuit = Circuit::new(3);
    circuit.h(0).cnot(0, 1).rx("pi/4", 2).swap(1, 2).cz(0, 2).t(1);
    let request = SimulationRequest::from_circuit(&circuit);
    let sim = Simulator::default();
    let full = sim.simulate(&request).unwrap();

    for k in 0..=circuit.num_items() {
        let partial = sim.simulate(&request.clone().with_step_limit(k)).unwrap();
        assert_eq!(partial.steps_applied, k);
        assert_eq!(partial.total_steps, full.total_steps);
    }
    let at_end = sim
        .simulate(&request.clone().with_step_limit(circuit.num_items()))
        .unwrap();
    assert_eq!(at_end, full);

    let past_end = sim
        .simulate(&request.with_step_limit(circuit.num_items() + 10))
        .unwrap();
    assert_eq!(past_end, full);
}

#[test]
fn step_zero_is_ground_state() {
    let request = SimulationRequest::from_circuit(&Circuit::ghz(3)).with_step_limit(0);
    let result = Simulator::default().simulate(&request).unwrap();
    assert_close(result.probability("|000⟩"), 1.0);
    assert_eq!(result.steps_applied, 0);
    assert_eq!(result.total_steps, 3);
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[test]
fn request_from_json() {
    let json = r#"{
        "numQubits": 2,
        "items": [
            {"kind": "gate", "gateId": "h", "qubit": 0, "left": 10},
            {"kind": "gate", "gateId": "cnot", "qubit": 1, "controlQubit": 0, "left": 20},
            {"kind": "gate", "gateId": "rz", "qubit": 1, "left": 30, "params": {"theta": "pi/2"}}
        ],
        "noise": {"depolarizing": 0, "phaseDamping": 0}
    }"#;
    let request: SimulationRequest = serde_json::from_str(json).unwrap();
    let result = Simulator::default().simulate(&request).unwrap();
    assert_close(result.probability("|00⟩"), 0.5);
    assert_close(result.probability("|11⟩"), 0.5);
}
