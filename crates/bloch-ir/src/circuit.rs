//! High-level circuit document and builder API.

use serde::{Deserialize, Serialize};

use crate::angle::AngleExpr;
use crate::error::IrResult;
use crate::linearize::{Linearized, linearize};
use crate::noise::NoiseModel;
use crate::placement::{CustomGateDefinition, CustomGatePlacement, GatePlacement, PlacedItem};

/// Column spacing used by the builder methods.
const COLUMN_WIDTH: f64 = 1.0;

/// A complete circuit description: qubit count, placed items, the custom
/// gate catalogue they reference, and the noise to simulate under.
///
/// This is the document read from circuit files. The builder methods append
/// items one column to the right of the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    /// Optional circuit name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of qubits.
    pub num_qubits: usize,
    /// Placed items.
    #[serde(default)]
    pub items: Vec<PlacedItem>,
    /// Custom gate catalogue.
    #[serde(default)]
    pub custom_gates: Vec<CustomGateDefinition>,
    /// Noise parameters.
    #[serde(default)]
    pub noise: NoiseModel,
}

impl Circuit {
    /// Create an empty circuit.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            ..Self::default()
        }
    }

    /// Create an empty named circuit.
    pub fn with_name(name: impl Into<String>, num_qubits: usize) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(num_qubits)
        }
    }

    /// Set the noise model.
    #[must_use]
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }

    /// Register a custom gate definition.
    pub fn define(&mut self, def: CustomGateDefinition) -> &mut Self {
        self.custom_gates.push(def);
        self
    }

    /// Append an arbitrary item as-is.
    pub fn place(&mut self, item: impl Into<PlacedItem>) -> &mut Self {
        self.items.push(item.into());
        self
    }

    fn next_left(&self) -> f64 {
        self.items
            .iter()
            .map(PlacedItem::left)
            .fold(None, |acc: Option<f64>, l| Some(acc.map_or(l, |a| a.max(l))))
            .map_or(0.0, |max| max + COLUMN_WIDTH)
    }

    fn push_gate(&mut self, gate_id: &str, qubit: i64, control: Option<i64>) -> &mut Self {
        let mut placement = GatePlacement::new(gate_id, qubit, self.next_left());
        placement.control_qubit = control;
        self.place(placement)
    }

    fn push_rotation(&mut self, gate_id: &str, theta: AngleExpr, qubit: i64) -> &mut Self {
        let placement =
            GatePlacement::new(gate_id, qubit, self.next_left()).with_param("theta", theta);
        self.place(placement)
    }

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: i64) -> &mut Self {
        self.push_gate("h", qubit, None)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: i64) -> &mut Self {
        self.push_gate("x", qubit, None)
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: i64) -> &mut Self {
        self.push_gate("y", qubit, None)
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: i64) -> &mut Self {
        self.push_gate("z", qubit, None)
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: i64) -> &mut Self {
        self.push_gate("s", qubit, None)
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: i64) -> &mut Self {
        self.push_gate("sdg", qubit, None)
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: i64) -> &mut Self {
        self.push_gate("t", qubit, None)
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: i64) -> &mut Self {
        self.push_gate("tdg", qubit, None)
    }

    /// Apply RX rotation.
    pub fn rx(&mut self, theta: impl Into<AngleExpr>, qubit: i64) -> &mut Self {
        self.push_rotation("rx", theta.into(), qubit)
    }

    /// Apply RY rotation.
    pub fn ry(&mut self, theta: impl Into<AngleExpr>, qubit: i64) -> &mut Self {
        self.push_rotation("ry", theta.into(), qubit)
    }

    /// Apply RZ rotation.
    pub fn rz(&mut self, theta: impl Into<AngleExpr>, qubit: i64) -> &mut Self {
        self.push_rotation("rz", theta.into(), qubit)
    }

    /// Place a measurement marker.
    pub fn measure(&mut self, qubit: i64) -> &mut Self {
        self.push_gate("measure", qubit, None)
    }

    // =========================================================================
    // Two-qubit gates
    // =========================================================================

    /// Apply CNOT gate.
    pub fn cnot(&mut self, control: i64, target: i64) -> &mut Self {
        self.push_gate("cnot", target, Some(control))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: i64, target: i64) -> &mut Self {
        self.push_gate("cz", target, Some(control))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: i64, q2: i64) -> &mut Self {
        self.push_gate("swap", q1, Some(q2))
    }

    // =========================================================================
    // Custom gates
    // =========================================================================

    /// Place an instance of a registered custom gate anchored at `qubit`.
    pub fn custom(&mut self, custom_gate_id: impl Into<String>, qubit: i64) -> &mut Self {
        let placement = CustomGatePlacement::new(custom_gate_id, qubit, self.next_left());
        self.place(placement)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of placed items (custom gates count once).
    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// Flatten this circuit into primitive operations.
    pub fn linearize(&self) -> IrResult<Linearized> {
        linearize(&self.items, &self.custom_gates, self.num_qubits)
    }

    /// Create a Bell state circuit.
    pub fn bell() -> Self {
        let mut circuit = Self::with_name("bell", 2);
        circuit.h(0).cnot(0, 1);
        circuit
    }

    /// Create a GHZ state circuit on `n` qubits.
    pub fn ghz(n: usize) -> Self {
        let mut circuit = Self::with_name("ghz", n);
        if n == 0 {
            return circuit;
        }
        circuit.h(0);
        for i in 1..n as i64 {
            circuit.cnot(i - 1, i);
        }
        circuit
    }
}
