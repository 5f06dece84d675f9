//! Placed circuit items and custom gate definitions.
//!
//! These are the caller-facing circuit description types: gates dropped on a
//! grid at a qubit row and a horizontal position (`left`). Coordinates are
//! signed so that malformed placements survive deserialization and can be
//! reported individually instead of rejecting the whole circuit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::angle::AngleExpr;

/// A primitive gate dropped at a qubit row and horizontal position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatePlacement {
    /// Gate id as written by the caller (`h`, `cnot`, `rx`, ...).
    pub gate_id: String,
    /// Target qubit (first qubit for `swap`).
    pub qubit: i64,
    /// Control qubit for `cnot`/`cz`, second qubit for `swap`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_qubit: Option<i64>,
    /// Horizontal position; execution order follows it.
    #[serde(default)]
    pub left: f64,
    /// Gate parameters, e.g. `{"theta": "pi/2"}`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, AngleExpr>,
}

impl GatePlacement {
    /// Create a placement with no control and no parameters.
    pub fn new(gate_id: impl Into<String>, qubit: i64, left: f64) -> Self {
        Self {
            gate_id: gate_id.into(),
            qubit,
            control_qubit: None,
            left,
            params: BTreeMap::new(),
        }
    }

    /// Set the control (or second) qubit.
    #[must_use]
    pub fn with_control(mut self, control: i64) -> Self {
        self.control_qubit = Some(control);
        self
    }

    /// Add a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<AngleExpr>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// A reference to a custom gate definition, anchored at a qubit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomGatePlacement {
    /// Id of the referenced [`CustomGateDefinition`].
    pub custom_gate_id: String,
    /// Anchor qubit; relative qubit `r` of the definition maps to `qubit + r`.
    pub qubit: i64,
    /// Horizontal position of the whole block.
    #[serde(default)]
    pub left: f64,
}

impl CustomGatePlacement {
    /// Create a new custom gate reference.
    pub fn new(custom_gate_id: impl Into<String>, qubit: i64, left: f64) -> Self {
        Self {
            custom_gate_id: custom_gate_id.into(),
            qubit,
            left,
        }
    }
}

/// An item on the circuit canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlacedItem {
    /// A primitive gate.
    Gate(GatePlacement),
    /// An instance of a custom gate.
    CustomGate(CustomGatePlacement),
}

impl PlacedItem {
    /// Horizontal position of this item.
    pub fn left(&self) -> f64 {
        match self {
            PlacedItem::Gate(g) => g.left,
            PlacedItem::CustomGate(c) => c.left,
        }
    }

    /// Anchor qubit of this item.
    pub fn qubit(&self) -> i64 {
        match self {
            PlacedItem::Gate(g) => g.qubit,
            PlacedItem::CustomGate(c) => c.qubit,
        }
    }
}

impl From<GatePlacement> for PlacedItem {
    fn from(gate: GatePlacement) -> Self {
        PlacedItem::Gate(gate)
    }
}

impl From<CustomGatePlacement> for PlacedItem {
    fn from(custom: CustomGatePlacement) -> Self {
        PlacedItem::CustomGate(custom)
    }
}

/// A user-defined composite gate.
///
/// Contained items use qubits relative to the placement anchor (0-based) and
/// may themselves reference other custom gates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomGateDefinition {
    /// Catalogue id referenced by [`CustomGatePlacement::custom_gate_id`].
    pub id: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Contained items in relative coordinates.
    #[serde(default, alias = "items")]
    pub gates: Vec<PlacedItem>,
}

impl CustomGateDefinition {
    /// Create an empty definition.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            gates: vec![],
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append an item in relative coordinates.
    #[must_use]
    pub fn with_item(mut self, item: impl Into<PlacedItem>) -> Self {
        self.gates.push(item.into());
        self
    }

}
