//! Gate identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IrError;

/// The closed set of primitive gates understood by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GateId {
    // Single-qubit Pauli gates
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx,
    /// Rotation around Y axis.
    Ry,
    /// Rotation around Z axis.
    Rz,

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    Cnot,
    /// Controlled-Z gate.
    Cz,
    /// SWAP gate.
    Swap,

    /// Measurement marker. Leaves the evolving state untouched.
    Measure,
}

impl GateId {
    /// Every supported gate, in display order.
    pub const ALL: [GateId; 15] = [
        GateId::H,
        GateId::X,
        GateId::Y,
        GateId::Z,
        GateId::S,
        GateId::Sdg,
        GateId::T,
        GateId::Tdg,
        GateId::Rx,
        GateId::Ry,
        GateId::Rz,
        GateId::Cnot,
        GateId::Cz,
        GateId::Swap,
        GateId::Measure,
    ];

    /// Get the wire name of this gate.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            GateId::X => "x",
            GateId::Y => "y",
            GateId::Z => "z",
            GateId::H => "h",
            GateId::S => "s",
            GateId::Sdg => "sdg",
            GateId::T => "t",
            GateId::Tdg => "tdg",
            GateId::Rx => "rx",
            GateId::Ry => "ry",
            GateId::Rz => "rz",
            GateId::Cnot => "cnot",
            GateId::Cz => "cz",
            GateId::Swap => "swap",
            GateId::Measure => "measure",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(self) -> usize {
        match self {
            GateId::Cnot | GateId::Cz | GateId::Swap => 2,
            _ => 1,
        }
    }

    /// Check if this gate takes an angle parameter.
    pub fn is_parametric(self) -> bool {
        matches!(self, GateId::Rx | GateId::Ry | GateId::Rz)
    }

    /// The `params` key holding the rotation angle, if any.
    pub fn angle_param(self) -> Option<&'static str> {
        self.is_parametric().then_some("theta")
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GateId {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let gate = match s.trim().to_ascii_lowercase().as_str() {
            "h" => GateId::H,
            "x" => GateId::X,
            "y" => GateId::Y,
            "z" => GateId::Z,
            "s" => GateId::S,
            "sdg" | "sdag" | "s†" => GateId::Sdg,
            "t" => GateId::T,
            "tdg" | "tdag" | "t†" => GateId::Tdg,
            "rx" => GateId::Rx,
            "ry" => GateId::Ry,
            "rz" => GateId::Rz,
            "cnot" | "cx" => GateId::Cnot,
            "cz" => GateId::Cz,
            "swap" => GateId::Swap,
            "measure" => GateId::Measure,
            _ => return Err(IrError::UnknownGateKind(s.to_string())),
        };
        Ok(gate)
    }
}

impl TryFrom<String> for GateId {
    type Error = IrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GateId> for String {
    fn from(gate: GateId) -> Self {
        gate.name().to_string()
    }
}
