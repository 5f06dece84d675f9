//! Non-fatal problems found while preparing or running a circuit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::IrError;

/// Category of a skipped operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiagnosticCode {
    /// Gate id outside the supported set.
    UnknownGateKind,
    /// Rotation angle outside the angle grammar.
    InvalidAngleExpression,
    /// Operation addressed a qubit outside the circuit.
    DiscardedInvalidGate,
    /// Placement referenced a custom gate that is not in the catalogue.
    UnknownCustomGate,
}

/// A recovered error: the offending operation was skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Category.
    pub code: DiagnosticCode,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic from a recoverable error.
    ///
    /// Returns `None` for errors that must abort the simulation instead.
    pub fn from_error(err: &IrError) -> Option<Self> {
        let code = match err {
            IrError::UnknownGateKind(_) => DiagnosticCode::UnknownGateKind,
            IrError::InvalidAngleExpression { .. } => DiagnosticCode::InvalidAngleExpression,
            IrError::InvalidQubitIndex { .. } => DiagnosticCode::DiscardedInvalidGate,
            IrError::UnknownCustomGate(_) => DiagnosticCode::UnknownCustomGate,
            _ => return None,
        };
        Some(Self {
            code,
            message: err.to_string(),
        })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}
