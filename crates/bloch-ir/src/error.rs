//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while describing or linearizing a circuit.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate id is not part of the supported gate set.
    #[error("Unknown gate kind '{0}'")]
    UnknownGateKind(String),

    /// Angle text does not match the symbolic angle grammar.
    #[error("Invalid angle expression '{expr}'{}", format_gate_context(.gate_name))]
    InvalidAngleExpression {
        /// The rejected expression.
        expr: String,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// An operation addresses a qubit outside the circuit.
    #[error("Qubit {qubit} out of range for a {num_qubits}-qubit circuit{}", format_gate_context(.gate_name))]
    InvalidQubitIndex {
        /// The offending qubit index.
        qubit: i64,
        /// Number of qubits in the circuit.
        num_qubits: usize,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Custom gate definitions reference each other in a loop.
    #[error("Cyclic custom gate definition: {}", .chain.join(" -> "))]
    CyclicGateDefinition {
        /// Definition ids from the outermost placement to the repeated id.
        chain: Vec<String>,
    },

    /// A placement references a custom gate id with no definition.
    #[error("Unknown custom gate '{0}'")]
    UnknownCustomGate(String),

    /// Custom gate expansion produced more operations than allowed.
    #[error("Custom gate expansion exceeds {limit} operations")]
    ExpansionLimitExceeded {
        /// The operation budget that was hit.
        limit: usize,
    },

    /// A noise probability lies outside `[0, 1]`.
    #[error("Noise parameter '{name}' must be within [0, 1], got {value}")]
    InvalidNoiseProbability {
        /// Parameter name (`depolarizing` or `phaseDamping`).
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl IrError {
    /// Whether this error only invalidates a single operation.
    ///
    /// Recoverable errors are reported as diagnostics and the offending
    /// operation is skipped; the others abort the simulation call.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            IrError::UnknownGateKind(_)
                | IrError::InvalidAngleExpression { .. }
                | IrError::InvalidQubitIndex { .. }
                | IrError::UnknownCustomGate(_)
        )
    }
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
