//! Error types for the sim crate.

use thiserror::Error;

use bloch_ir::IrError;

/// Errors produced while simulating a circuit.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SimError {
    /// Circuit description error.
    #[error("Circuit IR error: {0}")]
    Ir(#[from] IrError),

    /// A trace, norm or Hermiticity invariant drifted beyond tolerance.
    #[error("Numeric drift: {quantity} is off by {deviation:e} (tolerance {tolerance:e})")]
    NumericDriftExceeded {
        /// The quantity that drifted (`trace`, `norm`, `hermiticity`).
        quantity: &'static str,
        /// Absolute deviation from the expected value.
        deviation: f64,
        /// Tolerance that was exceeded.
        tolerance: f64,
    },

    /// The circuit is too wide for the selected representation.
    #[error("Circuit has {requested} qubits but the {representation} engine supports at most {max}")]
    TooManyQubits {
        /// Requested qubit count.
        requested: usize,
        /// Configured maximum.
        max: usize,
        /// `statevector` or `density-matrix`.
        representation: &'static str,
    },

    /// A newer request replaced this one before it ran.
    #[error("Request {0} was superseded by a newer request")]
    Superseded(u64),

    /// The background worker is no longer running.
    #[error("Simulation worker has shut down")]
    WorkerClosed,
}

impl SimError {
    /// Whether the error only invalidates a single operation.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SimError::Ir(e) if e.is_recoverable())
    }
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
