//! Decoherence parameters for a simulation run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// Per-operation noise applied to every qubit an operation touches.
///
/// Both values are probabilities in `[0, 1]`. A model with both values at
/// zero keeps the simulation on the pure statevector path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseModel {
    /// Depolarizing probability `p`.
    #[serde(default)]
    pub depolarizing: f64,
    /// Phase damping probability `γ`.
    #[serde(default)]
    pub phase_damping: f64,
}

impl NoiseModel {
    /// A model with no noise at all.
    pub fn noiseless() -> Self {
        Self::default()
    }

    /// Create a model from its two probabilities.
    pub fn new(depolarizing: f64, phase_damping: f64) -> Self {
        Self {
            depolarizing,
            phase_damping,
        }
    }

    /// Check if this model leaves the state unaffected.
    pub fn is_noiseless(&self) -> bool {
        self.depolarizing == 0.0 && self.phase_damping == 0.0
    }

    /// Reject probabilities that are non-finite or outside `[0, 1]`.
    pub fn validate(&self) -> IrResult<()> {
        for (name, value) in [
            ("depolarizing", self.depolarizing),
            ("phaseDamping", self.phase_damping),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(IrError::InvalidNoiseProbability { name, value });
            }
        }
        Ok(())
    }
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_noiseless() {
            return write!(f, "noiseless");
        }
        write!(
            f,
            "depolarizing(p={:.4}), phase_damping(γ={:.4})",
            self.depolarizing, self.phase_damping
        )
    }
}
