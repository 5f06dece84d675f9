//! The `simulate` entry point: linearize, evolve, extract observables.

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, warn};

use bloch_ir::{
    Circuit, CustomGateDefinition, Diagnostic, Linearized, NoiseModel, PlacedItem, PrimitiveOp,
    linearize,
};

use crate::error::{SimError, SimResult};
use crate::reduced::{QubitState, reduce};
use crate::state::QuantumState;

/// Numeric limits and thresholds for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimConfig {
    /// Allowed drift of the trace, norm and Hermiticity.
    pub tolerance: f64,
    /// Outcomes with a lower probability are left out of the result.
    pub probability_cutoff: f64,
    /// Widest circuit accepted on the statevector path.
    pub max_qubits: usize,
    /// Widest circuit accepted once noise forces a density matrix.
    pub max_mixed_qubits: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-6,
            probability_cutoff: 1e-9,
            max_qubits: 16,
            max_mixed_qubits: 12,
        }
    }
}

/// Everything needed for one simulation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    /// Placed items.
    #[serde(default)]
    pub items: Vec<PlacedItem>,
    /// Number of qubits.
    pub num_qubits: usize,
    /// Custom gate catalogue.
    #[serde(default)]
    pub custom_gates: Vec<CustomGateDefinition>,
    /// Noise parameters.
    #[serde(default)]
    pub noise: NoiseModel,
    /// Run only the first `n` operations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_limit: Option<usize>,
}

impl SimulationRequest {
    /// Create a request for a whole circuit document.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            items: circuit.items.clone(),
            num_qubits: circuit.num_qubits,
            custom_gates: circuit.custom_gates.clone(),
            noise: circuit.noise,
            step_limit: None,
        }
    }

    /// Limit the run to the first `steps` operations.
    #[must_use]
    pub fn with_step_limit(mut self, steps: usize) -> Self {
        self.step_limit = Some(steps);
        self
    }

    /// Replace the noise model.
    #[must_use]
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }
}

impl From<Circuit> for SimulationRequest {
    fn from(circuit: Circuit) -> Self {
        Self {
            items: circuit.items,
            num_qubits: circuit.num_qubits,
            custom_gates: circuit.custom_gates,
            noise: circuit.noise,
            step_limit: None,
        }
    }
}

/// Probability of one computational basis state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityEntry {
    /// Basis label such as `|01⟩`, qubit 0 leftmost.
    pub state: String,
    /// Probability.
    pub value: f64,
}

/// Outcome of a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    /// Outcome probabilities above the cutoff, in basis-index order.
    pub probabilities: Vec<ProbabilityEntry>,
    /// One entry per qubit.
    pub qubit_states: Vec<QubitState>,
    /// `Σ|amp|²` or `Tr(ρ)`, nominally 1.
    pub trace: f64,
    /// Operations skipped along the way.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    /// Operations executed (after any step limit).
    pub steps_applied: usize,
    /// Operations in the full linearized circuit.
    pub total_steps: usize,
}

impl SimulationResult {
    /// Probability of a basis label, or 0 if it was below the cutoff.
    pub fn probability(&self, state: &str) -> f64 {
        self.probabilities
            .iter()
            .find(|p| p.state == state)
            .map_or(0.0, |p| p.value)
    }

    /// Sum of the reported probabilities.
    pub fn total_probability(&self) -> f64 {
        self.probabilities.iter().map(|p| p.value).sum()
    }
}

/// Render basis index `index` as `|b0…bn-1⟩`.
pub fn basis_label(index: usize, num_qubits: usize) -> String {
    if num_qubits == 0 {
        return "|⟩".to_string();
    }
    format!("|{index:0num_qubits$b}⟩")
}

/// Circuit simulator with fixed limits.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    config: SimConfig,
}

impl Simulator {
    /// Create a simulator with the given configuration.
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run a request to completion (or to its step limit).
    pub fn simulate(&self, request: &SimulationRequest) -> SimResult<SimulationResult> {
        self.run(
            &request.items,
            request.num_qubits,
            &request.custom_gates,
            request.noise,
            request.step_limit,
        )
    }

    /// Results after 0, 1, …, N operations.
    ///
    /// Equivalent to calling [`Simulator::simulate`] with every step limit,
    /// but evolves the state only once.
    #[instrument(skip(self, request), fields(num_qubits = request.num_qubits))]
    pub fn replay(&self, request: &SimulationRequest) -> SimResult<Vec<SimulationResult>> {
        let noise = request.noise;
        let lin = self.prepare(
            &request.items,
            request.num_qubits,
            &request.custom_gates,
            noise,
        )?;
        let total_steps = lin.len();
        let limit = request.step_limit.map_or(total_steps, |s| s.min(total_steps));

        let mut snapshots = Vec::with_capacity(limit + 1);
        snapshots.push(self.collect(
            &QuantumState::zero(request.num_qubits),
            lin.diagnostics.clone(),
            0,
            total_steps,
        ));

        let mut diagnostics = lin.diagnostics.clone();
        let mut state = QuantumState::zero(request.num_qubits);
        for (step, op) in lin.ops.iter().take(limit).enumerate() {
            state = self.step(&state, op, &noise, &mut diagnostics)?;
            snapshots.push(self.collect(&state, diagnostics.clone(), step + 1, total_steps));
        }
        Ok(snapshots)
    }

    #[instrument(skip(self, items, custom_defs), fields(items = items.len()))]
    fn run(
        &self,
        items: &[PlacedItem],
        num_qubits: usize,
        custom_defs: &[CustomGateDefinition],
        noise: NoiseModel,
        step_limit: Option<usize>,
    ) -> SimResult<SimulationResult> {
        let start = Instant::now();
        let mut lin = self.prepare(items, num_qubits, custom_defs, noise)?;
        let total_steps = lin.len();
        if let Some(limit) = step_limit {
            lin.truncate(limit);
        }
        debug!(
            "Simulating {} of {} operations on {} qubits ({})",
            lin.len(),
            total_steps,
            num_qubits,
            noise
        );

        let Linearized {
            ops,
            mut diagnostics,
        } = lin;
        let mut state = QuantumState::zero(num_qubits);
        for op in &ops {
            state = self.step(&state, op, &noise, &mut diagnostics)?;
        }

        let result = self.collect(&state, diagnostics, ops.len(), total_steps);
        debug!("Simulation completed in {:?}", start.elapsed());
        Ok(result)
    }

    /// Validate limits and noise, then linearize.
    fn prepare(
        &self,
        items: &[PlacedItem],
        num_qubits: usize,
        custom_defs: &[CustomGateDefinition],
        noise: NoiseModel,
    ) -> SimResult<Linearized> {
        noise.validate()?;

        if num_qubits > self.config.max_qubits {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: self.config.max_qubits,
                representation: "statevector",
            });
        }
        if !noise.is_noiseless() && num_qubits > self.config.max_mixed_qubits {
            return Err(SimError::TooManyQubits {
                requested: num_qubits,
                max: self.config.max_mixed_qubits,
                representation: "density-matrix",
            });
        }

        Ok(linearize(items, custom_defs, num_qubits)?)
    }

    /// Apply one operation and its noise.
    ///
    /// A recoverable failure leaves the state as it was and records a
    /// diagnostic; the skipped op receives no noise either.
    fn step(
        &self,
        state: &QuantumState,
        op: &PrimitiveOp,
        noise: &NoiseModel,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> SimResult<QuantumState> {
        let next = match state.apply(op) {
            Ok(next) => next.apply_noise(&op.qubits(), noise),
            Err(SimError::Ir(e)) if e.is_recoverable() => {
                warn!("skipping operation: {e}");
                diagnostics.extend(Diagnostic::from_error(&e));
                return Ok(state.clone());
            }
            Err(e) => return Err(e),
        };
        next.check_invariants(self.config.tolerance)?;
        Ok(next)
    }

    fn collect(
        &self,
        state: &QuantumState,
        diagnostics: Vec<Diagnostic>,
        steps_applied: usize,
        total_steps: usize,
    ) -> SimulationResult {
        let num_qubits = state.num_qubits();
        let probabilities = state
            .probabilities()
            .into_iter()
            .enumerate()
            .filter(|(_, p)| *p >= self.config.probability_cutoff)
            .map(|(index, value)| ProbabilityEntry {
                state: basis_label(index, num_qubits),
                value,
            })
            .collect();

        SimulationResult {
            probabilities,
            qubit_states: (0..num_qubits).map(|q| reduce(state, q)).collect(),
            trace: state.trace(),
            diagnostics,
            steps_applied,
            total_steps,
        }
    }
}

/// Simulate with the default [`SimConfig`].
pub fn simulate(
    items: &[PlacedItem],
    num_qubits: usize,
    custom_defs: &[CustomGateDefinition],
    noise: NoiseModel,
    step_limit: Option<usize>,
) -> SimResult<SimulationResult> {
    Simulator::default().run(items, num_qubits, custom_defs, noise, step_limit)
}
