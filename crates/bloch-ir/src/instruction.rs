//! Primitive operations: the flattened unit consumed by the state engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::angle::{Angle, AngleExpr};
use crate::error::{IrError, IrResult};
use crate::gate::GateId;

/// A single gate with absolute qubit indices.
///
/// Produced by [`linearize`](crate::linearize::linearize); every index is
/// guaranteed to be below the circuit's qubit count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimitiveOp {
    /// The gate to apply.
    pub gate: GateId,
    /// Target qubit (first qubit for `swap`).
    pub target: usize,
    /// Control qubit (second qubit for `swap`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<usize>,
    /// Unresolved gate parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, AngleExpr>,
    /// Declared horizontal position.
    pub order: f64,
    /// Placement sequence, used to break ties between equal positions.
    pub sequence: usize,
}

impl PrimitiveOp {
    /// Create a single-qubit operation.
    pub fn single(gate: GateId, target: usize, order: f64) -> Self {
        Self {
            gate,
            target,
            control: None,
            params: BTreeMap::new(),
            order,
            sequence: 0,
        }
    }

    /// Create a two-qubit operation.
    pub fn controlled(gate: GateId, control: usize, target: usize, order: f64) -> Self {
        Self {
            control: Some(control),
            ..Self::single(gate, target, order)
        }
    }

    /// Add a parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<AngleExpr>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Qubits touched by this operation, target first.
    pub fn qubits(&self) -> Vec<usize> {
        match self.control {
            Some(control) => vec![self.target, control],
            None => vec![self.target],
        }
    }

    /// Resolve the rotation angle of a parametric gate.
    ///
    /// Returns `Ok(None)` for non-parametric gates and for parametric gates
    /// whose angle parameter was left out.
    pub fn angle(&self) -> IrResult<Option<Angle>> {
        let Some(key) = self.gate.angle_param() else {
            return Ok(None);
        };
        match self.params.get(key) {
            Some(expr) => expr
                .resolve()
                .map(Some)
                .map_err(|e| with_gate_context(e, self.gate)),
            None => Ok(None),
        }
    }
}

fn with_gate_context(err: IrError, gate: GateId) -> IrError {
    match err {
        IrError::InvalidAngleExpression { expr, .. } => IrError::InvalidAngleExpression {
            expr,
            gate_name: Some(gate.name().to_string()),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_qubits() {
        assert_eq!(PrimitiveOp::single(GateId::H, 2, 0.0).qubits(), vec![2]);
        assert_eq!(
            PrimitiveOp::controlled(GateId::Cnot, 0, 1, 0.0).qubits(),
            vec![1, 0]
        );
    }

    #[test]
    fn test_angle_resolution() {
        let op = PrimitiveOp::single(GateId::Rx, 0, 0.0).with_param("theta", "pi/2");
        let angle = op.angle().unwrap().unwrap();
        assert!((angle.radians() - PI / 2.0).abs() < 1e-12);

        assert_eq!(PrimitiveOp::single(GateId::H, 0, 0.0).angle().unwrap(), None);
        assert_eq!(PrimitiveOp::single(GateId::Ry, 0, 0.0).angle().unwrap(), None);
    }

    #[test]
    fn test_invalid_angle_carries_gate_name() {
        let op = PrimitiveOp::single(GateId::Rz, 0, 0.0).with_param("theta", "pi+1");
        match op.angle() {
            Err(IrError::InvalidAngleExpression { expr, gate_name }) => {
                assert_eq!(expr, "pi+1");
                assert_eq!(gate_name.as_deref(), Some("rz"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
