//! Flattening of placed items into an ordered list of primitive operations.
//!
//! Custom gate references are expanded recursively: relative qubit `r` of a
//! definition anchored at qubit `a` becomes `a + r`, and every contained
//! operation inherits the position of the outermost placement. Within one
//! definition, contained items run in order of their own relative positions.
//!
//! Expansion is bounded twice: nesting deeper than [`MAX_EXPANSION_DEPTH`]
//! is treated as a cycle, and producing more than [`MAX_EXPANDED_OPS`]
//! operations aborts with [`IrError::ExpansionLimitExceeded`].
//!
//! After expansion, operations addressing qubits outside `[0, num_qubits)`
//! are dropped with a diagnostic. The survivors are sorted by position, with
//! placement sequence breaking ties.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::angle::AngleExpr;
use crate::diagnostic::Diagnostic;
use crate::error::{IrError, IrResult};
use crate::gate::GateId;
use crate::instruction::PrimitiveOp;
use crate::placement::{CustomGateDefinition, CustomGatePlacement, GatePlacement, PlacedItem};

/// Maximum nesting depth of custom gate references.
pub const MAX_EXPANSION_DEPTH: usize = 64;

/// Maximum number of operations custom gate expansion may produce.
pub const MAX_EXPANDED_OPS: usize = 1 << 20;

/// The outcome of linearization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Linearized {
    /// Valid operations in execution order.
    pub ops: Vec<PrimitiveOp>,
    /// Operations that were skipped, with the reason.
    pub diagnostics: Vec<Diagnostic>,
}

impl Linearized {
    /// Number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if there is nothing to execute.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Keep only the first `limit` operations.
    pub fn truncate(&mut self, limit: usize) {
        self.ops.truncate(limit);
    }
}

/// An expanded operation whose qubits are not yet validated.
struct RawOp {
    gate: GateId,
    target: i64,
    control: Option<i64>,
    params: BTreeMap<String, AngleExpr>,
    order: f64,
}

struct Expander<'a> {
    num_qubits: usize,
    budget: usize,
    catalogue: FxHashMap<&'a str, &'a CustomGateDefinition>,
    stack: Vec<&'a str>,
    raw: Vec<RawOp>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Expander<'a> {
    fn new(custom_defs: &'a [CustomGateDefinition], num_qubits: usize, budget: usize) -> Self {
        Self {
            num_qubits,
            budget,
            catalogue: custom_defs.iter().map(|d| (d.id.as_str(), d)).collect(),
            stack: Vec::new(),
            raw: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, err: &IrError) {
        warn!("skipping operation: {err}");
        if let Some(diag) = Diagnostic::from_error(err) {
            self.diagnostics.push(diag);
        }
    }

    fn expand(&mut self, item: &'a PlacedItem, offset: i64, order: Option<f64>) -> IrResult<()> {
        match item {
            PlacedItem::Gate(gate) => self.expand_gate(gate, offset, order),
            PlacedItem::CustomGate(custom) => self.expand_custom(custom, offset, order),
        }
    }

    /// Record an index that no longer fits once shifted by the anchor.
    fn report_overflow(&mut self, qubit: i64, gate_name: &str) {
        let err = IrError::InvalidQubitIndex {
            qubit,
            num_qubits: self.num_qubits,
            gate_name: Some(gate_name.to_string()),
        };
        self.report(&err);
    }

    fn expand_gate(
        &mut self,
        placement: &GatePlacement,
        offset: i64,
        order: Option<f64>,
    ) -> IrResult<()> {
        let gate = match placement.gate_id.parse::<GateId>() {
            Ok(gate) => gate,
            Err(e) => {
                self.report(&e);
                return Ok(());
            }
        };

        let Some(target) = placement.qubit.checked_add(offset) else {
            self.report_overflow(placement.qubit, gate.name());
            return Ok(());
        };

        let control = match placement.control_qubit {
            Some(c) if gate.num_qubits() == 2 => match c.checked_add(offset) {
                Some(c) => Some(c),
                None => {
                    self.report_overflow(c, gate.name());
                    return Ok(());
                }
            },
            Some(_) => {
                debug!(gate = %gate, "ignoring control qubit on single-qubit gate");
                None
            }
            None => None,
        };

        if self.raw.len() >= self.budget {
            return Err(IrError::ExpansionLimitExceeded { limit: self.budget });
        }

        self.raw.push(RawOp {
            gate,
            target,
            control,
            params: placement.params.clone(),
            order: order.unwrap_or(placement.left),
        });
        Ok(())
    }

    fn expand_custom(
        &mut self,
        placement: &'a CustomGatePlacement,
        offset: i64,
        order: Option<f64>,
    ) -> IrResult<()> {
        let id = placement.custom_gate_id.as_str();
        let Some(def) = self.catalogue.get(id).copied() else {
            self.report(&IrError::UnknownCustomGate(id.to_string()));
            return Ok(());
        };

        if self.stack.contains(&id) || self.stack.len() >= MAX_EXPANSION_DEPTH {
            let mut chain: Vec<String> = self.stack.iter().map(|s| (*s).to_string()).collect();
            chain.push(id.to_string());
            return Err(IrError::CyclicGateDefinition { chain });
        }

        let Some(anchor) = offset.checked_add(placement.qubit) else {
            self.report_overflow(placement.qubit, id);
            return Ok(());
        };

        self.stack.push(id);
        let block_order = order.unwrap_or(placement.left);

        let mut inner: Vec<&'a PlacedItem> = def.gates.iter().collect();
        inner.sort_by(|a, b| a.left().total_cmp(&b.left()));
        for item in inner {
            self.expand(item, anchor, Some(block_order))?;
        }

        self.stack.pop();
        Ok(())
    }
}

fn validate_qubit(qubit: i64, num_qubits: usize, gate: GateId) -> IrResult<usize> {
    usize::try_from(qubit)
        .ok()
        .filter(|&q| q < num_qubits)
        .ok_or_else(|| IrError::InvalidQubitIndex {
            qubit,
            num_qubits,
            gate_name: Some(gate.name().to_string()),
        })
}

fn validate(raw: RawOp, sequence: usize, num_qubits: usize) -> IrResult<PrimitiveOp> {
    let target = validate_qubit(raw.target, num_qubits, raw.gate)?;
    let control = match (raw.gate.num_qubits(), raw.control) {
        (2, Some(c)) => {
            let control = validate_qubit(c, num_qubits, raw.gate)?;
            if control == target {
                return Err(IrError::InvalidQubitIndex {
                    qubit: c,
                    num_qubits,
                    gate_name: Some(raw.gate.name().to_string()),
                });
            }
            Some(control)
        }
        // Two-qubit gate without its second qubit.
        (2, None) => {
            return Err(IrError::InvalidQubitIndex {
                qubit: -1,
                num_qubits,
                gate_name: Some(raw.gate.name().to_string()),
            });
        }
        _ => None,
    };

    Ok(PrimitiveOp {
        gate: raw.gate,
        target,
        control,
        params: raw.params,
        order: raw.order,
        sequence,
    })
}

/// Flatten placed items into primitive operations in execution order.
///
/// Invalid gate ids, unknown custom gates and out-of-range qubits are
/// recovered: the operation is skipped and a [`Diagnostic`] recorded. A
/// cyclic chain of custom gate definitions, or one that expands past
/// [`MAX_EXPANDED_OPS`] operations, is an error.
pub fn linearize(
    items: &[PlacedItem],
    custom_defs: &[CustomGateDefinition],
    num_qubits: usize,
) -> IrResult<Linearized> {
    linearize_within(items, custom_defs, num_qubits, MAX_EXPANDED_OPS)
}

fn linearize_within(
    items: &[PlacedItem],
    custom_defs: &[CustomGateDefinition],
    num_qubits: usize,
    budget: usize,
) -> IrResult<Linearized> {
    let mut expander = Expander::new(custom_defs, num_qubits, budget);
    for item in items {
        expander.expand(item, 0, None)?;
    }

    let Expander {
        raw,
        mut diagnostics,
        ..
    } = expander;
    let expanded = raw.len();

    let mut ops = Vec::with_capacity(expanded);
    for (sequence, raw_op) in raw.into_iter().enumerate() {
        match validate(raw_op, sequence, num_qubits) {
            Ok(op) => ops.push(op),
            Err(e) => {
                warn!("discarding invalid gate: {e}");
                diagnostics.extend(Diagnostic::from_error(&e));
            }
        }
    }

    // Stable: equal positions keep placement sequence.
    ops.sort_by(|a, b| a.order.total_cmp(&b.order));

    debug!(
        expanded,
        kept = ops.len(),
        dropped = expanded - ops.len(),
        "linearized circuit"
    );

    Ok(Linearized { ops, diagnostics })
}
