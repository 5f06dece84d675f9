//! Bloch Circuit Description
//!
//! This crate provides the data structures describing a circuit as a caller
//! lays it out, and the linearization step that turns such a layout into the
//! ordered list of primitive operations the simulator executes.
//!
//! # Core Components
//!
//! - **Gates**: [`GateId`], the closed set of supported primitive gates
//! - **Angles**: [`Angle`] and [`AngleExpr`], a restricted grammar of numeric
//!   literals and rational multiples of π
//! - **Placements**: [`PlacedItem`] (a gate or a custom gate instance) and
//!   [`CustomGateDefinition`] for user-defined composites
//! - **Operations**: [`PrimitiveOp`], a gate with absolute qubit indices
//! - **Linearization**: [`linearize`], expanding custom gates, dropping
//!   out-of-range operations and ordering by position
//! - **Noise**: [`NoiseModel`] with depolarizing and phase damping rates
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use bloch_ir::{Circuit, GateId};
//!
//! let mut circuit = Circuit::new(2);
//! circuit.h(0).cnot(0, 1);
//!
//! let lin = circuit.linearize().unwrap();
//! assert_eq!(lin.ops.len(), 2);
//! assert_eq!(lin.ops[1].gate, GateId::Cnot);
//! ```
//!
//! # Example: Custom Gates
//!
//! ```rust
//! use bloch_ir::{Circuit, CustomGateDefinition, GatePlacement};
//!
//! let bell = CustomGateDefinition::new("bell")
//!     .with_item(GatePlacement::new("h", 0, 0.0))
//!     .with_item(GatePlacement::new("cnot", 1, 1.0).with_control(0));
//!
//! let mut circuit = Circuit::new(3);
//! circuit.define(bell).custom("bell", 1);
//!
//! let lin = circuit.linearize().unwrap();
//! assert_eq!(lin.ops[0].target, 1);
//! assert_eq!(lin.ops[1].target, 2);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `h` | 1 | Hadamard gate |
//! | `x`, `y`, `z` | 1 | Pauli gates |
//! | `s`, `sdg` | 1 | S and S-dagger gates |
//! | `t`, `tdg` | 1 | T and T-dagger gates |
//! | `rx`, `ry`, `rz` | 1 | Rotation gates (`theta` parameter) |
//! | `cnot` | 2 | Controlled-NOT |
//! | `cz` | 2 | Controlled-Z |
//! | `swap` | 2 | SWAP gate |
//! | `measure` | 1 | Marker, does not change the state |

pub mod angle;
pub mod circuit;
pub mod diagnostic;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod linearize;
pub mod noise;
pub mod placement;

pub use angle::{Angle, AngleExpr};
pub use circuit::Circuit;
pub use diagnostic::{Diagnostic, DiagnosticCode};
pub use error::{IrError, IrResult};
pub use gate::GateId;
pub use instruction::PrimitiveOp;
pub use linearize::{Linearized, MAX_EXPANDED_OPS, MAX_EXPANSION_DEPTH, linearize};
pub use noise::NoiseModel;
pub use placement::{CustomGateDefinition, CustomGatePlacement, GatePlacement, PlacedItem};
