//! Board request types and the circuit graph built from a rendered netlist.

pub mod graph;
pub mod schema;

pub use graph::{Circuit, CircuitNode, CircuitStats, PinEdge, PinRef};
pub use schema::{BoardRequest, Component, ComponentKind, TerminalArity, Wire};
