//! Boardnet - breadboard connectivity resolution and SPICE netlist generation
//!
//! Takes the components and jumper wires found on a breadboard, works out which
//! holes are electrically the same node, and writes a netlist for the
//! simulator.
//!
//! # Quick Start
//!
//! ```
//! use boardnet::{serialize, Component, ComponentKind};
//!
//! let resistor = Component::new(ComponentKind::Resistor)
//!     .with_terminals(["A1", "A5"])
//!     .with_value("10k");
//!
//! let netlist = serialize(&[resistor], &[], &["A1".to_string()]);
//! assert_eq!(netlist, "R1 0 NC 10k\n.backanno\n.end\n");
//! ```
//!
//! # Pipeline
//!
//! - **Canonicalization** ([`board::canonicalize`]): hole label to bus
//! - **Resolution** ([`netlist::resolve`]): wires and grounds to a bus partition
//! - **Rendering** ([`netlist::render`]): components to netlist lines with dense
//!   node numbers

pub mod board;
pub mod circuit;
pub mod core;
pub mod netlist;

// Re-export main types
pub use board::{canonicalize, ElectricalBus, HoleLabel, PhysicalHole};
pub use circuit::{BoardRequest, Circuit, Component, ComponentKind, Wire};
pub use crate::core::{
    discover_request_files, BoardnetCore, BoardnetError, NetlistOptions, NetlistResult,
    NetlistStats,
};
pub use netlist::{render, resolve, serialize, ConnectivityMap, NodeId, NodeRef, SpiceNetlist};

/// Read a JSON board request file (convenience wrapper).
pub fn load_request(path: &std::path::Path) -> Result<BoardRequest, BoardnetError> {
    let content = std::fs::read_to_string(path)?;
    BoardRequest::from_json(&content)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BoardRequest, BoardnetCore, BoardnetError, Component, ComponentKind, NetlistOptions,
        NetlistResult, NetlistStats, NodeRef, Wire,
    };
}
