//! Connectivity resolution and netlist rendering.

pub mod resolver;
pub mod spice;

pub use resolver::{resolve, ConnectivityMap, NodeId};
pub use spice::{render, serialize, NetlistLine, NodeRef, SpiceNetlist, TRAILER};
