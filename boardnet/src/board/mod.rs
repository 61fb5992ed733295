//! Breadboard topology: hole labels, buses and the physical layout.

pub mod hole;
pub mod layout;

pub use hole::{canonicalize, ElectricalBus, PhysicalHole};
pub use layout::{BoardRow, HoleLabel, HoleLabelError};
