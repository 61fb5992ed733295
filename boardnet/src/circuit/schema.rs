//! Board request data types
//!
//! Components, jumper wires and ground declarations as handed over by the
//! detection/edit layer. These types are serde-enabled so a request can be
//! read straight from JSON:
//!
//! ```json
//! {
//!   "components": [{ "type": 1, "name": "Resistor", "terminals": ["A1", "A5"], "value": "10k" }],
//!   "wires": [{ "id": 0, "name": "Wire 1", "endpoints": ["A5", "F5"] }],
//!   "grounds": ["A1"]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::PhysicalHole;
use crate::core::BoardnetError;

/// Component type, keyed by the detector's integer class tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ComponentKind {
    /// Independent voltage source (tag -1)
    Source,
    /// Wire class (tag 0); wires normally arrive separately
    Wire,
    Resistor,
    Capacitor,
    CurrentSource,
    Mosfet,
    /// Generic three-terminal part
    ThreeTerminal,
    Led,
    IntegratedCircuit,
    /// Any tag outside the table
    Other(i32),
}

/// How many terminals a component kind carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalArity {
    Exactly(usize),
    AtLeast(usize),
    /// Even count, at least the given number (dual in-line packages)
    EvenAtLeast(usize),
}

impl TerminalArity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            TerminalArity::Exactly(n) => count == n,
            TerminalArity::AtLeast(n) => count >= n,
            TerminalArity::EvenAtLeast(n) => count >= n && count % 2 == 0,
        }
    }
}

impl fmt::Display for TerminalArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalArity::Exactly(n) => write!(f, "exactly {}", n),
            TerminalArity::AtLeast(n) => write!(f, "at least {}", n),
            TerminalArity::EvenAtLeast(n) => write!(f, "an even number, at least {}", n),
        }
    }
}

impl ComponentKind {
    /// Every kind with a fixed tag, in tag order.
    pub const KNOWN: [ComponentKind; 9] = [
        ComponentKind::Source,
        ComponentKind::Wire,
        ComponentKind::Resistor,
        ComponentKind::Capacitor,
        ComponentKind::CurrentSource,
        ComponentKind::Mosfet,
        ComponentKind::ThreeTerminal,
        ComponentKind::Led,
        ComponentKind::IntegratedCircuit,
    ];

    pub fn from_tag(tag: i32) -> Self {
        match tag {
            -1 => ComponentKind::Source,
            0 => ComponentKind::Wire,
            1 => ComponentKind::Resistor,
            2 => ComponentKind::Capacitor,
            3 => ComponentKind::CurrentSource,
            4 => ComponentKind::Mosfet,
            5 => ComponentKind::ThreeTerminal,
            6 => ComponentKind::Led,
            7 => ComponentKind::IntegratedCircuit,
            other => ComponentKind::Other(other),
        }
    }

    pub fn tag(self) -> i32 {
        match self {
            ComponentKind::Source => -1,
            ComponentKind::Wire => 0,
            ComponentKind::Resistor => 1,
            ComponentKind::Capacitor => 2,
            ComponentKind::CurrentSource => 3,
            ComponentKind::Mosfet => 4,
            ComponentKind::ThreeTerminal => 5,
            ComponentKind::Led => 6,
            ComponentKind::IntegratedCircuit => 7,
            ComponentKind::Other(tag) => tag,
        }
    }

    /// Designator prefix used in the netlist.
    pub fn prefix(self) -> &'static str {
        match self {
            ComponentKind::Source => "V",
            ComponentKind::Wire => "wire",
            ComponentKind::Resistor => "R",
            ComponentKind::Capacitor => "C",
            ComponentKind::CurrentSource => "I",
            ComponentKind::Mosfet => "MOST",
            ComponentKind::ThreeTerminal => "CIRT",
            ComponentKind::Led => "LED",
            ComponentKind::IntegratedCircuit => "IC",
            ComponentKind::Other(_) => "U",
        }
    }

    pub fn arity(self) -> TerminalArity {
        match self {
            ComponentKind::Mosfet | ComponentKind::ThreeTerminal => TerminalArity::Exactly(3),
            ComponentKind::IntegratedCircuit => TerminalArity::EvenAtLeast(4),
            ComponentKind::Other(_) => TerminalArity::AtLeast(2),
            _ => TerminalArity::Exactly(2),
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, ComponentKind::Other(_))
    }
}

impl From<i32> for ComponentKind {
    fn from(tag: i32) -> Self {
        ComponentKind::from_tag(tag)
    }
}

impl From<ComponentKind> for i32 {
    fn from(kind: ComponentKind) -> Self {
        kind.tag()
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentKind::Source => write!(f, "Voltage Source"),
            ComponentKind::Wire => write!(f, "Wire"),
            ComponentKind::Resistor => write!(f, "Resistor"),
            ComponentKind::Capacitor => write!(f, "Capacitor"),
            ComponentKind::CurrentSource => write!(f, "Current Source"),
            ComponentKind::Mosfet => write!(f, "MOSFET"),
            ComponentKind::ThreeTerminal => write!(f, "Three-Terminal Part"),
            ComponentKind::Led => write!(f, "LED"),
            ComponentKind::IntegratedCircuit => write!(f, "Integrated Circuit"),
            ComponentKind::Other(tag) => write!(f, "Unknown ({})", tag),
        }
    }
}

/// A component placed on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: ComponentKind,

    /// Display name from the detector, e.g. "Resistor"
    #[serde(default)]
    pub name: String,

    /// Terminal holes in pin order
    pub terminals: Vec<PhysicalHole>,

    /// Value or model text, rendered verbatim
    #[serde(default)]
    pub value: String,
}

impl Component {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            name: kind.to_string(),
            terminals: Vec::new(),
            value: String::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_terminals<I, S>(mut self, terminals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terminals = terminals.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

fn default_color() -> String {
    "unknown".to_string()
}

/// A jumper wire between two holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    #[serde(default)]
    pub id: u32,

    #[serde(default)]
    pub name: String,

    pub endpoints: [PhysicalHole; 2],

    #[serde(default = "default_color")]
    pub color: String,
}

impl Wire {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: String::new(),
            endpoints: [start.into(), end.into()],
            color: default_color(),
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Everything needed to produce one netlist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardRequest {
    pub components: Vec<Component>,

    #[serde(default)]
    pub wires: Vec<Wire>,

    #[serde(default)]
    pub grounds: Vec<PhysicalHole>,
}

impl BoardRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    pub fn add_wire(&mut self, wire: Wire) {
        self.wires.push(wire);
    }

    pub fn add_ground(&mut self, hole: impl Into<String>) {
        self.grounds.push(hole.into());
    }

    pub fn from_json(content: &str) -> Result<Self, BoardnetError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Every hole label the request mentions, in component, wire, ground order.
    pub fn holes(&self) -> impl Iterator<Item = &str> {
        self.components
            .iter()
            .flat_map(|c| c.terminals.iter())
            .chain(self.wires.iter().flat_map(|w| w.endpoints.iter()))
            .chain(self.grounds.iter())
            .map(String::as_str)
    }

    /// Reject requests the netlist core cannot take: terminal counts that do
    /// not fit the component kind.
    pub fn check_structure(&self) -> Result<(), BoardnetError> {
        for (index, component) in self.components.iter().enumerate() {
            let arity = component.kind.arity();
            let count = component.terminals.len();
            if !arity.accepts(count) {
                return Err(BoardnetError::Request(format!(
                    "component #{} ({}) has {} terminal(s), expected {}",
                    index + 1,
                    component.kind,
                    count,
                    arity
                )));
            }
        }
        Ok(())
    }
}
