//! Circuit Graph
//!
//! A petgraph view of a rendered netlist. Components and nets are both nodes;
//! every connected pin is an edge from its component to its net. `NC` pins have
//! no edge.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::circuit::schema::ComponentKind;
use crate::netlist::{NodeRef, SpiceNetlist};

/// Node type in the circuit graph
#[derive(Debug, Clone, PartialEq)]
pub enum CircuitNode {
    /// A component line: designator and kind
    Component { designator: String, kind: ComponentKind },

    /// A rendered net (`0` or `N####`)
    Net(NodeRef),
}

impl CircuitNode {
    pub fn is_component(&self) -> bool {
        matches!(self, CircuitNode::Component { .. })
    }

    pub fn is_net(&self) -> bool {
        matches!(self, CircuitNode::Net(_))
    }

    pub fn as_net(&self) -> Option<NodeRef> {
        match self {
            CircuitNode::Net(n) => Some(*n),
            _ => None,
        }
    }

    pub fn designator(&self) -> Option<&str> {
        match self {
            CircuitNode::Component { designator, .. } => Some(designator.as_str()),
            _ => None,
        }
    }
}

/// Edge type in the circuit graph - one pin connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinEdge {
    /// Zero-based terminal index on the component
    pub pin: usize,
}

/// A component pin as seen from a net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRef {
    pub designator: String,
    pub pin: usize,
}

#[derive(Debug, Clone)]
pub struct Circuit {
    graph: DiGraph<CircuitNode, PinEdge>,

    /// Component nodes in netlist line order
    components: Vec<NodeIndex>,

    /// Designator -> component nodes; more than one entry means a collision
    designator_indices: HashMap<String, Vec<NodeIndex>>,

    net_indices: HashMap<NodeRef, NodeIndex>,

    /// Pins rendered `NC`
    unconnected: Vec<PinRef>,
}

impl Circuit {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            components: Vec::new(),
            designator_indices: HashMap::new(),
            net_indices: HashMap::new(),
            unconnected: Vec::new(),
        }
    }

    pub fn from_netlist(netlist: &SpiceNetlist) -> Self {
        let mut circuit = Self::new();

        for line in &netlist.lines {
            let comp_idx = circuit.add_component(&line.designator, line.kind);
            for (pin, node) in line.nodes.iter().enumerate() {
                if node.is_connected() {
                    let net_idx = circuit.net_index(*node);
                    circuit.graph.add_edge(comp_idx, net_idx, PinEdge { pin });
                } else {
                    circuit.unconnected.push(PinRef {
                        designator: line.designator.clone(),
                        pin,
                    });
                }
            }
        }

        circuit
    }

    fn add_component(&mut self, designator: &str, kind: ComponentKind) -> NodeIndex {
        let idx = self.graph.add_node(CircuitNode::Component {
            designator: designator.to_string(),
            kind,
        });
        self.components.push(idx);
        self.designator_indices
            .entry(designator.to_string())
            .or_default()
            .push(idx);
        idx
    }

    fn net_index(&mut self, net: NodeRef) -> NodeIndex {
        if let Some(&idx) = self.net_indices.get(&net) {
            return idx;
        }
        let idx = self.graph.add_node(CircuitNode::Net(net));
        self.net_indices.insert(net, idx);
        idx
    }

    /// All nets, ground first, then by node number
    pub fn nets(&self) -> Vec<NodeRef> {
        let mut nets: Vec<NodeRef> = self.net_indices.keys().copied().collect();
        nets.sort_by_key(|n| match n {
            NodeRef::Ground => 0,
            NodeRef::Node(k) => u64::from(*k),
            NodeRef::NoConnect => u64::MAX,
        });
        nets
    }

    /// Nets connected to every component with this designator, in pin order
    pub fn nets_for_component(&self, designator: &str) -> Vec<NodeRef> {
        let Some(indices) = self.designator_indices.get(designator) else {
            return Vec::new();
        };

        let mut pins: Vec<(usize, NodeRef)> = indices
            .iter()
            .flat_map(|&idx| self.graph.edges_directed(idx, Direction::Outgoing))
            .filter_map(|edge| {
                self.graph
                    .node_weight(edge.target())
                    .and_then(|n| n.as_net())
                    .map(|net| (edge.weight().pin, net))
            })
            .collect();
        pins.sort_by_key(|(pin, _)| *pin);
        pins.into_iter().map(|(_, net)| net).collect()
    }

    /// Component pins on a net, in netlist order
    pub fn components_on_net(&self, net: NodeRef) -> Vec<PinRef> {
        let Some(&net_idx) = self.net_indices.get(&net) else {
            return Vec::new();
        };

        let mut pins: Vec<(usize, PinRef)> = self
            .graph
            .edges_directed(net_idx, Direction::Incoming)
            .filter_map(|edge| {
                let position = self.components.iter().position(|&c| c == edge.source())?;
                let designator = self.graph.node_weight(edge.source())?.designator()?;
                Some((
                    position,
                    PinRef {
                        designator: designator.to_string(),
                        pin: edge.weight().pin,
                    },
                ))
            })
            .collect();
        pins.sort_by_key(|(position, pin)| (*position, pin.pin));
        pins.into_iter().map(|(_, pin)| pin).collect()
    }

    pub fn unconnected_pins(&self) -> &[PinRef] {
        &self.unconnected
    }

    /// Designators used by more than one component, with their counts
    pub fn duplicate_designators(&self) -> BTreeMap<String, usize> {
        self.designator_indices
            .iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(designator, indices)| (designator.clone(), indices.len()))
            .collect()
    }

    pub fn stats(&self) -> CircuitStats {
        CircuitStats {
            component_count: self.components.len(),
            net_count: self.net_indices.len(),
            connection_count: self.graph.edge_count(),
            unconnected_count: self.unconnected.len(),
        }
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about a circuit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitStats {
    pub component_count: usize,
    pub net_count: usize,
    pub connection_count: usize,
    pub unconnected_count: usize,
}
