//! SPICE netlist rendering
//!
//! Turns components plus the resolved bus partition into the simulator's
//! netlist text. Output node numbers are renumbered densely from 1 in order of
//! first appearance, independent of the resolver's provisional ids.

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Write};

use serde::Serialize;

use super::resolver::{resolve, NodeId};
use crate::board::{canonicalize, PhysicalHole};
use crate::circuit::schema::{Component, ComponentKind, Wire};

/// Lines closing every netlist.
pub const TRAILER: &str = ".backanno\n.end\n";

/// A rendered terminal connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "node", rename_all = "snake_case")]
pub enum NodeRef {
    Ground,
    /// Output-local node number, starting at 1
    Node(u32),
    /// Terminal whose bus no wire or ground touches
    NoConnect,
}

impl NodeRef {
    pub fn is_connected(self) -> bool {
        !matches!(self, NodeRef::NoConnect)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeRef::Ground => f.write_str("0"),
            NodeRef::Node(n) => write!(f, "N{:04}", n),
            NodeRef::NoConnect => f.write_str("NC"),
        }
    }
}

/// One component line of the netlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetlistLine {
    pub designator: String,
    pub kind: ComponentKind,
    pub nodes: Vec<NodeRef>,
    pub spec: String,
}

impl fmt::Display for NetlistLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.designator)?;
        for node in &self.nodes {
            write!(f, " {}", node)?;
        }
        write!(f, " {}", self.spec)
    }
}

/// A rendered netlist: the structured lines and the exact text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpiceNetlist {
    pub lines: Vec<NetlistLine>,
    /// Number of distinct `N####` nodes
    pub node_count: u32,
    text: String,
}

impl SpiceNetlist {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Count of terminals rendered as `NC`.
    pub fn unconnected_pins(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|l| l.nodes.iter())
            .filter(|n| !n.is_connected())
            .count()
    }
}

impl fmt::Display for SpiceNetlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Hands out designator indices per prefix.
#[derive(Debug, Default)]
struct DesignatorCounter {
    counts: HashMap<&'static str, usize>,
}

impl DesignatorCounter {
    fn next(&mut self, kind: ComponentKind) -> String {
        let prefix = kind.prefix();
        // Sources always take index 1, so several sources share `V1`.
        let index = if kind == ComponentKind::Source {
            1
        } else {
            let count = self.counts.entry(prefix).or_insert(0);
            *count += 1;
            *count
        };
        format!("{}{}", prefix, index)
    }
}

/// Render components against the wire/ground connectivity.
///
/// A terminal is rendered as:
/// - `0` when its bus resolves to ground
/// - `N####` when a wire or ground declaration touches its bus
/// - `NC` otherwise, even though the bus still receives a provisional id
///
/// Touched buses are exactly those present in the resolved mapping before any
/// component terminal is looked at.
pub fn render(components: &[Component], wires: &[Wire], grounds: &[PhysicalHole]) -> SpiceNetlist {
    let mut map = resolve(wires, grounds);

    let touched: HashSet<_> = map.iter().map(|(bus, _)| bus.clone()).collect();

    let terminal_ids: Vec<Vec<(NodeId, bool)>> = components
        .iter()
        .map(|component| {
            component
                .terminals
                .iter()
                .map(|hole| {
                    let bus = canonicalize(hole);
                    let is_touched = touched.contains(&bus);
                    (map.allocate(bus), is_touched)
                })
                .collect()
        })
        .collect();

    let mut designators = DesignatorCounter::default();
    let mut remap: HashMap<NodeId, u32> = HashMap::new();
    let mut lines = Vec::with_capacity(components.len());

    for (component, ids) in components.iter().zip(&terminal_ids) {
        let nodes = ids
            .iter()
            .map(|&(id, is_touched)| {
                if id.is_ground() {
                    NodeRef::Ground
                } else if is_touched {
                    let next = remap.len() as u32 + 1;
                    NodeRef::Node(*remap.entry(id).or_insert(next))
                } else {
                    NodeRef::NoConnect
                }
            })
            .collect();

        lines.push(NetlistLine {
            designator: designators.next(component.kind),
            kind: component.kind,
            nodes,
            spec: component.value.clone(),
        });
    }

    let mut text = String::new();
    for line in &lines {
        // Writing into a String cannot fail.
        let _ = writeln!(text, "{}", line);
    }
    text.push_str(TRAILER);

    tracing::debug!(
        "rendered {} component line(s) over {} node(s), {} provisional id(s)",
        lines.len(),
        remap.len(),
        map.next_free().as_u32()
    );

    SpiceNetlist {
        lines,
        node_count: remap.len() as u32,
        text,
    }
}

/// Netlist text for the given board.
pub fn serialize(components: &[Component], wires: &[Wire], grounds: &[PhysicalHole]) -> String {
    render(components, wires, grounds).into_text()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(kind: ComponentKind, terminals: &[&str], value: &str) -> Component {
        Component::new(kind)
            .with_terminals(terminals.iter().copied())
            .with_value(value)
    }

    fn grounds(holes: &[&str]) -> Vec<PhysicalHole> {
        holes.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_grounded_resistor_with_dangling_side() {
        let components = vec![part(ComponentKind::Resistor, &["A1", "A5"], "10k")];
        let text = serialize(&components, &[], &grounds(&["A1"]));
        assert_eq!(text, "R1 0 NC 10k\n.backanno\n.end\n");
    }

    #[test]
    fn test_shared_wire_node() {
        let components = vec![
            part(ComponentKind::Resistor, &["A1", "A5"], "1k"),
            part(ComponentKind::Resistor, &["F5", "F9"], "2k"),
        ];
        let wires = vec![Wire::new("A5", "F5"), Wire::new("A1", "U+3"), Wire::new("F9", "L-3")];
        let text = serialize(&components, &wires, &[]);
        assert_eq!(
            text,
            "R1 N0001 N0002 1k\nR2 N0002 N0003 2k\n.backanno\n.end\n"
        );
    }

    #[test]
    fn test_empty_board() {
        assert_eq!(serialize(&[], &[], &[]), TRAILER);
    }

    #[test]
    fn test_dense_renumbering_skips_merge_gaps() {
        // Provisional ids 1 and 2 collapse to 1; the F1-F2 wire takes 3.
        let wires = vec![
            Wire::new("A1", "A2"),
            Wire::new("A3", "A4"),
            Wire::new("A2", "A3"),
            Wire::new("F1", "F2"),
        ];
        let components = vec![part(ComponentKind::Capacitor, &["F2", "C4"], "100n")];
        let text = serialize(&components, &wires, &[]);
        assert_eq!(text, "C1 N0001 N0002 100n\n.backanno\n.end\n");
    }

    #[test]
    fn test_numbering_follows_component_order() {
        let wires = vec![Wire::new("A1", "A2"), Wire::new("A3", "A4")];
        let components = vec![
            part(ComponentKind::Resistor, &["A3", "A1"], "1k"),
            part(ComponentKind::Resistor, &["A2", "A4"], "1k"),
        ];
        let text = serialize(&components, &wires, &[]);
        assert_eq!(
            text,
            "R1 N0001 N0002 1k\nR2 N0002 N0001 1k\n.backanno\n.end\n"
        );
    }

    #[test]
    fn test_ground_reached_through_wires() {
        let wires = vec![Wire::new("A7", "F7"), Wire::new("F7", "L-2")];
        let components = vec![
            part(ComponentKind::Led, &["B7", "B8"], "red"),
            part(ComponentKind::Resistor, &["J7", "U+0"], "220"),
        ];
        let text = serialize(&components, &wires, &grounds(&["L-40"]));
        assert_eq!(text, "LED1 0 NC red\nR1 0 NC 220\n.backanno\n.end\n");
    }

    #[test]
    fn test_shared_column_without_wire_stays_unconnected() {
        let components = vec![
            part(ComponentKind::Resistor, &["A10", "A20"], "1k"),
            part(ComponentKind::Resistor, &["C20", "A30"], "1k"),
        ];
        let text = serialize(&components, &[], &[]);
        assert_eq!(text, "R1 NC NC 1k\nR2 NC NC 1k\n.backanno\n.end\n");
    }

    #[test]
    fn test_designator_counters() {
        let components = vec![
            part(ComponentKind::Resistor, &["A1", "A2"], "1k"),
            part(ComponentKind::Capacitor, &["A1", "A2"], "1u"),
            part(ComponentKind::Resistor, &["A1", "A2"], "2k"),
            part(ComponentKind::Mosfet, &["A1", "A2", "A3"], "NMOS"),
            part(ComponentKind::ThreeTerminal, &["A1", "A2", "A3"], "Q"),
            part(ComponentKind::IntegratedCircuit, &["A1", "A2", "F1", "F2"], "555"),
            part(ComponentKind::CurrentSource, &["A1", "A2"], "1m"),
            part(ComponentKind::Wire, &["A1", "A2"], ""),
            part(ComponentKind::Other(12), &["A1", "A2"], "x"),
            part(ComponentKind::Other(-4), &["A1", "A2"], "y"),
        ];
        let netlist = render(&components, &[], &[]);
        let designators: Vec<&str> = netlist.lines.iter().map(|l| l.designator.as_str()).collect();
        assert_eq!(
            designators,
            vec!["R1", "C1", "R2", "MOST1", "CIRT1", "IC1", "I1", "wire1", "U1", "U2"]
        );
    }

    #[test]
    fn test_sources_share_index_one() {
        let components = vec![
            part(ComponentKind::Source, &["U+0", "U-0"], "DC 5"),
            part(ComponentKind::Source, &["L+0", "L-0"], "DC 9"),
        ];
        let netlist = render(&components, &[], &grounds(&["U-1", "L-1"]));
        assert_eq!(
            netlist.text(),
            "V1 NC 0 DC 5\nV1 NC 0 DC 9\n.backanno\n.end\n"
        );
    }

    #[test]
    fn test_empty_spec_keeps_separator() {
        let components = vec![part(ComponentKind::Resistor, &["A1", "A2"], "")];
        assert_eq!(
            serialize(&components, &[], &[]),
            "R1 NC NC \n.backanno\n.end\n"
        );
    }

    #[test]
    fn test_multi_pin_component() {
        let wires = vec![Wire::new("E3", "U+3"), Wire::new("F4", "G9")];
        let components = vec![part(
            ComponentKind::IntegratedCircuit,
            &["E3", "E4", "F3", "F4"],
            "NE555",
        )];
        let netlist = render(&components, &wires, &grounds(&["F3"]));
        assert_eq!(
            netlist.text(),
            "IC1 N0001 NC 0 N0002 NE555\n.backanno\n.end\n"
        );
        assert_eq!(netlist.node_count, 2);
        assert_eq!(netlist.unconnected_pins(), 1);
    }

    #[test]
    fn test_render_is_deterministic() {
        let wires = vec![Wire::new("A1", "F1"), Wire::new("F2", "A9"), Wire::new("A9", "U+0")];
        let components = vec![
            part(ComponentKind::Resistor, &["C1", "D9"], "1k"),
            part(ComponentKind::Capacitor, &["G2", "H1"], "10u"),
            part(ComponentKind::Source, &["U+4", "L-4"], "DC 5"),
        ];
        let g = grounds(&["L-0"]);
        let first = serialize(&components, &wires, &g);
        for _ in 0..5 {
            assert_eq!(serialize(&components, &wires, &g), first);
        }
    }

    #[test]
    fn test_node_ref_display() {
        assert_eq!(NodeRef::Ground.to_string(), "0");
        assert_eq!(NodeRef::Node(7).to_string(), "N0007");
        assert_eq!(NodeRef::Node(12345).to_string(), "N12345");
        assert_eq!(NodeRef::NoConnect.to_string(), "NC");
    }
}
