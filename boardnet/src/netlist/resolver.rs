//! Connectivity resolution
//!
//! Folds ground declarations and jumper wires into a partition of electrical
//! buses. Each bus maps to a provisional [`NodeId`]; ground buses are pinned to
//! [`NodeId::GROUND`]. Wires are applied in repeated full scans until a scan
//! changes nothing, bounded by `wires.len() + 1` scans.
//!
//! Internally ids form a disjoint-set forest whose root is always the smallest
//! id in its class, so joining two classes keeps the smaller id and ground
//! (id 0) always survives.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{canonicalize, ElectricalBus, PhysicalHole};
use crate::circuit::schema::Wire;

/// Provisional simulator node id. `0` is reserved for ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    pub const GROUND: NodeId = NodeId(0);

    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }

    pub fn is_ground(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "GND")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Bus to node mapping produced by [`resolve`].
#[derive(Debug, Clone)]
pub struct ConnectivityMap {
    buses: BTreeMap<ElectricalBus, NodeId>,
    /// Disjoint-set parent per allocated id; `parent[0]` is ground.
    parent: Vec<u32>,
}

impl ConnectivityMap {
    fn new() -> Self {
        Self {
            buses: BTreeMap::new(),
            parent: vec![0],
        }
    }

    /// Id the next allocation will receive.
    pub fn next_free(&self) -> NodeId {
        NodeId(self.parent.len() as u32)
    }

    pub fn len(&self) -> usize {
        self.buses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buses.is_empty()
    }

    pub fn contains(&self, bus: &ElectricalBus) -> bool {
        self.buses.contains_key(bus)
    }

    /// Resolved node id of `bus`, if it has one.
    pub fn get(&self, bus: &ElectricalBus) -> Option<NodeId> {
        self.buses.get(bus).map(|&id| self.root(id))
    }

    /// All mapped buses with their resolved ids, ordered by bus label.
    pub fn iter(&self) -> impl Iterator<Item = (&ElectricalBus, NodeId)> + '_ {
        self.buses.iter().map(|(bus, &id)| (bus, self.root(id)))
    }

    /// Buses grouped by resolved id, ascending.
    pub fn classes(&self) -> BTreeMap<NodeId, Vec<&ElectricalBus>> {
        let mut classes: BTreeMap<NodeId, Vec<&ElectricalBus>> = BTreeMap::new();
        for (bus, id) in self.iter() {
            classes.entry(id).or_default().push(bus);
        }
        classes
    }

    /// Give an unmapped bus a fresh id of its own.
    ///
    /// Returns the existing id if the bus is already mapped.
    pub fn allocate(&mut self, bus: ElectricalBus) -> NodeId {
        if let Some(id) = self.get(&bus) {
            return id;
        }
        let id = self.fresh_id();
        self.buses.insert(bus, id);
        id
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        NodeId(id)
    }

    fn pin_to_ground(&mut self, bus: ElectricalBus) {
        self.buses.insert(bus, NodeId::GROUND);
    }

    fn root(&self, id: NodeId) -> NodeId {
        let mut i = id.0;
        while self.parent[i as usize] != i {
            i = self.parent[i as usize];
        }
        NodeId(i)
    }

    fn find(&mut self, id: NodeId) -> NodeId {
        let root = self.root(id);
        let mut i = id.0;
        while self.parent[i as usize] != root.0 {
            let next = self.parent[i as usize];
            self.parent[i as usize] = root.0;
            i = next;
        }
        root
    }

    /// Apply one wire. Returns whether the mapping changed.
    fn connect(&mut self, a: &ElectricalBus, b: &ElectricalBus) -> bool {
        match (self.buses.get(a).copied(), self.buses.get(b).copied()) {
            (None, None) => {
                let id = self.fresh_id();
                self.buses.insert(a.clone(), id);
                self.buses.insert(b.clone(), id);
                true
            }
            (Some(id), None) => {
                let id = self.find(id);
                self.buses.insert(b.clone(), id);
                true
            }
            (None, Some(id)) => {
                let id = self.find(id);
                self.buses.insert(a.clone(), id);
                true
            }
            (Some(x), Some(y)) => {
                let (x, y) = (self.find(x), self.find(y));
                if x == y {
                    return false;
                }
                let (target, old) = (x.min(y), x.max(y));
                tracing::debug!("merging node {} into {}", old, target);
                self.parent[old.0 as usize] = target.0;
                true
            }
        }
    }

    /// Rewrite every entry to its class root so no entry names a merged-away id.
    fn flatten(&mut self) {
        let resolved: Vec<(ElectricalBus, NodeId)> = self
            .buses
            .iter()
            .map(|(bus, &id)| (bus.clone(), self.root(id)))
            .collect();
        self.buses.extend(resolved);
        for i in 0..self.parent.len() {
            let root = self.root(NodeId(i as u32));
            self.parent[i] = root.0;
        }
    }
}

/// Resolve wires and grounds into a bus partition.
///
/// Ground holes are pinned to node 0 first. Wires are then scanned in order, at
/// most `wires.len() + 1` times, each scan applying:
///
/// - both buses unmapped: allocate a new shared id (counter starts at 1)
/// - one bus mapped: the other joins its id
/// - both mapped to the same id: nothing
/// - both mapped to different ids: every bus on the larger id moves to the
///   smaller one
///
/// Each merge removes one id, so at most `wires.len()` scans change anything.
pub fn resolve(wires: &[Wire], grounds: &[PhysicalHole]) -> ConnectivityMap {
    let mut map = ConnectivityMap::new();

    for hole in grounds {
        map.pin_to_ground(canonicalize(hole));
    }

    let endpoints: Vec<(ElectricalBus, ElectricalBus)> = wires
        .iter()
        .map(|w| (canonicalize(&w.endpoints[0]), canonicalize(&w.endpoints[1])))
        .collect();

    let max_passes = wires.len() + 1;
    let mut passes = 0;
    while passes < max_passes {
        passes += 1;
        let mut changed = false;
        for (a, b) in &endpoints {
            changed |= map.connect(a, b);
        }
        if !changed {
            break;
        }
    }
    map.flatten();

    tracing::debug!(
        "resolved {} buses into {} nodes after {} pass(es)",
        map.len(),
        map.classes().len(),
        passes
    );

    map
}
