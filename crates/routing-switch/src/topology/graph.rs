//! Weighted directed graph of switches.

use rswitch_openflow::LinkStatus;
use rswitch_types::{PortNo, SwitchId};
use std::collections::BTreeMap;
use tracing::debug;

/// Cost of traversing a link that is up.
pub const LINK_COST_UP: u32 = 1;

/// A directed link from the owning node to `peer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub peer: SwitchId,
    /// Port on the owning switch the link leaves from.
    pub local_port: PortNo,
    /// Port on `peer` the link arrives at.
    pub peer_port: PortNo,
    pub cost: u32,
    /// Down and unstable links are kept but never traversed.
    pub up: bool,
}

/// A switch and its outgoing links, keyed by peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: SwitchId,
    edges: BTreeMap<SwitchId, Edge>,
}

impl Node {
    fn new(id: SwitchId) -> Self {
        Self {
            id,
            edges: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> SwitchId {
        self.id
    }

    /// Outgoing links in ascending peer order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub fn edge_to(&self, peer: SwitchId) -> Option<&Edge> {
        self.edges.get(&peer)
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

/// The graph store.
///
/// At most one edge is kept per ordered switch pair. When a snapshot lists
/// parallel links between the same pair, the first up link wins and a down
/// link never hides an up one. `add_link` always replaces. Nodes and edges
/// are ordered by datapath id so searches over the graph are deterministic.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeMap<SwitchId, Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole graph with the links in `snapshot`.
    pub fn rebuild(&mut self, snapshot: &[LinkStatus]) {
        self.nodes.clear();
        for link in snapshot {
            let up = link.status.is_up();
            let shadowed = self
                .nodes
                .get(&link.from_switch)
                .and_then(|node| node.edge_to(link.to_switch))
                .is_some_and(|edge| edge.up);
            if shadowed {
                debug!(
                    from = %link.from_switch,
                    from_port = %link.from_port,
                    to = %link.to_switch,
                    up,
                    "Ignoring parallel link, an up link to the peer is already known"
                );
                continue;
            }
            self.insert_edge(
                link.from_switch,
                link.from_port,
                link.to_switch,
                link.to_port,
                LINK_COST_UP,
                up,
            );
        }
        debug!(
            nodes = self.nodes.len(),
            edges = self.edge_count(),
            "Rebuilt topology graph"
        );
    }

    /// Adds (or replaces) an up link from `from:from_port` to `to:to_port`.
    pub fn add_link(
        &mut self,
        from: SwitchId,
        from_port: PortNo,
        to: SwitchId,
        to_port: PortNo,
        cost: u32,
    ) {
        self.insert_edge(from, from_port, to, to_port, cost, true);
    }

    /// Marks the link leaving `from:from_port` up or down.
    ///
    /// Returns false if no such link is known.
    pub fn update_link(&mut self, from: SwitchId, from_port: PortNo, up: bool) -> bool {
        let Some(node) = self.nodes.get_mut(&from) else {
            return false;
        };
        match node.edges.values_mut().find(|e| e.local_port == from_port) {
            Some(edge) => {
                edge.up = up;
                true
            }
            None => false,
        }
    }

    pub fn get_node(&self, id: SwitchId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: SwitchId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(Node::degree).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert_edge(
        &mut self,
        from: SwitchId,
        from_port: PortNo,
        to: SwitchId,
        to_port: PortNo,
        cost: u32,
        up: bool,
    ) {
        self.nodes.entry(to).or_insert_with(|| Node::new(to));
        self.nodes
            .entry(from)
            .or_insert_with(|| Node::new(from))
            .edges
            .insert(
                to,
                Edge {
                    peer: to,
                    local_port: from_port,
                    peer_port: to_port,
                    cost,
                    up,
                },
            );
    }
}
