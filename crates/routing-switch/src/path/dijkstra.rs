//! Single-source shortest path.

use super::hop::{Endpoint, Hop};
use crate::topology::{Edge, Graph};
use rswitch_types::SwitchId;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Finds the cheapest path from `from` to `to` over links that are up.
///
/// The result has one [`Hop`] per switch, ordered from `from` to `to`. The
/// first hop enters on `from.port` and the last leaves on `to.port`. An
/// empty list means there is no path, including when either switch is
/// unknown to the graph. Both endpoints on the same switch give a single
/// hop without consulting the graph.
///
/// Equal-cost candidates are settled in the order they were discovered and
/// a node's predecessor only changes on a strictly shorter distance, so the
/// result is the same on every call against an unchanged graph.
pub fn shortest_path(graph: &Graph, from: Endpoint, to: Endpoint) -> Vec<Hop> {
    if from.switch == to.switch {
        return vec![Hop::new(from.switch, from.port, to.port)];
    }
    if !graph.contains(from.switch) || !graph.contains(to.switch) {
        return Vec::new();
    }

    let mut distance: HashMap<SwitchId, u64> = HashMap::new();
    let mut previous: HashMap<SwitchId, (SwitchId, Edge)> = HashMap::new();
    let mut settled: HashSet<SwitchId> = HashSet::new();
    // (distance, discovery sequence, node): the sequence number keeps ties FIFO
    let mut queue = BinaryHeap::new();
    let mut sequence: u64 = 0;

    distance.insert(from.switch, 0);
    queue.push(Reverse((0u64, sequence, from.switch)));

    while let Some(Reverse((dist, _, current))) = queue.pop() {
        if !settled.insert(current) {
            continue;
        }
        if current == to.switch {
            break;
        }
        let Some(node) = graph.get_node(current) else {
            continue;
        };

        for edge in node.edges().filter(|e| e.up) {
            if settled.contains(&edge.peer) {
                continue;
            }
            let candidate = dist + u64::from(edge.cost);
            let improves = distance
                .get(&edge.peer)
                .map_or(true, |&known| candidate < known);
            if improves {
                distance.insert(edge.peer, candidate);
                previous.insert(edge.peer, (current, *edge));
                sequence += 1;
                queue.push(Reverse((candidate, sequence, edge.peer)));
            }
        }
    }

    if !settled.contains(&to.switch) {
        return Vec::new();
    }

    // Walk back from the destination collecting the edges used
    let mut edges = Vec::new();
    let mut cursor = to.switch;
    while cursor != from.switch {
        let Some(&(prev, edge)) = previous.get(&cursor) else {
            return Vec::new();
        };
        edges.push((prev, edge));
        cursor = prev;
    }
    edges.reverse();

    let mut hops = Vec::with_capacity(edges.len() + 1);
    let mut in_port = from.port;
    for (switch, edge) in &edges {
        hops.push(Hop::new(*switch, in_port, edge.local_port));
        in_port = edge.peer_port;
    }
    hops.push(Hop::new(to.switch, in_port, to.port));
    hops
}
