//! Topology state.
//!
//! Two views of the network are kept here:
//!
//! - [`Graph`]: switches and the directed links between them, used for
//!   shortest-path search. Rebuilt wholesale from every link snapshot.
//! - [`PortTable`]: every known port and whether it faces hosts or other
//!   switches, used for ingress checks and flooding.

mod graph;
mod ports;

pub use graph::{Edge, Graph, Node, LINK_COST_UP};
pub use ports::{PortInfo, PortTable, SwitchInfo};
