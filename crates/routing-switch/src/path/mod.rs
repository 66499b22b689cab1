//! Path resolution.
//!
//! [`shortest_path`] is a plain Dijkstra over a [`Graph`](crate::topology::Graph).
//! [`PathResolver`] wraps it in the asynchronous query/snapshot protocol:
//! every resolution first asks the topology service for a fresh link
//! snapshot, parks the caller's context under a [`RequestId`], and finishes
//! when the snapshot for that id comes back.
//!
//! [`RequestId`]: rswitch_openflow::RequestId

mod dijkstra;
mod hop;
mod resolver;

pub use dijkstra::shortest_path;
pub use hop::{Endpoint, Hop};
pub use resolver::{PathResolver, Resolution};
