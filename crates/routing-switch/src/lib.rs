//! OpenFlow routing switch.
//!
//! Turns a set of independently managed OpenFlow switches into one logical
//! learning switch. Hosts are learned from packet-ins; traffic to a known
//! host is carried over the shortest path through the switch graph by
//! installing one exact-match flow per hop, and traffic to an unknown host
//! is flooded out of every host-facing port in the network.
//!
//! # Architecture
//!
//! ```text
//! JsonLineBridge ──events──▶ RoutingSwitchDaemon ──▶ RoutingSwitchOrch
//!       ▲                                               │  ├─ PortTable
//!       └──────────── messages / topology queries ──────┘  ├─ FdbOrch
//!                                                          └─ PathResolver ─ Graph
//! ```
//!
//! - [`topology`]: graph store and per-switch port state
//! - [`path`]: Dijkstra and the asynchronous resolution protocol
//! - [`fdb`]: host learning with aging and host-move guard
//! - [`switch`]: the orchestrator tying everything to packet-ins
//! - [`daemon`]: event loop and the JSON-lines adapter

pub mod clock;
pub mod config;
pub mod daemon;
pub mod error;
pub mod fdb;
pub mod logging;
pub mod path;
pub mod switch;
pub mod sync_map;
pub mod topology;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::RoutingSwitchConfig;
pub use daemon::{ControllerEvent, JsonLineBridge, RoutingSwitchDaemon, RoutingSwitchDaemonConfig};
pub use error::{Result, RoutingSwitchError, TopologyError};
pub use fdb::{FdbOrch, LearnOutcome, Location};
pub use path::{shortest_path, Endpoint, Hop, PathResolver};
pub use switch::{DropReason, PacketInVerdict, PathOutcome, RoutingSwitchOrch, RoutingSwitchStats};
pub use sync_map::SyncMap;
pub use topology::{Graph, PortTable};
