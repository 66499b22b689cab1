//! The routing switch orchestrator.
//!
//! [`RoutingSwitchOrch`] owns the port table, the FDB and the path resolver
//! and turns inbound events into flow programming:
//!
//! - packet-in: validate the ingress port, learn the source, then flood
//!   (unknown destination) or resolve a path and install it hop by hop
//! - link snapshot: finish a pending resolution, installing either the path
//!   or a short-lived discard flow
//! - port/link status: keep the port table and graph current
//! - timer: age out hosts and drop abandoned resolutions
//!
//! Every handler runs to completion and never fails; problems are logged
//! and degrade to dropping the packet concerned.

mod orch;
mod types;

pub use orch::{RoutingSwitchOrch, DISCARD_PRIORITY};
pub use types::{DropReason, PacketInVerdict, PathOutcome, PendingPacket, RoutingSwitchStats};
