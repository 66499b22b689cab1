//! Orchestrator result and statistics types.

use rswitch_openflow::RequestId;
use rswitch_types::{PortNo, SwitchId};
use std::collections::HashMap;

/// Why a packet-in was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// Frame too short or malformed to classify.
    Unclassifiable,
    /// Link discovery frame.
    Discovery,
    /// Ingress (switch, port) is not in the port table.
    UnknownPort,
    /// Ingress port faces another switch and the relay exception does not apply.
    NotEligible,
    /// Group source address.
    InvalidSource,
    /// Source seen at a new location inside the host-move guard.
    HostMoveGuard,
    /// Destination is attached to the ingress port itself.
    AlreadyPlaced,
    /// The topology query could not be issued.
    TopologyUnavailable,
}

/// What `on_packet_in` decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketInVerdict {
    Dropped(DropReason),
    /// Sent to every eligible external port; `switches` packet-outs went out.
    Flooded { switches: usize },
    /// Waiting for the link snapshot tagged with this id.
    Resolving(RequestId),
}

/// What a completed resolution did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOutcome {
    /// One flow-mod per hop and a packet-out at the tail.
    Installed { hops: usize },
    /// No path: a discard flow was installed at the ingress switch.
    Discarded,
    /// The buffered packet could not be turned into a match.
    Unclassifiable,
}

/// A packet waiting on a path resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPacket {
    pub switch: SwitchId,
    pub in_port: PortNo,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingSwitchStats {
    pub packet_ins: u64,
    pub packets_dropped: u64,
    pub drops_by_reason: HashMap<DropReason, u64>,
    pub floods: u64,
    pub resolutions_started: u64,
    pub resolutions_expired: u64,
    pub paths_installed: u64,
    pub discards_installed: u64,
    pub flow_mods_sent: u64,
    pub packet_outs_sent: u64,
    pub send_failures: u64,
    pub hosts_moved: u64,
    pub fdb_evictions: u64,
}

impl RoutingSwitchStats {
    pub fn drops(&self, reason: DropReason) -> u64 {
        self.drops_by_reason.get(&reason).copied().unwrap_or(0)
    }

    pub(crate) fn record_drop(&mut self, reason: DropReason) {
        self.packets_dropped += 1;
        *self.drops_by_reason.entry(reason).or_insert(0) += 1;
    }
}
