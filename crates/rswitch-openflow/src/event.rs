//! Records delivered to the controller by switches and the topology service.

use crate::message::{BufferId, Xid};
use rswitch_types::{PortNo, SwitchId};
use serde::{Deserialize, Serialize};

/// `ofp_packet_in_reason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketInReason {
    /// No matching flow.
    NoMatch,
    /// Action explicitly output to controller.
    Action,
}

/// A packet that missed a switch's flow table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketIn {
    pub switch: SwitchId,
    pub xid: Xid,
    pub buffer_id: BufferId,
    pub total_len: u16,
    pub in_port: PortNo,
    pub reason: PacketInReason,
    /// Frame bytes (possibly truncated to `miss_send_len`).
    pub data: Vec<u8>,
}

/// Port state reported by the topology service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortState {
    Up,
    Down,
}

/// A single port-status notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStatus {
    pub switch: SwitchId,
    pub port: PortNo,
    /// True if no switch-to-switch link has been discovered on the port.
    pub external: bool,
    pub status: PortState,
}

/// Link state reported by the discovery protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    Up,
    Down,
    /// Seen intermittently; treated as not usable.
    Unstable,
}

impl LinkState {
    pub fn is_up(&self) -> bool {
        matches!(self, LinkState::Up)
    }
}

/// A directed link record: `from_switch:from_port` transmits to
/// `to_switch:to_port`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStatus {
    pub from_switch: SwitchId,
    pub from_port: PortNo,
    pub to_switch: SwitchId,
    pub to_port: PortNo,
    pub status: LinkState,
}

/// The subset of `ofp_switch_features` the controller looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesReply {
    pub switch: SwitchId,
    pub xid: Xid,
    pub n_buffers: u32,
    pub n_tables: u8,
    #[serde(default)]
    pub ports: Vec<PortNo>,
}
