//! Controller-to-switch messages.
//!
//! Messages are built from explicit field values; encoding them on the wire
//! is the transport's job.

use crate::action::Action;
use crate::flow_match::Match;
use rswitch_types::PortNo;
use serde::{Deserialize, Serialize};

/// OpenFlow transaction id.
pub type Xid = u32;

/// Switch-side packet buffer id. `None` means the packet data is carried in
/// the message itself.
pub type BufferId = Option<u32>;

/// A message addressed to one switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub xid: Xid,
    #[serde(flatten)]
    pub body: MessageBody,
}

/// The message kinds the controller emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageBody {
    FlowMod(FlowMod),
    PacketOut(PacketOut),
    FeaturesRequest,
    SetConfig(SwitchConfig),
}

impl Message {
    pub fn flow_mod(xid: Xid, flow_mod: FlowMod) -> Self {
        Self {
            xid,
            body: MessageBody::FlowMod(flow_mod),
        }
    }

    pub fn packet_out(xid: Xid, packet_out: PacketOut) -> Self {
        Self {
            xid,
            body: MessageBody::PacketOut(packet_out),
        }
    }

    pub fn features_request(xid: Xid) -> Self {
        Self {
            xid,
            body: MessageBody::FeaturesRequest,
        }
    }

    pub fn set_config(xid: Xid, config: SwitchConfig) -> Self {
        Self {
            xid,
            body: MessageBody::SetConfig(config),
        }
    }

    /// Returns the flow-mod body, if this is a flow-mod.
    pub fn as_flow_mod(&self) -> Option<&FlowMod> {
        match &self.body {
            MessageBody::FlowMod(fm) => Some(fm),
            _ => None,
        }
    }

    /// Returns the packet-out body, if this is a packet-out.
    pub fn as_packet_out(&self) -> Option<&PacketOut> {
        match &self.body {
            MessageBody::PacketOut(po) => Some(po),
            _ => None,
        }
    }
}

/// `ofp_flow_mod_command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowModCommand {
    Add,
    Modify,
    ModifyStrict,
    Delete,
    DeleteStrict,
}

/// `ofp_flow_mod_flags`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowModFlags {
    #[serde(default)]
    pub send_flow_removed: bool,
    #[serde(default)]
    pub check_overlap: bool,
}

/// A flow table modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMod {
    pub command: FlowModCommand,
    #[serde(rename = "match")]
    pub flow_match: Match,
    pub cookie: u64,
    /// Seconds of inactivity before the entry is removed (0 = never).
    pub idle_timeout: u16,
    /// Seconds before the entry is removed regardless of activity (0 = never).
    pub hard_timeout: u16,
    pub priority: u16,
    pub buffer_id: BufferId,
    /// Restricts delete commands to entries outputting to this port.
    pub out_port: PortNo,
    pub flags: FlowModFlags,
    /// An empty action list drops matching packets.
    pub actions: Vec<Action>,
}

impl FlowMod {
    /// An `ADD` flow-mod with no buffer and no flags.
    pub fn add(
        flow_match: Match,
        idle_timeout: u16,
        hard_timeout: u16,
        priority: u16,
        actions: Vec<Action>,
    ) -> Self {
        Self {
            command: FlowModCommand::Add,
            flow_match,
            cookie: 0,
            idle_timeout,
            hard_timeout,
            priority,
            buffer_id: None,
            out_port: PortNo::NONE,
            flags: FlowModFlags::default(),
            actions,
        }
    }

    /// A non-strict `DELETE` of every entry covered by `flow_match`.
    pub fn delete(flow_match: Match) -> Self {
        Self {
            command: FlowModCommand::Delete,
            flow_match,
            cookie: 0,
            idle_timeout: 0,
            hard_timeout: 0,
            priority: 0,
            buffer_id: None,
            out_port: PortNo::NONE,
            flags: FlowModFlags::default(),
            actions: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: FlowModFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Returns true if matching packets are dropped.
    pub fn is_drop(&self) -> bool {
        self.command == FlowModCommand::Add && self.actions.is_empty()
    }
}

/// An instruction to emit one packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketOut {
    pub buffer_id: BufferId,
    pub in_port: PortNo,
    pub actions: Vec<Action>,
    /// Frame bytes; empty when `buffer_id` refers to a switch buffer.
    #[serde(default)]
    pub data: Vec<u8>,
}

impl PacketOut {
    /// A packet-out carrying the frame itself.
    pub fn with_data(in_port: PortNo, actions: Vec<Action>, data: Vec<u8>) -> Self {
        Self {
            buffer_id: None,
            in_port,
            actions,
            data,
        }
    }

    /// Output ports named by this packet-out's actions, in order.
    pub fn output_ports(&self) -> Vec<PortNo> {
        self.actions.iter().filter_map(Action::output_port).collect()
    }
}

/// `ofp_switch_config` as sent in a set-config message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchConfig {
    /// `ofp_config_flags` (IP fragment handling).
    pub flags: u16,
    /// Bytes of a missed packet to send to the controller.
    pub miss_send_len: u16,
}

/// Allocates transaction ids.
#[derive(Debug, Clone)]
pub struct XidGenerator {
    next: Xid,
}

impl XidGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Returns the next transaction id, wrapping past `u32::MAX` and never
    /// handing out 0.
    pub fn next_xid(&mut self) -> Xid {
        let xid = self.next;
        self.next = match self.next.wrapping_add(1) {
            0 => 1,
            n => n,
        };
        xid
    }
}

impl Default for XidGenerator {
    fn default() -> Self {
        Self::new()
    }
}
