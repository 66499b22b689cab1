//! OpenFlow 1.0 southbound model for the routing switch controller.
//!
//! This crate is the boundary between the controller core and the outside
//! world. The core never touches bytes on the wire; it builds typed
//! messages from explicit field values and hands them to a
//! [`MessageSender`]. Topology information arrives through a
//! [`TopologyService`] and the inbound records in [`event`].
//!
//! # Architecture
//!
//! - [`action`]: closed set of OpenFlow actions
//! - [`flow_match`]: the 12-tuple match and exact-match derivation from a frame
//! - [`packet`]: Ethernet/VLAN/ARP/IPv4/TCP/UDP/ICMP header classification
//! - [`message`]: flow-mod, packet-out, features-request and set-config
//! - [`event`]: packet-in, port-status, link-status and features-reply records
//! - [`api`]: collaborator traits implemented by the transport layer

pub mod action;
pub mod api;
pub mod error;
pub mod event;
pub mod flow_match;
pub mod message;
pub mod packet;

pub use action::Action;
pub use api::{MessageSender, RequestId, TopologyService};
pub use error::{PacketError, SendError};
pub use event::{
    FeaturesReply, LinkState, LinkStatus, PacketIn, PacketInReason, PortState, PortStatus,
};
pub use flow_match::Match;
pub use message::{
    BufferId, FlowMod, FlowModCommand, FlowModFlags, Message, MessageBody, PacketOut,
    SwitchConfig, Xid, XidGenerator,
};
pub use packet::{pad_to_minimum, EthernetHeader, ETH_MINIMUM_LENGTH};
