//! Error types for the routing switch.

use rswitch_openflow::{PacketError, SendError};
use rswitch_types::{PortNo, SwitchId};
use thiserror::Error;

/// Inconsistencies between an event and the port/topology state.
///
/// These are never fatal: the caller logs them and carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("unknown switch {0}")]
    UnknownSwitch(SwitchId),

    #[error("unknown port {port} on switch {switch}")]
    UnknownPort { switch: SwitchId, port: PortNo },
}

/// Top-level error for the routing switch library.
#[derive(Debug, Error)]
pub enum RoutingSwitchError {
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Packet error: {0}")]
    Packet(#[from] PacketError),

    #[error("Send error: {0}")]
    Send(#[from] SendError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RoutingSwitchError>;
