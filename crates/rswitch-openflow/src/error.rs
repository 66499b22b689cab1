//! Error types for the southbound layer.

use rswitch_types::SwitchId;
use thiserror::Error;

/// Failure to classify a raw frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("frame truncated: need {needed} bytes, have {actual}")]
    Truncated { needed: usize, actual: usize },

    #[error("malformed {protocol} header")]
    Malformed { protocol: &'static str },
}

/// Failure to hand a message to a switch or the topology service.
///
/// Sends are fire-and-forget: an `Ok` only means the message left the
/// controller, never that the switch applied it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("switch {0} is not connected")]
    NotConnected(SwitchId),

    #[error("transport closed")]
    Closed,

    #[error("transport error: {0}")]
    Transport(String),
}
