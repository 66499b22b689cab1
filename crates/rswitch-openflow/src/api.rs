//! Collaborator traits implemented by the transport and topology layers.

use crate::error::SendError;
use crate::message::Message;
use rswitch_types::SwitchId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sends messages to switches.
///
/// Delivery is fire-and-forget. Implementations must not block: the
/// controller calls this from its single dispatch thread.
pub trait MessageSender: Send + Sync {
    fn send_message(&self, switch: SwitchId, message: Message) -> Result<(), SendError>;
}

/// Identifies one outstanding topology query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    pub const fn new(raw: u64) -> Self {
        RequestId(raw)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Access to the link-discovery service.
pub trait TopologyService: Send + Sync {
    /// Requests a snapshot of all known links.
    ///
    /// The answer arrives later, exactly once, as a link snapshot tagged with
    /// `request`. An `Err` means the query was never issued.
    fn query_links(&self, request: RequestId) -> Result<(), SendError>;
}
