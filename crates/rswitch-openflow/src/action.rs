//! OpenFlow 1.0 actions.

use rswitch_types::{MacAddress, PortNo};
use serde::{Deserialize, Serialize};

/// Default `max_len` for output actions: send the whole packet.
pub const OUTPUT_MAX_LEN: u16 = u16::MAX;

/// The closed set of actions the controller can emit.
///
/// Adding a kind here forces every exhaustive `match` in the code base to
/// handle it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Output to a port. `max_len` only matters for `CONTROLLER`.
    Output { port: PortNo, max_len: u16 },
    /// Set the 802.1Q VLAN id.
    SetVlanVid { vid: u16 },
    /// Strip the 802.1Q header.
    StripVlan,
    /// Rewrite the Ethernet source address.
    SetDlSrc { mac: MacAddress },
    /// Rewrite the Ethernet destination address.
    SetDlDst { mac: MacAddress },
}

impl Action {
    /// Output to `port`, forwarding the whole packet.
    pub fn output(port: PortNo) -> Self {
        Action::Output {
            port,
            max_len: OUTPUT_MAX_LEN,
        }
    }

    /// Returns the output port if this is an output action.
    pub fn output_port(&self) -> Option<PortNo> {
        match self {
            Action::Output { port, .. } => Some(*port),
            Action::SetVlanVid { .. }
            | Action::StripVlan
            | Action::SetDlSrc { .. }
            | Action::SetDlDst { .. } => None,
        }
    }
}
