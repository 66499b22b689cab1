//! Path elements.

use rswitch_types::{PortNo, SwitchId};
use std::fmt;

/// A (switch, port) attachment point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub switch: SwitchId,
    pub port: PortNo,
}

impl Endpoint {
    pub const fn new(switch: SwitchId, port: PortNo) -> Self {
        Self { switch, port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.switch, self.port)
    }
}

/// One switch on a resolved path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub switch: SwitchId,
    /// Port the path enters the switch on.
    pub in_port: PortNo,
    /// Port the path leaves the switch from.
    pub out_port: PortNo,
}

impl Hop {
    pub const fn new(switch: SwitchId, in_port: PortNo, out_port: PortNo) -> Self {
        Self {
            switch,
            in_port,
            out_port,
        }
    }
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}->{}]", self.switch, self.in_port, self.out_port)
    }
}
