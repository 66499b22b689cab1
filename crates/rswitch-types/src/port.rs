//! OpenFlow 1.0 port numbers.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 16-bit OpenFlow 1.0 port number.
///
/// Physical ports are numbered `1..PortNo::MAX`; the values above `MAX` are
/// reserved pseudo ports understood by the switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortNo(u16);

impl PortNo {
    /// Highest physical port number (exclusive).
    pub const MAX: PortNo = PortNo(0xff00);
    /// Send the packet out the input port.
    pub const IN_PORT: PortNo = PortNo(0xfff8);
    /// Submit the packet to the first flow table.
    pub const TABLE: PortNo = PortNo(0xfff9);
    /// Process with normal L2/L3 switching.
    pub const NORMAL: PortNo = PortNo(0xfffa);
    /// All physical ports except input port and those blocked by STP.
    pub const FLOOD: PortNo = PortNo(0xfffb);
    /// All physical ports except input port.
    pub const ALL: PortNo = PortNo(0xfffc);
    /// Send to controller.
    pub const CONTROLLER: PortNo = PortNo(0xfffd);
    /// Local openflow "port".
    pub const LOCAL: PortNo = PortNo(0xfffe);
    /// Not associated with a physical port.
    pub const NONE: PortNo = PortNo(0xffff);

    /// Creates a port number from its raw value.
    pub const fn new(raw: u16) -> Self {
        PortNo(raw)
    }

    /// Returns the raw 16-bit value.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true for a real switch port (not a reserved pseudo port).
    pub const fn is_physical(&self) -> bool {
        self.0 != 0 && self.0 < Self::MAX.0
    }

    /// Returns true for one of the reserved pseudo ports.
    pub const fn is_reserved(&self) -> bool {
        self.0 >= Self::MAX.0
    }
}

impl fmt::Display for PortNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::IN_PORT => f.write_str("IN_PORT"),
            Self::TABLE => f.write_str("TABLE"),
            Self::NORMAL => f.write_str("NORMAL"),
            Self::FLOOD => f.write_str("FLOOD"),
            Self::ALL => f.write_str("ALL"),
            Self::CONTROLLER => f.write_str("CONTROLLER"),
            Self::LOCAL => f.write_str("LOCAL"),
            Self::NONE => f.write_str("NONE"),
            PortNo(raw) => write!(f, "{}", raw),
        }
    }
}

impl FromStr for PortNo {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u16>()
            .map(PortNo)
            .map_err(|_| ParseError::InvalidPortNo(s.to_string()))
    }
}

impl From<u16> for PortNo {
    fn from(raw: u16) -> Self {
        PortNo(raw)
    }
}

impl From<PortNo> for u16 {
    fn from(port: PortNo) -> u16 {
        port.0
    }
}
