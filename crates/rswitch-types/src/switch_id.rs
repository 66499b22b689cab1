//! OpenFlow datapath identifier.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 64-bit OpenFlow datapath identifier.
///
/// Datapath ids are opaque: the controller only compares, hashes and orders
/// them. The ordering is used wherever iteration over switches has to be
/// deterministic (path tie-breaking, flood order).
///
/// # Examples
///
/// ```
/// use rswitch_types::SwitchId;
///
/// let id: SwitchId = "0xabc".parse().unwrap();
/// assert_eq!(id, SwitchId::new(0xabc));
/// assert_eq!(id.to_string(), "0x0000000000000abc");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SwitchId(u64);

impl SwitchId {
    /// Creates a datapath id from its raw value.
    pub const fn new(raw: u64) -> Self {
        SwitchId(raw)
    }

    /// Returns the raw 64-bit value.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

impl FromStr for SwitchId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => u64::from_str_radix(hex, 16),
            None => s.parse::<u64>(),
        };
        parsed
            .map(SwitchId)
            .map_err(|_| ParseError::InvalidSwitchId(s.to_string()))
    }
}

impl From<u64> for SwitchId {
    fn from(raw: u64) -> Self {
        SwitchId(raw)
    }
}

impl From<SwitchId> for u64 {
    fn from(id: SwitchId) -> u64 {
        id.0
    }
}
