//! FDB types.

use crate::path::Endpoint;
use rswitch_types::{MacAddress, PortNo, SwitchId};
use std::fmt;
use std::time::{Duration, Instant};

/// Where a host is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    pub switch: SwitchId,
    pub port: PortNo,
}

impl Location {
    pub const fn new(switch: SwitchId, port: PortNo) -> Self {
        Self { switch, port }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.switch, self.port)
    }
}

impl From<Location> for Endpoint {
    fn from(loc: Location) -> Self {
        Endpoint::new(loc.switch, loc.port)
    }
}

/// A learned host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FdbEntry {
    pub mac: MacAddress,
    pub location: Location,
    pub created_at: Instant,
    pub updated_at: Instant,
}

impl FdbEntry {
    pub fn new(mac: MacAddress, location: Location, now: Instant) -> Self {
        Self {
            mac,
            location,
            created_at: now,
            updated_at: now,
        }
    }

    /// Time since the entry was created (or last moved).
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    /// Time since the entry was last refreshed.
    pub fn idle(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.updated_at)
    }
}
