//! FDB learning, lookup and aging.

use super::types::{FdbEntry, Location};
use crate::config::FdbConfig;
use crate::sync_map::SyncMap;
use rswitch_types::{MacAddress, PortNo, SwitchId};
use std::time::Instant;
use tracing::{debug, info};

/// Result of [`FdbOrch::learn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnOutcome {
    /// First sighting of the host.
    Created,
    /// Seen again at its current location.
    Refreshed,
    /// Accepted move; flows towards `previous` are stale.
    Moved { previous: Location },
    /// Move seen inside the host-move guard; the entry was left unchanged.
    Rejected { current: Location },
    /// Group addresses are never learned.
    InvalidSource,
}

impl LearnOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(
            self,
            LearnOutcome::Created | LearnOutcome::Refreshed | LearnOutcome::Moved { .. }
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FdbOrchStats {
    pub entries_created: u64,
    pub entries_refreshed: u64,
    pub hosts_moved: u64,
    pub moves_rejected: u64,
    pub entries_aged: u64,
    pub entries_purged: u64,
}

/// The forwarding database.
#[derive(Debug)]
pub struct FdbOrch {
    config: FdbConfig,
    entries: SyncMap<MacAddress, FdbEntry>,
    stats: FdbOrchStats,
}

impl FdbOrch {
    pub fn new(config: FdbConfig) -> Self {
        Self {
            config,
            entries: SyncMap::new(),
            stats: FdbOrchStats::default(),
        }
    }

    /// Records that `mac` was seen as a source on `switch:port`.
    pub fn learn(
        &mut self,
        mac: MacAddress,
        switch: SwitchId,
        port: PortNo,
        now: Instant,
    ) -> LearnOutcome {
        if mac.is_multicast() {
            return LearnOutcome::InvalidSource;
        }

        let location = Location::new(switch, port);
        let guard = self.config.host_move_guard();

        let Some(entry) = self.entries.get_mut(&mac) else {
            self.entries.insert(mac, FdbEntry::new(mac, location, now));
            self.stats.entries_created += 1;
            debug!(%mac, %location, "Learned host");
            return LearnOutcome::Created;
        };

        if entry.location == location {
            entry.updated_at = now;
            self.stats.entries_refreshed += 1;
            return LearnOutcome::Refreshed;
        }

        if entry.age(now) <= guard {
            self.stats.moves_rejected += 1;
            debug!(
                %mac,
                current = %entry.location,
                seen = %location,
                "Host move inside guard window rejected"
            );
            return LearnOutcome::Rejected {
                current: entry.location,
            };
        }

        let previous = entry.location;
        entry.location = location;
        entry.created_at = now;
        entry.updated_at = now;
        self.stats.hosts_moved += 1;
        info!(%mac, from = %previous, to = %location, "Host moved");
        LearnOutcome::Moved { previous }
    }

    /// Returns where `mac` is attached. Group addresses are never found.
    pub fn lookup(&self, mac: MacAddress) -> Option<Location> {
        if mac.is_multicast() {
            return None;
        }
        self.entries.get(&mac).map(|e| e.location)
    }

    pub fn get_entry(&self, mac: MacAddress) -> Option<&FdbEntry> {
        self.entries.get(&mac)
    }

    /// Removes entries idle longer than the aging timeout.
    ///
    /// Returns the number removed.
    pub fn evict_expired(&mut self, now: Instant) -> usize {
        let aging = self.config.aging_timeout();
        let evicted = self.entries.remove_where(|_, e| e.idle(now) > aging);
        for (mac, entry) in &evicted {
            debug!(%mac, location = %entry.location, "Aged out host");
        }
        self.stats.entries_aged += evicted.len() as u64;
        evicted.len()
    }

    /// Removes every entry attached to `switch:port`.
    ///
    /// Returns the number removed.
    pub fn delete_entries_for(&mut self, switch: SwitchId, port: PortNo) -> usize {
        let location = Location::new(switch, port);
        let purged = self.entries.remove_where(|_, e| e.location == location);
        self.stats.entries_purged += purged.len() as u64;
        purged.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn config(&self) -> &FdbConfig {
        &self.config
    }

    pub fn stats(&self) -> &FdbOrchStats {
        &self.stats
    }
}
