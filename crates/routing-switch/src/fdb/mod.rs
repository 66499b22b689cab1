//! Forwarding database.
//!
//! Maps host MAC addresses to the (switch, port) they were last seen on.
//!
//! # Lifecycle
//!
//! - A first sighting creates an entry.
//! - A sighting from the same location refreshes it.
//! - A sighting from a different location is a host move. It is only
//!   accepted once the entry is older than the host-move guard, counted
//!   from when it was created; earlier sightings are rejected so a flapping
//!   host cannot thrash the table.
//! - Entries not refreshed within the aging timeout are evicted by the
//!   periodic sweep.

mod orch;
mod types;

pub use orch::{FdbOrch, FdbOrchStats, LearnOutcome};
pub use types::{FdbEntry, Location};
