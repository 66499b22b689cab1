//! Event dispatch for the routing switch.
//!
//! All inbound records are funnelled into one channel of
//! [`ControllerEvent`]s and handled one at a time by
//! [`RoutingSwitchDaemon`], which also drives the periodic timer. The
//! [`JsonLineBridge`] connects the daemon to the outside world over
//! newline-delimited JSON.

mod bridge;
mod event;
mod routing_daemon;

pub use bridge::{JsonLineBridge, OutboundRecord};
pub use event::ControllerEvent;
pub use routing_daemon::{RoutingSwitchDaemon, RoutingSwitchDaemonConfig};
