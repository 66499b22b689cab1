//! RoutingSwitchDaemon implementation.
//!
//! The daemon is the single logical thread the orchestrator runs on. It
//! waits on three sources and handles whichever is ready:
//! - shutdown
//! - the inbound event channel
//! - the periodic maintenance tick

use super::event::ControllerEvent;
use crate::config::RoutingSwitchConfig;
use crate::switch::RoutingSwitchOrch;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Configuration for the RoutingSwitchDaemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingSwitchDaemonConfig {
    /// Interval between maintenance ticks
    pub tick_interval: Duration,
}

impl Default for RoutingSwitchDaemonConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(5),
        }
    }
}

impl From<&RoutingSwitchConfig> for RoutingSwitchDaemonConfig {
    fn from(config: &RoutingSwitchConfig) -> Self {
        Self {
            tick_interval: config.fdb.eviction_interval(),
        }
    }
}

/// Drives a [`RoutingSwitchOrch`] from an event channel.
pub struct RoutingSwitchDaemon {
    config: RoutingSwitchDaemonConfig,
    orch: RoutingSwitchOrch,
    events: mpsc::UnboundedReceiver<ControllerEvent>,
    handled: u64,
}

impl RoutingSwitchDaemon {
    pub fn new(
        config: RoutingSwitchDaemonConfig,
        orch: RoutingSwitchOrch,
        events: mpsc::UnboundedReceiver<ControllerEvent>,
    ) -> Self {
        Self {
            config,
            orch,
            events,
            handled: 0,
        }
    }

    /// Handles one event to completion.
    pub fn handle_event(&mut self, event: ControllerEvent) {
        debug!(event = event.name(), "Dispatching event");
        event.dispatch(&mut self.orch);
        self.handled += 1;
    }

    /// Runs until `shutdown` completes or the event channel closes.
    ///
    /// Returns the orchestrator so its final state can be inspected.
    pub async fn run<F>(mut self, shutdown: F) -> RoutingSwitchOrch
    where
        F: Future<Output = ()>,
    {
        info!(
            tick_interval_ms = self.config.tick_interval.as_millis() as u64,
            "Starting routing switch event loop"
        );

        let period = self.config.tick_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                event = self.events.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        info!("Event stream closed");
                        break;
                    }
                },
                _ = ticker.tick() => {
                    self.orch.on_timer();
                }
            }
        }

        info!(events = self.handled, "Routing switch event loop stopped");
        self.orch
    }

    pub fn orch(&self) -> &RoutingSwitchOrch {
        &self.orch
    }

    pub fn events_handled(&self) -> u64 {
        self.handled
    }
}
