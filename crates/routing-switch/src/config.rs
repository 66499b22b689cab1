//! Configuration file support for the routing switch.
//!
//! Loads and validates the controller configuration from TOML files.
//! Default location: /etc/routing-switch/routing-switch.toml

use crate::error::{Result, RoutingSwitchError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/routing-switch/routing-switch.toml";

/// Largest idle timeout accepted for path flows. Leaves headroom for the
/// per-hop increment on long paths.
pub const MAX_IDLE_TIMEOUT_SECS: u16 = 65000;

/// Flow installation parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchingConfig {
    /// Base idle timeout of path flows, in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u16,

    /// Priority of path and discard flows
    #[serde(default = "default_flow_priority")]
    pub flow_priority: u16,

    /// Hard timeout of discard flows, in seconds
    #[serde(default = "default_discard_hard_timeout")]
    pub discard_hard_timeout_secs: u16,

    /// Bytes of a missed packet switches send to the controller
    #[serde(default = "default_miss_send_len")]
    pub miss_send_len: u16,
}

/// Host learning parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FdbConfig {
    /// Seconds without a refresh before an entry is evicted
    #[serde(default = "default_aging_timeout")]
    pub aging_timeout_secs: u64,

    /// Seconds after learning during which a move is rejected
    #[serde(default = "default_host_move_guard")]
    pub host_move_guard_secs: u64,

    /// Seconds between eviction sweeps
    #[serde(default = "default_eviction_interval")]
    pub eviction_interval_secs: u64,
}

/// Path resolution parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Seconds an unanswered topology query stays pending
    #[serde(default = "default_pending_timeout")]
    pub pending_timeout_secs: u64,
}

/// Complete routing switch configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingSwitchConfig {
    #[serde(default)]
    pub switching: SwitchingConfig,

    #[serde(default)]
    pub fdb: FdbConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

fn default_idle_timeout() -> u16 {
    60
}

fn default_flow_priority() -> u16 {
    u16::MAX
}

fn default_discard_hard_timeout() -> u16 {
    1
}

fn default_miss_send_len() -> u16 {
    u16::MAX
}

fn default_aging_timeout() -> u64 {
    300
}

fn default_host_move_guard() -> u64 {
    5
}

fn default_eviction_interval() -> u64 {
    5
}

fn default_pending_timeout() -> u64 {
    30
}

impl Default for SwitchingConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout(),
            flow_priority: default_flow_priority(),
            discard_hard_timeout_secs: default_discard_hard_timeout(),
            miss_send_len: default_miss_send_len(),
        }
    }
}

impl Default for FdbConfig {
    fn default() -> Self {
        Self {
            aging_timeout_secs: default_aging_timeout(),
            host_move_guard_secs: default_host_move_guard(),
            eviction_interval_secs: default_eviction_interval(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            pending_timeout_secs: default_pending_timeout(),
        }
    }
}

impl FdbConfig {
    pub fn aging_timeout(&self) -> Duration {
        Duration::from_secs(self.aging_timeout_secs)
    }

    pub fn host_move_guard(&self) -> Duration {
        Duration::from_secs(self.host_move_guard_secs)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }
}

impl ResolverConfig {
    pub fn pending_timeout(&self) -> Duration {
        Duration::from_secs(self.pending_timeout_secs)
    }
}

impl RoutingSwitchConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                RoutingSwitchError::Configuration(format!(
                    "Failed to parse config file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(RoutingSwitchError::Io(e)),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> Result<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| {
            RoutingSwitchError::Configuration(format!("Failed to serialize config: {}", e))
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let idle = self.switching.idle_timeout_secs;
        if idle == 0 || idle > MAX_IDLE_TIMEOUT_SECS {
            return Err(RoutingSwitchError::Configuration(format!(
                "idle_timeout_secs must be 1-{}",
                MAX_IDLE_TIMEOUT_SECS
            )));
        }

        if self.fdb.aging_timeout_secs == 0 {
            return Err(RoutingSwitchError::Configuration(
                "aging_timeout_secs must be > 0".to_string(),
            ));
        }

        if self.fdb.eviction_interval_secs == 0 {
            return Err(RoutingSwitchError::Configuration(
                "eviction_interval_secs must be > 0".to_string(),
            ));
        }

        if self.resolver.pending_timeout_secs == 0 {
            return Err(RoutingSwitchError::Configuration(
                "pending_timeout_secs must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}
