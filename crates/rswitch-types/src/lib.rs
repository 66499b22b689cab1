//! Common value types for the routing switch controller.
//!
//! This crate provides type-safe representations of the identifiers that
//! flow through every layer of the controller:
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses
//! - [`SwitchId`]: 64-bit OpenFlow datapath identifiers
//! - [`PortNo`]: 16-bit OpenFlow port numbers, including reserved ports

mod mac;
mod port;
mod switch_id;

pub use mac::MacAddress;
pub use port::PortNo;
pub use switch_id::SwitchId;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid datapath id: {0}")]
    InvalidSwitchId(String),

    #[error("invalid port number: {0}")]
    InvalidPortNo(String),
}
