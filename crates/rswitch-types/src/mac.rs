//! Ethernet hardware addresses as they appear in frame headers.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An Ethernet address, as carried in the first twelve bytes of a frame.
///
/// The text form is six two-digit hex octets separated by `:` (or `-` on
/// input), which is also how the address is serialized.
///
/// ```
/// use rswitch_types::MacAddress;
///
/// let host: MacAddress = "00:00:00:00:00:0a".parse().unwrap();
/// assert_eq!(host.to_string(), "00:00:00:00:00:0a");
/// assert!(!host.is_multicast());
/// assert!(MacAddress::BROADCAST.is_multicast());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub const BROADCAST: MacAddress = MacAddress([0xff; 6]);
    pub const ZERO: MacAddress = MacAddress([0; 6]);

    pub const fn new(octets: [u8; 6]) -> Self {
        MacAddress(octets)
    }

    /// Reads an address from the start of `bytes`, e.g. a frame header.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 6] = bytes.get(..6)?.try_into().ok()?;
        Some(MacAddress(octets))
    }

    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    /// Group bit (I/G) of the first octet. Covers broadcast too.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 == 0x01
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddress {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidMacAddress(s.to_string());

        let mut octets = [0u8; 6];
        let mut fields = s.split(&[':', '-'][..]);
        for octet in octets.iter_mut() {
            let field = fields.next().ok_or_else(invalid)?;
            if field.len() != 2 {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(field, 16).map_err(|_| invalid())?;
        }
        if fields.next().is_some() {
            return Err(invalid());
        }

        Ok(MacAddress(octets))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> String {
        mac.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_and_format() {
        let mac: MacAddress = "0a:1b:2c:3d:4e:5f".parse().unwrap();
        assert_eq!(mac, MacAddress::new([0x0a, 0x1b, 0x2c, 0x3d, 0x4e, 0x5f]));
        assert_eq!(mac.to_string(), "0a:1b:2c:3d:4e:5f");

        let dashed: MacAddress = "0A-1B-2C-3D-4E-5F".parse().unwrap();
        assert_eq!(dashed, mac);
    }

    #[test]
    fn test_rejects_malformed_text() {
        for text in [
            "",
            "host-a",
            "00:00:00:00:0a",
            "00:00:00:00:00:0a:0b",
            "0:00:00:00:00:0a",
            "zz:00:00:00:00:0a",
        ] {
            assert!(text.parse::<MacAddress>().is_err(), "{text} should not parse");
        }
    }

    #[test]
    fn test_group_bit() {
        assert!(MacAddress::BROADCAST.is_multicast());
        assert!(MacAddress::new([0x01, 0x80, 0xc2, 0, 0, 0x0e]).is_multicast());
        assert!(MacAddress::new([0x33, 0x33, 0, 0, 0, 1]).is_multicast());
        // locally administered unicast still counts as a host
        assert!(!MacAddress::new([0x02, 0, 0, 0, 0, 1]).is_multicast());
        assert!(!MacAddress::ZERO.is_multicast());
    }

    #[test]
    fn test_from_frame_header() {
        let header = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0, 0, 0, 0, 0x0c];
        assert_eq!(MacAddress::from_slice(&header), Some(MacAddress::BROADCAST));
        assert_eq!(
            MacAddress::from_slice(&header[6..]),
            Some(MacAddress::new([0, 0, 0, 0, 0, 0x0c]))
        );
        assert_eq!(MacAddress::from_slice(&header[..5]), None);
    }

    #[test]
    fn test_serde_text_form() {
        let mac = MacAddress::new([0, 0, 0, 0, 0, 0x0a]);
        let json = serde_json::to_string(&mac).unwrap();
        assert_eq!(json, "\"00:00:00:00:00:0a\"");
        assert_eq!(serde_json::from_str::<MacAddress>(&json).unwrap(), mac);
        assert!(serde_json::from_str::<MacAddress>("\"nope\"").is_err());
    }
}
