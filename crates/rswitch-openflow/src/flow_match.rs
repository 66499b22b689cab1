//! OpenFlow 1.0 flow match.

use crate::error::PacketError;
use crate::packet::{EthernetHeader, NetworkFields};
use rswitch_types::{MacAddress, PortNo};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// `dl_vlan` value matching untagged frames.
pub const VLAN_NONE: u16 = 0xffff;

/// The OpenFlow 1.0 12-tuple. A `None` field is wildcarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_port: Option<PortNo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_src: Option<MacAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_dst: Option<MacAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_vlan: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_vlan_pcp: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dl_type: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nw_tos: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nw_proto: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nw_src: Option<Ipv4Addr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nw_dst: Option<Ipv4Addr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tp_src: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tp_dst: Option<u16>,
}

impl Match {
    /// Derives an exact match for `frame` as received on `in_port`.
    ///
    /// Fields that do not apply to the frame (e.g. transport ports of an
    /// ARP packet) stay wildcarded.
    pub fn from_packet(in_port: PortNo, frame: &[u8]) -> Result<Self, PacketError> {
        let eth = EthernetHeader::parse(frame)?;
        let nw = NetworkFields::parse(eth.ethertype, eth.payload(frame))?;

        Ok(Self {
            in_port: Some(in_port),
            dl_src: Some(eth.src),
            dl_dst: Some(eth.dst),
            dl_vlan: Some(eth.vlan_id.unwrap_or(VLAN_NONE)),
            dl_vlan_pcp: Some(eth.vlan_pcp.unwrap_or(0)),
            dl_type: Some(eth.ethertype),
            nw_tos: nw.tos,
            nw_proto: nw.proto,
            nw_src: nw.src,
            nw_dst: nw.dst,
            tp_src: nw.tp_src,
            tp_dst: nw.tp_dst,
        })
    }

    /// Matches only on the Ethernet source address.
    pub fn dl_src(mac: MacAddress) -> Self {
        Self {
            dl_src: Some(mac),
            ..Self::default()
        }
    }

    /// Matches only on the Ethernet destination address.
    pub fn dl_dst(mac: MacAddress) -> Self {
        Self {
            dl_dst: Some(mac),
            ..Self::default()
        }
    }

    /// Returns a copy with `in_port` replaced.
    pub fn with_in_port(mut self, in_port: PortNo) -> Self {
        self.in_port = Some(in_port);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::tests::{frame, ipv4_udp};
    use crate::packet::{ETH_TYPE_IPV4, IP_PROTO_UDP};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_packet_exact_match() {
        let f = frame([0, 0, 0, 0, 0, 2], [0, 0, 0, 0, 0, 1], ETH_TYPE_IPV4, &ipv4_udp());
        let m = Match::from_packet(PortNo::new(4), &f).unwrap();

        assert_eq!(m.in_port, Some(PortNo::new(4)));
        assert_eq!(m.dl_src, Some(MacAddress::new([0, 0, 0, 0, 0, 1])));
        assert_eq!(m.dl_dst, Some(MacAddress::new([0, 0, 0, 0, 0, 2])));
        assert_eq!(m.dl_vlan, Some(VLAN_NONE));
        assert_eq!(m.dl_type, Some(ETH_TYPE_IPV4));
        assert_eq!(m.nw_proto, Some(IP_PROTO_UDP));
        assert_eq!(m.tp_dst, Some(53));
    }

    #[test]
    fn test_from_packet_non_ip_leaves_network_wildcarded() {
        let f = frame([0, 0, 0, 0, 0, 2], [0, 0, 0, 0, 0, 1], 0x88b5, &[0u8; 46]);
        let m = Match::from_packet(PortNo::new(1), &f).unwrap();

        assert_eq!(m.dl_type, Some(0x88b5));
        assert_eq!(m.nw_src, None);
        assert_eq!(m.tp_src, None);
    }

    #[test]
    fn test_from_packet_rejects_runt() {
        assert!(Match::from_packet(PortNo::new(1), &[0u8; 6]).is_err());
    }

    #[test]
    fn test_with_in_port_overrides() {
        let f = frame([0, 0, 0, 0, 0, 2], [0, 0, 0, 0, 0, 1], 0x88b5, &[]);
        let m = Match::from_packet(PortNo::new(1), &f)
            .unwrap()
            .with_in_port(PortNo::new(9));
        assert_eq!(m.in_port, Some(PortNo::new(9)));
    }

    #[test]
    fn test_single_field_matches() {
        let mac = MacAddress::new([0, 0, 0, 0, 0, 0x0a]);
        let m = Match::dl_src(mac);
        assert_eq!(m.dl_src, Some(mac));
        assert_eq!(m.dl_dst, None);
        assert_eq!(Match::dl_dst(mac).dl_src, None);
    }
}
