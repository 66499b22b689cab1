//! Packet header classification.
//!
//! The controller core only needs the Ethernet addresses and ethertype of a
//! frame. The deeper layers are decoded here solely so that
//! [`Match::from_packet`](crate::Match::from_packet) can build an exact
//! match; their values are opaque to the core.

use crate::error::PacketError;
use rswitch_types::MacAddress;
use std::net::Ipv4Addr;

/// Minimum Ethernet frame length without the FCS.
pub const ETH_MINIMUM_LENGTH: usize = 60;

pub const ETH_TYPE_IPV4: u16 = 0x0800;
pub const ETH_TYPE_ARP: u16 = 0x0806;
pub const ETH_TYPE_VLAN: u16 = 0x8100;
pub const ETH_TYPE_LLDP: u16 = 0x88cc;
/// `dl_type` reported for 802.3 frames without a SNAP header.
pub const ETH_TYPE_NOT_ETH: u16 = 0x05ff;

pub const IP_PROTO_ICMP: u8 = 1;
pub const IP_PROTO_TCP: u8 = 6;
pub const IP_PROTO_UDP: u8 = 17;

const ETH_HEADER_LEN: usize = 14;
const VLAN_TAG_LEN: usize = 4;
const SNAP_HEADER_LEN: usize = 8;

/// Layer 2 header of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthernetHeader {
    pub dst: MacAddress,
    pub src: MacAddress,
    /// Ethertype of the payload, after any VLAN tag and SNAP header.
    pub ethertype: u16,
    /// 802.1Q VLAN id, if the frame is tagged.
    pub vlan_id: Option<u16>,
    /// 802.1Q priority code point, if the frame is tagged.
    pub vlan_pcp: Option<u8>,
    /// Offset of the payload within the frame.
    pub payload_offset: usize,
}

impl EthernetHeader {
    /// Parses the layer 2 header of `frame`.
    pub fn parse(frame: &[u8]) -> Result<Self, PacketError> {
        ensure_len(frame, ETH_HEADER_LEN)?;

        let dst = MacAddress::from_slice(&frame[0..6])
            .ok_or(PacketError::Malformed { protocol: "ethernet" })?;
        let src = MacAddress::from_slice(&frame[6..12])
            .ok_or(PacketError::Malformed { protocol: "ethernet" })?;
        let mut ethertype = read_u16(frame, 12);
        let mut offset = ETH_HEADER_LEN;
        let mut vlan_id = None;
        let mut vlan_pcp = None;

        if ethertype == ETH_TYPE_VLAN {
            ensure_len(frame, offset + VLAN_TAG_LEN)?;
            let tci = read_u16(frame, offset);
            vlan_id = Some(tci & 0x0fff);
            vlan_pcp = Some((tci >> 13) as u8);
            ethertype = read_u16(frame, offset + 2);
            offset += VLAN_TAG_LEN;
        }

        if ethertype < 0x0600 {
            // 802.3 length field: look for an LLC/SNAP encapsulated ethertype
            let llc = &frame[offset.min(frame.len())..];
            if llc.len() >= SNAP_HEADER_LEN && llc[0] == 0xaa && llc[1] == 0xaa && llc[2] == 0x03 {
                ethertype = read_u16(llc, 6);
                offset += SNAP_HEADER_LEN;
            } else {
                ethertype = ETH_TYPE_NOT_ETH;
            }
        }

        Ok(Self {
            dst,
            src,
            ethertype,
            vlan_id,
            vlan_pcp,
            payload_offset: offset,
        })
    }

    /// Returns the bytes following the layer 2 header.
    pub fn payload<'a>(&self, frame: &'a [u8]) -> &'a [u8] {
        frame.get(self.payload_offset..).unwrap_or(&[])
    }
}

/// Network/transport fields used for exact matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct NetworkFields {
    pub tos: Option<u8>,
    pub proto: Option<u8>,
    pub src: Option<Ipv4Addr>,
    pub dst: Option<Ipv4Addr>,
    pub tp_src: Option<u16>,
    pub tp_dst: Option<u16>,
}

impl NetworkFields {
    /// Decodes the layer 3/4 fields for `ethertype` from `payload`.
    ///
    /// Unknown ethertypes yield an empty set of fields; truncated headers
    /// of a known protocol are errors.
    pub(crate) fn parse(ethertype: u16, payload: &[u8]) -> Result<Self, PacketError> {
        match ethertype {
            ETH_TYPE_IPV4 => Self::parse_ipv4(payload),
            ETH_TYPE_ARP => Self::parse_arp(payload),
            _ => Ok(Self::default()),
        }
    }

    fn parse_ipv4(ip: &[u8]) -> Result<Self, PacketError> {
        ensure_len(ip, 20)?;
        if ip[0] >> 4 != 4 {
            return Err(PacketError::Malformed { protocol: "ipv4" });
        }
        let header_len = usize::from(ip[0] & 0x0f) * 4;
        if header_len < 20 {
            return Err(PacketError::Malformed { protocol: "ipv4" });
        }
        ensure_len(ip, header_len)?;

        let proto = ip[9];
        let mut fields = Self {
            tos: Some(ip[1] & 0xfc),
            proto: Some(proto),
            src: Some(Ipv4Addr::new(ip[12], ip[13], ip[14], ip[15])),
            dst: Some(Ipv4Addr::new(ip[16], ip[17], ip[18], ip[19])),
            tp_src: None,
            tp_dst: None,
        };

        // Only the first fragment carries the transport header
        let fragment_offset = read_u16(ip, 6) & 0x1fff;
        if fragment_offset != 0 {
            return Ok(fields);
        }

        let l4 = &ip[header_len..];
        match proto {
            IP_PROTO_TCP | IP_PROTO_UDP => {
                ensure_len(l4, 4)?;
                fields.tp_src = Some(read_u16(l4, 0));
                fields.tp_dst = Some(read_u16(l4, 2));
            }
            IP_PROTO_ICMP => {
                ensure_len(l4, 2)?;
                fields.tp_src = Some(u16::from(l4[0]));
                fields.tp_dst = Some(u16::from(l4[1]));
            }
            _ => {}
        }

        Ok(fields)
    }

    fn parse_arp(arp: &[u8]) -> Result<Self, PacketError> {
        ensure_len(arp, 28)?;
        let opcode = read_u16(arp, 6);
        Ok(Self {
            tos: None,
            proto: Some((opcode & 0xff) as u8),
            src: Some(Ipv4Addr::new(arp[14], arp[15], arp[16], arp[17])),
            dst: Some(Ipv4Addr::new(arp[24], arp[25], arp[26], arp[27])),
            tp_src: None,
            tp_dst: None,
        })
    }
}

/// Returns `frame` padded with zeros up to [`ETH_MINIMUM_LENGTH`].
pub fn pad_to_minimum(frame: &[u8]) -> Vec<u8> {
    let mut padded = frame.to_vec();
    if padded.len() < ETH_MINIMUM_LENGTH {
        padded.resize(ETH_MINIMUM_LENGTH, 0);
    }
    padded
}

fn ensure_len(buf: &[u8], needed: usize) -> Result<(), PacketError> {
    if buf.len() < needed {
        return Err(PacketError::Truncated {
            needed,
            actual: buf.len(),
        });
    }
    Ok(())
}

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([buf[offset], buf[offset + 1]])
}
