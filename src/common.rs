use pnet::packet::icmp::echo_request::{EchoRequestPacket, MutableEchoRequestPacket};
use pnet::packet::icmp::{IcmpCode, IcmpType, IcmpTypes};
use pnet::packet::Packet;
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

use crate::checksum::internet_checksum;

/// Total size of a probe on the wire, ICMP header included.
pub const PROBE_PACKET_LEN: usize = 64;
/// ICMP echo header: type, code, checksum, identifier, sequence.
pub const ICMP_HEADER_LEN: usize = 8;
pub const PROBE_PAYLOAD_LEN: usize = PROBE_PACKET_LEN - ICMP_HEADER_LEN;

/// An ICMP Echo Request ready to go out. Checksummed at construction, never mutated after.
#[derive(Clone, PartialEq, Eq)]
pub struct ProbePacket {
    buf: [u8; PROBE_PACKET_LEN],
}

impl ProbePacket {
    /// Build a zero-filled echo request with the given identifier and sequence number.
    pub fn new(identifier: u16, sequence: u16) -> Self {
        let mut buf = [0u8; PROBE_PACKET_LEN];
        {
            // buf is always large enough for an echo request header
            let mut echo = MutableEchoRequestPacket::new(&mut buf[..])
                .unwrap_or_else(|| unreachable!("{} byte probe buffer", PROBE_PACKET_LEN));
            echo.set_icmp_type(IcmpTypes::EchoRequest);
            echo.set_icmp_code(IcmpCode::new(0));
            echo.set_identifier(identifier);
            echo.set_sequence_number(sequence);
            echo.set_checksum(0);
        }
        let cksum = internet_checksum(&buf);
        buf[2..4].copy_from_slice(&cksum.to_be_bytes());
        Self { buf }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Read-only pnet view, used for sending.
    pub fn view(&self) -> EchoRequestPacket<'_> {
        EchoRequestPacket::new(&self.buf)
            .unwrap_or_else(|| unreachable!("{} byte probe buffer", PROBE_PACKET_LEN))
    }

    pub fn identifier(&self) -> u16 {
        self.view().get_identifier()
    }

    pub fn sequence(&self) -> u16 {
        self.view().get_sequence_number()
    }

    pub fn checksum(&self) -> u16 {
        self.view().get_checksum()
    }
}

impl fmt::Debug for ProbePacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.view();
        f.debug_struct("ProbePacket")
            .field("icmp_type", &view.get_icmp_type().0)
            .field("icmp_code", &view.get_icmp_code().0)
            .field("icmp_chksum", &view.get_checksum())
            .field("icmp_identifier", &view.get_identifier())
            .field("icmp_seq_number", &view.get_sequence_number())
            .field("payload_len", &view.payload().len())
            .finish()
    }
}

/// What a received datagram means for the hop loop. Only the ICMP type is looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    /// Type 0, the destination answered.
    EchoReply,
    /// Type 11, a router on the way dropped the probe.
    TimeExceeded,
    /// Anything else.
    Other(u8),
}

impl ReplyKind {
    pub fn from_icmp_type(icmp_type: IcmpType) -> Self {
        match icmp_type {
            IcmpTypes::EchoReply => ReplyKind::EchoReply,
            IcmpTypes::TimeExceeded => ReplyKind::TimeExceeded,
            IcmpType(other) => ReplyKind::Other(other),
        }
    }

    pub fn icmp_type(&self) -> u8 {
        match self {
            ReplyKind::EchoReply => IcmpTypes::EchoReply.0,
            ReplyKind::TimeExceeded => IcmpTypes::TimeExceeded.0,
            ReplyKind::Other(t) => *t,
        }
    }

    /// Replies that name a hop.
    pub fn is_reportable(&self) -> bool {
        matches!(self, ReplyKind::EchoReply | ReplyKind::TimeExceeded)
    }
}

/// A datagram read off the socket, reduced to what the loop needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub source: Ipv4Addr,
    pub kind: ReplyKind,
}

impl Reply {
    pub fn new(source: Ipv4Addr, icmp_type: u8) -> Self {
        Self {
            source,
            kind: ReplyKind::from_icmp_type(IcmpType::new(icmp_type)),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopRecord {
    pub hop: u8,
    pub address: Ipv4Addr,
}

impl fmt::Display for HopRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hop {} - {}", self.hop, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::verify_checksum;

    #[test]
    fn test_probe_layout() {
        let probe = ProbePacket::new(0x1234, 5);
        let bytes = probe.as_bytes();
        assert_eq!(bytes.len(), PROBE_PACKET_LEN);
        assert_eq!(bytes[0], 8); // Echo Request
        assert_eq!(bytes[1], 0);
        assert_eq!(&bytes[4..6], &[0x12, 0x34]);
        assert_eq!(&bytes[6..8], &[0x00, 0x05]);
        assert!(bytes[ICMP_HEADER_LEN..].iter().all(|b| *b == 0));
        assert_eq!(probe.identifier(), 0x1234);
        assert_eq!(probe.sequence(), 5);
    }

    #[test]
    fn test_probe_checksum_valid() {
        for seq in [1u16, 2, 30, 255] {
            let probe = ProbePacket::new(4242, seq);
            assert!(verify_checksum(probe.as_bytes()));
        }
    }

    #[test]
    fn test_probe_checksum_matches_pnet() {
        let probe = ProbePacket::new(0xBEEF, 17);
        let icmp = pnet::packet::icmp::IcmpPacket::new(probe.as_bytes()).unwrap();
        assert_eq!(pnet::packet::icmp::checksum(&icmp), probe.checksum());
    }

    #[test]
    fn test_reply_classification() {
        let from = Ipv4Addr::new(10, 0, 0, 1);
        assert_eq!(Reply::new(from, 0).kind, ReplyKind::EchoReply);
        assert_eq!(Reply::new(from, 11).kind, ReplyKind::TimeExceeded);
        assert_eq!(Reply::new(from, 3).kind, ReplyKind::Other(3));
        assert!(!ReplyKind::Other(8).is_reportable());
        assert_eq!(ReplyKind::Other(3).icmp_type(), 3);
        assert_eq!(ReplyKind::TimeExceeded.icmp_type(), 11);
    }

    #[test]
    fn test_hop_record_display() {
        let record = HopRecord {
            hop: 3,
            address: Ipv4Addr::new(192, 168, 1, 1),
        };
        assert_eq!(record.to_string(), "hop 3 - 192.168.1.1");
    }
}
