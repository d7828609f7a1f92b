use pnet::packet::ip::IpNextHeaderProtocols::Icmp;
use pnet_transport::{
    icmp_packet_iter, transport_channel, TransportChannelType, TransportProtocol,
    TransportReceiver, TransportSender,
};
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;
use tracing::{debug, trace};

use crate::common::{ProbePacket, Reply};
use crate::error::{is_timeout, TraceError, TraceResult};
use crate::transport::ProbeTransport;

/// Receive buffer; large enough for any ICMP reply to a 64 byte probe.
const RECV_BUFFER_LEN: usize = 1500;

/// Raw IPv4 ICMP socket. The kernel builds the IP header; received packets arrive
/// with it already stripped.
///
/// Sender and receiver share one descriptor, closed when both halves drop.
pub struct PnetTransport {
    tx: TransportSender,
    rx: TransportReceiver,
}

impl PnetTransport {
    /// Open the raw socket. Needs CAP_NET_RAW or root.
    pub fn open() -> TraceResult<Self> {
        let channel = TransportChannelType::Layer4(TransportProtocol::Ipv4(Icmp));
        let (tx, rx) =
            transport_channel(RECV_BUFFER_LEN, channel).map_err(TraceError::SocketCreation)?;
        debug!("opened raw ICMP socket");
        Ok(Self { tx, rx })
    }
}

impl ProbeTransport for PnetTransport {
    fn set_ttl(&mut self, ttl: u8) -> io::Result<()> {
        self.tx.set_ttl(ttl)
    }

    fn send(&mut self, packet: &ProbePacket, destination: Ipv4Addr) -> io::Result<()> {
        let sent = self.tx.send_to(packet.view(), IpAddr::V4(destination))?;
        trace!(bytes = sent, %destination, "sent probe");
        Ok(())
    }

    fn recv(&mut self, timeout: Duration) -> io::Result<Option<Reply>> {
        let mut iter = icmp_packet_iter(&mut self.rx);
        match iter.next_with_timeout(timeout) {
            Ok(Some((packet, IpAddr::V4(source)))) => {
                Ok(Some(Reply::new(source, packet.get_icmp_type().0)))
            }
            // An ICMPv4 socket never yields a v6 peer
            Ok(Some((_, IpAddr::V6(source)))) => {
                debug!(%source, "ignoring non-IPv4 peer");
                Ok(None)
            }
            Ok(None) => Ok(None),
            Err(e) if is_timeout(&e) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
