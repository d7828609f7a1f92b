//! The seam between the hop loop and the network.

use std::io;
use std::net::Ipv4Addr;
use std::time::Duration;

use crate::common::{ProbePacket, Reply};

/// Raw ICMP socket operations the hop loop needs.
///
/// Implementations own their socket and release it on drop. `recv` returns `Ok(None)`
/// when nothing arrived within `timeout`; any `Err` is fatal to the session.
pub trait ProbeTransport {
    fn set_ttl(&mut self, ttl: u8) -> io::Result<()>;

    fn send(&mut self, packet: &ProbePacket, destination: Ipv4Addr) -> io::Result<()>;

    fn recv(&mut self, timeout: Duration) -> io::Result<Option<Reply>>;
}
