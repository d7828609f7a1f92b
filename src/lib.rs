//! ICMP traceroute: discover the routers between this host and an IPv4 target by
//! sending Echo Requests with increasing TTL.

pub mod checksum;
pub mod common;
pub mod config;
pub mod error;
pub mod output;
pub mod ping_libc;
pub mod ping_pnet;
pub mod resolve;
pub mod session;
pub mod transport;

pub use common::{HopRecord, ProbePacket, Reply, ReplyKind};
pub use config::TraceConfig;
pub use error::{TraceError, TraceResult};
pub use session::{HopState, Outcome, ProbeSession, TraceReport};
pub use transport::ProbeTransport;
