//! Hop discovery: probe with TTL 1, 2, 3, ... until the target answers or the
//! hop budget runs out.
//!
//! One probe is in flight at a time. Each hop is fully resolved (reply or timeout)
//! before the next TTL is tried.

use serde::Serialize;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::common::{HopRecord, ProbePacket, ReplyKind};
use crate::config::TraceConfig;
use crate::error::{TraceError, TraceResult};
use crate::ping_libc::probe_identifier;
use crate::transport::ProbeTransport;

pub const DONE_MESSAGE: &str = "done";
pub const EXHAUSTED_MESSAGE: &str = "Exceeded maximum hop count before destination was reached.";
pub const INTERRUPTED_MESSAGE: &str = "Interrupted before destination was reached.";

/// How a single hop resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopState {
    /// Time Exceeded from a router; keep going.
    Reported(HopRecord),
    /// Echo Reply; the target itself answered.
    Arrived(HopRecord),
    /// Every attempt at this hop timed out.
    Timeout,
    /// Something answered, but not with a type that names a hop.
    Ignored(ReplyKind),
    /// Stop was requested between attempts at this hop.
    Interrupted,
}

/// Terminal state of a session that did not hit an I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    ArrivedAtTarget,
    ExhaustedHopBudget,
    Interrupted,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::ArrivedAtTarget)
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Outcome::ArrivedAtTarget => DONE_MESSAGE,
            Outcome::ExhaustedHopBudget => EXHAUSTED_MESSAGE,
            Outcome::Interrupted => INTERRUPTED_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceReport {
    pub target: Ipv4Addr,
    pub outcome: Outcome,
    pub hops: Vec<HopRecord>,
    /// Number of TTL values actually tried.
    pub hops_probed: u16,
    pub probes_sent: u32,
}

/// A single traceroute run against one target.
///
/// Owns the transport; it is dropped (and its socket closed) when `run` returns,
/// whichever way it returns.
pub struct ProbeSession<T: ProbeTransport> {
    transport: T,
    target: Ipv4Addr,
    config: TraceConfig,
    identifier: u16,
    cancel: Option<Arc<AtomicBool>>,
    probes_sent: u32,
}

impl<T: ProbeTransport> ProbeSession<T> {
    pub fn new(transport: T, target: Ipv4Addr, config: TraceConfig) -> TraceResult<Self> {
        config.validate()?;
        Ok(Self {
            transport,
            target,
            config,
            identifier: probe_identifier(),
            cancel: None,
            probes_sent: 0,
        })
    }

    pub fn with_identifier(mut self, identifier: u16) -> Self {
        self.identifier = identifier;
        self
    }

    /// Checked before every probe; setting it ends the session as `Interrupted`.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    /// Run the loop. `on_hop` is called as soon as each hop is discovered.
    pub fn run<F>(mut self, mut on_hop: F) -> TraceResult<TraceReport>
    where
        F: FnMut(&HopRecord),
    {
        let mut hops = Vec::new();
        let mut hops_probed: u16 = 0;
        let mut outcome = Outcome::ExhaustedHopBudget;

        debug!(
            target = %self.target,
            max_hops = self.config.max_hops,
            timeout_ms = self.config.timeout.as_millis() as u64,
            "starting trace"
        );

        for hop in 1..=self.config.max_hops {
            if self.cancelled() {
                outcome = Outcome::Interrupted;
                break;
            }
            let state = self.probe_hop(hop)?;
            hops_probed += 1;

            match state {
                HopState::Reported(record) => {
                    on_hop(&record);
                    hops.push(record);
                }
                HopState::Arrived(record) => {
                    on_hop(&record);
                    hops.push(record);
                    outcome = Outcome::ArrivedAtTarget;
                    break;
                }
                HopState::Interrupted => {
                    outcome = Outcome::Interrupted;
                    break;
                }
                HopState::Timeout | HopState::Ignored(_) => {}
            }
        }

        debug!(?outcome, hops_probed, "trace finished");
        Ok(TraceReport {
            target: self.target,
            outcome,
            hops,
            hops_probed,
            probes_sent: self.probes_sent,
        })
    }

    /// Probe one TTL, retrying only on timeout while attempts remain.
    pub fn probe_hop(&mut self, hop: u8) -> TraceResult<HopState> {
        self.transport
            .set_ttl(hop)
            .map_err(|source| TraceError::SetTtl { hop, source })?;

        for attempt in 1..=self.config.probes_per_hop {
            if attempt > 1 && self.cancelled() {
                return Ok(HopState::Interrupted);
            }

            let packet = ProbePacket::new(self.identifier, hop as u16);
            self.transport
                .send(&packet, self.target)
                .map_err(|source| TraceError::Send { hop, source })?;
            self.probes_sent += 1;
            trace!(hop, attempt, "probe sent");

            let reply = self
                .transport
                .recv(self.config.timeout)
                .map_err(|source| TraceError::Receive { hop, source })?;

            let Some(reply) = reply else {
                debug!(hop, attempt, "timed out waiting for reply");
                continue;
            };

            debug!(hop, ip = %reply.source, icmp_type = reply.kind.icmp_type(), "reply");
            // Replies are not matched against the probe's identifier or sequence, so
            // whatever arrives first is credited to this hop. Tracing a local address,
            // the raw socket sees our own type 8 request first: hop 1 is ignored and
            // its Echo Reply is read (and reported) as hop 2.
            if !reply.kind.is_reportable() {
                return Ok(HopState::Ignored(reply.kind));
            }

            let record = HopRecord {
                hop,
                address: reply.source,
            };
            return Ok(if reply.kind == ReplyKind::EchoReply {
                HopState::Arrived(record)
            } else {
                HopState::Reported(record)
            });
        }

        Ok(HopState::Timeout)
    }
}
