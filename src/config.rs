use serde::Serialize;
use std::time::Duration;

use crate::error::{TraceError, TraceResult};

pub const DEFAULT_MAX_HOPS: u8 = 255;
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_PROBES_PER_HOP: u8 = 1;

/// Session parameters handed in by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceConfig {
    /// Highest TTL to try.
    pub max_hops: u8,
    /// Receive wait for each single probe, not for the whole session.
    #[serde(serialize_with = "serialize_millis")]
    pub timeout: Duration,
    /// Attempts per hop while it keeps timing out. 1 means exactly one probe per hop.
    pub probes_per_hop: u8,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            probes_per_hop: DEFAULT_PROBES_PER_HOP,
        }
    }
}

impl TraceConfig {
    pub fn new(max_hops: u8, timeout_ms: u64) -> Self {
        Self {
            max_hops,
            timeout: Duration::from_millis(timeout_ms),
            ..Self::default()
        }
    }

    pub fn with_probes_per_hop(mut self, probes: u8) -> Self {
        self.probes_per_hop = probes;
        self
    }

    pub fn validate(&self) -> TraceResult<()> {
        if self.max_hops == 0 {
            return Err(TraceError::InvalidConfig(
                "maximum hop count must be at least 1".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(TraceError::InvalidConfig("timeout must be positive".into()));
        }
        if self.probes_per_hop == 0 {
            return Err(TraceError::InvalidConfig(
                "probes per hop must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
