use clap::Parser;

use rumbtrace::config::{DEFAULT_MAX_HOPS, DEFAULT_PROBES_PER_HOP, DEFAULT_TIMEOUT_MS};
use rumbtrace::TraceConfig;

/// Print the route ICMP probes take to a host
#[derive(Parser, Debug, Clone)]
#[command(name = "rumbtrace")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Target host (IPv4 address or hostname)
    pub target: String,

    /// Maximum number of hops to target
    #[arg(short = 'm', long = "maximum_hops", default_value_t = DEFAULT_MAX_HOPS)]
    pub max_hops: u8,

    /// Timeout for reply wait, in milliseconds
    #[arg(short = 'w', long = "timeout", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,

    /// Probes to send per hop while it keeps timing out
    #[arg(short = 'q', long = "probes", default_value_t = DEFAULT_PROBES_PER_HOP)]
    pub probes: u8,

    /// Print a JSON report instead of the final status line
    #[arg(long = "json")]
    pub json: bool,

    /// Log probe activity to stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Args {
    pub fn trace_config(&self) -> TraceConfig {
        TraceConfig::new(self.max_hops, self.timeout_ms).with_probes_per_hop(self.probes)
    }
}
