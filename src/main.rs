use anyhow::Result;
use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::flag;
use std::io;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use rumbtrace::output::{OutputFormat, ReportWriter};
use rumbtrace::ping_libc::drop_privileges;
use rumbtrace::ping_pnet::PnetTransport;
use rumbtrace::resolve::resolve_ipv4;
use rumbtrace::{Outcome, ProbeSession};

mod cli;

use cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<Outcome> {
    let config = args.trace_config();
    config.validate()?;

    // Socket first, while we may still hold the rights to open it
    let transport = PnetTransport::open()?;
    drop_privileges()?;

    let target = resolve_ipv4(&args.target)?;

    let term = Arc::new(AtomicBool::new(false));
    flag::register(SIGTERM, Arc::clone(&term))?;
    flag::register(SIGINT, Arc::clone(&term))?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let mut writer = ReportWriter::new(io::stdout().lock(), format);
    let mut write_err = None;

    let report = ProbeSession::new(transport, target, config)?
        .with_cancel_flag(term)
        .run(|hop| {
            if let Err(e) = writer.hop(hop) {
                write_err.get_or_insert(e);
            }
        })?;
    if let Some(e) = write_err {
        return Err(e.into());
    }

    writer.finish(&report)?;
    Ok(report.outcome)
}
