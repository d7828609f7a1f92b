use std::io::{self, Write};

use crate::common::HopRecord;
use crate::session::TraceReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `hop n - addr` lines as they are found, then a status line.
    Text,
    /// One JSON document once the run is over, nothing before it.
    Json,
}

/// Writes what the user sees on stdout.
pub struct ReportWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn hop(&mut self, hop: &HopRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                writeln!(self.out, "{}", hop)?;
                self.out.flush()
            }
            // Carried in the report instead
            OutputFormat::Json => Ok(()),
        }
    }

    pub fn finish(&mut self, report: &TraceReport) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", report.outcome.message())?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, report)?;
                writeln!(self.out)?;
            }
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Outcome;
    use std::net::Ipv4Addr;

    fn report() -> (Vec<HopRecord>, TraceReport) {
        let hops = vec![
            HopRecord {
                hop: 1,
                address: Ipv4Addr::new(10, 0, 0, 1),
            },
            HopRecord {
                hop: 2,
                address: Ipv4Addr::LOCALHOST,
            },
        ];
        let report = TraceReport {
            target: Ipv4Addr::LOCALHOST,
            outcome: Outcome::ArrivedAtTarget,
            hops: hops.clone(),
            hops_probed: 2,
            probes_sent: 2,
        };
        (hops, report)
    }

    fn render(format: OutputFormat) -> String {
        let (hops, report) = report();
        let mut writer = ReportWriter::new(Vec::new(), format);
        for hop in &hops {
            writer.hop(hop).unwrap();
        }
        writer.finish(&report).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_text_output() {
        assert_eq!(
            render(OutputFormat::Text),
            "hop 1 - 10.0.0.1\nhop 2 - 127.0.0.1\ndone\n"
        );
    }

    #[test]
    fn test_json_output_is_one_document() {
        let out = render(OutputFormat::Json);
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["outcome"], "arrived_at_target");
        assert_eq!(json["hops"].as_array().unwrap().len(), 2);
        assert_eq!(json["hops"][1]["address"], "127.0.0.1");
        assert!(!out.contains("hop 1 -"));
    }
}
