//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use pbfmeter_core::{MeteringConfig, config::DEFAULT_NAMESPACE};

use crate::{LogSink, NodeConfig};

/// Run a simulated pbf node against in-memory peers and report its traffic
/// meters.
#[derive(Debug, Clone, Parser)]
#[command(name = "pbfmeter-node", version, about)]
pub struct Args {
    /// Number of simulated peers
    #[arg(long, default_value_t = 4)]
    pub peers: usize,

    /// Messages each side sends per peer after the handshake
    #[arg(long, default_value_t = 1_000)]
    pub messages: u64,

    /// Force every peer onto one protocol version (61, 62 or 63).
    /// By default peers rotate through all supported versions.
    #[arg(long)]
    pub protocol_version: Option<u32>,

    /// Disable traffic metering
    #[arg(long)]
    pub no_metrics: bool,

    /// Meter name prefix
    #[arg(long, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Data directory; relative log files are placed here
    #[arg(long, default_value = ".")]
    pub datadir: PathBuf,

    /// Log file name (stdout if absent or "-")
    #[arg(long)]
    pub log_file: Option<String>,

    /// Default log filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub json: bool,

    /// Seed for generated traffic
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Write the final meter readings as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl Args {
    /// Node settings derived from the arguments.
    pub fn node_config(&self) -> NodeConfig {
        NodeConfig {
            peers: self.peers,
            messages: self.messages,
            protocol_version: self.protocol_version,
            seed: self.seed,
            metering: MeteringConfig {
                enabled: !self.no_metrics,
                namespace: self.namespace.clone(),
            },
        }
    }

    /// Where logs go.
    pub fn log_sink(&self) -> LogSink {
        LogSink::resolve(&self.datadir, self.log_file.as_deref())
    }
}
