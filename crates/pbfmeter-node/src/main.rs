//! Simulated pbf node binary.

use clap::Parser;
use pbfmeter_node::{Args, NodeError, logging, run};

#[tokio::main]
async fn main() -> Result<(), NodeError> {
    let args = Args::parse();
    logging::init(&args.log_sink(), &args.log_level, args.json)?;

    let report = run(&args.node_config()).await?;
    report.log();

    if let Some(path) = &args.report {
        report.write_json(path)?;
        tracing::info!(path = %path.display(), "meter report written");
    }

    Ok(())
}
