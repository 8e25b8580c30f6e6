//! Log sink bootstrap.
//!
//! Logs go to stdout unless a log file is configured, in which case the file
//! is opened under the data directory in append mode (created if missing).
//! A file name of `-` also means stdout.

use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter};

use crate::NodeError;

/// Where log lines are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogSink {
    /// Standard output
    Stdout,
    /// Append to this file
    File(PathBuf),
}

impl LogSink {
    /// Resolve the sink for `log_file` relative to `datadir`.
    ///
    /// Absolute paths are used as given.
    pub fn resolve(datadir: &Path, log_file: Option<&str>) -> Self {
        match log_file {
            None | Some("" | "-") => Self::Stdout,
            Some(file) => Self::File(datadir.join(file)),
        }
    }

    fn make_writer(&self) -> Result<BoxMakeWriter, NodeError> {
        match self {
            Self::Stdout => Ok(BoxMakeWriter::new(std::io::stdout)),
            Self::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| NodeError::LogFile { path: path.clone(), source })?;
                Ok(BoxMakeWriter::new(Mutex::new(file)))
            },
        }
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides `default_filter` when set.
pub fn init(sink: &LogSink, default_filter: &str, json: bool) -> Result<(), NodeError> {
    let writer = sink.make_writer()?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let ansi = matches!(sink, LogSink::Stdout);

    let result = if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).with_writer(writer).try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(ansi)
            .with_writer(writer)
            .try_init()
    };

    result.map_err(|e| NodeError::Logging(e.to_string()))
}
