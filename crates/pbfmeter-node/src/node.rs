//! Simulated node run.

use std::{path::Path, sync::Arc};

use pbfmeter_core::{MeterReading, Metering, MeteringConfig};
use pbfmeter_harness::{MemoryChannel, TrafficGenerator};
use pbfmeter_proto::{Direction, ProtocolVersion};
use tokio::task::JoinSet;

use crate::{
    NodeError,
    peer::{Moved, answer_handshake, drain_traffic, handshake, send_traffic},
};

/// Node settings
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Number of simulated peers
    pub peers: usize,
    /// Messages each side sends per peer
    pub messages: u64,
    /// Version every peer is forced onto, if any
    pub protocol_version: Option<u32>,
    /// Traffic seed
    pub seed: u64,
    /// Metering settings
    pub metering: MeteringConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            peers: 4,
            messages: 1_000,
            protocol_version: None,
            seed: 0,
            metering: MeteringConfig::default(),
        }
    }
}

/// Outcome of a run.
#[derive(Debug)]
pub struct RunReport {
    /// Metering context the run used
    pub metering: Metering,
    /// Negotiated version per peer, in peer order
    pub versions: Vec<ProtocolVersion>,
    /// What the local node moved across all peers
    pub moved: Moved,
}

impl RunReport {
    /// Final meter readings; empty when metering was disabled.
    pub fn readings(&self) -> Vec<MeterReading> {
        self.metering.registry().map(|r| r.snapshot()).unwrap_or_default()
    }

    /// Log every non-zero meter and the per-direction totals.
    pub fn log(&self) {
        let Some(registry) = self.metering.registry() else {
            tracing::info!(
                received = self.moved.inbound.count,
                sent = self.moved.outbound.count,
                "metering disabled, nothing recorded"
            );
            return;
        };

        for reading in self.readings().iter().filter(|r| r.value.count > 0) {
            tracing::info!(
                meter = %reading.name,
                packets = reading.value.count,
                traffic = reading.value.bytes,
                "meter"
            );
        }
        for direction in Direction::ALL {
            let total = registry.totals(direction);
            tracing::info!(%direction, packets = total.count, traffic = total.bytes, "total");
        }
    }

    /// Write the readings as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), NodeError> {
        let json = serde_json::to_vec_pretty(&self.readings())?;
        std::fs::write(path, json)
            .map_err(|source| NodeError::Report { path: path.to_path_buf(), source })
    }
}

/// Connect `config.peers` in-memory peers, exchange traffic, and report.
pub async fn run(config: &NodeConfig) -> Result<RunReport, NodeError> {
    let forced = config.protocol_version.map(ProtocolVersion::supported).transpose()?;
    let metering = Metering::new(&config.metering);
    tracing::info!(
        peers = config.peers,
        messages = config.messages,
        metered = metering.is_enabled(),
        "starting simulated node"
    );

    let messages = config.messages;
    let mut versions = Vec::with_capacity(config.peers);
    let mut greetings = Moved::default();
    // Dropping a set aborts whatever is still running in it
    let mut local_tasks: JoinSet<Result<Moved, NodeError>> = JoinSet::new();
    let mut remote_tasks = JoinSet::new();

    for peer in 0..config.peers {
        let accept = forced
            .unwrap_or(ProtocolVersion::SUPPORTED[peer % ProtocolVersion::SUPPORTED.len()])
            .get();

        let (local, remote) = MemoryChannel::pair();
        let mut local = metering.wrap(local);
        let accepted = [accept];
        let ((version, greeting), _) = tokio::try_join!(
            handshake(peer, &mut local),
            answer_handshake(peer, &remote, &accepted)
        )?;

        versions.push(version);
        greetings = greetings + greeting;

        // Version is bound; the channel can now be shared by reader and writer
        let local = Arc::new(local);
        let remote = Arc::new(remote);
        let seed = config.seed.wrapping_add(peer as u64 * 2);
        let out = TrafficGenerator::new(version, seed);
        let back = TrafficGenerator::new(version, seed.wrapping_add(1));

        let writer = Arc::clone(&local);
        local_tasks.spawn(async move {
            let outbound = send_traffic(peer, writer, out, messages).await?;
            Ok(Moved { outbound, ..Moved::default() })
        });
        local_tasks.spawn(async move {
            let inbound = drain_traffic(peer, local, messages).await?;
            Ok(Moved { inbound, ..Moved::default() })
        });
        remote_tasks.spawn(send_traffic(peer, Arc::clone(&remote), back, messages));
        remote_tasks.spawn(drain_traffic(peer, remote, messages));
    }

    let moved = join_all(local_tasks, greetings, |moved, leg| moved + leg).await?;
    join_all(remote_tasks, (), |(), _| ()).await?;

    tracing::info!(
        received = moved.inbound.count,
        sent = moved.outbound.count,
        "simulated node finished"
    );
    Ok(RunReport { metering, versions, moved })
}

/// Wait for every task in `tasks`, folding their outputs into `init`.
///
/// Returns on the first failure; the set is dropped with it, which aborts
/// the tasks still running.
async fn join_all<T: 'static, A>(
    mut tasks: JoinSet<Result<T, NodeError>>,
    init: A,
    mut fold: impl FnMut(A, T) -> A,
) -> Result<A, NodeError> {
    let mut acc = init;
    while let Some(joined) = tasks.join_next().await {
        acc = fold(acc, joined??);
    }
    Ok(acc)
}
