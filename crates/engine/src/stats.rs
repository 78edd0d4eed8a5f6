use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::trace;

/// One latency observation from the rewrite hot path.
#[derive(Debug, Clone)]
pub struct TimingSample {
    /// Host the call ran against (Arc for cheap cloning).
    pub host: Arc<str>,
    pub dur: Duration,
}

/// Aggregated rewrite timings.
///
/// Owned exclusively by the consumer task, so updating it takes no
/// synchronization; everyone else sees copies via snapshot messages.
#[derive(Debug, Clone, Default)]
pub struct RewriteStats {
    pub runs: u64,
    pub total_time: Duration,
    pub max: Duration,
    pub max_host: String,
}

impl RewriteStats {
    /// Fold one sample in.
    pub fn record(&mut self, host: &str, dur: Duration) {
        self.runs += 1;
        self.total_time += dur;
        if dur > self.max {
            self.max = dur;
            self.max_host = host.to_string();
        }
    }

    /// Mean latency over all recorded samples.
    pub fn average(&self) -> Duration {
        if self.runs == 0 {
            return Duration::ZERO;
        }
        self.total_time / self.runs as u32
    }
}

enum StatsMessage {
    Sample(TimingSample),
    Snapshot(oneshot::Sender<RewriteStats>),
}

/// Hot-path handle to the timing queue.
///
/// A disabled emitter (no sender) makes `emit` a no-op, so synchronous
/// constructors and tests pay nothing. `emit` never blocks or awaits: when
/// the bounded queue is full the sample is dropped, sampling being advisory.
#[derive(Clone)]
pub struct StatsEmitter {
    sender: Option<mpsc::Sender<StatsMessage>>,
}

impl StatsEmitter {
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    /// Create an enabled emitter together with its consumer half. The caller
    /// decides where the aggregator runs (`tokio::spawn(aggregator.run())`).
    pub fn bounded(capacity: usize) -> (Self, StatsAggregator) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self { sender: Some(tx) },
            StatsAggregator {
                rx,
                stats: RewriteStats::default(),
            },
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Submit one sample, fire-and-forget.
    #[inline]
    pub fn emit(&self, host: &str, dur: Duration) {
        if let Some(tx) = &self.sender {
            let _ = tx.try_send(StatsMessage::Sample(TimingSample {
                host: Arc::from(host),
                dur,
            }));
        }
    }

    /// Ask the consumer for a copy of its counters. `None` when stats are
    /// disabled or the consumer is gone.
    pub async fn snapshot(&self) -> Option<RewriteStats> {
        let tx = self.sender.as_ref()?;
        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(StatsMessage::Snapshot(reply_tx)).await.ok()?;
        reply_rx.await.ok()
    }
}

/// The single consumer of the timing queue.
pub struct StatsAggregator {
    rx: mpsc::Receiver<StatsMessage>,
    stats: RewriteStats,
}

impl StatsAggregator {
    /// Drain the queue until every emitter clone is dropped.
    pub async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            match message {
                StatsMessage::Sample(sample) => {
                    self.stats.record(&sample.host, sample.dur);
                    trace!(
                        runs = self.stats.runs,
                        avg_us = self.stats.average().as_micros() as u64,
                        max_us = self.stats.max.as_micros() as u64,
                        max_host = %self.stats.max_host,
                        "rewrite timing"
                    );
                }
                StatsMessage::Snapshot(reply) => {
                    let _ = reply.send(self.stats.clone());
                }
            }
        }
    }
}
