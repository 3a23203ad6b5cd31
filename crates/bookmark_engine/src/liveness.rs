use std::sync::Arc;
use std::time::Duration;

use audit_logging::{audit_debug, audit_info, audit_trace};
use bookmark_core::{count_leaves, leaves, BookmarkNode, ResultIndex};
use futures_util::future::{join, join_all};
use tokio::sync::{mpsc, Mutex};

use crate::{CheckEvent, EngineEvent, JobProgress, ProbeOutcome, Prober};

/// Receives events from a running liveness job.
pub trait CheckSink: Send + Sync {
    fn emit(&self, event: CheckEvent);
}

/// Forwards job events into the engine's event channel.
pub struct ChannelCheckSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelCheckSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl CheckSink for ChannelCheckSink {
    fn emit(&self, event: CheckEvent) {
        let _ = self.tx.send(EngineEvent::Check(event));
    }
}

/// Bookkeeping for one liveness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationJob {
    total_leaves: usize,
    processed_leaves: usize,
    concurrency_limit: usize,
    request_timeout: Duration,
}

impl ValidationJob {
    pub fn new(roots: &[BookmarkNode], concurrency_limit: usize, request_timeout: Duration) -> Self {
        Self {
            total_leaves: count_leaves(roots),
            processed_leaves: 0,
            concurrency_limit: concurrency_limit.max(1),
            request_timeout,
        }
    }

    pub fn total_leaves(&self) -> usize {
        self.total_leaves
    }

    pub fn processed_leaves(&self) -> usize {
        self.processed_leaves
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency_limit
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn progress(&self) -> JobProgress {
        JobProgress {
            processed: self.processed_leaves,
            total: self.total_leaves,
        }
    }

    fn record_leaf(&mut self) -> JobProgress {
        self.processed_leaves += 1;
        self.progress()
    }
}

struct LeafReport {
    node: BookmarkNode,
    /// `None` for leaves without a URL; they count but are not probed.
    outcome: Option<ProbeOutcome>,
}

/// Probes every leaf under `roots` and returns the index of broken links.
///
/// Each root is one unit of work for a pool of `concurrency_limit` workers
/// pulling from a FIFO queue, so at most that many subtrees are in flight.
/// Inside a subtree leaves are probed one at a time in document order.
/// A single aggregator owns the index and the counters; the sink only ever
/// sees snapshots.
pub async fn check_liveness(
    roots: Vec<BookmarkNode>,
    concurrency_limit: usize,
    request_timeout: Duration,
    prober: &dyn Prober,
    sink: &dyn CheckSink,
) -> ResultIndex {
    let mut job = ValidationJob::new(&roots, concurrency_limit, request_timeout);
    let worker_count = job.concurrency_limit().min(roots.len());
    audit_info!(
        "Liveness check started: {} roots, {} leaves, {} workers, timeout {:?}",
        roots.len(),
        job.total_leaves(),
        worker_count,
        request_timeout
    );

    let (root_tx, root_rx) = mpsc::unbounded_channel();
    for root in roots {
        let _ = root_tx.send(root);
    }
    drop(root_tx);
    let root_rx = Arc::new(Mutex::new(root_rx));

    let (report_tx, report_rx) = mpsc::unbounded_channel();
    let workers = (0..worker_count)
        .map(|worker| {
            run_worker(
                worker,
                root_rx.clone(),
                prober,
                request_timeout,
                report_tx.clone(),
            )
        })
        .collect::<Vec<_>>();
    // The aggregator stops once every worker has dropped its sender.
    drop(report_tx);

    if job.total_leaves() == 0 {
        sink.emit(CheckEvent::Progress(job.progress()));
    }
    let (_, index) = join(join_all(workers), aggregate(report_rx, &mut job, sink)).await;

    audit_info!(
        "Liveness check finished: {}/{} leaves, {} buckets",
        job.processed_leaves(),
        job.total_leaves(),
        index.len()
    );
    sink.emit(CheckEvent::Finished(index.clone()));
    index
}

async fn run_worker(
    worker: usize,
    queue: Arc<Mutex<mpsc::UnboundedReceiver<BookmarkNode>>>,
    prober: &dyn Prober,
    timeout: Duration,
    reports: mpsc::UnboundedSender<LeafReport>,
) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some(root) = next else {
            break;
        };
        audit_trace!("worker {} took root {}", worker, root.id);
        for leaf in leaves(&root) {
            let outcome = match leaf.probe_url() {
                Some(url) => Some(prober.probe(url, timeout).await),
                None => None,
            };
            let _ = reports.send(LeafReport {
                node: leaf.clone(),
                outcome,
            });
        }
    }
    audit_trace!("worker {} idle, queue drained", worker);
}

async fn aggregate(
    mut reports: mpsc::UnboundedReceiver<LeafReport>,
    job: &mut ValidationJob,
    sink: &dyn CheckSink,
) -> ResultIndex {
    let mut index = ResultIndex::new();
    while let Some(report) = reports.recv().await {
        if let Some(outcome) = &report.outcome {
            if let Some(key) = outcome.bucket_key() {
                audit_debug!("{} -> {}", report.node.url.as_deref().unwrap_or_default(), outcome);
                index.push(key, report.node);
                sink.emit(CheckEvent::PartialResult(index.clone()));
            }
        }
        sink.emit(CheckEvent::Progress(job.record_leaf()));
    }
    index
}
