//! TRIHEX Worker - Search off the caller's thread
//!
//! Searches run one at a time on a dedicated OS thread. Callers talk to it
//! only through messages: a request carries a self-contained snapshot that is
//! turned into owned engine values on the worker, and the answer comes back
//! on a oneshot channel. Progress events go out on a broadcast channel and
//! nobody has to listen.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use trihex_core::{
    AiConfig, EngineConfig, MoveRequest, MoveResponse, RemovalRequest, RemovalResponse, RuleError,
    SearchError, SearchEvent, SearchObserver, SnapshotError, TileRef, TrihexAi,
};

/// Events buffered per subscriber before the slowest one starts lagging
const EVENT_CAPACITY: usize = 1024;

/// Worker failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorkerError {
    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("search cancelled")]
    Cancelled,

    #[error("rules violation during search: {0}")]
    Rule(RuleError),

    #[error("search worker has stopped")]
    Stopped,
}

impl From<SearchError> for WorkerError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Cancelled => WorkerError::Cancelled,
            SearchError::Rule(e) => WorkerError::Rule(e),
        }
    }
}

/// Worker configuration
#[derive(Clone, Debug, Default)]
pub struct WorkerConfig {
    pub engine: EngineConfig,
    /// Seeds every search in order (None = random)
    pub seed: Option<u64>,
}

enum Job {
    Move {
        request: MoveRequest,
        epoch: u64,
        reply: oneshot::Sender<Result<MoveResponse, WorkerError>>,
    },
    Removal {
        request: RemovalRequest,
        epoch: u64,
        reply: oneshot::Sender<Result<RemovalResponse, WorkerError>>,
    },
}

/// Forwards search events to every subscriber
struct BroadcastObserver(broadcast::Sender<SearchEvent>);

impl SearchObserver for BroadcastObserver {
    fn on_event(&mut self, event: SearchEvent) {
        // No subscribers is fine
        let _ = self.0.send(event);
    }
}

/// Shared between handles and the worker thread
struct Control {
    cancel: Arc<AtomicBool>,
    /// Bumped by every cancel; jobs queued under an older epoch are dropped
    epoch: AtomicU64,
}

pub struct SearchWorker;

impl SearchWorker {
    /// Start the worker thread. It exits once every handle is dropped.
    pub fn spawn(config: WorkerConfig) -> std::io::Result<WorkerHandle> {
        let (jobs, queue) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let control = Arc::new(Control {
            cancel: Arc::new(AtomicBool::new(false)),
            epoch: AtomicU64::new(0),
        });

        let thread_events = events.clone();
        let thread_control = Arc::clone(&control);
        std::thread::Builder::new()
            .name("trihex-search".to_string())
            .spawn(move || run(config, queue, thread_events, thread_control))?;

        Ok(WorkerHandle { jobs, events, control })
    }
}

/// Cheap to clone; every clone talks to the same worker
#[derive(Clone)]
pub struct WorkerHandle {
    jobs: mpsc::UnboundedSender<Job>,
    events: broadcast::Sender<SearchEvent>,
    control: Arc<Control>,
}

impl WorkerHandle {
    /// Choose a move for the acting player of `request`
    pub async fn choose_move(&self, request: MoveRequest) -> Result<MoveResponse, WorkerError> {
        let (reply, answer) = oneshot::channel();
        let epoch = self.control.epoch.load(Ordering::SeqCst);
        self.jobs
            .send(Job::Move { request, epoch, reply })
            .map_err(|_| WorkerError::Stopped)?;
        answer.await.map_err(|_| WorkerError::Stopped)?
    }

    /// Choose which surrounded tile the acting player removes
    pub async fn choose_removal(
        &self,
        request: RemovalRequest,
    ) -> Result<RemovalResponse, WorkerError> {
        let (reply, answer) = oneshot::channel();
        let epoch = self.control.epoch.load(Ordering::SeqCst);
        self.jobs
            .send(Job::Removal { request, epoch, reply })
            .map_err(|_| WorkerError::Stopped)?;
        answer.await.map_err(|_| WorkerError::Stopped)?
    }

    /// Subscribe to progress events from now on
    pub fn events(&self) -> broadcast::Receiver<SearchEvent> {
        self.events.subscribe()
    }

    /// Cancel the running search and everything queued before this call
    pub fn cancel(&self) {
        self.control.epoch.fetch_add(1, Ordering::SeqCst);
        self.control.cancel.store(true, Ordering::SeqCst);
    }
}

// ============================================================================
// WORKER THREAD
// ============================================================================

fn run(
    config: WorkerConfig,
    mut queue: mpsc::UnboundedReceiver<Job>,
    events: broadcast::Sender<SearchEvent>,
    control: Arc<Control>,
) {
    let mut seeds = match config.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    tracing::debug!("search worker started");

    while let Some(job) = queue.blocking_recv() {
        let ai_config = AiConfig {
            seed: Some(seeds.gen()),
            engine: config.engine.clone(),
            ..AiConfig::default()
        };

        match job {
            Job::Move { request, epoch, reply } => {
                let result = begin(&control, epoch).and_then(|()| {
                    let (position, acting) = request.to_position()?;
                    let config = AiConfig { difficulty: request.difficulty, ..ai_config };
                    let mut ai = TrihexAi::new(config)
                        .with_cancel_flag(Arc::clone(&control.cancel))
                        .with_observer(Box::new(BroadcastObserver(events.clone())));
                    let outcome = ai.choose_move(&position, acting, request.mode)?;
                    tracing::debug!(
                        "{} search for {}: {} horizon nodes, {} cutoffs",
                        request.difficulty,
                        acting,
                        ai.stats().horizon_nodes,
                        ai.stats().cutoffs
                    );
                    Ok(MoveResponse::from(outcome.map(|o| o.mv)))
                });
                if let Err(WorkerError::Cancelled) = result {
                    tracing::info!("move search cancelled");
                }
                // The caller may have stopped waiting
                let _ = reply.send(result);
            }
            Job::Removal { request, epoch, reply } => {
                let result = begin(&control, epoch).and_then(|()| {
                    let (board, candidates, acting) = request.resolve()?;
                    let config = AiConfig { difficulty: request.difficulty, ..ai_config };
                    let mut ai = TrihexAi::new(config);
                    let chosen = ai.select_removal(&board, &candidates, acting);
                    Ok(chosen.and_then(|at| board.get(at).map(|tile| TileRef::new(at, tile))))
                });
                let _ = reply.send(result);
            }
        }
    }

    tracing::debug!("search worker stopped");
}

/// Clear the cancel flag for a new job unless it was queued before a cancel
fn begin(control: &Control, epoch: u64) -> Result<(), WorkerError> {
    // Clear first: a cancel racing with this check either bumps the epoch
    // (caught below) or raises the flag again (caught by the search)
    control.cancel.store(false, Ordering::SeqCst);
    if control.epoch.load(Ordering::SeqCst) != epoch {
        return Err(WorkerError::Cancelled);
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
