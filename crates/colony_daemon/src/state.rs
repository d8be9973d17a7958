use colony_control::EventScheduler;
use colony_core::{GameContent, GameSession, MetricsSnapshot, NoticeEnvelope};
use parking_lot::Mutex;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

const METRICS_HISTORY_CAP: usize = 10_000;

pub struct SimState {
    pub session: GameSession,
    pub content: GameContent,
    pub events: EventScheduler<ChaCha8Rng>,
    pub next_command_id: u64,
    pub metrics_history: VecDeque<MetricsSnapshot>,
}

impl SimState {
    pub fn push_metrics(&mut self, snapshot: MetricsSnapshot) {
        if self.metrics_history.len() >= METRICS_HISTORY_CAP {
            self.metrics_history.pop_front();
        }
        self.metrics_history.push_back(snapshot);
    }
}

pub type SharedSim = Arc<Mutex<SimState>>;
pub type EventTx = broadcast::Sender<Vec<NoticeEnvelope>>;

/// Handles for the colony's tick task and event-check task.
///
/// Dropping the value aborts both tasks, so a torn-down colony is never
/// mutated by a stale timer.
pub struct ColonyTimers {
    pub(crate) tick: JoinHandle<()>,
    pub(crate) events: JoinHandle<()>,
    /// Set on drop. A task blocked on the sim lock while being aborted checks
    /// this before touching the session.
    pub(crate) stopped: Arc<AtomicBool>,
}

impl ColonyTimers {
    pub fn is_finished(&self) -> bool {
        self.tick.is_finished() && self.events.is_finished()
    }
}

impl Drop for ColonyTimers {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Relaxed);
        self.tick.abort();
        self.events.abort();
    }
}

/// Lock order: `sim` before `timers`.
#[derive(Clone)]
pub struct AppState {
    pub sim: SharedSim,
    pub event_tx: EventTx,
    pub paused: Arc<AtomicBool>,
    pub timers: Arc<Mutex<Option<ColonyTimers>>>,
}

impl AppState {
    pub fn new(sim: SimState, event_tx: EventTx) -> Self {
        Self {
            sim: Arc::new(Mutex::new(sim)),
            event_tx,
            paused: Arc::new(AtomicBool::new(false)),
            timers: Arc::new(Mutex::new(None)),
        }
    }
}
