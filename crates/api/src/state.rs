use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, RwLock,
};

use core_sim::{PriceGenerator, RelaunchPolicy, SimConfig};
use runtime::{Pacer, RunSummary, SimEngine, TickSnapshot, TracingRunLogWriter};
use tokio::sync::{broadcast, Mutex, OwnedMutexGuard};
use tracing::{info, warn};

const EVENT_CHANNEL_CAPACITY: usize = 256;
const NO_ACTIVE_RUN: u64 = 0;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LaunchError {
    AlreadyRunning,
    RunIdOverflow,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RuntimeEvent {
    Connected {
        run_id: Option<u64>,
    },
    RunStarted {
        run_id: u64,
        config: SimConfig,
    },
    Tick {
        run_id: u64,
        snapshot: TickSnapshot,
    },
    RunCompleted {
        run_id: u64,
        summary: RunSummary,
    },
}

impl RuntimeEvent {
    pub fn connected(run_id: Option<u64>) -> Self {
        Self::Connected { run_id }
    }

    pub fn run_started(run_id: u64, config: SimConfig) -> Self {
        Self::RunStarted { run_id, config }
    }

    pub fn tick(run_id: u64, snapshot: TickSnapshot) -> Self {
        Self::Tick { run_id, snapshot }
    }

    pub fn run_completed(run_id: u64, summary: RunSummary) -> Self {
        Self::RunCompleted { run_id, summary }
    }
}

/// The single simulated session the server hosts, plus its fan-out.
#[derive(Clone, Debug)]
pub struct AppState {
    next_run_id: Arc<AtomicU64>,
    active_run_id: Arc<AtomicU64>,
    events_tx: broadcast::Sender<RuntimeEvent>,
    engine: Arc<Mutex<SimEngine>>,
    latest: Arc<RwLock<Option<TickSnapshot>>>,
    pacer: Pacer,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(
            SimEngine::new(PriceGenerator::from_entropy(), RelaunchPolicy::default()),
            Pacer::default(),
        )
    }
}

impl AppState {
    pub fn new(engine: SimEngine, pacer: Pacer) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            next_run_id: Arc::new(AtomicU64::new(0)),
            active_run_id: Arc::new(AtomicU64::new(NO_ACTIVE_RUN)),
            events_tx,
            engine: Arc::new(Mutex::new(engine)),
            latest: Arc::new(RwLock::new(None)),
            pacer,
        }
    }

    /// Starts a run in the background. Fails while another run holds the
    /// engine; runs are never queued.
    pub fn launch(&self, config: SimConfig) -> Result<u64, LaunchError> {
        let engine = Arc::clone(&self.engine)
            .try_lock_owned()
            .map_err(|_| LaunchError::AlreadyRunning)?;
        let run_id = self.allocate_run_id()?;
        self.active_run_id.store(run_id, Ordering::Relaxed);

        let state = self.clone();
        tokio::spawn(async move { state.drive_run(engine, run_id, config).await });

        Ok(run_id)
    }

    async fn drive_run(self, mut engine: OwnedMutexGuard<SimEngine>, run_id: u64, config: SimConfig) {
        let _ = self.publish_event(RuntimeEvent::run_started(run_id, config));

        let mut log = TracingRunLogWriter::new(run_id);
        let result = engine
            .run(config, &self.pacer, &mut log, |snapshot| {
                self.store_latest(snapshot.clone());
                let _ = self.publish_event(RuntimeEvent::tick(run_id, snapshot.clone()));
            })
            .await;

        self.active_run_id.store(NO_ACTIVE_RUN, Ordering::Relaxed);
        drop(engine);

        match result {
            Ok(summary) => {
                info!(
                    run_id,
                    ticks = summary.ticks,
                    trades = summary.trades,
                    final_net_worth = summary.final_net_worth,
                    "run finished"
                );
                let _ = self.publish_event(RuntimeEvent::run_completed(run_id, summary));
            }
            Err(err) => warn!(run_id, %err, "run could not start"),
        }
    }

    fn allocate_run_id(&self) -> Result<u64, LaunchError> {
        let previous = self
            .next_run_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_add(1)
            })
            .map_err(|_| LaunchError::RunIdOverflow)?;

        Ok(previous + 1)
    }

    pub fn active_run_id(&self) -> Option<u64> {
        match self.active_run_id.load(Ordering::Relaxed) {
            NO_ACTIVE_RUN => None,
            run_id => Some(run_id),
        }
    }

    pub fn is_running(&self) -> bool {
        self.engine.try_lock().is_err()
    }

    pub fn latest_snapshot(&self) -> Option<TickSnapshot> {
        self.latest.read().ok().and_then(|latest| latest.clone())
    }

    fn store_latest(&self, snapshot: TickSnapshot) {
        if let Ok(mut latest) = self.latest.write() {
            *latest = Some(snapshot);
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<RuntimeEvent> {
        self.events_tx.subscribe()
    }

    pub fn publish_event(
        &self,
        event: RuntimeEvent,
    ) -> Result<usize, broadcast::error::SendError<RuntimeEvent>> {
        self.events_tx.send(event)
    }

    #[cfg(test)]
    pub(crate) fn for_test(seed: u64, ticks_per_run: u32, pacer: Pacer) -> Self {
        Self::new(
            SimEngine::new(PriceGenerator::seeded(seed), RelaunchPolicy::default())
                .with_ticks_per_run(ticks_per_run),
            pacer,
        )
    }
}
