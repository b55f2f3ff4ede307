use std::fmt;

use core_sim::{PriceGenerator, RelaunchPolicy, SessionState, SimConfig, START_PRICE};
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

use crate::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};
use crate::pacing::Pacer;
use crate::snapshot::TickSnapshot;

pub const DEFAULT_TICKS_PER_RUN: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running { remaining: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchError {
    AlreadyRunning,
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "a run is already in progress"),
        }
    }
}

impl std::error::Error for LaunchError {}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u32,
    pub trades: u32,
    pub final_price: f64,
    pub final_net_worth: f64,
}

/// Owns the session and advances it one tick at a time.
#[derive(Debug)]
pub struct SimEngine<R = StdRng> {
    generator: PriceGenerator<R>,
    policy: RelaunchPolicy,
    ticks_per_run: u32,
    session: Option<SessionState>,
    phase: RunPhase,
    run_price: f64,
}

impl SimEngine<StdRng> {
    pub fn for_test_seed(seed: u64) -> Self {
        Self::new(PriceGenerator::seeded(seed), RelaunchPolicy::default())
    }
}

impl<R: Rng> SimEngine<R> {
    pub fn new(generator: PriceGenerator<R>, policy: RelaunchPolicy) -> Self {
        Self {
            generator,
            policy,
            ticks_per_run: DEFAULT_TICKS_PER_RUN,
            session: None,
            phase: RunPhase::Idle,
            run_price: START_PRICE,
        }
    }

    pub fn with_ticks_per_run(mut self, ticks_per_run: u32) -> Self {
        self.ticks_per_run = ticks_per_run;
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn policy(&self) -> RelaunchPolicy {
        self.policy
    }

    pub fn ticks_per_run(&self) -> u32 {
        self.ticks_per_run
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    /// Moves from idle to running. The walk restarts at the start price;
    /// what happens to earlier state is up to the relaunch policy.
    pub fn launch(&mut self, config: SimConfig) -> Result<(), LaunchError> {
        if let RunPhase::Running { .. } = self.phase {
            return Err(LaunchError::AlreadyRunning);
        }

        self.session = Some(SessionState::for_launch(
            self.session.take(),
            config,
            self.policy,
        ));
        self.run_price = START_PRICE;
        self.phase = match self.ticks_per_run {
            0 => RunPhase::Idle,
            remaining => RunPhase::Running { remaining },
        };
        Ok(())
    }

    /// Generates a price, lets the strategy trade on it, and captures the
    /// result. Returns `None` when no run is in progress.
    pub fn step_once(&mut self, log: &mut dyn RunLogWriter) -> Option<TickSnapshot> {
        let RunPhase::Running { remaining } = self.phase else {
            return None;
        };
        let session = self.session.as_mut()?;

        let price = self.generator.next_price(self.run_price);
        self.run_price = price;
        let tick = session.next_tick();
        session.history.push(price);
        log.write(RunLogEvent::price_generated(tick, price));

        let config = session.config;
        let decision = strategy::decide(
            &session.history,
            config.ma_window,
            &mut session.ledger,
            config.trade_size,
        );
        if let Some(decision) = decision {
            let entry = session.trade_log.record(tick, decision.action, decision.price);
            log.write(RunLogEvent::trade_executed(tick, entry.action, entry.price));
        }

        self.phase = match remaining {
            1 => RunPhase::Idle,
            remaining => RunPhase::Running {
                remaining: remaining - 1,
            },
        };

        let moving_average = strategy::moving_average(&session.history, config.ma_window);
        Some(TickSnapshot::capture(
            tick,
            session,
            price,
            moving_average,
            decision.map(|decision| decision.action),
        ))
    }

    /// Launches and drives a whole run, handing each snapshot to `publish`
    /// before pausing.
    pub async fn run<L, F>(
        &mut self,
        config: SimConfig,
        pacer: &Pacer,
        log: &mut L,
        mut publish: F,
    ) -> Result<RunSummary, LaunchError>
    where
        L: RunLogWriter,
        F: FnMut(&TickSnapshot),
    {
        self.launch(config)?;
        let first_tick = self.session.as_ref().map_or(0, SessionState::next_tick);
        log.write(RunLogEvent::new(first_tick, RunLogEventKind::RunStarted));

        let mut ticks = 0;
        let mut trades = 0;
        while let Some(snapshot) = self.step_once(log) {
            ticks += 1;
            if snapshot.action.is_some() {
                trades += 1;
            }
            publish(&snapshot);
            log.write(RunLogEvent::new(
                snapshot.tick,
                RunLogEventKind::SnapshotPublished,
            ));
            pacer.pause().await;
        }

        let final_price = self.run_price;
        let final_net_worth = self
            .session
            .as_ref()
            .map_or(0.0, |session| session.ledger.net_worth(final_price));
        let last_tick = self
            .session
            .as_ref()
            .map_or(0, |session| session.next_tick().saturating_sub(1));
        log.write(RunLogEvent::new(last_tick, RunLogEventKind::RunCompleted));

        Ok(RunSummary {
            ticks,
            trades,
            final_price,
            final_net_worth,
        })
    }
}
