use core_sim::Action;
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunLogEventKind {
    RunStarted,
    PriceGenerated,
    TradeExecuted,
    SnapshotPublished,
    RunCompleted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunLogEvent {
    pub tick: u64,
    pub kind: RunLogEventKind,
    pub price: Option<f64>,
    pub action: Option<Action>,
}

impl RunLogEvent {
    pub fn new(tick: u64, kind: RunLogEventKind) -> Self {
        Self {
            tick,
            kind,
            price: None,
            action: None,
        }
    }

    pub fn price_generated(tick: u64, price: f64) -> Self {
        Self {
            price: Some(price),
            ..Self::new(tick, RunLogEventKind::PriceGenerated)
        }
    }

    pub fn trade_executed(tick: u64, action: Action, price: f64) -> Self {
        Self {
            price: Some(price),
            action: Some(action),
            ..Self::new(tick, RunLogEventKind::TradeExecuted)
        }
    }
}

pub trait RunLogWriter {
    fn write(&mut self, event: RunLogEvent);
}

#[derive(Debug, Default)]
pub struct InMemoryRunLogWriter {
    events: Vec<RunLogEvent>,
}

impl InMemoryRunLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[RunLogEvent] {
        &self.events
    }

    pub fn kinds(&self) -> Vec<RunLogEventKind> {
        self.events.iter().map(|event| event.kind).collect()
    }
}

impl RunLogWriter for InMemoryRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        self.events.push(event);
    }
}

/// Forwards run events to `tracing`, tagged with the run they belong to.
#[derive(Debug, Clone, Copy)]
pub struct TracingRunLogWriter {
    run_id: u64,
}

impl TracingRunLogWriter {
    pub fn new(run_id: u64) -> Self {
        Self { run_id }
    }
}

impl RunLogWriter for TracingRunLogWriter {
    fn write(&mut self, event: RunLogEvent) {
        let run_id = self.run_id;
        let tick = event.tick;
        match event.kind {
            RunLogEventKind::RunStarted => info!(run_id, tick, "run started"),
            RunLogEventKind::PriceGenerated => {
                debug!(run_id, tick, price = event.price, "price generated")
            }
            RunLogEventKind::TradeExecuted => info!(
                run_id,
                tick,
                action = event.action.map(Action::as_str),
                price = event.price,
                "trade executed"
            ),
            RunLogEventKind::SnapshotPublished => trace!(run_id, tick, "snapshot published"),
            RunLogEventKind::RunCompleted => info!(run_id, tick, "run completed"),
        }
    }
}
