pub mod engine;
pub mod logging;
pub mod pacing;
pub mod snapshot;

pub use engine::{LaunchError, RunPhase, RunSummary, SimEngine, DEFAULT_TICKS_PER_RUN};
pub use logging::{InMemoryRunLogWriter, RunLogEvent, RunLogEventKind, RunLogWriter, TracingRunLogWriter};
pub use pacing::{Pacer, DEFAULT_TICK_INTERVAL};
pub use snapshot::TickSnapshot;
