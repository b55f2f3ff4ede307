use crate::config::{RelaunchPolicy, SimConfig};
use crate::ledger::Ledger;
use crate::trade_log::TradeLog;

/// Everything a session accumulates between launches.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub config: SimConfig,
    pub history: Vec<f64>,
    pub ledger: Ledger,
    pub trade_log: TradeLog,
}

impl SessionState {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            history: Vec::new(),
            ledger: Ledger::new(config.initial_balance),
            trade_log: TradeLog::new(),
        }
    }

    /// Builds the state a new launch starts from. Without prior state a
    /// fresh session is created regardless of policy.
    pub fn for_launch(
        previous: Option<SessionState>,
        config: SimConfig,
        policy: RelaunchPolicy,
    ) -> Self {
        match (previous, policy) {
            (Some(mut state), RelaunchPolicy::Continue) => {
                state.config = config;
                state
            }
            _ => Self::new(config),
        }
    }

    pub fn latest_price(&self) -> Option<f64> {
        self.history.last().copied()
    }

    /// Session-wide index the next appended price will carry.
    pub fn next_tick(&self) -> u64 {
        self.history.len() as u64
    }
}
