mod config;
mod generators;
mod ledger;
mod state;
mod trade_log;

pub use config::{
    ConfigError, RelaunchPolicy, SimConfig, MA_WINDOW_CHOICES, MAX_TRADE_SIZE,
    MIN_INITIAL_BALANCE, MIN_TRADE_SIZE,
};
pub use generators::{PriceGenerator, MAX_STEP_PCT};
pub use ledger::{Action, Fill, Ledger, LedgerError};
pub use state::SessionState;
pub use trade_log::{LogRow, TradeLog, TradeLogEntry, DISPLAY_TRADES, LOG_HEADER};

/// Price every run's walk starts from.
pub const START_PRICE: f64 = 100.0;

#[cfg(test)]
mod tests {
    use super::{SessionState, SimConfig};

    #[test]
    fn buy_at_fifty_keeps_net_worth_until_price_moves() {
        let mut state = SessionState::new(SimConfig::default());

        state.ledger.buy(50.0, state.config.trade_size).unwrap();

        assert_eq!(state.ledger.cash(), 950.0);
        assert_eq!(state.ledger.inventory(), 1);
        assert_eq!(state.ledger.net_worth(50.0), 1_000.0);
    }
}
