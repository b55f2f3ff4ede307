use core_sim::{Action, LogRow, SessionState, START_PRICE};
use serde::Serialize;

/// What the dashboard renders after one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub balance: f64,
    pub price: f64,
    pub price_change_pct: f64,
    pub inventory: u32,
    pub net_worth: f64,
    pub net_worth_delta: f64,
    pub moving_average: Option<f64>,
    pub action: Option<Action>,
    pub price_history: Vec<f64>,
    pub log_rows: Vec<LogRow>,
}

impl TickSnapshot {
    pub fn capture(
        tick: u64,
        state: &SessionState,
        price: f64,
        moving_average: Option<f64>,
        action: Option<Action>,
    ) -> Self {
        let net_worth = state.ledger.net_worth(price);

        Self {
            tick,
            balance: state.ledger.cash(),
            price,
            price_change_pct: price_change_pct(price),
            inventory: state.ledger.inventory(),
            net_worth,
            net_worth_delta: net_worth - state.config.initial_balance,
            moving_average,
            action,
            price_history: state.history.clone(),
            log_rows: state.trade_log.display_rows().to_vec(),
        }
    }
}

/// Move since the walk's starting price, in percent.
pub fn price_change_pct(price: f64) -> f64 {
    (price - START_PRICE) / START_PRICE * 100.0
}
