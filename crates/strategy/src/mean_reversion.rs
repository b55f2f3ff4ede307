use core_sim::{Action, Ledger};

/// Buy when price trades below this fraction of the moving average.
pub const BUY_BAND: f64 = 0.98;
/// Sell when price trades above this fraction of the moving average.
pub const SELL_BAND: f64 = 1.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub action: Action,
    pub price: f64,
    pub moving_average: f64,
}

/// Simple moving average over the last `window` prices.
pub fn moving_average(history: &[f64], window: usize) -> Option<f64> {
    if window == 0 || history.len() < window {
        return None;
    }

    let recent = &history[history.len() - window..];
    Some(recent.iter().sum::<f64>() / window as f64)
}

/// Which trade the latest price calls for, if the ledger can afford it.
pub fn signal(history: &[f64], window: usize, ledger: &Ledger, trade_size: u32) -> Option<Action> {
    let moving_average = moving_average(history, window)?;
    let price = *history.last()?;

    if price < moving_average * BUY_BAND && ledger.can_buy(price, trade_size) {
        Some(Action::Buy)
    } else if price > moving_average * SELL_BAND && ledger.can_sell(trade_size) {
        Some(Action::Sell)
    } else {
        None
    }
}

/// Evaluates the latest price and applies the resulting trade to `ledger`.
/// Denied trades produce `None` and leave the ledger untouched.
pub fn decide(
    history: &[f64],
    window: usize,
    ledger: &mut Ledger,
    trade_size: u32,
) -> Option<Decision> {
    let action = signal(history, window, ledger, trade_size)?;
    let moving_average = moving_average(history, window)?;
    let price = *history.last()?;

    let fill = match action {
        Action::Buy => ledger.buy(price, trade_size),
        Action::Sell => ledger.sell(price, trade_size),
    }
    .ok()?;

    Some(Decision {
        action: fill.action,
        price: fill.price,
        moving_average,
    })
}
