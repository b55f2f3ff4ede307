pub mod mean_reversion;

pub use mean_reversion::{decide, moving_average, signal, Decision, BUY_BAND, SELL_BAND};
