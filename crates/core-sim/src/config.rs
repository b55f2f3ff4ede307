use std::fmt;

use serde::Serialize;

pub const MIN_INITIAL_BALANCE: f64 = 100.0;
pub const MIN_TRADE_SIZE: u32 = 1;
pub const MAX_TRADE_SIZE: u32 = 10;
pub const MA_WINDOW_CHOICES: [usize; 4] = [3, 5, 10, 20];

/// Inputs collected before a launch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimConfig {
    pub initial_balance: f64,
    pub trade_size: u32,
    pub ma_window: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1_000.0,
            trade_size: 1,
            ma_window: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidInitialBalance(f64),
    InvalidTradeSize(u32),
    InvalidMaWindow(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInitialBalance(value) => write!(
                f,
                "initial_balance must be a finite amount of at least {MIN_INITIAL_BALANCE}, got {value}"
            ),
            Self::InvalidTradeSize(value) => write!(
                f,
                "trade_size must be between {MIN_TRADE_SIZE} and {MAX_TRADE_SIZE}, got {value}"
            ),
            Self::InvalidMaWindow(value) => write!(
                f,
                "ma_window must be one of {MA_WINDOW_CHOICES:?}, got {value}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl SimConfig {
    pub fn new(initial_balance: f64, trade_size: u32, ma_window: usize) -> Result<Self, ConfigError> {
        if !initial_balance.is_finite() || initial_balance < MIN_INITIAL_BALANCE {
            return Err(ConfigError::InvalidInitialBalance(initial_balance));
        }
        if !(MIN_TRADE_SIZE..=MAX_TRADE_SIZE).contains(&trade_size) {
            return Err(ConfigError::InvalidTradeSize(trade_size));
        }
        if !MA_WINDOW_CHOICES.contains(&ma_window) {
            return Err(ConfigError::InvalidMaWindow(ma_window));
        }

        Ok(Self {
            initial_balance,
            trade_size,
            ma_window,
        })
    }
}

/// What a launch does with state left over from an earlier run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelaunchPolicy {
    /// Keep history, ledger and trade log; adopt the new config.
    #[default]
    Continue,
    /// Start from a fresh session built from the new config.
    Reset,
}

impl RelaunchPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "continue" => Some(Self::Continue),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::Reset => "reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, RelaunchPolicy, SimConfig};

    #[test]
    fn defaults_match_sidebar_inputs() {
        let config = SimConfig::default();

        assert_eq!(config.initial_balance, 1_000.0);
        assert_eq!(config.trade_size, 1);
        assert_eq!(config.ma_window, 5);
        assert_eq!(SimConfig::new(1_000.0, 1, 5), Ok(config));
    }

    #[test]
    fn accepts_range_edges() {
        assert!(SimConfig::new(100.0, 1, 3).is_ok());
        assert!(SimConfig::new(250_000.0, 10, 20).is_ok());
    }

    #[test]
    fn rejects_balance_below_minimum_or_non_finite() {
        assert_eq!(
            SimConfig::new(99.99, 1, 5),
            Err(ConfigError::InvalidInitialBalance(99.99))
        );
        assert!(matches!(
            SimConfig::new(f64::NAN, 1, 5),
            Err(ConfigError::InvalidInitialBalance(_))
        ));
        assert!(matches!(
            SimConfig::new(f64::INFINITY, 1, 5),
            Err(ConfigError::InvalidInitialBalance(_))
        ));
    }

    #[test]
    fn rejects_trade_size_outside_slider_range() {
        assert_eq!(SimConfig::new(1_000.0, 0, 5), Err(ConfigError::InvalidTradeSize(0)));
        assert_eq!(SimConfig::new(1_000.0, 11, 5), Err(ConfigError::InvalidTradeSize(11)));
    }

    #[test]
    fn rejects_ma_window_outside_choices() {
        assert_eq!(SimConfig::new(1_000.0, 1, 4), Err(ConfigError::InvalidMaWindow(4)));
        assert_eq!(SimConfig::new(1_000.0, 1, 0), Err(ConfigError::InvalidMaWindow(0)));
    }

    #[test]
    fn relaunch_policy_parses_known_values() {
        assert_eq!(RelaunchPolicy::parse("continue"), Some(RelaunchPolicy::Continue));
        assert_eq!(RelaunchPolicy::parse("reset"), Some(RelaunchPolicy::Reset));
        assert_eq!(RelaunchPolicy::parse("Reset"), None);
        assert_eq!(RelaunchPolicy::default(), RelaunchPolicy::Continue);
        assert_eq!(RelaunchPolicy::Reset.as_str(), "reset");
    }
}
