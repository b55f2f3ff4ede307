use serde::Serialize;

use crate::ledger::Action;

pub const LOG_HEADER: [&str; 3] = ["Time", "Action", "Price"];
/// Trades shown under the header in the dashboard table.
pub const DISPLAY_TRADES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeLogEntry {
    pub tick: u64,
    pub action: Action,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogRow {
    Header { columns: [&'static str; 3] },
    Trade(TradeLogEntry),
}

/// Executed trades, newest first, behind a fixed header row at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeLog {
    rows: Vec<LogRow>,
}

impl Default for TradeLog {
    fn default() -> Self {
        Self {
            rows: vec![LogRow::Header {
                columns: LOG_HEADER,
            }],
        }
    }
}

impl TradeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tick: u64, action: Action, price: f64) -> TradeLogEntry {
        let entry = TradeLogEntry {
            tick,
            action,
            price: round_cents(price),
        };
        self.rows.insert(1, LogRow::Trade(entry));
        entry
    }

    pub fn rows(&self) -> &[LogRow] {
        &self.rows
    }

    pub fn display_rows(&self) -> &[LogRow] {
        let end = self.rows.len().min(DISPLAY_TRADES + 1);
        &self.rows[..end]
    }

    pub fn trades(&self) -> impl Iterator<Item = &TradeLogEntry> {
        self.rows.iter().filter_map(|row| match row {
            LogRow::Trade(entry) => Some(entry),
            LogRow::Header { .. } => None,
        })
    }

    pub fn trade_count(&self) -> usize {
        self.rows.len() - 1
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
