use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub action: Action,
    pub price: f64,
    pub qty: u32,
    pub notional: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LedgerError {
    InsufficientCash { required: f64, available: f64 },
    InsufficientInventory { required: u32, available: u32 },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientCash {
                required,
                available,
            } => write!(f, "buy needs {required:.2} cash, only {available:.2} available"),
            Self::InsufficientInventory {
                required,
                available,
            } => write!(f, "sell needs {required} units, only {available} held"),
        }
    }
}

impl std::error::Error for LedgerError {}

/// Simulated holdings: cash and whole units of the asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ledger {
    cash: f64,
    inventory: u32,
}

impl Ledger {
    pub fn new(cash: f64) -> Self {
        Self { cash, inventory: 0 }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn inventory(&self) -> u32 {
        self.inventory
    }

    pub fn can_buy(&self, price: f64, qty: u32) -> bool {
        self.cash >= price * f64::from(qty)
    }

    pub fn can_sell(&self, qty: u32) -> bool {
        self.inventory >= qty
    }

    pub fn buy(&mut self, price: f64, qty: u32) -> Result<Fill, LedgerError> {
        let notional = price * f64::from(qty);
        if !self.can_buy(price, qty) {
            return Err(LedgerError::InsufficientCash {
                required: notional,
                available: self.cash,
            });
        }

        self.cash -= notional;
        self.inventory += qty;

        Ok(Fill {
            action: Action::Buy,
            price,
            qty,
            notional,
        })
    }

    pub fn sell(&mut self, price: f64, qty: u32) -> Result<Fill, LedgerError> {
        if !self.can_sell(qty) {
            return Err(LedgerError::InsufficientInventory {
                required: qty,
                available: self.inventory,
            });
        }

        let notional = price * f64::from(qty);
        self.cash += notional;
        self.inventory -= qty;

        Ok(Fill {
            action: Action::Sell,
            price,
            qty,
            notional,
        })
    }

    /// Cash plus inventory marked at `price`.
    pub fn net_worth(&self, price: f64) -> f64 {
        self.cash + f64::from(self.inventory) * price
    }
}
