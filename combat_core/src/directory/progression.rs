//! Progression - experience sink

use serde::{Deserialize, Serialize};

/// Receives experience earned by kills
pub trait Progression {
    fn add_exp(&mut self, amount: u64);
}

/// Running experience total
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpLedger {
    pub total: u64,
    /// Number of non-zero grants
    pub grants: u32,
}

impl ExpLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progression for ExpLedger {
    fn add_exp(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.total += amount;
        self.grants += 1;
    }
}
