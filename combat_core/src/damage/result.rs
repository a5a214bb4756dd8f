//! DamageResult - The output of the damage formula

use serde::{Deserialize, Serialize};

/// Final integer damage of one roll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageResult {
    /// Damage after scaling and crit, floored
    pub final_damage: u32,
    /// Whether this roll was a critical strike
    pub is_crit: bool,
}

impl DamageResult {
    pub fn new(final_damage: u32, is_crit: bool) -> Self {
        DamageResult {
            final_damage,
            is_crit,
        }
    }

    /// Damage as a float, for HP math on the monster side
    pub fn amount(&self) -> f64 {
        self.final_damage as f64
    }

    pub fn is_zero(&self) -> bool {
        self.final_damage == 0
    }
}
