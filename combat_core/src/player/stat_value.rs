//! StatValue - a base value plus stacked passive bonuses

use serde::{Deserialize, Serialize};

/// A passive stat built from a base and additive upgrade stacks
///
/// Bonuses are fractions: a 10% attack upgrade adds `0.10`. Negative stacks
/// are allowed (tests use them to force crits off) and are only clamped by
/// the caller through [`StatValue::compute_clamped`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub base: f64,
    /// Sum of every stacked bonus
    pub flat: f64,
    /// Number of upgrades applied
    pub stacks: u32,
}

impl StatValue {
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base,
            ..Default::default()
        }
    }

    pub fn compute(&self) -> f64 {
        self.base + self.flat
    }

    /// Final value clamped into `[min, max]`
    pub fn compute_clamped(&self, min: f64, max: f64) -> f64 {
        self.compute().clamp(min, max)
    }

    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
        self.stacks += 1;
    }
}
