//! Passive upgrades picked up during a run

use super::StatValue;
use serde::{Deserialize, Serialize};

/// A single passive upgrade choice
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PassiveUpgrade {
    /// Flat attack bonus (0.1 = +10% damage)
    Attack(f64),
    /// Added crit chance
    CritChance(f64),
    /// Incoming damage reduction
    Defense(f64),
    /// Global cooldown reduction
    CooldownReduction(f64),
    /// Chance to fully negate a hit
    Dodge(f64),
    /// One-time revive
    Revive,
}

/// Aggregated passive modifiers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassiveStats {
    pub attack: StatValue,
    pub crit_chance: StatValue,
    pub defense: StatValue,
    pub cooldown_reduction: StatValue,
    pub dodge_chance: StatValue,
    /// Whether a revive was granted this run
    pub has_revive: bool,
}

impl PassiveStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, upgrade: PassiveUpgrade) {
        match upgrade {
            PassiveUpgrade::Attack(v) => self.attack.add_flat(v),
            PassiveUpgrade::CritChance(v) => self.crit_chance.add_flat(v),
            PassiveUpgrade::Defense(v) => self.defense.add_flat(v),
            PassiveUpgrade::CooldownReduction(v) => self.cooldown_reduction.add_flat(v),
            PassiveUpgrade::Dodge(v) => self.dodge_chance.add_flat(v),
            PassiveUpgrade::Revive => self.has_revive = true,
        }
    }

    /// Multiplier applied to outgoing damage
    pub fn attack_multiplier(&self) -> f64 {
        (1.0 + self.attack.compute()).max(0.0)
    }

    pub fn defense(&self, max: f64) -> f64 {
        self.defense.compute_clamped(0.0, max)
    }

    pub fn cooldown_reduction(&self, max: f64) -> f64 {
        self.cooldown_reduction.compute_clamped(0.0, max)
    }

    pub fn dodge_chance(&self, max: f64) -> f64 {
        self.dodge_chance.compute_clamped(0.0, max)
    }
}
