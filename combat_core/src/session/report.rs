//! TickReport - everything that happened during one session tick

use crate::combat::ActivationReport;
use crate::defense::{BladeVolley, LockOnReport, PhantomReport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    /// Delayed follow-ups that fired this tick
    pub follow_ups: Vec<ActivationReport>,
    /// Skills that came off cooldown and hit something
    pub activations: Vec<ActivationReport>,
    pub blades: BladeVolley,
    pub lock_on: LockOnReport,
    pub phantoms: PhantomReport,
    pub shield_recast: bool,
}

impl TickReport {
    /// Experience earned by everything the player controls this tick
    pub fn total_exp(&self) -> u64 {
        let casts: u64 = self
            .follow_ups
            .iter()
            .chain(&self.activations)
            .chain(&self.phantoms.casts)
            .map(|r| r.exp)
            .sum();
        casts + self.blades.exp + self.lock_on.exp
    }

    pub fn total_kills(&self) -> u32 {
        let casts: u32 = self
            .follow_ups
            .iter()
            .chain(&self.activations)
            .chain(&self.phantoms.casts)
            .map(|r| r.kills)
            .sum();
        casts + self.blades.kills + self.lock_on.kills
    }

    /// Damage dealt across all sources
    pub fn total_damage(&self) -> u64 {
        let casts: u64 = self
            .follow_ups
            .iter()
            .chain(&self.activations)
            .chain(&self.phantoms.casts)
            .map(|r| r.total_damage())
            .sum();
        casts + self.blades.damage + self.lock_on.damage
    }
}
