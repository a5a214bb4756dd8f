//! CooldownScheduler - readiness of equipped skills

use crate::config::CooldownConstants;
use crate::skill::{PlayerSkill, SkillLoadout};
use crate::types::{Millis, SkillId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Hook for subsystems that may refresh a skill's cooldown
pub trait CooldownReset {
    /// Make `id` ready on the next readiness check
    fn reset_cooldown(&mut self, id: SkillId);
}

/// Tracks the last activation timestamp of each skill
///
/// A skill with no recorded activation is treated as activated at t = 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CooldownScheduler {
    last_activation: HashMap<SkillId, Millis>,
    /// Skills refreshed through `reset`, ready regardless of the clock
    refreshed: HashSet<SkillId>,
    paused_at: Option<Millis>,
    max_reduction: f64,
}

impl CooldownScheduler {
    pub fn new(constants: &CooldownConstants) -> Self {
        CooldownScheduler {
            max_reduction: constants.max_reduction.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Cooldown of `skill` after its level scaling and global reduction
    pub fn effective_cooldown(&self, skill: &PlayerSkill, reduction: f64) -> Millis {
        let base = skill.definition.base_cooldown_at(skill.level());
        let reduction = reduction.clamp(0.0, self.max_reduction);
        (base as f64 * (1.0 - reduction)).round() as Millis
    }

    pub fn last_activation(&self, id: SkillId) -> Millis {
        self.last_activation.get(&id).copied().unwrap_or(0)
    }

    /// Whether `id` with effective cooldown `cooldown` may fire at `now`
    pub fn is_ready(&self, id: SkillId, cooldown: Millis, now: Millis) -> bool {
        if self.refreshed.contains(&id) {
            return true;
        }
        now.saturating_sub(self.last_activation(id)) >= cooldown
    }

    /// Time left until `id` becomes ready, 0 when ready
    pub fn remaining(&self, id: SkillId, cooldown: Millis, now: Millis) -> Millis {
        if self.refreshed.contains(&id) {
            return 0;
        }
        let elapsed = now.saturating_sub(self.last_activation(id));
        cooldown.saturating_sub(elapsed)
    }

    /// Attack skills of `loadout` that are ready at `now`, in loadout order
    pub fn ready_skills(&self, loadout: &SkillLoadout, reduction: f64, now: Millis) -> Vec<SkillId> {
        loadout
            .iter()
            .filter(|skill| skill.id().is_attack())
            .filter(|skill| self.is_ready(skill.id(), self.effective_cooldown(skill, reduction), now))
            .map(|skill| skill.id())
            .collect()
    }

    pub fn mark_activated(&mut self, id: SkillId, now: Millis) {
        self.refreshed.remove(&id);
        self.last_activation.insert(id, now);
    }

    /// Push every recorded activation forward by `delta`
    ///
    /// The shifted map is built in full before it replaces the old one.
    pub fn shift_all(&mut self, delta: Millis) {
        if delta == 0 {
            return;
        }
        let shifted: HashMap<SkillId, Millis> = self
            .last_activation
            .iter()
            .map(|(id, at)| (*id, at.saturating_add(delta)))
            .collect();
        self.last_activation = shifted;
    }

    /// Clear the cooldown of `id` so it is ready immediately
    pub fn reset(&mut self, id: SkillId) {
        self.last_activation.remove(&id);
        self.refreshed.insert(id);
    }

    /// Forget a skill entirely (unequip)
    pub fn forget(&mut self, id: SkillId) {
        self.last_activation.remove(&id);
        self.refreshed.remove(&id);
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Record the start of an external pause; nested starts keep the first
    pub fn pause_started(&mut self, now: Millis) {
        if self.paused_at.is_none() {
            debug!(now, "cooldowns paused");
            self.paused_at = Some(now);
        }
    }

    /// End a pause, returning how long it lasted
    pub fn pause_ended(&mut self, now: Millis) -> Millis {
        match self.paused_at.take() {
            Some(started) => {
                let delta = now.saturating_sub(started);
                self.shift_all(delta);
                debug!(delta, "cooldowns resumed");
                delta
            }
            None => {
                warn!(now, "pause ended without a matching start");
                0
            }
        }
    }

    pub fn clear(&mut self) {
        self.last_activation.clear();
        self.refreshed.clear();
        self.paused_at = None;
    }
}

impl CooldownReset for CooldownScheduler {
    fn reset_cooldown(&mut self, id: SkillId) {
        self.reset(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::SkillDefinition;
    use proptest::prelude::*;

    fn scheduler() -> CooldownScheduler {
        CooldownScheduler::new(&CooldownConstants::default())
    }

    fn skill(id: SkillId, cooldown: Millis, level: u32) -> PlayerSkill {
        PlayerSkill::new(SkillDefinition::new(id, "test", cooldown), level)
    }

    #[test]
    fn test_absent_entry_counts_from_zero() {
        let cd = scheduler();
        assert!(!cd.is_ready(SkillId::Nova, 1500, 1000));
        assert!(cd.is_ready(SkillId::Nova, 1500, 1500));
    }

    #[test]
    fn test_ready_after_cooldown() {
        let mut cd = scheduler();
        cd.mark_activated(SkillId::Slash, 10_000);
        assert!(!cd.is_ready(SkillId::Slash, 800, 10_799));
        assert!(cd.is_ready(SkillId::Slash, 800, 10_800));
        assert_eq!(cd.remaining(SkillId::Slash, 800, 10_300), 500);
        assert_eq!(cd.remaining(SkillId::Slash, 800, 20_000), 0);
    }

    #[test]
    fn test_effective_cooldown_reduction_capped() {
        let cd = scheduler();
        let nova = skill(SkillId::Nova, 1000, 1);
        assert_eq!(cd.effective_cooldown(&nova, 0.25), 750);
        // Capped at 0.6
        assert_eq!(cd.effective_cooldown(&nova, 0.9), 400);
        assert_eq!(cd.effective_cooldown(&nova, -1.0), 1000);
    }

    #[test]
    fn test_effective_cooldown_uses_level_step() {
        let cd = scheduler();
        let mut def = SkillDefinition::new(SkillId::Slash, "Slash", 800);
        def.cooldown_step_per_level_ms = 20;
        def.min_cooldown_ms = 300;
        let slash = PlayerSkill::new(def, 10);
        assert_eq!(cd.effective_cooldown(&slash, 0.0), 600);
        assert_eq!(cd.effective_cooldown(&slash, 0.5), 300);
    }

    #[test]
    fn test_pause_shifts_cooldowns() {
        let mut cd = scheduler();
        cd.mark_activated(SkillId::Beam, 5_000);
        cd.pause_started(5_500);
        assert!(cd.is_paused());
        let delta = cd.pause_ended(9_500);
        assert_eq!(delta, 4_000);
        assert_eq!(cd.last_activation(SkillId::Beam), 9_000);
        // 500 ms of the 1200 ms cooldown had elapsed before the pause
        assert_eq!(cd.remaining(SkillId::Beam, 1200, 9_500), 700);
    }

    #[test]
    fn test_unmatched_pause_end_is_noop() {
        let mut cd = scheduler();
        cd.mark_activated(SkillId::Beam, 5_000);
        assert_eq!(cd.pause_ended(9_000), 0);
        assert_eq!(cd.last_activation(SkillId::Beam), 5_000);
    }

    #[test]
    fn test_reset_makes_ready() {
        let mut cd = scheduler();
        cd.mark_activated(SkillId::Nova, 100);
        cd.reset_cooldown(SkillId::Nova);
        assert!(cd.is_ready(SkillId::Nova, 1500, 200));

        cd.mark_activated(SkillId::Nova, 200);
        assert!(!cd.is_ready(SkillId::Nova, 1500, 300));
    }

    #[test]
    fn test_ready_skills_filters_attacks() {
        let mut loadout = SkillLoadout::new();
        loadout.equip(SkillDefinition::new(SkillId::Slash, "Slash", 800), 1);
        loadout.equip(SkillDefinition::new(SkillId::Nova, "Nova", 1500), 1);
        loadout.equip(SkillDefinition::new(SkillId::Shield, "Shield", 100), 1);

        let mut cd = scheduler();
        cd.mark_activated(SkillId::Nova, 1000);
        let ready = cd.ready_skills(&loadout, 0.0, 2000);
        assert_eq!(ready, vec![SkillId::Slash]);
    }

    proptest! {
        #[test]
        fn prop_shift_commutes_with_readiness(
            activated in 0u64..1_000_000,
            cooldown in 0u64..10_000,
            elapsed in 0u64..20_000,
            delta in 0u64..1_000_000,
        ) {
            let mut cd = scheduler();
            cd.mark_activated(SkillId::Slash, activated);
            let now = activated + elapsed;
            let before = cd.is_ready(SkillId::Slash, cooldown, now);

            cd.shift_all(delta);
            let after = cd.is_ready(SkillId::Slash, cooldown, now + delta);
            prop_assert_eq!(before, after);
        }
    }
}
