//! CombatSession - the host-facing entry point
//!
//! The session owns player state, the loadout, cooldowns, the timer queue,
//! the defense entities and the feedback buffer. The host owns the monster
//! directory and the progression sink and lends them to each call.

mod report;

pub use report::TickReport;

use crate::combat::{resolve_activation, ActivationReport, CombatWorld, SkillCast};
use crate::config::{default_skills, CombatConstants};
use crate::cooldown::CooldownScheduler;
use crate::defense::DefenseEntities;
use crate::directory::{MonsterDirectory, Progression};
use crate::feedback::{FeedbackBuffer, HitFeedback};
use crate::mitigation::{dispatch_orders, resolve_incoming_hit_with_rng, IncomingHit, MitigationResult};
use crate::player::{PassiveUpgrade, PlayerState};
use crate::schedule::TimerQueue;
use crate::skill::{SkillCatalog, SkillLoadout};
use crate::types::{Millis, SkillId};
use rand::Rng;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct CombatSession {
    constants: CombatConstants,
    catalog: SkillCatalog,
    player: PlayerState,
    loadout: SkillLoadout,
    cooldowns: CooldownScheduler,
    timers: TimerQueue<SkillCast>,
    defense: DefenseEntities,
    feedback: FeedbackBuffer,
    last_tick: Option<Millis>,
    paused: bool,
}

impl CombatSession {
    pub fn new(constants: CombatConstants, catalog: SkillCatalog) -> Self {
        let player = PlayerState::from_constants(&constants.player, 1);
        let cooldowns = CooldownScheduler::new(&constants.cooldown);
        CombatSession {
            constants,
            catalog,
            player,
            loadout: SkillLoadout::new(),
            cooldowns,
            timers: TimerQueue::new(),
            defense: DefenseEntities::new(),
            feedback: FeedbackBuffer::new(),
            last_tick: None,
            paused: false,
        }
    }

    /// Session with default constants and the embedded skill catalog
    pub fn with_defaults() -> Self {
        Self::new(CombatConstants::default(), default_skills())
    }

    pub fn constants(&self) -> &CombatConstants {
        &self.constants
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Host access for position, facing and level changes
    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn loadout(&self) -> &SkillLoadout {
        &self.loadout
    }

    pub fn cooldowns(&self) -> &CooldownScheduler {
        &self.cooldowns
    }

    pub fn timers(&self) -> &TimerQueue<SkillCast> {
        &self.timers
    }

    pub fn defense(&self) -> &DefenseEntities {
        &self.defense
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_player_level(&mut self, level: u32) {
        self.player.set_level(&self.constants.player, level);
    }

    pub fn apply_passive(&mut self, upgrade: PassiveUpgrade) {
        debug!(?upgrade, "passive applied");
        self.player.passives.apply(upgrade);
    }

    // === Loadout ===

    /// Equip `skill` at `level`; false if unknown or already equipped
    pub fn equip(&mut self, skill: SkillId, level: u32) -> bool {
        let Some(definition) = self.catalog.get(skill) else {
            warn!(skill = %skill, "skill missing from catalog, cannot equip");
            return false;
        };
        if !self.loadout.equip(definition.clone(), level) {
            return false;
        }
        let level = self.loadout.level(skill).unwrap_or(0);
        self.defense.sync(skill, level);
        info!(skill = %skill, level, "skill equipped");
        true
    }

    /// Raise `skill` one level, returning the new level
    pub fn level_up(&mut self, skill: SkillId) -> Option<u32> {
        let level = self.loadout.level_up(skill)?;
        self.defense.sync(skill, level);
        debug!(skill = %skill, level, "skill levelled");
        Some(level)
    }

    /// Remove `skill`, tearing down everything it owns
    pub fn unequip(&mut self, skill: SkillId, directory: &mut dyn MonsterDirectory) -> bool {
        if self.loadout.unequip(skill).is_none() {
            return false;
        }
        let cancelled = self.timers.cancel_owner(skill);
        self.cooldowns.forget(skill);
        self.defense.teardown(skill, directory);
        if skill == SkillId::Shield {
            self.player.shield.clear();
        }
        info!(skill = %skill, cancelled, "skill unequipped");
        true
    }

    // === Pause ===

    pub fn pause_started(&mut self, now: Millis) {
        self.paused = true;
        self.cooldowns.pause_started(now);
    }

    /// Resume, shifting every pending timestamp by the pause length
    pub fn pause_ended(&mut self, now: Millis) {
        if !self.paused {
            warn!(now, "pause ended while not paused");
            return;
        }
        self.paused = false;
        let delta = self.cooldowns.pause_ended(now);
        self.timers.shift(delta);
        self.defense.shift(delta);
        self.player.hp_display.shift(delta);
        self.last_tick = self.last_tick.map(|t| t.saturating_add(delta));
    }

    // === Frame ===

    /// Advance the session to `now`
    ///
    /// Order: due timers, defense entities, shield recast, ready skills,
    /// then the HP display.
    pub fn tick(
        &mut self,
        now: Millis,
        directory: &mut dyn MonsterDirectory,
        progression: &mut dyn Progression,
        rng: &mut impl Rng,
    ) -> TickReport {
        let mut report = TickReport::default();
        if self.paused {
            debug!(now, "tick while paused ignored");
            return report;
        }
        if self.player.game_over {
            return report;
        }

        let dt = self.last_tick.map_or(0, |last| now.saturating_sub(last));
        self.last_tick = Some(now);

        report.follow_ups = self.fire_due_timers(now, directory, progression, rng);
        self.update_defense(now, dt, directory, progression, rng, &mut report);
        report.shield_recast = self.try_recast_shield(now, directory);
        report.activations = self.try_activate_skills(now, directory, progression, rng);

        self.player.hp_display.update(
            now,
            self.player.hp,
            self.constants.mitigation.hp_display_rate,
        );
        report
    }

    fn fire_due_timers(
        &mut self,
        now: Millis,
        directory: &mut dyn MonsterDirectory,
        progression: &mut dyn Progression,
        rng: &mut impl Rng,
    ) -> Vec<ActivationReport> {
        let due = self.timers.drain_due(now);
        let mut fired = Vec::with_capacity(due.len());
        for entry in due {
            let Some(skill) = self.loadout.get(entry.payload.skill) else {
                warn!(skill = %entry.payload.skill, "timer fired for a skill no longer equipped");
                continue;
            };
            let mut world = CombatWorld {
                directory: &mut *directory,
                progression: &mut *progression,
                timers: &mut self.timers,
                feedback: &mut self.feedback,
            };
            fired.push(resolve_activation(
                &entry.payload,
                &skill.definition,
                &self.player,
                &self.constants,
                now,
                &mut world,
                rng,
            ));
        }
        fired
    }

    fn update_defense(
        &mut self,
        now: Millis,
        dt: Millis,
        directory: &mut dyn MonsterDirectory,
        progression: &mut dyn Progression,
        rng: &mut impl Rng,
        report: &mut TickReport,
    ) {
        // Entities torn down by an encounter reset come back while equipped
        for skill in [SkillId::Blades, SkillId::ZeroTrust, SkillId::Phantom] {
            if let Some(level) = self.loadout.level(skill) {
                if !self.defense.is_active(skill) {
                    self.defense.sync(skill, level);
                }
            }
        }

        let reduction = self
            .player
            .passives
            .cooldown_reduction(self.constants.cooldown.max_reduction);
        let mut world = CombatWorld {
            directory,
            progression,
            timers: &mut self.timers,
            feedback: &mut self.feedback,
        };

        if let (Some(ring), Some(skill)) = (self.defense.blades.as_mut(), self.loadout.get(SkillId::Blades)) {
            let mut shield = std::mem::take(&mut self.player.shield);
            let fire_every = self.cooldowns.effective_cooldown(skill, reduction);
            if self.cooldowns.is_ready(SkillId::Blades, fire_every, now) {
                report.blades = ring.fire(
                    now,
                    &self.player,
                    &mut shield,
                    &skill.definition,
                    &self.constants,
                    &mut world,
                    rng,
                );
                self.cooldowns.mark_activated(SkillId::Blades, now);
            }
            let detached = ring.update_detached(
                now,
                dt,
                &self.player,
                &mut shield,
                &skill.definition,
                &self.constants,
                &mut world,
                rng,
            );
            report.blades.hits += detached.hits;
            report.blades.crits += detached.crits;
            report.blades.damage += detached.damage;
            report.blades.exp += detached.exp;
            report.blades.kills += detached.kills;
            report.blades.shield_delta += detached.shield_delta;
            self.player.shield = shield;
        }

        if let (Some(ring), Some(skill)) = (self.defense.lock_on.as_mut(), self.loadout.get(SkillId::ZeroTrust)) {
            report.lock_on = ring.update(
                now,
                &self.player,
                &skill.definition,
                &self.constants,
                &mut world,
                &mut self.cooldowns,
                rng,
            );
        }

        if let Some(coordinator) = self.defense.phantoms.as_mut() {
            report.phantoms = coordinator.update(
                now,
                dt,
                &self.player,
                &self.loadout,
                &self.constants,
                &mut world,
                rng,
            );
        }
    }

    /// Re-cast the shield when its cooldown is up, detaching the blades
    fn try_recast_shield(&mut self, now: Millis, directory: &mut dyn MonsterDirectory) -> bool {
        let Some(skill) = self.loadout.get(SkillId::Shield) else {
            return false;
        };
        let reduction = self
            .player
            .passives
            .cooldown_reduction(self.constants.cooldown.max_reduction);
        let cooldown = self.cooldowns.effective_cooldown(skill, reduction);
        if !self.cooldowns.is_ready(SkillId::Shield, cooldown, now) {
            return false;
        }

        let level = skill.level();
        self.player.shield.recast(
            skill.definition.shield_at(level),
            skill.definition.reflect_at(level),
            skill.is_max_level(),
        );
        self.cooldowns.mark_activated(SkillId::Shield, now);

        if let Some(ring) = self.defense.blades.as_mut() {
            ring.detach(now, self.player.position, &directory.entities(), &self.constants.blades);
        }
        debug!(level, max = self.player.shield.max, "shield recast");
        true
    }

    /// Resolve every attack skill that is off cooldown
    ///
    /// A skill only goes on cooldown when its activation hit something.
    pub fn try_activate_skills(
        &mut self,
        now: Millis,
        directory: &mut dyn MonsterDirectory,
        progression: &mut dyn Progression,
        rng: &mut impl Rng,
    ) -> Vec<ActivationReport> {
        if self.paused || self.player.game_over {
            return Vec::new();
        }
        let reduction = self
            .player
            .passives
            .cooldown_reduction(self.constants.cooldown.max_reduction);
        let ready = self.cooldowns.ready_skills(&self.loadout, reduction, now);

        let mut activations = Vec::new();
        for id in ready {
            let Some(skill) = self.loadout.get(id) else {
                continue;
            };
            let cast = SkillCast::primary(id, skill.level(), self.player.position, self.player.facing);
            let mut world = CombatWorld {
                directory: &mut *directory,
                progression: &mut *progression,
                timers: &mut self.timers,
                feedback: &mut self.feedback,
            };
            let outcome = resolve_activation(
                &cast,
                &skill.definition,
                &self.player,
                &self.constants,
                now,
                &mut world,
                rng,
            );
            if outcome.hit_anything() {
                self.cooldowns.mark_activated(id, now);
                activations.push(outcome);
            }
        }
        activations
    }

    // === Incoming damage ===

    /// Run a hit through the mitigation pipeline and dispatch its orders
    pub fn receive_hit(
        &mut self,
        hit: IncomingHit,
        directory: &mut dyn MonsterDirectory,
        progression: &mut dyn Progression,
        rng: &mut impl Rng,
    ) -> MitigationResult {
        let (player, result) = resolve_incoming_hit_with_rng(&self.player, &hit, &self.constants, rng);
        self.player = player;
        dispatch_orders(
            &result,
            self.player.position,
            &self.constants,
            directory,
            progression,
        );
        if result.game_over && !result.ignored {
            self.on_game_over(directory);
        }
        result
    }

    fn on_game_over(&mut self, directory: &mut dyn MonsterDirectory) {
        info!("run over, tearing down combat state");
        self.teardown(directory);
    }

    // === Output ===

    pub fn drain_feedback(&mut self) -> Vec<HitFeedback> {
        self.feedback.drain()
    }

    /// End the encounter: defense entities, timers and feedback are cleared
    ///
    /// The loadout survives; autonomous entities come back on the next tick.
    pub fn teardown(&mut self, directory: &mut dyn MonsterDirectory) {
        self.defense.teardown_all(directory);
        self.timers.clear();
        self.feedback.clear();
        self.last_tick = None;
        debug!("session torn down");
    }
}

impl Default for CombatSession {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ArenaDirectory, ExpLedger};
    use crate::geometry::Point;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session() -> CombatSession {
        let mut session = CombatSession::new(CombatConstants::default(), SkillCatalog::builtin());
        session.apply_passive(PassiveUpgrade::CritChance(-1.0));
        session
    }

    #[test]
    fn test_equip_unknown_and_duplicate() {
        let mut s = CombatSession::new(CombatConstants::default(), SkillCatalog::new());
        assert!(!s.equip(SkillId::Nova, 1));

        let mut s = session();
        assert!(s.equip(SkillId::Nova, 1));
        assert!(!s.equip(SkillId::Nova, 2));
    }

    #[test]
    fn test_equip_autonomous_creates_entity() {
        let mut s = session();
        s.equip(SkillId::ZeroTrust, 3);
        assert!(s.defense().is_active(SkillId::ZeroTrust));
        assert_eq!(s.level_up(SkillId::ZeroTrust), Some(4));
        assert_eq!(s.defense().lock_on.as_ref().unwrap().level(), 4);
    }

    #[test]
    fn test_skill_fires_only_with_targets() {
        let mut s = session();
        let mut arena = ArenaDirectory::new();
        let mut ledger = ExpLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        s.equip(SkillId::Nova, 1);

        let report = s.tick(2000, &mut arena, &mut ledger, &mut rng);
        assert!(report.activations.is_empty());

        arena.spawn(Point::new(50.0, 0.0), 5.0, 10.0, 3);
        let report = s.tick(2016, &mut arena, &mut ledger, &mut rng);
        assert_eq!(report.activations.len(), 1);
        assert_eq!(ledger.total, 3);
        assert_eq!(s.cooldowns().last_activation(SkillId::Nova), 2016);
        assert_eq!(s.drain_feedback().len(), 1);
    }

    #[test]
    fn test_cooldown_blocks_second_activation() {
        let mut s = session();
        let mut arena = ArenaDirectory::new();
        let mut ledger = ExpLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        s.equip(SkillId::Nova, 1);
        arena.spawn(Point::new(50.0, 0.0), 5.0, 100_000.0, 3);

        assert_eq!(s.tick(2000, &mut arena, &mut ledger, &mut rng).activations.len(), 1);
        assert!(s.tick(2500, &mut arena, &mut ledger, &mut rng).activations.is_empty());
        assert_eq!(s.tick(3500, &mut arena, &mut ledger, &mut rng).activations.len(), 1);
    }

    #[test]
    fn test_pause_shifts_cooldowns_and_timers() {
        let mut s = session();
        let mut arena = ArenaDirectory::new();
        let mut ledger = ExpLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        s.equip(SkillId::Wave, 10);
        arena.spawn(Point::new(30.0, 0.0), 5.0, 100_000.0, 3);

        s.tick(5000, &mut arena, &mut ledger, &mut rng);
        assert_eq!(s.timers().next_fire_at(), Some(5250));

        s.pause_started(5100);
        assert!(s.tick(6000, &mut arena, &mut ledger, &mut rng).follow_ups.is_empty());
        s.pause_ended(9100);

        assert_eq!(s.timers().next_fire_at(), Some(9250));
        assert_eq!(s.cooldowns().last_activation(SkillId::Wave), 9000);
        let report = s.tick(9250, &mut arena, &mut ledger, &mut rng);
        assert_eq!(report.follow_ups.len(), 1);
    }

    #[test]
    fn test_pause_extends_hp_display_hold() {
        let mut s = session();
        let mut arena = ArenaDirectory::new();
        let mut ledger = ExpLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        let max_hp = s.player().max_hp;

        s.tick(1000, &mut arena, &mut ledger, &mut rng);
        s.receive_hit(IncomingHit::new(50.0, 1000), &mut arena, &mut ledger, &mut rng);
        assert!(s.player().hp < max_hp);

        s.pause_started(1100);
        s.pause_ended(11_100);

        // Hold ran 1000..1500 before the pause, 11_000..11_500 after
        s.tick(11_200, &mut arena, &mut ledger, &mut rng);
        assert!((s.player().hp_display.displayed() - max_hp).abs() < f64::EPSILON);
        s.tick(11_500, &mut arena, &mut ledger, &mut rng);
        assert!(s.player().hp_display.displayed() < max_hp);
    }

    #[test]
    fn test_unequip_cancels_timers_and_entities() {
        let mut s = session();
        let mut arena = ArenaDirectory::new();
        let mut ledger = ExpLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        s.equip(SkillId::Wave, 10);
        s.equip(SkillId::ZeroTrust, 1);
        arena.spawn(Point::new(30.0, 0.0), 5.0, 100_000.0, 3);

        s.tick(5000, &mut arena, &mut ledger, &mut rng);
        assert!(arena.slow_zone().is_some());
        assert_eq!(s.timers().pending_for(SkillId::Wave), 2);

        assert!(s.unequip(SkillId::Wave, &mut arena));
        assert!(s.unequip(SkillId::ZeroTrust, &mut arena));
        assert!(s.timers().is_empty());
        assert!(arena.slow_zone().is_none());
        assert!(!s.unequip(SkillId::Wave, &mut arena));
    }

    #[test]
    fn test_shield_recast_and_absorb() {
        let mut s = session();
        let mut arena = ArenaDirectory::new();
        let mut ledger = ExpLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        s.equip(SkillId::Shield, 0);

        let report = s.tick(8000, &mut arena, &mut ledger, &mut rng);
        assert!(report.shield_recast);
        assert!((s.player().shield.current - 60.0).abs() < f64::EPSILON);

        let result = s.receive_hit(IncomingHit::new(50.0, 8100), &mut arena, &mut ledger, &mut rng);
        assert!((result.absorbed - 50.0).abs() < f64::EPSILON);
        assert!((s.player().hp - s.player().max_hp).abs() < f64::EPSILON);
    }

    #[test]
    fn test_reflect_damages_attacker() {
        let mut s = session();
        let mut arena = ArenaDirectory::new();
        let mut ledger = ExpLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        s.equip(SkillId::Shield, 10);
        s.tick(8000, &mut arena, &mut ledger, &mut rng);

        let attacker = arena.spawn(Point::new(20.0, 0.0), 5.0, 100.0, 3);
        let hit = IncomingHit::from_attackers(10.0, 8100, vec![attacker]);
        s.receive_hit(hit, &mut arena, &mut ledger, &mut rng);
        // 2 reflect per level
        assert!((arena.get(attacker).unwrap().hp - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_game_over_tears_down_and_stops() {
        let mut s = session();
        let mut arena = ArenaDirectory::new();
        let mut ledger = ExpLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        s.equip(SkillId::Phantom, 1);
        s.equip(SkillId::Nova, 1);
        s.tick(100, &mut arena, &mut ledger, &mut rng);
        assert!(s.defense().is_active(SkillId::Phantom));

        let result = s.receive_hit(IncomingHit::new(10_000.0, 200), &mut arena, &mut ledger, &mut rng);
        assert!(result.game_over);
        assert!(!s.defense().is_active(SkillId::Phantom));

        arena.spawn(Point::new(10.0, 0.0), 5.0, 10.0, 1);
        let report = s.tick(5000, &mut arena, &mut ledger, &mut rng);
        assert!(report.activations.is_empty());
        let ignored = s.receive_hit(IncomingHit::new(5.0, 5000), &mut arena, &mut ledger, &mut rng);
        assert!(ignored.ignored);
    }

    #[test]
    fn test_revive_shadow_clears_nearby() {
        let mut s = session();
        let mut arena = ArenaDirectory::new();
        let mut ledger = ExpLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        s.apply_passive(PassiveUpgrade::Revive);
        let near = arena.spawn(Point::new(100.0, 0.0), 5.0, 100.0, 9);
        let far = arena.spawn(Point::new(2000.0, 0.0), 5.0, 100.0, 9);

        let hit = IncomingHit::from_attackers(10_000.0, 0, vec![near]);
        let result = s.receive_hit(hit, &mut arena, &mut ledger, &mut rng);
        assert!(result.revived);
        assert!(arena.get(near).is_none());
        assert!(arena.get(far).is_some());
        assert_eq!(ledger.total, 0);
    }

    #[test]
    fn test_teardown_then_entities_return() {
        let mut s = session();
        let mut arena = ArenaDirectory::new();
        let mut ledger = ExpLedger::new();
        let mut rng = StdRng::seed_from_u64(1);
        s.equip(SkillId::Blades, 1);
        s.teardown(&mut arena);
        assert!(!s.defense().is_active(SkillId::Blades));

        s.tick(100, &mut arena, &mut ledger, &mut rng);
        assert!(s.defense().is_active(SkillId::Blades));
    }
}
