//! Headless run of a combat session against a walking hostile field

use crate::config::{PauseWindow, ScenarioConfig};
use combat_core::directory::Progression;
use combat_core::{
    ArenaDirectory, CombatSession, EntityId, ExpLedger, IncomingHit, Millis, SkillId,
    TickReport,
};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Per-skill totals over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillTotals {
    pub activations: u32,
    pub follow_ups: u32,
    pub damage: u64,
    pub kills: u32,
}

/// Outcome of a simulated run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Game time covered, pauses excluded
    pub elapsed_ms: Millis,
    pub ticks: u32,
    pub pauses: u32,
    pub spawned: u32,
    pub kills: u32,
    pub burn_kills: u32,
    pub defeated_without_reward: u32,
    pub exp: u64,
    pub player_level: u32,

    pub skills: BTreeMap<SkillId, SkillTotals>,
    pub blade_hits: u32,
    pub blade_crits: u32,
    pub blade_damage: u64,
    pub lock_on_beams: u32,
    pub lock_on_damage: u64,
    pub cooldown_resets: u32,
    pub phantom_casts: u32,
    pub taunts: u32,
    pub shield_recasts: u32,

    pub hits_taken: u32,
    pub dodges: u32,
    pub damage_to_hp: f64,
    pub damage_absorbed: f64,
    pub revived: bool,
    pub game_over_at: Option<Millis>,
    pub final_hp: f64,
    pub feedback_events: u32,
}

impl RunSummary {
    /// Total damage from every player-owned source
    pub fn total_damage(&self) -> u64 {
        let casts: u64 = self.skills.values().map(|s| s.damage).sum();
        casts + self.blade_damage + self.lock_on_damage
    }

    /// Average damage per second of game time
    pub fn dps(&self) -> f64 {
        if self.elapsed_ms > 0 {
            self.total_damage() as f64 / (self.elapsed_ms as f64 / 1000.0)
        } else {
            0.0
        }
    }

    /// Human-readable multi-line report
    pub fn summary(&self) -> String {
        let mut lines = vec![format!(
            "{:.1}s, {} ticks, {} pauses: {} spawned, {} killed, {} exp (level {})",
            self.elapsed_ms as f64 / 1000.0,
            self.ticks,
            self.pauses,
            self.spawned,
            self.kills,
            self.exp,
            self.player_level
        )];
        for (skill, totals) in &self.skills {
            lines.push(format!(
                "  {}: {} casts, {} follow-ups, {} damage",
                skill, totals.activations, totals.follow_ups, totals.damage
            ));
        }
        if self.blade_hits > 0 {
            lines.push(format!(
                "  blades: {} hits ({} crit), {} damage",
                self.blade_hits, self.blade_crits, self.blade_damage
            ));
        }
        if self.lock_on_beams > 0 {
            lines.push(format!(
                "  zero trust: {} beams, {} damage, {} cooldown resets",
                self.lock_on_beams, self.lock_on_damage, self.cooldown_resets
            ));
        }
        if self.phantom_casts > 0 || self.taunts > 0 {
            lines.push(format!(
                "  phantoms: {} casts, {} taunts",
                self.phantom_casts, self.taunts
            ));
        }
        lines.push(format!(
            "  taken: {} hits, {} dodged, {:.0} absorbed, {:.0} to HP",
            self.hits_taken, self.dodges, self.damage_absorbed, self.damage_to_hp
        ));
        lines.push(format!("  {:.1} dps", self.dps()));
        match self.game_over_at {
            Some(at) => lines.push(format!("  GAME OVER at {:.1}s", at as f64 / 1000.0)),
            None => lines.push(format!("  survived with {:.0} HP", self.final_hp)),
        }
        lines.join("\n")
    }

    fn skill(&mut self, id: SkillId) -> &mut SkillTotals {
        self.skills.entry(id).or_default()
    }

    fn record_tick(&mut self, tick: &TickReport) {
        for activation in &tick.activations {
            let totals = self.skill(activation.skill);
            totals.activations += 1;
            totals.damage += activation.total_damage();
            totals.kills += activation.kills;
        }
        for follow_up in &tick.follow_ups {
            let totals = self.skill(follow_up.skill);
            totals.follow_ups += 1;
            totals.damage += follow_up.total_damage();
            totals.kills += follow_up.kills;
        }
        for cast in &tick.phantoms.casts {
            self.skill(SkillId::Phantom).damage += cast.total_damage();
            self.skill(SkillId::Phantom).kills += cast.kills;
        }
        self.phantom_casts += tick.phantoms.casts.len() as u32;
        self.taunts += tick.phantoms.taunts_started;
        self.blade_hits += tick.blades.hits;
        self.blade_crits += tick.blades.crits;
        self.blade_damage += tick.blades.damage;
        self.lock_on_beams += tick.lock_on.beams;
        self.lock_on_damage += tick.lock_on.damage;
        self.cooldown_resets += tick.lock_on.cooldown_resets;
        if tick.shield_recast {
            self.shield_recasts += 1;
        }
    }
}

/// Drives a session with a fixed-step clock
pub struct Simulation {
    config: ScenarioConfig,
    session: CombatSession,
    arena: ArenaDirectory,
    ledger: ExpLedger,
    last_contact: HashMap<EntityId, Millis>,
    pauses: Vec<PauseWindow>,
    /// Round-robin cursor into the loadout for level-up rewards
    next_level_skill: usize,
}

impl Simulation {
    /// Build a simulation, equipping the scenario loadout on `session`
    pub fn new(config: ScenarioConfig, mut session: CombatSession) -> Self {
        session.set_player_level(config.player_level);
        for upgrade in &config.passives {
            session.apply_passive(*upgrade);
        }
        for entry in &config.loadout {
            session.equip(entry.skill, entry.level);
        }
        let pauses = config.sorted_pauses();
        Simulation {
            config,
            session,
            arena: ArenaDirectory::new(),
            ledger: ExpLedger::new(),
            last_contact: HashMap::new(),
            pauses,
            next_level_skill: 0,
        }
    }

    pub fn session(&self) -> &CombatSession {
        &self.session
    }

    pub fn arena(&self) -> &ArenaDirectory {
        &self.arena
    }

    /// Run the scenario to completion or game over
    pub fn run(&mut self, rng: &mut impl Rng) -> RunSummary {
        let mut summary = RunSummary::default();
        let step = self.config.step_ms;
        // Session clock: game time plus time spent paused
        let mut clock: Millis = 0;
        let mut elapsed: Millis = 0;
        let mut next_spawn: Millis = 0;
        let mut pauses = std::mem::take(&mut self.pauses).into_iter().peekable();

        info!(duration_ms = self.config.duration_ms, "run started");

        while elapsed < self.config.duration_ms {
            if let Some(pause) = pauses.next_if(|p| p.at_ms <= elapsed) {
                self.session.pause_started(clock);
                clock += pause.length_ms;
                self.session.pause_ended(clock);
                summary.pauses += 1;
                debug!(at = elapsed, length = pause.length_ms, "pause injected");
            }

            if elapsed >= next_spawn {
                if self.spawn_hostile(summary.spawned, rng) {
                    summary.spawned += 1;
                }
                next_spawn += self.config.spawn_interval_ms;
            }

            let player_position = self.session.player().position;
            let burns = self.arena.advance(step, player_position);
            summary.burn_kills += burns.kill_count;
            self.ledger.add_exp(burns.total_exp);

            self.face_nearest();
            let tick = self
                .session
                .tick(clock, &mut self.arena, &mut self.ledger, rng);
            summary.record_tick(&tick);
            summary.ticks += 1;

            self.apply_contact_hits(clock, &mut summary, rng);
            summary.feedback_events += self.session.drain_feedback().len() as u32;
            self.apply_level_ups();

            if let Some(at) = summary.game_over_at {
                debug!(at, "run ended early");
                break;
            }

            clock += step;
            elapsed += step;
        }

        summary.elapsed_ms = elapsed;
        summary.kills = self.arena.stats.kills;
        summary.defeated_without_reward = self.arena.stats.defeated_without_reward;
        summary.exp = self.ledger.total;
        summary.player_level = self.session.player().level;
        summary.final_hp = self.session.player().hp;
        info!(kills = summary.kills, exp = summary.exp, "run finished");
        summary
    }

    fn spawn_hostile(&mut self, index: u32, rng: &mut impl Rng) -> bool {
        if self.arena.len() >= self.config.max_hostiles {
            return false;
        }
        let angle = rng.gen_range(0.0..std::f64::consts::TAU);
        let position = self
            .session
            .player()
            .position
            .offset(angle, self.config.spawn_distance);
        let hp = self.config.hostile_hp + self.config.hostile_hp_growth * index as f64;
        self.arena.spawn_moving(
            position,
            self.config.hostile_radius,
            hp,
            self.config.hostile_exp,
            self.config.hostile_speed,
        );
        true
    }

    /// Turn the player toward the closest hostile
    fn face_nearest(&mut self) {
        let position = self.session.player().position;
        let nearest = self
            .arena
            .hostiles()
            .iter()
            .map(|h| h.position)
            .min_by(|a, b| position.distance(*a).total_cmp(&position.distance(*b)));
        if let Some(target) = nearest {
            self.session.player_mut().facing = position.angle_to(target);
        }
    }

    fn apply_contact_hits(&mut self, now: Millis, summary: &mut RunSummary, rng: &mut impl Rng) {
        let position = self.session.player().position;
        let touching = self.arena.touching(position, self.config.player_radius);
        self.last_contact.retain(|id, _| self.arena.get(*id).is_some());

        for id in touching {
            if let Some(last) = self.last_contact.get(&id) {
                if now.saturating_sub(*last) < self.config.contact_interval_ms {
                    continue;
                }
            }
            self.last_contact.insert(id, now);

            let hit = IncomingHit::from_attackers(self.config.contact_damage, now, vec![id]);
            let result = self
                .session
                .receive_hit(hit, &mut self.arena, &mut self.ledger, rng);
            summary.hits_taken += 1;
            if result.dodged {
                summary.dodges += 1;
            }
            summary.damage_absorbed += result.absorbed;
            summary.damage_to_hp += result.remaining;
            summary.revived |= result.revived;
            if result.game_over {
                summary.game_over_at = Some(now);
                break;
            }
        }
    }

    fn apply_level_ups(&mut self) {
        let target = 1 + (self.ledger.total / self.config.exp_per_level) as u32;
        let target = target.max(self.config.player_level);
        while self.session.player().level < target {
            let level = self.session.player().level + 1;
            self.session.set_player_level(level);
            if !self.config.loadout.is_empty() {
                let entry = self.config.loadout[self.next_level_skill % self.config.loadout.len()];
                self.next_level_skill += 1;
                self.session.level_up(entry.skill);
            }
            debug!(level, "player levelled up");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadoutEntry;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quiet_config() -> ScenarioConfig {
        ScenarioConfig {
            duration_ms: 4000,
            loadout: vec![LoadoutEntry { skill: SkillId::Nova, level: 1 }],
            passives: Vec::new(),
            pauses: Vec::new(),
            ..ScenarioConfig::default()
        }
    }

    #[test]
    fn test_run_covers_duration() {
        let mut sim = Simulation::new(quiet_config(), CombatSession::with_defaults());
        let mut rng = StdRng::seed_from_u64(3);
        let summary = sim.run(&mut rng);
        assert!(summary.elapsed_ms >= 4000);
        assert_eq!(summary.ticks, 250);
        assert!(summary.spawned > 0);
    }

    #[test]
    fn test_pause_counted_and_excluded_from_elapsed() {
        let config = ScenarioConfig {
            pauses: vec![PauseWindow { at_ms: 1000, length_ms: 3000 }],
            ..quiet_config()
        };
        let mut sim = Simulation::new(config, CombatSession::with_defaults());
        let mut rng = StdRng::seed_from_u64(3);
        let summary = sim.run(&mut rng);
        assert_eq!(summary.pauses, 1);
        assert_eq!(summary.ticks, 250);
    }

    #[test]
    fn test_summary_text() {
        let mut summary = RunSummary {
            elapsed_ms: 2000,
            final_hp: 150.0,
            ..RunSummary::default()
        };
        summary.skill(SkillId::Nova).damage = 100;
        assert!((summary.dps() - 50.0).abs() < f64::EPSILON);
        let text = summary.summary();
        assert!(text.contains("survived with 150 HP"));
        assert!(text.contains("nova"));
    }
}
