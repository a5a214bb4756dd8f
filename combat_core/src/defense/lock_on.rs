//! Zero Trust - a ring of lock-on turrets
//!
//! Eight points orbit the player at fixed home angles. A free point locks the
//! nearest unclaimed hostile in range and beams it; the longer a lock is held
//! the wider and stronger the beam gets. A hostile is owned by at most one
//! point, tracked in an explicit registry.

use crate::combat::CombatWorld;
use crate::config::{CombatConstants, LockOnConstants};
use crate::cooldown::CooldownReset;
use crate::damage::{roll_damage, DamageRoll};
use crate::directory::{HostileView, SlowZone};
use crate::feedback::HitFeedback;
use crate::geometry::{Point, Shape};
use crate::player::PlayerState;
use crate::skill::SkillDefinition;
use crate::types::{EntityId, Millis, SkillId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::TAU;
use tracing::{debug, trace};

pub const LOCK_POINT_COUNT: usize = 8;

/// Beam multiplier after holding a lock for `held`
pub fn beam_multiplier(held: Millis, escalation_ms: Millis) -> u32 {
    1 + (held / escalation_ms.max(1)) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockPoint {
    pub target: Option<EntityId>,
    pub position: Point,
    pub home_angle: f64,
    pub lock_start: Millis,
    pub beam_multiplier: u32,
    pub last_damage_at: Millis,
}

impl LockPoint {
    fn new(home_angle: f64) -> Self {
        LockPoint {
            target: None,
            position: Point::ORIGIN,
            home_angle,
            lock_start: 0,
            beam_multiplier: 1,
            last_damage_at: 0,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.target.is_some()
    }

    fn home(&self, center: Point, constants: &LockOnConstants) -> Point {
        center.offset(self.home_angle, constants.home_radius)
    }
}

/// Outcome of one ring update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockOnReport {
    pub acquired: u32,
    pub released: u32,
    pub beams: u32,
    pub damage: u64,
    pub exp: u64,
    pub kills: u32,
    pub cooldown_resets: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockOnRing {
    level: u32,
    points: Vec<LockPoint>,
    /// Hostile -> index of the point that owns it
    registry: HashMap<EntityId, usize>,
    placed: bool,
}

impl LockOnRing {
    pub fn new(level: u32) -> Self {
        let spacing = TAU / LOCK_POINT_COUNT as f64;
        LockOnRing {
            level,
            points: (0..LOCK_POINT_COUNT)
                .map(|i| LockPoint::new(spacing * i as f64))
                .collect(),
            registry: HashMap::new(),
            placed: false,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub fn points(&self) -> &[LockPoint] {
        &self.points
    }

    pub fn owner_of(&self, id: EntityId) -> Option<usize> {
        self.registry.get(&id).copied()
    }

    pub fn locked_count(&self) -> usize {
        self.registry.len()
    }

    fn claim(&mut self, index: usize, id: EntityId, now: Millis) {
        let point = &mut self.points[index];
        point.target = Some(id);
        point.lock_start = now;
        point.beam_multiplier = 1;
        point.last_damage_at = now;
        self.registry.insert(id, index);
    }

    /// Free point `index`, removing its target from the registry
    fn release(&mut self, index: usize) -> Option<EntityId> {
        let point = &mut self.points[index];
        let released = point.target.take();
        point.beam_multiplier = 1;
        if let Some(id) = released {
            self.registry.remove(&id);
        }
        released
    }

    /// Run one tick of the ring around the player
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        now: Millis,
        player: &PlayerState,
        definition: &SkillDefinition,
        constants: &CombatConstants,
        world: &mut CombatWorld<'_>,
        cooldowns: &mut dyn CooldownReset,
        rng: &mut impl Rng,
    ) -> LockOnReport {
        let consts = &constants.lock_on;
        let center = player.position;
        let mut report = LockOnReport::default();

        if !self.placed {
            for point in &mut self.points {
                point.position = point.home(center, consts);
            }
            self.placed = true;
        }

        let mut hostiles = world.directory.entities();
        let in_range = |h: &HostileView| h.position.distance(center) - h.radius <= consts.radius;

        // Release targets that are gone or out of range
        for index in 0..self.points.len() {
            let Some(id) = self.points[index].target else {
                continue;
            };
            let keep = hostiles.iter().any(|h| h.id == id && in_range(h));
            if !keep {
                self.release(index);
                report.released += 1;
            }
        }

        // Acquire the nearest unclaimed hostile for each free point
        for index in 0..self.points.len() {
            if self.points[index].is_locked() {
                continue;
            }
            let candidate = hostiles
                .iter()
                .filter(|h| in_range(*h) && !self.registry.contains_key(&h.id))
                .min_by(|a, b| {
                    a.position
                        .distance(center)
                        .total_cmp(&b.position.distance(center))
                });
            if let Some(h) = candidate {
                self.claim(index, h.id, now);
                report.acquired += 1;
            }
        }

        // Escalate, beam and move
        for index in 0..self.points.len() {
            let locked = self.points[index].target;
            let target = locked.and_then(|id| hostiles.iter().find(|h| h.id == id).copied());

            let Some(target) = target else {
                if locked.is_some() {
                    // Killed by an earlier beam this tick
                    self.release(index);
                    report.released += 1;
                }
                let home = self.points[index].home(center, consts);
                let point = &mut self.points[index];
                point.position = point.position.lerp(home, consts.follow_rate);
                continue;
            };

            let point = &mut self.points[index];
            point.beam_multiplier = beam_multiplier(now.saturating_sub(point.lock_start), consts.escalation_ms);
            point.position = point.position.lerp(target.position, consts.follow_rate);

            if now.saturating_sub(point.last_damage_at) < consts.damage_interval_ms {
                continue;
            }
            point.last_damage_at = now;
            let multiplier = point.beam_multiplier;
            self.beam(target, multiplier, center, player, definition, constants, world, cooldowns, rng, &mut report);
            hostiles = world.directory.entities();
        }

        world.directory.set_slow_zone(Some(SlowZone {
            center,
            radius: consts.radius,
            multiplier: consts.slow_multiplier,
        }));

        if report.acquired > 0 || report.released > 0 {
            trace!(
                acquired = report.acquired,
                released = report.released,
                locked = self.registry.len(),
                "lock registry changed"
            );
        }
        report
    }

    #[allow(clippy::too_many_arguments)]
    fn beam(
        &mut self,
        target: HostileView,
        multiplier: u32,
        center: Point,
        player: &PlayerState,
        definition: &SkillDefinition,
        constants: &CombatConstants,
        world: &mut CombatWorld<'_>,
        cooldowns: &mut dyn CooldownReset,
        rng: &mut impl Rng,
        report: &mut LockOnReport,
    ) {
        let consts = &constants.lock_on;
        let escalation = (multiplier - 1) as f64;
        let area = Shape::Circle {
            origin: target.position,
            radius: consts.damage_radius * (1.0 + escalation * 0.5),
        };
        let ids: Vec<EntityId> = world
            .directory
            .entities()
            .iter()
            .filter(|h| area.contains(h.position, h.radius))
            .map(|h| h.id)
            .collect();

        let roll = DamageRoll::new(player.crit_chance(&constants.damage), definition.crit_multiplier)
            .with_multiplier(1.0 + escalation * self.level as f64 * 0.01);
        let damage = roll_damage(
            player,
            &constants.damage,
            definition.units_at(self.level),
            roll,
            rng,
        );

        let outcome = world.directory.damage(&ids, damage.amount());
        world.progression.add_exp(outcome.total_exp);

        report.beams += 1;
        report.damage += damage.final_damage as u64 * ids.len() as u64;
        report.exp += outcome.total_exp;
        report.kills += outcome.kill_count;

        // Kills inside the ring may refresh the coupled skill
        let reset_chance = (self.level as f64 * 0.01).clamp(0.0, 1.0);
        for position in &outcome.killed_positions {
            if position.distance(center) <= consts.radius && rng.gen::<f64>() < reset_chance {
                cooldowns.reset_cooldown(consts.reset_skill);
                report.cooldown_resets += 1;
                debug!(skill = %consts.reset_skill, "lock-on kill refreshed cooldown");
            }
        }

        world.feedback.push(HitFeedback {
            skill: SkillId::ZeroTrust,
            position: target.position,
            color: definition.color,
            shape: area,
            magnitude: damage.final_damage,
            is_crit: damage.is_crit,
        });
    }

    /// Push lock timestamps forward after a pause
    pub fn shift(&mut self, delta: Millis) {
        for point in self.points.iter_mut().filter(|p| p.is_locked()) {
            point.lock_start = point.lock_start.saturating_add(delta);
            point.last_damage_at = point.last_damage_at.saturating_add(delta);
        }
    }

    /// Release every lock; the caller clears the slow zone
    pub fn teardown(&mut self) {
        for index in 0..self.points.len() {
            self.release(index);
        }
        self.placed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::SkillCast;
    use crate::directory::{ArenaDirectory, ExpLedger, MonsterDirectory};
    use crate::feedback::FeedbackBuffer;
    use crate::schedule::TimerQueue;
    use crate::skill::SkillCatalog;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[derive(Default)]
    struct ResetLog(Vec<SkillId>);

    impl CooldownReset for ResetLog {
        fn reset_cooldown(&mut self, id: SkillId) {
            self.0.push(id);
        }
    }

    struct Harness {
        arena: ArenaDirectory,
        ledger: ExpLedger,
        timers: TimerQueue<SkillCast>,
        feedback: FeedbackBuffer,
        resets: ResetLog,
        constants: CombatConstants,
        definition: SkillDefinition,
        player: PlayerState,
        rng: StdRng,
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                arena: ArenaDirectory::new(),
                ledger: ExpLedger::new(),
                timers: TimerQueue::new(),
                feedback: FeedbackBuffer::new(),
                resets: ResetLog::default(),
                constants: CombatConstants::default(),
                definition: SkillCatalog::builtin().get(SkillId::ZeroTrust).unwrap().clone(),
                player: PlayerState::new(200.0),
                rng: StdRng::seed_from_u64(8),
            }
        }

        fn update(&mut self, ring: &mut LockOnRing, now: Millis) -> LockOnReport {
            let mut world = CombatWorld {
                directory: &mut self.arena,
                progression: &mut self.ledger,
                timers: &mut self.timers,
                feedback: &mut self.feedback,
            };
            ring.update(
                now,
                &self.player,
                &self.definition,
                &self.constants,
                &mut world,
                &mut self.resets,
                &mut self.rng,
            )
        }
    }

    fn assert_registry_consistent(ring: &LockOnRing) {
        let owners: HashSet<usize> = ring.registry.values().copied().collect();
        assert_eq!(owners.len(), ring.registry.len(), "a point owns two hostiles");
        for (id, index) in &ring.registry {
            assert_eq!(ring.points[*index].target, Some(*id));
        }
        let locked = ring.points.iter().filter(|p| p.is_locked()).count();
        assert_eq!(locked, ring.registry.len());
    }

    #[test]
    fn test_multiplier_escalates() {
        assert_eq!(beam_multiplier(0, 500), 1);
        assert_eq!(beam_multiplier(499, 500), 1);
        assert_eq!(beam_multiplier(1200, 500), 3);
    }

    #[test]
    fn test_lock_at_zero_has_multiplier_three_at_1200() {
        let mut h = Harness::new();
        let id = h.arena.spawn(Point::new(100.0, 0.0), 10.0, 1_000_000.0, 1);
        let mut ring = LockOnRing::new(1);

        h.update(&mut ring, 0);
        let owner = ring.owner_of(id).unwrap();
        assert_eq!(ring.points()[owner].beam_multiplier, 1);

        h.update(&mut ring, 1200);
        assert_eq!(ring.points()[owner].beam_multiplier, 3);
    }

    #[test]
    fn test_one_point_per_hostile() {
        let mut h = Harness::new();
        for i in 0..3 {
            h.arena.spawn(Point::new(50.0 + i as f64 * 20.0, 0.0), 5.0, 1_000_000.0, 1);
        }
        let mut ring = LockOnRing::new(1);
        let report = h.update(&mut ring, 0);
        assert_eq!(report.acquired, 3);
        assert_eq!(ring.locked_count(), 3);
        assert_registry_consistent(&ring);
    }

    #[test]
    fn test_release_out_of_range() {
        let mut h = Harness::new();
        let near = h.arena.spawn(Point::new(100.0, 0.0), 10.0, 1_000_000.0, 1);
        let other = h.arena.spawn(Point::new(0.0, 120.0), 10.0, 1_000_000.0, 1);
        let mut ring = LockOnRing::new(1);
        h.update(&mut ring, 0);
        assert_eq!(ring.locked_count(), 2);

        h.arena.knockback(&[near], Point::ORIGIN, 1000.0);
        let report = h.update(&mut ring, 100);
        assert_eq!(report.released, 1);
        assert!(ring.owner_of(near).is_none());
        assert!(ring.owner_of(other).is_some());
        assert_registry_consistent(&ring);
    }

    #[test]
    fn test_beams_on_interval_and_sets_slow_zone() {
        let mut h = Harness::new();
        let id = h.arena.spawn(Point::new(100.0, 0.0), 10.0, 1_000_000.0, 1);
        let mut ring = LockOnRing::new(1);

        assert_eq!(h.update(&mut ring, 0).beams, 0);
        assert_eq!(h.update(&mut ring, 300).beams, 0);
        assert_eq!(h.update(&mut ring, 500).beams, 1);
        assert!(h.arena.get(id).unwrap().hp < 1_000_000.0);

        let zone = h.arena.slow_zone().unwrap();
        assert!((zone.radius - h.constants.lock_on.radius).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kill_in_ring_resets_cooldown() {
        let mut h = Harness::new();
        h.arena.spawn(Point::new(100.0, 0.0), 10.0, 1.0, 5);
        // Level 100 always resets
        let mut ring = LockOnRing::new(100);

        h.update(&mut ring, 0);
        let report = h.update(&mut ring, 500);
        assert_eq!(report.kills, 1);
        assert_eq!(report.cooldown_resets, 1);
        assert_eq!(h.resets.0, vec![SkillId::Nova]);
        assert_eq!(h.ledger.total, 5);

        // The dead target is released next tick
        let report = h.update(&mut ring, 600);
        assert_eq!(report.released, 1);
        assert_eq!(ring.locked_count(), 0);
    }

    #[test]
    fn test_target_killed_by_neighbour_beam_is_released() {
        let mut h = Harness::new();
        let a = h.arena.spawn(Point::new(100.0, 0.0), 5.0, 1.0, 1);
        let b = h.arena.spawn(Point::new(110.0, 0.0), 5.0, 1.0, 1);
        let c = h.arena.spawn(Point::new(138.0, 0.0), 5.0, 1_000_000.0, 1);
        let mut ring = LockOnRing::new(1);

        h.update(&mut ring, 0);
        let owner_b = ring.owner_of(b).unwrap();
        assert!(ring.owner_of(a).is_some());
        assert!(ring.owner_of(c).is_some());

        // The beam on `a` kills `b` too; the point on `b` must not fire
        let report = h.update(&mut ring, 500);
        assert_eq!(report.kills, 2);
        assert_eq!(report.beams, 2);
        assert_eq!(report.released, 1);
        assert!(ring.owner_of(b).is_none());
        assert_eq!(ring.points()[owner_b].beam_multiplier, 1);
        assert!(!ring.points()[owner_b].is_locked());
        assert_registry_consistent(&ring);
    }

    #[test]
    fn test_slow_zone_follows_player() {
        let mut h = Harness::new();
        let mut ring = LockOnRing::new(1);
        h.update(&mut ring, 0);
        assert_eq!(h.arena.slow_zone().unwrap().center, Point::ORIGIN);

        h.player.position = Point::new(250.0, -40.0);
        h.update(&mut ring, 16);
        let zone = h.arena.slow_zone().unwrap();
        assert_eq!(zone.center, Point::new(250.0, -40.0));
        assert!((zone.multiplier - h.constants.lock_on.slow_multiplier).abs() < f64::EPSILON);
    }

    #[test]
    fn test_teardown_releases_all() {
        let mut h = Harness::new();
        h.arena.spawn(Point::new(100.0, 0.0), 10.0, 1_000_000.0, 1);
        let mut ring = LockOnRing::new(1);
        h.update(&mut ring, 0);
        ring.teardown();
        assert_eq!(ring.locked_count(), 0);
        assert!(ring.points().iter().all(|p| !p.is_locked()));
    }

    proptest! {
        #[test]
        fn prop_registry_is_a_set(
            spots in proptest::collection::vec((-400.0f64..400.0, -400.0f64..400.0), 0..20),
            pushes in proptest::collection::vec((0usize..20, 0.0f64..300.0), 0..10),
        ) {
            let mut h = Harness::new();
            let ids: Vec<EntityId> = spots
                .iter()
                .map(|(x, y)| h.arena.spawn(Point::new(*x, *y), 8.0, 1_000_000.0, 1))
                .collect();
            let mut ring = LockOnRing::new(10);

            h.update(&mut ring, 0);
            assert_registry_consistent(&ring);
            prop_assert!(ring.locked_count() <= LOCK_POINT_COUNT);

            let mut now = 0;
            for (pick, distance) in pushes {
                if let Some(id) = ids.get(pick) {
                    h.arena.knockback(&[*id], Point::ORIGIN, distance);
                }
                now += 100;
                let before = ring.locked_count();
                let report = h.update(&mut ring, now);
                assert_registry_consistent(&ring);
                prop_assert_eq!(
                    ring.locked_count(),
                    before - report.released as usize + report.acquired as usize
                );
            }
        }
    }
}
