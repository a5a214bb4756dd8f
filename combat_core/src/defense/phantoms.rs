//! Phantom decoys
//!
//! Each phantom patrols its own angular sector around the player, leaning
//! toward the hostiles in that sector. Phantoms cast scaled-down copies of
//! the player's attack skills and take turns taunting; the directory only
//! ever sees one taunt target.

use crate::combat::{resolve_activation, ActivationReport, CombatWorld, SkillCast};
use crate::config::{CombatConstants, PhantomConstants};
use crate::directory::HostileView;
use crate::geometry::{angle_in_sector, circular_mean, sector_bounds, Point};
use crate::player::PlayerState;
use crate::skill::SkillLoadout;
use crate::types::Millis;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, trace};

pub const MAX_PHANTOMS: usize = 3;

/// Phantoms summoned at `level`
pub fn phantom_count(level: u32) -> usize {
    (1 + level as usize / 10).min(MAX_PHANTOMS)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phantom {
    pub id: u32,
    pub position: Point,
    pub target: Point,
    pub sector_index: usize,
    pub is_taunting: bool,
    pub next_cast_at: Millis,
    pub next_taunt_at: Millis,
    pub taunt_ends_at: Millis,
}

/// Outcome of one coordinator update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhantomReport {
    pub casts: Vec<ActivationReport>,
    pub taunts_started: u32,
    pub taunts_ended: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhantomCoordinator {
    level: u32,
    phantoms: Vec<Phantom>,
    next_id: u32,
    /// Phantom whose position is the global taunt target
    taunt_owner: Option<u32>,
    published_taunt: Option<Point>,
}

impl PhantomCoordinator {
    pub fn new(level: u32) -> Self {
        PhantomCoordinator {
            level,
            ..Default::default()
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn phantoms(&self) -> &[Phantom] {
        &self.phantoms
    }

    pub fn taunt_target(&self) -> Option<Point> {
        self.taunt_owner
            .and_then(|id| self.phantoms.iter().find(|p| p.id == id))
            .map(|p| p.position)
    }

    /// Change level; the roster follows on the next update
    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    /// Grow or shrink the roster to match the level
    ///
    /// Sectors are reassigned whenever the count changes.
    fn sync_roster(&mut self, now: Millis, center: Point, hostiles: &[HostileView], constants: &PhantomConstants, rng: &mut impl Rng) {
        let wanted = phantom_count(self.level);
        if wanted == self.phantoms.len() {
            return;
        }

        while self.phantoms.len() > wanted {
            if let Some(phantom) = self.phantoms.pop() {
                self.dismiss_bookkeeping(phantom.id);
            }
        }
        while self.phantoms.len() < wanted {
            self.next_id += 1;
            // Stagger the taunt cycle so phantoms take turns
            let stagger = constants.taunt_cycle_ms * self.phantoms.len() as Millis / wanted as Millis;
            self.phantoms.push(Phantom {
                id: self.next_id,
                position: center,
                target: center,
                sector_index: 0,
                is_taunting: false,
                next_cast_at: now + constants.cast_interval_ms,
                next_taunt_at: now + constants.taunt_cycle_ms + stagger,
                taunt_ends_at: 0,
            });
        }

        let count = self.phantoms.len();
        for index in 0..count {
            self.phantoms[index].sector_index = index;
            let target = choose_target(index, count, center, hostiles, constants, rng);
            self.phantoms[index].target = target;
        }
        debug!(count, "phantom roster changed");
    }

    /// Remove phantom `id`, handing the taunt to another taunting phantom
    pub fn dismiss(&mut self, id: u32) -> bool {
        let before = self.phantoms.len();
        self.phantoms.retain(|p| p.id != id);
        if self.phantoms.len() == before {
            return false;
        }
        self.dismiss_bookkeeping(id);
        true
    }

    fn dismiss_bookkeeping(&mut self, id: u32) {
        if self.taunt_owner == Some(id) {
            self.taunt_owner = self
                .phantoms
                .iter()
                .find(|p| p.is_taunting && p.id != id)
                .map(|p| p.id);
        }
    }

    /// Move, cast and taunt
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        now: Millis,
        dt: Millis,
        player: &PlayerState,
        loadout: &SkillLoadout,
        constants: &CombatConstants,
        world: &mut CombatWorld<'_>,
        rng: &mut impl Rng,
    ) -> PhantomReport {
        let consts = &constants.phantom;
        let center = player.position;
        let mut report = PhantomReport::default();
        let hostiles = world.directory.entities();

        self.sync_roster(now, center, &hostiles, consts, rng);

        let count = self.phantoms.len();
        let step = constants.player.move_speed * consts.speed_multiplier * dt as f64 / 1000.0;
        let attack_skills = loadout.attack_skills();

        for index in 0..count {
            // Movement
            let phantom = &mut self.phantoms[index];
            let (next, arrived) = phantom.position.move_towards(phantom.target, step);
            phantom.position = next;
            if arrived || phantom.position.distance(phantom.target) <= consts.arrival_epsilon {
                let sector = phantom.sector_index;
                phantom.target = choose_target(sector, count, center, &hostiles, consts, rng);
            }

            // Casting
            if now >= phantom.next_cast_at {
                phantom.next_cast_at = now + consts.cast_interval_ms;
                let origin = phantom.position;
                if let Some(skill) = attack_skills.choose(rng).and_then(|id| loadout.get(*id)) {
                    let facing = nearest(origin, &hostiles)
                        .map(|h| origin.angle_to(h.position))
                        .unwrap_or_else(|| rng.gen_range(0.0..TAU));
                    let cast = SkillCast::abridged(
                        skill.id(),
                        skill.level(),
                        origin,
                        facing,
                        constants.resolver.abridged_scale,
                    );
                    let outcome = resolve_activation(
                        &cast,
                        &skill.definition,
                        player,
                        constants,
                        now,
                        world,
                        rng,
                    );
                    if outcome.hit_anything() {
                        trace!(summary = %outcome.summary(), "phantom cast");
                    }
                    report.casts.push(outcome);
                }
            }

            // Taunt cycle
            let phantom = &mut self.phantoms[index];
            if phantom.is_taunting && now >= phantom.taunt_ends_at {
                phantom.is_taunting = false;
                report.taunts_ended += 1;
                let id = phantom.id;
                self.dismiss_bookkeeping(id);
            } else if !phantom.is_taunting && now >= phantom.next_taunt_at {
                phantom.is_taunting = true;
                phantom.taunt_ends_at = now + consts.taunt_duration_ms;
                phantom.next_taunt_at = now + consts.taunt_cycle_ms;
                report.taunts_started += 1;
                self.taunt_owner = Some(phantom.id);
            }
        }

        self.publish_taunt(world);
        report
    }

    fn publish_taunt(&mut self, world: &mut CombatWorld<'_>) {
        let target = self.taunt_target();
        if target != self.published_taunt {
            world.directory.set_taunt_target(target);
            self.published_taunt = target;
        }
    }

    /// Push cast and taunt timestamps forward after a pause
    pub fn shift(&mut self, delta: Millis) {
        for phantom in &mut self.phantoms {
            phantom.next_cast_at = phantom.next_cast_at.saturating_add(delta);
            phantom.next_taunt_at = phantom.next_taunt_at.saturating_add(delta);
            if phantom.is_taunting {
                phantom.taunt_ends_at = phantom.taunt_ends_at.saturating_add(delta);
            }
        }
    }

    /// Dismiss every phantom; the caller clears the taunt target
    pub fn teardown(&mut self) {
        self.phantoms.clear();
        self.taunt_owner = None;
        self.published_taunt = None;
    }
}

fn nearest(origin: Point, hostiles: &[HostileView]) -> Option<&HostileView> {
    hostiles.iter().min_by(|a, b| {
        a.position
            .distance(origin)
            .total_cmp(&b.position.distance(origin))
    })
}

/// Pick a patrol point inside sector `index` of `count`
///
/// Leans toward the closeness-weighted angular centroid of the hostiles in
/// the sector; falls back to a random angle in the sector.
fn choose_target(
    index: usize,
    count: usize,
    center: Point,
    hostiles: &[HostileView],
    constants: &PhantomConstants,
    rng: &mut impl Rng,
) -> Point {
    let (start, width) = sector_bounds(index, count);
    let samples = hostiles.iter().filter_map(|h| {
        let distance = center.distance(h.position);
        let angle = center.angle_to(h.position);
        (distance <= constants.sense_radius && angle_in_sector(angle, start, width))
            .then(|| (angle, constants.sense_radius - distance + 1.0))
    });

    let angle = circular_mean(samples).unwrap_or_else(|| start + rng.gen_range(0.0..width));
    let low = constants.min_leash.min(constants.max_leash);
    let high = constants.max_leash.max(low + f64::EPSILON);
    center.offset(angle, rng.gen_range(low..high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ArenaDirectory, ExpLedger, MonsterDirectory};
    use crate::feedback::FeedbackBuffer;
    use crate::geometry::wrap_angle;
    use crate::schedule::TimerQueue;
    use crate::skill::SkillCatalog;
    use crate::types::SkillId;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Harness {
        arena: ArenaDirectory,
        ledger: ExpLedger,
        timers: TimerQueue<SkillCast>,
        feedback: FeedbackBuffer,
        constants: CombatConstants,
        loadout: SkillLoadout,
        player: PlayerState,
        rng: StdRng,
    }

    impl Harness {
        fn new() -> Self {
            let catalog = SkillCatalog::builtin();
            let mut loadout = SkillLoadout::new();
            loadout.equip(catalog.get(SkillId::Nova).unwrap().clone(), 3);
            Harness {
                arena: ArenaDirectory::new(),
                ledger: ExpLedger::new(),
                timers: TimerQueue::new(),
                feedback: FeedbackBuffer::new(),
                constants: CombatConstants::default(),
                loadout,
                player: PlayerState::new(200.0),
                rng: StdRng::seed_from_u64(21),
            }
        }

        fn update(&mut self, coordinator: &mut PhantomCoordinator, now: Millis, dt: Millis) -> PhantomReport {
            let mut world = CombatWorld {
                directory: &mut self.arena,
                progression: &mut self.ledger,
                timers: &mut self.timers,
                feedback: &mut self.feedback,
            };
            coordinator.update(now, dt, &self.player, &self.loadout, &self.constants, &mut world, &mut self.rng)
        }
    }

    #[test]
    fn test_phantom_count_table() {
        assert_eq!(phantom_count(0), 1);
        assert_eq!(phantom_count(9), 1);
        assert_eq!(phantom_count(10), 2);
        assert_eq!(phantom_count(20), 3);
        assert_eq!(phantom_count(99), 3);
    }

    #[test]
    fn test_roster_follows_level() {
        let mut h = Harness::new();
        let mut coordinator = PhantomCoordinator::new(5);
        h.update(&mut coordinator, 0, 16);
        assert_eq!(coordinator.phantoms().len(), 1);

        coordinator.set_level(25);
        h.update(&mut coordinator, 16, 16);
        let sectors: Vec<usize> = coordinator.phantoms().iter().map(|p| p.sector_index).collect();
        assert_eq!(sectors, vec![0, 1, 2]);
    }

    #[test]
    fn test_moves_at_four_times_player_speed() {
        let mut h = Harness::new();
        let mut coordinator = PhantomCoordinator::new(0);
        h.update(&mut coordinator, 0, 0);
        let start = coordinator.phantoms()[0].position;
        let target = coordinator.phantoms()[0].target;
        assert!(start.distance(target) >= h.constants.phantom.min_leash - 1e-9);

        h.update(&mut coordinator, 50, 50);
        let moved = coordinator.phantoms()[0].position.distance(start);
        // 160 * 4 * 0.05s, shorter than the minimum leash
        let expected = h.constants.player.move_speed * h.constants.phantom.speed_multiplier * 0.05;
        assert!((expected - 32.0).abs() < 1e-9);
        assert!((moved - expected).abs() < 1e-9);
        assert_eq!(coordinator.phantoms()[0].target, target);
    }

    #[test]
    fn test_targets_stay_in_sector() {
        let mut rng = StdRng::seed_from_u64(2);
        let consts = PhantomConstants::default();
        for index in 0..3 {
            for _ in 0..50 {
                let target = choose_target(index, 3, Point::ORIGIN, &[], &consts, &mut rng);
                let (start, width) = sector_bounds(index, 3);
                assert!(angle_in_sector(Point::ORIGIN.angle_to(target), start, width + 1e-9));
                let distance = target.length();
                assert!(distance >= consts.min_leash - 1e-9 && distance <= consts.max_leash + 1e-9);
            }
        }
    }

    #[test]
    fn test_target_leans_toward_hostiles() {
        let mut rng = StdRng::seed_from_u64(2);
        let consts = PhantomConstants::default();
        let hostiles = [HostileView {
            id: crate::types::EntityId(1),
            position: Point::new(0.0, 200.0),
            radius: 10.0,
        }];
        // Sector 0 of 2 spans [0, π]; the lone hostile sits at π/2
        let target = choose_target(0, 2, Point::ORIGIN, &hostiles, &consts, &mut rng);
        let angle = Point::ORIGIN.angle_to(target);
        assert!(wrap_angle(angle - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_casts_every_interval() {
        let mut h = Harness::new();
        h.arena.spawn(Point::new(20.0, 0.0), 10.0, 1_000_000.0, 1);
        let mut coordinator = PhantomCoordinator::new(0);

        let mut casts = 0;
        let mut now = 0;
        while now <= 3000 {
            casts += h.update(&mut coordinator, now, 100).casts.len();
            now += 100;
        }
        assert_eq!(casts, 3);
    }

    #[test]
    fn test_no_attack_skills_no_casts() {
        let mut h = Harness::new();
        h.loadout.clear();
        let mut coordinator = PhantomCoordinator::new(0);
        h.update(&mut coordinator, 0, 16);
        let report = h.update(&mut coordinator, 1000, 16);
        assert!(report.casts.is_empty());
        assert!(coordinator.phantoms()[0].next_cast_at > 1000);
    }

    #[test]
    fn test_taunt_cycle_publishes_single_target() {
        let mut h = Harness::new();
        let mut coordinator = PhantomCoordinator::new(0);

        h.update(&mut coordinator, 0, 100);
        assert!(h.arena.taunt_target().is_none());

        let report = h.update(&mut coordinator, 5000, 100);
        assert_eq!(report.taunts_started, 1);
        assert_eq!(h.arena.taunt_target(), coordinator.taunt_target());
        assert!(h.arena.taunt_target().is_some());

        let report = h.update(&mut coordinator, 7000, 100);
        assert_eq!(report.taunts_ended, 1);
        assert!(h.arena.taunt_target().is_none());
    }

    #[test]
    fn test_dismiss_hands_taunt_over() {
        let mut coordinator = PhantomCoordinator::new(20);
        for id in 1..=3 {
            coordinator.phantoms.push(Phantom {
                id,
                position: Point::new(id as f64, 0.0),
                target: Point::ORIGIN,
                sector_index: id as usize - 1,
                is_taunting: id != 2,
                next_cast_at: 0,
                next_taunt_at: 0,
                taunt_ends_at: 10_000,
            });
        }
        coordinator.taunt_owner = Some(1);

        assert!(coordinator.dismiss(1));
        assert_eq!(coordinator.taunt_target(), Some(Point::new(3.0, 0.0)));

        assert!(coordinator.dismiss(3));
        assert_eq!(coordinator.taunt_target(), None);
        assert!(!coordinator.dismiss(42));
    }

    #[test]
    fn test_teardown_clears_everything() {
        let mut h = Harness::new();
        let mut coordinator = PhantomCoordinator::new(25);
        h.update(&mut coordinator, 5000, 16);
        coordinator.teardown();
        assert!(coordinator.phantoms().is_empty());
        assert!(coordinator.taunt_target().is_none());
        h.arena.set_taunt_target(None);
        assert!(h.arena.taunt_target().is_none());
    }
}
