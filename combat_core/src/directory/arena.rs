//! ArenaDirectory - in-memory hostile field
//!
//! Hostiles walk toward a goal point (the taunt target when one is set),
//! honour stuns and the slow zone, and take burn damage on a fixed tick.

use super::{DamageReport, HostileView, MonsterDirectory, SlowZone};
use crate::geometry::Point;
use crate::types::{EntityId, Millis};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// Interval between burn ticks
const BURN_TICK_MS: Millis = 500;

/// Active burn on a hostile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Burn {
    remaining: Millis,
    until_tick: Millis,
    tick_damage: f64,
}

/// One hostile in the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hostile {
    pub id: EntityId,
    pub position: Point,
    pub radius: f64,
    pub hp: f64,
    pub max_hp: f64,
    /// Experience granted on kill
    pub exp: u64,
    /// Units per second
    pub speed: f64,
    pub stunned_for: Millis,
    burn: Option<Burn>,
}

impl Hostile {
    pub fn is_burning(&self) -> bool {
        self.burn.is_some()
    }

    fn view(&self) -> HostileView {
        HostileView {
            id: self.id,
            position: self.position,
            radius: self.radius,
        }
    }
}

/// Totals accumulated by the arena
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArenaStats {
    pub kills: u32,
    pub defeated_without_reward: u32,
    pub damage_taken: f64,
    pub burn_damage: f64,
}

/// In-memory [`MonsterDirectory`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArenaDirectory {
    hostiles: Vec<Hostile>,
    next_id: u32,
    slow_zone: Option<SlowZone>,
    taunt_target: Option<Point>,
    pub stats: ArenaStats,
}

impl ArenaDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stationary hostile and return its id
    pub fn spawn(&mut self, position: Point, radius: f64, hp: f64, exp: u64) -> EntityId {
        self.spawn_moving(position, radius, hp, exp, 0.0)
    }

    pub fn spawn_moving(
        &mut self,
        position: Point,
        radius: f64,
        hp: f64,
        exp: u64,
        speed: f64,
    ) -> EntityId {
        self.next_id += 1;
        let id = EntityId(self.next_id);
        let hp = hp.max(1.0);
        self.hostiles.push(Hostile {
            id,
            position,
            radius: radius.max(0.0),
            hp,
            max_hp: hp,
            exp,
            speed: speed.max(0.0),
            stunned_for: 0,
            burn: None,
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Hostile> {
        self.hostiles.iter().find(|h| h.id == id)
    }

    pub fn hostiles(&self) -> &[Hostile] {
        &self.hostiles
    }

    pub fn len(&self) -> usize {
        self.hostiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hostiles.is_empty()
    }

    pub fn slow_zone(&self) -> Option<SlowZone> {
        self.slow_zone
    }

    pub fn taunt_target(&self) -> Option<Point> {
        self.taunt_target
    }

    /// Hostiles whose circle overlaps the circle at `center`
    pub fn touching(&self, center: Point, radius: f64) -> Vec<EntityId> {
        self.hostiles
            .iter()
            .filter(|h| h.position.distance(center) <= h.radius + radius)
            .map(|h| h.id)
            .collect()
    }

    /// Advance the field by `dt` milliseconds
    ///
    /// Hostiles chase the taunt target if set, otherwise `goal`. Burn kills
    /// are reported the same way as direct kills.
    pub fn advance(&mut self, dt: Millis, goal: Point) -> DamageReport {
        let chase = self.taunt_target.unwrap_or(goal);
        let slow_zone = self.slow_zone;
        let dt_secs = dt as f64 / 1000.0;
        let mut burn_ticks: Vec<(EntityId, f64)> = Vec::new();

        for hostile in &mut self.hostiles {
            if hostile.stunned_for > 0 {
                hostile.stunned_for = hostile.stunned_for.saturating_sub(dt);
            } else if hostile.speed > 0.0 {
                let mut speed = hostile.speed;
                if let Some(zone) = slow_zone {
                    if zone.contains(hostile.position) {
                        speed *= zone.multiplier.clamp(0.0, 1.0);
                    }
                }
                let (next, _) = hostile.position.move_towards(chase, speed * dt_secs);
                hostile.position = next;
            }

            if let Some(burn) = hostile.burn.as_mut() {
                let mut elapsed = dt.min(burn.remaining);
                burn.remaining -= elapsed;
                while elapsed >= burn.until_tick {
                    elapsed -= burn.until_tick;
                    burn.until_tick = BURN_TICK_MS;
                    burn_ticks.push((hostile.id, burn.tick_damage));
                }
                burn.until_tick -= elapsed;
                if burn.remaining == 0 {
                    hostile.burn = None;
                }
            }
        }

        let mut report = DamageReport::default();
        for (id, tick_damage) in burn_ticks {
            self.stats.burn_damage += tick_damage;
            report.merge(self.apply_damage(id, tick_damage));
        }
        report
    }

    fn apply_damage(&mut self, id: EntityId, amount: f64) -> DamageReport {
        let mut report = DamageReport::default();
        let Some(index) = self.hostiles.iter().position(|h| h.id == id) else {
            return report;
        };
        let hostile = &mut self.hostiles[index];
        hostile.hp -= amount.max(0.0);
        self.stats.damage_taken += amount.max(0.0);
        if hostile.hp <= 0.0 {
            let dead = self.hostiles.swap_remove(index);
            trace!(id = %dead.id, exp = dead.exp, "hostile killed");
            self.stats.kills += 1;
            report.total_exp += dead.exp;
            report.kill_count += 1;
            report.killed_positions.push(dead.position);
        }
        report
    }
}

impl MonsterDirectory for ArenaDirectory {
    fn entities(&self) -> Vec<HostileView> {
        self.hostiles.iter().map(Hostile::view).collect()
    }

    fn damage(&mut self, ids: &[EntityId], amount: f64) -> DamageReport {
        let mut seen = HashSet::new();
        let mut report = DamageReport::default();
        for id in ids {
            if seen.insert(*id) {
                report.merge(self.apply_damage(*id, amount));
            }
        }
        report
    }

    fn knockback(&mut self, ids: &[EntityId], origin: Point, distance: f64) {
        for hostile in self.hostiles.iter_mut().filter(|h| ids.contains(&h.id)) {
            let away = hostile.position - origin;
            let direction = if away.length() > f64::EPSILON {
                away.normalized()
            } else {
                Point::new(1.0, 0.0)
            };
            hostile.position += direction * distance;
        }
    }

    fn stun(&mut self, ids: &[EntityId], duration: Millis) {
        for hostile in self.hostiles.iter_mut().filter(|h| ids.contains(&h.id)) {
            hostile.stunned_for = hostile.stunned_for.max(duration);
        }
    }

    fn burn(&mut self, ids: &[EntityId], duration: Millis, tick_damage: f64) {
        if duration == 0 || tick_damage <= 0.0 {
            return;
        }
        for hostile in self.hostiles.iter_mut().filter(|h| ids.contains(&h.id)) {
            // Re-applying refreshes the duration and keeps the stronger tick
            let tick_damage = hostile
                .burn
                .map_or(tick_damage, |b| b.tick_damage.max(tick_damage));
            hostile.burn = Some(Burn {
                remaining: duration,
                until_tick: BURN_TICK_MS,
                tick_damage,
            });
        }
    }

    fn defeat_without_reward(&mut self, ids: &[EntityId]) {
        let before = self.hostiles.len();
        self.hostiles.retain(|h| !ids.contains(&h.id));
        self.stats.defeated_without_reward += (before - self.hostiles.len()) as u32;
    }

    fn set_slow_zone(&mut self, zone: Option<SlowZone>) {
        self.slow_zone = zone;
    }

    fn set_taunt_target(&mut self, target: Option<Point>) {
        self.taunt_target = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_kills_and_reports() {
        let mut arena = ArenaDirectory::new();
        let a = arena.spawn(Point::new(10.0, 0.0), 5.0, 20.0, 7);
        let b = arena.spawn(Point::new(20.0, 0.0), 5.0, 100.0, 9);

        let report = arena.damage(&[a, b, EntityId(999)], 30.0);
        assert_eq!(report.kill_count, 1);
        assert_eq!(report.total_exp, 7);
        assert_eq!(report.killed_positions, vec![Point::new(10.0, 0.0)]);
        assert!((arena.get(b).unwrap().hp - 70.0).abs() < f64::EPSILON);
        assert!(arena.get(a).is_none());
    }

    #[test]
    fn test_duplicate_ids_hit_once() {
        let mut arena = ArenaDirectory::new();
        let a = arena.spawn(Point::ORIGIN, 5.0, 100.0, 1);
        arena.damage(&[a, a, a], 10.0);
        assert!((arena.get(a).unwrap().hp - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_knockback_pushes_away() {
        let mut arena = ArenaDirectory::new();
        let a = arena.spawn(Point::new(10.0, 0.0), 5.0, 100.0, 1);
        arena.knockback(&[a], Point::ORIGIN, 40.0);
        assert!((arena.get(a).unwrap().position.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_stun_blocks_movement() {
        let mut arena = ArenaDirectory::new();
        let a = arena.spawn_moving(Point::new(100.0, 0.0), 5.0, 100.0, 1, 100.0);
        arena.stun(&[a], 500);
        arena.advance(400, Point::ORIGIN);
        assert!((arena.get(a).unwrap().position.x - 100.0).abs() < f64::EPSILON);
        arena.advance(100, Point::ORIGIN);
        assert!((arena.get(a).unwrap().position.x - 100.0).abs() < f64::EPSILON);
        arena.advance(100, Point::ORIGIN);
        assert!(arena.get(a).unwrap().position.x < 100.0);
    }

    #[test]
    fn test_slow_zone_and_taunt() {
        let mut arena = ArenaDirectory::new();
        let a = arena.spawn_moving(Point::new(100.0, 0.0), 5.0, 100.0, 1, 100.0);
        arena.set_slow_zone(Some(SlowZone {
            center: Point::new(100.0, 0.0),
            radius: 50.0,
            multiplier: 0.5,
        }));
        arena.set_taunt_target(Some(Point::new(200.0, 0.0)));

        arena.advance(1000, Point::ORIGIN);
        // Walked toward the taunt at half speed
        assert!((arena.get(a).unwrap().position.x - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_burn_ticks_and_kills() {
        let mut arena = ArenaDirectory::new();
        let a = arena.spawn(Point::new(5.0, 5.0), 5.0, 25.0, 4);
        arena.burn(&[a], 2000, 10.0);

        let report = arena.advance(1000, Point::ORIGIN);
        assert_eq!(report.kill_count, 0);
        assert!((arena.get(a).unwrap().hp - 5.0).abs() < f64::EPSILON);

        let report = arena.advance(500, Point::ORIGIN);
        assert_eq!(report.kill_count, 1);
        assert_eq!(report.total_exp, 4);
        assert!((arena.stats.burn_damage - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_burn_expires() {
        let mut arena = ArenaDirectory::new();
        let a = arena.spawn(Point::ORIGIN, 5.0, 1000.0, 1);
        arena.burn(&[a], 1000, 10.0);
        arena.advance(3000, Point::ORIGIN);
        assert!(!arena.get(a).unwrap().is_burning());
        assert!((arena.get(a).unwrap().hp - 980.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_defeat_without_reward() {
        let mut arena = ArenaDirectory::new();
        let a = arena.spawn(Point::ORIGIN, 5.0, 10.0, 50);
        arena.spawn(Point::new(500.0, 0.0), 5.0, 10.0, 50);
        arena.defeat_without_reward(&[a]);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.stats.defeated_without_reward, 1);
        assert_eq!(arena.stats.kills, 0);
    }
}
