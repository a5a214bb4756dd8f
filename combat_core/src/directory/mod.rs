//! Hostile-entity directory and progression sink
//!
//! The combat core never owns hostiles. It reads them through
//! [`MonsterDirectory`] and forwards experience to a [`Progression`] sink.

mod arena;
mod progression;

pub use arena::{ArenaDirectory, ArenaStats, Hostile};
pub use progression::{ExpLedger, Progression};

use crate::geometry::Point;
use crate::types::{EntityId, Millis};
use serde::{Deserialize, Serialize};

/// Read-only snapshot of one hostile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostileView {
    pub id: EntityId,
    pub position: Point,
    pub radius: f64,
}

/// Outcome of a damage call against the directory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageReport {
    pub total_exp: u64,
    pub killed_positions: Vec<Point>,
    pub kill_count: u32,
}

impl DamageReport {
    pub fn merge(&mut self, other: DamageReport) {
        self.total_exp += other.total_exp;
        self.kill_count += other.kill_count;
        self.killed_positions.extend(other.killed_positions);
    }
}

/// Area in which hostiles move slower
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlowZone {
    pub center: Point,
    pub radius: f64,
    /// Speed multiplier inside the zone
    pub multiplier: f64,
}

impl SlowZone {
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) <= self.radius
    }
}

/// Hostile-entity service consumed by the combat core
///
/// Ids that no longer exist are ignored by every mutating call.
pub trait MonsterDirectory {
    /// Snapshot of every live hostile
    fn entities(&self) -> Vec<HostileView>;

    /// Apply `amount` damage to each id
    fn damage(&mut self, ids: &[EntityId], amount: f64) -> DamageReport;

    /// Push each id away from `origin` by `distance`
    fn knockback(&mut self, ids: &[EntityId], origin: Point, distance: f64);

    fn stun(&mut self, ids: &[EntityId], duration: Millis);

    /// Damage over time, `tick_damage` per tick for `duration`
    fn burn(&mut self, ids: &[EntityId], duration: Millis, tick_damage: f64);

    /// Remove ids without granting experience
    fn defeat_without_reward(&mut self, ids: &[EntityId]);

    fn set_slow_zone(&mut self, zone: Option<SlowZone>);

    /// Point every hostile should chase instead of the player
    fn set_taunt_target(&mut self, target: Option<Point>);

    /// Look up a single hostile
    fn find(&self, id: EntityId) -> Option<HostileView> {
        self.entities().into_iter().find(|h| h.id == id)
    }
}
