//! Autonomous defense entities - blades, lock-on ring and phantoms
//!
//! Each entity exists only while its skill is equipped. The session creates
//! them on equip, keeps their level in sync and tears them down on unequip.

mod blades;
mod lock_on;
mod phantoms;

pub use blades::{blade_count, shield_delta_per_hit, BladeRing, BladeVolley, DetachedBlade, MAX_BLADES};
pub use lock_on::{beam_multiplier, LockOnReport, LockOnRing, LockPoint, LOCK_POINT_COUNT};
pub use phantoms::{phantom_count, Phantom, PhantomCoordinator, PhantomReport, MAX_PHANTOMS};

use crate::directory::MonsterDirectory;
use crate::types::{Millis, SkillId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Defense entities owned by a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefenseEntities {
    pub blades: Option<BladeRing>,
    pub lock_on: Option<LockOnRing>,
    pub phantoms: Option<PhantomCoordinator>,
}

impl DefenseEntities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or re-level the entity behind `skill`
    pub fn sync(&mut self, skill: SkillId, level: u32) {
        match skill {
            SkillId::Blades => match self.blades.as_mut() {
                Some(ring) => ring.set_level(level),
                None => self.blades = Some(BladeRing::new(level)),
            },
            SkillId::ZeroTrust => match self.lock_on.as_mut() {
                Some(ring) => ring.set_level(level),
                None => self.lock_on = Some(LockOnRing::new(level)),
            },
            SkillId::Phantom => match self.phantoms.as_mut() {
                Some(coordinator) => coordinator.set_level(level),
                None => self.phantoms = Some(PhantomCoordinator::new(level)),
            },
            _ => {}
        }
    }

    pub fn is_active(&self, skill: SkillId) -> bool {
        match skill {
            SkillId::Blades => self.blades.is_some(),
            SkillId::ZeroTrust => self.lock_on.is_some(),
            SkillId::Phantom => self.phantoms.is_some(),
            _ => false,
        }
    }

    /// Destroy the entity behind `skill` and clear what it published
    pub fn teardown(&mut self, skill: SkillId, directory: &mut dyn MonsterDirectory) {
        match skill {
            SkillId::Blades => {
                if let Some(mut ring) = self.blades.take() {
                    ring.teardown();
                }
            }
            SkillId::ZeroTrust => {
                if let Some(mut ring) = self.lock_on.take() {
                    ring.teardown();
                    directory.set_slow_zone(None);
                }
            }
            SkillId::Phantom => {
                if let Some(mut coordinator) = self.phantoms.take() {
                    coordinator.teardown();
                    directory.set_taunt_target(None);
                }
            }
            _ => return,
        }
        debug!(skill = %skill, "defense entity torn down");
    }

    pub fn teardown_all(&mut self, directory: &mut dyn MonsterDirectory) {
        for skill in [SkillId::Blades, SkillId::ZeroTrust, SkillId::Phantom] {
            self.teardown(skill, directory);
        }
    }

    /// Push every entity's timestamps forward after a pause
    pub fn shift(&mut self, delta: Millis) {
        if let Some(ring) = self.blades.as_mut() {
            ring.shift(delta);
        }
        if let Some(ring) = self.lock_on.as_mut() {
            ring.shift(delta);
        }
        if let Some(coordinator) = self.phantoms.as_mut() {
            coordinator.shift(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{ArenaDirectory, SlowZone};
    use crate::geometry::Point;

    #[test]
    fn test_sync_creates_then_relevels() {
        let mut entities = DefenseEntities::new();
        entities.sync(SkillId::Blades, 3);
        entities.sync(SkillId::Blades, 10);
        assert_eq!(entities.blades.as_ref().unwrap().level(), 10);
        assert!(entities.is_active(SkillId::Blades));
        assert!(!entities.is_active(SkillId::Nova));

        entities.sync(SkillId::Nova, 3);
        assert!(entities.lock_on.is_none());
    }

    #[test]
    fn test_teardown_clears_published_state() {
        let mut arena = ArenaDirectory::new();
        arena.set_slow_zone(Some(SlowZone {
            center: Point::ORIGIN,
            radius: 100.0,
            multiplier: 0.5,
        }));
        arena.set_taunt_target(Some(Point::new(5.0, 5.0)));

        let mut entities = DefenseEntities::new();
        entities.sync(SkillId::ZeroTrust, 1);
        entities.sync(SkillId::Phantom, 1);
        entities.teardown_all(&mut arena);

        assert!(arena.slow_zone().is_none());
        assert!(arena.taunt_target().is_none());
        assert!(!entities.is_active(SkillId::ZeroTrust));
        assert!(!entities.is_active(SkillId::Phantom));
    }
}
