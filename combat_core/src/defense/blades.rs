//! Orbiting blade ring
//!
//! Blades share one orbit angle that advances a fixed step per fire. Every
//! hit feeds on the shield: below the pivot level a hit costs shield, past
//! it a hit restores shield. Recasting the shield launches the orbiting
//! blades as homing projectiles and the ring reforms after a delay.

use crate::combat::CombatWorld;
use crate::config::{BladeConstants, CombatConstants};
use crate::damage::{roll_damage, DamageRoll};
use crate::directory::HostileView;
use crate::feedback::HitFeedback;
use crate::geometry::{in_sector, Point, Shape};
use crate::player::{PlayerState, ShieldLink};
use crate::skill::SkillDefinition;
use crate::types::{EntityId, Millis, SkillId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::TAU;
use tracing::{debug, trace};

pub const MAX_BLADES: usize = 8;

/// Blades orbiting at `level`
pub fn blade_count(level: u32) -> usize {
    (3 + level as usize / 5).min(MAX_BLADES)
}

/// Shield change caused by one blade hit
///
/// Negative below the pivot level, positive past it.
pub fn shield_delta_per_hit(max_shield: f64, level: u32, constants: &BladeConstants) -> f64 {
    -max_shield * (constants.cost_pivot_level - level as f64) * constants.cost_step
}

/// A blade launched off the ring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetachedBlade {
    pub position: Point,
    /// Direction of travel in radians
    pub heading: f64,
    pub target: Option<EntityId>,
    pub launch: Point,
}

impl DetachedBlade {
    pub fn travelled(&self) -> f64 {
        self.launch.distance(self.position)
    }
}

/// Outcome of one fire or detached update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BladeVolley {
    pub hits: u32,
    pub crits: u32,
    pub damage: u64,
    pub exp: u64,
    pub kills: u32,
    /// Shield change requested through the link, before clamping
    pub shield_delta: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BladeRing {
    level: u32,
    orbit_angle: f64,
    /// Shared across orbiting and detached blades
    last_hit: HashMap<EntityId, Millis>,
    detached: Vec<DetachedBlade>,
    /// Orbit hidden until this time after a detach
    reform_at: Option<Millis>,
}

impl BladeRing {
    pub fn new(level: u32) -> Self {
        BladeRing {
            level,
            ..Default::default()
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    pub fn count(&self) -> usize {
        blade_count(self.level)
    }

    pub fn orbit_angle(&self) -> f64 {
        self.orbit_angle
    }

    pub fn detached(&self) -> &[DetachedBlade] {
        &self.detached
    }

    pub fn is_orbiting(&self, now: Millis) -> bool {
        self.reform_at.map_or(true, |at| now >= at)
    }

    /// World positions of the orbiting blades, evenly spaced
    pub fn positions(&self, center: Point, constants: &BladeConstants) -> Vec<Point> {
        let count = self.count();
        let spacing = TAU / count as f64;
        (0..count)
            .map(|i| center.offset(self.orbit_angle + spacing * i as f64, constants.orbit_radius))
            .collect()
    }

    fn can_hit(&self, id: EntityId, now: Millis, constants: &BladeConstants) -> bool {
        match self.last_hit.get(&id) {
            Some(at) => now.saturating_sub(*at) >= constants.rehit_interval_ms,
            None => true,
        }
    }

    /// Advance the orbit one step and hit everything touching a blade
    #[allow(clippy::too_many_arguments)]
    pub fn fire(
        &mut self,
        now: Millis,
        player: &PlayerState,
        shield: &mut dyn ShieldLink,
        definition: &SkillDefinition,
        constants: &CombatConstants,
        world: &mut CombatWorld<'_>,
        rng: &mut impl Rng,
    ) -> BladeVolley {
        let mut volley = BladeVolley::default();
        if !self.is_orbiting(now) {
            return volley;
        }
        self.reform_at = None;

        let consts = &constants.blades;
        self.orbit_angle = (self.orbit_angle + consts.angular_step_deg.to_radians()).rem_euclid(TAU);
        let blades = self.positions(player.position, consts);

        let mut struck: Vec<(EntityId, Point)> = Vec::new();
        for hostile in world.directory.entities() {
            if !self.can_hit(hostile.id, now, consts) {
                continue;
            }
            let touching = blades
                .iter()
                .find(|b| b.distance(hostile.position) <= consts.blade_radius + hostile.radius);
            if let Some(blade) = touching {
                struck.push((hostile.id, *blade));
            }
        }

        for (id, blade) in struck {
            self.strike(id, blade, now, player, shield, definition, constants, world, rng, &mut volley);
        }

        self.last_hit
            .retain(|_, at| now.saturating_sub(*at) < consts.rehit_interval_ms);

        if volley.hits > 0 {
            trace!(hits = volley.hits, shield_delta = volley.shield_delta, "blades fired");
        }
        volley
    }

    #[allow(clippy::too_many_arguments)]
    fn strike(
        &mut self,
        id: EntityId,
        blade: Point,
        now: Millis,
        player: &PlayerState,
        shield: &mut dyn ShieldLink,
        definition: &SkillDefinition,
        constants: &CombatConstants,
        world: &mut CombatWorld<'_>,
        rng: &mut impl Rng,
        volley: &mut BladeVolley,
    ) {
        let shield_percent = shield.shield_percent();
        let roll = DamageRoll::new(shield_percent, definition.crit_multiplier)
            .with_multiplier(1.0 + (1.0 - shield_percent) * 10.0);
        let damage = roll_damage(
            player,
            &constants.damage,
            definition.units_at(self.level),
            roll,
            rng,
        );

        let report = world.directory.damage(&[id], damage.amount());
        world.progression.add_exp(report.total_exp);
        self.last_hit.insert(id, now);

        let delta = shield_delta_per_hit(shield.max_shield(), self.level, &constants.blades);
        shield.adjust_shield(delta);

        volley.hits += 1;
        volley.crits += damage.is_crit as u32;
        volley.damage += damage.final_damage as u64;
        volley.exp += report.total_exp;
        volley.kills += report.kill_count;
        volley.shield_delta += delta;

        world.feedback.push(HitFeedback {
            skill: SkillId::Blades,
            position: blade,
            color: definition.color,
            shape: Shape::Circle {
                origin: blade,
                radius: constants.blades.blade_radius,
            },
            magnitude: damage.final_damage,
            is_crit: damage.is_crit,
        });
    }

    /// Launch every orbiting blade at the nearest unengaged hostile
    pub fn detach(&mut self, now: Millis, center: Point, hostiles: &[HostileView], constants: &BladeConstants) {
        if !self.is_orbiting(now) {
            return;
        }
        let launched_from = self.positions(center, constants);
        let mut engaged: Vec<EntityId> = self.detached.iter().filter_map(|b| b.target).collect();

        for position in launched_from {
            let target = hostiles
                .iter()
                .filter(|h| !engaged.contains(&h.id))
                .min_by(|a, b| {
                    a.position
                        .distance(position)
                        .total_cmp(&b.position.distance(position))
                });
            let (heading, target) = match target {
                Some(h) => {
                    engaged.push(h.id);
                    (position.angle_to(h.position), Some(h.id))
                }
                None => (center.angle_to(position), None),
            };
            self.detached.push(DetachedBlade {
                position,
                heading,
                target,
                launch: position,
            });
        }

        self.reform_at = Some(now + constants.reform_ms);
        debug!(count = self.detached.len(), "blades detached");
    }

    /// Move detached blades by `dt` and resolve their hits
    #[allow(clippy::too_many_arguments)]
    pub fn update_detached(
        &mut self,
        now: Millis,
        dt: Millis,
        player: &PlayerState,
        shield: &mut dyn ShieldLink,
        definition: &SkillDefinition,
        constants: &CombatConstants,
        world: &mut CombatWorld<'_>,
        rng: &mut impl Rng,
    ) -> BladeVolley {
        let mut volley = BladeVolley::default();
        if self.detached.is_empty() {
            return volley;
        }

        let consts = &constants.blades;
        let step = consts.detached_speed * dt as f64 / 1000.0;
        let retarget_half_angle = consts.retarget_half_angle_deg.to_radians();
        let mut blades = std::mem::take(&mut self.detached);

        for blade in &mut blades {
            let hostiles = world.directory.entities();

            if let Some(target) = blade.target.and_then(|id| hostiles.iter().find(|h| h.id == id)) {
                blade.heading = blade.position.angle_to(target.position);
            } else {
                blade.target = None;
            }
            blade.position = blade.position.offset(blade.heading, step);

            let hit = hostiles.iter().find(|h| {
                h.position.distance(blade.position) <= consts.blade_radius + h.radius
                    && self.can_hit(h.id, now, consts)
            });
            let Some(hit) = hit.copied() else {
                continue;
            };

            self.strike(hit.id, blade.position, now, player, shield, definition, constants, world, rng, &mut volley);

            // Re-target inside the forward cone, never the one just struck
            let next = hostiles
                .iter()
                .filter(|h| h.id != hit.id)
                .filter(|h| {
                    in_sector(
                        h.position,
                        h.radius,
                        blade.position,
                        blade.heading,
                        consts.detached_max_range,
                        retarget_half_angle,
                    )
                })
                .min_by(|a, b| {
                    a.position
                        .distance(blade.position)
                        .total_cmp(&b.position.distance(blade.position))
                });
            blade.target = next.map(|h| h.id);
        }

        blades.retain(|b| b.travelled() <= consts.detached_max_range);
        self.detached = blades;
        volley
    }

    /// Push timestamps forward after a pause
    pub fn shift(&mut self, delta: Millis) {
        for at in self.last_hit.values_mut() {
            *at = at.saturating_add(delta);
        }
        if let Some(at) = self.reform_at.as_mut() {
            *at = at.saturating_add(delta);
        }
    }

    pub fn teardown(&mut self) {
        self.last_hit.clear();
        self.detached.clear();
        self.reform_at = None;
    }
}
