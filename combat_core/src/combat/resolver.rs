//! Activation resolution
//!
//! 1. Build the effect area for the cast
//! 2. Hit-test every hostile in the directory
//! 3. Roll damage once and apply it to all targets
//! 4. Forward experience and apply the skill's side effect
//! 5. Roll follow-ups (burst, chain, wave rings) onto the timer queue

use super::{ActivationReport, CastKind, SkillCast};
use crate::config::{CombatConstants, ResolverConstants};
use crate::damage::compute_damage;
use crate::directory::{HostileView, MonsterDirectory, Progression};
use crate::feedback::{FeedbackBuffer, HitFeedback};
use crate::geometry::{wrap_angle, Point, Shape};
use crate::player::PlayerState;
use crate::schedule::TimerQueue;
use crate::skill::SkillDefinition;
use crate::types::{EntityId, Millis, SkillId};
use rand::Rng;
use tracing::{debug, trace, warn};

/// Mutable collaborators touched by a resolution
pub struct CombatWorld<'w> {
    pub directory: &'w mut dyn MonsterDirectory,
    pub progression: &'w mut dyn Progression,
    pub timers: &'w mut TimerQueue<SkillCast>,
    pub feedback: &'w mut FeedbackBuffer,
}

/// Effect area of `cast`, or None for skills without a targeting algorithm
pub fn cast_shape(
    cast: &SkillCast,
    definition: &SkillDefinition,
    constants: &ResolverConstants,
) -> Option<Shape> {
    let level = cast.level;
    match cast.skill {
        SkillId::Slash => Some(Shape::Sector {
            origin: cast.origin,
            facing: cast.facing,
            radius: definition.radius_at(level) * cast.radius_scale,
            half_angle: definition.half_angle(),
        }),
        SkillId::Nova => Some(Shape::Circle {
            origin: cast.origin,
            radius: definition.radius_at(level) * cast.radius_scale,
        }),
        SkillId::Beam => {
            let length = definition.radius_at(level) * cast.radius_scale;
            Some(Shape::Capsule {
                start: cast.origin,
                end: cast.origin.offset(cast.facing, length),
                half_width: definition.half_width_at(level) * cast.radius_scale,
            })
        }
        SkillId::Wave => {
            let ring = match cast.kind {
                CastKind::WaveRing { index } => index,
                _ => 0,
            };
            let radius = definition.radius_at(level) + constants.wave_radius_step * ring as f64;
            Some(Shape::Circle {
                origin: cast.origin,
                radius: radius * cast.radius_scale,
            })
        }
        SkillId::Shield | SkillId::Blades | SkillId::ZeroTrust | SkillId::Phantom => None,
    }
}

/// Ids of every hostile inside `shape`
pub fn select_targets(shape: &Shape, hostiles: &[HostileView]) -> Vec<EntityId> {
    hostiles
        .iter()
        .filter(|h| shape.contains(h.position, h.radius))
        .map(|h| h.id)
        .collect()
}

/// Resolve one cast against the directory
///
/// A cast that finds no targets has no effect at all: no damage, no
/// experience, no side effect, no feedback and no follow-ups.
pub fn resolve_activation(
    cast: &SkillCast,
    definition: &SkillDefinition,
    player: &PlayerState,
    constants: &CombatConstants,
    now: Millis,
    world: &mut CombatWorld<'_>,
    rng: &mut impl Rng,
) -> ActivationReport {
    let mut report = ActivationReport::new(cast.skill, cast.kind);

    let Some(shape) = cast_shape(cast, definition, &constants.resolver) else {
        warn!(skill = %cast.skill, "skill has no targeting algorithm, ignoring cast");
        return report;
    };

    let targets = select_targets(&shape, &world.directory.entities());
    if targets.is_empty() {
        trace!(skill = %cast.skill, kind = ?cast.kind, "cast found no targets");
        return report;
    }

    let units = definition.units_at(cast.level) * cast.damage_scale;
    let damage = compute_damage(
        player,
        &constants.damage,
        units,
        definition.crit_multiplier,
        rng,
    );

    let outcome = world.directory.damage(&targets, damage.amount());
    world.progression.add_exp(outcome.total_exp);
    apply_side_effect(cast, &targets, damage.amount(), &constants.resolver, world.directory);

    world.feedback.push(HitFeedback {
        skill: cast.skill,
        position: shape.origin(),
        color: definition.color,
        shape,
        magnitude: damage.final_damage,
        is_crit: damage.is_crit,
    });

    report.targets_hit = targets.len() as u32;
    report.damage = damage;
    report.exp = outcome.total_exp;
    report.kills = outcome.kill_count;

    if cast.can_spawn_follow_ups() {
        report.scheduled = schedule_follow_ups(
            cast,
            &outcome.killed_positions,
            &constants.resolver,
            now,
            world.timers,
            rng,
        );
    }
    report.killed_positions = outcome.killed_positions;

    debug!(
        skill = %cast.skill,
        kind = ?cast.kind,
        targets = report.targets_hit,
        damage = damage.final_damage,
        crit = damage.is_crit,
        kills = report.kills,
        "cast resolved"
    );
    report
}

fn apply_side_effect(
    cast: &SkillCast,
    targets: &[EntityId],
    damage: f64,
    constants: &ResolverConstants,
    directory: &mut dyn MonsterDirectory,
) {
    match cast.skill {
        SkillId::Slash => directory.knockback(targets, cast.origin, constants.knockback_distance),
        SkillId::Nova => directory.burn(
            targets,
            constants.burn_ms,
            damage * constants.burn_tick_fraction,
        ),
        SkillId::Wave => directory.stun(targets, constants.stun_ms),
        _ => {}
    }
}

/// Roll and queue follow-ups, returning how many were queued
fn schedule_follow_ups(
    cast: &SkillCast,
    killed_positions: &[Point],
    constants: &ResolverConstants,
    now: Millis,
    timers: &mut TimerQueue<SkillCast>,
    rng: &mut impl Rng,
) -> u32 {
    let mut scheduled = 0;
    match cast.skill {
        SkillId::Nova if cast.level >= constants.burst_min_level => {
            let chance = (cast.level as f64 * constants.burst_chance_per_level).clamp(0.0, 1.0);
            for position in killed_positions {
                if rng.gen::<f64>() < chance {
                    let burst =
                        cast.follow_up(CastKind::Burst, *position, cast.facing, constants.burst_radius_scale);
                    timers.schedule(now + constants.burst_delay_ms, cast.skill, burst);
                    scheduled += 1;
                }
            }
        }
        SkillId::Beam if cast.level >= constants.chain_min_level => {
            let chance = (cast.level as f64 * constants.chain_chance_per_level).clamp(0.0, 1.0);
            let offset = constants.chain_angle_offset_deg.to_radians();
            for position in killed_positions {
                if rng.gen::<f64>() < chance {
                    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
                    let facing = wrap_angle(cast.facing + sign * offset);
                    let chain =
                        cast.follow_up(CastKind::Chain, *position, facing, constants.chain_length_scale);
                    timers.schedule(now + constants.chain_delay_ms, cast.skill, chain);
                    scheduled += 1;
                }
            }
        }
        SkillId::Wave => {
            let rings = wave_count(cast.level, constants.max_waves);
            for index in 1..rings {
                let ring = cast.follow_up(CastKind::WaveRing { index }, cast.origin, cast.facing, 1.0);
                timers.schedule(
                    now + constants.wave_interval_ms * index as Millis,
                    cast.skill,
                    ring,
                );
                scheduled += 1;
            }
        }
        _ => {}
    }
    scheduled
}

/// Rings emitted by a Wave at `level`
pub(crate) fn wave_count(level: u32, max_waves: u32) -> u32 {
    (1 + level / 5).min(max_waves.max(1))
}
