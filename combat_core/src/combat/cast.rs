//! SkillCast - everything needed to resolve one activation

use crate::geometry::Point;
use crate::types::SkillId;
use serde::{Deserialize, Serialize};

/// Why a cast is being resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CastKind {
    /// Came off cooldown
    Primary,
    /// Reduced Nova at a kill position
    Burst,
    /// Offset Beam from a kill position
    Chain,
    /// Follow-up ring of a Wave, 1-based
    WaveRing { index: u32 },
    /// Scaled-down cast made by a phantom
    Abridged,
}

/// A resolved-or-pending skill activation
///
/// Doubles as the timer payload for delayed follow-ups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCast {
    pub skill: SkillId,
    /// Skill level captured when the cast was created
    pub level: u32,
    pub origin: Point,
    /// Facing in radians
    pub facing: f64,
    /// 0 for direct casts, 1 for follow-ups (which never schedule more)
    pub depth: u8,
    pub radius_scale: f64,
    pub damage_scale: f64,
    pub kind: CastKind,
}

impl SkillCast {
    pub fn primary(skill: SkillId, level: u32, origin: Point, facing: f64) -> Self {
        SkillCast {
            skill,
            level,
            origin,
            facing,
            depth: 0,
            radius_scale: 1.0,
            damage_scale: 1.0,
            kind: CastKind::Primary,
        }
    }

    /// Phantom cast: radius and damage both scaled, never spawns follow-ups
    pub fn abridged(skill: SkillId, level: u32, origin: Point, facing: f64, scale: f64) -> Self {
        let scale = scale.max(0.0);
        SkillCast {
            depth: 1,
            radius_scale: scale,
            damage_scale: scale,
            kind: CastKind::Abridged,
            ..Self::primary(skill, level, origin, facing)
        }
    }

    /// Follow-up of this cast
    pub fn follow_up(&self, kind: CastKind, origin: Point, facing: f64, radius_scale: f64) -> Self {
        SkillCast {
            skill: self.skill,
            level: self.level,
            origin,
            facing,
            depth: 1,
            radius_scale,
            damage_scale: self.damage_scale,
            kind,
        }
    }

    /// Whether this cast may schedule follow-ups
    pub fn can_spawn_follow_ups(&self) -> bool {
        self.depth == 0 && self.kind == CastKind::Primary
    }
}
