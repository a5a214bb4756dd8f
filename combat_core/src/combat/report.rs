//! ActivationReport - outcome of one resolved cast

use super::CastKind;
use crate::damage::DamageResult;
use crate::geometry::Point;
use crate::types::SkillId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationReport {
    pub skill: SkillId,
    pub kind: CastKind,
    /// Targets inside the effect area
    pub targets_hit: u32,
    /// Damage applied to each target
    pub damage: DamageResult,
    pub exp: u64,
    pub kills: u32,
    pub killed_positions: Vec<Point>,
    /// Follow-ups placed on the timer queue
    pub scheduled: u32,
}

impl ActivationReport {
    pub fn new(skill: SkillId, kind: CastKind) -> Self {
        ActivationReport {
            skill,
            kind,
            targets_hit: 0,
            damage: DamageResult::default(),
            exp: 0,
            kills: 0,
            killed_positions: Vec::new(),
            scheduled: 0,
        }
    }

    /// The cast found at least one target
    pub fn hit_anything(&self) -> bool {
        self.targets_hit > 0
    }

    /// Total damage across all targets
    pub fn total_damage(&self) -> u64 {
        self.damage.final_damage as u64 * self.targets_hit as u64
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if !self.hit_anything() {
            return format!("{}: no targets", self.skill);
        }

        let mut parts = vec![format!(
            "{}: {} x{}",
            self.skill, self.damage.final_damage, self.targets_hit
        )];

        if self.damage.is_crit {
            parts.push("CRIT".to_string());
        }

        if self.kills > 0 {
            parts.push(format!("{} killed (+{} exp)", self.kills, self.exp));
        }

        if self.scheduled > 0 {
            parts.push(format!("{} follow-ups", self.scheduled));
        }

        parts.join(", ")
    }
}
