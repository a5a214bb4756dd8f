//! SkillDefinition - Immutable skill configuration
//! Loaded from TOML configuration

use crate::types::{Color, Millis, SkillId};
use serde::{Deserialize, Serialize};

/// Describes how a skill scales with its level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Unique skill identifier
    pub id: SkillId,
    /// Display name
    pub name: String,
    /// Base cooldown before reductions
    pub cooldown_ms: Millis,
    #[serde(default = "default_max_level")]
    pub max_level: u32,

    // === Damage ===
    /// Damage units at level 0
    #[serde(default)]
    pub units_base: f64,
    /// Damage units gained per level
    #[serde(default)]
    pub units_per_level: f64,
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,

    // === Area ===
    /// Radius (sector/circle) or length (beam)
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub radius_per_level: f64,
    /// Sector half-angle in degrees
    #[serde(default)]
    pub half_angle_deg: f64,
    /// Beam half-width
    #[serde(default)]
    pub half_width: f64,
    #[serde(default)]
    pub half_width_per_level: f64,

    // === Shield ===
    #[serde(default)]
    pub shield_base: f64,
    #[serde(default)]
    pub shield_per_level: f64,
    /// Damage reflected to each attacker per level
    #[serde(default)]
    pub reflect_per_level: f64,

    // === Cooldown scaling ===
    /// Base cooldown lost per skill level (only a few skills use this)
    #[serde(default)]
    pub cooldown_step_per_level_ms: Millis,
    /// Floor for the level-scaled base cooldown
    #[serde(default)]
    pub min_cooldown_ms: Millis,

    /// Presentation tint
    #[serde(default)]
    pub color: Color,
}

fn default_max_level() -> u32 {
    30
}

fn default_crit_multiplier() -> f64 {
    2.0
}

impl SkillDefinition {
    /// Minimal definition with every scaling field zeroed
    pub fn new(id: SkillId, name: &str, cooldown_ms: Millis) -> Self {
        SkillDefinition {
            id,
            name: name.to_string(),
            cooldown_ms,
            max_level: default_max_level(),
            units_base: 0.0,
            units_per_level: 0.0,
            crit_multiplier: default_crit_multiplier(),
            radius: 0.0,
            radius_per_level: 0.0,
            half_angle_deg: 0.0,
            half_width: 0.0,
            half_width_per_level: 0.0,
            shield_base: 0.0,
            shield_per_level: 0.0,
            reflect_per_level: 0.0,
            cooldown_step_per_level_ms: 0,
            min_cooldown_ms: 0,
            color: Color::WHITE,
        }
    }

    /// Damage units at the given level
    pub fn units_at(&self, level: u32) -> f64 {
        self.units_base + self.units_per_level * level as f64
    }

    /// Radius (or beam length) at the given level
    pub fn radius_at(&self, level: u32) -> f64 {
        self.radius + self.radius_per_level * level as f64
    }

    pub fn half_width_at(&self, level: u32) -> f64 {
        self.half_width + self.half_width_per_level * level as f64
    }

    /// Sector half-angle in radians
    pub fn half_angle(&self) -> f64 {
        self.half_angle_deg.to_radians()
    }

    pub fn shield_at(&self, level: u32) -> f64 {
        self.shield_base + self.shield_per_level * level as f64
    }

    pub fn reflect_at(&self, level: u32) -> f64 {
        self.reflect_per_level * level as f64
    }

    /// Base cooldown after this skill's own per-level scaling
    pub fn base_cooldown_at(&self, level: u32) -> Millis {
        if self.cooldown_step_per_level_ms == 0 {
            return self.cooldown_ms;
        }
        let reduction = self.cooldown_step_per_level_ms.saturating_mul(level as Millis);
        self.cooldown_ms
            .saturating_sub(reduction)
            .max(self.min_cooldown_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_scaling() {
        let mut def = SkillDefinition::new(SkillId::Slash, "Slash", 800);
        def.units_base = 2.0;
        def.units_per_level = 1.0;
        def.radius = 100.0;
        def.radius_per_level = 2.0;

        assert!((def.units_at(0) - 2.0).abs() < f64::EPSILON);
        assert!((def.units_at(5) - 7.0).abs() < f64::EPSILON);
        assert!((def.radius_at(10) - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cooldown_step_respects_floor() {
        let mut def = SkillDefinition::new(SkillId::Slash, "Slash", 800);
        def.cooldown_step_per_level_ms = 20;
        def.min_cooldown_ms = 400;

        assert_eq!(def.base_cooldown_at(0), 800);
        assert_eq!(def.base_cooldown_at(10), 600);
        assert_eq!(def.base_cooldown_at(30), 400);
    }

    #[test]
    fn test_cooldown_without_step_is_flat() {
        let def = SkillDefinition::new(SkillId::Nova, "Nova", 1500);
        assert_eq!(def.base_cooldown_at(25), 1500);
    }
}
