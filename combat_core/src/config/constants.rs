//! Tunable combat constants

use super::ConfigError;
use crate::types::{Millis, SkillId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable combat constants
///
/// Every section falls back to its defaults when omitted from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConstants {
    pub player: PlayerConstants,
    pub damage: DamageConstants,
    pub cooldown: CooldownConstants,
    pub mitigation: MitigationConstants,
    pub resolver: ResolverConstants,
    pub blades: BladeConstants,
    pub lock_on: LockOnConstants,
    pub phantom: PhantomConstants,
}

impl CombatConstants {
    /// Load constants from a TOML file and validate them
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let constants: CombatConstants = super::load_toml(path)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Parse constants from a TOML string and validate them
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let constants: CombatConstants = super::parse_toml(content)?;
        constants.validate()?;
        Ok(constants)
    }

    /// Reject values that would stall timers or break invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, msg: &str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::ValidationError(msg.to_string()))
            }
        }

        check(self.player.base_max_hp > 0.0, "player.base_max_hp must be positive")?;
        check(self.damage.unit_base >= 0.0, "damage.unit_base must not be negative")?;
        check(
            (0.0..1.0).contains(&self.damage.max_defense),
            "damage.max_defense must be in [0, 1)",
        )?;
        check(
            (0.0..1.0).contains(&self.cooldown.max_reduction),
            "cooldown.max_reduction must be in [0, 1)",
        )?;
        check(
            (0.0..=1.0).contains(&self.mitigation.max_dodge),
            "mitigation.max_dodge must be in [0, 1]",
        )?;
        check(self.resolver.wave_interval_ms > 0, "resolver.wave_interval_ms must be positive")?;
        check(self.blades.rehit_interval_ms > 0, "blades.rehit_interval_ms must be positive")?;
        check(self.lock_on.escalation_ms > 0, "lock_on.escalation_ms must be positive")?;
        check(
            self.lock_on.damage_interval_ms > 0,
            "lock_on.damage_interval_ms must be positive",
        )?;
        check(self.phantom.cast_interval_ms > 0, "phantom.cast_interval_ms must be positive")?;
        check(
            self.phantom.taunt_duration_ms <= self.phantom.taunt_cycle_ms,
            "phantom.taunt_duration_ms must not exceed taunt_cycle_ms",
        )?;
        check(
            self.phantom.min_leash <= self.phantom.max_leash,
            "phantom.min_leash must not exceed max_leash",
        )?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConstants {
    /// Max HP at level 1
    pub base_max_hp: f64,
    /// Max HP gained per player level
    pub max_hp_per_level: f64,
    /// Movement speed in world units per second
    pub move_speed: f64,
}

impl Default for PlayerConstants {
    fn default() -> Self {
        PlayerConstants {
            base_max_hp: 200.0,
            max_hp_per_level: 10.0,
            move_speed: 160.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageConstants {
    /// Damage of one unit at player level 0
    #[serde(default = "default_unit_base")]
    pub unit_base: f64,
    /// Damage added to one unit per player level
    #[serde(default = "default_unit_per_level")]
    pub unit_per_level: f64,
    /// Crit chance before level and passives (0.05 = 5%)
    #[serde(default = "default_base_crit_chance")]
    pub base_crit_chance: f64,
    /// Crit chance gained per player level
    #[serde(default = "default_crit_per_level")]
    pub crit_per_level: f64,
    /// Crit multiplier when a caller does not supply its own
    #[serde(default = "default_crit_multiplier")]
    pub crit_multiplier: f64,
    /// Highest damage reduction the defense passive may reach
    #[serde(default = "default_max_defense")]
    pub max_defense: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            unit_base: default_unit_base(),
            unit_per_level: default_unit_per_level(),
            base_crit_chance: default_base_crit_chance(),
            crit_per_level: default_crit_per_level(),
            crit_multiplier: default_crit_multiplier(),
            max_defense: default_max_defense(),
        }
    }
}

fn default_unit_base() -> f64 {
    10.0
}
fn default_unit_per_level() -> f64 {
    1.0
}
fn default_base_crit_chance() -> f64 {
    0.05
}
fn default_crit_per_level() -> f64 {
    0.005
}
fn default_crit_multiplier() -> f64 {
    2.0
}
fn default_max_defense() -> f64 {
    0.75
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CooldownConstants {
    /// Cap on the cooldown reduction passive (0.6 = 60%)
    pub max_reduction: f64,
}

impl Default for CooldownConstants {
    fn default() -> Self {
        CooldownConstants { max_reduction: 0.6 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MitigationConstants {
    /// Cap on the dodge passive
    pub max_dodge: f64,
    /// How long the HUD keeps showing pre-hit HP
    pub hp_display_delay_ms: Millis,
    /// Fraction of the remaining gap closed per display update
    pub hp_display_rate: f64,
    /// Radius of the shadow released by a revive
    pub revive_shadow_radius: f64,
    /// Knockback applied to attackers by a max-tier reflect
    pub reflect_knockback: f64,
}

impl Default for MitigationConstants {
    fn default() -> Self {
        MitigationConstants {
            max_dodge: 0.6,
            hp_display_delay_ms: 500,
            hp_display_rate: 0.25,
            revive_shadow_radius: 400.0,
            reflect_knockback: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConstants {
    /// Nova level from which kills may burst
    pub burst_min_level: u32,
    /// Burst chance per Nova level, per kill
    pub burst_chance_per_level: f64,
    /// Radius scale of a burst relative to the Nova
    pub burst_radius_scale: f64,
    pub burst_delay_ms: Millis,
    /// Beam level from which kills may chain
    pub chain_min_level: u32,
    /// Chain chance per Beam level, per kill
    pub chain_chance_per_level: f64,
    /// Angle between the original beam and the chained one
    pub chain_angle_offset_deg: f64,
    /// Length scale of a chained beam
    pub chain_length_scale: f64,
    pub chain_delay_ms: Millis,
    pub wave_interval_ms: Millis,
    pub max_waves: u32,
    /// Radius added by each successive wave ring
    pub wave_radius_step: f64,
    pub knockback_distance: f64,
    pub stun_ms: Millis,
    pub burn_ms: Millis,
    /// Burn tick damage as a fraction of the hit
    pub burn_tick_fraction: f64,
    /// Radius and damage scale of abridged casts
    pub abridged_scale: f64,
}

impl Default for ResolverConstants {
    fn default() -> Self {
        ResolverConstants {
            burst_min_level: 5,
            burst_chance_per_level: 0.02,
            burst_radius_scale: 0.6,
            burst_delay_ms: 300,
            chain_min_level: 5,
            chain_chance_per_level: 0.02,
            chain_angle_offset_deg: 30.0,
            chain_length_scale: 0.7,
            chain_delay_ms: 200,
            wave_interval_ms: 250,
            max_waves: 4,
            wave_radius_step: 40.0,
            knockback_distance: 40.0,
            stun_ms: 600,
            burn_ms: 2000,
            burn_tick_fraction: 0.2,
            abridged_scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BladeConstants {
    /// Distance of the blades from the player
    pub orbit_radius: f64,
    /// Hit radius of one blade
    pub blade_radius: f64,
    /// Orbit advance per activation, in degrees
    pub angular_step_deg: f64,
    /// Minimum time between two hits on the same target
    pub rehit_interval_ms: Millis,
    /// Level at which the per-hit shield cost reaches zero
    pub cost_pivot_level: f64,
    /// Fraction of max shield per level below the pivot
    pub cost_step: f64,
    /// Detached blade speed in units per second
    pub detached_speed: f64,
    /// Distance from the launch point at which a detached blade is destroyed
    pub detached_max_range: f64,
    /// Half-angle of the forward cone used when re-targeting
    pub retarget_half_angle_deg: f64,
    /// Delay before the ring re-forms after its blades detach
    pub reform_ms: Millis,
}

impl Default for BladeConstants {
    fn default() -> Self {
        BladeConstants {
            orbit_radius: 70.0,
            blade_radius: 14.0,
            angular_step_deg: 24.0,
            rehit_interval_ms: 500,
            cost_pivot_level: 25.0,
            cost_step: 0.0008,
            detached_speed: 600.0,
            detached_max_range: 600.0,
            retarget_half_angle_deg: 45.0,
            reform_ms: 1500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockOnConstants {
    /// Acquisition radius around the player (also the slow zone radius)
    pub radius: f64,
    /// Distance of idle points from the player
    pub home_radius: f64,
    /// Lock time per multiplier step
    pub escalation_ms: Millis,
    pub damage_interval_ms: Millis,
    /// Area damage radius at multiplier 1
    pub damage_radius: f64,
    /// Fraction of the gap to the goal closed per tick
    pub follow_rate: f64,
    /// Movement speed multiplier imposed on hostiles in the slow zone
    pub slow_multiplier: f64,
    /// Skill whose cooldown a slow-zone kill may reset
    pub reset_skill: SkillId,
}

impl Default for LockOnConstants {
    fn default() -> Self {
        LockOnConstants {
            radius: 260.0,
            home_radius: 60.0,
            escalation_ms: 500,
            damage_interval_ms: 500,
            damage_radius: 30.0,
            follow_rate: 0.2,
            slow_multiplier: 0.7,
            reset_skill: SkillId::Nova,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhantomConstants {
    /// Radius around the player scanned for hostile density
    pub sense_radius: f64,
    /// Closest a movement target may be to the player
    pub min_leash: f64,
    /// Farthest a movement target may be from the player
    pub max_leash: f64,
    /// Phantom speed as a multiple of the player's movement speed
    pub speed_multiplier: f64,
    pub arrival_epsilon: f64,
    pub cast_interval_ms: Millis,
    pub taunt_cycle_ms: Millis,
    pub taunt_duration_ms: Millis,
}

impl Default for PhantomConstants {
    fn default() -> Self {
        PhantomConstants {
            sense_radius: 350.0,
            min_leash: 60.0,
            max_leash: 220.0,
            speed_multiplier: 4.0,
            arrival_epsilon: 4.0,
            cast_interval_ms: 1000,
            taunt_cycle_ms: 5000,
            taunt_duration_ms: 2000,
        }
    }
}
