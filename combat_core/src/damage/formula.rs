//! Damage formula - turning skill units + player stats into a DamageResult

use super::DamageResult;
use crate::config::DamageConstants;
use crate::player::PlayerState;
use rand::Rng;

/// Crit and scaling parameters for one roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    /// Chance in [0, 1]
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    /// Caller-specific multiplier applied before the crit
    pub extra_multiplier: f64,
}

impl DamageRoll {
    pub fn new(crit_chance: f64, crit_multiplier: f64) -> Self {
        DamageRoll {
            crit_chance,
            crit_multiplier,
            extra_multiplier: 1.0,
        }
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.extra_multiplier = multiplier;
        self
    }
}

/// Damage of a single unit at the given player level
pub fn unit_damage(constants: &DamageConstants, player_level: u32) -> f64 {
    (constants.unit_base + constants.unit_per_level * player_level as f64).max(0.0)
}

/// Calculate outgoing damage using the player's own crit chance
pub fn compute_damage(
    player: &PlayerState,
    constants: &DamageConstants,
    base_units: f64,
    crit_multiplier: f64,
    rng: &mut impl Rng,
) -> DamageResult {
    let roll = DamageRoll::new(player.crit_chance(constants), crit_multiplier);
    roll_damage(player, constants, base_units, roll, rng)
}

/// Calculate outgoing damage with explicit crit parameters
///
/// Steps:
/// 1. units × unit damage at the player's level
/// 2. attack bonus from passives
/// 3. caller multiplier
/// 4. one crit roll
/// 5. floor to a non-negative integer
pub fn roll_damage(
    player: &PlayerState,
    constants: &DamageConstants,
    base_units: f64,
    roll: DamageRoll,
    rng: &mut impl Rng,
) -> DamageResult {
    let base = base_units.max(0.0) * unit_damage(constants, player.level);
    let scaled = base * player.passives.attack_multiplier() * roll.extra_multiplier.max(0.0);

    let crit_chance = roll.crit_chance.clamp(0.0, 1.0);
    let is_crit = crit_chance > 0.0 && rng.gen::<f64>() < crit_chance;

    let total = if is_crit {
        scaled * roll.crit_multiplier.max(1.0)
    } else {
        scaled
    };

    DamageResult::new(to_final_damage(total), is_crit)
}

/// Apply only the defense multiplier to incoming damage
///
/// Dodge is resolved by the mitigation pipeline before this is called.
pub fn compute_incoming_damage(player: &PlayerState, constants: &DamageConstants, raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 0.0;
    }
    let defense = player.passives.defense(constants.max_defense);
    raw * (1.0 - defense)
}

/// Average damage of one activation, crit included
pub fn expected_damage(
    player: &PlayerState,
    constants: &DamageConstants,
    base_units: f64,
    crit_multiplier: f64,
) -> f64 {
    let base = base_units.max(0.0)
        * unit_damage(constants, player.level)
        * player.passives.attack_multiplier();
    let crit_chance = player.crit_chance(constants);
    base * (1.0 + (crit_multiplier.max(1.0) - 1.0) * crit_chance)
}

fn to_final_damage(amount: f64) -> u32 {
    if !amount.is_finite() || amount <= 0.0 {
        return 0;
    }
    amount.floor().min(u32::MAX as f64) as u32
}
