//! Mitigation pipeline - Apply an incoming hit to PlayerState

use super::result::{MitigationResult, ReflectOrder, ShadowOrder};
use crate::config::CombatConstants;
use crate::damage::compute_incoming_damage;
use crate::directory::{MonsterDirectory, Progression};
use crate::geometry::Point;
use crate::player::PlayerState;
use crate::types::{EntityId, Millis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Damage arriving at the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingHit {
    pub raw: f64,
    /// Hostiles responsible for the hit, reflect targets
    pub attackers: Vec<EntityId>,
    pub at: Millis,
}

impl IncomingHit {
    pub fn new(raw: f64, at: Millis) -> Self {
        IncomingHit {
            raw,
            attackers: Vec::new(),
            at,
        }
    }

    pub fn from_attackers(raw: f64, at: Millis, attackers: Vec<EntityId>) -> Self {
        IncomingHit { raw, attackers, at }
    }
}

/// Resolve an incoming hit against the player (immutable API)
///
/// Returns the new player state and the mitigation result. Steps:
/// 1. Dodge roll, a dodge leaves everything untouched
/// 2. Defense multiplier
/// 3. Shield absorbs first
/// 4. Reflect order for the attackers
/// 5. Remainder to HP
/// 6. Revive or game over at 0 HP
pub fn resolve_incoming_hit(
    player: &PlayerState,
    hit: &IncomingHit,
    constants: &CombatConstants,
) -> (PlayerState, MitigationResult) {
    let mut rng = rand::thread_rng();
    resolve_incoming_hit_with_rng(player, hit, constants, &mut rng)
}

/// Resolve an incoming hit with a provided RNG (for deterministic testing)
pub fn resolve_incoming_hit_with_rng(
    player: &PlayerState,
    hit: &IncomingHit,
    constants: &CombatConstants,
    rng: &mut impl Rng,
) -> (PlayerState, MitigationResult) {
    let mut new_player = player.clone();
    let mut result = MitigationResult::new(hit.raw.max(0.0));

    result.hp_before = new_player.hp;
    result.shield_before = new_player.shield.current;
    result.hp_after = new_player.hp;
    result.shield_after = new_player.shield.current;

    if new_player.game_over {
        result.ignored = true;
        result.game_over = true;
        return (new_player, result);
    }

    // Step 1: Dodge
    let dodge_chance = new_player
        .passives
        .dodge_chance(constants.mitigation.max_dodge);
    if dodge_chance > 0.0 && rng.gen::<f64>() < dodge_chance {
        result.dodged = true;
        return (new_player, result);
    }

    // Step 2: Defense
    let mitigated = compute_incoming_damage(&new_player, &constants.damage, hit.raw);
    result.mitigated = mitigated;

    // Step 3: Shield
    let absorbed = new_player.shield.absorb(mitigated);
    result.absorbed = absorbed;
    result.remaining = (mitigated - absorbed).max(0.0);
    result.shield_after = new_player.shield.current;

    // Step 4: Reflect
    if new_player.shield.reflect_damage > 0.0 && !hit.attackers.is_empty() {
        result.reflect = Some(ReflectOrder {
            targets: hit.attackers.clone(),
            damage: new_player.shield.reflect_damage,
            knockback: new_player.shield.knockback,
        });
    }

    // Step 5: HP
    if result.remaining > 0.0 {
        new_player.hp = (new_player.hp - result.remaining).max(0.0);
        new_player
            .hp_display
            .hold(hit.at, constants.mitigation.hp_display_delay_ms);
    }

    // Step 6: Death
    if new_player.hp <= 0.0 {
        if new_player.revive_available() {
            new_player.revive_used = true;
            new_player.hp = new_player.max_hp;
            result.revived = true;
            result.shadow = Some(ShadowOrder {
                center: new_player.position,
                radius: constants.mitigation.revive_shadow_radius,
            });
            info!("player revived");
        } else {
            new_player.game_over = true;
            result.game_over = true;
            info!(raw = hit.raw, "player defeated");
        }
    }

    result.hp_after = new_player.hp;
    (new_player, result)
}

/// Send the reflect and revive orders of `result` to the directory
///
/// Called after the new player state has been committed.
pub fn dispatch_orders(
    result: &MitigationResult,
    player_position: Point,
    constants: &CombatConstants,
    directory: &mut dyn MonsterDirectory,
    progression: &mut dyn Progression,
) {
    if let Some(reflect) = &result.reflect {
        let report = directory.damage(&reflect.targets, reflect.damage);
        progression.add_exp(report.total_exp);
        if reflect.knockback {
            directory.knockback(
                &reflect.targets,
                player_position,
                constants.mitigation.reflect_knockback,
            );
        }
        debug!(
            targets = reflect.targets.len(),
            damage = reflect.damage,
            kills = report.kill_count,
            "damage reflected"
        );
    }

    if let Some(shadow) = &result.shadow {
        let caught: Vec<EntityId> = directory
            .entities()
            .into_iter()
            .filter(|h| h.position.distance(shadow.center) - h.radius <= shadow.radius)
            .map(|h| h.id)
            .collect();
        debug!(count = caught.len(), "revive shadow defeats hostiles");
        directory.defeat_without_reward(&caught);
    }
}
