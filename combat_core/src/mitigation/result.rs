//! MitigationResult - Outcome of one incoming hit

use crate::geometry::Point;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// Damage to send back to the attackers of a hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectOrder {
    pub targets: Vec<EntityId>,
    pub damage: f64,
    /// Knock the attackers back as well (max-level shield)
    pub knockback: bool,
}

/// Revive shockwave that removes nearby hostiles without rewards
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowOrder {
    pub center: Point,
    pub radius: f64,
}

/// Result of running a hit through the mitigation pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MitigationResult {
    // === Damage Breakdown ===
    pub raw: f64,
    /// After defense
    pub mitigated: f64,
    /// Taken by the shield
    pub absorbed: f64,
    /// Reached HP
    pub remaining: f64,

    // === State Changes ===
    pub shield_before: f64,
    pub shield_after: f64,
    pub hp_before: f64,
    pub hp_after: f64,

    // === Orders for the directory ===
    pub reflect: Option<ReflectOrder>,
    pub shadow: Option<ShadowOrder>,

    // === Flags ===
    /// The hit was fully negated
    pub dodged: bool,
    /// The player was already out of the run
    pub ignored: bool,
    pub revived: bool,
    pub game_over: bool,
}

impl MitigationResult {
    pub fn new(raw: f64) -> Self {
        MitigationResult {
            raw,
            ..Default::default()
        }
    }

    /// Damage prevented by defense
    pub fn reduced_by_defense(&self) -> f64 {
        (self.raw - self.mitigated).max(0.0)
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        if self.ignored {
            return "Ignored (game over)".to_string();
        }
        if self.dodged {
            return "Dodged".to_string();
        }

        let mut parts = Vec::new();

        if self.remaining > 0.0 {
            parts.push(format!("{:.0} damage taken", self.remaining));
        }

        if self.absorbed > 0.0 {
            parts.push(format!("{:.0} absorbed by shield", self.absorbed));
        }

        if self.reduced_by_defense() > 0.0 {
            parts.push(format!("{:.0} reduced by defense", self.reduced_by_defense()));
        }

        if let Some(reflect) = &self.reflect {
            parts.push(format!(
                "{:.0} reflected to {}",
                reflect.damage,
                reflect.targets.len()
            ));
        }

        if self.revived {
            parts.push("REVIVED".to_string());
        }

        if self.game_over {
            parts.push("GAME OVER".to_string());
        }

        if parts.is_empty() {
            "No damage".to_string()
        } else {
            parts.join(", ")
        }
    }
}
