//! PlayerState - HP, shield, passives and revive state of the player

mod hp_display;
mod passive;
mod shield;
mod stat_value;

pub use hp_display::HpDisplay;
pub use passive::{PassiveStats, PassiveUpgrade};
pub use shield::{Shield, ShieldLink};
pub use stat_value::StatValue;

use crate::config::{DamageConstants, PlayerConstants};
use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Complete combat state of the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    // === Progression ===
    pub level: u32,

    // === Placement ===
    pub position: Point,
    /// Facing angle in radians
    pub facing: f64,

    // === Resources ===
    pub hp: f64,
    pub max_hp: f64,
    pub shield: Shield,

    // === Modifiers ===
    pub passives: PassiveStats,

    // === Run state ===
    /// The one-time revive has been consumed
    pub revive_used: bool,
    /// Terminal state for the run
    pub game_over: bool,

    /// HUD value that trails `hp`
    pub hp_display: HpDisplay,
}

impl PlayerState {
    /// Create a level 1 player with `max_hp`
    pub fn new(max_hp: f64) -> Self {
        let max_hp = max_hp.max(1.0);
        PlayerState {
            level: 1,
            position: Point::ORIGIN,
            facing: 0.0,
            hp: max_hp,
            max_hp,
            shield: Shield::default(),
            passives: PassiveStats::new(),
            revive_used: false,
            game_over: false,
            hp_display: HpDisplay::new(max_hp),
        }
    }

    /// Create a player at `level` using the configured HP curve
    pub fn from_constants(constants: &PlayerConstants, level: u32) -> Self {
        let mut player = Self::new(constants.base_max_hp);
        player.set_level(constants, level);
        player.hp = player.max_hp;
        player.hp_display.snap(player.max_hp);
        player
    }

    /// Change level; max HP follows and current HP keeps its missing amount
    pub fn set_level(&mut self, constants: &PlayerConstants, level: u32) {
        let level = level.max(1);
        let new_max = constants.base_max_hp + constants.max_hp_per_level * (level - 1) as f64;
        let gained = new_max - self.max_hp;
        self.level = level;
        self.max_hp = new_max.max(1.0);
        self.hp = (self.hp + gained).clamp(0.0, self.max_hp);
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0 && !self.game_over
    }

    pub fn hp_percent(&self) -> f64 {
        (self.hp / self.max_hp).clamp(0.0, 1.0)
    }

    /// Revive granted and not yet consumed
    pub fn revive_available(&self) -> bool {
        self.passives.has_revive && !self.revive_used
    }

    /// Crit chance from level and passives, clamped to [0, 1]
    pub fn crit_chance(&self, constants: &DamageConstants) -> f64 {
        let chance = constants.base_crit_chance
            + constants.crit_per_level * self.level as f64
            + self.passives.crit_chance.compute();
        chance.clamp(0.0, 1.0)
    }

    /// Heal, clamped to max HP
    pub fn heal(&mut self, amount: f64) {
        if amount <= 0.0 || self.game_over {
            return;
        }
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::from_constants(&PlayerConstants::default(), 1)
    }
}
