//! Scenario configuration for a simulated run

use combat_core::config::{load_toml, parse_toml, ConfigError};
use combat_core::{Millis, PassiveUpgrade, SkillId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A host pause (menu, level-up screen) injected into the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseWindow {
    pub at_ms: Millis,
    pub length_ms: Millis,
}

/// One equipped skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutEntry {
    pub skill: SkillId,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub duration_ms: Millis,
    /// Fixed host frame length
    pub step_ms: Millis,
    pub player_level: u32,
    /// Contact radius of the player body
    pub player_radius: f64,

    pub spawn_interval_ms: Millis,
    /// Hostiles appear on a circle of this radius around the player
    pub spawn_distance: f64,
    pub hostile_radius: f64,
    pub hostile_hp: f64,
    /// Extra HP per spawned hostile
    pub hostile_hp_growth: f64,
    pub hostile_speed: f64,
    pub hostile_exp: u64,
    pub max_hostiles: usize,

    /// Raw damage of one contact hit
    pub contact_damage: f64,
    /// Minimum time between contact hits from the same hostile
    pub contact_interval_ms: Millis,

    /// Experience per player level; every level also levels up one skill
    pub exp_per_level: u64,

    pub loadout: Vec<LoadoutEntry>,
    pub passives: Vec<PassiveUpgrade>,
    pub pauses: Vec<PauseWindow>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        ScenarioConfig {
            duration_ms: 60_000,
            step_ms: 16,
            player_level: 1,
            player_radius: 16.0,
            spawn_interval_ms: 700,
            spawn_distance: 420.0,
            hostile_radius: 12.0,
            hostile_hp: 30.0,
            hostile_hp_growth: 0.5,
            hostile_speed: 70.0,
            hostile_exp: 4,
            max_hostiles: 80,
            contact_damage: 12.0,
            contact_interval_ms: 800,
            exp_per_level: 120,
            loadout: vec![
                LoadoutEntry { skill: SkillId::Slash, level: 1 },
                LoadoutEntry { skill: SkillId::Nova, level: 1 },
                LoadoutEntry { skill: SkillId::Shield, level: 1 },
                LoadoutEntry { skill: SkillId::Blades, level: 1 },
            ],
            passives: Vec::new(),
            pauses: vec![PauseWindow { at_ms: 20_000, length_ms: 5_000 }],
        }
    }
}

impl ScenarioConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: ScenarioConfig = load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig = parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_ms == 0 {
            return Err(ConfigError::ValidationError("step_ms must be positive".to_string()));
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "spawn_interval_ms must be positive".to_string(),
            ));
        }
        if self.exp_per_level == 0 {
            return Err(ConfigError::ValidationError("exp_per_level must be positive".to_string()));
        }
        Ok(())
    }

    /// Pause windows ordered by start time
    pub fn sorted_pauses(&self) -> Vec<PauseWindow> {
        let mut pauses = self.pauses.clone();
        pauses.sort_by_key(|p| p.at_ms);
        pauses
    }
}

/// Get the default scenario
pub fn default_scenario() -> ScenarioConfig {
    let toml = include_str!("../config/scenario.toml");
    ScenarioConfig::parse(toml).unwrap_or_else(|e| {
        tracing::warn!("embedded scenario failed to load ({}), using defaults", e);
        ScenarioConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_scenario() {
        let toml = r#"
duration_ms = 5000

[[loadout]]
skill = "wave"
level = 3

[[passives]]
type = "defense"
value = 0.2

[[pauses]]
at_ms = 1000
length_ms = 250
"#;
        let config = ScenarioConfig::parse(toml).unwrap();
        assert_eq!(config.duration_ms, 5000);
        assert_eq!(config.step_ms, 16);
        assert_eq!(config.loadout, vec![LoadoutEntry { skill: SkillId::Wave, level: 3 }]);
        assert_eq!(config.passives, vec![PassiveUpgrade::Defense(0.2)]);
        assert_eq!(config.pauses.len(), 1);
    }

    #[test]
    fn test_zero_step_rejected() {
        assert!(ScenarioConfig::parse("step_ms = 0").is_err());
    }

    #[test]
    fn test_embedded_scenario_loads() {
        let toml = include_str!("../config/scenario.toml");
        assert!(ScenarioConfig::parse(toml).is_ok());
    }
}
