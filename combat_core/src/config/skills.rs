//! Skill catalog loading

use super::ConfigError;
use crate::skill::{SkillCatalog, SkillDefinition};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for skill configurations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsConfig {
    #[serde(rename = "skills")]
    pub skills: Vec<SkillDefinition>,
}

/// Load the skill catalog from a TOML file
pub fn load_skill_configs(path: &Path) -> Result<SkillCatalog, ConfigError> {
    let config: SkillsConfig = super::load_toml(path)?;
    build_catalog(config)
}

/// Load the skill catalog from a TOML string
pub fn parse_skill_configs(content: &str) -> Result<SkillCatalog, ConfigError> {
    let config: SkillsConfig = super::parse_toml(content)?;
    build_catalog(config)
}

fn build_catalog(config: SkillsConfig) -> Result<SkillCatalog, ConfigError> {
    let mut catalog = SkillCatalog::new();
    for skill in config.skills {
        if catalog.get(skill.id).is_some() {
            return Err(ConfigError::ValidationError(format!(
                "skill '{}' defined twice",
                skill.id
            )));
        }
        catalog.insert(skill);
    }
    Ok(catalog)
}

/// Get the default skill catalog
pub fn default_skills() -> SkillCatalog {
    let toml = include_str!("../../config/skills.toml");
    parse_skill_configs(toml).unwrap_or_else(|e| {
        tracing::warn!("embedded skill catalog failed to load ({}), using builtin", e);
        SkillCatalog::builtin()
    })
}
