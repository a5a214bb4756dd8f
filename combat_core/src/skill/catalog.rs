//! SkillCatalog - Static lookup of skill definitions

use super::SkillDefinition;
use crate::types::{Color, SkillId};
use std::collections::HashMap;

/// Skill definitions keyed by id
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    definitions: HashMap<SkillId, SkillDefinition>,
}

impl SkillCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        SkillCatalog {
            definitions: HashMap::new(),
        }
    }

    /// Register a definition, replacing any previous one with the same id
    pub fn insert(&mut self, definition: SkillDefinition) {
        self.definitions.insert(definition.id, definition);
    }

    pub fn get(&self, id: SkillId) -> Option<&SkillDefinition> {
        self.definitions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.definitions.values()
    }

    /// Hardcoded catalog used when the embedded TOML cannot be read
    pub fn builtin() -> Self {
        let mut catalog = Self::new();

        let mut slash = SkillDefinition::new(SkillId::Slash, "Crescent Slash", 800);
        slash.cooldown_step_per_level_ms = 20;
        slash.min_cooldown_ms = 300;
        slash.units_base = 2.0;
        slash.units_per_level = 1.0;
        slash.radius = 110.0;
        slash.radius_per_level = 2.0;
        slash.half_angle_deg = 35.0;
        slash.color = Color(0xff5544);
        catalog.insert(slash);

        let mut nova = SkillDefinition::new(SkillId::Nova, "Ember Nova", 1500);
        nova.units_base = 3.0;
        nova.units_per_level = 0.8;
        nova.crit_multiplier = 1.5;
        nova.radius = 120.0;
        nova.radius_per_level = 3.0;
        nova.color = Color(0x66ccff);
        catalog.insert(nova);

        let mut beam = SkillDefinition::new(SkillId::Beam, "Piercing Beam", 1200);
        beam.units_base = 4.0;
        beam.units_per_level = 1.2;
        beam.crit_multiplier = 2.5;
        beam.radius = 320.0;
        beam.radius_per_level = 5.0;
        beam.half_width = 12.0;
        beam.half_width_per_level = 0.3;
        beam.color = Color(0xffee55);
        catalog.insert(beam);

        let mut wave = SkillDefinition::new(SkillId::Wave, "Shock Wave", 3000);
        wave.units_base = 2.0;
        wave.units_per_level = 0.5;
        wave.crit_multiplier = 1.5;
        wave.radius = 60.0;
        wave.radius_per_level = 1.0;
        wave.color = Color(0x55ffaa);
        catalog.insert(wave);

        let mut shield = SkillDefinition::new(SkillId::Shield, "Aegis", 8000);
        shield.max_level = 20;
        shield.shield_base = 60.0;
        shield.shield_per_level = 12.0;
        shield.reflect_per_level = 2.0;
        shield.color = Color(0x99aaff);
        catalog.insert(shield);

        let mut blades = SkillDefinition::new(SkillId::Blades, "Orbit Blades", 120);
        blades.units_base = 1.0;
        blades.units_per_level = 0.2;
        blades.color = Color(0xdddddd);
        catalog.insert(blades);

        let mut zero_trust = SkillDefinition::new(SkillId::ZeroTrust, "Zero Trust", 0);
        zero_trust.units_base = 1.5;
        zero_trust.units_per_level = 0.1;
        zero_trust.crit_multiplier = 1.5;
        zero_trust.color = Color(0xff2266);
        catalog.insert(zero_trust);

        let mut phantom = SkillDefinition::new(SkillId::Phantom, "Phantom Step", 0);
        phantom.color = Color(0x8844ff);
        catalog.insert(phantom);

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_skill() {
        let catalog = SkillCatalog::builtin();
        assert_eq!(catalog.len(), SkillId::all().len());
        for id in SkillId::all() {
            assert!(catalog.get(*id).is_some());
        }
    }

    #[test]
    fn test_insert_replaces() {
        let mut catalog = SkillCatalog::new();
        catalog.insert(SkillDefinition::new(SkillId::Nova, "A", 100));
        catalog.insert(SkillDefinition::new(SkillId::Nova, "B", 200));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(SkillId::Nova).unwrap().name, "B");
    }
}
