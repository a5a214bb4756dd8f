//! SkillLoadout - Skills the player currently has equipped

use super::SkillDefinition;
use crate::types::SkillId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An equipped skill and its level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSkill {
    pub definition: SkillDefinition,
    /// Always within [0, definition.max_level]
    level: u32,
}

impl PlayerSkill {
    pub fn new(definition: SkillDefinition, level: u32) -> Self {
        let level = level.min(definition.max_level);
        PlayerSkill { definition, level }
    }

    pub fn id(&self) -> SkillId {
        self.definition.id
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.definition.max_level
    }

    /// Raise the level by one; returns false at max level
    pub fn level_up(&mut self) -> bool {
        if self.is_max_level() {
            return false;
        }
        self.level += 1;
        true
    }

    /// Set the level, clamped to the definition's max
    pub fn set_level(&mut self, level: u32) {
        self.level = level.min(self.definition.max_level);
    }
}

/// Equipped skills, iterated in a stable order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillLoadout {
    skills: BTreeMap<SkillId, PlayerSkill>,
}

impl SkillLoadout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equip a skill; returns false if it was already equipped
    pub fn equip(&mut self, definition: SkillDefinition, level: u32) -> bool {
        let id = definition.id;
        if self.skills.contains_key(&id) {
            return false;
        }
        self.skills.insert(id, PlayerSkill::new(definition, level));
        true
    }

    pub fn unequip(&mut self, id: SkillId) -> Option<PlayerSkill> {
        self.skills.remove(&id)
    }

    /// Level up an equipped skill, returning the new level
    pub fn level_up(&mut self, id: SkillId) -> Option<u32> {
        let skill = self.skills.get_mut(&id)?;
        skill.level_up();
        Some(skill.level())
    }

    pub fn get(&self, id: SkillId) -> Option<&PlayerSkill> {
        self.skills.get(&id)
    }

    pub fn get_mut(&mut self, id: SkillId) -> Option<&mut PlayerSkill> {
        self.skills.get_mut(&id)
    }

    pub fn level(&self, id: SkillId) -> Option<u32> {
        self.skills.get(&id).map(|s| s.level())
    }

    pub fn contains(&self, id: SkillId) -> bool {
        self.skills.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerSkill> {
        self.skills.values()
    }

    /// Equipped skills resolved through hit tests
    pub fn attack_skills(&self) -> Vec<SkillId> {
        self.skills
            .keys()
            .copied()
            .filter(|id| id.is_attack())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn clear(&mut self) {
        self.skills.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def(id: SkillId, max_level: u32) -> SkillDefinition {
        let mut d = SkillDefinition::new(id, "test", 1000);
        d.max_level = max_level;
        d
    }

    #[test]
    fn test_level_is_clamped() {
        let skill = PlayerSkill::new(def(SkillId::Nova, 5), 9);
        assert_eq!(skill.level(), 5);
        assert!(skill.is_max_level());
    }

    #[test]
    fn test_level_up_stops_at_max() {
        let mut loadout = SkillLoadout::new();
        loadout.equip(def(SkillId::Nova, 2), 1);

        assert_eq!(loadout.level_up(SkillId::Nova), Some(2));
        assert_eq!(loadout.level_up(SkillId::Nova), Some(2));
        assert_eq!(loadout.level_up(SkillId::Beam), None);
    }

    #[test]
    fn test_equip_twice_is_rejected() {
        let mut loadout = SkillLoadout::new();
        assert!(loadout.equip(def(SkillId::Slash, 10), 0));
        assert!(!loadout.equip(def(SkillId::Slash, 10), 3));
        assert_eq!(loadout.level(SkillId::Slash), Some(0));
    }

    #[test]
    fn test_attack_skills_filter() {
        let mut loadout = SkillLoadout::new();
        loadout.equip(def(SkillId::Shield, 10), 1);
        loadout.equip(def(SkillId::Beam, 10), 1);
        loadout.equip(def(SkillId::Slash, 10), 1);
        loadout.equip(def(SkillId::Blades, 10), 1);

        assert_eq!(loadout.attack_skills(), vec![SkillId::Slash, SkillId::Beam]);
    }
}
