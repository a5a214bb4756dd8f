//! Core types shared across the combat core

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host clock timestamp / duration in milliseconds
pub type Millis = u64;

/// Identifier of a hostile entity owned by the monster directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId(id)
    }
}

/// Every skill the player can equip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillId {
    /// Forward sector sweep
    Slash,
    /// Circle burst around the caster
    Nova,
    /// Capsule beam along the facing direction
    Beam,
    /// Expanding rings ticked over time
    Wave,
    /// Absorb shield with reflect
    Shield,
    /// Orbiting blade ring
    Blades,
    /// Lock-on turret ring
    ZeroTrust,
    /// Decoy clones
    Phantom,
}

impl SkillId {
    /// Get all skill ids
    pub fn all() -> &'static [SkillId] {
        &[
            SkillId::Slash,
            SkillId::Nova,
            SkillId::Beam,
            SkillId::Wave,
            SkillId::Shield,
            SkillId::Blades,
            SkillId::ZeroTrust,
            SkillId::Phantom,
        ]
    }

    /// Skills resolved through a geometric hit test when they come off cooldown
    pub fn attack_skills() -> &'static [SkillId] {
        &[SkillId::Slash, SkillId::Nova, SkillId::Beam, SkillId::Wave]
    }

    pub fn is_attack(self) -> bool {
        Self::attack_skills().contains(&self)
    }

    /// Skills whose behaviour lives in an autonomous defense entity
    pub fn is_autonomous(self) -> bool {
        matches!(self, SkillId::Blades | SkillId::ZeroTrust | SkillId::Phantom)
    }

    pub fn key(self) -> &'static str {
        match self {
            SkillId::Slash => "slash",
            SkillId::Nova => "nova",
            SkillId::Beam => "beam",
            SkillId::Wave => "wave",
            SkillId::Shield => "shield",
            SkillId::Blades => "blades",
            SkillId::ZeroTrust => "zero_trust",
            SkillId::Phantom => "phantom",
        }
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// 0xRRGGBB color tag carried to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const SHADOW: Color = Color(0x3a1458);

    pub fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xff) as u8,
            ((self.0 >> 8) & 0xff) as u8,
            (self.0 & 0xff) as u8,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_id_serde_names() {
        let json = serde_json::to_string(&SkillId::ZeroTrust).unwrap();
        assert_eq!(json, "\"zero_trust\"");

        let parsed: SkillId = serde_json::from_str("\"phantom\"").unwrap();
        assert_eq!(parsed, SkillId::Phantom);
    }

    #[test]
    fn test_attack_and_autonomous_are_disjoint() {
        for id in SkillId::all() {
            assert!(!(id.is_attack() && id.is_autonomous()), "{} is both", id);
        }
        assert!(!SkillId::Shield.is_attack());
        assert!(!SkillId::Shield.is_autonomous());
    }

    #[test]
    fn test_color_channels() {
        assert_eq!(Color(0x12ab34).rgb(), (0x12, 0xab, 0x34));
    }
}
