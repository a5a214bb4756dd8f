//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::geometry::{Point, Shape};
pub use crate::types::{Color, EntityId, Millis, SkillId};

// Player and skills
pub use crate::player::{PassiveUpgrade, PlayerState, Shield, StatValue};
pub use crate::skill::{PlayerSkill, SkillCatalog, SkillDefinition, SkillLoadout};

// Combat
pub use crate::combat::{ActivationReport, CastKind, SkillCast};
pub use crate::damage::DamageResult;
pub use crate::mitigation::{IncomingHit, MitigationResult};

// Host interfaces
pub use crate::directory::{HostileView, MonsterDirectory, Progression};
pub use crate::feedback::HitFeedback;
pub use crate::session::{CombatSession, TickReport};

// Config
pub use crate::config::{default_skills, CombatConstants};
