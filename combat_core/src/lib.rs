//! combat_core - Combat resolution core for a top-down action game
//!
//! This library provides:
//! - Geometry: sector, circle and capsule hit tests
//! - Damage: the unit damage formula and crit rolls
//! - CooldownScheduler: per-skill readiness with pause shifting
//! - Resolver: skill activations with burst, chain and wave follow-ups
//! - Mitigation: dodge, defense, shield, reflect, HP, revive
//! - Defense entities: orbit blades, the lock-on ring and phantom decoys
//! - CombatSession: the host-facing facade tying it together

pub mod combat;
pub mod config;
pub mod cooldown;
pub mod damage;
pub mod defense;
pub mod directory;
pub mod feedback;
pub mod geometry;
pub mod mitigation;
pub mod player;
pub mod prelude;
pub mod schedule;
pub mod session;
pub mod skill;
pub mod types;

// Re-export core types for convenience
pub use combat::{resolve_activation, ActivationReport, CastKind, CombatWorld, SkillCast};
pub use config::{default_skills, CombatConstants, ConfigError};
pub use cooldown::{CooldownReset, CooldownScheduler};
pub use damage::{compute_damage, compute_incoming_damage, DamageResult};
pub use defense::{BladeRing, DefenseEntities, LockOnRing, PhantomCoordinator};
pub use directory::{ArenaDirectory, ExpLedger, HostileView, MonsterDirectory, Progression};
pub use feedback::{FeedbackBuffer, HitFeedback};
pub use geometry::{Point, Shape};
pub use mitigation::{resolve_incoming_hit, IncomingHit, MitigationResult};
pub use player::{PassiveUpgrade, PlayerState, Shield};
pub use session::{CombatSession, TickReport};
pub use skill::{SkillCatalog, SkillDefinition, SkillLoadout};
pub use types::{Color, EntityId, Millis, SkillId};
