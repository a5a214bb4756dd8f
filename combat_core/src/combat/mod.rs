//! Combat resolution - one skill activation from hit test to side effects

mod cast;
mod report;
mod resolver;

pub use cast::{CastKind, SkillCast};
pub use report::ActivationReport;
pub use resolver::{cast_shape, resolve_activation, select_targets, CombatWorld};
