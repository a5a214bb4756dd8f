//! Skills - definitions, catalog and the equipped loadout

mod catalog;
mod definition;
mod loadout;

pub use catalog::SkillCatalog;
pub use definition::SkillDefinition;
pub use loadout::{PlayerSkill, SkillLoadout};
