//! Damage system - outgoing formula and incoming defense

mod formula;
mod result;

pub use formula::{
    compute_damage, compute_incoming_damage, expected_damage, roll_damage, unit_damage, DamageRoll,
};
pub use result::DamageResult;
