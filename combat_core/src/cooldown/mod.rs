//! Cooldown scheduling - last activation per skill, shifted across pauses

mod scheduler;

pub use scheduler::{CooldownReset, CooldownScheduler};
