//! combat_sim - Headless host loop for combat_core
//!
//! Spawns walking hostiles into an `ArenaDirectory`, advances a fixed-step
//! clock, injects host pauses and applies contact hits through the
//! session's mitigation pipeline.

pub mod config;
pub mod simulation;

pub use config::{default_scenario, LoadoutEntry, PauseWindow, ScenarioConfig};
pub use simulation::{RunSummary, Simulation, SkillTotals};
