//! Incoming damage - dodge, defense, shield, reflect, HP and revive

mod pipeline;
mod result;

pub use pipeline::{dispatch_orders, resolve_incoming_hit, resolve_incoming_hit_with_rng, IncomingHit};
pub use result::{MitigationResult, ReflectOrder, ShadowOrder};
