//! Delayed consequences - explicit timer list drained by the session tick

mod timer;

pub use timer::{TimerEntry, TimerQueue};
