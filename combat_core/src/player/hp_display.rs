//! Delayed HP value shown by the HUD
//!
//! After a hit the displayed value holds at the pre-hit HP for a short delay
//! and then eases toward the real HP, snapping once it is close enough.

use crate::types::Millis;
use serde::{Deserialize, Serialize};

/// Gap below which the display snaps to the real value
const SNAP_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HpDisplay {
    displayed: f64,
    hold_until: Millis,
}

impl HpDisplay {
    pub fn new(hp: f64) -> Self {
        HpDisplay {
            displayed: hp,
            hold_until: 0,
        }
    }

    pub fn displayed(&self) -> f64 {
        self.displayed
    }

    /// Freeze the displayed value until `now + delay`
    pub fn hold(&mut self, now: Millis, delay: Millis) {
        self.hold_until = now.saturating_add(delay);
    }

    /// Ease toward `actual` once the hold has elapsed
    pub fn update(&mut self, now: Millis, actual: f64, rate: f64) {
        if now < self.hold_until {
            return;
        }
        let gap = actual - self.displayed;
        if gap.abs() <= SNAP_THRESHOLD {
            self.displayed = actual;
        } else {
            self.displayed += gap * rate.clamp(0.0, 1.0);
        }
    }

    /// Push a pending hold forward after a pause
    pub fn shift(&mut self, delta: Millis) {
        if self.hold_until > 0 {
            self.hold_until = self.hold_until.saturating_add(delta);
        }
    }

    /// Jump straight to `hp`, dropping any hold
    pub fn snap(&mut self, hp: f64) {
        self.displayed = hp;
        self.hold_until = 0;
    }
}
