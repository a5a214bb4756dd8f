//! Shield - absorb pool with reflect

use serde::{Deserialize, Serialize};

/// Absorb shield
///
/// `0 <= current <= max` holds after every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shield {
    pub current: f64,
    pub max: f64,
    /// Damage reflected to each attacker of a hit
    pub reflect_damage: f64,
    /// Reflect also knocks attackers back
    #[serde(default)]
    pub knockback: bool,
}

impl Shield {
    pub fn new(max: f64, reflect_damage: f64) -> Self {
        let max = max.max(0.0);
        Shield {
            current: max,
            max,
            reflect_damage: reflect_damage.max(0.0),
            knockback: false,
        }
    }

    pub fn with_knockback(mut self, knockback: bool) -> Self {
        self.knockback = knockback;
        self
    }

    /// Re-cast: refill to the new max (not additive)
    pub fn recast(&mut self, max: f64, reflect_damage: f64, knockback: bool) {
        *self = Shield::new(max, reflect_damage).with_knockback(knockback);
    }

    /// Absorb up to `amount`, returning how much was absorbed
    pub fn absorb(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 || self.current <= 0.0 {
            return 0.0;
        }
        let absorbed = amount.min(self.current);
        self.current = (self.current - absorbed).max(0.0);
        absorbed
    }

    /// Current as a fraction of max, 0 when there is no shield
    pub fn percent(&self) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }

    /// Add (or remove, for negative `delta`) shield, clamped to [0, max]
    pub fn adjust(&mut self, delta: f64) {
        self.current = (self.current + delta).clamp(0.0, self.max);
    }

    pub fn is_active(&self) -> bool {
        self.current > 0.0
    }

    pub fn clear(&mut self) {
        *self = Shield::default();
    }
}

/// Shield access handed to subsystems that read or spend shield
pub trait ShieldLink {
    /// Current shield as a fraction of max
    fn shield_percent(&self) -> f64;

    fn max_shield(&self) -> f64;

    /// Apply a signed change, clamped by the implementor
    fn adjust_shield(&mut self, delta: f64);
}

impl ShieldLink for Shield {
    fn shield_percent(&self) -> f64 {
        self.percent()
    }

    fn max_shield(&self) -> f64 {
        self.max
    }

    fn adjust_shield(&mut self, delta: f64) {
        self.adjust(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_partial() {
        let mut shield = Shield::new(30.0, 0.0);
        let absorbed = shield.absorb(50.0);
        assert!((absorbed - 30.0).abs() < f64::EPSILON);
        assert!((shield.current - 0.0).abs() < f64::EPSILON);
        assert!(!shield.is_active());
    }

    #[test]
    fn test_recast_resets_not_adds() {
        let mut shield = Shield::new(100.0, 5.0);
        shield.absorb(40.0);
        shield.recast(100.0, 5.0, false);
        assert!((shield.current - 100.0).abs() < f64::EPSILON);
        shield.recast(80.0, 5.0, true);
        assert!(shield.knockback);
        assert!((shield.current - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_adjust_clamps() {
        let mut shield = Shield::new(50.0, 0.0);
        shield.adjust(25.0);
        assert!((shield.current - 50.0).abs() < f64::EPSILON);
        shield.adjust(-80.0);
        assert!((shield.current - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_percent_without_shield() {
        assert!((Shield::default().percent() - 0.0).abs() < f64::EPSILON);
        let mut shield = Shield::new(200.0, 0.0);
        shield.absorb(50.0);
        assert!((shield.percent() - 0.75).abs() < f64::EPSILON);
    }
}
