//! Point - 2D world-space position/vector

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};

/// A position or displacement in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Unit vector pointing along `angle` (radians, 0 = +x)
    pub fn from_angle(angle: f64) -> Self {
        Point {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    /// Point at `distance` from `self` along `angle`
    pub fn offset(self, angle: f64, distance: f64) -> Self {
        self + Point::from_angle(angle) * distance
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Angle of the vector from `self` to `other`
    pub fn angle_to(self, other: Point) -> f64 {
        let d = other - self;
        d.y.atan2(d.x)
    }

    /// Normalized copy, or zero for a zero vector
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            Point::ORIGIN
        } else {
            Point::new(self.x / len, self.y / len)
        }
    }

    /// Step from `self` toward `target` by at most `max_step`
    ///
    /// Returns the new position and whether `target` was reached.
    pub fn move_towards(self, target: Point, max_step: f64) -> (Point, bool) {
        let delta = target - self;
        let dist = delta.length();
        if dist <= max_step || dist == 0.0 {
            (target, true)
        } else {
            (self + delta * (max_step / dist), false)
        }
    }

    /// Linear interpolation, `t` clamped to [0, 1]
    pub fn lerp(self, target: Point, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        self + (target - self) * t
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}
