//! Shape - a resolved effect area

use super::hit_test::{in_capsule, in_circle, in_sector};
use super::point::Point;
use serde::{Deserialize, Serialize};

/// An effect area in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Sector {
        origin: Point,
        facing: f64,
        radius: f64,
        half_angle: f64,
    },
    Circle {
        origin: Point,
        radius: f64,
    },
    Capsule {
        start: Point,
        end: Point,
        half_width: f64,
    },
}

impl Shape {
    /// Test a circular target against this shape
    pub fn contains(&self, target: Point, target_radius: f64) -> bool {
        match *self {
            Shape::Sector {
                origin,
                facing,
                radius,
                half_angle,
            } => in_sector(target, target_radius, origin, facing, radius, half_angle),
            Shape::Circle { origin, radius } => in_circle(target, target_radius, origin, radius),
            Shape::Capsule {
                start,
                end,
                half_width,
            } => in_capsule(target, target_radius, start, end, half_width),
        }
    }

    /// Anchor point used for feedback and knockback origin
    pub fn origin(&self) -> Point {
        match *self {
            Shape::Sector { origin, .. } | Shape::Circle { origin, .. } => origin,
            Shape::Capsule { start, .. } => start,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Sector { .. } => "sector",
            Shape::Circle { .. } => "circle",
            Shape::Capsule { .. } => "capsule",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_dispatch() {
        let circle = Shape::Circle {
            origin: Point::ORIGIN,
            radius: 10.0,
        };
        assert!(circle.contains(Point::new(12.0, 0.0), 3.0));
        assert!(!circle.contains(Point::new(14.0, 0.0), 3.0));

        let beam = Shape::Capsule {
            start: Point::ORIGIN,
            end: Point::new(0.0, 50.0),
            half_width: 4.0,
        };
        assert!(beam.contains(Point::new(2.0, 25.0), 0.0));
        assert_eq!(beam.origin(), Point::ORIGIN);
        assert_eq!(beam.kind_name(), "capsule");
    }
}
