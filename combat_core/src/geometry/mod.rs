//! Geometry - points, angles and hit tests

mod angle;
mod point;
mod shape;

pub use angle::{angle_between, angle_in_sector, circular_mean, sector_bounds, wrap_angle};
pub use hit_test::{in_capsule, in_circle, in_sector};
pub use point::Point;
pub use shape::Shape;
