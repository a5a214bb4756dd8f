//! Angle helpers

use std::f64::consts::{PI, TAU};

/// Wrap an angle into (-π, π]
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Absolute shortest angular distance between two angles
pub fn angle_between(a: f64, b: f64) -> f64 {
    wrap_angle(a - b).abs()
}

/// Weighted circular mean of `(angle, weight)` pairs
///
/// Returns `None` when the weights cancel out (empty input or opposing
/// directions of equal weight).
pub fn circular_mean(samples: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let (sx, sy) = samples
        .into_iter()
        .fold((0.0, 0.0), |(sx, sy), (angle, weight)| {
            (sx + angle.cos() * weight, sy + angle.sin() * weight)
        });

    if sx.hypot(sy) < 1e-9 {
        None
    } else {
        Some(sy.atan2(sx))
    }
}

/// Start angle and width of sector `index` out of `count` equal sectors
///
/// Sectors are laid out counter-clockwise from angle 0.
pub fn sector_bounds(index: usize, count: usize) -> (f64, f64) {
    let count = count.max(1);
    let width = TAU / count as f64;
    (index as f64 * width, width)
}

/// Whether `angle` lies within the sector starting at `start` spanning `width`
pub fn angle_in_sector(angle: f64, start: f64, width: f64) -> bool {
    if width >= TAU {
        return true;
    }
    let rel = (angle - start).rem_euclid(TAU);
    rel <= width
}
