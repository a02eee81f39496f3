//! Fundamental geometric and simulation types.

use serde::{Deserialize, Serialize};

/// 2D point/vector in battlefield space (distance units, +y toward the
/// player's baseline).
pub type Vec2 = glam::DVec2;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each `step`).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one variable-length tick.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}

/// Bearing from one point to another in radians (`atan2` convention:
/// 0 = +x, counter-clockwise positive).
pub fn bearing(from: Vec2, to: Vec2) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Unit vector pointing along a bearing.
pub fn heading_vec(angle: f64) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Wrap an angle into (-PI, PI].
pub fn normalize_angle(mut a: f64) -> f64 {
    use std::f64::consts::PI;
    while a > PI {
        a -= 2.0 * PI;
    }
    while a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Rotate `current` toward `target` by at most `max_step` radians along the
/// shortest arc. Returns `target` once within `max_step`.
pub fn rotate_toward(current: f64, target: f64, max_step: f64) -> f64 {
    let diff = normalize_angle(target - current);
    if diff.abs() < max_step {
        target
    } else {
        current + diff.signum() * max_step
    }
}
