//! Vector and angle helpers shared by the steering and movement code.
//!
//! All positions, velocities, and forces in the crate are [`glam::Vec2`]
//! values in world units. Angles are radians, kept in the canonical
//! (−π, π] range by [`wrap_angle`] whenever they are written.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Wrap an angle in radians into the canonical (−π, π] range.
///
/// Safe for any finite input, including angles many turns away from the
/// range.
pub fn wrap_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(TAU);
    if a > PI { a - TAU } else { a }
}

/// Unit vector pointing along `angle` (radians, x-axis = 0).
pub fn vec_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Perpendicular of `v`, rotated 90° counter-clockwise.
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Clamp the magnitude of `v` to at most `max`.
///
/// A zero or negative `max` yields the zero vector. The zero vector is
/// returned unchanged (no normalization of degenerate input).
pub fn truncate(v: Vec2, max: f32) -> Vec2 {
    if max <= 0.0 {
        return Vec2::ZERO;
    }
    if v.length_squared() > max * max {
        v.normalize_or_zero() * max
    } else {
        v
    }
}
