//! Kinematic attribute bundle consumed by the steering behaviors.
//!
//! A [`MotionBody`] stores the scalar limits and current velocity of a
//! moving agent. It is embedded by value in
//! [`Agent`](crate::components::agent::Agent) rather than attached as its
//! own component: an agent without motion data cannot steer, so the bundle
//! is required at construction instead of silently attached on first use.
//!
//! Heading, speed, and the facing-derived side vector are computed, never
//! stored. Normalizing a zero velocity is always safe and yields the zero
//! vector.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Kinematic state and limits for a steering agent.
///
/// # Fields
/// - `mass` - Inertia used by the integrator (`a = F / m`)
/// - `max_force` - Upper bound on the magnitude of an applied steering force
/// - `max_speed` - Upper bound on velocity magnitude after integration
/// - `max_turn_rate` - Radians per second available to
///   [`Agent::turn_toward`](crate::components::agent::Agent::turn_toward)
/// - `velocity` - Current velocity in world units per second
///
/// Limits are not validated; negative or zero values are left to the
/// caller's judgement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionBody {
    /// Inertia used when converting force to acceleration.
    pub mass: f32,
    /// Maximum steering force magnitude the integrator will apply.
    pub max_force: f32,
    /// Maximum speed the integrator will allow.
    pub max_speed: f32,
    /// Maximum turn rate in radians per second.
    pub max_turn_rate: f32,
    /// Current velocity in world units per second.
    pub velocity: Vec2,
}

impl Default for MotionBody {
    fn default() -> Self {
        Self::new(1.0, 100.0, 50.0, std::f32::consts::PI)
    }
}

impl MotionBody {
    /// Create a bundle with the given limits and zero velocity.
    pub fn new(mass: f32, max_force: f32, max_speed: f32, max_turn_rate: f32) -> Self {
        Self {
            mass,
            max_force,
            max_speed,
            max_turn_rate,
            velocity: Vec2::ZERO,
        }
    }

    /// Current speed (velocity magnitude).
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Squared speed, cheaper when only comparing against thresholds.
    pub fn speed_sq(&self) -> f32 {
        self.velocity.length_squared()
    }

    /// Normalized direction of travel, or the zero vector when the agent
    /// is not moving.
    pub fn heading(&self) -> Vec2 {
        self.velocity.normalize_or_zero()
    }

    /// Whether the velocity is distinguishable from zero.
    pub fn is_moving(&self) -> bool {
        self.velocity.length_squared() > f32::EPSILON
    }
}
