//! Steering behavior force computations.
//!
//! Stateless functions that compute a 2D steering force from an owner
//! [`Agent`]'s position and motion data plus target data. The functions
//! never touch velocity; the returned force is integrated by
//! [`movement`](crate::systems::movement::movement) (or whatever
//! integrator the host supplies). Seek and flee do carry one documented
//! side effect: they realign the owner's facing angle to its current
//! heading before computing.
//!
//! Targets that must themselves be moving agents (pursuit, evade,
//! interpose) are passed as [`Mover`] snapshots. Resolving a `Mover` from
//! an entity without an [`Agent`] component fails with
//! [`MissingMotion`](crate::error::AiError::MissingMotion), which makes
//! the "target must carry a physics bundle" precondition explicit at the
//! resolution boundary instead of attaching one behind the caller's back.
//!
//! Degenerate numerics are guarded throughout: zero-length directions
//! normalize to the zero vector and a zero closing speed yields a zero
//! look-ahead time rather than a division fault.

use bevy_ecs::prelude::Entity;
use glam::Vec2;

use crate::components::agent::Agent;

/// Distance under which seek returns no force, avoiding oscillation
/// around the target.
pub const SEEK_DEADZONE: f32 = 1.0;

/// Default distance under which arrive considers the target reached.
pub const ARRIVE_MIN_DISTANCE: f32 = 5.0;

/// Fixed tuning constant in the arrive deceleration formula
/// `desired_speed = distance / (deceleration * ARRIVE_DECEL_TUNING)`.
pub const ARRIVE_DECEL_TUNING: f32 = 0.3;

/// Default radius inside which evade reacts to a pursuer.
pub const EVADE_THREAT_DISTANCE: f32 = 200.0;

/// Heading dot-product threshold for the pursuit head-on shortcut
/// (roughly within 18° of directly opposing).
const HEAD_ON_DOT: f32 = -0.95;

/// Snapshot of another moving agent, taken once per frame before forces
/// are computed.
///
/// Existence of a `Mover` proves the party carries motion data; pursuit,
/// evade, and interpose take `&Mover` so that precondition is checked
/// where the snapshot is resolved, not inside the force math.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mover {
    /// World-space position.
    pub pos: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// The party's speed limit, used for interception estimates.
    pub max_speed: f32,
}

impl Mover {
    /// Current speed.
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Normalized direction of travel, zero vector when stationary.
    pub fn heading(&self) -> Vec2 {
        self.velocity.normalize_or_zero()
    }
}

/// The steering behavior an agent currently runs.
///
/// Behaviors that reference other parties do so by [`Entity`]; the
/// steering system resolves them to [`Mover`] snapshots each frame and
/// reports targets that cannot be resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum SteeringMode {
    /// No steering; force output stays zero.
    #[default]
    Idle,
    /// Head for a fixed position at full speed.
    Seek { target: Vec2 },
    /// Run from a position; engages only inside `panic_distance` when it
    /// is positive.
    Flee { target: Vec2, panic_distance: f32 },
    /// Head for a position, decelerating on approach.
    Arrive {
        target: Vec2,
        deceleration: f32,
        min_distance: f32,
    },
    /// Intercept a moving agent.
    Pursuit { evader: Entity },
    /// Escape a moving agent while it is inside `threat_distance`.
    Evade {
        pursuer: Entity,
        threat_distance: f32,
    },
    /// Position between two moving agents.
    Interpose { left: Entity, right: Entity },
}

/// Per-agent steering selection plus the latest computed force.
///
/// `force` is an output slot written by
/// [`steer_agents`](crate::systems::steering::steer_agents) and consumed
/// by the integrator; it is not accumulated across frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Steering {
    /// Active behavior.
    pub mode: SteeringMode,
    /// Force computed for the current frame.
    pub force: Vec2,
}

impl Steering {
    /// Idle selection with zero force.
    pub fn idle() -> Self {
        Self::default()
    }

    /// Seek a fixed position.
    pub fn seek(target: Vec2) -> Self {
        Self {
            mode: SteeringMode::Seek { target },
            force: Vec2::ZERO,
        }
    }

    /// Flee a position; `panic_distance` of zero means "always flee".
    pub fn flee(target: Vec2, panic_distance: f32) -> Self {
        Self {
            mode: SteeringMode::Flee {
                target,
                panic_distance,
            },
            force: Vec2::ZERO,
        }
    }

    /// Arrive at a position with the default deceleration and stop radius.
    pub fn arrive(target: Vec2) -> Self {
        Self {
            mode: SteeringMode::Arrive {
                target,
                deceleration: 1.0,
                min_distance: ARRIVE_MIN_DISTANCE,
            },
            force: Vec2::ZERO,
        }
    }

    /// Pursue a moving agent.
    pub fn pursuit(evader: Entity) -> Self {
        Self {
            mode: SteeringMode::Pursuit { evader },
            force: Vec2::ZERO,
        }
    }

    /// Evade a moving agent with the default threat radius.
    pub fn evade(pursuer: Entity) -> Self {
        Self {
            mode: SteeringMode::Evade {
                pursuer,
                threat_distance: EVADE_THREAT_DISTANCE,
            },
            force: Vec2::ZERO,
        }
    }

    /// Interpose between two moving agents.
    pub fn interpose(left: Entity, right: Entity) -> Self {
        Self {
            mode: SteeringMode::Interpose { left, right },
            force: Vec2::ZERO,
        }
    }
}

/// Force toward `target` at the owner's max speed.
///
/// Returns the zero vector inside the [`SEEK_DEADZONE`]. Side effect:
/// realigns the owner's facing to its current heading first.
pub fn seek(owner: &mut Agent, target: Vec2) -> Vec2 {
    owner.align_to_heading();
    let to_target = target - owner.pos;
    if to_target.length() < SEEK_DEADZONE {
        return Vec2::ZERO;
    }
    let desired = to_target.normalize_or_zero() * owner.body.max_speed;
    desired - owner.body.velocity
}

/// Force away from `target`.
///
/// With a positive `panic_distance`, only engages while the owner is
/// strictly inside that radius. Side effect: realigns the owner's facing
/// to its current heading first.
pub fn flee(owner: &mut Agent, target: Vec2, panic_distance: f32) -> Vec2 {
    owner.align_to_heading();
    if panic_distance > 0.0 {
        let dist_sq = owner.pos.distance_squared(target);
        if dist_sq >= panic_distance * panic_distance {
            return Vec2::ZERO;
        }
    }
    let desired = (owner.pos - target).normalize_or_zero() * owner.body.max_speed;
    desired - owner.body.velocity
}

/// Force toward `target` that decelerates with distance.
///
/// `desired_speed = min(max_speed, distance / (deceleration *
/// ARRIVE_DECEL_TUNING))`; returns the zero vector once within
/// `min_distance`.
pub fn arrive(owner: &mut Agent, target: Vec2, deceleration: f32, min_distance: f32) -> Vec2 {
    let to_target = target - owner.pos;
    let distance = to_target.length();
    if distance <= min_distance {
        return Vec2::ZERO;
    }
    let desired_speed = (distance / (deceleration * ARRIVE_DECEL_TUNING)).min(owner.body.max_speed);
    let desired = to_target / distance * desired_speed;
    desired - owner.body.velocity
}

/// Force intercepting a moving `evader`.
///
/// When the evader is roughly ahead and closing head-on, seeks its
/// current position directly; otherwise seeks its position extrapolated
/// over the look-ahead time `distance / (max_speed + evader_speed)`.
pub fn pursuit(owner: &mut Agent, evader: &Mover) -> Vec2 {
    let to_evader = evader.pos - owner.pos;
    let heading = owner.body.heading();
    let relative_heading = heading.dot(evader.heading());
    if to_evader.dot(heading) > 0.0 && relative_heading < HEAD_ON_DOT {
        return seek(owner, evader.pos);
    }
    let look_ahead = look_ahead_time(to_evader.length(), owner.body.max_speed + evader.speed());
    seek(owner, evader.pos + evader.velocity * look_ahead)
}

/// Force escaping a moving `pursuer`.
///
/// Returns the zero vector at or beyond `threat_distance`; otherwise
/// flees the pursuer's extrapolated position with `threat_distance` as
/// the panic radius.
pub fn evade(owner: &mut Agent, pursuer: &Mover, threat_distance: f32) -> Vec2 {
    let to_pursuer = pursuer.pos - owner.pos;
    if to_pursuer.length() >= threat_distance {
        return Vec2::ZERO;
    }
    let look_ahead = look_ahead_time(to_pursuer.length(), owner.body.max_speed + pursuer.speed());
    flee(owner, pursuer.pos + pursuer.velocity * look_ahead, threat_distance)
}

/// Force positioning the owner between `left` and `right`.
///
/// Both parties' positions are extrapolated over the time the owner
/// needs to reach their current midpoint; the owner arrives at the
/// refined midpoint.
pub fn interpose(owner: &mut Agent, left: &Mover, right: &Mover) -> Vec2 {
    let midpoint = (left.pos + right.pos) * 0.5;
    let time_to_mid = look_ahead_time(owner.pos.distance(midpoint), owner.body.max_speed);
    let left_ahead = left.pos + left.velocity * time_to_mid;
    let right_ahead = right.pos + right.velocity * time_to_mid;
    arrive(
        owner,
        (left_ahead + right_ahead) * 0.5,
        1.0,
        ARRIVE_MIN_DISTANCE,
    )
}

/// Interception time estimate; zero when the closing speed is degenerate.
fn look_ahead_time(distance: f32, closing_speed: f32) -> f32 {
    if closing_speed <= f32::EPSILON {
        0.0
    } else {
        distance / closing_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::motion::MotionBody;
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn vec_approx_eq(a: Vec2, b: Vec2) -> bool {
        approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
    }

    fn agent_at(x: f32, y: f32) -> Agent {
        // max_speed 10 keeps the expected numbers simple.
        Agent::new(Vec2::new(x, y), MotionBody::new(1.0, 100.0, 10.0, 6.0))
    }

    fn mover(pos: Vec2, velocity: Vec2) -> Mover {
        Mover {
            pos,
            velocity,
            max_speed: 10.0,
        }
    }

    // ==================== SEEK TESTS ====================

    #[test]
    fn test_seek_zero_inside_deadzone() {
        let mut owner = agent_at(0.0, 0.0);
        let force = seek(&mut owner, Vec2::new(0.5, 0.0));
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_seek_force_is_desired_minus_velocity() {
        let mut owner = agent_at(0.0, 0.0);
        owner.body.velocity = Vec2::new(2.0, 0.0);
        let force = seek(&mut owner, Vec2::new(100.0, 0.0));
        // desired = (1,0)*10, minus velocity (2,0) = (8,0)
        assert!(vec_approx_eq(force, Vec2::new(8.0, 0.0)));
    }

    #[test]
    fn test_seek_realigns_facing_to_heading() {
        let mut owner = agent_at(0.0, 0.0);
        owner.body.velocity = Vec2::new(0.0, 3.0);
        assert!(approx_eq(owner.angle(), 0.0));
        let _ = seek(&mut owner, Vec2::new(100.0, 0.0));
        // Facing snapped to the heading (straight up) before computing.
        assert!(approx_eq(owner.angle(), FRAC_PI_2));
    }

    // ==================== FLEE TESTS ====================

    #[test]
    fn test_flee_outside_panic_radius_is_zero() {
        let mut owner = agent_at(100.0, 0.0);
        let force = flee(&mut owner, Vec2::ZERO, 50.0);
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_flee_inside_panic_radius_pushes_away() {
        let mut owner = agent_at(10.0, 0.0);
        let force = flee(&mut owner, Vec2::ZERO, 50.0);
        // desired = (1,0)*10, velocity zero.
        assert!(vec_approx_eq(force, Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_flee_zero_panic_distance_always_engages() {
        let mut owner = agent_at(1000.0, 0.0);
        let force = flee(&mut owner, Vec2::ZERO, 0.0);
        assert!(force.length() > 0.0);
    }

    // ==================== ARRIVE TESTS ====================

    #[test]
    fn test_arrive_zero_within_min_distance() {
        let mut owner = agent_at(0.0, 0.0);
        let force = arrive(&mut owner, Vec2::new(3.0, 0.0), 1.0, 5.0);
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_arrive_decelerates_close_to_target() {
        let mut owner = agent_at(0.0, 0.0);
        // distance 6 / (2 * 0.3) = 10 -> exactly max_speed; at distance 2.4
        // with min_distance 1 the desired speed drops to 4.
        let force = arrive(&mut owner, Vec2::new(2.4, 0.0), 2.0, 1.0);
        assert!(vec_approx_eq(force, Vec2::new(4.0, 0.0)));
    }

    #[test]
    fn test_arrive_caps_at_max_speed_far_away() {
        let mut owner = agent_at(0.0, 0.0);
        let force = arrive(&mut owner, Vec2::new(1000.0, 0.0), 1.0, 5.0);
        assert!(vec_approx_eq(force, Vec2::new(10.0, 0.0)));
    }

    // ==================== PURSUIT TESTS ====================

    #[test]
    fn test_pursuit_head_on_takes_direct_branch() {
        let mut owner = agent_at(0.0, 0.0);
        owner.body.velocity = Vec2::new(5.0, 0.0); // heading (1, 0)
        // Evader ahead, moving straight at the owner: relative heading -1.
        let evader = mover(Vec2::new(50.0, 0.0), Vec2::new(-8.0, 0.0));

        let force = pursuit(&mut owner, &evader);

        let mut control = agent_at(0.0, 0.0);
        control.body.velocity = Vec2::new(5.0, 0.0);
        let direct = seek(&mut control, Vec2::new(50.0, 0.0));
        // Direct seek on the current position, not the extrapolated one.
        assert!(vec_approx_eq(force, direct));
    }

    #[test]
    fn test_pursuit_leads_a_crossing_target() {
        let mut owner = agent_at(0.0, 0.0);
        owner.body.velocity = Vec2::new(5.0, 0.0);
        // Evader ahead but moving sideways; pursuit must aim ahead of it.
        let evader = mover(Vec2::new(50.0, 0.0), Vec2::new(0.0, 8.0));

        let force = pursuit(&mut owner, &evader);

        let look_ahead = 50.0 / (10.0 + 8.0);
        let predicted = Vec2::new(50.0, 8.0 * look_ahead);
        let mut control = agent_at(0.0, 0.0);
        control.body.velocity = Vec2::new(5.0, 0.0);
        let expected = seek(&mut control, predicted);
        assert!(vec_approx_eq(force, expected));
    }

    #[test]
    fn test_pursuit_zero_closing_speed_does_not_fault() {
        let mut owner = agent_at(0.0, 0.0);
        owner.body.max_speed = 0.0;
        let evader = mover(Vec2::new(50.0, 0.0), Vec2::ZERO);
        let force = pursuit(&mut owner, &evader);
        // Look-ahead collapses to zero; seek on the current position with
        // max_speed 0 produces a finite (zero) force.
        assert!(force.x.is_finite() && force.y.is_finite());
    }

    // ==================== EVADE TESTS ====================

    #[test]
    fn test_evade_beyond_threat_distance_is_zero() {
        let mut owner = agent_at(0.0, 0.0);
        let pursuer = mover(Vec2::new(250.0, 0.0), Vec2::new(-5.0, 0.0));
        let force = evade(&mut owner, &pursuer, 200.0);
        assert_eq!(force, Vec2::ZERO);
    }

    #[test]
    fn test_evade_flees_predicted_position() {
        let mut owner = agent_at(0.0, 0.0);
        let pursuer = mover(Vec2::new(50.0, 0.0), Vec2::new(-5.0, 0.0));
        let force = evade(&mut owner, &pursuer, 200.0);
        // Pursuer approaches from +x; owner must push toward -x.
        assert!(force.x < 0.0);
        assert!(approx_eq(force.y, 0.0));
    }

    // ==================== INTERPOSE TESTS ====================

    #[test]
    fn test_interpose_heads_for_midpoint() {
        let mut owner = agent_at(0.0, 50.0);
        let left = mover(Vec2::new(-40.0, 0.0), Vec2::ZERO);
        let right = mover(Vec2::new(40.0, 0.0), Vec2::ZERO);
        let force = interpose(&mut owner, &left, &right);
        // Stationary parties: refined midpoint is the plain midpoint at
        // the origin, straight below the owner.
        assert!(approx_eq(force.x, 0.0));
        assert!(force.y < 0.0);
    }

    #[test]
    fn test_interpose_tracks_moving_parties() {
        let mut owner = agent_at(0.0, 30.0);
        let left = mover(Vec2::new(-40.0, 0.0), Vec2::new(10.0, 0.0));
        let right = mover(Vec2::new(40.0, 0.0), Vec2::new(10.0, 0.0));
        let force = interpose(&mut owner, &left, &right);
        // Both parties drift toward +x, so the refined midpoint does too.
        assert!(force.x > 0.0);
    }

    // ==================== MODE SELECTION TESTS ====================

    #[test]
    fn test_steering_default_is_idle() {
        let steering = Steering::default();
        assert_eq!(steering.mode, SteeringMode::Idle);
        assert_eq!(steering.force, Vec2::ZERO);
    }

    #[test]
    fn test_evade_constructor_uses_default_threat_distance() {
        let steering = Steering::evade(Entity::PLACEHOLDER);
        match steering.mode {
            SteeringMode::Evade { threat_distance, .. } => {
                assert!(approx_eq(threat_distance, EVADE_THREAT_DISTANCE));
            }
            other => panic!("unexpected mode {other:?}"),
        }
    }
}
