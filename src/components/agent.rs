//! Steering agent component.
//!
//! [`Agent`] is the spatial game-object the AI core operates on: a world
//! position, a facing angle, the kinematic [`MotionBody`], the active
//! [`Steering`] selection, and an outbox of queued telegram sends. It is
//! also the owner type handed to the states of a
//! [`Brain`](crate::components::brain::Brain): everything a behavior state
//! may read or mutate lives here, so a `(&mut Agent, &mut Brain)` query
//! splits the borrows cleanly.
//!
//! The facing angle is wrapped into (−π, π] on every write. Heading
//! (direction of travel) and facing (orientation) are distinct: seek and
//! flee realign facing to heading as a documented side effect, while
//! [`Agent::turn_toward`] rotates facing under the body's turn-rate limit.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use smallvec::SmallVec;

use crate::components::motion::MotionBody;
use crate::events::telegram::Outgoing;
use crate::math::{perp, vec_from_angle, wrap_angle};
use crate::steering::{Mover, Steering};

/// A positioned, oriented, steerable game object.
///
/// Constructing an `Agent` requires a [`MotionBody`]; there is no
/// attach-on-demand path. Entities that only need a messaging identity
/// (directors, scorekeepers) carry an
/// [`AgentId`](crate::components::agentid::AgentId) and a
/// [`Brain`](crate::components::brain::Brain) without an `Agent`.
#[derive(Component, Clone, Debug)]
pub struct Agent {
    /// World-space position.
    pub pos: Vec2,
    /// Kinematic state and limits.
    pub body: MotionBody,
    /// Active steering behavior selection and its latest force output.
    pub steering: Steering,
    /// Telegram sends queued by behavior states, flushed once per frame by
    /// [`flush_outboxes`](crate::systems::dispatch::flush_outboxes).
    pub outbox: SmallVec<[Outgoing; 2]>,
    /// Facing angle in radians, canonical (−π, π]. Written through
    /// [`Agent::set_angle`].
    angle: f32,
}

impl Agent {
    /// Create an agent at `pos` facing along the positive x-axis.
    pub fn new(pos: Vec2, body: MotionBody) -> Self {
        Self {
            pos,
            body,
            steering: Steering::default(),
            outbox: SmallVec::new(),
            angle: 0.0,
        }
    }

    /// Builder-style initial facing angle (radians, wrapped on write).
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.set_angle(angle);
        self
    }

    /// Builder-style initial steering selection.
    pub fn with_steering(mut self, steering: Steering) -> Self {
        self.steering = steering;
        self
    }

    /// Current facing angle in radians, always in (−π, π].
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Set the facing angle, wrapping into (−π, π].
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = wrap_angle(angle);
    }

    /// Unit vector along the facing angle.
    pub fn facing(&self) -> Vec2 {
        vec_from_angle(self.angle)
    }

    /// Unit vector perpendicular to the facing direction.
    pub fn side(&self) -> Vec2 {
        perp(self.facing())
    }

    /// Align the facing angle with the current heading.
    ///
    /// No-op when the agent is not moving (degenerate heading).
    pub fn align_to_heading(&mut self) {
        if self.body.is_moving() {
            let heading = self.body.heading();
            self.set_angle(heading.y.atan2(heading.x));
        }
    }

    /// Rotate the facing angle toward `target`, limited by the body's
    /// `max_turn_rate`. Returns `true` once the agent faces the target.
    ///
    /// A target on top of the agent counts as already faced.
    pub fn turn_toward(&mut self, target: Vec2, dt: f32) -> bool {
        let to_target = target - self.pos;
        if to_target.length_squared() <= f32::EPSILON {
            return true;
        }
        let desired = to_target.y.atan2(to_target.x);
        let diff = wrap_angle(desired - self.angle);
        let max_step = self.body.max_turn_rate * dt;
        if diff.abs() <= max_step {
            self.set_angle(desired);
            true
        } else {
            self.set_angle(self.angle + max_step * diff.signum());
            false
        }
    }

    /// Queue a payload-free telegram send on the outbox.
    pub fn send(&mut self, receiver: crate::components::agentid::AgentId, msg: i32, delay: f32) {
        self.outbox.push(Outgoing::new(receiver, msg, delay));
    }

    /// Queue a telegram send with an opaque payload on the outbox.
    pub fn send_with(
        &mut self,
        receiver: crate::components::agentid::AgentId,
        msg: i32,
        delay: f32,
        extra: serde_json::Value,
    ) {
        self.outbox.push(Outgoing {
            receiver,
            msg,
            delay,
            extra: Some(extra),
        });
    }

    /// Snapshot of this agent as a steering target.
    pub fn mover(&self) -> Mover {
        Mover {
            pos: self.pos,
            velocity: self.body.velocity,
            max_speed: self.body.max_speed,
        }
    }
}
