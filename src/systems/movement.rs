//! Euler integration of steering forces into velocity and position.
//!
//! Runs after [`steer_agents`](crate::systems::steering::steer_agents)
//! each frame. The steering force is clamped to the body's `max_force`,
//! converted to an acceleration through its mass, and the resulting
//! velocity is truncated to `max_speed` before the position update.
//! Facing is not touched here; the steering behaviors themselves decide
//! when to realign the agent's angle.

use bevy_ecs::prelude::*;

use crate::components::agent::Agent;
use crate::math::truncate;
use crate::resources::worldtime::WorldTime;

pub fn movement(mut query: Query<&mut Agent>, time: Res<WorldTime>) {
    let dt = time.delta;
    for mut agent in query.iter_mut() {
        let agent = &mut *agent;
        let force = truncate(agent.steering.force, agent.body.max_force);
        let accel = force / agent.body.mass;
        agent.body.velocity = truncate(agent.body.velocity + accel * dt, agent.body.max_speed);
        agent.pos += agent.body.velocity * dt;
    }
}

// ==================== TESTS ====================
