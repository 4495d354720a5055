//! Simulation clock resource.
//!
//! Updated once per frame by
//! [`update_world_time`](crate::systems::time::update_world_time).
//! `elapsed` is the monotonic simulation time all telegram dispatch times
//! are expressed in.

use bevy_ecs::prelude::Resource;

/// Simulation time state shared by all systems.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    /// Scaled seconds since the simulation started.
    pub elapsed: f32,
    /// Scaled seconds of the current frame.
    pub delta: f32,
    /// Multiplier applied to incoming frame deltas (1.0 = real time).
    pub time_scale: f32,
    /// Number of completed frames.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    /// Current simulation time; the reference clock for telegram dispatch.
    pub fn now(&self) -> f32 {
        self.elapsed
    }
}
