//! Brain update system.
//!
//! Forwards the frame update to every agent's active behavior state, with
//! the entity's [`Agent`] component as the owner. Transition requests
//! returned by the states are applied inside
//! [`StateMachine::update`](crate::fsm::StateMachine::update), so a state
//! can hand control over without ever borrowing its own machine.

use bevy_ecs::prelude::*;

use crate::components::agent::Agent;
use crate::components::brain::Brain;
use crate::resources::worldtime::WorldTime;

/// Run the active state of every brain for one frame.
///
/// Idle brains (empty stacks) are skipped by the machine itself.
pub fn think(mut query: Query<(&mut Agent, &mut Brain)>, time: Res<WorldTime>) {
    for (mut agent, mut brain) in query.iter_mut() {
        brain.machine.update(&mut agent, time.delta);
    }
}
