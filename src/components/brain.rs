//! Behavior state machine component for agents.
//!
//! A [`Brain`] is a [`StateMachine`] whose owner is the entity's
//! [`Agent`](crate::components::agent::Agent) component. The
//! [`think`](crate::systems::brain::think) system drives the active state
//! every frame, and the dispatcher routes delivered telegrams into
//! [`StateMachine::handle_message`] with the same owner.
//!
//! A freshly constructed brain is idle (empty stack); give it an initial
//! state with [`Brain::with_state`] during spawn, or
//! [`Game::spawn_agent`](crate::game::Game::spawn_agent) which runs the
//! initial `on_enter` against the agent before inserting the components.

use bevy_ecs::prelude::Component;

use crate::components::agent::Agent;
use crate::fsm::StateMachine;

/// State machine driving an agent's behavior.
#[derive(Component, Default, Debug)]
pub struct Brain {
    /// The underlying generic machine; owner type is [`Agent`].
    pub machine: StateMachine<Agent>,
}

impl Brain {
    /// Create an idle brain.
    pub fn new() -> Self {
        Self {
            machine: StateMachine::new(),
        }
    }

    /// Create a brain with an initial state, running its `on_enter`
    /// against `agent` immediately.
    pub fn with_state(agent: &mut Agent, initial: Box<dyn crate::fsm::State<Agent>>) -> Self {
        let mut brain = Self::new();
        brain.machine.change_state(agent, initial);
        brain
    }
}
