//! Simulation container: the ECS [`World`], the frame [`Schedule`] and
//! the helpers game code uses to spawn agents and send messages.
//!
//! [`Game::tick`] is the whole frame loop: advance the clock, run the
//! schedule, clear change trackers. The schedule is chained so the
//! frame always runs in the same order:
//!
//! 1. register newly spawned agents,
//! 2. `think` (state machine updates),
//! 3. flush outboxes queued during `think`,
//! 4. compute steering forces,
//! 5. integrate movement,
//! 6. deliver due telegrams,
//! 7. deregister despawned agents.

use bevy_ecs::prelude::*;

use crate::components::agent::Agent;
use crate::components::agentid::AgentId;
use crate::components::brain::Brain;
use crate::events::telegram::log_dropped_telegram;
use crate::fsm::State;
use crate::resources::registry::AgentRegistry;
use crate::resources::simconfig::SimConfig;
use crate::resources::telegraph::Telegraph;
use crate::resources::worldtime::WorldTime;
use crate::systems::brain::think;
use crate::systems::dispatch::{self, dispatch_due_telegrams, flush_outboxes};
use crate::systems::movement::movement;
use crate::systems::registry::{deregister_despawned_agents, register_spawned_agents};
use crate::systems::steering::steer_agents;
use crate::systems::time::update_world_time;

/// A running simulation.
pub struct Game {
    pub world: World,
    schedule: Schedule,
}

impl Game {
    /// Build a world with all simulation resources and the frame schedule.
    pub fn new(config: SimConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            time_scale: config.time_scale,
            ..Default::default()
        });
        world.insert_resource(AgentRegistry::default());
        world.insert_resource(Telegraph::default());
        world.insert_resource(config);
        world.add_observer(log_dropped_telegram);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                register_spawned_agents,
                think,
                flush_outboxes,
                steer_agents,
                movement,
                dispatch_due_telegrams,
                deregister_despawned_agents,
            )
                .chain(),
        );

        Game { world, schedule }
    }

    /// Advance the simulation by `dt` unscaled seconds.
    pub fn tick(&mut self, dt: f32) {
        update_world_time(&mut self.world, dt);
        self.schedule.run(&mut self.world);
        self.world.clear_trackers();
    }

    /// Spawn an agent, register it and optionally enter an initial state.
    ///
    /// Registration happens here rather than waiting for the next frame's
    /// `register_spawned_agents` pass, so the returned [`AgentId`] is
    /// addressable immediately.
    pub fn spawn_agent(
        &mut self,
        mut agent: Agent,
        initial: Option<Box<dyn State<Agent>>>,
    ) -> (Entity, AgentId) {
        let brain = match initial {
            Some(state) => Brain::with_state(&mut agent, state),
            None => Brain::new(),
        };
        let entity = self.world.spawn((agent, brain)).id();
        let id = self
            .world
            .resource_mut::<AgentRegistry>()
            .register(entity, AgentId::UNREGISTERED);
        self.world.entity_mut(entity).insert(id);
        (entity, id)
    }

    /// Despawn an agent and remove it from the registry.
    ///
    /// Telegrams still queued for it are dropped when their time comes.
    pub fn despawn_agent(&mut self, entity: Entity) {
        self.world
            .resource_mut::<AgentRegistry>()
            .deregister(entity);
        self.world.despawn(entity);
    }

    /// Send a message between agents, delayed by `delay` seconds.
    ///
    /// A delay of zero or less delivers before this call returns.
    pub fn send(&mut self, sender: AgentId, receiver: AgentId, msg: i32, delay: f32) {
        dispatch::dispatch_message(&mut self.world, sender, receiver, msg, delay, None);
    }

    /// Like [`Game::send`] but with an opaque payload for the receiver.
    pub fn send_with(
        &mut self,
        sender: AgentId,
        receiver: AgentId,
        msg: i32,
        delay: f32,
        extra: serde_json::Value,
    ) {
        dispatch::dispatch_message(&mut self.world, sender, receiver, msg, delay, Some(extra));
    }
}

// ==================== TESTS ====================
