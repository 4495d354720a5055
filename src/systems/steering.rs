//! Steering force computation system.
//!
//! Two-phase pass over all agents: first snapshot every agent as a
//! [`Mover`], then compute each agent's steering force against the
//! snapshots and store it in `Steering.force`. The snapshot pass is
//! needed because an agent's force may depend on another agent that the
//! second pass is mutating.
//!
//! Forces computed here are consumed by
//! [`movement`](crate::systems::movement::movement) in the same frame.
//! A behavior whose target entity cannot be resolved to a [`Mover`]
//! produces zero force and a warning; the agent keeps its selection and
//! recovers if the target reappears.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::warn;
use rustc_hash::FxHashMap;

use crate::components::agent::Agent;
use crate::error::AiError;
use crate::steering::{self, Mover, SteeringMode};

/// Compute the steering force of every agent for the current frame.
pub fn steer_agents(world: &mut World) {
    // Snapshot pass: every agent as a potential steering target.
    let mut movers: FxHashMap<Entity, Mover> = FxHashMap::default();
    let mut snapshot_query = world.query::<(Entity, &Agent)>();
    for (entity, agent) in snapshot_query.iter(world) {
        movers.insert(entity, agent.mover());
    }

    // Force pass.
    let mut force_query = world.query::<(Entity, &mut Agent)>();
    for (entity, mut agent) in force_query.iter_mut(world) {
        let agent = &mut *agent;
        let mode = agent.steering.mode;
        agent.steering.force = match mode {
            SteeringMode::Idle => Vec2::ZERO,
            SteeringMode::Seek { target } => steering::seek(agent, target),
            SteeringMode::Flee {
                target,
                panic_distance,
            } => steering::flee(agent, target, panic_distance),
            SteeringMode::Arrive {
                target,
                deceleration,
                min_distance,
            } => steering::arrive(agent, target, deceleration, min_distance),
            SteeringMode::Pursuit { evader } => match resolve(&movers, evader) {
                Ok(evader) => steering::pursuit(agent, &evader),
                Err(err) => {
                    warn!("agent {entity:?} pursuit target unresolved: {err}");
                    Vec2::ZERO
                }
            },
            SteeringMode::Evade {
                pursuer,
                threat_distance,
            } => match resolve(&movers, pursuer) {
                Ok(pursuer) => steering::evade(agent, &pursuer, threat_distance),
                Err(err) => {
                    warn!("agent {entity:?} evade target unresolved: {err}");
                    Vec2::ZERO
                }
            },
            SteeringMode::Interpose { left, right } => {
                match (resolve(&movers, left), resolve(&movers, right)) {
                    (Ok(left), Ok(right)) => steering::interpose(agent, &left, &right),
                    (Err(err), _) | (_, Err(err)) => {
                        warn!("agent {entity:?} interpose party unresolved: {err}");
                        Vec2::ZERO
                    }
                }
            }
        };
    }
}

fn resolve(movers: &FxHashMap<Entity, Mover>, entity: Entity) -> Result<Mover, AiError> {
    movers
        .get(&entity)
        .copied()
        .ok_or(AiError::MissingMotion { entity })
}

// ==================== TESTS ====================
