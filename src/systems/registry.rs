//! Registry bookkeeping systems.
//!
//! The ECS rendering of "agents self-register on construction and
//! self-deregister on destruction": a registration pass picks up entities
//! whose [`AgentId`] component was added since the last frame and assigns
//! generated ids through the
//! [`AgentRegistry`](crate::resources::registry::AgentRegistry); a
//! deregistration pass removes entries for entities whose [`AgentId`]
//! component was removed (usually by despawn).
//!
//! Both passes rely on bevy_ecs change tracking, so the game loop must
//! call `world.clear_trackers()` once per frame (as
//! [`Game::tick`](crate::game::Game::tick) does).

use bevy_ecs::prelude::*;

use crate::components::agentid::AgentId;
use crate::resources::registry::AgentRegistry;

/// Register agents spawned since the last frame, writing generated ids
/// back into their [`AgentId`] components.
pub fn register_spawned_agents(
    mut registry: ResMut<AgentRegistry>,
    mut query: Query<(Entity, &mut AgentId), Added<AgentId>>,
) {
    for (entity, mut id) in query.iter_mut() {
        let assigned = registry.register(entity, *id);
        if *id != assigned {
            *id = assigned;
        }
    }
}

/// Deregister agents whose [`AgentId`] component was removed since the
/// last frame (component removal or entity despawn).
pub fn deregister_despawned_agents(
    mut registry: ResMut<AgentRegistry>,
    mut removed: RemovedComponents<AgentId>,
) {
    for entity in removed.read() {
        registry.deregister(entity);
    }
}
