//! Registry identity component.
//!
//! Every entity that participates in telegram messaging carries an
//! [`AgentId`]. The id `0` is the "unregistered" sentinel: spawn an entity
//! with [`AgentId::UNREGISTERED`] and the
//! [`register_spawned_agents`](crate::systems::registry::register_spawned_agents)
//! system will assign a freshly generated unique id on the next frame, or
//! use [`Game::spawn_agent`](crate::game::Game::spawn_agent) to get the id
//! back immediately.

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Unique messaging identity of an agent, assigned by the
/// [`AgentRegistry`](crate::resources::registry::AgentRegistry).
#[derive(
    Component, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct AgentId(pub u64);

impl AgentId {
    /// Sentinel value meaning "no id assigned yet".
    pub const UNREGISTERED: AgentId = AgentId(0);

    /// Whether this id has been assigned by the registry.
    pub fn is_registered(&self) -> bool {
        self.0 != 0
    }
}
