//! Agent identity registry resource.
//!
//! [`AgentRegistry`] maps messaging ids to entities so the telegram
//! dispatcher can resolve receivers by [`AgentId`]. The registry never
//! owns entity lifetime, it only indexes it. Ids are generated once per
//! agent, are unique among currently registered agents, and are never
//! reassigned while the holder stays registered.
//!
//! Registration is normally driven by the systems in
//! [`crate::systems::registry`] (spawned agents register, despawned
//! agents deregister); [`Game::spawn_agent`](crate::game::Game::spawn_agent)
//! registers eagerly so the caller gets the id back immediately. Both
//! paths funnel through [`AgentRegistry::register`], which is idempotent
//! for an already-registered entity.

use bevy_ecs::prelude::{Entity, Resource};
use log::debug;
use rustc_hash::FxHashMap;

use crate::components::agentid::AgentId;

/// Identity-keyed lookup from [`AgentId`] to [`Entity`].
#[derive(Resource, Debug, Default)]
pub struct AgentRegistry {
    by_id: FxHashMap<AgentId, Entity>,
    by_entity: FxHashMap<Entity, AgentId>,
    /// Total registrations since startup (diagnostics).
    registered_total: u64,
    /// Total deregistrations since startup (diagnostics).
    deregistered_total: u64,
}

impl AgentRegistry {
    /// Register `entity` under `id`, generating a fresh unique id when
    /// `id` is the unregistered sentinel. Returns the effective id.
    ///
    /// A pre-assigned nonzero id is honored as-is. Registering an entity
    /// that is already registered is a no-op returning its existing id.
    pub fn register(&mut self, entity: Entity, id: AgentId) -> AgentId {
        if let Some(existing) = self.by_entity.get(&entity) {
            return *existing;
        }
        let id = if id.is_registered() {
            id
        } else {
            self.generate_id()
        };
        self.by_id.insert(id, entity);
        self.by_entity.insert(entity, id);
        self.registered_total += 1;
        debug!("registered agent {:?} as {:?}", entity, id);
        id
    }

    /// Remove `entity` from the index. Safe no-op when not registered.
    pub fn deregister(&mut self, entity: Entity) {
        if let Some(id) = self.by_entity.remove(&entity) {
            self.by_id.remove(&id);
            self.deregistered_total += 1;
            debug!("deregistered agent {:?} ({:?})", entity, id);
        }
    }

    /// Look up the entity registered under `id`.
    pub fn find(&self, id: AgentId) -> Option<Entity> {
        self.by_id.get(&id).copied()
    }

    /// Look up the id assigned to `entity`.
    pub fn id_of(&self, entity: Entity) -> Option<AgentId> {
        self.by_entity.get(&entity).copied()
    }

    /// Number of currently registered agents.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether no agents are registered.
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Total registrations since startup.
    pub fn registered_total(&self) -> u64 {
        self.registered_total
    }

    /// Total deregistrations since startup.
    pub fn deregistered_total(&self) -> u64 {
        self.deregistered_total
    }

    /// Draw nonzero ids until one is free. With a 64-bit id space a
    /// collision retry is vanishingly rare but still handled.
    fn generate_id(&self) -> AgentId {
        loop {
            let candidate = AgentId(fastrand::u64(1..=u64::MAX));
            if !self.by_id.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}
