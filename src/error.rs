//! Error taxonomy for the AI core.
//!
//! Only contract violations become [`AiError`] values. Conditions the
//! dispatcher tolerates (a telegram whose receiver has despawned, a
//! message a state declines to handle) are logged and counted on
//! [`Telegraph`](crate::resources::telegraph::Telegraph) instead of being
//! raised.

use bevy_ecs::prelude::Entity;
use thiserror::Error;

/// Failures surfaced at call boundaries of the AI core.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiError {
    /// A steering target was expected to carry motion data (an
    /// [`Agent`](crate::components::agent::Agent) component) but does not.
    ///
    /// Pursuit, evade, and interpose require their other parties to be
    /// moving agents; a bare entity cannot be extrapolated.
    #[error("entity {entity:?} has no agent motion data")]
    MissingMotion { entity: Entity },
}
