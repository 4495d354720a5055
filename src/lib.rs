//! Steerling library.
//!
//! Game-agent toolkit built on `bevy_ecs`: a stack-based state machine
//! generic over its owner, steering behaviors for 2D movement, and a
//! delayed message dispatcher with a per-world agent registry. Exposed as
//! a library for integration tests and for games embedding the simulation.

pub mod components;
pub mod error;
pub mod events;
pub mod fsm;
pub mod game;
pub mod math;
pub mod resources;
pub mod steering;
pub mod systems;
