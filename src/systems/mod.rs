//! Simulation systems.
//!
//! This module groups the ECS systems that advance a frame. The schedule
//! built by [`Game::new`](crate::game::Game::new) chains them in a fixed
//! order; see its docs for the frame layout.
//!
//! Submodules overview:
//! - [`brain`] – run every agent's state machine once per frame
//! - [`dispatch`] – telegram dispatch, delivery and outbox flushing
//! - [`movement`] – integrate steering forces into velocity and position
//! - [`registry`] – keep the agent registry in sync with spawns/despawns
//! - [`steering`] – compute per-agent steering forces
//! - [`time`] – advance the simulation clock

pub mod brain;
pub mod dispatch;
pub mod movement;
pub mod registry;
pub mod steering;
pub mod time;
