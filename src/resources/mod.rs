//! ECS resources shared by all systems.
//!
//! Submodules overview:
//! - [`registry`] – bidirectional map between agent ids and entities
//! - [`simconfig`] – simulation tuning loaded from an INI file
//! - [`telegraph`] – priority queue of delayed telegrams plus counters
//! - [`worldtime`] – simulation clock (elapsed, delta, scale)

pub mod registry;
pub mod simconfig;
pub mod telegraph;
pub mod worldtime;
