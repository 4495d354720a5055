//! ECS components for agents.
//!
//! This module groups the component types that can be attached to agent
//! entities. An agent entity carries an [`Agent`](agent::Agent) for its
//! physical state, a [`Brain`](brain::Brain) for its state machine, and an
//! [`AgentId`](agentid::AgentId) so other agents can address it by id.
//!
//! Submodules overview:
//! - [`agent`] – position, motion body, steering selection and outbox
//! - [`agentid`] – stable registry id for telegram addressing
//! - [`brain`] – stack-based state machine driving the agent
//! - [`motion`] – mass, limits and velocity of a moving body

pub mod agent;
pub mod agentid;
pub mod brain;
pub mod motion;
