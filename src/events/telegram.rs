//! Telegram message records and dispatch diagnostics events.
//!
//! A [`Telegram`] is a time-stamped message exchanged between registered
//! agents. Telegrams are created at the dispatch call site, optionally held
//! in the [`Telegraph`](crate::resources::telegraph::Telegraph) queue until
//! their dispatch time, delivered at most once to the receiver's
//! [`Brain`](crate::components::brain::Brain), and dropped afterwards.
//!
//! # Delivery outcomes
//!
//! - Delivered and handled – normal case, counted as `delivered`.
//! - Delivered but unhandled – legitimate (states may ignore messages);
//!   logged at debug level and counted as `ignored`.
//! - Receiver missing – the receiver id was never registered or the agent
//!   despawned before the dispatch time; logged at warn level, counted as
//!   `dropped`, and surfaced as a [`TelegramDropped`] observer event.
//!
//! # Related
//!
//! - [`crate::systems::dispatch`] – dispatch entry points and the per-frame
//!   delivery tick
//! - [`crate::resources::telegraph::Telegraph`] – the pending queue

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::components::agentid::AgentId;

/// A time-stamped message from one agent to another.
///
/// `dispatch_time` is absolute simulation time in the units of
/// [`WorldTime::elapsed`](crate::resources::worldtime::WorldTime). It is
/// written exactly once, when the telegram is created or enqueued; the rest
/// of the record never changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telegram {
    /// Registry id of the sending agent.
    pub sender: AgentId,
    /// Registry id of the intended receiver.
    pub receiver: AgentId,
    /// Game-defined message code.
    pub msg: i32,
    /// Absolute simulation time at which the telegram becomes deliverable.
    pub dispatch_time: f32,
    /// Optional opaque payload, interpreted only by the receiver.
    pub extra: Option<serde_json::Value>,
}

/// A send request queued on an agent's outbox.
///
/// States run without world access, so instead of calling the dispatcher
/// directly they push `Outgoing` records onto their
/// [`Agent`](crate::components::agent::Agent)'s outbox. The outboxes are
/// flushed into the dispatcher once per frame by
/// [`flush_outboxes`](crate::systems::dispatch::flush_outboxes); the sender
/// id is filled in from the agent's [`AgentId`] at that point.
#[derive(Debug, Clone, PartialEq)]
pub struct Outgoing {
    /// Registry id of the intended receiver.
    pub receiver: AgentId,
    /// Game-defined message code.
    pub msg: i32,
    /// Delay in seconds; zero or negative means immediate dispatch at
    /// flush time.
    pub delay: f32,
    /// Optional opaque payload.
    pub extra: Option<serde_json::Value>,
}

impl Outgoing {
    /// Convenience constructor for a payload-free send.
    pub fn new(receiver: AgentId, msg: i32, delay: f32) -> Self {
        Self {
            receiver,
            msg,
            delay,
            extra: None,
        }
    }
}

/// Event triggered when a telegram could not be delivered because its
/// receiver is not (or no longer) registered.
///
/// The dispatcher continues after dropping the telegram; this event is the
/// hook for games that want to react to vanished receivers.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TelegramDropped {
    /// The telegram that could not be delivered.
    pub telegram: Telegram,
}

/// Observer that logs dropped telegrams.
///
/// Registered by [`Game::new`](crate::game::Game::new); games may register
/// additional observers for their own bookkeeping.
pub fn log_dropped_telegram(trigger: On<TelegramDropped>) {
    let t = &trigger.event().telegram;
    warn!(
        "telegram dropped: receiver {:?} not registered (sender {:?}, msg {}, dispatch_time {})",
        t.receiver, t.sender, t.msg, t.dispatch_time
    );
}
