//! Telegram dispatch and delivery.
//!
//! Entry points take `&mut World` because delivery hands the receiver's
//! [`Agent`] and [`Brain`] to state code that may mutate both and push
//! further sends onto the agent's outbox. Three paths feed into the same
//! [`deliver`] routine:
//!
//! * [`dispatch_message`] for direct sends from game code,
//! * [`flush_outboxes`] for sends queued by states during `think`,
//! * [`dispatch_due_telegrams`] for delayed telegrams whose time has come.
//!
//! A delay of zero or less delivers synchronously, before the dispatch
//! call returns. Anything else is stamped with an absolute dispatch time
//! and parked in the [`Telegraph`] until
//! [`dispatch_due_telegrams`] releases it.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::components::agent::Agent;
use crate::components::agentid::AgentId;
use crate::components::brain::Brain;
use crate::events::telegram::{Telegram, TelegramDropped};
use crate::resources::registry::AgentRegistry;
use crate::resources::telegraph::Telegraph;
use crate::resources::worldtime::WorldTime;

/// Send a message from `sender` to `receiver`.
///
/// `delay` is in seconds relative to now. Zero or negative delivers
/// immediately; otherwise the telegram is enqueued for
/// [`dispatch_due_telegrams`].
pub fn dispatch_message(
    world: &mut World,
    sender: AgentId,
    receiver: AgentId,
    msg: i32,
    delay: f32,
    extra: Option<serde_json::Value>,
) {
    let now = world.resource::<WorldTime>().now();
    let telegram = Telegram {
        sender,
        receiver,
        msg,
        dispatch_time: now + delay.max(0.0),
        extra,
    };
    if delay <= 0.0 {
        deliver(world, telegram);
    } else {
        world.resource_mut::<Telegraph>().enqueue(telegram);
    }
}

/// Deliver every queued telegram whose dispatch time has been reached.
///
/// Telegrams come off the queue in dispatch-time order, ties in
/// enqueue order. A delivery may enqueue new telegrams; those are only
/// delivered this frame if they are already due.
pub fn dispatch_due_telegrams(world: &mut World) {
    let now = world.resource::<WorldTime>().now();
    loop {
        let Some(telegram) = world.resource_mut::<Telegraph>().pop_due(now) else {
            break;
        };
        deliver(world, telegram);
    }
}

/// Drain every agent's outbox into the dispatcher.
///
/// Runs after `think` so that sends queued by states this frame go out
/// the same frame. The sender id comes from the agent's [`AgentId`]
/// component at flush time.
pub fn flush_outboxes(world: &mut World) {
    let mut outgoing = Vec::new();
    let mut query = world.query::<(&AgentId, &mut Agent)>();
    for (id, mut agent) in query.iter_mut(world) {
        if agent.outbox.is_empty() {
            continue;
        }
        let sender = *id;
        outgoing.extend(agent.outbox.drain(..).map(|out| (sender, out)));
    }
    for (sender, out) in outgoing {
        dispatch_message(world, sender, out.receiver, out.msg, out.delay, out.extra);
    }
}

/// Hand a telegram to its receiver's state machine.
///
/// A receiver that is unregistered, or registered but despawned, drops
/// the telegram: the drop counter is bumped and a [`TelegramDropped`]
/// event is triggered. A receiver whose current state declines the
/// message only bumps the ignored counter.
fn deliver(world: &mut World, telegram: Telegram) {
    let Some(entity) = world.resource::<AgentRegistry>().find(telegram.receiver) else {
        warn!(
            "telegram {} for unknown agent {:?} dropped",
            telegram.msg, telegram.receiver
        );
        world.resource_mut::<Telegraph>().dropped += 1;
        world.trigger(TelegramDropped { telegram });
        return;
    };
    let mut query = world.query::<(&mut Agent, &mut Brain)>();
    let Ok((mut agent, mut brain)) = query.get_mut(world, entity) else {
        warn!(
            "telegram {} receiver {:?} has no agent components, dropped",
            telegram.msg, telegram.receiver
        );
        world.resource_mut::<Telegraph>().dropped += 1;
        world.trigger(TelegramDropped { telegram });
        return;
    };
    let handled = brain.machine.handle_message(&mut agent, &telegram);
    let mut telegraph = world.resource_mut::<Telegraph>();
    if handled {
        telegraph.delivered += 1;
    } else {
        debug!(
            "telegram {} from {:?} ignored by {:?}",
            telegram.msg, telegram.sender, telegram.receiver
        );
        telegraph.ignored += 1;
    }
}

// ==================== TESTS ====================
