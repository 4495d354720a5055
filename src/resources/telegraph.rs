//! Pending telegram queue resource.
//!
//! [`Telegraph`] holds telegrams whose dispatch time has not arrived yet,
//! ordered by ascending dispatch time with FIFO tie-break for equal
//! times. Immediate sends never pass through here; they are delivered
//! synchronously by
//! [`dispatch_message`](crate::systems::dispatch::dispatch_message).
//!
//! The delivery counters are diagnostics, not contract: `delivered` counts
//! handled telegrams, `ignored` counts delivered-but-unhandled ones, and
//! `dropped` counts telegrams whose receiver could not be resolved.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::cmp::Reverse;

use bevy_ecs::prelude::Resource;

use crate::events::telegram::Telegram;

/// A queued telegram plus its FIFO tie-break sequence number.
#[derive(Debug, Clone)]
struct Pending {
    telegram: Telegram,
    seq: u64,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.telegram
            .dispatch_time
            .total_cmp(&other.telegram.dispatch_time)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Priority queue of delayed telegrams plus delivery diagnostics.
#[derive(Resource, Debug, Default)]
pub struct Telegraph {
    pending: BinaryHeap<Reverse<Pending>>,
    next_seq: u64,
    /// Telegrams delivered and handled.
    pub delivered: u64,
    /// Telegrams delivered but declined by the receiving state.
    pub ignored: u64,
    /// Telegrams whose receiver could not be resolved.
    pub dropped: u64,
}

impl Telegraph {
    /// Queue a telegram for delivery at its dispatch time.
    ///
    /// Duplicate dispatch times are preserved, not deduplicated; equal
    /// times deliver in enqueue order.
    pub fn enqueue(&mut self, telegram: Telegram) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Reverse(Pending { telegram, seq }));
    }

    /// Remove and return the earliest telegram due at or before `now`.
    ///
    /// Each telegram is returned at most once; calling in a loop drains
    /// everything due this frame in non-decreasing dispatch-time order.
    pub fn pop_due(&mut self, now: f32) -> Option<Telegram> {
        let due = self
            .pending
            .peek()
            .is_some_and(|Reverse(p)| p.telegram.dispatch_time <= now);
        if due {
            self.pending.pop().map(|Reverse(p)| p.telegram)
        } else {
            None
        }
    }

    /// Number of telegrams still waiting for their dispatch time.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Dispatch time of the next due telegram, if any are pending.
    pub fn next_dispatch_time(&self) -> Option<f32> {
        self.pending.peek().map(|Reverse(p)| p.telegram.dispatch_time)
    }
}
