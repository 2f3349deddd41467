//! Deferred actions keyed by owner liveness.
//!
//! Entries are polled once per tick. An entry whose owner handle is no
//! longer live when it comes due is dropped without acting.

use hecs::World;
use tracing::trace;

use crate::handle::ActorHandle;

/// What to do when a timer comes due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// End the owner's lifecycle (post-action grace or lifespan over).
    Expire,
    /// Resolve the owning sentry's locked engagement.
    SentryFire,
}

#[derive(Debug, Clone)]
struct TimerEntry {
    deadline_secs: f64,
    /// Insertion order, to break deadline ties deterministically.
    seq: u64,
    owner: ActorHandle,
    action: DeferredAction,
}

#[derive(Debug, Default)]
pub struct TimerQueue {
    entries: Vec<TimerEntry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn schedule(&mut self, deadline_secs: f64, owner: ActorHandle, action: DeferredAction) {
        self.entries.push(TimerEntry {
            deadline_secs,
            seq: self.next_seq,
            owner,
            action,
        });
        self.next_seq += 1;
    }

    /// Pop the earliest entry due at `now` whose owner is still live.
    ///
    /// Liveness is checked at pop time, so an action applied earlier in the
    /// same tick suppresses later entries for the actor it ended.
    pub fn pop_due(&mut self, now: f64, world: &World) -> Option<(ActorHandle, DeferredAction)> {
        loop {
            let index = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.deadline_secs <= now)
                .min_by(|(_, a), (_, b)| {
                    a.deadline_secs
                        .total_cmp(&b.deadline_secs)
                        .then(a.seq.cmp(&b.seq))
                })
                .map(|(index, _)| index)?;

            let entry = self.entries.swap_remove(index);
            if entry.owner.is_live(world) {
                return Some((entry.owner, entry.action));
            }
            trace!(owner = ?entry.owner, action = ?entry.action, "stale timer dropped");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
