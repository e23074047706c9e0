//! The update queue.

use std::collections::BinaryHeap;

use basalt_utils::BlockPos;
use rustc_hash::FxHashMap;

use super::{TickPriority, TicketKind, UpdateTicket};

/// Identity of the live ticket for one (position, kind) slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingEntry {
    due: u64,
    seq: u64,
}

/// Time-ordered queue of pending update tickets.
///
/// At most one live ticket exists per (position, kind). Scheduling over
/// an existing ticket coalesces to the earliest due time: the newer,
/// earlier ticket replaces the slot and the superseded heap entry is
/// dropped lazily when it surfaces. Draining is deterministic: due tick
/// ascending, then priority, then insertion order.
pub struct UpdateQueue {
    heap: BinaryHeap<UpdateTicket>,
    pending: FxHashMap<(BlockPos, TicketKind), PendingEntry>,
    next_seq: u64,
    capacity: usize,
    dropped: u64,
}

impl UpdateQueue {
    /// Creates a queue holding at most `capacity` pending tickets.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::new(),
            pending: FxHashMap::default(),
            next_seq: 0,
            capacity,
            dropped: 0,
        }
    }

    /// Schedules a ticket due at `now + delay`.
    ///
    /// Returns whether the queue changed. A pending ticket for the same
    /// (position, kind) is replaced only when the new due time is
    /// earlier; otherwise the call is a no-op.
    pub fn schedule(
        &mut self,
        pos: BlockPos,
        kind: TicketKind,
        now: u64,
        delay: u32,
        priority: TickPriority,
    ) -> bool {
        let due = now + u64::from(delay);
        let key = (pos, kind);

        if let Some(existing) = self.pending.get(&key)
            && existing.due <= due
        {
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(key, PendingEntry { due, seq });
        self.heap.push(UpdateTicket {
            pos,
            kind,
            due,
            priority,
            seq,
        });
        log::trace!(
            "scheduled {kind:?} ticket at ({}, {}, {}) for tick {due}",
            pos.x(),
            pos.y(),
            pos.z()
        );

        self.enforce_capacity();
        true
    }

    /// Schedules an immediate ticket, due on the current tick.
    pub fn schedule_immediate(&mut self, pos: BlockPos, now: u64) -> bool {
        self.schedule(pos, TicketKind::Immediate, now, 0, TickPriority::Normal)
    }

    /// Removes a pending ticket, if any. Tickets already drained this
    /// tick are past cancellation.
    pub fn cancel(&mut self, pos: BlockPos, kind: TicketKind) -> bool {
        self.pending.remove(&(pos, kind)).is_some()
    }

    /// Returns whether a ticket is pending for the slot.
    #[must_use]
    pub fn is_scheduled(&self, pos: BlockPos, kind: TicketKind) -> bool {
        self.pending.contains_key(&(pos, kind))
    }

    /// Removes and returns every ticket due at or before `now`, oldest
    /// first, up to `budget` tickets. Whatever exceeds the budget stays
    /// queued for the next tick.
    pub fn drain_due(&mut self, now: u64, budget: usize) -> Vec<UpdateTicket> {
        let mut due = Vec::new();
        while due.len() < budget {
            let Some(top) = self.heap.peek() else { break };
            if top.due > now {
                break;
            }
            let Some(ticket) = self.heap.pop() else { break };

            // Superseded and cancelled tickets linger in the heap until
            // they surface here; only the live entry fires.
            let key = (ticket.pos, ticket.kind);
            let live = self.pending.get(&key)
                == Some(&PendingEntry {
                    due: ticket.due,
                    seq: ticket.seq,
                });
            if live {
                self.pending.remove(&key);
                due.push(ticket);
            }
        }
        due
    }

    /// Number of live pending tickets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Tickets evicted by the capacity bound so far.
    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Evicts the lowest-priority live ticket while over capacity.
    fn enforce_capacity(&mut self) {
        while self.pending.len() > self.capacity {
            // The minimum under the reversed heap ordering is the ticket
            // that would fire last, i.e. the lowest-priority one.
            let victim = self
                .heap
                .iter()
                .filter(|ticket| {
                    self.pending.get(&(ticket.pos, ticket.kind))
                        == Some(&PendingEntry {
                            due: ticket.due,
                            seq: ticket.seq,
                        })
                })
                .min()
                .cloned();
            let Some(victim) = victim else { break };

            self.pending.remove(&(victim.pos, victim.kind));
            self.dropped += 1;
            log::warn!(
                "update queue over capacity; dropped {:?} ticket at ({}, {}, {})",
                victim.kind,
                victim.pos.x(),
                victim.pos.y(),
                victim.pos.z()
            );
        }
    }
}
