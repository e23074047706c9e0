//! Update ticket types.

use std::cmp::Ordering;

use basalt_utils::BlockPos;

/// How the ticket entered the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketKind {
    /// Enqueued with due time = now (neighbor notifications).
    Immediate,
    /// Enqueued with a delay; at most one pending per position, kept at
    /// the earliest due time.
    Scheduled,
    /// Produced by the random tick sampler.
    Random,
}

/// Priority level for tickets firing on the same tick.
///
/// Lower numeric value runs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i8)]
pub enum TickPriority {
    ExtremelyHigh = -3,
    VeryHigh = -2,
    High = -1,
    #[default]
    Normal = 0,
    Low = 1,
    VeryLow = 2,
    ExtremelyLow = 3,
}

impl TickPriority {
    /// Numeric value; lower runs first.
    #[inline]
    #[must_use]
    pub const fn value(self) -> i8 {
        self as i8
    }
}

/// One pending unit of propagation work.
///
/// Tickets are immutable once created; coalescing replaces a ticket with
/// a new one rather than editing it in place.
#[derive(Debug, Clone)]
pub struct UpdateTicket {
    pub pos: BlockPos,
    pub kind: TicketKind,
    /// Absolute tick at which the ticket becomes due.
    pub due: u64,
    pub priority: TickPriority,
    /// Insertion sequence; breaks ties FIFO so a fixed input sequence
    /// replays a fixed drain order.
    pub seq: u64,
}

impl PartialEq for UpdateTicket {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for UpdateTicket {}

impl PartialOrd for UpdateTicket {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UpdateTicket {
    /// `BinaryHeap` is a max-heap, so the comparison is reversed: the
    /// greatest ticket is the one that fires first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.priority.value().cmp(&self.priority.value()))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(due: u64, priority: TickPriority, seq: u64) -> UpdateTicket {
        UpdateTicket {
            pos: BlockPos::new(0, 0, 0),
            kind: TicketKind::Scheduled,
            due,
            priority,
            seq,
        }
    }

    #[test]
    fn earlier_due_fires_first() {
        assert!(ticket(100, TickPriority::Normal, 0) > ticket(200, TickPriority::Normal, 1));
    }

    #[test]
    fn priority_breaks_due_ties() {
        assert!(ticket(100, TickPriority::High, 1) > ticket(100, TickPriority::Normal, 0));
        assert!(ticket(100, TickPriority::Normal, 1) > ticket(100, TickPriority::Low, 0));
    }

    #[test]
    fn insertion_order_breaks_remaining_ties() {
        assert!(ticket(100, TickPriority::Normal, 3) > ticket(100, TickPriority::Normal, 7));
    }
}
