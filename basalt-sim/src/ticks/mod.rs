//! Scheduled update tickets and the update queue.
//!
//! - [`UpdateTicket`] - one pending unit of propagation work
//! - [`TickPriority`] - ordering within the same due tick
//! - [`UpdateQueue`] - the time-ordered, deduplicating queue

mod queue;
mod ticket;

pub use queue::UpdateQueue;
pub use ticket::{TickPriority, TicketKind, UpdateTicket};
