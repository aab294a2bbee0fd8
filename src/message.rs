//! Messages exchanged between actors
//!
//! All mailboxes carry the same [`Message`] sum type. Each actor matches the
//! variants it understands and rejects the rest as unrecognized.
//!
//! ```text
//! bootstrap --Start--> Coordinator --Work--> Distributor --Work--> Worker
//!                          ^                                         |
//!                          +------------- PartialResult -------------+
//!                          |
//!                          +--FinalResult--> Sink
//! ```

use crate::actor::ActorRef;
use std::time::Duration;

/// Half-open index range `[start * count, (start + 1) * count)` of series terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkUnit {
    pub start: u64,
    pub count: u64,
}

impl WorkUnit {
    pub fn new(start: u64, count: u64) -> Self {
        Self { start, count }
    }

    /// First and one-past-last term index, or `None` if the range overflows `u64`
    pub fn range(&self) -> Option<(u64, u64)> {
        let first = self.start.checked_mul(self.count)?;
        let end = first.checked_add(self.count)?;
        Some((first, end))
    }
}

/// A worker's contribution for exactly one [`WorkUnit`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialResult {
    pub value: f64,
}

/// Aggregated approximation plus wall-clock time since the coordinator was created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalResult {
    pub value: f64,
    pub elapsed: Duration,
}

/// Every message an actor mailbox can carry
#[derive(Debug)]
pub enum Message {
    /// Begin the computation
    Start,

    /// A unit of work together with the actor the result must go back to
    Work { unit: WorkUnit, reply_to: ActorRef },

    PartialResult(PartialResult),

    FinalResult(FinalResult),
}

impl Message {
    /// Variant name, for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Start => "Start",
            Message::Work { .. } => "Work",
            Message::PartialResult(_) => "PartialResult",
            Message::FinalResult(_) => "FinalResult",
        }
    }
}
