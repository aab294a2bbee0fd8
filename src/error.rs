//! Error types for the actor core
//!
//! Every failure the core can raise is a [`PiError`]. Each variant maps onto an
//! [`ErrorKind`], which is what callers (and the receive loop) branch on:
//!
//! - **UnrecognizedMessage**: logged and ignored, the computation goes on
//! - **AggregationOverflow**: more results than dispatched units, fatal
//! - **DuplicateFinalResult**: the sink saw a second final result, fatal
//! - **WorkerFault**: a worker could not compute its unit, fatal
//!
//! `Delivery`, `Lifecycle` and `Report` cover the plumbing around those
//! (closed mailboxes, context misuse, output failures) and are fatal as well.

use thiserror::Error;

/// Classification of a [`PiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnrecognizedMessage,
    AggregationOverflow,
    DuplicateFinalResult,
    WorkerFault,
    Delivery,
    Lifecycle,
    Report,
}

/// Errors raised by actors, the execution context and the bootstrap
#[derive(Error, Debug)]
pub enum PiError {
    /// A component received a message outside its expected set
    #[error("{actor} cannot handle {message} message")]
    UnrecognizedMessage {
        actor: String,
        message: &'static str,
    },

    /// A partial result arrived when the count was already complete
    #[error("aggregation overflow in {actor}: partial result with {received}/{expected} already counted")]
    AggregationOverflow {
        actor: String,
        received: u64,
        expected: u64,
    },

    /// A partial result was addressed to a coordinator that already retired
    #[error("aggregation overflow: {actor} retired before a partial result was delivered")]
    ResultAfterRetirement { actor: String },

    /// The sink received more than one final result
    #[error("{actor} received a second final result")]
    DuplicateFinalResult { actor: String },

    /// A worker failed to compute its unit
    #[error("{actor} failed on work unit {start} (count {count}): {reason}")]
    WorkerFault {
        actor: String,
        start: u64,
        count: u64,
        reason: String,
    },

    /// An actor task panicked
    #[error("{actor} panicked")]
    ActorPanicked { actor: String },

    /// The target mailbox has been dropped
    #[error("mailbox of {actor} is closed")]
    MailboxClosed { actor: String },

    /// The execution context was used in the wrong state
    #[error("execution context {context}: {reason}")]
    Lifecycle {
        context: String,
        reason: &'static str,
    },

    /// The context shut down without a final result being delivered
    #[error("computation ended without a final result")]
    Incomplete,

    /// The reporter failed to emit the final result
    #[error("failed to report final result: {0}")]
    Report(String),

    /// Invalid construction parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl PiError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrecognizedMessage { .. } => ErrorKind::UnrecognizedMessage,
            Self::AggregationOverflow { .. } | Self::ResultAfterRetirement { .. } => {
                ErrorKind::AggregationOverflow
            }
            Self::DuplicateFinalResult { .. } => ErrorKind::DuplicateFinalResult,
            Self::WorkerFault { .. } | Self::ActorPanicked { .. } => ErrorKind::WorkerFault,
            Self::MailboxClosed { .. } => ErrorKind::Delivery,
            Self::Lifecycle { .. } | Self::Incomplete | Self::InvalidParameter(_) => {
                ErrorKind::Lifecycle
            }
            Self::Report(_) => ErrorKind::Report,
        }
    }

    /// Whether this error must abort the computation
    pub fn is_fatal(&self) -> bool {
        self.kind() != ErrorKind::UnrecognizedMessage
    }
}
