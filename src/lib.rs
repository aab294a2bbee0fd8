//! pisum - Leibniz-series pi approximation over a round-robin worker pool
//!
//! A coordinator splits the series into fixed-size work units, sends them all
//! through a round-robin distributor to a fixed pool of workers, and sums the
//! partial results in whatever order they come back. Once every unit has been
//! counted, the final approximation goes to a sink that reports it and shuts
//! the execution context down.
//!
//! # Architecture
//!
//! - **Actors**: tokio tasks with unbounded mailboxes, one message at a time
//! - **Execution context**: explicit owner of spawning and shutdown
//! - **Distributor**: round-robin routing with the reply address carried on each unit
//! - **Coordinator**: `Idle -> Accumulating -> Done` with overflow detection
//! - **Sink**: exactly-once reporting through a pluggable `Reporter`

pub mod actor;
pub mod config;
pub mod coordinator;
pub mod distributor;
pub mod error;
pub mod message;
pub mod output;
pub mod series;
pub mod sink;
pub mod system;
pub mod util;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorKind, PiError};
pub use message::FinalResult;
pub use system::{calculate, Calculation};
