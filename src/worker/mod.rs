//! Worker actor
//!
//! A Worker is the execution unit of the pool. It receives one [`WorkUnit`] at a
//! time, sums the series terms of that unit's range and replies with a
//! [`PartialResult`] to the `reply_to` address carried by the work message.
//!
//! # Thread Safety
//!
//! Workers hold no state besides their name. Any worker may serve any unit,
//! so the pool needs no synchronization between its members.
//!
//! # Example
//!
//! ```
//! use pisum::message::WorkUnit;
//! use pisum::worker::Worker;
//!
//! assert_eq!(Worker::compute(&WorkUnit::new(0, 1))?, 4.0);
//! assert_eq!(Worker::compute(&WorkUnit::new(0, 0))?, 0.0);
//! # Ok::<(), pisum::PiError>(())
//! ```

use crate::actor::{Actor, ActorRef, Flow};
use crate::error::PiError;
use crate::message::{Message, PartialResult, WorkUnit};
use crate::series;

/// Stateless series worker
#[derive(Debug)]
pub struct Worker {
    name: String,
}

impl Worker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Partial sum of the series over the unit's range
    ///
    /// # Errors
    ///
    /// `WorkerFault` when the range does not fit in `u64`.
    pub fn compute(unit: &WorkUnit) -> Result<f64, PiError> {
        let (first, end) = unit.range().ok_or_else(|| PiError::WorkerFault {
            actor: "worker".to_string(),
            start: unit.start,
            count: unit.count,
            reason: "index range overflows u64".to_string(),
        })?;

        Ok(series::partial_sum(first, end))
    }

    fn work(&self, unit: WorkUnit, reply_to: ActorRef) -> Result<(), PiError> {
        let value = Self::compute(&unit).map_err(|err| match err {
            PiError::WorkerFault { start, count, reason, .. } => PiError::WorkerFault {
                actor: self.name.clone(),
                start,
                count,
                reason,
            },
            other => other,
        })?;

        reply_to
            .tell(Message::PartialResult(PartialResult { value }))
            .map_err(|_| PiError::ResultAfterRetirement {
                actor: reply_to.name().to_string(),
            })
    }
}

impl Actor for Worker {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&mut self, message: Message) -> Result<Flow, PiError> {
        match message {
            Message::Work { unit, reply_to } => {
                self.work(unit, reply_to)?;
                Ok(Flow::Continue)
            }
            other => Err(PiError::UnrecognizedMessage {
                actor: self.name.clone(),
                message: other.kind(),
            }),
        }
    }
}
