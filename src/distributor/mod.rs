//! Round-robin distributor
//!
//! Owns a fixed pool of [`Worker`]s created at construction and forwards every
//! work message to the next worker in turn. The `reply_to` address is passed
//! through untouched, so replies go straight back to the requester and never
//! through the distributor.
//!
//! The round-robin index is mutated only by the distributor's own receive
//! loop, which makes it single-writer without any lock or atomic.

use crate::actor::{mailbox, Actor, ActorRef, ExecutionContext, Flow};
use crate::error::PiError;
use crate::message::{Message, WorkUnit};
use crate::worker::Worker;
use std::num::NonZeroUsize;
use tracing::debug;

/// Round-robin router over a fixed worker pool
#[derive(Debug)]
pub struct Distributor {
    name: String,
    workers: Vec<ActorRef>,
    next: usize,
    dispatched: u64,
}

impl Distributor {
    /// Build a router over existing worker addresses
    pub fn with_workers(name: impl Into<String>, workers: Vec<ActorRef>) -> Result<Self, PiError> {
        if workers.is_empty() {
            return Err(PiError::InvalidParameter(
                "distributor needs at least one worker".to_string(),
            ));
        }

        Ok(Self {
            name: name.into(),
            workers,
            next: 0,
            dispatched: 0,
        })
    }

    /// Spawn `pool_size` workers plus the distributor on `ctx`
    pub fn spawn(ctx: &ExecutionContext, pool_size: NonZeroUsize) -> Result<DistributorRef, PiError> {
        let mut workers = Vec::with_capacity(pool_size.get());
        for id in 0..pool_size.get() {
            let name = format!("worker-{}", id);
            let (addr, inbox) = mailbox(name.as_str());
            ctx.spawn(Worker::new(name), inbox)?;
            workers.push(addr);
        }

        let (addr, inbox) = mailbox("workerRouter");
        let distributor = Self::with_workers("workerRouter", workers)?;
        debug!(pool_size = pool_size.get(), "worker pool created");
        ctx.spawn(distributor, inbox)?;

        Ok(DistributorRef { addr })
    }

    pub fn pool_size(&self) -> usize {
        self.workers.len()
    }

    /// Number of units forwarded so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    fn route(&mut self, unit: WorkUnit, reply_to: ActorRef) -> Result<(), PiError> {
        let worker = &self.workers[self.next];
        self.next = (self.next + 1) % self.workers.len();
        self.dispatched += 1;

        worker.tell(Message::Work { unit, reply_to })
    }
}

impl Actor for Distributor {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&mut self, message: Message) -> Result<Flow, PiError> {
        match message {
            Message::Work { unit, reply_to } => {
                self.route(unit, reply_to)?;
                Ok(Flow::Continue)
            }
            other => Err(PiError::UnrecognizedMessage {
                actor: self.name.clone(),
                message: other.kind(),
            }),
        }
    }
}

/// Handle used by callers to submit work to the pool
#[derive(Debug, Clone)]
pub struct DistributorRef {
    addr: ActorRef,
}

impl DistributorRef {
    pub fn new(addr: ActorRef) -> Self {
        Self { addr }
    }

    /// Submit `unit`; the worker's result goes to `reply_to`
    pub fn dispatch(&self, unit: WorkUnit, reply_to: ActorRef) -> Result<(), PiError> {
        self.addr.tell(Message::Work { unit, reply_to })
    }
}
