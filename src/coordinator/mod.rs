//! Coordinator module
//!
//! Partitions the workload into fixed-size units, dispatches them all through
//! the distributor and aggregates the partial results as they come back.
//!
//! # State machine
//!
//! ```text
//! Idle --Start--> Accumulating --PartialResult (count < total)--> Accumulating
//!                 Accumulating --PartialResult (count == total)--> Done
//! ```
//!
//! `Done` is terminal: the coordinator sends one [`FinalResult`] to the sink,
//! drops its distributor handle (which tears the pool down once nothing else
//! holds it) and retires. Results are summed and counted independently, so
//! the arrival order of partial results does not matter.
//!
//! `pi` and `results_received` are only touched from `receive`, which the
//! actor loop calls one message at a time.

use crate::actor::{Actor, ActorRef, Flow};
use crate::distributor::DistributorRef;
use crate::error::PiError;
use crate::message::{FinalResult, Message, PartialResult, WorkUnit};
use std::time::Instant;
use tracing::{debug, info};

/// Coordinator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Accumulating,
    Done,
}

/// Work partitioning and result aggregation
#[derive(Debug)]
pub struct Coordinator {
    name: String,
    myself: ActorRef,
    distributor: Option<DistributorRef>,
    sink: ActorRef,
    total_units: u64,
    unit_size: u64,
    pi: f64,
    results_received: u64,
    created_at: Instant,
    phase: Phase,
}

impl Coordinator {
    /// Create a coordinator
    ///
    /// `myself` is the coordinator's own address, tagged on every dispatched
    /// unit as the reply destination. The elapsed time in the final result is
    /// measured from this call.
    pub fn new(
        myself: ActorRef,
        distributor: DistributorRef,
        sink: ActorRef,
        total_units: u64,
        unit_size: u64,
    ) -> Result<Self, PiError> {
        if total_units == 0 {
            return Err(PiError::InvalidParameter(
                "total_units must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            name: myself.name().to_string(),
            myself,
            distributor: Some(distributor),
            sink,
            total_units,
            unit_size,
            pi: 0.0,
            results_received: 0,
            created_at: Instant::now(),
            phase: Phase::Idle,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Running sum of the partial results consumed so far
    pub fn pi(&self) -> f64 {
        self.pi
    }

    pub fn results_received(&self) -> u64 {
        self.results_received
    }

    pub fn total_units(&self) -> u64 {
        self.total_units
    }

    fn on_start(&mut self) -> Result<(), PiError> {
        let distributor = match (&self.phase, &self.distributor) {
            (Phase::Idle, Some(distributor)) => distributor,
            _ => {
                return Err(PiError::UnrecognizedMessage {
                    actor: self.name.clone(),
                    message: "Start",
                })
            }
        };

        info!(
            total_units = self.total_units,
            unit_size = self.unit_size,
            "dispatching work units"
        );

        for start in 0..self.total_units {
            distributor.dispatch(WorkUnit::new(start, self.unit_size), self.myself.clone())?;
        }

        self.phase = Phase::Accumulating;
        Ok(())
    }

    fn on_partial_result(&mut self, result: PartialResult) -> Result<Flow, PiError> {
        if self.phase != Phase::Accumulating || self.results_received >= self.total_units {
            return Err(self.overflow());
        }

        self.pi += result.value;
        self.results_received += 1;

        if self.results_received < self.total_units {
            return Ok(Flow::Continue);
        }

        let final_result = FinalResult {
            value: self.pi,
            elapsed: self.created_at.elapsed(),
        };
        self.phase = Phase::Done;
        self.distributor = None;

        debug!(value = final_result.value, "all partial results received");
        self.sink.tell(Message::FinalResult(final_result))?;

        Ok(Flow::Stop)
    }

    fn overflow(&self) -> PiError {
        PiError::AggregationOverflow {
            actor: self.name.clone(),
            received: self.results_received,
            expected: self.total_units,
        }
    }
}

impl Actor for Coordinator {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&mut self, message: Message) -> Result<Flow, PiError> {
        // A retired coordinator accepts nothing
        if self.phase == Phase::Done {
            return Err(self.overflow());
        }

        match message {
            Message::Start => {
                self.on_start()?;
                Ok(Flow::Continue)
            }
            Message::PartialResult(result) => self.on_partial_result(result),
            other => Err(PiError::UnrecognizedMessage {
                actor: self.name.clone(),
                message: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{mailbox, Mailbox};
    use crate::error::ErrorKind;
    use crate::series;
    use crate::worker::Worker;
    use rand::seq::SliceRandom;

    struct Harness {
        coordinator: Coordinator,
        router_inbox: Mailbox,
        sink_inbox: Mailbox,
    }

    fn harness(total_units: u64, unit_size: u64) -> Harness {
        let (myself, _master_inbox) = mailbox("master");
        let (router, router_inbox) = mailbox("workerRouter");
        let (sink, sink_inbox) = mailbox("listener");

        let coordinator = Coordinator::new(
            myself,
            DistributorRef::new(router),
            sink,
            total_units,
            unit_size,
        )
        .unwrap();

        Harness { coordinator, router_inbox, sink_inbox }
    }

    fn drain_units(inbox: &mut Mailbox) -> Vec<WorkUnit> {
        let mut units = Vec::new();
        while let Some(message) = inbox.try_recv() {
            match message {
                Message::Work { unit, reply_to } => {
                    assert_eq!(reply_to.name(), "master");
                    units.push(unit);
                }
                other => panic!("unexpected message: {:?}", other),
            }
        }
        units
    }

    fn partial(value: f64) -> Message {
        Message::PartialResult(PartialResult { value })
    }

    #[test]
    fn test_start_dispatches_every_unit() {
        let mut h = harness(5, 100);
        assert_eq!(h.coordinator.phase(), Phase::Idle);
        assert_eq!(h.coordinator.total_units(), 5);

        h.coordinator.receive(Message::Start).unwrap();
        assert_eq!(h.coordinator.phase(), Phase::Accumulating);

        let units = drain_units(&mut h.router_inbox);
        let expected: Vec<WorkUnit> = (0..5).map(|s| WorkUnit::new(s, 100)).collect();
        assert_eq!(units, expected);
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut h = harness(3, 10);
        h.coordinator.receive(Message::Start).unwrap();
        drain_units(&mut h.router_inbox);

        let err = h.coordinator.receive(Message::Start).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedMessage);
        assert!(drain_units(&mut h.router_inbox).is_empty());
    }

    #[test]
    fn test_final_result_emitted_once_at_total() {
        let mut h = harness(3, 10);
        h.coordinator.receive(Message::Start).unwrap();

        assert_eq!(h.coordinator.receive(partial(1.0)).unwrap(), Flow::Continue);
        assert_eq!(h.coordinator.receive(partial(2.0)).unwrap(), Flow::Continue);
        assert!(h.sink_inbox.try_recv().is_none());

        assert_eq!(h.coordinator.receive(partial(0.5)).unwrap(), Flow::Stop);
        assert_eq!(h.coordinator.phase(), Phase::Done);
        assert_eq!(h.coordinator.results_received(), 3);

        match h.sink_inbox.try_recv() {
            Some(Message::FinalResult(result)) => assert_eq!(result.value, 3.5),
            other => panic!("unexpected message: {:?}", other),
        }
        assert!(h.sink_inbox.try_recv().is_none());
    }

    #[test]
    fn test_result_after_done_is_overflow() {
        let mut h = harness(1, 10);
        h.coordinator.receive(Message::Start).unwrap();
        h.coordinator.receive(partial(4.0)).unwrap();
        assert_eq!(h.coordinator.phase(), Phase::Done);

        let err = h.coordinator.receive(partial(100.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AggregationOverflow);
        assert!(err.is_fatal());
        assert_eq!(h.coordinator.pi(), 4.0);
        assert_eq!(h.coordinator.results_received(), 1);
        assert_eq!(h.coordinator.phase(), Phase::Done);

        h.sink_inbox.try_recv();
        assert!(h.sink_inbox.try_recv().is_none());
    }

    #[test]
    fn test_any_message_after_done_is_overflow() {
        let mut h = harness(1, 10);
        h.coordinator.receive(Message::Start).unwrap();
        h.coordinator.receive(partial(4.0)).unwrap();
        drain_units(&mut h.router_inbox);

        let err = h.coordinator.receive(Message::Start).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AggregationOverflow);
        assert!(drain_units(&mut h.router_inbox).is_empty());

        let err = h
            .coordinator
            .receive(Message::FinalResult(FinalResult {
                value: 0.0,
                elapsed: std::time::Duration::ZERO,
            }))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AggregationOverflow);
        assert_eq!(h.coordinator.phase(), Phase::Done);
    }

    #[test]
    fn test_result_before_start_is_overflow() {
        let mut h = harness(2, 10);
        let err = h.coordinator.receive(partial(1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AggregationOverflow);
        assert_eq!(h.coordinator.pi(), 0.0);
        assert_eq!(h.coordinator.results_received(), 0);
    }

    #[tokio::test]
    async fn test_releases_distributor_when_done() {
        let mut h = harness(1, 1);
        h.coordinator.receive(Message::Start).unwrap();
        h.coordinator.receive(partial(4.0)).unwrap();

        assert!(h.coordinator.distributor.is_none());
        assert_eq!(drain_units(&mut h.router_inbox).len(), 1);
        assert!(h.router_inbox.recv().await.is_none());
    }

    #[test]
    fn test_unrecognized_message() {
        let mut h = harness(1, 1);
        let err = h
            .coordinator
            .receive(Message::FinalResult(FinalResult {
                value: 0.0,
                elapsed: std::time::Duration::ZERO,
            }))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedMessage);
        assert_eq!(h.coordinator.phase(), Phase::Idle);
    }

    #[test]
    fn test_zero_units_rejected() {
        let (myself, _a) = mailbox("master");
        let (router, _b) = mailbox("workerRouter");
        let (sink, _c) = mailbox("listener");
        assert!(Coordinator::new(myself, DistributorRef::new(router), sink, 0, 10).is_err());
    }

    #[test]
    fn test_arrival_order_independent() {
        let total_units = 64;
        let unit_size = 250;
        let mut h = harness(total_units, unit_size);
        h.coordinator.receive(Message::Start).unwrap();

        let mut values: Vec<f64> = drain_units(&mut h.router_inbox)
            .iter()
            .map(|unit| Worker::compute(unit).unwrap())
            .collect();
        values.shuffle(&mut rand::thread_rng());

        let last = values.pop().unwrap();
        for value in values {
            assert_eq!(h.coordinator.receive(partial(value)).unwrap(), Flow::Continue);
        }
        assert_eq!(h.coordinator.receive(partial(last)).unwrap(), Flow::Stop);

        let expected = series::sequential_sum(total_units, unit_size);
        match h.sink_inbox.try_recv() {
            Some(Message::FinalResult(result)) => assert!((result.value - expected).abs() < 1e-9),
            other => panic!("unexpected message: {:?}", other),
        }
    }
}
