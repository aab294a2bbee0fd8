//! Result sink
//!
//! The sink is the terminal actor. It accepts exactly one [`FinalResult`],
//! hands it to a [`Reporter`], publishes it to whoever is waiting on the
//! computation and then shuts the execution context down. A second final
//! result means the coordinator failed to retire and is fatal.

use crate::actor::{Actor, ExecutionContext, Flow};
use crate::error::PiError;
use crate::message::{FinalResult, Message};
use tokio::sync::oneshot;
use tracing::info;

/// Output seam for the final result
pub trait Reporter: Send + 'static {
    fn report(&mut self, result: &FinalResult) -> anyhow::Result<()>;
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn report(&mut self, result: &FinalResult) -> anyhow::Result<()> {
        (**self).report(result)
    }
}

/// Fan-out to several reporters, stopping at the first failure
impl Reporter for Vec<Box<dyn Reporter>> {
    fn report(&mut self, result: &FinalResult) -> anyhow::Result<()> {
        for reporter in self.iter_mut() {
            reporter.report(result)?;
        }
        Ok(())
    }
}

/// Terminal actor receiving the final result
pub struct Sink<R: Reporter> {
    name: String,
    ctx: ExecutionContext,
    reporter: R,
    outcome: Option<oneshot::Sender<FinalResult>>,
    received: bool,
}

impl<R: Reporter> Sink<R> {
    /// Create a sink that reports through `reporter` and publishes on `outcome`
    pub fn new(
        name: impl Into<String>,
        ctx: ExecutionContext,
        reporter: R,
        outcome: oneshot::Sender<FinalResult>,
    ) -> Self {
        Self {
            name: name.into(),
            ctx,
            reporter,
            outcome: Some(outcome),
            received: false,
        }
    }

    fn on_final_result(&mut self, result: FinalResult) -> Result<(), PiError> {
        if self.received {
            return Err(PiError::DuplicateFinalResult {
                actor: self.name.clone(),
            });
        }
        self.received = true;

        info!(value = result.value, elapsed = ?result.elapsed, "final result received");
        self.reporter
            .report(&result)
            .map_err(|e| PiError::Report(format!("{:#}", e)))?;

        if let Some(outcome) = self.outcome.take() {
            // Receiver is gone if the caller stopped waiting
            let _ = outcome.send(result);
        }

        self.ctx.shutdown()
    }
}

impl<R: Reporter> Actor for Sink<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn receive(&mut self, message: Message) -> Result<Flow, PiError> {
        match message {
            Message::FinalResult(result) => {
                self.on_final_result(result)?;
                Ok(Flow::Continue)
            }
            other => Err(PiError::UnrecognizedMessage {
                actor: self.name.clone(),
                message: other.kind(),
            }),
        }
    }
}
