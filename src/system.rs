//! Actor system bootstrap
//!
//! Wires the components together on an explicit [`ExecutionContext`]:
//!
//! 1. start the context
//! 2. spawn the sink (`listener`)
//! 3. spawn the worker pool and its round-robin distributor (`workerRouter`)
//! 4. spawn the coordinator (`master`) and send it `Start`
//! 5. wait until the sink shuts the context down, or a fatal error does
//!
//! # Example
//!
//! ```no_run
//! use pisum::output::text::TextReporter;
//! use pisum::system::{calculate, Calculation};
//!
//! # async fn run() -> Result<(), pisum::PiError> {
//! let result = calculate(Calculation::new(8, 10_000, 10_000)?, TextReporter::stdout()).await?;
//! assert!((result.value - std::f64::consts::PI).abs() < 1e-2);
//! # Ok(())
//! # }
//! ```

use crate::actor::{mailbox, ExecutionContext};
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::distributor::Distributor;
use crate::error::PiError;
use crate::message::{FinalResult, Message};
use crate::sink::{Reporter, Sink};
use std::num::NonZeroUsize;
use tokio::sync::oneshot;
use tracing::info;

/// Parameters of one computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calculation {
    pub pool_size: NonZeroUsize,
    pub total_units: u64,
    pub unit_size: u64,
}

impl Calculation {
    pub fn new(pool_size: usize, total_units: u64, unit_size: u64) -> Result<Self, PiError> {
        let pool_size = NonZeroUsize::new(pool_size).ok_or_else(|| {
            PiError::InvalidParameter("pool_size must be greater than 0".to_string())
        })?;
        if total_units == 0 {
            return Err(PiError::InvalidParameter(
                "total_units must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            pool_size,
            total_units,
            unit_size,
        })
    }

    /// Number of series terms summed
    pub fn terms(&self) -> u64 {
        self.total_units.saturating_mul(self.unit_size)
    }
}

impl TryFrom<&Config> for Calculation {
    type Error = PiError;

    fn try_from(config: &Config) -> Result<Self, Self::Error> {
        Self::new(
            config.workers.pool_size,
            config.workload.total_units,
            config.workload.unit_size,
        )
    }
}

/// Run one computation on the current tokio runtime
///
/// Returns the final result once the sink has reported it, or the first fatal
/// error raised by any actor.
pub async fn calculate<R: Reporter>(
    calculation: Calculation,
    reporter: R,
) -> Result<FinalResult, PiError> {
    let ctx = ExecutionContext::current("PiSystem");
    ctx.start()?;

    info!(
        pool_size = calculation.pool_size.get(),
        total_units = calculation.total_units,
        unit_size = calculation.unit_size,
        "starting calculation"
    );

    let (outcome_tx, outcome_rx) = oneshot::channel();
    if let Err(err) = spawn_actors(&ctx, calculation, reporter, outcome_tx) {
        ctx.fail(err);
    }

    ctx.terminated().await?;
    let result = outcome_rx.await.map_err(|_| PiError::Incomplete)?;

    info!(value = result.value, elapsed = ?result.elapsed, "calculation finished");
    Ok(result)
}

fn spawn_actors<R: Reporter>(
    ctx: &ExecutionContext,
    calculation: Calculation,
    reporter: R,
    outcome: oneshot::Sender<FinalResult>,
) -> Result<(), PiError> {
    let (listener, listener_inbox) = mailbox("listener");
    ctx.spawn(Sink::new("listener", ctx.clone(), reporter, outcome), listener_inbox)?;

    let router = Distributor::spawn(ctx, calculation.pool_size)?;

    let (master, master_inbox) = mailbox("master");
    let coordinator = Coordinator::new(
        master.clone(),
        router,
        listener,
        calculation.total_units,
        calculation.unit_size,
    )?;
    ctx.spawn(coordinator, master_inbox)?;

    master.tell(Message::Start)
}
