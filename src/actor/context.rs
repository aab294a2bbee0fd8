//! Execution context
//!
//! Explicitly owned handle over the tokio runtime the actors run on. It is the
//! only place where actors are spawned and the only place shutdown happens.
//!
//! # Lifecycle
//!
//! ```text
//! Created --start()--> Running --shutdown() / fail()--> ShutDown
//! ```
//!
//! Shutdown is broadcast over a `watch` channel that every receive loop
//! observes, so a single call stops the whole actor system. [`terminated`]
//! only returns once every spawned actor has exited, so a failure raised
//! while the actors wind down is still reported.
//!
//! [`terminated`]: ExecutionContext::terminated

use crate::actor::{self, Actor, Mailbox};
use crate::error::PiError;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Created,
    Running,
    ShutDown,
}

struct Inner {
    name: String,
    handle: Handle,
    state: Mutex<State>,
    failure: Mutex<Option<PiError>>,
    shutdown_tx: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// Shared handle over the actor system's substrate
#[derive(Clone)]
pub struct ExecutionContext {
    inner: Arc<Inner>,
}

impl ExecutionContext {
    /// Create a context that spawns onto `handle`
    pub fn new(name: impl Into<String>, handle: Handle) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                handle,
                state: Mutex::new(State::Created),
                failure: Mutex::new(None),
                shutdown_tx,
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a context on the runtime of the calling task
    ///
    /// Panics outside a tokio runtime, like `Handle::current()`.
    pub fn current(name: impl Into<String>) -> Self {
        Self::new(name, Handle::current())
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Allow actors to be spawned
    pub fn start(&self) -> Result<(), PiError> {
        let mut state = self.state();
        if *state != State::Created {
            return Err(self.lifecycle("already started"));
        }
        *state = State::Running;
        info!(context = %self.inner.name, "execution context started");
        Ok(())
    }

    /// Stop every actor of this context
    ///
    /// Fails if the context is not running, so a second shutdown is surfaced.
    pub fn shutdown(&self) -> Result<(), PiError> {
        let mut state = self.state();
        match *state {
            State::Running => {
                *state = State::ShutDown;
                drop(state);
                self.inner.shutdown_tx.send_replace(true);
                info!(context = %self.inner.name, "execution context shut down");
                Ok(())
            }
            State::Created => Err(self.lifecycle("shutdown before start")),
            State::ShutDown => Err(self.lifecycle("already shut down")),
        }
    }

    /// Record a fatal error and shut down
    ///
    /// Only the first failure is kept; later ones are logged.
    pub fn fail(&self, err: PiError) {
        {
            let mut failure = self.inner.failure.lock().unwrap_or_else(|e| e.into_inner());
            if failure.is_none() {
                *failure = Some(err);
            } else {
                debug!(context = %self.inner.name, "additional failure: {}", err);
            }
        }

        let mut state = self.state();
        if *state != State::ShutDown {
            *state = State::ShutDown;
            drop(state);
            self.inner.shutdown_tx.send_replace(true);
            error!(context = %self.inner.name, "execution context aborted");
        }
    }

    pub fn is_running(&self) -> bool {
        *self.state() == State::Running
    }

    pub fn is_shut_down(&self) -> bool {
        *self.state() == State::ShutDown
    }

    /// Whether a fatal error has been recorded and not yet handed out
    pub fn has_failed(&self) -> bool {
        self.inner.failure.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }

    /// Receiver that flips to `true` on shutdown
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.shutdown_tx.subscribe()
    }

    /// Spawn `actor` and a supervisor that turns a panic into a fatal failure
    pub fn spawn<A: Actor>(&self, actor: A, mailbox: Mailbox) -> Result<(), PiError> {
        // Held across the spawn so shutdown cannot slip in before the task is tracked
        let state = self.state();
        if *state != State::Running {
            return Err(self.lifecycle("spawn while not running"));
        }

        let name = actor.name().to_string();
        let task = self.inner.handle.spawn(actor::run(actor, mailbox, self.clone()));

        let ctx = self.clone();
        let supervisor = self.inner.handle.spawn(async move {
            if let Err(join_err) = task.await {
                if join_err.is_panic() {
                    ctx.fail(PiError::ActorPanicked { actor: name });
                }
            }
        });
        self.tasks().push(supervisor);

        Ok(())
    }

    /// Wait for shutdown and for every actor to exit, then return the first
    /// recorded failure, if any
    ///
    /// The failure is handed out once; later calls see `Ok(())`.
    pub async fn terminated(&self) -> Result<(), PiError> {
        let mut shutdown = self.subscribe();
        while !*shutdown.borrow_and_update() {
            if shutdown.changed().await.is_err() {
                break;
            }
        }

        let tasks = std::mem::take(&mut *self.tasks());
        debug!(context = %self.inner.name, actors = tasks.len(), "joining actors");
        for task in tasks {
            // Supervisors never panic
            let _ = task.await;
        }

        match self.inner.failure.lock().unwrap_or_else(|e| e.into_inner()).take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn tasks(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.inner.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lifecycle(&self, reason: &'static str) -> PiError {
        PiError::Lifecycle {
            context: self.inner.name.clone(),
            reason,
        }
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("name", &self.inner.name)
            .field("state", &*self.state())
            .finish()
    }
}
