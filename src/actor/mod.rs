//! Minimal actor plumbing
//!
//! An actor is a value that owns its state and handles one [`Message`] at a
//! time. Each actor gets a [`Mailbox`] (the receiving half of an unbounded
//! tokio channel) and is addressed through cloneable [`ActorRef`]s.
//!
//! The receive loop lives here so every component shares the same policy:
//!
//! - `Ok(Flow::Continue)`: wait for the next message
//! - `Ok(Flow::Stop)`: the actor retires, its mailbox is dropped
//! - unrecognized message: logged at `warn`, loop continues
//! - any other error: reported to the [`ExecutionContext`], loop exits
//!
//! The loop also exits as soon as the context shuts down. Messages already
//! queued at that point still go through [`Actor::receive`] unless a failure
//! has been recorded, so a protocol violation racing the shutdown is reported
//! rather than dropped.

pub mod context;

pub use context::ExecutionContext;

use crate::error::PiError;
use crate::message::Message;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, trace, warn};

/// What the receive loop does after a message was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// A unit of sequential message processing
pub trait Actor: Send + 'static {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Handle one message
    fn receive(&mut self, message: Message) -> Result<Flow, PiError>;
}

/// Address of an actor
#[derive(Clone)]
pub struct ActorRef {
    name: Arc<str>,
    tx: UnboundedSender<Message>,
}

impl ActorRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueue a message without waiting for it to be processed
    pub fn tell(&self, message: Message) -> Result<(), PiError> {
        self.tx.send(message).map_err(|_| PiError::MailboxClosed {
            actor: self.name.to_string(),
        })
    }

    /// Whether the receiving side is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl fmt::Debug for ActorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActorRef").field(&self.name).finish()
    }
}

/// Inbound queue of an actor
#[derive(Debug)]
pub struct Mailbox {
    rx: UnboundedReceiver<Message>,
}

impl Mailbox {
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Non-blocking receive, `None` when empty or closed
    pub fn try_recv(&mut self) -> Option<Message> {
        self.rx.try_recv().ok()
    }
}

/// Create a connected address/mailbox pair
pub fn mailbox(name: impl Into<Arc<str>>) -> (ActorRef, Mailbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ActorRef { name: name.into(), tx }, Mailbox { rx })
}

/// Drive `actor` until it retires, its mailbox closes, or the context shuts down
pub(crate) async fn run<A: Actor>(mut actor: A, mut mailbox: Mailbox, ctx: ExecutionContext) {
    let mut shutdown = ctx.subscribe();
    debug!(actor = actor.name(), "started");

    loop {
        if *shutdown.borrow_and_update() {
            drain(&mut actor, &mut mailbox, &ctx);
            break;
        }

        let message = tokio::select! {
            biased;
            _ = shutdown.changed() => continue,
            message = mailbox.recv() => match message {
                Some(message) => message,
                None => break,
            },
        };

        if !handle(&mut actor, message, &ctx) {
            break;
        }
    }

    debug!(actor = actor.name(), "stopped");
}

/// Handle the messages left in `mailbox` after shutdown
fn drain<A: Actor>(actor: &mut A, mailbox: &mut Mailbox, ctx: &ExecutionContext) {
    while !ctx.has_failed() {
        let Some(message) = mailbox.try_recv() else {
            break;
        };
        if !handle(actor, message, ctx) {
            break;
        }
    }
}

/// Apply the error policy to one message; `false` ends the loop
fn handle<A: Actor>(actor: &mut A, message: Message, ctx: &ExecutionContext) -> bool {
    trace!(actor = actor.name(), message = message.kind(), "received");

    match actor.receive(message) {
        Ok(Flow::Continue) => true,
        Ok(Flow::Stop) => {
            debug!(actor = actor.name(), "retired");
            false
        }
        Err(err) if !err.is_fatal() => {
            warn!(actor = actor.name(), "{}", err);
            true
        }
        Err(err) => {
            error!(actor = actor.name(), "{}", err);
            ctx.fail(err);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::PartialResult;

    #[test]
    fn test_tell_and_receive() {
        let (addr, mut inbox) = mailbox("probe");
        assert_eq!(addr.name(), "probe");

        addr.tell(Message::Start).unwrap();
        addr.tell(Message::PartialResult(PartialResult { value: 2.0 })).unwrap();

        assert!(matches!(inbox.try_recv(), Some(Message::Start)));
        assert!(matches!(
            inbox.try_recv(),
            Some(Message::PartialResult(PartialResult { value })) if value == 2.0
        ));
        assert!(inbox.try_recv().is_none());
    }

    #[test]
    fn test_tell_closed_mailbox() {
        let (addr, inbox) = mailbox("gone");
        drop(inbox);

        assert!(addr.is_closed());
        let err = addr.tell(Message::Start).unwrap_err();
        assert!(matches!(err, PiError::MailboxClosed { ref actor } if actor == "gone"));
    }
}
