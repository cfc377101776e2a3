//! Minimal publish/subscribe primitives.
//!
//! This crate defines the smallest observer contract a state container needs
//! to broadcast values without committing to any particular streams library:
//! a [`Publisher`] hands out [`Subscription`] tokens, a [`Subject`] couples
//! the publisher and subscriber sides of one element stream, and
//! [`ReplaySubject`] additionally retains the latest value for new
//! subscribers.
//!
//! # Contract
//!
//! An observer receives zero or more `on_value` notifications followed by at
//! most one terminal `on_complete`. Nothing is delivered after the terminal.
//! Termination is the only error channel: no primitive panics or returns
//! `Result`, a failed stream simply terminates with [`Completion::Failed`].
//!
//! Pushes into one subject must be serialized by the caller (the usual
//! publisher contract); subscribing and unsubscribing are safe from any
//! thread at any time, including from inside a notification callback.

mod replay;
mod subject;
mod subscription;

pub use replay::ReplaySubject;
pub use subject::Subject;
pub use subscription::Subscription;

use thiserror::Error;

/// Error carried by a failed stream termination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stream failed: {reason}")]
pub struct StreamError {
    reason: String,
}

impl StreamError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Terminal notification of a stream.
///
/// At most one terminal notification is delivered per observer; afterwards
/// the observer is released and receives nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The stream ended normally.
    Finished,
    /// The stream ended because something went wrong.
    Failed(StreamError),
}

impl Completion {
    pub fn is_failure(&self) -> bool {
        matches!(self, Completion::Failed(_))
    }
}

/// Receiving side of a stream of values.
///
/// Implemented for any `FnMut(&T) + Send` closure (values only, terminal
/// ignored) and by [`Subject`] itself, so subjects can be piped into each
/// other.
pub trait Subscriber<T>: Send {
    /// Called for every value published while the subscription is live.
    fn on_value(&mut self, value: &T);

    /// Called at most once when the stream terminates.
    fn on_complete(&mut self, completion: &Completion) {
        let _ = completion;
    }
}

impl<T, F> Subscriber<T> for F
where
    F: FnMut(&T) + Send,
{
    fn on_value(&mut self, value: &T) {
        self(value)
    }
}

/// Broadcasting side of a stream of values.
///
/// Object safe on purpose: this is the seam a reactive backend adapter
/// implements. Use [`PublisherExt::subscribe_with`] to avoid boxing by hand.
pub trait Publisher<T> {
    /// Register an observer.
    ///
    /// The observer receives zero or more values and at most one terminal
    /// notification. The returned token releases the observer exactly once,
    /// no matter how often it is invoked.
    fn subscribe(&self, subscriber: Box<dyn Subscriber<T>>) -> Subscription;
}

/// Convenience extension over [`Publisher`].
pub trait PublisherExt<T>: Publisher<T> {
    /// `subscribe` without boxing at the call site.
    fn subscribe_with<S>(&self, subscriber: S) -> Subscription
    where
        S: Subscriber<T> + 'static,
        Self: Sized,
    {
        self.subscribe(Box::new(subscriber))
    }
}

impl<T, P> PublisherExt<T> for P where P: Publisher<T> {}
