//! Adapter from the publisher contract to async streams.
//!
//! The store deliberately commits to no reactive runtime; this is the thin
//! bridge for consumers that live in async code. Anything implementing
//! [`Publisher`] can be wrapped, the store included.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::mpsc;

use pubsub::{Completion, Publisher, StreamError, Subscriber, Subscription};

/// A [`Publisher`] exposed as a [`Stream`].
///
/// Values arrive in publish order, buffered without bound until polled. A
/// `Finished` terminal simply ends the stream; a `Failed` terminal yields
/// one final `Err` item first. Unlike a bare [`Subscription`], dropping
/// the stream releases the underlying subscription.
pub struct SubscriptionStream<T> {
    rx: mpsc::UnboundedReceiver<Result<T, StreamError>>,
    subscription: Subscription,
}

impl<T: Clone + Send + 'static> SubscriptionStream<T> {
    pub fn new<P>(publisher: &P) -> Self
    where
        P: Publisher<T> + ?Sized,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = publisher.subscribe(Box::new(ChannelSubscriber { tx }));
        Self { rx, subscription }
    }
}

impl<T> Stream for SubscriptionStream<T> {
    type Item = Result<T, StreamError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl<T> Drop for SubscriptionStream<T> {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}

// Publisher-side half: forwards into the channel until the receiver goes
// away. The sender drops with the subscriber entry, which is what closes
// the stream after a Finished terminal.
struct ChannelSubscriber<T> {
    tx: mpsc::UnboundedSender<Result<T, StreamError>>,
}

impl<T: Clone + Send + 'static> Subscriber<T> for ChannelSubscriber<T> {
    fn on_value(&mut self, value: &T) {
        let _ = self.tx.send(Ok(value.clone()));
    }

    fn on_complete(&mut self, completion: &Completion) {
        if let Completion::Failed(error) = completion {
            let _ = self.tx.send(Err(error.clone()));
        }
    }
}
