use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex};

use crate::subject::Subject;
use crate::subscription::Subscription;
use crate::{Completion, Publisher, StreamError, Subscriber};

struct Versioned<T> {
    value: T,
    version: u64,
}

struct Shared<T> {
    // Serializes push/mutate/terminate/subscribe so replay-on-subscribe is
    // atomic with respect to concurrent pushes. Reentrant: a subscriber
    // callback may subscribe again; it must not push (documented below).
    delivery: ReentrantMutex<()>,
    value: Mutex<Versioned<T>>,
    relay: Subject<T>,
}

/// A [`Subject`] that retains the most recent value.
///
/// New subscribers receive the retained value immediately, then every later
/// one; no value is missed or seen twice around a concurrent push. If the
/// replay notification itself moves the value (say the callback dispatches
/// into a store backed by this subject), the newer value is delivered
/// before registration completes, so the subscriber is never left behind.
///
/// [`get`] reads the retained value without touching the delivery path, so
/// it is safe from anywhere, including a subscriber callback.
///
/// Subscribing from inside a callback is supported; pushing to the same
/// subject from inside a fan-out callback is not, as delivery to each
/// observer is exclusive.
///
/// [`get`]: ReplaySubject::get
pub struct ReplaySubject<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ReplaySubject<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Send + 'static> ReplaySubject<T> {
    pub fn new(initial: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                delivery: ReentrantMutex::new(()),
                value: Mutex::new(Versioned {
                    value: initial,
                    version: 0,
                }),
                relay: Subject::new(),
            }),
        }
    }

    /// Snapshot of the most recent value.
    pub fn get(&self) -> T {
        self.shared.value.lock().value.clone()
    }

    /// Retain `value` and fan it out to all subscribers.
    pub fn push(&self, value: T) {
        let _guard = self.shared.delivery.lock();
        if self.shared.relay.terminal().is_some() {
            return;
        }
        {
            let mut slot = self.shared.value.lock();
            slot.value = value.clone();
            slot.version += 1;
        }
        self.shared.relay.push(value);
    }

    /// Read, transform, and republish the value as one atomic step with
    /// respect to other `mutate`/`push` calls on this subject.
    ///
    /// `f` runs under the value lock and must not call back into this
    /// subject.
    pub fn mutate(&self, f: impl FnOnce(T) -> T) {
        let _guard = self.shared.delivery.lock();
        if self.shared.relay.terminal().is_some() {
            return;
        }
        let next = {
            let mut slot = self.shared.value.lock();
            let next = f(slot.value.clone());
            slot.value = next.clone();
            slot.version += 1;
            next
        };
        self.shared.relay.push(next);
    }

    /// Terminate the stream normally. The retained value stays readable
    /// through [`get`](ReplaySubject::get).
    pub fn complete(&self) {
        let _guard = self.shared.delivery.lock();
        self.shared.relay.complete();
    }

    /// Terminate the stream with an error.
    pub fn fail(&self, error: StreamError) {
        let _guard = self.shared.delivery.lock();
        self.shared.relay.fail(error);
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.relay.subscriber_count()
    }

    fn attach(&self, mut subscriber: Box<dyn Subscriber<T>>) -> Subscription {
        let _guard = self.shared.delivery.lock();
        // Replay until the value sits still. Re-entrant pushes from the
        // callback (this thread is the only one that can get past the
        // delivery guard) bump the version; everything the callback caused
        // is delivered before the entry is registered, after which normal
        // fan-out takes over with no gap.
        loop {
            let (snapshot, seen) = {
                let slot = self.shared.value.lock();
                (slot.value.clone(), slot.version)
            };
            subscriber.on_value(&snapshot);
            if self.shared.value.lock().version == seen {
                break;
            }
        }
        // A terminated relay hands the terminal straight to the subscriber.
        self.shared.relay.attach(subscriber)
    }
}

impl<T: Clone + Send + 'static> Publisher<T> for ReplaySubject<T> {
    fn subscribe(&self, subscriber: Box<dyn Subscriber<T>>) -> Subscription {
        self.attach(subscriber)
    }
}

impl<T: Clone + Send + 'static> Subscriber<T> for ReplaySubject<T> {
    fn on_value(&mut self, value: &T) {
        self.push(value.clone());
    }

    fn on_complete(&mut self, completion: &Completion) {
        match completion {
            Completion::Finished => self.complete(),
            Completion::Failed(error) => self.fail(error.clone()),
        }
    }
}
