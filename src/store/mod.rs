//! The store: owns state, serializes dispatch, republishes changes.

mod builder;
mod queue;

pub use builder::StoreBuilder;

use std::sync::Arc;

use parking_lot::Mutex;
use scopeguard::ScopeGuard;

use pubsub::{Publisher, ReplaySubject, Subscriber, Subscription};

use crate::action::Action;
use crate::middleware::{Dispatcher, Middleware, MiddlewareContext};
use crate::reducer::Reducer;
use crate::state::State;
use crate::store::queue::{DispatchQueue, Enqueue};

/// Owner of the application state.
///
/// Every dispatched action runs through one middleware chain and one
/// reducer, strictly serialized: no two reductions overlap, no matter
/// which threads dispatch. Committed states go out through a replay-last
/// subject, so a subscriber always starts from the current state and then
/// sees every change in commit order.
///
/// A `Store` value is a cheap handle; clones share the same state, queue
/// and subscribers.
pub struct Store<S: State, A: Action> {
    inner: Arc<StoreInner<S, A>>,
}

impl<S: State, A: Action> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State, A: Action> Store<S, A> {
    /// Configure a store with middleware. See [`StoreBuilder`].
    pub fn builder(initial: S) -> StoreBuilder<S, A> {
        StoreBuilder::new(initial)
    }

    /// Store with a reducer and no middleware.
    pub fn new(initial: S, reducer: impl Reducer<S, A> + 'static) -> Self {
        Self::builder(initial).reducer(reducer).build()
    }

    pub(crate) fn from_parts(
        initial: S,
        chain: Box<dyn Middleware<S, A>>,
        reducer: Box<dyn Reducer<S, A>>,
    ) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                queue: DispatchQueue::new(),
                pipeline: Mutex::new(Pipeline { chain, reducer }),
                subject: ReplaySubject::new(initial),
            }),
        }
    }

    /// Feed an action in. Never fails and returns nothing; outcomes are
    /// observed through state subscriptions.
    ///
    /// When no other dispatch is in flight the action (and everything it
    /// causes) is processed before this call returns. Otherwise it is
    /// queued and handled by the dispatch already running, in FIFO order.
    pub fn dispatch(&self, action: A) {
        self.inner.enqueue(action);
    }

    /// The most recently committed state.
    pub fn state(&self) -> S {
        self.inner.subject.get()
    }

    /// A dispatch handle that can outlive this reference, for UI callbacks
    /// and async tasks. It holds no strong reference to the store;
    /// dispatching after the store is gone is a no-op.
    pub fn dispatcher(&self) -> Dispatcher<A> {
        StoreInner::dispatcher(&self.inner)
    }
}

/// Subscribing hands the observer the current state immediately, then each
/// committed change in order. There is no second notification until a
/// dispatch actually changes the state.
impl<S: State, A: Action> Publisher<S> for Store<S, A> {
    fn subscribe(&self, subscriber: Box<dyn Subscriber<S>>) -> Subscription {
        self.inner.subject.subscribe(subscriber)
    }
}

struct Pipeline<S: State, A: Action> {
    chain: Box<dyn Middleware<S, A>>,
    reducer: Box<dyn Reducer<S, A>>,
}

struct StoreInner<S: State, A: Action> {
    queue: DispatchQueue<A>,
    // One lock spans the whole traversal; middleware state (&mut self)
    // lives behind it. Only the drainer thread ever takes it.
    pipeline: Mutex<Pipeline<S, A>>,
    subject: ReplaySubject<S>,
}

impl<S: State, A: Action> StoreInner<S, A> {
    fn enqueue(self: &Arc<Self>, action: A) {
        match self.queue.push(action) {
            Enqueue::Drain => self.drain(),
            Enqueue::Queued => {}
        }
    }

    fn drain(self: &Arc<Self>) {
        // Reset the drainer role if a middleware, reducer or subscriber
        // panics. Defused on the normal path: pop() has already released
        // the role, and a successor may hold it by the time we unwind.
        let guard = scopeguard::guard((), |()| {
            tracing::warn!("Dispatch unwound mid-drain; releasing the queue");
            self.queue.abandon();
        });
        while let Some(action) = self.queue.pop() {
            self.process(action);
        }
        ScopeGuard::into_inner(guard);
    }

    fn process(self: &Arc<Self>, action: A) {
        let mut pipeline = self.pipeline.lock();
        let Pipeline { chain, reducer } = &mut *pipeline;
        let mut ctx = RootContext {
            store: self,
            reducer: &**reducer,
        };
        chain.handle(action, &mut ctx);
    }

    fn dispatcher(self: &Arc<Self>) -> Dispatcher<A> {
        let store = Arc::downgrade(self);
        Dispatcher::new(move |action| {
            if let Some(store) = store.upgrade() {
                store.enqueue(action);
            }
        })
    }
}

// Terminal continuation of the chain: applies the reducer to the latest
// committed state and publishes the result when it differs.
struct RootContext<'a, S: State, A: Action> {
    store: &'a Arc<StoreInner<S, A>>,
    reducer: &'a dyn Reducer<S, A>,
}

impl<S: State, A: Action> MiddlewareContext<S, A> for RootContext<'_, S, A> {
    fn state(&self) -> S {
        self.store.subject.get()
    }

    fn next(&mut self, action: A) {
        let current = self.store.subject.get();
        let next = self.reducer.reduce(current.clone(), &action);
        if next != current {
            self.store.subject.push(next);
        }
    }

    fn dispatcher(&self) -> Dispatcher<A> {
        StoreInner::dispatcher(self.store)
    }
}
