//! Unidirectional data flow state container.
//!
//! All state lives in a single [`Store`]. The only way to change it is to
//! dispatch an [`Action`]; the store funnels every action through a
//! [`Middleware`] chain (side effects) into a [`Reducer`] (pure state
//! transition) and publishes each distinct new state to its subscribers.
//!
//! # Architecture
//!
//! ```text
//! dispatch(Action) ──→ Middleware chain ──→ Reducer ──→ State
//!        ↑                    │                           │
//!        └── Dispatcher ──────┘            subscribers ←──┘
//! ```
//!
//! - **State**: immutable snapshot of the whole app, replaced on each commit
//! - **Action**: the only input, a value describing what happened
//! - **Reducer**: pure `(State, &Action) -> State`, composable as a monoid
//! - **Middleware**: effectful interceptor that may observe, suppress,
//!   replace, or dispatch further actions
//!
//! Dispatches are serialized: actions dispatched from inside the pipeline
//! are queued and processed in order after the current one, so reducers and
//! middleware never re-enter.
//!
//! # Example
//!
//! ```
//! use uniflow::{Action, PublisherExt, State, Store};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Counter {
//!     count: i64,
//! }
//!
//! impl State for Counter {}
//!
//! #[derive(Debug)]
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! impl Action for CounterAction {}
//!
//! let store = Store::builder(Counter { count: 0 })
//!     .reducer(uniflow::reducer::from_fn(|state: Counter, action: &CounterAction| {
//!         match action {
//!             CounterAction::Increment => Counter { count: state.count + 1 },
//!             CounterAction::Decrement => Counter { count: state.count - 1 },
//!         }
//!     }))
//!     .build();
//!
//! let _token = store.subscribe_with(|state: &Counter| {
//!     println!("count is now {}", state.count);
//! });
//!
//! store.dispatch(CounterAction::Increment);
//! store.dispatch(CounterAction::Increment);
//! store.dispatch(CounterAction::Decrement);
//! assert_eq!(store.state().count, 1);
//! ```

pub mod action;
pub mod bridge;
pub mod middleware;
pub mod reducer;
pub mod state;
pub mod store;

pub use action::Action;
pub use bridge::SubscriptionStream;
pub use middleware::{Dispatcher, Middleware, MiddlewareContext};
pub use reducer::Reducer;
pub use state::State;
pub use store::{Store, StoreBuilder};

pub use pubsub::{
    Completion, Publisher, PublisherExt, ReplaySubject, StreamError, Subject, Subscriber,
    Subscription,
};
