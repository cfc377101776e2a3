//! Shared fixtures and recording subscribers.

#![allow(dead_code, unused_imports)]

use std::sync::Arc;

use parking_lot::Mutex;

use uniflow::{reducer, Action, Publisher, PublisherExt, Reducer, State, Subscription};

/// Install a log subscriber for a test run.
///
/// Off unless `RUST_LOG` asks for output; safe to call from every test,
/// only the first call in a process wins.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// -- Counter ------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Counter {
    pub count: i64,
}

pub fn zero() -> Counter {
    Counter { count: 0 }
}

impl State for Counter {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CounterAction {
    Increment,
    Decrement,
    Noop,
}

impl Action for CounterAction {}

pub fn counting() -> impl Reducer<Counter, CounterAction> {
    reducer::from_fn(|state: Counter, action: &CounterAction| match action {
        CounterAction::Increment => Counter {
            count: state.count + 1,
        },
        CounterAction::Decrement => Counter {
            count: state.count - 1,
        },
        CounterAction::Noop => state,
    })
}

// -- Login session ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Login,
    Loading,
    Main,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub screen: Screen,
    pub user: Option<String>,
}

pub fn logged_out() -> Session {
    Session {
        screen: Screen::Login,
        user: None,
    }
}

impl State for Session {}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    LoginRequested { name: String },
    LoginSucceeded { name: String },
    ScreenChanged(Screen),
}

impl Action for SessionAction {}

pub fn session_reducer() -> impl Reducer<Session, SessionAction> {
    reducer::from_fn(|state: Session, action: &SessionAction| match action {
        SessionAction::LoginRequested { .. } => Session {
            screen: Screen::Loading,
            ..state
        },
        SessionAction::LoginSucceeded { name } => Session {
            user: Some(name.clone()),
            ..state
        },
        SessionAction::ScreenChanged(screen) => Session {
            screen: *screen,
            ..state
        },
    })
}

// -- Recording subscriber -----------------------------------------------------

/// Records every value a publisher hands it, for later assertion.
pub struct Recorder<T> {
    values: Arc<Mutex<Vec<T>>>,
}

impl<T: Clone + Send + 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe to `publisher`; recording starts with the replayed value
    /// if the publisher has one.
    pub fn attach<P: Publisher<T>>(&self, publisher: &P) -> Subscription {
        let sink = Arc::clone(&self.values);
        publisher.subscribe_with(move |value: &T| sink.lock().push(value.clone()))
    }

    pub fn values(&self) -> Vec<T> {
        self.values.lock().clone()
    }
}
