//! Construction of stores from their fixed parts.

use crate::action::Action;
use crate::middleware::{self, Middleware};
use crate::reducer::{self, Reducer};
use crate::state::State;
use crate::store::Store;

/// Assembles a [`Store`] from an initial state, one reducer and an ordered
/// middleware list. All three are fixed once `build` runs; there is no
/// runtime reconfiguration.
///
/// Middleware are chained in the order they are added: the first added is
/// the first to see every action. Compose reducers beforehand with
/// [`Reducer::then`]; a builder holds exactly one.
pub struct StoreBuilder<S: State, A: Action> {
    initial: S,
    reducer: Box<dyn Reducer<S, A>>,
    middleware: Vec<Box<dyn Middleware<S, A>>>,
}

impl<S: State, A: Action> StoreBuilder<S, A> {
    pub(crate) fn new(initial: S) -> Self {
        Self {
            initial,
            reducer: Box::new(reducer::Identity),
            middleware: Vec::new(),
        }
    }

    /// Set the reducer. Until set, the identity reducer is used and no
    /// action commits a change.
    pub fn reducer(mut self, reducer: impl Reducer<S, A> + 'static) -> Self {
        self.reducer = Box::new(reducer);
        self
    }

    /// Append a middleware to the end of the chain.
    pub fn middleware(mut self, middleware: impl Middleware<S, A> + 'static) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Build the store. The middleware list folds into a single chain;
    /// with no middleware, actions go straight to the reducer.
    pub fn build(self) -> Store<S, A> {
        let chain = self
            .middleware
            .into_iter()
            .rev()
            .reduce(|tail, mw| Box::new(mw.then(tail)) as Box<dyn Middleware<S, A>>)
            .unwrap_or_else(|| Box::new(middleware::Identity));
        Store::from_parts(self.initial, chain, self.reducer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::MiddlewareContext;
    use crate::reducer::from_fn;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Count(i64);

    impl State for Count {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Bump;

    impl Action for Bump {}

    #[test]
    fn default_reducer_commits_nothing() {
        let store: Store<Count, Bump> = Store::builder(Count(3)).build();

        store.dispatch(Bump);

        assert_eq!(store.state(), Count(3));
    }

    #[test]
    fn middleware_run_in_the_order_added() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let tap = |name: &'static str| {
            let log = Arc::clone(&log);
            middleware::from_fn(move |a: Bump, ctx: &mut dyn MiddlewareContext<Count, Bump>| {
                log.lock().push(name);
                ctx.next(a);
            })
        };

        let store = Store::builder(Count(0))
            .reducer(from_fn(|s: Count, _: &Bump| Count(s.0 + 1)))
            .middleware(tap("outer"))
            .middleware(tap("middle"))
            .middleware(tap("inner"))
            .build();

        store.dispatch(Bump);

        assert_eq!(*log.lock(), vec!["outer", "middle", "inner"]);
        assert_eq!(store.state(), Count(1));
    }
}
