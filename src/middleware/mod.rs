//! Side-effect pipeline between dispatch and reduction.
//!
//! Every dispatched action traverses the middleware chain in configuration
//! order before it may reach the reducer. A middleware forwards the action
//! with [`MiddlewareContext::next`], swallows it by not forwarding, or
//! replaces it by forwarding something else. Side effects run here; state
//! transitions never do.
//!
//! Like reducers, middleware compose associatively ([`Middleware::then`],
//! with [`Identity`] as the neutral element) and can be projected into a
//! larger state/action space ([`Middleware::lift`]).

mod debounce;
mod lift;
mod logging;

pub use debounce::Debounce;
pub use lift::Lift;
pub use logging::Logging;

use std::fmt;
use std::sync::Arc;

use crate::action::Action;
use crate::state::State;

/// What a middleware sees while handling one action.
pub trait MiddlewareContext<S: State, A: Action> {
    /// The latest committed state.
    ///
    /// Re-reads on every call, so an async continuation that kept a
    /// [`Dispatcher`] around observes reductions committed after its own
    /// action was handled.
    fn state(&self) -> S;

    /// Forward an action to the rest of the chain and, past the last
    /// middleware, to the reducer.
    ///
    /// Not calling this suppresses the action: neither later middleware nor
    /// the reducer will see it.
    fn next(&mut self, action: A);

    /// Handle for dispatching new actions, typically from async work that
    /// outlives this `handle` call.
    ///
    /// Each dispatched action makes a fresh pass through the full chain
    /// from the top; it is never injected into the middle of the current
    /// pass.
    fn dispatcher(&self) -> Dispatcher<A>;
}

/// Intercepts every dispatched action before it reaches the reducer.
///
/// `handle` runs on the dispatching thread and must not block; hand
/// long-running work to a runtime and feed results back through the
/// context's [`Dispatcher`].
pub trait Middleware<S: State, A: Action>: Send {
    /// Process one action. Call `ctx.next(action)` to keep it moving.
    fn handle(&mut self, action: A, ctx: &mut dyn MiddlewareContext<S, A>);

    /// Chain composition: `self` sees the action first; whatever it
    /// forwards is handled by `next`.
    fn then<M>(self, next: M) -> Then<Self, M>
    where
        Self: Sized,
        M: Middleware<S, A>,
    {
        Then {
            first: self,
            second: next,
        }
    }

    /// Scope this middleware into a larger state/action space.
    ///
    /// `view` projects the whole state to the part this middleware reads,
    /// `extract` picks out (and translates) the actions it handles, and
    /// `inject` wraps its forwarded/dispatched actions back into the whole
    /// action type. Actions `extract` does not recognize pass down the
    /// chain unchanged.
    fn lift<W, GA, V, X, I>(self, view: V, extract: X, inject: I) -> Lift<Self, V, X, I>
    where
        Self: Sized,
        W: State,
        GA: Action,
        V: Fn(&W) -> S + Send,
        X: Fn(&GA) -> Option<A> + Send,
        I: Fn(A) -> GA + Clone + Send + Sync + 'static,
    {
        Lift::new(self, view, extract, inject)
    }
}

impl<S, A, M> Middleware<S, A> for Box<M>
where
    S: State,
    A: Action,
    M: Middleware<S, A> + ?Sized,
{
    fn handle(&mut self, action: A, ctx: &mut dyn MiddlewareContext<S, A>) {
        (**self).handle(action, ctx)
    }
}

/// Entry point for feeding actions back into a store.
///
/// Cheap to clone and safe to move into async tasks; dispatching after the
/// owning store is gone is a no-op.
pub struct Dispatcher<A> {
    sink: Arc<dyn Fn(A) + Send + Sync>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
        }
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl<A: Action> Dispatcher<A> {
    /// Wraps a sink function. Stores hand these out through
    /// [`MiddlewareContext::dispatcher`]; building one directly is mostly
    /// useful for exercising middleware in isolation.
    pub fn new(sink: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self {
            sink: Arc::new(sink),
        }
    }

    /// Dispatch an action as if from the outside: a full pass through the
    /// chain, serialized with every other dispatch.
    pub fn dispatch(&self, action: A) {
        (self.sink)(action);
    }

    /// Re-address the dispatcher: each action is wrapped with `inject`
    /// before forwarding. This is how lifted middleware dispatch child
    /// actions into the parent store.
    pub fn map<B: Action>(&self, inject: impl Fn(B) -> A + Send + Sync + 'static) -> Dispatcher<B> {
        let sink = Arc::clone(&self.sink);
        Dispatcher {
            sink: Arc::new(move |action| sink(inject(action))),
        }
    }
}

/// The empty middleware: forwards every action untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<S: State, A: Action> Middleware<S, A> for Identity {
    fn handle(&mut self, action: A, ctx: &mut dyn MiddlewareContext<S, A>) {
        ctx.next(action);
    }
}

/// Builds a middleware from a function or closure.
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn { f }
}

/// Middleware returned by [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<S, A, F> Middleware<S, A> for FromFn<F>
where
    S: State,
    A: Action,
    F: FnMut(A, &mut dyn MiddlewareContext<S, A>) + Send,
{
    fn handle(&mut self, action: A, ctx: &mut dyn MiddlewareContext<S, A>) {
        (self.f)(action, ctx)
    }
}

/// Middleware returned by [`Middleware::then`].
#[derive(Clone)]
pub struct Then<M1, M2> {
    first: M1,
    second: M2,
}

impl<S, A, M1, M2> Middleware<S, A> for Then<M1, M2>
where
    S: State,
    A: Action,
    M1: Middleware<S, A>,
    M2: Middleware<S, A>,
{
    fn handle(&mut self, action: A, ctx: &mut dyn MiddlewareContext<S, A>) {
        let mut tail = TailContext {
            second: &mut self.second,
            outer: ctx,
        };
        self.first.handle(action, &mut tail);
    }
}

// Context handed to the first half of a `Then`: forwarding continues into
// the second half, against the same outer context.
struct TailContext<'a, S: State, A: Action, M2> {
    second: &'a mut M2,
    outer: &'a mut dyn MiddlewareContext<S, A>,
}

impl<S, A, M2> MiddlewareContext<S, A> for TailContext<'_, S, A, M2>
where
    S: State,
    A: Action,
    M2: Middleware<S, A>,
{
    fn state(&self) -> S {
        self.outer.state()
    }

    fn next(&mut self, action: A) {
        self.second.handle(action, self.outer);
    }

    fn dispatcher(&self) -> Dispatcher<A> {
        self.outer.dispatcher()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Tally(i64);

    impl State for Tally {}

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Op {
        Add(i64),
        Mul(i64),
    }

    impl Action for Op {}

    struct TestContext {
        state: Tally,
        forwarded: Vec<Op>,
        dispatched: Arc<Mutex<Vec<Op>>>,
    }

    impl TestContext {
        fn new(state: Tally) -> Self {
            Self {
                state,
                forwarded: Vec::new(),
                dispatched: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl MiddlewareContext<Tally, Op> for TestContext {
        fn state(&self) -> Tally {
            self.state
        }

        fn next(&mut self, action: Op) {
            self.forwarded.push(action);
        }

        fn dispatcher(&self) -> Dispatcher<Op> {
            let sink = Arc::clone(&self.dispatched);
            Dispatcher::new(move |action| sink.lock().push(action))
        }
    }

    #[test]
    fn identity_forwards_untouched() {
        let mut ctx = TestContext::new(Tally(0));
        Identity.handle(Op::Add(1), &mut ctx);

        assert_eq!(ctx.forwarded, vec![Op::Add(1)]);
    }

    #[test]
    fn then_runs_in_configuration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let first_log = Arc::clone(&log);
        let first = from_fn(move |a: Op, ctx: &mut dyn MiddlewareContext<Tally, Op>| {
            first_log.lock().push("first");
            ctx.next(a);
        });
        let second_log = Arc::clone(&log);
        let second = from_fn(move |a: Op, ctx: &mut dyn MiddlewareContext<Tally, Op>| {
            second_log.lock().push("second");
            ctx.next(a);
        });

        let mut ctx = TestContext::new(Tally(0));
        first.then(second).handle(Op::Add(1), &mut ctx);

        assert_eq!(*log.lock(), vec!["first", "second"]);
        assert_eq!(ctx.forwarded, vec![Op::Add(1)]);
    }

    #[test]
    fn suppression_stops_the_rest_of_the_chain() {
        let reached = Arc::new(Mutex::new(false));

        let swallow = from_fn(|_: Op, _: &mut dyn MiddlewareContext<Tally, Op>| {
            // Never calls next.
        });
        let tail_reached = Arc::clone(&reached);
        let tail = from_fn(move |a: Op, ctx: &mut dyn MiddlewareContext<Tally, Op>| {
            *tail_reached.lock() = true;
            ctx.next(a);
        });

        let mut ctx = TestContext::new(Tally(0));
        swallow.then(tail).handle(Op::Add(1), &mut ctx);

        assert!(!*reached.lock());
        assert!(ctx.forwarded.is_empty());
    }

    #[test]
    fn middleware_may_replace_the_action() {
        let rewrite = from_fn(|a: Op, ctx: &mut dyn MiddlewareContext<Tally, Op>| {
            match a {
                Op::Add(n) => ctx.next(Op::Mul(n)),
                other => ctx.next(other),
            }
        });

        let mut ctx = TestContext::new(Tally(0));
        rewrite.then(Identity).handle(Op::Add(3), &mut ctx);

        assert_eq!(ctx.forwarded, vec![Op::Mul(3)]);
    }

    #[test]
    fn grouping_does_not_change_traversal_order() {
        fn tap(
            log: &Arc<Mutex<Vec<&'static str>>>,
            name: &'static str,
        ) -> impl Middleware<Tally, Op> {
            let log = Arc::clone(log);
            from_fn(move |a: Op, ctx: &mut dyn MiddlewareContext<Tally, Op>| {
                log.lock().push(name);
                ctx.next(a);
            })
        }

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut left = tap(&log, "a").then(tap(&log, "b")).then(tap(&log, "c"));
        let mut right = tap(&log, "a").then(tap(&log, "b").then(tap(&log, "c")));

        let mut ctx = TestContext::new(Tally(0));
        left.handle(Op::Add(1), &mut ctx);
        right.handle(Op::Add(1), &mut ctx);

        assert_eq!(*log.lock(), vec!["a", "b", "c", "a", "b", "c"]);
        assert_eq!(ctx.forwarded, vec![Op::Add(1), Op::Add(1)]);
    }

    #[test]
    fn context_state_reads_current_value() {
        let observed = Arc::new(Mutex::new(None));

        let sink = Arc::clone(&observed);
        let probe = from_fn(move |a: Op, ctx: &mut dyn MiddlewareContext<Tally, Op>| {
            *sink.lock() = Some(ctx.state());
            ctx.next(a);
        });

        let mut ctx = TestContext::new(Tally(42));
        probe.then(Identity).handle(Op::Add(1), &mut ctx);

        assert_eq!(*observed.lock(), Some(Tally(42)));
    }

    #[test]
    fn dispatcher_map_wraps_actions() {
        struct BumpBy(i64);
        impl Action for BumpBy {}

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let parent = Dispatcher::new(move |action: Op| sink.lock().push(action));

        let child: Dispatcher<BumpBy> = parent.map(|b: BumpBy| Op::Add(b.0));
        child.dispatch(BumpBy(9));

        assert_eq!(*seen.lock(), vec![Op::Add(9)]);
    }
}
