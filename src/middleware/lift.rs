//! Projection of middleware into larger state and action spaces.

use crate::action::Action;
use crate::middleware::{Dispatcher, Middleware, MiddlewareContext};
use crate::state::State;

/// Middleware returned by [`Middleware::lift`].
///
/// Actions the `extract` prism recognizes are translated and handed to the
/// inner middleware, which runs against a context that projects state reads
/// through `view` and wraps everything it forwards or dispatches with
/// `inject`. Unrecognized actions skip the inner middleware entirely and
/// continue down the chain.
pub struct Lift<M, V, X, I> {
    inner: M,
    view: V,
    extract: X,
    inject: I,
}

impl<M, V, X, I> Lift<M, V, X, I> {
    pub(crate) fn new(inner: M, view: V, extract: X, inject: I) -> Self {
        Self {
            inner,
            view,
            extract,
            inject,
        }
    }
}

impl<W, S, GA, A, M, V, X, I> Middleware<W, GA> for Lift<M, V, X, I>
where
    W: State,
    S: State,
    GA: Action,
    A: Action,
    M: Middleware<S, A>,
    V: Fn(&W) -> S + Send,
    X: Fn(&GA) -> Option<A> + Send,
    I: Fn(A) -> GA + Clone + Send + Sync + 'static,
{
    fn handle(&mut self, action: GA, ctx: &mut dyn MiddlewareContext<W, GA>) {
        match (self.extract)(&action) {
            Some(local) => {
                let mut scoped = ScopedContext {
                    view: &self.view,
                    inject: &self.inject,
                    outer: ctx,
                };
                self.inner.handle(local, &mut scoped);
            }
            None => ctx.next(action),
        }
    }
}

// Context the inner middleware runs against: state reads are projected,
// forwarded and dispatched actions are wrapped back into the parent type.
struct ScopedContext<'a, W: State, GA: Action, V, I> {
    view: &'a V,
    inject: &'a I,
    outer: &'a mut dyn MiddlewareContext<W, GA>,
}

impl<W, S, GA, A, V, I> MiddlewareContext<S, A> for ScopedContext<'_, W, GA, V, I>
where
    W: State,
    S: State,
    GA: Action,
    A: Action,
    V: Fn(&W) -> S,
    I: Fn(A) -> GA + Clone + Send + Sync + 'static,
{
    fn state(&self) -> S {
        (self.view)(&self.outer.state())
    }

    fn next(&mut self, action: A) {
        self.outer.next((self.inject)(action));
    }

    fn dispatcher(&self) -> Dispatcher<A> {
        self.outer.dispatcher().map(self.inject.clone())
    }
}
