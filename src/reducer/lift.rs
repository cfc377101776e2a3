//! Projection of reducers into larger state and action spaces.

use crate::action::Action;
use crate::reducer::Reducer;
use crate::state::State;

/// Reducer returned by [`Reducer::lift_state`].
///
/// Runs the inner reducer against the part `get` reads out of the whole,
/// then writes the result back with `put`. Fields of the whole outside the
/// part are never touched.
#[derive(Clone)]
pub struct LiftState<R, G, P> {
    inner: R,
    get: G,
    put: P,
}

impl<R, G, P> LiftState<R, G, P> {
    pub(crate) fn new(inner: R, get: G, put: P) -> Self {
        Self { inner, get, put }
    }
}

impl<W, Part, A, R, G, P> Reducer<W, A> for LiftState<R, G, P>
where
    W: State,
    Part: State,
    A: Action,
    R: Reducer<Part, A>,
    G: Fn(&W) -> Part + Send,
    P: Fn(W, Part) -> W + Send,
{
    fn reduce(&self, state: W, action: &A) -> W {
        let part = (self.get)(&state);
        let reduced = self.inner.reduce(part, action);
        (self.put)(state, reduced)
    }
}

/// Reducer returned by [`Reducer::lift_action`].
///
/// Forwards only the actions `extract` recognizes, translated into the
/// inner reducer's action type; everything else is a no-op.
#[derive(Clone)]
pub struct LiftAction<R, X> {
    inner: R,
    extract: X,
}

impl<R, X> LiftAction<R, X> {
    pub(crate) fn new(inner: R, extract: X) -> Self {
        Self { inner, extract }
    }
}

impl<S, GA, LA, R, X> Reducer<S, GA> for LiftAction<R, X>
where
    S: State,
    GA: Action,
    LA: Action,
    R: Reducer<S, LA>,
    X: Fn(&GA) -> Option<LA> + Send,
{
    fn reduce(&self, state: S, action: &GA) -> S {
        match (self.extract)(action) {
            Some(local) => self.inner.reduce(state, &local),
            None => state,
        }
    }
}
