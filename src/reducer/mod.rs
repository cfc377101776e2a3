//! Pure state transitions and their composition algebra.
//!
//! Reducers form a monoid: [`Identity`] is the empty element and
//! [`Reducer::then`] is the (associative) composition, so sub-reducers can
//! be combined in any grouping as long as their relative order is kept.
//! [`Reducer::lift_state`] and [`Reducer::lift_action`] project a reducer
//! written against a small state/action pair into a larger one, which is how
//! independently developed features compose into one application reducer.

mod lift;

pub use lift::{LiftAction, LiftState};

use crate::action::Action;
use crate::state::State;

/// Pure state transition: `(State, &Action) -> State`.
///
/// Must be total: every state/action pair produces a state, and an action a
/// reducer does not recognize returns the input unchanged (a no-op branch,
/// not an error). No side effects; those belong in middleware.
pub trait Reducer<S: State, A: Action>: Send {
    /// Process an action and return the new state.
    fn reduce(&self, state: S, action: &A) -> S;

    /// Sequential composition: `self` runs first, `next` reduces its output.
    ///
    /// `a.then(b).then(c)` and `a.then(b.then(c))` observe the same states.
    fn then<R>(self, next: R) -> Then<Self, R>
    where
        Self: Sized,
        R: Reducer<S, A>,
    {
        Then {
            first: self,
            second: next,
        }
    }

    /// Reduce a part of a larger state.
    ///
    /// `get` reads the part out of the whole, `put` writes the reduced part
    /// back; the rest of the whole is untouched.
    fn lift_state<W, G, P>(self, get: G, put: P) -> LiftState<Self, G, P>
    where
        Self: Sized,
        W: State,
        G: Fn(&W) -> S + Send,
        P: Fn(W, S) -> W + Send,
    {
        LiftState::new(self, get, put)
    }

    /// Reduce only the actions `extract` recognizes.
    ///
    /// Actions mapped to `None` pass through with the state unchanged.
    fn lift_action<GA, X>(self, extract: X) -> LiftAction<Self, X>
    where
        Self: Sized,
        GA: Action,
        X: Fn(&GA) -> Option<A> + Send,
    {
        LiftAction::new(self, extract)
    }
}

impl<S, A, R> Reducer<S, A> for Box<R>
where
    S: State,
    A: Action,
    R: Reducer<S, A> + ?Sized,
{
    fn reduce(&self, state: S, action: &A) -> S {
        (**self).reduce(state, action)
    }
}

/// The empty reducer: returns its input state for every action.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl<S: State, A: Action> Reducer<S, A> for Identity {
    fn reduce(&self, state: S, _action: &A) -> S {
        state
    }
}

/// Builds a reducer from a plain function or closure.
pub fn from_fn<F>(f: F) -> FromFn<F> {
    FromFn { f }
}

/// Reducer returned by [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F> {
    f: F,
}

impl<S, A, F> Reducer<S, A> for FromFn<F>
where
    S: State,
    A: Action,
    F: Fn(S, &A) -> S + Send,
{
    fn reduce(&self, state: S, action: &A) -> S {
        (self.f)(state, action)
    }
}

/// Reducer returned by [`Reducer::then`].
#[derive(Clone)]
pub struct Then<R1, R2> {
    first: R1,
    second: R2,
}

impl<S, A, R1, R2> Reducer<S, A> for Then<R1, R2>
where
    S: State,
    A: Action,
    R1: Reducer<S, A>,
    R2: Reducer<S, A>,
{
    fn reduce(&self, state: S, action: &A) -> S {
        self.second.reduce(self.first.reduce(state, action), action)
    }
}
