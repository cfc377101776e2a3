//! Middleware that drops bursts of matching actions.

use std::time::{Duration, Instant};

use crate::action::Action;
use crate::middleware::{Middleware, MiddlewareContext};
use crate::state::State;

/// Leading-edge debounce: the first matching action is forwarded, further
/// matches are suppressed until `window` has passed since the last match
/// that was forwarded. A stream arriving faster than the window therefore
/// still gets through once per window. Actions the predicate rejects always
/// pass.
///
/// Suppression drops the action for the whole rest of the chain, reducer
/// included.
pub struct Debounce<F> {
    window: Duration,
    matches: F,
    last_forwarded: Option<Instant>,
}

impl<F> Debounce<F> {
    pub fn new(window: Duration, matches: F) -> Self {
        Self {
            window,
            matches,
            last_forwarded: None,
        }
    }
}

impl<S, A, F> Middleware<S, A> for Debounce<F>
where
    S: State,
    A: Action,
    F: Fn(&A) -> bool + Send,
{
    fn handle(&mut self, action: A, ctx: &mut dyn MiddlewareContext<S, A>) {
        if (self.matches)(&action) {
            let now = Instant::now();
            let within = self
                .last_forwarded
                .is_some_and(|prev| now.duration_since(prev) < self.window);
            if within {
                tracing::trace!("Debounced action");
                return;
            }
            self.last_forwarded = Some(now);
        }
        ctx.next(action);
    }
}
