//! Middleware that logs every action crossing the chain.

use std::fmt::Debug;
use std::time::Instant;

use crate::action::Action;
use crate::middleware::{Middleware, MiddlewareContext};
use crate::state::State;

/// Logs each action at debug level and the downstream handling time at
/// trace level. Purely observational: every action is forwarded untouched.
///
/// Install it first in the chain to see actions other middleware later
/// suppress or rewrite.
#[derive(Debug, Clone, Copy)]
pub struct Logging {
    scope: &'static str,
}

impl Logging {
    /// `scope` tags every record, which keeps logs apart when several
    /// stores run in one process.
    pub fn new(scope: &'static str) -> Self {
        Self { scope }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self::new("store")
    }
}

impl<S, A> Middleware<S, A> for Logging
where
    S: State,
    A: Action + Debug,
{
    fn handle(&mut self, action: A, ctx: &mut dyn MiddlewareContext<S, A>) {
        tracing::debug!(scope = %self.scope, action = ?action, "Dispatching action");
        let started = Instant::now();
        ctx.next(action);
        tracing::trace!(
            scope = %self.scope,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Action handled"
        );
    }
}
