//! Action queue that serializes dispatch behind a single drainer.

use std::collections::VecDeque;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

/// Outcome of queueing one action.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Enqueue {
    /// The caller became the drainer: it must call [`DispatchQueue::pop`]
    /// in a loop until it returns `None`, processing each action between
    /// calls.
    Drain,
    /// A drain is already running; the action will be picked up by it.
    Queued,
}

/// FIFO queue with one extra rule: actions queued by the drainer thread
/// itself (dispatch-backs made while an action is being processed) are
/// held aside and spliced, as one contiguous block, in front of everything
/// queued by other threads in the meantime. Derived actions therefore run
/// directly after the action that caused them, in submission order, and a
/// concurrent external dispatch can never land inside the block.
pub(crate) struct DispatchQueue<A> {
    inner: Mutex<Inner<A>>,
}

struct Inner<A> {
    pending: VecDeque<A>,
    deferred: Vec<A>,
    draining: bool,
    drainer: Option<ThreadId>,
}

impl<A> DispatchQueue<A> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                pending: VecDeque::new(),
                deferred: Vec::new(),
                draining: false,
                drainer: None,
            }),
        }
    }

    pub(crate) fn push(&self, action: A) -> Enqueue {
        let mut inner = self.inner.lock();
        if inner.draining {
            if inner.drainer == Some(thread::current().id()) {
                inner.deferred.push(action);
            } else {
                inner.pending.push_back(action);
            }
            return Enqueue::Queued;
        }
        inner.pending.push_back(action);
        inner.draining = true;
        inner.drainer = Some(thread::current().id());
        Enqueue::Drain
    }

    /// Next action to process. Splices the deferred block first, and when
    /// the queue turns out to be empty releases the drainer role in the
    /// same critical section, so no concurrently queued action can be
    /// stranded.
    pub(crate) fn pop(&self) -> Option<A> {
        let mut inner = self.inner.lock();
        splice_deferred(&mut inner);
        match inner.pending.pop_front() {
            Some(action) => Some(action),
            None => {
                inner.draining = false;
                inner.drainer = None;
                None
            }
        }
    }

    /// Unwind path: give up the drainer role without losing queued work.
    /// The next dispatch from any thread starts a fresh drain.
    pub(crate) fn abandon(&self) {
        let mut inner = self.inner.lock();
        splice_deferred(&mut inner);
        inner.draining = false;
        inner.drainer = None;
    }
}

fn splice_deferred<A>(inner: &mut Inner<A>) {
    for action in inner.deferred.drain(..).rev() {
        inner.pending.push_front(action);
    }
}
