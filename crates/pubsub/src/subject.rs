use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::subscription::Subscription;
use crate::{Completion, Publisher, StreamError, Subscriber};

struct Entry<T> {
    id: u64,
    cancelled: AtomicBool,
    subscriber: Mutex<Box<dyn Subscriber<T>>>,
}

struct Core<T> {
    entries: Vec<Arc<Entry<T>>>,
    terminal: Option<Completion>,
    next_id: u64,
}

/// Broadcast channel: every pushed value fans out to all current
/// subscribers, in registration order, synchronously with respect to the
/// push call.
///
/// Cloning a `Subject` produces another handle to the same stream. The
/// subject also acts as a [`Subscriber`] (for `T: Clone`), so one subject
/// can be subscribed to another and republish whatever it receives.
///
/// Values pushed after termination are dropped. Do not push from inside a
/// notification callback of the same subject; delivery to an observer is
/// exclusive and the nested push would wait on itself.
pub struct Subject<T> {
    core: Arc<Mutex<Core<T>>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<T: Send + 'static> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> Subject<T> {
    pub fn new() -> Self {
        Self {
            core: Arc::new(Mutex::new(Core {
                entries: Vec::new(),
                terminal: None,
                next_id: 0,
            })),
        }
    }

    /// Deliver `value` to every live subscriber.
    ///
    /// The registry lock is not held while observers run, so callbacks may
    /// subscribe or unsubscribe freely.
    pub fn push(&self, value: T) {
        let snapshot = {
            let core = self.core.lock();
            if core.terminal.is_some() {
                return;
            }
            core.entries.clone()
        };
        for entry in &snapshot {
            if entry.cancelled.load(Ordering::SeqCst) {
                continue;
            }
            entry.subscriber.lock().on_value(&value);
        }
    }

    /// Terminate the stream normally.
    pub fn complete(&self) {
        self.terminate(Completion::Finished);
    }

    /// Terminate the stream with an error.
    pub fn fail(&self, error: StreamError) {
        self.terminate(Completion::Failed(error));
    }

    fn terminate(&self, completion: Completion) {
        let drained = {
            let mut core = self.core.lock();
            if core.terminal.is_some() {
                return;
            }
            core.terminal = Some(completion.clone());
            std::mem::take(&mut core.entries)
        };
        for entry in &drained {
            if entry.cancelled.load(Ordering::SeqCst) {
                continue;
            }
            entry.subscriber.lock().on_complete(&completion);
        }
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.core.lock().entries.len()
    }

    pub(crate) fn terminal(&self) -> Option<Completion> {
        self.core.lock().terminal.clone()
    }

    pub(crate) fn attach(&self, mut subscriber: Box<dyn Subscriber<T>>) -> Subscription {
        let entry = {
            let mut core = self.core.lock();
            if let Some(terminal) = core.terminal.clone() {
                drop(core);
                subscriber.on_complete(&terminal);
                return Subscription::spent();
            }
            let id = core.next_id;
            core.next_id += 1;
            let entry = Arc::new(Entry {
                id,
                cancelled: AtomicBool::new(false),
                subscriber: Mutex::new(subscriber),
            });
            core.entries.push(Arc::clone(&entry));
            entry
        };

        let id = entry.id;
        let entry = Arc::downgrade(&entry);
        let core = Arc::downgrade(&self.core);
        Subscription::new(move || {
            // Flag first so an in-flight delivery snapshot skips the entry,
            // then drop it from the registry.
            if let Some(entry) = entry.upgrade() {
                entry.cancelled.store(true, Ordering::SeqCst);
            }
            if let Some(core) = Weak::upgrade(&core) {
                core.lock().entries.retain(|e| e.id != id);
            }
        })
    }
}

impl<T: Send + 'static> Publisher<T> for Subject<T> {
    fn subscribe(&self, subscriber: Box<dyn Subscriber<T>>) -> Subscription {
        self.attach(subscriber)
    }
}

impl<T: Clone + Send + 'static> Subscriber<T> for Subject<T> {
    fn on_value(&mut self, value: &T) {
        self.push(value.clone());
    }

    fn on_complete(&mut self, completion: &Completion) {
        match completion {
            Completion::Finished => self.complete(),
            Completion::Failed(error) => self.fail(error.clone()),
        }
    }
}
