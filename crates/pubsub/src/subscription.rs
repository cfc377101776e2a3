use parking_lot::Mutex;

/// Cancellation token returned by `subscribe`.
///
/// Invoking [`unsubscribe`](Subscription::unsubscribe) releases the observer
/// and its registry entry exactly once; further calls are no-ops. Dropping
/// the token does *not* cancel the subscription — observers live until they
/// are released explicitly or the stream terminates.
pub struct Subscription {
    release: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    pub(crate) fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Mutex::new(Some(Box::new(release))),
        }
    }

    /// A token with nothing left to release (the stream already terminated
    /// before the observer was registered).
    pub(crate) fn spent() -> Self {
        Self {
            release: Mutex::new(None),
        }
    }

    /// Release the observer.
    ///
    /// Idempotent, and safe to call from any thread at any point — including
    /// from inside a notification callback while delivery is in progress.
    pub fn unsubscribe(&self) {
        let release = self.release.lock().take();
        if let Some(release) = release {
            release();
        }
    }
}
