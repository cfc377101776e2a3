//! Base trait for actions dispatched through a store.

/// Marker trait for action objects.
///
/// Actions represent:
/// - User interactions (clicks, key presses)
/// - External events (API responses, timers)
/// - Follow-up work dispatched back by middleware
///
/// Actions are immutable once created and carry no identity beyond their
/// payload: dispatching two equal actions is two dispatches.
pub trait Action: Send + 'static {}
