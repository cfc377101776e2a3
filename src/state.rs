//! Base trait for the state a store owns.

/// Marker trait for state objects.
///
/// States should be:
/// - Immutable (Clone to create new states, never mutated in place)
/// - Self-contained (one value holds everything the store manages)
/// - Comparable (PartialEq for detecting changes)
///
/// The store keeps exactly one authoritative copy and replaces it on every
/// reduction that produces a different value.
pub trait State: Clone + PartialEq + Send + 'static {}
