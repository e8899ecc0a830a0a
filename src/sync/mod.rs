//! Concurrency-shaping helpers for refresh triggers
//!
//! - [`Throttle`]: one run in flight, at most one queued run with the latest
//!   arguments
//! - [`Debounce`]: run once after a quiet period, with the last arguments
//! - [`SingleFlight`]: concurrent callers share one in-flight future

mod debounce;
mod single_flight;
mod throttle;

pub use debounce::{Debounce, DebounceState};
pub use single_flight::SingleFlight;
pub use throttle::{Aborted, Throttle, ThrottlePhase};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the data if a previous holder panicked
///
/// Every state transition here is a single assignment, so a poisoned lock
/// never exposes a half-updated state.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
