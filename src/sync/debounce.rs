//! Debounce: run once after a quiet period

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use super::lock;

/// Whether a debounced run is waiting for its quiet period to end
#[derive(Debug)]
pub enum DebounceState {
    Idle,
    Pending {
        generation: u64,
        timer: JoinHandle<()>,
    },
}

/// Delays an operation until no call has arrived for `delay`
///
/// Every call restarts the timer; when it finally fires, only the last
/// call's arguments are used.
pub struct Debounce<A> {
    delay: Duration,
    op: Arc<dyn Fn(A) + Send + Sync>,
    state: Arc<Mutex<DebounceState>>,
    generation: AtomicU64,
}

impl<A: Send + 'static> Debounce<A> {
    pub fn new<F>(delay: Duration, op: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            delay,
            op: Arc::new(op),
            state: Arc::new(Mutex::new(DebounceState::Idle)),
            generation: AtomicU64::new(0),
        }
    }

    /// Schedule a run with `args`, replacing any pending one
    ///
    /// Must be called within a tokio runtime.
    pub fn call(&self, args: A) {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let mut state = lock(&self.state);

        if let DebounceState::Pending { timer, .. } = &*state {
            timer.abort();
        }

        let delay = self.delay;
        let op = self.op.clone();
        let shared = self.state.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = lock(&shared);
                match &*state {
                    DebounceState::Pending { generation: g, .. } if *g == generation => {
                        *state = DebounceState::Idle;
                    }
                    // Superseded by a later call
                    _ => return,
                }
            }
            op(args);
        });

        *state = DebounceState::Pending { generation, timer };
    }

    /// Drop the pending run, if any
    pub fn cancel(&self) {
        let mut state = lock(&self.state);
        if let DebounceState::Pending { timer, .. } = &*state {
            timer.abort();
        }
        *state = DebounceState::Idle;
    }

    pub fn is_pending(&self) -> bool {
        matches!(*lock(&self.state), DebounceState::Pending { .. })
    }
}

impl<A> Drop for Debounce<A> {
    fn drop(&mut self) {
        if let DebounceState::Pending { timer, .. } = &*lock(&self.state) {
            timer.abort();
        }
    }
}
