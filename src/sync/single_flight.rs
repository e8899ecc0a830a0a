//! SingleFlight: callers arriving during a run share its result

use std::fmt;
use std::future::Future;
use std::sync::Mutex;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use super::lock;

/// At most one execution of an operation in flight; late callers join it
///
/// The shared run is forgotten as soon as it completes, or as soon as every
/// caller awaiting it has gone away. A later caller never resumes a run that
/// all of its waiters abandoned.
pub struct SingleFlight<T> {
    inflight: Mutex<Option<InFlight<T>>>,
}

struct InFlight<T> {
    run: Shared<BoxFuture<'static, T>>,
    waiters: usize,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            inflight: Mutex::new(None),
        }
    }
}

impl<T> fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleFlight")
            .field("in_flight", &lock(&self.inflight).as_ref().map(|r| r.waiters))
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is a run currently shared by at least one waiter?
    pub fn in_flight(&self) -> bool {
        lock(&self.inflight).is_some()
    }

    /// Await the in-flight run, or start one with `start` if none exists
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = {
            let mut inflight = lock(&self.inflight);
            match inflight.as_mut() {
                Some(running) => {
                    running.waiters += 1;
                    running.run.clone()
                }
                None => {
                    let run = start().boxed().shared();
                    *inflight = Some(InFlight {
                        run: run.clone(),
                        waiters: 1,
                    });
                    run
                }
            }
        };

        // Runs on completion and on cancellation alike
        let mut finished = scopeguard::guard(false, |finished| self.leave(&shared, finished));
        let result = shared.clone().await;
        *finished = true;
        result
    }

    fn leave(&self, shared: &Shared<BoxFuture<'static, T>>, finished: bool) {
        let mut inflight = lock(&self.inflight);
        let Some(running) = inflight.as_mut() else {
            return;
        };
        if !running.run.ptr_eq(shared) {
            return;
        }
        running.waiters = running.waiters.saturating_sub(1);
        if finished || running.waiters == 0 {
            *inflight = None;
        }
    }
}
