//! Throttle: at most one run in flight, at most one run queued

use std::future::Future;
use std::mem;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::oneshot;

use super::lock;

/// The wrapped operation panicked or was torn down before producing a result
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("throttled operation was aborted before completing")]
pub struct Aborted;

type Operation<A, T> = Arc<dyn Fn(A) -> BoxFuture<'static, T> + Send + Sync>;
type Waiters<T> = Vec<oneshot::Sender<T>>;

/// Observable phase of a [`Throttle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottlePhase {
    Idle,
    Running,
    Queued,
}

enum ThrottleState<A, T> {
    Idle,
    /// A run is executing; `waiters` receive its result
    Running { waiters: Waiters<T> },
    /// A run is executing and another will follow with `next` arguments
    Queued {
        waiters: Waiters<T>,
        next: A,
        next_waiters: Waiters<T>,
    },
}

/// Wraps an async operation so that at most one execution is in flight
///
/// A call while idle starts a run and observes its result. Calls while a run
/// is in flight share a single queued run: each call overwrites the queued
/// arguments, and every such caller observes the result of that next run.
pub struct Throttle<A, T> {
    op: Operation<A, T>,
    state: Arc<Mutex<ThrottleState<A, T>>>,
}

impl<A, T> Throttle<A, T>
where
    A: Send + 'static,
    T: Clone + Send + 'static,
{
    pub fn new<F, Fut>(op: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        let op: Operation<A, T> = Arc::new(move |args: A| op(args).boxed());
        Self {
            op,
            state: Arc::new(Mutex::new(ThrottleState::Idle)),
        }
    }

    /// Request a run with `args`
    ///
    /// Registration happens immediately, not when the returned future is
    /// first polled. Must be called within a tokio runtime.
    pub fn call(&self, args: A) -> impl Future<Output = Result<T, Aborted>> + Send + 'static {
        let (tx, rx) = oneshot::channel();

        let start = {
            let mut state = lock(&self.state);
            match mem::replace(&mut *state, ThrottleState::Idle) {
                ThrottleState::Idle => {
                    *state = ThrottleState::Running { waiters: vec![tx] };
                    Some(args)
                }
                ThrottleState::Running { waiters } => {
                    *state = ThrottleState::Queued {
                        waiters,
                        next: args,
                        next_waiters: vec![tx],
                    };
                    None
                }
                ThrottleState::Queued {
                    waiters,
                    next: _,
                    mut next_waiters,
                } => {
                    next_waiters.push(tx);
                    *state = ThrottleState::Queued {
                        waiters,
                        next: args,
                        next_waiters,
                    };
                    None
                }
            }
        };

        if let Some(args) = start {
            tokio::spawn(drive(self.op.clone(), self.state.clone(), args));
        }

        async move { rx.await.map_err(|_| Aborted) }
    }

    pub fn phase(&self) -> ThrottlePhase {
        match *lock(&self.state) {
            ThrottleState::Idle => ThrottlePhase::Idle,
            ThrottleState::Running { .. } => ThrottlePhase::Running,
            ThrottleState::Queued { .. } => ThrottlePhase::Queued,
        }
    }
}

/// Execute runs until nothing is queued
async fn drive<A, T>(op: Operation<A, T>, state: Arc<Mutex<ThrottleState<A, T>>>, mut args: A)
where
    T: Clone,
{
    // If a run panics, drop every waiter (they observe `Aborted`) and go idle
    let reset = scopeguard::guard(state.clone(), |state| {
        *lock(&state) = ThrottleState::Idle;
    });

    loop {
        let result = op(args).await;

        let next = {
            let mut state = lock(&state);
            match mem::replace(&mut *state, ThrottleState::Idle) {
                ThrottleState::Queued {
                    waiters,
                    next,
                    next_waiters,
                } => {
                    *state = ThrottleState::Running {
                        waiters: next_waiters,
                    };
                    notify(waiters, &result);
                    Some(next)
                }
                ThrottleState::Running { waiters } => {
                    notify(waiters, &result);
                    None
                }
                ThrottleState::Idle => None,
            }
        };

        match next {
            Some(queued) => args = queued,
            None => break,
        }
    }

    scopeguard::ScopeGuard::into_inner(reset);
}

fn notify<T: Clone>(waiters: Waiters<T>, result: &T) {
    for waiter in waiters {
        // A caller that stopped waiting is not an error
        let _ = waiter.send(result.clone());
    }
}
