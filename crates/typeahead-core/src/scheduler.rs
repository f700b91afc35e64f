//! Scheduler boundary: how the pipeline waits and where it dispatches work.
//!
//! The pipeline never calls `tokio::time` or `tokio::spawn` directly; it asks
//! its injected [`Scheduler`]. [`TokioScheduler`] is the only production
//! implementation. Under a runtime with a paused clock
//! (`#[tokio::test(start_paused = true)]`) the same scheduler runs on virtual
//! time, which is what the test harnesses rely on.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::runtime::Handle;

pub trait Scheduler: Send + Sync {
    /// Resolve once `duration` has elapsed.
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;

    /// Run `task` concurrently with the caller, off the pipeline's context.
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

/// [`Scheduler`] backed by a tokio runtime.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Bind to the runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self { handle: Handle::current() }
    }

    pub fn with_handle(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Scheduler for TokioScheduler {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed()
    }

    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self.handle.spawn(task);
    }
}
