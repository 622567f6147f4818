//! Marshaling of work onto the host thread.

use std::sync::Arc;

use crate::safe_ref::SafeHostRef;

/// A unit of work scheduled onto the host thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// The host's "run this on my thread" capability.
pub trait HostExecutor: Send + Sync {
    fn execute(&self, task: Task);
}

impl<F> HostExecutor for F
where
    F: Fn(Task) + Send + Sync,
{
    fn execute(&self, task: Task) {
        self(task)
    }
}

/// Copyable handle used to submit callbacks to the host thread from any thread.
///
/// Submissions are fire and forget. Ordering is whatever the host executor provides;
/// for a serial host thread that is FIFO. Once the executor has been released,
/// submissions are silently dropped.
#[derive(Clone, Debug)]
pub struct ExecutorAdapter {
    executor: SafeHostRef<dyn HostExecutor>,
}

impl ExecutorAdapter {
    pub fn new(executor: Arc<dyn HostExecutor>) -> Self {
        Self {
            executor: SafeHostRef::new(executor),
        }
    }

    pub fn submit<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_task(Box::new(callback));
    }

    pub fn submit_task(&self, task: Task) {
        match self.executor.get() {
            Some(executor) => executor.execute(task),
            None => tracing::warn!("Host executor released; dropping submitted callback"),
        }
    }

    /// Stops all future submissions through every clone of this adapter.
    pub fn release(&self) {
        self.executor.release();
    }

    pub fn is_released(&self) -> bool {
        self.executor.is_released()
    }
}
