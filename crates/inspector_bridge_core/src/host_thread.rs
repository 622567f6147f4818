use std::thread::{self, JoinHandle, ThreadId};

use tokio::sync::mpsc;

use crate::executor::{HostExecutor, Task};
use crate::Result;

/// A dedicated serial thread that runs submitted tasks in FIFO order.
///
/// Dropping the `HostThread` closes its queue, lets already-queued tasks finish and
/// joins the thread.
#[derive(Debug)]
pub struct HostThread {
    sender: Option<mpsc::UnboundedSender<Task>>,
    worker: Option<JoinHandle<()>>,
}

impl HostThread {
    pub fn spawn(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<Task>();

        let worker = thread::Builder::new().name(name.clone()).spawn(move || {
            tracing::debug!("Host thread {} started", name);
            while let Some(task) = receiver.blocking_recv() {
                task();
            }
            tracing::debug!("Host thread {} stopped", name);
        })?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    pub fn thread_id(&self) -> Option<ThreadId> {
        self.worker.as_ref().map(|w| w.thread().id())
    }

    pub fn is_current(&self) -> bool {
        self.thread_id() == Some(thread::current().id())
    }
}

impl HostExecutor for HostThread {
    fn execute(&self, task: Task) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.send(task).is_err() {
            tracing::warn!("Host thread has stopped; dropping task");
        }
    }
}

impl Drop for HostThread {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            // Never join ourselves when the last handle is dropped by a host task.
            if worker.thread().id() != thread::current().id() {
                if worker.join().is_err() {
                    tracing::error!("Host thread panicked while running a task");
                }
            }
        }
    }
}
