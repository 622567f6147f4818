//! Test doubles for the protocol engine, page registry, host and host executor.
//!
//! These are used internally by the test suite and are not part of the public API.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, ThreadId};

use crate::delegate::{HostDelegate, ReactHost};
use crate::engine::{
    ConnectFn, HostCommand, HostTargetCallbacks, LocalConnection, ProtocolEngine, RemoteConnection,
    TargetHandle,
};
use crate::executor::{ExecutorAdapter, HostExecutor, Task};
use crate::registry::{PageCapabilities, PageDescription, PageId, PageRegistry};
use crate::types::{OverlaySetPausedInDebuggerMessageRequest, RawMetadata};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    AddPage(PageId),
    RemovePage(PageId),
    Connected,
    Command(HostCommand),
    TargetDropped,
}

/// Ordered record of engine and registry activity, shared between fakes.
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.lock().unwrap().push(event);
    }

    /// Everything except connection attempts, which are racy by nature.
    pub fn events(&self) -> Vec<Event> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| **e != Event::Connected)
            .cloned()
            .collect()
    }

    pub fn connections(&self) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| **e == Event::Connected)
            .count()
    }

    pub fn target_dropped(&self) -> bool {
        self.0.lock().unwrap().contains(&Event::TargetDropped)
    }
}

/// Runs nothing until told to, like a host thread that has not yet drained its queue.
#[derive(Default)]
pub struct QueueExecutor {
    tasks: Mutex<VecDeque<Task>>,
}

impl QueueExecutor {
    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Runs queued tasks in FIFO order and returns how many ran.
    pub fn run_all(&self) -> usize {
        let mut ran = 0;
        loop {
            let task = self.tasks.lock().unwrap().pop_front();
            match task {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => return ran,
            }
        }
    }
}

impl HostExecutor for QueueExecutor {
    fn execute(&self, task: Task) {
        self.tasks.lock().unwrap().push_back(task);
    }
}

pub struct NullRemote;

impl RemoteConnection for NullRemote {
    fn on_message(&mut self, _message: String) {}

    fn on_disconnect(&mut self) {}
}

#[derive(Default)]
pub struct FakeLocal {
    pub sent: Vec<String>,
}

impl LocalConnection for FakeLocal {
    fn send_message(&mut self, message: String) {
        self.sent.push(message);
    }

    fn disconnect(&mut self) {}
}

pub struct FakeTarget {
    log: EventLog,
    _executor: Option<ExecutorAdapter>,
}

impl FakeTarget {
    /// A target not created through an engine.
    pub fn detached(log: EventLog) -> Self {
        Self {
            log,
            _executor: None,
        }
    }
}

impl TargetHandle for FakeTarget {
    fn connect(&self, _remote: Box<dyn RemoteConnection>) -> Option<Box<dyn LocalConnection>> {
        self.log.push(Event::Connected);
        Some(Box::new(FakeLocal::default()))
    }

    fn send_command(&self, command: HostCommand) {
        self.log.push(Event::Command(command));
    }
}

impl Drop for FakeTarget {
    fn drop(&mut self) {
        self.log.push(Event::TargetDropped);
    }
}

pub struct RecordingEngine {
    log: EventLog,
    targets: Mutex<Vec<Weak<FakeTarget>>>,
    callbacks: Mutex<Vec<Arc<dyn HostTargetCallbacks>>>,
}

impl RecordingEngine {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            targets: Mutex::new(Vec::new()),
            callbacks: Mutex::new(Vec::new()),
        }
    }

    pub fn targets_created(&self) -> usize {
        self.targets.lock().unwrap().len()
    }

    pub fn last_callbacks(&self) -> Option<Arc<dyn HostTargetCallbacks>> {
        self.callbacks.lock().unwrap().last().cloned()
    }
}

impl ProtocolEngine for RecordingEngine {
    fn create_target(
        &self,
        callbacks: Arc<dyn HostTargetCallbacks>,
        executor: ExecutorAdapter,
    ) -> Arc<dyn TargetHandle> {
        let target = Arc::new(FakeTarget {
            log: self.log.clone(),
            _executor: Some(executor),
        });
        self.targets.lock().unwrap().push(Arc::downgrade(&target));
        self.callbacks.lock().unwrap().push(callbacks);
        target
    }
}

pub struct RecordingRegistry {
    log: EventLog,
    next_id: Mutex<i32>,
    refuse: AtomicBool,
    pages: Mutex<HashMap<PageId, (PageDescription, ConnectFn)>>,
}

impl RecordingRegistry {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            next_id: Mutex::new(1),
            refuse: AtomicBool::new(false),
            pages: Mutex::new(HashMap::new()),
        }
    }

    pub fn refuse_pages(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }

    pub fn page(&self, id: PageId) -> Option<PageDescription> {
        self.pages.lock().unwrap().get(&id).map(|(d, _)| d.clone())
    }

    pub fn connect_fn(&self, id: PageId) -> Option<ConnectFn> {
        self.pages.lock().unwrap().get(&id).map(|(_, c)| Arc::clone(c))
    }
}

impl PageRegistry for RecordingRegistry {
    fn add_page(
        &self,
        title: &str,
        vm: &str,
        connect: ConnectFn,
        capabilities: PageCapabilities,
    ) -> Option<PageId> {
        if self.refuse.load(Ordering::SeqCst) {
            return None;
        }
        let id = {
            let mut next = self.next_id.lock().unwrap();
            let id = PageId(*next);
            *next += 1;
            id
        };
        let description = PageDescription {
            id,
            title: title.to_string(),
            vm: vm.to_string(),
            capabilities,
        };
        self.pages.lock().unwrap().insert(id, (description, connect));
        self.log.push(Event::AddPage(id));
        Some(id)
    }

    fn remove_page(&self, id: PageId) {
        self.log.push(Event::RemovePage(id));
        let removed = self.pages.lock().unwrap().remove(&id);
        drop(removed);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    DelegateReload,
    Reload(String),
    PausedMessage(Option<String>),
}

/// Host object implementing both integration styles.
#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
    reload_threads: Mutex<Vec<ThreadId>>,
    metadata: Mutex<RawMetadata>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn reload_threads(&self) -> Vec<ThreadId> {
        self.reload_threads.lock().unwrap().clone()
    }

    pub fn set_metadata(&self, pairs: &[(&str, &str)]) {
        *self.metadata.lock().unwrap() = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ReactHost for RecordingHost {
    fn reload(&self, reason: &str) {
        self.reload_threads.lock().unwrap().push(thread::current().id());
        self.record(HostCall::Reload(reason.to_string()));
    }

    fn set_paused_in_debugger_message(&self, message: Option<&str>) {
        self.record(HostCall::PausedMessage(message.map(str::to_string)));
    }

    fn host_metadata(&self) -> RawMetadata {
        self.metadata.lock().unwrap().clone()
    }
}

impl HostDelegate for RecordingHost {
    fn on_reload(&self) {
        self.reload_threads.lock().unwrap().push(thread::current().id());
        self.record(HostCall::DelegateReload);
    }

    fn on_set_paused_in_debugger_message(&self, request: &OverlaySetPausedInDebuggerMessageRequest) {
        self.record(HostCall::PausedMessage(request.message.clone()));
    }

    fn metadata(&self) -> RawMetadata {
        self.metadata.lock().unwrap().clone()
    }
}
