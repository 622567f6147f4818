//! Demo host for the inspector bridge.
//!
//! Runs a toy host application on its own host thread, registers it with the global page
//! registry and attaches stdin/stdout as a debugger frontend through a loopback protocol
//! engine. Each stdin line is a CDP-style JSON message; the line `resume` asks the host
//! to send a debugger resume command.

use std::sync::{Arc, Mutex};

use inspector_bridge_core::engine::{LocalConnection, RemoteConnection};
use inspector_bridge_core::types::{HostRequest, RawMetadata};
use inspector_bridge_core::{
    BridgelessHost, BridgelessInspectorTarget, ExecutorAdapter, HostCommand, HostExecutor,
    HostTargetCallbacks, HostThread, InspectorFlags, InspectorRegistry, ProtocolEngine, ReactHost, TargetHandle,
};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const APP_IDENTIFIER: &str = "com.example.inspectordemo";

/// Host application stand-in. Must only be touched on the host thread.
struct DemoHost {
    host_thread: Arc<HostThread>,
    paused_message: Mutex<Option<String>>,
}

impl ReactHost for DemoHost {
    fn reload(&self, reason: &str) {
        debug_assert!(self.host_thread.is_current());
        tracing::info!("Host reloading ({})", reason);
    }

    fn set_paused_in_debugger_message(&self, message: Option<&str>) {
        debug_assert!(self.host_thread.is_current());
        match message {
            Some(message) => tracing::info!("Overlay: {}", message),
            None => tracing::info!("Overlay hidden"),
        }
        *self.paused_message.lock().unwrap_or_else(|e| e.into_inner()) = message.map(str::to_string);
    }

    fn host_metadata(&self) -> RawMetadata {
        let mut metadata = RawMetadata::new();
        metadata.insert("appIdentifier".into(), APP_IDENTIFIER.into());
        metadata.insert("platform".into(), std::env::consts::OS.into());
        metadata.insert("reactNativeVersion".into(), env!("CARGO_PKG_VERSION").into());
        if let Ok(name) = std::env::var("HOSTNAME") {
            metadata.insert("deviceName".into(), name);
        }
        metadata
    }
}

type SharedRemote = Arc<Mutex<Option<Box<dyn RemoteConnection>>>>;

fn notify(remote: &SharedRemote, message: Value) {
    if let Some(remote) = remote.lock().unwrap_or_else(|e| e.into_inner()).as_mut() {
        remote.on_message(message.to_string());
    }
}

/// Minimal protocol engine: one session at a time, requests decoded line by line.
struct LoopbackEngine;

struct LoopbackTarget {
    callbacks: Arc<dyn HostTargetCallbacks>,
    executor: ExecutorAdapter,
    remote: SharedRemote,
}

impl ProtocolEngine for LoopbackEngine {
    fn create_target(
        &self,
        callbacks: Arc<dyn HostTargetCallbacks>,
        executor: ExecutorAdapter,
    ) -> Arc<dyn TargetHandle> {
        Arc::new(LoopbackTarget {
            callbacks,
            executor,
            remote: Arc::new(Mutex::new(None)),
        })
    }
}

impl TargetHandle for LoopbackTarget {
    fn connect(&self, remote: Box<dyn RemoteConnection>) -> Option<Box<dyn LocalConnection>> {
        let mut slot = self.remote.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            tracing::warn!("Loopback engine already has a debugger session");
            return None;
        }
        *slot = Some(remote);
        Some(Box::new(LoopbackSession {
            callbacks: Arc::clone(&self.callbacks),
            remote: Arc::clone(&self.remote),
        }))
    }

    fn send_command(&self, command: HostCommand) {
        let remote = Arc::clone(&self.remote);
        self.executor.submit(move || {
            let method = match command {
                HostCommand::DebuggerResume => "Debugger.resumed",
                HostCommand::DebuggerStepOver => "Debugger.stepOver",
            };
            notify(&remote, json!({ "method": method }));
        });
    }
}

struct LoopbackSession {
    callbacks: Arc<dyn HostTargetCallbacks>,
    remote: SharedRemote,
}

impl LocalConnection for LoopbackSession {
    fn send_message(&mut self, message: String) {
        let parsed: Value = match serde_json::from_str(&message) {
            Ok(parsed) => parsed,
            Err(e) => {
                notify(&self.remote, json!({ "error": { "code": -32700, "message": e.to_string() } }));
                return;
            }
        };
        let id = parsed.get("id").cloned().unwrap_or(Value::Null);

        if parsed.get("method").and_then(Value::as_str) == Some("ReactNativeApplication.enable") {
            notify(&self.remote, json!({ "id": id, "result": {} }));
            let metadata = serde_json::to_value(self.callbacks.metadata()).unwrap_or(Value::Null);
            notify(
                &self.remote,
                json!({ "method": "ReactNativeApplication.metadataUpdated", "params": metadata }),
            );
            return;
        }

        match HostRequest::from_json(&message) {
            Ok(request) => {
                self.callbacks.dispatch(&request);
                notify(&self.remote, json!({ "id": id, "result": {} }));
            }
            Err(e) => notify(
                &self.remote,
                json!({ "id": id, "error": { "code": -32601, "message": e.to_string() } }),
            ),
        }
    }

    fn disconnect(&mut self) {
        if let Some(mut remote) = self.remote.lock().unwrap_or_else(|e| e.into_inner()).take() {
            remote.on_disconnect();
        }
    }
}

/// Debugger frontend end of the session: prints engine messages to stdout.
struct StdoutRemote;

impl RemoteConnection for StdoutRemote {
    fn on_message(&mut self, message: String) {
        println!("{}", message);
    }

    fn on_disconnect(&mut self) {
        tracing::info!("Debugger session closed");
    }
}

/// Waits until every task queued on `host_thread` so far has run.
async fn flush_host_thread(host_thread: &HostThread) {
    let (flushed_tx, flushed_rx) = tokio::sync::oneshot::channel();
    host_thread.execute(Box::new(move || {
        let _ = flushed_tx.send(());
    }));
    let _ = flushed_rx.await;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let flags = InspectorFlags::global();
    if !flags.fusebox_enabled {
        tracing::warn!("Fusebox disabled; set INSPECTOR_FUSEBOX_ENABLED=1 to register a page");
    }

    let host_thread = Arc::new(HostThread::spawn("demo-host")?);
    let host = Arc::new(DemoHost {
        host_thread: Arc::clone(&host_thread),
        paused_message: Mutex::new(None),
    });

    let registry = InspectorRegistry::global();
    let target = BridgelessInspectorTarget::new(
        flags,
        &LoopbackEngine,
        registry.clone(),
        host_thread.clone(),
        BridgelessHost::new(host.clone()),
    );
    tracing::info!("Inspector target state: {:?}", target.state());
    println!("{}", serde_json::to_string(&registry.pages())?);

    let mut local = match target.page_id() {
        Some(page_id) => registry.connect(page_id, Box::new(StdoutRemote))?,
        None => None,
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "resume" {
            if let Err(e) = target.send_debugger_resume_command() {
                tracing::error!("{}", e);
            }
            continue;
        }
        match local.as_mut() {
            Some(local) => local.send_message(line.to_string()),
            None => tracing::warn!("No debugger session; ignoring message"),
        }
    }

    if let Some(mut local) = local.take() {
        local.disconnect();
    }

    // Let commands already queued on the host thread land before tearing down.
    flush_host_thread(&host_thread).await;
    drop(target);
    tracing::info!(
        "Last overlay message: {:?}",
        host.paused_message.lock().unwrap_or_else(|e| e.into_inner())
    );

    Ok(())
}
