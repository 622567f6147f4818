//! Registry of inspectable pages.
//!
//! [`PageRegistry`] is the contract an inspector target registers itself through.
//! [`InspectorRegistry`] is the in-process implementation; [`InspectorRegistry::global`]
//! is the instance production hosts bind to at startup.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use serde::{Deserialize, Serialize};

use crate::engine::{ConnectFn, LocalConnection, RemoteConnection};
use crate::{BridgeError, Result};

static GLOBAL_REGISTRY: OnceLock<Arc<InspectorRegistry>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub i32);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCapabilities {
    /// The target handles `Page.reload` itself.
    pub native_page_reloads: bool,
    pub prefers_fusebox_frontend: bool,
}

pub trait PageRegistry: Send + Sync {
    /// Registers a page. Returns `None` if the registry refused it.
    fn add_page(
        &self,
        title: &str,
        vm: &str,
        connect: ConnectFn,
        capabilities: PageCapabilities,
    ) -> Option<PageId>;

    fn remove_page(&self, id: PageId);
}

/// A page as listed to debugger frontends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescription {
    pub id: PageId,
    pub title: String,
    pub vm: String,
    pub capabilities: PageCapabilities,
}

struct Page {
    description: PageDescription,
    connect: ConnectFn,
}

pub struct InspectorRegistry {
    next_id: AtomicI32,
    pages: Mutex<BTreeMap<PageId, Page>>,
}

impl InspectorRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(1),
            pages: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn global() -> Arc<InspectorRegistry> {
        Arc::clone(GLOBAL_REGISTRY.get_or_init(|| Arc::new(InspectorRegistry::new())))
    }

    pub fn pages(&self) -> Vec<PageDescription> {
        self.lock().values().map(|p| p.description.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Hands a debugger connection to the page's connect callback.
    ///
    /// `Ok(None)` means the page exists but its target rejected the connection.
    pub fn connect(
        &self,
        id: PageId,
        remote: Box<dyn RemoteConnection>,
    ) -> Result<Option<Box<dyn LocalConnection>>> {
        let connect = self
            .lock()
            .get(&id)
            .map(|p| Arc::clone(&p.connect))
            .ok_or(BridgeError::UnknownPage(id))?;

        // Called without the lock held; targets may add or remove pages while connecting.
        let local = connect(remote);
        if local.is_none() {
            tracing::warn!("Inspector page {} rejected the connection", id);
        }
        Ok(local)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PageId, Page>> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InspectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InspectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InspectorRegistry")
            .field("pages", &self.pages())
            .finish()
    }
}

impl PageRegistry for InspectorRegistry {
    fn add_page(
        &self,
        title: &str,
        vm: &str,
        connect: ConnectFn,
        capabilities: PageCapabilities,
    ) -> Option<PageId> {
        let id = PageId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let description = PageDescription {
            id,
            title: title.to_string(),
            vm: vm.to_string(),
            capabilities,
        };
        self.lock().insert(id, Page { description, connect });
        tracing::info!("Registered inspector page {}: {}", id, title);
        Some(id)
    }

    fn remove_page(&self, id: PageId) {
        let removed = self.lock().remove(&id);
        match removed {
            Some(page) => {
                tracing::info!("Removed inspector page {}: {}", id, page.description.title);
                // The connect callback may own the last strong target reference.
                drop(page);
            }
            None => tracing::warn!("Attempted to remove unknown inspector page {}", id),
        }
    }
}
