//! Cross-thread host reference with explicit release.
//!
//! A [`SafeHostRef`] can be cloned into closures that run on arbitrary threads. Once the
//! host side calls [`SafeHostRef::release`], every clone observes `None` from
//! [`SafeHostRef::get`] instead of reaching a host object that has been torn down.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub struct SafeHostRef<T: ?Sized> {
    slot: Arc<Mutex<Option<Arc<T>>>>,
}

impl<T: ?Sized> SafeHostRef<T> {
    pub fn new(handle: Arc<T>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(handle))),
        }
    }

    /// Returns a strong handle to the host, or `None` once released.
    pub fn get(&self) -> Option<Arc<T>> {
        self.lock().clone()
    }

    /// Releases the host handle for every clone of this reference.
    ///
    /// Returns `true` only for the call that performed the release.
    pub fn release(&self) -> bool {
        let handle = self.lock().take();
        let released = handle.is_some();
        if released {
            tracing::trace!("Released safe host reference");
        }
        // Dropped after the guard so a host destructor may touch other clones.
        drop(handle);
        released
    }

    pub fn is_released(&self) -> bool {
        self.lock().is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: ?Sized> Clone for SafeHostRef<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T: ?Sized> fmt::Debug for SafeHostRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeHostRef")
            .field("released", &self.is_released())
            .finish()
    }
}
