use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{dao::jam_store::JamStore, error::ServiceError};

pub type SharedState = Arc<AppState>;

/// Central application state holding the storage handle and degraded flag.
pub struct AppState {
    store: RwLock<Option<Arc<dyn JamStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new() -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn JamStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current store or fail with [`ServiceError::Degraded`].
    pub async fn require_store(&self) -> Result<Arc<dyn JamStore>, ServiceError> {
        let guard = self.store.read().await;
        match guard.as_ref() {
            Some(store) => Ok(store.clone()),
            None => Err(ServiceError::Degraded),
        }
    }

    /// Install a new store implementation and leave degraded mode.
    pub async fn install_store(&self, store: Arc<dyn JamStore>) {
        {
            let mut guard = self.store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub(crate) async fn update_degraded(&self, value: bool) {
        let changed = { *self.degraded.borrow() != value };
        if changed {
            let _ = self.degraded.send(value);
        }
    }
}
