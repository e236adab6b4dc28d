use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::cache::SessionCache;
use super::snapshot::SessionSnapshot;
use crate::services::EntitlementResolver;

/// Holder of the current session snapshot, mirrored into a [`SessionCache`].
///
/// Cloning shares the same state. `is_loading` starts true and drops to false
/// once the first rehydration finishes.
#[derive(Clone)]
pub struct SessionStore {
    snapshot: Arc<RwLock<Option<SessionSnapshot>>>,
    cache: Arc<dyn SessionCache>,
    loading: Arc<AtomicBool>,
}

/// Keeps `is_loading` raised until dropped
pub struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl LoadingGuard {
    fn start(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag: flag.clone() }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl SessionStore {
    pub fn new(cache: Arc<dyn SessionCache>) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(None)),
            cache,
            loading: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Loads the cached snapshot and revalidates its entitlement.
    pub async fn rehydrate(&self, resolver: &EntitlementResolver) {
        let _loading = self.begin_loading();

        match self.cache.load() {
            Ok(None) => debug!("no cached session"),
            Ok(Some(mut snapshot)) => {
                // The cached entitlement is never trusted
                snapshot.entitlement = resolver.resolve(snapshot.profile.id).await;
                self.write(snapshot).await;
            }
            Err(e) => {
                warn!(error = %e, "discarding unreadable session cache");
                self.clear().await;
            }
        }
    }

    /// Replaces the in-memory snapshot and the cache entry under one lock.
    /// If the entry cannot be saved it is removed, so a restart never comes
    /// back as a previous user.
    pub async fn write(&self, snapshot: SessionSnapshot) {
        let mut current = self.snapshot.write().await;
        if let Err(e) = self.cache.save(&snapshot) {
            warn!(error = %e, "session cache write failed, dropping cached entry");
            self.remove_cached();
        }
        *current = Some(snapshot);
    }

    pub async fn clear(&self) {
        let mut current = self.snapshot.write().await;
        self.remove_cached();
        *current = None;
    }

    fn remove_cached(&self) {
        if let Err(e) = self.cache.remove() {
            warn!(error = %e, "session cache removal failed");
        }
    }

    pub async fn snapshot(&self) -> Option<SessionSnapshot> {
        self.snapshot.read().await.clone()
    }

    pub async fn has_feature(&self, name: &str) -> bool {
        self.snapshot
            .read()
            .await
            .as_ref()
            .is_some_and(|snapshot| snapshot.has_feature(name))
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub(crate) fn begin_loading(&self) -> LoadingGuard {
        LoadingGuard::start(&self.loading)
    }
}
