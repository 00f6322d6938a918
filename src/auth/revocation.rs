//! Revocation cache for logged-out tokens
//!
//! A revoked token is remembered only until its own expiry. After that the
//! signature check rejects it anyway, so the entry can go.

use crate::core::error::{Result, ServiceError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Store of revoked raw tokens with per-entry time-to-live
#[async_trait]
pub trait RevocationCache: Send + Sync {
    /// Mark `token` revoked for `ttl`, replacing any existing entry
    async fn revoke(&self, token: &str, ttl: Duration) -> Result<()>;

    /// Whether `token` is currently revoked
    async fn is_revoked(&self, token: &str) -> Result<bool>;
}

/// In-process revocation cache
///
/// Expired entries are invisible to readers immediately and are dropped
/// from memory by `purge_expired`, which `spawn_sweeper` runs periodically.
#[derive(Default)]
pub struct MemoryRevocationCache {
    entries: RwLock<HashMap<String, Instant>>,
}

impl MemoryRevocationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every entry whose deadline has passed, returning how many went
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        match self.entries.write() {
            Ok(mut entries) => {
                let before = entries.len();
                entries.retain(|_, deadline| *deadline > now);
                before - entries.len()
            }
            Err(_) => {
                warn!("Revocation cache lock poisoned; skipping purge");
                0
            }
        }
    }

    /// Number of entries held, including any not yet purged
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(_) => {
                warn!("Revocation cache lock poisoned; reporting it as empty");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Purge expired entries every `interval` until the cache is dropped
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else { break };
                let purged = cache.purge_expired();
                if purged > 0 {
                    debug!(purged, remaining = cache.len(), "Purged expired revocations");
                }
            }
        })
    }

    fn lock_error() -> ServiceError {
        ServiceError::Store("revocation cache lock poisoned".to_string())
    }
}

#[async_trait]
impl RevocationCache for MemoryRevocationCache {
    async fn revoke(&self, token: &str, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return Ok(());
        }

        let deadline = Instant::now() + ttl;
        self.entries
            .write()
            .map_err(|_| Self::lock_error())?
            .insert(token.to_string(), deadline);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool> {
        let entries = self.entries.read().map_err(|_| Self::lock_error())?;
        Ok(entries
            .get(token)
            .is_some_and(|deadline| *deadline > Instant::now()))
    }
}
