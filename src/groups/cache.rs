//! TTL cache in front of a group provider

use super::GroupProvider;
use crate::error::LookupError;
use async_trait::async_trait;
use dashmap::DashMap;
use indexmap::IndexSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::debug;

/// Configuration for the group cache
#[derive(Debug, Clone)]
pub struct GroupCacheConfig {
    /// Time-to-live for cached memberships
    pub ttl: Duration,

    /// Upper bound on cached memberships; expired entries go first, then
    /// the ones closest to expiry
    pub max_entries: usize,
}

impl Default for GroupCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_entries: 10_000,
        }
    }
}

/// Cache statistics for monitoring performance
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub size: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub hit_rate: f64,
}

#[derive(Debug, Clone)]
struct MembershipEntry {
    groups: IndexSet<String>,
    expires_at: Instant,
}

/// Caches successful lookups of an inner provider
///
/// Failures are passed through and never cached, so the next query asks
/// the backend again.
///
/// # Thread Safety
///
/// Uses DashMap for the membership cache and can be shared across tasks.
pub struct CachingGroupProvider<P> {
    inner: P,
    config: GroupCacheConfig,
    cache: DashMap<String, MembershipEntry>,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
}

impl<P: GroupProvider> CachingGroupProvider<P> {
    pub fn new(inner: P, config: GroupCacheConfig) -> Self {
        Self {
            inner,
            config,
            cache: DashMap::new(),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
        }
    }

    /// Clears cached memberships and resets statistics
    pub fn clear_cache(&self) {
        self.cache.clear();
        self.hit_count.store(0, Ordering::Relaxed);
        self.miss_count.store(0, Ordering::Relaxed);
    }

    /// Returns cache statistics
    pub fn get_stats(&self) -> CacheStats {
        let size = self.cache.len();
        let hits = self.hit_count.load(Ordering::Relaxed);
        let misses = self.miss_count.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            hits as f64 / total as f64
        } else {
            0.0
        };

        CacheStats {
            size,
            hit_count: hits,
            miss_count: misses,
            hit_rate,
        }
    }

    fn cached(&self, user: &str, now: Instant) -> Option<IndexSet<String>> {
        let entry = self.cache.get(user)?;
        if entry.expires_at > now {
            Some(entry.groups.clone())
        } else {
            None
        }
    }

    fn evict_expired_entries(&self) {
        let now = Instant::now();
        self.cache.retain(|_, entry| entry.expires_at > now);
    }

    fn enforce_capacity(&self) {
        self.evict_expired_entries();

        while self.cache.len() > self.config.max_entries {
            let soonest = self
                .cache
                .iter()
                .min_by_key(|entry| entry.value().expires_at)
                .map(|entry| entry.key().clone());

            match soonest {
                Some(user) => {
                    debug!(user = %user, "evicting group membership over capacity");
                    self.cache.remove(&user);
                }
                None => break,
            }
        }
    }
}

#[async_trait]
impl<P: GroupProvider> GroupProvider for CachingGroupProvider<P> {
    async fn groups(&self, user: &str) -> Result<IndexSet<String>, LookupError> {
        if let Some(groups) = self.cached(user, Instant::now()) {
            self.hit_count.fetch_add(1, Ordering::Relaxed);
            return Ok(groups);
        }

        self.miss_count.fetch_add(1, Ordering::Relaxed);
        let groups = self.inner.groups(user).await?;

        debug!(user, count = groups.len(), "caching group membership");
        self.cache.insert(
            user.to_string(),
            MembershipEntry {
                groups: groups.clone(),
                expires_at: Instant::now() + self.config.ttl,
            },
        );

        if self.cache.len() > self.config.max_entries {
            self.enforce_capacity();
        }

        Ok(groups)
    }
}
