//! Group membership lookup.
//!
//! This module provides:
//! - The `GroupProvider` trait consumed by access checks
//! - An in-memory `StaticGroupProvider`
//! - A TTL cache (`CachingGroupProvider`) over any provider

mod cache;

pub use cache::{CacheStats, CachingGroupProvider, GroupCacheConfig};

use crate::error::LookupError;
use async_trait::async_trait;
use indexmap::IndexSet;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves a user name to the names of the groups it belongs to
///
/// Implementations may block on I/O. Callers treat a failure as
/// "no groups" for the query at hand.
#[async_trait]
pub trait GroupProvider: Send + Sync {
    async fn groups(&self, user: &str) -> Result<IndexSet<String>, LookupError>;
}

#[async_trait]
impl<P: GroupProvider + ?Sized> GroupProvider for Arc<P> {
    async fn groups(&self, user: &str) -> Result<IndexSet<String>, LookupError> {
        (**self).groups(user).await
    }
}

/// Fixed user to groups mapping
///
/// Users without an entry fail with `LookupError::NoGroups`, matching a
/// directory that knows nothing about them.
///
/// # Examples
///
/// ```
/// use acl_manager::{GroupProvider, StaticGroupProvider};
///
/// # async fn example() {
/// let provider = StaticGroupProvider::new().with_user("alice", ["eng", "ops"]);
/// let groups = provider.groups("alice").await.unwrap();
/// assert!(groups.contains("ops"));
/// assert!(provider.groups("mallory").await.is_err());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticGroupProvider {
    memberships: HashMap<String, IndexSet<String>>,
}

impl StaticGroupProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user<I, S>(mut self, user: impl Into<String>, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.memberships
            .entry(user.into())
            .or_default()
            .extend(groups.into_iter().map(Into::into));
        self
    }
}

#[async_trait]
impl GroupProvider for StaticGroupProvider {
    async fn groups(&self, user: &str) -> Result<IndexSet<String>, LookupError> {
        match self.memberships.get(user) {
            Some(groups) if !groups.is_empty() => Ok(groups.clone()),
            _ => Err(LookupError::NoGroups {
                user: user.to_string(),
            }),
        }
    }
}
