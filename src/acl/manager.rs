//! Layered AM/DAG access decisions

use super::allow_list::AllowList;
use super::types::{AccessDecision, AccessReason, AclType, ApplicationAccessType, WILDCARD_ACL_VALUE};
use crate::config::{AclConfig, AclParser, ConfigAclParser};
use crate::error::{AuthzError, LookupError, Result};
use crate::groups::GroupProvider;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Access control for an AM and, when derived, one of its DAGs
///
/// # Decision order
///
/// ```text
/// disabled? → AM owner → DAG owner (DAG kinds) → user list → group list → deny
/// ```
///
/// The first rule that grants wins. Group lists are only consulted when the
/// action has a non-empty group entry, and a failed group lookup degrades to
/// "no group grant" instead of failing the check.
///
/// # Thread Safety
///
/// Allow-lists are immutable snapshots behind `Arc`. Deriving a DAG manager
/// copies the parent's lists before merging DAG entries, so neither the parent
/// nor sibling DAGs observe them.
///
/// # Examples
///
/// ```
/// use acl_manager::{AclConfig, AclManager, AclType, StaticGroupProvider};
/// use std::sync::Arc;
///
/// # async fn example() -> acl_manager::Result<()> {
/// let config = AclConfig::new().with_acl(AclType::AmView, "alice");
/// let am = AclManager::new(Arc::new(StaticGroupProvider::new()), "admin", Some(&config))?;
///
/// assert!(am.check_am_view_access("alice").await);
/// assert!(am.check_am_modify_access("admin").await);
/// assert!(!am.check_am_modify_access("alice").await);
/// # Ok(())
/// # }
/// ```
pub struct AclManager {
    am_user: String,
    dag_user: Option<String>,
    enabled: bool,
    users: Arc<AllowList>,
    groups: Arc<AllowList>,
    group_provider: Arc<dyn GroupProvider>,
    lookup_timeout: Option<Duration>,
    lookup_failures: AtomicU64,
}

impl AclManager {
    /// Creates the AM-level manager
    ///
    /// With no config ACLs are enabled and every allow-list is empty, so only
    /// the AM owner is granted.
    ///
    /// # Errors
    ///
    /// Returns `AuthzError::EmptyOwner` if `am_user` is empty, or any error
    /// raised while parsing `config`.
    pub fn new(
        group_provider: Arc<dyn GroupProvider>,
        am_user: impl Into<String>,
        config: Option<&AclConfig>,
    ) -> Result<Self> {
        Self::with_parser(group_provider, am_user, config, &ConfigAclParser)
    }

    /// Same as [`AclManager::new`] with a caller-supplied parser
    pub fn with_parser(
        group_provider: Arc<dyn GroupProvider>,
        am_user: impl Into<String>,
        config: Option<&AclConfig>,
        parser: &dyn AclParser,
    ) -> Result<Self> {
        let am_user = am_user.into();
        if am_user.is_empty() {
            return Err(AuthzError::EmptyOwner { role: "AM" });
        }

        let mut manager = Self {
            am_user,
            dag_user: None,
            enabled: config.map_or(true, |c| c.enabled),
            users: Arc::new(AllowList::new()),
            groups: Arc::new(AllowList::new()),
            group_provider,
            lookup_timeout: config.and_then(AclConfig::group_lookup_timeout),
            lookup_failures: AtomicU64::new(0),
        };

        if !manager.enabled {
            info!(am_user = %manager.am_user, "ACLs disabled, all access granted");
            return Ok(manager);
        }

        if let Some(config) = config {
            let parsed = parser.parse(config, false)?;
            manager.users = Arc::new(parsed.users);
            manager.groups = Arc::new(parsed.groups);
        }

        info!(
            am_user = %manager.am_user,
            user_entries = manager.users.iter().count(),
            group_entries = manager.groups.iter().count(),
            "AM ACL manager initialized"
        );

        Ok(manager)
    }

    /// Creates the manager for one DAG run by this AM
    ///
    /// The AM owner, group provider, enable flag and lookup timeout are taken
    /// from `self`. DAG-level entries from `dag_config` are merged into copies
    /// of this manager's allow-lists; `self` is left untouched.
    ///
    /// `dag_user` may be `None`, in which case no principal gets the implicit
    /// DAG owner grant.
    ///
    /// # Errors
    ///
    /// Returns `AuthzError::EmptyOwner` if `dag_user` is `Some("")`, or any
    /// error raised while parsing `dag_config`.
    pub fn derive(&self, dag_user: Option<&str>, dag_config: Option<&AclConfig>) -> Result<Self> {
        self.derive_with_parser(dag_user, dag_config, &ConfigAclParser)
    }

    /// Same as [`AclManager::derive`] with a caller-supplied parser
    pub fn derive_with_parser(
        &self,
        dag_user: Option<&str>,
        dag_config: Option<&AclConfig>,
        parser: &dyn AclParser,
    ) -> Result<Self> {
        if dag_user.is_some_and(str::is_empty) {
            return Err(AuthzError::EmptyOwner { role: "DAG" });
        }

        let mut manager = Self {
            am_user: self.am_user.clone(),
            dag_user: dag_user.map(String::from),
            enabled: self.enabled,
            users: Arc::clone(&self.users),
            groups: Arc::clone(&self.groups),
            group_provider: Arc::clone(&self.group_provider),
            lookup_timeout: self.lookup_timeout,
            lookup_failures: AtomicU64::new(0),
        };

        if !manager.enabled {
            return Ok(manager);
        }

        if let Some(dag_config) = dag_config {
            let parsed = parser.parse(dag_config, true)?;
            if !parsed.users.is_empty() {
                let mut users = AllowList::clone(&self.users);
                users.merge(&parsed.users);
                manager.users = Arc::new(users);
            }
            if !parsed.groups.is_empty() {
                let mut groups = AllowList::clone(&self.groups);
                groups.merge(&parsed.groups);
                manager.groups = Arc::new(groups);
            }
        }

        debug!(
            am_user = %manager.am_user,
            dag_user = ?manager.dag_user,
            "DAG ACL manager derived"
        );

        Ok(manager)
    }

    /// Runs the access algorithm and reports which rule decided
    pub async fn evaluate(&self, user: &str, acl_type: AclType) -> AccessDecision {
        if !self.enabled {
            return AccessDecision::allow(user, acl_type, AccessReason::AclsDisabled);
        }

        if user == self.am_user {
            return AccessDecision::allow(user, acl_type, AccessReason::AmOwner);
        }

        if acl_type.is_dag_level() && self.dag_user.as_deref() == Some(user) {
            return AccessDecision::allow(user, acl_type, AccessReason::DagOwner);
        }

        if let Some(allowed_users) = self.users.get(acl_type) {
            if allowed_users.contains(WILDCARD_ACL_VALUE) {
                return AccessDecision::allow(user, acl_type, AccessReason::UserWildcard);
            }
            if allowed_users.contains(user) {
                return AccessDecision::allow(user, acl_type, AccessReason::UserListed);
            }
        }

        if let Some(allowed_groups) = self.groups.get(acl_type) {
            match self.resolve_groups(user).await {
                Ok(user_groups) => {
                    if let Some(group) = user_groups
                        .iter()
                        .find(|group| allowed_groups.contains(group.as_str()))
                    {
                        return AccessDecision::allow(
                            user,
                            acl_type,
                            AccessReason::GroupListed {
                                group: group.clone(),
                            },
                        );
                    }
                }
                Err(err) => {
                    self.lookup_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(user, %acl_type, error = %err, "Failed to retrieve groups for user");
                    return AccessDecision::deny(
                        user,
                        acl_type,
                        AccessReason::GroupLookupFailed {
                            error: err.to_string(),
                        },
                    );
                }
            }
        }

        AccessDecision::deny(user, acl_type, AccessReason::NoMatch)
    }

    /// Whether `user` may perform `acl_type`
    pub async fn check_access(&self, user: &str, acl_type: AclType) -> bool {
        let decision = self.evaluate(user, acl_type).await;
        debug!(
            user,
            %acl_type,
            allowed = decision.allowed,
            reason = ?decision.reason,
            "ACL check"
        );
        decision.allowed
    }

    pub async fn check_am_view_access(&self, user: &str) -> bool {
        self.check_access(user, AclType::AmView).await
    }

    pub async fn check_am_modify_access(&self, user: &str) -> bool {
        self.check_access(user, AclType::AmModify).await
    }

    /// AM view rights imply DAG view rights
    pub async fn check_dag_view_access(&self, user: &str) -> bool {
        self.check_access(user, AclType::AmView).await
            || self.check_access(user, AclType::DagView).await
    }

    /// AM modify rights imply DAG modify rights
    pub async fn check_dag_modify_access(&self, user: &str) -> bool {
        self.check_access(user, AclType::AmModify).await
            || self.check_access(user, AclType::DagModify).await
    }

    /// Renders the AM-level lists as application VIEW/MODIFY ACL strings
    ///
    /// Each value is the AM owner, then `,`-joined users, then a space and
    /// `,`-joined groups, or `*` when the right is open to everyone. DAG-level
    /// entries are never rendered.
    ///
    /// # Examples
    ///
    /// ```
    /// use acl_manager::{AclConfig, AclManager, AclType, ApplicationAccessType, StaticGroupProvider};
    /// use std::sync::Arc;
    ///
    /// let config = AclConfig::new().with_acl(AclType::AmView, "alice,carol eng");
    /// let am = AclManager::new(Arc::new(StaticGroupProvider::new()), "admin", Some(&config)).unwrap();
    ///
    /// let acls = am.to_application_acls();
    /// assert_eq!(acls[&ApplicationAccessType::ViewApp], "admin,alice,carol eng");
    /// assert_eq!(acls[&ApplicationAccessType::ModifyApp], "admin");
    /// ```
    pub fn to_application_acls(&self) -> IndexMap<ApplicationAccessType, String> {
        let rights = [ApplicationAccessType::ViewApp, ApplicationAccessType::ModifyApp];
        let mut acls = IndexMap::with_capacity(rights.len());

        if !self.enabled {
            for right in rights {
                acls.insert(right, WILDCARD_ACL_VALUE.to_string());
            }
            return acls;
        }

        for right in rights {
            let acl_type = right.source_acl();
            if self.users.is_wildcard(acl_type) {
                acls.insert(right, WILDCARD_ACL_VALUE.to_string());
                continue;
            }

            let mut value = self.am_user.clone();
            if let Some(users) = self.users.joined(acl_type) {
                value.push(',');
                value.push_str(&users);
            }
            if let Some(groups) = self.groups.joined(acl_type) {
                value.push(' ');
                value.push_str(&groups);
            }
            acls.insert(right, value);
        }

        acls
    }

    pub fn am_user(&self) -> &str {
        &self.am_user
    }

    pub fn dag_user(&self) -> Option<&str> {
        self.dag_user.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn user_acls(&self) -> &AllowList {
        &self.users
    }

    pub fn group_acls(&self) -> &AllowList {
        &self.groups
    }

    /// Number of group lookups that failed during checks on this manager
    pub fn lookup_failures(&self) -> u64 {
        self.lookup_failures.load(Ordering::Relaxed)
    }

    async fn resolve_groups(&self, user: &str) -> std::result::Result<IndexSet<String>, LookupError> {
        let lookup = self.group_provider.groups(user);
        match self.lookup_timeout {
            Some(limit) => tokio::time::timeout(limit, lookup)
                .await
                .unwrap_or_else(|_| {
                    Err(LookupError::Timeout {
                        user: user.to_string(),
                        timeout_ms: limit.as_millis() as u64,
                    })
                }),
            None => lookup.await,
        }
    }
}

impl fmt::Debug for AclManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AclManager")
            .field("am_user", &self.am_user)
            .field("dag_user", &self.dag_user)
            .field("enabled", &self.enabled)
            .field("users", &self.users)
            .field("groups", &self.groups)
            .field("lookup_timeout", &self.lookup_timeout)
            .finish_non_exhaustive()
    }
}
