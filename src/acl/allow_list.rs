//! Per-action allow-lists

use super::types::{AclType, WILDCARD_ACL_VALUE};
use indexmap::{IndexMap, IndexSet};

/// Mapping from action kind to an insertion-ordered set of principals
///
/// An absent entry and an empty set both mean "no grant". Order only
/// matters for rendering, where principals are joined as inserted.
///
/// # Examples
///
/// ```
/// use acl_manager::{AclType, AllowList};
///
/// let mut users = AllowList::new();
/// users.insert(AclType::AmView, ["alice", "carol"]);
///
/// let mut dag_users = AllowList::new();
/// dag_users.insert(AclType::AmView, ["dave"]);
/// users.merge(&dag_users);
///
/// assert_eq!(users.joined(AclType::AmView).as_deref(), Some("alice,carol,dave"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList {
    entries: IndexMap<AclType, IndexSet<String>>,
}

impl AllowList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds principals to the entry for `acl_type`, creating it if needed
    pub fn insert<I, S>(&mut self, acl_type: AclType, principals: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(acl_type)
            .or_default()
            .extend(principals.into_iter().map(Into::into));
    }

    /// Builder form of [`AllowList::insert`]
    pub fn with<I, S>(mut self, acl_type: AclType, principals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(acl_type, principals);
        self
    }

    /// Returns the non-empty principal set for `acl_type`
    pub fn get(&self, acl_type: AclType) -> Option<&IndexSet<String>> {
        self.entries.get(&acl_type).filter(|set| !set.is_empty())
    }

    pub fn contains(&self, acl_type: AclType, principal: &str) -> bool {
        self.get(acl_type)
            .is_some_and(|set| set.contains(principal))
    }

    /// Whether the entry for `acl_type` grants every principal
    pub fn is_wildcard(&self, acl_type: AclType) -> bool {
        self.contains(acl_type, WILDCARD_ACL_VALUE)
    }

    /// Union-by-key: every principal in `other` is added to the matching entry
    ///
    /// Nothing already present is removed or replaced.
    pub fn merge(&mut self, other: &AllowList) {
        for (acl_type, principals) in &other.entries {
            if principals.is_empty() {
                continue;
            }
            self.entries
                .entry(*acl_type)
                .or_default()
                .extend(principals.iter().cloned());
        }
    }

    /// Comma-joined principals for `acl_type`, `None` when there are none
    pub fn joined(&self, acl_type: AclType) -> Option<String> {
        self.get(acl_type).map(|set| {
            set.iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(",")
        })
    }

    /// True when no action has a non-empty entry
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(IndexSet::is_empty)
    }

    /// Iterates the non-empty entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (AclType, &IndexSet<String>)> {
        self.entries
            .iter()
            .filter(|(_, set)| !set.is_empty())
            .map(|(acl_type, set)| (*acl_type, set))
    }
}
