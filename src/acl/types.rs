//! ACL types and decision reasons

use serde::{Deserialize, Serialize};
use std::fmt;

/// Principal that matches every user
pub const WILDCARD_ACL_VALUE: &str = "*";

/// Protected action: two scope levels times two rights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclType {
    AmView,
    AmModify,
    DagView,
    DagModify,
}

impl AclType {
    /// Every action kind, AM level first
    pub const ALL: [AclType; 4] = [
        AclType::AmView,
        AclType::AmModify,
        AclType::DagView,
        AclType::DagModify,
    ];

    /// Whether this action is scoped to a single DAG
    pub fn is_dag_level(self) -> bool {
        matches!(self, AclType::DagView | AclType::DagModify)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AclType::AmView => "AM_VIEW",
            AclType::AmModify => "AM_MODIFY",
            AclType::DagView => "DAG_VIEW",
            AclType::DagModify => "DAG_MODIFY",
        }
    }
}

impl fmt::Display for AclType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-wide right understood by the cluster manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationAccessType {
    ViewApp,
    ModifyApp,
}

impl ApplicationAccessType {
    /// The AM-level action whose allow-lists feed this right
    pub fn source_acl(self) -> AclType {
        match self {
            ApplicationAccessType::ViewApp => AclType::AmView,
            ApplicationAccessType::ModifyApp => AclType::AmModify,
        }
    }
}

/// Why an access check granted or denied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccessReason {
    /// ACL checks are switched off
    AclsDisabled,

    /// Principal owns the AM
    AmOwner,

    /// Principal owns the DAG and the action is DAG-level
    DagOwner,

    /// User allow-list holds the wildcard
    UserWildcard,

    /// Principal is named in the user allow-list
    UserListed,

    /// One of the principal's groups is in the group allow-list
    GroupListed { group: String },

    /// Only a group grant was possible and the lookup failed
    GroupLookupFailed { error: String },

    /// No rule matched
    NoMatch,
}

/// Outcome of a single access check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessDecision {
    pub user: String,
    pub acl_type: AclType,
    pub allowed: bool,
    pub reason: AccessReason,
}

impl AccessDecision {
    pub(crate) fn allow(user: &str, acl_type: AclType, reason: AccessReason) -> Self {
        Self {
            user: user.to_string(),
            acl_type,
            allowed: true,
            reason,
        }
    }

    pub(crate) fn deny(user: &str, acl_type: AclType, reason: AccessReason) -> Self {
        Self {
            user: user.to_string(),
            acl_type,
            allowed: false,
            reason,
        }
    }
}
