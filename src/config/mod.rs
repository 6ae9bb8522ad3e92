//! ACL configuration and parsing into allow-lists.
//!
//! ACL values use the `"<users> <groups>"` format: two comma-separated
//! lists divided by whitespace, e.g. `"alice,bob eng,ops"`. A leading blank
//! means "groups only" and a lone `*` grants everyone.

mod parser;

pub use parser::{AclParser, ConfigAclParser, ParsedAcls};

use crate::acl::AclType;
use crate::error::{AuthzError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Property key for the global enable switch
pub const ACLS_ENABLED_KEY: &str = "am.acls.enabled";
pub const AM_VIEW_ACLS_KEY: &str = "am.view-acls";
pub const AM_MODIFY_ACLS_KEY: &str = "am.modify-acls";
pub const DAG_VIEW_ACLS_KEY: &str = "dag.view-acls";
pub const DAG_MODIFY_ACLS_KEY: &str = "dag.modify-acls";
pub const GROUP_LOOKUP_TIMEOUT_KEY: &str = "am.acls.group-lookup-timeout-ms";

fn default_enabled() -> bool {
    true
}

/// ACL settings for an AM or a single DAG
///
/// # Examples
///
/// ```
/// use acl_manager::{AclConfig, AclType};
///
/// let config = AclConfig::from_json(r#"{ "am_view_acls": "alice eng" }"#).unwrap();
/// assert!(config.enabled);
/// assert_eq!(config.acl_value(AclType::AmView), Some("alice eng"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclConfig {
    /// When false every check grants and rendering yields wildcards
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub am_view_acls: Option<String>,

    #[serde(default)]
    pub am_modify_acls: Option<String>,

    #[serde(default)]
    pub dag_view_acls: Option<String>,

    #[serde(default)]
    pub dag_modify_acls: Option<String>,

    /// Upper bound on a single group lookup, unbounded when absent
    #[serde(default)]
    pub group_lookup_timeout_ms: Option<u64>,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            am_view_acls: None,
            am_modify_acls: None,
            dag_view_acls: None,
            dag_modify_acls: None,
            group_lookup_timeout_ms: None,
        }
    }
}

impl AclConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a config from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config from dotted property keys (e.g. `am.view-acls`)
    ///
    /// Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AuthzError::InvalidConfig` if the enable switch is not a
    /// boolean or the lookup timeout is not a whole number of milliseconds.
    pub fn from_properties(props: &HashMap<String, String>) -> Result<Self> {
        let enabled = match props.get(ACLS_ENABLED_KEY) {
            Some(raw) => parse_bool(ACLS_ENABLED_KEY, raw)?,
            None => true,
        };

        let group_lookup_timeout_ms = match props.get(GROUP_LOOKUP_TIMEOUT_KEY) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                AuthzError::InvalidConfig {
                    key: GROUP_LOOKUP_TIMEOUT_KEY.to_string(),
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(Self {
            enabled,
            am_view_acls: props.get(AM_VIEW_ACLS_KEY).cloned(),
            am_modify_acls: props.get(AM_MODIFY_ACLS_KEY).cloned(),
            dag_view_acls: props.get(DAG_VIEW_ACLS_KEY).cloned(),
            dag_modify_acls: props.get(DAG_MODIFY_ACLS_KEY).cloned(),
            group_lookup_timeout_ms,
        })
    }

    /// Returns a copy with ACL checks switched off
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Sets the raw ACL value for one action kind
    pub fn with_acl(mut self, acl_type: AclType, value: impl Into<String>) -> Self {
        let value = Some(value.into());
        match acl_type {
            AclType::AmView => self.am_view_acls = value,
            AclType::AmModify => self.am_modify_acls = value,
            AclType::DagView => self.dag_view_acls = value,
            AclType::DagModify => self.dag_modify_acls = value,
        }
        self
    }

    pub fn with_group_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.group_lookup_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Raw ACL value configured for `acl_type`
    pub fn acl_value(&self, acl_type: AclType) -> Option<&str> {
        match acl_type {
            AclType::AmView => self.am_view_acls.as_deref(),
            AclType::AmModify => self.am_modify_acls.as_deref(),
            AclType::DagView => self.dag_view_acls.as_deref(),
            AclType::DagModify => self.dag_modify_acls.as_deref(),
        }
    }

    pub fn group_lookup_timeout(&self) -> Option<Duration> {
        self.group_lookup_timeout_ms.map(Duration::from_millis)
    }
}

/// Property key that carries the ACL value for `acl_type`
pub fn acl_property_key(acl_type: AclType) -> &'static str {
    match acl_type {
        AclType::AmView => AM_VIEW_ACLS_KEY,
        AclType::AmModify => AM_MODIFY_ACLS_KEY,
        AclType::DagView => DAG_VIEW_ACLS_KEY,
        AclType::DagModify => DAG_MODIFY_ACLS_KEY,
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(AuthzError::InvalidConfig {
            key: key.to_string(),
            reason: format!("expected true or false, got '{}'", other),
        }),
    }
}
