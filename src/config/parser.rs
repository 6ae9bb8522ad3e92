//! Parsing ACL values into user and group allow-lists

use super::AclConfig;
use crate::acl::{AclType, AllowList, WILDCARD_ACL_VALUE};
use crate::error::Result;

/// User and group allow-lists produced by a parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAcls {
    pub users: AllowList,
    pub groups: AllowList,
}

/// Turns configuration into allow-lists
///
/// `scoped == false` reads the AM-level keys; `scoped == true` reads the
/// DAG-level keys only.
pub trait AclParser: Send + Sync {
    fn parse(&self, config: &AclConfig, scoped: bool) -> Result<ParsedAcls>;
}

/// Parser for the `"<users> <groups>"` value format of [`AclConfig`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigAclParser;

impl ConfigAclParser {
    pub fn new() -> Self {
        Self
    }

    /// Splits one ACL value into its user and group lists
    ///
    /// # Examples
    ///
    /// ```
    /// use acl_manager::ConfigAclParser;
    ///
    /// let (users, groups) = ConfigAclParser::parse_value("alice, bob eng");
    /// assert_eq!(users, vec!["alice", "bob"]);
    /// assert_eq!(groups, vec!["eng"]);
    ///
    /// let (users, groups) = ConfigAclParser::parse_value(" ops");
    /// assert!(users.is_empty());
    /// assert_eq!(groups, vec!["ops"]);
    /// ```
    pub fn parse_value(value: &str) -> (Vec<String>, Vec<String>) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return (Vec::new(), Vec::new());
        }
        if trimmed == WILDCARD_ACL_VALUE {
            return (vec![WILDCARD_ACL_VALUE.to_string()], Vec::new());
        }

        // A leading blank leaves the user part empty
        let leading_blank = value.starts_with(char::is_whitespace);

        // Blanks around commas belong to the list, not the user/group separator
        let normalized = value.split(',').map(str::trim).collect::<Vec<_>>().join(",");

        let (users_part, rest) = if leading_blank {
            ("", normalized.as_str())
        } else {
            match normalized.split_once(char::is_whitespace) {
                Some((users, rest)) => (users, rest),
                None => (normalized.as_str(), ""),
            }
        };
        let groups_part = rest.split_whitespace().next().unwrap_or("");

        (split_list(users_part), split_list(groups_part))
    }
}

fn split_list(part: &str) -> Vec<String> {
    part.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl AclParser for ConfigAclParser {
    fn parse(&self, config: &AclConfig, scoped: bool) -> Result<ParsedAcls> {
        let kinds: [AclType; 2] = if scoped {
            [AclType::DagView, AclType::DagModify]
        } else {
            [AclType::AmView, AclType::AmModify]
        };

        let mut parsed = ParsedAcls::default();
        for acl_type in kinds {
            let Some(value) = config.acl_value(acl_type) else {
                continue;
            };
            let (users, groups) = Self::parse_value(value);
            if !users.is_empty() {
                parsed.users.insert(acl_type, users);
            }
            if !groups.is_empty() {
                parsed.groups.insert(acl_type, groups);
            }
        }

        Ok(parsed)
    }
}
