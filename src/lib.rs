//! # ACL Manager (acl-manager)
//!
//! Access control for an application master (AM) and the DAGs it runs:
//! - Per-action user and group allow-lists
//! - Implicit grants for the AM owner and the DAG owner
//! - AM-level rights that subsume DAG-level rights
//! - Wildcard principals
//! - Group resolution through a pluggable, optionally cached provider
//! - Rendering to application VIEW/MODIFY ACL strings
//!
//! ## Example
//!
//! ```rust,no_run
//! use acl_manager::{AclConfig, AclManager, StaticGroupProvider};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let groups = Arc::new(StaticGroupProvider::new().with_user("carol", ["eng"]));
//! let config = AclConfig::from_json(r#"{ "am_view_acls": "alice eng" }"#)?;
//!
//! let am = AclManager::new(groups, "admin", Some(&config))?;
//! assert!(am.check_am_view_access("carol").await);
//!
//! let dag_config = AclConfig::from_json(r#"{ "dag_modify_acls": "dave" }"#)?;
//! let dag = am.derive(Some("bob"), Some(&dag_config))?;
//! assert!(dag.check_dag_modify_access("dave").await);
//! assert!(!am.check_dag_modify_access("dave").await);
//! # Ok(())
//! # }
//! ```

pub mod acl;
pub mod config;
pub mod error;
pub mod groups;
pub mod input;

pub use acl::{
    AccessDecision, AccessReason, AclManager, AclType, AllowList, ApplicationAccessType,
    WILDCARD_ACL_VALUE,
};
pub use config::{AclConfig, AclParser, ConfigAclParser, ParsedAcls};
pub use error::{AuthzError, LookupError, Result};
pub use groups::{CacheStats, CachingGroupProvider, GroupCacheConfig, GroupProvider, StaticGroupProvider};
pub use input::{InputReadyTracker, MergedInputContext};
