//! ACL module for AM and DAG scoped access checks.
//!
//! This module provides:
//! - The closed set of protected actions (`AclType`)
//! - Per-action user and group allow-lists with union merging
//! - `AclManager`, the layered AM/DAG decision engine
//! - Rendering to application VIEW/MODIFY ACL strings

mod allow_list;
mod manager;
mod types;

pub use allow_list::AllowList;
pub use manager::AclManager;
pub use types::{AccessDecision, AccessReason, AclType, ApplicationAccessType, WILDCARD_ACL_VALUE};
