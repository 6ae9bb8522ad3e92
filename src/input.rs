//! Context handed to a merged input.
//!
//! Carries no access logic: it exposes the input's payload and work
//! directories and forwards the readiness signal for its input group.

use crate::error::{AuthzError, Result};
use std::fmt;
use std::sync::Arc;

/// Receives readiness notifications, keyed by input group name
pub trait InputReadyTracker: Send + Sync {
    fn set_input_ready(&self, group_input_name: &str);
}

/// Context for an input that merges several inputs of one group
pub struct MergedInputContext {
    user_payload: Option<Vec<u8>>,
    group_input_name: String,
    input_ready_tracker: Arc<dyn InputReadyTracker>,
    work_dirs: Vec<String>,
}

impl MergedInputContext {
    /// # Errors
    ///
    /// Returns `AuthzError::InvalidInput` if `group_input_name` is empty.
    pub fn new(
        user_payload: Option<Vec<u8>>,
        group_input_name: impl Into<String>,
        input_ready_tracker: Arc<dyn InputReadyTracker>,
        work_dirs: Vec<String>,
    ) -> Result<Self> {
        let group_input_name = group_input_name.into();
        if group_input_name.is_empty() {
            return Err(AuthzError::InvalidInput(
                "group input name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            user_payload,
            group_input_name,
            input_ready_tracker,
            work_dirs,
        })
    }

    pub fn user_payload(&self) -> Option<&[u8]> {
        self.user_payload.as_deref()
    }

    pub fn group_input_name(&self) -> &str {
        &self.group_input_name
    }

    /// Marks this context's input group as ready
    pub fn input_is_ready(&self) {
        self.input_ready_tracker.set_input_ready(&self.group_input_name);
    }

    pub fn work_dirs(&self) -> &[String] {
        &self.work_dirs
    }
}

impl fmt::Debug for MergedInputContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergedInputContext")
            .field("group_input_name", &self.group_input_name)
            .field("payload_len", &self.user_payload.as_ref().map(Vec::len))
            .field("work_dirs", &self.work_dirs)
            .finish_non_exhaustive()
    }
}
