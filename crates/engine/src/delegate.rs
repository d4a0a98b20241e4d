// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delegate task node that awaits an included build

use crate::error::CoordinatorError;
use crate::registry::BuildRegistry;
use crate::tasks::TaskAction;
use braid_core::{BuildFailure, BuildId};
use std::fmt;
use std::sync::Arc;

/// Task node standing in for pending work of one included build
///
/// Executing it blocks the calling thread until the target build's
/// coordinator has completed a sweep covering everything queued so far.
pub struct DelegateTask {
    name: String,
    build: BuildId,
    registry: Arc<BuildRegistry>,
}

impl DelegateTask {
    pub fn new(build: BuildId, registry: Arc<BuildRegistry>) -> Self {
        Self {
            name: build.to_string(),
            build,
            registry,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The included build this node waits on
    pub fn build(&self) -> &BuildId {
        &self.build
    }
}

impl TaskAction for DelegateTask {
    fn execute(&self) -> Result<(), BuildFailure> {
        let build = self.registry.get_build(self.build.as_str()).ok_or_else(|| {
            BuildFailure::new(format!("included build not found: {}", self.build))
        })?;

        tracing::debug!(build = %self.build, "awaiting included build");
        match build.await_completion() {
            Ok(()) => Ok(()),
            Err(CoordinatorError::Execution(failure)) => {
                Err(failure.recontextualize(format!("Failed to build artifacts for {}", self.build)))
            }
            Err(e) => Err(BuildFailure::new(e.to_string())),
        }
    }
}

impl fmt::Debug for DelegateTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateTask")
            .field("name", &self.name)
            .field("build", &self.build)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "delegate_tests.rs"]
mod tests;
