// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolution of cross-build task references into delegate nodes
//!
//! A reference to `:task` in build `libA` queues the path on `libA`'s
//! coordinator and yields the single delegate node named `libA` in the
//! consuming build's task set, creating it on first use.

use crate::delegate::DelegateTask;
use crate::error::ResolveError;
use crate::registry::BuildRegistry;
use crate::tasks::{Task, TaskContainer};
use braid_core::TaskReference;
use std::sync::Arc;

/// Turns task references into delegate nodes for one composite session
#[derive(Clone)]
pub struct TaskReferenceResolver {
    registry: Arc<BuildRegistry>,
}

impl TaskReferenceResolver {
    pub fn new(registry: Arc<BuildRegistry>) -> Self {
        Self { registry }
    }

    pub fn resolve(
        &self,
        reference: &TaskReference,
        tasks: &mut dyn TaskContainer,
    ) -> Result<Arc<DelegateTask>, ResolveError> {
        let target = reference.build();
        let build = self
            .registry
            .get_build(target.as_str())
            .ok_or_else(|| ResolveError::UnknownBuild(target.clone()))?;

        build.add_tasks_to_execute([reference.path().clone()]);

        match tasks.find_by_name(target.as_str()) {
            Some(Task::Delegate(delegate)) => Ok(delegate),
            Some(Task::Action { name, .. }) => Err(ResolveError::NameCollision(name)),
            None => {
                let delegate = Arc::new(DelegateTask::new(target.clone(), Arc::clone(&self.registry)));
                tasks.add(Task::Delegate(Arc::clone(&delegate)))?;
                tracing::debug!(build = %target, "created delegate task");
                Ok(delegate)
            }
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
