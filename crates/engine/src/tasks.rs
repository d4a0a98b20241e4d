// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task nodes of a consuming build's task graph

use crate::delegate::DelegateTask;
use crate::error::ResolveError;
use braid_core::{BuildFailure, BuildId};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Work performed when the host engine executes a task node
pub trait TaskAction: Send + Sync {
    fn execute(&self) -> Result<(), BuildFailure>;
}

impl<F> TaskAction for F
where
    F: Fn() -> Result<(), BuildFailure> + Send + Sync,
{
    fn execute(&self) -> Result<(), BuildFailure> {
        self()
    }
}

/// A node in a build's task graph
#[derive(Clone)]
pub enum Task {
    /// Placeholder that awaits another included build
    Delegate(Arc<DelegateTask>),
    /// Any other task owned by the consuming build
    Action {
        name: String,
        action: Arc<dyn TaskAction>,
    },
}

impl Task {
    pub fn action(name: impl Into<String>, action: impl TaskAction + 'static) -> Self {
        Task::Action {
            name: name.into(),
            action: Arc::new(action),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Task::Delegate(delegate) => delegate.name(),
            Task::Action { name, .. } => name,
        }
    }

    pub fn execute(&self) -> Result<(), BuildFailure> {
        match self {
            Task::Delegate(delegate) => delegate.execute(),
            Task::Action { action, .. } => action.execute(),
        }
    }

    pub fn as_delegate(&self) -> Option<&Arc<DelegateTask>> {
        match self {
            Task::Delegate(delegate) => Some(delegate),
            Task::Action { .. } => None,
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Delegate(delegate) => f.debug_tuple("Delegate").field(delegate).finish(),
            Task::Action { name, .. } => f.debug_struct("Action").field("name", name).finish_non_exhaustive(),
        }
    }
}

/// Named task set of one build
pub trait TaskContainer {
    fn find_by_name(&self, name: &str) -> Option<Task>;

    /// Add a task, failing if one with the same name exists
    fn add(&mut self, task: Task) -> Result<Task, ResolveError>;
}

/// In-memory task set owned by a consuming build
#[derive(Debug)]
pub struct BuildTasks {
    owner: BuildId,
    tasks: BTreeMap<String, Task>,
}

impl BuildTasks {
    pub fn new(owner: BuildId) -> Self {
        Self {
            owner,
            tasks: BTreeMap::new(),
        }
    }

    pub fn owner(&self) -> &BuildId {
        &self.owner
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks ordered by name
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Delegate nodes, ordered by target build name
    pub fn delegates(&self) -> impl Iterator<Item = &Arc<DelegateTask>> {
        self.tasks.values().filter_map(Task::as_delegate)
    }
}

impl TaskContainer for BuildTasks {
    fn find_by_name(&self, name: &str) -> Option<Task> {
        self.tasks.get(name).cloned()
    }

    fn add(&mut self, task: Task) -> Result<Task, ResolveError> {
        let name = task.name().to_string();
        if self.tasks.contains_key(&name) {
            return Err(ResolveError::DuplicateTask(name));
        }
        tracing::trace!(build = %self.owner, task = %name, "added task");
        self.tasks.insert(name, task.clone());
        Ok(task)
    }
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
