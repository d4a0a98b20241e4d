// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build identifiers, qualified task paths and cross-build task references

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Separator that prefixes every qualified task path
pub const PATH_SEPARATOR: char = ':';

/// Unique name identifying one included build
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuildId(pub String);

impl BuildId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for BuildId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BuildId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Errors from task path validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskPathError {
    #[error("Task path '{0}' is not a qualified task path (e.g. ':task' or ':project:task').")]
    NotQualified(String),
}

/// A fully qualified task path such as `:build` or `:project:task`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskPath(String);

impl TaskPath {
    /// Parse a task path, rejecting anything that is not qualified
    pub fn parse(path: impl Into<String>) -> Result<Self, TaskPathError> {
        let path = path.into();
        if !path.starts_with(PATH_SEPARATOR) {
            return Err(TaskPathError::NotQualified(path));
        }
        Ok(Self(path))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment, i.e. the task name
    pub fn name(&self) -> &str {
        self.0.rsplit(PATH_SEPARATOR).next().unwrap_or_default()
    }
}

impl fmt::Display for TaskPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TaskPath {
    type Error = TaskPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TaskPath> for String {
    fn from(path: TaskPath) -> Self {
        path.0
    }
}

/// Reference to a task that lives in another included build
///
/// Produced when a build declares a dependency on another build's task.
/// Opaque to callers beyond the target build and path.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TaskReference {
    build: BuildId,
    path: TaskPath,
}

impl TaskReference {
    pub fn new(build: BuildId, path: TaskPath) -> Self {
        Self { build, path }
    }

    /// Name of the build that owns the task
    pub fn build(&self) -> &BuildId {
        &self.build
    }

    pub fn path(&self) -> &TaskPath {
        &self.path
    }
}

impl fmt::Display for TaskReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.build, self.path)
    }
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
