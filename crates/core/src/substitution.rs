// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency substitution rules for included builds
//!
//! An included build can declare that external module coordinates should be
//! satisfied by one of its own projects instead. Rules are collected from
//! configuration actions and frozen once resolved.

use crate::build::{BuildId, PATH_SEPARATOR};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from building substitution rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubstitutionError {
    #[error("invalid module id '{0}': expected 'group:name'")]
    InvalidModule(String),
    #[error("invalid project path '{0}': must start with ':'")]
    InvalidProjectPath(String),
    #[error("Cannot configure included build after dependency substitutions are resolved.")]
    AlreadyResolved,
}

/// Configuration action applied to an included build's substitution rules
pub type SubstitutionAction =
    Box<dyn Fn(&mut DependencySubstitutions) -> Result<(), SubstitutionError> + Send + Sync>;

/// External module coordinates (`group:name`)
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleId {
    pub group: String,
    pub name: String,
}

impl FromStr for ModuleId {
    type Err = SubstitutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((group, name)) if !group.is_empty() && !name.is_empty() && !name.contains(':') => {
                Ok(Self {
                    group: group.to_string(),
                    name: name.to_string(),
                })
            }
            _ => Err(SubstitutionError::InvalidModule(s.to_string())),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// A project inside a specific included build
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectSelector {
    pub build: BuildId,
    pub path: String,
}

impl fmt::Display for ProjectSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "project '{}' in build {}", self.path, self.build)
    }
}

/// Substitution rules for one included build
#[derive(Clone, Debug)]
pub struct DependencySubstitutions {
    build: BuildId,
    rules: Vec<(ModuleId, ProjectSelector)>,
}

impl DependencySubstitutions {
    /// Empty rule set whose substitutions point into `build`
    pub fn for_included_build(build: BuildId) -> Self {
        Self {
            build,
            rules: Vec::new(),
        }
    }

    pub fn build(&self) -> &BuildId {
        &self.build
    }

    /// Substitute `module` with the project at `project_path` in this build
    ///
    /// A later rule for the same module replaces the earlier one.
    pub fn substitute(&mut self, module: &str, project_path: &str) -> Result<(), SubstitutionError> {
        let module: ModuleId = module.parse()?;
        if !project_path.starts_with(PATH_SEPARATOR) {
            return Err(SubstitutionError::InvalidProjectPath(project_path.to_string()));
        }
        let selector = ProjectSelector {
            build: self.build.clone(),
            path: project_path.to_string(),
        };
        self.rules.retain(|(existing, _)| existing != &module);
        self.rules.push((module, selector));
        Ok(())
    }

    /// Project that replaces `module`, if any
    pub fn substitution_for(&self, module: &ModuleId) -> Option<&ProjectSelector> {
        self.rules
            .iter()
            .find(|(candidate, _)| candidate == module)
            .map(|(_, selector)| selector)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
#[path = "substitution_tests.rs"]
mod tests;
