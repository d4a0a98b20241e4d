// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for composite build coordination

use braid_core::{BuildFailure, BuildId, SubstitutionError};
use thiserror::Error;

/// Errors from the build registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("included build not found: {0}")]
    UnknownBuild(BuildId),
    #[error("Included build dependency cycle: {}", format_cycle(.cycle))]
    Cycle { cycle: Vec<BuildId> },
    #[error("cannot {operation} after the composite build has started executing")]
    ConfigurationClosed { operation: &'static str },
}

impl RegistryError {
    /// First build of a reported cycle
    pub fn cycle_root(&self) -> Option<&BuildId> {
        match self {
            RegistryError::Cycle { cycle } => cycle.first(),
            _ => None,
        }
    }
}

/// Render a cycle as `A -> B -> A`
pub(crate) fn format_cycle(cycle: &[BuildId]) -> String {
    let mut report = String::new();
    for build in cycle {
        report.push_str(build.as_str());
        report.push_str(" -> ");
    }
    if let Some(first) = cycle.first() {
        report.push_str(first.as_str());
    }
    report
}

/// Errors from an included build's coordinator
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Execution(#[from] BuildFailure),
    #[error("interrupted while waiting for build {0} to complete")]
    Interrupted(BuildId),
}

/// Errors from resolving cross-build task references
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("included build not found: {0}")]
    UnknownBuild(BuildId),
    #[error("Cannot create delegating task '{0}' as task with same name already exists.")]
    NameCollision(String),
    #[error("task '{0}' already exists")]
    DuplicateTask(String),
}

/// Errors surfaced while configuring a composite build session
#[derive(Debug, Error)]
pub enum CompositeError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Substitution(#[from] SubstitutionError),
}
