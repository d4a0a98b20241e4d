// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of included builds and their cross-build dependencies
//!
//! Every cross-build task dependency records a `source -> target` edge. An
//! edge that would let a build transitively wait on itself is rejected and
//! removed again, so the graph only ever holds acyclic edges.
//!
//! Registration belongs to the configuration phase. Once
//! [`BuildRegistry::close_configuration`] has returned, new builds and
//! edges are refused while sweeps read the registry concurrently. The phase
//! check and the commit happen under the same lock as the close.

use crate::coordinator::IncludedBuild;
use crate::error::{format_cycle, RegistryError};
use braid_core::{BuildId, TaskPath};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

/// Build-to-build dependency edges, in insertion order per source
#[derive(Debug, Default)]
struct BuildDependencies {
    edges: BTreeMap<BuildId, Vec<BuildId>>,
}

impl BuildDependencies {
    /// Returns false if the edge was already present
    fn add(&mut self, source: &BuildId, target: &BuildId) -> bool {
        let targets = self.edges.entry(source.clone()).or_default();
        if targets.contains(target) {
            return false;
        }
        targets.push(target.clone());
        true
    }

    fn remove(&mut self, source: &BuildId, target: &BuildId) {
        if let Some(targets) = self.edges.get_mut(source) {
            targets.retain(|t| t != target);
            if targets.is_empty() {
                self.edges.remove(source);
            }
        }
    }

    fn targets(&self, source: &BuildId) -> &[BuildId] {
        self.edges.get(source).map(Vec::as_slice).unwrap_or_default()
    }

    /// Chain of builds leading from `target` back to `source`, if any
    fn find_cycle(&self, source: &BuildId, target: &BuildId) -> Option<Vec<BuildId>> {
        if source == target {
            return Some(vec![source.clone()]);
        }
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        if self.visit(source, target, &mut chain, &mut visited) {
            Some(chain)
        } else {
            None
        }
    }

    fn visit(
        &self,
        source: &BuildId,
        current: &BuildId,
        chain: &mut Vec<BuildId>,
        visited: &mut HashSet<BuildId>,
    ) -> bool {
        if !visited.insert(current.clone()) {
            return false;
        }
        chain.push(current.clone());
        for next in self.targets(current) {
            if next == source {
                chain.push(next.clone());
                return true;
            }
            if self.visit(source, next, chain, visited) {
                return true;
            }
        }
        chain.pop();
        false
    }
}

// Phase flag and the edges it guards
#[derive(Debug, Default)]
struct Configuration {
    closed: bool,
    dependencies: BuildDependencies,
}

impl Configuration {
    fn ensure_open(&self, operation: &'static str) -> Result<(), RegistryError> {
        if self.closed {
            Err(RegistryError::ConfigurationClosed { operation })
        } else {
            Ok(())
        }
    }
}

/// The included builds of one composite build session
///
/// Lock order: `configuration`, then `builds`, then a build's own locks.
#[derive(Default)]
pub struct BuildRegistry {
    builds: RwLock<HashMap<BuildId, Arc<IncludedBuild>>>,
    configuration: Mutex<Configuration>,
}

impl BuildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an included build under its name
    ///
    /// A build registered under an existing name replaces the earlier one.
    pub fn register_build(&self, build: Arc<IncludedBuild>) -> Result<(), RegistryError> {
        let configuration = self.lock_configuration();
        configuration.ensure_open("register an included build")?;

        let name = build.name().clone();
        let previous = self
            .builds
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.clone(), Arc::clone(&build));
        drop(configuration);

        match previous {
            Some(previous) => tracing::warn!(
                build = %name,
                previous = %previous,
                replacement = %build,
                "replaced included build registered under the same name"
            ),
            None => tracing::info!(build = %name, dir = %build.project_dir().display(), "registered included build"),
        }
        Ok(())
    }

    pub fn get_build(&self, name: &str) -> Option<Arc<IncludedBuild>> {
        self.builds
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// All registered builds, ordered by name
    pub fn builds(&self) -> Vec<Arc<IncludedBuild>> {
        let mut builds: Vec<_> = self
            .builds
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        builds.sort_by(|a, b| a.name().cmp(b.name()));
        builds
    }

    /// Record that `source` needs `path` from `target` and queue it there
    ///
    /// Fails without queuing anything if the edge would close a cycle.
    pub fn add_task(
        &self,
        source: &BuildId,
        target: &BuildId,
        path: TaskPath,
    ) -> Result<(), RegistryError> {
        let mut configuration = self.lock_configuration();
        configuration.ensure_open("add a cross-build task dependency")?;

        let target_build = self
            .get_build(target.as_str())
            .ok_or_else(|| RegistryError::UnknownBuild(target.clone()))?;

        let dependencies = &mut configuration.dependencies;
        let added = dependencies.add(source, target);
        if let Some(cycle) = dependencies.find_cycle(source, target) {
            if added {
                dependencies.remove(source, target);
            }
            tracing::error!(
                source = %source,
                target = %target,
                cycle = %format_cycle(&cycle),
                "rejected cross-build dependency"
            );
            return Err(RegistryError::Cycle { cycle });
        }

        tracing::debug!(source = %source, target = %target, task = %path, "added cross-build task");
        target_build.add_tasks_to_execute([path]);
        Ok(())
    }

    /// Builds that `source` depends on
    pub fn dependencies_of(&self, source: &BuildId) -> Vec<BuildId> {
        self.lock_configuration().dependencies.targets(source).to_vec()
    }

    /// End the configuration phase
    ///
    /// Waits for any registration or edge already being committed; nothing
    /// is committed after this returns.
    pub fn close_configuration(&self) {
        let mut configuration = self.lock_configuration();
        if !configuration.closed {
            configuration.closed = true;
            tracing::debug!("closed composite configuration");
        }
    }

    pub fn is_configuring(&self) -> bool {
        !self.lock_configuration().closed
    }

    fn lock_configuration(&self) -> MutexGuard<'_, Configuration> {
        self.configuration.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
