// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composite build session
//!
//! Owns the registry for one composite build. Builds and cross-build task
//! dependencies are declared while configuring; [`CompositeBuild::begin_execution`]
//! ends that phase and freezes every build's dependency substitutions.

use crate::coordinator::IncludedBuild;
use crate::error::{CompositeError, RegistryError};
use crate::registry::BuildRegistry;
use crate::resolver::TaskReferenceResolver;
use braid_adapters::{LauncherFactory, TracedLauncherFactory};
use braid_core::{BuildId, CompositeConfig, IncludedBuildConfig, TaskReference};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Default)]
pub struct CompositeBuild {
    registry: Arc<BuildRegistry>,
}

impl CompositeBuild {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with every build named in `config`
    ///
    /// `launchers` supplies the launcher factory for each configured build.
    pub fn from_config<P>(config: &CompositeConfig, mut launchers: P) -> Result<Self, CompositeError>
    where
        P: FnMut(&IncludedBuildConfig) -> Arc<dyn LauncherFactory>,
    {
        let session = Self::new();
        for entry in &config.builds {
            let build = session.include(entry.id(), entry.dir.clone(), launchers(entry))?;
            for action in entry.substitution_actions() {
                build.dependency_substitution(action)?;
            }
        }
        tracing::info!(builds = config.builds.len(), "composite build configured");
        Ok(session)
    }

    /// Register an included build whose launchers are traced
    pub fn include(
        &self,
        name: BuildId,
        project_dir: impl Into<PathBuf>,
        launchers: Arc<dyn LauncherFactory>,
    ) -> Result<Arc<IncludedBuild>, RegistryError> {
        let traced = TracedLauncherFactory::new(name.clone(), launchers);
        let build = Arc::new(IncludedBuild::new(name, project_dir, Arc::new(traced)));
        self.registry.register_build(Arc::clone(&build))?;
        Ok(build)
    }

    pub fn registry(&self) -> &Arc<BuildRegistry> {
        &self.registry
    }

    pub fn build(&self, name: &str) -> Option<Arc<IncludedBuild>> {
        self.registry.get_build(name)
    }

    /// Declare that `source` depends on a task of another included build
    pub fn add_task(&self, source: &BuildId, reference: &TaskReference) -> Result<(), RegistryError> {
        self.registry
            .add_task(source, reference.build(), reference.path().clone())
    }

    pub fn resolver(&self) -> TaskReferenceResolver {
        TaskReferenceResolver::new(Arc::clone(&self.registry))
    }

    /// Close the configuration phase and resolve substitutions of every build
    pub fn begin_execution(&self) -> Result<(), CompositeError> {
        self.registry.close_configuration();
        for build in self.registry.builds() {
            build.resolve_dependency_substitutions()?;
        }
        tracing::info!("composite build executing");
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
