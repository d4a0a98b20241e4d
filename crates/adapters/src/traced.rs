// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced launcher wrappers for consistent observability

use crate::launcher::{BuildLauncher, BuildOutcome, ConfiguredBuild, LauncherFactory, Settings};
use braid_core::{BuildFailure, BuildId, TaskPath};

/// Wrapper that adds tracing to any BuildLauncher
pub struct TracedLauncher<L> {
    build: BuildId,
    inner: L,
}

impl<L> TracedLauncher<L> {
    pub fn new(build: BuildId, inner: L) -> Self {
        Self { build, inner }
    }
}

impl<L: BuildLauncher> BuildLauncher for TracedLauncher<L> {
    fn load_settings(&mut self) -> Result<Settings, BuildFailure> {
        let span = tracing::debug_span!("launcher.load_settings", build = %self.build);
        let _guard = span.enter();

        let result = self.inner.load_settings();
        match &result {
            Ok(settings) => tracing::debug!(root_project = %settings.root_project, "settings loaded"),
            Err(e) => tracing::error!(error = %e, "loading settings failed"),
        }
        result
    }

    fn configure(&mut self) -> Result<ConfiguredBuild, BuildFailure> {
        let span = tracing::debug_span!("launcher.configure", build = %self.build);
        let _guard = span.enter();

        let result = self.inner.configure();
        match &result {
            Ok(configured) => tracing::debug!(tasks = configured.tasks.len(), "configured"),
            Err(e) => tracing::error!(error = %e, "configuration failed"),
        }
        result
    }

    fn set_requested_tasks(&mut self, tasks: Vec<TaskPath>) {
        tracing::trace!(build = %self.build, count = tasks.len(), "requested tasks set");
        self.inner.set_requested_tasks(tasks);
    }

    fn run(&mut self) -> Result<BuildOutcome, BuildFailure> {
        let span = tracing::info_span!("launcher.run", build = %self.build);
        let _guard = span.enter();

        tracing::info!("starting");

        let start = std::time::Instant::now();
        let result = self.inner.run();
        let elapsed = start.elapsed();

        match &result {
            Ok(outcome) => tracing::info!(
                executed = outcome.executed.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "run succeeded"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "run failed"
            ),
        }

        result
    }
}

/// Factory wrapper whose launchers are all traced
pub struct TracedLauncherFactory<F> {
    build: BuildId,
    inner: F,
}

impl<F> TracedLauncherFactory<F> {
    pub fn new(build: BuildId, inner: F) -> Self {
        Self { build, inner }
    }
}

impl<F: LauncherFactory> LauncherFactory for TracedLauncherFactory<F> {
    fn create(&self) -> Box<dyn BuildLauncher> {
        tracing::debug!(build = %self.build, "creating launcher");
        Box::new(TracedLauncher::new(self.build.clone(), self.inner.create()))
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
