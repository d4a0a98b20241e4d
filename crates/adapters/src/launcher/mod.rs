// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-build execution engine boundary
//!
//! A launcher drives one single-use run of an included build: load its
//! settings, configure it, set the requested tasks and run to completion.
//! A fresh launcher is created through a [`LauncherFactory`] for every run.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeLauncherFactory, LauncherCall};

use braid_core::{BuildFailure, TaskPath};
use std::sync::Arc;

/// Settings of a loaded build
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub root_project: String,
    pub projects: Vec<String>,
}

/// A build whose projects have been configured and whose tasks are known
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfiguredBuild {
    pub settings: Settings,
    pub tasks: Vec<TaskPath>,
}

/// Result of a successful run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildOutcome {
    pub executed: Vec<TaskPath>,
}

/// Single-use driver for one included build
pub trait BuildLauncher: Send {
    /// Load the build's settings
    fn load_settings(&mut self) -> Result<Settings, BuildFailure>;

    /// Configure the build's projects
    fn configure(&mut self) -> Result<ConfiguredBuild, BuildFailure>;

    /// Replace the set of tasks the next run will execute
    fn set_requested_tasks(&mut self, tasks: Vec<TaskPath>);

    /// Run the requested tasks to completion, blocking the caller
    fn run(&mut self) -> Result<BuildOutcome, BuildFailure>;
}

/// Creates fresh launchers for one included build
pub trait LauncherFactory: Send + Sync {
    fn create(&self) -> Box<dyn BuildLauncher>;
}

impl<F: LauncherFactory + ?Sized> LauncherFactory for Arc<F> {
    fn create(&self) -> Box<dyn BuildLauncher> {
        (**self).create()
    }
}

impl BuildLauncher for Box<dyn BuildLauncher> {
    fn load_settings(&mut self) -> Result<Settings, BuildFailure> {
        (**self).load_settings()
    }

    fn configure(&mut self) -> Result<ConfiguredBuild, BuildFailure> {
        (**self).configure()
    }

    fn set_requested_tasks(&mut self, tasks: Vec<TaskPath>) {
        (**self).set_requested_tasks(tasks)
    }

    fn run(&mut self) -> Result<BuildOutcome, BuildFailure> {
        (**self).run()
    }
}
