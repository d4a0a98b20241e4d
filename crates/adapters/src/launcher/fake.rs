// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake launcher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BuildLauncher, BuildOutcome, ConfiguredBuild, LauncherFactory, Settings};
use braid_core::{BuildFailure, TaskPath};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Recorded launcher call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherCall {
    Create { launcher: usize },
    LoadSettings { launcher: usize },
    Configure { launcher: usize },
    SetRequestedTasks { launcher: usize, tasks: Vec<TaskPath> },
    Run { launcher: usize, tasks: Vec<TaskPath> },
}

type RunHook = Arc<dyn Fn(&[TaskPath]) + Send + Sync>;

#[derive(Default)]
struct FakeState {
    settings: Settings,
    tasks: Vec<TaskPath>,
    calls: Vec<LauncherCall>,
    run_failures: VecDeque<BuildFailure>,
    created: usize,
    running: usize,
    max_running: usize,
    on_run: Option<RunHook>,
}

/// Fake launcher factory for testing
///
/// Every launcher it creates shares one recorder, so tests can inspect the
/// full history of a build across launcher instances.
#[derive(Clone, Default)]
pub struct FakeLauncherFactory {
    state: Arc<Mutex<FakeState>>,
}

impl FakeLauncherFactory {
    pub fn new(root_project: &str) -> Self {
        let factory = Self::default();
        factory.lock().settings = Settings {
            root_project: root_project.to_string(),
            projects: vec![":".to_string()],
        };
        factory
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Tasks reported by the configured build
    pub fn with_tasks(self, tasks: Vec<TaskPath>) -> Self {
        self.lock().tasks = tasks;
        self
    }

    /// Make the next run fail with `failure`
    pub fn fail_next_run(&self, failure: BuildFailure) {
        self.lock().run_failures.push_back(failure);
    }

    /// Invoke `hook` from inside every run, outside the recorder lock
    pub fn on_run(&self, hook: impl Fn(&[TaskPath]) + Send + Sync + 'static) {
        self.lock().on_run = Some(Arc::new(hook));
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<LauncherCall> {
        self.lock().calls.clone()
    }

    /// Task lists passed to each run, in order
    pub fn runs(&self) -> Vec<Vec<TaskPath>> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                LauncherCall::Run { tasks, .. } => Some(tasks.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every task path handed to a run, flattened
    pub fn executed_tasks(&self) -> Vec<TaskPath> {
        self.runs().into_iter().flatten().collect()
    }

    pub fn launchers_created(&self) -> usize {
        self.lock().created
    }

    /// Highest number of runs observed in progress at the same time
    pub fn max_concurrent_runs(&self) -> usize {
        self.lock().max_running
    }
}

impl LauncherFactory for FakeLauncherFactory {
    fn create(&self) -> Box<dyn BuildLauncher> {
        let mut state = self.lock();
        state.created += 1;
        let id = state.created;
        state.calls.push(LauncherCall::Create { launcher: id });
        Box::new(FakeLauncher {
            id,
            requested: Vec::new(),
            factory: self.clone(),
        })
    }
}

struct FakeLauncher {
    id: usize,
    requested: Vec<TaskPath>,
    factory: FakeLauncherFactory,
}

impl BuildLauncher for FakeLauncher {
    fn load_settings(&mut self) -> Result<Settings, BuildFailure> {
        let mut state = self.factory.lock();
        state.calls.push(LauncherCall::LoadSettings { launcher: self.id });
        Ok(state.settings.clone())
    }

    fn configure(&mut self) -> Result<ConfiguredBuild, BuildFailure> {
        let mut state = self.factory.lock();
        state.calls.push(LauncherCall::Configure { launcher: self.id });
        Ok(ConfiguredBuild {
            settings: state.settings.clone(),
            tasks: state.tasks.clone(),
        })
    }

    fn set_requested_tasks(&mut self, tasks: Vec<TaskPath>) {
        self.factory.lock().calls.push(LauncherCall::SetRequestedTasks {
            launcher: self.id,
            tasks: tasks.clone(),
        });
        self.requested = tasks;
    }

    fn run(&mut self) -> Result<BuildOutcome, BuildFailure> {
        let (hook, failure) = {
            let mut state = self.factory.lock();
            state.calls.push(LauncherCall::Run {
                launcher: self.id,
                tasks: self.requested.clone(),
            });
            state.running += 1;
            state.max_running = state.max_running.max(state.running);
            (state.on_run.clone(), state.run_failures.pop_front())
        };

        if let Some(hook) = hook {
            hook(&self.requested);
        }

        self.factory.lock().running -= 1;

        match failure {
            Some(failure) => Err(failure),
            None => Ok(BuildOutcome {
                executed: self.requested.clone(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
