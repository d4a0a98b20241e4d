// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Included build coordinator
//!
//! Serializes execution of one included build. Callers queue task paths with
//! [`IncludedBuild::add_tasks_to_execute`] and block in
//! [`IncludedBuild::await_completion`] until a sweep covering everything queued
//! so far has run. At most one sweep is in flight at a time, and no task path
//! is ever handed to a launcher twice over the coordinator's lifetime.
//!
//! State per coordinator: `Idle -> (waiting callers) -> SweepInFlight -> Idle`.

use crate::error::CoordinatorError;
use braid_adapters::{BuildLauncher, BuildOutcome, ConfiguredBuild, LauncherFactory, Settings};
use braid_core::{
    BuildFailure, BuildId, DependencySubstitutions, SubstitutionAction, SubstitutionError,
    TaskPath, TaskPathError, TaskReference,
};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

/// Observable state of a coordinator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    SweepInFlight { waiting: usize },
}

// Guarded by `IncludedBuild::schedule`
#[derive(Default)]
struct Schedule {
    pending: Vec<TaskPath>,
    executed: HashSet<TaskPath>,
    executing: bool,
    waiting: usize,
}

// Launcher and the models loaded through it; reset whenever a fresh
// launcher is created.
#[derive(Default)]
struct LauncherSlot {
    launcher: Option<Box<dyn BuildLauncher>>,
    settings: Option<Settings>,
    configured: Option<ConfiguredBuild>,
}

enum Substitutions {
    Collecting(Vec<SubstitutionAction>),
    Resolved(Arc<DependencySubstitutions>),
}

/// One included build and the coordinator that runs its tasks
pub struct IncludedBuild {
    name: BuildId,
    project_dir: PathBuf,
    launchers: Arc<dyn LauncherFactory>,
    schedule: Mutex<Schedule>,
    build_completed: Condvar,
    slot: Mutex<LauncherSlot>,
    substitutions: Mutex<Substitutions>,
}

impl IncludedBuild {
    pub fn new(
        name: BuildId,
        project_dir: impl Into<PathBuf>,
        launchers: Arc<dyn LauncherFactory>,
    ) -> Self {
        Self {
            name,
            project_dir: project_dir.into(),
            launchers,
            schedule: Mutex::new(Schedule::default()),
            build_completed: Condvar::new(),
            slot: Mutex::new(LauncherSlot::default()),
            substitutions: Mutex::new(Substitutions::Collecting(Vec::new())),
        }
    }

    pub fn name(&self) -> &BuildId {
        &self.name
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Reference to a task in this build
    ///
    /// The path must be qualified, e.g. `:task` or `:project:task`.
    pub fn task(&self, path: &str) -> Result<TaskReference, TaskPathError> {
        Ok(TaskReference::new(self.name.clone(), TaskPath::parse(path)?))
    }

    // =========================================================================
    // Scheduling
    // =========================================================================

    /// Queue task paths for the next sweep
    ///
    /// Safe to call while a sweep is in flight; the paths are picked up by
    /// the sweep after it.
    pub fn add_tasks_to_execute(&self, tasks: impl IntoIterator<Item = TaskPath>) {
        let mut schedule = self.lock_schedule();
        let before = schedule.pending.len();
        schedule.pending.extend(tasks);
        tracing::debug!(
            build = %self.name,
            added = schedule.pending.len() - before,
            pending = schedule.pending.len(),
            "queued tasks"
        );
    }

    /// Run everything queued so far, waiting for any in-flight sweep first
    ///
    /// Blocks the calling thread until the sweep finishes. Paths that were
    /// already executed by an earlier sweep are skipped; if nothing is left
    /// the launcher is not touched at all. A failed sweep still releases the
    /// coordinator for other waiters before the failure is returned, and its
    /// tasks are not retried by later sweeps.
    pub fn await_completion(&self) -> Result<(), CoordinatorError> {
        let tasks = self.sweep_started()?;
        let _sweep = SweepGuard { build: self };
        self.run_sweep(tasks)?;
        Ok(())
    }

    pub fn state(&self) -> CoordinatorState {
        let schedule = self.lock_schedule();
        if schedule.executing {
            CoordinatorState::SweepInFlight {
                waiting: schedule.waiting,
            }
        } else {
            CoordinatorState::Idle
        }
    }

    /// Paths queued for the next sweep
    pub fn pending_tasks(&self) -> Vec<TaskPath> {
        self.lock_schedule().pending.clone()
    }

    /// Whether `path` has been claimed by a sweep
    pub fn has_executed(&self, path: &TaskPath) -> bool {
        self.lock_schedule().executed.contains(path)
    }

    fn lock_schedule(&self) -> MutexGuard<'_, Schedule> {
        self.schedule.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Wait out any in-flight sweep, then claim the pending tasks
    ///
    /// A waiter that wakes to a poisoned schedule lock is interrupted and
    /// leaves the waiting count as it found it. Poisoning is permanent, so
    /// every later caller that has to wait is interrupted too, while callers
    /// that find the coordinator idle recover the lock and sweep as usual.
    fn sweep_started(&self) -> Result<Vec<TaskPath>, CoordinatorError> {
        let mut schedule = self.lock_schedule();

        if schedule.executing {
            schedule.waiting += 1;
            tracing::debug!(build = %self.name, waiting = schedule.waiting, "waiting for in-flight sweep");
            schedule = match self.build_completed.wait_while(schedule, |s| s.executing) {
                Ok(schedule) => schedule,
                Err(poisoned) => {
                    poisoned.into_inner().waiting -= 1;
                    return Err(CoordinatorError::Interrupted(self.name.clone()));
                }
            };
            schedule.waiting -= 1;
        }

        let requested = std::mem::take(&mut schedule.pending);
        schedule.executing = true;

        let mut tasks = Vec::with_capacity(requested.len());
        for path in requested {
            if schedule.executed.insert(path.clone()) {
                tasks.push(path);
            } else {
                tracing::trace!(build = %self.name, task = %path, "skipping already executed task");
            }
        }
        Ok(tasks)
    }

    fn run_sweep(&self, tasks: Vec<TaskPath>) -> Result<(), BuildFailure> {
        if tasks.is_empty() {
            tracing::debug!(build = %self.name, "nothing to execute");
            return Ok(());
        }

        let span = tracing::info_span!("sweep", build = %self.name);
        let _guard = span.enter();
        tracing::info!(tasks = ?tasks, "executing included build tasks");

        match self.execute(tasks) {
            Ok(outcome) => {
                tracing::info!(executed = outcome.executed.len(), "sweep completed");
                Ok(())
            }
            Err(failure) => {
                tracing::error!(error = %failure, "sweep failed");
                Err(failure)
            }
        }
    }

    fn sweep_completed(&self) {
        let mut schedule = self.lock_schedule();
        schedule.executing = false;
        self.build_completed.notify_all();
    }

    // =========================================================================
    // Launcher lifecycle
    // =========================================================================

    /// Run `tasks` on a launcher that is discarded afterwards
    fn execute(&self, tasks: Vec<TaskPath>) -> Result<BuildOutcome, BuildFailure> {
        let mut launcher = self.take_launcher();
        launcher.set_requested_tasks(tasks);
        launcher.run()
    }

    /// Remove the current launcher from the slot so it cannot be reused
    fn take_launcher(&self) -> Box<dyn BuildLauncher> {
        let mut slot = self.lock_slot();
        match slot.launcher.take() {
            Some(launcher) => launcher,
            None => {
                tracing::debug!(build = %self.name, "creating launcher");
                slot.settings = None;
                slot.configured = None;
                self.launchers.create()
            }
        }
    }

    /// Settings of this build, loaded on first use
    pub fn loaded_settings(&self) -> Result<Settings, BuildFailure> {
        let mut slot = self.lock_slot();
        if let Some(settings) = &slot.settings {
            return Ok(settings.clone());
        }
        let settings = self.ensure_launcher(&mut slot).load_settings()?;
        slot.settings = Some(settings.clone());
        Ok(settings)
    }

    /// Configured model of this build, computed on first use
    pub fn configured_build(&self) -> Result<ConfiguredBuild, BuildFailure> {
        let mut slot = self.lock_slot();
        if let Some(configured) = &slot.configured {
            return Ok(configured.clone());
        }
        let configured = self.ensure_launcher(&mut slot).configure()?;
        slot.settings = Some(configured.settings.clone());
        slot.configured = Some(configured.clone());
        Ok(configured)
    }

    fn lock_slot(&self) -> MutexGuard<'_, LauncherSlot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_launcher<'a>(&self, slot: &'a mut LauncherSlot) -> &'a mut Box<dyn BuildLauncher> {
        if slot.launcher.is_none() {
            tracing::debug!(build = %self.name, "creating launcher");
            slot.settings = None;
            slot.configured = None;
        }
        slot.launcher.get_or_insert_with(|| self.launchers.create())
    }

    // =========================================================================
    // Dependency substitution
    // =========================================================================

    /// Register a substitution action
    ///
    /// Fails once substitutions have been resolved.
    pub fn dependency_substitution(&self, action: SubstitutionAction) -> Result<(), SubstitutionError> {
        match &mut *self.lock_substitutions() {
            Substitutions::Collecting(actions) => {
                actions.push(action);
                Ok(())
            }
            Substitutions::Resolved(_) => Err(SubstitutionError::AlreadyResolved),
        }
    }

    /// Apply all registered actions and freeze the result
    pub fn resolve_dependency_substitutions(&self) -> Result<Arc<DependencySubstitutions>, SubstitutionError> {
        let mut state = self.lock_substitutions();
        let resolved = match &*state {
            Substitutions::Resolved(resolved) => return Ok(Arc::clone(resolved)),
            Substitutions::Collecting(actions) => {
                let mut subs = DependencySubstitutions::for_included_build(self.name.clone());
                for action in actions {
                    action(&mut subs)?;
                }
                Arc::new(subs)
            }
        };
        tracing::debug!(build = %self.name, rules = resolved.len(), "resolved dependency substitutions");
        *state = Substitutions::Resolved(Arc::clone(&resolved));
        Ok(resolved)
    }

    fn lock_substitutions(&self) -> MutexGuard<'_, Substitutions> {
        self.substitutions.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Display for IncludedBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "includedBuild[{}]", self.project_dir.display())
    }
}

impl fmt::Debug for IncludedBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncludedBuild")
            .field("name", &self.name)
            .field("project_dir", &self.project_dir)
            .finish_non_exhaustive()
    }
}

/// Clears the in-flight flag and wakes waiters, including on failure
struct SweepGuard<'a> {
    build: &'a IncludedBuild,
}

impl Drop for SweepGuard<'_> {
    fn drop(&mut self) {
        self.build.sweep_completed();
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
