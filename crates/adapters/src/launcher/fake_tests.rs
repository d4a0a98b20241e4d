// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn path(p: &str) -> TaskPath {
    TaskPath::parse(p).unwrap()
}

#[test]
fn fake_launcher_records_calls() {
    let factory = FakeLauncherFactory::new("libA");
    let mut launcher = factory.create();

    let settings = launcher.load_settings().unwrap();
    assert_eq!(settings.root_project, "libA");

    launcher.set_requested_tasks(vec![path(":build")]);
    let outcome = launcher.run().unwrap();
    assert_eq!(outcome.executed, vec![path(":build")]);

    assert_eq!(
        factory.calls(),
        vec![
            LauncherCall::Create { launcher: 1 },
            LauncherCall::LoadSettings { launcher: 1 },
            LauncherCall::SetRequestedTasks {
                launcher: 1,
                tasks: vec![path(":build")]
            },
            LauncherCall::Run {
                launcher: 1,
                tasks: vec![path(":build")]
            },
        ]
    );
}

#[test]
fn configured_build_reports_tasks() {
    let factory = FakeLauncherFactory::new("libA").with_tasks(vec![path(":build"), path(":test")]);
    let configured = factory.create().configure().unwrap();
    assert_eq!(configured.settings.root_project, "libA");
    assert_eq!(configured.tasks.len(), 2);
}

#[test]
fn scripted_failure_applies_to_next_run_only() {
    let factory = FakeLauncherFactory::new("libA");
    factory.fail_next_run(BuildFailure::new("boom"));

    let mut launcher = factory.create();
    launcher.set_requested_tasks(vec![path(":a")]);
    assert_eq!(launcher.run().unwrap_err().message(), "boom");
    assert!(launcher.run().is_ok());
}

#[test]
fn run_hook_sees_requested_tasks() {
    let factory = FakeLauncherFactory::new("libA");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_hook = Arc::clone(&seen);
    factory.on_run(move |tasks| seen_in_hook.lock().unwrap().extend_from_slice(tasks));

    let mut launcher = factory.create();
    launcher.set_requested_tasks(vec![path(":x"), path(":y")]);
    launcher.run().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![path(":x"), path(":y")]);
    assert_eq!(factory.max_concurrent_runs(), 1);
}

#[test]
fn each_create_counts_a_new_launcher() {
    let factory = FakeLauncherFactory::new("libA");
    let _first = factory.create();
    let _second = factory.create();
    assert_eq!(factory.launchers_created(), 2);
    assert!(factory.runs().is_empty());
    assert!(factory.executed_tasks().is_empty());
}
