//! Failure propagation specs

use crate::prelude::*;
use similar_asserts::assert_eq;

fn script_failure() -> BuildFailure {
    BuildFailure::new("Could not compile build file")
        .with_location(SourceLocation::new("libA/build.gradle", Some(7)))
        .reported()
}

#[test]
fn delegate_failure_names_the_build_and_keeps_location() {
    let composite = Composite::with_builds(&["libA"]);
    let mut tasks = BuildTasks::new(id("app"));
    let delegate = composite.depend(&mut tasks, "libA", ":build");
    composite.fake("libA").fail_next_run(script_failure());

    let failure = delegate.execute().unwrap_err();

    assert_eq!(
        failure.to_string(),
        "libA/build.gradle line: 7: Failed to build artifacts for libA"
    );
    assert!(failure.is_reported());
    let messages: Vec<&str> = failure.chain().map(BuildFailure::message).collect();
    assert_eq!(
        messages,
        vec!["Failed to build artifacts for libA", "Could not compile build file"]
    );
}

#[test]
fn failed_sweep_releases_the_coordinator() {
    let composite = Composite::with_builds(&["libA"]);
    let lib_a = composite.session.build("libA").unwrap();
    lib_a.add_tasks_to_execute([path(":broken"), path(":other")]);
    composite.fake("libA").fail_next_run(script_failure());

    assert!(lib_a.await_completion().is_err());

    lib_a.add_tasks_to_execute([path(":next"), path(":broken")]);
    lib_a.await_completion().unwrap();
    assert_eq!(
        composite.fake("libA").runs(),
        vec![paths(&[":broken", ":other"]), paths(&[":next"])]
    );
}

#[test]
fn waiter_proceeds_after_failed_sweep() {
    let composite = Composite::with_builds(&["libA"]);
    let lib_a = composite.session.build("libA").unwrap();
    lib_a.add_tasks_to_execute([path(":broken")]);
    composite.fake("libA").fail_next_run(script_failure());

    let results: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let lib_a = Arc::clone(&lib_a);
                scope.spawn(move || lib_a.await_completion().is_ok())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Exactly one caller observed the failure; the other found nothing left to run
    assert_eq!(results.iter().filter(|ok| !**ok).count(), 1);
    assert_eq!(composite.fake("libA").runs().len(), 1);
}
