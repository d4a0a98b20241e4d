//! Coordinator execution specs

use crate::prelude::*;
use braid_engine::CoordinatorState;
use similar_asserts::assert_eq;
use std::thread;

#[test]
fn no_path_reaches_a_launcher_twice() {
    let composite = Composite::with_builds(&["libA"]);
    let lib_a = composite.session.build("libA").unwrap();

    lib_a.add_tasks_to_execute(paths(&[":a", ":b"]));
    lib_a.await_completion().unwrap();
    lib_a.add_tasks_to_execute(paths(&[":b", ":c", ":a"]));
    lib_a.await_completion().unwrap();
    lib_a.await_completion().unwrap();

    assert_eq!(
        composite.fake("libA").runs(),
        vec![paths(&[":a", ":b"]), paths(&[":c"])]
    );
}

#[test]
fn concurrent_waiters_never_overlap_sweeps() {
    let composite = Composite::with_builds(&["libA"]);
    let lib_a = composite.session.build("libA").unwrap();

    thread::scope(|scope| {
        for worker in 0..8 {
            let lib_a = Arc::clone(&lib_a);
            scope.spawn(move || {
                lib_a.add_tasks_to_execute([path(&format!(":task{}", worker % 4))]);
                lib_a.await_completion().unwrap();
            });
        }
    });

    let fake = composite.fake("libA");
    assert_eq!(fake.max_concurrent_runs(), 1);
    let mut executed = fake.executed_tasks();
    executed.sort();
    assert_eq!(executed, paths(&[":task0", ":task1", ":task2", ":task3"]));
    assert_eq!(lib_a.state(), CoordinatorState::Idle);
}

#[test]
fn each_sweep_uses_a_fresh_launcher() {
    let composite = Composite::with_builds(&["libA"]);
    let lib_a = composite.session.build("libA").unwrap();

    lib_a.add_tasks_to_execute([path(":a")]);
    lib_a.await_completion().unwrap();
    lib_a.add_tasks_to_execute([path(":b")]);
    lib_a.await_completion().unwrap();

    assert_eq!(composite.fake("libA").launchers_created(), 2);
}
