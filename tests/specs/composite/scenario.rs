//! Composite scenario specs
//!
//! `app` consumes `libA` and `libB`; neither library depends on the other.

use crate::prelude::*;
use similar_asserts::assert_eq;

fn scenario() -> (Composite, BuildTasks) {
    (
        Composite::with_builds(&["app", "libA", "libB"]),
        BuildTasks::new(id("app")),
    )
}

#[test]
fn app_gets_one_delegate_per_library() {
    let (composite, mut tasks) = scenario();

    let a = composite.depend(&mut tasks, "libA", ":build");
    let b = composite.depend(&mut tasks, "libB", ":build");

    assert_eq!(a.name(), "libA");
    assert_eq!(b.name(), "libB");
    let delegates: Vec<&str> = tasks.delegates().map(|d| d.name()).collect();
    assert_eq!(delegates, vec!["libA", "libB"]);
    assert_eq!(
        composite.session.registry().dependencies_of(&id("app")),
        vec![id("libA"), id("libB")]
    );
}

#[test]
fn repeated_references_reuse_the_delegate() {
    let (composite, mut tasks) = scenario();

    let first = composite.depend(&mut tasks, "libA", ":build");
    let second = composite.depend(&mut tasks, "libA", ":javadoc");

    assert!(Arc::ptr_eq(
        first.as_delegate().unwrap(),
        second.as_delegate().unwrap()
    ));
    assert_eq!(tasks.len(), 1);
}

#[test]
fn executing_delegates_runs_each_library_once() {
    let (composite, mut tasks) = scenario();
    composite.depend(&mut tasks, "libA", ":build");
    composite.depend(&mut tasks, "libB", ":build");
    // Same path requested again through a transitive edge
    composite.depend(&mut tasks, "libA", ":build");
    composite.session.begin_execution().unwrap();

    for task in tasks.iter() {
        task.execute().unwrap();
    }
    for task in tasks.iter() {
        task.execute().unwrap();
    }

    assert_eq!(composite.fake("libA").runs(), vec![paths(&[":build"])]);
    assert_eq!(composite.fake("libB").runs(), vec![paths(&[":build"])]);
    assert!(composite.fake("app").runs().is_empty());
}

#[test]
fn delegates_execute_in_parallel_worker_threads() {
    let (composite, mut tasks) = scenario();
    composite.depend(&mut tasks, "libA", ":build");
    composite.depend(&mut tasks, "libB", ":build");
    composite.session.begin_execution().unwrap();

    std::thread::scope(|scope| {
        for task in tasks.iter() {
            scope.spawn(move || task.execute().unwrap());
        }
    });

    assert_eq!(composite.fake("libA").executed_tasks(), paths(&[":build"]));
    assert_eq!(composite.fake("libB").executed_tasks(), paths(&[":build"]));
}

#[test]
fn task_references_require_qualified_paths() {
    let composite = Composite::with_builds(&["libA"]);
    let lib_a = composite.session.build("libA").unwrap();

    assert_eq!(lib_a.task(":foo").unwrap().to_string(), "libA:foo");
    assert!(lib_a.task("foo").is_err());
}

#[test]
fn name_collision_with_existing_task_is_rejected() {
    let (composite, mut tasks) = scenario();
    tasks
        .add(Task::action("libA", || -> Result<(), BuildFailure> { Ok(()) }))
        .unwrap();

    let reference = composite.reference("libA", ":build");
    let err = composite
        .session
        .resolver()
        .resolve(&reference, &mut tasks)
        .unwrap_err();

    assert_eq!(err, ResolveError::NameCollision("libA".to_string()));
}
