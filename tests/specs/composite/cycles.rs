//! Cross-build dependency cycle specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn direct_cycle_is_reported_with_chain() {
    let composite = Composite::with_builds(&["A", "B"]);
    composite.session.add_task(&id("A"), &composite.reference("B", ":x")).unwrap();

    let err = composite
        .session
        .add_task(&id("B"), &composite.reference("A", ":y"))
        .unwrap_err();

    assert_eq!(err.to_string(), "Included build dependency cycle: A -> B -> A");
    assert_eq!(err.cycle_root(), Some(&id("A")));
}

#[test]
fn transitive_cycle_is_reported() {
    let composite = Composite::with_builds(&["A", "B", "C"]);
    composite.session.add_task(&id("A"), &composite.reference("B", ":x")).unwrap();
    composite.session.add_task(&id("B"), &composite.reference("C", ":x")).unwrap();

    let err = composite
        .session
        .add_task(&id("C"), &composite.reference("A", ":x"))
        .unwrap_err();

    assert!(matches!(err, RegistryError::Cycle { .. }));
}

#[test]
fn shared_dependency_is_not_a_cycle() {
    let composite = Composite::with_builds(&["A", "B", "C"]);

    composite.session.add_task(&id("A"), &composite.reference("B", ":x")).unwrap();
    composite.session.add_task(&id("A"), &composite.reference("C", ":x")).unwrap();
    composite.session.add_task(&id("B"), &composite.reference("C", ":x")).unwrap();
}

#[test]
fn unknown_target_build_is_rejected() {
    let composite = Composite::with_builds(&["A"]);
    let reference = TaskReference::new(id("Z"), path(":x"));

    let err = composite.session.add_task(&id("A"), &reference).unwrap_err();

    assert_eq!(err, RegistryError::UnknownBuild(id("Z")));
}
