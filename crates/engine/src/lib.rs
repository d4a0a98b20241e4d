// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Braid composite build engine
//!
//! Coordinates task execution across the included builds of one composite
//! build: a registry with cycle detection, one serializing coordinator per
//! build, and delegate task nodes that let a consuming build wait on them.

mod coordinator;
mod delegate;
mod error;
mod registry;
mod resolver;
mod session;
mod tasks;

pub use coordinator::{CoordinatorState, IncludedBuild};
pub use delegate::DelegateTask;
pub use error::{CompositeError, CoordinatorError, RegistryError, ResolveError};
pub use registry::BuildRegistry;
pub use resolver::TaskReferenceResolver;
pub use session::CompositeBuild;
pub use tasks::{BuildTasks, Task, TaskAction, TaskContainer};
