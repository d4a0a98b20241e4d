// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! braid-core: Core types for composite build coordination
//!
//! This crate provides:
//! - Build identifiers, qualified task paths and cross-build task references
//! - Structured, location-aware build failures
//! - Dependency substitution rules for included builds
//! - TOML configuration describing a composite build

pub mod build;
pub mod config;
pub mod failure;
pub mod substitution;

pub use build::{BuildId, TaskPath, TaskPathError, TaskReference, PATH_SEPARATOR};
pub use config::{CompositeConfig, ConfigError, IncludedBuildConfig, SubstitutionConfig};
pub use failure::{BuildFailure, SourceLocation};
pub use substitution::{
    DependencySubstitutions, ModuleId, ProjectSelector, SubstitutionAction, SubstitutionError,
};
