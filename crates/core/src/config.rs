// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composite build configuration
//!
//! Describes which builds take part in a composite and the dependency
//! substitutions each of them contributes:
//!
//! ```toml
//! [[build]]
//! name = "libA"
//! dir = "../libA"
//!
//! [[build.substitute]]
//! module = "org.example:lib-a"
//! project = ":"
//! ```

use crate::build::{BuildId, PATH_SEPARATOR};
use crate::substitution::{DependencySubstitutions, ModuleId, SubstitutionAction};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading composite configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("build name must not be empty")]
    EmptyName,

    #[error("duplicate included build '{0}'")]
    DuplicateBuild(String),

    #[error("invalid substitution in build '{build}': {reason}")]
    InvalidSubstitution { build: String, reason: String },
}

/// One `[[build.substitute]]` entry
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubstitutionConfig {
    pub module: String,
    #[serde(default = "root_project")]
    pub project: String,
}

fn root_project() -> String {
    PATH_SEPARATOR.to_string()
}

/// One `[[build]]` entry
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncludedBuildConfig {
    pub name: String,
    pub dir: PathBuf,
    #[serde(default)]
    pub substitute: Vec<SubstitutionConfig>,
}

impl IncludedBuildConfig {
    pub fn id(&self) -> BuildId {
        BuildId::new(self.name.clone())
    }

    /// Substitution entries converted to configuration actions
    pub fn substitution_actions(&self) -> Vec<SubstitutionAction> {
        self.substitute
            .iter()
            .cloned()
            .map(|entry| {
                let action: SubstitutionAction =
                    Box::new(move |subs: &mut DependencySubstitutions| {
                        subs.substitute(&entry.module, &entry.project)
                    });
                action
            })
            .collect()
    }
}

/// The full set of builds taking part in a composite
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompositeConfig {
    #[serde(default, rename = "build")]
    pub builds: Vec<IncludedBuildConfig>,
}

impl CompositeConfig {
    /// Parse and validate configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: CompositeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    ///
    /// Relative build directories resolve against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(&content)?;

        if let Some(base) = path.parent() {
            for build in &mut config.builds {
                if build.dir.is_relative() {
                    build.dir = base.join(&build.dir);
                }
            }
        }

        tracing::debug!(path = %path.display(), builds = config.builds.len(), "loaded composite config");
        Ok(config)
    }

    pub fn build(&self, name: &str) -> Option<&IncludedBuildConfig> {
        self.builds.iter().find(|b| b.name == name)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for build in &self.builds {
            if build.name.trim().is_empty() {
                return Err(ConfigError::EmptyName);
            }
            if !seen.insert(build.name.as_str()) {
                return Err(ConfigError::DuplicateBuild(build.name.clone()));
            }
            for entry in &build.substitute {
                if let Err(e) = entry.module.parse::<ModuleId>() {
                    return Err(ConfigError::InvalidSubstitution {
                        build: build.name.clone(),
                        reason: e.to_string(),
                    });
                }
                if !entry.project.starts_with(PATH_SEPARATOR) {
                    return Err(ConfigError::InvalidSubstitution {
                        build: build.name.clone(),
                        reason: format!("invalid project path '{}': must start with ':'", entry.project),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
