// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structured build failures
//!
//! A failure carries a message, an optional source location and an optional
//! chained cause. Failures that have already been shown to the user are
//! marked as reported so upstream layers do not report them a second time.

use std::fmt;

/// Where in a build script a failure originated
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: Option<u32>,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} line: {}", self.file, line),
            None => write!(f, "{}", self.file),
        }
    }
}

/// A failure raised while configuring or running a build
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildFailure {
    message: String,
    location: Option<SourceLocation>,
    cause: Option<Box<BuildFailure>>,
    reported: bool,
}

impl BuildFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            cause: None,
            reported: false,
        }
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_cause(mut self, cause: BuildFailure) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Mark this failure as already reported to the user
    pub fn reported(mut self) -> Self {
        self.reported = true;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    pub fn cause(&self) -> Option<&BuildFailure> {
        self.cause.as_deref()
    }

    pub fn is_reported(&self) -> bool {
        self.reported
    }

    /// Iterate this failure followed by each chained cause
    pub fn chain(&self) -> impl Iterator<Item = &BuildFailure> {
        std::iter::successors(Some(self), |failure| failure.cause())
    }

    /// Re-raise a location-aware reported failure under a new message
    ///
    /// The location moves to the wrapper, which stays marked as reported.
    /// This failure is chained beneath it without its location, so the
    /// location appears once in the chain. Failures that are not reported
    /// or carry no location are returned unchanged.
    pub fn recontextualize(mut self, message: impl Into<String>) -> Self {
        if !self.reported {
            return self;
        }
        match self.location.take() {
            Some(location) => BuildFailure::new(message)
                .with_location(location)
                .with_cause(self)
                .reported(),
            None => self,
        }
    }
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: {}", location, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for BuildFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
#[path = "failure_tests.rs"]
mod tests;
