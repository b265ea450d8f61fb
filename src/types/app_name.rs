// ABOUTME: Validated logical application name.
// ABOUTME: Derives production and generation-tagged concrete names.

use super::generation::Generation;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppNameError {
    #[error("application name cannot be empty")]
    Empty,

    #[error("application name cannot start with '-'")]
    StartsWithHyphen,

    #[error("application name cannot contain whitespace")]
    ContainsWhitespace,
}

/// The operator-facing name of an application.
///
/// The production slot is the concrete application carrying exactly this
/// name. Archived and staged versions live under `<name>-g<N>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppName(String);

impl AppName {
    pub fn new(value: &str) -> Result<Self, AppNameError> {
        if value.is_empty() {
            return Err(AppNameError::Empty);
        }

        if value.starts_with('-') {
            return Err(AppNameError::StartsWithHyphen);
        }

        if value.chars().any(char::is_whitespace) {
            return Err(AppNameError::ContainsWhitespace);
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Concrete name of the given generation, e.g. `myapp-g3`.
    pub fn generation_name(&self, generation: Generation) -> String {
        format!("{}-{}", self.0, generation)
    }

    /// Parse the generation out of a concrete name belonging to this app.
    ///
    /// Returns `None` for the production name itself and for names of other
    /// apps, including ones that merely share a prefix (`myapp-gx`,
    /// `myapp-green`).
    pub fn generation_of(&self, concrete: &str) -> Option<Generation> {
        concrete
            .strip_prefix(self.0.as_str())?
            .strip_prefix('-')?
            .parse()
            .ok()
    }
}

impl FromStr for AppName {
    type Err = AppNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
