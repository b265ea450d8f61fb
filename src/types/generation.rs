// ABOUTME: Generation tags distinguishing successive versions of an app.
// ABOUTME: Rendered and parsed as `g<N>`, ordered numerically.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation tag must look like g1, g2, ...: {0}")]
    Malformed(String),

    #[error("generation numbers start at 1")]
    Zero,
}

/// A monotonically increasing version tag, `g1`, `g2`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    pub const FIRST: Generation = Generation(1);

    /// Returns `None` for zero.
    pub fn new(number: u32) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    pub fn number(self) -> u32 {
        self.0
    }

    /// Returns `None` once the numbering is exhausted.
    pub fn next(self) -> Option<Generation> {
        self.0.checked_add(1).map(Generation)
    }

    /// The tag following the newest of `existing`, or `g1` if there is none.
    /// Returns `None` if the newest tag is already the last one.
    pub fn after_newest(existing: &[Generation]) -> Option<Generation> {
        match existing.iter().max() {
            Some(newest) => newest.next(),
            None => Some(Self::FIRST),
        }
    }
}

impl FromStr for Generation {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('g')
            .filter(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| GenerationError::Malformed(s.to_string()))?;

        if digits == "0" {
            return Err(GenerationError::Zero);
        }

        // `g01` would alias `g1` and break the one-name-per-tag mapping.
        if digits.starts_with('0') {
            return Err(GenerationError::Malformed(s.to_string()));
        }

        digits
            .parse()
            .map(Generation)
            .map_err(|_| GenerationError::Malformed(s.to_string()))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.0)
    }
}
