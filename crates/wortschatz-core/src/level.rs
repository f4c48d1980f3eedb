//! CEFR proficiency levels.
//!
//! Every vocabulary index is scoped to one of the four supported CEFR
//! tiers. Parsing rejects anything outside that set before any I/O is
//! attempted, which is the first gate of the retrieval error taxonomy.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A CEFR proficiency level (A1 easiest, B2 hardest supported tier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// Beginner.
    A1,
    /// Elementary.
    A2,
    /// Intermediate.
    B1,
    /// Upper intermediate.
    B2,
}

impl Level {
    /// All supported levels, in ascending difficulty order.
    pub const ALL: [Level; 4] = [Level::A1, Level::A2, Level::B1, Level::B2];

    /// Canonical uppercase form ("A1", "A2", "B1", "B2").
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::A1 => "A1",
            Level::A2 => "A2",
            Level::B1 => "B1",
            Level::B2 => "B2",
        }
    }

    /// Lowercase form ("a1", ...), used by the CSV-style table naming
    /// convention.
    pub fn as_lowercase(&self) -> &'static str {
        match self {
            Level::A1 => "a1",
            Level::A2 => "a2",
            Level::B1 => "b1",
            Level::B2 => "b2",
        }
    }

    /// Parse a level string, tolerating case ("a1" parses as `A1`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLevel`] for anything outside the four
    /// supported tiers.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(Level::A1),
            "A2" => Ok(Level::A2),
            "B1" => Ok(Level::B1),
            "B2" => Ok(Level::B2),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Level::parse(s)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
