//! Wortschatz Core — shared types and errors.
//!
//! This crate provides the foundational types used across all Wortschatz
//! crates. It has no internal Wortschatz dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`level`]: CEFR proficiency levels

pub mod error;
pub mod level;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use level::Level;
