//! Wortschatz command-line application.
//!
//! Commands:
//!
//! - `serve` — start the HTTP API (LanceDB index + fastembed model +
//!   OpenRouter provider, wired from configuration)
//! - `seed` — load `records_*.json` dataset files into per-level tables
//! - `version`, `health`
//!
//! Configuration is TOML plus a `WORTSCHATZ_*` environment overlay; see
//! [`config::WortschatzConfig`].

pub mod app;
pub mod cli;
pub mod config;

pub use app::WortschatzApp;
pub use cli::{CliArgs, Command};
pub use config::WortschatzConfig;
