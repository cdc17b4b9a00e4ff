//! Sift CLI: command-line access to the retrieval engine.
//!
//! Loads a JSON corpus, runs searches, suggestions, and related-document
//! lookups, and keeps stored vectors up to date with `sift index`.
//!
//! # Modules
//!
//! - [`cli`]: clap argument and command definitions
//! - [`config`]: `SiftConfig` loading via `confyg`
//! - [`app`]: `SiftCli` command dispatch

pub mod app;
pub mod cli;
pub mod config;

pub use app::SiftCli;
pub use cli::{CliArgs, Command, ConfigAction, ConfigCommand};
pub use config::{CONFIG_ENV_VAR, CorpusConfig, SiftConfig};
