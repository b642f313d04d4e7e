//! Subcommand implementations. Each takes a bootstrapped client and prints
//! its result; errors bubble up to `main` as `anyhow::Error`.

pub mod auth;
pub mod config;
pub mod library;
pub mod output;
pub mod playback;
pub mod transfer;
pub mod utils;
