//! stepframe library
//!
//! Configuration loading, the authoring session and the `stepframe` CLI.

pub mod cli;
pub mod config;
pub mod session;

pub use config::{AppConfig, LoadedConfig};
pub use session::AuthoringSession;
