//! # Brief application
//!
//! Wires the infrastructure adapters into the core services and exposes
//! them through the `brief` command line.

pub mod commands;
pub mod context;
pub mod logging;

pub use commands::{Cli, Command};
pub use context::AppContext;
