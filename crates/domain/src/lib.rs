//! # Brief Domain
//!
//! Business domain types for Brief, the weekly check-in service.
//!
//! This crate contains:
//! - Scheduling outcomes (`CalendarResult`, `SkipReason`, `BusyInterval`)
//! - The canonical weekly `Report`
//! - Escalation tiers and the team roster
//! - Error types, configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other Brief crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
