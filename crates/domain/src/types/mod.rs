//! Domain data types
//!
//! Organized by area:
//! - `calendar` - reminder scheduling outcomes and provider payloads
//! - `report` - the canonical weekly report
//! - `escalation` - reminder tone tiers and shame bot outcomes
//! - `team` - roster members and identity-provider users
//! - `llm` - completion gateway request/response

pub mod calendar;
pub mod escalation;
pub mod llm;
pub mod report;
pub mod team;

pub use calendar::*;
pub use escalation::*;
pub use llm::*;
pub use report::*;
pub use team::*;
