//! Report normalisation and generation

mod normalize;
pub mod ports;
mod prompts;
mod service;

pub use normalize::normalize_report;
pub use prompts::{refine_prompt, responses_prompt, transcript_prompt};
pub use service::ReportGenerator;
