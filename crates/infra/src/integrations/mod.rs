//! Third-party service adapters implementing the core ports

pub mod clerk;
pub mod google_calendar;
pub mod llm_gateway;
pub mod notion;
pub mod slack;

pub use clerk::ClerkClient;
pub use google_calendar::GoogleCalendarClient;
pub use llm_gateway::LlmGatewayClient;
pub use notion::NotionClient;
pub use slack::SlackWebhook;
