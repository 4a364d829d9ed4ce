//! Calendar reminder scheduling

mod batch;
mod locks;
pub mod ports;
mod service;
mod slots;

pub use batch::ReminderBatch;
pub use locks::UserLocks;
pub use service::ReminderScheduler;
pub use slots::select_slot;
