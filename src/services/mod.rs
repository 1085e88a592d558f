pub mod refresh_service;
pub mod scheduler;

pub use refresh_service::{RefreshService, RefreshStats};
pub use scheduler::RefreshScheduler;
