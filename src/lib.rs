pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod reminders;
pub mod resilience;
pub mod state;
pub mod types;
pub mod upstream;
