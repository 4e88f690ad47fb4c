// Pipeline CRM - networking pipeline tracker over an auth provider and a
// document store

// Core types and primitives
pub mod core;

// Auth provider and document store boundaries plus their implementations
pub mod infrastructure;

// Domain records: profile, networking contacts, info follow-ups
pub mod domains;

// Record services and the session lifecycle
pub mod services;
pub mod session;

// Presentation shell: tabs, forms, HTTP routes
pub mod api;
pub mod forms;
pub mod shell;

// Common utilities
pub mod app_state;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use error::{AppError, AppResult};
