//! Request handler module
//!
//! A single constant handler serves every request.

pub mod welcome;

// Re-export main entry point
pub use welcome::handle_request;
