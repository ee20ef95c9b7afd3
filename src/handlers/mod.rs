//! Event Handlers
//!
//! This module contains handlers for different types of events:
//! - api: API responses from background service
//! - keyboard: User keyboard input
//!
//! Handlers are functions that take &mut App and apply the event to it.

pub mod api;
pub mod keyboard;

// Re-export for convenience
pub use api::handle_api_response;
pub use keyboard::handle_key;
