//! External Services
//!
//! This module contains services that interact with external systems:
//! - api: API request queue service

pub mod api;

// Re-export commonly used types for convenience
pub use api::{spawn_api_service, ApiRequest, ApiResponse, LoadedData, Mutation, Priority};
