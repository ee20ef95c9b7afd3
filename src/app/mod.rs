//! App Orchestration Methods
//!
//! This module contains App implementation methods grouped by domain.
//! Each submodule contains methods that orchestrate between:
//! - Model state (pure, in src/model/)
//! - Services (API request queue, session store)
//! - Handlers (in src/handlers/)
//! - Logic (pure business logic in src/logic/)
//!
//! Methods are kept as `impl App` but organized by functional domain
//! for better discoverability and maintainability.

pub(crate) mod actions;
pub(crate) mod forms;
pub(crate) mod screens;
pub(crate) mod session;
