//! Business Logic
//!
//! This module contains pure business logic functions that can be unit tested:
//! - dates: Calendar date parsing for API dates and timestamps
//! - errors: Error classification and user-facing messages
//! - formatting: Rupiah amounts, dates and text truncation
//! - navigation: Navigation selection calculations
//! - optimistic: Optimistic like/comment counters and their rollback
//! - room_grid: Floor/room layout and tenant placement
//! - room_status: Room occupancy and payment status derivation
//! - ui: UI state transitions and cycling

pub mod dates;
pub mod errors;
pub mod formatting;
pub mod navigation;
pub mod optimistic;
pub mod room_grid;
pub mod room_status;
pub mod ui;
