//! Test helpers module
//!
//! This module provides utilities and helpers for testing ReportBot.
//! It includes a mock Bot API server, a recording fake of the chat platform
//! and a test context wiring them to an in-memory database.

#![allow(dead_code)]

pub mod recording_actions;
pub mod telegram_mock;
pub mod test_context;

pub use recording_actions::*;
pub use telegram_mock::*;
pub use test_context::*;
