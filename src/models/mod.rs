//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod member;
pub mod group;
pub mod membership;
pub mod report;

// Re-export commonly used models
pub use member::Member;
pub use group::{Group, GroupSetting, SettingKind, DEFAULT_VOTE_THRESHOLD, DEFAULT_COOLDOWN_MINUTES, DEFAULT_MIN_MESSAGES_FOR_VOTE_POWER, MAX_COOLDOWN_MINUTES};
pub use membership::Membership;
pub use report::{ReportCase, ReportCaseRow, ReportStatus, Vote, DEFAULT_VOTE_WEIGHT};
