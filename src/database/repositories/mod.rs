//! Database repositories module
//!
//! Repository functions take a plain connection so that the database service
//! can run several of them inside one transaction.

pub mod member;
pub mod group;
pub mod membership;
pub mod report;
