//! Core types and business rules for the gym management backend.
//!
//! This crate has no HTTP or database dependencies. It owns
//! the membership model, the monthly payment ledger derived from a member's
//! status history, the status-period editor, and the income report.

pub mod clock;
pub mod content;
pub mod error;
pub mod income;
pub mod ledger;
pub mod member;
pub mod month;
pub mod periods;
pub mod store;

pub use error::{Error, Result};
