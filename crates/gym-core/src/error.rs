//! Error types for `gym-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid month label: {0:?} (expected e.g. \"January 2024\")")]
  InvalidMonth(String),

  #[error("invalid date: {0:?} (expected YYYY-MM-DD)")]
  InvalidDate(String),

  #[error("invalid status history: {0}")]
  InvalidStatusHistory(String),

  #[error("member not found: {0}")]
  MemberNotFound(Uuid),

  #[error("payment not found: {0}")]
  PaymentNotFound(String),

  #[error("{0} is an inactive month with no fee due")]
  MonthNotBillable(crate::month::YearMonth),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
