//! Error type for `gym-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain rule failed while editing documents through the store.
  #[error("core error: {0}")]
  Core(#[from] gym_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// A stored document did not match its collection's schema.
  #[error("malformed {collection} document {id}: {reason}")]
  Schema {
    collection: &'static str,
    id:         String,
    reason:     String,
  },

  #[error("member not found: {0}")]
  MemberNotFound(uuid::Uuid),

  #[error("gallery item not found: {0}")]
  GalleryItemNotFound(uuid::Uuid),

  #[error("post not found: {0}")]
  PostNotFound(uuid::Uuid),

  #[error("could not allocate a unique member code")]
  MemberCodeExhausted,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
