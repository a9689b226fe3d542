//! Encoding and decoding between domain types and stored JSON documents.
//!
//! Documents are stored as compact JSON. Decoding is where the schema is
//! enforced: a row whose JSON does not deserialize into its collection's type,
//! or whose embedded id disagrees with the row key, is rejected with
//! [`Error::Schema`] rather than passed through.

use chrono::{DateTime, SecondsFormat, Utc};
use gym_core::{
  content::{GalleryItem, Post},
  income::Expense,
  member::Member,
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// Fixed-width RFC 3339 so that lexical order is chronological order.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ─── Documents ───────────────────────────────────────────────────────────────

/// A domain type stored one-per-row in its own collection table.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
  /// Table name.
  const COLLECTION: &'static str;

  fn id(&self) -> Uuid;

  /// Value of the `sort_key` column; collections list in descending order.
  fn sort_key(&self) -> String;
}

impl Document for Member {
  const COLLECTION: &'static str = "members";

  fn id(&self) -> Uuid { self.id }

  fn sort_key(&self) -> String { self.start_date.to_string() }
}

impl Document for GalleryItem {
  const COLLECTION: &'static str = "gallery";

  fn id(&self) -> Uuid { self.id }

  fn sort_key(&self) -> String { encode_dt(self.created_at) }
}

impl Document for Post {
  const COLLECTION: &'static str = "posts";

  fn id(&self) -> Uuid { self.id }

  fn sort_key(&self) -> String { encode_dt(self.created_at) }
}

impl Document for Expense {
  const COLLECTION: &'static str = "expenses";

  fn id(&self) -> Uuid { self.id }

  fn sort_key(&self) -> String { self.date.to_string() }
}

/// Column values for writing a document row.
pub struct EncodedDocument {
  pub id:       String,
  pub sort_key: String,
  pub doc:      String,
}

pub fn encode_document<D: Document>(doc: &D) -> Result<EncodedDocument> {
  Ok(EncodedDocument {
    id:       encode_uuid(doc.id()),
    sort_key: doc.sort_key(),
    doc:      serde_json::to_string(doc)?,
  })
}

/// Raw strings read directly from a collection row.
pub struct RawDocument {
  pub id:  String,
  pub doc: String,
}

impl RawDocument {
  pub fn into_document<D: Document>(self) -> Result<D> {
    let schema_error = |reason: String| Error::Schema {
      collection: D::COLLECTION,
      id:         self.id.clone(),
      reason,
    };

    let row_id = decode_uuid(&self.id).map_err(|e| schema_error(e.to_string()))?;
    let doc: D =
      serde_json::from_str(&self.doc).map_err(|e| schema_error(e.to_string()))?;

    if doc.id() != row_id {
      return Err(schema_error(format!("embedded id {} does not match row", doc.id())));
    }
    Ok(doc)
  }
}
