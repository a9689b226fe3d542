//! [`SqliteStore`], the SQLite implementation of [`GymStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use gym_core::{
  content::{GalleryItem, NewGalleryItem, NewPost, Post},
  income::{Expense, FeeSettings, NewExpense},
  member::{Member, NewMember},
  store::GymStore,
};

use crate::{
  Error, Result,
  encode::{Document, RawDocument, encode_document, encode_uuid},
  schema::SCHEMA,
};

/// How many random member codes to try before giving up.
const MEMBER_CODE_ATTEMPTS: usize = 16;

const FEES_SETTING: &str = "fees";

/// A `GZnnnnn` code.
fn random_member_code() -> String { format!("GZ{:05}", Uuid::new_v4().as_u128() % 100_000) }

// ─── Store ───────────────────────────────────────────────────────────────────

/// A gym document store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Open one per
/// process and hand clones to whoever needs it; call [`SqliteStore::close`]
/// on shutdown.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection, flushing any pending work.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    tracing::debug!("store closed");
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Generic document helpers ──────────────────────────────────────────

  async fn insert<D: Document>(&self, doc: &D) -> Result<()> {
    let row = encode_document(doc)?;
    let sql = format!(
      "INSERT INTO {} (id, sort_key, doc) VALUES (?1, ?2, ?3)",
      D::COLLECTION
    );

    self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params![row.id, row.sort_key, row.doc])?;
        Ok(())
      })
      .await?;
    tracing::debug!(collection = D::COLLECTION, id = %doc.id(), "inserted document");
    Ok(())
  }

  /// Overwrite an existing document. Returns `false` if no row had its id.
  async fn replace<D: Document>(&self, doc: &D) -> Result<bool> {
    let row = encode_document(doc)?;
    let sql = format!(
      "UPDATE {} SET sort_key = ?2, doc = ?3 WHERE id = ?1",
      D::COLLECTION
    );

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&sql, rusqlite::params![row.id, row.sort_key, row.doc])?)
      })
      .await?;
    tracing::debug!(collection = D::COLLECTION, id = %doc.id(), changed, "replaced document");
    Ok(changed > 0)
  }

  async fn fetch<D: Document>(&self, id: Uuid) -> Result<Option<D>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT id, doc FROM {} WHERE id = ?1", D::COLLECTION);

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| {
              Ok(RawDocument {
                id:  row.get(0)?,
                doc: row.get(1)?,
              })
            })
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  /// Every document in the collection, in descending `sort_key` order.
  async fn fetch_all<D: Document>(&self) -> Result<Vec<D>> {
    let sql = format!(
      "SELECT id, doc FROM {} ORDER BY sort_key DESC, rowid DESC",
      D::COLLECTION
    );

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawDocument {
              id:  row.get(0)?,
              doc: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }

  async fn remove<D: Document>(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let sql = format!("DELETE FROM {} WHERE id = ?1", D::COLLECTION);

    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params![id_str])?))
      .await?;
    tracing::debug!(collection = D::COLLECTION, %id, removed, "deleted document");
    Ok(removed > 0)
  }

  // ── Members ───────────────────────────────────────────────────────────

  /// Insert `member` unless another member already holds its code.
  ///
  /// The unique index on `member_code` turns the check and the write into one
  /// statement, so concurrent inserts cannot both claim a code.
  pub(crate) async fn insert_member(&self, member: &Member) -> Result<bool> {
    let row = encode_document(member)?;

    let inserted = self
      .conn
      .call(move |conn| {
        match conn.execute(
          "INSERT INTO members (id, sort_key, doc) VALUES (?1, ?2, ?3)",
          rusqlite::params![row.id, row.sort_key, row.doc],
        ) {
          Ok(_) => Ok(true),
          Err(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
          {
            Ok(false)
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;
    if inserted {
      tracing::debug!(id = %member.id, "inserted member");
    } else {
      tracing::debug!(code = %member.member_code, "member code taken");
    }
    Ok(inserted)
  }

  // ── Settings ──────────────────────────────────────────────────────────

  async fn get_setting(&self, name: &'static str) -> Result<Option<String>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(
                "SELECT doc FROM settings WHERE name = ?1",
                rusqlite::params![name],
                |row| row.get(0),
              )
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn put_setting(&self, name: &'static str, doc: String) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO settings (name, doc) VALUES (?1, ?2)
           ON CONFLICT(name) DO UPDATE SET doc = excluded.doc",
          rusqlite::params![name, doc],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── GymStore impl ───────────────────────────────────────────────────────────

impl GymStore for SqliteStore {
  type Error = Error;

  // ── Members ───────────────────────────────────────────────────────────────

  async fn add_member(&self, input: NewMember) -> Result<Member> {
    let mut member = Member::join(Uuid::new_v4(), random_member_code(), input, Utc::now());
    for _ in 0..MEMBER_CODE_ATTEMPTS {
      if self.insert_member(&member).await? {
        tracing::info!(id = %member.id, code = %member.member_code, "member added");
        return Ok(member);
      }
      member.member_code = random_member_code();
    }
    Err(Error::MemberCodeExhausted)
  }

  async fn get_member(&self, id: Uuid) -> Result<Option<Member>> { self.fetch(id).await }

  async fn save_member(&self, member: &Member) -> Result<()> {
    if !self.replace(member).await? {
      return Err(Error::MemberNotFound(member.id));
    }
    Ok(())
  }

  async fn list_members(&self) -> Result<Vec<Member>> { self.fetch_all().await }

  async fn delete_member(&self, id: Uuid) -> Result<bool> {
    self.remove::<Member>(id).await
  }

  // ── Gallery ───────────────────────────────────────────────────────────────

  async fn list_gallery_items(&self) -> Result<Vec<GalleryItem>> { self.fetch_all().await }

  async fn get_gallery_item(&self, id: Uuid) -> Result<Option<GalleryItem>> {
    self.fetch(id).await
  }

  async fn add_gallery_item(&self, input: NewGalleryItem) -> Result<GalleryItem> {
    let item = GalleryItem::from_new(Uuid::new_v4(), input, Utc::now());
    self.insert(&item).await?;
    Ok(item)
  }

  async fn update_gallery_item(&self, item: &GalleryItem) -> Result<()> {
    if !self.replace(item).await? {
      return Err(Error::GalleryItemNotFound(item.id));
    }
    Ok(())
  }

  async fn delete_gallery_item(&self, id: Uuid) -> Result<bool> {
    self.remove::<GalleryItem>(id).await
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn list_posts(&self) -> Result<Vec<Post>> { self.fetch_all().await }

  async fn get_post(&self, id: Uuid) -> Result<Option<Post>> { self.fetch(id).await }

  async fn add_post(&self, input: NewPost) -> Result<Post> {
    let post = Post::from_new(Uuid::new_v4(), input, Utc::now());
    self.insert(&post).await?;
    Ok(post)
  }

  async fn update_post(&self, post: &Post) -> Result<()> {
    if !self.replace(post).await? {
      return Err(Error::PostNotFound(post.id));
    }
    Ok(())
  }

  async fn delete_post(&self, id: Uuid) -> Result<bool> { self.remove::<Post>(id).await }

  // ── Expenses ──────────────────────────────────────────────────────────────

  async fn list_expenses(&self) -> Result<Vec<Expense>> { self.fetch_all().await }

  async fn add_expense(&self, input: NewExpense) -> Result<Expense> {
    let expense = Expense {
      id:          Uuid::new_v4(),
      description: input.description,
      amount:      input.amount,
      date:        input.date,
    };
    self.insert(&expense).await?;
    Ok(expense)
  }

  async fn delete_expense(&self, id: Uuid) -> Result<bool> {
    self.remove::<Expense>(id).await
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn get_fee_settings(&self) -> Result<FeeSettings> {
    match self.get_setting(FEES_SETTING).await? {
      Some(doc) => serde_json::from_str(&doc).map_err(|e| Error::Schema {
        collection: "settings",
        id:         FEES_SETTING.to_owned(),
        reason:     e.to_string(),
      }),
      None => Ok(FeeSettings::default()),
    }
  }

  async fn save_fee_settings(&self, fees: FeeSettings) -> Result<()> {
    self.put_setting(FEES_SETTING, serde_json::to_string(&fees)?).await?;
    tracing::info!(admission_fee = %fees.admission_fee, monthly_fee = %fees.monthly_fee, "fee settings saved");
    Ok(())
  }
}
