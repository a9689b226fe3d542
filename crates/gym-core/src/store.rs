//! The `GymStore` trait.
//!
//! Implemented by storage backends (e.g. `gym-store-sqlite`). The HTTP layer
//! depends on this abstraction, not on any concrete backend.
//!
//! Stores persist documents as they are given. Deriving the payment ledger is
//! the caller's job (see [`crate::member::Member::refresh`]).

use std::future::Future;

use uuid::Uuid;

use crate::{
  content::{GalleryItem, NewGalleryItem, NewPost, Post},
  income::{Expense, FeeSettings, NewExpense},
  member::{Member, NewMember},
};

/// Abstraction over a gym document store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait GymStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Members ───────────────────────────────────────────────────────────

  /// Create a member with a fresh id and member code, one open active status
  /// period from the join date, and an empty ledger.
  fn add_member(
    &self,
    input: NewMember,
  ) -> impl Future<Output = Result<Member, Self::Error>> + Send + '_;

  /// Load a member by id. Returns `None` if not found.
  fn get_member(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Member>, Self::Error>> + Send + '_;

  /// Replace a stored member document. Fails if the member does not exist.
  fn save_member<'a>(
    &'a self,
    member: &'a Member,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// All members, most recent join date first.
  fn list_members(
    &self,
  ) -> impl Future<Output = Result<Vec<Member>, Self::Error>> + Send + '_;

  /// Returns `false` if there was nothing to delete.
  fn delete_member(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Gallery ───────────────────────────────────────────────────────────

  /// All gallery items, newest first.
  fn list_gallery_items(
    &self,
  ) -> impl Future<Output = Result<Vec<GalleryItem>, Self::Error>> + Send + '_;

  fn get_gallery_item(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<GalleryItem>, Self::Error>> + Send + '_;

  fn add_gallery_item(
    &self,
    input: NewGalleryItem,
  ) -> impl Future<Output = Result<GalleryItem, Self::Error>> + Send + '_;

  fn update_gallery_item<'a>(
    &'a self,
    item: &'a GalleryItem,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn delete_gallery_item(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// All posts, newest first.
  fn list_posts(&self) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  fn add_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn update_post<'a>(
    &'a self,
    post: &'a Post,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn delete_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Expenses ──────────────────────────────────────────────────────────

  /// All expenses, most recent date first.
  fn list_expenses(
    &self,
  ) -> impl Future<Output = Result<Vec<Expense>, Self::Error>> + Send + '_;

  fn add_expense(
    &self,
    input: NewExpense,
  ) -> impl Future<Output = Result<Expense, Self::Error>> + Send + '_;

  fn delete_expense(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  /// The saved fee settings, or the defaults if none were ever saved.
  fn get_fee_settings(
    &self,
  ) -> impl Future<Output = Result<FeeSettings, Self::Error>> + Send + '_;

  fn save_fee_settings(
    &self,
    fees: FeeSettings,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
