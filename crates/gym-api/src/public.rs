//! Handlers for the unauthenticated `/api/public` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET` | `/home` | Featured feed plus up to four members and gallery items |
//! | `GET` | `/featured` | Posts and gallery items flagged for the homepage |
//! | `GET` | `/gallery` | Optional `?category=`; `All` matches everything |
//! | `GET` | `/gallery/categories` | `["All", ...]` |
//! | `GET` | `/posts` | Newest first |
//! | `GET` | `/members` | [`MemberProfile`]s only |
//! | `GET` | `/members/:id` | 404 if not found |
//!
//! Nothing here writes to the store.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use gym_core::{
  content::{
    FeaturedItem, GalleryItem, Post, featured_items, filter_by_category, gallery_categories,
  },
  member::MemberProfile,
  store::GymStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// Members and gallery items shown on the home page, each.
pub const HOME_LIMIT: usize = 4;

// ─── Home ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct HomePage {
  pub featured: Vec<FeaturedItem>,
  pub members:  Vec<MemberProfile>,
  pub gallery:  Vec<GalleryItem>,
}

/// `GET /home`
pub async fn home<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<HomePage>, ApiError> {
  let posts = state.store.list_posts().await.map_err(ApiError::store)?;
  let gallery = state.store.list_gallery_items().await.map_err(ApiError::store)?;
  let members = state.store.list_members().await.map_err(ApiError::store)?;

  Ok(Json(HomePage {
    featured: featured_items(&posts, &gallery),
    members:  members
      .iter()
      .filter(|m| m.show_on_homepage)
      .take(HOME_LIMIT)
      .map(MemberProfile::from)
      .collect(),
    gallery:  gallery
      .into_iter()
      .filter(|g| g.show_on_homepage)
      .take(HOME_LIMIT)
      .collect(),
  }))
}

/// `GET /featured`
pub async fn featured<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<FeaturedItem>>, ApiError> {
  let posts = state.store.list_posts().await.map_err(ApiError::store)?;
  let gallery = state.store.list_gallery_items().await.map_err(ApiError::store)?;
  Ok(Json(featured_items(&posts, &gallery)))
}

// ─── Gallery ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GalleryParams {
  pub category: Option<String>,
}

/// `GET /gallery[?category=<name>]`
pub async fn gallery<S: GymStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<GalleryParams>,
) -> Result<Json<Vec<GalleryItem>>, ApiError> {
  let items = state.store.list_gallery_items().await.map_err(ApiError::store)?;
  let items = match params.category {
    Some(category) => filter_by_category(&items, &category).into_iter().cloned().collect(),
    None => items,
  };
  Ok(Json(items))
}

/// `GET /gallery/categories`
pub async fn categories<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<String>>, ApiError> {
  let items = state.store.list_gallery_items().await.map_err(ApiError::store)?;
  Ok(Json(gallery_categories(&items)))
}

// ─── Posts ────────────────────────────────────────────────────────────────────

/// `GET /posts`
pub async fn posts<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Post>>, ApiError> {
  let posts = state.store.list_posts().await.map_err(ApiError::store)?;
  Ok(Json(posts))
}

// ─── Members ──────────────────────────────────────────────────────────────────

/// `GET /members`
pub async fn members<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<MemberProfile>>, ApiError> {
  let members = state.store.list_members().await.map_err(ApiError::store)?;
  Ok(Json(members.iter().map(MemberProfile::from).collect()))
}

/// `GET /members/:id`
pub async fn member<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<MemberProfile>, ApiError> {
  let member = state
    .store
    .get_member(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(gym_core::Error::MemberNotFound(id))?;
  Ok(Json(MemberProfile::from(&member)))
}
