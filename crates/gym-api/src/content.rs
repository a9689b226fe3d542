//! Handlers for `/gallery` and `/posts` admin endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/gallery` | Newest first |
//! | `POST`   | `/gallery` | Body: [`NewGalleryItem`]; returns 201 |
//! | `PUT`    | `/gallery/:id` | Body: [`NewGalleryItem`]; keeps id and `created_at` |
//! | `DELETE` | `/gallery/:id` | 204, or 404 |
//! | `GET`    | `/posts` | Newest first |
//! | `POST`   | `/posts` | Body: [`NewPost`]; returns 201 |
//! | `PUT`    | `/posts/:id` | Body: [`NewPost`]; keeps id and `created_at` |
//! | `DELETE` | `/posts/:id` | 204, or 404 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use gym_core::{
  content::{GalleryItem, NewGalleryItem, NewPost, Post},
  store::GymStore,
};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

fn check_gallery_item(input: &NewGalleryItem) -> Result<(), ApiError> {
  if input.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }
  if input.url.trim().is_empty() {
    return Err(ApiError::BadRequest("url must not be empty".into()));
  }
  if input.category.trim().is_empty() {
    return Err(ApiError::BadRequest("category must not be empty".into()));
  }
  Ok(())
}

fn check_post(input: &NewPost) -> Result<(), ApiError> {
  if input.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }
  Ok(())
}

// ─── Gallery ──────────────────────────────────────────────────────────────────

/// `GET /gallery`
pub async fn list_gallery<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<GalleryItem>>, ApiError> {
  let items = state.store.list_gallery_items().await.map_err(ApiError::store)?;
  Ok(Json(items))
}

/// `POST /gallery`
pub async fn create_gallery_item<S: GymStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewGalleryItem>,
) -> Result<impl IntoResponse, ApiError> {
  check_gallery_item(&body)?;
  let item = state.store.add_gallery_item(body).await.map_err(ApiError::store)?;
  tracing::info!(id = %item.id, category = %item.category, "gallery item added");
  Ok((StatusCode::CREATED, Json(item)))
}

/// `PUT /gallery/:id`
pub async fn update_gallery_item<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewGalleryItem>,
) -> Result<Json<GalleryItem>, ApiError> {
  check_gallery_item(&body)?;
  let existing = state
    .store
    .get_gallery_item(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("gallery item {id} not found")))?;

  let item = GalleryItem::from_new(id, body, existing.created_at);
  state.store.update_gallery_item(&item).await.map_err(ApiError::store)?;
  Ok(Json(item))
}

/// `DELETE /gallery/:id`
pub async fn delete_gallery_item<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  if !state.store.delete_gallery_item(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("gallery item {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Posts ────────────────────────────────────────────────────────────────────

/// `GET /posts`
pub async fn list_posts<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Post>>, ApiError> {
  let posts = state.store.list_posts().await.map_err(ApiError::store)?;
  Ok(Json(posts))
}

/// `POST /posts`
pub async fn create_post<S: GymStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewPost>,
) -> Result<impl IntoResponse, ApiError> {
  check_post(&body)?;
  let post = state.store.add_post(body).await.map_err(ApiError::store)?;
  tracing::info!(id = %post.id, "post added");
  Ok((StatusCode::CREATED, Json(post)))
}

/// `PUT /posts/:id`
pub async fn update_post<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<NewPost>,
) -> Result<Json<Post>, ApiError> {
  check_post(&body)?;
  let existing = state
    .store
    .get_post(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))?;

  let post = Post::from_new(id, body, existing.created_at);
  state.store.update_post(&post).await.map_err(ApiError::store)?;
  Ok(Json(post))
}

/// `DELETE /posts/:id`
pub async fn delete_post<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  if !state.store.delete_post(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("post {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
