//! HTTP server for the gym backend.
//!
//! Mounts the [`gym_api`] routers under `/api/public` and `/api/admin`, puts
//! Basic auth in front of the admin half, and traces every request.

pub mod auth;
pub mod error;
pub mod seed;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use gym_api::ApiState;
use gym_core::{clock::Clock, store::GymStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and `GYM_*`
/// environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs.
pub struct AppState<S> {
  pub store: Arc<S>,
  pub clock: Arc<dyn Clock>,
  pub auth:  Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      clock: Arc::clone(&self.clock),
      auth:  Arc::clone(&self.auth),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full axum [`Router`] for the server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: GymStore + 'static,
{
  let api = ApiState::new(state.store, state.clock);

  let admin = gym_api::admin_router(api.clone())
    .layer(middleware::from_fn_with_state(state.auth, require_auth));

  Router::new()
    .nest("/api/public", gym_api::public_router(api))
    .nest("/api/admin", admin)
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use base64::Engine as _;
  use base64::engine::general_purpose::STANDARD as B64;
  use chrono::NaiveDate;
  use gym_core::clock::FixedClock;
  use gym_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let salt  = SaltString::generate(&mut OsRng);
    let hash  = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      store: Arc::new(store),
      clock: Arc::new(FixedClock(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap())),
      auth:  Arc::new(AuthConfig {
        username:      "admin".to_string(),
        password_hash: hash,
      }),
    }
  }

  fn auth_header(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(header::HeaderName, String)>,
    body:    Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = match body {
      Some(body) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    router(state).oneshot(req).await.unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn public_routes_need_no_credentials() {
    let state = make_state("secret").await;
    let resp = oneshot_raw(state, "GET", "/api/public/gallery/categories", vec![], None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await, json!(["All"]));
  }

  #[tokio::test]
  async fn admin_without_credentials_is_401() {
    let state = make_state("secret").await;
    let resp = oneshot_raw(state, "GET", "/api/admin/members", vec![], None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
  }

  #[tokio::test]
  async fn admin_with_wrong_password_is_401() {
    let state = make_state("secret").await;
    let resp = oneshot_raw(
      state,
      "GET",
      "/api/admin/members",
      vec![(header::AUTHORIZATION, auth_header("admin", "nope"))],
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn admin_create_then_public_profile() {
    let state = make_state("secret").await;
    let creds = || vec![(header::AUTHORIZATION, auth_header("admin", "secret"))];

    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/api/admin/members",
      creds(),
      Some(json!({
        "full_name": "Rafi",
        "dob": "1996-08-30",
        "gender": "Male",
        "phone": "01811111111",
        "blood_group": "B+",
        "start_date": "2024-01-15",
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let member = json_body(resp).await;
    assert_eq!(member["monthly_fee"].as_f64(), Some(500.0));
    assert_eq!(member["payments"].as_array().unwrap().len(), 3);

    let uri = format!("/api/public/members/{}", member["id"].as_str().unwrap());
    let resp = oneshot_raw(state, "GET", &uri, vec![], None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["member_code"], member["member_code"]);
  }

  #[tokio::test]
  async fn unknown_route_is_404() {
    let state = make_state("secret").await;
    let resp = oneshot_raw(state, "GET", "/api/nowhere", vec![], None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
