//! JSON REST API for the gym backend.
//!
//! Exposes two axum [`Router`]s backed by any [`gym_core::store::GymStore`]:
//! a read-only public surface for the marketing site and an admin surface for
//! managing members, content and money. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let state = gym_api::ApiState::new(store.clone(), Arc::new(SystemClock));
//! Router::new()
//!   .nest("/api/public", gym_api::public_router(state.clone()))
//!   .nest("/api/admin", gym_api::admin_router(state).layer(auth))
//! ```

pub mod content;
pub mod error;
pub mod expenses;
pub mod income;
pub mod members;
pub mod public;
pub mod settings;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use gym_core::{clock::Clock, store::GymStore};

pub use error::ApiError;

/// Shared state for every handler: the store and the source of "today".
pub struct ApiState<S> {
  pub store: Arc<S>,
  pub clock: Arc<dyn Clock>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self { Self { store, clock } }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
      clock: Arc::clone(&self.clock),
    }
  }
}

/// Read-only routes for the public site.
pub fn public_router<S>(state: ApiState<S>) -> Router<()>
where
  S: GymStore + 'static,
{
  Router::new()
    .route("/home", get(public::home::<S>))
    .route("/featured", get(public::featured::<S>))
    .route("/gallery", get(public::gallery::<S>))
    .route("/gallery/categories", get(public::categories::<S>))
    .route("/posts", get(public::posts::<S>))
    .route("/members", get(public::members::<S>))
    .route("/members/{id}", get(public::member::<S>))
    .with_state(state)
}

/// Management routes. The returned `Router<()>` carries no auth of its own.
pub fn admin_router<S>(state: ApiState<S>) -> Router<()>
where
  S: GymStore + 'static,
{
  Router::new()
    // Members
    .route("/members", get(members::list::<S>).post(members::create::<S>))
    .route(
      "/members/{id}",
      get(members::get_one::<S>)
        .put(members::update::<S>)
        .delete(members::delete_one::<S>),
    )
    .route("/members/{id}/ledger", get(members::ledger::<S>))
    .route(
      "/members/{id}/payments/{payment_id}/paid",
      post(members::mark_paid::<S>),
    )
    .route(
      "/members/{id}/payments/{payment_id}/unpaid",
      post(members::mark_unpaid::<S>),
    )
    .route("/members/{id}/months/inactive", post(members::month_inactive::<S>))
    .route("/members/{id}/months/active", post(members::month_active::<S>))
    .route("/members/{id}/status", post(members::start_period::<S>))
    // Gallery and posts
    .route(
      "/gallery",
      get(content::list_gallery::<S>).post(content::create_gallery_item::<S>),
    )
    .route(
      "/gallery/{id}",
      put(content::update_gallery_item::<S>).delete(content::delete_gallery_item::<S>),
    )
    .route("/posts", get(content::list_posts::<S>).post(content::create_post::<S>))
    .route(
      "/posts/{id}",
      put(content::update_post::<S>).delete(content::delete_post::<S>),
    )
    // Money
    .route("/expenses", get(expenses::list::<S>).post(expenses::create::<S>))
    .route("/expenses/{id}", axum::routing::delete(expenses::delete_one::<S>))
    .route("/income", get(income::report::<S>))
    .route("/settings/fees", get(settings::get_fees::<S>).put(settings::put_fees::<S>))
    .with_state(state)
}
