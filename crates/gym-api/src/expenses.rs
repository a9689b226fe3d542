//! Handlers for `/expenses` admin endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/expenses` | Most recent first |
//! | `POST`   | `/expenses` | Body: `{"description":"Rent","amount":12000,"date":"2024-02-01"}` |
//! | `DELETE` | `/expenses/:id` | 204, or 404 |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use gym_core::{
  income::{Expense, NewExpense},
  store::GymStore,
};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

/// `GET /expenses`
pub async fn list<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Expense>>, ApiError> {
  let expenses = state.store.list_expenses().await.map_err(ApiError::store)?;
  Ok(Json(expenses))
}

/// `POST /expenses`
pub async fn create<S: GymStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewExpense>,
) -> Result<impl IntoResponse, ApiError> {
  if body.description.trim().is_empty() {
    return Err(ApiError::BadRequest("description must not be empty".into()));
  }
  if body.amount.is_sign_negative() || body.amount.is_zero() {
    return Err(ApiError::BadRequest("amount must be positive".into()));
  }

  let expense = state.store.add_expense(body).await.map_err(ApiError::store)?;
  tracing::info!(id = %expense.id, amount = %expense.amount, date = %expense.date, "expense recorded");
  Ok((StatusCode::CREATED, Json(expense)))
}

/// `DELETE /expenses/:id`
pub async fn delete_one<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  if !state.store.delete_expense(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("expense {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
