//! `GET /income`: the monthly income report.

use axum::{Json, extract::State};
use gym_core::{
  income::{IncomeReport, aggregate_income},
  store::GymStore,
};

use crate::{ApiState, error::ApiError, members::refresh};

/// `GET /income`
///
/// Ledgers are brought up to today before aggregating, and any that changed
/// are saved.
pub async fn report<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<IncomeReport>, ApiError> {
  let today = state.clock.today();
  let mut members = state.store.list_members().await.map_err(ApiError::store)?;
  for member in &mut members {
    if refresh(member, today) {
      state.store.save_member(member).await.map_err(ApiError::store)?;
    }
  }
  let expenses = state.store.list_expenses().await.map_err(ApiError::store)?;

  Ok(Json(aggregate_income(&members, &expenses)))
}
