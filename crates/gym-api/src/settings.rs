//! `GET`/`PUT /settings/fees`: default fees for new members.

use axum::{Json, extract::State};
use gym_core::{income::FeeSettings, store::GymStore};

use crate::{ApiState, error::ApiError};

/// `GET /settings/fees`
pub async fn get_fees<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<FeeSettings>, ApiError> {
  let fees = state.store.get_fee_settings().await.map_err(ApiError::store)?;
  Ok(Json(fees))
}

/// `PUT /settings/fees`, body: `{"admission_fee":1000,"monthly_fee":500}`
pub async fn put_fees<S: GymStore>(
  State(state): State<ApiState<S>>,
  Json(fees): Json<FeeSettings>,
) -> Result<Json<FeeSettings>, ApiError> {
  if fees.admission_fee.is_sign_negative() || fees.monthly_fee.is_sign_negative() {
    return Err(ApiError::BadRequest("fees must not be negative".into()));
  }
  state.store.save_fee_settings(fees).await.map_err(ApiError::store)?;
  Ok(Json(fees))
}
