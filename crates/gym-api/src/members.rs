//! Handlers for `/members` admin endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/members` | Every member, ledgers refreshed |
//! | `POST`   | `/members` | Body: [`CreateMemberBody`]; returns 201 |
//! | `GET`    | `/members/:id` | 404 if not found |
//! | `PUT`    | `/members/:id` | Body: [`UpdateMemberBody`] |
//! | `DELETE` | `/members/:id` | 204, or 404 |
//! | `GET`    | `/members/:id/ledger` | Payments plus [`LedgerSummary`] |
//! | `POST`   | `/members/:id/payments/:payment_id/paid` | Body: `{"paid_on":"2024-02-03"}` (optional field) |
//! | `POST`   | `/members/:id/payments/:payment_id/unpaid` | |
//! | `POST`   | `/members/:id/months/inactive` | Body: `{"month":"February 2024"}` |
//! | `POST`   | `/members/:id/months/active` | Body: `{"month":"February 2024"}` |
//! | `POST`   | `/members/:id/status` | Body: `{"status":"inactive","start_date":"2024-05-01"}` |
//!
//! Every read and write recomputes the member's ledger as of today and
//! persists the result.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use gym_core::{
  ledger::{self, LedgerSummary},
  member::{Gender, Member, MembershipStatus, NewMember, Payment, StatusPeriod},
  month::{YearMonth, parse_date},
  periods,
  store::GymStore,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiState, error::ApiError};

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// Recompute the derived fields of `member`; returns whether any changed.
pub(crate) fn refresh(member: &mut Member, today: NaiveDate) -> bool {
  let payments = member.payments.clone();
  let status = member.status;
  let period_count = member.status_history.len();
  member.refresh(today);
  member.payments != payments
    || member.status != status
    || member.status_history.len() != period_count
}

/// Load a member, refresh its ledger, and persist the refreshed document.
async fn load<S: GymStore>(state: &ApiState<S>, id: Uuid) -> Result<Member, ApiError> {
  let mut member = state
    .store
    .get_member(id)
    .await
    .map_err(ApiError::store)?
    .ok_or(gym_core::Error::MemberNotFound(id))?;

  if refresh(&mut member, state.clock.today()) {
    state.store.save_member(&member).await.map_err(ApiError::store)?;
  }
  Ok(member)
}

/// Refresh and persist a member after an edit.
async fn store_edit<S: GymStore>(
  state: &ApiState<S>,
  mut member: Member,
) -> Result<Json<Member>, ApiError> {
  member.refresh(state.clock.today());
  state.store.save_member(&member).await.map_err(ApiError::store)?;
  Ok(Json(member))
}

fn require_nonempty(field: &str, value: &str) -> Result<(), ApiError> {
  if value.trim().is_empty() {
    return Err(ApiError::BadRequest(format!("{field} must not be empty")));
  }
  Ok(())
}

fn require_non_negative(field: &str, value: Decimal) -> Result<(), ApiError> {
  if value.is_sign_negative() {
    return Err(ApiError::BadRequest(format!("{field} must not be negative")));
  }
  Ok(())
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /members`
pub async fn list<S: GymStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Member>>, ApiError> {
  let today = state.clock.today();
  let mut members = state.store.list_members().await.map_err(ApiError::store)?;
  for member in &mut members {
    if refresh(member, today) {
      state.store.save_member(member).await.map_err(ApiError::store)?;
    }
  }
  Ok(Json(members))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /members`. Omitted fees fall back to the saved
/// fee settings.
#[derive(Debug, Deserialize)]
pub struct CreateMemberBody {
  pub full_name:        String,
  pub dob:              NaiveDate,
  pub gender:           Gender,
  pub phone:            String,
  pub email:            Option<String>,
  pub blood_group:      String,
  pub admission_fee:    Option<Decimal>,
  pub monthly_fee:      Option<Decimal>,
  pub start_date:       NaiveDate,
  pub notes:            Option<String>,
  pub photo_url:        Option<String>,
  #[serde(default)]
  pub show_on_homepage: bool,
}

/// `POST /members`. Returns 201 + the stored member with its first ledger.
pub async fn create<S: GymStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateMemberBody>,
) -> Result<impl IntoResponse, ApiError> {
  require_nonempty("full_name", &body.full_name)?;
  require_nonempty("phone", &body.phone)?;

  let fees = state.store.get_fee_settings().await.map_err(ApiError::store)?;
  let input = NewMember {
    full_name:        body.full_name,
    dob:              body.dob,
    gender:           body.gender,
    phone:            body.phone,
    email:            body.email,
    blood_group:      body.blood_group,
    admission_fee:    body.admission_fee.unwrap_or(fees.admission_fee),
    monthly_fee:      body.monthly_fee.unwrap_or(fees.monthly_fee),
    start_date:       body.start_date,
    notes:            body.notes,
    photo_url:        body.photo_url,
    show_on_homepage: body.show_on_homepage,
  };
  require_non_negative("admission_fee", input.admission_fee)?;
  require_non_negative("monthly_fee", input.monthly_fee)?;

  let member = state.store.add_member(input).await.map_err(ApiError::store)?;
  tracing::info!(id = %member.id, code = %member.member_code, "member created");
  let Json(member) = store_edit(&state, member).await?;
  Ok((StatusCode::CREATED, Json(member)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /members/:id`
pub async fn get_one<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Member>, ApiError> {
  Ok(Json(load(&state, id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /members/:id`. Replaces the profile; the status
/// history is replaced only when given.
#[derive(Debug, Deserialize)]
pub struct UpdateMemberBody {
  pub full_name:        String,
  pub dob:              NaiveDate,
  pub gender:           Gender,
  pub phone:            String,
  pub email:            Option<String>,
  pub blood_group:      String,
  pub admission_fee:    Decimal,
  pub monthly_fee:      Decimal,
  pub start_date:       NaiveDate,
  pub notes:            Option<String>,
  pub photo_url:        Option<String>,
  #[serde(default)]
  pub show_on_homepage: bool,
  pub status_history:   Option<Vec<StatusPeriod>>,
}

/// `PUT /members/:id`
pub async fn update<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateMemberBody>,
) -> Result<Json<Member>, ApiError> {
  require_nonempty("full_name", &body.full_name)?;
  require_nonempty("phone", &body.phone)?;
  require_non_negative("admission_fee", body.admission_fee)?;
  require_non_negative("monthly_fee", body.monthly_fee)?;
  if let Some(history) = &body.status_history {
    periods::validate_history(history)?;
  }

  let mut member = load(&state, id).await?;
  member.full_name = body.full_name;
  member.dob = body.dob;
  member.gender = body.gender;
  member.phone = body.phone;
  member.email = body.email;
  member.blood_group = body.blood_group;
  member.admission_fee = body.admission_fee;
  member.monthly_fee = body.monthly_fee;
  member.start_date = body.start_date;
  member.notes = body.notes;
  member.photo_url = body.photo_url;
  member.show_on_homepage = body.show_on_homepage;
  if let Some(history) = body.status_history {
    member.status_history = history;
  }

  tracing::info!(%id, "member updated");
  store_edit(&state, member).await
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /members/:id`
pub async fn delete_one<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  if !state.store.delete_member(id).await.map_err(ApiError::store)? {
    return Err(gym_core::Error::MemberNotFound(id).into());
  }
  tracing::info!(%id, "member deleted");
  Ok(StatusCode::NO_CONTENT)
}

// ─── Ledger ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct LedgerView {
  pub member_id: Uuid,
  pub status:    MembershipStatus,
  pub payments:  Vec<Payment>,
  pub summary:   LedgerSummary,
}

/// `GET /members/:id/ledger`
pub async fn ledger<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<LedgerView>, ApiError> {
  let member = load(&state, id).await?;
  Ok(Json(LedgerView {
    member_id: member.id,
    status:    member.status,
    summary:   LedgerSummary::from_payments(&member.payments),
    payments:  member.payments,
  }))
}

#[derive(Debug, Default, Deserialize)]
pub struct MarkPaidBody {
  /// Defaults to today.
  pub paid_on: Option<NaiveDate>,
}

/// `POST /members/:id/payments/:payment_id/paid`
pub async fn mark_paid<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path((id, payment_id)): Path<(Uuid, String)>,
  Json(body): Json<MarkPaidBody>,
) -> Result<Json<Member>, ApiError> {
  let mut member = load(&state, id).await?;
  let paid_on = body.paid_on.unwrap_or_else(|| state.clock.today());
  ledger::mark_as_paid(&mut member.payments, &payment_id, paid_on)?;
  tracing::info!(%id, %payment_id, %paid_on, "payment marked paid");
  store_edit(&state, member).await
}

/// `POST /members/:id/payments/:payment_id/unpaid`
pub async fn mark_unpaid<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path((id, payment_id)): Path<(Uuid, String)>,
) -> Result<Json<Member>, ApiError> {
  let mut member = load(&state, id).await?;
  ledger::mark_as_unpaid(&mut member.payments, &payment_id)?;
  tracing::info!(%id, %payment_id, "payment marked unpaid");
  store_edit(&state, member).await
}

// ─── Status periods ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MonthBody {
  /// A month label such as `"February 2024"`.
  pub month: String,
}

/// `POST /members/:id/months/inactive`
///
/// A month that no active period covers, including any month after today, is
/// left alone; the unchanged member is returned.
pub async fn month_inactive<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<MonthBody>,
) -> Result<Json<Member>, ApiError> {
  let month: YearMonth = body.month.parse()?;
  let mut member = load(&state, id).await?;

  match periods::mark_month_inactive(&member.status_history, month, state.clock.today()) {
    Some(history) => {
      member.status_history = history;
      tracing::info!(%id, %month, "month marked inactive");
      store_edit(&state, member).await
    }
    None => {
      tracing::debug!(%id, %month, "no active period covers month");
      Ok(Json(member))
    }
  }
}

/// `POST /members/:id/months/active`
pub async fn month_active<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<MonthBody>,
) -> Result<Json<Member>, ApiError> {
  let month: YearMonth = body.month.parse()?;
  let mut member = load(&state, id).await?;
  member.status_history = periods::mark_month_active(&member.status_history, month);
  tracing::info!(%id, %month, "month marked active");
  store_edit(&state, member).await
}

#[derive(Debug, Deserialize)]
pub struct StartPeriodBody {
  pub status:     MembershipStatus,
  /// `YYYY-MM-DD`.
  pub start_date: String,
}

/// `POST /members/:id/status`: start a new open-ended period.
pub async fn start_period<S: GymStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<StartPeriodBody>,
) -> Result<Json<Member>, ApiError> {
  let start_date = parse_date(&body.start_date)?;
  let mut member = load(&state, id).await?;
  let history = periods::add_status_period(&member.status_history, body.status, start_date);
  periods::validate_history(&history)?;
  member.status_history = history;
  tracing::info!(%id, status = ?body.status, %start_date, "status period started");
  store_edit(&state, member).await
}
