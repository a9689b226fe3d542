//! Async HTTP client wrapping the gym admin JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use gym_core::{
  income::{FeeSettings, IncomeReport},
  ledger::LedgerSummary,
  member::{Member, MembershipStatus, Payment},
  month::YearMonth,
};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// Connection settings for the gym API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// `GET /members/:id/ledger` response.
#[derive(Debug, Deserialize)]
pub struct Ledger {
  pub member_id: Uuid,
  pub status:    MembershipStatus,
  pub payments:  Vec<Payment>,
  pub summary:   LedgerSummary,
}

/// Async HTTP client for the admin half of the gym JSON API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api/admin{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Send `req`, turning a non-2xx status into an error carrying the
  /// server's `{"error": ...}` message when there is one.
  async fn send(&self, req: reqwest::RequestBuilder, what: &str) -> Result<Response> {
    let resp = self
      .auth(req)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let message = resp
      .json::<serde_json::Value>()
      .await
      .ok()
      .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned));
    match message {
      Some(message) => Err(anyhow!("{what} → {status}: {message}")),
      None => Err(anyhow!("{what} → {status}")),
    }
  }

  // ── Members ───────────────────────────────────────────────────────────────

  /// `GET /api/admin/members`
  pub async fn list_members(&self) -> Result<Vec<Member>> {
    let resp = self
      .send(self.client.get(self.url("/members")), "GET /members")
      .await?;
    resp.json().await.context("deserialising members")
  }

  /// `GET /api/admin/members/:id/ledger`
  pub async fn ledger(&self, id: Uuid) -> Result<Ledger> {
    let path = format!("/members/{id}/ledger");
    let resp = self
      .send(self.client.get(self.url(&path)), &format!("GET {path}"))
      .await?;
    resp.json().await.context("deserialising ledger")
  }

  /// `POST /api/admin/members/:id/payments/:payment_id/paid`
  pub async fn mark_paid(
    &self,
    id: Uuid,
    payment_id: &str,
    paid_on: Option<NaiveDate>,
  ) -> Result<Member> {
    let path = format!("/members/{id}/payments/{payment_id}/paid");
    let req = self
      .client
      .post(self.url(&path))
      .json(&json!({ "paid_on": paid_on }));
    let resp = self.send(req, &format!("POST {path}")).await?;
    resp.json().await.context("deserialising member")
  }

  /// `POST /api/admin/members/:id/payments/:payment_id/unpaid`
  pub async fn mark_unpaid(&self, id: Uuid, payment_id: &str) -> Result<Member> {
    let path = format!("/members/{id}/payments/{payment_id}/unpaid");
    let resp = self
      .send(self.client.post(self.url(&path)), &format!("POST {path}"))
      .await?;
    resp.json().await.context("deserialising member")
  }

  /// `POST /api/admin/members/:id/months/{inactive,active}`
  pub async fn set_month(&self, id: Uuid, month: YearMonth, active: bool) -> Result<Member> {
    let which = if active { "active" } else { "inactive" };
    let path = format!("/members/{id}/months/{which}");
    let req = self
      .client
      .post(self.url(&path))
      .json(&json!({ "month": month }));
    let resp = self.send(req, &format!("POST {path}")).await?;
    resp.json().await.context("deserialising member")
  }

  // ── Money ─────────────────────────────────────────────────────────────────

  /// `GET /api/admin/income`
  pub async fn income(&self) -> Result<IncomeReport> {
    let resp = self
      .send(self.client.get(self.url("/income")), "GET /income")
      .await?;
    resp.json().await.context("deserialising income report")
  }

  /// `GET /api/admin/settings/fees`
  pub async fn fees(&self) -> Result<FeeSettings> {
    let resp = self
      .send(self.client.get(self.url("/settings/fees")), "GET /settings/fees")
      .await?;
    resp.json().await.context("deserialising fee settings")
  }

  /// `PUT /api/admin/settings/fees`
  pub async fn set_fees(&self, fees: FeeSettings) -> Result<FeeSettings> {
    let req = self.client.put(self.url("/settings/fees")).json(&fees);
    let resp = self.send(req, "PUT /settings/fees").await?;
    resp.json().await.context("deserialising fee settings")
  }
}
