//! Members, their status periods, and their payment records.
//!
//! A member document owns its status history. The payment ledger is a derived
//! view, recomputed by [`Member::refresh`] on every read or update; only the
//! paid/unpaid state of individual months carries over between recomputations.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ledger, month::YearMonth};

// ─── Status ──────────────────────────────────────────────────────────────────

/// Whether a member is billed for a span of time.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MembershipStatus {
  #[default]
  Active,
  Inactive,
}

/// A contiguous date range with a single [`MembershipStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPeriod {
  pub id:         String,
  pub status:     MembershipStatus,
  pub start_date: NaiveDate,
  /// `None` means the period is still running.
  pub end_date:   Option<NaiveDate>,
}

impl StatusPeriod {
  /// A new open-ended period starting on `start_date`.
  pub fn open(status: MembershipStatus, start_date: NaiveDate) -> Self {
    Self {
      id: new_period_id(),
      status,
      start_date,
      end_date: None,
    }
  }

  /// A closed period spanning exactly `month`.
  pub fn for_month(status: MembershipStatus, month: YearMonth) -> Self {
    Self {
      id:         new_period_id(),
      status,
      start_date: month.first_day(),
      end_date:   Some(month.last_day()),
    }
  }

  pub fn is_open(&self) -> bool { self.end_date.is_none() }

  pub fn is_active(&self) -> bool { self.status == MembershipStatus::Active }

  /// The end date, substituting `today` for an open period.
  pub fn end_or(&self, today: NaiveDate) -> NaiveDate {
    self.end_date.unwrap_or(today)
  }

  /// Whether the period exactly spans `month`.
  pub fn spans_exactly(&self, month: YearMonth) -> bool {
    self.start_date == month.first_day() && self.end_date == Some(month.last_day())
  }
}

pub(crate) fn new_period_id() -> String { format!("status-{}", Uuid::new_v4()) }

// ─── Payments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
  Paid,
  Unpaid,
  /// No fee is due; the member was inactive for the month.
  Inactive,
}

/// One month's billing record for a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
  pub id:           String,
  pub member_id:    Uuid,
  /// The monthly fee. Kept on inactive months for display only.
  pub amount:       Decimal,
  /// Set iff `status` is [`PaymentStatus::Paid`].
  pub payment_date: Option<NaiveDate>,
  pub month:        YearMonth,
  pub status:       PaymentStatus,
}

impl Payment {
  /// The identifier a freshly synthesized record for `month` receives.
  pub fn default_id(member_id: Uuid, month: YearMonth) -> String {
    format!("p{member_id}-{}", month.slug())
  }

  pub fn is_paid(&self) -> bool { self.status == PaymentStatus::Paid }
}

// ─── Member ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
  Male,
  Female,
  Other,
}

/// A gym member document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
  pub id:               Uuid,
  /// Short human-facing code, e.g. `GZ04217`. Unique per store.
  pub member_code:      String,
  pub full_name:        String,
  pub dob:              NaiveDate,
  pub gender:           Gender,
  pub phone:            String,
  pub email:            Option<String>,
  pub blood_group:      String,
  pub admission_fee:    Decimal,
  pub monthly_fee:      Decimal,
  /// The very first join date.
  pub start_date:       NaiveDate,
  pub notes:            Option<String>,
  pub photo_url:        Option<String>,
  /// Derived from `status_history`; see [`ledger::current_status`].
  pub status:           MembershipStatus,
  pub status_history:   Vec<StatusPeriod>,
  /// Derived; see [`ledger::synthesize_payments`].
  #[serde(default)]
  pub payments:         Vec<Payment>,
  #[serde(default)]
  pub show_on_homepage: bool,
  pub created_at:       DateTime<Utc>,
}

impl Member {
  /// Build the document for a member who has just joined: one open active
  /// period from `start_date` and an empty ledger.
  pub fn join(
    id: Uuid,
    member_code: String,
    input: NewMember,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id,
      member_code,
      full_name: input.full_name,
      dob: input.dob,
      gender: input.gender,
      phone: input.phone,
      email: input.email,
      blood_group: input.blood_group,
      admission_fee: input.admission_fee,
      monthly_fee: input.monthly_fee,
      start_date: input.start_date,
      notes: input.notes,
      photo_url: input.photo_url,
      status: MembershipStatus::Active,
      status_history: vec![StatusPeriod::open(
        MembershipStatus::Active,
        input.start_date,
      )],
      payments: Vec::new(),
      show_on_homepage: input.show_on_homepage,
      created_at,
    }
  }

  /// Recompute the payment ledger and current status as of `today`.
  ///
  /// A member with no recorded periods is given the implicit open active
  /// period from `start_date`, and that period is kept in the history.
  pub fn refresh(&mut self, today: NaiveDate) {
    if self.status_history.is_empty() {
      self.status_history =
        vec![StatusPeriod::open(MembershipStatus::Active, self.start_date)];
    }
    self.payments = ledger::synthesize_payments(self, today);
    self.status = ledger::current_status(&self.status_history);
  }

  pub fn payment(&self, month: YearMonth) -> Option<&Payment> {
    self.payments.iter().find(|p| p.month == month)
  }
}

/// Input to [`crate::store::GymStore::add_member`]. The store assigns the id
/// and member code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
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
  pub show_on_homepage: bool,
}

// ─── Public directory ────────────────────────────────────────────────────────

/// What the public site shows about a member: no fees, ledger or contact
/// details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
  pub id:          Uuid,
  pub member_code: String,
  pub full_name:   String,
  pub photo_url:   Option<String>,
  pub status:      MembershipStatus,
  pub start_date:  NaiveDate,
}

impl From<&Member> for MemberProfile {
  fn from(m: &Member) -> Self {
    Self {
      id:          m.id,
      member_code: m.member_code.clone(),
      full_name:   m.full_name.clone(),
      photo_url:   m.photo_url.clone(),
      status:      m.status,
      start_date:  m.start_date,
    }
  }
}
