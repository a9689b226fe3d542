//! Payment-ledger synthesis.
//!
//! The ledger holds exactly one [`Payment`] per calendar month from the month
//! a member joined through the current month. Whether a month is billable is
//! decided by the member's active status periods; the only state carried over
//! from a previous ledger is which months were paid, and when.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  member::{Member, MembershipStatus, Payment, PaymentStatus, StatusPeriod},
  month::{YearMonth, months_between},
};

/// Derive the ledger for `member` as of `today`.
///
/// Running this on a member whose `payments` came from a previous run with
/// the same `today` returns those payments unchanged.
pub fn synthesize_payments(member: &Member, today: NaiveDate) -> Vec<Payment> {
  let implicit;
  let history: &[StatusPeriod] = if member.status_history.is_empty() {
    // No recorded periods: the member has been active since joining.
    implicit = [StatusPeriod::open(MembershipStatus::Active, member.start_date)];
    &implicit
  } else {
    &member.status_history
  };

  let active = active_months(history, today);
  let previous: HashMap<YearMonth, &Payment> =
    member.payments.iter().map(|p| (p.month, p)).collect();

  let joined = YearMonth::containing(member.start_date);
  let current = YearMonth::containing(today);

  YearMonth::range(joined, current)
    .map(|month| {
      let prev = previous.get(&month).copied();

      let (status, payment_date) = if !active.contains(&month) {
        (PaymentStatus::Inactive, None)
      } else {
        match prev.filter(|p| p.is_paid()) {
          Some(paid) => (PaymentStatus::Paid, Some(paid.payment_date.unwrap_or(today))),
          None => (PaymentStatus::Unpaid, None),
        }
      };

      Payment {
        id: prev
          .map(|p| p.id.clone())
          .unwrap_or_else(|| Payment::default_id(member.id, month)),
        member_id: member.id,
        amount: member.monthly_fee,
        payment_date,
        month,
        status,
      }
    })
    .collect()
}

/// Every month touched by an active period. Open periods run to `today`.
pub fn active_months(history: &[StatusPeriod], today: NaiveDate) -> BTreeSet<YearMonth> {
  history
    .iter()
    .filter(|p| p.is_active())
    .flat_map(|p| months_between(p.start_date, p.end_or(today)))
    .collect()
}

/// The status of the chronologically last period if it is still open;
/// otherwise the member is inactive.
pub fn current_status(history: &[StatusPeriod]) -> MembershipStatus {
  match history.iter().max_by_key(|p| p.start_date) {
    Some(latest) if latest.is_open() => latest.status,
    _ => MembershipStatus::Inactive,
  }
}

// ─── Paid / unpaid toggles ───────────────────────────────────────────────────

/// Record `payment_id` as paid on `paid_on`.
pub fn mark_as_paid<'a>(
  payments: &'a mut [Payment],
  payment_id: &str,
  paid_on: NaiveDate,
) -> Result<&'a Payment> {
  let payment = billable_payment(payments, payment_id)?;
  payment.status = PaymentStatus::Paid;
  payment.payment_date = Some(paid_on);
  Ok(&*payment)
}

/// Clear the paid state of `payment_id`.
pub fn mark_as_unpaid<'a>(
  payments: &'a mut [Payment],
  payment_id: &str,
) -> Result<&'a Payment> {
  let payment = billable_payment(payments, payment_id)?;
  payment.status = PaymentStatus::Unpaid;
  payment.payment_date = None;
  Ok(&*payment)
}

fn billable_payment<'a>(
  payments: &'a mut [Payment],
  payment_id: &str,
) -> Result<&'a mut Payment> {
  let payment = payments
    .iter_mut()
    .find(|p| p.id == payment_id)
    .ok_or_else(|| Error::PaymentNotFound(payment_id.to_owned()))?;
  if payment.status == PaymentStatus::Inactive {
    return Err(Error::MonthNotBillable(payment.month));
  }
  Ok(payment)
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Totals over one member's ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
  pub paid_months:     usize,
  pub unpaid_months:   usize,
  pub inactive_months: usize,
  pub total_paid:      Decimal,
  pub total_unpaid:    Decimal,
  /// Paid plus unpaid; inactive months are not billable.
  pub total_billable:  Decimal,
}

impl LedgerSummary {
  pub fn from_payments(payments: &[Payment]) -> Self {
    payments.iter().fold(Self::default(), |mut acc, p| {
      match p.status {
        PaymentStatus::Paid => {
          acc.paid_months += 1;
          acc.total_paid += p.amount;
          acc.total_billable += p.amount;
        }
        PaymentStatus::Unpaid => {
          acc.unpaid_months += 1;
          acc.total_unpaid += p.amount;
          acc.total_billable += p.amount;
        }
        PaymentStatus::Inactive => acc.inactive_months += 1,
      }
      acc
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use uuid::Uuid;

  use super::*;
  use crate::{
    member::{Gender, NewMember},
    month::parse_date,
    periods::mark_month_inactive,
  };

  fn date(s: &str) -> NaiveDate { parse_date(s).unwrap() }

  fn ym(s: &str) -> YearMonth { s.parse().unwrap() }

  fn member(start: &str, fee: i64) -> Member {
    Member::join(
      Uuid::new_v4(),
      "GZ00001".into(),
      NewMember {
        full_name:        "Asha Rao".into(),
        dob:              date("1995-06-01"),
        gender:           Gender::Female,
        phone:            "+910000000000".into(),
        email:            None,
        blood_group:      "B+".into(),
        admission_fee:    Decimal::from(1000),
        monthly_fee:      Decimal::from(fee),
        start_date:       date(start),
        notes:            None,
        photo_url:        None,
        show_on_homepage: false,
      },
      Utc::now(),
    )
  }

  fn statuses(payments: &[Payment]) -> Vec<(String, PaymentStatus)> {
    payments.iter().map(|p| (p.month.to_string(), p.status)).collect()
  }

  #[test]
  fn new_member_has_one_unpaid_row_per_month() {
    let m = member("2024-01-15", 500);
    let payments = synthesize_payments(&m, date("2024-03-20"));

    assert_eq!(statuses(&payments), vec![
      ("January 2024".to_string(), PaymentStatus::Unpaid),
      ("February 2024".to_string(), PaymentStatus::Unpaid),
      ("March 2024".to_string(), PaymentStatus::Unpaid),
    ]);
    assert!(payments.iter().all(|p| p.amount == Decimal::from(500)));
    assert!(payments.iter().all(|p| p.payment_date.is_none()));
    assert!(payments.iter().all(|p| p.member_id == m.id));
  }

  #[test]
  fn covers_every_month_without_gaps_or_duplicates() {
    let m = member("2022-11-30", 500);
    let today = date("2024-02-01");
    let payments = synthesize_payments(&m, today);

    let months: Vec<_> = payments.iter().map(|p| p.month).collect();
    let expected: Vec<_> =
      YearMonth::range(ym("November 2022"), ym("February 2024")).collect();
    assert_eq!(months, expected);
    assert_eq!(months.len(), 16);
  }

  #[test]
  fn join_after_today_yields_empty_ledger() {
    let m = member("2024-05-01", 500);
    assert!(synthesize_payments(&m, date("2024-04-30")).is_empty());
  }

  #[test]
  fn empty_history_is_treated_as_active_since_joining() {
    let mut m = member("2024-01-15", 500);
    m.status_history.clear();

    let payments = synthesize_payments(&m, date("2024-02-10"));
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p.status == PaymentStatus::Unpaid));
  }

  #[test]
  fn refresh_materializes_implicit_period() {
    let mut m = member("2024-01-15", 500);
    m.status_history.clear();
    m.refresh(date("2024-02-10"));

    assert_eq!(m.status_history.len(), 1);
    assert!(m.status_history[0].is_open());
    assert_eq!(m.status_history[0].start_date, date("2024-01-15"));
    assert_eq!(m.status, MembershipStatus::Active);
  }

  #[test]
  fn synthesis_is_idempotent() {
    let mut m = member("2023-10-05", 500);
    let today = date("2024-03-20");
    m.status_history = mark_month_inactive(&m.status_history, ym("December 2023"), today)
      .expect("active period covers December");
    m.refresh(today);
    let feb = m.payment(ym("February 2024")).unwrap().id.clone();
    mark_as_paid(&mut m.payments, &feb, date("2024-02-03")).unwrap();

    let first = synthesize_payments(&m, today);
    m.payments = first.clone();
    let second = synthesize_payments(&m, today);
    assert_eq!(first, second);
  }

  #[test]
  fn paid_state_survives_recomputation() {
    let mut m = member("2024-01-15", 500);
    m.refresh(date("2024-03-20"));
    let jan = m.payment(ym("January 2024")).unwrap().id.clone();
    mark_as_paid(&mut m.payments, &jan, date("2024-01-20")).unwrap();

    // A month later the ledger grows but January stays paid.
    m.refresh(date("2024-04-02"));
    let jan = m.payment(ym("January 2024")).unwrap();
    assert_eq!(jan.status, PaymentStatus::Paid);
    assert_eq!(jan.payment_date, Some(date("2024-01-20")));
    assert_eq!(m.payments.len(), 4);
    assert_eq!(m.payment(ym("April 2024")).unwrap().status, PaymentStatus::Unpaid);
  }

  #[test]
  fn paid_record_without_date_falls_back_to_today() {
    let mut m = member("2024-01-15", 500);
    let today = date("2024-01-31");
    m.refresh(today);
    m.payments[0].status = PaymentStatus::Paid;

    let payments = synthesize_payments(&m, today);
    assert_eq!(payments[0].payment_date, Some(today));
  }

  #[test]
  fn inactive_month_overrides_paid_state() {
    let mut m = member("2024-01-15", 500);
    m.refresh(date("2024-03-20"));
    let feb = m.payment(ym("February 2024")).unwrap().id.clone();
    mark_as_paid(&mut m.payments, &feb, date("2024-02-05")).unwrap();

    m.status_history =
      mark_month_inactive(&m.status_history, ym("February 2024"), date("2024-03-20")).unwrap();
    m.refresh(date("2024-03-20"));

    let feb = m.payment(ym("February 2024")).unwrap();
    assert_eq!(feb.status, PaymentStatus::Inactive);
    assert_eq!(feb.payment_date, None);
    assert_eq!(feb.amount, Decimal::from(500));
  }

  #[test]
  fn existing_ids_are_kept_and_new_ids_are_deterministic() {
    let mut m = member("2024-01-15", 500);
    m.refresh(date("2024-01-20"));
    m.payments[0].id = "legacy-1".into();
    m.refresh(date("2024-02-20"));

    assert_eq!(m.payments[0].id, "legacy-1");
    assert_eq!(m.payments[1].id, format!("p{}-February-2024", m.id));
  }

  #[test]
  fn fee_change_applies_to_all_months() {
    let mut m = member("2024-01-15", 500);
    m.refresh(date("2024-02-20"));
    m.monthly_fee = Decimal::from(650);
    m.refresh(date("2024-02-20"));
    assert!(m.payments.iter().all(|p| p.amount == Decimal::from(650)));
  }

  #[test]
  fn current_status_follows_latest_period() {
    let open = StatusPeriod::open(MembershipStatus::Active, date("2024-03-01"));
    let mut closed = StatusPeriod::for_month(MembershipStatus::Inactive, ym("February 2024"));
    assert_eq!(current_status(&[closed.clone(), open.clone()]), MembershipStatus::Active);

    closed.start_date = date("2024-04-01");
    closed.end_date = Some(date("2024-04-30"));
    assert_eq!(current_status(&[open, closed]), MembershipStatus::Inactive);

    let paused = StatusPeriod::open(MembershipStatus::Inactive, date("2024-05-01"));
    assert_eq!(current_status(&[paused]), MembershipStatus::Inactive);
    assert_eq!(current_status(&[]), MembershipStatus::Inactive);
  }

  #[test]
  fn mark_as_paid_and_unpaid() {
    let mut m = member("2024-01-15", 500);
    m.refresh(date("2024-02-20"));
    let id = m.payments[1].id.clone();

    let paid = mark_as_paid(&mut m.payments, &id, date("2024-02-21")).unwrap();
    assert_eq!(paid.status, PaymentStatus::Paid);
    assert_eq!(paid.payment_date, Some(date("2024-02-21")));

    let unpaid = mark_as_unpaid(&mut m.payments, &id).unwrap();
    assert_eq!(unpaid.status, PaymentStatus::Unpaid);
    assert_eq!(unpaid.payment_date, None);
  }

  #[test]
  fn toggles_reject_unknown_and_inactive_months() {
    let mut m = member("2024-01-15", 500);
    m.status_history =
      mark_month_inactive(&m.status_history, ym("February 2024"), date("2024-03-20")).unwrap();
    m.refresh(date("2024-03-20"));
    let feb = m.payment(ym("February 2024")).unwrap().id.clone();

    assert!(matches!(
      mark_as_paid(&mut m.payments, "nope", date("2024-03-01")),
      Err(Error::PaymentNotFound(_))
    ));
    assert!(matches!(
      mark_as_paid(&mut m.payments, &feb, date("2024-03-01")),
      Err(Error::MonthNotBillable(month)) if month == ym("February 2024")
    ));
    assert!(matches!(
      mark_as_unpaid(&mut m.payments, &feb),
      Err(Error::MonthNotBillable(_))
    ));
  }

  #[test]
  fn summary_totals() {
    let mut m = member("2024-01-15", 500);
    m.status_history =
      mark_month_inactive(&m.status_history, ym("February 2024"), date("2024-03-20")).unwrap();
    m.refresh(date("2024-04-20"));
    let jan = m.payment(ym("January 2024")).unwrap().id.clone();
    mark_as_paid(&mut m.payments, &jan, date("2024-01-16")).unwrap();

    let summary = LedgerSummary::from_payments(&m.payments);
    assert_eq!(summary.paid_months, 1);
    assert_eq!(summary.unpaid_months, 2);
    assert_eq!(summary.inactive_months, 1);
    assert_eq!(summary.total_paid, Decimal::from(500));
    assert_eq!(summary.total_unpaid, Decimal::from(1000));
    assert_eq!(summary.total_billable, Decimal::from(1500));
  }
}
