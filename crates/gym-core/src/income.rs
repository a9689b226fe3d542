//! Expenses, fee settings, and the monthly income report.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{member::Member, month::YearMonth};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
  pub id:          Uuid,
  pub description: String,
  pub amount:      Decimal,
  pub date:        NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
  pub description: String,
  pub amount:      Decimal,
  pub date:        NaiveDate,
}

/// Default fees applied to new members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSettings {
  pub admission_fee: Decimal,
  pub monthly_fee:   Decimal,
}

impl Default for FeeSettings {
  fn default() -> Self {
    Self {
      admission_fee: Decimal::from(1000),
      monthly_fee:   Decimal::from(500),
    }
  }
}

// ─── Report ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLine {
  pub member_id:    Uuid,
  pub member_name:  String,
  pub amount:       Decimal,
  pub payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionLine {
  pub member_id:     Uuid,
  pub member_name:   String,
  pub admission_fee: Decimal,
  pub start_date:    NaiveDate,
}

/// Income and expenses attributed to one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyIncome {
  pub month:        YearMonth,
  pub payments:     Decimal,
  pub admissions:   Decimal,
  pub expenses:     Decimal,
  pub gross_income: Decimal,
  pub net_income:   Decimal,
  pub payment_details:   Vec<PaymentLine>,
  pub admission_details: Vec<AdmissionLine>,
  pub expense_details:   Vec<Expense>,
}

impl MonthlyIncome {
  fn empty(month: YearMonth) -> Self {
    Self {
      month,
      payments: Decimal::ZERO,
      admissions: Decimal::ZERO,
      expenses: Decimal::ZERO,
      gross_income: Decimal::ZERO,
      net_income: Decimal::ZERO,
      payment_details: Vec::new(),
      admission_details: Vec::new(),
      expense_details: Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeTotals {
  pub payments:     Decimal,
  pub admissions:   Decimal,
  pub expenses:     Decimal,
  pub gross_income: Decimal,
  pub net_income:   Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeReport {
  /// Only months with some activity, oldest first.
  pub months: Vec<MonthlyIncome>,
  pub totals: IncomeTotals,
}

/// Group paid fees, admission fees and expenses by month.
///
/// Payments count toward the month they pay for; admissions toward the month
/// the member joined; expenses toward the month they are dated in. Unpaid and
/// inactive months contribute nothing.
pub fn aggregate_income(members: &[Member], expenses: &[Expense]) -> IncomeReport {
  let mut by_month: BTreeMap<YearMonth, MonthlyIncome> = BTreeMap::new();

  for member in members {
    let joined = entry(&mut by_month, YearMonth::containing(member.start_date));
    joined.admissions += member.admission_fee;
    joined.admission_details.push(AdmissionLine {
      member_id:     member.id,
      member_name:   member.full_name.clone(),
      admission_fee: member.admission_fee,
      start_date:    member.start_date,
    });

    for payment in member.payments.iter().filter(|p| p.is_paid()) {
      let month = entry(&mut by_month, payment.month);
      month.payments += payment.amount;
      month.payment_details.push(PaymentLine {
        member_id:    member.id,
        member_name:  member.full_name.clone(),
        amount:       payment.amount,
        payment_date: payment.payment_date,
      });
    }
  }

  for expense in expenses {
    let month = entry(&mut by_month, YearMonth::containing(expense.date));
    month.expenses += expense.amount;
    month.expense_details.push(expense.clone());
  }

  let mut totals = IncomeTotals::default();
  let months = by_month
    .into_values()
    .map(|mut m| {
      m.gross_income = m.payments + m.admissions;
      m.net_income = m.gross_income - m.expenses;

      totals.payments += m.payments;
      totals.admissions += m.admissions;
      totals.expenses += m.expenses;
      totals.gross_income += m.gross_income;
      totals.net_income += m.net_income;
      m
    })
    .collect();

  IncomeReport { months, totals }
}

fn entry(
  by_month: &mut BTreeMap<YearMonth, MonthlyIncome>,
  month: YearMonth,
) -> &mut MonthlyIncome {
  by_month.entry(month).or_insert_with(|| MonthlyIncome::empty(month))
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::{
    ledger::mark_as_paid,
    member::{Gender, NewMember},
    month::parse_date,
  };

  fn date(s: &str) -> NaiveDate { parse_date(s).unwrap() }

  fn ym(s: &str) -> YearMonth { s.parse().unwrap() }

  fn member(name: &str, start: &str, admission: i64, today: &str) -> Member {
    let mut m = Member::join(
      Uuid::new_v4(),
      "GZ00001".into(),
      NewMember {
        full_name:        name.into(),
        dob:              date("1990-01-01"),
        gender:           Gender::Male,
        phone:            "+910000000000".into(),
        email:            None,
        blood_group:      "O+".into(),
        admission_fee:    Decimal::from(admission),
        monthly_fee:      Decimal::from(500),
        start_date:       date(start),
        notes:            None,
        photo_url:        None,
        show_on_homepage: false,
      },
      Utc::now(),
    );
    m.refresh(date(today));
    m
  }

  fn pay(m: &mut Member, month: &str, on: &str) {
    let id = m.payment(ym(month)).unwrap().id.clone();
    mark_as_paid(&mut m.payments, &id, date(on)).unwrap();
  }

  fn expense(amount: i64, on: &str) -> Expense {
    Expense {
      id:          Uuid::new_v4(),
      description: "Treadmill belt".into(),
      amount:      Decimal::from(amount),
      date:        date(on),
    }
  }

  #[test]
  fn monthly_net_income() {
    let mut a = member("Ravi", "2024-01-15", 1000, "2024-03-20");
    let mut b = member("Meera", "2024-02-03", 800, "2024-03-20");
    pay(&mut a, "January 2024", "2024-01-15");
    pay(&mut a, "February 2024", "2024-02-14");
    pay(&mut b, "February 2024", "2024-02-03");

    let expenses = vec![expense(300, "2024-02-10"), expense(200, "2024-02-28")];
    let report = aggregate_income(&[a, b], &expenses);

    let months: Vec<_> = report.months.iter().map(|m| m.month).collect();
    assert_eq!(months, vec![ym("January 2024"), ym("February 2024")]);

    let feb = &report.months[1];
    assert_eq!(feb.payments, Decimal::from(1000));
    assert_eq!(feb.admissions, Decimal::from(800));
    assert_eq!(feb.expenses, Decimal::from(500));
    assert_eq!(feb.gross_income, Decimal::from(1800));
    assert_eq!(feb.net_income, Decimal::from(1300));
    assert_eq!(feb.payment_details.len(), 2);
    assert_eq!(feb.admission_details.len(), 1);
    assert_eq!(feb.admission_details[0].member_name, "Meera");
    assert_eq!(feb.expense_details.len(), 2);

    let jan = &report.months[0];
    assert_eq!(jan.net_income, Decimal::from(1500));
  }

  #[test]
  fn totals_sum_all_months() {
    let mut a = member("Ravi", "2024-01-15", 1000, "2024-03-20");
    pay(&mut a, "March 2024", "2024-03-02");
    let report = aggregate_income(&[a], &[expense(250, "2024-04-01")]);

    assert_eq!(report.months.len(), 3);
    assert_eq!(report.totals.payments, Decimal::from(500));
    assert_eq!(report.totals.admissions, Decimal::from(1000));
    assert_eq!(report.totals.expenses, Decimal::from(250));
    assert_eq!(report.totals.gross_income, Decimal::from(1500));
    assert_eq!(report.totals.net_income, Decimal::from(1250));
  }

  #[test]
  fn unpaid_and_inactive_months_do_not_count() {
    let a = member("Ravi", "2024-01-15", 0, "2024-03-20");
    let report = aggregate_income(&[a], &[]);
    assert_eq!(report.totals.payments, Decimal::ZERO);
    assert_eq!(report.months.len(), 1);
  }

  #[test]
  fn fractional_expenses() {
    let e = Expense { amount: Decimal::new(120_050, 2), ..expense(0, "2024-01-05") };
    let report = aggregate_income(&[], &[e]);
    assert_eq!(report.totals.net_income, Decimal::new(-120_050, 2));
  }

  #[test]
  fn empty_inputs_give_empty_report() {
    let report = aggregate_income(&[], &[]);
    assert!(report.months.is_empty());
    assert_eq!(report.totals, IncomeTotals::default());
  }
}
