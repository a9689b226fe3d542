//! Plain-text tables for terminal output.

use gym_core::{
  income::IncomeReport,
  member::{Member, PaymentStatus},
};

use crate::client::Ledger;

pub fn members(members: &[Member]) -> String {
  let mut out = format!(
    "{:<8} {:<36} {:<24} {:<9} {:>6}\n",
    "CODE", "ID", "NAME", "STATUS", "UNPAID"
  );
  for m in members {
    let unpaid = m
      .payments
      .iter()
      .filter(|p| p.status == PaymentStatus::Unpaid)
      .count();
    out.push_str(&format!(
      "{:<8} {:<36} {:<24} {:<9} {:>6}\n",
      m.member_code,
      m.id,
      truncate(&m.full_name, 24),
      format!("{:?}", m.status).to_lowercase(),
      unpaid
    ));
  }
  out
}

pub fn ledger(ledger: &Ledger) -> String {
  let mut out = format!(
    "member {} ({})\n\n{:<16} {:<9} {:>10} {:<12} ID\n",
    ledger.member_id,
    format!("{:?}", ledger.status).to_lowercase(),
    "MONTH",
    "STATUS",
    "AMOUNT",
    "PAID ON"
  );
  for p in &ledger.payments {
    let paid_on = p.payment_date.map(|d| d.to_string()).unwrap_or_default();
    out.push_str(&format!(
      "{:<16} {:<9} {:>10} {:<12} {}\n",
      p.month.to_string(),
      format!("{:?}", p.status),
      p.amount,
      paid_on,
      p.id
    ));
  }
  let s = &ledger.summary;
  out.push_str(&format!(
    "\npaid {} ({}), unpaid {} ({}), inactive {}\n",
    s.paid_months, s.total_paid, s.unpaid_months, s.total_unpaid, s.inactive_months
  ));
  out
}

pub fn income(report: &IncomeReport) -> String {
  let mut out = format!(
    "{:<16} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
    "MONTH", "PAYMENTS", "ADMISSIONS", "GROSS", "EXPENSES", "NET"
  );
  for m in &report.months {
    out.push_str(&format!(
      "{:<16} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
      m.month.to_string(),
      m.payments,
      m.admissions,
      m.gross_income,
      m.expenses,
      m.net_income
    ));
  }
  let t = &report.totals;
  out.push_str(&format!(
    "{:<16} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
    "TOTAL", t.payments, t.admissions, t.gross_income, t.expenses, t.net_income
  ));
  out
}

fn truncate(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    return s.to_owned();
  }
  let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
  cut.push('…');
  cut
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn truncate_long_names() {
    assert_eq!(truncate("Rafi", 8), "Rafi");
    assert_eq!(truncate("Abdullah Al Mamun", 8), "Abdulla…");
  }

  #[test]
  fn empty_income_report_has_totals_row() {
    let report = IncomeReport {
      months: Vec::new(),
      totals: Default::default(),
    };
    let text = income(&report);
    assert_eq!(text.lines().count(), 2);
    assert!(text.lines().nth(1).unwrap().starts_with("TOTAL"));
  }
}
