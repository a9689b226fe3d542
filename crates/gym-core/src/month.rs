//! Calendar-month arithmetic.
//!
//! Billing works at whole-month resolution. A [`YearMonth`] crosses the API
//! boundary as a `"<MonthName> <Year>"` label in English, e.g.
//! `"January 2024"`, and that label is also the key used to match payments
//! across ledger recomputations.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Month, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A calendar month, ordered chronologically.
///
/// Internally this is the first day of the month, so every value is a valid
/// date and ordering falls out of [`NaiveDate`]'s ordering.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
  /// Build from a year and a 1-based month number.
  pub fn new(year: i32, month: u32) -> Result<Self> {
    NaiveDate::from_ymd_opt(year, month, 1)
      .map(Self)
      .ok_or_else(|| Error::InvalidMonth(format!("{year}-{month:02}")))
  }

  /// The month that contains `date`.
  pub fn containing(date: NaiveDate) -> Self {
    // Day 1 exists for every month chrono can represent.
    Self(date - chrono::Days::new(u64::from(date.day0())))
  }

  pub fn year(self) -> i32 { self.0.year() }

  /// 1-based month number.
  pub fn month(self) -> u32 { self.0.month() }

  pub fn first_day(self) -> NaiveDate { self.0 }

  pub fn last_day(self) -> NaiveDate {
    self
      .0
      .checked_add_months(Months::new(1))
      .and_then(|d| d.pred_opt())
      .unwrap_or(NaiveDate::MAX)
  }

  /// The following month, or `None` past the end of the representable range.
  pub fn next(self) -> Option<Self> {
    self.0.checked_add_months(Months::new(1)).map(Self)
  }

  pub fn prev(self) -> Option<Self> {
    self.0.checked_sub_months(Months::new(1)).map(Self)
  }

  pub fn contains(self, date: NaiveDate) -> bool {
    Self::containing(date) == self
  }

  /// Whether this month overlaps `[start, end]`. An `end` of `None` is
  /// unbounded.
  pub fn intersects(self, start: NaiveDate, end: Option<NaiveDate>) -> bool {
    start <= self.last_day() && end.is_none_or(|end| end >= self.first_day())
  }

  /// Every month from `from` to `to` inclusive, in order. Empty when
  /// `from > to`.
  pub fn range(from: Self, to: Self) -> impl Iterator<Item = Self> {
    std::iter::successors(Some(from).filter(|m| *m <= to), move |m| {
      m.next().filter(|n| *n <= to)
    })
  }

  /// The label with spaces replaced by dashes (`"January-2024"`), for use in
  /// identifiers.
  pub fn slug(self) -> String { self.to_string().replace(' ', "-") }
}

/// All months whose interval intersects `[start, end]`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> Vec<YearMonth> {
  if end < start {
    return Vec::new();
  }
  YearMonth::range(YearMonth::containing(start), YearMonth::containing(end))
    .collect()
}

impl fmt::Display for YearMonth {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format("%B %Y"))
  }
}

impl FromStr for YearMonth {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidMonth(s.to_owned());

    let (name, year) = s.trim().split_once(' ').ok_or_else(invalid)?;
    let month: Month = name.parse().map_err(|_| invalid())?;
    if name != month.name() {
      return Err(invalid());
    }
    let year: i32 = year.trim().parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month.number_from_month(), 1)
      .map(Self)
      .ok_or_else(invalid)
  }
}

impl TryFrom<String> for YearMonth {
  type Error = Error;

  fn try_from(s: String) -> Result<Self> { s.parse() }
}

impl From<YearMonth> for String {
  fn from(m: YearMonth) -> Self { m.to_string() }
}

/// Parse an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> NaiveDate { parse_date(s).unwrap() }

  fn ym(s: &str) -> YearMonth { s.parse().unwrap() }

  #[test]
  fn label_roundtrip() {
    let m = YearMonth::new(2024, 1).unwrap();
    assert_eq!(m.to_string(), "January 2024");
    assert_eq!(ym("January 2024"), m);
    assert_eq!(ym("December 1999").month(), 12);
  }

  #[test]
  fn rejects_malformed_labels() {
    for bad in ["", "January", "2024", "Janvier 2024", "january 2024", "Jan 2024", "January twenty", "2024-01"] {
      assert!(
        matches!(bad.parse::<YearMonth>(), Err(Error::InvalidMonth(_))),
        "{bad:?} should not parse"
      );
    }
  }

  #[test]
  fn serde_uses_label() {
    let m = ym("February 2024");
    let json = serde_json::to_string(&m).unwrap();
    assert_eq!(json, "\"February 2024\"");
    let back: YearMonth = serde_json::from_str(&json).unwrap();
    assert_eq!(back, m);
    assert!(serde_json::from_str::<YearMonth>("\"Feb-2024\"").is_err());
  }

  #[test]
  fn first_and_last_days() {
    let feb = ym("February 2024");
    assert_eq!(feb.first_day(), date("2024-02-01"));
    assert_eq!(feb.last_day(), date("2024-02-29"));
    assert_eq!(ym("February 2023").last_day(), date("2023-02-28"));
    assert_eq!(ym("December 2023").last_day(), date("2023-12-31"));
  }

  #[test]
  fn containing_and_contains() {
    let d = date("2024-01-15");
    assert_eq!(YearMonth::containing(d), ym("January 2024"));
    assert!(ym("January 2024").contains(d));
    assert!(!ym("February 2024").contains(d));
  }

  #[test]
  fn next_and_prev_cross_years() {
    assert_eq!(ym("December 2023").next(), Some(ym("January 2024")));
    assert_eq!(ym("January 2024").prev(), Some(ym("December 2023")));
  }

  #[test]
  fn range_is_inclusive_and_ordered() {
    let months: Vec<_> =
      YearMonth::range(ym("November 2023"), ym("February 2024")).collect();
    assert_eq!(months, vec![
      ym("November 2023"),
      ym("December 2023"),
      ym("January 2024"),
      ym("February 2024"),
    ]);
    assert_eq!(YearMonth::range(ym("March 2024"), ym("March 2024")).count(), 1);
    assert_eq!(YearMonth::range(ym("April 2024"), ym("March 2024")).count(), 0);
  }

  #[test]
  fn months_between_partial_months() {
    let months = months_between(date("2024-01-31"), date("2024-03-01"));
    assert_eq!(months.len(), 3);
    assert!(months_between(date("2024-03-01"), date("2024-02-01")).is_empty());
  }

  #[test]
  fn intersects_open_and_closed_ranges() {
    let feb = ym("February 2024");
    assert!(feb.intersects(date("2024-01-15"), None));
    assert!(feb.intersects(date("2024-02-29"), Some(date("2024-03-10"))));
    assert!(feb.intersects(date("2024-01-01"), Some(date("2024-02-01"))));
    assert!(!feb.intersects(date("2024-01-01"), Some(date("2024-01-31"))));
    assert!(!feb.intersects(date("2024-03-01"), None));
  }

  #[test]
  fn slug_replaces_spaces() {
    assert_eq!(ym("March 2024").slug(), "March-2024");
  }
}
