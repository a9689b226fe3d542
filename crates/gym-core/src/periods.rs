//! Editing a member's status history.
//!
//! Every operation takes the current history by reference and returns a new,
//! sorted list. Nothing here touches storage.

use chrono::NaiveDate;

use crate::{
  Error, Result,
  member::{MembershipStatus, StatusPeriod, new_period_id},
  month::YearMonth,
};

/// A copy of `history` sorted by start date.
pub fn sorted(history: &[StatusPeriod]) -> Vec<StatusPeriod> {
  let mut periods = history.to_vec();
  periods.sort_by_key(|p| p.start_date);
  periods
}

/// Where a month sits inside the period that covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
  First,
  Last,
  Interior,
}

fn position_of(period: &StatusPeriod, month: YearMonth) -> Position {
  if month.contains(period.start_date) {
    Position::First
  } else if period.end_date.is_some_and(|end| month.contains(end)) {
    Position::Last
  } else {
    Position::Interior
  }
}

/// Retroactively mark `month` inactive.
///
/// The active period covering `month` is shrunk, split or removed, and an
/// inactive period spanning exactly `month` is inserted. An open period
/// covers months up to and including the one containing `today`.
///
/// Returns `None` when no active period covers `month`; there is nothing to
/// invalidate and the history is left as is. Months after `today` always fall
/// in this case.
pub fn mark_month_inactive(
  history: &[StatusPeriod],
  month: YearMonth,
  today: NaiveDate,
) -> Option<Vec<StatusPeriod>> {
  let mut periods = sorted(history);
  let index = periods
    .iter()
    .position(|p| p.is_active() && month.intersects(p.start_date, Some(p.end_or(today))))?;
  let period = periods.remove(index);

  match position_of(&period, month) {
    Position::First => {
      // Starts the day after the month, unless that leaves nothing.
      if let Some(start) = month.last_day().succ_opt()
        && period.end_date.is_none_or(|end| start <= end)
      {
        periods.push(StatusPeriod { start_date: start, ..period });
      }
    }
    Position::Last => {
      if let Some(end) = month.first_day().pred_opt() {
        periods.push(StatusPeriod { end_date: Some(end), ..period });
      }
    }
    Position::Interior => {
      if let Some(start) = month.last_day().succ_opt()
        && period.end_date.is_none_or(|end| start <= end)
      {
        periods.push(StatusPeriod {
          id: new_period_id(),
          start_date: start,
          ..period.clone()
        });
      }
      if let Some(end) = month.first_day().pred_opt() {
        periods.push(StatusPeriod { end_date: Some(end), ..period });
      }
    }
  }

  periods.push(StatusPeriod::for_month(MembershipStatus::Inactive, month));
  periods.sort_by_key(|p| p.start_date);
  Some(periods)
}

/// Retroactively mark `month` active.
///
/// Drops any inactive period spanning exactly `month` and adds an active
/// period for it. Neighbouring active periods are left as separate entries.
pub fn mark_month_active(history: &[StatusPeriod], month: YearMonth) -> Vec<StatusPeriod> {
  let mut periods: Vec<_> = history
    .iter()
    .filter(|p| p.is_active() || !p.spans_exactly(month))
    .cloned()
    .collect();
  periods.push(StatusPeriod::for_month(MembershipStatus::Active, month));
  periods.sort_by_key(|p| p.start_date);
  periods
}

/// Start a new open-ended period on `start_date`, closing the running one the
/// day before.
///
/// A running period that began on or after `start_date` is replaced outright.
pub fn add_status_period(
  history: &[StatusPeriod],
  status: MembershipStatus,
  start_date: NaiveDate,
) -> Vec<StatusPeriod> {
  let close_on = start_date.pred_opt();
  let mut periods: Vec<_> = history
    .iter()
    .filter_map(|p| {
      if !p.is_open() {
        return Some(p.clone());
      }
      close_on
        .filter(|end| *end >= p.start_date)
        .map(|end| StatusPeriod { end_date: Some(end), ..p.clone() })
    })
    .collect();
  periods.push(StatusPeriod::open(status, start_date));
  periods.sort_by_key(|p| p.start_date);
  periods
}

/// Check the structural invariants of a history supplied from outside:
/// every period ends on or after its start, and at most one period is open,
/// which must be the last one.
pub fn validate_history(history: &[StatusPeriod]) -> Result<()> {
  if let Some(p) = history.iter().find(|p| p.end_date.is_some_and(|end| end < p.start_date)) {
    return Err(Error::InvalidStatusHistory(format!(
      "period {} ends before it starts",
      p.id
    )));
  }

  let open = history.iter().filter(|p| p.is_open()).count();
  if open > 1 {
    return Err(Error::InvalidStatusHistory(format!(
      "{open} periods are open-ended; at most one may be"
    )));
  }

  let periods = sorted(history);
  if let Some(p) = periods.iter().rev().skip(1).find(|p| p.is_open()) {
    return Err(Error::InvalidStatusHistory(format!(
      "open-ended period {} is not the latest",
      p.id
    )));
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{ledger::active_months, month::parse_date};

  fn date(s: &str) -> NaiveDate { parse_date(s).unwrap() }

  fn ym(s: &str) -> YearMonth { s.parse().unwrap() }

  fn today() -> NaiveDate { date("2024-03-20") }

  fn active(start: &str, end: Option<&str>) -> StatusPeriod {
    StatusPeriod {
      id:         format!("a-{start}"),
      status:     MembershipStatus::Active,
      start_date: date(start),
      end_date:   end.map(date),
    }
  }

  /// `(status, start, end)` triples for easy comparison.
  fn shape(periods: &[StatusPeriod]) -> Vec<(MembershipStatus, NaiveDate, Option<NaiveDate>)> {
    periods.iter().map(|p| (p.status, p.start_date, p.end_date)).collect()
  }

  use MembershipStatus::{Active, Inactive};

  #[test]
  fn interior_month_splits_open_period() {
    let history = vec![active("2024-01-15", None)];
    let edited = mark_month_inactive(&history, ym("February 2024"), today()).unwrap();

    assert_eq!(shape(&edited), vec![
      (Active, date("2024-01-15"), Some(date("2024-01-31"))),
      (Inactive, date("2024-02-01"), Some(date("2024-02-29"))),
      (Active, date("2024-03-01"), None),
    ]);
    // The head keeps its id; the tail is a new period.
    assert_eq!(edited[0].id, "a-2024-01-15");
    assert_ne!(edited[2].id, edited[0].id);
  }

  #[test]
  fn interior_split_preserves_closed_end() {
    let history = vec![active("2024-01-01", Some("2024-06-30"))];
    let edited = mark_month_inactive(&history, ym("March 2024"), today()).unwrap();

    assert_eq!(shape(&edited), vec![
      (Active, date("2024-01-01"), Some(date("2024-02-29"))),
      (Inactive, date("2024-03-01"), Some(date("2024-03-31"))),
      (Active, date("2024-04-01"), Some(date("2024-06-30"))),
    ]);
  }

  #[test]
  fn first_month_advances_start() {
    let history = vec![active("2024-01-15", None)];
    let edited = mark_month_inactive(&history, ym("January 2024"), today()).unwrap();

    assert_eq!(shape(&edited), vec![
      (Inactive, date("2024-01-01"), Some(date("2024-01-31"))),
      (Active, date("2024-02-01"), None),
    ]);
  }

  #[test]
  fn single_month_period_is_removed() {
    let history = vec![
      active("2024-01-10", Some("2024-01-25")),
      StatusPeriod::open(Inactive, date("2024-01-26")),
    ];
    let edited = mark_month_inactive(&history, ym("January 2024"), today()).unwrap();

    assert_eq!(shape(&edited), vec![
      (Inactive, date("2024-01-01"), Some(date("2024-01-31"))),
      (Inactive, date("2024-01-26"), None),
    ]);
  }

  #[test]
  fn last_month_retreats_end() {
    let history = vec![
      active("2024-01-15", Some("2024-04-10")),
      StatusPeriod::open(Inactive, date("2024-04-11")),
    ];
    let edited = mark_month_inactive(&history, ym("April 2024"), today()).unwrap();

    assert_eq!(shape(&edited)[0], (Active, date("2024-01-15"), Some(date("2024-03-31"))));
    assert_eq!(shape(&edited)[1], (Inactive, date("2024-04-01"), Some(date("2024-04-30"))));
    assert_eq!(edited.len(), 3);
  }

  #[test]
  fn no_covering_active_period_is_a_no_op() {
    let history = vec![
      active("2024-01-15", Some("2024-01-31")),
      StatusPeriod::open(Inactive, date("2024-02-01")),
    ];
    assert!(mark_month_inactive(&history, ym("March 2024"), today()).is_none());
    assert!(mark_month_inactive(&[], ym("March 2024"), today()).is_none());
  }

  #[test]
  fn months_after_today_are_left_alone() {
    let history = vec![active("2024-01-15", None)];
    assert!(mark_month_inactive(&history, ym("June 2024"), today()).is_none());
    assert!(mark_month_inactive(&history, ym("April 2024"), today()).is_none());

    // The month containing today is still covered by the open period.
    let edited = mark_month_inactive(&history, ym("March 2024"), today()).unwrap();
    assert_eq!(shape(&edited), vec![
      (Active, date("2024-01-15"), Some(date("2024-02-29"))),
      (Inactive, date("2024-03-01"), Some(date("2024-03-31"))),
      (Active, date("2024-04-01"), None),
    ]);
  }

  #[test]
  fn unsorted_input_is_sorted_first() {
    let history = vec![
      active("2024-03-01", None),
      active("2024-01-01", Some("2024-02-29")),
    ];
    let edited = mark_month_inactive(&history, ym("January 2024"), today()).unwrap();
    assert!(edited.windows(2).all(|w| w[0].start_date <= w[1].start_date));
    assert_eq!(edited[0].status, Inactive);
    assert_eq!(edited[1].start_date, date("2024-02-01"));
  }

  #[test]
  fn inactive_then_active_restores_active_month() {
    let today = date("2024-03-20");
    let history = vec![active("2024-01-15", None)];
    let off = mark_month_inactive(&history, ym("February 2024"), today).unwrap();
    assert!(!active_months(&off, today).contains(&ym("February 2024")));

    let on = mark_month_active(&off, ym("February 2024"));
    assert!(on.iter().all(|p| p.is_active()));
    assert_eq!(shape(&on), vec![
      (Active, date("2024-01-15"), Some(date("2024-01-31"))),
      (Active, date("2024-02-01"), Some(date("2024-02-29"))),
      (Active, date("2024-03-01"), None),
    ]);
    let months = active_months(&on, today);
    assert_eq!(months.len(), 3);
    assert!(months.contains(&ym("February 2024")));
  }

  #[test]
  fn activating_keeps_unrelated_inactive_periods() {
    let history = vec![
      active("2024-01-01", Some("2024-01-31")),
      StatusPeriod::open(Inactive, date("2024-02-01")),
    ];
    let edited = mark_month_active(&history, ym("March 2024"));
    assert_eq!(shape(&edited), vec![
      (Active, date("2024-01-01"), Some(date("2024-01-31"))),
      (Inactive, date("2024-02-01"), None),
      (Active, date("2024-03-01"), Some(date("2024-03-31"))),
    ]);
  }

  #[test]
  fn add_status_period_closes_running_period() {
    let history = vec![active("2024-01-15", None)];
    let edited = add_status_period(&history, Inactive, date("2024-05-01"));

    assert_eq!(shape(&edited), vec![
      (Active, date("2024-01-15"), Some(date("2024-04-30"))),
      (Inactive, date("2024-05-01"), None),
    ]);
    assert!(validate_history(&edited).is_ok());
  }

  #[test]
  fn add_status_period_replaces_period_starting_same_day() {
    let history = vec![
      active("2024-01-15", Some("2024-04-30")),
      StatusPeriod::open(Inactive, date("2024-05-01")),
    ];
    let edited = add_status_period(&history, Active, date("2024-05-01"));
    assert_eq!(shape(&edited), vec![
      (Active, date("2024-01-15"), Some(date("2024-04-30"))),
      (Active, date("2024-05-01"), None),
    ]);
  }

  #[test]
  fn validate_rejects_broken_histories() {
    let two_open = vec![active("2024-01-01", None), active("2024-03-01", None)];
    assert!(matches!(validate_history(&two_open), Err(Error::InvalidStatusHistory(_))));

    let open_not_last =
      vec![active("2024-01-01", None), active("2024-03-01", Some("2024-03-31"))];
    assert!(matches!(validate_history(&open_not_last), Err(Error::InvalidStatusHistory(_))));

    let backwards = vec![active("2024-03-01", Some("2024-02-01"))];
    assert!(matches!(validate_history(&backwards), Err(Error::InvalidStatusHistory(_))));

    assert!(validate_history(&[]).is_ok());
    assert!(validate_history(&[active("2024-01-01", None)]).is_ok());
  }
}
