// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Month calendar and holiday tables.
//!
//! Weeks start on Sunday. Each week is seven day cells where `0` marks a
//! cell outside the month, so column 0 is always Sunday and column 6 is
//! always Saturday.

use crate::error::DomainError;
use crate::types::Period;
use std::collections::{BTreeMap, BTreeSet};

/// Seven day cells, Sunday first. `0` marks a day outside the month.
pub type Week = [u8; 7];

/// Builds the Sunday-first week grid for a period.
///
/// # Errors
///
/// Returns `DomainError::InvalidPeriod` if the period is not a real month.
pub fn month_weeks(period: &Period) -> Result<Vec<Week>, DomainError> {
    let first: time::Date = period.first_day()?;
    let month: time::Month = first.month();

    let mut weeks: Vec<Week> = Vec::new();
    let mut week: Week = [0; 7];
    let mut current: Option<time::Date> = Some(first);

    while let Some(date) = current.filter(|d| d.month() == month) {
        let column: usize = usize::from(date.weekday().number_days_from_sunday());
        week[column] = date.day();
        if column == 6 {
            weeks.push(week);
            week = [0; 7];
        }
        current = date.next_day();
    }

    if week.iter().any(|&day| day != 0) {
        weeks.push(week);
    }

    Ok(weeks)
}

/// Public holidays keyed by period.
///
/// A holiday makes its day heavy, which adds a day slot to the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayTable {
    days: BTreeMap<Period, BTreeSet<u8>>,
}

impl HolidayTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            days: BTreeMap::new(),
        }
    }

    /// The 2026 public holiday calendar the roster was first run against.
    #[must_use]
    pub fn korea_2026() -> Self {
        const TABLE: [(u8, &[u8]); 9] = [
            (1, &[1]),
            (2, &[16, 17, 18]),
            (3, &[1, 2]),
            (5, &[5, 24, 25]),
            (6, &[6]),
            (8, &[15, 17]),
            (9, &[24, 25, 26]),
            (10, &[3, 5, 9]),
            (12, &[25]),
        ];

        let mut table: Self = Self::new();
        for (month, days) in TABLE {
            if let Ok(period) = Period::new(2026, month) {
                table.add_days(period, days.iter().copied());
            }
        }
        table
    }

    /// Marks days of a period as holidays.
    pub fn add_days(&mut self, period: Period, days: impl IntoIterator<Item = u8>) {
        self.days.entry(period).or_default().extend(days);
    }

    /// Returns true if the given day of the period is a holiday.
    #[must_use]
    pub fn is_holiday(&self, period: &Period, day: u8) -> bool {
        self.days
            .get(period)
            .is_some_and(|days| days.contains(&day))
    }

    /// Returns the holidays of a period in ascending order.
    #[must_use]
    pub fn days_for(&self, period: &Period) -> Vec<u8> {
        self.days
            .get(period)
            .map(|days| days.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_february_2026_starts_on_sunday() {
        let period: Period = Period::new(2026, 2).expect("valid period");
        let weeks: Vec<Week> = month_weeks(&period).expect("weeks");

        assert_eq!(weeks.len(), 4);
        assert_eq!(weeks[0], [1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(weeks[3], [22, 23, 24, 25, 26, 27, 28]);
    }

    #[test]
    fn test_january_2026_pads_leading_cells() {
        // 2026-01-01 is a Thursday.
        let period: Period = Period::new(2026, 1).expect("valid period");
        let weeks: Vec<Week> = month_weeks(&period).expect("weeks");

        assert_eq!(weeks[0], [0, 0, 0, 0, 1, 2, 3]);
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[4], [25, 26, 27, 28, 29, 30, 31]);
    }

    #[test]
    fn test_trailing_cells_are_zero() {
        // 2026-03-31 is a Tuesday.
        let period: Period = Period::new(2026, 3).expect("valid period");
        let weeks: Vec<Week> = month_weeks(&period).expect("weeks");
        let last: Week = weeks[weeks.len() - 1];

        assert_eq!(last, [29, 30, 31, 0, 0, 0, 0]);
        let day_count: usize = weeks.iter().flatten().filter(|&&d| d != 0).count();
        assert_eq!(day_count, 31);
    }

    #[test]
    fn test_korea_2026_table() {
        let table: HolidayTable = HolidayTable::korea_2026();
        let february: Period = Period::new(2026, 2).expect("valid period");
        let april: Period = Period::new(2026, 4).expect("valid period");

        assert!(table.is_holiday(&february, 17));
        assert!(!table.is_holiday(&february, 19));
        assert_eq!(table.days_for(&february), vec![16, 17, 18]);
        assert!(table.days_for(&april).is_empty());
    }

    #[test]
    fn test_holidays_are_scoped_to_their_year() {
        let table: HolidayTable = HolidayTable::korea_2026();
        let next_year: Period = Period::new(2027, 1).expect("valid period");

        assert!(!table.is_holiday(&next_year, 1));
    }
}
