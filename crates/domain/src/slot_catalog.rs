// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Slot catalog generation.
//!
//! ## Rules
//!
//! - Every real day gets a night slot.
//! - Heavy days (Sunday, Saturday, or a holiday) also get a day slot, emitted
//!   before the night slot.
//! - Ids are assigned in generation order, so they are dense over
//!   `[0, total_slots)` and follow the calendar week by week.

use crate::calendar::{HolidayTable, Week, month_weeks};
use crate::error::DomainError;
use crate::types::{Period, Slot, SlotId, SlotKind};

const SUNDAY: usize = 0;
const SATURDAY: usize = 6;

/// Generates the ordered slot sequence for a week grid.
///
/// # Arguments
///
/// * `weeks` - Sunday-first week grid, `0` for days outside the month
/// * `is_holiday` - Predicate marking additional heavy days
#[must_use]
pub fn generate_slots<F>(weeks: &[Week], is_holiday: F) -> Vec<Slot>
where
    F: Fn(u8) -> bool,
{
    let mut slots: Vec<Slot> = Vec::new();

    for week in weeks {
        for (column, &day) in week.iter().enumerate() {
            if day == 0 {
                continue;
            }

            let is_heavy: bool = column == SUNDAY || column == SATURDAY || is_holiday(day);

            if is_heavy {
                slots.push(Slot::new(
                    SlotId::new(slots.len()),
                    day,
                    SlotKind::DaySlot,
                    true,
                ));
            }
            slots.push(Slot::new(
                SlotId::new(slots.len()),
                day,
                SlotKind::NightSlot,
                is_heavy,
            ));
        }
    }

    slots
}

/// Generates the slot catalog for a period using a holiday table.
///
/// # Errors
///
/// Returns `DomainError::InvalidPeriod` if the period is not a real month.
pub fn catalog_for_period(
    period: &Period,
    holidays: &HolidayTable,
) -> Result<Vec<Slot>, DomainError> {
    let weeks: Vec<Week> = month_weeks(period)?;
    Ok(generate_slots(&weeks, |day| holidays.is_holiday(period, day)))
}
