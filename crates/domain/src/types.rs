// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifies a roster member.
///
/// The member's name is the identifier; surrounding whitespace is trimmed so
/// that `" Kim "` and `"Kim"` refer to the same person.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId {
    value: String,
}

impl MemberId {
    /// Creates a new `MemberId` from a display name.
    ///
    /// # Arguments
    ///
    /// * `value` - The member's name (will be trimmed)
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the member's name.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

/// Identifies a slot within one period's catalog.
///
/// Ids are dense over `[0, total_slots)` and assigned in generation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotId(usize);

impl SlotId {
    /// Creates a slot id from its position in the catalog.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the catalog position this id refers to.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of duty a slot represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// Daytime duty, only offered on heavy days.
    DaySlot,
    /// Night duty, offered every day.
    NightSlot,
}

impl SlotKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DaySlot => "Day",
            Self::NightSlot => "Night",
        }
    }
}

impl FromStr for SlotKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Day" | "DaySlot" => Ok(Self::DaySlot),
            "Night" | "NightSlot" => Ok(Self::NightSlot),
            _ => Err(DomainError::InvalidPreferenceId(s.to_string())),
        }
    }
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One assignable unit of duty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// The slot's catalog id.
    pub id: SlotId,
    /// Day of the month (1-31).
    pub day: u8,
    /// Day or night duty.
    pub kind: SlotKind,
    /// The member bound to this slot, if any.
    pub owner: Option<MemberId>,
    /// Whether the day is a weekend or holiday.
    pub is_heavy: bool,
}

impl Slot {
    /// Creates a new unowned slot.
    #[must_use]
    pub const fn new(id: SlotId, day: u8, kind: SlotKind, is_heavy: bool) -> Self {
        Self {
            id,
            day,
            kind,
            owner: None,
            is_heavy,
        }
    }

    /// Returns true if nobody holds this slot.
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.owner.is_none()
    }
}

/// A calendar month the roster is drawn for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    year: i32,
    month: u8,
}

impl Period {
    /// Creates a period, validating the month.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPeriod` if `month` is outside 1-12 or the
    /// year is outside the range the calendar supports.
    pub fn new(year: i32, month: u8) -> Result<Self, DomainError> {
        let period: Self = Self { year, month };
        period.first_day()?;
        Ok(period)
    }

    /// Returns the year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month number (1-12).
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the first calendar day of the period.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPeriod` if the period is not a real month.
    pub fn first_day(&self) -> Result<time::Date, DomainError> {
        let invalid = || DomainError::InvalidPeriod {
            year: self.year,
            month: self.month,
        };
        let month: time::Month = time::Month::try_from(self.month).map_err(|_| invalid())?;
        time::Date::from_calendar_date(self.year, month, 1).map_err(|_| invalid())
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// Per-member settings that survive across periods.
///
/// Absence and the preference list are operator input; neither is part of
/// the undo snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    /// Whether the member is absent and should be auto-filled.
    pub absent: bool,
    /// Ordered wish-list of slot ids, as written.
    pub preferences: Vec<SlotId>,
}
