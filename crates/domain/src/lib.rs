// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod calendar;
mod error;
mod preferences;
mod quota;
mod slot_catalog;
mod summary;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use calendar::{HolidayTable, Week, month_weeks};
pub use preferences::{ParsedPreferences, parse_preferences, remaining_preferences};
pub use quota::{QuotaDraw, split_quotas, to_quota};
pub use slot_catalog::{catalog_for_period, generate_slots};
pub use summary::{AllocationProgress, MemberTally, progress, summarize};

// Re-export public types
pub use error::DomainError;
pub use types::{MemberId, MemberProfile, Period, Slot, SlotId, SlotKind};
pub use validation::{validate_member_id, validate_order, validate_roster};
