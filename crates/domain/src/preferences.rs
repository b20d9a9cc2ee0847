// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Preference lists for absent members.
//!
//! Operators type preferences as comma-separated slot ids (`"5, 12"`).
//! Parsing is lenient: entries that are not plain decimal ids are dropped
//! and reported, never rejected as a whole. Entries are kept in the order
//! they were written and are never re-sorted.

use crate::error::DomainError;
use crate::types::{Slot, SlotId};

/// The result of parsing an operator's preference text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPreferences {
    /// Accepted slot ids, in written order.
    pub ids: Vec<SlotId>,
    /// Entries that were dropped.
    pub rejected: Vec<String>,
}

impl ParsedPreferences {
    /// Describes every dropped entry as an `InvalidPreferenceId`.
    #[must_use]
    pub fn rejections(&self) -> Vec<DomainError> {
        self.rejected
            .iter()
            .cloned()
            .map(DomainError::InvalidPreferenceId)
            .collect()
    }
}

/// Parses comma-separated preference text.
///
/// Blank entries are skipped silently. Entries containing anything other
/// than ASCII digits (signs included) are dropped and listed in `rejected`.
#[must_use]
pub fn parse_preferences(text: &str) -> ParsedPreferences {
    let mut parsed: ParsedPreferences = ParsedPreferences::default();

    for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let numeric: bool = token.bytes().all(|b| b.is_ascii_digit());
        match token.parse::<usize>() {
            Ok(index) if numeric => parsed.ids.push(SlotId::new(index)),
            _ => parsed.rejected.push(token.to_string()),
        }
    }

    parsed
}

/// Returns the preferences that are still usable against a catalog.
///
/// An id survives if it is in range and its slot has no owner. The
/// original list order is preserved.
#[must_use]
pub fn remaining_preferences(preferences: &[SlotId], slots: &[Slot]) -> Vec<SlotId> {
    preferences
        .iter()
        .copied()
        .filter(|id| slots.get(id.index()).is_some_and(Slot::is_free))
        .collect()
}
