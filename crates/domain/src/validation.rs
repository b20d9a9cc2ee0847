// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::MemberId;
use std::collections::HashSet;

/// Validates that a member id is usable.
///
/// # Arguments
///
/// * `member` - The member to validate
///
/// # Errors
///
/// Returns `DomainError::InvalidMemberName` if the name is empty.
pub fn validate_member_id(member: &MemberId) -> Result<(), DomainError> {
    // Rule: name must not be empty after trimming
    if member.value().is_empty() {
        return Err(DomainError::InvalidMemberName(String::from(
            "Member name cannot be empty",
        )));
    }

    Ok(())
}

/// Validates a roster used for a quota draw.
///
/// # Arguments
///
/// * `members` - The roster, in any order
///
/// # Errors
///
/// Returns an error if:
/// - The roster is empty
/// - A member name is empty
/// - A member appears more than once
pub fn validate_roster(members: &[MemberId]) -> Result<(), DomainError> {
    if members.is_empty() {
        return Err(DomainError::NoMembers);
    }

    let mut seen: HashSet<&MemberId> = HashSet::new();
    for member in members {
        validate_member_id(member)?;
        if !seen.insert(member) {
            return Err(DomainError::DuplicateMember(member.clone()));
        }
    }

    Ok(())
}

/// Validates that `order` is a permutation of `roster`.
///
/// # Arguments
///
/// * `order` - The proposed selection order
/// * `roster` - The members the order must cover
///
/// # Errors
///
/// Returns `DomainError::InvalidOrder` if the lengths differ, a member is
/// repeated, or a member is missing or unknown.
pub fn validate_order(order: &[MemberId], roster: &[MemberId]) -> Result<(), DomainError> {
    if order.len() != roster.len() {
        return Err(DomainError::InvalidOrder {
            reason: format!(
                "expected {} members, got {}",
                roster.len(),
                order.len()
            ),
        });
    }

    let expected: HashSet<&MemberId> = roster.iter().collect();
    let mut seen: HashSet<&MemberId> = HashSet::new();

    for member in order {
        if !expected.contains(member) {
            return Err(DomainError::InvalidOrder {
                reason: format!("'{member}' is not in the roster"),
            });
        }
        if !seen.insert(member) {
            return Err(DomainError::InvalidOrder {
                reason: format!("'{member}' appears more than once"),
            });
        }
    }

    Ok(())
}
