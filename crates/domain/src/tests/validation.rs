// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, MemberId, validate_member_id, validate_order, validate_roster};

fn roster(names: &[&str]) -> Vec<MemberId> {
    names.iter().map(|n| MemberId::new(n)).collect()
}

#[test]
fn test_validate_member_id_rejects_blank_name() {
    assert!(validate_member_id(&MemberId::new("Kim")).is_ok());

    let result: Result<(), DomainError> = validate_member_id(&MemberId::new("   "));
    assert!(matches!(result, Err(DomainError::InvalidMemberName(_))));
}

#[test]
fn test_validate_roster_accepts_unique_members() {
    let members: Vec<MemberId> = roster(&["Kim", "Lee", "Park"]);
    assert!(validate_roster(&members).is_ok());
}

#[test]
fn test_validate_roster_rejects_empty() {
    assert_eq!(validate_roster(&[]), Err(DomainError::NoMembers));
}

#[test]
fn test_validate_roster_rejects_duplicates() {
    let members: Vec<MemberId> = roster(&["Kim", "Lee", " Kim"]);
    assert_eq!(
        validate_roster(&members),
        Err(DomainError::DuplicateMember(MemberId::new("Kim")))
    );
}

#[test]
fn test_validate_order_accepts_permutation() {
    let members: Vec<MemberId> = roster(&["Kim", "Lee", "Park"]);
    let order: Vec<MemberId> = roster(&["Park", "Kim", "Lee"]);
    assert!(validate_order(&order, &members).is_ok());
}

#[test]
fn test_validate_order_rejects_wrong_length() {
    let members: Vec<MemberId> = roster(&["Kim", "Lee", "Park"]);
    let order: Vec<MemberId> = roster(&["Park", "Kim"]);
    assert!(matches!(
        validate_order(&order, &members),
        Err(DomainError::InvalidOrder { .. })
    ));
}

#[test]
fn test_validate_order_rejects_unknown_and_repeated() {
    let members: Vec<MemberId> = roster(&["Kim", "Lee", "Park"]);

    let unknown: Vec<MemberId> = roster(&["Park", "Kim", "Yoon"]);
    assert!(matches!(
        validate_order(&unknown, &members),
        Err(DomainError::InvalidOrder { .. })
    ));

    let repeated: Vec<MemberId> = roster(&["Park", "Kim", "Kim"]);
    assert!(matches!(
        validate_order(&repeated, &members),
        Err(DomainError::InvalidOrder { .. })
    ));
}
