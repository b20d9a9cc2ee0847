// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use duty_roster::{AllocationState, Lottery};
use duty_roster_audit::Cause;

use crate::{
    AuthenticatedActor, DrawQuotasRequest, InitPeriodRequest, Role, SetOrderRequest,
    draw_quotas, init_period, set_order,
};

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-123"), Role::Admin)
}

pub fn create_test_picker() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("picker-456"), Role::Picker)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn create_test_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("M{i:02}")).collect()
}

/// February 2026 with the built-in holidays: 28 nights plus 11 heavy days.
pub fn create_initialized_state(lottery: &mut Lottery) -> AllocationState {
    init_period(
        &AllocationState::default(),
        lottery,
        InitPeriodRequest {
            year: 2026,
            month: 2,
            holidays: None,
        },
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .new_state
}

/// Initialised, quotas drawn for `count` members, order in name order.
pub fn create_ready_state(count: usize, lottery: &mut Lottery) -> AllocationState {
    let names: Vec<String> = create_test_names(count);
    let state: AllocationState = create_initialized_state(lottery);
    let state: AllocationState = draw_quotas(
        &state,
        lottery,
        DrawQuotasRequest {
            members: names.clone(),
        },
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .new_state;
    set_order(
        &state,
        lottery,
        SetOrderRequest { order: names },
        &create_test_admin(),
        create_test_cause(),
    )
    .unwrap()
    .new_state
}
