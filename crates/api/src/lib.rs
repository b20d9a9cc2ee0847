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

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    ApiResult, assign_slot, draw_order, draw_quotas, get_member, get_progress, get_state,
    get_summary, init_period, pass_turn, release_slot, resume_auto_fill, set_absent,
    set_order, set_preferences, undo,
};
pub use request_response::{
    AssignSlotRequest, AssignSlotResponse, AutoStepView, DrawQuotasRequest, DrawQuotasResponse,
    InitPeriodRequest, InitPeriodResponse, MemberView, OrderResponse, PassTurnRequest,
    PassTurnResponse, ProfileResponse, ProgressResponse, QuotaEntry, ReleaseSlotRequest,
    ReleaseSlotResponse, ResumeAutoFillResponse, SetAbsentRequest, SetOrderRequest,
    SetPreferencesRequest, SlotView, StateResponse, SummaryResponse, TallyEntry, UndoResponse,
    member_name, quota_entries,
};
