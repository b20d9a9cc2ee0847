// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions, one per engine operation.
//!
//! Each mutating handler authorizes the actor, translates the request into
//! a `Command`, applies it and shapes the outcome into a response DTO. The
//! caller owns the state and decides whether to keep `new_state`.

use duty_roster::{
    AllocationState, AssignMode, AutoStep, Command, CoreError, Lottery, Outcome, Redistribution,
    TransitionResult, apply,
};
use duty_roster_audit::{Actor, AuditEvent, Cause};
use duty_roster_domain::{
    AllocationProgress, HolidayTable, MemberId, MemberProfile, ParsedPreferences, Period,
    SlotId, parse_preferences,
};
use tracing::{info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AssignSlotRequest, AssignSlotResponse, AutoStepView, DrawQuotasRequest, DrawQuotasResponse,
    InitPeriodRequest, InitPeriodResponse, MemberView, OrderResponse, PassTurnRequest,
    PassTurnResponse, ProfileResponse, ProgressResponse, ReleaseSlotRequest, ReleaseSlotResponse,
    ResumeAutoFillResponse, SetAbsentRequest, SetOrderRequest, SetPreferencesRequest, SlotView,
    StateResponse, SummaryResponse, TallyEntry, UndoResponse, member_name, quota_entries,
};

/// Result of a successful mutating API call.
///
/// The caller is responsible for keeping `new_state` and recording the
/// audit events.
#[derive(Debug, Clone)]
pub struct ApiResult<T> {
    /// The API response.
    pub response: T,
    /// One event for the command, then one per automatic step.
    pub audit_events: Vec<AuditEvent>,
    /// The new state after the operation.
    pub new_state: AllocationState,
}

fn commit(
    state: &AllocationState,
    command: Command,
    lottery: &mut Lottery,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<TransitionResult, ApiError> {
    let name: &'static str = command.name();
    let actor: Actor = authenticated_actor.to_audit_actor();

    let result: TransitionResult =
        apply(state, command, lottery, actor, cause).map_err(|err: CoreError| {
            info!(
                command = name,
                actor = %authenticated_actor.id,
                error = %err,
                "Command rejected"
            );
            translate_core_error(&err)
        })?;

    info!(
        command = name,
        actor = %authenticated_actor.id,
        auto_steps = result.auto_steps.len(),
        assigned = result.new_state.assigned_count(),
        "Committed transition"
    );
    for step in &result.auto_steps {
        match step {
            AutoStep::Assigned { member, slot_id } => {
                info!(member = %member, slot = %slot_id, "Auto-assigned from preferences");
            }
            AutoStep::Passed { redistribution } => {
                info!(
                    member = %redistribution.member,
                    summary = %redistribution.summary(),
                    "Auto-passed"
                );
            }
        }
    }
    Ok(result)
}

fn unexpected_outcome(command: &str, outcome: &Outcome) -> ApiError {
    ApiError::Internal {
        message: format!("{command} produced an unexpected outcome: {outcome:?}"),
    }
}

fn auto_step_views(result: &TransitionResult) -> Vec<AutoStepView> {
    result.auto_steps.iter().map(AutoStepView::from).collect()
}

fn next_picker(state: &AllocationState) -> Option<String> {
    member_name(state.next_picker().as_ref())
}

fn finish<T>(response: T, result: TransitionResult) -> ApiResult<T> {
    ApiResult {
        response,
        audit_events: result.audit_events,
        new_state: result.new_state,
    }
}

/// Initialises a period, generating its slot catalog.
///
/// When the request carries no holiday list, the built-in holiday table is
/// used.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - The year/month is not a calendar month
pub fn init_period(
    state: &AllocationState,
    lottery: &mut Lottery,
    request: InitPeriodRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<InitPeriodResponse>, ApiError> {
    AuthorizationService::authorize_init_period(authenticated_actor)?;

    let period: Period =
        Period::new(request.year, request.month).map_err(|e| translate_domain_error(&e))?;
    let holidays: HolidayTable = match request.holidays {
        Some(days) => {
            let mut table: HolidayTable = HolidayTable::new();
            table.add_days(period, days);
            table
        }
        None => HolidayTable::korea_2026(),
    };
    let holiday_days: Vec<u8> = holidays.days_for(&period);

    let result: TransitionResult = commit(
        state,
        Command::InitPeriod { period, holidays },
        lottery,
        authenticated_actor,
        cause,
    )?;

    let total_slots: usize = result.new_state.slots.len();
    let response: InitPeriodResponse = InitPeriodResponse {
        period: period.to_string(),
        total_slots,
        holidays: holiday_days,
        message: format!("Initialised {period} with {total_slots} slots"),
    };
    Ok(finish(response, result))
}

/// Runs the quota lottery over the given members.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - The member list is empty, has duplicates or blank names
/// - No period has been initialised
/// - Any slot is already bound
pub fn draw_quotas(
    state: &AllocationState,
    lottery: &mut Lottery,
    request: DrawQuotasRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<DrawQuotasResponse>, ApiError> {
    AuthorizationService::authorize_draw_quotas(authenticated_actor)?;

    let members: Vec<MemberId> = request
        .members
        .iter()
        .map(String::as_str)
        .map(MemberId::new)
        .collect();
    let result: TransitionResult = commit(
        state,
        Command::DrawQuotas { members },
        lottery,
        authenticated_actor,
        cause,
    )?;

    let Outcome::QuotasDrawn {
        draw,
        order_cleared,
    } = &result.outcome
    else {
        return Err(unexpected_outcome("DrawQuotas", &result.outcome));
    };
    if *order_cleared {
        warn!("Roster changed; the previous selection order was dropped");
    }

    let names = |group: &[MemberId]| -> Vec<String> {
        group.iter().map(ToString::to_string).collect()
    };
    let response: DrawQuotasResponse = DrawQuotasResponse {
        quotas: quota_entries(&result.new_state.ledger),
        high_value: draw.high_value,
        high_group: names(&draw.high_group),
        low_value: draw.low_value,
        low_group: names(&draw.low_group),
        order_cleared: *order_cleared,
        message: format!(
            "{} members hold {}, {} members hold {}",
            draw.high_group.len(),
            draw.high_value,
            draw.low_group.len(),
            draw.low_value
        ),
    };
    Ok(finish(response, result))
}

fn order_response(result: TransitionResult, verb: &str) -> ApiResult<OrderResponse> {
    let order: Vec<String> = result
        .new_state
        .sequencer
        .as_ref()
        .map(|seq| seq.order().iter().map(ToString::to_string).collect())
        .unwrap_or_default();
    let response: OrderResponse = OrderResponse {
        message: format!("{verb} order of {} members", order.len()),
        order,
        next_picker: next_picker(&result.new_state),
    };
    finish(response, result)
}

/// Shuffles the current roster into a new selection order.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or no quotas have been drawn.
pub fn draw_order(
    state: &AllocationState,
    lottery: &mut Lottery,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<OrderResponse>, ApiError> {
    AuthorizationService::authorize_order(authenticated_actor)?;
    let result: TransitionResult = commit(
        state,
        Command::DrawOrder,
        lottery,
        authenticated_actor,
        cause,
    )?;
    Ok(order_response(result, "Drew"))
}

/// Installs an explicit selection order.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the order is not a
/// permutation of the roster.
pub fn set_order(
    state: &AllocationState,
    lottery: &mut Lottery,
    request: SetOrderRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<OrderResponse>, ApiError> {
    AuthorizationService::authorize_order(authenticated_actor)?;
    let order: Vec<MemberId> = request
        .order
        .iter()
        .map(String::as_str)
        .map(MemberId::new)
        .collect();
    let result: TransitionResult = commit(
        state,
        Command::SetOrder { order },
        lottery,
        authenticated_actor,
        cause,
    )?;
    Ok(order_response(result, "Set"))
}

/// Assigns a slot, on turn or manually.
///
/// A request with `manual_target` is a manual assignment and requires the
/// Admin role. Manual assignments may overdraw the target's quota; this is
/// reported in the response and logged as a warning.
///
/// # Errors
///
/// Returns an error if:
/// - A manual assignment is requested by a non-Admin
/// - No order is active (turn mode)
/// - The slot does not exist or is already bound
/// - The current picker has no quota (turn mode)
/// - The manual target is not in the roster
pub fn assign_slot(
    state: &AllocationState,
    lottery: &mut Lottery,
    request: AssignSlotRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<AssignSlotResponse>, ApiError> {
    let mode: AssignMode = match request.manual_target {
        Some(target) => {
            AuthorizationService::authorize_manual_assign(authenticated_actor)?;
            AssignMode::Manual {
                target: MemberId::new(&target),
            }
        }
        None => {
            AuthorizationService::authorize(authenticated_actor, "assign_slot", Role::Picker)?;
            AssignMode::Turn
        }
    };

    let result: TransitionResult = commit(
        state,
        Command::AssignSlot {
            slot_id: SlotId::new(request.slot_id),
            mode,
        },
        lottery,
        authenticated_actor,
        cause,
    )?;

    let Outcome::SlotAssigned {
        slot,
        remaining_quota,
        overdrawn,
        ..
    } = &result.outcome
    else {
        return Err(unexpected_outcome("AssignSlot", &result.outcome));
    };
    let member: String = member_name(slot.owner.as_ref()).unwrap_or_default();
    if *overdrawn {
        warn!(
            member = %member,
            quota = remaining_quota,
            slot = %slot.id,
            "Manual assignment overdrew quota"
        );
    }

    let response: AssignSlotResponse = AssignSlotResponse {
        slot: SlotView::from(slot),
        message: format!("Slot {} (day {} {}) assigned to {member}", slot.id, slot.day, slot.kind),
        member,
        remaining_quota: *remaining_quota,
        overdrawn: *overdrawn,
        next_picker: next_picker(&result.new_state),
        auto_steps: auto_step_views(&result),
    };
    Ok(finish(response, result))
}

/// Passes a member's turn, handing their remaining quota to others.
///
/// Passing with no quota left succeeds without changing anything.
///
/// # Errors
///
/// Returns an error if the member is not in the roster or nobody can
/// receive the quota.
pub fn pass_turn(
    state: &AllocationState,
    lottery: &mut Lottery,
    request: PassTurnRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<PassTurnResponse>, ApiError> {
    AuthorizationService::authorize(authenticated_actor, "pass_turn", Role::Picker)?;

    let member: MemberId = MemberId::new(&request.member);
    let result: TransitionResult = commit(
        state,
        Command::PassTurn {
            member: member.clone(),
        },
        lottery,
        authenticated_actor,
        cause,
    )?;

    let Outcome::TurnPassed { redistribution, .. } = &result.outcome else {
        return Err(unexpected_outcome("PassTurn", &result.outcome));
    };
    let summary: Option<String> = redistribution.as_ref().map(Redistribution::summary);
    let response: PassTurnResponse = PassTurnResponse {
        message: summary
            .clone()
            .unwrap_or_else(|| format!("{member} has no quota to pass")),
        member: member.to_string(),
        summary,
        next_picker: next_picker(&result.new_state),
        auto_steps: auto_step_views(&result),
    };
    Ok(finish(response, result))
}

/// Clears a slot's owner and refunds one unit of their quota.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the slot is missing or
/// unbound.
pub fn release_slot(
    state: &AllocationState,
    lottery: &mut Lottery,
    request: ReleaseSlotRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<ReleaseSlotResponse>, ApiError> {
    AuthorizationService::authorize_release(authenticated_actor)?;

    let result: TransitionResult = commit(
        state,
        Command::ReleaseSlot {
            slot_id: SlotId::new(request.slot_id),
        },
        lottery,
        authenticated_actor,
        cause,
    )?;

    let Outcome::SlotReleased {
        slot,
        former_owner,
        refunded_quota,
    } = &result.outcome
    else {
        return Err(unexpected_outcome("ReleaseSlot", &result.outcome));
    };
    let response: ReleaseSlotResponse = ReleaseSlotResponse {
        slot: SlotView::from(slot),
        former_owner: former_owner.to_string(),
        refunded_quota: *refunded_quota,
        next_picker: next_picker(&result.new_state),
        auto_steps: auto_step_views(&result),
        message: format!("Slot {} released from {former_owner}", slot.id),
    };
    Ok(finish(response, result))
}

/// Restores the most recent snapshot.
///
/// Auto-fill stays paused until the next command.
///
/// # Errors
///
/// Returns an error if there is nothing to undo.
pub fn undo(
    state: &AllocationState,
    lottery: &mut Lottery,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<UndoResponse>, ApiError> {
    AuthorizationService::authorize(authenticated_actor, "undo", Role::Picker)?;

    let result: TransitionResult =
        commit(state, Command::Undo, lottery, authenticated_actor, cause)?;
    let remaining_history: usize = result.new_state.history.len();
    let response: UndoResponse = UndoResponse {
        remaining_history,
        next_picker: next_picker(&result.new_state),
        message: format!("Undone; {remaining_history} snapshots left"),
    };
    Ok(finish(response, result))
}

fn profile_response(
    result: &TransitionResult,
    member: &MemberId,
    rejected_tokens: Vec<String>,
    message: String,
) -> ProfileResponse {
    let profile: MemberProfile = result.new_state.profile(member);
    ProfileResponse {
        member: member.to_string(),
        absent: profile.absent,
        preferences: profile.preferences.iter().map(|id| id.index()).collect(),
        remaining: result
            .new_state
            .remaining_preferences(member)
            .iter()
            .map(|id| id.index())
            .collect(),
        rejected_tokens,
        next_picker: next_picker(&result.new_state),
        auto_steps: auto_step_views(result),
        message,
    }
}

/// Marks a member absent or present.
///
/// Marking the current picker absent lets the preference resolver act
/// straight away.
///
/// # Errors
///
/// Returns an error if the member name is blank.
pub fn set_absent(
    state: &AllocationState,
    lottery: &mut Lottery,
    request: SetAbsentRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<ProfileResponse>, ApiError> {
    AuthorizationService::authorize(authenticated_actor, "set_absent", Role::Picker)?;

    let member: MemberId = MemberId::new(&request.member);
    let result: TransitionResult = commit(
        state,
        Command::SetAbsent {
            member: member.clone(),
            absent: request.absent,
        },
        lottery,
        authenticated_actor,
        cause,
    )?;

    let status: &str = if request.absent { "absent" } else { "present" };
    let response: ProfileResponse =
        profile_response(&result, &member, Vec::new(), format!("{member} marked {status}"));
    Ok(finish(response, result))
}

/// Replaces a member's preference list from operator text.
///
/// Tokens that are not slot ids are dropped and reported in the response.
///
/// # Errors
///
/// Returns an error if the member name is blank.
pub fn set_preferences(
    state: &AllocationState,
    lottery: &mut Lottery,
    request: SetPreferencesRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<ProfileResponse>, ApiError> {
    AuthorizationService::authorize(authenticated_actor, "set_preferences", Role::Picker)?;

    let member: MemberId = MemberId::new(&request.member);
    let parsed: ParsedPreferences = parse_preferences(&request.preferences);
    for token in &parsed.rejected {
        warn!(member = %member, token = %token, "Dropped preference token");
    }

    let result: TransitionResult = commit(
        state,
        Command::SetPreferences {
            member: member.clone(),
            preferences: parsed.ids.clone(),
        },
        lottery,
        authenticated_actor,
        cause,
    )?;

    let message: String = format!("{member} now lists {} preferences", parsed.ids.len());
    let response: ProfileResponse = profile_response(&result, &member, parsed.rejected, message);
    Ok(finish(response, result))
}

/// Re-enables auto-fill after an undo.
///
/// # Errors
///
/// This operation has no domain preconditions; it fails only on
/// authorization.
pub fn resume_auto_fill(
    state: &AllocationState,
    lottery: &mut Lottery,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<ResumeAutoFillResponse>, ApiError> {
    AuthorizationService::authorize(authenticated_actor, "resume_auto_fill", Role::Picker)?;

    let result: TransitionResult = commit(
        state,
        Command::ResumeAutoFill,
        lottery,
        authenticated_actor,
        cause,
    )?;
    let response: ResumeAutoFillResponse = ResumeAutoFillResponse {
        next_picker: next_picker(&result.new_state),
        auto_steps: auto_step_views(&result),
        message: format!("Auto-fill resumed, {} steps taken", result.auto_steps.len()),
    };
    Ok(finish(response, result))
}

fn member_view(state: &AllocationState, member: &MemberId) -> MemberView {
    let profile: MemberProfile = state.profile(member);
    MemberView {
        member: member.to_string(),
        quota: state.ledger.contains(member).then(|| state.ledger.get(member)),
        absent: profile.absent,
        preferences: profile.preferences.iter().map(|id| id.index()).collect(),
        remaining: state
            .remaining_preferences(member)
            .iter()
            .map(|id| id.index())
            .collect(),
    }
}

/// Read-only view of the full state.
#[must_use]
pub fn get_state(state: &AllocationState) -> StateResponse {
    StateResponse {
        period: state.period.as_ref().map(ToString::to_string),
        slots: state.slots.iter().map(SlotView::from).collect(),
        members: state
            .roster
            .iter()
            .map(|member| member_view(state, member))
            .collect(),
        order: state
            .sequencer
            .as_ref()
            .map(|seq| seq.order().iter().map(ToString::to_string).collect())
            .unwrap_or_default(),
        next_picker: next_picker(state),
        sequencer_state: state.sequencer_state().to_string(),
        history_len: state.history.len(),
        history_capacity: state.history.capacity(),
        last_action_log: state.last_action_log.clone(),
        undo_pending: state.undo_pending,
        redistribution_policy: state.config.redistribution.to_string(),
    }
}

/// A single member's profile and remaining preferences.
///
/// # Errors
///
/// Returns an error if the member is neither in the roster nor has a
/// stored profile.
pub fn get_member(state: &AllocationState, name: &str) -> Result<MemberView, ApiError> {
    let member: MemberId = MemberId::new(name);
    if !state.has_member(&member) && !state.profiles.contains_key(&member) {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Member"),
            message: format!("Member '{member}' is not in the roster"),
        });
    }
    Ok(member_view(state, &member))
}

/// Per-member day and night counts for export.
#[must_use]
pub fn get_summary(state: &AllocationState) -> SummaryResponse {
    SummaryResponse {
        period: state.period.as_ref().map(ToString::to_string),
        members: state.summary().into_iter().map(TallyEntry::from).collect(),
    }
}

/// Overall allocation progress.
#[must_use]
pub fn get_progress(state: &AllocationState) -> ProgressResponse {
    let progress: AllocationProgress = state.progress();
    ProgressResponse {
        total_slots: progress.total_slots,
        assigned: progress.assigned,
        percent: progress.percent,
        sequencer_state: state.sequencer_state().to_string(),
        next_picker: next_picker(state),
    }
}
