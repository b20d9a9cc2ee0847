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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

use axum::{
    Json, Router,
    extract::{FromRef, Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, ValueEnum};
use duty_roster::{AllocationState, EngineConfig, Lottery, RedistributionPolicy};
use duty_roster_api::{
    ApiError, ApiResult, AssignSlotRequest, AssignSlotResponse, AuthenticatedActor,
    DrawQuotasRequest, DrawQuotasResponse, InitPeriodRequest, InitPeriodResponse, MemberView,
    OrderResponse, PassTurnRequest, PassTurnResponse, ProfileResponse, ProgressResponse,
    ReleaseSlotRequest, ReleaseSlotResponse, ResumeAutoFillResponse, Role, SetAbsentRequest,
    SetOrderRequest, SetPreferencesRequest, StateResponse, SummaryResponse, UndoResponse,
    assign_slot, authenticate_stub, draw_order, draw_quotas, get_member, get_progress, get_state,
    get_summary, init_period, pass_turn, release_slot, resume_auto_fill, set_absent, set_order,
    set_preferences, undo,
};
use duty_roster_audit::{AuditEntry, Cause};
use live::{LiveEvent, LiveEventBroadcaster, live_events_handler};
use serde::{Deserialize, Serialize};
use session::{RosterRegistry, RosterSession, SharedRoster};
use std::sync::Arc;
use tracing::{error, info};

/// Duty Roster Server - HTTP service for the duty roster lottery
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Fixed lottery seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,

    /// Who may receive forfeited quota
    #[arg(long, value_enum, default_value_t = PolicyArg::AllOthers)]
    redistribution: PolicyArg,

    /// Number of undo snapshots kept per roster
    #[arg(long, default_value_t = duty_roster::DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// Audit entries kept per roster; the oldest are dropped first
    #[arg(long, default_value_t = duty_roster_audit::DEFAULT_AUDIT_CAPACITY)]
    audit_capacity: usize,

    /// Log filter, overriding `RUST_LOG`
    #[arg(long)]
    log_level: Option<String>,
}

/// Command-line form of `RedistributionPolicy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Every other roster member.
    AllOthers,
    /// Other members who still hold quota.
    OthersWithQuota,
}

impl From<PolicyArg> for RedistributionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::AllOthers => Self::AllOthers,
            PolicyArg::OthersWithQuota => Self::OthersWithQuota,
        }
    }
}

/// Errors that stop the server from starting or serving.
#[derive(Debug, thiserror::Error)]
enum ServerError {
    /// The bind address could not be parsed.
    #[error("invalid bind address: {0}")]
    BindAddress(#[from] std::net::AddrParseError),
    /// The listener failed.
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// All rosters, each behind its own lock.
    rosters: Arc<RosterRegistry>,
    /// Broadcaster for live events.
    live: Arc<LiveEventBroadcaster>,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(app_state: &AppState) -> Self {
        Arc::clone(&app_state.live)
    }
}

/// Actor and cause carried by every write request.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    #[serde(default)]
    cause_description: String,
}

/// A write request: actor fields plus the operation's own body.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct WriteRequest<T> {
    #[serde(flatten)]
    actor: ActorRequest,
    #[serde(flatten)]
    body: T,
}

/// Response envelope for a committed write.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse<T> {
    /// The roster written to.
    roster: String,
    /// Audit sequence of the command's event.
    audit_sequence: u64,
    /// The operation's response.
    #[serde(flatten)]
    response: T,
}

/// List of roster names.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RostersResponse {
    /// Roster names, sorted.
    rosters: Vec<String>,
}

/// Query parameters for the audit trail.
#[derive(Debug, Deserialize)]
struct AuditQuery {
    /// Only entries after this sequence.
    since: Option<u64>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal API error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

fn roster_not_found(roster: &str) -> HttpError {
    HttpError {
        status: StatusCode::NOT_FOUND,
        message: format!("Roster '{roster}' not found"),
    }
}

/// Parses and authenticates the actor fields of a write request.
fn authenticate(req: &ActorRequest) -> Result<(AuthenticatedActor, Cause), HttpError> {
    let role: Role = req.actor_role.parse().map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: format!("Invalid role: {e}. Must be 'admin' or 'picker'"),
    })?;
    let actor: AuthenticatedActor =
        authenticate_stub(req.actor_id.clone(), role).map_err(|e| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: e.to_string(),
        })?;
    let cause: Cause = Cause::new(req.cause_id.clone(), req.cause_description.clone());
    Ok((actor, cause))
}

/// Runs one write against a roster under its lock.
///
/// The new state replaces the old one only on success; audit events are
/// recorded and a live event is broadcast after the lock is released.
async fn commit_write<T, F>(
    app_state: &AppState,
    roster: String,
    req: &ActorRequest,
    operation: F,
) -> Result<Json<WriteResponse<T>>, HttpError>
where
    F: FnOnce(
        &AllocationState,
        &mut Lottery,
        &AuthenticatedActor,
        Cause,
    ) -> Result<ApiResult<T>, ApiError>,
{
    let (actor, cause) = authenticate(req)?;
    let shared: SharedRoster = app_state.rosters.get_or_create(&roster).await;

    let mut session = shared.write().await;
    let RosterSession {
        state,
        lottery,
        audit,
    } = &mut *session;
    let result: ApiResult<T> = operation(state, lottery, &actor, cause)?;

    let action: String = result
        .audit_events
        .first()
        .map(|event| event.action.name.clone())
        .unwrap_or_default();
    let auto_steps: usize = result.audit_events.len().saturating_sub(1);
    let sequences: Vec<u64> = result
        .audit_events
        .into_iter()
        .map(|event| audit.record(event))
        .collect();
    *state = result.new_state;

    let audit_sequence: u64 = sequences.first().copied().unwrap_or_default();
    let event: LiveEvent = LiveEvent::Committed {
        roster: roster.clone(),
        action,
        audit_sequence,
        auto_steps,
        assigned: state.assigned_count(),
        total_slots: state.slots.len(),
        next_picker: state.next_picker().as_ref().map(ToString::to_string),
    };
    drop(session);

    info!(roster = %roster, audit_sequence, "Committed write");
    app_state.live.broadcast(&event);

    Ok(Json(WriteResponse {
        roster,
        audit_sequence,
        response: result.response,
    }))
}

async fn read_roster<T, F>(app_state: &AppState, roster: &str, view: F) -> Result<T, HttpError>
where
    F: FnOnce(&RosterSession) -> T,
{
    let shared: SharedRoster = app_state
        .rosters
        .get(roster)
        .await
        .ok_or_else(|| roster_not_found(roster))?;
    let session = shared.read().await;
    Ok(view(&session))
}

/// Handler for POST `/rosters/{roster}/period`.
async fn handle_init_period(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<WriteRequest<InitPeriodRequest>>,
) -> Result<Json<WriteResponse<InitPeriodResponse>>, HttpError> {
    info!(roster = %roster, actor_id = %req.actor.actor_id, "Handling init period request");
    let body: InitPeriodRequest = req.body;
    commit_write(&app_state, roster, &req.actor, |state, lottery, actor, cause| {
        init_period(state, lottery, body, actor, cause)
    })
    .await
}

/// Handler for POST `/rosters/{roster}/quotas`.
async fn handle_draw_quotas(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<WriteRequest<DrawQuotasRequest>>,
) -> Result<Json<WriteResponse<DrawQuotasResponse>>, HttpError> {
    info!(roster = %roster, actor_id = %req.actor.actor_id, "Handling draw quotas request");
    let body: DrawQuotasRequest = req.body;
    commit_write(&app_state, roster, &req.actor, |state, lottery, actor, cause| {
        draw_quotas(state, lottery, body, actor, cause)
    })
    .await
}

/// Handler for POST `/rosters/{roster}/order/draw`.
async fn handle_draw_order(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<WriteResponse<OrderResponse>>, HttpError> {
    info!(roster = %roster, actor_id = %req.actor_id, "Handling draw order request");
    commit_write(&app_state, roster, &req, draw_order).await
}

/// Handler for POST `/rosters/{roster}/order`.
async fn handle_set_order(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<WriteRequest<SetOrderRequest>>,
) -> Result<Json<WriteResponse<OrderResponse>>, HttpError> {
    info!(roster = %roster, actor_id = %req.actor.actor_id, "Handling set order request");
    let body: SetOrderRequest = req.body;
    commit_write(&app_state, roster, &req.actor, |state, lottery, actor, cause| {
        set_order(state, lottery, body, actor, cause)
    })
    .await
}

/// Handler for POST `/rosters/{roster}/assign`.
async fn handle_assign_slot(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<WriteRequest<AssignSlotRequest>>,
) -> Result<Json<WriteResponse<AssignSlotResponse>>, HttpError> {
    info!(
        roster = %roster,
        actor_id = %req.actor.actor_id,
        slot_id = req.body.slot_id,
        "Handling assign slot request"
    );
    let body: AssignSlotRequest = req.body;
    commit_write(&app_state, roster, &req.actor, |state, lottery, actor, cause| {
        assign_slot(state, lottery, body, actor, cause)
    })
    .await
}

/// Handler for POST `/rosters/{roster}/pass`.
async fn handle_pass_turn(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<WriteRequest<PassTurnRequest>>,
) -> Result<Json<WriteResponse<PassTurnResponse>>, HttpError> {
    info!(
        roster = %roster,
        actor_id = %req.actor.actor_id,
        member = %req.body.member,
        "Handling pass request",
    );
    let body: PassTurnRequest = req.body;
    commit_write(&app_state, roster, &req.actor, |state, lottery, actor, cause| {
        pass_turn(state, lottery, body, actor, cause)
    })
    .await
}

/// Handler for POST `/rosters/{roster}/release`.
async fn handle_release_slot(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<WriteRequest<ReleaseSlotRequest>>,
) -> Result<Json<WriteResponse<ReleaseSlotResponse>>, HttpError> {
    info!(roster = %roster, actor_id = %req.actor.actor_id, "Handling release request");
    let body: ReleaseSlotRequest = req.body;
    commit_write(&app_state, roster, &req.actor, |state, lottery, actor, cause| {
        release_slot(state, lottery, body, actor, cause)
    })
    .await
}

/// Handler for POST `/rosters/{roster}/undo`.
async fn handle_undo(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<WriteResponse<UndoResponse>>, HttpError> {
    info!(roster = %roster, actor_id = %req.actor_id, "Handling undo request");
    commit_write(&app_state, roster, &req, undo).await
}

/// Handler for POST `/rosters/{roster}/absent`.
async fn handle_set_absent(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<WriteRequest<SetAbsentRequest>>,
) -> Result<Json<WriteResponse<ProfileResponse>>, HttpError> {
    info!(
        roster = %roster,
        actor_id = %req.actor.actor_id,
        member = %req.body.member,
        "Handling absence request",
    );
    let body: SetAbsentRequest = req.body;
    commit_write(&app_state, roster, &req.actor, |state, lottery, actor, cause| {
        set_absent(state, lottery, body, actor, cause)
    })
    .await
}

/// Handler for POST `/rosters/{roster}/preferences`.
async fn handle_set_preferences(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<WriteRequest<SetPreferencesRequest>>,
) -> Result<Json<WriteResponse<ProfileResponse>>, HttpError> {
    info!(
        roster = %roster,
        actor_id = %req.actor.actor_id,
        member = %req.body.member,
        "Handling preferences request",
    );
    let body: SetPreferencesRequest = req.body;
    commit_write(&app_state, roster, &req.actor, |state, lottery, actor, cause| {
        set_preferences(state, lottery, body, actor, cause)
    })
    .await
}

/// Handler for POST `/rosters/{roster}/resume`.
async fn handle_resume_auto_fill(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Json(req): Json<ActorRequest>,
) -> Result<Json<WriteResponse<ResumeAutoFillResponse>>, HttpError> {
    info!(roster = %roster, actor_id = %req.actor_id, "Handling resume auto-fill request");
    commit_write(&app_state, roster, &req, resume_auto_fill).await
}

/// Handler for GET `/rosters`.
async fn handle_list_rosters(AxumState(app_state): AxumState<AppState>) -> Json<RostersResponse> {
    Json(RostersResponse {
        rosters: app_state.rosters.names().await,
    })
}

/// Handler for GET `/rosters/{roster}/state`.
async fn handle_get_state(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
) -> Result<Json<StateResponse>, HttpError> {
    read_roster(&app_state, &roster, |session| get_state(&session.state))
        .await
        .map(Json)
}

/// Handler for GET `/rosters/{roster}/summary`.
async fn handle_get_summary(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
) -> Result<Json<SummaryResponse>, HttpError> {
    read_roster(&app_state, &roster, |session| get_summary(&session.state))
        .await
        .map(Json)
}

/// Handler for GET `/rosters/{roster}/progress`.
async fn handle_get_progress(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
) -> Result<Json<ProgressResponse>, HttpError> {
    read_roster(&app_state, &roster, |session| get_progress(&session.state))
        .await
        .map(Json)
}

/// Handler for GET `/rosters/{roster}/members/{member}`.
async fn handle_get_member(
    AxumState(app_state): AxumState<AppState>,
    Path((roster, member)): Path<(String, String)>,
) -> Result<Json<MemberView>, HttpError> {
    let view: Result<MemberView, ApiError> =
        read_roster(&app_state, &roster, |session| get_member(&session.state, &member)).await?;
    Ok(Json(view?))
}

/// Handler for GET `/rosters/{roster}/audit`.
async fn handle_get_audit(
    AxumState(app_state): AxumState<AppState>,
    Path(roster): Path<String>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<Vec<AuditEntry>>, HttpError> {
    read_roster(&app_state, &roster, |session| {
        session.audit.since(query.since.unwrap_or(0)).to_vec()
    })
    .await
    .map(Json)
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/rosters", get(handle_list_rosters))
        .route("/rosters/{roster}/period", post(handle_init_period))
        .route("/rosters/{roster}/quotas", post(handle_draw_quotas))
        .route("/rosters/{roster}/order", post(handle_set_order))
        .route("/rosters/{roster}/order/draw", post(handle_draw_order))
        .route("/rosters/{roster}/assign", post(handle_assign_slot))
        .route("/rosters/{roster}/pass", post(handle_pass_turn))
        .route("/rosters/{roster}/release", post(handle_release_slot))
        .route("/rosters/{roster}/undo", post(handle_undo))
        .route("/rosters/{roster}/absent", post(handle_set_absent))
        .route("/rosters/{roster}/preferences", post(handle_set_preferences))
        .route("/rosters/{roster}/resume", post(handle_resume_auto_fill))
        .route("/rosters/{roster}/state", get(handle_get_state))
        .route("/rosters/{roster}/summary", get(handle_get_summary))
        .route("/rosters/{roster}/progress", get(handle_get_progress))
        .route("/rosters/{roster}/members/{member}", get(handle_get_member))
        .route("/rosters/{roster}/audit", get(handle_get_audit))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

fn init_tracing(log_level: Option<&str>) {
    let filter: tracing_subscriber::EnvFilter = log_level.map_or_else(
        || {
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
        },
        tracing_subscriber::EnvFilter::new,
    );
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let args: Args = Args::parse();
    init_tracing(args.log_level.as_deref());

    info!("Initializing Duty Roster Server");

    let config: EngineConfig = EngineConfig {
        history_capacity: args.history_capacity,
        redistribution: args.redistribution.into(),
    };
    match args.seed {
        Some(seed) => info!(seed, "Using fixed lottery seed"),
        None => info!("Using entropy-seeded lotteries"),
    }
    info!(
        history_capacity = config.history_capacity,
        redistribution = %config.redistribution,
        "Engine configuration"
    );

    let app_state: AppState = AppState {
        rosters: Arc::new(
            RosterRegistry::new(config, args.seed).with_audit_capacity(args.audit_capacity),
        ),
        live: Arc::new(LiveEventBroadcaster::new()),
    };
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
