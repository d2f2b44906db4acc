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

mod config;
mod sweep;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use decrees::{Collaborators, Council, CouncilRoster, SharedRules, SystemClock, TracingNotifier};
use decrees_api::{
    ApiError, AuthenticatedActor, AuthorizationService, CastVoteRequest, CastVoteResponse,
    CreateDecreeRequest, DecreeInfo, DecreeResponse, DeleteDecreeRequest, DeleteDecreeResponse,
    EditDecreeRequest, ForceStatusRequest, HistoryPageResponse, HistoryRequest,
    ListDecreesRequest, ListDecreesResponse, RulesResponse, SeatStatsInfo, SeatStatsResponse,
    SweepResponse, authenticate, cast_vote, create_decree, delete_decree, edit_decree,
    force_status, get_decree, get_history, get_rules, get_seat_stats, get_seat_stats_for,
    list_decrees, open_decree, run_sweep,
};
use decrees_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::config::{ConfigError, LoadedConfig};

/// Council Decrees Server - HTTP server for the council decrees engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Directory holding `voting_rules.json` and `council.json`
    #[arg(short, long, default_value = "config")]
    config_dir: PathBuf,

    /// Seconds between periodic expiry sweeps
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    sweep_interval_secs: u64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The decree engine, serialized behind one lock.
    council: Arc<Mutex<Council<Persistence>>>,
    /// Hot-reloadable rules shared with the engine.
    rules: SharedRules,
    /// Hot-reloadable roster shared with the engine.
    roster: CouncilRoster,
    /// Where the configuration files live.
    config_dir: PathBuf,
}

/// Actor fields carried by every mutating request.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorApiRequest {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
}

/// API request for creating a decree.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateDecreeApiRequest {
    actor_id: String,
    actor_role: String,
    title: String,
    author_seat: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
}

/// API request for casting a vote.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CastVoteApiRequest {
    actor_id: String,
    actor_role: String,
    seat_id: String,
    /// `yes`, `no` or `abstain`.
    choice: String,
}

/// API request for forcing a status.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ForceStatusApiRequest {
    actor_id: String,
    actor_role: String,
    status: String,
}

/// API request for editing a decree.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct EditDecreeApiRequest {
    actor_id: String,
    actor_role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry_days: Option<u32>,
    #[serde(default)]
    clear_expiry: bool,
}

/// API request for deleting a draft.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct DeleteDecreeApiRequest {
    actor_id: String,
    actor_role: String,
    /// Nothing is deleted unless this is true.
    #[serde(default)]
    confirm: bool,
}

/// Query parameters for listing decrees.
#[derive(Debug, Default, Deserialize)]
struct ListDecreesQuery {
    status: Option<String>,
    category: Option<String>,
    author: Option<String>,
}

/// Query parameters for the history log.
#[derive(Debug, Default, Deserialize)]
struct HistoryQuery {
    page: Option<usize>,
    order: Option<String>,
}

/// API response for a configuration reload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ReloadConfigResponse {
    council_name: String,
    seats: usize,
    active_seats: usize,
    rules: RulesResponse,
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
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<ConfigError> for HttpError {
    fn from(err: ConfigError) -> Self {
        error!(error = %err, "Configuration error");
        let status: StatusCode = match err {
            ConfigError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ConfigError::Parse { .. } | ConfigError::InvalidRules { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };
        Self {
            status,
            message: format!("Configuration error: {err}"),
        }
    }
}

fn authenticate_actor(actor_id: &str, actor_role: &str) -> Result<AuthenticatedActor, HttpError> {
    authenticate(actor_id, actor_role).map_err(|e| HttpError::from(ApiError::from(e)))
}

/// Handler for POST `/decrees` endpoint.
async fn handle_create_decree(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateDecreeApiRequest>,
) -> Result<Json<DecreeResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        role = %req.actor_role,
        author_seat = %req.author_seat,
        "Handling create_decree request"
    );
    let actor: AuthenticatedActor = authenticate_actor(&req.actor_id, &req.actor_role)?;

    let request: CreateDecreeRequest = CreateDecreeRequest {
        title: req.title,
        author_seat: req.author_seat,
        description: req.description,
        category: req.category,
    };
    let mut council = app_state.council.lock().await;
    let response: DecreeResponse = create_decree(&mut council, request, &actor)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for GET `/decrees` endpoint.
async fn handle_list_decrees(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListDecreesQuery>,
) -> Result<Json<ListDecreesResponse>, HttpError> {
    info!(status = ?query.status, category = ?query.category, author = ?query.author, "Handling list_decrees request");

    let request: ListDecreesRequest = ListDecreesRequest {
        status: query.status,
        category: query.category,
        author: query.author,
    };
    let council = app_state.council.lock().await;
    let response: ListDecreesResponse = list_decrees(&council, &request)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for GET `/decrees/{decree_id}` endpoint.
async fn handle_get_decree(
    AxumState(app_state): AxumState<AppState>,
    Path(decree_id): Path<i64>,
) -> Result<Json<DecreeInfo>, HttpError> {
    info!(decree_id, "Handling get_decree request");

    let council = app_state.council.lock().await;
    let response: DecreeInfo = get_decree(&council, decree_id)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for POST `/decrees/{decree_id}/open` endpoint.
async fn handle_open_decree(
    AxumState(app_state): AxumState<AppState>,
    Path(decree_id): Path<i64>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<DecreeResponse>, HttpError> {
    info!(actor_id = %req.actor_id, decree_id, "Handling open_decree request");
    let actor: AuthenticatedActor = authenticate_actor(&req.actor_id, &req.actor_role)?;

    let mut council = app_state.council.lock().await;
    let response: DecreeResponse = open_decree(&mut council, decree_id, &actor)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for POST `/decrees/{decree_id}/votes` endpoint.
async fn handle_cast_vote(
    AxumState(app_state): AxumState<AppState>,
    Path(decree_id): Path<i64>,
    Json(req): Json<CastVoteApiRequest>,
) -> Result<Json<CastVoteResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        decree_id,
        seat_id = %req.seat_id,
        "Handling cast_vote request"
    );
    let actor: AuthenticatedActor = authenticate_actor(&req.actor_id, &req.actor_role)?;

    let request: CastVoteRequest = CastVoteRequest {
        seat_id: req.seat_id,
        choice: req.choice,
    };
    let mut council = app_state.council.lock().await;
    let response: CastVoteResponse = cast_vote(&mut council, decree_id, request, &actor)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for POST `/decrees/{decree_id}/force` endpoint.
async fn handle_force_status(
    AxumState(app_state): AxumState<AppState>,
    Path(decree_id): Path<i64>,
    Json(req): Json<ForceStatusApiRequest>,
) -> Result<Json<DecreeResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        decree_id,
        status = %req.status,
        "Handling force_status request"
    );
    let actor: AuthenticatedActor = authenticate_actor(&req.actor_id, &req.actor_role)?;

    let request: ForceStatusRequest = ForceStatusRequest { status: req.status };
    let mut council = app_state.council.lock().await;
    let response: DecreeResponse = force_status(&mut council, decree_id, request, &actor)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for POST `/decrees/{decree_id}/edit` endpoint.
async fn handle_edit_decree(
    AxumState(app_state): AxumState<AppState>,
    Path(decree_id): Path<i64>,
    Json(req): Json<EditDecreeApiRequest>,
) -> Result<Json<DecreeResponse>, HttpError> {
    info!(actor_id = %req.actor_id, decree_id, "Handling edit_decree request");
    let actor: AuthenticatedActor = authenticate_actor(&req.actor_id, &req.actor_role)?;

    let request: EditDecreeRequest = EditDecreeRequest {
        title: req.title,
        description: req.description,
        category: req.category,
        expiry_days: req.expiry_days,
        clear_expiry: req.clear_expiry,
    };
    let mut council = app_state.council.lock().await;
    let response: DecreeResponse = edit_decree(&mut council, decree_id, request, &actor)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for DELETE `/decrees/{decree_id}` endpoint.
async fn handle_delete_decree(
    AxumState(app_state): AxumState<AppState>,
    Path(decree_id): Path<i64>,
    Json(req): Json<DeleteDecreeApiRequest>,
) -> Result<Json<DeleteDecreeResponse>, HttpError> {
    info!(
        actor_id = %req.actor_id,
        decree_id,
        confirm = req.confirm,
        "Handling delete_decree request"
    );
    let actor: AuthenticatedActor = authenticate_actor(&req.actor_id, &req.actor_role)?;

    let request: DeleteDecreeRequest = DeleteDecreeRequest {
        confirm: req.confirm,
    };
    let mut council = app_state.council.lock().await;
    let response: DeleteDecreeResponse = delete_decree(&mut council, decree_id, request, &actor)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for GET `/history` endpoint.
async fn handle_get_history(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryPageResponse>, HttpError> {
    info!(page = ?query.page, order = ?query.order, "Handling get_history request");

    let request: HistoryRequest = HistoryRequest {
        page: query.page,
        order: query.order,
    };
    let council = app_state.council.lock().await;
    let response: HistoryPageResponse = get_history(&council, &request)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for POST `/sweep` endpoint.
async fn handle_sweep(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<SweepResponse>, HttpError> {
    info!(actor_id = %req.actor_id, "Handling sweep request");
    let actor: AuthenticatedActor = authenticate_actor(&req.actor_id, &req.actor_role)?;

    let mut council = app_state.council.lock().await;
    let response: SweepResponse = run_sweep(&mut council, &actor)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for GET `/rules` endpoint.
async fn handle_get_rules(AxumState(app_state): AxumState<AppState>) -> Json<RulesResponse> {
    let council = app_state.council.lock().await;
    let response: RulesResponse = get_rules(&council);
    drop(council);

    Json(response)
}

/// Handler for GET `/stats/seats` endpoint.
async fn handle_seat_stats(AxumState(app_state): AxumState<AppState>) -> Json<SeatStatsResponse> {
    info!("Handling seat_stats request");

    let council = app_state.council.lock().await;
    let response: SeatStatsResponse = get_seat_stats(&council);
    drop(council);

    Json(response)
}

/// Handler for GET `/stats/seats/{seat_id}` endpoint.
async fn handle_seat_stats_for(
    AxumState(app_state): AxumState<AppState>,
    Path(seat_id): Path<String>,
) -> Result<Json<SeatStatsInfo>, HttpError> {
    info!(seat_id = %seat_id, "Handling seat_stats request");

    let council = app_state.council.lock().await;
    let response: SeatStatsInfo = get_seat_stats_for(&council, &seat_id)?;
    drop(council);

    Ok(Json(response))
}

/// Handler for POST `/config/reload` endpoint.
///
/// Re-reads both configuration files. Nothing is replaced unless both load.
/// Decrees already in `Voting` keep their stored deadline.
async fn handle_reload_config(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ActorApiRequest>,
) -> Result<Json<ReloadConfigResponse>, HttpError> {
    info!(actor_id = %req.actor_id, "Handling reload_config request");
    let actor: AuthenticatedActor = authenticate_actor(&req.actor_id, &req.actor_role)?;
    AuthorizationService::authorize_reload_config(&actor).map_err(ApiError::from)?;

    let loaded: LoadedConfig = config::load(&app_state.config_dir)?;
    let council_name: String = loaded.council.council_name.clone();
    let seats: usize = loaded.council.seats.len();
    let active_seats: usize = loaded.council.active_seat_count();

    app_state
        .rules
        .replace(loaded.rules)
        .map_err(decrees_api::translate_domain_error)?;
    app_state.roster.replace(loaded.council.seats);

    let council = app_state.council.lock().await;
    let rules: RulesResponse = get_rules(&council);
    drop(council);

    info!(council = %council_name, seats, active_seats, "Configuration reloaded");
    Ok(Json(ReloadConfigResponse {
        council_name,
        seats,
        active_seats,
        rules,
    }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/decrees", post(handle_create_decree).get(handle_list_decrees))
        .route(
            "/decrees/{decree_id}",
            get(handle_get_decree).delete(handle_delete_decree),
        )
        .route("/decrees/{decree_id}/open", post(handle_open_decree))
        .route("/decrees/{decree_id}/votes", post(handle_cast_vote))
        .route("/decrees/{decree_id}/force", post(handle_force_status))
        .route("/decrees/{decree_id}/edit", post(handle_edit_decree))
        .route("/history", get(handle_get_history))
        .route("/sweep", post(handle_sweep))
        .route("/rules", get(handle_get_rules))
        .route("/stats/seats", get(handle_seat_stats))
        .route("/stats/seats/{seat_id}", get(handle_seat_stats_for))
        .route("/config/reload", post(handle_reload_config))
        .with_state(app_state)
}

/// Builds the shared state from loaded configuration and a storage backend.
///
/// # Errors
///
/// Returns an error if the stored decrees cannot be loaded.
fn build_app_state(
    loaded: LoadedConfig,
    persistence: Persistence,
    config_dir: PathBuf,
) -> Result<AppState, decrees::CoreError> {
    let rules: SharedRules = SharedRules::new(loaded.rules);
    let roster: CouncilRoster = CouncilRoster::new(loaded.council.seats);
    let collaborators: Collaborators = Collaborators {
        roster: Arc::new(roster.clone()),
        rules: Arc::new(rules.clone()),
        clock: Arc::new(SystemClock),
        notifier: Arc::new(TracingNotifier),
    };
    let council: Council<Persistence> = Council::new(persistence, collaborators)?;

    Ok(AppState {
        council: Arc::new(Mutex::new(council)),
        rules,
        roster,
        config_dir,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Council Decrees Server");

    let loaded: LoadedConfig = config::load(&args.config_dir)?;

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = build_app_state(loaded, persistence, args.config_dir.clone())?;

    // Catch up on anything that expired while the server was down
    let report = app_state.council.lock().await.sweep();
    info!(
        examined = report.examined,
        finalized = report.finalized.len(),
        "Startup sweep complete"
    );

    let _sweeper = sweep::spawn_sweep_task(
        Arc::clone(&app_state.council),
        std::time::Duration::from_secs(args.sweep_interval_secs),
    );

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
