//! HTTP API: shared state, router, and request handlers.
//!
//! A thin axum layer over the [`Ledger`] and the community [`FeedClient`].
//! Every ledger rejection maps to a distinct status + `code` so clients
//! can explain why an action failed; the feed endpoint never fails, it
//! falls back to sample posts instead.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use nudge_core::{AwardEvent, Task, TaskDraft, TaskId, User};
use nudge_reddit::{FeedClient, RedditPost, submit_url};
use serde::{Deserialize, Serialize};

use crate::ledger::{DEFAULT_LEADERBOARD_LIMIT, Ledger, LedgerError};

/// Shared application state handed to every request handler.
pub struct AppState {
    /// The task & points rules layer.
    pub ledger: Ledger,
    /// Read-only community feed client (also names the subreddit used for
    /// cross-post links).
    pub feed: FeedClient,
    /// Default number of feed posts served when the request names no limit.
    pub feed_limit: u32,
}

impl AppState {
    /// Creates the shared state from its collaborators.
    #[must_use]
    pub fn new(ledger: Ledger, feed: FeedClient, feed_limit: u32) -> Self {
        Self {
            ledger,
            feed,
            feed_limit,
        }
    }
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable rejection code.
    pub code: String,
    /// Human-readable message.
    pub error: String,
}

/// A request failure: status code plus a distinguishable error body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl From<LedgerError> for ApiError {
    fn from(e: LedgerError) -> Self {
        let (status, code) = match &e {
            LedgerError::Validation(_) | LedgerError::EmptyUsername | LedgerError::ZeroAward => {
                (StatusCode::BAD_REQUEST, "validation")
            }
            LedgerError::TaskNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            LedgerError::SelfClaim(_) => (StatusCode::CONFLICT, "self_claim"),
            LedgerError::TaskNotOpen { .. } => (StatusCode::CONFLICT, "task_not_open"),
            LedgerError::AlreadyCompleted(_) => (StatusCode::CONFLICT, "already_completed"),
            LedgerError::Store(_) => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
        };
        Self {
            status,
            code,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code.to_string(),
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Builds the API router over the shared state.
#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/tasks", post(propose_task).get(list_tasks))
        .route("/api/tasks/{id}/claim", post(claim_task))
        .route("/api/tasks/{id}/complete", post(complete_task))
        .route("/api/tasks/{id}/crosspost", get(crosspost_link))
        .route("/api/awards", post(award_points))
        .route("/api/leaderboard", get(leaderboard))
        .route("/api/users/{username}/awards", get(award_history))
        .route("/api/feed", get(community_feed))
        .with_state(state)
}

/// Starts the API server on the given address and returns the bound
/// address and a join handle.
///
/// This is the primary entry point used by both `main.rs` and test code;
/// tests bind to `127.0.0.1:0` for an OS-assigned port.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
    state: Arc<AppState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "api server error");
        }
    });

    Ok((bound_addr, handle))
}

// ---------------------------------------------------------------------------
// Request/response bodies
// ---------------------------------------------------------------------------

/// Body for `POST /api/tasks/{id}/claim`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClaimRequest {
    /// Username taking responsibility for the task.
    pub claimer: String,
}

/// Body for `POST /api/tasks/{id}/complete`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CompleteRequest {
    /// Username that fulfilled the task.
    pub completer: String,
}

/// Body for `POST /api/awards`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AwardRequest {
    /// Username to award points to.
    pub username: String,
    /// Number of points; must be positive.
    pub amount: u64,
}

/// Response for `POST /api/awards`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AwardResponse {
    /// Username the points went to.
    pub username: String,
    /// The user's new balance.
    pub nudge_points: u64,
}

/// Response for `GET /api/tasks/{id}/crosspost`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CrosspostLink {
    /// Pre-filled submission URL for the community subreddit.
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct LeaderboardQuery {
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct FeedQuery {
    q: Option<String>,
    limit: Option<u32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn propose_task(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.ledger.propose(draft).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn list_tasks(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Task>>, ApiError> {
    Ok(Json(state.ledger.list_tasks().await?))
}

async fn claim_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
    Json(body): Json<ClaimRequest>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.ledger.claim(&id, &body.claimer).await?))
}

async fn complete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
    Json(body): Json<CompleteRequest>,
) -> Result<Json<Task>, ApiError> {
    Ok(Json(state.ledger.complete(&id, &body.completer).await?))
}

async fn crosspost_link(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TaskId>,
) -> Result<Json<CrosspostLink>, ApiError> {
    let task = state.ledger.get_task(&id).await?;
    let url = submit_url(state.feed.subreddit(), &task).map_err(|e| ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "crosspost",
        message: e.to_string(),
    })?;
    Ok(Json(CrosspostLink {
        url: url.to_string(),
    }))
}

async fn award_points(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AwardRequest>,
) -> Result<Json<AwardResponse>, ApiError> {
    let nudge_points = state.ledger.award_points(&body.username, body.amount).await?;
    Ok(Json(AwardResponse {
        username: body.username.trim().to_string(),
        nudge_points,
    }))
}

async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT);
    Ok(Json(state.ledger.leaderboard(limit).await?))
}

async fn award_history(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<Vec<AwardEvent>>, ApiError> {
    Ok(Json(state.ledger.award_history(&username).await?))
}

async fn community_feed(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Json<Vec<RedditPost>> {
    let limit = query.limit.unwrap_or(state.feed_limit);
    let posts = match query.q.as_deref() {
        Some(q) if !q.trim().is_empty() => state.feed.search_or_sample(q, limit).await,
        _ => state.feed.recent_or_sample(limit).await,
    };
    Json(posts)
}
