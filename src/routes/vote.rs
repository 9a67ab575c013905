use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::vote::{ListThemesQuery, SubmitVoteRequest, SubmitVoteResponse, ThemeSummary},
    error::AppError,
    routes::identity::MaybeIdentity,
    services::{access::Identity, vote_service},
    state::SharedState,
};

/// Public voting endpoints: theme listings and vote submission.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/jams/{jam_id}/themes", get(list_themes))
        .route("/votes", post(submit_vote))
}

/// List a jam's themes with the caller's own votes filled in. Admins may ask
/// for per-theme aggregates; for everyone else the flag is ignored.
#[utoipa::path(
    get,
    path = "/jams/{jam_id}/themes",
    tag = "votes",
    params(("jam_id" = String, Path, description = "Identifier of the jam"),
    ListThemesQuery),
    responses((status = 200, description = "Themes sorted by name", body = [ThemeSummary]))
)]
pub async fn list_themes(
    State(state): State<SharedState>,
    Path(jam_id): Path<String>,
    Query(query): Query<ListThemesQuery>,
    MaybeIdentity(identity): MaybeIdentity,
) -> Result<Json<Vec<ThemeSummary>>, AppError> {
    Ok(Json(
        vote_service::list_themes(&state, identity.as_ref(), jam_id, query.aggregate).await?,
    ))
}

/// Record or change the caller's vote on a theme.
#[utoipa::path(
    post,
    path = "/votes",
    tag = "votes",
    params(("x-user-id" = String, Header, description = "Authenticated user identifier"),
    ("x-user-verified" = String, Header, description = "Set to `true` once the user's email is verified")),
    request_body = SubmitVoteRequest,
    responses((status = 200, description = "Vote recorded", body = SubmitVoteResponse))
)]
pub async fn submit_vote(
    State(state): State<SharedState>,
    identity: Identity,
    Valid(Json(payload)): Valid<Json<SubmitVoteRequest>>,
) -> Result<Json<SubmitVoteResponse>, AppError> {
    Ok(Json(
        vote_service::submit_vote(&state, &identity, payload).await?,
    ))
}
