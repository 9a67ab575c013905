use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::admin::{
        ActionResponse, BackupCreatedResponse, BackupDetail, BackupSummary, CreateBackupRequest,
        JamSummary, ReplaceThemesRequest, ReplaceThemesResponse, ResetVotesResponse,
        RestoreBackupResponse, UpsertJamRequest,
    },
    error::AppError,
    services::{access::Identity, backup_service, jam_service, vote_service},
    state::SharedState,
};

/// Admin-only management endpoints for jams, themes and vote backups.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/jams", get(list_jams))
        .route("/admin/jams/{jam_id}", put(upsert_jam))
        .route("/admin/jams/{jam_id}/themes", put(replace_themes))
        .route(
            "/admin/jams/{jam_id}/themes/recalculate",
            post(recalculate_scores),
        )
        .route("/admin/jams/{jam_id}/votes/reset", post(reset_votes))
        .route(
            "/admin/jams/{jam_id}/backups",
            get(list_backups).post(create_backup),
        )
        .route("/admin/backups/{id}", get(get_backup))
        .route("/admin/backups/{id}/restore", post(restore_backup))
}

/// Retrieve all jams known to the system for administration purposes.
#[utoipa::path(
    get,
    path = "/admin/jams",
    tag = "admin",
    params(("x-user-id" = String, Header, description = "Authenticated user identifier"),
    ("x-user-admin" = String, Header, description = "Set to `true` for administrators")),
    responses((status = 200, description = "List known jams", body = [JamSummary]))
)]
pub async fn list_jams(
    State(state): State<SharedState>,
    identity: Identity,
) -> Result<Json<Vec<JamSummary>>, AppError> {
    Ok(Json(jam_service::list_jams(&state, &identity).await?))
}

/// Create a jam under the given slug or update its title and voting flag.
#[utoipa::path(
    put,
    path = "/admin/jams/{jam_id}",
    tag = "admin",
    params(("x-user-id" = String, Header, description = "Authenticated user identifier"),
    ("x-user-admin" = String, Header, description = "Set to `true` for administrators"),
    ("jam_id" = String, Path, description = "Slug identifying the jam")),
    request_body = UpsertJamRequest,
    responses((status = 200, description = "Jam upserted", body = JamSummary))
)]
pub async fn upsert_jam(
    State(state): State<SharedState>,
    identity: Identity,
    Path(jam_id): Path<String>,
    Valid(Json(payload)): Valid<Json<UpsertJamRequest>>,
) -> Result<Json<JamSummary>, AppError> {
    Ok(Json(
        jam_service::upsert_jam(&state, &identity, jam_id, payload).await?,
    ))
}

/// Replace the jam's theme list, keeping matched themes and their votes.
#[utoipa::path(
    put,
    path = "/admin/jams/{jam_id}/themes",
    tag = "admin",
    params(("x-user-id" = String, Header, description = "Authenticated user identifier"),
    ("x-user-admin" = String, Header, description = "Set to `true` for administrators"),
    ("jam_id" = String, Path, description = "Slug identifying the jam")),
    request_body = ReplaceThemesRequest,
    responses((status = 200, description = "Theme list replaced", body = ReplaceThemesResponse))
)]
pub async fn replace_themes(
    State(state): State<SharedState>,
    identity: Identity,
    Path(jam_id): Path<String>,
    Valid(Json(payload)): Valid<Json<ReplaceThemesRequest>>,
) -> Result<Json<ReplaceThemesResponse>, AppError> {
    Ok(Json(
        vote_service::replace_themes(&state, &identity, jam_id, payload.names).await?,
    ))
}

/// Recompute every theme score from the stored vote rows.
#[utoipa::path(
    post,
    path = "/admin/jams/{jam_id}/themes/recalculate",
    tag = "admin",
    params(("x-user-id" = String, Header, description = "Authenticated user identifier"),
    ("x-user-admin" = String, Header, description = "Set to `true` for administrators"),
    ("jam_id" = String, Path, description = "Slug identifying the jam")),
    responses((status = 200, description = "Scores recalculated", body = ActionResponse))
)]
pub async fn recalculate_scores(
    State(state): State<SharedState>,
    identity: Identity,
    Path(jam_id): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        vote_service::recalculate_scores(&state, &identity, jam_id).await?,
    ))
}

/// Wipe all votes for the jam and reset theme scores, after a safety snapshot.
#[utoipa::path(
    post,
    path = "/admin/jams/{jam_id}/votes/reset",
    tag = "admin",
    params(("x-user-id" = String, Header, description = "Authenticated user identifier"),
    ("x-user-admin" = String, Header, description = "Set to `true` for administrators"),
    ("jam_id" = String, Path, description = "Slug identifying the jam")),
    responses((status = 200, description = "Votes reset", body = ResetVotesResponse))
)]
pub async fn reset_votes(
    State(state): State<SharedState>,
    identity: Identity,
    Path(jam_id): Path<String>,
) -> Result<Json<ResetVotesResponse>, AppError> {
    Ok(Json(
        vote_service::reset_votes(&state, &identity, jam_id).await?,
    ))
}

/// Capture a manual snapshot of the jam's themes and votes.
#[utoipa::path(
    post,
    path = "/admin/jams/{jam_id}/backups",
    tag = "admin",
    params(("x-user-id" = String, Header, description = "Authenticated user identifier"),
    ("x-user-admin" = String, Header, description = "Set to `true` for administrators"),
    ("jam_id" = String, Path, description = "Slug identifying the jam")),
    request_body = CreateBackupRequest,
    responses((status = 200, description = "Backup captured", body = BackupCreatedResponse))
)]
pub async fn create_backup(
    State(state): State<SharedState>,
    identity: Identity,
    Path(jam_id): Path<String>,
    Valid(Json(payload)): Valid<Json<CreateBackupRequest>>,
) -> Result<Json<BackupCreatedResponse>, AppError> {
    Ok(Json(
        backup_service::create_manual_backup(&state, &identity, jam_id, payload.reason).await?,
    ))
}

/// List the jam's snapshots, newest first, without payloads.
#[utoipa::path(
    get,
    path = "/admin/jams/{jam_id}/backups",
    tag = "admin",
    params(("x-user-id" = String, Header, description = "Authenticated user identifier"),
    ("x-user-admin" = String, Header, description = "Set to `true` for administrators"),
    ("jam_id" = String, Path, description = "Slug identifying the jam")),
    responses((status = 200, description = "Snapshots for the jam", body = [BackupSummary]))
)]
pub async fn list_backups(
    State(state): State<SharedState>,
    identity: Identity,
    Path(jam_id): Path<String>,
) -> Result<Json<Vec<BackupSummary>>, AppError> {
    Ok(Json(
        backup_service::list_backups(&state, &identity, jam_id).await?,
    ))
}

/// Retrieve one snapshot including its captured themes and votes.
#[utoipa::path(
    get,
    path = "/admin/backups/{id}",
    tag = "admin",
    params(("x-user-id" = String, Header, description = "Authenticated user identifier"),
    ("x-user-admin" = String, Header, description = "Set to `true` for administrators"),
    ("id" = Uuid, Path, description = "Identifier of the snapshot")),
    responses((status = 200, description = "Snapshot detail", body = BackupDetail))
)]
pub async fn get_backup(
    State(state): State<SharedState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<BackupDetail>, AppError> {
    Ok(Json(
        backup_service::get_backup(&state, &identity, id).await?,
    ))
}

/// Roll the jam's themes and votes back to a snapshot's captured state.
#[utoipa::path(
    post,
    path = "/admin/backups/{id}/restore",
    tag = "admin",
    params(("x-user-id" = String, Header, description = "Authenticated user identifier"),
    ("x-user-admin" = String, Header, description = "Set to `true` for administrators"),
    ("id" = Uuid, Path, description = "Identifier of the snapshot to restore")),
    responses((status = 200, description = "Snapshot restored", body = RestoreBackupResponse))
)]
pub async fn restore_backup(
    State(state): State<SharedState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<RestoreBackupResponse>, AppError> {
    Ok(Json(
        backup_service::restore_from_backup(&state, &identity, id).await?,
    ))
}
