use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Jamvote Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::vote::list_themes,
        crate::routes::vote::submit_vote,
        crate::routes::admin::upsert_jam,
        crate::routes::admin::list_jams,
        crate::routes::admin::replace_themes,
        crate::routes::admin::recalculate_scores,
        crate::routes::admin::reset_votes,
        crate::routes::admin::create_backup,
        crate::routes::admin::list_backups,
        crate::routes::admin::get_backup,
        crate::routes::admin::restore_backup,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::vote::SubmitVoteRequest,
            crate::dto::vote::SubmitVoteResponse,
            crate::dto::vote::ThemeSummary,
            crate::dto::vote::VoteAggregate,
            crate::dto::admin::UpsertJamRequest,
            crate::dto::admin::JamSummary,
            crate::dto::admin::ReplaceThemesRequest,
            crate::dto::admin::ReplaceThemesResponse,
            crate::dto::admin::ActionResponse,
            crate::dto::admin::ResetVotesResponse,
            crate::dto::admin::CreateBackupRequest,
            crate::dto::admin::BackupCreatedResponse,
            crate::dto::admin::BackupSummary,
            crate::dto::admin::BackupDetail,
            crate::dto::admin::BackupThemeDetail,
            crate::dto::admin::BackupVoteDetail,
            crate::dto::admin::RestoreBackupResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "votes", description = "Theme browsing and voting"),
        (name = "admin", description = "Jam, theme and backup administration"),
    )
)]
pub struct ApiDoc;
