//! DTO definitions used by the admin REST API and documentation layer.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{BackupEntity, BackupSummaryEntity, JamEntity},
    dto::{format_system_time, validation::validate_theme_names},
};

/// Payload creating or updating a jam record.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpsertJamRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    /// Whether the jam currently accepts theme votes (gates scheduled backups).
    pub theme_voting_open: bool,
}

/// Projection of a jam returned to administrators.
#[derive(Debug, Serialize, ToSchema)]
pub struct JamSummary {
    pub id: String,
    pub title: String,
    pub theme_voting_open: bool,
    pub created_at: String,
}

impl From<JamEntity> for JamSummary {
    fn from(jam: JamEntity) -> Self {
        Self {
            id: jam.id,
            title: jam.title,
            theme_voting_open: jam.theme_voting_open,
            created_at: format_system_time(jam.created_at),
        }
    }
}

/// Full replacement list for a jam's themes.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceThemesRequest {
    pub names: Vec<String>,
}

impl Validate for ReplaceThemesRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_theme_names(&self.names) {
            errors.add("names", e);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Outcome of a bulk theme replacement.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReplaceThemesResponse {
    /// Themes that matched an existing name and were left untouched.
    pub kept: u64,
    pub added: u64,
    pub removed: u64,
}

/// Generic action acknowledgement used by admin endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub message: String,
}

/// Outcome of wiping a jam's vote ledger.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResetVotesResponse {
    pub votes_deleted: u64,
    pub themes_reset: u64,
}

/// Payload requesting a manual backup snapshot.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct CreateBackupRequest {
    /// Free-form note recorded on the snapshot.
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Identity and captured counts of a freshly created snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct BackupCreatedResponse {
    pub id: Uuid,
    pub theme_count: u64,
    pub vote_count: u64,
    pub created_at: String,
}

impl From<&BackupEntity> for BackupCreatedResponse {
    fn from(backup: &BackupEntity) -> Self {
        Self {
            id: backup.id,
            theme_count: backup.theme_count,
            vote_count: backup.vote_count,
            created_at: format_system_time(backup.created_at),
        }
    }
}

/// Snapshot metadata without the embedded payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct BackupSummary {
    pub id: Uuid,
    pub jam_id: String,
    pub kind: String,
    pub created_at: String,
    pub theme_count: u64,
    pub vote_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub restore_count: u32,
}

impl From<BackupSummaryEntity> for BackupSummary {
    fn from(backup: BackupSummaryEntity) -> Self {
        Self {
            id: backup.id,
            jam_id: backup.jam_id,
            kind: backup.kind.as_str().to_owned(),
            created_at: format_system_time(backup.created_at),
            theme_count: backup.theme_count,
            vote_count: backup.vote_count,
            triggered_by: backup.triggered_by,
            reason: backup.reason,
            restore_count: backup.restore_count,
        }
    }
}

/// Captured theme inside a snapshot detail.
#[derive(Debug, Serialize, ToSchema)]
pub struct BackupThemeDetail {
    pub id: Uuid,
    pub name: String,
    pub score: i64,
}

/// Captured vote inside a snapshot detail.
#[derive(Debug, Serialize, ToSchema)]
pub struct BackupVoteDetail {
    pub user_id: String,
    pub theme_id: Uuid,
    pub value: i32,
    pub updated_at: String,
}

/// Full snapshot detail including the embedded theme/vote payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct BackupDetail {
    pub id: Uuid,
    pub jam_id: String,
    pub kind: String,
    pub created_at: String,
    pub theme_count: u64,
    pub vote_count: u64,
    pub themes: Vec<BackupThemeDetail>,
    pub votes: Vec<BackupVoteDetail>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub restore_count: u32,
}

impl From<BackupEntity> for BackupDetail {
    fn from(backup: BackupEntity) -> Self {
        Self {
            id: backup.id,
            jam_id: backup.jam_id,
            kind: backup.kind.as_str().to_owned(),
            created_at: format_system_time(backup.created_at),
            theme_count: backup.theme_count,
            vote_count: backup.vote_count,
            themes: backup
                .themes
                .into_iter()
                .map(|theme| BackupThemeDetail {
                    id: theme.id,
                    name: theme.name,
                    score: theme.score,
                })
                .collect(),
            votes: backup
                .votes
                .into_iter()
                .map(|vote| BackupVoteDetail {
                    user_id: vote.user_id,
                    theme_id: vote.theme_id,
                    value: vote.value,
                    updated_at: format_system_time(vote.updated_at),
                })
                .collect(),
            triggered_by: backup.triggered_by,
            reason: backup.reason,
            restore_count: backup.restore_count,
        }
    }
}

/// Outcome of replaying a snapshot into live state.
#[derive(Debug, Serialize, ToSchema)]
pub struct RestoreBackupResponse {
    pub votes_restored: u64,
    pub themes_restored: u64,
}
