//! Snapshot management: capturing a jam's themes and votes into an embedded
//! backup document, enforcing the per-jam retention cap, and restoring a
//! snapshot back over the live collections.

use std::{sync::Arc, time::SystemTime};

use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    dao::{
        jam_store::JamStore,
        models::{BackupEntity, BackupKind},
    },
    dto::admin::{BackupCreatedResponse, BackupDetail, BackupSummary, RestoreBackupResponse},
    error::ServiceError,
    services::access::{self, Action, Identity},
    state::SharedState,
};

/// Reason stamped on snapshots taken by the background scheduler.
pub const AUTOMATIC_BACKUP_REASON: &str = "scheduled automatic backup";

/// Newest snapshots kept per jam; older ones are evicted on insert.
pub const BACKUP_CAP_PER_JAM: usize = 10;

/// Capture the jam's current themes and votes into a new snapshot and evict
/// anything beyond the retention cap. Shared by the admin route, the
/// destructive-operation guards and the scheduler.
pub async fn create_backup(
    state: &SharedState,
    jam_id: &str,
    kind: BackupKind,
    triggered_by: Option<String>,
    reason: Option<String>,
) -> Result<BackupCreatedResponse, ServiceError> {
    let store = state.require_store().await?;
    let Some(jam) = store.find_jam(jam_id.to_owned()).await? else {
        return Err(ServiceError::NotFound("jam not found".into()));
    };

    let themes = store.list_themes(jam.id.clone()).await?;
    let theme_ids: Vec<Uuid> = themes.iter().map(|theme| theme.id).collect();
    let votes = store.list_votes_for_themes(theme_ids).await?;

    let backup = BackupEntity {
        id: Uuid::new_v4(),
        jam_id: jam.id.clone(),
        kind,
        created_at: SystemTime::now(),
        theme_count: themes.len() as u64,
        vote_count: votes.len() as u64,
        themes: themes.iter().map(Into::into).collect(),
        votes: votes.iter().map(Into::into).collect(),
        triggered_by,
        reason,
        restore_count: 0,
    };

    let kind_label = backup.kind.as_str();
    let response = BackupCreatedResponse::from(&backup);
    store.insert_backup(backup).await?;
    enforce_backup_cap(&store, &jam.id).await?;

    info!(
        jam = %jam.id,
        backup = %response.id,
        kind = kind_label,
        themes = response.theme_count,
        votes = response.vote_count,
        "captured vote backup"
    );

    Ok(response)
}

/// Drop the oldest snapshots once a jam exceeds the cap, regardless of kind.
async fn enforce_backup_cap(store: &Arc<dyn JamStore>, jam_id: &str) -> Result<(), ServiceError> {
    let summaries = store.list_backup_summaries(jam_id.to_owned()).await?;
    if summaries.len() <= BACKUP_CAP_PER_JAM {
        return Ok(());
    }

    // Summaries arrive newest-first, so everything past the cap is stale.
    let excess: Vec<Uuid> = summaries[BACKUP_CAP_PER_JAM..]
        .iter()
        .map(|summary| summary.id)
        .collect();
    let evicted = store.delete_backups(excess).await?;
    debug!(jam = %jam_id, evicted, "evicted snapshots beyond retention cap");

    Ok(())
}

/// Admin-triggered snapshot with the caller recorded as the trigger.
pub async fn create_manual_backup(
    state: &SharedState,
    identity: &Identity,
    jam_id: String,
    reason: Option<String>,
) -> Result<BackupCreatedResponse, ServiceError> {
    access::require(identity, Action::CreateBackup)?;
    create_backup(
        state,
        &jam_id,
        BackupKind::Manual,
        Some(identity.user_id.clone()),
        reason,
    )
    .await
}

/// Roll the live themes and votes back to a snapshot's captured state. A
/// fresh pre-update snapshot of the current state is taken first so the
/// restore itself can be undone.
pub async fn restore_from_backup(
    state: &SharedState,
    identity: &Identity,
    backup_id: Uuid,
) -> Result<RestoreBackupResponse, ServiceError> {
    access::require(identity, Action::RestoreBackup)?;

    let store = state.require_store().await?;
    let Some(backup) = store.find_backup(backup_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "backup `{backup_id}` not found"
        )));
    };

    // If this snapshot cannot be taken the restore is aborted: overwriting
    // live votes without a way back is not acceptable.
    create_backup(
        state,
        &backup.jam_id,
        BackupKind::PreUpdate,
        Some(identity.user_id.clone()),
        Some(format!("before restoring backup {backup_id}")),
    )
    .await?;

    let jam_id = backup.jam_id.clone();
    let themes_restored = backup.theme_count;
    let votes_restored = backup.vote_count;
    store.apply_restore(backup).await?;

    info!(
        jam = %jam_id,
        backup = %backup_id,
        themes = themes_restored,
        votes = votes_restored,
        "restored vote backup"
    );

    Ok(RestoreBackupResponse {
        votes_restored,
        themes_restored,
    })
}

/// List a jam's snapshots newest-first, without their payloads.
pub async fn list_backups(
    state: &SharedState,
    identity: &Identity,
    jam_id: String,
) -> Result<Vec<BackupSummary>, ServiceError> {
    access::require(identity, Action::ViewBackups)?;

    let store = state.require_store().await?;
    let Some(jam) = store.find_jam(jam_id).await? else {
        return Err(ServiceError::NotFound("jam not found".into()));
    };

    let summaries = store.list_backup_summaries(jam.id).await?;
    Ok(summaries.into_iter().map(Into::into).collect())
}

/// Fetch one snapshot with its full captured payload.
pub async fn get_backup(
    state: &SharedState,
    identity: &Identity,
    backup_id: Uuid,
) -> Result<BackupDetail, ServiceError> {
    access::require(identity, Action::ViewBackups)?;

    let store = state.require_store().await?;
    let Some(backup) = store.find_backup(backup_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "backup `{backup_id}` not found"
        )));
    };

    Ok(backup.into())
}
