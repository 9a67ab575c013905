//! Timer-driven maintenance jobs: periodic automatic snapshots of every jam
//! with open voting, and pruning of automatic snapshots older than the
//! retention window.
//!
//! Jobs keep no persisted state and do not coordinate across instances; the
//! deployment runs a single backend process.

use std::time::{Duration, SystemTime};

use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::{
    config::AppConfig,
    dao::models::BackupKind,
    services::backup_service::{self, AUTOMATIC_BACKUP_REASON},
    state::SharedState,
};

/// Start the backup and prune loops on the runtime. Tick cadence comes from
/// the application config.
pub fn spawn(state: SharedState, config: AppConfig) {
    let backup_state = state.clone();
    let backup_every = config.backup_interval();
    tokio::spawn(async move {
        let mut ticker = time::interval(backup_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so a restart does
        // not snapshot jams that were backed up moments ago.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            run_backup_round(&backup_state).await;
        }
    });

    let prune_state = state;
    let prune_every = config.prune_interval();
    let retention = config.backup_retention();
    tokio::spawn(async move {
        let mut ticker = time::interval(prune_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            run_prune_round(&prune_state, retention).await;
        }
    });

    info!(
        backup_interval_secs = backup_every.as_secs(),
        prune_interval_secs = prune_every.as_secs(),
        retention_secs = retention.as_secs(),
        "started backup scheduler"
    );
}

/// Snapshot every jam whose theme voting is currently open. Per-jam failures
/// are logged and skipped so one broken jam cannot starve the rest.
pub async fn run_backup_round(state: &SharedState) {
    if state.is_degraded().await {
        debug!("skipping backup round while storage is degraded");
        return;
    }
    let Some(store) = state.store().await else {
        debug!("skipping backup round without a storage backend");
        return;
    };

    let jams = match store.list_voting_open_jams().await {
        Ok(jams) => jams,
        Err(err) => {
            warn!(error = %err, "failed to list jams for backup round");
            return;
        }
    };

    for jam in jams {
        match backup_service::create_backup(
            state,
            &jam.id,
            BackupKind::Automatic,
            None,
            Some(AUTOMATIC_BACKUP_REASON.to_owned()),
        )
        .await
        {
            Ok(backup) => debug!(
                jam = %jam.id,
                backup = %backup.id,
                "automatic backup captured"
            ),
            Err(err) => warn!(
                jam = %jam.id,
                error = %err,
                "automatic backup failed"
            ),
        }
    }
}

/// Delete automatic snapshots older than the retention window. Manual and
/// pre-update snapshots are never touched; they only leave through the
/// per-jam cap.
pub async fn run_prune_round(state: &SharedState, retention: Duration) {
    if state.is_degraded().await {
        debug!("skipping prune round while storage is degraded");
        return;
    }
    let Some(store) = state.store().await else {
        debug!("skipping prune round without a storage backend");
        return;
    };

    let cutoff = SystemTime::now()
        .checked_sub(retention)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    match store.prune_automatic_backups_before(cutoff).await {
        Ok(0) => debug!("prune round found nothing to delete"),
        Ok(pruned) => info!(pruned, "pruned stale automatic backups"),
        Err(err) => warn!(error = %err, "failed to prune automatic backups"),
    }
}
