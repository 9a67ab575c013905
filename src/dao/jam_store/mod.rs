#[cfg(feature = "mongo-store")]
pub mod mongodb;

use std::time::SystemTime;

use crate::dao::models::{
    BackupEntity, BackupSummaryEntity, JamEntity, ThemeEntity, VoteEntity, VoteOutcome,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for jams, themes, votes and
/// backup snapshots.
pub trait JamStore: Send + Sync {
    fn upsert_jam(&self, jam: JamEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_jam(&self, id: String) -> BoxFuture<'static, StorageResult<Option<JamEntity>>>;
    fn list_jams(&self) -> BoxFuture<'static, StorageResult<Vec<JamEntity>>>;
    fn list_voting_open_jams(&self) -> BoxFuture<'static, StorageResult<Vec<JamEntity>>>;

    fn insert_theme(&self, theme: ThemeEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_theme(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<ThemeEntity>>>;
    fn list_themes(&self, jam_id: String) -> BoxFuture<'static, StorageResult<Vec<ThemeEntity>>>;
    fn delete_themes(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<u64>>;
    fn set_theme_score(&self, id: Uuid, score: i64) -> BoxFuture<'static, StorageResult<()>>;
    fn reset_theme_scores(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<u64>>;

    fn list_votes_for_user(
        &self,
        user_id: String,
        theme_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<VoteEntity>>>;
    fn list_votes_for_themes(
        &self,
        theme_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<VoteEntity>>>;
    fn delete_votes_for_themes(
        &self,
        theme_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<u64>>;

    /// Atomically record `value` for `(user_id, theme_id)` and apply the
    /// resulting delta to the theme's running score. The read of the previous
    /// value, the vote upsert and the score increment execute as a single
    /// transaction so concurrent submissions for the same pair cannot apply a
    /// stale delta.
    fn apply_vote(
        &self,
        user_id: String,
        theme_id: Uuid,
        value: i32,
        now: SystemTime,
    ) -> BoxFuture<'static, StorageResult<VoteOutcome>>;

    fn insert_backup(&self, backup: BackupEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn find_backup(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<BackupEntity>>>;
    fn list_backup_summaries(
        &self,
        jam_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<BackupSummaryEntity>>>;
    fn delete_backups(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<u64>>;

    /// Delete automatic-kind snapshots created before `cutoff`, across all
    /// jams. Manual and pre-update snapshots are never touched by this sweep.
    fn prune_automatic_backups_before(
        &self,
        cutoff: SystemTime,
    ) -> BoxFuture<'static, StorageResult<u64>>;

    /// Replace live vote/score state with the snapshot's captured state as a
    /// single transaction: delete current votes for the captured theme ids,
    /// overwrite the captured themes' scores, re-insert the captured votes
    /// verbatim, and increment the snapshot's restore counter.
    fn apply_restore(&self, backup: BackupEntity) -> BoxFuture<'static, StorageResult<()>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
