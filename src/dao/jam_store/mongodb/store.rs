use std::{sync::Arc, time::SystemTime};

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, ClientSession, Collection, Database,
    bson::{DateTime, doc},
    options::{Collation, CollationStrength, IndexOptions},
};
use tokio::sync::RwLock;
use tracing::warn;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult, is_duplicate_key},
    models::{
        MongoBackupDocument, MongoBackupSummaryDocument, MongoJamDocument, MongoThemeDocument,
        MongoVoteDocument, doc_id, ids_filter,
    },
};
use crate::dao::{
    jam_store::JamStore,
    models::{
        BackupEntity, BackupKind, BackupSummaryEntity, JamEntity, ThemeEntity, VoteEntity,
        VoteOutcome,
    },
    storage::StorageResult,
};

const JAM_COLLECTION_NAME: &str = "jams";
const THEME_COLLECTION_NAME: &str = "themes";
const VOTE_COLLECTION_NAME: &str = "votes";
const BACKUP_COLLECTION_NAME: &str = "theme_backups";

#[derive(Clone)]
pub struct MongoJamStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoJamStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        // One row per (user, theme); the upsert in apply_vote relies on this.
        let votes = database.collection::<MongoVoteDocument>(VOTE_COLLECTION_NAME);
        let vote_index = mongodb::IndexModel::builder()
            .keys(doc! {"user_id": 1, "theme_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("vote_user_theme_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        votes
            .create_index(vote_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: VOTE_COLLECTION_NAME,
                index: "user_id,theme_id",
                source,
            })?;

        // Theme names are unique within a jam, case-insensitively (strength 2
        // collation ignores case but not diacritics).
        let themes = database.collection::<MongoThemeDocument>(THEME_COLLECTION_NAME);
        let theme_index = mongodb::IndexModel::builder()
            .keys(doc! {"jam_id": 1, "name": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("theme_jam_name_idx".to_owned()))
                    .unique(Some(true))
                    .collation(Some(
                        Collation::builder()
                            .locale("en".to_owned())
                            .strength(CollationStrength::Secondary)
                            .build(),
                    ))
                    .build(),
            )
            .build();
        themes
            .create_index(theme_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: THEME_COLLECTION_NAME,
                index: "jam_id,name",
                source,
            })?;

        let backups = database.collection::<MongoBackupDocument>(BACKUP_COLLECTION_NAME);
        let backup_index = mongodb::IndexModel::builder()
            .keys(doc! {"jam_id": 1, "created_at": -1})
            .options(
                IndexOptions::builder()
                    .name(Some("backup_jam_created_idx".to_owned()))
                    .build(),
            )
            .build();
        backups
            .create_index(backup_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: BACKUP_COLLECTION_NAME,
                index: "jam_id,created_at",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn client_and_database(&self) -> (Client, Database) {
        let guard = self.inner.state.read().await;
        (guard.client.clone(), guard.database.clone())
    }

    async fn jam_collection(&self) -> Collection<MongoJamDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoJamDocument>(JAM_COLLECTION_NAME)
    }

    async fn theme_collection(&self) -> Collection<MongoThemeDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoThemeDocument>(THEME_COLLECTION_NAME)
    }

    async fn vote_collection(&self) -> Collection<MongoVoteDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoVoteDocument>(VOTE_COLLECTION_NAME)
    }

    async fn backup_collection(&self) -> Collection<MongoBackupDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoBackupDocument>(BACKUP_COLLECTION_NAME)
    }

    async fn backup_summary_collection(&self) -> Collection<MongoBackupSummaryDocument> {
        let guard = self.inner.state.read().await;
        guard
            .database
            .collection::<MongoBackupSummaryDocument>(BACKUP_COLLECTION_NAME)
    }

    async fn upsert_jam(&self, jam: JamEntity) -> MongoResult<()> {
        let id = jam.id.clone();
        let document: MongoJamDocument = jam.into();
        let collection = self.jam_collection().await;
        collection
            .replace_one(doc! {"_id": &id}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveJam { id, source })?;

        Ok(())
    }

    async fn find_jam(&self, id: String) -> MongoResult<Option<JamEntity>> {
        let collection = self.jam_collection().await;

        let document = collection
            .find_one(doc! {"_id": &id})
            .await
            .map_err(|source| MongoDaoError::LoadJam { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn list_jams(&self) -> MongoResult<Vec<JamEntity>> {
        let collection = self.jam_collection().await;

        let documents: Vec<MongoJamDocument> = collection
            .find(doc! {})
            .sort(doc! {"created_at": -1})
            .await
            .map_err(|source| MongoDaoError::ListJams { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListJams { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn list_voting_open_jams(&self) -> MongoResult<Vec<JamEntity>> {
        let collection = self.jam_collection().await;

        let documents: Vec<MongoJamDocument> = collection
            .find(doc! {"theme_voting_open": true})
            .await
            .map_err(|source| MongoDaoError::ListJams { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListJams { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn insert_theme(&self, theme: ThemeEntity) -> MongoResult<()> {
        let id = theme.id;
        let document: MongoThemeDocument = theme.into();
        let collection = self.theme_collection().await;
        collection.insert_one(&document).await.map_err(|source| {
            if is_duplicate_key(&source) {
                MongoDaoError::Duplicate {
                    collection: THEME_COLLECTION_NAME,
                }
            } else {
                MongoDaoError::SaveTheme { id, source }
            }
        })?;

        Ok(())
    }

    async fn find_theme(&self, id: Uuid) -> MongoResult<Option<ThemeEntity>> {
        let collection = self.theme_collection().await;

        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadTheme { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn list_themes(&self, jam_id: String) -> MongoResult<Vec<ThemeEntity>> {
        let collection = self.theme_collection().await;

        let documents: Vec<MongoThemeDocument> = collection
            .find(doc! {"jam_id": &jam_id})
            .sort(doc! {"created_at": 1})
            .await
            .map_err(|source| MongoDaoError::ListThemes {
                jam: jam_id.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListThemes {
                jam: jam_id.clone(),
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_themes(&self, ids: Vec<Uuid>) -> MongoResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let collection = self.theme_collection().await;
        let result = collection
            .delete_many(doc! {"_id": ids_filter(&ids)})
            .await
            .map_err(|source| MongoDaoError::DeleteThemes { source })?;

        Ok(result.deleted_count)
    }

    async fn set_theme_score(&self, id: Uuid, score: i64) -> MongoResult<()> {
        let collection = self.theme_collection().await;
        collection
            .update_one(doc_id(id), doc! {"$set": {"score": score}})
            .await
            .map_err(|source| MongoDaoError::UpdateScore { id, source })?;

        Ok(())
    }

    async fn reset_theme_scores(&self, ids: Vec<Uuid>) -> MongoResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let collection = self.theme_collection().await;
        let result = collection
            .update_many(
                doc! {"_id": ids_filter(&ids)},
                doc! {"$set": {"score": 0_i64}},
            )
            .await
            .map_err(|source| MongoDaoError::ResetScores { source })?;

        Ok(result.modified_count)
    }

    async fn list_votes_for_user(
        &self,
        user_id: String,
        theme_ids: Vec<Uuid>,
    ) -> MongoResult<Vec<VoteEntity>> {
        if theme_ids.is_empty() {
            return Ok(Vec::new());
        }

        let collection = self.vote_collection().await;
        let documents: Vec<MongoVoteDocument> = collection
            .find(doc! {"user_id": &user_id, "theme_id": ids_filter(&theme_ids)})
            .await
            .map_err(|source| MongoDaoError::ListVotes { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListVotes { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn list_votes_for_themes(&self, theme_ids: Vec<Uuid>) -> MongoResult<Vec<VoteEntity>> {
        if theme_ids.is_empty() {
            return Ok(Vec::new());
        }

        let collection = self.vote_collection().await;
        let documents: Vec<MongoVoteDocument> = collection
            .find(doc! {"theme_id": ids_filter(&theme_ids)})
            .await
            .map_err(|source| MongoDaoError::ListVotes { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListVotes { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_votes_for_themes(&self, theme_ids: Vec<Uuid>) -> MongoResult<u64> {
        if theme_ids.is_empty() {
            return Ok(0);
        }

        let collection = self.vote_collection().await;
        let result = collection
            .delete_many(doc! {"theme_id": ids_filter(&theme_ids)})
            .await
            .map_err(|source| MongoDaoError::DeleteVotes { source })?;

        Ok(result.deleted_count)
    }

    async fn apply_vote(
        &self,
        user_id: String,
        theme_id: Uuid,
        value: i32,
        now: SystemTime,
    ) -> MongoResult<VoteOutcome> {
        let (client, database) = self.client_and_database().await;

        let mut session = client
            .start_session()
            .await
            .map_err(|source| MongoDaoError::Transaction {
                op: "apply_vote",
                source,
            })?;
        session
            .start_transaction()
            .await
            .map_err(|source| MongoDaoError::Transaction {
                op: "apply_vote",
                source,
            })?;

        match apply_vote_in_session(&database, &mut session, &user_id, theme_id, value, now).await {
            Ok(outcome) => {
                session
                    .commit_transaction()
                    .await
                    .map_err(|source| MongoDaoError::Transaction {
                        op: "apply_vote",
                        source,
                    })?;
                Ok(outcome)
            }
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    warn!(error = %abort_err, "failed to abort vote transaction");
                }
                Err(err)
            }
        }
    }

    async fn insert_backup(&self, backup: BackupEntity) -> MongoResult<()> {
        let id = backup.id;
        let document: MongoBackupDocument = backup.into();
        let collection = self.backup_collection().await;
        collection
            .insert_one(&document)
            .await
            .map_err(|source| MongoDaoError::SaveBackup { id, source })?;

        Ok(())
    }

    async fn find_backup(&self, id: Uuid) -> MongoResult<Option<BackupEntity>> {
        let collection = self.backup_collection().await;

        let document = collection
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadBackup { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn list_backup_summaries(
        &self,
        jam_id: String,
    ) -> MongoResult<Vec<BackupSummaryEntity>> {
        let collection = self.backup_summary_collection().await;

        // The embedded payload is excluded server-side; summaries stay cheap
        // even when snapshots hold thousands of votes.
        let documents: Vec<MongoBackupSummaryDocument> = collection
            .find(doc! {"jam_id": &jam_id})
            .projection(doc! {"themes": 0, "votes": 0})
            .sort(doc! {"created_at": -1})
            .await
            .map_err(|source| MongoDaoError::ListBackups {
                jam: jam_id.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListBackups {
                jam: jam_id.clone(),
                source,
            })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn delete_backups(&self, ids: Vec<Uuid>) -> MongoResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let collection = self.backup_collection().await;
        let result = collection
            .delete_many(doc! {"_id": ids_filter(&ids)})
            .await
            .map_err(|source| MongoDaoError::DeleteBackups { source })?;

        Ok(result.deleted_count)
    }

    async fn prune_automatic_backups_before(&self, cutoff: SystemTime) -> MongoResult<u64> {
        let collection = self.backup_collection().await;
        let result = collection
            .delete_many(doc! {
                "kind": BackupKind::Automatic.as_str(),
                "created_at": {"$lt": DateTime::from_system_time(cutoff)},
            })
            .await
            .map_err(|source| MongoDaoError::PruneBackups { source })?;

        Ok(result.deleted_count)
    }

    async fn apply_restore(&self, backup: BackupEntity) -> MongoResult<()> {
        let (client, database) = self.client_and_database().await;

        let mut session = client
            .start_session()
            .await
            .map_err(|source| MongoDaoError::Transaction {
                op: "apply_restore",
                source,
            })?;
        session
            .start_transaction()
            .await
            .map_err(|source| MongoDaoError::Transaction {
                op: "apply_restore",
                source,
            })?;

        match apply_restore_in_session(&database, &mut session, backup).await {
            Ok(()) => {
                session
                    .commit_transaction()
                    .await
                    .map_err(|source| MongoDaoError::Transaction {
                        op: "apply_restore",
                        source,
                    })?;
                Ok(())
            }
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    warn!(error = %abort_err, "failed to abort restore transaction");
                }
                Err(err)
            }
        }
    }
}

/// Runs the vote sequence inside an open transaction: verify the theme still
/// exists, read the previous value, upsert the row, bump the score when the
/// delta is non-zero.
async fn apply_vote_in_session(
    database: &Database,
    session: &mut ClientSession,
    user_id: &str,
    theme_id: Uuid,
    value: i32,
    now: SystemTime,
) -> MongoResult<VoteOutcome> {
    let themes = database.collection::<MongoThemeDocument>(THEME_COLLECTION_NAME);
    let votes = database.collection::<MongoVoteDocument>(VOTE_COLLECTION_NAME);

    let theme = themes
        .find_one(doc_id(theme_id))
        .session(&mut *session)
        .await
        .map_err(|source| MongoDaoError::LoadTheme {
            id: theme_id,
            source,
        })?;
    if theme.is_none() {
        return Err(MongoDaoError::MissingTheme { id: theme_id });
    }

    let filter = doc! {"user_id": user_id, "theme_id": theme_id.to_string()};
    let previous = votes
        .find_one(filter.clone())
        .session(&mut *session)
        .await
        .map_err(|source| MongoDaoError::ListVotes { source })?
        .map(|vote| vote.value)
        .unwrap_or(0);

    let update = doc! {
        "$set": {"value": value, "updated_at": DateTime::from_system_time(now)},
        "$setOnInsert": {"_id": Uuid::new_v4().to_string()},
    };
    votes
        .update_one(filter, update)
        .upsert(true)
        .session(&mut *session)
        .await
        .map_err(|source| {
            if is_duplicate_key(&source) {
                MongoDaoError::Duplicate {
                    collection: VOTE_COLLECTION_NAME,
                }
            } else {
                MongoDaoError::SaveVote {
                    theme: theme_id,
                    source,
                }
            }
        })?;

    let outcome = VoteOutcome { previous, value };
    let delta = outcome.delta();
    if delta != 0 {
        themes
            .update_one(doc_id(theme_id), doc! {"$inc": {"score": delta}})
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::UpdateScore {
                id: theme_id,
                source,
            })?;
    }

    Ok(outcome)
}

/// Runs the snapshot replay inside an open transaction: drop live votes for
/// the captured theme ids, overwrite the captured scores, re-insert the
/// captured votes with their original timestamps, then bump the snapshot's
/// restore counter.
async fn apply_restore_in_session(
    database: &Database,
    session: &mut ClientSession,
    backup: BackupEntity,
) -> MongoResult<()> {
    let themes = database.collection::<MongoThemeDocument>(THEME_COLLECTION_NAME);
    let votes = database.collection::<MongoVoteDocument>(VOTE_COLLECTION_NAME);
    let backups = database.collection::<MongoBackupDocument>(BACKUP_COLLECTION_NAME);

    let theme_ids: Vec<Uuid> = backup.themes.iter().map(|theme| theme.id).collect();
    if !theme_ids.is_empty() {
        votes
            .delete_many(doc! {"theme_id": ids_filter(&theme_ids)})
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::DeleteVotes { source })?;
    }

    for theme in &backup.themes {
        themes
            .update_one(doc_id(theme.id), doc! {"$set": {"score": theme.score}})
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::RestoreThemes {
                jam: backup.jam_id.clone(),
                source,
            })?;
    }

    if !backup.votes.is_empty() {
        let documents: Vec<MongoVoteDocument> = backup
            .votes
            .iter()
            .cloned()
            .map(|vote| MongoVoteDocument::new(VoteEntity::from(vote)))
            .collect();
        votes
            .insert_many(documents)
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::RestoreVotes {
                jam: backup.jam_id.clone(),
                source,
            })?;
    }

    backups
        .update_one(doc_id(backup.id), doc! {"$inc": {"restore_count": 1}})
        .session(&mut *session)
        .await
        .map_err(|source| MongoDaoError::SaveBackup {
            id: backup.id,
            source,
        })?;

    Ok(())
}

impl JamStore for MongoJamStore {
    fn upsert_jam(&self, jam: JamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_jam(jam).await.map_err(Into::into) })
    }

    fn find_jam(&self, id: String) -> BoxFuture<'static, StorageResult<Option<JamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_jam(id).await.map_err(Into::into) })
    }

    fn list_jams(&self) -> BoxFuture<'static, StorageResult<Vec<JamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_jams().await.map_err(Into::into) })
    }

    fn list_voting_open_jams(&self) -> BoxFuture<'static, StorageResult<Vec<JamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_voting_open_jams().await.map_err(Into::into) })
    }

    fn insert_theme(&self, theme: ThemeEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_theme(theme).await.map_err(Into::into) })
    }

    fn find_theme(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<ThemeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_theme(id).await.map_err(Into::into) })
    }

    fn list_themes(&self, jam_id: String) -> BoxFuture<'static, StorageResult<Vec<ThemeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_themes(jam_id).await.map_err(Into::into) })
    }

    fn delete_themes(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.delete_themes(ids).await.map_err(Into::into) })
    }

    fn set_theme_score(&self, id: Uuid, score: i64) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.set_theme_score(id, score).await.map_err(Into::into) })
    }

    fn reset_theme_scores(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.reset_theme_scores(ids).await.map_err(Into::into) })
    }

    fn list_votes_for_user(
        &self,
        user_id: String,
        theme_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<VoteEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_votes_for_user(user_id, theme_ids)
                .await
                .map_err(Into::into)
        })
    }

    fn list_votes_for_themes(
        &self,
        theme_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<VoteEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_votes_for_themes(theme_ids)
                .await
                .map_err(Into::into)
        })
    }

    fn delete_votes_for_themes(
        &self,
        theme_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete_votes_for_themes(theme_ids)
                .await
                .map_err(Into::into)
        })
    }

    fn apply_vote(
        &self,
        user_id: String,
        theme_id: Uuid,
        value: i32,
        now: SystemTime,
    ) -> BoxFuture<'static, StorageResult<VoteOutcome>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .apply_vote(user_id, theme_id, value, now)
                .await
                .map_err(Into::into)
        })
    }

    fn insert_backup(&self, backup: BackupEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.insert_backup(backup).await.map_err(Into::into) })
    }

    fn find_backup(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<BackupEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_backup(id).await.map_err(Into::into) })
    }

    fn list_backup_summaries(
        &self,
        jam_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<BackupSummaryEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_backup_summaries(jam_id)
                .await
                .map_err(Into::into)
        })
    }

    fn delete_backups(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.delete_backups(ids).await.map_err(Into::into) })
    }

    fn prune_automatic_backups_before(
        &self,
        cutoff: SystemTime,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .prune_automatic_backups_before(cutoff)
                .await
                .map_err(Into::into)
        })
    }

    fn apply_restore(&self, backup: BackupEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.apply_restore(backup).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
