//! Shared fixtures for the integration tests: an in-memory store honoring
//! the `JamStore` contract, plus identity and seeding helpers.
#![allow(dead_code)]

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::SystemTime,
};

use futures::future::BoxFuture;
use jamvote_back::{
    dao::{
        jam_store::JamStore,
        models::{
            BackupEntity, BackupKind, BackupSummaryEntity, JamEntity, ThemeEntity, VoteEntity,
            VoteOutcome,
        },
        storage::{StorageError, StorageResult},
    },
    dto::admin::UpsertJamRequest,
    services::{access::Identity, jam_service, vote_service},
    state::{AppState, SharedState},
};
use uuid::Uuid;

#[derive(Default)]
struct MemoryInner {
    jams: HashMap<String, JamEntity>,
    themes: HashMap<Uuid, ThemeEntity>,
    votes: HashMap<(String, Uuid), VoteEntity>,
    backups: HashMap<Uuid, BackupEntity>,
    // Insertion order per backup; breaks created_at ties so newest-first
    // listings stay deterministic even within one millisecond.
    backup_seq: HashMap<Uuid, u64>,
    next_seq: u64,
}

/// In-memory drop-in for the MongoDB store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn locked<T>(&self, apply: impl FnOnce(&mut MemoryInner) -> T) -> T {
        let mut guard = self.inner.lock().unwrap();
        apply(&mut guard)
    }
}

impl JamStore for MemoryStore {
    fn upsert_jam(&self, jam: JamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                inner.jams.insert(jam.id.clone(), jam);
                Ok(())
            })
        })
    }

    fn find_jam(&self, id: String) -> BoxFuture<'static, StorageResult<Option<JamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.locked(|inner| Ok(inner.jams.get(&id).cloned())) })
    }

    fn list_jams(&self) -> BoxFuture<'static, StorageResult<Vec<JamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let mut jams: Vec<JamEntity> = inner.jams.values().cloned().collect();
                jams.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                Ok(jams)
            })
        })
    }

    fn list_voting_open_jams(&self) -> BoxFuture<'static, StorageResult<Vec<JamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                Ok(inner
                    .jams
                    .values()
                    .filter(|jam| jam.theme_voting_open)
                    .cloned()
                    .collect())
            })
        })
    }

    fn insert_theme(&self, theme: ThemeEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let clash = inner.themes.values().any(|existing| {
                    existing.jam_id == theme.jam_id
                        && existing.name.to_lowercase() == theme.name.to_lowercase()
                });
                if clash {
                    return Err(StorageError::conflict(format!(
                        "duplicate theme name `{}`",
                        theme.name
                    )));
                }
                inner.themes.insert(theme.id, theme);
                Ok(())
            })
        })
    }

    fn find_theme(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<ThemeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.locked(|inner| Ok(inner.themes.get(&id).cloned())) })
    }

    fn list_themes(&self, jam_id: String) -> BoxFuture<'static, StorageResult<Vec<ThemeEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let mut themes: Vec<ThemeEntity> = inner
                    .themes
                    .values()
                    .filter(|theme| theme.jam_id == jam_id)
                    .cloned()
                    .collect();
                themes.sort_by(|a, b| a.created_at.cmp(&b.created_at));
                Ok(themes)
            })
        })
    }

    fn delete_themes(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let mut deleted = 0;
                for id in &ids {
                    if inner.themes.remove(id).is_some() {
                        deleted += 1;
                    }
                }
                Ok(deleted)
            })
        })
    }

    fn set_theme_score(&self, id: Uuid, score: i64) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                if let Some(theme) = inner.themes.get_mut(&id) {
                    theme.score = score;
                }
                Ok(())
            })
        })
    }

    fn reset_theme_scores(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let mut modified = 0;
                for id in &ids {
                    if let Some(theme) = inner.themes.get_mut(id)
                        && theme.score != 0
                    {
                        theme.score = 0;
                        modified += 1;
                    }
                }
                Ok(modified)
            })
        })
    }

    fn list_votes_for_user(
        &self,
        user_id: String,
        theme_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<VoteEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                Ok(inner
                    .votes
                    .values()
                    .filter(|vote| vote.user_id == user_id && theme_ids.contains(&vote.theme_id))
                    .cloned()
                    .collect())
            })
        })
    }

    fn list_votes_for_themes(
        &self,
        theme_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Vec<VoteEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                Ok(inner
                    .votes
                    .values()
                    .filter(|vote| theme_ids.contains(&vote.theme_id))
                    .cloned()
                    .collect())
            })
        })
    }

    fn delete_votes_for_themes(
        &self,
        theme_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let before = inner.votes.len();
                inner
                    .votes
                    .retain(|_, vote| !theme_ids.contains(&vote.theme_id));
                Ok((before - inner.votes.len()) as u64)
            })
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
            store.locked(|inner| {
                if !inner.themes.contains_key(&theme_id) {
                    return Err(StorageError::conflict(format!(
                        "theme `{theme_id}` no longer exists"
                    )));
                }

                let key = (user_id.clone(), theme_id);
                let previous = inner.votes.get(&key).map(|vote| vote.value).unwrap_or(0);
                inner.votes.insert(
                    key,
                    VoteEntity {
                        user_id,
                        theme_id,
                        value,
                        updated_at: now,
                    },
                );

                let outcome = VoteOutcome { previous, value };
                if outcome.delta() != 0
                    && let Some(theme) = inner.themes.get_mut(&theme_id)
                {
                    theme.score += outcome.delta();
                }
                Ok(outcome)
            })
        })
    }

    fn insert_backup(&self, backup: BackupEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let seq = inner.next_seq;
                inner.next_seq += 1;
                inner.backup_seq.insert(backup.id, seq);
                inner.backups.insert(backup.id, backup);
                Ok(())
            })
        })
    }

    fn find_backup(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<BackupEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.locked(|inner| Ok(inner.backups.get(&id).cloned())) })
    }

    fn list_backup_summaries(
        &self,
        jam_id: String,
    ) -> BoxFuture<'static, StorageResult<Vec<BackupSummaryEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let mut backups: Vec<&BackupEntity> = inner
                    .backups
                    .values()
                    .filter(|backup| backup.jam_id == jam_id)
                    .collect();
                backups.sort_by_key(|backup| {
                    std::cmp::Reverse(inner.backup_seq.get(&backup.id).copied().unwrap_or(0))
                });
                Ok(backups
                    .into_iter()
                    .map(|backup| BackupSummaryEntity::from(backup.clone()))
                    .collect())
            })
        })
    }

    fn delete_backups(&self, ids: Vec<Uuid>) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let mut deleted = 0;
                for id in &ids {
                    if inner.backups.remove(id).is_some() {
                        deleted += 1;
                    }
                }
                Ok(deleted)
            })
        })
    }

    fn prune_automatic_backups_before(
        &self,
        cutoff: SystemTime,
    ) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let before = inner.backups.len();
                inner.backups.retain(|_, backup| {
                    backup.kind != BackupKind::Automatic || backup.created_at >= cutoff
                });
                Ok((before - inner.backups.len()) as u64)
            })
        })
    }

    fn apply_restore(&self, backup: BackupEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.locked(|inner| {
                let captured_ids: HashSet<Uuid> =
                    backup.themes.iter().map(|theme| theme.id).collect();

                inner
                    .votes
                    .retain(|_, vote| !captured_ids.contains(&vote.theme_id));
                for captured in &backup.themes {
                    if let Some(theme) = inner.themes.get_mut(&captured.id) {
                        theme.score = captured.score;
                    }
                }
                for vote in &backup.votes {
                    let vote = VoteEntity::from(vote.clone());
                    inner
                        .votes
                        .insert((vote.user_id.clone(), vote.theme_id), vote);
                }
                if let Some(stored) = inner.backups.get_mut(&backup.id) {
                    stored.restore_count += 1;
                }
                Ok(())
            })
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

pub struct TestContext {
    pub state: SharedState,
    pub store: MemoryStore,
}

/// Fresh application state backed by an empty in-memory store.
pub async fn context() -> TestContext {
    let store = MemoryStore::new();
    let state = AppState::new();
    state.install_store(Arc::new(store.clone())).await;
    TestContext { state, store }
}

pub fn admin() -> Identity {
    Identity {
        user_id: "admin-1".to_string(),
        is_admin: true,
        email_verified: true,
    }
}

pub fn verified_user(id: &str) -> Identity {
    Identity {
        user_id: id.to_string(),
        is_admin: false,
        email_verified: true,
    }
}

pub fn unverified_user(id: &str) -> Identity {
    Identity {
        user_id: id.to_string(),
        is_admin: false,
        email_verified: false,
    }
}

pub async fn seed_jam(ctx: &TestContext, jam_id: &str, voting_open: bool) {
    jam_service::upsert_jam(
        &ctx.state,
        &admin(),
        jam_id.to_string(),
        UpsertJamRequest {
            title: format!("{jam_id} jam"),
            theme_voting_open: voting_open,
        },
    )
    .await
    .expect("seed jam");
}

/// Seed themes through the admin replace operation and return name -> id.
pub async fn seed_themes(
    ctx: &TestContext,
    jam_id: &str,
    names: &[&str],
) -> HashMap<String, Uuid> {
    vote_service::replace_themes(
        &ctx.state,
        &admin(),
        jam_id.to_string(),
        names.iter().map(|name| name.to_string()).collect(),
    )
    .await
    .expect("seed themes");

    theme_ids_by_name(ctx, jam_id).await
}

pub async fn theme_ids_by_name(ctx: &TestContext, jam_id: &str) -> HashMap<String, Uuid> {
    ctx.store
        .list_themes(jam_id.to_string())
        .await
        .expect("list themes")
        .into_iter()
        .map(|theme| (theme.name.clone(), theme.id))
        .collect()
}

pub async fn theme_score(ctx: &TestContext, theme_id: Uuid) -> i64 {
    ctx.store
        .find_theme(theme_id)
        .await
        .expect("find theme")
        .expect("theme exists")
        .score
}

pub async fn votes_for_theme(ctx: &TestContext, theme_id: Uuid) -> Vec<VoteEntity> {
    ctx.store
        .list_votes_for_themes(vec![theme_id])
        .await
        .expect("list votes")
}
