use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Jam record scoping themes, votes and backups together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JamEntity {
    /// Stable slug identifying the jam (lowercase, url-safe).
    pub id: String,
    /// Human readable jam title.
    pub title: String,
    /// Whether theme voting is currently open; the scheduler only snapshots
    /// jams where this is set.
    pub theme_voting_open: bool,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
}

/// Vote-eligible theme nominated for a jam.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeEntity {
    /// Stable identifier for the theme.
    pub id: Uuid,
    /// Slug of the jam this theme belongs to.
    pub jam_id: String,
    /// Display name, unique per jam case-insensitively.
    pub name: String,
    /// Running score: incrementally maintained sum of all vote values.
    pub score: i64,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
}

/// One user's vote on one theme. At most one row exists per (user, theme)
/// pair; a missing row reads as value 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VoteEntity {
    /// Identifier of the voting user, issued by the external auth layer.
    pub user_id: String,
    /// Theme the vote applies to.
    pub theme_id: Uuid,
    /// Vote value, always -1, 0 or 1.
    pub value: i32,
    /// Last time this vote was (re)submitted.
    pub updated_at: SystemTime,
}

/// Result of atomically applying a vote: the previous stored value (0 when
/// no row existed) and the value now stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub previous: i32,
    pub value: i32,
}

impl VoteOutcome {
    /// Signed score delta the vote application added to the theme.
    pub fn delta(&self) -> i64 {
        i64::from(self.value) - i64::from(self.previous)
    }
}

/// Discriminates how a backup snapshot came to exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackupKind {
    /// Explicitly requested by an admin.
    Manual,
    /// Created by the scheduler on its fixed interval.
    Automatic,
    /// Safety snapshot taken immediately before a destructive bulk operation.
    PreUpdate,
}

impl BackupKind {
    /// Wire/storage spelling of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupKind::Manual => "manual",
            BackupKind::Automatic => "automatic",
            BackupKind::PreUpdate => "pre_update",
        }
    }
}

/// Theme state embedded in a backup snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackupThemeEntity {
    /// Identifier of the captured theme.
    pub id: Uuid,
    /// Display name at capture time.
    pub name: String,
    /// Score at capture time.
    pub score: i64,
}

/// Vote row embedded in a backup snapshot, timestamp preserved verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackupVoteEntity {
    /// Identifier of the voting user.
    pub user_id: String,
    /// Theme the vote applied to.
    pub theme_id: Uuid,
    /// Vote value at capture time.
    pub value: i32,
    /// Original last-updated timestamp of the vote.
    pub updated_at: SystemTime,
}

/// Immutable point-in-time copy of a jam's themes and votes. Only
/// `restore_count` may change after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackupEntity {
    /// Stable identifier for the snapshot.
    pub id: Uuid,
    /// Slug of the jam this snapshot belongs to.
    pub jam_id: String,
    /// How the snapshot was created.
    pub kind: BackupKind,
    /// Capture timestamp.
    pub created_at: SystemTime,
    /// Number of themes captured, denormalised for summary listings.
    pub theme_count: u64,
    /// Number of votes captured, denormalised for summary listings.
    pub vote_count: u64,
    /// Full embedded copy of every theme of the jam at capture time.
    pub themes: Vec<BackupThemeEntity>,
    /// Full embedded copy of every vote of the jam at capture time.
    pub votes: Vec<BackupVoteEntity>,
    /// User who triggered the snapshot, when one did.
    pub triggered_by: Option<String>,
    /// Free-form reason recorded at creation.
    pub reason: Option<String>,
    /// How many times this snapshot has been restored into live state.
    pub restore_count: u32,
}

/// Summary projection of a backup (everything but the embedded payload).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackupSummaryEntity {
    /// Stable identifier for the snapshot.
    pub id: Uuid,
    /// Slug of the jam this snapshot belongs to.
    pub jam_id: String,
    /// How the snapshot was created.
    pub kind: BackupKind,
    /// Capture timestamp.
    pub created_at: SystemTime,
    /// Number of themes captured.
    pub theme_count: u64,
    /// Number of votes captured.
    pub vote_count: u64,
    /// User who triggered the snapshot, when one did.
    pub triggered_by: Option<String>,
    /// Free-form reason recorded at creation.
    pub reason: Option<String>,
    /// How many times this snapshot has been restored into live state.
    pub restore_count: u32,
}

impl From<&ThemeEntity> for BackupThemeEntity {
    fn from(theme: &ThemeEntity) -> Self {
        Self {
            id: theme.id,
            name: theme.name.clone(),
            score: theme.score,
        }
    }
}

impl From<&VoteEntity> for BackupVoteEntity {
    fn from(vote: &VoteEntity) -> Self {
        Self {
            user_id: vote.user_id.clone(),
            theme_id: vote.theme_id,
            value: vote.value,
            updated_at: vote.updated_at,
        }
    }
}

impl From<BackupVoteEntity> for VoteEntity {
    fn from(value: BackupVoteEntity) -> Self {
        Self {
            user_id: value.user_id,
            theme_id: value.theme_id,
            value: value.value,
            updated_at: value.updated_at,
        }
    }
}

impl From<BackupEntity> for BackupSummaryEntity {
    fn from(entity: BackupEntity) -> Self {
        Self {
            id: entity.id,
            jam_id: entity.jam_id,
            kind: entity.kind,
            created_at: entity.created_at,
            theme_count: entity.theme_count,
            vote_count: entity.vote_count,
            triggered_by: entity.triggered_by,
            reason: entity.reason,
            restore_count: entity.restore_count,
        }
    }
}
