use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dao::models::{
    BackupEntity, BackupKind, BackupSummaryEntity, BackupThemeEntity, BackupVoteEntity, JamEntity,
    ThemeEntity, VoteEntity,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoJamDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    theme_voting_open: bool,
    created_at: DateTime,
}

impl From<JamEntity> for MongoJamDocument {
    fn from(value: JamEntity) -> Self {
        Self {
            id: value.id,
            title: value.title,
            theme_voting_open: value.theme_voting_open,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoJamDocument> for JamEntity {
    fn from(value: MongoJamDocument) -> Self {
        Self {
            id: value.id,
            title: value.title,
            theme_voting_open: value.theme_voting_open,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoThemeDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    jam_id: String,
    name: String,
    score: i64,
    created_at: DateTime,
}

impl From<ThemeEntity> for MongoThemeDocument {
    fn from(value: ThemeEntity) -> Self {
        Self {
            id: value.id,
            jam_id: value.jam_id,
            name: value.name,
            score: value.score,
            created_at: DateTime::from_system_time(value.created_at),
        }
    }
}

impl From<MongoThemeDocument> for ThemeEntity {
    fn from(value: MongoThemeDocument) -> Self {
        Self {
            id: value.id,
            jam_id: value.jam_id,
            name: value.name,
            score: value.score,
            created_at: value.created_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoVoteDocument {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub user_id: String,
    pub theme_id: Uuid,
    pub value: i32,
    pub updated_at: DateTime,
}

impl MongoVoteDocument {
    /// Wrap a vote entity for insertion, minting a fresh row id.
    pub fn new(vote: VoteEntity) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: vote.user_id,
            theme_id: vote.theme_id,
            value: vote.value,
            updated_at: DateTime::from_system_time(vote.updated_at),
        }
    }
}

impl From<MongoVoteDocument> for VoteEntity {
    fn from(value: MongoVoteDocument) -> Self {
        Self {
            user_id: value.user_id,
            theme_id: value.theme_id,
            value: value.value,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoBackupThemeDocument {
    id: Uuid,
    name: String,
    score: i64,
}

impl From<BackupThemeEntity> for MongoBackupThemeDocument {
    fn from(value: BackupThemeEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            score: value.score,
        }
    }
}

impl From<MongoBackupThemeDocument> for BackupThemeEntity {
    fn from(value: MongoBackupThemeDocument) -> Self {
        Self {
            id: value.id,
            name: value.name,
            score: value.score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoBackupVoteDocument {
    user_id: String,
    theme_id: Uuid,
    value: i32,
    updated_at: DateTime,
}

impl From<BackupVoteEntity> for MongoBackupVoteDocument {
    fn from(value: BackupVoteEntity) -> Self {
        Self {
            user_id: value.user_id,
            theme_id: value.theme_id,
            value: value.value,
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl From<MongoBackupVoteDocument> for BackupVoteEntity {
    fn from(value: MongoBackupVoteDocument) -> Self {
        Self {
            user_id: value.user_id,
            theme_id: value.theme_id,
            value: value.value,
            updated_at: value.updated_at.to_system_time(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoBackupDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    jam_id: String,
    kind: BackupKind,
    created_at: DateTime,
    theme_count: u64,
    vote_count: u64,
    themes: Vec<MongoBackupThemeDocument>,
    votes: Vec<MongoBackupVoteDocument>,
    triggered_by: Option<String>,
    reason: Option<String>,
    #[serde(default)]
    restore_count: u32,
}

impl From<BackupEntity> for MongoBackupDocument {
    fn from(value: BackupEntity) -> Self {
        Self {
            id: value.id,
            jam_id: value.jam_id,
            kind: value.kind,
            created_at: DateTime::from_system_time(value.created_at),
            theme_count: value.theme_count,
            vote_count: value.vote_count,
            themes: value.themes.into_iter().map(Into::into).collect(),
            votes: value.votes.into_iter().map(Into::into).collect(),
            triggered_by: value.triggered_by,
            reason: value.reason,
            restore_count: value.restore_count,
        }
    }
}

impl From<MongoBackupDocument> for BackupEntity {
    fn from(value: MongoBackupDocument) -> Self {
        Self {
            id: value.id,
            jam_id: value.jam_id,
            kind: value.kind,
            created_at: value.created_at.to_system_time(),
            theme_count: value.theme_count,
            vote_count: value.vote_count,
            themes: value.themes.into_iter().map(Into::into).collect(),
            votes: value.votes.into_iter().map(Into::into).collect(),
            triggered_by: value.triggered_by,
            reason: value.reason,
            restore_count: value.restore_count,
        }
    }
}

/// Payload-free projection of a backup document used for summary listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoBackupSummaryDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    jam_id: String,
    kind: BackupKind,
    created_at: DateTime,
    theme_count: u64,
    vote_count: u64,
    triggered_by: Option<String>,
    reason: Option<String>,
    #[serde(default)]
    restore_count: u32,
}

impl From<MongoBackupSummaryDocument> for BackupSummaryEntity {
    fn from(value: MongoBackupSummaryDocument) -> Self {
        Self {
            id: value.id,
            jam_id: value.jam_id,
            kind: value.kind,
            created_at: value.created_at.to_system_time(),
            theme_count: value.theme_count,
            vote_count: value.vote_count,
            triggered_by: value.triggered_by,
            reason: value.reason,
            restore_count: value.restore_count,
        }
    }
}

// Uuid-valued fields are stored in canonical hyphenated string form, the
// same representation serde gives the document bodies, so filters and
// stored keys always compare equal.
pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}

/// `$in` filter clause matching any of the given ids.
pub fn ids_filter(ids: &[Uuid]) -> Document {
    let keys = ids.iter().map(Uuid::to_string).collect::<Vec<_>>();
    doc! {"$in": keys}
}
