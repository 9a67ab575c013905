//! Error types shared by the MongoDB storage implementation.

use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;
use uuid::Uuid;

/// Convenient result alias returning [`MongoDaoError`] failures.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Failures that can occur while interacting with MongoDB.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save jam `{id}`")]
    SaveJam {
        id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to load jam `{id}`")]
    LoadJam {
        id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to list jams")]
    ListJams {
        #[source]
        source: MongoError,
    },
    #[error("failed to save theme `{id}`")]
    SaveTheme {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load theme `{id}`")]
    LoadTheme {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list themes for jam `{jam}`")]
    ListThemes {
        jam: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete themes")]
    DeleteThemes {
        #[source]
        source: MongoError,
    },
    #[error("failed to save vote for theme `{theme}`")]
    SaveVote {
        theme: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("theme `{id}` no longer exists")]
    MissingTheme { id: Uuid },
    #[error("failed to reset theme scores")]
    ResetScores {
        #[source]
        source: MongoError,
    },
    #[error("failed to update score of theme `{id}`")]
    UpdateScore {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list votes")]
    ListVotes {
        #[source]
        source: MongoError,
    },
    #[error("failed to delete votes")]
    DeleteVotes {
        #[source]
        source: MongoError,
    },
    #[error("failed to save backup `{id}`")]
    SaveBackup {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to load backup `{id}`")]
    LoadBackup {
        id: Uuid,
        #[source]
        source: MongoError,
    },
    #[error("failed to list backups for jam `{jam}`")]
    ListBackups {
        jam: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete backups")]
    DeleteBackups {
        #[source]
        source: MongoError,
    },
    #[error("failed to prune automatic backups")]
    PruneBackups {
        #[source]
        source: MongoError,
    },
    #[error("failed to restore themes for jam `{jam}`")]
    RestoreThemes {
        jam: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to restore votes for jam `{jam}`")]
    RestoreVotes {
        jam: String,
        #[source]
        source: MongoError,
    },
    #[error("transaction failure during {op}")]
    Transaction {
        op: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("duplicate key rejected by collection `{collection}`")]
    Duplicate { collection: &'static str },
}

/// True when the driver error is a unique-index violation (E11000).
pub fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}
