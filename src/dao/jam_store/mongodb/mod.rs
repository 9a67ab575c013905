mod connection;
mod error;
mod models;
pub mod config;
pub mod store;

pub use config::MongoConfig;
pub use error::MongoDaoError;
pub use store::MongoJamStore;

use crate::dao::storage::StorageError;

impl From<MongoDaoError> for StorageError {
    fn from(err: MongoDaoError) -> Self {
        match err {
            MongoDaoError::Duplicate { .. } | MongoDaoError::MissingTheme { .. } => {
                StorageError::conflict(err.to_string())
            }
            _ => StorageError::unavailable(err.to_string(), err),
        }
    }
}
