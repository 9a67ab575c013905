/// Jam, theme, vote and backup storage operations.
pub mod jam_store;
/// Database model definitions.
pub mod models;
/// Storage abstraction layer for database operations.
pub mod storage;
