/// Identity-based capability checks shared by all services.
pub mod access;
/// Vote backup capture, retention and restore.
pub mod backup_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Admin operations on jam records.
pub mod jam_service;
/// Periodic automatic backups and retention pruning.
pub mod scheduler;
/// Storage connection supervision and degraded-mode tracking.
pub mod storage_supervisor;
/// Voting, theme listings and theme administration.
pub mod vote_service;
