//! Admin operations on jam records themselves: creation, updates and the
//! management listing.

use std::time::SystemTime;

use tracing::info;

use crate::{
    dao::models::JamEntity,
    dto::{
        admin::{JamSummary, UpsertJamRequest},
        validation::validate_jam_slug,
    },
    error::ServiceError,
    services::access::{self, Action, Identity},
    state::SharedState,
};

/// Create a jam under the given slug, or update its title and voting flag if
/// it already exists. The original creation timestamp is preserved.
pub async fn upsert_jam(
    state: &SharedState,
    identity: &Identity,
    jam_id: String,
    request: UpsertJamRequest,
) -> Result<JamSummary, ServiceError> {
    access::require(identity, Action::ManageJams)?;

    if let Err(err) = validate_jam_slug(&jam_id) {
        return Err(ServiceError::InvalidInput(err.to_string()));
    }

    let store = state.require_store().await?;
    let created_at = match store.find_jam(jam_id.clone()).await? {
        Some(existing) => existing.created_at,
        None => SystemTime::now(),
    };

    let jam = JamEntity {
        id: jam_id,
        title: request.title,
        theme_voting_open: request.theme_voting_open,
        created_at,
    };
    store.upsert_jam(jam.clone()).await?;

    info!(
        jam = %jam.id,
        voting_open = jam.theme_voting_open,
        "upserted jam"
    );

    Ok(jam.into())
}

/// List every jam, newest first.
pub async fn list_jams(
    state: &SharedState,
    identity: &Identity,
) -> Result<Vec<JamSummary>, ServiceError> {
    access::require(identity, Action::ManageJams)?;

    let store = state.require_store().await?;
    let jams = store.list_jams().await?;
    Ok(jams.into_iter().map(Into::into).collect())
}
