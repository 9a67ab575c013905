use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::ThemeEntity;

/// Payload submitted when a user casts or changes a vote.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SubmitVoteRequest {
    pub theme_id: Uuid,
    /// -1 (down), 0 (abstain) or +1 (up).
    #[validate(range(min = -1, max = 1))]
    pub value: i32,
}

/// Accepted vote echoed back to the caller.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitVoteResponse {
    pub theme_id: Uuid,
    pub value: i32,
}

/// Query options for the theme listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListThemesQuery {
    /// Include per-theme vote aggregates (admins only; silently ignored otherwise).
    #[serde(default)]
    pub aggregate: bool,
}

/// Up/down tallies for one theme; value-0 votes count in neither direction.
#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct VoteAggregate {
    pub up: u64,
    pub down: u64,
    pub sum: i64,
}

/// Public projection of a theme, annotated with the caller's own vote.
#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeSummary {
    pub id: Uuid,
    pub name: String,
    pub score: i64,
    /// The requesting user's current vote value, 0 when none.
    pub own_vote: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<VoteAggregate>,
}

impl From<(ThemeEntity, i32)> for ThemeSummary {
    fn from((theme, own_vote): (ThemeEntity, i32)) -> Self {
        Self {
            id: theme.id,
            name: theme.name,
            score: theme.score,
            own_vote,
            aggregate: None,
        }
    }
}
