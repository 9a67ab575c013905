//! Business logic powering the public voting routes and the admin theme
//! operations: vote application, theme listings with per-user annotations,
//! score recalculation, bulk theme replacement and vote resets.

use std::{
    collections::{HashMap, HashSet},
    time::SystemTime,
};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::models::{BackupKind, ThemeEntity, VoteEntity},
    dto::{
        admin::{ActionResponse, ReplaceThemesResponse, ResetVotesResponse},
        validation::validate_theme_names,
        vote::{SubmitVoteRequest, SubmitVoteResponse, ThemeSummary, VoteAggregate},
    },
    error::ServiceError,
    services::{
        access::{self, Action, Identity},
        backup_service,
    },
    state::SharedState,
};

/// Record or change the caller's vote on a theme and apply the score delta.
pub async fn submit_vote(
    state: &SharedState,
    identity: &Identity,
    request: SubmitVoteRequest,
) -> Result<SubmitVoteResponse, ServiceError> {
    access::require(identity, Action::SubmitVote)?;

    // The route validator already bounds the value; guard again for callers
    // that bypass the HTTP layer.
    if !(-1..=1).contains(&request.value) {
        return Err(ServiceError::InvalidInput(format!(
            "vote value must be -1, 0 or 1 (got {})",
            request.value
        )));
    }

    let store = state.require_store().await?;
    let Some(theme) = store.find_theme(request.theme_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "theme `{}` not found",
            request.theme_id
        )));
    };

    let outcome = store
        .apply_vote(
            identity.user_id.clone(),
            theme.id,
            request.value,
            SystemTime::now(),
        )
        .await?;

    debug!(
        user = %identity.user_id,
        theme = %theme.id,
        value = outcome.value,
        delta = outcome.delta(),
        "vote applied"
    );

    Ok(SubmitVoteResponse {
        theme_id: theme.id,
        value: outcome.value,
    })
}

/// List a jam's themes sorted case-insensitively by name, annotated with the
/// caller's own vote and, for admins requesting them, per-theme aggregates.
pub async fn list_themes(
    state: &SharedState,
    identity: Option<&Identity>,
    jam_id: String,
    include_aggregate: bool,
) -> Result<Vec<ThemeSummary>, ServiceError> {
    let store = state.require_store().await?;

    let mut themes = store.list_themes(jam_id).await?;
    themes.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    let theme_ids: Vec<Uuid> = themes.iter().map(|theme| theme.id).collect();

    // Only verified users ever see a nonzero own-vote annotation.
    let own_votes: HashMap<Uuid, i32> = match identity {
        Some(identity) if identity.email_verified => store
            .list_votes_for_user(identity.user_id.clone(), theme_ids.clone())
            .await?
            .into_iter()
            .map(|vote| (vote.theme_id, vote.value))
            .collect(),
        _ => HashMap::new(),
    };

    // Non-admin aggregate requests silently degrade to the plain listing.
    let aggregates = if include_aggregate
        && identity.is_some_and(|identity| access::allows(identity, Action::ViewVoteAggregates))
    {
        let votes = store.list_votes_for_themes(theme_ids).await?;
        Some(aggregate_votes(&votes))
    } else {
        None
    };

    Ok(themes
        .into_iter()
        .map(|theme| {
            let own_vote = own_votes.get(&theme.id).copied().unwrap_or(0);
            let mut summary = ThemeSummary::from((theme, own_vote));
            if let Some(ref aggregates) = aggregates {
                summary.aggregate = Some(
                    aggregates
                        .get(&summary.id)
                        .cloned()
                        .unwrap_or(VoteAggregate {
                            up: 0,
                            down: 0,
                            sum: 0,
                        }),
                );
            }
            summary
        })
        .collect())
}

/// Overwrite each stored score with the exact sum of its current vote rows.
/// Idempotent; used to repair drift between the ledger and the counters.
pub async fn recalculate_scores(
    state: &SharedState,
    identity: &Identity,
    jam_id: String,
) -> Result<ActionResponse, ServiceError> {
    access::require(identity, Action::RecalculateScores)?;

    let store = state.require_store().await?;
    let Some(jam) = store.find_jam(jam_id).await? else {
        return Err(ServiceError::NotFound("jam not found".into()));
    };

    let themes = store.list_themes(jam.id.clone()).await?;
    let theme_ids: Vec<Uuid> = themes.iter().map(|theme| theme.id).collect();
    let votes = store.list_votes_for_themes(theme_ids).await?;
    let sums = sum_votes_per_theme(&votes);

    let mut corrected = 0_u64;
    for theme in &themes {
        let expected = sums.get(&theme.id).copied().unwrap_or(0);
        if theme.score != expected {
            store.set_theme_score(theme.id, expected).await?;
            corrected += 1;
        }
    }

    info!(
        jam = %jam.id,
        themes = themes.len(),
        corrected,
        "recalculated theme scores"
    );

    Ok(ActionResponse {
        message: format!(
            "recalculated {} theme score(s), corrected {corrected}",
            themes.len()
        ),
    })
}

/// Replace the jam's theme list with `names`, diffing case-insensitively:
/// matched themes keep their id, score and votes; missing ones are deleted
/// with their votes; new names are created at score 0.
pub async fn replace_themes(
    state: &SharedState,
    identity: &Identity,
    jam_id: String,
    names: Vec<String>,
) -> Result<ReplaceThemesResponse, ServiceError> {
    access::require(identity, Action::ReplaceThemes)?;

    if let Err(err) = validate_theme_names(&names) {
        return Err(ServiceError::InvalidInput(err.to_string()));
    }

    let store = state.require_store().await?;
    let Some(jam) = store.find_jam(jam_id).await? else {
        return Err(ServiceError::NotFound("jam not found".into()));
    };

    let existing = store.list_themes(jam.id.clone()).await?;
    let diff = diff_theme_names(&existing, &names);

    // A purely additive replace is not destructive; only snapshot when the
    // diff deletes something. The snapshot is best-effort by contract.
    if !diff.removed.is_empty() {
        if let Err(err) = backup_service::create_backup(
            state,
            &jam.id,
            BackupKind::PreUpdate,
            Some(identity.user_id.clone()),
            Some("before theme replacement".to_owned()),
        )
        .await
        {
            warn!(
                jam = %jam.id,
                error = %err,
                "pre-update snapshot failed; proceeding with theme replacement"
            );
        }
    }

    // Deletions are hard errors: stopping half-way would leave vote rows
    // pointing at deleted themes. Votes go first.
    let votes_deleted = store.delete_votes_for_themes(diff.removed.clone()).await?;
    let removed = store.delete_themes(diff.removed.clone()).await?;

    let mut added = 0_u64;
    for name in diff.added {
        let theme = ThemeEntity {
            id: Uuid::new_v4(),
            jam_id: jam.id.clone(),
            name,
            score: 0,
            created_at: SystemTime::now(),
        };
        let theme_name = theme.name.clone();
        match store.insert_theme(theme).await {
            Ok(()) => added += 1,
            Err(err) => warn!(
                jam = %jam.id,
                name = %theme_name,
                error = %err,
                "failed to insert theme during replacement"
            ),
        }
    }

    info!(
        jam = %jam.id,
        kept = diff.kept.len(),
        added,
        removed,
        votes_deleted,
        "replaced theme list"
    );

    Ok(ReplaceThemesResponse {
        kept: diff.kept.len() as u64,
        added,
        removed,
    })
}

/// Delete every vote row for the jam's themes and reset all scores to 0,
/// preceded by a mandatory safety snapshot.
pub async fn reset_votes(
    state: &SharedState,
    identity: &Identity,
    jam_id: String,
) -> Result<ResetVotesResponse, ServiceError> {
    access::require(identity, Action::ResetVotes)?;

    let store = state.require_store().await?;
    let Some(jam) = store.find_jam(jam_id).await? else {
        return Err(ServiceError::NotFound("jam not found".into()));
    };

    // Unlike the replace path, a failed snapshot aborts the wipe: there is
    // no other way back from it.
    backup_service::create_backup(
        state,
        &jam.id,
        BackupKind::PreUpdate,
        Some(identity.user_id.clone()),
        Some("before vote reset".to_owned()),
    )
    .await?;

    let themes = store.list_themes(jam.id.clone()).await?;
    let theme_ids: Vec<Uuid> = themes.iter().map(|theme| theme.id).collect();

    let votes_deleted = store.delete_votes_for_themes(theme_ids.clone()).await?;
    let themes_reset = store.reset_theme_scores(theme_ids).await?;

    info!(
        jam = %jam.id,
        votes_deleted,
        themes_reset,
        "reset jam votes"
    );

    Ok(ResetVotesResponse {
        votes_deleted,
        themes_reset,
    })
}

/// Case-insensitive diff of stored themes against a requested name list.
struct ThemeDiff {
    /// Ids of themes whose name matched a requested name.
    kept: Vec<Uuid>,
    /// Trimmed names with no stored counterpart, in request order.
    added: Vec<String>,
    /// Ids of themes missing from the request.
    removed: Vec<Uuid>,
}

fn diff_theme_names(existing: &[ThemeEntity], requested: &[String]) -> ThemeDiff {
    let existing_keys: HashSet<String> = existing
        .iter()
        .map(|theme| theme.name.trim().to_lowercase())
        .collect();

    let mut requested_keys = HashSet::new();
    let mut added = Vec::new();
    for name in requested {
        let trimmed = name.trim();
        let key = trimmed.to_lowercase();
        // Intra-request duplicates are rejected upstream.
        if requested_keys.insert(key.clone()) && !existing_keys.contains(&key) {
            added.push(trimmed.to_owned());
        }
    }

    let mut kept = Vec::new();
    let mut removed = Vec::new();
    for theme in existing {
        let key = theme.name.trim().to_lowercase();
        if requested_keys.contains(&key) {
            kept.push(theme.id);
        } else {
            removed.push(theme.id);
        }
    }

    ThemeDiff {
        kept,
        added,
        removed,
    }
}

/// Tally up/down counts per theme; value-0 rows count in neither direction.
fn aggregate_votes(votes: &[VoteEntity]) -> HashMap<Uuid, VoteAggregate> {
    let mut aggregates: HashMap<Uuid, VoteAggregate> = HashMap::new();
    for vote in votes {
        let entry = aggregates.entry(vote.theme_id).or_insert(VoteAggregate {
            up: 0,
            down: 0,
            sum: 0,
        });
        match vote.value {
            1 => entry.up += 1,
            -1 => entry.down += 1,
            _ => {}
        }
    }

    for entry in aggregates.values_mut() {
        entry.sum = entry.up as i64 - entry.down as i64;
    }

    aggregates
}

/// Exact per-theme sum of current vote values.
fn sum_votes_per_theme(votes: &[VoteEntity]) -> HashMap<Uuid, i64> {
    let mut sums: HashMap<Uuid, i64> = HashMap::new();
    for vote in votes {
        *sums.entry(vote.theme_id).or_insert(0) += i64::from(vote.value);
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme(name: &str) -> ThemeEntity {
        ThemeEntity {
            id: Uuid::new_v4(),
            jam_id: "jam".to_string(),
            name: name.to_string(),
            score: 0,
            created_at: SystemTime::now(),
        }
    }

    fn vote(theme_id: Uuid, user: &str, value: i32) -> VoteEntity {
        VoteEntity {
            user_id: user.to_string(),
            theme_id,
            value,
            updated_at: SystemTime::now(),
        }
    }

    #[test]
    fn diff_keeps_case_insensitive_matches() {
        let existing = vec![theme("Retro")];
        let diff = diff_theme_names(&existing, &["retro".to_string()]);

        assert_eq!(diff.kept, vec![existing[0].id]);
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn diff_replaces_a_b_with_b_c() {
        let a = theme("A");
        let b = theme("B");
        let existing = vec![a.clone(), b.clone()];

        let diff = diff_theme_names(&existing, &["B".to_string(), "C".to_string()]);

        assert_eq!(diff.kept, vec![b.id]);
        assert_eq!(diff.added, vec!["C".to_string()]);
        assert_eq!(diff.removed, vec![a.id]);
    }

    #[test]
    fn diff_trims_before_comparing() {
        let existing = vec![theme("Space")];
        let diff = diff_theme_names(&existing, &["  space  ".to_string(), " Ocean ".to_string()]);

        assert_eq!(diff.kept, vec![existing[0].id]);
        assert_eq!(diff.added, vec!["Ocean".to_string()]);
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn diff_of_empty_request_removes_everything() {
        let existing = vec![theme("A"), theme("B")];
        let diff = diff_theme_names(&existing, &[]);

        assert!(diff.kept.is_empty());
        assert!(diff.added.is_empty());
        assert_eq!(diff.removed.len(), 2);
    }

    #[test]
    fn aggregate_excludes_zero_votes() {
        let theme_id = Uuid::new_v4();
        let votes = vec![
            vote(theme_id, "u1", 1),
            vote(theme_id, "u2", 1),
            vote(theme_id, "u3", -1),
            vote(theme_id, "u4", 0),
        ];

        let aggregates = aggregate_votes(&votes);
        let entry = aggregates.get(&theme_id).unwrap();

        assert_eq!(entry.up, 2);
        assert_eq!(entry.down, 1);
        assert_eq!(entry.sum, 1);
    }

    #[test]
    fn aggregate_skips_themes_without_votes() {
        let aggregates = aggregate_votes(&[]);
        assert!(aggregates.is_empty());
    }

    #[test]
    fn sums_count_every_row() {
        let theme_id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let votes = vec![
            vote(theme_id, "u1", 1),
            vote(theme_id, "u2", -1),
            vote(theme_id, "u3", -1),
            vote(other, "u1", 1),
        ];

        let sums = sum_votes_per_theme(&votes);
        assert_eq!(sums.get(&theme_id).copied(), Some(-1));
        assert_eq!(sums.get(&other).copied(), Some(1));
    }
}
