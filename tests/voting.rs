//! Vote submission and theme listing behavior against the in-memory store.

mod support;

use jamvote_back::{
    dto::vote::SubmitVoteRequest,
    error::ServiceError,
    services::vote_service,
    state::AppState,
};
use support::{admin, context, seed_jam, seed_themes, theme_score, unverified_user, verified_user, votes_for_theme};
use uuid::Uuid;

async fn vote(
    ctx: &support::TestContext,
    identity: &jamvote_back::services::access::Identity,
    theme_id: Uuid,
    value: i32,
) -> Result<jamvote_back::dto::vote::SubmitVoteResponse, ServiceError> {
    vote_service::submit_vote(&ctx.state, identity, SubmitVoteRequest { theme_id, value }).await
}

#[tokio::test]
async fn retro_space_scenario() {
    let ctx = context().await;
    seed_jam(&ctx, "summer-jam", true).await;
    let themes = seed_themes(&ctx, "summer-jam", &["Retro", "Space"]).await;
    let retro = themes["Retro"];
    let space = themes["Space"];
    let user = verified_user("user-1");

    vote(&ctx, &user, retro, 1).await.unwrap();
    assert_eq!(theme_score(&ctx, retro).await, 1);

    // Changing the vote applies the delta once, not the raw value again.
    vote(&ctx, &user, retro, -1).await.unwrap();
    assert_eq!(theme_score(&ctx, retro).await, -1);

    let response = vote_service::recalculate_scores(&ctx.state, &admin(), "summer-jam".into())
        .await
        .unwrap();
    assert_eq!(theme_score(&ctx, retro).await, -1);
    assert_eq!(theme_score(&ctx, space).await, 0);
    assert!(response.message.contains("corrected 0"));
}

#[tokio::test]
async fn resubmitting_the_same_value_is_idempotent() {
    let ctx = context().await;
    seed_jam(&ctx, "jam", true).await;
    let themes = seed_themes(&ctx, "jam", &["Retro"]).await;
    let retro = themes["Retro"];
    let user = verified_user("user-1");

    vote(&ctx, &user, retro, 1).await.unwrap();
    vote(&ctx, &user, retro, 1).await.unwrap();

    assert_eq!(theme_score(&ctx, retro).await, 1);
    assert_eq!(votes_for_theme(&ctx, retro).await.len(), 1);
}

#[tokio::test]
async fn vote_round_trip_through_zero() {
    let ctx = context().await;
    seed_jam(&ctx, "jam", true).await;
    let themes = seed_themes(&ctx, "jam", &["Retro"]).await;
    let retro = themes["Retro"];
    let user = verified_user("user-1");

    vote(&ctx, &user, retro, -1).await.unwrap();
    assert_eq!(theme_score(&ctx, retro).await, -1);

    // Abstaining is stored as an explicit zero row, not a deletion.
    vote(&ctx, &user, retro, 0).await.unwrap();
    assert_eq!(theme_score(&ctx, retro).await, 0);
    assert_eq!(votes_for_theme(&ctx, retro).await.len(), 1);

    vote(&ctx, &user, retro, 1).await.unwrap();
    assert_eq!(theme_score(&ctx, retro).await, 1);
}

#[tokio::test]
async fn unverified_user_cannot_vote() {
    let ctx = context().await;
    seed_jam(&ctx, "jam", true).await;
    let themes = seed_themes(&ctx, "jam", &["Retro"]).await;
    let retro = themes["Retro"];

    let result = vote(&ctx, &unverified_user("user-1"), retro, 1).await;

    assert!(matches!(result, Err(ServiceError::Forbidden(_))));
    assert_eq!(theme_score(&ctx, retro).await, 0);
    assert!(votes_for_theme(&ctx, retro).await.is_empty());
}

#[tokio::test]
async fn vote_on_unknown_theme_is_not_found() {
    let ctx = context().await;
    seed_jam(&ctx, "jam", true).await;

    let result = vote(&ctx, &verified_user("user-1"), Uuid::new_v4(), 1).await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}

#[tokio::test]
async fn out_of_range_vote_value_is_rejected() {
    let ctx = context().await;
    seed_jam(&ctx, "jam", true).await;
    let themes = seed_themes(&ctx, "jam", &["Retro"]).await;

    let result = vote(&ctx, &verified_user("user-1"), themes["Retro"], 2).await;
    assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
}

#[tokio::test]
async fn voting_without_a_store_reports_degraded() {
    let state = AppState::new();

    let result = vote_service::submit_vote(
        &state,
        &verified_user("user-1"),
        SubmitVoteRequest {
            theme_id: Uuid::new_v4(),
            value: 1,
        },
    )
    .await;

    assert!(matches!(result, Err(ServiceError::Degraded)));
}

#[tokio::test]
async fn listing_annotates_own_votes_for_verified_callers() {
    let ctx = context().await;
    seed_jam(&ctx, "jam", true).await;
    let themes = seed_themes(&ctx, "jam", &["Retro", "Space"]).await;
    let user = verified_user("user-1");
    vote(&ctx, &user, themes["Retro"], 1).await.unwrap();

    let listing = vote_service::list_themes(&ctx.state, Some(&user), "jam".into(), false)
        .await
        .unwrap();
    let retro = listing.iter().find(|theme| theme.name == "Retro").unwrap();
    let space = listing.iter().find(|theme| theme.name == "Space").unwrap();
    assert_eq!(retro.own_vote, 1);
    assert_eq!(space.own_vote, 0);

    // Anonymous callers always see zeroes.
    let anonymous = vote_service::list_themes(&ctx.state, None, "jam".into(), false)
        .await
        .unwrap();
    assert!(anonymous.iter().all(|theme| theme.own_vote == 0));
}

#[tokio::test]
async fn aggregates_are_admin_only_and_exclude_zero_votes() {
    let ctx = context().await;
    seed_jam(&ctx, "jam", true).await;
    let themes = seed_themes(&ctx, "jam", &["Retro", "Space"]).await;
    let retro = themes["Retro"];

    vote(&ctx, &verified_user("u1"), retro, 1).await.unwrap();
    vote(&ctx, &verified_user("u2"), retro, 1).await.unwrap();
    vote(&ctx, &verified_user("u3"), retro, -1).await.unwrap();
    // An explicit abstention must not count in either direction.
    vote(&ctx, &verified_user("u4"), retro, 1).await.unwrap();
    vote(&ctx, &verified_user("u4"), retro, 0).await.unwrap();

    let listing = vote_service::list_themes(&ctx.state, Some(&admin()), "jam".into(), true)
        .await
        .unwrap();
    let retro_row = listing.iter().find(|theme| theme.name == "Retro").unwrap();
    let aggregate = retro_row.aggregate.as_ref().unwrap();
    assert_eq!(aggregate.up, 2);
    assert_eq!(aggregate.down, 1);
    assert_eq!(aggregate.sum, 1);

    // Voteless themes still carry explicit zero counts for admins.
    let space_row = listing.iter().find(|theme| theme.name == "Space").unwrap();
    let space_aggregate = space_row.aggregate.as_ref().unwrap();
    assert_eq!(space_aggregate.up, 0);
    assert_eq!(space_aggregate.down, 0);

    // Non-admins asking for aggregates silently get the plain listing.
    let user_listing = vote_service::list_themes(
        &ctx.state,
        Some(&verified_user("u1")),
        "jam".into(),
        true,
    )
    .await
    .unwrap();
    assert!(user_listing.iter().all(|theme| theme.aggregate.is_none()));
}

#[tokio::test]
async fn listing_sorts_by_name_case_insensitively() {
    let ctx = context().await;
    seed_jam(&ctx, "jam", true).await;
    seed_themes(&ctx, "jam", &["banana", "Apple", "cherry"]).await;

    let listing = vote_service::list_themes(&ctx.state, None, "jam".into(), false)
        .await
        .unwrap();
    let names: Vec<&str> = listing.iter().map(|theme| theme.name.as_str()).collect();
    assert_eq!(names, vec!["Apple", "banana", "cherry"]);
}

#[tokio::test]
async fn listing_an_unknown_jam_yields_an_empty_list() {
    let ctx = context().await;

    let listing = vote_service::list_themes(&ctx.state, None, "missing".into(), false)
        .await
        .unwrap();
    assert!(listing.is_empty());
}
