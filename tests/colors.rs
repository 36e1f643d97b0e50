//! Cursor color assignment: uniqueness, overflow, audit, and resolution.

mod common;

use puzzle_rush_back::{
    dto::color::AssignColorRequest,
    error::ServiceError,
    services::color_service,
};
use uuid::Uuid;

#[tokio::test]
async fn roster_receives_unique_palette_colors() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 4).await;

    let mut seen = Vec::new();
    for user_id in &players {
        let assigned = color_service::assign(
            &state,
            AssignColorRequest {
                user_id: *user_id,
                team_id,
            },
        )
        .await
        .expect("assign color");
        assert!(assigned.success);
        assert!(
            state.config().palette().contains(&assigned.color),
            "color {} not in palette",
            assigned.color
        );
        assert!(!seen.contains(&assigned.color), "duplicate color handed out");
        seen.push(assigned.color);
    }

    let audit = color_service::validate(&state, team_id)
        .await
        .expect("validate");
    assert!(audit.is_valid);
    assert!(audit.conflicts.is_empty());
}

#[tokio::test]
async fn overflow_player_gets_the_fallback_color() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 5).await;

    for user_id in &players[..4] {
        color_service::assign(
            &state,
            AssignColorRequest {
                user_id: *user_id,
                team_id,
            },
        )
        .await
        .expect("assign color");
    }

    let overflow = color_service::assign(
        &state,
        AssignColorRequest {
            user_id: players[4],
            team_id,
        },
    )
    .await
    .expect("overflow assignment");
    assert!(!overflow.success);
    assert_eq!(overflow.color, state.config().fallback_color());
}

#[tokio::test]
async fn assignment_is_idempotent() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 1).await;

    let req = || AssignColorRequest {
        user_id: players[0],
        team_id,
    };
    let first = color_service::assign(&state, req()).await.expect("first");
    let second = color_service::assign(&state, req()).await.expect("second");
    assert_eq!(first.color, second.color);
    assert!(second.success);
}

#[tokio::test]
async fn outsiders_and_unknowns_are_rejected() {
    let state = common::engine().await;
    let (team_id, _) = common::team_with_players(&state, 1).await;
    let (_, outsiders) = common::team_with_players(&state, 1).await;

    let err = color_service::assign(
        &state,
        AssignColorRequest {
            user_id: outsiders[0],
            team_id,
        },
    )
    .await
    .expect_err("player from another team");
    assert!(matches!(err, ServiceError::InvalidInput(_)));

    let err = color_service::assign(
        &state,
        AssignColorRequest {
            user_id: Uuid::new_v4(),
            team_id,
        },
    )
    .await
    .expect_err("unknown player");
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn audit_reports_every_duplicate_holder() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 3).await;

    let store = state.store().await.expect("store installed");
    for user_id in &players[..2] {
        let mut player = store
            .find_player(*user_id)
            .await
            .expect("store read")
            .expect("player exists");
        player.color = Some("red".into());
        store.update_player(player).await.expect("store write");
    }

    let audit = color_service::validate(&state, team_id)
        .await
        .expect("validate");
    assert!(!audit.is_valid);
    assert_eq!(audit.conflicts.len(), 1);
    assert_eq!(audit.conflicts[0].color, "red");
    assert_eq!(audit.conflicts[0].count, 2);
    for user_id in &players[..2] {
        assert!(audit.conflicts[0].user_ids.contains(user_id));
    }
}

#[tokio::test]
async fn resolution_is_deterministic_in_roster_order() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 4).await;

    // Everyone ends up red; resolution must spread the palette back out.
    let store = state.store().await.expect("store installed");
    for user_id in &players {
        let mut player = store
            .find_player(*user_id)
            .await
            .expect("store read")
            .expect("player exists");
        player.color = Some("red".into());
        store.update_player(player).await.expect("store write");
    }

    let resolved = color_service::resolve_conflicts(&state, team_id)
        .await
        .expect("resolve");
    assert!(resolved.success);
    // The first roster member already holds red, so only three change.
    assert_eq!(resolved.reassignments.len(), 3);

    let palette = state.config().palette();
    for (index, user_id) in players.iter().enumerate() {
        let player = store
            .find_player(*user_id)
            .await
            .expect("store read")
            .expect("player exists");
        assert_eq!(player.color.as_deref(), Some(palette[index].as_str()));
    }

    let audit = color_service::validate(&state, team_id)
        .await
        .expect("validate");
    assert!(audit.is_valid);
}
