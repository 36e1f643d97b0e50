//! Point economy: round-robin rewards, decay, and elimination.

mod common;

use puzzle_rush_back::{
    dao::models::SessionStatus,
    dto::puzzle::AnswerRequest,
    error::ServiceError,
    services::{points, puzzle_service, session_service},
};
use uuid::Uuid;

async fn answer_correct(
    state: &puzzle_rush_back::state::SharedState,
    user_id: Uuid,
) -> puzzle_rush_back::dto::puzzle::AnswerResponse {
    let puzzle = puzzle_service::current_puzzle(state, user_id)
        .await
        .expect("current puzzle");
    puzzle_service::submit_answer(
        state,
        AnswerRequest {
            puzzle_id: puzzle.id,
            user_id,
            answer: puzzle.correct_answer.clone(),
        },
    )
    .await
    .expect("submit answer")
}

#[tokio::test]
async fn reward_rotates_and_wraps_around_the_roster() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 3).await;
    common::active_session(&state, team_id).await;

    let first = answer_correct(&state, players[0]).await;
    assert_eq!(first.awarded_to_user_id, Some(players[1]));

    let second = answer_correct(&state, players[1]).await;
    assert_eq!(second.awarded_to_user_id, Some(players[2]));

    // The last roster member pays the first.
    let third = answer_correct(&state, players[2]).await;
    assert_eq!(third.awarded_to_user_id, Some(players[0]));
}

#[tokio::test]
async fn wrong_answer_still_rotates_the_puzzle() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 2).await;
    common::active_session(&state, team_id).await;

    let puzzle = puzzle_service::current_puzzle(&state, players[0])
        .await
        .expect("current puzzle");
    let outcome = puzzle_service::submit_answer(
        &state,
        AnswerRequest {
            puzzle_id: puzzle.id,
            user_id: players[0],
            answer: "definitely-wrong".into(),
        },
    )
    .await
    .expect("submit answer");

    assert!(!outcome.correct);
    assert_eq!(outcome.awarded_to_user_id, None);
    assert_eq!(outcome.points_awarded, 0);
    assert_ne!(outcome.next_puzzle_id, puzzle.id);

    let replacement = puzzle_service::current_puzzle(&state, players[0])
        .await
        .expect("replacement dealt");
    assert_eq!(replacement.id, outcome.next_puzzle_id);
}

#[tokio::test]
async fn eliminated_successor_forfeits_the_reward() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 3).await;
    common::active_session(&state, team_id).await;

    let store = state.store().await.expect("store installed");
    let mut successor = store
        .find_player(players[1])
        .await
        .expect("store read")
        .expect("player exists");
    successor.points = 0;
    store.update_player(successor).await.expect("store write");

    let outcome = answer_correct(&state, players[0]).await;
    assert!(outcome.correct);
    assert_eq!(outcome.awarded_to_user_id, None);
    assert_eq!(outcome.points_awarded, 0);
}

#[tokio::test]
async fn solo_player_earns_nothing_from_correct_answers() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 1).await;
    common::active_session(&state, team_id).await;

    let outcome = answer_correct(&state, players[0]).await;
    assert!(outcome.correct);
    assert_eq!(outcome.awarded_to_user_id, None);
    assert_eq!(outcome.points_awarded, 0);
}

#[tokio::test]
async fn resolved_puzzles_refuse_further_answers() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 2).await;
    common::active_session(&state, team_id).await;

    let puzzle = puzzle_service::current_puzzle(&state, players[0])
        .await
        .expect("current puzzle");
    let outcome = puzzle_service::submit_answer(
        &state,
        AnswerRequest {
            puzzle_id: puzzle.id,
            user_id: players[0],
            answer: puzzle.correct_answer.clone(),
        },
    )
    .await
    .expect("first answer");

    let err = puzzle_service::submit_answer(
        &state,
        AnswerRequest {
            puzzle_id: puzzle.id,
            user_id: players[0],
            answer: puzzle.correct_answer.clone(),
        },
    )
    .await
    .expect_err("second answer on the same puzzle");
    assert!(matches!(err, ServiceError::PreconditionFailed(_)));

    // The rejection mutated nothing: the replacement from the first answer is
    // still the player's only active puzzle, and no further reward landed.
    let current = puzzle_service::current_puzzle(&state, players[0])
        .await
        .expect("current puzzle");
    assert_eq!(current.id, outcome.next_puzzle_id);

    let store = state.store().await.expect("store installed");
    let rewarded = store
        .find_player(players[1])
        .await
        .expect("store read")
        .expect("player exists");
    assert_eq!(
        rewarded.points,
        state.config().starting_points() + state.config().points_award()
    );
}

#[tokio::test]
async fn eliminated_player_cannot_answer() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 2).await;
    common::active_session(&state, team_id).await;

    let puzzle = puzzle_service::current_puzzle(&state, players[0])
        .await
        .expect("current puzzle");

    let store = state.store().await.expect("store installed");
    let mut solver = store
        .find_player(players[0])
        .await
        .expect("store read")
        .expect("player exists");
    solver.points = 0;
    store.update_player(solver).await.expect("store write");

    let err = puzzle_service::submit_answer(
        &state,
        AnswerRequest {
            puzzle_id: puzzle.id,
            user_id: players[0],
            answer: puzzle.correct_answer.clone(),
        },
    )
    .await
    .expect_err("eliminated player must be refused");
    assert!(matches!(err, ServiceError::PreconditionFailed(_)));
}

#[tokio::test]
async fn decay_reduces_points_and_floors_at_zero() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 3).await;
    common::active_session(&state, team_id).await;

    let store = state.store().await.expect("store installed");
    let mut nearly_out = store
        .find_player(players[2])
        .await
        .expect("store read")
        .expect("player exists");
    nearly_out.points = 1;
    store.update_player(nearly_out).await.expect("store write");

    let decayed = points::decay_tick(&state).await.expect("decay tick");
    assert_eq!(decayed, 3);

    let starting = state.config().starting_points();
    let decay = state.config().decay_amount();
    for (i, expected) in [(0, starting - decay), (1, starting - decay), (2, 0)] {
        let player = store
            .find_player(players[i])
            .await
            .expect("store read")
            .expect("player exists");
        assert_eq!(player.points, expected, "player {i}");
    }

    // Already-eliminated players are not decayed again.
    let decayed = points::decay_tick(&state).await.expect("second tick");
    assert_eq!(decayed, 2);
}

#[tokio::test]
async fn full_elimination_finishes_the_session() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 2).await;
    let session_id = common::active_session(&state, team_id).await;

    let store = state.store().await.expect("store installed");
    for user_id in &players {
        let mut player = store
            .find_player(*user_id)
            .await
            .expect("store read")
            .expect("player exists");
        player.points = 1;
        store.update_player(player).await.expect("store write");
    }

    points::decay_tick(&state).await.expect("decay tick");

    let session = session_service::latest_session(&state, team_id)
        .await
        .expect("latest session");
    assert_eq!(session.id, session_id);
    assert_eq!(session.status, SessionStatus::Finished);
    assert!(session.ended_at.is_some());
    assert!(session.survival_time_seconds.is_some_and(|s| s >= 0));

    // A finished session frees the team for a new one.
    let fresh = session_service::create_session(
        &state,
        puzzle_rush_back::dto::session::CreateSessionRequest {
            team_id,
            countdown_seconds: Some(600),
        },
    )
    .await
    .expect("new session after elimination");
    assert_ne!(fresh.id, session_id);
}

#[tokio::test]
async fn manual_team_decay_reports_touched_players() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 2).await;
    common::active_session(&state, team_id).await;

    let response = points::decay_team(&state, team_id).await.expect("decay");
    assert_eq!(response.decayed_players, players.len());

    let err = points::decay_team(&state, Uuid::new_v4())
        .await
        .expect_err("unknown team");
    assert!(matches!(err, ServiceError::NotFound(_)));
}
