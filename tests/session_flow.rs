//! Session lifecycle: creation, countdown, activation, and finishing.

mod common;

use std::time::Duration;

use puzzle_rush_back::{
    dao::models::{PuzzleStatus, SessionStatus},
    dto::{puzzle::AnswerRequest, session::CreateSessionRequest},
    error::ServiceError,
    services::{broadcast, countdown, health_service, puzzle_service, session_service},
};

#[tokio::test]
async fn create_session_enters_countdown() {
    let state = common::engine().await;
    let (team_id, _) = common::team_with_players(&state, 2).await;

    let session = session_service::create_session(
        &state,
        CreateSessionRequest {
            team_id,
            countdown_seconds: Some(30),
        },
    )
    .await
    .expect("create session");

    assert_eq!(session.status, SessionStatus::Countdown);
    assert!(session.started_at.is_none());
    assert!(countdown::is_running(&state, session.id));
}

#[tokio::test]
async fn second_unfinished_session_is_rejected() {
    let state = common::engine().await;
    let (team_id, _) = common::team_with_players(&state, 2).await;

    session_service::create_session(
        &state,
        CreateSessionRequest {
            team_id,
            countdown_seconds: Some(30),
        },
    )
    .await
    .expect("first session");

    let err = session_service::create_session(
        &state,
        CreateSessionRequest {
            team_id,
            countdown_seconds: Some(30),
        },
    )
    .await
    .expect_err("second session must conflict");
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test(start_paused = true)]
async fn countdown_expiry_activates_and_deals_puzzles() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 4).await;

    let session = session_service::create_session(
        &state,
        CreateSessionRequest {
            team_id,
            countdown_seconds: Some(5),
        },
    )
    .await
    .expect("create session");

    tokio::time::sleep(Duration::from_secs(6)).await;

    let refreshed = session_service::latest_session(&state, team_id)
        .await
        .expect("latest session");
    assert_eq!(refreshed.status, SessionStatus::Active);
    assert!(refreshed.started_at.is_some());
    assert!(!countdown::is_running(&state, session.id));

    let starting = state.config().starting_points();
    let store = state.store().await.expect("store installed");
    for user_id in players {
        let player = store
            .find_player(user_id)
            .await
            .expect("store read")
            .expect("player exists");
        assert_eq!(player.points, starting);
        let puzzle = puzzle_service::current_puzzle(&state, user_id)
            .await
            .expect("active puzzle dealt");
        assert_eq!(puzzle.status, PuzzleStatus::Active);
    }
}

#[tokio::test]
async fn manual_start_supersedes_the_timer() {
    let state = common::engine().await;
    let (team_id, _) = common::team_with_players(&state, 2).await;

    let session = session_service::create_session(
        &state,
        CreateSessionRequest {
            team_id,
            countdown_seconds: Some(600),
        },
    )
    .await
    .expect("create session");
    assert!(countdown::is_running(&state, session.id));

    let activated = session_service::activate_session(&state, session.id)
        .await
        .expect("manual activation");
    assert_eq!(activated.status, SessionStatus::Active);
    assert!(!countdown::is_running(&state, session.id));

    // A second start finds the session already active.
    let err = session_service::activate_session(&state, session.id)
        .await
        .expect_err("double activation must fail");
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[tokio::test]
async fn transition_table_is_enforced_end_to_end() {
    let state = common::engine().await;
    let (team_id, _) = common::team_with_players(&state, 2).await;

    let session = session_service::create_session(
        &state,
        CreateSessionRequest {
            team_id,
            countdown_seconds: Some(600),
        },
    )
    .await
    .expect("create session");

    // countdown -> finished skips a state.
    let err = session_service::finish_session(&state, session.id)
        .await
        .expect_err("cannot finish a countdown session");
    assert!(matches!(err, ServiceError::InvalidTransition(_)));

    session_service::activate_session(&state, session.id)
        .await
        .expect("activate");

    // Nothing ever goes back to lobby.
    let err = session_service::update_state(&state, session.id, SessionStatus::Lobby)
        .await
        .expect_err("lobby is unreachable");
    assert!(matches!(err, ServiceError::InvalidTransition(_)));

    let finished = session_service::update_state(&state, session.id, SessionStatus::Finished)
        .await
        .expect("finish");
    assert_eq!(finished.status, SessionStatus::Finished);
    assert!(finished.ended_at.is_some());
    assert!(finished.survival_time_seconds.is_some_and(|s| s >= 0));

    // Finished is terminal.
    for target in [
        SessionStatus::Lobby,
        SessionStatus::Countdown,
        SessionStatus::Active,
        SessionStatus::Finished,
    ] {
        let err = session_service::update_state(&state, session.id, target)
            .await
            .expect_err("terminal state must refuse every change");
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
    }
}

#[tokio::test]
async fn full_game_round_produces_consistent_snapshots() {
    let state = common::engine().await;
    let (team_id, players) = common::team_with_players(&state, 4).await;
    let session_id = common::active_session(&state, team_id).await;

    let snapshot = broadcast::snapshot(&state, session_id)
        .await
        .expect("snapshot");
    assert_eq!(snapshot.session.status, SessionStatus::Active);
    assert_eq!(snapshot.players.len(), 4);
    assert_eq!(snapshot.puzzles.len(), 4);
    for view in &snapshot.players {
        assert!(view.puzzle.is_some(), "every player holds a puzzle");
    }

    // First player answers correctly; the second inherits the reward.
    let solver = players[0];
    let puzzle = puzzle_service::current_puzzle(&state, solver)
        .await
        .expect("solver puzzle");
    let outcome = puzzle_service::submit_answer(
        &state,
        AnswerRequest {
            puzzle_id: puzzle.id,
            user_id: solver,
            answer: puzzle.correct_answer.clone(),
        },
    )
    .await
    .expect("answer");

    assert!(outcome.correct);
    assert_eq!(outcome.awarded_to_user_id, Some(players[1]));
    assert_eq!(outcome.points_awarded, state.config().points_award());
    assert_ne!(outcome.next_puzzle_id, puzzle.id);

    let snapshot = broadcast::snapshot(&state, session_id)
        .await
        .expect("snapshot after answer");
    let rewarded = snapshot
        .players
        .iter()
        .find(|p| p.id == players[1])
        .expect("rewarded player in snapshot");
    assert_eq!(
        rewarded.points,
        state.config().starting_points() + state.config().points_award()
    );
}

#[tokio::test]
async fn losing_the_store_degrades_instead_of_panicking() {
    let state = common::engine().await;
    let (team_id, _) = common::team_with_players(&state, 2).await;
    assert_eq!(health_service::probe(&state).await.status, "ok");

    state.clear_store().await;
    assert!(state.is_degraded().await);
    assert_eq!(health_service::probe(&state).await.status, "degraded");

    let err = session_service::create_session(
        &state,
        CreateSessionRequest {
            team_id,
            countdown_seconds: None,
        },
    )
    .await
    .expect_err("mutations must fail while degraded");
    assert!(matches!(err, ServiceError::Degraded));
}
