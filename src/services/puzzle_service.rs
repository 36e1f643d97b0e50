use std::sync::Arc;

use indexmap::IndexMap;
use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        models::{ConcentrationPair, PuzzleData, PuzzleEntity, PuzzleStatus, PuzzleType},
        store::GameStore,
    },
    dto::puzzle::{
        AnswerRequest, AnswerResponse, CreatePuzzleRequest, PlayerPoints, PuzzleStateResponse,
        TeamPoints,
    },
    error::ServiceError,
    services::{broadcast, points},
    state::SharedState,
};

/// Colors used inside memory and concentration puzzle payloads.
const PUZZLE_COLORS: [&str; 4] = ["red", "blue", "yellow", "green"];
/// Pair count of a concentration run.
const CONCENTRATION_PAIRS: usize = 10;
/// Seconds each concentration pair is shown.
const CONCENTRATION_PAIR_SECONDS: u8 = 2;

/// Generate the payload and expected answer for a puzzle family.
pub fn generate(kind: PuzzleType) -> (PuzzleData, String) {
    let mut rng = rand::rng();
    match kind {
        PuzzleType::Memory => {
            let mut colors: Vec<String> =
                PUZZLE_COLORS.iter().map(|color| color.to_string()).collect();
            colors.shuffle(&mut rng);

            let mapping: IndexMap<String, String> = colors
                .iter()
                .enumerate()
                .map(|(i, color)| ((i + 1).to_string(), color.clone()))
                .collect();
            let question_number = rng.random_range(1..=colors.len()).to_string();
            let answer = mapping[&question_number].clone();

            (
                PuzzleData::Memory {
                    mapping,
                    question_number,
                    choices: colors,
                },
                answer,
            )
        }
        PuzzleType::Concentration => {
            let match_index = rng.random_range(0..CONCENTRATION_PAIRS);
            let pairs = (0..CONCENTRATION_PAIRS)
                .map(|i| {
                    let color_word = PUZZLE_COLORS
                        .choose(&mut rng)
                        .copied()
                        .unwrap_or("red")
                        .to_string();
                    let circle_color = if i == match_index {
                        color_word.clone()
                    } else {
                        // Any color except the word itself.
                        PUZZLE_COLORS
                            .iter()
                            .filter(|color| **color != color_word)
                            .copied()
                            .collect::<Vec<_>>()
                            .choose(&mut rng)
                            .copied()
                            .unwrap_or("blue")
                            .to_string()
                    };
                    ConcentrationPair {
                        color_word,
                        circle_color,
                        is_match: i == match_index,
                    }
                })
                .collect();

            (
                PuzzleData::Concentration {
                    pairs,
                    duration: CONCENTRATION_PAIR_SECONDS,
                },
                match_index.to_string(),
            )
        }
        // Fully client-driven families: the server only records the outcome.
        PuzzleType::Spatial | PuzzleType::Multitasking => {
            (PuzzleData::Blank {}, "solved".to_string())
        }
    }
}

/// Uniformly random puzzle family.
pub fn random_kind() -> PuzzleType {
    PuzzleType::ALL
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(PuzzleType::Memory)
}

fn build(kind: PuzzleType, session_id: Uuid, user_id: Uuid) -> PuzzleEntity {
    let (data, correct_answer) = generate(kind);
    PuzzleEntity {
        id: Uuid::new_v4(),
        kind,
        data,
        correct_answer,
        status: PuzzleStatus::Active,
        game_session_id: session_id,
        user_id,
        created_at: OffsetDateTime::now_utc(),
        solved_at: None,
    }
}

/// Deal a fresh random-family puzzle to a player and persist it.
pub async fn spawn_for_player(
    store: &Arc<dyn GameStore>,
    session_id: Uuid,
    user_id: Uuid,
) -> Result<PuzzleEntity, ServiceError> {
    let puzzle = build(random_kind(), session_id, user_id);
    store.insert_puzzle(puzzle.clone()).await?;
    Ok(puzzle)
}

/// Create a puzzle of an explicitly requested family for a player.
pub async fn create_puzzle(
    state: &SharedState,
    req: CreatePuzzleRequest,
) -> Result<PuzzleStateResponse, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_session(req.game_session_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("game session `{}` not found", req.game_session_id))
        })?;
    store
        .find_player(req.user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{}` not found", req.user_id)))?;

    let puzzle = build(req.kind, req.game_session_id, req.user_id);
    store.insert_puzzle(puzzle.clone()).await?;

    broadcast::broadcast_state(state, req.game_session_id).await;
    Ok(puzzle.into())
}

/// The player's current active puzzle.
pub async fn current_puzzle(
    state: &SharedState,
    user_id: Uuid,
) -> Result<PuzzleStateResponse, ServiceError> {
    let store = state.require_store().await?;
    store
        .active_puzzle_for_player(user_id)
        .await?
        .map(PuzzleStateResponse::from)
        .ok_or_else(|| ServiceError::NotFound(format!("no active puzzle for player `{user_id}`")))
}

/// Resolve an answer submission.
///
/// Correctness is verbatim string equality. The solver never receives the
/// reward; a correct answer pays the next roster member instead, and a
/// replacement puzzle is dealt to the solver whatever the outcome was.
pub async fn submit_answer(
    state: &SharedState,
    req: AnswerRequest,
) -> Result<AnswerResponse, ServiceError> {
    let store = state.require_store().await?;

    let mut puzzle = store
        .find_puzzle(req.puzzle_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("puzzle `{}` not found", req.puzzle_id)))?;
    let player = store
        .find_player(req.user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{}` not found", req.user_id)))?;

    if puzzle.user_id != player.id {
        return Err(ServiceError::PreconditionFailed(
            "puzzle belongs to another player".into(),
        ));
    }
    if puzzle.status != PuzzleStatus::Active {
        return Err(ServiceError::PreconditionFailed(
            "puzzle is not active".into(),
        ));
    }
    if player.is_eliminated() {
        return Err(ServiceError::PreconditionFailed(
            "eliminated players cannot answer puzzles".into(),
        ));
    }

    let correct = req.answer == puzzle.correct_answer;
    puzzle.status = if correct {
        PuzzleStatus::Solved
    } else {
        PuzzleStatus::Failed
    };
    puzzle.solved_at = Some(OffsetDateTime::now_utc());
    store.update_puzzle(puzzle.clone()).await?;

    let (awarded_to_user_id, points_awarded) = if correct {
        points::award_round_robin(state, &store, &player).await?
    } else {
        (None, 0)
    };

    // The rotation never stalls on a wrong answer.
    let next = spawn_for_player(&store, puzzle.game_session_id, player.id).await?;
    info!(
        puzzle_id = %puzzle.id,
        user_id = %player.id,
        correct,
        next_puzzle_id = %next.id,
        "answer resolved"
    );

    broadcast::broadcast_state(state, puzzle.game_session_id).await;

    let message = match (correct, awarded_to_user_id) {
        (true, Some(target)) => format!("correct; {points_awarded} points awarded to `{target}`"),
        (true, None) => "correct; no eligible teammate for the reward".to_string(),
        (false, _) => "incorrect answer".to_string(),
    };
    Ok(AnswerResponse {
        correct,
        awarded_to_user_id,
        points_awarded,
        message,
        next_puzzle_id: next.id,
        next_puzzle: next.into(),
    })
}

/// Current point totals for a team in roster order.
pub async fn team_points(state: &SharedState, team_id: Uuid) -> Result<TeamPoints, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}` not found")))?;

    let players = store
        .players_by_team(team_id)
        .await?
        .into_iter()
        .map(|player| PlayerPoints {
            user_id: player.id,
            username: player.username,
            points: player.points,
        })
        .collect();
    Ok(TeamPoints { team_id, players })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_answer_matches_mapping() {
        for _ in 0..50 {
            let (data, answer) = generate(PuzzleType::Memory);
            match data {
                PuzzleData::Memory {
                    mapping,
                    question_number,
                    choices,
                } => {
                    assert_eq!(mapping.len(), 4);
                    assert_eq!(choices.len(), 4);
                    assert_eq!(mapping[&question_number], answer);
                    for color in PUZZLE_COLORS {
                        assert!(choices.iter().any(|c| c == color));
                    }
                }
                other => panic!("unexpected payload: {other:?}"),
            }
        }
    }

    #[test]
    fn concentration_has_exactly_one_match() {
        for _ in 0..50 {
            let (data, answer) = generate(PuzzleType::Concentration);
            match data {
                PuzzleData::Concentration { pairs, duration } => {
                    assert_eq!(pairs.len(), CONCENTRATION_PAIRS);
                    assert_eq!(duration, CONCENTRATION_PAIR_SECONDS);
                    let matches: Vec<usize> = pairs
                        .iter()
                        .enumerate()
                        .filter(|(_, pair)| pair.is_match)
                        .map(|(i, _)| i)
                        .collect();
                    assert_eq!(matches.len(), 1);
                    assert_eq!(answer, matches[0].to_string());
                    for pair in &pairs {
                        assert_eq!(pair.is_match, pair.color_word == pair.circle_color);
                    }
                }
                other => panic!("unexpected payload: {other:?}"),
            }
        }
    }

    #[test]
    fn client_driven_families_expect_solved() {
        for kind in [PuzzleType::Spatial, PuzzleType::Multitasking] {
            let (data, answer) = generate(kind);
            assert_eq!(data, PuzzleData::Blank {});
            assert_eq!(answer, "solved");
        }
    }

    #[test]
    fn random_kind_is_a_known_family() {
        for _ in 0..20 {
            assert!(PuzzleType::ALL.contains(&random_kind()));
        }
    }
}
