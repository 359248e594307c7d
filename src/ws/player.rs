//! Player message handlers
//!
//! Handlers for joining and for the four kinds of submission.

use super::handlers::Session;
use crate::game::error::SubmitError;
use crate::game::player::JoinOutcome;
use crate::game::Submitted;
use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::{GamePhase, PlayerId, Role};
use std::sync::Arc;

pub async fn handle_join(
    state: &Arc<AppState>,
    session: &mut Session,
    player_id: PlayerId,
    display_name: String,
    icon: String,
) -> Option<ServerMessage> {
    if session.role != Role::Player {
        return Some(ServerMessage::Error {
            code: "UNAUTHORIZED".to_string(),
            msg: "Only players can join".to_string(),
        });
    }
    if let Some(bound) = &session.player_id {
        if *bound != player_id {
            return Some(ServerMessage::Error {
                code: "PLAYER_MISMATCH".to_string(),
                msg: "This connection belongs to another player".to_string(),
            });
        }
    }

    // Repeating a join on a bound connection must not count it twice
    if session.player_id.as_deref() == Some(player_id.as_str()) {
        if let Some(player) = state.get_player(&player_id).await {
            return Some(ServerMessage::JoinAccepted {
                player,
                rejoined: true,
            });
        }
    }

    tracing::info!("Join request from {}: {:?}", player_id, display_name);
    match state.join_player(&player_id, &display_name, &icon).await {
        Ok(outcome) => {
            let rejoined = matches!(outcome, JoinOutcome::Rejoined(_));
            session.player_id = Some(player_id);
            Some(ServerMessage::JoinAccepted {
                player: outcome.player().clone(),
                rejoined,
            })
        }
        Err(e) => {
            tracing::warn!("Join rejected for {}: {}", player_id, e);
            Some(ServerMessage::JoinRejected {
                code: e.code().to_string(),
                msg: e.to_string(),
            })
        }
    }
}

pub async fn handle_submit_answer(
    state: &Arc<AppState>,
    player_id: PlayerId,
    text: String,
) -> Option<ServerMessage> {
    let result = state.submit_answer(&player_id, &text).await;
    submission_reply(&player_id, GamePhase::Question, result)
}

pub async fn handle_submit_elimination_vote(
    state: &Arc<AppState>,
    player_id: PlayerId,
    answer_text: String,
) -> Option<ServerMessage> {
    let result = state
        .submit_elimination_vote(&player_id, &answer_text)
        .await;
    submission_reply(&player_id, GamePhase::Elimination, result)
}

pub async fn handle_submit_final_vote(
    state: &Arc<AppState>,
    player_id: PlayerId,
    answer_text: String,
) -> Option<ServerMessage> {
    let result = state.submit_final_vote(&player_id, &answer_text).await;
    submission_reply(&player_id, GamePhase::Voting, result)
}

pub async fn handle_submit_bonus_vote(
    state: &Arc<AppState>,
    player_id: PlayerId,
    voted_player_id: PlayerId,
) -> Option<ServerMessage> {
    let result = state
        .submit_bonus_vote(&player_id, &voted_player_id)
        .await;
    submission_reply(&player_id, GamePhase::BonusQuestion, result)
}

/// Input rejections go back to the submitter only; stale submissions get no reply
fn submission_reply(
    player_id: &str,
    phase: GamePhase,
    result: Result<Submitted, SubmitError>,
) -> Option<ServerMessage> {
    match result {
        Ok(Submitted::Recorded) => Some(ServerMessage::SubmissionAccepted { phase, first: true }),
        Ok(Submitted::AlreadySubmitted) => Some(ServerMessage::SubmissionAccepted {
            phase,
            first: false,
        }),
        Ok(Submitted::Ignored { .. }) => None,
        Err(e) => {
            tracing::warn!("Rejected {:?} submission from {}: {}", phase, player_id, e);
            Some(ServerMessage::SubmissionRejected {
                code: e.code().to_string(),
                msg: e.to_string(),
            })
        }
    }
}
