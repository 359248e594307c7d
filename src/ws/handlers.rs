//! WebSocket message dispatch
//!
//! This module provides the main entry point for handling client messages.
//! Authorization is checked here, then dispatched to role-specific handler modules.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{PlayerId, Role};
use std::sync::Arc;

use super::{host, player};

/// What one connection is allowed to act as
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub role: Role,
    /// Bound after a successful join (players) or on connect (host display)
    pub player_id: Option<PlayerId>,
}

impl Session {
    pub fn player() -> Self {
        Self {
            role: Role::Player,
            player_id: None,
        }
    }

    pub fn host(host_id: impl Into<PlayerId>) -> Self {
        Self {
            role: Role::Host,
            player_id: Some(host_id.into()),
        }
    }
}

/// Macro to check host authorization and return early if unauthorized.
/// A host display that has since been replaced loses its rights.
macro_rules! check_host {
    ($session:expr, $state:expr, $action:expr) => {
        let authorized = match ($session.role.clone(), $session.player_id.as_deref()) {
            (Role::Host, Some(host_id)) => $state.is_current_host(host_id).await,
            _ => false,
        };
        if !authorized {
            return Some(ServerMessage::Error {
                code: "UNAUTHORIZED".to_string(),
                msg: format!("Only host can {}", $action),
            });
        }
    };
}

/// Macro to check that a submission names the player bound to this connection
macro_rules! check_player {
    ($session:expr, $player_id:expr) => {
        match $session.player_id.as_deref() {
            Some(bound) if bound == $player_id.as_str() => {}
            Some(_) => {
                return Some(ServerMessage::Error {
                    code: "PLAYER_MISMATCH".to_string(),
                    msg: "This connection belongs to another player".to_string(),
                });
            }
            None => {
                return Some(ServerMessage::Error {
                    code: "NOT_JOINED".to_string(),
                    msg: "Join the game first".to_string(),
                });
            }
        }
    };
}

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    session: &mut Session,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::RequestSnapshot => Some(ServerMessage::Snapshot {
            snapshot: Box::new(state.snapshot().await),
        }),

        // Player messages
        ClientMessage::JoinGame {
            player_id,
            display_name,
            icon,
        } => player::handle_join(state, session, player_id, display_name, icon).await,

        ClientMessage::SubmitAnswer { player_id, text } => {
            check_player!(session, player_id);
            player::handle_submit_answer(state, player_id, text).await
        }

        ClientMessage::SubmitEliminationVote {
            player_id,
            answer_text,
        } => {
            check_player!(session, player_id);
            player::handle_submit_elimination_vote(state, player_id, answer_text).await
        }

        ClientMessage::SubmitFinalVote {
            player_id,
            answer_text,
        } => {
            check_player!(session, player_id);
            player::handle_submit_final_vote(state, player_id, answer_text).await
        }

        ClientMessage::SubmitBonusVote {
            player_id,
            voted_player_id,
        } => {
            check_player!(session, player_id);
            player::handle_submit_bonus_vote(state, player_id, voted_player_id).await
        }

        // Host-only commands (authorization checked before dispatch)
        ClientMessage::HostStartGame { mode } => {
            check_host!(session, state, "start the game");
            host::handle_start_game(state, mode).await
        }

        ClientMessage::HostAdvancePhase => {
            check_host!(session, state, "advance phases");
            host::handle_advance_phase(state).await
        }

        ClientMessage::HostResetGame => {
            check_host!(session, state, "reset game");
            host::handle_reset_game(state).await
        }
    }
}
