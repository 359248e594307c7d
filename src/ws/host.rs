//! Host message handlers
//!
//! Results of host commands reach every client through the broadcast
//! channel, so these only reply directly on failure.

use crate::game::Transition;
use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::GameMode;
use std::sync::Arc;

pub async fn handle_start_game(state: &Arc<AppState>, mode: GameMode) -> Option<ServerMessage> {
    match state.start_game(mode).await {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!("Cannot start game: {}", e);
            Some(ServerMessage::Error {
                code: e.code().to_string(),
                msg: e.to_string(),
            })
        }
    }
}

pub async fn handle_advance_phase(state: &Arc<AppState>) -> Option<ServerMessage> {
    match state.advance_phase().await {
        Transition::Advanced { from, to } => {
            tracing::info!("Host advanced {:?} -> {:?}", from, to);
            None
        }
        Transition::Stale | Transition::NotDue => {
            let phase = state.get_phase().await;
            Some(ServerMessage::Error {
                code: "CANNOT_ADVANCE".to_string(),
                msg: format!("Nothing to advance from {:?}", phase),
            })
        }
    }
}

pub async fn handle_reset_game(state: &Arc<AppState>) -> Option<ServerMessage> {
    tracing::info!("Host requested game reset");
    state.reset_game().await;
    None
}
