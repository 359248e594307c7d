use super::AppState;
use crate::game::error::HostCommandError;
use crate::game::Transition;
use crate::protocol::GameSnapshot;
use crate::types::*;

impl AppState {
    /// Leave the lobby and start round 1
    pub async fn start_game(&self, mode: GameMode) -> Result<(), HostCommandError> {
        self.mutate(|engine| engine.start_game(mode)).await
    }

    /// Host skip: end the current phase now
    pub async fn advance_phase(&self) -> Transition {
        self.mutate(|engine| engine.skip_phase()).await
    }

    pub async fn reset_game(&self) {
        self.mutate(|engine| engine.reset()).await
    }

    /// Fire the timeout transition if the countdown has expired
    pub async fn tick(&self) -> Transition {
        self.mutate(|engine| engine.tick()).await
    }

    pub async fn snapshot(&self) -> GameSnapshot {
        self.engine.read().await.snapshot()
    }

    pub async fn get_phase(&self) -> GamePhase {
        self.engine.read().await.phase()
    }
}
