use super::AppState;
use crate::game::error::JoinError;
use crate::game::player::JoinOutcome;
use crate::types::*;

impl AppState {
    /// Register the host display connection
    pub async fn register_host(&self, host_id: &str) -> Player {
        self.mutate(|engine| engine.register_host(host_id)).await
    }

    /// Join (or rejoin) a contestant
    pub async fn join_player(
        &self,
        player_id: &str,
        display_name: &str,
        icon: &str,
    ) -> Result<JoinOutcome, JoinError> {
        self.mutate(|engine| engine.join(player_id, display_name, icon))
            .await
    }

    /// A connection bound to this contestant closed
    pub async fn player_disconnected(&self, player_id: &str) {
        self.mutate(|engine| engine.connection_closed(player_id))
            .await
    }

    /// Losing the current host display ends the match for everyone
    pub async fn host_disconnected(&self, host_id: &str) -> bool {
        self.mutate(|engine| engine.host_left(host_id)).await
    }

    pub async fn is_current_host(&self, host_id: &str) -> bool {
        self.engine.read().await.is_current_host(host_id)
    }

    pub async fn get_player(&self, player_id: &str) -> Option<Player> {
        self.engine.read().await.players().get(player_id).cloned()
    }

    /// Get all players, host display included
    pub async fn get_players(&self) -> Vec<Player> {
        self.engine.read().await.players().all()
    }
}
