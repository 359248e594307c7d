use super::AppState;
use crate::game::error::SubmitError;
use crate::game::Submitted;

impl AppState {
    pub async fn submit_answer(
        &self,
        player_id: &str,
        text: &str,
    ) -> Result<Submitted, SubmitError> {
        self.mutate(|engine| engine.submit_answer(player_id, text))
            .await
    }

    pub async fn submit_elimination_vote(
        &self,
        player_id: &str,
        answer_text: &str,
    ) -> Result<Submitted, SubmitError> {
        self.mutate(|engine| engine.submit_elimination_vote(player_id, answer_text))
            .await
    }

    pub async fn submit_final_vote(
        &self,
        player_id: &str,
        answer_text: &str,
    ) -> Result<Submitted, SubmitError> {
        self.mutate(|engine| engine.submit_final_vote(player_id, answer_text))
            .await
    }

    pub async fn submit_bonus_vote(
        &self,
        player_id: &str,
        voted_player_id: &str,
    ) -> Result<Submitted, SubmitError> {
        self.mutate(|engine| engine.submit_bonus_vote(player_id, voted_player_id))
            .await
    }
}
