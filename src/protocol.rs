use crate::game::player::Standing;
use crate::game::scoring::RoundScore;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinGame {
        player_id: PlayerId,
        display_name: String,
        icon: String,
    },
    SubmitAnswer {
        player_id: PlayerId,
        text: String,
    },
    SubmitEliminationVote {
        player_id: PlayerId,
        answer_text: String,
    },
    SubmitFinalVote {
        player_id: PlayerId,
        answer_text: String,
    },
    SubmitBonusVote {
        player_id: PlayerId,
        voted_player_id: PlayerId,
    },
    RequestSnapshot,
    // Host-only messages
    HostStartGame {
        mode: GameMode,
    },
    /// Cut the current countdown short
    HostAdvancePhase,
    HostResetGame,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        role: Role,
        snapshot: Box<GameSnapshot>,
    },
    JoinAccepted {
        player: Player,
        rejoined: bool,
    },
    JoinRejected {
        code: String,
        msg: String,
    },
    /// Full player list, sent whenever someone joins or leaves
    Players {
        players: Vec<Player>,
    },
    PhaseChanged {
        phase: GamePhase,
        round_no: u32,
        total_rounds: u32,
        countdown_seconds: u32,
        deadline: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        bonus_index: Option<usize>,
    },
    QuestionPresented {
        round_no: u32,
        question: PublicQuestion,
    },
    /// Presence only; the text stays hidden until the pool is revealed
    PlayerAnswered {
        player_id: PlayerId,
    },
    PlayerVoted {
        player_id: PlayerId,
        phase: GamePhase,
    },
    AnswerPool {
        phase: GamePhase,
        answers: Vec<String>,
    },
    EliminationComplete {
        eliminated_answer: Option<String>,
        tie_occurred: bool,
        vote_counts: HashMap<String, u32>,
    },
    FinalVotesComplete {
        score_deltas: HashMap<PlayerId, i32>,
        vote_counts: HashMap<String, u32>,
    },
    RoundScoresFinal {
        round_no: u32,
        correct_answer: String,
        decoy_answer: String,
        breakdown: HashMap<PlayerId, RoundScore>,
        standings: Vec<Standing>,
    },
    BonusPrompt {
        index: usize,
        prompt: String,
    },
    BonusComplete {
        index: usize,
        winning_player_ids: Vec<PlayerId>,
        vote_counts: HashMap<PlayerId, u32>,
    },
    Standings {
        standings: Vec<Standing>,
    },
    GameTerminated {
        reason: String,
    },
    SubmissionAccepted {
        phase: GamePhase,
        /// False when this repeated an earlier accepted submission
        first: bool,
    },
    SubmissionRejected {
        code: String,
        msg: String,
    },
    Snapshot {
        snapshot: Box<GameSnapshot>,
    },
    Error {
        code: String,
        msg: String,
    },
}

/// Question as shown to players: no correct or decoy answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicQuestion {
    pub text: String,
    pub category: QuestionCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    pub eliminated: Vec<String>,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            text: q.text.clone(),
            category: q.category,
            image_ref: q.image_ref.clone(),
            eliminated: q.eliminated.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountdownInfo {
    pub active: bool,
    pub duration_seconds: u32,
    pub seconds_remaining: u32,
    pub deadline: Option<String>,
}

/// A player's answer once the pool is public
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerInfo {
    pub player_id: PlayerId,
    pub text: String,
    pub placeholder: bool,
}

/// Everything a (re)connecting client needs to catch up
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub phase: GamePhase,
    pub round_no: u32,
    pub total_rounds: u32,
    pub mode: GameMode,
    pub halftime_shown: bool,
    pub bonus_played: bool,
    pub bonus_index: Option<usize>,
    pub bonus_prompt: Option<String>,
    pub countdown: CountdownInfo,
    pub question: Option<PublicQuestion>,
    /// Players who already responded in the current phase
    pub responded: Vec<PlayerId>,
    pub answers: Vec<AnswerInfo>,
    pub elimination_pool: Vec<String>,
    pub final_pool: Vec<String>,
    pub players: Vec<Player>,
    pub standings: Vec<Standing>,
    pub terminated_reason: Option<String>,
}
