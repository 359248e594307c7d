use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type GameId = String;
pub type PlayerId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Lobby,
    RoundIntro,
    Question,
    Elimination,
    Voting,
    RoundResults,
    Halftime,
    BonusIntro,
    BonusQuestion,
    BonusResults,
    FinalResults,
    Terminated,
}

impl GamePhase {
    /// Phases in which contestants submit something
    pub fn accepts_contributions(&self) -> bool {
        matches!(
            self,
            GamePhase::Question
                | GamePhase::Elimination
                | GamePhase::Voting
                | GamePhase::BonusQuestion
        )
    }

    /// Lobby, FinalResults and Terminated never run a countdown
    pub fn is_timed(&self) -> bool {
        !matches!(
            self,
            GamePhase::Lobby | GamePhase::FinalResults | GamePhase::Terminated
        )
    }
}

/// Match length. Chosen in the lobby and fixed for the rest of the game.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Short,
    Long,
}

impl GameMode {
    pub fn total_rounds(&self) -> u32 {
        match self {
            GameMode::Short => 8,
            GameMode::Long => 12,
        }
    }

    /// Halftime follows the results of this round
    pub fn halftime_round(&self) -> u32 {
        self.total_rounds() / 2
    }

    /// Category of the question asked in a given (1-based) round.
    /// The final round is always a picture question.
    pub fn category_for_round(&self, round_no: u32) -> QuestionCategory {
        if round_no == self.total_rounds() {
            return QuestionCategory::Picture;
        }
        if [3, 6, 9].contains(&round_no) {
            QuestionCategory::PlayerOpinion
        } else {
            QuestionCategory::Standard
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    Standard,
    PlayerOpinion,
    Picture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub question_seconds: u32,
    pub elimination_seconds: u32,
    pub voting_seconds: u32,
    pub bonus_question_seconds: u32,
    pub round_intro_seconds: u32,
    pub round_results_seconds: u32,
    pub halftime_seconds: u32,
    pub bonus_intro_seconds: u32,
    pub bonus_results_seconds: u32,
    pub max_players: usize,
    pub max_name_chars: usize,
    pub min_answer_chars: usize,
    pub max_answer_chars: usize,
    pub bonus_questions_per_round: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            question_seconds: 60,
            elimination_seconds: 30,
            voting_seconds: 30,
            bonus_question_seconds: 20,
            round_intro_seconds: 5,
            round_results_seconds: 10,
            halftime_seconds: 10,
            bonus_intro_seconds: 5,
            bonus_results_seconds: 10,
            max_players: 20,
            max_name_chars: 20,
            min_answer_chars: 1,
            max_answer_chars: 60,
            bonus_questions_per_round: 4,
        }
    }
}

impl GameConfig {
    /// Load config from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        fn read<T: std::str::FromStr>(key: &str, fallback: T) -> T {
            std::env::var(key)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(fallback)
        }

        Self {
            question_seconds: read("BOTBLUFF_QUESTION_SECONDS", defaults.question_seconds),
            elimination_seconds: read(
                "BOTBLUFF_ELIMINATION_SECONDS",
                defaults.elimination_seconds,
            ),
            voting_seconds: read("BOTBLUFF_VOTING_SECONDS", defaults.voting_seconds),
            bonus_question_seconds: read(
                "BOTBLUFF_BONUS_QUESTION_SECONDS",
                defaults.bonus_question_seconds,
            ),
            round_intro_seconds: read("BOTBLUFF_ROUND_INTRO_SECONDS", defaults.round_intro_seconds),
            round_results_seconds: read(
                "BOTBLUFF_ROUND_RESULTS_SECONDS",
                defaults.round_results_seconds,
            ),
            halftime_seconds: read("BOTBLUFF_HALFTIME_SECONDS", defaults.halftime_seconds),
            bonus_intro_seconds: read("BOTBLUFF_BONUS_INTRO_SECONDS", defaults.bonus_intro_seconds),
            bonus_results_seconds: read(
                "BOTBLUFF_BONUS_RESULTS_SECONDS",
                defaults.bonus_results_seconds,
            ),
            max_players: read("BOTBLUFF_MAX_PLAYERS", defaults.max_players),
            max_name_chars: read("BOTBLUFF_MAX_NAME_CHARS", defaults.max_name_chars),
            min_answer_chars: read("BOTBLUFF_MIN_ANSWER_CHARS", defaults.min_answer_chars),
            max_answer_chars: read("BOTBLUFF_MAX_ANSWER_CHARS", defaults.max_answer_chars),
            // The bonus sequence is always four mini-questions
            bonus_questions_per_round: defaults.bonus_questions_per_round,
        }
    }

    /// Full countdown length for a phase (0 for untimed phases)
    pub fn countdown_seconds(&self, phase: GamePhase) -> u32 {
        match phase {
            GamePhase::RoundIntro => self.round_intro_seconds,
            GamePhase::Question => self.question_seconds,
            GamePhase::Elimination => self.elimination_seconds,
            GamePhase::Voting => self.voting_seconds,
            GamePhase::RoundResults => self.round_results_seconds,
            GamePhase::Halftime => self.halftime_seconds,
            GamePhase::BonusIntro => self.bonus_intro_seconds,
            GamePhase::BonusQuestion => self.bonus_question_seconds,
            GamePhase::BonusResults => self.bonus_results_seconds,
            GamePhase::Lobby | GamePhase::FinalResults | GamePhase::Terminated => 0,
        }
    }
}

/// A contestant or the host display
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub icon: String,
    /// Percentage-style running total, may go negative
    pub score: i32,
    /// The host display never plays
    pub is_host: bool,
    /// False while a contestant has no open connection mid-game
    #[serde(default = "default_connected")]
    pub connected: bool,
}

fn default_connected() -> bool {
    true
}

/// One round's prompt. Only `eliminated` changes after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub text: String,
    pub correct_answer: String,
    pub decoy_answer: String,
    pub category: QuestionCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub eliminated: Vec<String>,
}

impl Question {
    pub fn is_eliminated(&self, answer: &str) -> bool {
        self.eliminated.iter().any(|a| a == answer)
    }

    pub fn eliminate(&mut self, answer: &str) {
        if !answer.is_empty() && !self.is_eliminated(answer) {
            self.eliminated.push(answer.to_string());
        }
    }

    /// Texts that cost points when voted for on the final vote.
    /// For player-opinion questions the "correct" slot is a second decoy.
    pub fn is_decoy(&self, answer: &str) -> bool {
        answer == self.decoy_answer
            || (self.category == QuestionCategory::PlayerOpinion && answer == self.correct_answer)
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        self.category != QuestionCategory::PlayerOpinion && answer == self.correct_answer
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKind {
    Player,
    Correct,
    Decoy,
    /// Stand-in for a contestant who let the question timer run out
    Placeholder,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum AnswerAuthor {
    Player(PlayerId),
    System,
    Robot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Answer {
    pub text: String,
    pub author: AnswerAuthor,
    pub kind: AnswerKind,
}

impl Answer {
    pub fn from_player(player_id: &str, text: String) -> Self {
        Self {
            text,
            author: AnswerAuthor::Player(player_id.to_string()),
            kind: AnswerKind::Player,
        }
    }

    pub fn placeholder(player_id: &str) -> Self {
        Self {
            text: String::new(),
            author: AnswerAuthor::Player(player_id.to_string()),
            kind: AnswerKind::Placeholder,
        }
    }

    pub fn author_id(&self) -> Option<&PlayerId> {
        match &self.author {
            AnswerAuthor::Player(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_votable(&self) -> bool {
        self.kind != AnswerKind::Placeholder
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Player,
}

/// Countdown attached to the current phase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Countdown {
    pub duration_seconds: u32,
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
}

impl Countdown {
    pub fn inactive() -> Self {
        Self {
            duration_seconds: 0,
            deadline: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn seconds_remaining(&self, now: chrono::DateTime<chrono::Utc>) -> u32 {
        match self.deadline {
            Some(deadline) if deadline > now => {
                let millis = (deadline - now).num_milliseconds();
                // Round up so a fresh countdown reports its full length
                ((millis + 999) / 1000) as u32
            }
            _ => 0,
        }
    }

    pub fn has_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        matches!(self.deadline, Some(deadline) if deadline <= now)
    }
}

/// Icons are `icon1` through `icon20`
pub const ICON_COUNT: u32 = 20;

pub fn is_known_icon(icon: &str) -> bool {
    icon.strip_prefix("icon")
        .and_then(|n| n.parse::<u32>().ok())
        .map(|n| (1..=ICON_COUNT).contains(&n))
        .unwrap_or(false)
}
