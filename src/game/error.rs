//! Error types for the rules engine.
//!
//! Every variant carries a stable wire code so clients can branch on it
//! without parsing the human-readable message.

use crate::types::GamePhase;

/// Why a name or answer text was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Text is empty")]
    Empty,
    #[error("Text must be at least {min} characters")]
    TooShort { min: usize },
    #[error("Text must be {max} characters or less")]
    TooLong { max: usize },
    #[error("INAPPROPRIATE CONTENT")]
    ContainsBannedContent,
    #[error("DUPLICATE RESPONSE")]
    DuplicateOfExisting,
    #[error("CORRECT ANSWER, ENTER A DECOY")]
    MatchesKnownAnswer,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Empty => "EMPTY",
            ValidationError::TooShort { .. } => "TOO_SHORT",
            ValidationError::TooLong { .. } => "TOO_LONG",
            ValidationError::ContainsBannedContent => "CONTAINS_BANNED_CONTENT",
            ValidationError::DuplicateOfExisting => "DUPLICATE_ANSWER",
            ValidationError::MatchesKnownAnswer => "MATCHES_KNOWN_ANSWER",
        }
    }
}

/// Input rejection for a submission. Reported to the submitter only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("Unknown player {0}")]
    UnknownPlayer(String),
    #[error("The host display cannot submit")]
    HostCannotSubmit,
    #[error("Answer is not in the current pool")]
    UnknownAnswer,
    #[error("You cannot vote for your own answer")]
    OwnAnswer,
    #[error("Invalid bonus vote target")]
    InvalidBonusTarget,
}

impl SubmitError {
    pub fn code(&self) -> &'static str {
        match self {
            SubmitError::Invalid(e) => e.code(),
            SubmitError::UnknownPlayer(_) => "UNKNOWN_PLAYER",
            SubmitError::HostCannotSubmit => "HOST_CANNOT_SUBMIT",
            SubmitError::UnknownAnswer => "UNKNOWN_ANSWER",
            SubmitError::OwnAnswer => "OWN_ANSWER",
            SubmitError::InvalidBonusTarget => "INVALID_BONUS_TARGET",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    #[error("Invalid name: {0}")]
    NameInvalid(ValidationError),
    #[error("Icon already taken")]
    IconTaken,
    #[error("Unknown icon")]
    InvalidIcon,
    #[error("Room is full")]
    RoomFull,
    #[error("Game already started")]
    GameInProgress,
    #[error("Player id is reserved for the host display")]
    ReservedId,
}

impl JoinError {
    pub fn code(&self) -> &'static str {
        match self {
            JoinError::NameInvalid(_) => "NAME_INVALID",
            JoinError::IconTaken => "ICON_TAKEN",
            JoinError::InvalidIcon => "INVALID_ICON",
            JoinError::RoomFull => "ROOM_FULL",
            JoinError::GameInProgress => "GAME_IN_PROGRESS",
            JoinError::ReservedId => "RESERVED_ID",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostCommandError {
    #[error("Cannot start a game from {0:?}")]
    NotInLobby(GamePhase),
    #[error("Need at least one contestant to start")]
    NoContestants,
    #[error("Game has been terminated")]
    Terminated,
}

impl HostCommandError {
    pub fn code(&self) -> &'static str {
        match self {
            HostCommandError::NotInLobby(_) => "NOT_IN_LOBBY",
            HostCommandError::NoContestants => "NO_CONTESTANTS",
            HostCommandError::Terminated => "GAME_TERMINATED",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionBankError {
    #[error("Failed to read question bank: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Question bank has no standard questions")]
    Empty,
    #[error("Invalid {category} question #{index}: {reason}")]
    InvalidEntry {
        category: &'static str,
        index: usize,
        reason: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum WordListError {
    #[error("Failed to read banned word list: {0}")]
    Io(#[from] std::io::Error),
}
