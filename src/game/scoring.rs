//! Point values.
//!
//! The whole table lives here as literal values so it can be read and tested
//! in one place. Long games pay roughly 25% less per event than short games
//! so that total achievable scores stay comparable.

use crate::types::{GameMode, QuestionCategory};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Elimination vote named a decoy
    EliminatedDecoy,
    /// Final vote named the true answer
    VotedCorrect,
    /// Final vote named a decoy
    VotedDecoy,
    /// Paid once per vote another player gave to your answer
    AnswerReceivedVote,
    /// Among the most-voted players in a bonus mini-question
    BonusWin,
}

/// Points awarded for one outcome. Pure: same inputs, same output.
pub const fn score_for(mode: GameMode, category: QuestionCategory, outcome: Outcome) -> i32 {
    use GameMode::*;
    use Outcome::*;
    use QuestionCategory::*;

    match (mode, category, outcome) {
        // Short game (8 rounds)
        (Short, Standard, EliminatedDecoy) => 4,
        (Short, Standard, VotedCorrect) => 8,
        (Short, Standard, VotedDecoy) => -8,
        (Short, Standard, AnswerReceivedVote) => 4,
        (Short, Picture, EliminatedDecoy) => 8,
        (Short, Picture, VotedCorrect) => 16,
        (Short, Picture, VotedDecoy) => -8,
        (Short, Picture, AnswerReceivedVote) => 8,
        (Short, PlayerOpinion, EliminatedDecoy) => 4,
        (Short, PlayerOpinion, VotedCorrect) => 0,
        (Short, PlayerOpinion, VotedDecoy) => -8,
        (Short, PlayerOpinion, AnswerReceivedVote) => 8,
        (Short, _, BonusWin) => 4,

        // Long game (12 rounds)
        (Long, Standard, EliminatedDecoy) => 3,
        (Long, Standard, VotedCorrect) => 6,
        (Long, Standard, VotedDecoy) => -6,
        (Long, Standard, AnswerReceivedVote) => 3,
        (Long, Picture, EliminatedDecoy) => 6,
        (Long, Picture, VotedCorrect) => 12,
        (Long, Picture, VotedDecoy) => -6,
        (Long, Picture, AnswerReceivedVote) => 6,
        (Long, PlayerOpinion, EliminatedDecoy) => 3,
        (Long, PlayerOpinion, VotedCorrect) => 0,
        (Long, PlayerOpinion, VotedDecoy) => -6,
        (Long, PlayerOpinion, AnswerReceivedVote) => 6,
        (Long, _, BonusWin) => 3,
    }
}

/// One player's points for the current round, by source
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoundScore {
    pub eliminated_decoy: i32,
    pub voted_correct: i32,
    pub voted_decoy: i32,
    pub votes_received: u32,
    pub votes_received_points: i32,
}

impl RoundScore {
    pub fn total(&self) -> i32 {
        self.eliminated_decoy + self.voted_correct + self.voted_decoy + self.votes_received_points
    }
}

/// "+12%", "-8%", "0%"
pub fn format_percentage(points: i32) -> String {
    if points > 0 {
        format!("+{}%", points)
    } else {
        format!("{}%", points)
    }
}

/// "1st", "2nd", "3rd", "11th", "22nd"
pub fn placement_suffix(placement: u32) -> String {
    if placement == 0 {
        return String::new();
    }
    let suffix = match (placement % 10, placement % 100) {
        (1, n) if n != 11 => "st",
        (2, n) if n != 12 => "nd",
        (3, n) if n != 13 => "rd",
        _ => "th",
    };
    format!("{}{}", placement, suffix)
}
