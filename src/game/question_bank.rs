//! Question supply.
//!
//! Each category list is consumed round-robin and wraps around when it runs
//! out. Missing categories fall back to the standard list.

use super::error::QuestionBankError;
use super::validator::normalize;
use crate::types::{Question, QuestionCategory};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionEntry {
    pub text: String,
    pub correct_answer: String,
    pub decoy_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl QuestionEntry {
    /// Both answers go into the same pool, so they must be present and distinct
    fn check(&self) -> Result<(), &'static str> {
        if self.text.trim().is_empty() {
            return Err("empty question text");
        }
        let correct = normalize(&self.correct_answer);
        let decoy = normalize(&self.decoy_answer);
        if correct.is_empty() || decoy.is_empty() {
            return Err("empty answer");
        }
        if correct == decoy {
            return Err("correct and decoy answers are the same");
        }
        Ok(())
    }
}

/// On-disk layout of a question bank file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionBankFile {
    #[serde(default)]
    pub standard: Vec<QuestionEntry>,
    #[serde(default)]
    pub player_opinion: Vec<QuestionEntry>,
    #[serde(default)]
    pub picture: Vec<QuestionEntry>,
    /// Bonus mini-questions are prompts only; players vote for each other
    #[serde(default)]
    pub bonus: Vec<String>,
}

const FALLBACK_BONUS_PROMPTS: &[&str] = &[
    "Who is most likely to be a robot in disguise?",
    "Who would survive longest in a robot uprising?",
    "Who gave the most human answers so far?",
    "Who would you trust to program your toaster?",
];

#[derive(Debug, Clone)]
pub struct QuestionBank {
    file: QuestionBankFile,
    standard_cursor: usize,
    opinion_cursor: usize,
    picture_cursor: usize,
    bonus_cursor: usize,
}

impl QuestionBank {
    pub fn new(file: QuestionBankFile) -> Result<Self, QuestionBankError> {
        if file.standard.is_empty() {
            return Err(QuestionBankError::Empty);
        }
        for (category, list) in [
            ("standard", &file.standard),
            ("player-opinion", &file.player_opinion),
            ("picture", &file.picture),
        ] {
            for (index, entry) in list.iter().enumerate() {
                entry
                    .check()
                    .map_err(|reason| QuestionBankError::InvalidEntry {
                        category,
                        index,
                        reason,
                    })?;
            }
        }
        Ok(Self {
            file,
            standard_cursor: 0,
            opinion_cursor: 0,
            picture_cursor: 0,
            bonus_cursor: 0,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, QuestionBankError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, QuestionBankError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let bank = Self::from_json(&contents)?;
        tracing::info!(
            "Loaded question bank from {}: {} standard, {} player-opinion, {} picture, {} bonus",
            path.as_ref().display(),
            bank.file.standard.len(),
            bank.file.player_opinion.len(),
            bank.file.picture.len(),
            bank.file.bonus.len()
        );
        Ok(bank)
    }

    /// Small bank compiled into the binary, used when no file is configured
    pub fn builtin() -> Self {
        let entry = |text: &str, correct: &str, decoy: &str| QuestionEntry {
            text: text.to_string(),
            correct_answer: correct.to_string(),
            decoy_answer: decoy.to_string(),
            image_ref: None,
        };

        let file = QuestionBankFile {
            standard: vec![
                entry("What is the capital of Italy?", "Rome", "Berlin"),
                entry("What do bees make?", "Honey", "Electricity"),
                entry("How many legs does a spider have?", "Eight", "Twelve"),
                entry("What is the largest planet in our solar system?", "Jupiter", "The Moon"),
                entry("What gas do plants absorb?", "Carbon dioxide", "Helium"),
                entry("Who painted the Mona Lisa?", "Leonardo da Vinci", "A very patient robot"),
            ],
            player_opinion: vec![
                entry("What is the best pizza topping?", "Mushrooms", "Motor oil"),
                entry("What is the best way to spend a rainy day?", "Reading", "Defragmenting"),
            ],
            picture: vec![QuestionEntry {
                image_ref: Some("pictures/mystery.png".to_string()),
                ..entry("What is shown in this picture?", "A lighthouse", "A charging station")
            }],
            bonus: Vec::new(),
        };

        Self {
            file,
            standard_cursor: 0,
            opinion_cursor: 0,
            picture_cursor: 0,
            bonus_cursor: 0,
        }
    }

    /// Next question of the given category, tagged with the category actually used
    pub fn next_question(&mut self, category: QuestionCategory) -> Question {
        let (list, cursor, category) = match category {
            QuestionCategory::PlayerOpinion if !self.file.player_opinion.is_empty() => (
                &self.file.player_opinion,
                &mut self.opinion_cursor,
                QuestionCategory::PlayerOpinion,
            ),
            QuestionCategory::Picture if !self.file.picture.is_empty() => (
                &self.file.picture,
                &mut self.picture_cursor,
                QuestionCategory::Picture,
            ),
            _ => (
                &self.file.standard,
                &mut self.standard_cursor,
                QuestionCategory::Standard,
            ),
        };

        let entry = &list[*cursor % list.len()];
        *cursor += 1;

        Question {
            text: entry.text.clone(),
            correct_answer: entry.correct_answer.clone(),
            decoy_answer: entry.decoy_answer.clone(),
            category,
            image_ref: entry.image_ref.clone(),
            eliminated: Vec::new(),
        }
    }

    pub fn next_bonus_prompt(&mut self) -> String {
        let prompt = if self.file.bonus.is_empty() {
            FALLBACK_BONUS_PROMPTS[self.bonus_cursor % FALLBACK_BONUS_PROMPTS.len()].to_string()
        } else {
            self.file.bonus[self.bonus_cursor % self.file.bonus.len()].clone()
        };
        self.bonus_cursor += 1;
        prompt
    }

    /// Start every list from the top again
    pub fn rewind(&mut self) {
        self.standard_cursor = 0;
        self.opinion_cursor = 0;
        self.picture_cursor = 0;
        self.bonus_cursor = 0;
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::builtin()
    }
}
