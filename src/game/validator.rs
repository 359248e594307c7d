//! Name and answer validation.
//!
//! Banned-word detection is deliberately aggressive: besides whole-word
//! matches it rejects any text that merely *contains* a banned token, so
//! "classic" is refused when "ass" is on the list.

use super::error::{ValidationError, WordListError};
use crate::types::{GameConfig, QuestionCategory};
use std::collections::HashSet;
use std::path::Path;

/// Correct-answer near match: within one edit...
const KNOWN_ANSWER_MAX_EDITS: usize = 1;
/// ...or at least this similar
const KNOWN_ANSWER_SIMILARITY: f32 = 0.85;

pub type ValidationResult = Result<String, ValidationError>;

/// Lowercase, trim, collapse internal whitespace
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// What a new answer is compared against
#[derive(Debug, Clone, Copy)]
pub struct AnswerContext<'a> {
    /// Answers other players already submitted this round
    pub existing: &'a [String],
    pub correct_answer: &'a str,
    pub decoy_answer: &'a str,
    pub category: QuestionCategory,
}

#[derive(Debug, Clone)]
pub struct AnswerValidator {
    banned: HashSet<String>,
    min_answer_chars: usize,
    max_answer_chars: usize,
    max_name_chars: usize,
}

impl Default for AnswerValidator {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>(), &GameConfig::default())
    }
}

impl AnswerValidator {
    pub fn new<I, S>(banned_words: I, config: &GameConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let banned = banned_words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty() && !w.starts_with('#'))
            .collect();

        Self {
            banned,
            min_answer_chars: config.min_answer_chars.max(1),
            max_answer_chars: config.max_answer_chars,
            max_name_chars: config.max_name_chars,
        }
    }

    /// Load a flat word list, one token per line, `#` lines are comments
    pub fn from_file(path: impl AsRef<Path>, config: &GameConfig) -> Result<Self, WordListError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let validator = Self::new(contents.lines(), config);
        tracing::info!(
            "Loaded {} banned words from {}",
            validator.banned.len(),
            path.as_ref().display()
        );
        Ok(validator)
    }

    pub fn banned_word_count(&self) -> usize {
        self.banned.len()
    }

    /// Whole-word match or substring containment of any banned token
    pub fn contains_banned_content(&self, text: &str) -> bool {
        if self.banned.is_empty() {
            return false;
        }
        let normalized = normalize(text);

        let whole_word = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .any(|w| self.banned.contains(w));

        whole_word || self.banned.iter().any(|b| normalized.contains(b.as_str()))
    }

    fn check_length(&self, trimmed: &str, min: usize, max: usize) -> Result<(), ValidationError> {
        let len = trimmed.chars().count();
        if len == 0 {
            return Err(ValidationError::Empty);
        }
        if len < min {
            return Err(ValidationError::TooShort { min });
        }
        if len > max {
            return Err(ValidationError::TooLong { max });
        }
        Ok(())
    }

    /// Validate a display name against the names already in the room.
    /// Returns the trimmed name.
    pub fn validate_name(&self, text: &str, existing_names: &[&str]) -> ValidationResult {
        let trimmed = text.trim();
        self.check_length(trimmed, 1, self.max_name_chars)?;

        if self.contains_banned_content(trimmed) {
            return Err(ValidationError::ContainsBannedContent);
        }

        let normalized = normalize(trimmed);
        if existing_names.iter().any(|n| normalize(n) == normalized) {
            return Err(ValidationError::DuplicateOfExisting);
        }

        Ok(trimmed.to_string())
    }

    /// Validate an answer for the current round. Returns the trimmed answer.
    pub fn validate_answer(&self, text: &str, ctx: &AnswerContext<'_>) -> ValidationResult {
        let trimmed = text.trim();
        self.check_length(trimmed, self.min_answer_chars, self.max_answer_chars)?;

        if self.contains_banned_content(trimmed) {
            return Err(ValidationError::ContainsBannedContent);
        }

        let normalized = normalize(trimmed);

        if ctx.category != QuestionCategory::PlayerOpinion
            && is_known_answer(&normalized, &normalize(ctx.correct_answer))
        {
            return Err(ValidationError::MatchesKnownAnswer);
        }

        // The opinion "correct" slot is still in the pool, so an exact copy
        // would put the same text there twice
        let duplicate = normalized == normalize(ctx.decoy_answer)
            || (ctx.category == QuestionCategory::PlayerOpinion
                && normalized == normalize(ctx.correct_answer))
            || ctx.existing.iter().any(|a| normalize(a) == normalized);
        if duplicate {
            return Err(ValidationError::DuplicateOfExisting);
        }

        Ok(trimmed.to_string())
    }
}

fn is_known_answer(normalized: &str, correct: &str) -> bool {
    if correct.is_empty() {
        return false;
    }
    if normalized == correct {
        return true;
    }
    let distance = levenshtein(normalized, correct);
    if distance <= KNOWN_ANSWER_MAX_EDITS {
        return true;
    }
    let longest = normalized.chars().count().max(correct.chars().count());
    let similarity = 1.0 - distance as f32 / longest as f32;
    similarity >= KNOWN_ANSWER_SIMILARITY
}

/// Edit distance over chars
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn validator(words: &[&str]) -> AnswerValidator {
        AnswerValidator::new(words.iter().copied(), &GameConfig::default())
    }

    fn ctx<'a>(existing: &'a [String], category: QuestionCategory) -> AnswerContext<'a> {
        AnswerContext {
            existing,
            correct_answer: "Rome",
            decoy_answer: "Berlin",
            category,
        }
    }

    #[test]
    fn test_empty_and_whitespace_answers() {
        let v = validator(&[]);
        let c = ctx(&[], QuestionCategory::Standard);
        assert_eq!(v.validate_answer("", &c), Err(ValidationError::Empty));
        assert_eq!(v.validate_answer("   ", &c), Err(ValidationError::Empty));
    }

    #[test]
    fn test_answer_too_long() {
        let v = validator(&[]);
        let c = ctx(&[], QuestionCategory::Standard);
        let long = "x".repeat(61);
        assert_eq!(
            v.validate_answer(&long, &c),
            Err(ValidationError::TooLong { max: 60 })
        );
    }

    #[test]
    fn test_answer_too_short_with_raised_minimum() {
        let config = GameConfig {
            min_answer_chars: 3,
            ..GameConfig::default()
        };
        let v = AnswerValidator::new(Vec::<String>::new(), &config);
        let c = ctx(&[], QuestionCategory::Standard);
        assert_eq!(
            v.validate_answer("ab", &c),
            Err(ValidationError::TooShort { min: 3 })
        );
    }

    #[test]
    fn test_valid_answer_is_trimmed() {
        let v = validator(&[]);
        let c = ctx(&[], QuestionCategory::Standard);
        assert_eq!(v.validate_answer("  Paris ", &c), Ok("Paris".to_string()));
    }

    #[test]
    fn test_duplicate_is_case_insensitive_exact() {
        let v = validator(&[]);
        let existing = vec!["Paris".to_string()];
        let c = ctx(&existing, QuestionCategory::Standard);
        assert_eq!(
            v.validate_answer(" paris ", &c),
            Err(ValidationError::DuplicateOfExisting)
        );
        // Not fuzzy: one letter off is a different answer
        assert_eq!(v.validate_answer("Parist", &c), Ok("Parist".to_string()));
    }

    #[test]
    fn test_decoy_counts_as_duplicate() {
        let v = validator(&[]);
        let c = ctx(&[], QuestionCategory::Standard);
        assert_eq!(
            v.validate_answer("BERLIN", &c),
            Err(ValidationError::DuplicateOfExisting)
        );
    }

    #[test]
    fn test_correct_answer_rejected_including_near_match() {
        let v = validator(&[]);
        let c = ctx(&[], QuestionCategory::Standard);
        assert_eq!(
            v.validate_answer("rome", &c),
            Err(ValidationError::MatchesKnownAnswer)
        );
        assert_eq!(
            v.validate_answer("Roma", &c),
            Err(ValidationError::MatchesKnownAnswer)
        );
        assert_eq!(v.validate_answer("Madrid", &c), Ok("Madrid".to_string()));
    }

    #[test]
    fn test_opinion_correct_slot_is_a_duplicate_not_a_known_answer() {
        let v = validator(&[]);
        let c = ctx(&[], QuestionCategory::PlayerOpinion);
        assert_eq!(
            v.validate_answer("Rome", &c),
            Err(ValidationError::DuplicateOfExisting)
        );
        // No near-match rule without a true answer
        assert_eq!(v.validate_answer("Roma", &c), Ok("Roma".to_string()));
    }

    #[test]
    fn test_banned_whole_word() {
        let v = validator(&["darn"]);
        let c = ctx(&[], QuestionCategory::Standard);
        assert_eq!(
            v.validate_answer("well DARN it", &c),
            Err(ValidationError::ContainsBannedContent)
        );
    }

    #[test]
    fn test_banned_substring_is_aggressive() {
        let v = validator(&["ass"]);
        // Embedded evasion is caught...
        assert!(v.contains_banned_content("smartass"));
        // ...at the cost of innocent words
        assert!(v.contains_banned_content("classic"));
        assert!(v.contains_banned_content("Bass guitar"));
        assert!(!v.contains_banned_content("guitar"));
    }

    #[test]
    fn test_no_banned_words_means_nothing_is_banned() {
        let v = validator(&[]);
        assert!(!v.contains_banned_content("anything at all"));
    }

    #[test]
    fn test_validate_name() {
        let v = validator(&["darn"]);
        assert_eq!(v.validate_name("  Alice ", &[]), Ok("Alice".to_string()));
        assert_eq!(v.validate_name("", &[]), Err(ValidationError::Empty));
        assert_eq!(
            v.validate_name(&"n".repeat(21), &[]),
            Err(ValidationError::TooLong { max: 20 })
        );
        assert_eq!(
            v.validate_name("darnit", &[]),
            Err(ValidationError::ContainsBannedContent)
        );
        assert_eq!(
            v.validate_name("ALICE", &["Alice"]),
            Err(ValidationError::DuplicateOfExisting)
        );
    }

    #[test]
    fn test_load_word_list_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# profanity list").unwrap();
        writeln!(file, "Darn").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  heck  ").unwrap();

        let v = AnswerValidator::from_file(file.path(), &GameConfig::default()).unwrap();
        assert_eq!(v.banned_word_count(), 2);
        assert!(v.contains_banned_content("oh heck"));
        assert!(v.contains_banned_content("DARN"));
    }

    #[test]
    fn test_missing_word_list_is_an_error() {
        let result = AnswerValidator::from_file(
            "/definitely/not/here/banned_words.txt",
            &GameConfig::default(),
        );
        assert!(matches!(result, Err(WordListError::Io(_))));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("rome", "roma"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
    }
}
