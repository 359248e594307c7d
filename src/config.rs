//! Process-level settings: where to listen and which data files to load.

use crate::game::clock::SystemClock;
use crate::game::question_bank::QuestionBank;
use crate::game::validator::AnswerValidator;
use crate::state::AppState;
use crate::types::GameConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub question_bank_path: Option<PathBuf>,
    pub banned_words_path: Option<PathBuf>,
    /// How often the deadline watcher checks the countdown
    pub tick_interval: Duration,
    /// Shared secret for `/ws?role=host&token=...`
    pub host_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            question_bank_path: None,
            banned_words_path: None,
            tick_interval: Duration::from_millis(250),
            host_token: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        let path = |key: &str| {
            std::env::var(key)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        };

        let tick_interval = std::env::var("TICK_MILLIS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.tick_interval);

        let host_token = std::env::var("HOST_TOKEN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let config = Self {
            port,
            question_bank_path: path("QUESTION_BANK_PATH"),
            banned_words_path: path("BANNED_WORDS_PATH"),
            tick_interval,
            host_token,
        };

        tracing::info!(
            port = config.port,
            question_bank = ?config.question_bank_path,
            banned_words = ?config.banned_words_path,
            tick_ms = config.tick_interval.as_millis() as u64,
            host_token_set = config.host_token.is_some(),
            "Server config loaded"
        );
        config
    }

    /// Load the data files and build the shared state.
    ///
    /// A missing or broken file is logged and replaced by the built-in
    /// fallback so the server still comes up.
    pub fn build_state(&self, game_config: GameConfig) -> AppState {
        let bank = match &self.question_bank_path {
            Some(path) => QuestionBank::from_file(path).unwrap_or_else(|e| {
                tracing::warn!("{}. Using built-in questions.", e);
                QuestionBank::builtin()
            }),
            None => QuestionBank::builtin(),
        };

        let validator = match &self.banned_words_path {
            Some(path) => AnswerValidator::from_file(path, &game_config).unwrap_or_else(|e| {
                tracing::warn!("{}. Running without a banned-word list.", e);
                AnswerValidator::new(std::iter::empty::<String>(), &game_config)
            }),
            None => AnswerValidator::new(std::iter::empty::<String>(), &game_config),
        };

        let state = AppState::new(game_config, bank, validator, Arc::new(SystemClock));
        match &self.host_token {
            Some(token) => state.with_host_token(token.clone()),
            None => {
                tracing::warn!(
                    token = state.host_token(),
                    "HOST_TOKEN not set, generated a token for this run"
                );
                state
            }
        }
    }
}
