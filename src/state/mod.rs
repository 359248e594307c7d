mod game;
mod player;
mod submission;

use crate::game::clock::{Clock, SystemClock};
use crate::game::question_bank::QuestionBank;
use crate::game::validator::AnswerValidator;
use crate::game::RoundStateMachine;
use crate::protocol::ServerMessage;
use crate::types::*;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Shared application state.
///
/// The engine sits behind a single write lock, so submissions, timer expiry
/// and host commands apply one at a time in arrival order. Events are
/// published while the lock is still held, which keeps the broadcast stream in
/// the same order as the mutations that produced it.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<RoundStateMachine>>,
    /// Broadcast channel for messages to every connected client
    pub broadcast: broadcast::Sender<ServerMessage>,
    pub config: GameConfig,
    /// Secret a connection must present to act as the host display
    host_token: String,
}

impl AppState {
    pub fn new(
        config: GameConfig,
        bank: QuestionBank,
        validator: AnswerValidator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (tx, _rx) = broadcast::channel(256);
        let engine = RoundStateMachine::new(config.clone(), bank, validator, clock);
        Self {
            engine: Arc::new(RwLock::new(engine)),
            broadcast: tx,
            config,
            host_token: ulid::Ulid::new().to_string(),
        }
    }

    pub fn with_host_token(mut self, token: impl Into<String>) -> Self {
        self.host_token = token.into();
        self
    }

    pub fn host_token(&self) -> &str {
        &self.host_token
    }

    /// Check a token presented by a would-be host connection
    pub fn is_host_token(&self, token: Option<&str>) -> bool {
        token
            .map(|t| constant_time_eq(self.host_token.as_bytes(), t.as_bytes()))
            .unwrap_or(false)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.broadcast.subscribe()
    }

    /// Apply `f` to the engine and publish whatever it queued
    async fn mutate<R>(&self, f: impl FnOnce(&mut RoundStateMachine) -> R) -> R {
        let mut engine = self.engine.write().await;
        let result = f(&mut *engine);
        for event in engine.drain_events() {
            // Ignore send errors (no receivers connected is fine)
            let _ = self.broadcast.send(event);
        }
        result
    }
}

/// Constant-time byte comparison so the token cannot be guessed by timing
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

impl Default for AppState {
    fn default() -> Self {
        let config = GameConfig::default();
        let validator = AnswerValidator::new(std::iter::empty::<String>(), &config);
        Self::new(
            config,
            QuestionBank::builtin(),
            validator,
            Arc::new(SystemClock),
        )
    }
}
