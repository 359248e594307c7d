//! The round lifecycle and scoring engine.
//!
//! [`RoundStateMachine`] is synchronous and owns all mutable game state. It
//! never blocks: it reacts to submissions and to clock ticks, and queues the
//! resulting broadcasts in an outbox that the caller drains after each call.

pub mod clock;
pub mod error;
pub mod player;
pub mod question_bank;
pub mod scoring;
pub mod tally;
pub mod validator;

use crate::protocol::{AnswerInfo, CountdownInfo, GameSnapshot, PublicQuestion, ServerMessage};
use crate::types::*;
use clock::Clock;
use error::{HostCommandError, JoinError, SubmitError};
use player::{JoinOutcome, PlayerRegistry};
use question_bank::QuestionBank;
use rand::seq::SliceRandom;
use scoring::{score_for, Outcome, RoundScore};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tally::VoteTally;
use validator::{AnswerContext, AnswerValidator};

/// Identifies one visit to one phase.
///
/// Timer expiry and host skips carry the ticket they were issued for, so a
/// notification that arrives after the phase already moved on is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTicket {
    pub phase: GamePhase,
    pub seq: u64,
}

/// Result of a submission that passed input validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submitted {
    Recorded,
    /// This player already contributed in this phase; nothing changed
    AlreadySubmitted,
    /// The phase the submission was meant for is over
    Ignored { current: GamePhase },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Advanced { from: GamePhase, to: GamePhase },
    Stale,
    NotDue,
}

pub struct RoundStateMachine {
    game_id: GameId,
    config: GameConfig,
    mode: GameMode,
    phase: GamePhase,
    phase_seq: u64,
    round_no: u32,
    halftime_shown: bool,
    bonus_played: bool,
    bonus_index: Option<usize>,
    bonus_prompt: Option<String>,
    countdown: Countdown,
    question: Option<Question>,
    /// Player answers for the current round, in submission order
    answers: Vec<Answer>,
    elimination_pool: Vec<String>,
    final_pool: Vec<String>,
    elimination_votes: VoteTally,
    final_votes: VoteTally,
    bonus_votes: VoteTally,
    round_scores: HashMap<PlayerId, RoundScore>,
    /// Contestants who contributed in the current phase
    responded: HashSet<PlayerId>,
    players: PlayerRegistry,
    /// The host display currently in charge
    host_id: Option<PlayerId>,
    /// Open connections per contestant id
    connections: HashMap<PlayerId, usize>,
    bank: QuestionBank,
    validator: AnswerValidator,
    clock: Arc<dyn Clock>,
    terminated_reason: Option<String>,
    pending: Vec<ServerMessage>,
}

impl RoundStateMachine {
    pub fn new(
        config: GameConfig,
        bank: QuestionBank,
        validator: AnswerValidator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            game_id: ulid::Ulid::new().to_string(),
            config,
            mode: GameMode::default(),
            phase: GamePhase::Lobby,
            phase_seq: 0,
            round_no: 0,
            halftime_shown: false,
            bonus_played: false,
            bonus_index: None,
            bonus_prompt: None,
            countdown: Countdown::inactive(),
            question: None,
            answers: Vec::new(),
            elimination_pool: Vec::new(),
            final_pool: Vec::new(),
            elimination_votes: VoteTally::new(),
            final_votes: VoteTally::new(),
            bonus_votes: VoteTally::new(),
            round_scores: HashMap::new(),
            responded: HashSet::new(),
            players: PlayerRegistry::new(),
            host_id: None,
            connections: HashMap::new(),
            bank,
            validator,
            clock,
            terminated_reason: None,
            pending: Vec::new(),
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn round_no(&self) -> u32 {
        self.round_no
    }

    pub fn ticket(&self) -> PhaseTicket {
        PhaseTicket {
            phase: self.phase,
            seq: self.phase_seq,
        }
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn elimination_pool(&self) -> &[String] {
        &self.elimination_pool
    }

    pub fn final_pool(&self) -> &[String] {
        &self.final_pool
    }

    pub fn round_scores(&self) -> &HashMap<PlayerId, RoundScore> {
        &self.round_scores
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn has_responded(&self, player_id: &str) -> bool {
        self.responded.contains(player_id)
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == GamePhase::Terminated
    }

    /// Take every broadcast queued since the last drain, in order
    pub fn drain_events(&mut self) -> Vec<ServerMessage> {
        std::mem::take(&mut self.pending)
    }

    fn emit(&mut self, msg: ServerMessage) {
        self.pending.push(msg);
    }

    fn emit_players(&mut self) {
        let players = self.players.all();
        self.emit(ServerMessage::Players { players });
    }

    fn emit_standings(&mut self) {
        let standings = self.players.standings();
        self.emit(ServerMessage::Standings { standings });
    }

    // ---- players ----

    /// Register the host display. A newer display replaces the previous one.
    pub fn register_host(&mut self, host_id: &str) -> Player {
        if let Some(previous) = self.host_id.replace(host_id.to_string()) {
            if previous != host_id {
                tracing::warn!("Host display {} replaced by {}", previous, host_id);
                self.players.remove(&previous);
            }
        }
        let host = self.players.register_host(host_id);
        tracing::info!("Host display registered: {}", host_id);
        self.emit_players();
        host
    }

    pub fn is_current_host(&self, host_id: &str) -> bool {
        self.host_id.as_deref() == Some(host_id)
    }

    /// The current host display went away, which ends the match. Returns
    /// false for a display that had already been replaced.
    pub fn host_left(&mut self, host_id: &str) -> bool {
        if !self.is_current_host(host_id) {
            tracing::debug!("Replaced host display {} closed", host_id);
            return false;
        }
        self.host_id = None;
        self.players.remove(host_id);
        self.terminate("host disconnected");
        true
    }

    /// Admit a contestant. New players may only join in the lobby; a known
    /// player id can always rebind.
    pub fn join(
        &mut self,
        player_id: &str,
        display_name: &str,
        icon: &str,
    ) -> Result<JoinOutcome, JoinError> {
        if self.phase != GamePhase::Lobby && self.players.get(player_id).is_none() {
            return Err(JoinError::GameInProgress);
        }
        let was_away = self
            .players
            .get(player_id)
            .map(|p| !p.connected)
            .unwrap_or(false);

        let outcome = self.players.join(
            player_id,
            display_name,
            icon,
            &self.validator,
            self.config.max_players,
        )?;

        match &outcome {
            JoinOutcome::Joined(player) => {
                tracing::info!("Player {} joined as {:?}", player.id, player.display_name);
                self.emit_players();
            }
            JoinOutcome::Rejoined(player) => {
                tracing::info!("Player {} rejoined", player.id);
                if was_away {
                    self.emit_players();
                }
            }
        }
        *self.connections.entry(player_id.to_string()).or_insert(0) += 1;
        Ok(outcome)
    }

    /// One connection bound to `player_id` closed.
    ///
    /// Nothing happens while the player still has another connection open. In
    /// the lobby the last close removes the player; mid-game the player is kept
    /// (score and answers intact) but marked away until they rejoin, and no
    /// longer holds up the "everyone has responded" check.
    pub fn connection_closed(&mut self, player_id: &str) {
        let Some(count) = self.connections.get_mut(player_id) else {
            return;
        };
        *count = count.saturating_sub(1);
        if *count > 0 {
            tracing::debug!("Player {} still has {} connection(s)", player_id, count);
            return;
        }
        self.connections.remove(player_id);

        if self.phase == GamePhase::Lobby {
            self.remove_player(player_id);
            return;
        }
        if !self.players.is_contestant(player_id) {
            return;
        }

        tracing::warn!("Player {} disconnected during {:?}", player_id, self.phase);
        self.players.set_connected(player_id, false);
        self.emit_players();
        self.advance_if_everyone_responded();
    }

    /// Drop a disconnected player and re-check whether everyone remaining has
    /// already responded in the current phase.
    pub fn remove_player(&mut self, player_id: &str) -> Option<Player> {
        let removed = self.players.remove(player_id)?;
        tracing::warn!("Player {} left during {:?}", player_id, self.phase);
        self.connections.remove(player_id);

        self.responded.remove(player_id);
        if self.phase == GamePhase::Question {
            self.answers
                .retain(|a| a.author_id().map(|id| id != player_id).unwrap_or(true));
        }
        self.emit_players();
        self.advance_if_everyone_responded();
        Some(removed)
    }

    fn advance_if_everyone_responded(&mut self) {
        if self.phase.accepts_contributions() && self.all_responded() {
            tracing::info!(
                "All remaining players have responded in {:?}, advancing",
                self.phase
            );
            self.advance_current();
        }
    }

    // ---- host commands ----

    pub fn start_game(&mut self, mode: GameMode) -> Result<(), HostCommandError> {
        match self.phase {
            GamePhase::Lobby => {}
            GamePhase::Terminated => return Err(HostCommandError::Terminated),
            other => return Err(HostCommandError::NotInLobby(other)),
        }
        if self.players.contestant_count() == 0 {
            return Err(HostCommandError::NoContestants);
        }

        self.mode = mode;
        self.round_no = 0;
        self.halftime_shown = false;
        self.bonus_played = false;
        self.players.reset_scores();
        tracing::info!(
            "Starting {:?} game {} with {} players",
            mode,
            self.game_id,
            self.players.contestant_count()
        );
        self.start_next_round();
        Ok(())
    }

    /// Back to an empty lobby with a fresh game id. The host display stays.
    pub fn reset(&mut self) {
        self.game_id = ulid::Ulid::new().to_string();
        tracing::info!("Resetting to lobby, new game {}", self.game_id);

        self.mode = GameMode::default();
        self.round_no = 0;
        self.halftime_shown = false;
        self.bonus_played = false;
        self.bonus_index = None;
        self.bonus_prompt = None;
        self.terminated_reason = None;
        self.clear_round();
        self.players.clear_contestants();
        self.connections.clear();
        self.players.reset_scores();
        self.bank.rewind();
        self.enter(GamePhase::Lobby);
        self.emit_players();
    }

    /// End the match for good. Later submissions and ticks are ignored.
    pub fn terminate(&mut self, reason: &str) {
        if self.phase == GamePhase::Terminated {
            return;
        }
        tracing::warn!("Game {} terminated: {}", self.game_id, reason);
        self.terminated_reason = Some(reason.to_string());
        self.enter(GamePhase::Terminated);
        self.emit(ServerMessage::GameTerminated {
            reason: reason.to_string(),
        });
    }

    // ---- submissions ----

    pub fn submit_answer(
        &mut self,
        player_id: &str,
        text: &str,
    ) -> Result<Submitted, SubmitError> {
        self.record_contribution(GamePhase::Question, player_id, |machine| {
            let Some(question) = machine.question.as_ref() else {
                return Err(SubmitError::UnknownAnswer);
            };
            let existing: Vec<String> = machine
                .answers
                .iter()
                .filter(|a| a.is_votable())
                .map(|a| a.text.clone())
                .collect();
            let ctx = AnswerContext {
                existing: &existing,
                correct_answer: &question.correct_answer,
                decoy_answer: &question.decoy_answer,
                category: question.category,
            };
            let text = machine.validator.validate_answer(text, &ctx)?;
            machine.answers.push(Answer::from_player(player_id, text));
            Ok(())
        })
    }

    pub fn submit_elimination_vote(
        &mut self,
        player_id: &str,
        answer_text: &str,
    ) -> Result<Submitted, SubmitError> {
        self.record_contribution(GamePhase::Elimination, player_id, |machine| {
            let choice = machine.check_ballot(&machine.elimination_pool, player_id, answer_text)?;
            machine.elimination_votes.record(player_id, choice);
            Ok(())
        })
    }

    pub fn submit_final_vote(
        &mut self,
        player_id: &str,
        answer_text: &str,
    ) -> Result<Submitted, SubmitError> {
        self.record_contribution(GamePhase::Voting, player_id, |machine| {
            let choice = machine.check_ballot(&machine.final_pool, player_id, answer_text)?;
            machine.final_votes.record(player_id, choice);
            Ok(())
        })
    }

    pub fn submit_bonus_vote(
        &mut self,
        player_id: &str,
        voted_player_id: &str,
    ) -> Result<Submitted, SubmitError> {
        self.record_contribution(GamePhase::BonusQuestion, player_id, |machine| {
            if voted_player_id == player_id || !machine.players.is_contestant(voted_player_id) {
                return Err(SubmitError::InvalidBonusTarget);
            }
            machine.bonus_votes.record(player_id, voted_player_id);
            Ok(())
        })
    }

    /// Shared exactly-once gate for every submission kind.
    ///
    /// `apply` runs only for a contestant's first contribution in `phase`.
    /// If it fails the player has not responded and may try again.
    fn record_contribution<F>(
        &mut self,
        phase: GamePhase,
        player_id: &str,
        apply: F,
    ) -> Result<Submitted, SubmitError>
    where
        F: FnOnce(&mut Self) -> Result<(), SubmitError>,
    {
        if self.phase != phase {
            tracing::debug!(
                "Ignoring {:?} submission from {}: phase is {:?}",
                phase,
                player_id,
                self.phase
            );
            return Ok(Submitted::Ignored {
                current: self.phase,
            });
        }

        match self.players.get(player_id) {
            None => return Err(SubmitError::UnknownPlayer(player_id.to_string())),
            Some(p) if p.is_host => return Err(SubmitError::HostCannotSubmit),
            Some(_) => {}
        }

        if self.responded.contains(player_id) {
            tracing::debug!("Duplicate {:?} submission from {}", phase, player_id);
            return Ok(Submitted::AlreadySubmitted);
        }

        apply(self)?;
        self.responded.insert(player_id.to_string());

        let notice = match phase {
            GamePhase::Question => ServerMessage::PlayerAnswered {
                player_id: player_id.to_string(),
            },
            _ => ServerMessage::PlayerVoted {
                player_id: player_id.to_string(),
                phase,
            },
        };
        self.emit(notice);

        if self.all_responded() {
            tracing::info!("Everyone has responded in {:?}, advancing early", phase);
            self.advance_current();
        }
        Ok(Submitted::Recorded)
    }

    /// A vote must name a pool entry that the voter did not write
    fn check_ballot(
        &self,
        pool: &[String],
        voter: &str,
        answer_text: &str,
    ) -> Result<String, SubmitError> {
        let text = answer_text.trim();
        if !pool.iter().any(|a| a == text) {
            return Err(SubmitError::UnknownAnswer);
        }
        let own = self
            .answers
            .iter()
            .any(|a| a.text == text && a.author_id().map(|id| id == voter).unwrap_or(false));
        if own {
            return Err(SubmitError::OwnAnswer);
        }
        Ok(text.to_string())
    }

    /// Contestants who are away do not hold up the phase
    fn all_responded(&self) -> bool {
        let contestants = self.players.connected_contestant_ids();
        !contestants.is_empty() && contestants.iter().all(|id| self.responded.contains(id))
    }

    // ---- transitions ----

    /// Advance if `ticket` still names the current phase visit
    pub fn advance_phase(&mut self, ticket: PhaseTicket) -> Transition {
        if ticket != self.ticket() {
            tracing::debug!(
                "Stale advance for {:?}#{} ignored, now in {:?}#{}",
                ticket.phase,
                ticket.seq,
                self.phase,
                self.phase_seq
            );
            return Transition::Stale;
        }
        self.advance_current()
    }

    /// Host "skip": advance whatever phase is current
    pub fn skip_phase(&mut self) -> Transition {
        let ticket = self.ticket();
        self.advance_phase(ticket)
    }

    /// Clock notification. Advances only if the countdown has run out.
    pub fn tick(&mut self) -> Transition {
        if !self.countdown.has_expired(self.clock.now()) {
            return Transition::NotDue;
        }
        tracing::info!("Countdown expired in {:?}", self.phase);
        self.advance_current()
    }

    fn advance_current(&mut self) -> Transition {
        use GamePhase::*;

        let from = self.phase;
        match from {
            Lobby | FinalResults | Terminated => {
                tracing::debug!("Nothing to advance from {:?}", from);
                return Transition::Stale;
            }
            RoundIntro => {
                self.enter(Question);
                if let Some(question) = &self.question {
                    let msg = ServerMessage::QuestionPresented {
                        round_no: self.round_no,
                        question: PublicQuestion::from(question),
                    };
                    self.emit(msg);
                }
            }
            Question => {
                self.close_question();
                self.enter(Elimination);
                let answers = self.elimination_pool.clone();
                self.emit(ServerMessage::AnswerPool {
                    phase: Elimination,
                    answers,
                });
            }
            Elimination => {
                self.close_elimination();
                self.enter(Voting);
                let answers = self.final_pool.clone();
                self.emit(ServerMessage::AnswerPool {
                    phase: Voting,
                    answers,
                });
            }
            Voting => {
                self.close_voting();
                self.enter(RoundResults);
            }
            RoundResults => {
                if self.round_no == self.mode.halftime_round() && !self.halftime_shown {
                    self.halftime_shown = true;
                    self.enter(Halftime);
                    self.emit_standings();
                } else {
                    self.start_next_round();
                }
            }
            Halftime => {
                if self.bonus_played {
                    self.start_next_round();
                } else {
                    self.enter(BonusIntro);
                }
            }
            BonusIntro => self.start_bonus_question(0),
            BonusQuestion => {
                let index = self.bonus_index.unwrap_or(0);
                self.close_bonus_question(index);
                if index + 1 < self.config.bonus_questions_per_round {
                    self.start_bonus_question(index + 1);
                } else {
                    self.bonus_played = true;
                    self.bonus_index = None;
                    self.bonus_prompt = None;
                    self.enter(BonusResults);
                    self.emit_standings();
                }
            }
            BonusResults => self.start_next_round(),
        }

        Transition::Advanced {
            from,
            to: self.phase,
        }
    }

    /// Switch phase, restarting the countdown at its full length
    fn enter(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.phase_seq += 1;
        self.responded.clear();

        let seconds = self.config.countdown_seconds(phase);
        self.countdown = if phase.is_timed() && seconds > 0 {
            Countdown {
                duration_seconds: seconds,
                deadline: Some(self.clock.now() + chrono::Duration::seconds(seconds as i64)),
            }
        } else {
            Countdown::inactive()
        };

        tracing::info!(
            "Game {} -> {:?} (round {}/{}, {}s)",
            self.game_id,
            phase,
            self.round_no,
            self.mode.total_rounds(),
            seconds
        );

        let msg = ServerMessage::PhaseChanged {
            phase,
            round_no: self.round_no,
            total_rounds: self.mode.total_rounds(),
            countdown_seconds: self.countdown.duration_seconds,
            deadline: self.countdown.deadline.map(|d| d.to_rfc3339()),
            bonus_index: if phase == GamePhase::BonusQuestion {
                self.bonus_index
            } else {
                None
            },
        };
        self.emit(msg);
    }

    fn clear_round(&mut self) {
        self.question = None;
        self.answers.clear();
        self.elimination_pool.clear();
        self.final_pool.clear();
        self.elimination_votes.clear();
        self.final_votes.clear();
        self.bonus_votes.clear();
        self.round_scores.clear();
    }

    fn start_next_round(&mut self) {
        self.clear_round();

        if self.round_no >= self.mode.total_rounds() {
            tracing::info!("Game {} finished after {} rounds", self.game_id, self.round_no);
            self.enter(GamePhase::FinalResults);
            self.emit_standings();
            return;
        }

        self.round_no += 1;
        let category = self.mode.category_for_round(self.round_no);
        self.question = Some(self.bank.next_question(category));
        self.enter(GamePhase::RoundIntro);
    }

    /// Fill in placeholders for silent players and build the elimination pool
    fn close_question(&mut self) {
        let missing: Vec<PlayerId> = self
            .players
            .contestant_ids()
            .into_iter()
            .filter(|id| {
                !self
                    .answers
                    .iter()
                    .any(|a| a.author_id().map(|author| author == id).unwrap_or(false))
            })
            .collect();
        if !missing.is_empty() {
            tracing::info!("{} player(s) did not answer in time", missing.len());
        }
        for id in &missing {
            self.answers.push(Answer::placeholder(id));
        }

        let Some(question) = &self.question else {
            return;
        };
        let mut pool: Vec<String> = self
            .answers
            .iter()
            .filter(|a| a.is_votable())
            .map(|a| a.text.clone())
            .collect();
        pool.push(question.correct_answer.clone());
        pool.push(question.decoy_answer.clone());
        pool.shuffle(&mut rand::rng());
        self.elimination_pool = pool;
    }

    fn close_elimination(&mut self) {
        let Some(question) = self.question.as_mut() else {
            return;
        };

        let eliminated = self.elimination_votes.winner();
        let tie_occurred = self.elimination_votes.is_tie();
        if let Some(text) = &eliminated {
            question.eliminate(text);
        }

        let points = score_for(self.mode, question.category, Outcome::EliminatedDecoy);
        for (voter, choice) in self.elimination_votes.votes() {
            if question.is_decoy(choice) {
                self.round_scores
                    .entry(voter.clone())
                    .or_default()
                    .eliminated_decoy += points;
            }
        }

        self.final_pool = self
            .elimination_pool
            .iter()
            .filter(|a| !question.is_eliminated(a))
            .cloned()
            .collect();

        tracing::info!(
            "Elimination tallied: {:?} (tie: {}, {} votes)",
            eliminated,
            tie_occurred,
            self.elimination_votes.total_votes()
        );
        let vote_counts = self.elimination_votes.vote_counts();
        self.emit(ServerMessage::EliminationComplete {
            eliminated_answer: eliminated,
            tie_occurred,
            vote_counts,
        });
    }

    /// Score every final vote, then apply the round's totals to the players
    fn close_voting(&mut self) {
        let Some(question) = self.question.as_ref() else {
            return;
        };
        let mode = self.mode;
        let category = question.category;

        for (voter, choice) in self.final_votes.votes() {
            if question.is_correct(choice) {
                self.round_scores.entry(voter.clone()).or_default().voted_correct +=
                    score_for(mode, category, Outcome::VotedCorrect);
            } else if question.is_decoy(choice) {
                self.round_scores.entry(voter.clone()).or_default().voted_decoy +=
                    score_for(mode, category, Outcome::VotedDecoy);
            } else if let Some(author) = self
                .answers
                .iter()
                .find(|a| a.is_votable() && a.text == choice)
                .and_then(|a| a.author_id())
            {
                if author != voter {
                    let score = self.round_scores.entry(author.clone()).or_default();
                    score.votes_received += 1;
                    score.votes_received_points +=
                        score_for(mode, category, Outcome::AnswerReceivedVote);
                }
            }
        }

        let mut score_deltas = HashMap::new();
        for id in self.players.contestant_ids() {
            let delta = self.round_scores.get(&id).map(RoundScore::total).unwrap_or(0);
            self.players.add_score(&id, delta);
            score_deltas.insert(id, delta);
        }

        tracing::info!(
            "Round {} scored from {} final votes",
            self.round_no,
            self.final_votes.total_votes()
        );

        let correct_answer = question.correct_answer.clone();
        let decoy_answer = question.decoy_answer.clone();
        let vote_counts = self.final_votes.vote_counts();
        self.emit(ServerMessage::FinalVotesComplete {
            score_deltas,
            vote_counts,
        });
        let msg = ServerMessage::RoundScoresFinal {
            round_no: self.round_no,
            correct_answer,
            decoy_answer,
            breakdown: self.round_scores.clone(),
            standings: self.players.standings(),
        };
        self.emit(msg);
    }

    fn start_bonus_question(&mut self, index: usize) {
        self.bonus_votes.clear();
        self.bonus_index = Some(index);
        let prompt = self.bank.next_bonus_prompt();
        self.bonus_prompt = Some(prompt.clone());
        self.enter(GamePhase::BonusQuestion);
        self.emit(ServerMessage::BonusPrompt { index, prompt });
    }

    /// Every player tied for the most votes wins
    fn close_bonus_question(&mut self, index: usize) {
        let winners = self.bonus_votes.leaders();
        let points = score_for(self.mode, QuestionCategory::Standard, Outcome::BonusWin);
        for winner in &winners {
            self.players.add_score(winner, points);
        }
        tracing::info!("Bonus question {} won by {:?}", index + 1, winners);

        let vote_counts = self.bonus_votes.vote_counts();
        self.emit(ServerMessage::BonusComplete {
            index,
            winning_player_ids: winners,
            vote_counts,
        });
    }

    // ---- snapshot ----

    pub fn snapshot(&self) -> GameSnapshot {
        let now = self.clock.now();

        let answers_public = !matches!(
            self.phase,
            GamePhase::Lobby | GamePhase::RoundIntro | GamePhase::Question
        );
        let answers = if answers_public {
            self.answers
                .iter()
                .filter_map(|a| {
                    a.author_id().map(|id| AnswerInfo {
                        player_id: id.clone(),
                        text: a.text.clone(),
                        placeholder: !a.is_votable(),
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut responded: Vec<PlayerId> = self.responded.iter().cloned().collect();
        responded.sort();

        GameSnapshot {
            game_id: self.game_id.clone(),
            phase: self.phase,
            round_no: self.round_no,
            total_rounds: self.mode.total_rounds(),
            mode: self.mode,
            halftime_shown: self.halftime_shown,
            bonus_played: self.bonus_played,
            bonus_index: self.bonus_index,
            bonus_prompt: self.bonus_prompt.clone(),
            countdown: CountdownInfo {
                active: self.countdown.is_active(),
                duration_seconds: self.countdown.duration_seconds,
                seconds_remaining: self.countdown.seconds_remaining(now),
                deadline: self.countdown.deadline.map(|d| d.to_rfc3339()),
            },
            question: self.question.as_ref().map(PublicQuestion::from),
            responded,
            answers,
            elimination_pool: self.elimination_pool.clone(),
            final_pool: self.final_pool.clone(),
            players: self.players.all(),
            standings: self.players.standings(),
            terminated_reason: self.terminated_reason.clone(),
        }
    }
}
