use botbluff::game::clock::ManualClock;
use botbluff::game::question_bank::QuestionBank;
use botbluff::game::validator::AnswerValidator;
use botbluff::protocol::{ClientMessage, ServerMessage};
use botbluff::state::AppState;
use botbluff::types::{GameConfig, GameMode, GamePhase};
use botbluff::ws::handlers::{handle_message, Session};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

const BANK_JSON: &str = r#"{
    "standard": [
        {"text": "What is the capital of Italy?", "correct_answer": "Rome", "decoy_answer": "Berlin"}
    ],
    "player_opinion": [
        {"text": "What is the best pizza topping?", "correct_answer": "Mushrooms", "decoy_answer": "Motor oil"}
    ],
    "picture": [
        {"text": "What is shown here?", "correct_answer": "A lighthouse", "decoy_answer": "A robot", "image_ref": "p.png"}
    ],
    "bonus": ["Who is the most robotic?"]
}"#;

fn join_message(id: &str, name: &str, icon: &str) -> ClientMessage {
    ClientMessage::JoinGame {
        player_id: id.to_string(),
        display_name: name.to_string(),
        icon: icon.to_string(),
    }
}

struct Table {
    state: Arc<AppState>,
    clock: ManualClock,
    host: Session,
    players: Vec<(String, Session)>,
}

impl Table {
    async fn new(names: &[&str]) -> Self {
        let clock = ManualClock::default();
        let state = Arc::new(AppState::new(
            GameConfig::default(),
            QuestionBank::from_json(BANK_JSON).unwrap(),
            AnswerValidator::new(["darn"], &GameConfig::default()),
            Arc::new(clock.clone()),
        ));
        state.register_host("host").await;

        let mut players = Vec::new();
        for (i, name) in names.iter().enumerate() {
            let id = format!("p{}", i + 1);
            let mut session = Session::player();
            let reply = handle_message(
                ClientMessage::JoinGame {
                    player_id: id.clone(),
                    display_name: name.to_string(),
                    icon: format!("icon{}", i + 1),
                },
                &mut session,
                &state,
            )
            .await;
            assert!(
                matches!(reply, Some(ServerMessage::JoinAccepted { .. })),
                "join failed: {:?}",
                reply
            );
            players.push((id, session));
        }

        Self {
            state,
            clock,
            host: Session::host("host"),
            players,
        }
    }

    async fn host(&mut self, msg: ClientMessage) -> Option<ServerMessage> {
        handle_message(msg, &mut self.host, &self.state).await
    }

    async fn send(&mut self, player: usize, msg: ClientMessage) -> Option<ServerMessage> {
        let (_, session) = &mut self.players[player];
        handle_message(msg, session, &self.state).await
    }

    async fn answer(&mut self, player: usize, text: &str) -> Option<ServerMessage> {
        let player_id = self.players[player].0.clone();
        self.send(
            player,
            ClientMessage::SubmitAnswer {
                player_id,
                text: text.to_string(),
            },
        )
        .await
    }

    async fn eliminate(&mut self, player: usize, text: &str) -> Option<ServerMessage> {
        let player_id = self.players[player].0.clone();
        self.send(
            player,
            ClientMessage::SubmitEliminationVote {
                player_id,
                answer_text: text.to_string(),
            },
        )
        .await
    }

    async fn vote(&mut self, player: usize, text: &str) -> Option<ServerMessage> {
        let player_id = self.players[player].0.clone();
        self.send(
            player,
            ClientMessage::SubmitFinalVote {
                player_id,
                answer_text: text.to_string(),
            },
        )
        .await
    }

    async fn bonus(&mut self, player: usize, target: usize) -> Option<ServerMessage> {
        let player_id = self.players[player].0.clone();
        let voted_player_id = self.players[target].0.clone();
        self.send(
            player,
            ClientMessage::SubmitBonusVote {
                player_id,
                voted_player_id,
            },
        )
        .await
    }

    async fn phase(&self) -> GamePhase {
        self.state.get_phase().await
    }

    async fn score(&self, player: usize) -> i32 {
        let id = &self.players[player].0;
        self.state
            .get_players()
            .await
            .into_iter()
            .find(|p| &p.id == id)
            .map(|p| p.score)
            .unwrap_or_default()
    }

    /// Let countdowns expire until `phase` is reached
    async fn wait_for(&mut self, phase: GamePhase) {
        for _ in 0..500 {
            if self.phase().await == phase {
                return;
            }
            let seconds = self.state.snapshot().await.countdown.duration_seconds;
            self.clock.advance_secs(seconds as i64);
            self.state.tick().await;
        }
        panic!("never reached {:?}", phase);
    }
}

fn drain(rx: &mut broadcast::Receiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut messages = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        messages.push(msg);
    }
    messages
}

fn accepted(reply: &Option<ServerMessage>) -> bool {
    matches!(
        reply,
        Some(ServerMessage::SubmissionAccepted { first: true, .. })
    )
}

/// End-to-end integration test for one complete standard round
#[tokio::test]
async fn test_full_round_flow() {
    let mut table = Table::new(&["Alice", "Bob", "Carol"]).await;
    let mut rx = table.state.subscribe();

    assert!(table
        .host(ClientMessage::HostStartGame {
            mode: GameMode::Short
        })
        .await
        .is_none());
    assert_eq!(table.phase().await, GamePhase::RoundIntro);
    table.host(ClientMessage::HostAdvancePhase).await;
    assert_eq!(table.phase().await, GamePhase::Question);

    // Answers: the duplicate is rejected to the submitter only
    assert!(accepted(&table.answer(0, "Paris").await));
    match table.answer(1, " PARIS").await {
        Some(ServerMessage::SubmissionRejected { code, msg }) => {
            assert_eq!(code, "DUPLICATE_ANSWER");
            assert_eq!(msg, "DUPLICATE RESPONSE");
        }
        other => panic!("Expected SubmissionRejected, got {:?}", other),
    }
    match table.answer(1, "Rom").await {
        Some(ServerMessage::SubmissionRejected { code, .. }) => {
            assert_eq!(code, "MATCHES_KNOWN_ANSWER")
        }
        other => panic!("Expected SubmissionRejected, got {:?}", other),
    }
    assert!(accepted(&table.answer(2, "London").await));
    assert!(accepted(&table.answer(1, "Madrid").await));
    assert_eq!(table.phase().await, GamePhase::Elimination);

    let messages = drain(&mut rx);
    let answered: Vec<_> = messages
        .iter()
        .filter_map(|m| match m {
            ServerMessage::PlayerAnswered { player_id } => Some(player_id.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(answered, vec!["p1", "p3", "p2"]);
    let pool = messages
        .iter()
        .find_map(|m| match m {
            ServerMessage::AnswerPool { phase, answers } if *phase == GamePhase::Elimination => {
                Some(answers.clone())
            }
            _ => None,
        })
        .expect("elimination pool broadcast");
    assert_eq!(pool.len(), 5);
    assert!(pool.contains(&"Berlin".to_string()));

    // Elimination: two votes for the decoy
    assert!(accepted(&table.eliminate(1, "Berlin").await));
    assert!(accepted(&table.eliminate(2, "Berlin").await));
    assert!(accepted(&table.eliminate(0, "London").await));
    assert_eq!(table.phase().await, GamePhase::Voting);

    let messages = drain(&mut rx);
    assert!(messages.contains(&ServerMessage::EliminationComplete {
        eliminated_answer: Some("Berlin".to_string()),
        tie_occurred: false,
        vote_counts: HashMap::from([("Berlin".to_string(), 2), ("London".to_string(), 1)]),
    }));
    let final_pool = table.state.snapshot().await.final_pool;
    assert!(!final_pool.contains(&"Berlin".to_string()));

    // Final vote
    assert!(accepted(&table.vote(0, "Rome").await));
    assert!(accepted(&table.vote(2, "Rome").await));
    assert!(accepted(&table.vote(1, "London").await));
    assert_eq!(table.phase().await, GamePhase::RoundResults);

    let messages = drain(&mut rx);
    let deltas = messages
        .iter()
        .find_map(|m| match m {
            ServerMessage::FinalVotesComplete { score_deltas, .. } => Some(score_deltas.clone()),
            _ => None,
        })
        .expect("final votes broadcast");
    assert_eq!(deltas["p1"], 8);
    assert_eq!(deltas["p2"], 4);
    assert_eq!(deltas["p3"], 16);

    let standings = messages
        .iter()
        .find_map(|m| match m {
            ServerMessage::RoundScoresFinal {
                standings,
                correct_answer,
                ..
            } => {
                assert_eq!(correct_answer, "Rome");
                Some(standings.clone())
            }
            _ => None,
        })
        .expect("round scores broadcast");
    let order: Vec<_> = standings.iter().map(|s| s.player_id.as_str()).collect();
    assert_eq!(order, vec!["p3", "p1", "p2"]);

    assert_eq!(table.score(2).await, 16);
}

#[tokio::test]
async fn test_duplicate_messages_in_transit() {
    let mut table = Table::new(&["Alice", "Bob"]).await;
    table
        .host(ClientMessage::HostStartGame {
            mode: GameMode::Short,
        })
        .await;
    table.host(ClientMessage::HostAdvancePhase).await;

    assert!(accepted(&table.answer(0, "Paris").await));
    assert!(matches!(
        table.answer(0, "Paris").await,
        Some(ServerMessage::SubmissionAccepted { first: false, .. })
    ));
    assert!(accepted(&table.answer(1, "Oslo").await));

    // The same answer again after the phase closed: silently dropped
    assert!(table.answer(1, "Oslo").await.is_none());
    assert_eq!(table.phase().await, GamePhase::Elimination);
    assert_eq!(table.state.snapshot().await.answers.len(), 2);
}

#[tokio::test]
async fn test_timeouts_drive_the_game() {
    let mut table = Table::new(&["Alice", "Bob", "Carol"]).await;
    table
        .host(ClientMessage::HostStartGame {
            mode: GameMode::Short,
        })
        .await;
    table.wait_for(GamePhase::Question).await;

    table.answer(0, "Paris").await;
    table.clock.advance_secs(60);
    table.state.tick().await;
    assert_eq!(table.phase().await, GamePhase::Elimination);

    let snapshot = table.state.snapshot().await;
    let placeholders: Vec<_> = snapshot
        .answers
        .iter()
        .filter(|a| a.placeholder)
        .map(|a| a.player_id.as_str())
        .collect();
    assert_eq!(placeholders, vec!["p2", "p3"]);
    assert_eq!(snapshot.elimination_pool.len(), 3);
    assert_eq!(snapshot.countdown.seconds_remaining, 30);
}

#[tokio::test]
async fn test_full_short_game_with_bonus_round() {
    let mut table = Table::new(&["Alice", "Bob", "Carol", "Dave"]).await;
    let mut rx = table.state.subscribe();
    table
        .host(ClientMessage::HostStartGame {
            mode: GameMode::Short,
        })
        .await;

    table.wait_for(GamePhase::BonusQuestion).await;
    let snapshot = table.state.snapshot().await;
    assert_eq!(snapshot.round_no, 4);
    assert!(snapshot.halftime_shown);
    assert_eq!(snapshot.bonus_index, Some(0));
    assert_eq!(snapshot.bonus_prompt.as_deref(), Some("Who is the most robotic?"));

    let before: Vec<i32> = futures::future::join_all((0..4).map(|i| table.score(i))).await;

    // 2-2 split: both leaders win
    match table.bonus(0, 0).await {
        Some(ServerMessage::SubmissionRejected { code, .. }) => {
            assert_eq!(code, "INVALID_BONUS_TARGET")
        }
        other => panic!("Expected SubmissionRejected, got {:?}", other),
    }
    assert!(accepted(&table.bonus(0, 1).await));
    assert!(accepted(&table.bonus(1, 0).await));
    assert!(accepted(&table.bonus(2, 0).await));
    assert!(accepted(&table.bonus(3, 1).await));

    assert_eq!(table.score(0).await, before[0] + 4);
    assert_eq!(table.score(1).await, before[1] + 4);
    assert_eq!(table.score(2).await, before[2]);

    let messages = drain(&mut rx);
    let winners = messages
        .iter()
        .find_map(|m| match m {
            ServerMessage::BonusComplete {
                winning_player_ids, ..
            } => Some(winning_player_ids.clone()),
            _ => None,
        })
        .expect("bonus broadcast");
    assert_eq!(winners.len(), 2);
    assert!(winners.contains(&"p1".to_string()));
    assert!(winners.contains(&"p2".to_string()));

    table.wait_for(GamePhase::FinalResults).await;
    let snapshot = table.state.snapshot().await;
    assert_eq!(snapshot.round_no, 8);
    assert!(snapshot.bonus_played);
    assert!(!snapshot.countdown.active);

    let messages = drain(&mut rx);
    let halftimes = messages
        .iter()
        .filter(|m| {
            matches!(
                m,
                ServerMessage::PhaseChanged {
                    phase: GamePhase::Halftime,
                    ..
                }
            )
        })
        .count();
    assert_eq!(halftimes, 0, "halftime happens only once, before the bonus");
    assert!(matches!(
        messages.last(),
        Some(ServerMessage::Standings { .. })
    ));

    match table.host(ClientMessage::HostAdvancePhase).await {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "CANNOT_ADVANCE"),
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_host_disconnect_terminates_match() {
    let mut table = Table::new(&["Alice", "Bob"]).await;
    let mut rx = table.state.subscribe();
    table
        .host(ClientMessage::HostStartGame {
            mode: GameMode::Long,
        })
        .await;

    table.state.host_disconnected("host").await;
    assert_eq!(table.phase().await, GamePhase::Terminated);
    assert!(drain(&mut rx).contains(&ServerMessage::GameTerminated {
        reason: "host disconnected".to_string()
    }));

    table.clock.advance_secs(3600);
    table.state.tick().await;
    assert_eq!(table.phase().await, GamePhase::Terminated);
    assert!(table.answer(0, "Paris").await.is_none());

    // The closed display has no rights left
    match table.host(ClientMessage::HostResetGame).await {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "UNAUTHORIZED"),
        other => panic!("Expected Error, got {:?}", other),
    }

    // A new host display resets to a fresh lobby
    table.state.register_host("host").await;
    assert!(table.host(ClientMessage::HostResetGame).await.is_none());
    let snapshot = table.state.snapshot().await;
    assert_eq!(snapshot.phase, GamePhase::Lobby);
    assert!(snapshot.terminated_reason.is_none());
}

#[tokio::test]
async fn test_player_disconnect_unblocks_phase() {
    let mut table = Table::new(&["Alice", "Bob", "Carol"]).await;
    table
        .host(ClientMessage::HostStartGame {
            mode: GameMode::Short,
        })
        .await;
    table.host(ClientMessage::HostAdvancePhase).await;

    table.answer(0, "Paris").await;
    table.answer(1, "Oslo").await;
    assert_eq!(table.phase().await, GamePhase::Question);

    table.state.player_disconnected("p3").await;
    assert_eq!(table.phase().await, GamePhase::Elimination);

    // p3 comes back on a new connection and plays on
    let mut fresh = Session::player();
    match handle_message(join_message("p3", "Carol", "icon3"), &mut fresh, &table.state).await {
        Some(ServerMessage::JoinAccepted { player, rejoined }) => {
            assert!(rejoined);
            assert!(player.connected);
        }
        other => panic!("Expected JoinAccepted, got {:?}", other),
    }
    let reply = handle_message(
        ClientMessage::SubmitEliminationVote {
            player_id: "p3".to_string(),
            answer_text: "Berlin".to_string(),
        },
        &mut fresh,
        &table.state,
    )
    .await;
    assert!(matches!(
        reply,
        Some(ServerMessage::SubmissionAccepted { first: true, .. })
    ));
}

#[tokio::test]
async fn test_rejoin_survives_stale_socket_close() {
    let mut table = Table::new(&["Alice", "Bob"]).await;
    table
        .host(ClientMessage::HostStartGame {
            mode: GameMode::Short,
        })
        .await;
    table.host(ClientMessage::HostAdvancePhase).await;

    // p1 reconnects before the server notices the old socket is gone
    let mut fresh = Session::player();
    match handle_message(join_message("p1", "Alice", "icon1"), &mut fresh, &table.state).await {
        Some(ServerMessage::JoinAccepted { rejoined, .. }) => assert!(rejoined),
        other => panic!("Expected JoinAccepted, got {:?}", other),
    }
    // Repeating the join on the same connection changes nothing
    handle_message(join_message("p1", "Alice", "icon1"), &mut fresh, &table.state).await;

    // The old socket closes
    table.state.player_disconnected("p1").await;
    let p1 = table.state.get_player("p1").await.expect("p1 still registered");
    assert!(p1.connected);

    let reply = handle_message(
        ClientMessage::SubmitAnswer {
            player_id: "p1".to_string(),
            text: "Paris".to_string(),
        },
        &mut fresh,
        &table.state,
    )
    .await;
    assert!(matches!(
        reply,
        Some(ServerMessage::SubmissionAccepted { first: true, .. })
    ));

    // Closing the last connection marks p1 away without dropping them
    table.state.player_disconnected("p1").await;
    let p1 = table.state.get_player("p1").await.expect("p1 kept while away");
    assert!(!p1.connected);
    assert_eq!(table.phase().await, GamePhase::Question);
    table.answer(1, "Oslo").await;
    assert_eq!(table.phase().await, GamePhase::Elimination);
}

#[tokio::test]
async fn test_banned_content_is_rejected() {
    let mut table = Table::new(&["Alice", "Bob"]).await;
    table
        .host(ClientMessage::HostStartGame {
            mode: GameMode::Short,
        })
        .await;
    table.host(ClientMessage::HostAdvancePhase).await;

    match table.answer(0, "Darnation").await {
        Some(ServerMessage::SubmissionRejected { code, msg }) => {
            assert_eq!(code, "CONTAINS_BANNED_CONTENT");
            assert_eq!(msg, "INAPPROPRIATE CONTENT");
        }
        other => panic!("Expected SubmissionRejected, got {:?}", other),
    }
    assert!(!table
        .state
        .snapshot()
        .await
        .responded
        .contains(&"p1".to_string()));
}

#[tokio::test]
async fn test_late_joiner_is_rejected() {
    let mut table = Table::new(&["Alice"]).await;
    table
        .host(ClientMessage::HostStartGame {
            mode: GameMode::Short,
        })
        .await;

    let mut session = Session::player();
    let reply = handle_message(
        ClientMessage::JoinGame {
            player_id: "late".to_string(),
            display_name: "Latecomer".to_string(),
            icon: "icon5".to_string(),
        },
        &mut session,
        &table.state,
    )
    .await;
    match reply {
        Some(ServerMessage::JoinRejected { code, .. }) => assert_eq!(code, "GAME_IN_PROGRESS"),
        other => panic!("Expected JoinRejected, got {:?}", other),
    }
}
