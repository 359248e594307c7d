use super::error::JoinError;
use super::scoring::{format_percentage, placement_suffix};
use super::validator::AnswerValidator;
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A ranked row for results screens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Standing {
    pub player_id: PlayerId,
    pub display_name: String,
    pub icon: String,
    pub score: i32,
    /// Competition ranking: equal scores share a placement, the next one skips
    pub placement: u32,
    pub tied: bool,
    /// Display forms: "+12%", "1st"
    pub score_label: String,
    pub placement_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
    Joined(Player),
    /// Same player id reconnecting
    Rejoined(Player),
}

impl JoinOutcome {
    pub fn player(&self) -> &Player {
        match self {
            JoinOutcome::Joined(p) | JoinOutcome::Rejoined(p) => p,
        }
    }
}

/// Players keyed by id, remembering join order for stable listings
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, Player>,
    order: Vec<PlayerId>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a contestant. Rejoining with a known id returns the existing record
    /// and marks it connected again. The host display's id cannot be claimed.
    pub fn join(
        &mut self,
        player_id: &str,
        display_name: &str,
        icon: &str,
        validator: &AnswerValidator,
        max_players: usize,
    ) -> Result<JoinOutcome, JoinError> {
        if let Some(existing) = self.players.get_mut(player_id) {
            if existing.is_host {
                return Err(JoinError::ReservedId);
            }
            existing.connected = true;
            return Ok(JoinOutcome::Rejoined(existing.clone()));
        }

        if self.contestant_count() >= max_players {
            return Err(JoinError::RoomFull);
        }

        let existing_names: Vec<&str> = self
            .contestants()
            .map(|p| p.display_name.as_str())
            .collect();
        let name = validator
            .validate_name(display_name, &existing_names)
            .map_err(JoinError::NameInvalid)?;

        if !is_known_icon(icon) {
            return Err(JoinError::InvalidIcon);
        }
        if self.contestants().any(|p| p.icon == icon) {
            return Err(JoinError::IconTaken);
        }

        let player = Player {
            id: player_id.to_string(),
            display_name: name,
            icon: icon.to_string(),
            score: 0,
            is_host: false,
            connected: true,
        };
        self.insert(player.clone());
        Ok(JoinOutcome::Joined(player))
    }

    /// Register the host display. It is listed but never plays.
    pub fn register_host(&mut self, host_id: &str) -> Player {
        if let Some(existing) = self.players.get(host_id) {
            return existing.clone();
        }
        let host = Player {
            id: host_id.to_string(),
            display_name: "Host".to_string(),
            icon: String::new(),
            score: 0,
            is_host: true,
            connected: true,
        };
        self.insert(host.clone());
        host
    }

    fn insert(&mut self, player: Player) {
        self.order.push(player.id.clone());
        self.players.insert(player.id.clone(), player);
    }

    pub fn remove(&mut self, player_id: &str) -> Option<Player> {
        let removed = self.players.remove(player_id)?;
        self.order.retain(|id| id != player_id);
        Some(removed)
    }

    pub fn get(&self, player_id: &str) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn is_contestant(&self, player_id: &str) -> bool {
        self.players
            .get(player_id)
            .map(|p| !p.is_host)
            .unwrap_or(false)
    }

    /// Non-host players, in join order
    pub fn contestants(&self) -> impl Iterator<Item = &Player> {
        self.order
            .iter()
            .filter_map(|id| self.players.get(id))
            .filter(|p| !p.is_host)
    }

    pub fn contestant_ids(&self) -> Vec<PlayerId> {
        self.contestants().map(|p| p.id.clone()).collect()
    }

    /// Contestants with at least one open connection
    pub fn connected_contestant_ids(&self) -> Vec<PlayerId> {
        self.contestants()
            .filter(|p| p.connected)
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn set_connected(&mut self, player_id: &str, connected: bool) {
        if let Some(player) = self.players.get_mut(player_id) {
            player.connected = connected;
        }
    }

    pub fn contestant_count(&self) -> usize {
        self.contestants().count()
    }

    pub fn all(&self) -> Vec<Player> {
        self.order
            .iter()
            .filter_map(|id| self.players.get(id))
            .cloned()
            .collect()
    }

    pub fn add_score(&mut self, player_id: &str, points: i32) {
        if let Some(player) = self.players.get_mut(player_id) {
            player.score += points;
        }
    }

    pub fn reset_scores(&mut self) {
        for player in self.players.values_mut() {
            player.score = 0;
        }
    }

    /// Drop every contestant, keeping the host display
    pub fn clear_contestants(&mut self) {
        self.players.retain(|_, p| p.is_host);
        let players = &self.players;
        self.order.retain(|id| players.contains_key(id));
    }

    /// Contestants ranked by score, highest first
    pub fn standings(&self) -> Vec<Standing> {
        let mut ranked: Vec<&Player> = self.contestants().collect();
        // Stable sort keeps join order among equal scores
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        let mut standings: Vec<Standing> = Vec::with_capacity(ranked.len());
        for (index, player) in ranked.iter().enumerate() {
            let tied_with_previous = standings
                .last()
                .map(|prev| prev.score == player.score)
                .unwrap_or(false);

            let placement = if tied_with_previous {
                if let Some(prev) = standings.last_mut() {
                    prev.tied = true;
                }
                standings.last().map(|p| p.placement).unwrap_or(1)
            } else {
                index as u32 + 1
            };

            standings.push(Standing {
                player_id: player.id.clone(),
                display_name: player.display_name.clone(),
                icon: player.icon.clone(),
                score: player.score,
                placement,
                tied: tied_with_previous,
                score_label: format_percentage(player.score),
                placement_label: placement_suffix(placement),
            });
        }
        standings
    }
}
