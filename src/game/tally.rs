//! Vote collection for one voting phase.
//!
//! Counting is independent of arrival order. The only order-dependent rule is
//! the elimination tie-break in [`VoteTally::winner`]: among answers tied for
//! the most votes, the one whose earliest current vote arrived first wins.

use crate::types::PlayerId;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Ballot {
    choice: String,
    seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    ballots: HashMap<PlayerId, Ballot>,
    next_seq: u64,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tally from an authoritative list, in arrival order
    pub fn from_votes<I, V, C>(votes: I) -> Self
    where
        I: IntoIterator<Item = (V, C)>,
        V: Into<PlayerId>,
        C: Into<String>,
    {
        let mut tally = Self::new();
        for (voter, choice) in votes {
            tally.record(voter, choice);
        }
        tally
    }

    /// Record a vote. A second vote from the same voter replaces the first.
    pub fn record(&mut self, voter: impl Into<PlayerId>, choice: impl Into<String>) {
        let choice = choice.into();
        if choice.is_empty() {
            return;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.ballots.insert(voter.into(), Ballot { choice, seq });
    }

    pub fn has_voted(&self, voter: &str) -> bool {
        self.ballots.contains_key(voter)
    }

    pub fn choice_of(&self, voter: &str) -> Option<&str> {
        self.ballots.get(voter).map(|b| b.choice.as_str())
    }

    /// Voters with their choices, in arrival order
    pub fn votes(&self) -> Vec<(&PlayerId, &str)> {
        let mut votes: Vec<_> = self.ballots.iter().collect();
        votes.sort_by_key(|(_, b)| b.seq);
        votes
            .into_iter()
            .map(|(voter, b)| (voter, b.choice.as_str()))
            .collect()
    }

    pub fn total_votes(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }

    pub fn vote_counts(&self) -> HashMap<String, u32> {
        let mut counts = HashMap::new();
        for ballot in self.ballots.values() {
            *counts.entry(ballot.choice.clone()).or_insert(0) += 1;
        }
        counts
    }

    pub fn votes_for(&self, choice: &str) -> u32 {
        self.ballots.values().filter(|b| b.choice == choice).count() as u32
    }

    /// Every choice tied for the highest count, ordered by earliest vote
    pub fn leaders(&self) -> Vec<String> {
        let mut stats: HashMap<&str, (u32, u64)> = HashMap::new();
        for ballot in self.ballots.values() {
            let entry = stats.entry(ballot.choice.as_str()).or_insert((0, u64::MAX));
            entry.0 += 1;
            entry.1 = entry.1.min(ballot.seq);
        }

        let Some(max) = stats.values().map(|(count, _)| *count).max() else {
            return Vec::new();
        };

        let mut leaders: Vec<(&str, u64)> = stats
            .into_iter()
            .filter(|(_, (count, _))| *count == max)
            .map(|(choice, (_, first_seq))| (choice, first_seq))
            .collect();
        leaders.sort_by_key(|(_, first_seq)| *first_seq);
        leaders
            .into_iter()
            .map(|(choice, _)| choice.to_string())
            .collect()
    }

    /// The single choice with the most votes. On a tie the choice whose
    /// earliest vote arrived first wins. `None` only when nobody voted.
    pub fn winner(&self) -> Option<String> {
        self.leaders().into_iter().next()
    }

    pub fn is_tie(&self) -> bool {
        self.leaders().len() > 1
    }

    pub fn clear(&mut self) {
        self.ballots.clear();
        self.next_seq = 0;
    }
}
