//! A single tier's ranked, capacity-bounded list of entries.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

/// A recorded game result. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub difficulty: Difficulty,
    pub score: i32,
    pub duration_ms: u32,
    pub avg_catch_ms: f64,
    pub caught: u64,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

/// An entry together with its 1-based position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    #[serde(flatten)]
    pub entry: LeaderboardEntry,
    pub rank: usize,
}

/// Where an inserted entry landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// 1-based rank among all entries, computed before trimming.
    pub rank: usize,
    /// `false` if the entry ranked beyond the capacity and was discarded.
    pub retained: bool,
}

/// Ranking order: higher score first, then shorter duration, then earlier
/// creation.
pub fn compare_entries(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.duration_ms.cmp(&b.duration_ms))
        .then_with(|| a.created_at.cmp(&b.created_at))
}

/// Entries are kept sorted by [`compare_entries`] and never exceed the
/// capacity.
#[derive(Debug, Clone)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    capacity: usize,
}

impl Leaderboard {
    /// Creates an empty leaderboard holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Inserts `entry`, re-sorts and trims back to the capacity.
    ///
    /// The sort is stable, so entries equal on every key keep their arrival
    /// order.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Placement {
        let id = entry.id.clone();
        self.entries.push(entry);
        self.entries.sort_by(compare_entries);

        let rank = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .map_or(self.entries.len(), |i| i + 1);

        self.entries.truncate(self.capacity);

        Placement {
            rank,
            retained: rank <= self.capacity,
        }
    }

    /// Copies of the first `n` entries with their ranks.
    pub fn top(&self, n: usize) -> Vec<RankedEntry> {
        self.entries
            .iter()
            .take(n)
            .enumerate()
            .map(|(i, entry)| RankedEntry {
                entry: entry.clone(),
                rank: i + 1,
            })
            .collect()
    }

    /// 1-based rank of the entry with `id`, if it is still held.
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id).map(|i| i + 1)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }
}
