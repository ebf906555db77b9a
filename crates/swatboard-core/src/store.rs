//! The leaderboard store: one ranked list per difficulty plus the
//! submission cooldown ledger.
//!
//! A store is an ordinary value. The web server keeps one behind an `Arc`
//! for the life of the process; tests create a fresh one per case.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::difficulty::Difficulty;
use crate::error::CoreResult;
use crate::leaderboard::{Leaderboard, LeaderboardEntry, RankedEntry};
use crate::rate_limit::{RateLimiter, DEFAULT_COOLDOWN};
use crate::validate::Submission;

pub const DEFAULT_CAPACITY: usize = 100;
pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_LEDGER_IDLE: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Entries retained per difficulty.
    pub capacity: usize,
    /// Entries returned by [`LeaderboardStore::query`].
    pub top_n: usize,
    pub cooldown: Duration,
    /// How long an idle client stays in the cooldown ledger.
    pub ledger_idle: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            top_n: DEFAULT_TOP_N,
            cooldown: DEFAULT_COOLDOWN,
            ledger_idle: DEFAULT_LEDGER_IDLE,
        }
    }
}

/// Returned for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub id: String,
    pub difficulty: Difficulty,
    pub score: i32,
    /// 1-based rank at insertion time. May exceed the capacity when the
    /// entry was trimmed straight away.
    pub estimated_rank: usize,
    pub retained: bool,
}

/// Point-in-time copy of a difficulty's top entries.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardSnapshot {
    pub difficulty: Difficulty,
    pub top: Vec<RankedEntry>,
}

pub struct LeaderboardStore {
    boards: [Mutex<Leaderboard>; 3],
    limiter: RateLimiter,
    config: StoreConfig,
}

impl LeaderboardStore {
    pub fn new(config: StoreConfig) -> Self {
        let board = || Mutex::new(Leaderboard::with_capacity_limit(config.capacity));
        Self {
            boards: [board(), board(), board()],
            limiter: RateLimiter::new(config.cooldown),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Records a validated submission for `client_id` at the current time.
    ///
    /// # Errors
    ///
    /// [`CoreError::RateLimited`](crate::CoreError::RateLimited) if the
    /// client's cooldown has not elapsed. Nothing is stored in that case.
    pub fn submit(&self, submission: Submission, client_id: &str) -> CoreResult<SubmitReceipt> {
        self.submit_at(submission, client_id, now_ms())
    }

    /// Same as [`submit`](Self::submit) with an explicit timestamp in
    /// milliseconds since the Unix epoch.
    pub fn submit_at(
        &self,
        submission: Submission,
        client_id: &str,
        now_ms: u64,
    ) -> CoreResult<SubmitReceipt> {
        self.limiter.check_and_record(client_id, now_ms)?;

        let entry = LeaderboardEntry {
            id: uuid::Uuid::new_v4().to_string(),
            name: submission.name,
            difficulty: submission.difficulty,
            score: submission.score,
            duration_ms: submission.duration_ms,
            avg_catch_ms: submission.avg_catch_ms,
            caught: submission.caught,
            created_at: now_ms,
        };
        let id = entry.id.clone();
        let difficulty = entry.difficulty;
        let score = entry.score;

        let placement = self.board(difficulty).insert(entry);
        tracing::debug!(
            "Stored entry id={id}, difficulty={difficulty}, score={score}, rank={}, retained={}",
            placement.rank,
            placement.retained
        );

        Ok(SubmitReceipt {
            id,
            difficulty,
            score,
            estimated_rank: placement.rank,
            retained: placement.retained,
        })
    }

    /// The top entries of `difficulty`, copied out of the store.
    pub fn query(&self, difficulty: Difficulty) -> LeaderboardSnapshot {
        let top = self.board(difficulty).top(self.config.top_n);
        tracing::debug!("Leaderboard query: difficulty={difficulty}, returned={}", top.len());
        LeaderboardSnapshot { difficulty, top }
    }

    /// Parses `tag` and queries that difficulty.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidDifficulty`](crate::CoreError::InvalidDifficulty)
    /// for anything other than `easy`, `medium` or `hard`.
    pub fn query_tag(&self, tag: &str) -> CoreResult<LeaderboardSnapshot> {
        Ok(self.query(tag.parse()?))
    }

    /// Number of entries currently held for `difficulty`.
    pub fn len(&self, difficulty: Difficulty) -> usize {
        self.board(difficulty).len()
    }

    pub fn evict_stale_clients(&self, now_ms: u64) -> usize {
        self.limiter.evict_stale(now_ms, self.config.ledger_idle)
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    // Every mutation sorts and trims before the guard drops, so a board
    // behind a poisoned lock is still consistent.
    fn board(&self, difficulty: Difficulty) -> MutexGuard<'_, Leaderboard> {
        self.boards[difficulty.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LeaderboardStore {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
