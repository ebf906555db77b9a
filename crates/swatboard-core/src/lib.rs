//! Swatboard core library: transport-agnostic leaderboard logic.
//!
//! `swatboard-core` validates game results, throttles clients and keeps a
//! bounded, ranked leaderboard per difficulty. It knows nothing about HTTP;
//! `swatboard-web` wraps it in an axum server.
//!
//! # Modules
//!
//! - [`difficulty`] — The three difficulty tiers.
//! - [`validate`] — Raw request type, field checks and the typed [`Submission`].
//! - [`rate_limit`] — Per-client cooldown ledger.
//! - [`leaderboard`] — One tier's sorted, capacity-bounded entry list.
//! - [`store`] — [`LeaderboardStore`], owning all tiers and the ledger.
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod difficulty;
pub mod error;
pub mod leaderboard;
pub mod rate_limit;
pub mod store;
pub mod validate;

pub use difficulty::Difficulty;
pub use error::{CoreError, CoreResult};
pub use leaderboard::{compare_entries, Leaderboard, LeaderboardEntry, Placement, RankedEntry};
pub use rate_limit::RateLimiter;
pub use store::{now_ms, LeaderboardSnapshot, LeaderboardStore, StoreConfig, SubmitReceipt};
pub use validate::{validate, RecordRequest, Submission, Validation};

/// Normalises a string to NFC (composed) form.
///
/// Some input methods (notably on macOS) produce decomposed Hangul, which
/// would otherwise count as several characters per syllable.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
