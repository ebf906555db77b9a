//! Per-client submission cooldown.
//!
//! The ledger maps a client identifier (usually the remote address) to the
//! time of its last accepted submission. Only accepted submissions move the
//! timestamp; a rejected attempt leaves it untouched.

use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{CoreError, CoreResult};

/// Default minimum gap between two accepted submissions from one client.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(3_000);

pub struct RateLimiter {
    ledger: DashMap<String, u64>,
    cooldown: Duration,
}

impl RateLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            ledger: DashMap::new(),
            cooldown,
        }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Accepts the client and records `now_ms`, or rejects it with the
    /// number of whole seconds left in its cooldown.
    ///
    /// The ledger entry stays locked between the comparison and the write,
    /// so two concurrent calls for the same client cannot both pass.
    pub fn check_and_record(&self, client_id: &str, now_ms: u64) -> CoreResult<()> {
        let cooldown_ms = self.cooldown_ms();
        match self.ledger.entry(client_id.to_string()) {
            Entry::Occupied(mut slot) => {
                // A clock that stepped backwards counts as no time elapsed.
                let elapsed = now_ms.saturating_sub(*slot.get());
                if elapsed < cooldown_ms {
                    let retry_after_secs = (cooldown_ms - elapsed).div_ceil(1_000);
                    tracing::warn!(
                        "Rate limited client={client_id}, retry after {retry_after_secs}s"
                    );
                    return Err(CoreError::RateLimited { retry_after_secs });
                }
                slot.insert(now_ms);
            }
            Entry::Vacant(slot) => {
                slot.insert(now_ms);
            }
        }
        Ok(())
    }

    /// Drops clients whose last accepted submission is older than `max_idle`.
    ///
    /// `max_idle` is never allowed below the cooldown, so eviction cannot let
    /// a client through early. Returns the number of rows removed.
    pub fn evict_stale(&self, now_ms: u64, max_idle: Duration) -> usize {
        let max_idle_ms = duration_ms(max_idle.max(self.cooldown));
        let before = self.ledger.len();
        self.ledger
            .retain(|_, last| now_ms.saturating_sub(*last) <= max_idle_ms);
        let removed = before.saturating_sub(self.ledger.len());
        if removed > 0 {
            tracing::debug!("Evicted {removed} idle clients, ledger size: {}", self.ledger.len());
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    fn cooldown_ms(&self) -> u64 {
        duration_ms(self.cooldown)
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
