use std::sync::Arc;

use swatboard_core::LeaderboardStore;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Every leaderboard and the submission cooldown ledger. Lives as long
    /// as the process.
    pub store: Arc<LeaderboardStore>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let store = LeaderboardStore::new(config.store_config());
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }
}
