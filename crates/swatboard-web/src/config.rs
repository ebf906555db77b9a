use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use swatboard_core::StoreConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub tls: TlsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Take the client address from the first `X-Forwarded-For` hop.
    #[serde(default = "default_true")]
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
    #[serde(default = "default_ledger_idle_secs")]
    pub ledger_idle_secs: u64,
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsConfig {
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_max_body_bytes() -> usize { 16 * 1024 }
fn default_allowed_origins() -> Vec<String> { vec!["http://localhost:3000".to_string()] }
fn default_true() -> bool { true }
fn default_capacity() -> usize { 100 }
fn default_top_n() -> usize { 5 }
fn default_cooldown_ms() -> u64 { 3_000 }
fn default_ledger_idle_secs() -> u64 { 600 }
fn default_cleanup_interval_secs() -> u64 { 60 }

impl Default for CorsConfig {
    fn default() -> Self {
        Self { allowed_origins: default_allowed_origins() }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self { trust_forwarded_for: true }
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            top_n: default_top_n(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
            ledger_idle_secs: default_ledger_idle_secs(),
            cleanup_interval_secs: default_cleanup_interval_secs(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
            cors: CorsConfig::default(),
            proxy: ProxyConfig::default(),
            leaderboard: LeaderboardConfig::default(),
            rate_limit: RateLimitConfig::default(),
            tls: TlsConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads `$SWATBOARD_CONFIG` (or defaults), then applies environment
    /// overrides and checks the result.
    pub fn load() -> anyhow::Result<Self> {
        let config = match std::env::var("SWATBOARD_CONFIG").map(PathBuf::from) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config
            .with_env_overrides(|key| std::env::var(key).ok())?
            .checked()
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `SWATBOARD_*` and `PORT` variables looked up through `var`.
    pub fn with_env_overrides(
        mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        if let Some(addr) = var("SWATBOARD_BIND_ADDR") {
            self.bind_addr = addr.parse()?;
        }
        if let Some(port) = var("PORT") {
            self.bind_addr.set_port(port.parse()?);
        }

        if let Some(origins) = var("SWATBOARD_CORS_ORIGINS") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(val) = var("SWATBOARD_TRUST_PROXY") {
            self.proxy.trust_forwarded_for = matches!(val.as_str(), "1" | "true" | "yes");
        }

        if let Some(val) = var("SWATBOARD_COOLDOWN_MS") {
            match val.parse::<u64>() {
                Ok(ms) => self.rate_limit.cooldown_ms = ms,
                Err(_) => tracing::warn!("Ignoring invalid SWATBOARD_COOLDOWN_MS: {val}"),
            }
        }

        if let Some(cert) = var("SWATBOARD_TLS_CERT") {
            self.tls.cert_path = Some(cert);
        }
        if let Some(key) = var("SWATBOARD_TLS_KEY") {
            self.tls.key_path = Some(key);
        }

        Ok(self)
    }

    /// Rejects settings the store cannot honour.
    pub fn checked(mut self) -> anyhow::Result<Self> {
        if self.leaderboard.capacity == 0 {
            anyhow::bail!("leaderboard.capacity must be at least 1");
        }
        if self.leaderboard.top_n == 0 {
            anyhow::bail!("leaderboard.top_n must be at least 1");
        }
        if self.leaderboard.top_n > self.leaderboard.capacity {
            anyhow::bail!(
                "leaderboard.top_n ({}) exceeds leaderboard.capacity ({})",
                self.leaderboard.top_n,
                self.leaderboard.capacity
            );
        }
        if self.rate_limit.cooldown_ms == 0 {
            anyhow::bail!("rate_limit.cooldown_ms must be at least 1");
        }

        let cooldown_secs = self.rate_limit.cooldown_ms.div_ceil(1_000);
        if self.rate_limit.ledger_idle_secs < cooldown_secs {
            tracing::warn!(
                "rate_limit.ledger_idle_secs ({}) is shorter than the cooldown. Using {}s.",
                self.rate_limit.ledger_idle_secs,
                cooldown_secs
            );
            self.rate_limit.ledger_idle_secs = cooldown_secs;
        }
        if self.rate_limit.cleanup_interval_secs == 0 {
            self.rate_limit.cleanup_interval_secs = default_cleanup_interval_secs();
        }

        if self.tls.cert_path.is_some() != self.tls.key_path.is_some() {
            tracing::warn!("Only one of tls.cert_path / tls.key_path is set. Serving plain HTTP.");
        }

        Ok(self)
    }

    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            capacity: self.leaderboard.capacity,
            top_n: self.leaderboard.top_n,
            cooldown: Duration::from_millis(self.rate_limit.cooldown_ms),
            ledger_idle: Duration::from_secs(self.rate_limit.ledger_idle_secs),
        }
    }
}
