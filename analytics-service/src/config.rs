use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresConfig {
    pub uri: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub kind: StoreKind,
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: String,
    /// Header carrying the owner id resolved by the upstream auth gateway.
    #[serde(default = "default_owner_header")]
    pub owner_header: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    #[serde(default = "default_window")]
    pub default_window: i64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_window: default_window(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub store: StoreConfig,
    pub postgres: Option<PostgresConfig>,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    pub metrics: Option<MetricsConfig>,
}

fn default_read_timeout_ms() -> u64 {
    5_000
}

fn default_owner_header() -> String {
    "x-owner-id".to_string()
}

fn default_window() -> i64 {
    3
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("ANALYTICS_CONFIG").unwrap_or_else(|_| "analytics-config.toml".to_string());
        let contents = fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let cfg: AppConfig = toml::from_str(contents)?;
        if cfg.store.kind == StoreKind::Postgres && cfg.postgres.is_none() {
            anyhow::bail!("store.kind = \"postgres\" requires a [postgres] section");
        }
        Ok(cfg)
    }

    pub fn postgres(&self) -> anyhow::Result<&PostgresConfig> {
        self.postgres
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("missing [postgres] section"))
    }
}
