use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub network: NetworkConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// host:port dialled by the TCP reachability probe
    pub probe_address: String,
    pub probe_timeout_ms: u64,
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync_on_reconnect: bool,
    /// 0 disables periodic sync
    pub auto_sync_interval_secs: u64,
    /// 0 disables the per-operation timeout
    pub operation_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data/plantera-offline.db".to_string(),
            max_connections: 5,
            connection_timeout: 30,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            probe_address: "1.1.1.1:53".to_string(),
            probe_timeout_ms: 1_500,
            poll_interval_secs: 5,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            auto_sync_on_reconnect: true,
            auto_sync_interval_secs: 0,
            operation_timeout_ms: 15_000,
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// Each in-memory connection is its own database, so the pool must hold exactly one.
    pub fn effective_max_connections(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("PLANTERA_DATABASE_URL") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.database.url = v.to_string();
            }
        }
        if let Some(value) = env_u64("PLANTERA_DB_MAX_CONNECTIONS") {
            cfg.database.max_connections = value.min(u64::from(u32::MAX)) as u32;
        }

        if let Ok(v) = std::env::var("PLANTERA_PROBE_ADDRESS") {
            let v = v.trim();
            if !v.is_empty() {
                cfg.network.probe_address = v.to_string();
            }
        }
        if let Some(value) = env_u64("PLANTERA_PROBE_TIMEOUT_MS") {
            cfg.network.probe_timeout_ms = value.max(1);
        }
        if let Some(value) = env_u64("PLANTERA_POLL_INTERVAL_SECS") {
            cfg.network.poll_interval_secs = value.max(1);
        }

        if let Ok(v) = std::env::var("PLANTERA_AUTO_SYNC_ON_RECONNECT") {
            cfg.sync.auto_sync_on_reconnect = parse_bool(&v, cfg.sync.auto_sync_on_reconnect);
        }
        if let Some(value) = env_u64("PLANTERA_AUTO_SYNC_INTERVAL_SECS") {
            cfg.sync.auto_sync_interval_secs = value;
        }
        if let Some(value) = env_u64("PLANTERA_OPERATION_TIMEOUT_MS") {
            cfg.sync.operation_timeout_ms = value;
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.trim().is_empty() {
            return Err("Database url must not be empty".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.network.probe_address.trim().is_empty() {
            return Err("Network probe_address must not be empty".to_string());
        }
        if self.network.poll_interval_secs == 0 {
            return Err("Network poll_interval_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| parse_u64(&v))
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}
