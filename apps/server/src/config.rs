use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub db_pool_size: u32,
    pub db_connection_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment, after loading `.env` if present.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let listen_addr: SocketAddr = var("GT_LISTEN_ADDR", "0.0.0.0:3000")
            .parse()
            .context("Invalid GT_LISTEN_ADDR")?;
        let db_path = var("GT_DB_PATH", "./db/app.db");
        let cors_allow = var("GT_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = var("GT_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .context("Invalid GT_REQUEST_TIMEOUT_MS")?;
        let db_pool_size: u32 = var("GT_DB_POOL_SIZE", "8")
            .parse()
            .context("Invalid GT_DB_POOL_SIZE")?;
        if db_pool_size == 0 {
            anyhow::bail!("GT_DB_POOL_SIZE must be at least 1");
        }
        let connection_timeout_ms: u64 = var("GT_DB_CONNECTION_TIMEOUT_MS", "30000")
            .parse()
            .context("Invalid GT_DB_CONNECTION_TIMEOUT_MS")?;

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            db_pool_size,
            db_connection_timeout: Duration::from_millis(connection_timeout_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.db_path, "./db/app.db");
        assert_eq!(config.cors_allow, vec!["*".to_string()]);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.db_pool_size, 8);
        assert_eq!(config.db_connection_timeout, Duration::from_secs(30));
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let config = config_from(&[(
            "GT_CORS_ALLOW_ORIGINS",
            "http://a.test, http://b.test,,",
        )])
        .unwrap();
        assert_eq!(config.cors_allow, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config_from(&[("GT_LISTEN_ADDR", "nowhere")]).is_err());
        assert!(config_from(&[("GT_REQUEST_TIMEOUT_MS", "soon")]).is_err());
        assert!(config_from(&[("GT_DB_POOL_SIZE", "0")]).is_err());
        assert!(config_from(&[("GT_DB_CONNECTION_TIMEOUT_MS", "-1")]).is_err());
    }
}
