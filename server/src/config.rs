//! Runtime configuration read from the environment.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use anyhow::Context;
use foodgram_core::DEFAULT_PAGE_SIZE;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// Origin used for short links and redirects, without trailing slash
    pub public_base_url: String,
    pub page_size: i64,
    pub session_ttl_days: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let public_base_url: String = try_load("PUBLIC_BASE_URL", "http://localhost:8000")?;

        Ok(Self {
            database_url,
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8000")?,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            page_size: try_load("PAGE_SIZE", &DEFAULT_PAGE_SIZE.to_string())?,
            session_ttl_days: try_load("SESSION_TTL_DAYS", "30")?,
        })
    }

    /// Absolute URL for a path on the public origin.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.public_base_url, path)
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        anyhow::anyhow!("Invalid {key} value {raw:?}: {e}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_url() {
        let config = Config {
            database_url: String::new(),
            bind_addr: "0.0.0.0:8000".to_string(),
            public_base_url: "https://foodgram.example".to_string(),
            page_size: 6,
            session_ttl_days: 30,
        };
        assert_eq!(
            config.public_url("/s/867nv"),
            "https://foodgram.example/s/867nv"
        );
    }
}
