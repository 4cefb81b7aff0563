use std::{env, fmt::Display, str::FromStr, time::Duration};

use anyhow::Context;
use log::info;

/// `DATABASE_URL` value selecting the in-process account store.
pub const MEMORY_STORE: &str = "memory";

pub struct ServerConfig {
    bind_addr: String,
    db_url: String,
    store_timeout: Duration,
    prediction_url: String,
    prediction_timeout: Duration,
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let load = |key: &str, default: &str| -> String {
            lookup(key).unwrap_or_else(|| {
                info!("{key} not set, using default: {default}");
                default.to_string()
            })
        };

        Ok(Self {
            bind_addr: load("BIND_ADDR", "0.0.0.0:8080"),
            db_url: load("DATABASE_URL", "energy.db"),
            store_timeout: Duration::from_millis(parse(
                "STORE_TIMEOUT_MS",
                &load("STORE_TIMEOUT_MS", "2000"),
            )?),
            prediction_url: load("PREDICTION_URL", "http://127.0.0.1:8000/predict"),
            prediction_timeout: Duration::from_millis(parse(
                "PREDICTION_TIMEOUT_MS",
                &load("PREDICTION_TIMEOUT_MS", "5000"),
            )?),
        })
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn db_url(&self) -> &str {
        &self.db_url
    }

    pub fn store_timeout(&self) -> Duration {
        self.store_timeout
    }

    pub fn prediction_url(&self) -> &str {
        &self.prediction_url
    }

    pub fn prediction_timeout(&self) -> Duration {
        self.prediction_timeout
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("Invalid {key} value: {value:?}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.db_url(), "energy.db");
        assert_eq!(config.store_timeout(), Duration::from_millis(2000));
        assert_eq!(config.prediction_url(), "http://127.0.0.1:8000/predict");
        assert_eq!(config.prediction_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("DATABASE_URL", MEMORY_STORE),
            ("STORE_TIMEOUT_MS", "250"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.db_url(), "memory");
        assert_eq!(config.store_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_timeout() {
        let err = ServerConfig::from_lookup(lookup(&[("STORE_TIMEOUT_MS", "soon")]))
            .err()
            .unwrap();
        assert!(err.to_string().contains("STORE_TIMEOUT_MS"));
    }
}
