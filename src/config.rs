use crate::app::{validate_session_length, AppOptions, DEFAULT_SESSION_LENGTH};
use anyhow::Context;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub static_dir: String,
    pub session_length: u32,
    pub auto_advance_secs: u64,
    pub rng_seed: Option<u64>,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let session_length = parse_or(&lookup, "SESSION_LENGTH", DEFAULT_SESSION_LENGTH)?;
        validate_session_length(session_length).context("SESSION_LENGTH")?;

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://conjugaison.db?mode=rwc".to_string()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string()),
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
            session_length,
            auto_advance_secs: parse_or(&lookup, "AUTO_ADVANCE_SECS", 10)?,
            rng_seed: lookup("RNG_SEED")
                .map(|raw| raw.parse().with_context(|| format!("invalid RNG_SEED: {raw}")))
                .transpose()?,
        })
    }

    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            session_length: self.session_length,
            auto_advance: Duration::from_secs(self.auto_advance_secs),
            rng_seed: self.rng_seed,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw}")),
        None => Ok(default),
    }
}
