use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::driver::DEFAULT_DATE_DELAY;
use crate::proxy::{DEFAULT_BACKOFF, DEFAULT_ROUNDS};

const PREFIX: &str = "TYGIA_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub server_address: String,
    pub request_timeout: Duration,
    pub date_delay: Duration,
    pub proxy_rounds: u32,
    pub proxy_backoff: Duration,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:8080".to_string(),
            request_timeout: Duration::from_secs(30),
            date_delay: DEFAULT_DATE_DELAY,
            proxy_rounds: DEFAULT_ROUNDS,
            proxy_backoff: DEFAULT_BACKOFF,
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Reads `.env` if present, then `TYGIA_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(&format!("{}{}", PREFIX, name)).filter(|v| !v.trim().is_empty());
        let mut cfg = Config::default();

        if let Some(addr) = get("SERVER_ADDRESS") {
            cfg.server_address = addr;
        }
        if let Some(secs) = parse::<u64>(get("REQUEST_TIMEOUT_SECS"), "REQUEST_TIMEOUT_SECS")? {
            cfg.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse::<u64>(get("DATE_DELAY_MS"), "DATE_DELAY_MS")? {
            cfg.date_delay = Duration::from_millis(ms);
        }
        if let Some(rounds) = parse::<u32>(get("PROXY_ROUNDS"), "PROXY_ROUNDS")? {
            anyhow::ensure!(rounds > 0, "{}PROXY_ROUNDS must be at least 1", PREFIX);
            cfg.proxy_rounds = rounds;
        }
        if let Some(ms) = parse::<u64>(get("PROXY_BACKOFF_MS"), "PROXY_BACKOFF_MS")? {
            cfg.proxy_backoff = Duration::from_millis(ms);
        }
        if let Some(dir) = get("OUTPUT_DIR") {
            cfg.output_dir = PathBuf::from(dir);
        }

        Ok(cfg)
    }
}

fn parse<T>(raw: Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.map(|v| {
        v.trim()
            .parse::<T>()
            .with_context(|| format!("{}{} has invalid value '{}'", PREFIX, name, v))
    })
    .transpose()
}
