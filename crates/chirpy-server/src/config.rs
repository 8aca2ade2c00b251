use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Duration;

const DEFAULT_ACCESS_TTL_SECS: i64 = 60 * 60;
const DEFAULT_REFRESH_TTL_SECS: i64 = 60 * 24 * 60 * 60;

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub polka_key: String,
    pub db_path: PathBuf,
    pub init_db: bool,
    pub static_dir: PathBuf,
    pub addr: SocketAddr,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.is_empty() {
            bail!("JWT_SECRET must not be empty");
        }
        let polka_key = std::env::var("POLKA_KEY").context("POLKA_KEY must be set")?;

        let db_path = var_or("CHIRPY_DB_PATH", "database.json");
        let init_db = var_or("CHIRPY_INIT_DB", "false")
            .parse::<bool>()
            .context("CHIRPY_INIT_DB must be true or false")?;
        let static_dir = var_or("CHIRPY_STATIC_DIR", ".");
        let host = var_or("CHIRPY_HOST", "0.0.0.0");
        let port: u16 = var_or("CHIRPY_PORT", "42069")
            .parse()
            .context("CHIRPY_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("CHIRPY_HOST must be an IP address")?;

        Ok(Self {
            jwt_secret,
            polka_key,
            db_path: PathBuf::from(db_path),
            init_db,
            static_dir: PathBuf::from(static_dir),
            addr,
            access_ttl: ttl_var("CHIRPY_ACCESS_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?,
            refresh_ttl: ttl_var("CHIRPY_REFRESH_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

fn ttl_var(key: &str, default_secs: i64) -> Result<Duration> {
    let secs = match std::env::var(key) {
        Ok(raw) => raw
            .parse::<i64>()
            .with_context(|| format!("{} must be a whole number of seconds", key))?,
        Err(_) => default_secs,
    };
    if secs <= 0 {
        bail!("{} must be positive", key);
    }
    Duration::try_seconds(secs).with_context(|| format!("{} is out of range", key))
}
