use std::env;
use std::str::FromStr;

use crate::error::AppError;

/// Ten years. Larger values overflow the token expiry timestamp.
const MAX_TOKEN_TTL_DAYS: i64 = 3650;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
    /// Single allowed CORS origin. `None` allows any origin.
    pub cors_origin: Option<String>,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| AppError::InternalServerError("JWT_SECRET must be set".into()))?;

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::InternalServerError(
                "BCRYPT_COST must be between 4 and 31".into(),
            ));
        }

        let token_ttl_days = parse_or(&lookup, "TOKEN_TTL_DAYS", 30)?;
        if !(1..=MAX_TOKEN_TTL_DAYS).contains(&token_ttl_days) {
            return Err(AppError::InternalServerError(format!(
                "TOKEN_TTL_DAYS must be between 1 and {}",
                MAX_TOKEN_TTL_DAYS
            )));
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            server_port: parse_or(&lookup, "SERVER_PORT", 5001)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret,
            token_ttl_days,
            bcrypt_cost,
            cors_origin: lookup("CORS_ORIGIN").filter(|origin| !origin.is_empty()),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::InternalServerError(format!("{} must be a number", key))),
        None => Ok(default),
    }
}
