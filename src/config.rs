// src/config.rs

use std::env;

use dotenvy::dotenv;
use thiserror::Error;

/// Default pass threshold, in percent.
pub const DEFAULT_PASSING_PERCENTAGE: f64 = 70.0;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub rust_log: String,
    pub port: u16,
    pub passing_percentage: f64,
    pub cache_results: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = parsed("PORT", DEFAULT_PORT)?;

        let passing_percentage = parsed("PASSING_PERCENTAGE", DEFAULT_PASSING_PERCENTAGE)?;
        if !(0.0..=100.0).contains(&passing_percentage) {
            return Err(ConfigError::Invalid {
                name: "PASSING_PERCENTAGE",
                value: passing_percentage.to_string(),
            });
        }

        let cache_results = parsed("CACHE_RESULTS", true)?;

        Ok(Self {
            database_url,
            jwt_secret,
            rust_log,
            port,
            passing_percentage,
            cache_results,
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
