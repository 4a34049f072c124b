use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

use crate::domains::matching::DEFAULT_MAX_DISTANCE_KM;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub allowed_origins: Vec<String>,
    pub db_max_connections: u32,
    pub default_search_radius_km: f64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_search_radius_km: f64 = lookup("DEFAULT_SEARCH_RADIUS_KM")
            .map(|raw| raw.parse())
            .transpose()
            .context("DEFAULT_SEARCH_RADIUS_KM must be a number")?
            .unwrap_or(DEFAULT_MAX_DISTANCE_KM);

        if !default_search_radius_km.is_finite() || default_search_radius_km < 0.0 {
            anyhow::bail!("DEFAULT_SEARCH_RADIUS_KM must be a non-negative number");
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: lookup("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "buddy-match".to_string()),
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .context("DB_MAX_CONNECTIONS must be a valid number")?,
            default_search_radius_km,
        })
    }
}
