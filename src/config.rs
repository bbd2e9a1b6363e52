use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub db_max_connections: u32,
    /// Zero turns the background cleanup off.
    pub cleanup_interval_secs: u64,
    pub seed_lab_count: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://lab_timetable.db".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            frontend_origins: parse_origins("http://localhost:8000,https://sivaramanklu.github.io"),
            db_max_connections: 5,
            cleanup_interval_secs: 3600,
            seed_lab_count: 10,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL").unwrap_or(defaults.database_url);
        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(defaults.frontend_origins);

        Ok(Self {
            database_url,
            bind_addr: parse_var("BIND_ADDR", defaults.bind_addr)?,
            frontend_origins,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
            cleanup_interval_secs: parse_var("CLEANUP_INTERVAL_SECS", defaults.cleanup_interval_secs)?,
            seed_lab_count: parse_var("SEED_LAB_COUNT", defaults.seed_lab_count)?,
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_drops_blanks() {
        let origins = parse_origins(" http://a.test , ,https://b.test,");
        assert_eq!(origins, vec!["http://a.test", "https://b.test"]);
    }

    #[test]
    fn test_unset_var_falls_back_to_default() {
        let port: u16 = parse_var("LAB_TIMETABLE_TEST_UNSET_PORT", 5000).unwrap();
        assert_eq!(port, 5000);
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.seed_lab_count, 10);
        assert_eq!(config.frontend_origins.len(), 2);
    }
}
