//! Configuration types and loading.
//!
//! Everything comes from the environment (a `.env` file is loaded by the
//! server binary before this runs). Absent variables fall back to sensible
//! development defaults; a missing JWT secret is a hard error outside tests.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Token lifetime in seconds
    pub token_expiration_secs: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/wayfarer".into(),
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_expiration_secs: 90 * 24 * 3600,
            },
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Config("JWT_SECRET must be set".into()))?;
        if jwt_secret.len() < 32 {
            return Err(AppError::Config(
                "JWT_SECRET must be at least 32 bytes".into(),
            ));
        }

        Ok(Self {
            server: ServerConfig {
                host: env_or("HOST", defaults.server.host),
                port: env_or("PORT", defaults.server.port),
            },
            database: DatabaseConfig {
                url: env_or("DATABASE_URL", defaults.database.url),
                max_connections: env_or("DB_MAX_CONNECTIONS", defaults.database.max_connections),
                connect_timeout_secs: env_or(
                    "DB_CONNECT_TIMEOUT",
                    defaults.database.connect_timeout_secs,
                ),
            },
            auth: AuthConfig {
                jwt_secret,
                token_expiration_secs: env_or(
                    "JWT_EXPIRES_IN_SECS",
                    defaults.auth.token_expiration_secs,
                ),
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }
}
