use axum::http::HeaderValue;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub port: u16,
    pub allowed_origins: Vec<HeaderValue>,
}

impl AppConfig {
    /// Reads configuration from the process environment. Call
    /// `dotenvy::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::EnvError("JWT_SECRET must be set".into()))?;

        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(10);

        let jwt_ttl_hours = lookup("JWT_TTL_HOURS")
            .and_then(|s| s.parse::<i64>().ok())
            .filter(|h| *h > 0)
            .unwrap_or(24);

        let port = lookup("PORT")
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(3001);

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| match s.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Skipping invalid CORS origin: {}", s);
                    None
                }
            })
            .collect();

        Ok(Self {
            database_url,
            database_max_connections,
            jwt_secret,
            jwt_ttl_hours,
            port,
            allowed_origins,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn missing_secret_is_an_env_error() {
        assert!(matches!(config_from(&[]), Err(AppError::EnvError(_))));
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.jwt_ttl_hours, 24);
        assert_eq!(config.database_max_connections, 10);
        assert!(config.database_url.is_none());
        assert_eq!(config.allowed_origins.len(), 1);
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = config_from(&[
            ("JWT_SECRET", "s3cret"),
            ("ALLOWED_ORIGINS", "http://a.test, http://b.test,,"),
            ("PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(config.port, 8080);
    }
}
