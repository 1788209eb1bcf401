use serde::Deserialize;

/// Where leads are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_name: Option<String>,
    pub db_max_connections: u32,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Store backend: {:?}", config.store_backend);
        if let Some(ref name) = config.db_name {
            tracing::debug!("Database name override: {}", name);
        }
        tracing::debug!("CORS origins: {:?}", config.cors_origins);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Build a config from any key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND")
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .as_deref()
        {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{}'", other),
        };

        let database_url = lookup("DB_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .map(|url| {
                if url.trim().is_empty() {
                    anyhow::bail!("DB_URL cannot be empty");
                }
                if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                    anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
                }
                Ok(url)
            })
            .transpose()?;

        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DB_URL or DATABASE_URL environment variable required");
        }

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a positive number"))?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "8001".to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        if cors_origins.is_empty() {
            anyhow::bail!("CORS_ORIGINS must list at least one origin");
        }

        let request_timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| anyhow::anyhow!("REQUEST_TIMEOUT_SECS must be a positive number"))?;

        Ok(Self {
            store_backend,
            database_url,
            db_name: lookup("DB_NAME").filter(|s| !s.trim().is_empty()),
            db_max_connections,
            port,
            cors_origins,
            request_timeout_secs,
        })
    }

    /// Whether every origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/leads")]).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.port, 8001);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.allows_any_origin());
        assert!(config.db_name.is_none());
    }

    #[test]
    fn test_postgres_requires_url() {
        assert!(load(&[]).is_err());
        assert!(load(&[("DB_URL", "mysql://localhost/leads")]).is_err());
    }

    #[test]
    fn test_memory_backend_needs_no_url() {
        let config = load(&[("STORE_BACKEND", "memory")]).unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_cors_origins_split_and_trimmed() {
        let config = load(&[
            ("STORE_BACKEND", "memory"),
            ("CORS_ORIGINS", "https://sociallab.com.br, http://localhost:3000,"),
        ])
        .unwrap();

        assert_eq!(
            config.cors_origins,
            vec!["https://sociallab.com.br", "http://localhost:3000"]
        );
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(load(&[("STORE_BACKEND", "memory"), ("PORT", "http")]).is_err());
        assert!(load(&[("STORE_BACKEND", "memory"), ("DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("STORE_BACKEND", "memory"), ("REQUEST_TIMEOUT_SECS", "-1")]).is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(load(&[("STORE_BACKEND", "mongo")]).is_err());
    }

    #[test]
    fn test_db_name_override() {
        let config = load(&[
            ("DB_URL", "postgresql://localhost/postgres"),
            ("DB_NAME", "sociallab"),
        ])
        .unwrap();

        assert_eq!(config.db_name.as_deref(), Some("sociallab"));
    }
}
