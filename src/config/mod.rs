use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

/// Which persistence strategy backs the person facade. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    /// Unit-of-work sessions with explicit entry tracking
    Tracked,
    /// One parameterized statement per call
    Sql,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tracked" | "orm" => Ok(StoreBackend::Tracked),
            "sql" | "raw" => Ok(StoreBackend::Sql),
            other => Err(format!("unknown store backend '{}' (expected tracked or sql)", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Per-observer time limit inside the save pipeline
    pub observer_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub enable_audit_logging: bool,
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Store overrides
        if let Ok(v) = env::var("STORE_BACKEND") {
            match v.parse() {
                Ok(backend) => self.store.backend = backend,
                Err(e) => tracing::warn!("Ignoring STORE_BACKEND: {}", e),
            }
        }
        if let Ok(v) = env::var("OBSERVER_TIMEOUT_MS") {
            self.store.observer_timeout_ms = v.parse().unwrap_or(self.store.observer_timeout_ms);
        }

        // API overrides
        if let Some(port) = env::var("API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_AUDIT_LOGGING") {
            self.security.enable_audit_logging = v.parse().unwrap_or(self.security.enable_audit_logging);
        }
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "sqlite://people.db?mode=rwc".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            store: StoreConfig {
                backend: StoreBackend::Tracked,
                observer_timeout_ms: 5_000,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                enable_audit_logging: true,
                jwt_secret: "development-secret-change-me".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                url: "sqlite://people.db?mode=rwc".to_string(),
                max_connections: 10,
                connection_timeout: 10,
            },
            store: StoreConfig {
                backend: StoreBackend::Tracked,
                observer_timeout_ms: 2_000,
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                enable_cors: true,
                enable_audit_logging: true,
                // Must come from SECURITY_JWT_SECRET
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: "sqlite://people.db?mode=rwc".to_string(),
                max_connections: 20,
                connection_timeout: 5,
            },
            store: StoreConfig {
                backend: StoreBackend::Tracked,
                observer_timeout_ms: 1_000,
            },
            api: ApiConfig {
                port: 8080,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                enable_cors: false,
                enable_audit_logging: true,
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.store.backend, StoreBackend::Tracked);
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.api.port, 3000);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert!(!config.security.enable_cors);
        assert_eq!(config.security.jwt_expiry_hours, 4);
    }

    #[test]
    fn parses_store_backend_names() {
        assert_eq!("tracked".parse::<StoreBackend>(), Ok(StoreBackend::Tracked));
        assert_eq!("ORM".parse::<StoreBackend>(), Ok(StoreBackend::Tracked));
        assert_eq!(" sql ".parse::<StoreBackend>(), Ok(StoreBackend::Sql));
        assert!("dapper".parse::<StoreBackend>().is_err());
    }

    // The only test that touches process env; keep it that way so parallel tests stay isolated
    #[test]
    fn env_overrides_apply_and_bad_values_are_ignored() {
        let keys = ["STORE_BACKEND", "API_PORT", "PORT", "DATABASE_MAX_CONNECTIONS", "SECURITY_JWT_SECRET"];

        env::set_var("STORE_BACKEND", "dapper");
        env::set_var("PORT", "8080");
        env::set_var("DATABASE_MAX_CONNECTIONS", "many");
        env::set_var("SECURITY_JWT_SECRET", "from-env");
        let config = AppConfig::development().with_env_overrides();
        assert_eq!(config.store.backend, StoreBackend::Tracked);
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.security.jwt_secret, "from-env");

        env::set_var("STORE_BACKEND", "raw");
        env::set_var("API_PORT", "9090");
        let config = AppConfig::production().with_env_overrides();
        assert_eq!(config.store.backend, StoreBackend::Sql);
        assert_eq!(config.api.port, 9090);

        for key in keys {
            env::remove_var(key);
        }
    }
}
