use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub gate: GateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres URL for the document tables. `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub session_secret: String,
    pub session_cookie: String,
    pub session_expiry_hours: u64,
    pub cors_origins: Vec<String>,
}

/// Route protection settings for page requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub api_prefix: String,
    pub sign_in_path: String,
    pub public_paths: Vec<String>,
    pub excluded_prefixes: Vec<String>,
    pub excluded_files: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            sign_in_path: "/signin".to_string(),
            public_paths: vec![
                "/".to_string(),
                "/signin".to_string(),
                "/signin/otp".to_string(),
                "/forgot-password".to_string(),
            ],
            excluded_prefixes: vec![
                "/static/".to_string(),
                "/assets/".to_string(),
                "/_internal/".to_string(),
            ],
            excluded_files: vec![
                "/favicon.ico".to_string(),
                "/robots.txt".to_string(),
                "/health".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SKYFARE_HOST") {
            self.server.host = v;
        }
        if let Some(port) = env::var("SKYFARE_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("SERVER_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("SESSION_SECRET") {
            self.security.session_secret = v;
        }
        if let Ok(v) = env::var("SESSION_COOKIE") {
            self.security.session_cookie = v;
        }
        if let Ok(v) = env::var("SESSION_EXPIRY_HOURS") {
            self.security.session_expiry_hours = v.parse().unwrap_or(self.security.session_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Gate overrides
        if let Ok(v) = env::var("GATE_SIGN_IN_PATH") {
            self.gate.sign_in_path = v;
        }
        if let Ok(v) = env::var("GATE_PUBLIC_PATHS") {
            self.gate.public_paths = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                session_secret: "skyfare-development-secret".to_string(),
                session_cookie: "skyfare.session-token".to_string(),
                session_expiry_hours: 24 * 7, // 1 week
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            gate: GateConfig::default(),
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_request_size_bytes: 5 * 1024 * 1024, // 5MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_cookie: "__Secure-skyfare.session-token".to_string(),
                session_expiry_hours: 24,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            gate: GateConfig::default(),
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                max_request_size_bytes: 2 * 1024 * 1024, // 2MB
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                session_secret: String::new(),
                session_cookie: "__Secure-skyfare.session-token".to_string(),
                session_expiry_hours: 12,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            gate: GateConfig::default(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_config_uses_memory_store_and_local_secret() {
        let config = AppConfig::development();
        assert!(config.database.url.is_none());
        assert!(!config.security.session_secret.is_empty());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn production_config_requires_explicit_secret() {
        let config = AppConfig::production();
        assert!(config.security.session_secret.is_empty());
        assert_eq!(config.server.max_request_size_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn default_gate_lists_public_pages() {
        let gate = GateConfig::default();
        assert_eq!(gate.api_prefix, "/api");
        assert!(gate.public_paths.iter().any(|p| p == "/signin/otp"));
        assert!(gate.public_paths.iter().any(|p| p == "/forgot-password"));
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let mut config = AppConfig::development();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 4100;
        assert_eq!(config.bind_addr(), "127.0.0.1:4100");
    }
}
