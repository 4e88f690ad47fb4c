use serde::{Deserialize, Serialize};
use std::env;

/// Value of `DATABASE_URL` that selects the in-process document store.
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Password given to identities created through sign-up when the form
    /// carries none.
    pub signup_placeholder_password: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let port = env::var("SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("invalid SERVER_PORT {:?}: {}", port, e))?;

        Ok(Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite:pipeline_crm.db".to_string()),
            },
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port,
                static_dir: env::var("STATIC_DIR").ok().filter(|dir| !dir.is_empty()),
            },
            auth: AuthConfig {
                signup_placeholder_password: env::var("SIGNUP_PLACEHOLDER_PASSWORD")
                    .unwrap_or_else(|_| "changeme".to_string()),
            },
        })
    }

    /// Configuration for tests and embedding: in-memory store, default port.
    pub fn in_memory() -> Self {
        Self {
            database: DatabaseConfig {
                url: MEMORY_DATABASE_URL.to_string(),
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                static_dir: None,
            },
            auth: AuthConfig {
                signup_placeholder_password: "changeme".to_string(),
            },
        }
    }

    pub fn uses_memory_store(&self) -> bool {
        self.database.url == MEMORY_DATABASE_URL
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
