use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;

// Directory service configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    /// Bootstrap admin credentials; without one, a fresh in-memory store has
    /// no account to log in with.
    pub seed_admin: Option<SeedAdmin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedAdmin {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
struct DirectoryConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    seed_admin: Option<SeedAdmin>,
}

impl DirectoryConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("KEEL_DIR_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8780".to_string())
            .parse()
            .with_context(|| "parse KEEL_DIR_BIND")?;
        let metrics_bind = std::env::var("KEEL_DIR_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:8781".to_string())
            .parse()
            .with_context(|| "parse KEEL_DIR_METRICS_BIND")?;
        let seed_admin = match (
            std::env::var("KEEL_DIR_ADMIN_USERNAME"),
            std::env::var("KEEL_DIR_ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) => Some(SeedAdmin {
                email: std::env::var("KEEL_DIR_ADMIN_EMAIL")
                    .unwrap_or_else(|_| format!("{username}@localhost")),
                username,
                password,
            }),
            _ => None,
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            seed_admin,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("KEEL_DIR_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read KEEL_DIR_CONFIG: {path}"))?;
            let override_cfg: DirectoryConfigOverride = serde_yaml::from_str(&contents)
                .with_context(|| "parse directory config yaml")?;
            if let Some(value) = override_cfg.bind_addr {
                config.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
            }
            if let Some(value) = override_cfg.metrics_bind {
                config.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
            }
            if let Some(value) = override_cfg.seed_admin {
                config.seed_admin = Some(value);
            }
        }
        Ok(config)
    }
}
