use anyhow::{Context, Result};
use examroom_core::ConflictPolicy;
use std::net::SocketAddr;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Runtime settings, read from the environment (and `.env` when present)
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub addr: SocketAddr,
    /// Policy used when a conflict check request does not name one
    pub conflict_policy: ConflictPolicy,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let addr = std::env::var("EXAMROOM_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .with_context(|| format!("EXAMROOM_ADDR '{}' is not a socket address", addr))?;

        let conflict_policy = match std::env::var("EXAMROOM_CONFLICT_POLICY") {
            Ok(value) => value
                .parse()
                .context("EXAMROOM_CONFLICT_POLICY must be 'enforce' or 'advisory'")?,
            Err(_) => ConflictPolicy::default(),
        };

        Ok(Self {
            addr,
            conflict_policy,
        })
    }
}
