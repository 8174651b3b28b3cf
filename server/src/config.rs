//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;
use uuid::Uuid;

/// Upper bound for any TTL setting (30 days).
pub const MAX_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// Rows per page in the review queue (default: 10)
    pub queue_page_size: usize,

    /// Idle lifetime of an application draft in seconds (default: 3600 = 1 hour)
    pub draft_ttl_secs: i64,

    /// Lifetime of a pending confirmation in seconds (default: 300 = 5 min)
    pub confirmation_ttl_secs: i64,

    /// Maximum declared size of a captured document image in bytes (default: 10MB)
    pub max_image_size: usize,

    /// Load the demo application records at startup (default: true)
    pub seed_fixtures: bool,

    /// Operators allowed to use the admin API (comma-separated UUIDs).
    /// When unset, any well-formed operator id is accepted.
    pub operator_allowlist: Option<Vec<Uuid>>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            queue_page_size: env::var("QUEUE_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(10),
            draft_ttl_secs: parse_ttl_secs("DRAFT_TTL_SECS", env::var("DRAFT_TTL_SECS").ok(), 3600)?,
            confirmation_ttl_secs: parse_ttl_secs(
                "CONFIRMATION_TTL_SECS",
                env::var("CONFIRMATION_TTL_SECS").ok(),
                300,
            )?,
            max_image_size: env::var("MAX_IMAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024), // 10MB
            seed_fixtures: env::var("SEED_FIXTURES")
                .map(|v| !matches!(v.trim(), "0" | "false" | "no"))
                .unwrap_or(true),
            operator_allowlist: env::var("OPERATOR_ALLOWLIST")
                .ok()
                .map(|s| parse_operator_list(&s))
                .transpose()?,
        })
    }

    /// Check whether an operator may use the admin API.
    #[must_use]
    pub fn is_operator_allowed(&self, operator_id: Uuid) -> bool {
        self.operator_allowlist
            .as_ref()
            .is_none_or(|list| list.contains(&operator_id))
    }

    /// Create a default configuration for testing.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            queue_page_size: 5,
            draft_ttl_secs: 3600,
            confirmation_ttl_secs: 300,
            max_image_size: 10 * 1024 * 1024,
            seed_fixtures: true,
            operator_allowlist: None,
        }
    }
}

fn parse_ttl_secs(name: &str, raw: Option<String>, default: i64) -> Result<i64> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let secs: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("Invalid {name}: {raw}"))?;
    if !(1..=MAX_TTL_SECS).contains(&secs) {
        anyhow::bail!("{name} must be between 1 and {MAX_TTL_SECS} seconds, got {secs}");
    }
    Ok(secs)
}

fn parse_operator_list(raw: &str) -> Result<Vec<Uuid>> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| Uuid::parse_str(t).with_context(|| format!("Invalid operator id in OPERATOR_ALLOWLIST: {t}")))
        .collect()
}
