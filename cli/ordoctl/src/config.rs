//! CLI configuration (env-driven).

use std::str::FromStr;

use anyhow::{Context, Result};
use ordo_id::{IdConfig, SnowflakeConfig, SonyflakeConfig};

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Settings passed through to the ID service.
    pub id: IdConfig,

    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON.
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = IdConfig::default();

        let counter_wrap = parse_var(&lookup, "ORDO_COUNTER_WRAP")?
            .unwrap_or(defaults.counter_wrap);
        let random_width = parse_var(&lookup, "ORDO_RANDOM_WIDTH")?
            .unwrap_or(defaults.random_width);
        let tenant_width = parse_var(&lookup, "ORDO_TENANT_WIDTH")?
            .unwrap_or(defaults.tenant_width);
        let utc_offset_secs = parse_var(&lookup, "ORDO_UTC_OFFSET_SECS")?;
        let resource_salt = parse_var(&lookup, "ORDO_RESOURCE_SALT")?
            .unwrap_or(defaults.resource_salt);

        let machine_id: Option<u16> = parse_var(&lookup, "ORDO_SONYFLAKE_MACHINE_ID")?;
        let sonyflake = if machine_id.is_some() || flag(&lookup, "ORDO_SONYFLAKE") {
            Some(SonyflakeConfig { machine_id })
        } else {
            None
        };

        let snowflake = parse_var(&lookup, "ORDO_SNOWFLAKE_WORKER_ID")?
            .map(|worker_id| SnowflakeConfig { worker_id });

        let id = IdConfig {
            counter_wrap,
            random_width,
            tenant_width,
            utc_offset_secs,
            sonyflake,
            snowflake,
            resource_salt,
            ..defaults
        };
        id.validate().context("Invalid ORDO_* configuration.")?;

        let log_level = lookup("ORDO_LOG_LEVEL").unwrap_or_else(|| "warn".to_string());
        let log_json = flag(&lookup, "ORDO_LOG_JSON");

        Ok(Self {
            id,
            log_level,
            log_json,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|v| v.trim().parse::<T>())
        .transpose()
        .with_context(|| format!("{key} must be a valid number."))
}

fn flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> bool {
    lookup(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}
