//! Configuration for [`IdService`](crate::IdService).

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::code::DEFAULT_CODE_LENGTH;
use crate::counter::DEFAULT_WRAP_LIMIT;
use crate::external::MAX_WORKER_ID;
use crate::random::MAX_RANDOM_WIDTH;
use crate::tenant::{DEFAULT_TENANT_WIDTH, MAX_TENANT_WIDTH};
use crate::timestamp::TimeFormatter;
use crate::IdError;

/// Service configuration. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdConfig {
    /// Counter wrap limit.
    #[serde(default = "default_counter_wrap")]
    pub counter_wrap: u32,

    /// Digits in the random strategy's suffix.
    #[serde(default = "default_random_width")]
    pub random_width: u32,

    /// Width of the tenant field.
    #[serde(default = "default_tenant_width")]
    pub tenant_width: usize,

    /// Fixed UTC offset for timestamps, in seconds. `None` uses the local zone.
    #[serde(default)]
    pub utc_offset_secs: Option<i32>,

    /// Sonyflake generator. `None` disables the sonyflake strategy.
    #[serde(default)]
    pub sonyflake: Option<SonyflakeConfig>,

    /// Snowflake generator. `None` disables the snowflake strategy.
    #[serde(default)]
    pub snowflake: Option<SnowflakeConfig>,

    /// Salt for resource codes.
    #[serde(default)]
    pub resource_salt: u64,

    /// Length of resource codes.
    #[serde(default = "default_resource_code_length")]
    pub resource_code_length: u32,
}

/// Sonyflake generator settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SonyflakeConfig {
    /// Explicit machine id. `None` derives it from the host's private IPv4.
    #[serde(default)]
    pub machine_id: Option<u16>,
}

/// Snowflake generator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnowflakeConfig {
    /// Worker id, `0..=1023`.
    pub worker_id: i64,
}

fn default_counter_wrap() -> u32 {
    DEFAULT_WRAP_LIMIT
}

fn default_random_width() -> u32 {
    4
}

fn default_tenant_width() -> usize {
    DEFAULT_TENANT_WIDTH
}

fn default_resource_code_length() -> u32 {
    DEFAULT_CODE_LENGTH
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            counter_wrap: default_counter_wrap(),
            random_width: default_random_width(),
            tenant_width: default_tenant_width(),
            utc_offset_secs: None,
            sonyflake: None,
            snowflake: None,
            resource_salt: 0,
            resource_code_length: default_resource_code_length(),
        }
    }
}

impl IdConfig {
    /// Checks every field, returning the first problem found.
    pub fn validate(&self) -> Result<(), IdError> {
        if self.counter_wrap == 0 {
            return Err(IdError::invalid_config("counter_wrap must be positive"));
        }
        if !(1..=MAX_RANDOM_WIDTH).contains(&self.random_width) {
            return Err(IdError::invalid_config(format!(
                "random_width must be between 1 and {MAX_RANDOM_WIDTH}, got {}",
                self.random_width
            )));
        }
        if !(1..=MAX_TENANT_WIDTH).contains(&self.tenant_width) {
            return Err(IdError::invalid_config(format!(
                "tenant_width must be between 1 and {MAX_TENANT_WIDTH}, got {}",
                self.tenant_width
            )));
        }
        self.time_formatter()?;
        if let Some(snowflake) = self.snowflake {
            if !(0..=MAX_WORKER_ID).contains(&snowflake.worker_id) {
                return Err(IdError::NodeIdOutOfRange {
                    worker_id: snowflake.worker_id,
                    max: MAX_WORKER_ID,
                });
            }
        }
        Ok(())
    }

    /// Builds the timestamp formatter for the configured zone.
    pub fn time_formatter(&self) -> Result<TimeFormatter, IdError> {
        match self.utc_offset_secs {
            None => Ok(TimeFormatter::local()),
            Some(secs) => FixedOffset::east_opt(secs)
                .map(TimeFormatter::fixed)
                .ok_or_else(|| {
                    IdError::invalid_config(format!("utc_offset_secs {secs} is out of range"))
                }),
        }
    }
}
