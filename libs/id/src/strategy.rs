//! The closed set of ID composition strategies.
//!
//! | Strategy    | Layout                                              |
//! |-------------|-----------------------------------------------------|
//! | `random`    | `prefix + ts(14) + random(4)`                       |
//! | `counter`   | `prefix + ts(14) + counter` (1-3 digits, unpadded)  |
//! | `tenant`    | `prefix + ts(14) + tenant(5) + nanos(4) + random(4)`|
//! | `sonyflake` | `prefix + sonyflake id`                             |
//! | `snowflake` | `prefix + snowflake id`                             |
//!
//! Collision behaviour differs per strategy:
//!
//! - `random`: birthday bound over 10^4 values per prefix and second; a
//!   few hundred IDs per second already make a repeat likely.
//! - `counter`: distinct per service instance while fewer than the wrap
//!   limit (1000) IDs are minted within one second. Separate processes
//!   share nothing and can collide.
//! - `tenant`: the nanosecond fragment cycles every millisecond; two IDs
//!   collide only when fragment and random draw both match.
//! - `sonyflake` / `snowflake`: unique as long as each process uses a
//!   distinct machine or worker id.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::IdError;

/// An ID composition strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Timestamp plus a fixed-width random suffix.
    Random,
    /// Timestamp plus the service's wraparound counter.
    Counter,
    /// Timestamp, tenant field, nanosecond fragment and random suffix.
    Tenant,
    /// Prefix plus a sonyflake ID.
    Sonyflake,
    /// Prefix plus a snowflake ID bound to a worker id.
    Snowflake,
}

impl Strategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Strategy; 5] = [
        Strategy::Random,
        Strategy::Counter,
        Strategy::Tenant,
        Strategy::Sonyflake,
        Strategy::Snowflake,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::Counter => "counter",
            Strategy::Tenant => "tenant",
            Strategy::Sonyflake => "sonyflake",
            Strategy::Snowflake => "snowflake",
        }
    }

    /// Returns true if the strategy can fail because it relies on an
    /// external generator.
    #[must_use]
    pub const fn is_fallible(&self) -> bool {
        matches!(self, Strategy::Sonyflake | Strategy::Snowflake)
    }

    /// Returns true if the strategy embeds a timestamp.
    #[must_use]
    pub const fn is_time_based(&self) -> bool {
        matches!(self, Strategy::Random | Strategy::Counter | Strategy::Tenant)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| IdError::UnknownStrategy(s.to_string()))
    }
}

/// Inputs for a single [`generate`](crate::IdService::generate) call.
///
/// Fields a strategy does not use are ignored: `tenant_id` only matters to
/// [`Strategy::Tenant`], `at` only to the time-based strategies.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateContext<'a> {
    /// Prepended to every ID. May be empty.
    pub prefix: &'a str,
    /// Tenant identifier. `None` encodes as an all-zero field.
    pub tenant_id: Option<&'a str>,
    /// Instant to stamp into the ID. `None` reads the service clock.
    pub at: Option<DateTime<Utc>>,
}

impl<'a> GenerateContext<'a> {
    #[must_use]
    pub fn with_prefix(prefix: &'a str) -> Self {
        Self {
            prefix,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tenant(mut self, tenant_id: &'a str) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    #[must_use]
    pub fn at(mut self, at: DateTime<Utc>) -> Self {
        self.at = Some(at);
        self
    }
}
