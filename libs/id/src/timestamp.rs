//! Second-granularity timestamp rendering.

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

/// Width of a rendered timestamp.
pub const TIMESTAMP_WIDTH: usize = 14;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Renders instants as `YYYYMMDDhhmmss`.
///
/// Uses the host's local zone unless built with a fixed UTC offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeFormatter {
    offset: Option<FixedOffset>,
}

impl TimeFormatter {
    /// Formats in the host's local time zone.
    #[must_use]
    pub const fn local() -> Self {
        Self { offset: None }
    }

    /// Formats at a fixed offset from UTC.
    #[must_use]
    pub const fn fixed(offset: FixedOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }

    /// Formats in UTC.
    #[must_use]
    pub fn utc() -> Self {
        Self::fixed(Utc.fix())
    }

    /// The configured offset, or `None` for the local zone.
    #[must_use]
    pub const fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    /// Renders `at` as exactly 14 decimal digits.
    #[must_use]
    pub fn format(&self, at: &DateTime<Utc>) -> String {
        match self.offset {
            Some(offset) => at.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string(),
            None => at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}
