//! Business-local time conversion.
//!
//! All scheduling decisions are made against wall-clock time in the
//! configured business timezone. The zone is resolved by IANA name once at
//! construction; conversions are recomputed from the authoritative UTC
//! instant on every call so daylight-saving transitions are handled
//! per-instant rather than through a fixed offset.

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;

use crate::error::EngineError;

/// Converter from absolute UTC instants to business-local time.
///
/// Pure and stateless apart from the resolved timezone. Construction fails
/// with [`EngineError::Configuration`] when the timezone name does not
/// resolve; that is a deployment defect and should abort startup.
#[derive(Debug, Clone, Copy)]
pub struct BusinessClock {
    tz: Tz,
}

impl BusinessClock {
    /// Resolve a named IANA timezone (e.g. `America/Los_Angeles`).
    pub fn new(tz_name: &str) -> Result<Self, EngineError> {
        let tz = tz_name.parse::<Tz>().map_err(|_| {
            EngineError::Configuration(format!("unknown business timezone '{}'", tz_name))
        })?;
        Ok(Self { tz })
    }

    /// The resolved business timezone.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Convert a UTC instant to business-local time.
    pub fn to_business_local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }

    /// Business-local wall-clock hour and minute of a UTC instant.
    pub fn business_hour_minute(&self, instant: DateTime<Utc>) -> (u32, u32) {
        let local = self.to_business_local(instant);
        (local.hour(), local.minute())
    }

    /// Business-local calendar day of a UTC instant.
    ///
    /// Two appointments for the same subject conflict exactly when their
    /// instants map to the same business-local day.
    pub fn business_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.to_business_local(instant).date_naive()
    }

    /// 12-hour clock rendering of the business-local time, e.g. "8:00 PM".
    pub fn format_clock_time(&self, instant: DateTime<Utc>) -> String {
        self.to_business_local(instant)
            .format("%-I:%M %p")
            .to_string()
    }
}
