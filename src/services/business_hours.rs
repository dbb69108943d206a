//! Business-hours validation for requested appointment times.

use chrono::{DateTime, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::BusinessClock;

/// First schedulable business-local hour.
pub const OPEN_HOUR: u32 = 9; // 9 AM
/// Last schedulable business-local hour. An instant whose local hour equals
/// this value still passes (7 PM wall-clock, any minute); hour 20 fails.
pub const CLOSE_HOUR: u32 = 19; // 7 PM

/// Decides whether a given instant is schedulable.
///
/// Rules are evaluated in order, first failure wins: the instant must not be
/// in the past, and its business-local hour must fall inside the
/// [`OPEN_HOUR`]..=[`CLOSE_HOUR`] window. The window is evaluated in
/// business-local time so it shifts correctly across daylight-saving
/// boundaries; the conversion is recomputed from the authoritative instant
/// on every call and never cached.
#[derive(Debug, Clone, Copy)]
pub struct BusinessHoursValidator {
    clock: BusinessClock,
}

impl BusinessHoursValidator {
    pub fn new(clock: BusinessClock) -> Self {
        Self { clock }
    }

    /// Validate a requested instant against `now`.
    pub fn validate(&self, instant: DateTime<Utc>, now: DateTime<Utc>) -> EngineResult<()> {
        if instant < now {
            return Err(EngineError::PastDate);
        }

        let (hour, _minute) = self.clock.business_hour_minute(instant);
        if hour < OPEN_HOUR || hour > CLOSE_HOUR {
            return Err(EngineError::OutsideBusinessHours {
                local_time: self.clock.format_clock_time(instant),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn validator() -> BusinessHoursValidator {
        BusinessHoursValidator::new(BusinessClock::new("America/Los_Angeles").unwrap())
    }

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_past_instant_rejected() {
        let now = utc(2025, 4, 10, 12, 0);
        let earlier = utc(2025, 4, 10, 11, 59);
        let err = validator().validate(earlier, now).unwrap_err();
        assert!(matches!(err, EngineError::PastDate));
    }

    #[test]
    fn test_morning_inside_window_accepted() {
        // 2025-04-10 16:00 UTC = 09:00 PDT.
        let now = utc(2025, 4, 1, 0, 0);
        assert!(validator().validate(utc(2025, 4, 10, 16, 0), now).is_ok());
    }

    #[test]
    fn test_last_hour_accepted_inclusive() {
        // 2025-04-11 02:45 UTC = 19:45 PDT; hour 19 still passes.
        let now = utc(2025, 4, 1, 0, 0);
        assert!(validator().validate(utc(2025, 4, 11, 2, 45), now).is_ok());
    }

    #[test]
    fn test_eight_pm_rejected_with_local_rendering() {
        // 2025-04-11 03:00 UTC = 20:00 PDT.
        let now = utc(2025, 4, 1, 0, 0);
        let err = validator().validate(utc(2025, 4, 11, 3, 0), now).unwrap_err();
        match err {
            EngineError::OutsideBusinessHours { local_time } => {
                assert_eq!(local_time, "8:00 PM");
            }
            other => panic!("expected OutsideBusinessHours, got {:?}", other),
        }
    }

    #[test]
    fn test_before_opening_rejected() {
        // 2025-04-10 15:59 UTC = 08:59 PDT.
        let now = utc(2025, 4, 1, 0, 0);
        let err = validator().validate(utc(2025, 4, 10, 15, 59), now).unwrap_err();
        assert!(matches!(err, EngineError::OutsideBusinessHours { .. }));
    }

    #[test]
    fn test_past_check_runs_before_hours_check() {
        // Past AND outside hours: the past-date rule wins.
        let now = utc(2025, 4, 12, 0, 0);
        let err = validator().validate(utc(2025, 4, 11, 3, 0), now).unwrap_err();
        assert!(matches!(err, EngineError::PastDate));
    }

    #[test]
    fn test_window_follows_daylight_saving() {
        let now = utc(2025, 1, 1, 0, 0);
        // 17:00 UTC is 09:00 PST in January but 10:00 PDT in July;
        // 16:00 UTC is 08:00 PST in January and fails, 09:00 PDT in July.
        assert!(validator().validate(utc(2025, 1, 15, 17, 0), now).is_ok());
        assert!(validator().validate(utc(2025, 1, 15, 16, 0), now).is_err());
        assert!(validator().validate(utc(2025, 7, 15, 16, 0), now).is_ok());
    }

    proptest! {
        #[test]
        fn prop_past_iff_before_now(secs in 0i64..4_102_444_800) {
            let v = validator();
            let now = utc(2030, 1, 1, 12, 0);
            let t = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
            let is_past_err = matches!(v.validate(t, now), Err(EngineError::PastDate));
            prop_assert_eq!(is_past_err, t < now);
        }

        #[test]
        fn prop_future_accepted_iff_hour_in_window(secs in 0i64..4_102_444_800) {
            let v = validator();
            let clock = BusinessClock::new("America/Los_Angeles").unwrap();
            let now = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
            let t = DateTime::<Utc>::from_timestamp(secs, 0).unwrap();
            let (hour, _) = clock.business_hour_minute(t);
            let in_window = (OPEN_HOUR..=CLOSE_HOUR).contains(&hour);
            prop_assert_eq!(v.validate(t, now).is_ok(), in_window);
        }
    }
}
