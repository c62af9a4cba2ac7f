//! Bucket window construction
//!
//! A window is "today and the N-1 preceding days" under one calendar
//! policy, computed once per traversal and then carried in the cursor.

use super::types::{BucketCursor, DayBucketSet, DAY_KEY_FORMAT};
use crate::error::{Error, Result};
use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Largest accepted fixed offset, in minutes
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// Which calendar decides where one day bucket ends and the next begins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalendarPolicy {
    /// Days roll over at UTC midnight
    #[default]
    Utc,
    /// Days roll over at midnight of a fixed UTC offset
    FixedOffset {
        /// Offset east of UTC in minutes
        offset_minutes: i32,
    },
}

impl CalendarPolicy {
    /// Create a fixed offset policy
    pub fn fixed_offset(offset_minutes: i32) -> Self {
        Self::FixedOffset { offset_minutes }
    }

    /// Check the offset is a plausible timezone
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Utc => Ok(()),
            Self::FixedOffset { offset_minutes } => {
                if offset_minutes.abs() > MAX_OFFSET_MINUTES {
                    Err(Error::invalid_value(
                        "calendar.offset_minutes",
                        format!("{offset_minutes} is outside ±{MAX_OFFSET_MINUTES}"),
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Calendar date of an instant under this policy
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Utc => instant.date_naive(),
            Self::FixedOffset { offset_minutes } => {
                (instant.naive_utc() + Duration::minutes(i64::from(*offset_minutes))).date()
            }
        }
    }

    /// First instant of a calendar date under this policy
    pub fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        match self {
            Self::Utc => midnight.and_utc(),
            Self::FixedOffset { offset_minutes } => {
                (midnight - Duration::minutes(i64::from(*offset_minutes))).and_utc()
            }
        }
    }

    /// Bucket identifier an instant belongs to
    pub fn day_key(&self, instant: DateTime<Utc>) -> String {
        self.local_date(instant).format(DAY_KEY_FORMAT).to_string()
    }
}

/// Build a fresh cursor over `window_days` buckets ending at `now`
///
/// Index 0 is the most recent day. Pure given `now`.
pub fn build_initial_window(
    now: DateTime<Utc>,
    window_days: usize,
    calendar: CalendarPolicy,
) -> BucketCursor {
    let today = calendar.local_date(now);
    let days = (0..window_days as u64)
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| date.format(DAY_KEY_FORMAT).to_string())
        .collect();

    BucketCursor::start(DayBucketSet::new(days))
}
