//! Size and date bounds, parsed from the `min:max` form.

use std::str::FromStr;
use std::time::{Duration, SystemTime};

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::SiftError;

/// Inclusive byte-size bounds. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeRange {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl SizeRange {
    pub fn contains(&self, size: u64) -> bool {
        self.min.map_or(true, |min| size >= min) && self.max.map_or(true, |max| size <= max)
    }
}

impl FromStr for SizeRange {
    type Err = SiftError;

    /// `"100:2000"`, `"100:"`, `":2000"` or `"100"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lo, hi) = s.split_once(':').unwrap_or((s, ""));
        let parse = |v: &str| -> Result<Option<u64>, SiftError> {
            let v = v.trim();
            if v.is_empty() {
                return Ok(None);
            }
            v.parse::<u64>()
                .map(Some)
                .map_err(|e| SiftError::InvalidRange(format!("{s}: {e}")))
        };
        Ok(Self { min: parse(lo)?, max: parse(hi)? })
    }
}

/// Which timestamp a date bound applies to. Only one is active per query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateField {
    #[default]
    Modified,
    Created,
    Accessed,
}

/// Inclusive date bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub min: Option<SystemTime>,
    pub max: Option<SystemTime>,
}

impl DateRange {
    pub fn is_open(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// An unknown timestamp never satisfies a lower bound but never violates
    /// an upper one, as if it were the zero time.
    pub fn contains(&self, time: Option<SystemTime>) -> bool {
        if let Some(min) = self.min {
            match time {
                Some(t) if t >= min => {}
                _ => return false,
            }
        }
        if let (Some(max), Some(t)) = (self.max, time) {
            if t > max {
                return false;
            }
        }
        true
    }
}

impl FromStr for DateRange {
    type Err = SiftError;

    /// `"2024-01-01:2024-06-30"`, either side optional. The upper date is
    /// inclusive through the end of that day (UTC).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lo, hi) = s.split_once(':').unwrap_or((s, ""));
        let min = match lo.trim() {
            "" => None,
            v => Some(day_bound(v, 0, 0, 0)?),
        };
        let max = match hi.trim() {
            "" => None,
            v => Some(day_bound(v, 23, 59, 59)?),
        };
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(SiftError::InvalidRange(format!("{s}: lower date is after upper date")));
            }
        }
        Ok(Self { min, max })
    }
}

fn day_bound(v: &str, hour: u32, minute: u32, second: u32) -> Result<SystemTime, SiftError> {
    NaiveDate::parse_from_str(v, "%Y-%m-%d")
        .map_err(|e| SiftError::InvalidRange(format!("{v}: {e}")))?
        .and_hms_opt(hour, minute, second)
        .map(utc_time)
        .ok_or_else(|| SiftError::InvalidRange(format!("{v}: expected YYYY-MM-DD")))
}

/// A calendar timestamp read as UTC.
pub(crate) fn utc_time(naive: NaiveDateTime) -> SystemTime {
    SystemTime::from(naive.and_utc())
}

/// `None` for instants before the epoch.
pub(crate) fn to_system_time(secs: i64) -> Option<SystemTime> {
    u64::try_from(secs)
        .ok()
        .and_then(|s| SystemTime::UNIX_EPOCH.checked_add(Duration::from_secs(s)))
}
