//! Stay windows and reporting date ranges

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;

use super::{DomainError, DomainResult};

/// Half-open stay `[check_in, check_out)`: the check-out day itself is free
/// for the next guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StayWindow {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayWindow {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> DomainResult<Self> {
        if check_in >= check_out {
            return Err(DomainError::InvalidWindow {
                check_in,
                check_out,
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// `[a1,a2)` and `[b1,b2)` overlap iff `a1 < b2 && b1 < a2`.
    pub fn overlaps(&self, other: &StayWindow) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

impl std::fmt::Display for StayWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.check_in, self.check_out)
    }
}

/// Inclusive reporting range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Timestamp bounds `[start 00:00 UTC, end+1 00:00 UTC)`.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = self.start.and_time(chrono::NaiveTime::MIN).and_utc();
        let until = self
            .end
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc();
        (from, until)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let (from, until) = self.bounds();
        from <= at && at < until
    }
}
