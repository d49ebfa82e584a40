use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::pool::AdmissionPool;

/// A day of the year, anchored relative to an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorDate {
    pub day: u32,
    pub month: u32,
    pub year_offset: i32,
}

impl AnchorDate {
    pub const fn new(day: u32, month: u32, year_offset: i32) -> Self {
        Self {
            day,
            month,
            year_offset,
        }
    }

    pub fn resolve(self, academic_year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(academic_year + self.year_offset, self.month, self.day)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEnd {
    /// Closes the day before the window of the following academic year opens.
    DayBeforeNextCutover,
    On(AnchorDate),
}

/// Registration period of one pool for one academic year, bounds included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolWindow {
    pub pool: AdmissionPool,
    pub year: i32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PoolWindow {
    /// Window derived from the pool's cutover and end dates.
    pub fn standard(pool: AdmissionPool, year: i32) -> Option<Self> {
        let start = pool.cutover().resolve(year)?;
        let end = match pool.end() {
            WindowEnd::DayBeforeNextCutover => {
                pool.cutover().resolve(year + 1)? - Duration::days(1)
            }
            WindowEnd::On(anchor) => anchor.resolve(year)?,
        };
        Some(Self {
            pool,
            year,
            start,
            end,
        })
    }

    /// Standard windows of every pool for every academic year of `years`.
    pub fn standard_for_years(years: RangeInclusive<i32>) -> Vec<Self> {
        years
            .flat_map(|year| {
                AdmissionPool::ordered()
                    .into_iter()
                    .filter_map(move |pool| Self::standard(pool, year))
            })
            .collect()
    }

    pub fn is_open(&self, today: NaiveDate) -> bool {
        self.start <= today && today <= self.end
    }
}

/// Specific registration period of bachelors in medicine and dentistry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolmentPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl EnrolmentPeriod {
    pub fn contains(&self, today: NaiveDate) -> bool {
        self.start <= today && today <= self.end
    }
}
