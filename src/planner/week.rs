use chrono::{Datelike, Days, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DAYS_IN_WEEK: usize = 7;

/// The Monday that identifies a displayed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WeekAnchor(NaiveDate);

impl WeekAnchor {
    pub fn containing(date: NaiveDate) -> Self {
        let dow = date.weekday().num_days_from_sunday() as i64;
        let offset = if dow == 0 { -6 } else { 1 - dow };
        let monday = date
            .checked_add_signed(Duration::days(offset))
            .unwrap_or(date);
        Self(monday)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.0
            .checked_add_days(Days::new(DAYS_IN_WEEK as u64 - 1))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn dates(&self) -> [NaiveDate; DAYS_IN_WEEK] {
        std::array::from_fn(|offset| {
            self.0
                .checked_add_days(Days::new(offset as u64))
                .unwrap_or(NaiveDate::MAX)
        })
    }

    /// Moves by whole weeks. Stays put if the result would leave chrono's date range.
    pub fn shift(&self, weeks: i64) -> Self {
        let shifted = weeks
            .checked_mul(DAYS_IN_WEEK as i64)
            .and_then(Duration::try_days)
            .and_then(|delta| self.0.checked_add_signed(delta));
        match shifted {
            Some(date) => Self(date),
            None => *self,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.0 && date <= self.last_day()
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.0, self.last_day())
    }
}

impl fmt::Display for WeekAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.0.format("%b %d"), self.last_day().format("%b %d, %Y"))
    }
}

pub fn week_anchor(date: NaiveDate) -> WeekAnchor {
    WeekAnchor::containing(date)
}

pub fn week_dates(anchor: WeekAnchor) -> [NaiveDate; DAYS_IN_WEEK] {
    anchor.dates()
}

pub fn shift_week(anchor: WeekAnchor, delta_weeks: i64) -> WeekAnchor {
    anchor.shift(delta_weeks)
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const WIRE_FORMAT: &'static str = "%Y-%m-%d";

    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    pub fn start_param(&self) -> String {
        self.start.format(Self::WIRE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(Self::WIRE_FORMAT).to_string()
    }
}
