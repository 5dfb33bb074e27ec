// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow, bail};
use std::ops::RangeInclusive;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

/// Inclusive calendar range in the dashboard's local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: Date,
    pub to: Date,
}

impl DateRange {
    pub fn new(from: Date, to: Date) -> Result<Self> {
        if from > to {
            bail!("invalid date range: {from} is after {to}");
        }
        Ok(Self { from, to })
    }

    pub const fn single_day(day: Date) -> Self {
        Self { from: day, to: day }
    }

    /// `from` at 00:00, as the backend expects it.
    pub fn api_from(&self) -> String {
        format!("{}T00:00", format_date(self.from))
    }

    /// `to` at 23:59, as the backend expects it.
    pub fn api_to(&self) -> String {
        format!("{}T23:59", format_date(self.to))
    }

    pub fn shift_days(&self, days: i64) -> Option<Self> {
        Some(Self {
            from: self.from.checked_add(Duration::days(days))?,
            to: self.to.checked_add(Duration::days(days))?,
        })
    }

    pub fn label(&self) -> String {
        if self.from == self.to {
            format_date(self.from)
        } else {
            format!("{} .. {}", format_date(self.from), format_date(self.to))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangePreset {
    Today,
    Weekly,
    Monthly,
}

impl RangePreset {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Weekly => "last 7 days",
            Self::Monthly => "this month",
        }
    }

    pub fn resolve(self, today: Date) -> DateRange {
        match self {
            Self::Today => DateRange::single_day(today),
            Self::Weekly => DateRange {
                from: today.saturating_sub(Duration::days(6)),
                to: today,
            },
            Self::Monthly => DateRange {
                from: today.replace_day(1).unwrap_or(today),
                to: today,
            },
        }
    }
}

/// Chart query: a daily series over a range, or twelve monthly buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPeriod {
    Daily(DateRange),
    Yearly(i32),
}

impl ChartPeriod {
    pub fn label(&self) -> String {
        match self {
            Self::Daily(range) => range.label(),
            Self::Yearly(year) => year.to_string(),
        }
    }
}

/// Years offered by the year selector.
pub fn year_options(current_year: i32) -> RangeInclusive<i32> {
    (current_year - 10)..=(current_year + 1)
}

/// Moves `year` by `delta`, staying inside [`year_options`].
pub fn step_year(year: i32, delta: i32, current_year: i32) -> i32 {
    let options = year_options(current_year);
    (year + delta).clamp(*options.start(), *options.end())
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

pub fn parse_date(raw: &str) -> Result<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|error| anyhow!("invalid date {raw:?}: {error}; use YYYY-MM-DD"))
}

/// `Aug 10` style header label; unparseable input is returned unchanged.
pub fn format_short_date(raw: &str) -> String {
    match parse_date(raw) {
        Ok(date) => date
            .format(format_description!(
                "[month repr:short] [day padding:none]"
            ))
            .unwrap_or_else(|_| raw.to_owned()),
        Err(_) => raw.to_owned(),
    }
}

pub fn local_today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}
