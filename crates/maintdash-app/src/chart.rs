// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    DailyBreakdown, DailyStatusCount, DailyWorkReportCount, MonthlyBreakdown, MonthlyStatusCount,
    MonthlyWorkReportCount, WorkReportCategory, WorkReportCounts,
};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisScale {
    pub step: u64,
    pub max: u64,
}

/// Axis for stacked complaint bars, sized from the tallest stack.
pub fn stacked_axis(total_max: u64) -> AxisScale {
    let step = match total_max {
        0..=20 => 5,
        21..=50 => 10,
        51..=100 => 20,
        101..=200 => 25,
        201..=500 => 50,
        _ => total_max.div_ceil(100) * 10,
    };
    AxisScale {
        step,
        max: total_max.div_ceil(step) * step,
    }
}

/// Tick step for the resolution-time line: a tenth of the peak, at least 1.
pub fn resolution_step(values: &[u64]) -> u64 {
    let peak = values.iter().copied().max().unwrap_or(0);
    ((peak as f64 / 10.0).round() as u64).max(1)
}

/// Open/closed/pending bars, one slot per label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackedSeries {
    pub labels: Vec<String>,
    pub open: Vec<u64>,
    pub closed: Vec<u64>,
    pub pending: Vec<u64>,
}

impl StackedSeries {
    pub fn from_daily(rows: &[DailyStatusCount]) -> Self {
        Self {
            labels: rows.iter().map(|row| row.date.clone()).collect(),
            open: rows.iter().map(|row| row.open).collect(),
            closed: rows.iter().map(|row| row.closed).collect(),
            pending: rows.iter().map(|row| row.pending).collect(),
        }
    }

    /// Twelve month slots; rows with an unparseable month are dropped.
    pub fn from_monthly(rows: &[MonthlyStatusCount]) -> Self {
        let mut series = Self {
            labels: month_labels(),
            open: vec![0; 12],
            closed: vec![0; 12],
            pending: vec![0; 12],
        };
        for row in rows {
            let Some(slot) = row.month().and_then(month_slot) else {
                continue;
            };
            series.open[slot] = row.open;
            series.closed[slot] = row.closed;
            series.pending[slot] = row.pending;
        }
        series
    }

    pub fn totals(&self) -> Vec<u64> {
        (0..self.labels.len())
            .map(|index| {
                self.open.get(index).copied().unwrap_or(0)
                    + self.closed.get(index).copied().unwrap_or(0)
                    + self.pending.get(index).copied().unwrap_or(0)
            })
            .collect()
    }

    pub fn axis(&self) -> AxisScale {
        stacked_axis(self.totals().into_iter().max().unwrap_or(0))
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkReportSeries {
    pub labels: Vec<String>,
    pub points: Vec<WorkReportCounts>,
}

impl WorkReportSeries {
    pub fn from_daily(rows: &[DailyWorkReportCount]) -> Self {
        Self {
            labels: rows.iter().map(|row| row.date.clone()).collect(),
            points: rows.iter().map(|row| row.counts).collect(),
        }
    }

    pub fn from_monthly(rows: &[MonthlyWorkReportCount]) -> Self {
        let mut points = vec![WorkReportCounts::default(); 12];
        for row in rows {
            if let Some(slot) = month_slot(row.month) {
                points[slot] = row.counts;
            }
        }
        Self {
            labels: month_labels(),
            points,
        }
    }

    pub fn values(&self, category: WorkReportCategory) -> Vec<u64> {
        self.points.iter().map(|point| point.get(category)).collect()
    }

    pub fn peak(&self) -> u64 {
        WorkReportCategory::ALL
            .iter()
            .flat_map(|category| self.values(*category))
            .max()
            .unwrap_or(0)
    }
}

/// Resolution minutes with the breakdown count carried alongside each point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BreakdownSeries {
    pub labels: Vec<String>,
    pub minutes: Vec<u64>,
    pub counts: Vec<u64>,
}

impl BreakdownSeries {
    pub fn from_daily(rows: &[DailyBreakdown]) -> Self {
        Self {
            labels: rows.iter().map(|row| row.date.clone()).collect(),
            minutes: rows
                .iter()
                .map(|row| row.total_resolution_time_minutes)
                .collect(),
            counts: rows.iter().map(|row| row.breakdown_count).collect(),
        }
    }

    pub fn from_monthly(rows: &[MonthlyBreakdown]) -> Self {
        let mut minutes = vec![0; 12];
        let mut counts = vec![0; 12];
        for row in rows {
            if let Some(slot) = month_slot(row.month) {
                minutes[slot] = row.total_resolution_time_minutes;
                counts[slot] = row.breakdown_count;
            }
        }
        Self {
            labels: month_labels(),
            minutes,
            counts,
        }
    }

    pub fn step(&self) -> u64 {
        resolution_step(&self.minutes)
    }

    pub fn total_minutes(&self) -> u64 {
        self.minutes.iter().sum()
    }

    pub fn total_breakdowns(&self) -> u64 {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintPeriod {
    Daily(Vec<DailyStatusCount>),
    Monthly(Vec<MonthlyStatusCount>),
}

impl ComplaintPeriod {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Daily(rows) => rows.is_empty(),
            Self::Monthly(rows) => rows.is_empty(),
        }
    }

    pub fn to_series(&self) -> StackedSeries {
        match self {
            Self::Daily(rows) => StackedSeries::from_daily(rows),
            Self::Monthly(rows) => StackedSeries::from_monthly(rows),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkReportPeriod {
    Daily(Vec<DailyWorkReportCount>),
    Monthly(Vec<MonthlyWorkReportCount>),
}

impl WorkReportPeriod {
    pub fn to_series(&self) -> WorkReportSeries {
        match self {
            Self::Daily(rows) => WorkReportSeries::from_daily(rows),
            Self::Monthly(rows) => WorkReportSeries::from_monthly(rows),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakdownPeriod {
    Daily(Vec<DailyBreakdown>),
    Monthly(Vec<MonthlyBreakdown>),
}

impl BreakdownPeriod {
    pub fn to_series(&self) -> BreakdownSeries {
        match self {
            Self::Daily(rows) => BreakdownSeries::from_daily(rows),
            Self::Monthly(rows) => BreakdownSeries::from_monthly(rows),
        }
    }
}

fn month_labels() -> Vec<String> {
    MONTH_LABELS.iter().map(|label| (*label).to_owned()).collect()
}

fn month_slot(month: u8) -> Option<usize> {
    (1..=12).contains(&month).then(|| usize::from(month) - 1)
}
