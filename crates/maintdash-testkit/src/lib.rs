// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use maintdash_app::{
    AssigneeDailyStatus, AssigneeStatusRow, DailyBreakdown, DailyStatusCount,
    DailyWorkReportCount, DateRange, EquipmentComplaintCount, EquipmentWorkReport,
    MonthlyBreakdown, MonthlyStatusCount, MonthlyWorkReportCount, StatusCount, WorkReportCounts,
    format_date,
};
use time::{Date, Month};

const EQUIPMENT_KINDS: [(&str, &str); 14] = [
    ("PMP", "Feed pump"),
    ("CMP", "Air compressor"),
    ("CNV", "Belt conveyor"),
    ("MIX", "Batch mixer"),
    ("BLR", "Steam boiler"),
    ("CHL", "Water chiller"),
    ("FLR", "Filler head"),
    ("CAP", "Capper"),
    ("LBL", "Labeler"),
    ("PAL", "Palletizer"),
    ("WRP", "Stretch wrapper"),
    ("GEN", "Standby generator"),
    ("HVC", "Air handler"),
    ("FRK", "Forklift"),
];

const LINES: [&str; 4] = ["Line A", "Line B", "Line C", "Utility"];

const ENGINEERS: [&str; 10] = [
    "Gema Nur", "Rizky Pratama", "Dewi Lestari", "Agus Santoso", "Sari Wulandari", "Bayu Saputra",
    "Putri Maharani", "Hendra Wijaya", "Indah Permata", "Joko Susilo",
];

const REFERENCE_YEAR: i32 = 2026;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn range_u64(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        min + self.next_u64() % (max - min + 1)
    }
}

/// Seeded generator for dashboard payloads. Same seed, same data.
#[derive(Debug, Clone)]
pub struct PlantFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl PlantFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    /// `count` distinct equipment `(code, name)` pairs.
    pub fn equipment(&mut self, count: usize) -> Vec<(String, String)> {
        (0..count)
            .map(|index| {
                let (prefix, kind) = EQUIPMENT_KINDS[index % EQUIPMENT_KINDS.len()];
                let unit = index / EQUIPMENT_KINDS.len() + 1;
                let line = LINES[self.rng.int_n(LINES.len())];
                (
                    format!("{prefix}-{unit:02}"),
                    format!("{kind} #{unit} ({line})"),
                )
            })
            .collect()
    }

    /// Sorted by complaint count descending, the order the server sends.
    pub fn equipment_complaint_counts(&mut self, count: usize) -> Vec<EquipmentComplaintCount> {
        let mut rows = self
            .equipment(count)
            .into_iter()
            .map(|(code, name)| EquipmentComplaintCount {
                equipment_code: code,
                equipment_name: name,
                total_complaints: self.rng.range_u64(1, 40),
            })
            .collect::<Vec<_>>();
        rows.sort_by(|left, right| right.total_complaints.cmp(&left.total_complaints));
        rows
    }

    /// Unsorted; clients rank these themselves.
    pub fn equipment_work_reports(&mut self, count: usize) -> Vec<EquipmentWorkReport> {
        self.equipment(count)
            .into_iter()
            .map(|(code, name)| {
                let reports = self.rng.range_u64(1, 25);
                EquipmentWorkReport {
                    equipment_code: code,
                    equipment_name: name,
                    total_work_reports: reports,
                    total_resolution_time: reports * self.rng.range_u64(15, 180),
                }
            })
            .collect()
    }

    pub fn status_count(&mut self) -> StatusCount {
        let open = self.rng.range_u64(0, 30);
        let closed = self.rng.range_u64(0, 60);
        let pending = self.rng.range_u64(0, 15);
        StatusCount {
            total_all_complaints: open + closed + pending,
            total_open: open,
            total_closed: closed,
            total_pending: pending,
        }
    }

    pub fn daily_status_counts(&mut self, range: &DateRange) -> Vec<DailyStatusCount> {
        days_in(range)
            .into_iter()
            .map(|day| DailyStatusCount {
                date: format_date(day),
                open: self.rng.range_u64(0, 8),
                closed: self.rng.range_u64(0, 12),
                pending: self.rng.range_u64(0, 4),
            })
            .collect()
    }

    pub fn monthly_status_counts(&mut self, year: i32) -> Vec<MonthlyStatusCount> {
        (1..=12)
            .map(|month| MonthlyStatusCount {
                date: format!("{year:04}-{month:02}"),
                open: self.rng.range_u64(0, 60),
                closed: self.rng.range_u64(0, 120),
                pending: self.rng.range_u64(0, 30),
            })
            .collect()
    }

    pub fn assignee_daily_status(
        &mut self,
        range: &DateRange,
        assignees: usize,
    ) -> AssigneeDailyStatus {
        let days = days_in(range);
        let data = ENGINEERS
            .iter()
            .take(assignees)
            .map(|name| AssigneeStatusRow {
                assignee: (*name).to_owned(),
                open: days.iter().map(|_| self.rng.range_u64(0, 3)).collect(),
                pending: days.iter().map(|_| self.rng.range_u64(0, 2)).collect(),
                closed: days.iter().map(|_| self.rng.range_u64(0, 4)).collect(),
            })
            .collect();
        AssigneeDailyStatus {
            dates: days.into_iter().map(format_date).collect(),
            data,
        }
    }

    pub fn daily_work_reports(&mut self, range: &DateRange) -> Vec<DailyWorkReportCount> {
        days_in(range)
            .into_iter()
            .map(|day| DailyWorkReportCount {
                date: format_date(day),
                counts: self.work_report_counts(6),
            })
            .collect()
    }

    pub fn monthly_work_reports(&mut self, year: i32) -> Vec<MonthlyWorkReportCount> {
        (1..=12)
            .map(|month| MonthlyWorkReportCount {
                year,
                month,
                counts: self.work_report_counts(40),
            })
            .collect()
    }

    pub fn daily_breakdowns(&mut self, range: &DateRange) -> Vec<DailyBreakdown> {
        days_in(range)
            .into_iter()
            .map(|day| {
                let count = self.rng.range_u64(0, 3);
                DailyBreakdown {
                    date: format_date(day),
                    total_resolution_time_minutes: count * self.rng.range_u64(20, 150),
                    breakdown_count: count,
                }
            })
            .collect()
    }

    pub fn monthly_breakdowns(&mut self) -> Vec<MonthlyBreakdown> {
        (1..=12)
            .map(|month| {
                let count = self.rng.range_u64(0, 20);
                MonthlyBreakdown {
                    month,
                    total_resolution_time_minutes: count * self.rng.range_u64(20, 150),
                    breakdown_count: count,
                }
            })
            .collect()
    }

    fn work_report_counts(&mut self, max: u64) -> WorkReportCounts {
        WorkReportCounts {
            corrective_maintenance_count: self.rng.range_u64(0, max),
            preventive_maintenance_count: self.rng.range_u64(0, max),
            breakdown_count: self.rng.range_u64(0, max / 2),
            other_count: self.rng.range_u64(0, max / 3),
        }
    }
}

/// Sequential equipment rows with descending complaint totals, for paging tests.
pub fn ranked_complaints(count: usize) -> Vec<EquipmentComplaintCount> {
    (0..count)
        .map(|index| EquipmentComplaintCount {
            equipment_code: format!("EQ-{:03}", index + 1),
            equipment_name: format!("Equipment {}", index + 1),
            total_complaints: (count - index) as u64,
        })
        .collect()
}

/// Fixed "today" so date-driven fixtures are reproducible.
pub fn fixture_today() -> Date {
    Date::from_calendar_date(REFERENCE_YEAR, Month::March, 17).unwrap_or(Date::MIN)
}

pub fn engineer_names() -> &'static [&'static str] {
    &ENGINEERS
}

fn days_in(range: &DateRange) -> Vec<Date> {
    let mut days = Vec::new();
    let mut day = range.from;
    while day <= range.to {
        days.push(day);
        match day.next_day() {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}
