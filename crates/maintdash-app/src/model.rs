// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Deserializer, Serialize};

/// Reads a JSON `null` the same as a missing key. The backend serializes
/// boxed counters, so any field may come back null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_counts_as_zero<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let counts = Option::<Vec<Option<u64>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(counts.into_iter().map(Option::unwrap_or_default).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Open,
    Pending,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [Self; 3] = [Self::Open, Self::Pending, Self::Closed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Pending => "pending",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusCount {
    #[serde(deserialize_with = "null_as_default")]
    pub total_all_complaints: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_open: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_closed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_pending: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyStatusCount {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub open: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub closed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub pending: u64,
}

/// Monthly complaint totals; `date` is `YYYY-MM`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyStatusCount {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub open: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub closed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub pending: u64,
}

impl MonthlyStatusCount {
    /// Month number (1-12) parsed from the `YYYY-MM` label.
    pub fn month(&self) -> Option<u8> {
        self.date.split('-').nth(1)?.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssigneeStatusRow {
    #[serde(deserialize_with = "null_as_default")]
    pub assignee: String,
    #[serde(deserialize_with = "null_counts_as_zero")]
    pub open: Vec<u64>,
    #[serde(deserialize_with = "null_counts_as_zero")]
    pub pending: Vec<u64>,
    #[serde(deserialize_with = "null_counts_as_zero")]
    pub closed: Vec<u64>,
}

impl AssigneeStatusRow {
    pub fn counts(&self, status: ComplaintStatus) -> &[u64] {
        match status {
            ComplaintStatus::Open => &self.open,
            ComplaintStatus::Pending => &self.pending,
            ComplaintStatus::Closed => &self.closed,
        }
    }
}

/// Per-engineer daily counts. Every row's vectors are parallel to `dates`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssigneeDailyStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub dates: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<AssigneeStatusRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentComplaintCount {
    #[serde(deserialize_with = "null_as_default")]
    pub equipment_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub equipment_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_complaints: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentWorkReport {
    #[serde(deserialize_with = "null_as_default")]
    pub equipment_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub equipment_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_work_reports: u64,
    /// Minutes.
    #[serde(deserialize_with = "null_as_default")]
    pub total_resolution_time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkReportCategory {
    Corrective,
    Preventive,
    Breakdown,
    Other,
}

impl WorkReportCategory {
    pub const ALL: [Self; 4] = [
        Self::Corrective,
        Self::Preventive,
        Self::Breakdown,
        Self::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Corrective => "Corrective Maintenance",
            Self::Preventive => "Preventive Maintenance",
            Self::Breakdown => "Breakdown",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkReportCounts {
    #[serde(deserialize_with = "null_as_default")]
    pub corrective_maintenance_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub preventive_maintenance_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub breakdown_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub other_count: u64,
}

impl WorkReportCounts {
    pub const fn get(&self, category: WorkReportCategory) -> u64 {
        match category {
            WorkReportCategory::Corrective => self.corrective_maintenance_count,
            WorkReportCategory::Preventive => self.preventive_maintenance_count,
            WorkReportCategory::Breakdown => self.breakdown_count,
            WorkReportCategory::Other => self.other_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyWorkReportCount {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(flatten)]
    pub counts: WorkReportCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyWorkReportCount {
    #[serde(deserialize_with = "null_as_default")]
    pub year: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub month: u8,
    #[serde(flatten)]
    pub counts: WorkReportCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyBreakdown {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_resolution_time_minutes: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub breakdown_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyBreakdown {
    #[serde(deserialize_with = "null_as_default")]
    pub month: u8,
    #[serde(deserialize_with = "null_as_default")]
    pub total_resolution_time_minutes: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub breakdown_count: u64,
}

#[cfg(test)]
mod tests {
    use super::{
        AssigneeDailyStatus, ComplaintStatus, DailyWorkReportCount, EquipmentWorkReport,
        MonthlyStatusCount, StatusCount, WorkReportCategory,
    };
    use anyhow::Result;

    #[test]
    fn status_count_defaults_missing_fields_to_zero() -> Result<()> {
        let parsed: StatusCount = serde_json::from_str(r#"{"totalOpen":4}"#)?;
        assert_eq!(
            parsed,
            StatusCount {
                total_all_complaints: 0,
                total_open: 4,
                total_closed: 0,
                total_pending: 0,
            }
        );
        Ok(())
    }

    #[test]
    fn equipment_work_report_reads_camel_case_fields() -> Result<()> {
        let parsed: EquipmentWorkReport = serde_json::from_str(
            r#"{"equipmentCode":"PMP-01","equipmentName":"Feed pump","totalWorkReports":9,"totalResolutionTime":1250}"#,
        )?;
        assert_eq!(parsed.equipment_code, "PMP-01");
        assert_eq!(parsed.total_work_reports, 9);
        assert_eq!(parsed.total_resolution_time, 1250);
        Ok(())
    }

    #[test]
    fn daily_work_report_flattens_counts() -> Result<()> {
        let parsed: DailyWorkReportCount = serde_json::from_str(
            r#"{"date":"2026-03-02","correctiveMaintenanceCount":2,"breakdownCount":1}"#,
        )?;
        assert_eq!(parsed.counts.get(WorkReportCategory::Corrective), 2);
        assert_eq!(parsed.counts.get(WorkReportCategory::Preventive), 0);
        assert_eq!(parsed.counts.get(WorkReportCategory::Breakdown), 1);
        Ok(())
    }

    #[test]
    fn null_counters_decode_as_zero() -> Result<()> {
        let monthly: MonthlyStatusCount = serde_json::from_str(
            r#"{"date":"2026-03","open":null,"closed":4,"pending":null}"#,
        )?;
        assert_eq!(monthly.open, 0);
        assert_eq!(monthly.closed, 4);
        assert_eq!(monthly.month(), Some(3));

        let repair: EquipmentWorkReport = serde_json::from_str(
            r#"{"equipmentCode":"PMP-01","equipmentName":null,"totalWorkReports":3,"totalResolutionTime":null}"#,
        )?;
        assert_eq!(repair.equipment_name, "");
        assert_eq!(repair.total_work_reports, 3);
        assert_eq!(repair.total_resolution_time, 0);
        Ok(())
    }

    #[test]
    fn null_counters_inside_flattened_and_nested_rows_decode_as_zero() -> Result<()> {
        let daily: DailyWorkReportCount = serde_json::from_str(
            r#"{"date":"2026-03-02","correctiveMaintenanceCount":null,"otherCount":5}"#,
        )?;
        assert_eq!(daily.counts.get(WorkReportCategory::Corrective), 0);
        assert_eq!(daily.counts.get(WorkReportCategory::Other), 5);

        let status: AssigneeDailyStatus = serde_json::from_str(
            r#"{"dates":["2025-08-12","2025-08-13"],"data":[{"assignee":"Gema","open":[null,2],"pending":null,"closed":[1,null]}]}"#,
        )?;
        let row = &status.data[0];
        assert_eq!(row.counts(ComplaintStatus::Open), &[0, 2]);
        assert!(row.counts(ComplaintStatus::Pending).is_empty());
        assert_eq!(row.counts(ComplaintStatus::Closed), &[1, 0]);

        let totals: StatusCount = serde_json::from_str(
            r#"{"totalAllComplaints":null,"totalOpen":2,"totalClosed":null,"totalPending":1}"#,
        )?;
        assert_eq!(totals.total_all_complaints, 0);
        assert_eq!(totals.total_open, 2);
        Ok(())
    }

    #[test]
    fn monthly_status_month_parses_label() {
        let row = MonthlyStatusCount {
            date: "2026-07".to_owned(),
            ..MonthlyStatusCount::default()
        };
        assert_eq!(row.month(), Some(7));

        let bad = MonthlyStatusCount {
            date: "July".to_owned(),
            ..MonthlyStatusCount::default()
        };
        assert_eq!(bad.month(), None);
    }

    #[test]
    fn assignee_rows_expose_counts_by_status() -> Result<()> {
        let parsed: AssigneeDailyStatus = serde_json::from_str(
            r#"{"dates":["2025-08-12","2025-08-13"],"data":[{"assignee":"Gema","open":[0,1],"pending":[2,0],"closed":[0,0]}]}"#,
        )?;
        let row = &parsed.data[0];
        assert_eq!(row.counts(ComplaintStatus::Open), &[0, 1]);
        assert_eq!(row.counts(ComplaintStatus::Pending), &[2, 0]);
        Ok(())
    }
}
