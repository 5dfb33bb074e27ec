// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Blocking client for the maintenance dashboard REST API.
//!
//! Every endpoint returns the full aggregated payload in one response; there
//! is no server-side paging. Failures are reported as [`FetchError`] so the
//! UI can tell an unreachable server apart from a bad response.

use anyhow::{Context, bail};
use maintdash_app::{
    AssigneeDailyStatus, BreakdownPeriod, ChartPeriod, ComplaintPeriod, DailyBreakdown,
    DailyStatusCount, DailyWorkReportCount, DateRange, EquipmentComplaintCount,
    EquipmentWorkReport, MonthlyBreakdown, MonthlyStatusCount, MonthlyWorkReportCount,
    StatusCount, WorkReportPeriod,
};
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const API_PREFIX: &str = "api/dashboards";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    StatusCount,
    DailyComplaint,
    MonthlyComplaint,
    AssigneeDailyStatus,
    EquipmentComplaintCount,
    EquipmentWorkReport,
    DailyWorkReport,
    MonthlyWorkReport,
    DailyBreakdown,
    MonthlyBreakdown,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::StatusCount => "status-count",
            Self::DailyComplaint => "daily-complaint",
            Self::MonthlyComplaint => "monthly-complaint",
            Self::AssigneeDailyStatus => "assignee-daily-status",
            Self::EquipmentComplaintCount => "equipment-complaint-count",
            Self::EquipmentWorkReport => "equipment-work-report",
            Self::DailyWorkReport => "daily-work-report",
            Self::MonthlyWorkReport => "monthly-work-report",
            Self::DailyBreakdown => "daily-breakdown",
            Self::MonthlyBreakdown => "monthly-breakdown",
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid request url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("cannot reach {url} -- check [server].base_url and that the backend is running ({source})")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("server returned {status} for {url}{}", detail_suffix(.detail))]
    Status {
        url: String,
        status: u16,
        detail: String,
    },
    #[error("decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn detail_suffix(detail: &str) -> String {
    if detail.is_empty() {
        String::new()
    } else {
        format!(": {detail}")
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("server.base_url must not be empty");
        }
        Url::parse(&base_url).with_context(|| format!("parse server.base_url {base_url:?}"))?;

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Cheapest request the backend serves; used by `--check`.
    pub fn ping(&self) -> Result<(), FetchError> {
        self.status_count(None).map(|_| ())
    }

    pub fn status_count(&self, range: Option<&DateRange>) -> Result<StatusCount, FetchError> {
        self.get_json(Endpoint::StatusCount, &range_query(range))
    }

    pub fn daily_complaints(&self, range: &DateRange) -> Result<Vec<DailyStatusCount>, FetchError> {
        self.get_json(Endpoint::DailyComplaint, &range_query(Some(range)))
    }

    pub fn monthly_complaints(&self, year: i32) -> Result<Vec<MonthlyStatusCount>, FetchError> {
        self.get_json(Endpoint::MonthlyComplaint, &year_query(year))
    }

    /// Without a range the server picks its own default window.
    pub fn assignee_daily_status(
        &self,
        range: Option<&DateRange>,
    ) -> Result<AssigneeDailyStatus, FetchError> {
        self.get_json(Endpoint::AssigneeDailyStatus, &range_query(range))
    }

    pub fn equipment_complaint_counts(&self) -> Result<Vec<EquipmentComplaintCount>, FetchError> {
        self.get_json(Endpoint::EquipmentComplaintCount, &[])
    }

    pub fn equipment_work_reports(&self) -> Result<Vec<EquipmentWorkReport>, FetchError> {
        self.get_json(Endpoint::EquipmentWorkReport, &[])
    }

    pub fn daily_work_reports(
        &self,
        range: &DateRange,
    ) -> Result<Vec<DailyWorkReportCount>, FetchError> {
        self.get_json(Endpoint::DailyWorkReport, &range_query(Some(range)))
    }

    pub fn monthly_work_reports(
        &self,
        year: i32,
    ) -> Result<Vec<MonthlyWorkReportCount>, FetchError> {
        self.get_json(Endpoint::MonthlyWorkReport, &year_query(year))
    }

    pub fn daily_breakdowns(&self, range: &DateRange) -> Result<Vec<DailyBreakdown>, FetchError> {
        self.get_json(Endpoint::DailyBreakdown, &range_query(Some(range)))
    }

    pub fn monthly_breakdowns(&self, year: i32) -> Result<Vec<MonthlyBreakdown>, FetchError> {
        self.get_json(Endpoint::MonthlyBreakdown, &year_query(year))
    }

    pub fn complaint_period(&self, period: &ChartPeriod) -> Result<ComplaintPeriod, FetchError> {
        match period {
            ChartPeriod::Daily(range) => self.daily_complaints(range).map(ComplaintPeriod::Daily),
            ChartPeriod::Yearly(year) => {
                self.monthly_complaints(*year).map(ComplaintPeriod::Monthly)
            }
        }
    }

    pub fn work_report_period(
        &self,
        period: &ChartPeriod,
    ) -> Result<WorkReportPeriod, FetchError> {
        match period {
            ChartPeriod::Daily(range) => {
                self.daily_work_reports(range).map(WorkReportPeriod::Daily)
            }
            ChartPeriod::Yearly(year) => self
                .monthly_work_reports(*year)
                .map(WorkReportPeriod::Monthly),
        }
    }

    pub fn breakdown_period(&self, period: &ChartPeriod) -> Result<BreakdownPeriod, FetchError> {
        match period {
            ChartPeriod::Daily(range) => self.daily_breakdowns(range).map(BreakdownPeriod::Daily),
            ChartPeriod::Yearly(year) => {
                self.monthly_breakdowns(*year).map(BreakdownPeriod::Monthly)
            }
        }
    }

    pub fn endpoint_url(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<Url, FetchError> {
        let raw = format!("{}/{}/{}", self.base_url, API_PREFIX, endpoint.path());
        let mut url = Url::parse(&raw).map_err(|source| FetchError::InvalidUrl {
            url: raw.clone(),
            source,
        })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = self.endpoint_url(endpoint, query)?;
        let url_text = url.to_string();
        debug!(url = %url_text, "fetching dashboard data");

        let response = self
            .http
            .get(url)
            .send()
            .map_err(|source| FetchError::Network {
                url: url_text.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Status {
                url: url_text,
                status: status.as_u16(),
                detail: error_detail(&body),
            });
        }

        let body = response.text().map_err(|source| FetchError::Network {
            url: url_text.clone(),
            source,
        })?;
        let parsed = serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            url: url_text.clone(),
            source,
        })?;
        debug!(url = %url_text, bytes = body.len(), "fetched dashboard data");
        Ok(parsed)
    }
}

fn range_query(range: Option<&DateRange>) -> Vec<(&'static str, String)> {
    match range {
        Some(range) => vec![("from", range.api_from()), ("to", range.api_to())],
        None => Vec::new(),
    }
}

fn year_query(year: i32) -> Vec<(&'static str, String)> {
    vec![("year", year.to_string())]
}

#[derive(Debug, Deserialize)]
struct SpringErrorEnvelope {
    message: Option<String>,
    error: Option<String>,
}

fn error_detail(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<SpringErrorEnvelope>(body) {
        if let Some(message) = parsed.message
            && !message.is_empty()
        {
            return message;
        }
        if let Some(error) = parsed.error
            && !error.is_empty()
        {
            return error;
        }
    }

    let trimmed = body.trim();
    if trimmed.len() < 100 && !trimmed.contains('{') && !trimmed.contains('<') {
        return trimmed.to_owned();
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::{Client, Endpoint, FetchError, error_detail};
    use anyhow::Result;
    use std::time::Duration;

    #[test]
    fn new_trims_trailing_slashes_and_rejects_empty() -> Result<()> {
        let client = Client::new("http://localhost:8080///", Duration::from_secs(1))?;
        assert_eq!(client.base_url(), "http://localhost:8080");

        let error = Client::new("///", Duration::from_secs(1)).expect_err("empty should fail");
        assert!(error.to_string().contains("must not be empty"));
        Ok(())
    }

    #[test]
    fn new_rejects_unparseable_base_url() {
        let error =
            Client::new("not a url", Duration::from_secs(1)).expect_err("bad url should fail");
        assert!(error.to_string().contains("server.base_url"));
    }

    #[test]
    fn endpoint_url_appends_prefix_and_query() -> Result<()> {
        let client = Client::new("http://plant.example:8080/app", Duration::from_secs(1))?;
        let url = client.endpoint_url(Endpoint::MonthlyBreakdown, &[("year", "2025".to_owned())])?;
        assert_eq!(
            url.as_str(),
            "http://plant.example:8080/app/api/dashboards/monthly-breakdown?year=2025"
        );

        let bare = client.endpoint_url(Endpoint::EquipmentWorkReport, &[])?;
        assert_eq!(bare.query(), None);
        Ok(())
    }

    #[test]
    fn error_detail_prefers_spring_message() {
        assert_eq!(
            error_detail(r#"{"status":400,"error":"Bad Request","message":"Invalid date range"}"#),
            "Invalid date range"
        );
        assert_eq!(
            error_detail(r#"{"status":500,"error":"Internal Server Error","message":""}"#),
            "Internal Server Error"
        );
        assert_eq!(error_detail("upstream timeout"), "upstream timeout");
        assert_eq!(error_detail("<html>oops</html>"), "");
    }

    #[test]
    fn status_error_message_includes_detail_when_present() {
        let with_detail = FetchError::Status {
            url: "http://x/api/dashboards/status-count".to_owned(),
            status: 503,
            detail: "maintenance window".to_owned(),
        };
        assert_eq!(with_detail.status_code(), Some(503));
        assert!(with_detail.to_string().ends_with("status-count: maintenance window"));

        let bare = FetchError::Status {
            url: "http://x/api/dashboards/status-count".to_owned(),
            status: 500,
            detail: String::new(),
        };
        assert!(bare.to_string().ends_with("status-count"));
    }
}
