// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use maintdash_api::{Client, FetchError};
use maintdash_app::{BreakdownPeriod, ChartPeriod, ComplaintPeriod, RangePreset, WorkReportPeriod};
use maintdash_testkit::PlantFaker;
use maintdash_tui::{DashboardRuntime, FetchPayload, FetchRequest, InternalEvent, ListKind};
use std::sync::mpsc::Sender;
use std::thread;
use time::Date;
use tracing::debug;

/// Talks to the dashboard backend. Each fetch runs on its own thread so a
/// slow endpoint never stalls input handling.
pub struct ApiRuntime {
    client: Client,
}

impl ApiRuntime {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn fetch_from(client: &Client, request: &FetchRequest) -> Result<FetchPayload, FetchError> {
    Ok(match request {
        FetchRequest::StatusCount(range) => {
            FetchPayload::StatusCount(client.status_count(Some(range))?)
        }
        FetchRequest::Complaints(period) => {
            FetchPayload::Complaints(client.complaint_period(period)?)
        }
        FetchRequest::Engineers(range) => {
            FetchPayload::Engineers(client.assignee_daily_status(range.as_ref())?)
        }
        FetchRequest::List(ListKind::EquipmentComplaints) => {
            FetchPayload::EquipmentComplaints(client.equipment_complaint_counts()?)
        }
        FetchRequest::List(ListKind::EquipmentRepairs) => {
            FetchPayload::EquipmentRepairs(client.equipment_work_reports()?)
        }
        FetchRequest::WorkReports(period) => {
            FetchPayload::WorkReports(client.work_report_period(period)?)
        }
        FetchRequest::Breakdowns(period) => {
            FetchPayload::Breakdowns(client.breakdown_period(period)?)
        }
    })
}

impl DashboardRuntime for ApiRuntime {
    fn fetch(&mut self, request: &FetchRequest) -> Result<FetchPayload> {
        Ok(fetch_from(&self.client, request)?)
    }

    fn spawn_fetch(&mut self, request: FetchRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let client = self.client.clone();
        thread::Builder::new()
            .name("maintdash-fetch".to_owned())
            .spawn(move || {
                let result = fetch_from(&client, &request).map_err(|error| error.to_string());
                debug!(?request, ok = result.is_ok(), "fetch finished");
                // The UI may already be gone; nothing left to notify.
                let _ = tx.send(InternalEvent::Fetched { request, result });
            })
            .map_err(|error| anyhow!("spawn fetch thread: {error}"))?;
        Ok(())
    }
}

/// Serves seeded fixture data for `--demo`. Runs inline.
pub struct DemoRuntime {
    faker: PlantFaker,
    today: Date,
}

impl DemoRuntime {
    pub fn new(seed: u64, today: Date) -> Self {
        Self {
            faker: PlantFaker::new(seed),
            today,
        }
    }
}

impl DashboardRuntime for DemoRuntime {
    fn fetch(&mut self, request: &FetchRequest) -> Result<FetchPayload> {
        let faker = &mut self.faker;
        Ok(match request {
            FetchRequest::StatusCount(_) => FetchPayload::StatusCount(faker.status_count()),
            FetchRequest::Complaints(ChartPeriod::Daily(range)) => {
                FetchPayload::Complaints(ComplaintPeriod::Daily(faker.daily_status_counts(range)))
            }
            FetchRequest::Complaints(ChartPeriod::Yearly(year)) => FetchPayload::Complaints(
                ComplaintPeriod::Monthly(faker.monthly_status_counts(*year)),
            ),
            FetchRequest::Engineers(range) => {
                let range = range.unwrap_or_else(|| RangePreset::Weekly.resolve(self.today));
                FetchPayload::Engineers(faker.assignee_daily_status(&range, 6))
            }
            FetchRequest::List(ListKind::EquipmentComplaints) => {
                FetchPayload::EquipmentComplaints(faker.equipment_complaint_counts(23))
            }
            FetchRequest::List(ListKind::EquipmentRepairs) => {
                FetchPayload::EquipmentRepairs(faker.equipment_work_reports(17))
            }
            FetchRequest::WorkReports(ChartPeriod::Daily(range)) => FetchPayload::WorkReports(
                WorkReportPeriod::Daily(faker.daily_work_reports(range)),
            ),
            FetchRequest::WorkReports(ChartPeriod::Yearly(year)) => FetchPayload::WorkReports(
                WorkReportPeriod::Monthly(faker.monthly_work_reports(*year)),
            ),
            FetchRequest::Breakdowns(ChartPeriod::Daily(range)) => FetchPayload::Breakdowns(
                BreakdownPeriod::Daily(faker.daily_breakdowns(range)),
            ),
            FetchRequest::Breakdowns(ChartPeriod::Yearly(_)) => {
                FetchPayload::Breakdowns(BreakdownPeriod::Monthly(faker.monthly_breakdowns()))
            }
        })
    }
}
