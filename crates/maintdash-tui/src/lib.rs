// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod list;
mod render;

pub use list::{
    EMPTY_TEXT, LOADING_TEXT, ListKind, ListRecord, ListWidget, format_count, format_minutes,
};

use anyhow::{Context, Result, anyhow};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use maintdash_app::{
    AppCommand, AppState, AssigneeDailyStatus, BreakdownPeriod, BreakdownSeries, ChartPeriod,
    ComplaintPeriod, DateRange, EquipmentComplaintCount, EquipmentWorkReport, Panel,
    RangePreset, ScrollDirection, StackedSeries, StatusCount, WorkReportPeriod,
    WorkReportSeries, parse_date, step_year,
};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::Rect;
use render::{panel_title, render, screen_layout};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use time::Date;
use tracing::{debug, info, warn};

/// One dashboard query. Requests carry no cancellation token: two in flight
/// for the same panel race and the last completion wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    StatusCount(DateRange),
    Complaints(ChartPeriod),
    /// `None` lets the server pick its default window.
    Engineers(Option<DateRange>),
    List(ListKind),
    WorkReports(ChartPeriod),
    Breakdowns(ChartPeriod),
}

impl FetchRequest {
    pub const fn panel(&self) -> Panel {
        match self {
            Self::StatusCount(_) => Panel::StatusCards,
            Self::Complaints(_) => Panel::ComplaintChart,
            Self::Engineers(_) => Panel::Engineers,
            Self::List(kind) => kind.panel(),
            Self::WorkReports(_) => Panel::WorkReportChart,
            Self::Breakdowns(_) => Panel::BreakdownChart,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPayload {
    StatusCount(StatusCount),
    Complaints(ComplaintPeriod),
    Engineers(AssigneeDailyStatus),
    EquipmentComplaints(Vec<EquipmentComplaintCount>),
    EquipmentRepairs(Vec<EquipmentWorkReport>),
    WorkReports(WorkReportPeriod),
    Breakdowns(BreakdownPeriod),
}

impl FetchPayload {
    const fn name(&self) -> &'static str {
        match self {
            Self::StatusCount(_) => "status count",
            Self::Complaints(_) => "complaint series",
            Self::Engineers(_) => "assignee status",
            Self::EquipmentComplaints(_) => "equipment complaint list",
            Self::EquipmentRepairs(_) => "equipment repair list",
            Self::WorkReports(_) => "work report series",
            Self::Breakdowns(_) => "breakdown series",
        }
    }
}

pub trait DashboardRuntime {
    fn fetch(&mut self, request: &FetchRequest) -> Result<FetchPayload>;

    /// Runs `request` and posts the outcome to the UI loop. The default runs
    /// it inline; runtimes backed by a network move it off the UI thread.
    fn spawn_fetch(&mut self, request: FetchRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let result = self
            .fetch(&request)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::Fetched { request, result })
            .map_err(|_| anyhow!("fetch event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    Fetched {
        request: FetchRequest,
        result: Result<FetchPayload, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub page_size: usize,
    pub scroll_cooldown: Duration,
    pub today: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPreset {
    Weekly,
    Monthly,
    Yearly,
}

impl ChartPreset {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusCardsPanel {
    preset: RangePreset,
    range: DateRange,
    counts: StatusCount,
    loading: bool,
    error: Option<String>,
}

impl StatusCardsPanel {
    fn new(today: Date) -> Self {
        Self {
            preset: RangePreset::Today,
            range: RangePreset::Today.resolve(today),
            counts: StatusCount::default(),
            loading: false,
            error: None,
        }
    }

    fn select(&mut self, preset: RangePreset, today: Date) -> DateRange {
        self.preset = preset;
        self.range = preset.resolve(today);
        self.reload()
    }

    fn reload(&mut self) -> DateRange {
        self.loading = true;
        self.range
    }

    fn title(&self) -> String {
        panel_title(
            format!(
                "{} · {} · {}",
                Panel::StatusCards.title(),
                self.preset.label(),
                self.range.label()
            ),
            self.loading,
            self.error.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ChartPanel<S> {
    preset: ChartPreset,
    period: ChartPeriod,
    series: S,
    loading: bool,
    error: Option<String>,
}

impl<S: Default> ChartPanel<S> {
    fn new(today: Date) -> Self {
        Self {
            preset: ChartPreset::Weekly,
            period: ChartPeriod::Daily(RangePreset::Weekly.resolve(today)),
            series: S::default(),
            loading: false,
            error: None,
        }
    }
}

impl<S> ChartPanel<S> {
    fn select(&mut self, preset: ChartPreset, today: Date) -> ChartPeriod {
        self.preset = preset;
        self.period = match preset {
            ChartPreset::Weekly => ChartPeriod::Daily(RangePreset::Weekly.resolve(today)),
            ChartPreset::Monthly => ChartPeriod::Daily(RangePreset::Monthly.resolve(today)),
            ChartPreset::Yearly => match self.period {
                ChartPeriod::Yearly(year) => ChartPeriod::Yearly(year),
                ChartPeriod::Daily(_) => ChartPeriod::Yearly(today.year()),
            },
        };
        self.reload()
    }

    /// Moves the selected year, switching to yearly mode first if needed.
    fn shift_year(&mut self, delta: i32, today: Date) -> ChartPeriod {
        let current = today.year();
        let base = match self.period {
            ChartPeriod::Yearly(year) => year,
            ChartPeriod::Daily(_) => current,
        };
        self.preset = ChartPreset::Yearly;
        self.period = ChartPeriod::Yearly(step_year(base, delta, current));
        self.reload()
    }

    fn reload(&mut self) -> ChartPeriod {
        self.loading = true;
        self.period
    }

    fn succeed(&mut self, series: S) {
        self.series = series;
        self.settle();
    }

    fn settle(&mut self) {
        self.loading = false;
        self.error = None;
    }

    fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    fn title(&self, name: &str) -> String {
        panel_title(
            format!("{name} · {} · {}", self.preset.label(), self.period.label()),
            self.loading,
            self.error.as_deref(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct EngineerPanel {
    requested: Option<DateRange>,
    shown: Option<DateRange>,
    data: AssigneeDailyStatus,
    loading: bool,
    error: Option<String>,
}

impl EngineerPanel {
    fn reset(&mut self) -> Option<DateRange> {
        self.requested = None;
        self.loading = true;
        None
    }

    /// Shifts the shown window by `days`. Does nothing before the first
    /// successful load, since the server picks the initial window.
    fn shift(&mut self, days: i64) -> Option<DateRange> {
        let next = self.shown.or(self.requested)?.shift_days(days)?;
        self.requested = Some(next);
        self.loading = true;
        Some(next)
    }

    fn succeed(&mut self, data: AssigneeDailyStatus) {
        let bounds = data
            .dates
            .first()
            .zip(data.dates.last())
            .and_then(|(first, last)| {
                DateRange::new(parse_date(first).ok()?, parse_date(last).ok()?).ok()
            });
        self.shown = bounds.or(self.requested);
        self.data = data;
        self.loading = false;
        self.error = None;
    }

    fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    fn title(&self) -> String {
        let window = self
            .shown
            .map(|range| range.label())
            .unwrap_or_else(|| "server default".to_owned());
        panel_title(
            format!("{} · {window}", Panel::Engineers.title()),
            self.loading,
            self.error.as_deref(),
        )
    }
}

/// Per-panel view state. Every panel owns its data; nothing is global.
#[derive(Debug, Clone, PartialEq)]
struct Dashboard {
    today: Date,
    status_cards: StatusCardsPanel,
    complaints: ChartPanel<StackedSeries>,
    engineers: EngineerPanel,
    equipment_complaints: ListWidget<EquipmentComplaintCount>,
    equipment_repairs: ListWidget<EquipmentWorkReport>,
    work_reports: ChartPanel<WorkReportSeries>,
    breakdowns: ChartPanel<BreakdownSeries>,
    help_visible: bool,
    status_token: u64,
}

impl Dashboard {
    fn new(options: DashboardOptions) -> Result<Self> {
        let today = options.today;
        Ok(Self {
            today,
            status_cards: StatusCardsPanel::new(today),
            complaints: ChartPanel::new(today),
            engineers: EngineerPanel::default(),
            equipment_complaints: ListWidget::new(options.page_size, options.scroll_cooldown)
                .context("equipment complained list")?,
            equipment_repairs: ListWidget::new(options.page_size, options.scroll_cooldown)
                .context("equipment repaired list")?,
            work_reports: ChartPanel::new(today),
            breakdowns: ChartPanel::new(today),
            help_visible: false,
            status_token: 0,
        })
    }

    fn load_all(&mut self) -> Vec<FetchRequest> {
        Panel::ALL
            .iter()
            .map(|panel| self.reload(*panel))
            .collect()
    }

    /// Re-runs the panel's current query. Lists go back to page 1; the
    /// engineer table drops its window and lets the server choose again.
    fn reload(&mut self, panel: Panel) -> FetchRequest {
        match panel {
            Panel::StatusCards => FetchRequest::StatusCount(self.status_cards.reload()),
            Panel::ComplaintChart => FetchRequest::Complaints(self.complaints.reload()),
            Panel::Engineers => FetchRequest::Engineers(self.engineers.reset()),
            Panel::EquipmentComplaints => self.equipment_complaints.refresh(),
            Panel::EquipmentRepairs => self.equipment_repairs.refresh(),
            Panel::WorkReportChart => FetchRequest::WorkReports(self.work_reports.reload()),
            Panel::BreakdownChart => FetchRequest::Breakdowns(self.breakdowns.reload()),
        }
    }

    fn select_chart_preset(&mut self, panel: Panel, preset: ChartPreset) -> Option<FetchRequest> {
        let today = self.today;
        match panel {
            Panel::ComplaintChart => Some(FetchRequest::Complaints(
                self.complaints.select(preset, today),
            )),
            Panel::WorkReportChart => Some(FetchRequest::WorkReports(
                self.work_reports.select(preset, today),
            )),
            Panel::BreakdownChart => Some(FetchRequest::Breakdowns(
                self.breakdowns.select(preset, today),
            )),
            _ => None,
        }
    }

    fn shift_chart_year(&mut self, panel: Panel, delta: i32) -> Option<FetchRequest> {
        let today = self.today;
        match panel {
            Panel::ComplaintChart => Some(FetchRequest::Complaints(
                self.complaints.shift_year(delta, today),
            )),
            Panel::WorkReportChart => Some(FetchRequest::WorkReports(
                self.work_reports.shift_year(delta, today),
            )),
            Panel::BreakdownChart => Some(FetchRequest::Breakdowns(
                self.breakdowns.shift_year(delta, today),
            )),
            _ => None,
        }
    }

    fn next_page(&mut self, panel: Panel) -> bool {
        match panel {
            Panel::EquipmentComplaints => self.equipment_complaints.next(),
            Panel::EquipmentRepairs => self.equipment_repairs.next(),
            _ => false,
        }
    }

    fn prev_page(&mut self, panel: Panel) -> bool {
        match panel {
            Panel::EquipmentComplaints => self.equipment_complaints.prev(),
            Panel::EquipmentRepairs => self.equipment_repairs.prev(),
            _ => false,
        }
    }

    fn scroll(&mut self, panel: Panel, direction: ScrollDirection, now: Instant) -> bool {
        match panel {
            Panel::EquipmentComplaints => self.equipment_complaints.scroll(direction, now),
            Panel::EquipmentRepairs => self.equipment_repairs.scroll(direction, now),
            _ => false,
        }
    }

    /// Applies a completed fetch. Returns a status message when it failed.
    fn apply(
        &mut self,
        request: FetchRequest,
        result: Result<FetchPayload, String>,
    ) -> Option<String> {
        let panel = request.panel();
        let outcome = result.and_then(|payload| self.accept(request, payload));
        match outcome {
            Ok(()) => {
                debug!(panel = panel.title(), "dashboard fetch applied");
                None
            }
            Err(message) => {
                warn!(panel = panel.title(), error = %message, "dashboard fetch failed");
                let status = format!("{} failed to load: {message}", panel.title());
                self.fail(panel, message);
                Some(status)
            }
        }
    }

    fn accept(&mut self, request: FetchRequest, payload: FetchPayload) -> Result<(), String> {
        match (request, payload) {
            (FetchRequest::StatusCount(_), FetchPayload::StatusCount(counts)) => {
                self.status_cards.counts = counts;
                self.status_cards.loading = false;
                self.status_cards.error = None;
            }
            (FetchRequest::Complaints(_), FetchPayload::Complaints(period)) => {
                // An empty year leaves the last chart in place.
                if matches!(period, ComplaintPeriod::Monthly(_)) && period.is_empty() {
                    self.complaints.settle();
                } else {
                    self.complaints.succeed(period.to_series());
                }
            }
            (FetchRequest::Engineers(_), FetchPayload::Engineers(data)) => {
                self.engineers.succeed(data);
            }
            (
                FetchRequest::List(ListKind::EquipmentComplaints),
                FetchPayload::EquipmentComplaints(records),
            ) => self.equipment_complaints.finish_load(Ok(records)),
            (
                FetchRequest::List(ListKind::EquipmentRepairs),
                FetchPayload::EquipmentRepairs(records),
            ) => self.equipment_repairs.finish_load(Ok(records)),
            (FetchRequest::WorkReports(_), FetchPayload::WorkReports(period)) => {
                self.work_reports.succeed(period.to_series());
            }
            (FetchRequest::Breakdowns(_), FetchPayload::Breakdowns(period)) => {
                self.breakdowns.succeed(period.to_series());
            }
            (request, payload) => {
                return Err(format!(
                    "unexpected {} for {}",
                    payload.name(),
                    request.panel().title()
                ));
            }
        }
        Ok(())
    }

    fn fail(&mut self, panel: Panel, message: String) {
        match panel {
            Panel::StatusCards => {
                self.status_cards.loading = false;
                self.status_cards.error = Some(message);
            }
            Panel::ComplaintChart => self.complaints.fail(message),
            Panel::Engineers => self.engineers.fail(message),
            Panel::EquipmentComplaints => self.equipment_complaints.finish_load(Err(message)),
            Panel::EquipmentRepairs => self.equipment_repairs.finish_load(Err(message)),
            Panel::WorkReportChart => self.work_reports.fail(message),
            Panel::BreakdownChart => self.breakdowns.fail(message),
        }
    }
}

pub fn run_app<R: DashboardRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: DashboardOptions,
) -> Result<()> {
    let mut dashboard = Dashboard::new(options)?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, EnableMouseCapture)
        .context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let result = event_loop(&mut terminal, state, runtime, &mut dashboard);

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        io::stdout(),
        DisableMouseCapture,
        terminal::LeaveAlternateScreen
    )
    .context("leave alternate screen")?;
    result
}

fn event_loop<B: Backend, R: DashboardRuntime>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    runtime: &mut R,
    dashboard: &mut Dashboard,
) -> Result<()> {
    let (internal_tx, internal_rx) = mpsc::channel();

    info!("loading dashboard panels");
    let requests = dashboard.load_all();
    spawn_requests(state, runtime, dashboard, &internal_tx, requests);

    loop {
        process_internal_events(state, dashboard, &internal_tx, &internal_rx);

        terminal
            .draw(|frame| render(frame, state, dashboard))
            .context("draw frame")?;

        if !event::poll(Duration::from_millis(120)).context("poll event")? {
            continue;
        }
        match event::read().context("read event")? {
            Event::Key(key) => {
                if handle_key_event(state, runtime, dashboard, &internal_tx, key) {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size().context("read terminal size")?;
                let area = Rect::new(0, 0, size.width, size.height);
                handle_mouse_event(state, dashboard, area, mouse, Instant::now());
            }
            _ => {}
        }
    }
}

fn process_internal_events(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == dashboard.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetched { request, result } => {
                if let Some(message) = dashboard.apply(request, result) {
                    emit_status(state, dashboard, tx, message);
                }
            }
        }
    }
}

fn spawn_requests<R: DashboardRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    dashboard: &mut Dashboard,
    tx: &Sender<InternalEvent>,
    requests: impl IntoIterator<Item = FetchRequest>,
) {
    for request in requests {
        debug!(?request, "dispatching dashboard fetch");
        if let Err(error) = runtime.spawn_fetch(request, tx.clone()) {
            if let Some(message) = dashboard.apply(request, Err(format!("{error:#}"))) {
                emit_status(state, dashboard, tx, message);
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    dashboard.status_token = dashboard.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, dashboard.status_token);
}

fn handle_key_event<R: DashboardRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    dashboard: &mut Dashboard,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    if dashboard.help_visible {
        dashboard.help_visible = false;
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('?') => dashboard.help_visible = true,
        KeyCode::Tab => {
            state.dispatch(AppCommand::FocusNext);
        }
        KeyCode::BackTab => {
            state.dispatch(AppCommand::FocusPrev);
        }
        KeyCode::Char(digit @ '1'..='7') => {
            let index = usize::from(digit as u8 - b'1');
            if let Some(panel) = Panel::ALL.get(index) {
                state.dispatch(AppCommand::Focus(*panel));
            }
        }
        KeyCode::Char('R') => {
            let requests = dashboard.load_all();
            spawn_requests(state, runtime, dashboard, internal_tx, requests);
            emit_status(state, dashboard, internal_tx, "reloading all panels");
        }
        code => {
            if let Some(request) = handle_panel_key(state.focus, dashboard, code) {
                spawn_requests(state, runtime, dashboard, internal_tx, [request]);
            }
        }
    }
    false
}

/// Keys scoped to the focused panel. Returns a fetch to start, if any.
fn handle_panel_key(
    focus: Panel,
    dashboard: &mut Dashboard,
    code: KeyCode,
) -> Option<FetchRequest> {
    if code == KeyCode::Char('r') {
        return Some(dashboard.reload(focus));
    }

    let today = dashboard.today;
    match focus {
        Panel::StatusCards => {
            let preset = match code {
                KeyCode::Char('t') => RangePreset::Today,
                KeyCode::Char('w') => RangePreset::Weekly,
                KeyCode::Char('m') => RangePreset::Monthly,
                _ => return None,
            };
            Some(FetchRequest::StatusCount(
                dashboard.status_cards.select(preset, today),
            ))
        }
        Panel::ComplaintChart | Panel::WorkReportChart | Panel::BreakdownChart => match code {
            KeyCode::Char('w') => dashboard.select_chart_preset(focus, ChartPreset::Weekly),
            KeyCode::Char('m') => dashboard.select_chart_preset(focus, ChartPreset::Monthly),
            KeyCode::Char('y') => dashboard.select_chart_preset(focus, ChartPreset::Yearly),
            KeyCode::Char('[') => dashboard.shift_chart_year(focus, -1),
            KeyCode::Char(']') => dashboard.shift_chart_year(focus, 1),
            _ => None,
        },
        Panel::Engineers => {
            let days = match code {
                KeyCode::Char('h') | KeyCode::Left => -1,
                KeyCode::Char('l') | KeyCode::Right => 1,
                _ => return None,
            };
            dashboard
                .engineers
                .shift(days)
                .map(|range| FetchRequest::Engineers(Some(range)))
        }
        Panel::EquipmentComplaints | Panel::EquipmentRepairs => {
            match code {
                KeyCode::Char('n') | KeyCode::Right | KeyCode::PageDown => {
                    dashboard.next_page(focus);
                }
                KeyCode::Char('p') | KeyCode::Left | KeyCode::PageUp => {
                    dashboard.prev_page(focus);
                }
                _ => {}
            }
            None
        }
    }
}

/// Wheel over a list pages it; a left click focuses the panel under the
/// pointer. `area` must be the full frame so hit-testing matches drawing.
fn handle_mouse_event(
    state: &mut AppState,
    dashboard: &mut Dashboard,
    area: Rect,
    mouse: MouseEvent,
    now: Instant,
) {
    let Some(panel) = screen_layout(area).panel_at(mouse.column, mouse.row) else {
        return;
    };
    match mouse.kind {
        MouseEventKind::ScrollDown => {
            dashboard.scroll(panel, ScrollDirection::Down, now);
        }
        MouseEventKind::ScrollUp => {
            dashboard.scroll(panel, ScrollDirection::Up, now);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            state.dispatch(AppCommand::Focus(panel));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ChartPreset, Dashboard, DashboardOptions, DashboardRuntime, FetchPayload, FetchRequest,
        InternalEvent, ListKind, handle_key_event, handle_mouse_event, process_internal_events,
        render, screen_layout,
    };
    use anyhow::{Result, bail};
    use crossterm::event::{
        KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    };
    use maintdash_app::{
        AppState, BreakdownPeriod, ChartPeriod, ComplaintPeriod, EquipmentComplaintCount,
        EquipmentWorkReport, ListStatus, Panel, RangePreset, StatusCount, WorkReportPeriod,
    };
    use maintdash_testkit::{PlantFaker, fixture_today, ranked_complaints};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::time::{Duration, Instant};

    const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 120,
        height: 40,
    };

    struct TestRuntime {
        faker: PlantFaker,
        complaints: Vec<EquipmentComplaintCount>,
        repairs: Vec<EquipmentWorkReport>,
        failure: Option<String>,
        requests: Vec<FetchRequest>,
    }

    impl Default for TestRuntime {
        fn default() -> Self {
            let mut faker = PlantFaker::new(17);
            let repairs = faker.equipment_work_reports(9);
            Self {
                faker,
                complaints: ranked_complaints(12),
                repairs,
                failure: None,
                requests: Vec::new(),
            }
        }
    }

    impl DashboardRuntime for TestRuntime {
        fn fetch(&mut self, request: &FetchRequest) -> Result<FetchPayload> {
            self.requests.push(*request);
            if let Some(message) = &self.failure {
                bail!("{message}");
            }
            Ok(match request {
                FetchRequest::StatusCount(_) => FetchPayload::StatusCount(StatusCount {
                    total_all_complaints: 6,
                    total_open: 3,
                    total_closed: 2,
                    total_pending: 1,
                }),
                FetchRequest::Complaints(ChartPeriod::Daily(range)) => FetchPayload::Complaints(
                    ComplaintPeriod::Daily(self.faker.daily_status_counts(range)),
                ),
                FetchRequest::Complaints(ChartPeriod::Yearly(year)) => FetchPayload::Complaints(
                    ComplaintPeriod::Monthly(self.faker.monthly_status_counts(*year)),
                ),
                FetchRequest::Engineers(range) => {
                    let range = range.unwrap_or(RangePreset::Weekly.resolve(fixture_today()));
                    FetchPayload::Engineers(self.faker.assignee_daily_status(&range, 4))
                }
                FetchRequest::List(ListKind::EquipmentComplaints) => {
                    FetchPayload::EquipmentComplaints(self.complaints.clone())
                }
                FetchRequest::List(ListKind::EquipmentRepairs) => {
                    FetchPayload::EquipmentRepairs(self.repairs.clone())
                }
                FetchRequest::WorkReports(ChartPeriod::Daily(range)) => FetchPayload::WorkReports(
                    WorkReportPeriod::Daily(self.faker.daily_work_reports(range)),
                ),
                FetchRequest::WorkReports(ChartPeriod::Yearly(year)) => {
                    FetchPayload::WorkReports(WorkReportPeriod::Monthly(
                        self.faker.monthly_work_reports(*year),
                    ))
                }
                FetchRequest::Breakdowns(ChartPeriod::Daily(range)) => FetchPayload::Breakdowns(
                    BreakdownPeriod::Daily(self.faker.daily_breakdowns(range)),
                ),
                FetchRequest::Breakdowns(ChartPeriod::Yearly(_)) => FetchPayload::Breakdowns(
                    BreakdownPeriod::Monthly(self.faker.monthly_breakdowns()),
                ),
            })
        }
    }

    struct Harness {
        state: AppState,
        runtime: TestRuntime,
        dashboard: Dashboard,
        tx: Sender<InternalEvent>,
        rx: Receiver<InternalEvent>,
    }

    impl Harness {
        fn new(page_size: usize) -> Result<Self> {
            let (tx, rx) = mpsc::channel();
            let mut harness = Self {
                state: AppState::default(),
                runtime: TestRuntime::default(),
                dashboard: Dashboard::new(DashboardOptions {
                    page_size,
                    scroll_cooldown: Duration::from_millis(300),
                    today: fixture_today(),
                })?,
                tx,
                rx,
            };
            harness.press(KeyCode::Char('R'));
            Ok(harness)
        }

        fn press(&mut self, code: KeyCode) -> bool {
            let quit = handle_key_event(
                &mut self.state,
                &mut self.runtime,
                &mut self.dashboard,
                &self.tx,
                KeyEvent::new(code, KeyModifiers::NONE),
            );
            self.drain();
            quit
        }

        fn focus(&mut self, panel: Panel) {
            self.state.focus = panel;
        }

        fn drain(&mut self) {
            process_internal_events(&mut self.state, &mut self.dashboard, &self.tx, &self.rx);
        }

        fn wheel(&mut self, panel: Panel, kind: MouseEventKind, now: Instant) {
            let area = screen_layout(SCREEN).area(panel);
            handle_mouse_event(
                &mut self.state,
                &mut self.dashboard,
                SCREEN,
                MouseEvent {
                    kind,
                    column: area.x + 2,
                    row: area.y + 2,
                    modifiers: KeyModifiers::NONE,
                },
                now,
            );
        }

        fn last_request(&self) -> Option<FetchRequest> {
            self.runtime.requests.last().copied()
        }
    }

    fn first_rank(lines: &[String]) -> String {
        lines
            .first()
            .and_then(|line| line.split('.').next())
            .map(|rank| rank.trim().to_owned())
            .unwrap_or_default()
    }

    #[test]
    fn initial_load_requests_every_panel() -> Result<()> {
        let harness = Harness::new(7)?;
        let panels = harness
            .runtime
            .requests
            .iter()
            .map(FetchRequest::panel)
            .collect::<Vec<_>>();
        assert_eq!(panels, Panel::ALL.to_vec());
        assert!(
            harness
                .runtime
                .requests
                .contains(&FetchRequest::Engineers(None))
        );
        assert_eq!(harness.dashboard.status_cards.counts.total_all_complaints, 6);
        assert_eq!(harness.dashboard.equipment_complaints.len(), 12);
        Ok(())
    }

    #[test]
    fn tab_and_digits_move_focus() -> Result<()> {
        let mut harness = Harness::new(7)?;
        assert!(!harness.press(KeyCode::Tab));
        assert_eq!(harness.state.focus, Panel::ComplaintChart);

        harness.press(KeyCode::BackTab);
        harness.press(KeyCode::BackTab);
        assert_eq!(harness.state.focus, Panel::BreakdownChart);

        harness.press(KeyCode::Char('4'));
        assert_eq!(harness.state.focus, Panel::EquipmentComplaints);
        Ok(())
    }

    #[test]
    fn quit_keys_end_the_loop() -> Result<()> {
        let mut harness = Harness::new(7)?;
        assert!(harness.press(KeyCode::Char('q')));
        assert!(harness.press(KeyCode::Esc));
        Ok(())
    }

    #[test]
    fn list_keys_page_through_twelve_items_five_at_a_time() -> Result<()> {
        let mut harness = Harness::new(5)?;
        harness.focus(Panel::EquipmentComplaints);
        let requests_before = harness.runtime.requests.len();

        assert_eq!(
            first_rank(&harness.dashboard.equipment_complaints.render_lines()),
            "1"
        );
        harness.press(KeyCode::Char('n'));
        assert_eq!(
            first_rank(&harness.dashboard.equipment_complaints.render_lines()),
            "6"
        );
        harness.press(KeyCode::PageDown);
        let lines = harness.dashboard.equipment_complaints.render_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(first_rank(&lines), "11");

        harness.press(KeyCode::Char('n'));
        assert_eq!(harness.dashboard.equipment_complaints.page(), 3);

        harness.press(KeyCode::Char('p'));
        assert_eq!(harness.dashboard.equipment_complaints.page(), 2);

        // Paging is client-side only.
        assert_eq!(harness.runtime.requests.len(), requests_before);
        Ok(())
    }

    #[test]
    fn lists_page_independently() -> Result<()> {
        let mut harness = Harness::new(3)?;
        harness.focus(Panel::EquipmentRepairs);
        harness.press(KeyCode::Right);

        assert_eq!(harness.dashboard.equipment_repairs.page(), 2);
        assert_eq!(harness.dashboard.equipment_complaints.page(), 1);
        Ok(())
    }

    #[test]
    fn repairs_arrive_ranked_by_report_count() -> Result<()> {
        let harness = Harness::new(7)?;
        let records = harness.dashboard.equipment_repairs.records();
        assert_eq!(records.len(), 9);
        assert!(
            records
                .windows(2)
                .all(|pair| pair[0].total_work_reports >= pair[1].total_work_reports)
        );
        Ok(())
    }

    #[test]
    fn failed_refresh_shows_reason_and_keeps_records() -> Result<()> {
        let mut harness = Harness::new(5)?;
        harness.focus(Panel::EquipmentComplaints);
        harness.press(KeyCode::Char('n'));

        harness.runtime.failure = Some("server returned 500".to_owned());
        harness.press(KeyCode::Char('r'));

        let list = &harness.dashboard.equipment_complaints;
        assert_eq!(
            list.render_lines(),
            vec!["Failed to load data: server returned 500"]
        );
        assert_eq!(list.len(), 12);
        assert_eq!(list.page(), 1);
        assert!(
            harness
                .state
                .status_line
                .as_deref()
                .is_some_and(|status| status.contains("equipment complained failed to load"))
        );

        harness.runtime.failure = None;
        harness.press(KeyCode::Char('r'));
        assert_eq!(
            harness.dashboard.equipment_complaints.status(),
            &ListStatus::Ready
        );
        Ok(())
    }

    #[test]
    fn empty_list_renders_no_data() -> Result<()> {
        let mut harness = Harness::new(5)?;
        harness.runtime.complaints.clear();
        harness.focus(Panel::EquipmentComplaints);
        harness.press(KeyCode::Char('r'));

        assert_eq!(
            harness.dashboard.equipment_complaints.render_lines(),
            vec!["No data"]
        );
        harness.press(KeyCode::Char('n'));
        assert_eq!(harness.dashboard.equipment_complaints.page(), 1);
        Ok(())
    }

    #[test]
    fn last_completion_wins() -> Result<()> {
        let mut harness = Harness::new(5)?;
        let request = FetchRequest::List(ListKind::EquipmentComplaints);

        harness.dashboard.equipment_complaints.load();
        harness.dashboard.equipment_complaints.load();
        harness.dashboard.apply(
            request,
            Ok(FetchPayload::EquipmentComplaints(ranked_complaints(20))),
        );
        harness.dashboard.equipment_complaints.next();
        harness.dashboard.apply(
            request,
            Ok(FetchPayload::EquipmentComplaints(ranked_complaints(3))),
        );

        assert_eq!(harness.dashboard.equipment_complaints.len(), 3);
        assert_eq!(harness.dashboard.equipment_complaints.page(), 1);
        Ok(())
    }

    #[test]
    fn mismatched_payload_is_a_failure() -> Result<()> {
        let mut harness = Harness::new(5)?;
        let status = harness.dashboard.apply(
            FetchRequest::List(ListKind::EquipmentRepairs),
            Ok(FetchPayload::EquipmentComplaints(ranked_complaints(2))),
        );
        assert!(status.is_some_and(|status| status.contains("unexpected")));
        assert!(matches!(
            harness.dashboard.equipment_repairs.status(),
            ListStatus::Failed(_)
        ));
        Ok(())
    }

    #[test]
    fn wheel_over_a_list_is_debounced() -> Result<()> {
        let mut harness = Harness::new(5)?;
        let start = Instant::now();

        harness.wheel(Panel::EquipmentComplaints, MouseEventKind::ScrollDown, start);
        harness.wheel(
            Panel::EquipmentComplaints,
            MouseEventKind::ScrollDown,
            start + Duration::from_millis(100),
        );
        assert_eq!(harness.dashboard.equipment_complaints.page(), 2);

        harness.wheel(
            Panel::EquipmentComplaints,
            MouseEventKind::ScrollDown,
            start + Duration::from_millis(350),
        );
        assert_eq!(harness.dashboard.equipment_complaints.page(), 3);

        harness.wheel(
            Panel::EquipmentComplaints,
            MouseEventKind::ScrollUp,
            start + Duration::from_millis(700),
        );
        assert_eq!(harness.dashboard.equipment_complaints.page(), 2);
        Ok(())
    }

    #[test]
    fn wheel_pages_the_list_under_the_pointer_only() -> Result<()> {
        let mut harness = Harness::new(3)?;
        let start = Instant::now();

        harness.wheel(Panel::EquipmentRepairs, MouseEventKind::ScrollDown, start);
        assert_eq!(harness.dashboard.equipment_repairs.page(), 2);
        assert_eq!(harness.dashboard.equipment_complaints.page(), 1);

        // The repairs cooldown does not block the other list.
        harness.wheel(
            Panel::EquipmentComplaints,
            MouseEventKind::ScrollDown,
            start + Duration::from_millis(10),
        );
        assert_eq!(harness.dashboard.equipment_complaints.page(), 2);

        harness.wheel(
            Panel::ComplaintChart,
            MouseEventKind::ScrollDown,
            start + Duration::from_secs(1),
        );
        assert_eq!(harness.state.focus, Panel::StatusCards);
        Ok(())
    }

    #[test]
    fn click_focuses_panel_under_pointer() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.wheel(
            Panel::BreakdownChart,
            MouseEventKind::Down(MouseButton::Left),
            Instant::now(),
        );
        assert_eq!(harness.state.focus, Panel::BreakdownChart);
        Ok(())
    }

    #[test]
    fn status_presets_request_their_range() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.focus(Panel::StatusCards);

        harness.press(KeyCode::Char('w'));
        assert_eq!(
            harness.last_request(),
            Some(FetchRequest::StatusCount(
                RangePreset::Weekly.resolve(fixture_today())
            ))
        );
        harness.press(KeyCode::Char('m'));
        let Some(FetchRequest::StatusCount(range)) = harness.last_request() else {
            panic!("expected a status count request");
        };
        assert_eq!(range.from.day(), 1);
        assert!(!harness.dashboard.status_cards.loading);
        Ok(())
    }

    #[test]
    fn chart_year_selector_is_clamped() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.focus(Panel::ComplaintChart);
        let year = fixture_today().year();

        harness.press(KeyCode::Char('y'));
        assert_eq!(
            harness.last_request(),
            Some(FetchRequest::Complaints(ChartPeriod::Yearly(year)))
        );
        for _ in 0..3 {
            harness.press(KeyCode::Char(']'));
        }
        assert_eq!(
            harness.last_request(),
            Some(FetchRequest::Complaints(ChartPeriod::Yearly(year + 1)))
        );
        for _ in 0..20 {
            harness.press(KeyCode::Char('['));
        }
        assert_eq!(
            harness.last_request(),
            Some(FetchRequest::Complaints(ChartPeriod::Yearly(year - 10)))
        );
        assert_eq!(harness.dashboard.complaints.preset, ChartPreset::Yearly);
        assert_eq!(harness.dashboard.complaints.series.labels.len(), 12);
        Ok(())
    }

    #[test]
    fn empty_year_keeps_previous_complaint_chart() -> Result<()> {
        let mut harness = Harness::new(7)?;
        let before = harness.dashboard.complaints.series.clone();
        assert!(!before.is_empty());

        harness.dashboard.apply(
            FetchRequest::Complaints(ChartPeriod::Yearly(2019)),
            Ok(FetchPayload::Complaints(ComplaintPeriod::Monthly(Vec::new()))),
        );
        assert_eq!(harness.dashboard.complaints.series, before);
        assert!(!harness.dashboard.complaints.loading);
        Ok(())
    }

    #[test]
    fn chart_failure_keeps_last_good_series() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.focus(Panel::WorkReportChart);
        let before = harness.dashboard.work_reports.series.clone();

        harness.runtime.failure = Some("cannot reach backend".to_owned());
        harness.press(KeyCode::Char('m'));

        assert_eq!(harness.dashboard.work_reports.series, before);
        assert!(
            harness
                .dashboard
                .work_reports
                .title("work reports")
                .contains("error: cannot reach backend")
        );
        Ok(())
    }

    #[test]
    fn engineer_window_shifts_by_one_day() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.focus(Panel::Engineers);
        let shown = RangePreset::Weekly.resolve(fixture_today());
        assert_eq!(harness.dashboard.engineers.shown, Some(shown));

        harness.press(KeyCode::Char('l'));
        assert_eq!(
            harness.last_request(),
            Some(FetchRequest::Engineers(shown.shift_days(1)))
        );

        harness.press(KeyCode::Left);
        harness.press(KeyCode::Left);
        assert_eq!(
            harness.last_request(),
            Some(FetchRequest::Engineers(shown.shift_days(-1)))
        );

        harness.press(KeyCode::Char('r'));
        assert_eq!(harness.last_request(), Some(FetchRequest::Engineers(None)));
        Ok(())
    }

    #[test]
    fn status_card_failure_keeps_previous_numbers() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.focus(Panel::StatusCards);
        let before = harness.dashboard.status_cards.counts;
        assert_eq!(before.total_all_complaints, 6);

        harness.runtime.failure = Some("server returned 502".to_owned());
        harness.press(KeyCode::Char('w'));

        let cards = &harness.dashboard.status_cards;
        assert_eq!(cards.counts, before);
        assert_eq!(cards.preset, RangePreset::Weekly);
        assert!(!cards.loading);
        assert!(cards.title().contains("error: server returned 502"));
        let status = harness.state.status_line.clone().unwrap_or_default();
        assert!(status.contains("failed to load"), "status: {status}");

        harness.runtime.failure = None;
        harness.press(KeyCode::Char('t'));
        assert!(!harness.dashboard.status_cards.title().contains("error:"));
        Ok(())
    }

    #[test]
    fn engineer_failure_keeps_table_and_shows_error() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.focus(Panel::Engineers);
        let data = harness.dashboard.engineers.data.clone();
        let shown = harness.dashboard.engineers.shown;
        assert!(!data.data.is_empty());

        harness.runtime.failure = Some("cannot reach backend".to_owned());
        harness.press(KeyCode::Char('l'));

        let engineers = &harness.dashboard.engineers;
        assert_eq!(engineers.data, data);
        assert_eq!(engineers.shown, shown);
        assert!(!engineers.loading);
        assert!(engineers.title().contains("error: cannot reach backend"));
        Ok(())
    }

    #[test]
    fn engineer_shift_before_first_load_does_nothing() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.dashboard.engineers.shown = None;
        harness.dashboard.engineers.requested = None;
        harness.focus(Panel::Engineers);
        let before = harness.runtime.requests.len();

        harness.press(KeyCode::Char('h'));
        assert_eq!(harness.runtime.requests.len(), before);
        Ok(())
    }

    #[test]
    fn stale_status_clear_is_ignored() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.press(KeyCode::Char('R'));
        let token = harness.dashboard.status_token;
        assert!(harness.state.status_line.is_some());

        harness
            .tx
            .send(InternalEvent::ClearStatus { token: token - 1 })?;
        harness.drain();
        assert!(harness.state.status_line.is_some());

        harness.tx.send(InternalEvent::ClearStatus { token })?;
        harness.drain();
        assert_eq!(harness.state.status_line, None);
        Ok(())
    }

    #[test]
    fn help_overlay_closes_on_any_key() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.press(KeyCode::Char('?'));
        assert!(harness.dashboard.help_visible);

        assert!(!harness.press(KeyCode::Char('q')));
        assert!(!harness.dashboard.help_visible);
        Ok(())
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let error = Dashboard::new(DashboardOptions {
            page_size: 0,
            scroll_cooldown: Duration::from_millis(300),
            today: fixture_today(),
        })
        .expect_err("zero page size should fail");
        assert!(format!("{error:#}").contains("page size must be at least 1"));
    }

    #[test]
    fn full_frame_renders_every_panel() -> Result<()> {
        let mut harness = Harness::new(7)?;
        harness.press(KeyCode::Char('?'));
        harness.press(KeyCode::Esc);

        let mut terminal = Terminal::new(TestBackend::new(SCREEN.width, SCREEN.height))?;
        terminal.draw(|frame| render(frame, &harness.state, &harness.dashboard))?;

        let screen = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        for panel in Panel::ALL {
            assert!(screen.contains(panel.title()), "missing {}", panel.title());
        }
        assert!(screen.contains("page 1/2"));
        assert!(screen.contains("EQ-001"));
        Ok(())
    }
}
