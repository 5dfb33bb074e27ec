// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::list::{EMPTY_TEXT, ListRecord, ListWidget, format_count, format_minutes};
use crate::{ChartPanel, Dashboard, EngineerPanel, StatusCardsPanel};
use maintdash_app::{
    AppState, AssigneeDailyStatus, BreakdownSeries, ComplaintStatus, Panel, StackedSeries,
    StatusCount, WorkReportCategory, WorkReportSeries, format_short_date,
};
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row, Table, Tabs,
};

const BAR_LABEL_WIDTH: usize = 7;
const BAR_CELL: &str = "█";

/// Screen regions; shared by drawing and mouse hit-testing so both agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScreenLayout {
    pub header: Rect,
    pub status: Rect,
    panels: [(Panel, Rect); 7],
}

impl ScreenLayout {
    pub fn area(&self, panel: Panel) -> Rect {
        self.panels
            .iter()
            .find(|(candidate, _)| *candidate == panel)
            .map(|(_, area)| *area)
            .unwrap_or_default()
    }

    pub fn panel_at(&self, column: u16, row: u16) -> Option<Panel> {
        self.panels
            .iter()
            .find(|(_, area)| area.contains(Position::new(column, row)))
            .map(|(panel, _)| *panel)
    }
}

pub(crate) fn screen_layout(area: Rect) -> ScreenLayout {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Fill(1),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ])
        .split(outer[1]);

    let halves = |area: Rect, left: u16| {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(left),
                Constraint::Percentage(100 - left),
            ])
            .split(area)
    };
    let complaints = halves(rows[1], 60);
    let lists = halves(rows[2], 50);
    let trends = halves(rows[3], 50);

    ScreenLayout {
        header: outer[0],
        status: outer[2],
        panels: [
            (Panel::StatusCards, rows[0]),
            (Panel::ComplaintChart, complaints[0]),
            (Panel::Engineers, complaints[1]),
            (Panel::EquipmentComplaints, lists[0]),
            (Panel::EquipmentRepairs, lists[1]),
            (Panel::WorkReportChart, trends[0]),
            (Panel::BreakdownChart, trends[1]),
        ],
    }
}

pub(crate) fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, dashboard: &Dashboard) {
    let layout = screen_layout(frame.area());

    let selected = Panel::ALL
        .iter()
        .position(|panel| *panel == state.focus)
        .unwrap_or(0);
    let tabs = Tabs::new(Panel::ALL.iter().map(|panel| panel.title()).collect::<Vec<_>>())
        .block(Block::default().title("maintdash").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout.header);

    let focused = |panel: Panel| state.focus == panel;

    render_status_cards(
        frame,
        layout.area(Panel::StatusCards),
        &dashboard.status_cards,
        focused(Panel::StatusCards),
    );
    render_complaint_chart(
        frame,
        layout.area(Panel::ComplaintChart),
        &dashboard.complaints,
        focused(Panel::ComplaintChart),
    );
    render_engineers(
        frame,
        layout.area(Panel::Engineers),
        &dashboard.engineers,
        focused(Panel::Engineers),
    );
    render_list(
        frame,
        layout.area(Panel::EquipmentComplaints),
        &dashboard.equipment_complaints,
        focused(Panel::EquipmentComplaints),
    );
    render_list(
        frame,
        layout.area(Panel::EquipmentRepairs),
        &dashboard.equipment_repairs,
        focused(Panel::EquipmentRepairs),
    );
    render_work_reports(
        frame,
        layout.area(Panel::WorkReportChart),
        &dashboard.work_reports,
        focused(Panel::WorkReportChart),
    );
    render_breakdowns(
        frame,
        layout.area(Panel::BreakdownChart),
        &dashboard.breakdowns,
        focused(Panel::BreakdownChart),
    );

    let status_widget = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout.status);

    if dashboard.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn panel_block(title: String, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border)
}

/// `base`, plus the in-flight or failure marker.
pub(crate) fn panel_title(base: String, loading: bool, error: Option<&str>) -> String {
    match (loading, error) {
        (true, _) => format!(" {base} · loading "),
        (false, Some(error)) => format!(" {base} · error: {error} "),
        (false, None) => format!(" {base} "),
    }
}

pub(crate) fn status_card_values(counts: &StatusCount) -> [(&'static str, u64, Color); 4] {
    [
        ("total", counts.total_all_complaints, Color::White),
        ("open", counts.total_open, status_color(ComplaintStatus::Open)),
        (
            "closed",
            counts.total_closed,
            status_color(ComplaintStatus::Closed),
        ),
        (
            "pending",
            counts.total_pending,
            status_color(ComplaintStatus::Pending),
        ),
    ]
}

fn status_color(status: ComplaintStatus) -> Color {
    match status {
        ComplaintStatus::Open => Color::Yellow,
        ComplaintStatus::Pending => Color::Magenta,
        ComplaintStatus::Closed => Color::Green,
    }
}

fn render_status_cards(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    panel: &StatusCardsPanel,
    focused: bool,
) {
    let block = panel_block(panel.title(), focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(inner);
    for ((label, value, color), card) in status_card_values(&panel.counts)
        .into_iter()
        .zip(cards.iter())
    {
        let text = vec![
            Line::from(Span::styled(label, Style::default().fg(color))),
            Line::from(Span::styled(
                format_count(value),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        frame.render_widget(Paragraph::new(text), *card);
    }
}

/// Horizontal stacked bars: one line per label, open then pending then closed.
pub(crate) fn complaint_chart_lines(series: &StackedSeries, width: u16) -> Vec<Line<'static>> {
    if series.is_empty() {
        return vec![Line::from(EMPTY_TEXT)];
    }

    let axis = series.axis();
    let totals = series.totals();
    let bar_width = usize::from(width).saturating_sub(BAR_LABEL_WIDTH + 8) as u64;
    let cells = |value: u64| -> usize {
        if axis.max == 0 {
            0
        } else {
            (value * bar_width / axis.max) as usize
        }
    };

    let mut lines = vec![Line::from(
        ComplaintStatus::ALL
            .iter()
            .flat_map(|status| {
                [
                    Span::styled(BAR_CELL, Style::default().fg(status_color(*status))),
                    Span::raw(format!(" {}  ", status.as_str())),
                ]
            })
            .collect::<Vec<_>>(),
    )];

    for (index, label) in series.labels.iter().enumerate() {
        let value = |values: &[u64]| values.get(index).copied().unwrap_or(0);
        let mut spans = vec![Span::raw(format!(
            "{:>width$} ",
            format_short_date(label),
            width = BAR_LABEL_WIDTH
        ))];
        for (status, count) in [
            (ComplaintStatus::Open, value(&series.open)),
            (ComplaintStatus::Pending, value(&series.pending)),
            (ComplaintStatus::Closed, value(&series.closed)),
        ] {
            spans.push(Span::styled(
                BAR_CELL.repeat(cells(count)),
                Style::default().fg(status_color(status)),
            ));
        }
        spans.push(Span::raw(format!(" {}", totals[index])));
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(format!(
        "{:>width$} 0..{} step {}",
        "",
        axis.max,
        axis.step,
        width = BAR_LABEL_WIDTH
    )));
    lines
}

fn render_complaint_chart(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    panel: &ChartPanel<StackedSeries>,
    focused: bool,
) {
    let block = panel_block(panel.title(Panel::ComplaintChart.title()), focused);
    let width = block.inner(area).width;
    let chart = Paragraph::new(complaint_chart_lines(&panel.series, width)).block(block);
    frame.render_widget(chart, area);
}

pub(crate) fn engineer_header(data: &AssigneeDailyStatus) -> Vec<String> {
    std::iter::once("assignee".to_owned())
        .chain(data.dates.iter().map(|date| format_short_date(date)))
        .collect()
}

/// Per assignee: name, then `open/pending/closed` for each date.
pub(crate) fn engineer_rows(data: &AssigneeDailyStatus) -> Vec<Vec<String>> {
    data.data
        .iter()
        .map(|row| {
            let mut cells = vec![row.assignee.clone()];
            for index in 0..data.dates.len() {
                let counts = ComplaintStatus::ALL
                    .iter()
                    .map(|status| {
                        row.counts(*status)
                            .get(index)
                            .copied()
                            .unwrap_or(0)
                            .to_string()
                    })
                    .collect::<Vec<_>>();
                cells.push(counts.join("/"));
            }
            cells
        })
        .collect()
}

fn render_engineers(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    panel: &EngineerPanel,
    focused: bool,
) {
    let block = panel_block(panel.title(), focused);
    if panel.data.data.is_empty() {
        frame.render_widget(Paragraph::new(EMPTY_TEXT).block(block), area);
        return;
    }

    let header = Row::new(engineer_header(&panel.data))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = engineer_rows(&panel.data)
        .into_iter()
        .map(|cells| Row::new(cells.into_iter().map(Cell::from)));
    let widths = std::iter::once(Constraint::Length(16))
        .chain(panel.data.dates.iter().map(|_| Constraint::Length(8)))
        .collect::<Vec<_>>();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, area);
}

fn render_list<T: ListRecord>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    widget: &ListWidget<T>,
    focused: bool,
) {
    let panel = widget.kind().panel();
    let block = panel_block(format!(" {} ", panel.title()), focused).title_bottom(widget.footer());
    let body = Paragraph::new(widget.render_lines().join("\n")).block(block);
    frame.render_widget(body, area);
}

fn category_color(category: WorkReportCategory) -> Color {
    match category {
        WorkReportCategory::Corrective => Color::Yellow,
        WorkReportCategory::Preventive => Color::Green,
        WorkReportCategory::Breakdown => Color::Red,
        WorkReportCategory::Other => Color::Blue,
    }
}

fn points(values: &[u64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| (index as f64, *value as f64))
        .collect()
}

/// First, middle and last label, shortened for the x axis.
pub(crate) fn x_axis_labels(labels: &[String]) -> Vec<String> {
    match labels.len() {
        0 => Vec::new(),
        1 => vec![format_short_date(&labels[0])],
        len => {
            let mut picked = vec![format_short_date(&labels[0])];
            if len > 2 {
                picked.push(format_short_date(&labels[len / 2]));
            }
            picked.push(format_short_date(&labels[len - 1]));
            picked
        }
    }
}

fn x_bound(labels: &[String]) -> f64 {
    labels.len().saturating_sub(1).max(1) as f64
}

fn render_work_reports(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    panel: &ChartPanel<WorkReportSeries>,
    focused: bool,
) {
    let block = panel_block(panel.title(Panel::WorkReportChart.title()), focused);
    let series = &panel.series;
    if series.labels.is_empty() {
        frame.render_widget(Paragraph::new(EMPTY_TEXT).block(block), area);
        return;
    }

    let data = WorkReportCategory::ALL
        .iter()
        .map(|category| points(&series.values(*category)))
        .collect::<Vec<_>>();
    let datasets = WorkReportCategory::ALL
        .iter()
        .zip(&data)
        .map(|(category, points)| {
            Dataset::default()
                .name(category.label())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(category_color(*category)))
                .data(points)
        })
        .collect::<Vec<_>>();

    let peak = series.peak().max(1);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_bound(&series.labels)])
                .labels(x_axis_labels(&series.labels)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, peak as f64])
                .labels(["0".to_owned(), format_count(peak)]),
        );
    frame.render_widget(chart, area);
}

pub(crate) fn breakdown_summary(series: &BreakdownSeries) -> String {
    format!(
        "{} · {} breakdowns",
        format_minutes(series.total_minutes()),
        format_count(series.total_breakdowns())
    )
}

/// Y ticks at 0, 5 and 10 steps.
/// Top of the resolution axis: ten steps, grown in two-step increments until
/// the peak fits so the middle tick stays on a step.
pub(crate) fn breakdown_y_max(step: u64, peak: u64) -> u64 {
    let pair = step.max(1) * 2;
    (step * 10).max(peak.div_ceil(pair) * pair)
}

pub(crate) fn breakdown_y_labels(y_max: u64) -> Vec<String> {
    [0, y_max / 2, y_max]
        .iter()
        .map(|value| format_count(*value))
        .collect()
}

fn render_breakdowns(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    panel: &ChartPanel<BreakdownSeries>,
    focused: bool,
) {
    let series = &panel.series;
    let base = format!(
        "{} · {}",
        Panel::BreakdownChart.title(),
        breakdown_summary(series)
    );
    let block = panel_block(panel.title(&base), focused);
    if series.labels.is_empty() {
        frame.render_widget(Paragraph::new(EMPTY_TEXT).block(block), area);
        return;
    }

    let minutes = points(&series.minutes);
    let step = series.step();
    let peak = series.minutes.iter().copied().max().unwrap_or(0);
    let y_max = breakdown_y_max(step, peak);
    let dataset = Dataset::default()
        .name("resolution (min)")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Red))
        .data(&minutes);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, x_bound(&series.labels)])
                .labels(x_axis_labels(&series.labels)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max as f64])
                .labels(breakdown_y_labels(y_max)),
        );
    frame.render_widget(chart, area);
}

pub(crate) fn status_text(state: &AppState) -> String {
    let hints = match state.focus {
        Panel::StatusCards => "t/w/m range | r reload",
        Panel::ComplaintChart | Panel::WorkReportChart | Panel::BreakdownChart => {
            "w/m/y preset | [/] year | r reload"
        }
        Panel::Engineers => "h/l shift day | r reset",
        Panel::EquipmentComplaints | Panel::EquipmentRepairs => {
            "n/p page | wheel page | r refresh"
        }
    };
    let default = format!("tab focus | {hints} | R reload all | ? help | q quit");
    match &state.status_line {
        Some(status) => format!("{status} | {default}"),
        None => default,
    }
}

fn help_overlay_text() -> &'static str {
    "global: tab/shift+tab focus | 1-7 jump to panel | R reload all | ? help | q/esc/ctrl+c quit\n\
status cards: t today | w last 7 days | m this month | r reload\n\
charts: w weekly | m monthly | y yearly | [/] previous/next year | r reload\n\
engineers: h/left previous day | l/right next day | r reset to server range\n\
lists: n/right/pgdn next page | p/left/pgup previous page | wheel over list pages | r refresh\n\
help: any key close"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
