// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    StatusCards,
    ComplaintChart,
    Engineers,
    EquipmentComplaints,
    EquipmentRepairs,
    WorkReportChart,
    BreakdownChart,
}

impl Panel {
    pub const ALL: [Self; 7] = [
        Self::StatusCards,
        Self::ComplaintChart,
        Self::Engineers,
        Self::EquipmentComplaints,
        Self::EquipmentRepairs,
        Self::WorkReportChart,
        Self::BreakdownChart,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Self::StatusCards => "overall complaints",
            Self::ComplaintChart => "complaints",
            Self::Engineers => "engineer responsibility",
            Self::EquipmentComplaints => "equipment complained",
            Self::EquipmentRepairs => "equipment repaired",
            Self::WorkReportChart => "work reports",
            Self::BreakdownChart => "breakdowns",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub focus: Panel,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            focus: Panel::StatusCards,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    FocusNext,
    FocusPrev,
    Focus(Panel),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    FocusChanged(Panel),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::FocusNext => self.rotate_focus(1),
            AppCommand::FocusPrev => self.rotate_focus(-1),
            AppCommand::Focus(panel) => {
                if self.focus == panel {
                    return Vec::new();
                }
                self.focus = panel;
                vec![AppEvent::FocusChanged(panel)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn rotate_focus(&mut self, delta: isize) -> Vec<AppEvent> {
        let panels = Panel::ALL;
        let current = panels
            .iter()
            .position(|panel| *panel == self.focus)
            .unwrap_or(0) as isize;
        let len = panels.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.focus = panels[next];
        vec![AppEvent::FocusChanged(self.focus)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
