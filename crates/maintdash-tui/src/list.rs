// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Ranked equipment lists paged on the client.
//!
//! Each list panel owns a [`ListWidget`]: the most recent record set, its page
//! cursor, load status and wheel debounce. Nothing is shared between lists.

use crate::FetchRequest;
use anyhow::Result;
use maintdash_app::{
    EquipmentComplaintCount, EquipmentWorkReport, ListStatus, PageView, PagedList, Panel,
    ScrollDebounce, ScrollDirection,
};
use std::time::{Duration, Instant};

pub const LOADING_TEXT: &str = "Loading...";
pub const EMPTY_TEXT: &str = "No data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    EquipmentComplaints,
    EquipmentRepairs,
}

impl ListKind {
    pub const fn panel(self) -> Panel {
        match self {
            Self::EquipmentComplaints => Panel::EquipmentComplaints,
            Self::EquipmentRepairs => Panel::EquipmentRepairs,
        }
    }
}

/// A record type that can back a list panel.
pub trait ListRecord: Sized {
    const KIND: ListKind;

    fn render_row(rank: usize, record: &Self) -> String;

    /// Orders a freshly fetched record set before paging. Keeps server order
    /// unless overridden.
    fn rank(_records: &mut [Self]) {}
}

impl ListRecord for EquipmentComplaintCount {
    const KIND: ListKind = ListKind::EquipmentComplaints;

    fn render_row(rank: usize, record: &Self) -> String {
        format!(
            "{rank:>3}. {:<8} {:<28} {:>6}",
            record.equipment_code,
            record.equipment_name,
            format_count(record.total_complaints),
        )
    }
}

impl ListRecord for EquipmentWorkReport {
    const KIND: ListKind = ListKind::EquipmentRepairs;

    fn render_row(rank: usize, record: &Self) -> String {
        format!(
            "{rank:>3}. {:<8} {:>4} reports  {:<28} {:>10}",
            record.equipment_code,
            format_count(record.total_work_reports),
            record.equipment_name,
            format_minutes(record.total_resolution_time),
        )
    }

    fn rank(records: &mut [Self]) {
        // sort_by is stable: ties keep server order.
        records.sort_by(|left, right| right.total_work_reports.cmp(&left.total_work_reports));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListWidget<T> {
    list: PagedList<T>,
    debounce: ScrollDebounce,
}

impl<T: ListRecord> ListWidget<T> {
    pub fn new(page_size: usize, scroll_cooldown: Duration) -> Result<Self> {
        Ok(Self {
            list: PagedList::new(page_size)?,
            debounce: ScrollDebounce::new(scroll_cooldown),
        })
    }

    pub const fn kind(&self) -> ListKind {
        T::KIND
    }

    /// Marks the list as loading and returns the fetch to hand to the runtime.
    /// In-flight requests are never cancelled; whichever completes last wins.
    pub fn load(&mut self) -> FetchRequest {
        self.list.begin_load();
        FetchRequest::List(T::KIND)
    }

    pub fn refresh(&mut self) -> FetchRequest {
        self.list.reset_page();
        self.load()
    }

    pub fn finish_load(&mut self, result: Result<Vec<T>, String>) {
        match result {
            Ok(mut records) => {
                T::rank(&mut records);
                self.list.replace(records);
            }
            Err(message) => self.list.fail(message),
        }
    }

    pub fn next(&mut self) -> bool {
        self.list.next()
    }

    pub fn prev(&mut self) -> bool {
        self.list.prev()
    }

    /// Wheel navigation. Gestures inside the cooldown window are dropped.
    pub fn scroll(&mut self, direction: ScrollDirection, now: Instant) -> bool {
        if !self.debounce.accept(now) {
            return false;
        }
        match direction {
            ScrollDirection::Down => self.next(),
            ScrollDirection::Up => self.prev(),
        }
    }

    pub fn records(&self) -> &[T] {
        self.list.records()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub const fn page(&self) -> usize {
        self.list.page()
    }

    pub fn page_count(&self) -> usize {
        self.list.page_count()
    }

    pub const fn status(&self) -> &ListStatus {
        self.list.status()
    }

    /// Text for the current page, or the loading/error/empty message.
    pub fn render_lines(&self) -> Vec<String> {
        match self.list.view() {
            PageView::Loading => vec![LOADING_TEXT.to_owned()],
            PageView::Failed(message) => vec![format!("Failed to load data: {message}")],
            PageView::Empty => vec![EMPTY_TEXT.to_owned()],
            PageView::Rows(rows) => rows
                .iter()
                .map(|row| T::render_row(row.rank, row.item))
                .collect(),
        }
    }

    pub fn footer(&self) -> String {
        format!(
            " page {}/{} · {} items ",
            self.page(),
            self.page_count(),
            format_count(self.len() as u64)
        )
    }
}

pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_minutes(minutes: u64) -> String {
    format!("{} min", format_count(minutes))
}
