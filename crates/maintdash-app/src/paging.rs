// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Client-side pagination over a fully fetched record set.
//!
//! A [`PagedList`] owns the records from the most recent successful fetch
//! plus the page cursor into them. Navigation never moves the cursor past the
//! last non-empty page; failed loads keep the previous records in memory.

use anyhow::{Result, bail};
use std::time::{Duration, Instant};

pub const DEFAULT_PAGE_SIZE: usize = 7;
pub const DEFAULT_SCROLL_COOLDOWN: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page: usize,
    page_size: usize,
}

impl PageState {
    pub fn new(page_size: usize) -> Result<Self> {
        if page_size == 0 {
            bail!("page size must be at least 1");
        }
        Ok(Self { page: 1, page_size })
    }

    pub const fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    fn has_next(&self, len: usize) -> bool {
        self.page * self.page_size < len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedRow<'a, T> {
    pub rank: usize,
    pub item: &'a T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView<'a, T> {
    Loading,
    Failed(&'a str),
    Empty,
    Rows(Vec<RankedRow<'a, T>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedList<T> {
    records: Vec<T>,
    state: PageState,
    status: ListStatus,
}

impl<T> PagedList<T> {
    pub fn new(page_size: usize) -> Result<Self> {
        Ok(Self {
            records: Vec::new(),
            state: PageState::new(page_size)?,
            status: ListStatus::Loading,
        })
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub const fn page(&self) -> usize {
        self.state.page()
    }

    pub fn page_count(&self) -> usize {
        self.state.page_count(self.records.len())
    }

    pub const fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn begin_load(&mut self) {
        self.status = ListStatus::Loading;
    }

    /// Swaps in a freshly fetched record set and returns to page 1.
    pub fn replace(&mut self, records: Vec<T>) {
        self.records = records;
        self.state.page = 1;
        self.status = ListStatus::Ready;
    }

    /// Records a failed fetch. The previous records stay in memory.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = ListStatus::Failed(message.into());
    }

    pub fn reset_page(&mut self) {
        self.state.page = 1;
    }

    pub fn next(&mut self) -> bool {
        if !self.state.has_next(self.records.len()) {
            return false;
        }
        self.state.page += 1;
        true
    }

    pub fn prev(&mut self) -> bool {
        if self.state.page <= 1 {
            return false;
        }
        self.state.page -= 1;
        true
    }

    /// Rows for page `page`, ranked by absolute position. Out-of-range pages
    /// yield an empty vector.
    pub fn slice(&self, page: usize) -> Vec<RankedRow<'_, T>> {
        let Some(start) = page
            .checked_sub(1)
            .and_then(|index| index.checked_mul(self.state.page_size))
        else {
            return Vec::new();
        };
        self.records
            .iter()
            .enumerate()
            .skip(start)
            .take(self.state.page_size)
            .map(|(index, item)| RankedRow {
                rank: index + 1,
                item,
            })
            .collect()
    }

    pub fn view(&self) -> PageView<'_, T> {
        match &self.status {
            ListStatus::Loading => PageView::Loading,
            ListStatus::Failed(message) => PageView::Failed(message),
            ListStatus::Ready => {
                let rows = self.slice(self.state.page);
                if rows.is_empty() {
                    PageView::Empty
                } else {
                    PageView::Rows(rows)
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Allows at most one accepted gesture per cooldown window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollDebounce {
    cooldown: Duration,
    last_accepted: Option<Instant>,
}

impl ScrollDebounce {
    pub const fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_accepted: None,
        }
    }

    pub fn accept(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_accepted
            && now.saturating_duration_since(last) < self.cooldown
        {
            return false;
        }
        self.last_accepted = Some(now);
        true
    }
}
