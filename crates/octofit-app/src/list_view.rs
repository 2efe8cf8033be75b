// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Fetched, NO_MATCHES_MESSAGE, Record, ResourceKind, ResourceSpec, ResponseShape};
use time::OffsetDateTime;

/// Generation stamp handed out by [`ListView::begin_load`]. Only the most
/// recent ticket may apply its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(Fetched),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadApplied {
    Applied,
    Stale,
    Disposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoRecords(&'static str),
    NoMatches,
}

impl EmptyState {
    pub const fn message(self) -> &'static str {
        match self {
            Self::NoRecords(message) => message,
            Self::NoMatches => NO_MATCHES_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleRow<'a> {
    /// Position within the visible subset.
    pub position: usize,
    pub record: &'a Record,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListView {
    spec: ResourceSpec,
    records: Vec<Record>,
    haystacks: Vec<String>,
    filter: String,
    visible: Vec<usize>,
    selection: Option<Record>,
    loading: bool,
    error: Option<String>,
    notice: Option<String>,
    generation: u64,
    loaded_at: Option<OffsetDateTime>,
    disposed: bool,
}

impl ListView {
    pub fn new(spec: ResourceSpec) -> Self {
        Self {
            spec,
            records: Vec::new(),
            haystacks: Vec::new(),
            filter: String::new(),
            visible: Vec::new(),
            selection: None,
            loading: false,
            error: None,
            notice: None,
            generation: 0,
            loaded_at: None,
            disposed: false,
        }
    }

    pub fn for_resource(kind: ResourceKind) -> Self {
        Self::new(kind.spec())
    }

    pub fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn total_count(&self) -> usize {
        self.records.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn loaded_at(&self) -> Option<OffsetDateTime> {
        self.loaded_at
    }

    pub fn selection(&self) -> Option<&Record> {
        self.selection.as_ref()
    }

    /// True until the first load has been started.
    pub fn needs_initial_load(&self) -> bool {
        self.generation == 0 && !self.disposed
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation = self.generation.saturating_add(1);
        self.loading = true;
        self.error = None;
        LoadTicket(self.generation)
    }

    pub fn finish_load(&mut self, ticket: LoadTicket, outcome: LoadOutcome) -> LoadApplied {
        if self.disposed {
            return LoadApplied::Disposed;
        }
        if ticket.0 != self.generation {
            return LoadApplied::Stale;
        }

        self.loading = false;
        match outcome {
            LoadOutcome::Loaded(fetched) => {
                self.notice = match fetched.shape {
                    ResponseShape::Unrecognized => Some(format!(
                        "unexpected response shape from {}; showing no records",
                        self.spec.path
                    )),
                    ResponseShape::Array | ResponseShape::Paginated => None,
                };
                self.replace_records(fetched.records);
                self.error = None;
                self.loaded_at = Some(OffsetDateTime::now_utc());
            }
            LoadOutcome::Failed(message) => {
                self.error = Some(message);
            }
        }
        LoadApplied::Applied
    }

    pub fn dispose(&mut self) {
        self.disposed = true;
        self.loading = false;
    }

    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.filter = query.into();
        self.recompute_visible();
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(String::new());
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = VisibleRow<'_>> + '_ {
        self.visible
            .iter()
            .enumerate()
            .filter_map(|(position, index)| {
                self.records
                    .get(*index)
                    .map(|record| VisibleRow { position, record })
            })
    }

    pub fn visible_record(&self, row: usize) -> Option<&Record> {
        self.visible
            .get(row)
            .and_then(|index| self.records.get(*index))
    }

    pub fn label_for_row(&self, row: usize) -> Option<String> {
        self.visible_record(row)
            .map(|record| record.label(self.spec.label_fields, self.spec.singular, row))
    }

    pub fn select(&mut self, row: usize) -> bool {
        match self.visible_record(row).cloned() {
            Some(record) => {
                self.selection = Some(record);
                true
            }
            None => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.selection = None;
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.loading {
            return None;
        }
        if self.records.is_empty() {
            if self.error.is_none() {
                return Some(EmptyState::NoRecords(self.spec.empty_message));
            }
            return None;
        }
        if self.visible.is_empty() {
            return Some(EmptyState::NoMatches);
        }
        None
    }

    pub fn footer(&self) -> String {
        format!(
            "Showing {} of {} {}",
            self.visible.len(),
            self.records.len(),
            self.spec.plural
        )
    }

    pub fn detail_text(&self) -> Option<String> {
        self.selection.as_ref().map(Record::pretty)
    }

    fn replace_records(&mut self, records: Vec<Record>) {
        self.haystacks = records
            .iter()
            .map(|record| record.search_text().to_lowercase())
            .collect();
        self.records = records;
        self.recompute_visible();
    }

    fn recompute_visible(&mut self) {
        let query = self.filter.trim().to_lowercase();
        self.visible = if query.is_empty() {
            (0..self.records.len()).collect()
        } else {
            self.haystacks
                .iter()
                .enumerate()
                .filter(|(_, haystack)| haystack.contains(&query))
                .map(|(index, _)| index)
                .collect()
        };
    }
}
