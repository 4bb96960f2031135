// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    ArtworkId, ArtworkPage, ArtworkRecord, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, PageRequest,
    Selection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub index: usize,
    pub size: usize,
    pub total: u64,
}

impl PageState {
    pub fn page_count(&self) -> u64 {
        if self.size == 0 {
            return 0;
        }
        self.total.div_ceil(self.size as u64)
    }

    pub fn last_index(&self) -> usize {
        usize::try_from(self.page_count().saturating_sub(1)).unwrap_or(usize::MAX)
    }

    /// One-based inclusive row range shown on this page, `None` when the
    /// page lies past the end of the catalog.
    pub fn row_range(&self) -> Option<(u64, u64)> {
        let first = (self.index as u64).saturating_mul(self.size as u64);
        if first >= self.total {
            return None;
        }
        let last = first.saturating_add(self.size as u64).min(self.total);
        Some((first + 1, last))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableState {
    pub page: PageState,
    pub records: Vec<ArtworkRecord>,
    pub selection: Selection,
    pub pending_quota: usize,
    pub loading: bool,
    in_flight: Option<u64>,
    next_request_id: u64,
}

impl Default for TableState {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableCommand {
    Reload,
    PageLoaded { request_id: u64, page: ArtworkPage },
    PageFailed { request_id: u64, error: String },
    ChangePage { index: usize, size: usize },
    NextPage,
    PrevPage,
    FirstPage,
    LastPage,
    CyclePageSize(isize),
    ToggleRow(ArtworkId),
    ToggleAllOnPage,
    SelectFirst(i64),
    ClearSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    FetchRequested(PageRequest),
    PageChanged { index: usize, size: usize },
    PageReplaced { records: usize, total: u64 },
    FetchFailed { request_id: u64, error: String },
    StaleResponseDiscarded { request_id: u64 },
    SelectionChanged { count: usize },
    QuotaChanged(usize),
}

impl TableState {
    pub fn with_page_size(size: usize) -> Self {
        Self {
            page: PageState {
                index: 0,
                size,
                total: 0,
            },
            records: Vec::new(),
            selection: Selection::default(),
            pending_quota: 0,
            loading: false,
            in_flight: None,
            next_request_id: 0,
        }
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn page_ids(&self) -> Vec<ArtworkId> {
        self.records.iter().map(|record| record.id).collect()
    }

    pub fn all_on_page_selected(&self) -> bool {
        !self.records.is_empty()
            && self
                .records
                .iter()
                .all(|record| self.selection.contains(record.id))
    }

    pub fn dispatch(&mut self, command: TableCommand) -> Vec<TableEvent> {
        match command {
            TableCommand::Reload => vec![self.begin_fetch()],
            TableCommand::PageLoaded { request_id, page } => self.apply_page(request_id, page),
            TableCommand::PageFailed { request_id, error } => {
                self.apply_failure(request_id, error)
            }
            TableCommand::ChangePage { index, size } => self.change_page(index, size),
            TableCommand::NextPage => {
                if self.page.index >= self.page.last_index() {
                    return Vec::new();
                }
                self.change_page(self.page.index + 1, self.page.size)
            }
            TableCommand::PrevPage => match self.page.index.checked_sub(1) {
                Some(index) => self.change_page(index, self.page.size),
                None => Vec::new(),
            },
            TableCommand::FirstPage => self.change_page(0, self.page.size),
            TableCommand::LastPage => self.change_page(self.page.last_index(), self.page.size),
            TableCommand::CyclePageSize(delta) => self.cycle_page_size(delta),
            TableCommand::ToggleRow(id) => {
                self.selection.toggle(id);
                vec![self.selection_changed()]
            }
            TableCommand::ToggleAllOnPage => self.toggle_all_on_page(),
            TableCommand::SelectFirst(count) => self.select_first(count),
            TableCommand::ClearSelection => {
                self.selection.clear();
                self.pending_quota = 0;
                vec![self.selection_changed(), TableEvent::QuotaChanged(0)]
            }
        }
    }

    fn begin_fetch(&mut self) -> TableEvent {
        self.next_request_id = self.next_request_id.saturating_add(1);
        self.in_flight = Some(self.next_request_id);
        self.loading = true;
        TableEvent::FetchRequested(PageRequest {
            request_id: self.next_request_id,
            index: self.page.index,
            size: self.page.size,
        })
    }

    fn apply_page(&mut self, request_id: u64, page: ArtworkPage) -> Vec<TableEvent> {
        if self.in_flight != Some(request_id) {
            return vec![TableEvent::StaleResponseDiscarded { request_id }];
        }
        self.in_flight = None;
        self.loading = false;

        self.records = page.records;
        self.page.total = page.total;
        let mut events = vec![TableEvent::PageReplaced {
            records: self.records.len(),
            total: self.page.total,
        }];

        if self.pending_quota > 0 {
            let added = self
                .selection
                .take_unselected(&self.page_ids(), self.pending_quota);
            if added > 0 {
                self.pending_quota -= added;
                events.push(self.selection_changed());
                events.push(TableEvent::QuotaChanged(self.pending_quota));
            }
        }
        events
    }

    fn apply_failure(&mut self, request_id: u64, error: String) -> Vec<TableEvent> {
        if self.in_flight != Some(request_id) {
            return vec![TableEvent::StaleResponseDiscarded { request_id }];
        }
        self.in_flight = None;
        self.loading = false;
        vec![TableEvent::FetchFailed { request_id, error }]
    }

    fn change_page(&mut self, index: usize, size: usize) -> Vec<TableEvent> {
        if size == 0 {
            return Vec::new();
        }
        let (next_index, next_size) = if size != self.page.size {
            (0, size)
        } else {
            (index, self.page.size)
        };
        if next_index == self.page.index && next_size == self.page.size {
            return Vec::new();
        }

        self.page.index = next_index;
        self.page.size = next_size;
        vec![
            TableEvent::PageChanged {
                index: next_index,
                size: next_size,
            },
            self.begin_fetch(),
        ]
    }

    fn cycle_page_size(&mut self, delta: isize) -> Vec<TableEvent> {
        let current = PAGE_SIZE_OPTIONS
            .iter()
            .position(|size| *size == self.page.size)
            .unwrap_or(0) as isize;
        let len = PAGE_SIZE_OPTIONS.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.change_page(self.page.index, PAGE_SIZE_OPTIONS[next])
    }

    fn toggle_all_on_page(&mut self) -> Vec<TableEvent> {
        let ids = self.page_ids();
        if ids.is_empty() {
            return Vec::new();
        }
        if self.selection.contains_all(&ids) {
            self.selection.remove_all(&ids);
        } else {
            self.selection.extend(&ids);
        }
        vec![self.selection_changed()]
    }

    fn select_first(&mut self, count: i64) -> Vec<TableEvent> {
        if count <= 0 {
            return Vec::new();
        }
        let target = usize::try_from(count).unwrap_or(usize::MAX);
        let added = self.selection.take_unselected(&self.page_ids(), target);
        self.pending_quota = target - added;
        vec![
            self.selection_changed(),
            TableEvent::QuotaChanged(self.pending_quota),
        ]
    }

    fn selection_changed(&self) -> TableEvent {
        TableEvent::SelectionChanged {
            count: self.selection.len(),
        }
    }
}

/// Parses the select-N input. Anything that is not a positive integer
/// yields `None`.
pub fn parse_select_count(input: &str) -> Option<i64> {
    input
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|count| *count > 0)
}

#[cfg(test)]
mod tests {
    use super::{PageState, TableCommand, TableEvent, TableState, parse_select_count};
    use crate::{ArtworkId, ArtworkPage, ArtworkRecord, PageRequest};
    use std::collections::{BTreeMap, BTreeSet};

    fn page_of(ids: &[i64], total: u64) -> ArtworkPage {
        ArtworkPage {
            records: ids
                .iter()
                .copied()
                .map(|id| ArtworkRecord::untitled(ArtworkId::new(id)))
                .collect(),
            total,
        }
    }

    fn request_id(events: &[TableEvent]) -> u64 {
        events
            .iter()
            .find_map(|event| match event {
                TableEvent::FetchRequested(request) => Some(request.request_id),
                _ => None,
            })
            .expect("fetch should be requested")
    }

    fn loaded(ids: &[i64], total: u64) -> TableState {
        let mut state = TableState::default();
        let events = state.dispatch(TableCommand::Reload);
        state.dispatch(TableCommand::PageLoaded {
            request_id: request_id(&events),
            page: page_of(ids, total),
        });
        state
    }

    fn selected(state: &TableState) -> Vec<i64> {
        state.selection.iter().map(ArtworkId::get).collect()
    }

    #[test]
    fn reload_marks_loading_and_requests_current_page() {
        let mut state = TableState::default();
        let events = state.dispatch(TableCommand::Reload);
        assert!(state.loading);
        assert_eq!(
            events,
            vec![TableEvent::FetchRequested(PageRequest {
                request_id: 1,
                index: 0,
                size: 5,
            })],
        );
        assert_eq!(state.in_flight(), Some(1));
    }

    #[test]
    fn loaded_page_replaces_records_and_total() {
        let state = loaded(&[1, 2, 3, 4, 5], 120);
        assert!(!state.loading);
        assert_eq!(state.records.len(), 5);
        assert_eq!(state.page.total, 120);
        assert_eq!(state.in_flight(), None);
    }

    #[test]
    fn toggles_leave_ids_toggled_an_odd_number_of_times() {
        let mut state = TableState::default();
        let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
        let mut seed: u64 = 0x2545_f491;
        for _ in 0..200 {
            seed = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let id = ((seed >> 33) % 12) as i64;
            *counts.entry(id).or_default() += 1;
            state.dispatch(TableCommand::ToggleRow(ArtworkId::new(id)));
        }

        let expected: BTreeSet<i64> = counts
            .into_iter()
            .filter(|(_, count)| count % 2 == 1)
            .map(|(id, _)| id)
            .collect();
        let actual: BTreeSet<i64> = selected(&state).into_iter().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn toggle_all_on_page_twice_restores_selection() {
        let mut state = loaded(&[1, 2, 3], 3);
        state.dispatch(TableCommand::ToggleRow(ArtworkId::new(40)));
        let before = state.selection.clone();

        state.dispatch(TableCommand::ToggleAllOnPage);
        assert!(state.all_on_page_selected());
        assert_eq!(selected(&state), vec![40, 1, 2, 3]);

        state.dispatch(TableCommand::ToggleAllOnPage);
        assert_eq!(state.selection, before);
    }

    #[test]
    fn toggle_all_on_partially_selected_page_selects_the_rest() {
        let mut state = loaded(&[1, 2, 3], 3);
        state.dispatch(TableCommand::ToggleRow(ArtworkId::new(2)));
        state.dispatch(TableCommand::ToggleRow(ArtworkId::new(77)));

        state.dispatch(TableCommand::ToggleAllOnPage);
        assert_eq!(selected(&state), vec![2, 77, 1, 3]);

        state.dispatch(TableCommand::ToggleAllOnPage);
        assert_eq!(selected(&state), vec![77]);
    }

    #[test]
    fn toggle_all_on_empty_page_is_a_no_op() {
        let mut state = loaded(&[], 0);
        assert!(state.dispatch(TableCommand::ToggleAllOnPage).is_empty());
        assert!(!state.all_on_page_selected());
    }

    #[test]
    fn select_first_spills_quota_into_next_page() {
        let mut state = loaded(&[1, 2, 3, 4, 5], 100);

        let events = state.dispatch(TableCommand::SelectFirst(7));
        assert_eq!(selected(&state), vec![1, 2, 3, 4, 5]);
        assert_eq!(state.pending_quota, 2);
        assert_eq!(
            events,
            vec![
                TableEvent::SelectionChanged { count: 5 },
                TableEvent::QuotaChanged(2),
            ],
        );

        let events = state.dispatch(TableCommand::NextPage);
        assert_eq!(state.page.index, 1);
        let events = state.dispatch(TableCommand::PageLoaded {
            request_id: request_id(&events),
            page: page_of(&[6, 7, 8, 9, 10], 100),
        });
        assert_eq!(selected(&state), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(state.pending_quota, 0);
        assert!(events.contains(&TableEvent::QuotaChanged(0)));
    }

    #[test]
    fn select_first_skips_already_selected_rows() {
        let mut state = loaded(&[1, 2, 3, 4], 4);
        state.dispatch(TableCommand::ToggleRow(ArtworkId::new(1)));
        state.dispatch(TableCommand::ToggleRow(ArtworkId::new(3)));

        state.dispatch(TableCommand::SelectFirst(1));
        assert_eq!(selected(&state), vec![1, 3, 2]);
        assert_eq!(state.pending_quota, 0);
    }

    #[test]
    fn select_first_non_positive_is_a_no_op() {
        let mut state = loaded(&[1, 2, 3], 30);
        state.dispatch(TableCommand::SelectFirst(5));
        let selection = state.selection.clone();
        let quota = state.pending_quota;

        assert!(state.dispatch(TableCommand::SelectFirst(0)).is_empty());
        assert!(state.dispatch(TableCommand::SelectFirst(-4)).is_empty());
        assert_eq!(state.selection, selection);
        assert_eq!(state.pending_quota, quota);
    }

    #[test]
    fn new_select_first_overwrites_pending_quota() {
        let mut state = loaded(&[1, 2], 50);
        state.dispatch(TableCommand::SelectFirst(10));
        assert_eq!(state.pending_quota, 8);

        state.dispatch(TableCommand::SelectFirst(3));
        assert_eq!(state.pending_quota, 3);
        assert_eq!(selected(&state), vec![1, 2]);
    }

    #[test]
    fn quota_never_exceeds_target_and_stays_pending_when_catalog_runs_dry() {
        let mut state = loaded(&[1, 2], 4);
        state.dispatch(TableCommand::SelectFirst(10));

        let events = state.dispatch(TableCommand::ChangePage { index: 1, size: 5 });
        state.dispatch(TableCommand::PageLoaded {
            request_id: request_id(&events),
            page: page_of(&[3, 4], 4),
        });
        let events = state.dispatch(TableCommand::PrevPage);
        state.dispatch(TableCommand::PageLoaded {
            request_id: request_id(&events),
            page: page_of(&[1, 2], 4),
        });

        assert_eq!(selected(&state), vec![1, 2, 3, 4]);
        assert_eq!(state.pending_quota, 6);
        assert!(state.selection.len() <= 10);
    }

    #[test]
    fn changing_page_size_resets_index() {
        let mut state = loaded(&[1, 2, 3, 4, 5], 100);
        state.dispatch(TableCommand::ChangePage { index: 3, size: 5 });
        assert_eq!(state.page.index, 3);
        assert_eq!(state.page.size, 5);

        let events = state.dispatch(TableCommand::ChangePage { index: 3, size: 10 });
        assert_eq!(state.page.index, 0);
        assert_eq!(state.page.size, 10);
        assert_eq!(events[0], TableEvent::PageChanged { index: 0, size: 10 });
    }

    #[test]
    fn changing_to_the_same_page_does_not_refetch() {
        let mut state = loaded(&[1, 2, 3, 4, 5], 100);
        assert!(
            state
                .dispatch(TableCommand::ChangePage { index: 0, size: 5 })
                .is_empty()
        );
        assert!(!state.loading);
    }

    #[test]
    fn paging_is_bounded_by_known_total() {
        let mut state = loaded(&[1, 2, 3, 4, 5], 12);
        assert!(state.dispatch(TableCommand::PrevPage).is_empty());

        state.dispatch(TableCommand::LastPage);
        assert_eq!(state.page.index, 2);
        assert!(state.dispatch(TableCommand::NextPage).is_empty());

        state.dispatch(TableCommand::FirstPage);
        assert_eq!(state.page.index, 0);
    }

    #[test]
    fn cycle_page_size_wraps_through_options() {
        let mut state = TableState::with_page_size(30);
        state.dispatch(TableCommand::CyclePageSize(1));
        assert_eq!(state.page.size, 3);
        state.dispatch(TableCommand::CyclePageSize(-1));
        assert_eq!(state.page.size, 30);
    }

    #[test]
    fn failure_keeps_previous_page_and_selection() {
        let mut state = loaded(&[1, 2, 3, 4, 5], 100);
        state.dispatch(TableCommand::ToggleRow(ArtworkId::new(2)));
        let records = state.records.clone();
        let selection = state.selection.clone();

        let events = state.dispatch(TableCommand::NextPage);
        let id = request_id(&events);
        let events = state.dispatch(TableCommand::PageFailed {
            request_id: id,
            error: "connection refused".to_owned(),
        });

        assert_eq!(
            events,
            vec![TableEvent::FetchFailed {
                request_id: id,
                error: "connection refused".to_owned(),
            }],
        );
        assert_eq!(state.records, records);
        assert_eq!(state.selection, selection);
        assert!(!state.loading);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut state = loaded(&[1, 2, 3, 4, 5], 100);
        let first = request_id(&state.dispatch(TableCommand::NextPage));
        let second = request_id(&state.dispatch(TableCommand::NextPage));

        let events = state.dispatch(TableCommand::PageLoaded {
            request_id: first,
            page: page_of(&[6, 7, 8, 9, 10], 100),
        });
        assert_eq!(
            events,
            vec![TableEvent::StaleResponseDiscarded { request_id: first }],
        );
        assert!(state.loading);
        assert_eq!(state.records[0].id, ArtworkId::new(1));

        state.dispatch(TableCommand::PageLoaded {
            request_id: second,
            page: page_of(&[11, 12, 13, 14, 15], 100),
        });
        assert!(!state.loading);
        assert_eq!(state.records[0].id, ArtworkId::new(11));
    }

    #[test]
    fn stale_failure_is_discarded() {
        let mut state = loaded(&[1, 2, 3, 4, 5], 100);
        let first = request_id(&state.dispatch(TableCommand::NextPage));
        let second = request_id(&state.dispatch(TableCommand::NextPage));

        let events = state.dispatch(TableCommand::PageFailed {
            request_id: first,
            error: "connection reset".to_owned(),
        });
        assert_eq!(
            events,
            vec![TableEvent::StaleResponseDiscarded { request_id: first }],
        );
        assert!(state.loading);
        assert_eq!(state.records[0].id, ArtworkId::new(1));

        let events = state.dispatch(TableCommand::PageFailed {
            request_id: second,
            error: "timed out".to_owned(),
        });
        assert_eq!(
            events,
            vec![TableEvent::FetchFailed {
                request_id: second,
                error: "timed out".to_owned(),
            }],
        );
        assert!(!state.loading);
        assert_eq!(state.records[0].id, ArtworkId::new(1));
    }

    #[test]
    fn clear_selection_drops_quota() {
        let mut state = loaded(&[1], 10);
        state.dispatch(TableCommand::SelectFirst(4));
        state.dispatch(TableCommand::ClearSelection);
        assert!(state.selection.is_empty());
        assert_eq!(state.pending_quota, 0);
    }

    #[test]
    fn row_range_clamps_to_total() {
        let page = PageState {
            index: 2,
            size: 5,
            total: 12,
        };
        assert_eq!(page.row_range(), Some((11, 12)));
        assert_eq!(page.page_count(), 3);

        let empty = PageState {
            index: 0,
            size: 5,
            total: 0,
        };
        assert_eq!(empty.row_range(), None);
        assert_eq!(empty.last_index(), 0);
    }

    #[test]
    fn parse_select_count_rejects_garbage() {
        assert_eq!(parse_select_count(" 7 "), Some(7));
        assert_eq!(parse_select_count("0"), None);
        assert_eq!(parse_select_count("-3"), None);
        assert_eq!(parse_select_count("seven"), None);
        assert_eq!(parse_select_count(""), None);
    }
}
