//! Search state container
//!
//! [`SearchState`] changes only through [`SearchAction`]s applied by
//! [`reduce`]. [`SearchStore`] owns the state and serializes every dispatch,
//! so observers never see a half-applied action.

use serde::Serialize;
use std::sync::{Mutex, MutexGuard};

use crate::card::CardSummary;

/// Number of cards the catalog returns per search page
pub const CARDS_PER_PAGE: u64 = 175;

/// Minimum number of characters a trimmed query must have
pub const MIN_QUERY_LENGTH: usize = 3;

/// Message recorded when a query is too short to send
pub const QUERY_TOO_SHORT_MESSAGE: &str = "Search query must be at least 3 characters long";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Idle,
    Loading,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<CardSummary>,
    pub current_page: u32,
    pub total_count: u64,
    pub status: SearchStatus,
    pub error_message: Option<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            current_page: 1,
            total_count: 0,
            status: SearchStatus::Idle,
            error_message: None,
        }
    }
}

impl SearchState {
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(CARDS_PER_PAGE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchAction {
    SetQuery(String),
    BeginSearch,
    CompleteSearch {
        results: Vec<CardSummary>,
        total: u64,
        page: u32,
    },
    FailSearch(String),
    ClearSearch,
}

impl SearchAction {
    fn name(&self) -> &'static str {
        match self {
            SearchAction::SetQuery(_) => "SetQuery",
            SearchAction::BeginSearch => "BeginSearch",
            SearchAction::CompleteSearch { .. } => "CompleteSearch",
            SearchAction::FailSearch(_) => "FailSearch",
            SearchAction::ClearSearch => "ClearSearch",
        }
    }
}

/// Apply one action to the state
///
/// `CompleteSearch` and `FailSearch` expect a search in flight. When one
/// arrives without it (a response landing after `ClearSearch`, or a local
/// validation failure) it is still applied: the last write wins.
pub fn reduce(state: &mut SearchState, action: SearchAction) {
    if matches!(action, SearchAction::CompleteSearch { .. }) && !state.is_loading() {
        log::debug!(
            "applying {} while status is {:?}",
            action.name(),
            state.status
        );
    }

    match action {
        SearchAction::SetQuery(text) => {
            state.query = text;
        }
        SearchAction::BeginSearch => {
            state.status = SearchStatus::Loading;
            state.error_message = None;
        }
        SearchAction::CompleteSearch {
            results,
            total,
            page,
        } => {
            state.results = results;
            state.total_count = total;
            state.current_page = page.max(1);
            state.status = SearchStatus::Idle;
            state.error_message = None;
        }
        SearchAction::FailSearch(message) => {
            state.results = Vec::new();
            state.total_count = 0;
            state.current_page = 1;
            state.status = SearchStatus::Error;
            state.error_message = Some(message);
        }
        SearchAction::ClearSearch => {
            *state = SearchState::default();
        }
    }
}

type Listener = Box<dyn Fn(&SearchState) + Send + Sync>;

/// Single-writer owner of the search state
#[derive(Default)]
pub struct SearchStore {
    state: Mutex<SearchState>,
    listeners: Mutex<Vec<Listener>>,
}

impl std::fmt::Debug for SearchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchStore")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

impl SearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        // reduce has no panicking path between field writes
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Apply `action` and notify every listener with the resulting state
    pub fn dispatch(&self, action: SearchAction) {
        log::trace!("dispatch {}", action.name());
        let mut state = self.lock();
        reduce(&mut state, action);

        let listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for listener in listeners.iter() {
            listener(&state);
        }
    }

    /// Register a callback run after every dispatch
    ///
    /// Listeners run while the store is locked and must not dispatch.
    pub fn subscribe(&self, listener: impl Fn(&SearchState) + Send + Sync + 'static) {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Box::new(listener));
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SearchState {
        self.lock().clone()
    }

    /// Read the state without cloning it
    pub fn with_state<R>(&self, f: impl FnOnce(&SearchState) -> R) -> R {
        f(&self.lock())
    }
}

/// What the search view shows; exactly one at a time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum SearchView {
    /// Nothing searched yet
    Empty,
    Loading,
    /// Local input problem, shown next to the query field
    ValidationError { message: String },
    /// Remote failure, shown as a dismissible banner
    Error { message: String },
    NoResults { query: String },
    Results {
        cards: Vec<CardSummary>,
        page: u32,
        total_pages: u64,
        total_cards: u64,
    },
}

impl SearchView {
    pub fn from_state(state: &SearchState) -> Self {
        match state.status {
            SearchStatus::Loading => SearchView::Loading,
            SearchStatus::Error => {
                let message = state
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "An unknown error occurred".to_string());
                if message == QUERY_TOO_SHORT_MESSAGE {
                    SearchView::ValidationError { message }
                } else {
                    SearchView::Error { message }
                }
            }
            SearchStatus::Idle if state.results.is_empty() => {
                if state.query.is_empty() {
                    SearchView::Empty
                } else {
                    SearchView::NoResults {
                        query: state.query.clone(),
                    }
                }
            }
            SearchStatus::Idle => SearchView::Results {
                cards: state.results.clone(),
                page: state.current_page,
                total_pages: state.total_pages(),
                total_cards: state.total_count,
            },
        }
    }
}
