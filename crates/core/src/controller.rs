//! Search controller
//!
//! Mediates between user intent and the [`SearchStore`] / [`CatalogApi`]:
//! validates queries before they reach the catalog, turns every client
//! failure into store state, and derives navigation targets.

use serde::Serialize;
use std::sync::Arc;

use crate::card::{CardDetail, CardSummary};
use crate::catalog::CatalogApi;
use crate::route::Route;
use crate::search::{
    SearchAction, SearchState, SearchStore, MIN_QUERY_LENGTH, QUERY_TOO_SHORT_MESSAGE,
};

/// A result cannot be opened in the detail view
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("This card is not available on MTGO: {name}")]
    UnsupportedCard { id: String, name: String },
}

/// Outcome of loading the detail view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DetailView {
    Loaded { card: CardDetail },
    /// Informational "card not found" state, not an error banner
    NotFound { id: String, reason: String },
}

/// Map a search result to its detail route
pub fn resolve_detail_target(card: &CardSummary) -> Result<Route, NavigationError> {
    card.secondary_id
        .map(Route::CardDetail)
        .ok_or_else(|| NavigationError::UnsupportedCard {
            id: card.id.clone(),
            name: card.name.clone(),
        })
}

/// Whether a query is long enough to send to the catalog
pub fn validate_query(query: &str) -> Result<&str, &'static str> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_LENGTH {
        return Err(QUERY_TOO_SHORT_MESSAGE);
    }
    Ok(trimmed)
}

pub struct SearchController<C> {
    client: C,
    store: Arc<SearchStore>,
}

impl<C: CatalogApi> SearchController<C> {
    pub fn new(client: C, store: Arc<SearchStore>) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn store(&self) -> &Arc<SearchStore> {
        &self.store
    }

    pub fn state(&self) -> SearchState {
        self.store.snapshot()
    }

    /// Record what the user typed without searching
    pub fn edit_query(&self, text: &str) {
        self.store.dispatch(SearchAction::SetQuery(text.to_string()));
    }

    /// Run a search for `query` and land the outcome in the store
    ///
    /// Queries shorter than three characters after trimming fail locally and
    /// never reach the client. On success the trimmed query is stored.
    pub async fn submit_search(&self, query: &str, page: u32) {
        let trimmed = match validate_query(query) {
            Ok(trimmed) => trimmed,
            Err(message) => {
                log::debug!("rejected query {:?}: {}", query, message);
                self.store.dispatch(SearchAction::FailSearch(message.to_string()));
                return;
            }
        };

        let page = page.max(1);
        self.store.dispatch(SearchAction::BeginSearch);

        match self.client.search_cards(trimmed, page).await {
            Ok(card_page) => {
                log::debug!(
                    "search {:?} page {} returned {} of {} cards",
                    trimmed,
                    page,
                    card_page.cards.len(),
                    card_page.total_cards
                );
                // query first, so results never pair with the previous query
                self.store.dispatch(SearchAction::SetQuery(trimmed.to_string()));
                self.store.dispatch(SearchAction::CompleteSearch {
                    results: card_page.cards,
                    total: card_page.total_cards,
                    page,
                });
            }
            Err(err) => {
                log::warn!("search {:?} failed: {}", trimmed, err);
                self.store.dispatch(SearchAction::FailSearch(err.message));
            }
        }
    }

    /// Re-run the stored query for another page
    pub async fn change_page(&self, page: u32) {
        let query = self.store.with_state(|state| state.query.clone());
        self.submit_search(&query, page).await;
    }

    pub fn resolve_detail_target(&self, card: &CardSummary) -> Result<Route, NavigationError> {
        resolve_detail_target(card)
    }

    /// Leave through primary navigation; the search view starts empty again
    pub fn navigate_primary(&self, target: Route) -> Route {
        self.store.dispatch(SearchAction::ClearSearch);
        target
    }

    /// Load a card and its printings for the detail route
    ///
    /// A failed lookup becomes [`DetailView::NotFound`]. A failed printings
    /// lookup keeps the card with no printings.
    pub async fn load_card_detail(&self, raw_id: &str) -> DetailView {
        let raw_id = raw_id.trim();
        if raw_id.is_empty() {
            return DetailView::NotFound {
                id: String::new(),
                reason: "No card ID provided".to_string(),
            };
        }

        let Ok(id) = raw_id.parse::<u64>() else {
            return DetailView::NotFound {
                id: raw_id.to_string(),
                reason: format!("Invalid card ID: {raw_id}"),
            };
        };

        let mut card = match self.client.get_card_by_secondary_id(id).await {
            Ok(card) => card,
            Err(err) => {
                log::info!("card {} not found: {}", id, err);
                return DetailView::NotFound {
                    id: raw_id.to_string(),
                    reason: err.message,
                };
            }
        };

        match self.client.get_all_printings(card.name()).await {
            Ok(printings) => {
                card.printings = printings.into_iter().map(|p| p.summary).collect();
            }
            Err(err) => {
                log::warn!("printings of {:?} unavailable: {}", card.name(), err);
            }
        }

        DetailView::Loaded { card }
    }

    pub async fn check_connectivity(&self) -> bool {
        self.client.check_connectivity().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{CardPage, CardSummary};
    use crate::catalog::CatalogError;
    use crate::search::{SearchStatus, SearchView};
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    fn summary(id: &str, name: &str, mtgo_id: Option<u64>) -> CardSummary {
        CardSummary {
            id: id.to_string(),
            name: name.to_string(),
            set_name: "Magic 2011".to_string(),
            set_code: Some("m11".to_string()),
            collector_number: Some("149".to_string()),
            released_at: None,
            secondary_id: mtgo_id,
            image: None,
            prices: BTreeMap::from([("usd".to_string(), Some("1.95".to_string()))]),
        }
    }

    fn detail(id: &str, name: &str, mtgo_id: Option<u64>) -> CardDetail {
        CardDetail {
            summary: summary(id, name, mtgo_id),
            mana_cost: Some("{R}".to_string()),
            type_line: Some("Instant".to_string()),
            oracle_text: Some("Lightning Bolt deals 3 damage to any target.".to_string()),
            power: None,
            toughness: None,
            flavor_text: None,
            printings: Vec::new(),
        }
    }

    fn page_of(cards: Vec<CardSummary>, total: u64) -> CardPage {
        CardPage {
            cards,
            total_cards: total,
            has_more: false,
            next_page: None,
        }
    }

    /// In-memory catalog that records every search call
    #[derive(Default)]
    struct FakeCatalog {
        search_result: Option<Result<CardPage, CatalogError>>,
        card_result: Option<Result<CardDetail, CatalogError>>,
        printings_result: Option<Result<Vec<CardDetail>, CatalogError>>,
        gate: Option<Arc<Notify>>,
        searches: Mutex<Vec<(String, u32)>>,
        card_lookups: Mutex<Vec<u64>>,
    }

    impl FakeCatalog {
        fn searching(result: Result<CardPage, CatalogError>) -> Self {
            Self {
                search_result: Some(result),
                ..Default::default()
            }
        }

        fn searches(&self) -> Vec<(String, u32)> {
            self.searches.lock().unwrap().clone()
        }
    }

    impl CatalogApi for FakeCatalog {
        async fn search_cards(&self, query: &str, page: u32) -> Result<CardPage, CatalogError> {
            self.searches.lock().unwrap().push((query.to_string(), page));
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.search_result
                .clone()
                .unwrap_or_else(|| Ok(CardPage::empty()))
        }

        async fn get_card_by_secondary_id(&self, id: u64) -> Result<CardDetail, CatalogError> {
            self.card_lookups.lock().unwrap().push(id);
            self.card_result
                .clone()
                .unwrap_or_else(|| Err(CatalogError::new("Scryfall API Error: not found")))
        }

        async fn get_all_printings(&self, _name: &str) -> Result<Vec<CardDetail>, CatalogError> {
            self.printings_result.clone().unwrap_or_else(|| Ok(Vec::new()))
        }

        async fn check_connectivity(&self) -> bool {
            true
        }
    }

    fn controller(fake: FakeCatalog) -> SearchController<FakeCatalog> {
        SearchController::new(fake, Arc::new(SearchStore::new()))
    }

    #[tokio::test]
    async fn test_lightning_bolt_single_result() {
        let ctl = controller(FakeCatalog::searching(Ok(page_of(
            vec![summary("1", "Lightning Bolt", Some(37777))],
            1,
        ))));

        ctl.submit_search("Lightning Bolt", 1).await;

        let state = ctl.state();
        assert_eq!(state.results.len(), 1);
        assert_eq!(state.total_count, 1);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.status, SearchStatus::Idle);
        assert_eq!(state.query, "Lightning Bolt");
        assert_eq!(ctl.client().searches(), vec![("Lightning Bolt".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_short_query_never_reaches_client() {
        let ctl = controller(FakeCatalog::default());

        ctl.submit_search("xy", 1).await;

        let state = ctl.state();
        assert_eq!(state.status, SearchStatus::Error);
        assert!(state.error_message.unwrap().contains("3 characters"));
        assert!(ctl.client().searches().is_empty());
    }

    #[tokio::test]
    async fn test_short_queries_after_trimming() {
        let ctl = controller(FakeCatalog::default());

        for query in ["", "   ", "a", "ab", "  ab  ", "\tx\n"] {
            ctl.submit_search(query, 1).await;
            let state = ctl.state();
            assert_eq!(state.status, SearchStatus::Error, "query {query:?}");
            assert_eq!(state.error_message.as_deref(), Some(QUERY_TOO_SHORT_MESSAGE));
        }

        assert!(ctl.client().searches().is_empty());
    }

    #[tokio::test]
    async fn test_query_is_trimmed_before_sending_and_storing() {
        let ctl = controller(FakeCatalog::searching(Ok(page_of(
            vec![summary("1", "Lightning Bolt", Some(37777))],
            1,
        ))));

        ctl.submit_search("  bolt  ", 1).await;

        assert_eq!(ctl.client().searches(), vec![("bolt".to_string(), 1)]);
        assert_eq!(ctl.state().query, "bolt");
    }

    #[tokio::test]
    async fn test_not_found_is_empty_success() {
        let ctl = controller(FakeCatalog::searching(Ok(CardPage::empty())));

        ctl.submit_search("Zzzznotacard", 1).await;

        let state = ctl.state();
        assert!(state.results.is_empty());
        assert_eq!(state.total_count, 0);
        assert_eq!(state.status, SearchStatus::Idle);
        assert!(state.error_message.is_none());
    }

    #[tokio::test]
    async fn test_client_failure_sets_error_state() {
        let ctl = controller(FakeCatalog::searching(Err(CatalogError::new(
            "Scryfall API Error: All of your terms were ignored.",
        ))));

        ctl.submit_search("Lightning Bolt", 4).await;

        let state = ctl.state();
        assert_eq!(state.status, SearchStatus::Error);
        assert_eq!(
            state.error_message.as_deref(),
            Some("Scryfall API Error: All of your terms were ignored.")
        );
        assert!(state.results.is_empty());
        assert_eq!(state.total_count, 0);
        assert_eq!(state.current_page, 1);
    }

    #[tokio::test]
    async fn test_change_page_reuses_stored_query() {
        let ctl = controller(FakeCatalog::searching(Ok(page_of(
            vec![summary("1", "Lightning Bolt", Some(37777))],
            300,
        ))));

        ctl.submit_search("Bolt", 1).await;
        ctl.change_page(2).await;

        assert_eq!(
            ctl.client().searches(),
            vec![("Bolt".to_string(), 1), ("Bolt".to_string(), 2)]
        );
        let state = ctl.state();
        assert_eq!(state.query, "Bolt");
        assert_eq!(state.current_page, 2);
    }

    #[tokio::test]
    async fn test_page_zero_is_treated_as_first_page() {
        let ctl = controller(FakeCatalog::searching(Ok(CardPage::empty())));

        ctl.submit_search("Bolt", 0).await;

        assert_eq!(ctl.client().searches(), vec![("Bolt".to_string(), 1)]);
        assert_eq!(ctl.state().current_page, 1);
    }

    #[tokio::test]
    async fn test_store_is_loading_while_request_in_flight() {
        let gate = Arc::new(Notify::new());
        let fake = FakeCatalog {
            gate: Some(gate.clone()),
            ..FakeCatalog::searching(Ok(CardPage::empty()))
        };
        let ctl = controller(fake);

        let observe = async {
            tokio::task::yield_now().await;
            let state = ctl.state();
            gate.notify_one();
            state
        };
        let (_, during) = tokio::join!(ctl.submit_search("Bolt", 1), observe);

        assert_eq!(during.status, SearchStatus::Loading);
        assert!(during.error_message.is_none());
        assert_eq!(ctl.state().status, SearchStatus::Idle);
    }

    #[tokio::test]
    async fn test_late_response_after_navigation_lands_in_store() {
        let gate = Arc::new(Notify::new());
        let fake = FakeCatalog {
            gate: Some(gate.clone()),
            ..FakeCatalog::searching(Ok(page_of(vec![summary("1", "Bolt", None)], 1)))
        };
        let ctl = controller(fake);

        let leave = async {
            tokio::task::yield_now().await;
            let route = ctl.navigate_primary(Route::Search);
            let cleared = ctl.state();
            gate.notify_one();
            (route, cleared)
        };
        let (_, (route, cleared)) = tokio::join!(ctl.submit_search("Bolt", 1), leave);

        assert_eq!(route, Route::Search);
        assert_eq!(cleared, SearchState::default());
        assert_eq!(ctl.state().results.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_search_never_shows_empty_view() {
        let ctl = controller(FakeCatalog::searching(Ok(CardPage::empty())));
        let views = Arc::new(Mutex::new(Vec::new()));
        let recorder = views.clone();
        ctl.store().subscribe(move |state| {
            recorder.lock().unwrap().push(SearchView::from_state(state));
        });

        ctl.submit_search("Zzzznotacard", 1).await;

        let views = views.lock().unwrap().clone();
        assert!(!views.contains(&SearchView::Empty), "{views:?}");
        assert_eq!(
            views.last(),
            Some(&SearchView::NoResults {
                query: "Zzzznotacard".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_navigate_primary_clears_state() {
        let ctl = controller(FakeCatalog::searching(Ok(page_of(
            vec![summary("1", "Lightning Bolt", Some(37777))],
            1,
        ))));
        ctl.submit_search("Lightning Bolt", 1).await;

        let route = ctl.navigate_primary(Route::Search);

        assert_eq!(route, Route::Search);
        assert_eq!(ctl.state(), SearchState::default());
    }

    #[test]
    fn test_resolve_detail_target() {
        let card = summary("1", "Lightning Bolt", Some(37777));

        assert_eq!(resolve_detail_target(&card), Ok(Route::CardDetail(37777)));
    }

    #[test]
    fn test_resolve_detail_target_without_secondary_id() {
        let card = summary("1", "Paper Only Card", None);

        let err = resolve_detail_target(&card).unwrap_err();
        assert_eq!(
            err,
            NavigationError::UnsupportedCard {
                id: "1".to_string(),
                name: "Paper Only Card".to_string()
            }
        );
        assert!(err.to_string().contains("not available on MTGO"));
    }

    #[test]
    fn test_validate_query_counts_characters() {
        assert_eq!(validate_query(" Æth "), Ok("Æth"));
        assert!(validate_query("Æt").is_err());
    }

    #[tokio::test]
    async fn test_load_card_detail_with_printings() {
        let fake = FakeCatalog {
            card_result: Some(Ok(detail("1", "Lightning Bolt", Some(37777)))),
            printings_result: Some(Ok(vec![
                detail("a", "Lightning Bolt", Some(100)),
                detail("b", "Lightning Bolt", None),
            ])),
            ..Default::default()
        };
        let ctl = controller(fake);

        match ctl.load_card_detail("37777").await {
            DetailView::Loaded { card } => {
                assert_eq!(card.name(), "Lightning Bolt");
                assert_eq!(card.printings.len(), 2);
                assert_eq!(card.printings[0].secondary_id, Some(100));
            }
            other => panic!("unexpected view: {other:?}"),
        }
        assert_eq!(*ctl.client().card_lookups.lock().unwrap(), vec![37777]);
    }

    #[tokio::test]
    async fn test_load_card_detail_lookup_failure_is_not_found() {
        let ctl = controller(FakeCatalog::default());

        assert_eq!(
            ctl.load_card_detail("42").await,
            DetailView::NotFound {
                id: "42".to_string(),
                reason: "Scryfall API Error: not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_load_card_detail_printings_failure_keeps_card() {
        let fake = FakeCatalog {
            card_result: Some(Ok(detail("1", "Lightning Bolt", Some(37777)))),
            printings_result: Some(Err(CatalogError::new("Scryfall API Error: timeout"))),
            ..Default::default()
        };
        let ctl = controller(fake);

        match ctl.load_card_detail("37777").await {
            DetailView::Loaded { card } => assert!(card.printings.is_empty()),
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_card_detail_rejects_bad_ids() {
        let ctl = controller(FakeCatalog::default());

        assert!(matches!(
            ctl.load_card_detail("").await,
            DetailView::NotFound { reason, .. } if reason == "No card ID provided"
        ));
        assert!(matches!(
            ctl.load_card_detail("abc").await,
            DetailView::NotFound { reason, .. } if reason == "Invalid card ID: abc"
        ));
        assert!(ctl.client().card_lookups.lock().unwrap().is_empty());
    }
}
