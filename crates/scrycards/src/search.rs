use crate::prelude::{eprintln, println, *};
use colored::Colorize;
use std::sync::Arc;

use scrycards_core::card::{format_price, CardSummary};
use scrycards_core::catalog::CatalogApi;
use scrycards_core::controller::SearchController;
use scrycards_core::route::Route;
use scrycards_core::search::{SearchState, SearchStore, SearchView, CARDS_PER_PAGE};

use crate::scryfall::ScryfallClient;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SearchOptions {
    /// Scryfall search query (e.g., "lightning bolt" or "t:goblin c:r")
    #[clap(env = "SCRYCARDS_QUERY")]
    pub query: String,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Open the Nth result (1-indexed, on this page) in the detail view
    #[arg(long, value_name = "N")]
    pub open: Option<usize>,
}

pub async fn run(options: SearchOptions, global: crate::Global) -> Result<()> {
    let client = ScryfallClient::new().map_err(Error::from)?;
    if global.verbose {
        println!("Scryfall API Base: {}", client.base_url());
        println!("Searching for {}...", options.query);
    }

    let store = Arc::new(SearchStore::new());
    let controller = SearchController::new(client, store);

    controller.edit_query(&options.query);
    controller.submit_search(&options.query, options.page).await;

    let state = controller.state();
    let view = SearchView::from_state(&state);

    match options.open {
        Some(position) => open_result(&controller, &view, position, options.json).await,
        None => {
            if options.json {
                println!("{}", format_search_json(&view)?);
            } else {
                print!("{}", format_search_text(&view, &state));
            }
            Ok(())
        }
    }
}

/// Navigate from a result row to its detail view
async fn open_result<C: CatalogApi>(
    controller: &SearchController<C>,
    view: &SearchView,
    position: usize,
    json: bool,
) -> Result<()> {
    let cards = match view {
        SearchView::Results { cards, .. } => cards,
        SearchView::ValidationError { message } | SearchView::Error { message } => {
            return Err(eyre!("{}", message));
        }
        _ => return Err(eyre!("No results to open")),
    };

    let card = position
        .checked_sub(1)
        .and_then(|idx| cards.get(idx))
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "--open must be between 1 and {}, got {}",
                cards.len(),
                position
            ))
        })?;

    // opening a result keeps the search state; only primary navigation clears it
    match controller.resolve_detail_target(card) {
        Ok(route) => {
            log::debug!("navigating to {route}");
            match route {
                Route::CardDetail(id) => {
                    crate::card::show_detail(controller, &id.to_string(), json).await
                }
                Route::Search => Ok(()),
            }
        }
        Err(err) => {
            eprintln!("{}", err.to_string().yellow());
            Ok(())
        }
    }
}

fn format_search_json(view: &SearchView) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Render whichever search view the state currently derives
fn format_search_text(view: &SearchView, state: &SearchState) -> String {
    let mut result = String::new();

    match view {
        SearchView::Empty => {
            result.push_str(&format!("\n{}\n\n", "Enter a query to search for cards.".yellow()));
        }
        SearchView::Loading => {
            result.push_str(&format!("\n{}\n\n", "Searching...".bright_black()));
        }
        SearchView::ValidationError { message } => {
            result.push_str(&format!("\n{}: {}\n\n", "Query".red().bold(), message.red()));
        }
        SearchView::Error { message } => {
            result.push_str(&format!("\n{}\n", "=".repeat(80).red()));
            result.push_str(&format!("{}\n", message.red().bold()));
            result.push_str(&format!("{}\n\n", "=".repeat(80).red()));
        }
        SearchView::NoResults { query } => {
            result.push_str(&format!(
                "\n{}\n\n",
                format!("No cards found for \"{query}\".").yellow()
            ));
        }
        SearchView::Results {
            cards,
            page,
            total_pages,
            total_cards,
        } => {
            result.push_str(&format_results_text(
                &state.query,
                cards,
                *page,
                *total_pages,
                *total_cards,
            ));
        }
    }

    result
}

pub(crate) fn format_results_text(
    query: &str,
    cards: &[CardSummary],
    page: u32,
    total_pages: u64,
    total_cards: u64,
) -> String {
    let mut result = String::new();

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!(
            "SEARCH \"{}\" ({} cards, Page {} of {})",
            query, total_cards, page, total_pages
        )
        .bright_cyan()
        .bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    for (idx, card) in cards.iter().enumerate() {
        let card_num = (u64::from(page.max(1)) - 1) * CARDS_PER_PAGE + idx as u64 + 1;
        result.push_str(&format!(
            "\n{} {}\n",
            format!("[{card_num}]").yellow().bold(),
            card.name.white().bold()
        ));

        result.push_str(&format!(
            "    {}: {} | {}: {} | {}: {}\n",
            "Set".green(),
            card.set_name.bright_white(),
            "Released".green(),
            card.released_at
                .as_deref()
                .unwrap_or("unknown")
                .bright_black(),
            "USD".green(),
            format_price("usd", card.prices.get("usd").and_then(|p| p.as_deref())).bright_yellow()
        ));

        let open = match card.secondary_id {
            Some(id) => format!("scrycards card {id}").cyan().to_string(),
            None => "not available on MTGO".bright_black().to_string(),
        };
        result.push_str(&format!("    {}: {}\n", "Open".green(), open));
    }

    // Navigation section
    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_yellow()));
    result.push_str(&format!("{}\n", "NAVIGATION".bright_yellow().bold()));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_yellow()));

    result.push_str(&format!(
        "\n{} {} {} {}\n",
        "Showing page".bright_white(),
        page.to_string().bright_cyan().bold(),
        "of".bright_white(),
        total_pages.to_string().bright_cyan().bold(),
    ));

    if u64::from(page) < total_pages {
        result.push_str(&format!(
            "{}: {}\n",
            "Next page".green(),
            format!("scrycards search \"{}\" --page {}", query, page + 1).cyan()
        ));
    }
    if page > 1 {
        result.push_str(&format!(
            "{}: {}\n",
            "Previous page".green(),
            format!("scrycards search \"{}\" --page {}", query, page - 1).cyan()
        ));
    }

    result.push('\n');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrycards_core::search::{reduce, SearchAction};
    use std::collections::BTreeMap;

    fn create_test_card(name: &str, mtgo_id: Option<u64>) -> CardSummary {
        CardSummary {
            id: format!("{name}-id"),
            name: name.to_string(),
            set_name: "Alpha".to_string(),
            set_code: Some("lea".to_string()),
            collector_number: Some("161".to_string()),
            released_at: Some("1993-08-05".to_string()),
            secondary_id: mtgo_id,
            image: None,
            prices: BTreeMap::from([("usd".to_string(), Some("450.00".to_string()))]),
        }
    }

    fn state_with_results(cards: Vec<CardSummary>, total: u64, page: u32) -> SearchState {
        let mut state = SearchState::default();
        reduce(&mut state, SearchAction::SetQuery("lightning".to_string()));
        reduce(&mut state, SearchAction::BeginSearch);
        reduce(
            &mut state,
            SearchAction::CompleteSearch {
                results: cards,
                total,
                page,
            },
        );
        state
    }

    #[test]
    fn test_format_results_first_page() {
        colored::control::set_override(false);
        let state = state_with_results(
            vec![
                create_test_card("Lightning Bolt", Some(37777)),
                create_test_card("Lightning Helix", None),
            ],
            350,
            1,
        );
        let view = SearchView::from_state(&state);

        let text = format_search_text(&view, &state);

        assert!(text.contains("SEARCH \"lightning\" (350 cards, Page 1 of 2)"));
        assert!(text.contains("[1] Lightning Bolt"));
        assert!(text.contains("[2] Lightning Helix"));
        assert!(text.contains("USD: $450.00"));
        assert!(text.contains("scrycards card 37777"));
        assert!(text.contains("not available on MTGO"));
        assert!(text.contains("scrycards search \"lightning\" --page 2"));
        assert!(!text.contains("Previous page"));
    }

    #[test]
    fn test_format_results_numbering_on_later_page() {
        colored::control::set_override(false);
        let state = state_with_results(vec![create_test_card("Lightning Bolt", None)], 351, 3);
        let view = SearchView::from_state(&state);

        let text = format_search_text(&view, &state);

        assert!(text.contains("[351] Lightning Bolt"));
        assert!(text.contains("Page 3 of 3"));
        assert!(text.contains("--page 2"));
        assert!(!text.contains("Next page"));
    }

    #[test]
    fn test_format_no_results() {
        colored::control::set_override(false);
        let state = state_with_results(Vec::new(), 0, 1);
        let view = SearchView::from_state(&state);

        let text = format_search_text(&view, &state);

        assert!(text.contains("No cards found for \"lightning\"."));
    }

    #[test]
    fn test_format_validation_error() {
        colored::control::set_override(false);
        let mut state = SearchState::default();
        reduce(
            &mut state,
            SearchAction::FailSearch(
                scrycards_core::search::QUERY_TOO_SHORT_MESSAGE.to_string(),
            ),
        );
        let view = SearchView::from_state(&state);

        let text = format_search_text(&view, &state);

        assert!(text.contains("Query: Search query must be at least 3 characters long"));
    }

    #[test]
    fn test_format_banner_error() {
        colored::control::set_override(false);
        let mut state = SearchState::default();
        reduce(
            &mut state,
            SearchAction::FailSearch("Scryfall API Error: Service unavailable".to_string()),
        );
        let view = SearchView::from_state(&state);

        let text = format_search_text(&view, &state);

        assert!(text.contains("Scryfall API Error: Service unavailable"));
        assert!(!text.contains("Query:"));
    }

    #[test]
    fn test_format_search_json() {
        let state = state_with_results(vec![create_test_card("Lightning Bolt", Some(1))], 1, 1);
        let view = SearchView::from_state(&state);

        let json = format_search_json(&view).unwrap();

        assert!(json.contains("\"view\": \"results\""));
        assert!(json.contains("\"total_pages\": 1"));
        assert!(json.contains("\"name\": \"Lightning Bolt\""));
    }

    struct FixedCatalog {
        cards: Vec<CardSummary>,
    }

    impl CatalogApi for FixedCatalog {
        async fn search_cards(
            &self,
            _query: &str,
            _page: u32,
        ) -> Result<scrycards_core::card::CardPage, scrycards_core::catalog::CatalogError> {
            Ok(scrycards_core::card::CardPage {
                cards: self.cards.clone(),
                total_cards: self.cards.len() as u64,
                has_more: false,
                next_page: None,
            })
        }

        async fn get_card_by_secondary_id(
            &self,
            _id: u64,
        ) -> Result<scrycards_core::card::CardDetail, scrycards_core::catalog::CatalogError> {
            Err(scrycards_core::catalog::CatalogError::new(
                "Scryfall API Error: No card found",
            ))
        }

        async fn get_all_printings(
            &self,
            _name: &str,
        ) -> Result<Vec<scrycards_core::card::CardDetail>, scrycards_core::catalog::CatalogError>
        {
            Ok(Vec::new())
        }

        async fn check_connectivity(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_open_result_keeps_search_state() {
        let controller = SearchController::new(
            FixedCatalog {
                cards: vec![create_test_card("Lightning Bolt", Some(37777))],
            },
            Arc::new(SearchStore::new()),
        );
        controller.submit_search("Lightning Bolt", 1).await;
        let view = SearchView::from_state(&controller.state());

        open_result(&controller, &view, 1, true).await.unwrap();

        let state = controller.state();
        assert_eq!(state.query, "Lightning Bolt");
        assert_eq!(state.results.len(), 1);
        assert_eq!(SearchView::from_state(&state), view);
    }

    #[tokio::test]
    async fn test_open_result_out_of_range() {
        let controller = SearchController::new(
            FixedCatalog {
                cards: vec![create_test_card("Lightning Bolt", Some(37777))],
            },
            Arc::new(SearchStore::new()),
        );
        controller.submit_search("Lightning Bolt", 1).await;
        let view = SearchView::from_state(&controller.state());

        let err = open_result(&controller, &view, 2, true).await.unwrap_err();

        assert!(err.to_string().contains("--open must be between 1 and 1"));
        assert_eq!(controller.state().results.len(), 1);
    }
}
