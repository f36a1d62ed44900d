//! Catalog API contract and response normalization
//!
//! The HTTP client lives in the `scrycards` crate; it hands raw status codes
//! and bodies to the functions here, which decide what is a result, what is
//! an empty result, and what is a [`CatalogError`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use crate::card::{
    to_detail, to_summary, transform_card_list, CardCollection, CardDetail, CardIdentifier,
    CardPage, ScryfallCard, ScryfallCollection, ScryfallList,
};

/// Base URL of the public Scryfall API
pub const SCRYFALL_API_BASE: &str = "https://api.scryfall.com";

/// Connect and response timeout applied to every catalog request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const ERROR_PREFIX: &str = "Scryfall API Error";

/// Error object returned by the Scryfall API on failure
#[derive(Debug, Deserialize, Clone)]
pub struct ScryfallError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

/// Any failure of a catalog call
///
/// Transport failures, timeouts, non-2xx statuses and undecodable bodies all
/// collapse into this one kind. The message is never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CatalogError {
    pub message: String,
}

impl CatalogError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            return Self {
                message: format!("{ERROR_PREFIX}: unknown error"),
            };
        }
        Self { message }
    }

    /// Build an error from a non-success HTTP response
    ///
    /// Uses the payload's `details` field when present, otherwise a generic
    /// message naming the status code.
    pub fn from_response(status: u16, body: &str) -> Self {
        let details = error_details(body)
            .unwrap_or_else(|| format!("Request failed with status code {status}"));
        Self::new(format!("{ERROR_PREFIX}: {details}"))
    }

    /// Build an error from a failure that produced no HTTP response
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::new(format!("{ERROR_PREFIX}: {err}"))
    }

    /// Build an error from a success response whose body could not be decoded
    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::new(format!("{ERROR_PREFIX}: malformed response: {err}"))
    }
}

/// Extract the `details` field from a Scryfall error payload
pub fn error_details(body: &str) -> Option<String> {
    serde_json::from_str::<ScryfallError>(body)
        .ok()
        .and_then(|err| err.details)
        .filter(|details| !details.trim().is_empty())
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Decode a response body, mapping any failure to a [`CatalogError`]
pub fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, CatalogError> {
    if !is_success(status) {
        return Err(CatalogError::from_response(status, body));
    }

    serde_json::from_str(body).map_err(CatalogError::decode)
}

/// Normalize a `/cards/search` response
///
/// A 404 means "no cards matched" and becomes an empty page, not an error.
pub fn normalize_search(status: u16, body: &str) -> Result<CardPage, CatalogError> {
    if status == 404 {
        return Ok(CardPage::empty());
    }

    let list: ScryfallList<ScryfallCard> = parse_response(status, body)?;
    Ok(transform_card_list(list))
}

/// Normalize a printings search response; a 404 yields no printings
pub fn normalize_printings(status: u16, body: &str) -> Result<Vec<CardDetail>, CatalogError> {
    if status == 404 {
        return Ok(Vec::new());
    }

    let list: ScryfallList<ScryfallCard> = parse_response(status, body)?;
    Ok(list.data.into_iter().map(to_detail).collect())
}

/// Normalize a single card lookup; every failure is an error here
pub fn normalize_card(status: u16, body: &str) -> Result<CardDetail, CatalogError> {
    parse_response::<ScryfallCard>(status, body).map(to_detail)
}

/// Most identifiers `/cards/collection` accepts in one request
pub const COLLECTION_LIMIT: usize = 75;

/// Request body for `/cards/collection`
#[derive(Debug, serde::Serialize, Clone, PartialEq)]
pub struct CollectionRequest<'a> {
    pub identifiers: &'a [CardIdentifier],
}

/// Check an identifier batch before sending it
pub fn collection_request(
    identifiers: &[CardIdentifier],
) -> Result<CollectionRequest<'_>, CatalogError> {
    if identifiers.is_empty() {
        return Err(CatalogError::new(format!(
            "{ERROR_PREFIX}: at least one card identifier is required"
        )));
    }
    if identifiers.len() > COLLECTION_LIMIT {
        return Err(CatalogError::new(format!(
            "{ERROR_PREFIX}: at most {COLLECTION_LIMIT} card identifiers per request, got {}",
            identifiers.len()
        )));
    }
    Ok(CollectionRequest { identifiers })
}

/// Normalize a `/cards/collection` response
pub fn normalize_collection(status: u16, body: &str) -> Result<CardCollection, CatalogError> {
    let collection: ScryfallCollection = parse_response(status, body)?;
    Ok(CardCollection {
        cards: collection.data.iter().map(to_summary).collect(),
        not_found: collection.not_found,
    })
}

/// Strategy for collapsing duplicate results
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueMode {
    Cards,
    Art,
    Prints,
}

impl UniqueMode {
    pub const ALL: [UniqueMode; 3] = [UniqueMode::Cards, UniqueMode::Art, UniqueMode::Prints];

    pub fn as_str(&self) -> &'static str {
        match self {
            UniqueMode::Cards => "cards",
            UniqueMode::Art => "art",
            UniqueMode::Prints => "prints",
        }
    }
}

impl FromStr for UniqueMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_keyword(&UniqueMode::ALL, s, UniqueMode::as_str, "unique mode")
    }
}

/// Sort order accepted by the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Name,
    Set,
    Released,
    Rarity,
    Color,
    Usd,
    Tix,
    Eur,
    Cmc,
    Power,
    Toughness,
    Edhrec,
    Penny,
    Artist,
    Review,
}

impl SortOrder {
    pub const ALL: [SortOrder; 15] = [
        SortOrder::Name,
        SortOrder::Set,
        SortOrder::Released,
        SortOrder::Rarity,
        SortOrder::Color,
        SortOrder::Usd,
        SortOrder::Tix,
        SortOrder::Eur,
        SortOrder::Cmc,
        SortOrder::Power,
        SortOrder::Toughness,
        SortOrder::Edhrec,
        SortOrder::Penny,
        SortOrder::Artist,
        SortOrder::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Name => "name",
            SortOrder::Set => "set",
            SortOrder::Released => "released",
            SortOrder::Rarity => "rarity",
            SortOrder::Color => "color",
            SortOrder::Usd => "usd",
            SortOrder::Tix => "tix",
            SortOrder::Eur => "eur",
            SortOrder::Cmc => "cmc",
            SortOrder::Power => "power",
            SortOrder::Toughness => "toughness",
            SortOrder::Edhrec => "edhrec",
            SortOrder::Penny => "penny",
            SortOrder::Artist => "artist",
            SortOrder::Review => "review",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_keyword(&SortOrder::ALL, s, SortOrder::as_str, "sort order")
    }
}

fn parse_keyword<T: Copy>(
    all: &[T],
    input: &str,
    keyword: fn(&T) -> &'static str,
    what: &str,
) -> Result<T, String> {
    let input = input.trim().to_lowercase();
    all.iter()
        .find(|item| keyword(*item) == input)
        .copied()
        .ok_or_else(|| {
            let valid: Vec<&str> = all.iter().map(keyword).collect();
            format!("Unknown {}: {}. Valid values: {}", what, input, valid.join(", "))
        })
}

/// Query parameters for `/cards/search`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub q: String,
    pub page: Option<u32>,
    pub unique: Option<UniqueMode>,
    pub order: Option<SortOrder>,
}

impl SearchParams {
    /// Free-text search for one page of results
    pub fn page(query: &str, page: u32) -> Self {
        Self {
            q: query.to_string(),
            page: Some(page.max(1)),
            unique: None,
            order: None,
        }
    }

    /// Collapse duplicates with `unique`
    pub fn with_unique(mut self, unique: UniqueMode) -> Self {
        self.unique = Some(unique);
        self
    }

    /// Sort results by `order`
    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Every printing of an exact card name, oldest first
    pub fn printings(name: &str) -> Self {
        Self {
            q: exact_name_query(name),
            page: None,
            unique: Some(UniqueMode::Prints),
            order: Some(SortOrder::Released),
        }
    }

    /// Render as `(key, value)` pairs for the query string
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", self.q.clone())];
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(unique) = self.unique {
            params.push(("unique", unique.as_str().to_string()));
        }
        if let Some(order) = self.order {
            params.push(("order", order.as_str().to_string()));
        }
        params.push(("format", "json".to_string()));
        params
    }
}

/// Scryfall syntax for an exact name match: `!"Card Name"`
pub fn exact_name_query(name: &str) -> String {
    format!("!\"{}\"", name.replace('"', "\\\""))
}

/// The catalog operations the search view depends on
///
/// Implemented over HTTP by `scrycards::scryfall::ScryfallClient`; tests use
/// in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// Fetch one page of search results; "no match" is an empty page.
    async fn search_cards(&self, query: &str, page: u32) -> Result<CardPage, CatalogError>;

    /// Look up a card by its MTGO id.
    async fn get_card_by_secondary_id(&self, id: u64) -> Result<CardDetail, CatalogError>;

    /// Every printing of a card name, ordered by release date.
    async fn get_all_printings(&self, name: &str) -> Result<Vec<CardDetail>, CatalogError>;

    /// Best-effort reachability probe. Never fails.
    async fn check_connectivity(&self) -> bool;
}
