use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use std::time::Duration;

use scrycards_core::card::{
    to_detail, CardCollection, CardDetail, CardIdentifier, CardPage, ScryfallCard, ScryfallList,
};
use scrycards_core::catalog::{
    collection_request, normalize_card, normalize_collection, normalize_printings,
    normalize_search, parse_response, CatalogApi, CatalogError, SearchParams, REQUEST_TIMEOUT,
    SCRYFALL_API_BASE,
};
use scrycards_core::reference::{
    BulkData, CardSet, CardSymbol, Catalog, CatalogKind, ManaCost, Ruling,
};

/// Client identifier sent with every catalog request
pub const USER_AGENT: &str = concat!("scrycards/", env!("CARGO_PKG_VERSION"));

/// Stateless HTTP client for the Scryfall API
///
/// Every call is an independent request; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScryfallClient {
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_base_url(SCRYFALL_API_BASE)
    }

    /// Point the client at another host (used by tests)
    pub fn with_base_url(base_url: &str) -> Result<Self, CatalogError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Like [`ScryfallClient::with_base_url`], with its own connect and request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a GET and hand back the status and body, whatever the status
    async fn get_raw(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(u16, String), CatalogError> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("GET {url} {query:?}");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(CatalogError::transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(CatalogError::transport)?;
        log::debug!("GET {url} -> {status}");

        Ok((status, body))
    }

    /// Issue a JSON POST and hand back the status and body
    async fn post_raw<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(u16, String), CatalogError> {
        let url = format!("{}{path}", self.base_url);
        log::debug!("POST {url}");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(CatalogError::transport)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(CatalogError::transport)?;
        log::debug!("POST {url} -> {status}");

        Ok((status, body))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let (status, body) = self.get_raw(path, query).await?;
        parse_response(status, &body)
    }

    async fn get_card_at(&self, path: &str, query: &[(&str, String)]) -> Result<CardDetail, CatalogError> {
        let (status, body) = self.get_raw(path, query).await?;
        normalize_card(status, &body)
    }

    /// Card by Scryfall id
    pub async fn get_card(&self, id: &str) -> Result<CardDetail, CatalogError> {
        self.get_card_at(&format!("/cards/{}", urlencoding::encode(id)), &[])
            .await
    }

    pub async fn get_card_by_multiverse_id(&self, id: u64) -> Result<CardDetail, CatalogError> {
        self.get_card_at(&format!("/cards/multiverse/{id}"), &[]).await
    }

    pub async fn get_card_by_set_and_number(
        &self,
        set_code: &str,
        collector_number: &str,
    ) -> Result<CardDetail, CatalogError> {
        let path = format!(
            "/cards/{}/{}",
            urlencoding::encode(set_code),
            urlencoding::encode(collector_number)
        );
        self.get_card_at(&path, &[]).await
    }

    /// A random card, optionally restricted by a search query
    pub async fn random_card(&self, query: Option<&str>) -> Result<CardDetail, CatalogError> {
        let params: Vec<(&str, String)> = query.map(|q| vec![("q", q.to_string())]).unwrap_or_default();
        self.get_card_at("/cards/random", &params).await
    }

    /// Card by name, exact or fuzzy, optionally within one set
    pub async fn named_card(
        &self,
        name: &str,
        fuzzy: bool,
        set: Option<&str>,
    ) -> Result<CardDetail, CatalogError> {
        let mut params = vec![(if fuzzy { "fuzzy" } else { "exact" }, name.to_string())];
        if let Some(set) = set {
            params.push(("set", set.to_string()));
        }
        self.get_card_at("/cards/named", &params).await
    }

    /// Up to 20 card names starting with `query`
    pub async fn autocomplete(&self, query: &str, include_extras: bool) -> Result<Catalog, CatalogError> {
        self.get_json(
            "/cards/autocomplete",
            &[
                ("q", query.to_string()),
                ("include_extras", include_extras.to_string()),
            ],
        )
        .await
    }

    /// One page of search results with explicit `unique`/`order` options
    pub async fn search(&self, params: &SearchParams) -> Result<CardPage, CatalogError> {
        let (status, body) = self.get_raw("/cards/search", &params.to_query()).await?;
        normalize_search(status, &body)
    }

    /// Up to 75 cards in one request, by any mix of identifiers
    pub async fn collection(
        &self,
        identifiers: &[CardIdentifier],
    ) -> Result<CardCollection, CatalogError> {
        let request = collection_request(identifiers)?;
        let (status, body) = self.post_raw("/cards/collection", &request).await?;
        normalize_collection(status, &body)
    }

    async fn rulings_at(&self, path: &str) -> Result<Vec<Ruling>, CatalogError> {
        let list: ScryfallList<Ruling> = self.get_json(path, &[]).await?;
        Ok(list.data)
    }

    /// Rulings for a card, by Scryfall id
    pub async fn rulings(&self, id: &str) -> Result<Vec<Ruling>, CatalogError> {
        self.rulings_at(&format!("/cards/{}/rulings", urlencoding::encode(id)))
            .await
    }

    pub async fn rulings_by_mtgo_id(&self, id: u64) -> Result<Vec<Ruling>, CatalogError> {
        self.rulings_at(&format!("/cards/mtgo/{id}/rulings")).await
    }

    pub async fn rulings_by_multiverse_id(&self, id: u64) -> Result<Vec<Ruling>, CatalogError> {
        self.rulings_at(&format!("/cards/multiverse/{id}/rulings"))
            .await
    }

    pub async fn rulings_by_set_and_number(
        &self,
        set_code: &str,
        collector_number: &str,
    ) -> Result<Vec<Ruling>, CatalogError> {
        self.rulings_at(&format!(
            "/cards/{}/{}/rulings",
            urlencoding::encode(set_code),
            urlencoding::encode(collector_number)
        ))
        .await
    }

    pub async fn sets(&self) -> Result<Vec<CardSet>, CatalogError> {
        let list: ScryfallList<CardSet> = self.get_json("/sets", &[]).await?;
        Ok(list.data)
    }

    /// Set by code or Scryfall id
    pub async fn set(&self, code: &str) -> Result<CardSet, CatalogError> {
        self.get_json(&format!("/sets/{}", urlencoding::encode(code)), &[])
            .await
    }

    /// Set by its TCGplayer group id
    pub async fn set_by_tcgplayer_id(&self, id: u64) -> Result<CardSet, CatalogError> {
        self.get_json(&format!("/sets/tcgplayer/{id}"), &[]).await
    }

    pub async fn symbols(&self) -> Result<Vec<CardSymbol>, CatalogError> {
        let list: ScryfallList<CardSymbol> = self.get_json("/symbology", &[]).await?;
        Ok(list.data)
    }

    pub async fn parse_mana(&self, cost: &str) -> Result<ManaCost, CatalogError> {
        self.get_json("/symbology/parse-mana", &[("cost", cost.to_string())])
            .await
    }

    pub async fn catalog(&self, kind: CatalogKind) -> Result<Catalog, CatalogError> {
        self.get_json(&format!("/catalog/{}", kind.slug()), &[]).await
    }

    pub async fn bulk_data(&self) -> Result<Vec<BulkData>, CatalogError> {
        let list: ScryfallList<BulkData> = self.get_json("/bulk-data", &[]).await?;
        Ok(list.data)
    }

    pub async fn bulk_data_item(&self, id: &str) -> Result<BulkData, CatalogError> {
        self.get_json(&format!("/bulk-data/{}", urlencoding::encode(id)), &[])
            .await
    }
}

impl CatalogApi for ScryfallClient {
    async fn search_cards(&self, query: &str, page: u32) -> Result<CardPage, CatalogError> {
        self.search(&SearchParams::page(query, page)).await
    }

    async fn get_card_by_secondary_id(&self, id: u64) -> Result<CardDetail, CatalogError> {
        self.get_card_at(&format!("/cards/mtgo/{id}"), &[]).await
    }

    async fn get_all_printings(&self, name: &str) -> Result<Vec<CardDetail>, CatalogError> {
        let params = SearchParams::printings(name).to_query();
        let (status, body) = self.get_raw("/cards/search", &params).await?;
        normalize_printings(status, &body)
    }

    async fn check_connectivity(&self) -> bool {
        match self.get_json::<ScryfallCard>("/cards/random", &[]).await {
            Ok(card) => {
                log::debug!("catalog reachable, random card: {}", to_detail(card).name());
                true
            }
            Err(err) => {
                log::warn!("Scryfall API connection test failed: {}", err);
                false
            }
        }
    }
}
