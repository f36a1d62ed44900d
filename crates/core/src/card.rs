//! Card records from the Scryfall API and their domain projections

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Image URIs attached to a card or to one of its faces
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ImageUris {
    #[serde(default)]
    pub small: Option<String>,
    #[serde(default)]
    pub normal: Option<String>,
    #[serde(default)]
    pub large: Option<String>,
    #[serde(default)]
    pub png: Option<String>,
    #[serde(default)]
    pub art_crop: Option<String>,
    #[serde(default)]
    pub border_crop: Option<String>,
}

/// One face of a multi-faced card
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ScryfallCardFace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// Card object from the Scryfall API
///
/// Only the fields the client projects are modeled; the API sends many more.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScryfallCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub flavor_text: Option<String>,
    #[serde(default)]
    pub set: Option<String>,
    pub set_name: String,
    #[serde(default)]
    pub collector_number: Option<String>,
    #[serde(default)]
    pub released_at: Option<String>,
    #[serde(default)]
    pub mtgo_id: Option<u64>,
    #[serde(default)]
    pub prices: BTreeMap<String, Option<String>>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    #[serde(default)]
    pub card_faces: Option<Vec<ScryfallCardFace>>,
}

/// Paginated list object returned by search endpoints
#[derive(Debug, Deserialize, Clone)]
pub struct ScryfallList<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub total_cards: Option<u64>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

/// One entry of a `/cards/collection` request
///
/// Scryfall accepts exactly one of the supported combinations: an id of some
/// kind, a name (optionally with a set), or a set with a collector number.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct CardIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtgo_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiverse_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub illustration_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_number: Option<String>,
}

impl CardIdentifier {
    pub fn id(id: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            ..Default::default()
        }
    }

    pub fn mtgo_id(id: u64) -> Self {
        Self {
            mtgo_id: Some(id),
            ..Default::default()
        }
    }

    pub fn multiverse_id(id: u64) -> Self {
        Self {
            multiverse_id: Some(id),
            ..Default::default()
        }
    }

    pub fn name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn collector(set: &str, collector_number: &str) -> Self {
        Self {
            set: Some(set.to_string()),
            collector_number: Some(collector_number.to_string()),
            ..Default::default()
        }
    }
}

/// Parses `mtgo:N`, `multiverse:N`, `oracle:UUID`, `illustration:UUID`,
/// `name:TEXT`, `name:TEXT@SET`, `SET/NUMBER`, or a bare Scryfall id
impl std::str::FromStr for CardIdentifier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Card identifier cannot be empty".to_string());
        }

        let number = |value: &str, what: &str| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("Invalid {what}: {value}"))
        };

        if let Some(value) = s.strip_prefix("mtgo:") {
            return Ok(Self::mtgo_id(number(value, "MTGO id")?));
        }
        if let Some(value) = s.strip_prefix("multiverse:") {
            return Ok(Self::multiverse_id(number(value, "multiverse id")?));
        }
        if let Some(value) = s.strip_prefix("oracle:") {
            return Ok(Self {
                oracle_id: Some(value.to_string()),
                ..Default::default()
            });
        }
        if let Some(value) = s.strip_prefix("illustration:") {
            return Ok(Self {
                illustration_id: Some(value.to_string()),
                ..Default::default()
            });
        }
        if let Some(value) = s.strip_prefix("name:") {
            return Ok(match value.rsplit_once('@') {
                Some((name, set)) => Self {
                    name: Some(name.to_string()),
                    set: Some(set.to_string()),
                    ..Default::default()
                },
                None => Self::name(value),
            });
        }
        if let Some((set, number)) = s.split_once('/') {
            return Ok(Self::collector(set, number));
        }

        Ok(Self::id(s))
    }
}

impl std::fmt::Display for CardIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(id) = &self.id {
            return write!(f, "{id}");
        }
        if let Some(id) = self.mtgo_id {
            return write!(f, "mtgo:{id}");
        }
        if let Some(id) = self.multiverse_id {
            return write!(f, "multiverse:{id}");
        }
        if let Some(id) = &self.oracle_id {
            return write!(f, "oracle:{id}");
        }
        if let Some(id) = &self.illustration_id {
            return write!(f, "illustration:{id}");
        }
        match (&self.name, &self.set, &self.collector_number) {
            (Some(name), Some(set), _) => write!(f, "name:{name}@{set}"),
            (Some(name), None, _) => write!(f, "name:{name}"),
            (None, Some(set), Some(number)) => write!(f, "{set}/{number}"),
            _ => f.write_str("(empty identifier)"),
        }
    }
}

/// Response object of `/cards/collection`
#[derive(Debug, Deserialize, Clone)]
pub struct ScryfallCollection {
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub not_found: Vec<CardIdentifier>,
}

/// Cards found by a collection lookup, and the identifiers that matched nothing
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CardCollection {
    pub cards: Vec<CardSummary>,
    pub not_found: Vec<CardIdentifier>,
}

/// Image reference chosen for display
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ImageRef {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
}

/// List-view projection of a card
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CardSummary {
    pub id: String,
    pub name: String,
    pub set_name: String,
    pub set_code: Option<String>,
    pub collector_number: Option<String>,
    pub released_at: Option<String>,
    pub secondary_id: Option<u64>,
    pub image: Option<ImageRef>,
    pub prices: BTreeMap<String, Option<String>>,
}

/// Detail-view projection of a card
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CardDetail {
    #[serde(flatten)]
    pub summary: CardSummary,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub flavor_text: Option<String>,
    pub printings: Vec<CardSummary>,
}

impl CardDetail {
    pub fn name(&self) -> &str {
        &self.summary.name
    }

    pub fn secondary_id(&self) -> Option<u64> {
        self.summary.secondary_id
    }
}

/// One page of search results
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CardPage {
    pub cards: Vec<CardSummary>,
    pub total_cards: u64,
    pub has_more: bool,
    pub next_page: Option<String>,
}

impl CardPage {
    /// The page a "not found" search normalizes to
    pub fn empty() -> Self {
        Self {
            cards: Vec::new(),
            total_cards: 0,
            has_more: false,
            next_page: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Pick the image to display for a card
///
/// Uses the card's own `image_uris` when present, otherwise the first face's.
pub fn primary_image(card: &ScryfallCard) -> Option<ImageRef> {
    let uris = card.image_uris.as_ref().or_else(|| {
        card.card_faces
            .as_ref()
            .and_then(|faces| faces.first())
            .and_then(|face| face.image_uris.as_ref())
    })?;

    Some(ImageRef {
        small: uris.small.clone(),
        normal: uris.normal.clone(),
        large: uris.large.clone(),
    })
}

/// Project a raw card into its list-view summary
pub fn to_summary(card: &ScryfallCard) -> CardSummary {
    CardSummary {
        id: card.id.clone(),
        name: card.name.clone(),
        set_name: card.set_name.clone(),
        set_code: card.set.clone(),
        collector_number: card.collector_number.clone(),
        released_at: card.released_at.clone(),
        secondary_id: card.mtgo_id,
        image: primary_image(card),
        prices: card.prices.clone(),
    }
}

/// Project a raw card into its detail view, without printings
///
/// Multi-faced cards carry their rules text on the faces, so the first face
/// fills any field missing at the top level.
pub fn to_detail(card: ScryfallCard) -> CardDetail {
    let summary = to_summary(&card);
    let front = card
        .card_faces
        .and_then(|faces| faces.into_iter().next())
        .unwrap_or_default();

    CardDetail {
        mana_cost: card.mana_cost.or(front.mana_cost),
        type_line: card.type_line.or(front.type_line),
        oracle_text: card.oracle_text.or(front.oracle_text),
        power: card.power.or(front.power),
        toughness: card.toughness.or(front.toughness),
        flavor_text: card.flavor_text.or(front.flavor_text),
        summary,
        printings: Vec::new(),
    }
}

/// Transform a search list into a page of summaries
pub fn transform_card_list(list: ScryfallList<ScryfallCard>) -> CardPage {
    let total_cards = list
        .total_cards
        .unwrap_or(list.data.len() as u64);

    CardPage {
        cards: list.data.iter().map(to_summary).collect(),
        total_cards,
        has_more: list.has_more,
        next_page: list.next_page,
    }
}

/// Format a price for display
///
/// Missing prices and "0.00" both read as "N/A".
pub fn format_price(currency: &str, price: Option<&str>) -> String {
    match price {
        None | Some("0.00") | Some("") => "N/A".to_string(),
        Some(amount) => match currency {
            c if c.starts_with("usd") => format!("${amount}"),
            c if c.starts_with("eur") => format!("€{amount}"),
            "tix" => format!("{amount} tix"),
            _ => amount.to_string(),
        },
    }
}
