//! Reference data exposed by the catalog: sets, symbols, catalogs, rulings
//! and bulk data metadata

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A card set
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CardSet {
    pub id: String,
    pub code: String,
    pub name: String,
    pub set_type: String,
    #[serde(default)]
    pub released_at: Option<String>,
    #[serde(default)]
    pub mtgo_code: Option<String>,
    #[serde(default)]
    pub block: Option<String>,
    #[serde(default)]
    pub parent_set_code: Option<String>,
    #[serde(default)]
    pub tcgplayer_id: Option<u64>,
    pub card_count: u32,
    #[serde(default)]
    pub digital: bool,
    #[serde(default)]
    pub icon_svg_uri: Option<String>,
}

/// A card symbol such as `{T}` or `{W/U}`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CardSymbol {
    pub symbol: String,
    pub english: String,
    #[serde(default)]
    pub svg_uri: Option<String>,
    #[serde(default)]
    pub represents_mana: bool,
    #[serde(default)]
    pub appears_in_mana_costs: bool,
    #[serde(default)]
    pub mana_value: Option<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub funny: bool,
}

/// Result of `/symbology/parse-mana`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManaCost {
    pub cost: String,
    pub cmc: f64,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub colorless: bool,
    #[serde(default)]
    pub monocolored: bool,
    #[serde(default)]
    pub multicolored: bool,
}

/// A string catalog, also the shape of autocomplete responses
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Catalog {
    #[serde(default)]
    pub uri: Option<String>,
    pub total_values: u64,
    pub data: Vec<String>,
}

/// An official ruling for a card
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Ruling {
    pub source: String,
    pub published_at: String,
    pub comment: String,
}

/// Metadata for one downloadable bulk data file
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BulkData {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub description: String,
    pub updated_at: String,
    pub download_uri: String,
    pub size: u64,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content_encoding: Option<String>,
}

/// The string catalogs published under `/catalog/{name}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    CardNames,
    ArtistNames,
    WordBank,
    CreatureTypes,
    PlaneswalkerTypes,
    LandTypes,
    ArtifactTypes,
    EnchantmentTypes,
    SpellTypes,
    Powers,
    Toughnesses,
    Loyalties,
    Watermarks,
    KeywordAbilities,
    KeywordActions,
    AbilityWords,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 16] = [
        CatalogKind::CardNames,
        CatalogKind::ArtistNames,
        CatalogKind::WordBank,
        CatalogKind::CreatureTypes,
        CatalogKind::PlaneswalkerTypes,
        CatalogKind::LandTypes,
        CatalogKind::ArtifactTypes,
        CatalogKind::EnchantmentTypes,
        CatalogKind::SpellTypes,
        CatalogKind::Powers,
        CatalogKind::Toughnesses,
        CatalogKind::Loyalties,
        CatalogKind::Watermarks,
        CatalogKind::KeywordAbilities,
        CatalogKind::KeywordActions,
        CatalogKind::AbilityWords,
    ];

    /// Path segment used by the API
    pub fn slug(&self) -> &'static str {
        match self {
            CatalogKind::CardNames => "card-names",
            CatalogKind::ArtistNames => "artist-names",
            CatalogKind::WordBank => "word-bank",
            CatalogKind::CreatureTypes => "creature-types",
            CatalogKind::PlaneswalkerTypes => "planeswalker-types",
            CatalogKind::LandTypes => "land-types",
            CatalogKind::ArtifactTypes => "artifact-types",
            CatalogKind::EnchantmentTypes => "enchantment-types",
            CatalogKind::SpellTypes => "spell-types",
            CatalogKind::Powers => "powers",
            CatalogKind::Toughnesses => "toughnesses",
            CatalogKind::Loyalties => "loyalties",
            CatalogKind::Watermarks => "watermarks",
            CatalogKind::KeywordAbilities => "keyword-abilities",
            CatalogKind::KeywordActions => "keyword-actions",
            CatalogKind::AbilityWords => "ability-words",
        }
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatalogKind::ALL
            .iter()
            .find(|kind| kind.slug() == s)
            .copied()
            .ok_or_else(|| {
                let valid: Vec<&str> = CatalogKind::ALL.iter().map(|k| k.slug()).collect();
                format!("Unknown catalog: {}. Valid catalogs: {}", s, valid.join(", "))
            })
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}
