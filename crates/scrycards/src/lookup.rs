use crate::prelude::{println, *};
use colored::Colorize;
use serde::Serialize;

use scrycards_core::card::{CardCollection, CardDetail, CardIdentifier};
use scrycards_core::catalog::{SearchParams, SortOrder, UniqueMode};
use scrycards_core::reference::{Catalog, Ruling};
use scrycards_core::search::CARDS_PER_PAGE;

use crate::scryfall::ScryfallClient;

#[derive(Debug, clap::Parser)]
#[command(name = "lookup")]
#[command(about = "Single card lookups")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// A random card, optionally matching a query
    #[clap(name = "random")]
    Random(RandomOptions),

    /// A card by exact or fuzzy name
    #[clap(name = "named")]
    Named(NamedOptions),

    /// A card by Scryfall id, multiverse id, or set code and collector number
    #[clap(name = "id")]
    Id(IdOptions),

    /// Card names starting with a prefix
    #[clap(name = "autocomplete")]
    Autocomplete(AutocompleteOptions),

    /// Official rulings for a card
    #[clap(name = "rulings")]
    Rulings(RulingsOptions),

    /// Many cards at once by any mix of identifiers
    #[clap(name = "collection")]
    Collection(CollectionOptions),

    /// Raw catalog search with duplicate and sort control
    #[clap(name = "query")]
    Query(QueryOptions),
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct RandomOptions {
    /// Restrict to cards matching this search query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct NamedOptions {
    /// Card name
    pub name: String,

    /// Match loosely instead of exactly
    #[arg(long)]
    pub fuzzy: bool,

    /// Limit to one set code
    #[arg(long)]
    pub set: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct IdOptions {
    /// Scryfall id, multiverse id (with --multiverse), or set code (with a collector number)
    pub id: String,

    /// Collector number within the set given as the id
    pub collector_number: Option<String>,

    /// Treat the id as a multiverse id
    #[arg(long, conflicts_with = "collector_number")]
    pub multiverse: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct AutocompleteOptions {
    /// Name prefix
    pub query: String,

    /// Include tokens, emblems and other extras
    #[arg(long)]
    pub include_extras: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct RulingsOptions {
    /// Scryfall id, MTGO id (with --mtgo), multiverse id (with --multiverse), or set code (with a collector number)
    pub id: String,

    /// Collector number within the set given as the id
    pub collector_number: Option<String>,

    /// Treat the id as an MTGO id
    #[arg(long, conflicts_with_all = ["collector_number", "multiverse"])]
    pub mtgo: bool,

    /// Treat the id as a multiverse id
    #[arg(long, conflicts_with = "collector_number")]
    pub multiverse: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct CollectionOptions {
    /// Identifiers: mtgo:N, multiverse:N, oracle:ID, illustration:ID, name:TEXT[@SET], SET/NUMBER, or a Scryfall id
    #[arg(required = true, num_args = 1..)]
    pub identifiers: Vec<CardIdentifier>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct QueryOptions {
    /// Scryfall search query
    pub query: String,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Duplicate handling: cards, art, prints
    #[arg(long)]
    pub unique: Option<UniqueMode>,

    /// Sort order: name, set, released, rarity, color, usd, tix, eur, cmc, power, toughness, edhrec, penny, artist, review
    #[arg(long)]
    pub order: Option<SortOrder>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let client = ScryfallClient::new().map_err(Error::from)?;
    if global.verbose {
        println!("Scryfall API Base: {}", client.base_url());
        println!();
    }

    match app.command {
        Commands::Random(options) => {
            let card = client
                .random_card(options.query.as_deref())
                .await
                .map_err(Error::from)?;
            output_card(&card, options.json)
        }
        Commands::Named(options) => {
            let card = client
                .named_card(&options.name, options.fuzzy, options.set.as_deref())
                .await
                .map_err(Error::from)?;
            output_card(&card, options.json)
        }
        Commands::Id(options) => {
            let card = lookup_by_id(&client, &options).await?;
            output_card(&card, options.json)
        }
        Commands::Autocomplete(options) => {
            let names = client
                .autocomplete(&options.query, options.include_extras)
                .await
                .map_err(Error::from)?;
            if options.json {
                output_json(&names)
            } else {
                print!("{}", format_autocomplete_text(&options.query, &names));
                Ok(())
            }
        }
        Commands::Rulings(options) => {
            let rulings = rulings_by_id(&client, &options).await?;
            if options.json {
                output_json(&rulings)
            } else {
                print!("{}", format_rulings_text(&rulings));
                Ok(())
            }
        }
        Commands::Collection(options) => {
            let collection = client
                .collection(&options.identifiers)
                .await
                .map_err(Error::from)?;
            if options.json {
                output_json(&collection)
            } else {
                print!("{}", format_collection_text(&collection));
                Ok(())
            }
        }
        Commands::Query(options) => {
            let params = query_params(&options);
            let page = client.search(&params).await.map_err(Error::from)?;
            if options.json {
                output_json(&page)
            } else if page.is_empty() {
                println!(
                    "{}",
                    format!("No cards found for \"{}\".", options.query).yellow()
                );
                Ok(())
            } else {
                let page_number = params.page.unwrap_or(1);
                print!(
                    "{}",
                    crate::search::format_results_text(
                        &options.query,
                        &page.cards,
                        page_number,
                        page.total_cards.div_ceil(CARDS_PER_PAGE),
                        page.total_cards,
                    )
                );
                Ok(())
            }
        }
    }
}

fn query_params(options: &QueryOptions) -> SearchParams {
    let mut params = SearchParams::page(&options.query, options.page);
    if let Some(unique) = options.unique {
        params = params.with_unique(unique);
    }
    if let Some(order) = options.order {
        params = params.with_order(order);
    }
    params
}

fn parse_numeric_id(id: &str, what: &str) -> Result<u64> {
    Ok(id
        .trim()
        .parse::<u64>()
        .map_err(|_| Error::InvalidArgument(format!("Invalid {what}: {id}")))?)
}

async fn rulings_by_id(client: &ScryfallClient, options: &RulingsOptions) -> Result<Vec<Ruling>> {
    let rulings = if options.mtgo {
        client
            .rulings_by_mtgo_id(parse_numeric_id(&options.id, "MTGO id")?)
            .await
    } else if options.multiverse {
        client
            .rulings_by_multiverse_id(parse_numeric_id(&options.id, "multiverse id")?)
            .await
    } else if let Some(number) = &options.collector_number {
        client.rulings_by_set_and_number(&options.id, number).await
    } else {
        client.rulings(&options.id).await
    };

    Ok(rulings.map_err(Error::from)?)
}

async fn lookup_by_id(client: &ScryfallClient, options: &IdOptions) -> Result<CardDetail> {
    let card = if options.multiverse {
        client
            .get_card_by_multiverse_id(parse_numeric_id(&options.id, "multiverse id")?)
            .await
    } else if let Some(number) = &options.collector_number {
        client.get_card_by_set_and_number(&options.id, number).await
    } else {
        client.get_card(&options.id).await
    };

    Ok(card.map_err(Error::from)?)
}

fn output_card(card: &CardDetail, json: bool) -> Result<()> {
    if json {
        output_json(card)
    } else {
        print!("{}", crate::card::format_card_text(card));
        Ok(())
    }
}

fn output_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn format_autocomplete_text(query: &str, names: &Catalog) -> String {
    let mut result = String::new();

    if names.data.is_empty() {
        result.push_str(&format!(
            "{}\n",
            format!("No card names start with \"{query}\".").yellow()
        ));
        return result;
    }

    for name in &names.data {
        result.push_str(&format!("{}\n", name.white()));
    }
    result
}

fn format_rulings_text(rulings: &[Ruling]) -> String {
    let mut result = String::new();

    if rulings.is_empty() {
        result.push_str(&format!("{}\n", "No rulings for this card.".yellow()));
        return result;
    }

    for ruling in rulings {
        result.push_str(&format!(
            "\n{} {}\n",
            ruling.published_at.bright_black(),
            format!("({})", ruling.source).green()
        ));
        result.push_str(&format!("    {}\n", ruling.comment));
    }
    result.push('\n');
    result
}

fn format_collection_text(collection: &CardCollection) -> String {
    let mut result = String::new();

    for card in &collection.cards {
        let open = match card.secondary_id {
            Some(id) => format!("scrycards card {id}").cyan().to_string(),
            None => "not available on MTGO".bright_black().to_string(),
        };
        result.push_str(&format!(
            "{} | {} | {}\n",
            card.name.white().bold(),
            card.set_name.bright_white(),
            open
        ));
    }

    if !collection.not_found.is_empty() {
        result.push_str(&format!(
            "\n{}\n",
            format!("Not found ({})", collection.not_found.len())
                .yellow()
                .bold()
        ));
        for identifier in &collection.not_found {
            result.push_str(&format!("    {}\n", identifier.to_string().yellow()));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_autocomplete_text() {
        colored::control::set_override(false);
        let names = Catalog {
            uri: None,
            total_values: 2,
            data: vec!["Thallid".to_string(), "Thallid Devourer".to_string()],
        };

        let text = format_autocomplete_text("thal", &names);

        assert_eq!(text, "Thallid\nThallid Devourer\n");
    }

    #[test]
    fn test_format_autocomplete_text_empty() {
        colored::control::set_override(false);
        let names = Catalog {
            uri: None,
            total_values: 0,
            data: Vec::new(),
        };

        let text = format_autocomplete_text("zzz", &names);

        assert!(text.contains("No card names start with \"zzz\"."));
    }

    #[test]
    fn test_format_rulings_text() {
        colored::control::set_override(false);
        let rulings = vec![Ruling {
            source: "wotc".to_string(),
            published_at: "2004-10-04".to_string(),
            comment: "It can target a creature or player.".to_string(),
        }];

        let text = format_rulings_text(&rulings);

        assert!(text.contains("2004-10-04 (wotc)"));
        assert!(text.contains("    It can target a creature or player."));
        assert!(format_rulings_text(&[]).contains("No rulings"));
    }

    #[test]
    fn test_format_collection_text() {
        colored::control::set_override(false);
        let collection = CardCollection {
            cards: vec![scrycards_core::card::CardSummary {
                id: "e3285e6b".to_string(),
                name: "Lightning Bolt".to_string(),
                set_name: "Magic 2011".to_string(),
                set_code: Some("m11".to_string()),
                collector_number: Some("149".to_string()),
                released_at: None,
                secondary_id: Some(37777),
                image: None,
                prices: Default::default(),
            }],
            not_found: vec![CardIdentifier::name("Zzzznotacard")],
        };

        let text = format_collection_text(&collection);

        assert!(text.contains("Lightning Bolt | Magic 2011 | scrycards card 37777"));
        assert!(text.contains("Not found (1)"));
        assert!(text.contains("name:Zzzznotacard"));
    }

    #[test]
    fn test_query_params() {
        let options = QueryOptions {
            query: "t:goblin".to_string(),
            page: 0,
            unique: Some(UniqueMode::Prints),
            order: Some(SortOrder::Released),
            json: false,
        };

        let params = query_params(&options);

        assert_eq!(params.page, Some(1));
        assert_eq!(params.unique, Some(UniqueMode::Prints));
        assert_eq!(params.order, Some(SortOrder::Released));
    }

    #[test]
    fn test_parse_numeric_id() {
        assert_eq!(parse_numeric_id(" 37777 ", "MTGO id").unwrap(), 37777);
        let err = parse_numeric_id("abc", "MTGO id").unwrap_err();
        assert!(err.to_string().contains("Invalid MTGO id: abc"));
    }
}
