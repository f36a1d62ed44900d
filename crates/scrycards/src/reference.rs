use crate::prelude::{println, *};
use colored::Colorize;
use serde::Serialize;

use scrycards_core::reference::{BulkData, CardSet, CardSymbol, CatalogKind, ManaCost};

use crate::scryfall::ScryfallClient;

#[derive(Debug, clap::Parser)]
#[command(name = "reference")]
#[command(about = "Catalog reference data")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// List every set, or show one by code
    #[clap(name = "sets")]
    Sets(SetsOptions),

    /// List every card symbol
    #[clap(name = "symbols")]
    Symbols(JsonOptions),

    /// Parse a mana cost such as "{2}{W}{U}"
    #[clap(name = "parse-mana")]
    ParseMana(ParseManaOptions),

    /// Print one of the string catalogs (creature-types, powers, ...)
    #[clap(name = "catalog")]
    Catalog(CatalogOptions),

    /// List bulk data files, or show one by id or type
    #[clap(name = "bulk")]
    Bulk(BulkOptions),
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct JsonOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct SetsOptions {
    /// Set code (e.g., "m11"), or a TCGplayer group id with --tcgplayer
    pub code: Option<String>,

    /// Treat the code as a TCGplayer group id
    #[arg(long, requires = "code")]
    pub tcgplayer: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct ParseManaOptions {
    /// Mana cost text
    pub cost: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct CatalogOptions {
    /// Catalog name (e.g., "creature-types")
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct BulkOptions {
    /// Bulk data id or type (e.g., "oracle-cards")
    pub id: Option<String>,

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
        Commands::Sets(options) => match options.code {
            Some(code) => {
                let set = if options.tcgplayer {
                    let id = code.trim().parse::<u64>().map_err(|_| {
                        Error::InvalidArgument(format!("Invalid TCGplayer id: {code}"))
                    })?;
                    client.set_by_tcgplayer_id(id).await
                } else {
                    client.set(&code).await
                }
                .map_err(Error::from)?;
                output(&set, options.json, || print_sets(std::slice::from_ref(&set)))
            }
            None => {
                let sets = client.sets().await.map_err(Error::from)?;
                output(&sets, options.json, || print_sets(&sets))
            }
        },
        Commands::Symbols(options) => {
            let symbols = client.symbols().await.map_err(Error::from)?;
            output(&symbols, options.json, || print_symbols(&symbols))
        }
        Commands::ParseMana(options) => {
            let cost = client
                .parse_mana(&options.cost)
                .await
                .map_err(Error::from)?;
            output(&cost, options.json, || print!("{}", format_mana_text(&cost)))
        }
        Commands::Catalog(options) => {
            let kind: CatalogKind = options.name.parse().map_err(Error::InvalidArgument)?;
            let catalog = client.catalog(kind).await.map_err(Error::from)?;
            output(&catalog, options.json, || {
                println!(
                    "{}",
                    format!("{} ({} values)", kind, catalog.total_values)
                        .bright_cyan()
                        .bold()
                );
                for value in &catalog.data {
                    println!("{}", value);
                }
            })
        }
        Commands::Bulk(options) => match options.id {
            Some(id) => {
                let item = client.bulk_data_item(&id).await.map_err(Error::from)?;
                output(&item, options.json, || print_bulk(std::slice::from_ref(&item)))
            }
            None => {
                let items = client.bulk_data().await.map_err(Error::from)?;
                output(&items, options.json, || print_bulk(&items))
            }
        },
    }
}

/// Print `value` as JSON, or run the text renderer
fn output<T: Serialize + ?Sized>(value: &T, json: bool, text: impl FnOnce()) -> Result<()> {
    if json {
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        text();
    }
    Ok(())
}

fn print_sets(sets: &[CardSet]) {
    let mut table = new_table();
    table.add_row(prettytable::row!["Code", "Name", "Type", "Released", "Cards", "MTGO"]);
    for set in sets {
        table.add_row(prettytable::row![
            set.code.to_uppercase(),
            set.name,
            set.set_type,
            set.released_at.as_deref().unwrap_or("-"),
            set.card_count,
            set.mtgo_code.as_deref().unwrap_or("-"),
        ]);
    }
    table.printstd();
}

fn print_symbols(symbols: &[CardSymbol]) {
    let mut table = new_table();
    table.add_row(prettytable::row!["Symbol", "Meaning", "Mana Value", "Colors"]);
    for symbol in symbols {
        table.add_row(prettytable::row![
            symbol.symbol,
            symbol.english,
            symbol
                .mana_value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "-".to_string()),
            symbol.colors.join(""),
        ]);
    }
    table.printstd();
}

fn print_bulk(items: &[BulkData]) {
    let mut table = new_table();
    table.add_row(prettytable::row!["Type", "Updated", "Size", "Download"]);
    for item in items {
        table.add_row(prettytable::row![
            item.kind,
            item.updated_at,
            format_size(item.size),
            item.download_uri,
        ]);
    }
    table.printstd();
}

fn format_mana_text(cost: &ManaCost) -> String {
    let colors = if cost.colorless {
        "colorless".to_string()
    } else {
        cost.colors.join("")
    };
    format!(
        "{}: {} | {}: {} | {}: {}\n",
        "Cost".green(),
        cost.cost.bright_white(),
        "Mana Value".green(),
        cost.cmc.to_string().bright_yellow(),
        "Colors".green(),
        colors
    )
}

/// Human readable byte count
fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(157_286_400), "150.0 MB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.0 GB");
    }

    #[test]
    fn test_format_mana_text() {
        colored::control::set_override(false);
        let cost = ManaCost {
            cost: "{2}{W}{U}".to_string(),
            cmc: 4.0,
            colors: vec!["W".to_string(), "U".to_string()],
            colorless: false,
            monocolored: false,
            multicolored: true,
        };

        assert_eq!(
            format_mana_text(&cost),
            "Cost: {2}{W}{U} | Mana Value: 4 | Colors: WU\n"
        );
    }

    #[test]
    fn test_format_mana_text_colorless() {
        colored::control::set_override(false);
        let cost = ManaCost {
            cost: "{3}".to_string(),
            cmc: 3.0,
            colors: Vec::new(),
            colorless: true,
            monocolored: false,
            multicolored: false,
        };

        assert!(format_mana_text(&cost).ends_with("Colors: colorless\n"));
    }
}
