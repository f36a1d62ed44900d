use crate::prelude::{println, *};
use colored::Colorize;
use std::sync::Arc;

use scrycards_core::card::{format_price, CardDetail, CardSummary};
use scrycards_core::catalog::CatalogApi;
use scrycards_core::controller::{DetailView, SearchController};
use scrycards_core::route::Route;
use scrycards_core::search::SearchStore;

use crate::scryfall::ScryfallClient;

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct CardOptions {
    /// MTGO id of the card (e.g., "37777" or "/cards/37777")
    #[clap(env = "SCRYCARDS_CARD")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, clap::Args, serde::Serialize, serde::Deserialize, Clone)]
pub struct PrintingsOptions {
    /// Exact card name (e.g., "Lightning Bolt")
    pub name: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Accept either a bare id or a detail route path
fn route_param(input: &str) -> String {
    match Route::parse(input) {
        Some(Route::CardDetail(id)) => id.to_string(),
        _ => input.to_string(),
    }
}

pub async fn run(options: CardOptions, global: crate::Global) -> Result<()> {
    let client = ScryfallClient::new().map_err(Error::from)?;
    if global.verbose {
        println!("Scryfall API Base: {}", client.base_url());
        println!();
    }

    let controller = SearchController::new(client, Arc::new(SearchStore::new()));
    show_detail(&controller, &route_param(&options.id), options.json).await
}

/// Load and print the detail view for a card id
pub async fn show_detail<C: CatalogApi>(
    controller: &SearchController<C>,
    id: &str,
    json: bool,
) -> Result<()> {
    let view = controller.load_card_detail(id).await;

    if json {
        println!("{}", format_detail_json(&view)?);
    } else {
        print!("{}", format_detail_text(&view));
    }

    Ok(())
}

pub async fn run_printings(options: PrintingsOptions, global: crate::Global) -> Result<()> {
    let client = ScryfallClient::new().map_err(Error::from)?;
    if global.verbose {
        println!("Fetching printings of {}...", options.name);
    }

    let printings: Vec<CardSummary> = client
        .get_all_printings(&options.name)
        .await
        .map_err(Error::from)?
        .into_iter()
        .map(|p| p.summary)
        .collect();

    if options.json {
        let json = serde_json::to_string_pretty(&printings)
            .map_err(|e| eyre!("JSON serialization failed: {}", e))?;
        println!("{}", json);
    } else {
        print!("{}", format_printings_text(&options.name, &printings));
    }

    Ok(())
}

fn format_detail_json(view: &DetailView) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(|e| eyre!("JSON serialization failed: {}", e))
}

/// Render the detail view: the card, or an informational "not found" note
pub fn format_detail_text(view: &DetailView) -> String {
    match view {
        DetailView::Loaded { card } => format_card_text(card),
        DetailView::NotFound { id, reason } => {
            let mut result = String::new();
            result.push_str(&format!("\n{}\n", "Card not found".yellow().bold()));
            if !id.is_empty() {
                result.push_str(&format!("    {}: {}\n", "ID".green(), id.bright_white()));
            }
            result.push_str(&format!("    {}\n", reason.bright_black()));
            result.push_str(&format!(
                "\n{}: {}\n\n",
                "Back to search".green(),
                "scrycards search <query>".cyan()
            ));
            result
        }
    }
}

/// Render one card with its rules text, prices and printings
pub fn format_card_text(card: &CardDetail) -> String {
    let mut result = String::new();
    let summary = &card.summary;

    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    let mut title = summary.name.clone();
    if let Some(cost) = &card.mana_cost {
        title.push_str(&format!("  {cost}"));
    }
    result.push_str(&format!("{}\n", title.bright_cyan().bold()));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if let Some(type_line) = &card.type_line {
        result.push_str(&format!("\n{}\n", type_line.white().bold()));
    }
    if let Some(text) = &card.oracle_text {
        result.push_str(&format!("\n{}\n", text));
    }
    if let Some(flavor) = &card.flavor_text {
        result.push_str(&format!("\n{}\n", flavor.italic().bright_black()));
    }
    if card.power.is_some() || card.toughness.is_some() {
        result.push_str(&format!(
            "\n{}: {}/{}\n",
            "P/T".green(),
            card.power.as_deref().unwrap_or("?"),
            card.toughness.as_deref().unwrap_or("?")
        ));
    }

    result.push_str(&format!(
        "\n{}: {}\n",
        "Set".green(),
        summary.set_name.bright_white()
    ));
    if let Some(image) = summary.image.as_ref().and_then(|i| i.normal.as_ref()) {
        result.push_str(&format!("{}: {}\n", "Image".green(), image.cyan().underline()));
    }
    if !summary.prices.is_empty() {
        result.push_str(&format!("{}: {}\n", "Prices".green(), format_prices(summary)));
    }

    if !card.printings.is_empty() {
        result.push_str(&format!("\n{}\n", "=".repeat(80).bright_yellow()));
        result.push_str(&format!(
            "{}\n",
            format!("PRINTINGS ({})", card.printings.len())
                .bright_yellow()
                .bold()
        ));
        result.push_str(&format!("{}\n", "=".repeat(80).bright_yellow()));
        for printing in &card.printings {
            result.push_str(&format_printing_line(printing));
        }
    }

    result.push('\n');
    result
}

fn format_prices(card: &CardSummary) -> String {
    card.prices
        .iter()
        .map(|(currency, price)| {
            format!("{} {}", currency, format_price(currency, price.as_deref()))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn format_printing_line(printing: &CardSummary) -> String {
    let set = match (&printing.set_code, &printing.collector_number) {
        (Some(code), Some(number)) => format!("{} ({} #{})", printing.set_name, code.to_uppercase(), number),
        (Some(code), None) => format!("{} ({})", printing.set_name, code.to_uppercase()),
        _ => printing.set_name.clone(),
    };
    let usd = format_price("usd", printing.prices.get("usd").and_then(|p| p.as_deref()));
    let link = match printing.secondary_id {
        Some(id) => format!("scrycards card {id}").cyan().to_string(),
        None => "not on MTGO".bright_black().to_string(),
    };

    format!(
        "  {} {} | {} | {}\n",
        printing
            .released_at
            .as_deref()
            .unwrap_or("????-??-??")
            .bright_black(),
        set.white(),
        usd.bright_yellow(),
        link
    )
}

fn format_printings_text(name: &str, printings: &[CardSummary]) -> String {
    let mut result = String::new();
    result.push_str(&format!("\n{}\n", "=".repeat(80).bright_cyan()));
    result.push_str(&format!(
        "{}\n",
        format!("PRINTINGS OF {}", name.to_uppercase())
            .bright_cyan()
            .bold()
    ));
    result.push_str(&format!("{}\n", "=".repeat(80).bright_cyan()));

    if printings.is_empty() {
        result.push_str(&format!("\n{}\n", "No printings found.".yellow()));
    } else {
        result.push('\n');
        for printing in printings {
            result.push_str(&format_printing_line(printing));
        }
    }

    result.push('\n');
    result
}
