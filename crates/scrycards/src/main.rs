use crate::prelude::*;
use clap::Parser;

mod backend;
mod card;
mod error;
mod lookup;
mod prelude;
mod reference;
mod scryfall;
mod search;
mod status;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Search the Scryfall Magic: The Gathering card catalog"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Backend base URL used for the version badge and health check
    #[clap(long, env = "SCRYCARDS_BACKEND_URL", global = true)]
    backend_url: Option<String>,

    /// Whether to display additional information.
    #[clap(long, env = "SCRYCARDS_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Search for cards
    Search(crate::search::SearchOptions),

    /// Show a card by MTGO id, with all of its printings
    Card(crate::card::CardOptions),

    /// List every printing of a card name
    Printings(crate::card::PrintingsOptions),

    /// Single card lookups (random, by name, autocomplete, rulings)
    Lookup(crate::lookup::App),

    /// Reference data (sets, symbols, catalogs, bulk data)
    Reference(crate::reference::App),

    /// Connectivity and version information
    Status(crate::status::App),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Search(options) => crate::search::run(options, app.global).await,
        SubCommands::Card(options) => crate::card::run(options, app.global).await,
        SubCommands::Printings(options) => crate::card::run_printings(options, app.global).await,
        SubCommands::Lookup(sub_app) => crate::lookup::run(sub_app, app.global).await,
        SubCommands::Reference(sub_app) => crate::reference::run(sub_app, app.global).await,
        SubCommands::Status(sub_app) => crate::status::run(sub_app, app.global).await,
    }
    .map_err(|err: color_eyre::eyre::Report| eyre!(err))
}
