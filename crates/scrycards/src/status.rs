use crate::prelude::{println, *};
use colored::Colorize;

use scrycards_core::catalog::CatalogApi;
use scrycards_core::version::{VersionState, VersionStore};

use crate::backend::BackendClient;
use crate::scryfall::ScryfallClient;

#[derive(Debug, clap::Parser)]
#[command(name = "status")]
#[command(about = "Connectivity and version information")]
pub struct App {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Check that Scryfall and the backend are reachable
    #[clap(name = "ping")]
    Ping,

    /// Show the client version and the latest version reported by the backend
    #[clap(name = "version")]
    Version,
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let backend = BackendClient::new(global.backend_url.as_deref()).map_err(Error::from)?;
    if global.verbose {
        println!("Backend API Base: {}", backend.base_url());
        println!();
    }

    match app.command {
        Commands::Ping => {
            let scryfall = ScryfallClient::new().map_err(Error::from)?;
            let (scryfall_ok, backend_ok) =
                tokio::join!(scryfall.check_connectivity(), backend.check_connectivity());

            println!("{}", format_ping_line("Scryfall", scryfall.base_url(), scryfall_ok));
            println!("{}", format_ping_line("Backend", backend.base_url(), backend_ok));
            Ok(())
        }
        Commands::Version => {
            let store = VersionStore::new();
            store.load(backend.last_version()).await;

            println!(
                "{}: {}",
                "Client".green(),
                env!("CARGO_PKG_VERSION").bright_white()
            );
            println!("{}: {}", "Latest".green(), format_version_state(&store.snapshot()));
            Ok(())
        }
    }
}

fn format_ping_line(name: &str, url: &str, ok: bool) -> String {
    let status = if ok { "ok".green() } else { "unreachable".red() };
    format!("{:<9} {} ({})", format!("{name}:"), status, url.bright_black())
}

/// Badge text for the version slice
fn format_version_state(state: &VersionState) -> String {
    match state {
        VersionState::Idle | VersionState::Pending => "loading...".bright_black().to_string(),
        VersionState::Ready(version) => version.bright_white().to_string(),
        VersionState::Failed(message) => message.red().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ping_line() {
        colored::control::set_override(false);

        assert_eq!(
            format_ping_line("Scryfall", "https://api.scryfall.com", true),
            "Scryfall: ok (https://api.scryfall.com)"
        );
        assert_eq!(
            format_ping_line("Backend", "http://localhost:8080", false),
            "Backend:  unreachable (http://localhost:8080)"
        );
    }

    #[test]
    fn test_format_version_state() {
        colored::control::set_override(false);

        assert_eq!(format_version_state(&VersionState::Idle), "loading...");
        assert_eq!(
            format_version_state(&VersionState::Ready("1.0.0".to_string())),
            "1.0.0"
        );
        assert_eq!(
            format_version_state(&VersionState::Failed(
                "Backend API Error: No active version found".to_string()
            )),
            "Backend API Error: No active version found"
        );
    }
}
