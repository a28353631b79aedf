//! Race Viewer
//!
//! Terminal and JSON viewer for North American race meets, entries and
//! results from The Racing API, with a Racing Post racecard scraper.

mod auth;
mod cli;
mod client;
mod config;
mod normalize;
mod render;
mod retry;
mod routes;
mod scraper;
mod selector;
mod types;
mod viewer;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::normalize::TableKind;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Table and JSON output go to stdout; keep logs on stderr and quiet outside the server
    let default_filter = match cli.command {
        Commands::Serve { .. } => "race_viewer=info,tower_http=info",
        _ => "race_viewer=warn",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Meets { date, format } => cli::run_meets(date, format).await,
        Commands::Entries { meet_id, format } => {
            cli::run_races(meet_id, TableKind::Entries, format).await
        }
        Commands::Results { meet_id, format } => {
            cli::run_races(meet_id, TableKind::Results, format).await
        }
        Commands::View {
            date,
            no_entries,
            no_results,
        } => cli::run_view(date, !no_entries, !no_results).await,
        Commands::Serve { host, port } => cli::run_serve(host, port).await,
        Commands::Scrape { track, date, list } => cli::run_scrape(track, date, list).await,
    }
}
