//! CLI commands for race-viewer.

use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::auth::Credentials;
use crate::client::RacingApiClient;
use crate::config::AppConfig;
use crate::normalize::{Normalizer, TableKind};
use crate::render::{format_meets, format_races, format_table, heading, warn_user};
use crate::routes::{router, AppState};
use crate::scraper::{runner_records, RacingPostScraper, TRACK_CODES};
use crate::viewer::{load_meets, load_races, parse_date, today};

#[derive(Parser)]
#[command(name = "race-viewer")]
#[command(version, about = "Race meets, entries and results from The Racing API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List meets for a date
    Meets {
        /// Date (YYYY-MM-DD), default today
        #[arg(short, long)]
        date: Option<String>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show entries for a meet
    Entries {
        #[arg(value_name = "MEET_ID")]
        meet_id: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show results for a meet
    Results {
        #[arg(value_name = "MEET_ID")]
        meet_id: String,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Pick a meet interactively and browse its entries and results
    View {
        /// Date (YYYY-MM-DD), default today
        #[arg(short, long)]
        date: Option<String>,

        /// Hide entries
        #[arg(long)]
        no_entries: bool,

        /// Hide results
        #[arg(long)]
        no_results: bool,
    },

    /// Start the JSON API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Scrape racecards from racingpost.com
    Scrape {
        /// Track name, e.g. "Saratoga"
        #[arg(short, long, required_unless_present = "list")]
        track: Option<String>,

        /// Date (YYYY-MM-DD), default today
        #[arg(short, long)]
        date: Option<String>,

        /// List supported tracks
        #[arg(long)]
        list: bool,
    },
}

/// Load configuration and build an authenticated client. Missing credentials stop here.
fn connect() -> anyhow::Result<(AppConfig, RacingApiClient)> {
    let config = AppConfig::load()?;
    let credentials = Credentials::from_config(&config.api)?;
    tracing::debug!("Using API user {}", credentials.username());

    let client = RacingApiClient::new(&config, &credentials)?;
    Ok((config, client))
}

fn resolve_date(date: Option<String>) -> anyhow::Result<chrono::NaiveDate> {
    parse_date(&date.unwrap_or_else(today))
}

/// List meets for a date.
pub async fn run_meets(date: Option<String>, format: String) -> anyhow::Result<()> {
    let date = resolve_date(date)?;
    let (_, client) = connect()?;

    let (response, _) = load_meets(&client, &date).await;
    if let Some(warning) = &response.warning {
        warn_user(warning);
    }

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&response)?),
        "table" => print!("{}", format_meets(&response.meets, &response.date)),
        _ => {
            eprintln!("Unknown format: {}. Using table.", format);
            print!("{}", format_meets(&response.meets, &response.date));
        }
    }

    Ok(())
}

/// Show entries or results for a meet.
pub async fn run_races(meet_id: String, kind: TableKind, format: String) -> anyhow::Result<()> {
    let (_, client) = connect()?;

    let response = load_races(&client, &meet_id, kind).await;
    if let Some(warning) = &response.warning {
        warn_user(warning);
    }

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&response)?),
        "table" => print!("{}", format_races(&response, kind)),
        _ => {
            eprintln!("Unknown format: {}. Using table.", format);
            print!("{}", format_races(&response, kind));
        }
    }

    Ok(())
}

const CHANGE_DATE: &str = "[Change date]";
const QUIT: &str = "[Quit]";

/// Interactive loop: pick a meet, show its tables, repeat.
pub async fn run_view(
    date: Option<String>,
    show_entries: bool,
    show_results: bool,
) -> anyhow::Result<()> {
    let mut date = resolve_date(date)?;
    let (_, client) = connect()?;

    loop {
        let (response, selector) = load_meets(&client, &date).await;
        if let Some(warning) = &response.warning {
            warn_user(warning);
        }
        if selector.is_empty() {
            println!("No meets found for {}.", response.date);
        }

        let mut items = selector.display_labels();
        items.push(CHANGE_DATE.to_string());
        items.push(QUIT.to_string());

        let Some(choice) = Select::new()
            .with_prompt(format!("Select track ({})", response.date))
            .items(&items)
            .default(0)
            .interact_opt()?
        else {
            return Ok(());
        };

        if choice == selector.len() {
            let input: String = Input::new()
                .with_prompt("Date (YYYY-MM-DD)")
                .with_initial_text(response.date.clone())
                .interact_text()?;
            match parse_date(&input) {
                Ok(d) => date = d,
                Err(e) => warn_user(&e.to_string()),
            }
            continue;
        }

        let Some(meet) = selector.select_index(choice) else {
            return Ok(());
        };

        println!();
        print!("{}", heading(&format!("{} - {}", meet.track_name, meet.date)));
        println!("Meet ID: {}", meet.meet_id);
        println!();

        if show_entries {
            let entries = load_races(&client, &meet.meet_id, TableKind::Entries).await;
            if let Some(warning) = &entries.warning {
                warn_user(warning);
            }
            println!("--- Entries ---");
            print!("{}", format_races(&entries, TableKind::Entries));
        }

        if show_results {
            let results = load_races(&client, &meet.meet_id, TableKind::Results).await;
            if let Some(warning) = &results.warning {
                warn_user(warning);
            }
            println!("--- Results ---");
            print!("{}", format_races(&results, TableKind::Results));
        }
    }
}

/// Run the API server.
pub async fn run_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let (mut config, client) = connect()?;

    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }

    let state = Arc::new(AppState { client });
    let app = router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Scrape a track's racecards from Racing Post.
pub async fn run_scrape(track: Option<String>, date: Option<String>, list: bool) -> anyhow::Result<()> {
    if list {
        println!("=== Supported tracks ===");
        for (name, code) in TRACK_CODES {
            println!("  {:<16} {}", name, code);
        }
        return Ok(());
    }

    let track = track.ok_or_else(|| anyhow::anyhow!("--track is required"))?;
    if crate::scraper::track_code(&track).is_none() {
        anyhow::bail!("Unknown track: {}. Use --list to see supported tracks.", track);
    }

    let date = resolve_date(date)?.format("%Y-%m-%d").to_string();
    let config = AppConfig::load()?;
    let scraper = RacingPostScraper::new(&config)?;
    let normalizer = Normalizer::new(config.display.sentinel.clone());

    print!("{}", heading(&format!("{} ({})", track, date)));
    let races = scraper.race_links(&track, &date).await?;
    println!("Found {} races.", races.len());
    println!();

    for race in races {
        print!("{}", heading(&format!("{} - {}", race.time, race.name)));
        match scraper.race_runners(&race.url).await {
            Ok(runners) => {
                let table = normalizer.table(&runner_records(&runners), TableKind::Entries);
                print!("{}", format_table(&table, TableKind::Entries));
            }
            Err(e) => warn_user(&format!("{:#}", e)),
        }
        println!();
    }

    Ok(())
}
