use crate::app::AppState;
use crate::config::AppConfig;
use crate::db::connection::{init_db, Database};
use crate::errors::ServerError;
use crate::geocode::{geocode_missing, FixedDelayPacer, NominatimGeocoder, SystemClock};
use crate::lead_store::LeadStore;
use astra::Server;
use clap::{Parser, Subcommand};
use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod geocode;
mod lead_store;
mod parcels;
mod prospecting;
mod responses;
mod router;
mod seed;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

const SCHEMA_PATH: &str = "sql/schema.sql";

#[derive(Parser, Debug)]
#[command(name = "leadledger")]
#[command(about = "Lead tracking and parcel prospecting for a roofing business")]
struct Cli {
    /// SQLite file to use instead of DB_PATH
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web server (default)
    Serve,
    /// Insert the demo leads
    Seed,
    /// Geocode every lead that has an address but no coordinates
    GeocodeMissing,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = AppConfig::from_env()?;
    if let Some(path) = cli.db {
        config.db_path = path;
    }

    let db = Database::open(&config.db_path)?;
    init_db(&db, SCHEMA_PATH)?;
    tracing::debug!("database ready at {}", config.db_path);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, db),
        Command::Seed => {
            let store = LeadStore::new(db, Arc::new(geocoder(&config)?));
            let inserted = store.seed(&seed::sample_leads())?;
            tracing::info!("seeded {inserted} leads, {} in total", store.count()?);
            Ok(())
        }
        Command::GeocodeMissing => {
            let geocoder = geocoder(&config)?;
            let mut pacer = FixedDelayPacer::new(SystemClock, config.geocode_delay);
            geocode_missing(&db, &geocoder, &mut pacer)?;
            Ok(())
        }
    }
}

fn geocoder(config: &AppConfig) -> Result<NominatimGeocoder, ServerError> {
    NominatimGeocoder::new(&config.geocoder_url, &config.user_agent)
        .map_err(|e| ServerError::Config(format!("geocoder client: {e}")))
}

fn serve(config: &AppConfig, db: Database) -> Result<(), ServerError> {
    let app = AppState::from_config(config, db)?;

    tracing::info!("starting server at http://{}", config.bind_addr);
    let server = Server::bind(&config.bind_addr).max_workers(config.max_workers);

    let result = server.serve(move |req, _info| router::serve(req, &app));

    if let Err(e) = result {
        tracing::error!("server ended with error: {e}");
    }
    tracing::info!("server shut down");
    Ok(())
}
