mod config;
mod http;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use platform_obs::{ObsConfig, init_tracing};
use products_roster::{Dataset, Roster, SEAT_RANGE};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "roster-server", version, about = "Read-only employee roster API")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve(ServeCommand),
    /// Load the dataset and report data-quality issues.
    Check(DatasetArgs),
    /// Print which seats are booked.
    Seats(DatasetArgs),
}

#[derive(Args, Debug)]
struct DatasetArgs {
    /// Dataset path (defaults to ROSTER_DATASET, then the bundled dataset).
    #[arg(long, value_name = "FILE")]
    dataset: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "0.0.0.0")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 3000)]
    port: u16,
    #[command(flatten)]
    dataset: DatasetArgs,
}

impl From<&ServeCommand> for ServeConfig {
    fn from(value: &ServeCommand) -> Self {
        ServeConfig::new(value.host, value.port)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let app_config = AppConfig::load()?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, app_config).await,
        Command::Check(args) => check_dataset(&app_config.with_dataset(args.dataset)),
        Command::Seats(args) => print_seats(&app_config.with_dataset(args.dataset)),
    }
}

fn load_roster(config: &AppConfig) -> Result<Roster> {
    let dataset = Dataset::load(config.dataset_path.as_deref()).with_context(|| {
        match &config.dataset_path {
            Some(path) => format!("loading dataset {}", path.display()),
            None => "loading bundled dataset".to_string(),
        }
    })?;
    Ok(Roster::from(dataset))
}

async fn run_server(cmd: ServeCommand, config: AppConfig) -> Result<()> {
    let serve_config = ServeConfig::from(&cmd);
    let config = config.with_dataset(cmd.dataset.dataset);
    let roster = load_roster(&config)?;
    for issue in roster.diagnostics() {
        warn!(%issue, "dataset issue");
    }
    info!(employees = roster.len(), "roster loaded");
    let state = AppState {
        roster: Arc::new(roster),
        config: Arc::new(config),
    };
    http::serve(serve_config, state).await
}

fn check_dataset(config: &AppConfig) -> Result<()> {
    let roster = load_roster(config)?;
    let issues = roster.diagnostics();
    println!(
        "{} employees, {} managers",
        roster.len(),
        roster.managers().len()
    );
    for issue in &issues {
        println!("  - {issue}");
    }
    if !issues.is_empty() {
        bail!("dataset has {} issue(s)", issues.len());
    }
    println!("dataset ok");
    Ok(())
}

fn print_seats(config: &AppConfig) -> Result<()> {
    let seats = load_roster(config)?.seat_occupancy();
    let booked: Vec<String> = seats.booked().map(|seat| seat.to_string()).collect();
    println!(
        "{} of {} seats booked",
        booked.len(),
        SEAT_RANGE.count()
    );
    println!("{}", booked.join(", "));
    Ok(())
}
