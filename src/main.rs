mod forecast;
mod repl;
mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use clap::{Parser, Subcommand};
use tianqi_core::Config;
use tianqi_weather::ForecastService;

use server::AppState;

#[derive(Parser)]
#[command(name = "tianqi")]
#[command(about = "Taipei weather assistant")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant in the terminal
    Chat,
    /// Serve the HTTP API
    Serve {
        /// Port to bind, overriding server.port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the forecast table
    Forecast {
        /// First day (YYYY-MM-DD), default today
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day (YYYY-MM-DD), default six days after start
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Also print the hourly breakdown
        #[arg(long)]
        hourly: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tianqi_core::init()?;

    let cli = Cli::parse();
    let (mut config, _) = Config::load_validated()?;
    tracing::info!("Using configuration in {}", config.config_dir.display());

    match cli.command {
        Commands::Chat => {
            let service = Arc::new(ForecastService::from_config(&config.weather)?);
            let engine = tianqi_chat::ChatEngine::new(service);
            let weather = config.weather.clone();
            repl::run(
                &engine,
                tokio::io::BufReader::new(tokio::io::stdin()),
                std::io::stdout(),
                || weather.today(),
            )
            .await?;
        }
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = Arc::new(AppState::new(config.weather.clone())?);
            server::serve(&config.server.bind_addr(), state).await?;
        }
        Commands::Forecast { start, end, hourly } => {
            let start = start.unwrap_or_else(|| config.weather.today());
            let end = match end {
                Some(end) => end,
                None => start
                    .checked_add_days(Days::new(6))
                    .context("Start date out of range")?,
            };
            anyhow::ensure!(start <= end, "--start {start} is after --end {end}");

            let service = ForecastService::from_config(&config.weather)?;
            let table = service
                .forecast(start, end)
                .await
                .map_err(|e| {
                    let app: tianqi_core::AppError = e.into();
                    anyhow::anyhow!("{} ({})", app.user_message(), app)
                })?;

            print!("{}", forecast::render_daily(&table.daily));
            if hourly {
                print!("{}", forecast::render_hourly(&table.hourly));
            }
        }
    }

    Ok(())
}
