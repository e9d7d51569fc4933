use citytemp::{
    default_snapshot_path, error_chain, read_api_key, Board, BoardError, ChartBackend,
    ConfigError, LocationCatalog, OpenWeatherClient, RefreshPeriod, Settings, SnapshotFile,
    TextChart,
};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

/// Live bar chart of the current temperature in Ukraine's regional centres.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// How often to refresh the readings and redraw the chart, in minutes.
    #[arg(value_name = "PERIOD_MINUTES", value_parser = clap::value_parser!(u64).range(1..))]
    period_minutes: u64,

    /// Where to keep the last readings between runs.
    #[arg(long, value_name = "PATH")]
    snapshot: Option<PathBuf>,

    /// OpenWeatherMap API key. Read from --token-file when absent.
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// File holding the OpenWeatherMap API key.
    #[arg(long, value_name = "PATH", default_value = "token.txt")]
    token_file: PathBuf,

    /// Fetch up to this many cities at the same time.
    #[arg(long, default_value_t = 1)]
    max_in_flight: usize,

    /// Write the chart as HTML to this file instead of drawing it in the terminal.
    #[cfg(feature = "chart")]
    #[arg(long, value_name = "PATH")]
    chart: Option<PathBuf>,
}

fn settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let period = RefreshPeriod::from_minutes(cli.period_minutes)?;
    let api_key = match &cli.api_key {
        Some(key) => key.clone(),
        None => read_api_key(&cli.token_file)?,
    };
    let settings = Settings::builder()
        .period(period)
        .snapshot_path(cli.snapshot.clone().unwrap_or_else(default_snapshot_path))
        .api_key(api_key)
        .max_in_flight(cli.max_in_flight)
        .build();
    settings.validate()?;
    Ok(settings)
}

#[cfg(feature = "chart")]
fn backend(cli: &Cli) -> Box<dyn ChartBackend> {
    match &cli.chart {
        Some(path) => {
            info!("Writing chart to {}", path.display());
            Box::new(citytemp::HtmlChart::new(path))
        }
        None => Box::new(TextChart::new(std::io::stdout())),
    }
}

#[cfg(not(feature = "chart"))]
fn backend(_cli: &Cli) -> Box<dyn ChartBackend> {
    Box::new(TextChart::new(std::io::stdout()))
}

async fn run(cli: &Cli, settings: Settings) -> Result<(), BoardError> {
    let source = OpenWeatherClient::new(settings.api_key.clone(), settings.request_timeout)?;
    let board = Board::open()
        .catalog(LocationCatalog::ukraine())
        .source(source)
        .period(settings.period)
        .snapshot(SnapshotFile::new(&settings.snapshot_path))
        .max_in_flight(settings.max_in_flight)
        .call()
        .await?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, shutting down");
            shutdown.cancel();
        }
    });

    info!(
        "Refreshing every {}, snapshot at {}",
        settings.period,
        settings.snapshot_path.display()
    );
    board.run(backend(cli), cancel).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings = match settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", error_chain(&e));
            return ExitCode::from(2);
        }
    };

    match run(&cli, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", error_chain(&e));
            ExitCode::FAILURE
        }
    }
}
