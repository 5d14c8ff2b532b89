// Dynasty league report entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Start logging to a file (stdout carries the report)
// 3. Load config, or run on built-in settings for a league given by id
// 4. Pick a data source (Sleeper API, or a snapshot directory)
// 5. Load the data season, its history and its roster activity
// 6. Fetch the player directory if rosters are requested
// 7. Compute analytics and print the report

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dynasty_app::client::SleeperClient;
use dynasty_app::fetch;
use dynasty_app::logging;
use dynasty_app::players::PlayerDirectoryCache;
use dynasty_app::report;
use dynasty_app::snapshot::SnapshotDir;
use dynasty_app::source::LeagueSource;
use dynasty_core::config::{self, Config, ConfigError};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "dynasty")]
#[command(about = "Power rankings, playoffs, draft picks and history for a Sleeper dynasty league")]
#[command(version)]
struct Cli {
    /// League to report on; defaults to `league_id` from league.toml
    league_id: Option<String>,

    /// Read league data from saved JSON responses instead of the API
    #[arg(long, env = "DYNASTY_SNAPSHOT_DIR", value_name = "DIR")]
    snapshot: Option<PathBuf>,

    /// Directory holding league.toml and analytics.toml
    #[arg(long, env = "DYNASTY_CONFIG_DIR", value_name = "DIR")]
    config: Option<PathBuf>,

    /// Report on the current season only
    #[arg(long)]
    no_history: bool,

    /// List every roster with player ages and how each player was acquired
    #[arg(long)]
    rosters: bool,

    /// Log file; defaults to dynasty.log in the user data directory
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log debug events from every crate
    #[arg(short, long)]
    verbose: bool,
}

/// The loaded config with command-line overrides applied.
///
/// When no config directory exists, a league id on the command line is
/// enough to run on built-in settings.
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match config::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(ConfigError::MissingLeagueFile { dir }) if cli.config.is_none() => {
            let league_id = cli.league_id.as_deref().with_context(|| {
                format!(
                    "no league.toml in {}; pass a league id or --config DIR",
                    dir.display()
                )
            })?;
            info!(%league_id, "no config directory; using built-in settings");
            Config::for_league(league_id)
        }
        Err(e) => return Err(e).context("failed to load configuration"),
    };
    if let Some(league_id) = &cli.league_id {
        config.league.league_id = league_id.clone();
    }
    if cli.rosters {
        config.report.include_rosters = true;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Command line
    let cli = Cli::parse();

    // 2. Logging
    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path, cli.verbose)?;
    info!(version = env!("CARGO_PKG_VERSION"), log = %log_path.display(), "dynasty starting up");

    // 3. Config
    let config = resolve_config(&cli)?;
    let league_id = config.league.league_id.clone();
    info!(league = %config.league_label(), %league_id, "config loaded");

    // 4. Data source
    let source: Box<dyn LeagueSource> = match &cli.snapshot {
        Some(dir) => {
            info!(dir = %dir.display(), "reading league data from snapshots");
            Box::new(SnapshotDir::new(dir))
        }
        None => Box::new(
            SleeperClient::new(&config.api.base_url).context("failed to build HTTP client")?,
        ),
    };

    // 5. Data season, history and activity
    let data_league = fetch::resolve_data_league(source.as_ref(), &league_id).await?;
    let bundle = fetch::load_season(source.as_ref(), &data_league.league_id)
        .await
        .context("failed to load season")?;

    let mut history = vec![bundle.season.clone()];
    if !cli.no_history {
        if let Some(previous) = &bundle.previous_league_id {
            match fetch::load_history(source.as_ref(), previous).await {
                Ok(older) => history.extend(older),
                Err(e) => warn!(error = %e, "league history unavailable; showing current season only"),
            }
        }
    }

    // 6. Player directory and roster activity
    let mut cache = PlayerDirectoryCache::with_ttl_hours(config.api.player_cache_ttl_hours);
    let (players, activity) = if config.report.include_rosters {
        let players = match cache.get_or_refresh(source.as_ref(), chrono::Utc::now()).await {
            Ok(players) => Some(players),
            Err(e) => {
                warn!(error = %e, "player directory unavailable; skipping rosters");
                None
            }
        };
        let activity = fetch::load_activity(source.as_ref(), &data_league.league_id).await;
        (players, Some(activity))
    } else {
        (None, None)
    };

    // 7. Analytics and report
    let league_report = report::build_report(&bundle, &history, players, activity.as_ref(), &config);
    print!("{}", report::render_report(&league_report));

    info!(seasons = history.len(), "report printed");
    Ok(())
}
