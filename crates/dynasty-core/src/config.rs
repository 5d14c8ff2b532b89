// League and analytics configuration.
//
// `league.toml` names the league and is required. `analytics.toml` tunes the
// power rankings and may be left out. Both live in one config directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const LEAGUE_FILE: &str = "league.toml";
pub const ANALYTICS_FILE: &str = "analytics.toml";

/// Directory name used under the platform's per-user config location.
const APP_DIR: &str = "dynasty";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no {LEAGUE_FILE} in {}", .dir.display())]
    MissingLeagueFile { dir: PathBuf },

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not valid TOML: {source}", .path.display())]
    Syntax {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("`{field}` {message}")]
    Invalid { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub draft: DraftConfig,
    pub api: ApiConfig,
    pub analytics: AnalyticsSettings,
    pub report: ReportSettings,
}

impl Config {
    /// Built-in settings for a league given only by id, used when no
    /// config directory exists.
    pub fn for_league(league_id: &str) -> Config {
        Config {
            league: LeagueConfig {
                league_id: league_id.to_string(),
                name: String::new(),
                playoff_teams: DEFAULT_PLAYOFF_TEAMS,
            },
            draft: DraftConfig::default(),
            api: ApiConfig::default(),
            analytics: AnalyticsSettings::default(),
            report: ReportSettings::default(),
        }
    }

    /// The configured league name, or the id when no name was given.
    pub fn league_label(&self) -> &str {
        if self.league.name.is_empty() {
            &self.league.league_id
        } else {
            &self.league.name
        }
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

const DEFAULT_PLAYOFF_TEAMS: u32 = 6;

/// Raw deserialization target for league.toml. Only `[league]` is required.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
    #[serde(default)]
    draft: DraftConfig,
    #[serde(default)]
    api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    /// The current season's league id. Earlier seasons are found by
    /// following the platform's previous-league links.
    pub league_id: String,
    #[serde(default)]
    pub name: String,
    /// Number of teams in the winners bracket, used when the league itself
    /// does not report one. Losers-bracket placements start right after
    /// this many places.
    #[serde(default = "default_playoff_teams")]
    pub playoff_teams: u32,
}

fn default_playoff_teams() -> u32 {
    DEFAULT_PLAYOFF_TEAMS
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DraftConfig {
    /// Rounds per rookie draft.
    pub rounds: u32,
    /// How many seasons after the data season to project pick ownership for.
    pub future_seasons: u32,
}

impl Default for DraftConfig {
    fn default() -> Self {
        DraftConfig {
            rounds: 4,
            future_seasons: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub player_cache_ttl_hours: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: "https://api.sleeper.app/v1".to_string(),
            player_cache_ttl_hours: 24,
        }
    }
}

// ---------------------------------------------------------------------------
// analytics.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for analytics.toml. Every table is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct AnalyticsFile {
    weights: ScoreWeights,
    tiers: TierCutoffs,
    form: FormSettings,
    report: ReportSettings,
}

/// Everything the power-ranking engine can be tuned with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsSettings {
    pub weights: ScoreWeights,
    pub tiers: TierCutoffs,
    pub form: FormSettings,
}

/// Weights applied to each normalized metric in the composite power score.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub avg_points_for: f64,
    pub expected_win_pct: f64,
    pub recent_form: f64,
    pub efficiency: f64,
    pub consistency: f64,
    pub schedule_strength: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.avg_points_for
            + self.expected_win_pct
            + self.recent_form
            + self.efficiency
            + self.consistency
            + self.schedule_strength
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        ScoreWeights {
            avg_points_for: 0.30,
            expected_win_pct: 0.20,
            recent_form: 0.15,
            efficiency: 0.15,
            consistency: 0.10,
            schedule_strength: 0.10,
        }
    }
}

/// Tier boundaries expressed as fractions of league size.
///
/// The defaults give 3 contenders and 4 bubble teams in a 10-team league.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TierCutoffs {
    pub contender_fraction: f64,
    pub bubble_fraction: f64,
}

impl TierCutoffs {
    /// Number of (contender, bubble) teams for a league of `teams` teams.
    /// Everyone else is rebuilding.
    pub fn split(&self, teams: usize) -> (usize, usize) {
        let n = teams as f64;
        let contenders = ((self.contender_fraction * n).round() as usize).min(teams);
        let bubble = ((self.bubble_fraction * n).round() as usize).min(teams - contenders);
        (contenders, bubble)
    }
}

impl Default for TierCutoffs {
    fn default() -> Self {
        TierCutoffs {
            contender_fraction: 0.3,
            bubble_fraction: 0.4,
        }
    }
}

/// Recent-form weighting.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Weights for the most recent score first. The window is its length.
    pub weights: Vec<f64>,
    /// Trend threshold as a fraction of the season average.
    pub trend_threshold: f64,
}

impl FormSettings {
    pub fn window(&self) -> usize {
        self.weights.len()
    }
}

impl Default for FormSettings {
    fn default() -> Self {
        FormSettings {
            weights: vec![0.5, 0.3, 0.2],
            trend_threshold: 0.03,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportSettings {
    /// List each team's starters by name (requires the player directory).
    #[serde(default)]
    pub include_rosters: bool,
}

// ---------------------------------------------------------------------------
// Locating the config directory
// ---------------------------------------------------------------------------

/// The per-user config directory, when the platform has one.
pub fn user_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_DIR).map(|dirs| dirs.config_dir().to_path_buf())
}

/// Pick the directory to load from.
///
/// An explicit directory is used as given. Otherwise `<cwd>/config` wins
/// over the per-user directory, and the first one holding a `league.toml`
/// is returned.
pub fn find_config_dir(
    explicit: Option<&Path>,
    cwd: &Path,
    user_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return if dir.join(LEAGUE_FILE).is_file() {
            Ok(dir.to_path_buf())
        } else {
            Err(ConfigError::MissingLeagueFile {
                dir: dir.to_path_buf(),
            })
        };
    }

    let local = cwd.join("config");
    std::iter::once(local.clone())
        .chain(user_dir)
        .find(|dir| dir.join(LEAGUE_FILE).is_file())
        .ok_or(ConfigError::MissingLeagueFile { dir: local })
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `league.toml` and (if present) `analytics.toml` from
/// `config_dir`.
pub fn load_config_from(config_dir: &Path) -> Result<Config, ConfigError> {
    let league_path = config_dir.join(LEAGUE_FILE);
    if !league_path.is_file() {
        return Err(ConfigError::MissingLeagueFile {
            dir: config_dir.to_path_buf(),
        });
    }
    let league_file: LeagueFile = parse_file(&league_path)?;

    let analytics_path = config_dir.join(ANALYTICS_FILE);
    let analytics_file: AnalyticsFile = if analytics_path.is_file() {
        parse_file(&analytics_path)?
    } else {
        debug!(path = %analytics_path.display(), "no analytics file, using built-in tuning");
        AnalyticsFile::default()
    };

    let config = Config {
        league: league_file.league,
        draft: league_file.draft,
        api: league_file.api,
        analytics: AnalyticsSettings {
            weights: analytics_file.weights,
            tiers: analytics_file.tiers,
            form: analytics_file.form,
        },
        report: analytics_file.report,
    };

    validate(&config)?;
    debug!(dir = %config_dir.display(), league = %config.league_label(), "configuration loaded");

    Ok(config)
}

/// Find the config directory (see [`find_config_dir`]) and load it.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|source| ConfigError::Read {
        path: PathBuf::from("."),
        source,
    })?;
    let dir = find_config_dir(explicit, &cwd, user_config_dir())?;
    load_config_from(&dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Syntax {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.league.league_id.trim().is_empty() {
        return Err(invalid("league.league_id", "must not be empty"));
    }
    if config.league.playoff_teams == 0 {
        return Err(invalid("league.playoff_teams", "must be greater than 0"));
    }
    if config.draft.rounds == 0 {
        return Err(invalid("draft.rounds", "must be greater than 0"));
    }
    if config.draft.future_seasons == 0 {
        return Err(invalid("draft.future_seasons", "must be greater than 0"));
    }
    if config.api.base_url.trim().is_empty() {
        return Err(invalid("api.base_url", "must not be empty"));
    }
    if config.api.player_cache_ttl_hours == 0 {
        return Err(invalid("api.player_cache_ttl_hours", "must be greater than 0"));
    }

    validate_analytics(&config.analytics)
}

/// Check analytics settings on their own, so callers that build them in
/// code (rather than from files) get the same guarantees.
pub fn validate_analytics(settings: &AnalyticsSettings) -> Result<(), ConfigError> {
    let w = &settings.weights;
    let weight_fields: &[(&str, f64)] = &[
        ("weights.avg_points_for", w.avg_points_for),
        ("weights.expected_win_pct", w.expected_win_pct),
        ("weights.recent_form", w.recent_form),
        ("weights.efficiency", w.efficiency),
        ("weights.consistency", w.consistency),
        ("weights.schedule_strength", w.schedule_strength),
    ];
    for (name, val) in weight_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(invalid(name, format!("must be >= 0, got {val}")));
        }
    }
    let total = w.sum();
    if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(invalid("weights", format!("must sum to 1.0, got {total}")));
    }

    let t = &settings.tiers;
    for (name, val) in [
        ("tiers.contender_fraction", t.contender_fraction),
        ("tiers.bubble_fraction", t.bubble_fraction),
    ] {
        if !(0.0..=1.0).contains(&val) {
            return Err(invalid(
                name,
                format!("must be between 0.0 and 1.0 inclusive, got {val}"),
            ));
        }
    }
    if t.contender_fraction + t.bubble_fraction > 1.0 + WEIGHT_SUM_TOLERANCE {
        return Err(invalid(
            "tiers.bubble_fraction",
            "contender and bubble fractions together must not exceed 1.0",
        ));
    }

    let f = &settings.form;
    if f.weights.is_empty() {
        return Err(invalid("form.weights", "must contain at least one weight"));
    }
    if let Some(bad) = f.weights.iter().find(|v| !v.is_finite() || **v <= 0.0) {
        return Err(invalid("form.weights", format!("must all be > 0, got {bad}")));
    }
    if !f.trend_threshold.is_finite() || f.trend_threshold < 0.0 {
        return Err(invalid(
            "form.trend_threshold",
            format!("must be >= 0, got {}", f.trend_threshold),
        ));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
