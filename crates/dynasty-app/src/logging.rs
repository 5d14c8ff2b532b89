// Log-file setup. Stdout carries the report, so events never go there.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "dynasty.log";

const QUIET_FILTER: &str = "dynasty=info,dynasty_app=info,warn";
const VERBOSE_FILTER: &str =
    "dynasty=debug,dynasty_app=debug,dynasty_analytics=debug,dynasty_core=debug,info";

/// Where the log goes when no path is given: the platform's local data
/// directory, or `./logs` on platforms without one.
pub fn default_log_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "dynasty")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("logs"))
        .join(LOG_FILE_NAME)
}

/// The directive set used for this run. `RUST_LOG` (passed in as `env`)
/// overrides the built-in levels when it parses.
pub fn filter_directives(env: Option<&str>, verbose: bool) -> String {
    match env.map(str::trim).filter(|s| !s.is_empty()) {
        Some(directives) if EnvFilter::try_new(directives).is_ok() => directives.to_string(),
        _ if verbose => VERBOSE_FILTER.to_string(),
        _ => QUIET_FILTER.to_string(),
    }
}

/// Install the global subscriber, appending to `path`.
pub fn init(path: &Path, verbose: bool) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let env = std::env::var("RUST_LOG").ok();
    let filter = EnvFilter::new(filter_directives(env.as_deref(), verbose));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .context("a tracing subscriber is already installed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_ends_in_log_file() {
        assert!(default_log_path().ends_with(LOG_FILE_NAME));
    }

    #[test]
    fn verbose_raises_the_built_in_level() {
        assert_eq!(filter_directives(None, false), QUIET_FILTER);
        assert_eq!(filter_directives(None, true), VERBOSE_FILTER);
        assert_eq!(filter_directives(Some("  "), true), VERBOSE_FILTER);
    }

    #[test]
    fn rust_log_wins_when_it_parses() {
        assert_eq!(filter_directives(Some("dynasty_app=trace"), false), "dynasty_app=trace");
        assert_eq!(filter_directives(Some("dynasty=loud"), false), QUIET_FILTER);
    }

    #[test]
    fn init_creates_missing_log_directory() {
        let dir = std::env::temp_dir().join(format!("dynasty_logging_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join(LOG_FILE_NAME);

        // Another test may already own the global subscriber; the file is
        // opened before that matters.
        let _ = init(&path, false);
        assert!(path.is_file());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
