//! Application-level configuration: game tunables and the cursor color palette.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PUZZLE_RUSH_CONFIG_PATH";

const DEFAULT_STARTING_POINTS: i32 = 15;
const DEFAULT_POINTS_AWARD: i32 = 5;
const DEFAULT_DECAY_AMOUNT: i32 = 1;
const DEFAULT_DECAY_INTERVAL_SECONDS: u64 = 5;
const DEFAULT_COUNTDOWN_SECONDS: u64 = 5;
const DEFAULT_STALENESS_SECONDS: u64 = 30;
/// Shared non-unique color handed out once the palette is exhausted.
const DEFAULT_FALLBACK_COLOR: &str = "gray";

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    starting_points: i32,
    points_award: i32,
    decay_amount: i32,
    decay_interval: Duration,
    countdown: Duration,
    staleness_window: Duration,
    palette: Vec<String>,
    fallback_color: String,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the
    /// baked-in defaults when the file is absent or unreadable.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        palette = config.palette.len(),
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Points every player starts an active session with.
    pub fn starting_points(&self) -> i32 {
        self.starting_points
    }

    /// Points handed to the next player on a correct answer.
    pub fn points_award(&self) -> i32 {
        self.points_award
    }

    /// Points subtracted from every surviving player per decay tick.
    pub fn decay_amount(&self) -> i32 {
        self.decay_amount
    }

    /// Interval between decay ticks.
    pub fn decay_interval(&self) -> Duration {
        self.decay_interval
    }

    /// Default pre-game countdown duration.
    pub fn countdown(&self) -> Duration {
        self.countdown
    }

    /// Age after which ephemeral cursor/activity entries are pruned.
    pub fn staleness_window(&self) -> Duration {
        self.staleness_window
    }

    /// Cursor color palette, unique within a team.
    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    /// Shared non-unique color used once the palette is exhausted.
    pub fn fallback_color(&self) -> &str {
        &self.fallback_color
    }

    /// First palette color not already listed in `used`, if any remains.
    pub fn first_unused_color(&self, used: &[String]) -> Option<String> {
        self.palette
            .iter()
            .find(|candidate| !used.contains(candidate))
            .cloned()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            starting_points: DEFAULT_STARTING_POINTS,
            points_award: DEFAULT_POINTS_AWARD,
            decay_amount: DEFAULT_DECAY_AMOUNT,
            decay_interval: Duration::from_secs(DEFAULT_DECAY_INTERVAL_SECONDS),
            countdown: Duration::from_secs(DEFAULT_COUNTDOWN_SECONDS),
            staleness_window: Duration::from_secs(DEFAULT_STALENESS_SECONDS),
            palette: default_palette(),
            fallback_color: DEFAULT_FALLBACK_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    starting_points: Option<i32>,
    points_award: Option<i32>,
    decay_amount: Option<i32>,
    decay_interval_seconds: Option<u64>,
    countdown_seconds: Option<u64>,
    staleness_seconds: Option<u64>,
    palette: Option<Vec<String>>,
    fallback_color: Option<String>,
}

impl From<RawConfig> for AppConfig {
    fn from(raw: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            starting_points: raw.starting_points.unwrap_or(defaults.starting_points),
            points_award: raw.points_award.unwrap_or(defaults.points_award),
            decay_amount: raw.decay_amount.unwrap_or(defaults.decay_amount),
            decay_interval: raw
                .decay_interval_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.decay_interval),
            countdown: raw
                .countdown_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.countdown),
            staleness_window: raw
                .staleness_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.staleness_window),
            palette: raw
                .palette
                .filter(|palette| !palette.is_empty())
                .unwrap_or(defaults.palette),
            fallback_color: raw.fallback_color.unwrap_or(defaults.fallback_color),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in cursor palette shipped with the binary.
fn default_palette() -> Vec<String> {
    ["red", "blue", "yellow", "green"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_unused_color_walks_palette_in_order() {
        let config = AppConfig::default();
        assert_eq!(config.first_unused_color(&[]).as_deref(), Some("red"));
        assert_eq!(
            config
                .first_unused_color(&["red".into(), "blue".into()])
                .as_deref(),
            Some("yellow")
        );
    }

    #[test]
    fn exhausted_palette_yields_none() {
        let config = AppConfig::default();
        let used: Vec<String> = config.palette().to_vec();
        assert_eq!(config.first_unused_color(&used), None);
    }
}
