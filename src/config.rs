use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "MedRemind";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Completion rate used by the simulated backfill when none is given.
pub const DEFAULT_SIMULATED_COMPLETION: f64 = 0.7;

/// Overrides the data directory.
pub const DATA_DIR_ENV: &str = "MEDREMIND_DATA_DIR";

/// Enables simulated backfill; value is the completion probability
/// (empty means the default rate).
pub const SIMULATED_BACKFILL_ENV: &str = "MEDREMIND_SIMULATED_BACKFILL";

/// Get the application data directory
/// ~/MedRemind/ on all platforms, or the working directory when no home
/// directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Directory holding the key-value documents.
pub fn store_dir() -> PathBuf {
    app_data_dir().join("store")
}

pub fn default_log_filter() -> &'static str {
    "medremind_lib=info,medremind=info"
}

/// How elapsed "today" slots get their completed/missed status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum BackfillMode {
    /// From each medication's `last_taken` mark.
    #[default]
    LastTaken,
    /// Random draw. Demo data only.
    Simulated { completed_probability: f64 },
}

impl BackfillMode {
    /// Parse the value of [`SIMULATED_BACKFILL_ENV`]. `None` (unset) keeps
    /// the default; an unparseable or out-of-range rate is rejected.
    pub fn from_env_value(value: Option<&str>) -> Result<Self, String> {
        let Some(raw) = value else {
            return Ok(Self::LastTaken);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::Simulated {
                completed_probability: DEFAULT_SIMULATED_COMPLETION,
            });
        }
        match raw.parse::<f64>() {
            Ok(p) if (0.0..=1.0).contains(&p) => Ok(Self::Simulated {
                completed_probability: p,
            }),
            _ => Err(format!(
                "{SIMULATED_BACKFILL_ENV} must be a probability between 0 and 1, got '{raw}'"
            )),
        }
    }
}

/// Startup configuration for a [`crate::tracker::Tracker`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    pub store_dir: PathBuf,
    pub backfill: BackfillMode,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            store_dir: store_dir(),
            backfill: BackfillMode::default(),
        }
    }
}

impl TrackerConfig {
    /// Defaults, overridden by the `MEDREMIND_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.store_dir = PathBuf::from(dir);
        }
        let backfill = std::env::var(SIMULATED_BACKFILL_ENV).ok();
        match BackfillMode::from_env_value(backfill.as_deref()) {
            Ok(mode) => config.backfill = mode,
            Err(e) => tracing::warn!("Ignoring backfill override: {e}"),
        }
        config
    }
}
