use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MOVE_INTERVAL_MIN: f64 = 5.0;
pub const MOVE_INTERVAL_MAX: f64 = 60.0;
pub const MOVE_INTERVAL_STEP: f64 = 5.0;

pub const RUN_DURATION_MIN: f64 = 900.0;
pub const RUN_DURATION_MAX: f64 = 7200.0;
pub const RUN_DURATION_STEP: f64 = 900.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds between cursor nudges while a session is running.
    #[serde(default = "default_move_interval")]
    pub move_interval: f64,
    /// Seconds a session runs before it stops on its own.
    #[serde(default = "default_run_duration")]
    pub run_duration: f64,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_move_interval() -> f64 {
    5.0
}

fn default_run_duration() -> f64 {
    900.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            move_interval: default_move_interval(),
            run_duration: default_run_duration(),
            debug_logging: false,
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing or empty file yields defaults;
    /// a file that exists but does not parse is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        let mut settings: Settings = serde_json::from_str(&content)?;
        settings.normalize();
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Clamp both scalars into their domains and round to the slider step,
    /// so out-of-range values on disk never reach the session timers.
    pub fn normalize(&mut self) {
        self.move_interval = snap(
            self.move_interval,
            MOVE_INTERVAL_MIN,
            MOVE_INTERVAL_MAX,
            MOVE_INTERVAL_STEP,
        );
        self.run_duration = snap(
            self.run_duration,
            RUN_DURATION_MIN,
            RUN_DURATION_MAX,
            RUN_DURATION_STEP,
        );
    }

    pub fn move_interval(&self) -> Duration {
        Duration::from_secs_f64(self.move_interval)
    }

    pub fn run_duration(&self) -> Duration {
        Duration::from_secs_f64(self.run_duration)
    }
}

fn snap(value: f64, min: f64, max: f64, step: f64) -> f64 {
    let clamped = value.clamp(min, max);
    min + ((clamped - min) / step).round() * step
}

/// Location of the settings file under the platform config directory.
pub fn config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("StayAwake")
        .join("settings.json")
}
