use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

use crate::card::DEFAULT_DATE_FORMAT;
use crate::schedule::{DayOverRule, ScheduleEngine, WeeklySchedule};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub refresh: RefreshConfig,
    pub schedule: ScheduleConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    pub poll_interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 60,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub day_over_rule: DayOverRule,
    /// Overrides the built-in week when non-empty.
    #[serde(default)]
    pub days: Vec<DayConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DayConfig {
    pub day: String,
    /// `HH:MM-HH:MM` ranges; `23:59` as the end means "onwards".
    #[serde(default)]
    pub slots: Vec<String>,
}

impl ScheduleConfig {
    pub fn weekly_schedule(&self) -> Result<WeeklySchedule> {
        if self.days.is_empty() {
            return Ok(WeeklySchedule::couple_default());
        }

        let schedule = WeeklySchedule::from_day_entries(
            self.days
                .iter()
                .map(|day| (day.day.as_str(), day.slots.as_slice())),
        )
        .inspect_err(|err| tracing::warn!("Rejected schedule configuration: {}", err))
        .context("Invalid schedule.days entry")?;

        tracing::debug!("Loaded {} configured days", self.days.len());
        Ok(schedule)
    }

    pub fn build_engine(&self) -> Result<ScheduleEngine> {
        Ok(ScheduleEngine::new(self.weekly_schedule()?, self.day_over_rule))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    pub date_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        // Load .env file (silently ignore if not present)
        let _ = dotenvy::dotenv();

        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("together-time");

        let builder = Self::defaults()?
            // Local config file (optional, lowest priority)
            .add_source(File::from(PathBuf::from("config.toml")).required(false))
            // User config directory (optional, overrides local)
            .add_source(File::from(config_dir.join("config.toml")).required(false))
            // Environment variables (TOGETHER__REFRESH__POLL_INTERVAL_SECS=...)
            .add_source(Environment::with_prefix("TOGETHER").separator("__"));

        Self::finish(builder)
    }

    /// Load defaults, one explicit config file, then environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let builder = Self::defaults()?
            .add_source(File::from(path.to_path_buf()).required(true))
            .add_source(Environment::with_prefix("TOGETHER").separator("__"));

        Self::finish(builder)
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            // Refresh
            .set_default("refresh.poll_interval_secs", 60)?
            // Schedule
            .set_default("schedule.day_over_rule", "literal")?
            // Display
            .set_default("display.date_format", DEFAULT_DATE_FORMAT)?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.refresh.poll_interval_secs == 0 {
            anyhow::bail!("refresh.poll_interval_secs must be positive");
        }
        if StrftimeItems::new(&self.display.date_format).any(|item| matches!(item, Item::Error)) {
            anyhow::bail!(
                "display.date_format '{}' is not a valid strftime pattern",
                self.display.date_format
            );
        }
        Ok(())
    }
}
