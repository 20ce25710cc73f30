use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::data::aggregate::DEFAULT_TOP_N;
use crate::data::filter::{FilterCriteria, DEFAULT_MINIMUM_MINUTES, MAX_MINUTES};
use crate::data::model::PositionFilter;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "PLAYER_SCOUT_CONFIG";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup defaults. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Window and page title.
    pub title: String,
    /// Dataset opened at startup, if any.
    pub dataset: Option<PathBuf>,
    /// "All", "GK", "D", "M" or "F".
    pub default_position: String,
    pub default_minimum_minutes: u32,
    /// Leagues shown in the bar chart.
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: "Player Scouting Dashboard".to_string(),
            dataset: None,
            default_position: "All".to_string(),
            default_minimum_minutes: DEFAULT_MINIMUM_MINUTES,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl DashboardConfig {
    /// Read the file named by [`CONFIG_ENV`], or defaults when it is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("in config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.default_position
            .parse::<PositionFilter>()
            .context("default_position")?;
        if self.default_minimum_minutes > MAX_MINUTES {
            bail!(
                "default_minimum_minutes {} exceeds {MAX_MINUTES}",
                self.default_minimum_minutes
            );
        }
        if self.top_n == 0 {
            bail!("top_n must be at least 1");
        }
        Ok(())
    }

    /// Initial filter selection for a new session.
    pub fn initial_criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            self.default_position.parse().unwrap_or_default(),
            self.default_minimum_minutes.min(MAX_MINUTES),
        )
    }
}
